//! sticky-reveal is a directional-reveal engine for sticky elements.
//!
//! A managed element behaves like a native `position: sticky` box, except
//! that once it has scrolled away it does not snap back: scrolling back
//! toward it slides it in from the edge it left through, and it re-docks to
//! native sticky when it reaches its resting offset.
//!
//! # Pipeline overview
//!
//! 1. **Resolve**: which single edge is authored, and by how much ([`read_edge_config`])
//! 2. **Measure**: natural box, constraint box, viewport, padding (refresh only)
//! 3. **Derive**: per-tick [`FrameContext`] from cached geometry + current scroll
//! 4. **Decide**: pure [`next_state`] picks `Static`, `Sticky` or `Transforming`
//! 5. **Apply**: [`ElementState`] writes one inline style per change
//!
//! The design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Host-agnostic**: every read and write goes through [`LayoutHost`];
//!   [`HeadlessDocument`] is the in-memory implementation.
//! - **Cheap ticks**: [`ElementState::update`] reads only the scroll offset; all
//!   layout-forcing reads happen in mount/refresh.
//! - **No globals**: [`StickyManager`] owns the registry and subscriptions.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod edge;
mod foundation;
mod frame;
mod geometry;
mod host;
mod manager;
mod scenario;
mod state;

pub use edge::resolver::{EdgeOffsetConfig, authored_offset, read_edge_config};
pub use foundation::config::RevealConfig;
pub use foundation::core::{Axis, Edge, Mode, NodeId, PaddingBox, Point, Rect, Size, Vec2};
pub use foundation::error::{RevealError, RevealResult};
pub use foundation::math::{DEFAULT_EPSILON, parse_css_length};
pub use frame::context::{CachedGeometry, FrameContext, ScrollDirection};
pub use geometry::measure::{
    container_padding, is_completely_out_of_view, measure_constraint_rect, measure_natural_rect,
    measure_viewport_size, resolve_container, resolve_scroll_ancestor, scroll_position,
};
pub use host::headless::{DocumentSpec, HeadlessDocument, NodeSpec};
pub use host::{InlineStyle, LayoutHost, Overflow, Position};
pub use manager::registry::StickyManager;
pub use manager::subscriptions::{Subscription, SubscriptionChange};
pub use scenario::model::{Scenario, Step};
pub use scenario::replay::{ElementReport, TraceFrame, inspect, replay};
pub use state::element::{ElementState, ModeChange};
pub use state::machine::{
    ModeState, is_container_out_of_view, is_natural_position_safe, next_state, settle_state,
};
