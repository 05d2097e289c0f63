//! The seam between the reveal logic and whatever renders the page.
//!
//! Everything the crate reads from or writes to the rendering environment goes
//! through [`LayoutHost`]. Methods are split by cost: the ones documented as
//! *layout-forcing* may trigger a synchronous reflow in a browser and are only
//! called from mount/refresh, never from a per-frame update.

pub(crate) mod headless;

use crate::foundation::{
    core::{Edge, NodeId, PaddingBox, Rect, Size, Vec2},
    error::RevealResult,
};

/// Inline `position` value the crate writes.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Position {
    /// `position: static` (plain flow, offsets ignored).
    #[default]
    Static,
    /// `position: relative` (offsets nudge the box, flow slot kept).
    Relative,
    /// `position: sticky`.
    Sticky,
}

/// The subset of an element's inline style the crate owns.
///
/// `position: None` means no inline override (the authored stylesheet wins).
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct InlineStyle {
    /// Inline `position`, if set.
    pub position: Option<Position>,
    /// Inline `translate3d(x, y, 0)`, if set.
    pub translate: Option<Vec2>,
}

/// Computed `overflow` keyword on one axis.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Overflow {
    /// `visible`
    #[default]
    Visible,
    /// `hidden`
    Hidden,
    /// `clip`
    Clip,
    /// `auto`
    Auto,
    /// `scroll`
    Scroll,
}

impl Overflow {
    /// Whether the box is a user-scrollable container on this axis.
    pub fn is_scrollable(self) -> bool {
        matches!(self, Overflow::Auto | Overflow::Scroll)
    }
}

/// Rendering environment queried and mutated by the reveal logic.
pub trait LayoutHost {
    /// The document's scrolling root (`document.documentElement`).
    fn root(&self) -> NodeId;
    /// The `body` element, if the tree has one.
    fn body(&self) -> Option<NodeId>;
    /// Parent element of `node`; `None` at the tree top.
    fn parent(&self, node: NodeId) -> RevealResult<Option<NodeId>>;
    /// Child elements of `node` in tree order.
    fn children(&self, node: NodeId) -> RevealResult<Vec<NodeId>>;
    /// Whether `node` is still attached under [`LayoutHost::root`].
    fn is_connected(&self, node: NodeId) -> bool;
    /// Whether `node` carries class `class`.
    fn has_class(&self, node: NodeId, class: &str) -> RevealResult<bool>;

    /// Computed value of the `edge` offset property, as text (`"20px"`, `"auto"`).
    /// Layout-forcing.
    fn computed_offset(&self, node: NodeId, edge: Edge) -> RevealResult<String>;
    /// Computed overflow on the (x, y) axes. Layout-forcing.
    fn overflow(&self, node: NodeId) -> RevealResult<(Overflow, Overflow)>;
    /// Computed padding. Layout-forcing.
    fn padding(&self, node: NodeId) -> RevealResult<PaddingBox>;
    /// Border-box offset from the document origin, ignoring scroll and
    /// transforms (the `offsetTop`/`offsetLeft` chain). Layout-forcing.
    fn page_offset(&self, node: NodeId) -> RevealResult<Vec2>;
    /// Border-box size. Layout-forcing.
    fn border_box_size(&self, node: NodeId) -> RevealResult<Size>;
    /// Width of the left and top borders (`clientLeft`/`clientTop`). Layout-forcing.
    fn client_origin(&self, node: NodeId) -> RevealResult<Vec2>;
    /// Visible content size (`clientWidth`/`clientHeight`). Layout-forcing.
    fn client_size(&self, node: NodeId) -> RevealResult<Size>;
    /// Full scrollable content size (`scrollWidth`/`scrollHeight`). Layout-forcing.
    fn scroll_extent(&self, node: NodeId) -> RevealResult<Size>;
    /// Rendered border box relative to the visual viewport, transforms and
    /// sticky offsets included (`getBoundingClientRect`). Layout-forcing.
    fn bounding_rect(&self, node: NodeId) -> RevealResult<Rect>;

    /// Current scroll offset of a scroll container (window scroll for the root).
    fn scroll_offset(&self, node: NodeId) -> RevealResult<Vec2>;
    /// OS-reported visual viewport size, when the platform exposes one.
    fn visual_viewport(&self) -> Option<Size>;
    /// Window inner size.
    fn inner_size(&self) -> Size;

    /// Current inline style owned by the crate.
    fn inline_style(&self, node: NodeId) -> RevealResult<InlineStyle>;
    /// Replace the crate-owned inline style.
    fn set_inline_style(&mut self, node: NodeId, style: InlineStyle) -> RevealResult<()>;
    /// Attribute value, if present.
    fn attribute(&self, node: NodeId, name: &str) -> RevealResult<Option<String>>;
    /// Set (`Some`) or remove (`None`) an attribute.
    fn set_attribute(&mut self, node: NodeId, name: &str, value: Option<&str>)
    -> RevealResult<()>;
}
