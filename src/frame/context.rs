use crate::{
    edge::resolver::EdgeOffsetConfig,
    foundation::core::{Axis, PaddingBox, Rect},
};

/// Measurements cached at refresh time and reused by every tick until the next refresh.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CachedGeometry {
    /// Plain-flow box, relative to the scroll ancestor's content.
    pub natural_rect: Rect,
    /// Immediate containing box, same space as `natural_rect`.
    pub constraint_rect: Rect,
    /// Visible extent of the scroll ancestor along the active axis.
    pub viewport_size: f64,
    /// Scroll ancestor padding.
    pub padding: PaddingBox,
}

/// Where the scroll moved relative to the anchor edge since the last recorded position.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScrollDirection {
    /// Scroll moves the anchor edge away from the element (element leaves).
    Away,
    /// Scroll brings the element back toward its anchor edge.
    Toward,
    /// No movement beyond the tolerance.
    Still,
}

/// Everything the transition logic needs for one tick, derived from cached
/// geometry and the current scroll position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameContext {
    /// Anchored on `top`/`bottom`.
    pub is_vertical: bool,
    /// Anchored on `top`/`left`.
    pub is_start_anchor: bool,
    /// Scroll position along the active axis.
    pub current_scroll: f64,
    /// Visible extent along the active axis.
    pub viewport_size: f64,
    /// `current_scroll - last_scroll_pos`.
    pub scroll_delta: f64,
    /// Authored offset plus the ancestor's padding on the anchor edge.
    pub offset: f64,
    /// Nudge the browser applies to a relatively positioned box from the authored offset.
    pub implicit_shift: f64,
    /// Leading coordinate of the natural rect.
    pub layout_start: f64,
    /// Size of the natural rect along the axis.
    pub dimension: f64,
    /// Leading coordinate of the constraint rect.
    pub constraint_start: f64,
    /// Trailing coordinate of the constraint rect.
    pub constraint_end: f64,
}

impl FrameContext {
    /// Derive the context. Pure: `current_scroll` is supplied by the caller.
    pub fn build(
        config: &EdgeOffsetConfig,
        geometry: &CachedGeometry,
        last_scroll_pos: f64,
        current_scroll: f64,
    ) -> Self {
        let edge = config.edge;
        let axis = edge.axis();
        let is_start_anchor = edge.is_start();
        let natural = geometry.natural_rect;

        Self {
            is_vertical: axis == Axis::Vertical,
            is_start_anchor,
            current_scroll,
            viewport_size: geometry.viewport_size,
            scroll_delta: current_scroll - last_scroll_pos,
            offset: config.offset + geometry.padding.on(edge),
            implicit_shift: if is_start_anchor {
                config.offset
            } else {
                -config.offset
            },
            layout_start: axis.start(natural),
            dimension: axis.extent(natural.size()),
            constraint_start: axis.start(geometry.constraint_rect),
            constraint_end: axis.end(geometry.constraint_rect),
        }
    }

    /// Classify `scroll_delta` against the anchor's polarity; no movement, or
    /// movement smaller than `epsilon`, counts as [`ScrollDirection::Still`].
    pub fn direction(&self, epsilon: f64) -> ScrollDirection {
        if self.scroll_delta == 0.0 || self.scroll_delta.abs() < epsilon {
            return ScrollDirection::Still;
        }
        let increasing = self.scroll_delta > 0.0;
        if increasing == self.is_start_anchor {
            ScrollDirection::Away
        } else {
            ScrollDirection::Toward
        }
    }

    /// Trailing edge of the visible range.
    pub fn viewport_end(&self) -> f64 {
        self.current_scroll + self.viewport_size
    }

    /// Keep a leading visual coordinate inside the constraint box.
    pub fn clamp_to_constraint(&self, visual_start: f64) -> f64 {
        visual_start
            .min(self.constraint_end - self.dimension)
            .max(self.constraint_start)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/frame/context.rs"]
mod tests;
