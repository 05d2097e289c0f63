pub use kurbo::{Point, Rect, Size, Vec2};

/// Opaque handle to a node in a [`crate::LayoutHost`] tree.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct NodeId(pub usize);

/// The CSS edge an element's sticky offset is authored against.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    serde::Serialize,
    serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Edge {
    /// `top`: start anchor on the vertical axis.
    #[default]
    Top,
    /// `bottom`: end anchor on the vertical axis.
    Bottom,
    /// `left`: start anchor on the horizontal axis.
    Left,
    /// `right`: end anchor on the horizontal axis.
    Right,
}

impl Edge {
    /// All edges in resolution order.
    pub const ALL: [Edge; 4] = [Edge::Top, Edge::Bottom, Edge::Left, Edge::Right];

    /// Scroll axis this edge moves along.
    pub fn axis(self) -> Axis {
        match self {
            Edge::Top | Edge::Bottom => Axis::Vertical,
            Edge::Left | Edge::Right => Axis::Horizontal,
        }
    }

    /// `true` for `top`/`left`, which stick as scroll increases toward them.
    pub fn is_start(self) -> bool {
        matches!(self, Edge::Top | Edge::Left)
    }

    /// The edge on the other side of the same axis.
    pub fn opposite(self) -> Edge {
        match self {
            Edge::Top => Edge::Bottom,
            Edge::Bottom => Edge::Top,
            Edge::Left => Edge::Right,
            Edge::Right => Edge::Left,
        }
    }

    /// CSS property name.
    pub fn as_str(self) -> &'static str {
        match self {
            Edge::Top => "top",
            Edge::Bottom => "bottom",
            Edge::Left => "left",
            Edge::Right => "right",
        }
    }
}

impl std::fmt::Display for Edge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single scroll axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    /// Block axis (`top`/`bottom`, `scrollTop`).
    Vertical,
    /// Inline axis (`left`/`right`, `scrollLeft`).
    Horizontal,
}

impl Axis {
    /// Leading coordinate of `rect` on this axis.
    pub fn start(self, rect: Rect) -> f64 {
        match self {
            Axis::Vertical => rect.y0,
            Axis::Horizontal => rect.x0,
        }
    }

    /// Trailing coordinate of `rect` on this axis.
    pub fn end(self, rect: Rect) -> f64 {
        match self {
            Axis::Vertical => rect.y1,
            Axis::Horizontal => rect.x1,
        }
    }

    /// Extent of `size` on this axis.
    pub fn extent(self, size: Size) -> f64 {
        match self {
            Axis::Vertical => size.height,
            Axis::Horizontal => size.width,
        }
    }

    /// Component of `v` on this axis.
    pub fn pick(self, v: Vec2) -> f64 {
        match self {
            Axis::Vertical => v.y,
            Axis::Horizontal => v.x,
        }
    }

    /// A vector of length `amount` along this axis.
    pub fn vec(self, amount: f64) -> Vec2 {
        match self {
            Axis::Vertical => Vec2::new(0.0, amount),
            Axis::Horizontal => Vec2::new(amount, 0.0),
        }
    }
}

/// Visual mode of a managed element.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Plain flow, no transform.
    #[default]
    Static,
    /// Native sticky positioning at the authored offset.
    Sticky,
    /// Relatively positioned with an explicit translate (mid-slide).
    Transforming,
}

impl Mode {
    /// Value written to the state tagging attribute.
    pub fn tag(self) -> &'static str {
        match self {
            Mode::Static => "static",
            Mode::Sticky => "sticky",
            Mode::Transforming => "transforming",
        }
    }
}

/// Padding insets of a scroll ancestor, in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PaddingBox {
    /// Top inset.
    #[serde(default)]
    pub top: f64,
    /// Bottom inset.
    #[serde(default)]
    pub bottom: f64,
    /// Left inset.
    #[serde(default)]
    pub left: f64,
    /// Right inset.
    #[serde(default)]
    pub right: f64,
}

impl PaddingBox {
    /// Inset on `edge`.
    pub fn on(&self, edge: Edge) -> f64 {
        match edge {
            Edge::Top => self.top,
            Edge::Bottom => self.bottom,
            Edge::Left => self.left,
            Edge::Right => self.right,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
