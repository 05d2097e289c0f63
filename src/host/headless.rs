//! In-memory [`LayoutHost`] for tests, replays, and non-browser embedders.
//!
//! Nodes carry their plain-flow border box in document coordinates as input;
//! nothing here performs flow layout. What the document does simulate is the
//! part of rendering the reveal logic interacts with: relative offsets,
//! inline transforms, sticky clamping, nested scroll offsets, and the
//! computed-offset artifact browsers produce for relatively positioned boxes.
//! Every layout-forcing query bumps a counter so callers can assert which
//! code paths stay off the layout engine.

use std::cell::Cell;
use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::{
    foundation::core::{Axis, Edge, NodeId, PaddingBox, Rect, Size, Vec2},
    foundation::error::{RevealError, RevealResult},
    host::{InlineStyle, LayoutHost, Overflow, Position},
};

const ROOT_NAME: &str = "html";
const BODY_NAME: &str = "body";

/// Declarative description of one element, as found in scenario files.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct NodeSpec {
    /// Unique name used to refer to the node.
    pub name: String,
    /// Parent name; defaults to `body`.
    #[serde(default)]
    pub parent: Option<String>,
    /// Plain-flow border box in document coordinates.
    pub rect: Rect,
    /// Class list.
    #[serde(default)]
    pub classes: Vec<String>,
    /// Stylesheet `position`.
    #[serde(default)]
    pub position: Position,
    /// Authored edge offsets (`{"top": "20px"}`); missing edges are `auto`.
    #[serde(default)]
    pub offsets: BTreeMap<Edge, String>,
    /// Computed `overflow-x`.
    #[serde(default)]
    pub overflow_x: Overflow,
    /// Computed `overflow-y`.
    #[serde(default)]
    pub overflow_y: Overflow,
    /// Computed padding.
    #[serde(default)]
    pub padding: PaddingBox,
    /// Left/top border widths.
    #[serde(default)]
    pub border: Vec2,
    /// Visible content size; defaults to the border box minus borders.
    #[serde(default)]
    pub client_size: Option<Size>,
    /// Scrollable content size; defaults to the client size.
    #[serde(default)]
    pub scroll_extent: Option<Size>,
}

impl NodeSpec {
    /// A plain block named `name` occupying `rect`, child of `body`.
    pub fn new(name: impl Into<String>, rect: Rect) -> Self {
        Self {
            name: name.into(),
            parent: None,
            rect,
            classes: Vec::new(),
            position: Position::Static,
            offsets: BTreeMap::new(),
            overflow_x: Overflow::Visible,
            overflow_y: Overflow::Visible,
            padding: PaddingBox::default(),
            border: Vec2::ZERO,
            client_size: None,
            scroll_extent: None,
        }
    }

    /// Set the parent by name.
    pub fn parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    /// Add a class.
    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    /// Author `position: sticky` with a single edge offset.
    pub fn sticky(mut self, edge: Edge, value: impl Into<String>) -> Self {
        self.position = Position::Sticky;
        self.offsets.insert(edge, value.into());
        self
    }

    /// Author an additional edge offset.
    pub fn offset(mut self, edge: Edge, value: impl Into<String>) -> Self {
        self.offsets.insert(edge, value.into());
        self
    }

    /// Make the node a scroll container on both axes.
    pub fn scroller(mut self, client_size: Size, scroll_extent: Size) -> Self {
        self.overflow_x = Overflow::Auto;
        self.overflow_y = Overflow::Auto;
        self.client_size = Some(client_size);
        self.scroll_extent = Some(scroll_extent);
        self
    }

    /// Set the padding box.
    pub fn padding(mut self, padding: PaddingBox) -> Self {
        self.padding = padding;
        self
    }
}

/// Declarative description of a whole document.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DocumentSpec {
    /// Window inner size.
    pub viewport: Size,
    /// Visual viewport size, when different from the window (on-screen keyboard).
    #[serde(default)]
    pub visual_viewport: Option<Size>,
    /// Full document (root scroll) size.
    pub document: Size,
    /// Elements, parents before children.
    #[serde(default)]
    pub nodes: Vec<NodeSpec>,
}

#[derive(Clone, Debug)]
struct Node {
    name: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    flow: Rect,
    classes: BTreeSet<String>,
    position: Position,
    offsets: BTreeMap<Edge, String>,
    overflow: (Overflow, Overflow),
    padding: PaddingBox,
    border: Vec2,
    client_size: Option<Size>,
    scroll_extent: Option<Size>,
    scroll: Vec2,
    style: InlineStyle,
    attributes: BTreeMap<String, String>,
}

impl Node {
    fn from_spec(spec: &NodeSpec, parent: Option<NodeId>) -> Self {
        Self {
            name: spec.name.clone(),
            parent,
            children: Vec::new(),
            flow: spec.rect,
            classes: spec.classes.iter().cloned().collect(),
            position: spec.position,
            offsets: spec.offsets.clone(),
            overflow: (spec.overflow_x, spec.overflow_y),
            padding: spec.padding,
            border: spec.border,
            client_size: spec.client_size,
            scroll_extent: spec.scroll_extent,
            scroll: Vec2::ZERO,
            style: InlineStyle::default(),
            attributes: BTreeMap::new(),
        }
    }

    fn effective_position(&self) -> Position {
        self.style.position.unwrap_or(self.position)
    }

    fn authored(&self, edge: Edge) -> Option<f64> {
        let raw = self.offsets.get(&edge)?;
        let raw = raw.trim();
        if raw.is_empty() || raw.eq_ignore_ascii_case("auto") {
            return None;
        }
        Some(crate::parse_css_length(raw).unwrap_or(0.0))
    }

    /// Offset applied by `position: relative`; `top`/`left` win over `bottom`/`right`.
    fn relative_shift(&self) -> Vec2 {
        let dy = match (self.authored(Edge::Top), self.authored(Edge::Bottom)) {
            (Some(top), _) => top,
            (None, Some(bottom)) => -bottom,
            (None, None) => 0.0,
        };
        let dx = match (self.authored(Edge::Left), self.authored(Edge::Right)) {
            (Some(left), _) => left,
            (None, Some(right)) => -right,
            (None, None) => 0.0,
        };
        Vec2::new(dx, dy)
    }
}

/// In-memory document implementing [`LayoutHost`].
#[derive(Debug)]
pub struct HeadlessDocument {
    nodes: Vec<Node>,
    names: HashMap<String, NodeId>,
    inner_size: Size,
    visual_viewport: Option<Size>,
    layout_reads: Cell<u64>,
}

impl HeadlessDocument {
    /// Empty document: a root sized `document` and a `body` covering it.
    pub fn new(viewport: Size, document: Size) -> Self {
        let doc_rect = Rect::from_origin_size((0.0, 0.0), document);
        let mut root = Node::from_spec(&NodeSpec::new(ROOT_NAME, doc_rect), None);
        root.overflow = (Overflow::Auto, Overflow::Auto);
        root.scroll_extent = Some(document);
        let mut out = Self {
            nodes: vec![root],
            names: HashMap::from([(ROOT_NAME.to_string(), NodeId(0))]),
            inner_size: viewport,
            visual_viewport: None,
            layout_reads: Cell::new(0),
        };
        let body = Node::from_spec(&NodeSpec::new(BODY_NAME, doc_rect), Some(NodeId(0)));
        out.push(body);
        out
    }

    /// Build a document from its declarative description.
    pub fn from_spec(spec: &DocumentSpec) -> RevealResult<Self> {
        let mut doc = Self::new(spec.viewport, spec.document);
        doc.visual_viewport = spec.visual_viewport;
        for node in &spec.nodes {
            doc.append(node.clone())?;
        }
        Ok(doc)
    }

    /// Attach a new element; its parent must already exist.
    pub fn append(&mut self, spec: NodeSpec) -> RevealResult<NodeId> {
        if spec.name.trim().is_empty() {
            return Err(RevealError::validation("node name must be non-empty"));
        }
        if self.names.contains_key(&spec.name) {
            return Err(RevealError::validation(format!(
                "duplicate node name '{}'",
                spec.name
            )));
        }
        let parent_name = spec.parent.as_deref().unwrap_or(BODY_NAME);
        let parent = self.node_id(parent_name).ok_or_else(|| {
            RevealError::validation(format!(
                "node '{}' references unknown parent '{parent_name}'",
                spec.name
            ))
        })?;
        Ok(self.push(Node::from_spec(&spec, Some(parent))))
    }

    fn push(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len());
        if let Some(parent) = node.parent {
            self.nodes[parent.0].children.push(id);
        }
        self.names.insert(node.name.clone(), id);
        self.nodes.push(node);
        id
    }

    /// Look up a node by name.
    pub fn node_id(&self, name: &str) -> Option<NodeId> {
        self.names.get(name).copied()
    }

    /// Name of `node`.
    pub fn name(&self, node: NodeId) -> RevealResult<&str> {
        Ok(&self.get(node)?.name)
    }

    /// Detach `node` (and its subtree) from the tree. Ids stay valid.
    pub fn detach(&mut self, node: NodeId) -> RevealResult<()> {
        let parent = self.get(node)?.parent;
        if let Some(parent) = parent {
            self.nodes[parent.0].children.retain(|c| *c != node);
        }
        self.get_mut(node)?.parent = None;
        Ok(())
    }

    /// Scroll a container (the root scrolls the window). Clamped to the scrollable range.
    pub fn scroll_to(&mut self, node: NodeId, offset: Vec2) -> RevealResult<()> {
        let max = {
            let extent = self.extent_of(node)?;
            let client = self.client_of(node)?;
            Vec2::new(
                (extent.width - client.width).max(0.0),
                (extent.height - client.height).max(0.0),
            )
        };
        self.get_mut(node)?.scroll =
            Vec2::new(offset.x.clamp(0.0, max.x), offset.y.clamp(0.0, max.y));
        Ok(())
    }

    /// Scroll a container along one axis, keeping the other.
    pub fn scroll_axis_to(&mut self, node: NodeId, axis: Axis, offset: f64) -> RevealResult<()> {
        let current = self.get(node)?.scroll;
        let next = match axis {
            Axis::Vertical => Vec2::new(current.x, offset),
            Axis::Horizontal => Vec2::new(offset, current.y),
        };
        self.scroll_to(node, next)
    }

    /// Author (`Some`) or clear (`None`) an edge offset.
    pub fn set_offset(
        &mut self,
        node: NodeId,
        edge: Edge,
        value: Option<&str>,
    ) -> RevealResult<()> {
        let n = self.get_mut(node)?;
        match value {
            Some(v) => {
                n.offsets.insert(edge, v.to_string());
            }
            None => {
                n.offsets.remove(&edge);
            }
        }
        Ok(())
    }

    /// Move/resize a node's plain-flow box.
    pub fn set_rect(&mut self, node: NodeId, rect: Rect) -> RevealResult<()> {
        self.get_mut(node)?.flow = rect;
        Ok(())
    }

    /// Add or remove a class.
    pub fn set_class(&mut self, node: NodeId, class: &str, present: bool) -> RevealResult<()> {
        let n = self.get_mut(node)?;
        if present {
            n.classes.insert(class.to_string());
        } else {
            n.classes.remove(class);
        }
        Ok(())
    }

    /// Resize the window; `visual` overrides the visual viewport.
    pub fn set_viewport(&mut self, inner: Size, visual: Option<Size>) {
        self.inner_size = inner;
        self.visual_viewport = visual;
    }

    /// Number of layout-forcing queries answered so far.
    pub fn layout_reads(&self) -> u64 {
        self.layout_reads.get()
    }

    /// Rendered box in document coordinates: flow + relative/sticky shift + translate.
    pub fn rendered_rect(&self, node: NodeId) -> RevealResult<Rect> {
        let n = self.get(node)?;
        let translate = n.style.translate.unwrap_or(Vec2::ZERO);
        Ok(n.flow + self.position_shift(node)? + translate)
    }

    fn get(&self, node: NodeId) -> RevealResult<&Node> {
        self.nodes
            .get(node.0)
            .ok_or_else(|| RevealError::host(format!("unknown node #{}", node.0)))
    }

    fn get_mut(&mut self, node: NodeId) -> RevealResult<&mut Node> {
        self.nodes
            .get_mut(node.0)
            .ok_or_else(|| RevealError::host(format!("unknown node #{}", node.0)))
    }

    fn touch_layout(&self) {
        self.layout_reads.set(self.layout_reads.get() + 1);
    }

    fn client_of(&self, node: NodeId) -> RevealResult<Size> {
        if node == self.root() {
            return Ok(self.inner_size);
        }
        let n = self.get(node)?;
        Ok(n.client_size.unwrap_or_else(|| {
            Size::new(
                (n.flow.width() - n.border.x).max(0.0),
                (n.flow.height() - n.border.y).max(0.0),
            )
        }))
    }

    fn extent_of(&self, node: NodeId) -> RevealResult<Size> {
        let client = self.client_of(node)?;
        Ok(self.get(node)?.scroll_extent.unwrap_or(client))
    }

    /// Shift from `position: relative` or `position: sticky`.
    fn position_shift(&self, node: NodeId) -> RevealResult<Vec2> {
        let n = self.get(node)?;
        match n.effective_position() {
            Position::Static => Ok(Vec2::ZERO),
            Position::Relative => Ok(n.relative_shift()),
            Position::Sticky => self.sticky_shift(node),
        }
    }

    fn nearest_scroller(&self, node: NodeId) -> RevealResult<NodeId> {
        let mut cur = self.get(node)?.parent;
        while let Some(id) = cur {
            let n = self.get(id)?;
            if id == self.root() || n.overflow.0.is_scrollable() || n.overflow.1.is_scrollable() {
                return Ok(id);
            }
            cur = n.parent;
        }
        Ok(self.root())
    }

    fn sticky_shift(&self, node: NodeId) -> RevealResult<Vec2> {
        let n = self.get(node)?;
        let Some(parent) = n.parent else {
            return Ok(Vec2::ZERO);
        };
        let scroller = self.nearest_scroller(node)?;
        let s = self.get(scroller)?;
        let origin = if scroller == self.root() {
            Vec2::ZERO
        } else {
            s.flow.origin().to_vec2() + s.border
        };
        let client = self.client_of(scroller)?;
        let pad = if scroller == self.root() {
            PaddingBox::default()
        } else {
            s.padding
        };
        // Everything below is in the scroller's content coordinates.
        let natural = n.flow - origin;
        let container = if parent == scroller
            || (scroller == self.root() && Some(parent) == self.body())
        {
            Rect::from_origin_size((0.0, 0.0), self.extent_of(scroller)?)
        } else {
            self.get(parent)?.flow - origin
        };

        let mut shift = Vec2::ZERO;
        for (axis, start_edge, end_edge) in [
            (Axis::Vertical, Edge::Top, Edge::Bottom),
            (Axis::Horizontal, Edge::Left, Edge::Right),
        ] {
            let scroll = axis.pick(s.scroll);
            let view_start = scroll;
            let view_end = scroll + axis.extent(client);
            let start = axis.start(natural);
            let dim = axis.extent(natural.size());
            let amount = if let Some(o) = n.authored(start_edge) {
                let max = (axis.end(container) - dim - start).max(0.0);
                (view_start + pad.on(start_edge) + o - start).clamp(0.0, max)
            } else if let Some(o) = n.authored(end_edge) {
                let min = (axis.start(container) - start).min(0.0);
                (view_end - pad.on(end_edge) - o - (start + dim)).clamp(min, 0.0)
            } else {
                0.0
            };
            shift += axis.vec(amount);
        }
        Ok(shift)
    }

    fn ancestor_scroll(&self, node: NodeId) -> RevealResult<Vec2> {
        let mut total = Vec2::ZERO;
        let mut cur = self.get(node)?.parent;
        while let Some(id) = cur {
            let n = self.get(id)?;
            total += n.scroll;
            cur = n.parent;
        }
        Ok(total)
    }
}

impl LayoutHost for HeadlessDocument {
    fn root(&self) -> NodeId {
        NodeId(0)
    }

    fn body(&self) -> Option<NodeId> {
        self.node_id(BODY_NAME)
    }

    fn parent(&self, node: NodeId) -> RevealResult<Option<NodeId>> {
        Ok(self.get(node)?.parent)
    }

    fn children(&self, node: NodeId) -> RevealResult<Vec<NodeId>> {
        Ok(self.get(node)?.children.clone())
    }

    fn is_connected(&self, node: NodeId) -> bool {
        let mut cur = Some(node);
        while let Some(id) = cur {
            if id == self.root() {
                return true;
            }
            cur = match self.nodes.get(id.0) {
                Some(n) => n.parent,
                None => return false,
            };
        }
        false
    }

    fn has_class(&self, node: NodeId, class: &str) -> RevealResult<bool> {
        Ok(self.get(node)?.classes.contains(class))
    }

    fn computed_offset(&self, node: NodeId, edge: Edge) -> RevealResult<String> {
        self.touch_layout();
        let n = self.get(node)?;
        if let Some(raw) = n.offsets.get(&edge) {
            let raw = raw.trim();
            if !raw.is_empty() && !raw.eq_ignore_ascii_case("auto") {
                return Ok(raw.to_string());
            }
        }
        // Relatively positioned boxes resolve an `auto` edge to the negated opposite.
        if n.effective_position() == Position::Relative
            && let Some(opposite) = n.authored(edge.opposite())
        {
            return Ok(format!("{}px", -opposite));
        }
        Ok("auto".to_string())
    }

    fn overflow(&self, node: NodeId) -> RevealResult<(Overflow, Overflow)> {
        self.touch_layout();
        Ok(self.get(node)?.overflow)
    }

    fn padding(&self, node: NodeId) -> RevealResult<PaddingBox> {
        self.touch_layout();
        Ok(self.get(node)?.padding)
    }

    fn page_offset(&self, node: NodeId) -> RevealResult<Vec2> {
        self.touch_layout();
        let n = self.get(node)?;
        Ok(n.flow.origin().to_vec2() + self.position_shift(node)?)
    }

    fn border_box_size(&self, node: NodeId) -> RevealResult<Size> {
        self.touch_layout();
        Ok(self.get(node)?.flow.size())
    }

    fn client_origin(&self, node: NodeId) -> RevealResult<Vec2> {
        self.touch_layout();
        Ok(self.get(node)?.border)
    }

    fn client_size(&self, node: NodeId) -> RevealResult<Size> {
        self.touch_layout();
        self.client_of(node)
    }

    fn scroll_extent(&self, node: NodeId) -> RevealResult<Size> {
        self.touch_layout();
        self.extent_of(node)
    }

    fn bounding_rect(&self, node: NodeId) -> RevealResult<Rect> {
        self.touch_layout();
        Ok(self.rendered_rect(node)? - self.ancestor_scroll(node)?)
    }

    fn scroll_offset(&self, node: NodeId) -> RevealResult<Vec2> {
        Ok(self.get(node)?.scroll)
    }

    fn visual_viewport(&self) -> Option<Size> {
        self.visual_viewport
    }

    fn inner_size(&self) -> Size {
        self.inner_size
    }

    fn inline_style(&self, node: NodeId) -> RevealResult<InlineStyle> {
        Ok(self.get(node)?.style)
    }

    fn set_inline_style(&mut self, node: NodeId, style: InlineStyle) -> RevealResult<()> {
        self.get_mut(node)?.style = style;
        Ok(())
    }

    fn attribute(&self, node: NodeId, name: &str) -> RevealResult<Option<String>> {
        Ok(self.get(node)?.attributes.get(name).cloned())
    }

    fn set_attribute(
        &mut self,
        node: NodeId,
        name: &str,
        value: Option<&str>,
    ) -> RevealResult<()> {
        let n = self.get_mut(node)?;
        match value {
            Some(v) => {
                n.attributes.insert(name.to_string(), v.to_string());
            }
            None => {
                n.attributes.remove(name);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/host/headless.rs"]
mod tests;
