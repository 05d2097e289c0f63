use super::*;

fn page() -> (HeadlessDocument, NodeId) {
    let mut doc = HeadlessDocument::new(Size::new(1000.0, 800.0), Size::new(1000.0, 10_000.0));
    let el = doc
        .append(
            NodeSpec::new("hdr", Rect::new(0.0, 2000.0, 1000.0, 2500.0))
                .class("sticky-reveal")
                .sticky(Edge::Top, "20px"),
        )
        .unwrap();
    (doc, el)
}

#[test]
fn root_and_body_are_prebuilt() {
    let (doc, el) = page();
    assert_eq!(doc.name(doc.root()).unwrap(), "html");
    let body = doc.body().unwrap();
    assert_eq!(doc.parent(el).unwrap(), Some(body));
    assert_eq!(doc.parent(body).unwrap(), Some(doc.root()));
    assert!(doc.is_connected(el));
    assert!(doc.has_class(el, "sticky-reveal").unwrap());
}

#[test]
fn sticky_box_sticks_once_scrolled_past() {
    let (mut doc, el) = page();
    assert_eq!(doc.page_offset(el).unwrap(), Vec2::new(0.0, 2000.0));

    doc.scroll_to(doc.root(), Vec2::new(0.0, 2100.0)).unwrap();
    assert_eq!(doc.page_offset(el).unwrap(), Vec2::new(0.0, 2120.0));
    assert_eq!(doc.bounding_rect(el).unwrap().y0, 20.0);
}

#[test]
fn sticky_box_is_clamped_to_its_container() {
    let mut doc = HeadlessDocument::new(Size::new(1000.0, 800.0), Size::new(1000.0, 10_000.0));
    doc.append(NodeSpec::new("section", Rect::new(0.0, 1000.0, 1000.0, 1600.0)))
        .unwrap();
    let el = doc
        .append(
            NodeSpec::new("hdr", Rect::new(0.0, 1000.0, 1000.0, 1100.0))
                .parent("section")
                .sticky(Edge::Top, "0px"),
        )
        .unwrap();
    doc.scroll_to(doc.root(), Vec2::new(0.0, 3000.0)).unwrap();
    // Bottom of the section minus the element height.
    assert_eq!(doc.page_offset(el).unwrap().y, 1500.0);
}

#[test]
fn relative_position_resolves_auto_edge_to_negated_opposite() {
    let mut doc = HeadlessDocument::new(Size::new(1000.0, 800.0), Size::new(1000.0, 4000.0));
    let el = doc
        .append(
            NodeSpec::new("footer", Rect::new(0.0, 100.0, 1000.0, 150.0))
                .sticky(Edge::Bottom, "30px"),
        )
        .unwrap();
    assert_eq!(doc.computed_offset(el, Edge::Top).unwrap(), "auto");
    assert_eq!(doc.computed_offset(el, Edge::Bottom).unwrap(), "30px");

    doc.set_inline_style(
        el,
        InlineStyle {
            position: Some(Position::Relative),
            translate: None,
        },
    )
    .unwrap();
    assert_eq!(doc.computed_offset(el, Edge::Top).unwrap(), "-30px");
    assert_eq!(doc.page_offset(el).unwrap().y, 70.0);
}

#[test]
fn nested_scroller_offsets_accumulate_in_bounding_rect() {
    let mut doc = HeadlessDocument::new(Size::new(1000.0, 800.0), Size::new(1000.0, 4000.0));
    doc.append(
        NodeSpec::new("pane", Rect::new(0.0, 100.0, 400.0, 600.0))
            .scroller(Size::new(400.0, 500.0), Size::new(400.0, 3000.0)),
    )
    .unwrap();
    let item = doc
        .append(
            NodeSpec::new("item", Rect::new(0.0, 400.0, 400.0, 450.0))
                .parent("pane")
                .sticky(Edge::Top, "0"),
        )
        .unwrap();
    let pane = doc.node_id("pane").unwrap();
    doc.scroll_to(pane, Vec2::new(0.0, 350.0)).unwrap();
    doc.scroll_to(doc.root(), Vec2::new(0.0, 40.0)).unwrap();
    let r = doc.bounding_rect(item).unwrap();
    // Stuck at the pane's top edge, which itself moved up by the window scroll.
    assert_eq!(r.y0, 60.0);
}

#[test]
fn scroll_is_clamped_to_the_scrollable_range() {
    let (mut doc, _) = page();
    let root = doc.root();
    doc.scroll_to(root, Vec2::new(50.0, 99_999.0)).unwrap();
    assert_eq!(doc.scroll_offset(root).unwrap(), Vec2::new(0.0, 9200.0));
    doc.scroll_axis_to(root, Axis::Vertical, -5.0).unwrap();
    assert_eq!(doc.scroll_offset(root).unwrap().y, 0.0);
}

#[test]
fn only_layout_queries_are_counted() {
    let (doc, el) = page();
    let before = doc.layout_reads();
    doc.scroll_offset(doc.root()).unwrap();
    doc.inline_style(el).unwrap();
    doc.attribute(el, "x").unwrap();
    assert_eq!(doc.layout_reads(), before);
    doc.page_offset(el).unwrap();
    doc.border_box_size(el).unwrap();
    assert_eq!(doc.layout_reads(), before + 2);
}

#[test]
fn detach_disconnects_subtree_and_unknown_ids_error() {
    let (mut doc, el) = page();
    doc.detach(el).unwrap();
    assert!(!doc.is_connected(el));
    assert!(doc.children(doc.body().unwrap()).unwrap().is_empty());
    assert!(matches!(doc.page_offset(NodeId(999)), Err(RevealError::Host(_))));
}

#[test]
fn document_spec_builds_from_json() {
    let spec: DocumentSpec = serde_json::from_str(
        r#"{
            "viewport": {"width": 800, "height": 600},
            "document": {"width": 800, "height": 5000},
            "nodes": [
                {"name": "wrap", "rect": {"x0": 0, "y0": 0, "x1": 800, "y1": 5000}},
                {"name": "bar", "parent": "wrap", "rect": {"x0": 0, "y0": 10, "x1": 800, "y1": 60},
                 "classes": ["sticky-reveal"], "position": "sticky", "offsets": {"top": "0px"}}
            ]
        }"#,
    )
    .unwrap();
    let doc = HeadlessDocument::from_spec(&spec).unwrap();
    let bar = doc.node_id("bar").unwrap();
    assert_eq!(doc.parent(bar).unwrap(), doc.node_id("wrap"));
    assert_eq!(doc.computed_offset(bar, Edge::Top).unwrap(), "0px");

    let mut bad = spec.clone();
    bad.nodes[1].parent = Some("nope".to_string());
    assert!(matches!(
        HeadlessDocument::from_spec(&bad),
        Err(RevealError::Validation(_))
    ));
}
