use super::*;
use crate::foundation::core::{Edge, Mode, Rect, Size, Vec2};
use crate::foundation::error::RevealError;
use crate::host::InlineStyle;
use crate::host::headless::{HeadlessDocument, NodeSpec};

const CLASS: &str = "sticky-reveal";

struct Page {
    doc: HeadlessDocument,
    hdr: NodeId,
    note: NodeId,
    pane: NodeId,
    item: NodeId,
}

fn page() -> Page {
    let mut doc = HeadlessDocument::new(Size::new(1000.0, 800.0), Size::new(1000.0, 10_000.0));
    let hdr = doc
        .append(
            NodeSpec::new("hdr", Rect::new(0.0, 2000.0, 1000.0, 2500.0))
                .class(CLASS)
                .sticky(Edge::Top, "20px"),
        )
        .unwrap();
    let note = doc
        .append(
            NodeSpec::new("note", Rect::new(0.0, 3000.0, 1000.0, 3100.0))
                .class(CLASS)
                .sticky(Edge::Bottom, "0px"),
        )
        .unwrap();
    let pane = doc
        .append(
            NodeSpec::new("pane", Rect::new(0.0, 4000.0, 400.0, 4500.0))
                .scroller(Size::new(400.0, 500.0), Size::new(400.0, 3000.0)),
        )
        .unwrap();
    let item = doc
        .append(
            NodeSpec::new("item", Rect::new(0.0, 4600.0, 400.0, 4650.0))
                .parent("pane")
                .class(CLASS)
                .sticky(Edge::Top, "0px"),
        )
        .unwrap();
    // Unmarked sticky element: must be left alone.
    doc.append(
        NodeSpec::new("plain", Rect::new(0.0, 5000.0, 1000.0, 5050.0)).sticky(Edge::Top, "0"),
    )
    .unwrap();
    Page {
        doc,
        hdr,
        note,
        pane,
        item,
    }
}

fn manager() -> StickyManager {
    StickyManager::new(RevealConfig::default()).unwrap()
}

fn scroll(doc: &mut HeadlessDocument, y: f64) {
    let root = doc.root();
    doc.scroll_to(root, Vec2::new(0.0, y)).unwrap();
}

#[test]
fn invalid_settings_are_rejected() {
    let err = StickyManager::new(RevealConfig {
        epsilon: 0.0,
        ..RevealConfig::default()
    })
    .unwrap_err();
    assert!(matches!(err, RevealError::Validation(_)));
}

#[test]
fn discover_mounts_marked_elements_once() {
    let mut p = page();
    let mut m = manager();
    let root = p.doc.root();
    let mounted = m.discover(&mut p.doc, root).unwrap();
    assert_eq!(mounted, vec![p.hdr, p.note, p.item]);
    assert_eq!(m.len(), 3);
    assert_eq!(m.get(p.item).unwrap().scroll_ancestor(), p.pane);

    assert!(m.discover(&mut p.doc, root).unwrap().is_empty());
    assert_eq!(m.len(), 3);
}

#[test]
fn shared_subscriptions_are_reference_counted() {
    let mut p = page();
    let mut m = manager();
    let root = p.doc.root();
    let body = p.doc.body().unwrap();
    m.mount(&mut p.doc, p.hdr).unwrap();
    m.mount(&mut p.doc, p.note).unwrap();

    let attached = m.take_subscription_changes();
    let scroll_attaches = attached
        .iter()
        .filter(|c| **c == SubscriptionChange::Attach(Subscription::Scroll(root)))
        .count();
    assert_eq!(scroll_attaches, 1);
    assert!(attached.contains(&SubscriptionChange::Attach(Subscription::Resize(body))));
    assert_eq!(m.subscription_count(Subscription::Scroll(root)), 2);

    m.unmount(&mut p.doc, p.hdr).unwrap();
    let detached = m.take_subscription_changes();
    assert_eq!(
        detached,
        vec![
            SubscriptionChange::Detach(Subscription::ClassList(p.hdr)),
            SubscriptionChange::Detach(Subscription::Resize(p.hdr)),
        ]
    );

    m.unmount(&mut p.doc, p.note).unwrap();
    let detached = m.take_subscription_changes();
    assert!(detached.contains(&SubscriptionChange::Detach(Subscription::Scroll(root))));
    assert!(detached.contains(&SubscriptionChange::Detach(Subscription::Resize(root))));
    assert!(detached.contains(&SubscriptionChange::Detach(Subscription::Resize(body))));
    assert!(m.active_subscriptions().is_empty());
}

#[test]
fn scroll_container_inside_pane_gets_its_own_scroll_subscription() {
    let mut p = page();
    let mut m = manager();
    m.mount(&mut p.doc, p.item).unwrap();
    let active = m.active_subscriptions();
    assert!(active.contains(&Subscription::Scroll(p.pane)));
    assert!(!active.contains(&Subscription::Scroll(p.doc.root())));
}

#[test]
fn frame_runs_each_element_once_and_refresh_wins() {
    let mut p = page();
    let mut m = manager();
    let root = p.doc.root();
    m.discover(&mut p.doc, root).unwrap();

    scroll(&mut p.doc, 3000.0);
    m.on_scroll(root);
    m.on_scroll(root);
    assert!(m.has_pending());
    let before = p.doc.layout_reads();
    m.run_frame(&mut p.doc).unwrap();
    assert_eq!(
        p.doc.layout_reads(),
        before,
        "scroll-only frame must not read layout"
    );
    assert!(!m.has_pending());

    scroll(&mut p.doc, 2900.0);
    m.on_scroll(root);
    m.on_resize(&[p.hdr]);
    let changes = m.run_frame(&mut p.doc).unwrap();
    assert!(p.doc.layout_reads() > before);
    // The refresh also consumed the scroll movement; no second tick ran.
    assert_eq!(changes.len(), 1);
    assert_eq!(changes[0].node, p.hdr);
    assert_eq!(changes[0].to, Mode::Transforming);
    assert_eq!(m.get(p.hdr).unwrap().last_scroll_pos(), 2900.0);

    assert!(m.run_frame(&mut p.doc).unwrap().is_empty());
}

#[test]
fn scroll_events_drive_the_reveal() {
    let mut p = page();
    let mut m = manager();
    let root = p.doc.root();
    m.mount(&mut p.doc, p.hdr).unwrap();

    for y in [3000.0, 2900.0] {
        scroll(&mut p.doc, y);
        m.on_scroll(root);
        m.run_frame(&mut p.doc).unwrap();
    }
    let st = m.get(p.hdr).unwrap();
    assert_eq!(st.mode(), Mode::Transforming);
    assert_eq!(st.translation(), 380.0);
}

#[test]
fn scroll_of_other_container_is_ignored() {
    let mut p = page();
    let mut m = manager();
    m.mount(&mut p.doc, p.hdr).unwrap();
    m.on_scroll(p.pane);
    assert!(!m.has_pending());
}

#[test]
fn viewport_resize_only_touches_document_scrollers() {
    let mut p = page();
    let mut m = manager();
    m.mount(&mut p.doc, p.item).unwrap();
    m.on_viewport_resize(&p.doc);
    assert!(!m.has_pending());

    m.mount(&mut p.doc, p.hdr).unwrap();
    m.on_viewport_resize(&p.doc);
    assert!(m.has_pending());
}

#[test]
fn offsets_change_queues_refresh_for_tracked_only() {
    let mut p = page();
    let mut m = manager();
    m.on_offsets_changed(p.hdr);
    assert!(!m.has_pending());
    m.mount(&mut p.doc, p.hdr).unwrap();
    m.on_offsets_changed(p.hdr);
    assert!(m.has_pending());

    p.doc.set_offset(p.hdr, Edge::Top, None).unwrap();
    p.doc.set_offset(p.hdr, Edge::Bottom, Some("5px")).unwrap();
    m.run_frame(&mut p.doc).unwrap();
    assert_eq!(m.get(p.hdr).unwrap().config().edge, Edge::Bottom);
}

#[test]
fn removed_elements_are_swept() {
    let mut p = page();
    let mut m = manager();
    let root = p.doc.root();
    m.discover(&mut p.doc, root).unwrap();
    m.take_subscription_changes();

    p.doc.detach(p.pane).unwrap();
    m.on_tree_mutation(&mut p.doc, &[], true).unwrap();
    assert!(m.get(p.item).is_none());
    assert_eq!(m.len(), 2);
    assert!(
        m.take_subscription_changes()
            .contains(&SubscriptionChange::Detach(Subscription::Scroll(p.pane)))
    );
}

#[test]
fn detached_elements_are_skipped_until_swept() {
    let mut p = page();
    let mut m = manager();
    let root = p.doc.root();
    m.mount(&mut p.doc, p.hdr).unwrap();
    p.doc.detach(p.hdr).unwrap();
    m.on_scroll(root);
    assert!(m.run_frame(&mut p.doc).unwrap().is_empty());
    assert_eq!(m.len(), 1);
    assert_eq!(m.sweep(&mut p.doc).unwrap(), vec![p.hdr]);
    assert!(m.is_empty());
}

#[test]
fn inserted_subtrees_are_discovered() {
    let mut p = page();
    let mut m = manager();
    let wrap = p
        .doc
        .append(NodeSpec::new("wrap", Rect::new(0.0, 6000.0, 1000.0, 7000.0)))
        .unwrap();
    let late = p
        .doc
        .append(
            NodeSpec::new("late", Rect::new(0.0, 6100.0, 1000.0, 6200.0))
                .parent("wrap")
                .class(CLASS)
                .sticky(Edge::Top, "0px"),
        )
        .unwrap();
    m.on_tree_mutation(&mut p.doc, &[wrap], false).unwrap();
    assert!(m.get(late).is_some());
    assert_eq!(m.get(late).unwrap().container(), wrap);
}

#[test]
fn class_changes_mount_and_unmount() {
    let mut p = page();
    let mut m = StickyManager::new(RevealConfig {
        restore_flow_on_unmount: true,
        ..RevealConfig::default()
    })
    .unwrap();
    m.mount(&mut p.doc, p.hdr).unwrap();

    p.doc.set_class(p.hdr, CLASS, false).unwrap();
    m.on_class_changed(&mut p.doc, p.hdr).unwrap();
    assert!(m.get(p.hdr).is_none());
    assert_eq!(p.doc.inline_style(p.hdr).unwrap(), InlineStyle::default());
    assert_eq!(p.doc.attribute(p.hdr, "data-sticky-reveal").unwrap(), None);

    p.doc.set_class(p.hdr, CLASS, true).unwrap();
    m.on_class_changed(&mut p.doc, p.hdr).unwrap();
    assert!(m.get(p.hdr).is_some());
}

#[test]
fn unmount_without_restore_leaves_styles() {
    let mut p = page();
    let mut m = manager();
    m.mount(&mut p.doc, p.hdr).unwrap();
    assert!(m.unmount(&mut p.doc, p.hdr).unwrap());
    assert!(!m.unmount(&mut p.doc, p.hdr).unwrap());
    assert_eq!(
        p.doc.attribute(p.hdr, "data-sticky-reveal").unwrap().as_deref(),
        Some("static")
    );
}
