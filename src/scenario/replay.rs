use crate::{
    edge::resolver::EdgeOffsetConfig,
    foundation::core::{Mode, NodeId, Rect, Vec2},
    foundation::error::{RevealError, RevealResult},
    frame::context::CachedGeometry,
    geometry::measure::is_completely_out_of_view,
    host::LayoutHost,
    host::headless::HeadlessDocument,
    manager::registry::StickyManager,
    scenario::model::{Scenario, Step},
};

/// Observed state of one managed element after a step.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TraceFrame {
    /// Step index; `0` is the initial mount.
    pub step: usize,
    /// Element name.
    pub node: String,
    /// Mode after the step.
    pub mode: Mode,
    /// Applied translation along the active axis.
    pub translation: f64,
    /// Rendered box relative to the window.
    pub rect: Rect,
    /// Rendered box misses the scroll ancestor's visible box.
    pub out_of_view: bool,
}

/// Resolved setup of one managed element, as reported by `inspect`.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ElementReport {
    /// Element name.
    pub node: String,
    /// Scroll ancestor name.
    pub scroll_ancestor: String,
    /// Containing box name.
    pub container: String,
    /// Edge config.
    pub config: EdgeOffsetConfig,
    /// Cached geometry.
    pub geometry: CachedGeometry,
    /// Mode right after mount.
    pub mode: Mode,
}

/// Play `scenario` against a headless document, one manager frame per step.
#[tracing::instrument(level = "debug", skip_all, fields(steps = scenario.steps.len()))]
pub fn replay(scenario: &Scenario) -> RevealResult<Vec<TraceFrame>> {
    let (mut doc, mut manager) = setup(scenario)?;
    let mut frames = Vec::new();
    record(&doc, &manager, 0, &mut frames)?;

    for (i, step) in scenario.steps.iter().enumerate() {
        apply_step(&mut doc, &mut manager, step)?;
        let changes = manager.run_frame(&mut doc)?;
        tracing::debug!(step = i + 1, changes = changes.len(), "step applied");
        record(&doc, &manager, i + 1, &mut frames)?;
    }
    Ok(frames)
}

/// Mount the scenario's document and describe every managed element.
pub fn inspect(scenario: &Scenario) -> RevealResult<Vec<ElementReport>> {
    let (doc, manager) = setup(scenario)?;
    manager
        .iter()
        .map(|st| -> RevealResult<ElementReport> {
            Ok(ElementReport {
                node: doc.name(st.node())?.to_string(),
                scroll_ancestor: doc.name(st.scroll_ancestor())?.to_string(),
                container: doc.name(st.container())?.to_string(),
                config: st.config(),
                geometry: st.geometry(),
                mode: st.mode(),
            })
        })
        .collect()
}

fn setup(scenario: &Scenario) -> RevealResult<(HeadlessDocument, StickyManager)> {
    scenario.validate()?;
    let mut doc = HeadlessDocument::from_spec(&scenario.document)?;
    let mut manager = StickyManager::new(scenario.config.clone())?;
    let root = doc.root();
    manager.discover(&mut doc, root)?;
    Ok((doc, manager))
}

fn apply_step(
    doc: &mut HeadlessDocument,
    manager: &mut StickyManager,
    step: &Step,
) -> RevealResult<()> {
    match step {
        Step::Scroll { target, x, y } => {
            let node = match target {
                Some(name) => lookup(doc, name)?,
                None => doc.root(),
            };
            let current = doc.scroll_offset(node)?;
            let next = Vec2::new(x.unwrap_or(current.x), y.unwrap_or(current.y));
            doc.scroll_to(node, next)?;
            manager.on_scroll(node);
        }
        Step::ResizeViewport { size, visual } => {
            doc.set_viewport(*size, *visual);
            manager.on_viewport_resize(&*doc);
        }
        Step::SetOffset { node, edge, value } => {
            let id = lookup(doc, node)?;
            doc.set_offset(id, *edge, value.as_deref())?;
            manager.on_offsets_changed(id);
        }
        Step::SetRect { node, rect } => {
            let id = lookup(doc, node)?;
            doc.set_rect(id, *rect)?;
            manager.on_resize(&[id]);
        }
        Step::SetClass {
            node,
            class,
            present,
        } => {
            let id = lookup(doc, node)?;
            doc.set_class(id, class, *present)?;
            manager.on_class_changed(doc, id)?;
        }
        Step::Append { node } => {
            let id = doc.append(node.clone())?;
            manager.on_tree_mutation(doc, &[id], false)?;
        }
        Step::Detach { node } => {
            let id = lookup(doc, node)?;
            doc.detach(id)?;
            manager.on_tree_mutation(doc, &[], true)?;
        }
    }
    Ok(())
}

fn lookup(doc: &HeadlessDocument, name: &str) -> RevealResult<NodeId> {
    doc.node_id(name)
        .ok_or_else(|| RevealError::validation(format!("step references unknown node '{name}'")))
}

fn record(
    doc: &HeadlessDocument,
    manager: &StickyManager,
    step: usize,
    out: &mut Vec<TraceFrame>,
) -> RevealResult<()> {
    for st in manager.iter() {
        out.push(TraceFrame {
            step,
            node: doc.name(st.node())?.to_string(),
            mode: st.mode(),
            translation: st.translation(),
            rect: doc.bounding_rect(st.node())?,
            out_of_view: is_completely_out_of_view(doc, st.node(), st.scroll_ancestor())?,
        });
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/scenario/replay.rs"]
mod tests;
