//! Tracked-element registry and per-frame work coalescing.
//!
//! The manager never listens to anything itself. The embedder forwards host
//! events (`on_scroll`, `on_resize`, tree and class mutations) and calls
//! [`StickyManager::run_frame`] once per animation frame; the manager tells
//! the embedder which event sources it needs through
//! [`StickyManager::take_subscription_changes`].

use std::collections::{BTreeMap, BTreeSet};

use crate::{
    foundation::config::RevealConfig,
    foundation::core::NodeId,
    foundation::error::RevealResult,
    host::LayoutHost,
    manager::subscriptions::{Subscription, SubscriptionChange, SubscriptionTable},
    state::element::{ElementState, ModeChange},
};

/// Owns every [`ElementState`] and the subscriptions backing them.
#[derive(Debug)]
pub struct StickyManager {
    settings: RevealConfig,
    elements: BTreeMap<NodeId, ElementState>,
    subscriptions: SubscriptionTable,
    pending_refresh: BTreeSet<NodeId>,
    pending_update: BTreeSet<NodeId>,
}

impl StickyManager {
    /// Empty manager; `settings` are validated up front.
    pub fn new(settings: RevealConfig) -> RevealResult<Self> {
        settings.validate()?;
        Ok(Self {
            settings,
            elements: BTreeMap::new(),
            subscriptions: SubscriptionTable::default(),
            pending_refresh: BTreeSet::new(),
            pending_update: BTreeSet::new(),
        })
    }

    /// Shared settings.
    pub fn settings(&self) -> &RevealConfig {
        &self.settings
    }

    /// Mount every element under `from` (inclusive) that carries the marker
    /// class. Returns the newly mounted nodes in tree order.
    pub fn discover<H: LayoutHost + ?Sized>(
        &mut self,
        host: &mut H,
        from: NodeId,
    ) -> RevealResult<Vec<NodeId>> {
        let mut mounted = Vec::new();
        let mut stack = vec![from];
        while let Some(node) = stack.pop() {
            if host.has_class(node, &self.settings.class_name)? && self.mount(host, node)? {
                mounted.push(node);
            }
            let children = host.children(node)?;
            stack.extend(children.into_iter().rev());
        }
        Ok(mounted)
    }

    /// Start managing `node`. Returns `false` when it is already tracked or
    /// not attached to the document.
    pub fn mount<H: LayoutHost + ?Sized>(
        &mut self,
        host: &mut H,
        node: NodeId,
    ) -> RevealResult<bool> {
        if self.elements.contains_key(&node) || !host.is_connected(node) {
            return Ok(false);
        }
        let state = ElementState::mount(host, node, &self.settings)?;
        for sub in subscriptions_of(&state) {
            self.subscriptions.acquire(sub);
        }
        tracing::debug!(
            node = node.0,
            ancestor = state.scroll_ancestor().0,
            valid = state.config().valid,
            "mounted"
        );
        self.elements.insert(node, state);
        Ok(true)
    }

    /// Stop managing `node` and release its subscriptions. With
    /// `restore_flow_on_unmount`, a still-attached element is put back into
    /// plain flow.
    pub fn unmount<H: LayoutHost + ?Sized>(
        &mut self,
        host: &mut H,
        node: NodeId,
    ) -> RevealResult<bool> {
        let Some(mut state) = self.elements.remove(&node) else {
            return Ok(false);
        };
        for sub in subscriptions_of(&state) {
            self.subscriptions.release(sub);
        }
        self.pending_refresh.remove(&node);
        self.pending_update.remove(&node);
        if self.settings.restore_flow_on_unmount && host.is_connected(node) {
            state.restore_flow(host)?;
        }
        tracing::debug!(node = node.0, "unmounted");
        Ok(true)
    }

    /// A scroll container (or the window, for the root) scrolled.
    pub fn on_scroll(&mut self, ancestor: NodeId) {
        let hits = self
            .elements
            .values()
            .filter(|s| s.scroll_ancestor() == ancestor)
            .map(ElementState::node);
        self.pending_update.extend(hits);
    }

    /// Observed nodes changed size.
    pub fn on_resize(&mut self, changed: &[NodeId]) {
        let changed: BTreeSet<NodeId> = changed.iter().copied().collect();
        let hits = self
            .elements
            .values()
            .filter(|s| {
                changed.contains(&s.node())
                    || changed.contains(&s.scroll_ancestor())
                    || changed.contains(&s.container())
            })
            .map(ElementState::node);
        self.pending_refresh.extend(hits);
    }

    /// The window or visual viewport resized; elements scrolling with the
    /// document need new measurements.
    pub fn on_viewport_resize<H: LayoutHost + ?Sized>(&mut self, host: &H) {
        let root = host.root();
        let body = host.body();
        let hits = self
            .elements
            .values()
            .filter(|s| s.scroll_ancestor() == root || Some(s.scroll_ancestor()) == body)
            .map(ElementState::node);
        self.pending_refresh.extend(hits);
    }

    /// Authored edge offsets of `node` changed.
    pub fn on_offsets_changed(&mut self, node: NodeId) {
        if self.elements.contains_key(&node) {
            self.pending_refresh.insert(node);
        }
    }

    /// The class list of `node` changed: losing the marker unmounts, gaining
    /// it mounts.
    pub fn on_class_changed<H: LayoutHost + ?Sized>(
        &mut self,
        host: &mut H,
        node: NodeId,
    ) -> RevealResult<()> {
        let marked = host.has_class(node, &self.settings.class_name)?;
        match (self.elements.contains_key(&node), marked) {
            (true, false) => {
                self.unmount(host, node)?;
            }
            (false, true) => {
                self.mount(host, node)?;
            }
            _ => {}
        }
        Ok(())
    }

    /// Nodes were inserted and/or removed. Marked elements inside inserted
    /// subtrees are mounted; with `removed`, tracked elements no longer in the
    /// document are unmounted.
    pub fn on_tree_mutation<H: LayoutHost + ?Sized>(
        &mut self,
        host: &mut H,
        added: &[NodeId],
        removed: bool,
    ) -> RevealResult<()> {
        for &node in added {
            if host.is_connected(node) {
                self.discover(host, node)?;
            }
        }
        if removed {
            self.sweep(host)?;
        }
        Ok(())
    }

    /// Unmount tracked elements that are no longer attached. Returns them.
    pub fn sweep<H: LayoutHost + ?Sized>(&mut self, host: &mut H) -> RevealResult<Vec<NodeId>> {
        let gone: Vec<NodeId> = self
            .elements
            .keys()
            .copied()
            .filter(|&n| !host.is_connected(n))
            .collect();
        for &node in &gone {
            self.unmount(host, node)?;
        }
        Ok(gone)
    }

    /// Flush pending work: each element runs at most once, a pending refresh
    /// subsuming a pending update.
    #[tracing::instrument(level = "trace", skip_all)]
    pub fn run_frame<H: LayoutHost + ?Sized>(
        &mut self,
        host: &mut H,
    ) -> RevealResult<Vec<ModeChange>> {
        let refresh = std::mem::take(&mut self.pending_refresh);
        let update = std::mem::take(&mut self.pending_update);

        let mut changes = Vec::new();
        for node in refresh.union(&update).copied() {
            let Some(state) = self.elements.get_mut(&node) else {
                continue;
            };
            if !host.is_connected(node) {
                tracing::warn!(node = node.0, "skipping detached element");
                continue;
            }
            let change = if refresh.contains(&node) {
                state.refresh(host)?
            } else {
                state.update(host)?
            };
            changes.extend(change);
        }
        Ok(changes)
    }

    /// Subscription edges accumulated since the last call.
    pub fn take_subscription_changes(&mut self) -> Vec<SubscriptionChange> {
        self.subscriptions.take_changes()
    }

    /// Subscriptions currently held.
    pub fn active_subscriptions(&self) -> Vec<Subscription> {
        self.subscriptions.active().collect()
    }

    /// How many tracked elements hold `sub`.
    pub fn subscription_count(&self, sub: Subscription) -> usize {
        self.subscriptions.count(sub)
    }

    /// State of a tracked element.
    pub fn get(&self, node: NodeId) -> Option<&ElementState> {
        self.elements.get(&node)
    }

    /// Tracked elements in id order.
    pub fn iter(&self) -> impl Iterator<Item = &ElementState> {
        self.elements.values()
    }

    /// Number of tracked elements.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Whether nothing is tracked.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Whether any refresh or update is queued.
    pub fn has_pending(&self) -> bool {
        !self.pending_refresh.is_empty() || !self.pending_update.is_empty()
    }
}

fn subscriptions_of(state: &ElementState) -> Vec<Subscription> {
    let mut subs = vec![
        Subscription::Scroll(state.scroll_ancestor()),
        Subscription::ClassList(state.node()),
        Subscription::Resize(state.node()),
        Subscription::Resize(state.scroll_ancestor()),
    ];
    if state.container() != state.scroll_ancestor() {
        subs.push(Subscription::Resize(state.container()));
    }
    subs
}

#[cfg(test)]
#[path = "../../tests/unit/manager/registry.rs"]
mod tests;
