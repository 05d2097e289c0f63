use std::collections::BTreeMap;

use crate::foundation::core::NodeId;

/// An event source the embedder wires up on the manager's behalf.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(tag = "kind", content = "node", rename_all = "snake_case")]
pub enum Subscription {
    /// Scroll events of a scroll ancestor (window scroll for the root).
    Scroll(NodeId),
    /// Size changes of a node.
    Resize(NodeId),
    /// Class attribute changes of a managed element.
    ClassList(NodeId),
}

/// Instruction to the embedder: start or stop delivering a [`Subscription`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "op", content = "subscription", rename_all = "snake_case")]
pub enum SubscriptionChange {
    /// First user appeared; start listening.
    Attach(Subscription),
    /// Last user went away; stop listening.
    Detach(Subscription),
}

/// Reference-counted subscription set. Emits `Attach` on the 0 -> 1
/// transition and `Detach` on 1 -> 0; everything in between is silent.
#[derive(Debug, Default)]
pub(crate) struct SubscriptionTable {
    counts: BTreeMap<Subscription, usize>,
    pending: Vec<SubscriptionChange>,
}

impl SubscriptionTable {
    pub(crate) fn acquire(&mut self, sub: Subscription) {
        let count = self.counts.entry(sub).or_insert(0);
        *count += 1;
        if *count == 1 {
            self.pending.push(SubscriptionChange::Attach(sub));
        }
    }

    pub(crate) fn release(&mut self, sub: Subscription) {
        let Some(count) = self.counts.get_mut(&sub) else {
            tracing::warn!(?sub, "release of an unheld subscription");
            return;
        };
        *count -= 1;
        if *count == 0 {
            self.counts.remove(&sub);
            self.pending.push(SubscriptionChange::Detach(sub));
        }
    }

    pub(crate) fn count(&self, sub: Subscription) -> usize {
        self.counts.get(&sub).copied().unwrap_or(0)
    }

    pub(crate) fn active(&self) -> impl Iterator<Item = Subscription> + '_ {
        self.counts.keys().copied()
    }

    pub(crate) fn take_changes(&mut self) -> Vec<SubscriptionChange> {
        std::mem::take(&mut self.pending)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/manager/subscriptions.rs"]
mod tests;
