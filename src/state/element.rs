//! Per-element lifecycle: mount, refresh, update.
//!
//! [`ElementState`] owns everything cached for one managed element and is the
//! only place that writes styles to the host. `refresh` performs every
//! layout-forcing read; `update` reads nothing but the scroll offset, so it is
//! safe to call on every scroll frame.

use crate::{
    edge::resolver::{EdgeOffsetConfig, read_edge_config},
    foundation::config::RevealConfig,
    foundation::core::{Mode, NodeId},
    foundation::error::RevealResult,
    frame::context::{CachedGeometry, FrameContext, ScrollDirection},
    geometry::measure::{
        container_padding, measure_constraint_rect, measure_natural_rect, measure_viewport_size,
        resolve_container, resolve_scroll_ancestor, scroll_position,
    },
    host::{InlineStyle, LayoutHost, Position},
    state::machine::{ModeState, next_state, settle_state},
};

/// A mode transition applied to the host.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ModeChange {
    /// Element that changed.
    pub node: NodeId,
    /// Mode before the change.
    pub from: Mode,
    /// Mode after the change.
    pub to: Mode,
    /// Translation after the change (zero unless `to` is transforming).
    pub translation: f64,
}

/// Cached state of one managed element.
#[derive(Clone, Debug)]
pub struct ElementState {
    node: NodeId,
    scroll_ancestor: NodeId,
    container: NodeId,
    config: EdgeOffsetConfig,
    geometry: CachedGeometry,
    last_scroll_pos: f64,
    state: ModeState,
    settings: RevealConfig,
}

impl ElementState {
    /// Start managing `node`: resolve its scroll ancestor and container, tag
    /// it, and run the first refresh.
    #[tracing::instrument(level = "debug", skip(host, settings))]
    pub fn mount<H: LayoutHost + ?Sized>(
        host: &mut H,
        node: NodeId,
        settings: &RevealConfig,
    ) -> RevealResult<Self> {
        settings.validate()?;
        let scroll_ancestor = resolve_scroll_ancestor(host, node)?;
        let container = resolve_container(host, node, scroll_ancestor)?;
        host.set_attribute(node, &settings.attr_name, Some(Mode::Static.tag()))?;

        let mut out = Self {
            node,
            scroll_ancestor,
            container,
            config: EdgeOffsetConfig::invalid(),
            geometry: CachedGeometry::default(),
            last_scroll_pos: 0.0,
            state: ModeState::STATIC,
            settings: settings.clone(),
        };
        out.remeasure(host)?;
        out.last_scroll_pos = scroll_position(host, scroll_ancestor, out.config.edge)?;
        out.settle(host, ModeState::STATIC)?;
        Ok(out)
    }

    /// Re-read the edge config and every cached measurement, then re-run the
    /// transition guards against the fresh geometry.
    ///
    /// A transforming element falls back to plain flow first; the translation
    /// it carried was computed against geometry that may no longer hold.
    #[tracing::instrument(level = "debug", skip(self, host), fields(node = self.node.0))]
    pub fn refresh<H: LayoutHost + ?Sized>(
        &mut self,
        host: &mut H,
    ) -> RevealResult<Option<ModeChange>> {
        let before = self.state;
        let old_axis = self.config.edge.axis();
        self.remeasure(host)?;
        if self.config.edge.axis() != old_axis {
            self.last_scroll_pos = scroll_position(host, self.scroll_ancestor, self.config.edge)?;
        }

        let baseline = if before.mode == Mode::Sticky {
            ModeState::STICKY
        } else {
            ModeState::STATIC
        };
        self.settle(host, baseline)?;
        Ok(self.change_from(before))
    }

    /// Advance the state machine for the current scroll position.
    ///
    /// Reads only the scroll offset; never touches layout.
    pub fn update<H: LayoutHost + ?Sized>(
        &mut self,
        host: &mut H,
    ) -> RevealResult<Option<ModeChange>> {
        let before = self.state;
        if !self.config.valid {
            if before != ModeState::STATIC {
                self.write(host, ModeState::STATIC)?;
            }
            return Ok(self.change_from(before));
        }

        let ctx = self.context(host)?;
        let eps = self.settings.epsilon;
        if ctx.direction(eps) != ScrollDirection::Still {
            self.last_scroll_pos = ctx.current_scroll;
        }
        let next = next_state(&ctx, before, eps);
        tracing::trace!(
            node = self.node.0,
            scroll = ctx.current_scroll,
            delta = ctx.scroll_delta,
            mode = next.mode.tag(),
            "tick"
        );
        if next != before {
            self.write(host, next)?;
        }
        Ok(self.change_from(before))
    }

    /// Put the element back into plain flow and drop the mode tag.
    pub fn restore_flow<H: LayoutHost + ?Sized>(&mut self, host: &mut H) -> RevealResult<()> {
        host.set_inline_style(self.node, InlineStyle::default())?;
        host.set_attribute(self.node, &self.settings.attr_name, None)?;
        self.state = ModeState::STATIC;
        Ok(())
    }

    /// The managed element.
    pub fn node(&self) -> NodeId {
        self.node
    }

    /// Resolved scroll ancestor.
    pub fn scroll_ancestor(&self) -> NodeId {
        self.scroll_ancestor
    }

    /// Immediate containing box.
    pub fn container(&self) -> NodeId {
        self.container
    }

    /// Edge config from the last refresh.
    pub fn config(&self) -> EdgeOffsetConfig {
        self.config
    }

    /// Geometry from the last refresh.
    pub fn geometry(&self) -> CachedGeometry {
        self.geometry
    }

    /// Current mode.
    pub fn mode(&self) -> Mode {
        self.state.mode
    }

    /// Translation currently applied along the active axis.
    pub fn translation(&self) -> f64 {
        self.state.translation
    }

    /// Scroll position the last directional decision was taken at.
    pub fn last_scroll_pos(&self) -> f64 {
        self.last_scroll_pos
    }

    fn remeasure<H: LayoutHost + ?Sized>(&mut self, host: &mut H) -> RevealResult<()> {
        let attr = self.settings.attr_name.as_str();
        self.config = read_edge_config(host, self.node, attr)?;
        self.geometry = CachedGeometry {
            natural_rect: measure_natural_rect(host, self.node, self.scroll_ancestor, attr)?,
            constraint_rect: measure_constraint_rect(host, self.container, self.scroll_ancestor)?,
            viewport_size: measure_viewport_size(host, self.scroll_ancestor, self.config.edge)?,
            padding: container_padding(host, self.scroll_ancestor)?,
        };
        Ok(())
    }

    fn context<H: LayoutHost + ?Sized>(&self, host: &H) -> RevealResult<FrameContext> {
        let current = scroll_position(host, self.scroll_ancestor, self.config.edge)?;
        Ok(FrameContext::build(
            &self.config,
            &self.geometry,
            self.last_scroll_pos,
            current,
        ))
    }

    fn settle<H: LayoutHost + ?Sized>(
        &mut self,
        host: &mut H,
        from: ModeState,
    ) -> RevealResult<()> {
        let next = if self.config.valid {
            let ctx = self.context(host)?;
            let eps = self.settings.epsilon;
            if ctx.direction(eps) != ScrollDirection::Still {
                self.last_scroll_pos = ctx.current_scroll;
            }
            settle_state(&ctx, from, eps)
        } else {
            ModeState::STATIC
        };
        self.write(host, next)
    }

    /// The single style write for a state: position, transform and tag together.
    fn write<H: LayoutHost + ?Sized>(&mut self, host: &mut H, next: ModeState) -> RevealResult<()> {
        let style = match next.mode {
            Mode::Static => InlineStyle {
                position: Some(Position::Static),
                translate: None,
            },
            Mode::Sticky => InlineStyle {
                position: Some(Position::Sticky),
                translate: None,
            },
            Mode::Transforming => InlineStyle {
                position: Some(Position::Relative),
                translate: Some(self.config.edge.axis().vec(next.translation)),
            },
        };
        host.set_inline_style(self.node, style)?;
        host.set_attribute(self.node, &self.settings.attr_name, Some(next.mode.tag()))?;
        if next.mode != self.state.mode {
            tracing::debug!(
                node = self.node.0,
                from = self.state.mode.tag(),
                to = next.mode.tag(),
                translation = next.translation,
                "mode change"
            );
        }
        self.state = next;
        Ok(())
    }

    fn change_from(&self, before: ModeState) -> Option<ModeChange> {
        (self.state != before).then_some(ModeChange {
            node: self.node,
            from: before.mode,
            to: self.state.mode,
            translation: self.state.translation,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/state/element.rs"]
mod tests;
