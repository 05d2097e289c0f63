//! Mode transitions for one tick.
//!
//! Pure: the functions here see only a [`FrameContext`] and the previous
//! [`ModeState`], and return the next one. Applying the result to the host is
//! the element state's job, so the whole decision runs without a renderer.

use crate::{
    foundation::core::Mode,
    foundation::math::approx_eq,
    frame::context::{FrameContext, ScrollDirection},
};

/// A mode together with the translation it carries.
///
/// `translation` is the signed offset along the active axis written into the
/// inline transform; it is only meaningful (and non-zero) in
/// [`Mode::Transforming`].
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ModeState {
    /// Visual mode.
    pub mode: Mode,
    /// Applied translation along the active axis.
    pub translation: f64,
}

impl Default for ModeState {
    fn default() -> Self {
        Self::STATIC
    }
}

impl ModeState {
    /// Plain flow.
    pub const STATIC: Self = Self {
        mode: Mode::Static,
        translation: 0.0,
    };

    /// Native sticky.
    pub const STICKY: Self = Self {
        mode: Mode::Sticky,
        translation: 0.0,
    };

    /// Mid-slide with `translation` applied.
    pub fn transforming(translation: f64) -> Self {
        Self {
            mode: Mode::Transforming,
            translation,
        }
    }

    fn visual_start(self, ctx: &FrameContext) -> f64 {
        ctx.layout_start + self.translation + ctx.implicit_shift
    }
}

/// Next state for a valid edge config after a scroll tick.
///
/// A tick whose movement stays under `epsilon` changes nothing, so jitter
/// below the tolerance can never flip the mode. Invalid configs never reach
/// this point: callers force [`ModeState::STATIC`].
pub fn next_state(ctx: &FrameContext, current: ModeState, epsilon: f64) -> ModeState {
    let direction = ctx.direction(epsilon);
    if direction == ScrollDirection::Still {
        return current;
    }
    if must_be_static(ctx, epsilon) {
        return ModeState::STATIC;
    }
    match direction {
        ScrollDirection::Away => scroll_away(ctx, current),
        ScrollDirection::Toward => scroll_toward(ctx, current, epsilon),
        ScrollDirection::Still => current,
    }
}

/// Re-check the position-only guards without any scroll movement.
///
/// Used right after a refresh, when cached geometry changed under a still
/// scroll position.
pub fn settle_state(ctx: &FrameContext, current: ModeState, epsilon: f64) -> ModeState {
    if must_be_static(ctx, epsilon) {
        return ModeState::STATIC;
    }
    next_state(ctx, current, epsilon)
}

fn must_be_static(ctx: &FrameContext, epsilon: f64) -> bool {
    is_container_out_of_view(ctx) || is_natural_position_safe(ctx, epsilon)
}

/// Nothing to stick to: the containing box has left the visible range.
pub fn is_container_out_of_view(ctx: &FrameContext) -> bool {
    ctx.constraint_end < ctx.current_scroll || ctx.constraint_start > ctx.viewport_end()
}

/// Plain flow already satisfies the sticky inequality.
pub fn is_natural_position_safe(ctx: &FrameContext, epsilon: f64) -> bool {
    if ctx.is_start_anchor {
        ctx.layout_start >= ctx.current_scroll + ctx.offset - epsilon
    } else {
        ctx.layout_start + ctx.dimension <= ctx.viewport_end() - ctx.offset + epsilon
    }
}

fn scroll_away(ctx: &FrameContext, current: ModeState) -> ModeState {
    let mut next = current;

    if current.mode == Mode::Sticky {
        // Hold the docked coordinate; from here on the element scrolls away with the page.
        let docked = if ctx.is_start_anchor {
            ctx.current_scroll + ctx.offset
        } else {
            ctx.viewport_end() - ctx.offset - ctx.dimension
        };
        let docked = ctx.clamp_to_constraint(docked);
        next = ModeState::transforming(docked - ctx.layout_start - ctx.implicit_shift);
    }

    if next.mode == Mode::Transforming && is_visually_hidden(ctx, next) {
        next = ModeState::STATIC;
    }
    next
}

fn scroll_toward(ctx: &FrameContext, current: ModeState, epsilon: f64) -> ModeState {
    let mut next = current;

    if current.mode == Mode::Static && is_naturally_passed(ctx) {
        // Park the element just outside the edge it re-enters from.
        let target = if ctx.is_start_anchor {
            ctx.current_scroll - ctx.dimension
        } else {
            ctx.viewport_end()
        };
        let target = ctx.clamp_to_constraint(target);
        let translation = target - ctx.layout_start - ctx.implicit_shift;
        next = if approx_eq(translation, -ctx.implicit_shift, epsilon) {
            ModeState::STATIC
        } else {
            ModeState::transforming(translation)
        };
    }

    if next.mode == Mode::Transforming && has_reached_dock(ctx, next, epsilon) {
        next = ModeState::STICKY;
    }
    next
}

/// The untranslated box, relative nudge included, lies entirely beyond the
/// viewport on the anchor side.
fn is_naturally_passed(ctx: &FrameContext) -> bool {
    let visual = ModeState::STATIC.visual_start(ctx);
    if ctx.is_start_anchor {
        visual + ctx.dimension < ctx.current_scroll
    } else {
        visual > ctx.viewport_end()
    }
}

/// Math-only visibility test for a translated element; no layout read.
fn is_visually_hidden(ctx: &FrameContext, state: ModeState) -> bool {
    let visual = state.visual_start(ctx);
    if ctx.is_start_anchor {
        visual + ctx.dimension < ctx.current_scroll
    } else {
        visual > ctx.viewport_end()
    }
}

fn has_reached_dock(ctx: &FrameContext, state: ModeState, epsilon: f64) -> bool {
    let visual = state.visual_start(ctx);
    if ctx.is_start_anchor {
        visual >= ctx.current_scroll + ctx.offset - epsilon
    } else {
        visual + ctx.dimension <= ctx.viewport_end() - ctx.offset + epsilon
    }
}

#[cfg(test)]
#[path = "../../tests/unit/state/machine.rs"]
mod tests;
