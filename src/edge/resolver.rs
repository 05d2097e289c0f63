use crate::{
    foundation::core::{Edge, NodeId},
    foundation::error::RevealResult,
    foundation::math::parse_css_length,
    host::{InlineStyle, LayoutHost},
};

/// Which edge an element is anchored on, and by how much.
///
/// `valid == false` means zero or several edges were authored; the element
/// must then behave as plain flow content. Invalid configs carry
/// `edge = top, offset = 0`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct EdgeOffsetConfig {
    /// Exactly one edge was authored.
    pub valid: bool,
    /// The anchored edge.
    pub edge: Edge,
    /// Authored offset in pixels.
    pub offset: f64,
}

impl Default for EdgeOffsetConfig {
    fn default() -> Self {
        Self::invalid()
    }
}

impl EdgeOffsetConfig {
    /// The "no usable edge" config.
    pub fn invalid() -> Self {
        Self {
            valid: false,
            edge: Edge::Top,
            offset: 0.0,
        }
    }

    /// A single anchored edge.
    pub fn anchored(edge: Edge, offset: f64) -> Self {
        Self {
            valid: true,
            edge,
            offset,
        }
    }

    /// Decide from the computed text of the four edges, in [`Edge::ALL`] order.
    pub fn from_computed<S: AsRef<str>>(values: &[S; 4]) -> Self {
        let mut found: Option<(Edge, f64)> = None;
        for (edge, value) in Edge::ALL.into_iter().zip(values) {
            let Some(offset) = authored_offset(value.as_ref()) else {
                continue;
            };
            if found.is_some() {
                return Self::invalid();
            }
            found = Some((edge, offset));
        }
        match found {
            Some((edge, offset)) => Self::anchored(edge, offset),
            None => Self::invalid(),
        }
    }
}

/// `None` for `auto`/empty; otherwise the leading number, `0` when unparsable.
pub fn authored_offset(value: &str) -> Option<f64> {
    let value = value.trim();
    if value.is_empty() || value.eq_ignore_ascii_case("auto") {
        return None;
    }
    Some(parse_css_length(value).unwrap_or(0.0))
}

/// Read the authored edge config of `node`.
///
/// When the element is already managed (it carries `attr_name`), the crate's
/// own inline `position` is lifted for the duration of the read so computed
/// offsets reflect the stylesheet rather than relative-position artifacts.
/// The inline style is put back exactly as found, whatever the outcome.
pub fn read_edge_config<H: LayoutHost + ?Sized>(
    host: &mut H,
    node: NodeId,
    attr_name: &str,
) -> RevealResult<EdgeOffsetConfig> {
    let managed = host.attribute(node, attr_name)?.is_some();
    let prev = host.inline_style(node)?;
    if managed {
        host.set_inline_style(
            node,
            InlineStyle {
                position: None,
                ..prev
            },
        )?;
    }

    let read = read_computed_offsets(host, node);

    if managed {
        host.set_inline_style(node, prev)?;
    }
    Ok(EdgeOffsetConfig::from_computed(&read?))
}

fn read_computed_offsets<H: LayoutHost + ?Sized>(
    host: &H,
    node: NodeId,
) -> RevealResult<[String; 4]> {
    Ok([
        host.computed_offset(node, Edge::Top)?,
        host.computed_offset(node, Edge::Bottom)?,
        host.computed_offset(node, Edge::Left)?,
        host.computed_offset(node, Edge::Right)?,
    ])
}

#[cfg(test)]
#[path = "../../tests/unit/edge/resolver.rs"]
mod tests;
