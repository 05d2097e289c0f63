use crate::{
    foundation::core::{Edge, NodeId, PaddingBox, Rect, Size, Vec2},
    foundation::error::RevealResult,
    host::{InlineStyle, LayoutHost, Position},
};

/// Plain-flow box of `element`, relative to `ancestor`'s content origin
/// (document origin when `ancestor` is the root).
///
/// A managed element (one carrying `attr_name`) is dropped back into plain
/// flow for the duration of the read and restored right after, so the result
/// never includes the crate's own sticky/transform styling.
#[tracing::instrument(level = "trace", skip(host))]
pub fn measure_natural_rect<H: LayoutHost + ?Sized>(
    host: &mut H,
    element: NodeId,
    ancestor: NodeId,
    attr_name: &str,
) -> RevealResult<Rect> {
    let managed = host.attribute(element, attr_name)?.is_some();
    let prev = host.inline_style(element)?;
    if managed {
        host.set_inline_style(
            element,
            InlineStyle {
                position: Some(Position::Static),
                translate: None,
            },
        )?;
    }

    let read = read_box(host, element);

    if managed {
        host.set_inline_style(element, prev)?;
    }
    let (offset, size) = read?;
    relative_to(host, offset, size, ancestor)
}

/// Box that bounds how far `container`'s managed child may travel, in the
/// same space as [`measure_natural_rect`].
///
/// When the container *is* the scroll ancestor this is the full scrollable
/// content, not the visible scrollport.
pub fn measure_constraint_rect<H: LayoutHost + ?Sized>(
    host: &H,
    container: NodeId,
    ancestor: NodeId,
) -> RevealResult<Rect> {
    if container == ancestor {
        return Ok(Rect::from_origin_size(
            (0.0, 0.0),
            host.scroll_extent(ancestor)?,
        ));
    }
    let (offset, size) = read_box(host, container)?;
    relative_to(host, offset, size, ancestor)
}

/// Visible extent of `ancestor` along `edge`'s axis.
///
/// For the root this prefers the visual viewport, which shrinks with
/// on-screen keyboards and dynamic browser chrome.
pub fn measure_viewport_size<H: LayoutHost + ?Sized>(
    host: &H,
    ancestor: NodeId,
    edge: Edge,
) -> RevealResult<f64> {
    Ok(edge.axis().extent(visible_size(host, ancestor)?))
}

/// Scroll offset of `ancestor` along `edge`'s axis.
pub fn scroll_position<H: LayoutHost + ?Sized>(
    host: &H,
    ancestor: NodeId,
    edge: Edge,
) -> RevealResult<f64> {
    Ok(edge.axis().pick(host.scroll_offset(ancestor)?))
}

/// Whether `element`'s rendered box misses `ancestor`'s visible box entirely.
pub fn is_completely_out_of_view<H: LayoutHost + ?Sized>(
    host: &H,
    element: NodeId,
    ancestor: NodeId,
) -> RevealResult<bool> {
    let rect = host.bounding_rect(element)?;
    let view = if ancestor == host.root() {
        Rect::from_origin_size((0.0, 0.0), visible_size(host, ancestor)?)
    } else {
        host.bounding_rect(ancestor)?
    };
    Ok(rect.y1 < view.y0 || rect.y0 > view.y1 || rect.x1 < view.x0 || rect.x0 > view.x1)
}

/// Padding of the scroll ancestor, counted as extra reveal offset. Zero for the root.
pub fn container_padding<H: LayoutHost + ?Sized>(
    host: &H,
    ancestor: NodeId,
) -> RevealResult<PaddingBox> {
    if ancestor == host.root() {
        return Ok(PaddingBox::default());
    }
    host.padding(ancestor)
}

/// Nearest ancestor of `element` that scrolls; the root when none does.
pub fn resolve_scroll_ancestor<H: LayoutHost + ?Sized>(
    host: &H,
    element: NodeId,
) -> RevealResult<NodeId> {
    let root = host.root();
    let body = host.body();
    let mut cur = host.parent(element)?;
    while let Some(node) = cur {
        if node == root || Some(node) == body {
            break;
        }
        let (ox, oy) = host.overflow(node)?;
        if ox.is_scrollable() || oy.is_scrollable() {
            let extent = host.scroll_extent(node)?;
            let client = host.client_size(node)?;
            let scrolls_y = oy.is_scrollable() && extent.height >= client.height;
            let scrolls_x = ox.is_scrollable() && extent.width >= client.width;
            if scrolls_x || scrolls_y {
                return Ok(node);
            }
        }
        cur = host.parent(node)?;
    }
    Ok(root)
}

/// The element's immediate containing box: its parent, else the scroll ancestor.
pub fn resolve_container<H: LayoutHost + ?Sized>(
    host: &H,
    element: NodeId,
    ancestor: NodeId,
) -> RevealResult<NodeId> {
    Ok(host.parent(element)?.unwrap_or(ancestor))
}

fn visible_size<H: LayoutHost + ?Sized>(host: &H, ancestor: NodeId) -> RevealResult<Size> {
    if ancestor == host.root() {
        return Ok(host.visual_viewport().unwrap_or_else(|| host.inner_size()));
    }
    host.client_size(ancestor)
}

fn read_box<H: LayoutHost + ?Sized>(host: &H, node: NodeId) -> RevealResult<(Vec2, Size)> {
    Ok((host.page_offset(node)?, host.border_box_size(node)?))
}

fn relative_to<H: LayoutHost + ?Sized>(
    host: &H,
    offset: Vec2,
    size: Size,
    ancestor: NodeId,
) -> RevealResult<Rect> {
    let origin = if ancestor == host.root() {
        Vec2::ZERO
    } else {
        host.page_offset(ancestor)? + host.client_origin(ancestor)?
    };
    Ok(Rect::from_origin_size((offset - origin).to_point(), size))
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/measure.rs"]
mod tests;
