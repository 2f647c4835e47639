//! Defines the interface of the rendering backends.

use super::{geometry::Point, style::StyleAttr};

/// This is the trait that all rendering backends need to implement.
pub trait RenderBackend {
    /// Draw a rectangle. The top-left point of the rectangle is \p xy. The
    /// shape style (color, edge-width) are passed in \p look.
    fn draw_rect(&mut self, xy: Point, size: Point, look: &StyleAttr);

    /// Draw a line between \p start and \p stop.
    fn draw_line(&mut self, start: Point, stop: Point, look: &StyleAttr);

    /// Draw an ellipse with the center \p xy, and size \p size.
    fn draw_circle(&mut self, xy: Point, size: Point, look: &StyleAttr);

    /// Draw a label centered at \p xy.
    fn draw_text(&mut self, xy: Point, text: &str, look: &StyleAttr);
}
