//! Software rasterizer for one frame: image layers first, then the weather
//! draw list. Every terminal cell holds two vertically stacked pixels and
//! each pixel spans `PIXEL_SCALE` logical units on both axes.

use std::ops::Range;

use crate::{
    data::images::Bitmap,
    sim::{
        draw::{DrawList, Point, Rgba, Shape},
        fit::{FitMode, Placement},
        math::Viewport,
        transition::{Layer, LayerTransform, Source},
    },
};

pub const PIXEL_SCALE: f32 = 8.0;
const BACKDROP_SCALE: f32 = 1.2;
const BACKDROP_BRIGHTNESS: f32 = 0.45;
const HALF_PIXEL: f32 = PIXEL_SCALE * 0.5;

pub type Pixel = [u8; 3];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Framebuffer {
    width: u16,
    height: u16,
    pixels: Vec<Pixel>,
}

impl Framebuffer {
    /// Buffer for a `cols` x `rows` cell area, so `rows * 2` pixel rows.
    #[must_use]
    pub fn for_cells(cols: u16, rows: u16) -> Self {
        let height = rows.saturating_mul(2);
        Self {
            width: cols,
            height,
            pixels: vec![[0, 0, 0]; usize::from(cols) * usize::from(height)],
        }
    }

    #[must_use]
    pub fn width(&self) -> u16 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> u16 {
        self.height
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        Viewport::new(
            f32::from(self.width) * PIXEL_SCALE,
            f32::from(self.height) * PIXEL_SCALE,
        )
    }

    pub fn clear(&mut self, color: Pixel) {
        self.pixels.fill(color);
    }

    #[must_use]
    pub fn get(&self, x: u16, y: u16) -> Pixel {
        self.index(x, y).map_or([0, 0, 0], |idx| self.pixels[idx])
    }

    /// Source-over blend of `color` at `alpha` onto one pixel.
    pub fn blend(&mut self, x: u16, y: u16, color: Pixel, alpha: f32) {
        let Some(idx) = self.index(x, y) else {
            return;
        };
        let alpha = alpha.clamp(0.0, 1.0);
        if alpha <= 0.0 {
            return;
        }
        let dst = &mut self.pixels[idx];
        for (d, s) in dst.iter_mut().zip(color) {
            *d = mix(*d, s, alpha);
        }
    }

    fn index(&self, x: u16, y: u16) -> Option<usize> {
        (x < self.width && y < self.height)
            .then(|| usize::from(y) * usize::from(self.width) + usize::from(x))
    }

    /// Logical coordinates of a pixel's centre.
    fn centre(x: u16, y: u16) -> Point {
        Point::new(
            (f32::from(x) + 0.5) * PIXEL_SCALE,
            (f32::from(y) + 0.5) * PIXEL_SCALE,
        )
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn mix(dst: u8, src: u8, alpha: f32) -> u8 {
    let value = f32::from(dst) + (f32::from(src) - f32::from(dst)) * alpha;
    value.round().clamp(0.0, 255.0) as u8
}

fn rgb(color: Rgba) -> Pixel {
    [color.r, color.g, color.b]
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn dim(pixel: Pixel, factor: f32) -> Pixel {
    pixel.map(|c| (f32::from(c) * factor).round() as u8)
}

/// Paints the transition layer stack. `from` and `to` are the bitmaps the
/// layers' sources refer to; a missing bitmap leaves its layers unpainted.
pub fn paint_layers(
    fb: &mut Framebuffer,
    layers: &[Layer],
    from: Option<&Bitmap>,
    to: Option<&Bitmap>,
    backdrop: bool,
) {
    let viewport = fb.viewport();
    for layer in layers {
        match *layer {
            Layer::Fill { color } => {
                if !color.is_visible() {
                    continue;
                }
                for y in 0..fb.height {
                    for x in 0..fb.width {
                        fb.blend(x, y, rgb(color), color.a);
                    }
                }
            }
            Layer::Image {
                source,
                fit,
                transform,
            } => {
                let bitmap = match source {
                    Source::From => from,
                    Source::To => to,
                };
                let Some(bitmap) = bitmap else {
                    continue;
                };
                if transform.is_invisible(viewport) {
                    continue;
                }
                paint_image(fb, bitmap, fit, transform, backdrop);
            }
        }
    }
}

#[allow(clippy::cast_precision_loss)]
fn paint_image(
    fb: &mut Framebuffer,
    bitmap: &Bitmap,
    fit: FitMode,
    transform: LayerTransform,
    backdrop: bool,
) {
    let viewport = fb.viewport();
    let (src_w, src_h) = (bitmap.source_width as f32, bitmap.source_height as f32);
    let placement = fit.place(src_w, src_h, viewport);
    let behind = backdrop.then(|| scaled(FitMode::Crop.place(src_w, src_h, viewport), viewport));
    let (cx, cy) = viewport.center();
    let (sin, cos) = (-transform.rotation_deg).to_radians().sin_cos();

    for y in 0..fb.height {
        for x in 0..fb.width {
            let p = Framebuffer::centre(x, y);
            if let Some(clip) = transform.clip
                && (p.x >= clip.width || p.y >= clip.height)
            {
                continue;
            }
            // Undo translate, then rotation and scale about the centre.
            let dx = p.x - transform.translate_x - cx;
            let dy = p.y - transform.translate_y - cy;
            let q = Point::new(
                cx + (dx * cos - dy * sin) / transform.scale,
                cy + (dx * sin + dy * cos) / transform.scale,
            );

            let mut color = behind
                .and_then(|b| b.to_image(q.x, q.y))
                .map(|(u, v)| dim(bitmap.sample(u, v), BACKDROP_BRIGHTNESS));
            if let Some((u, v)) = placement.to_image(q.x, q.y) {
                color = Some(bitmap.sample(u, v));
            }
            if let Some(color) = color {
                fb.blend(x, y, color, transform.alpha);
            }
        }
    }
}

fn scaled(placement: Placement, viewport: Viewport) -> Placement {
    let (cx, cy) = viewport.center();
    Placement {
        x: cx + (placement.x - cx) * BACKDROP_SCALE,
        y: cy + (placement.y - cy) * BACKDROP_SCALE,
        width: placement.width * BACKDROP_SCALE,
        height: placement.height * BACKDROP_SCALE,
    }
}

/// Rasterizes the particle overlay in push order.
pub fn paint_shapes(fb: &mut Framebuffer, list: &DrawList) {
    for shape in list.shapes() {
        paint_shape(fb, shape);
    }
}

fn paint_shape(fb: &mut Framebuffer, shape: &Shape) {
    match shape {
        Shape::Line {
            from,
            to,
            width,
            color,
        } => {
            let half = (width * 0.5).max(HALF_PIXEL);
            let bounds = Bounds::around(&[*from, *to], half);
            fill(fb, bounds, *color, |p| {
                covered(segment_distance(p, *from, *to) <= half)
            });
        }
        Shape::Polyline {
            points,
            width,
            color,
        } => {
            if points.is_empty() {
                return;
            }
            let half = (width * 0.5).max(HALF_PIXEL);
            let bounds = Bounds::around(points, half);
            fill(fb, bounds, *color, |p| {
                let hit = if points.len() == 1 {
                    distance(p, points[0]) <= half
                } else {
                    points
                        .windows(2)
                        .any(|pair| segment_distance(p, pair[0], pair[1]) <= half)
                };
                covered(hit)
            });
        }
        Shape::Ring {
            center,
            radius,
            width,
            color,
        } => {
            let half = (width * 0.5).max(HALF_PIXEL);
            let bounds = Bounds::around(&[*center], radius + half);
            fill(fb, bounds, *color, |p| {
                covered((distance(p, *center) - radius).abs() <= half)
            });
        }
        Shape::Disc {
            center,
            radius,
            color,
        } => {
            let radius = radius.max(HALF_PIXEL);
            let bounds = Bounds::around(&[*center], radius);
            fill(fb, bounds, *color, |p| covered(distance(p, *center) <= radius));
        }
        Shape::Rect {
            origin,
            width,
            height,
            color,
        } => {
            let bounds = Bounds::rect(*origin, *width, *height);
            fill(fb, bounds, *color, |p| covered(bounds.contains(p)));
        }
        Shape::RoundedRect {
            origin,
            width,
            height,
            corner,
            color,
        } => {
            let bounds = Bounds::rect(*origin, *width, *height);
            let (hw, hh) = (width * 0.5, height * 0.5);
            let centre = Point::new(origin.x + hw, origin.y + hh);
            let corner = corner.clamp(0.0, hw.min(hh));
            fill(fb, bounds, *color, |p| {
                let qx = (p.x - centre.x).abs() - (hw - corner);
                let qy = (p.y - centre.y).abs() - (hh - corner);
                let outside = qx.max(0.0).hypot(qy.max(0.0));
                covered(outside + qx.max(qy).min(0.0) <= corner)
            });
        }
        Shape::Ellipse {
            center,
            radius_x,
            radius_y,
            rotation_deg,
            color,
        } => {
            let rx = radius_x.max(HALF_PIXEL);
            let ry = radius_y.max(HALF_PIXEL);
            let (sin, cos) = (-rotation_deg).to_radians().sin_cos();
            let bounds = Bounds::around(&[*center], rx.max(ry));
            fill(fb, bounds, *color, |p| {
                let dx = p.x - center.x;
                let dy = p.y - center.y;
                let ex = (dx * cos - dy * sin) / rx;
                let ey = (dx * sin + dy * cos) / ry;
                covered(ex * ex + ey * ey <= 1.0)
            });
        }
        Shape::Glow {
            center,
            radius,
            color,
        } => {
            if *radius <= 0.0 {
                return;
            }
            let bounds = Bounds::around(&[*center], *radius);
            fill(fb, bounds, *color, |p| {
                (1.0 - distance(p, *center) / radius).max(0.0)
            });
        }
    }
}

fn covered(hit: bool) -> f32 {
    if hit { 1.0 } else { 0.0 }
}

/// Blends `color` into every pixel of `bounds` whose centre has coverage.
fn fill(fb: &mut Framebuffer, bounds: Bounds, color: Rgba, coverage: impl Fn(Point) -> f32) {
    for y in pixel_span(bounds.min.y, bounds.max.y, fb.height) {
        for x in pixel_span(bounds.min.x, bounds.max.x, fb.width) {
            let weight = coverage(Framebuffer::centre(x, y));
            if weight > 0.0 {
                fb.blend(x, y, rgb(color), color.a * weight);
            }
        }
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn pixel_span(min: f32, max: f32, limit: u16) -> Range<u16> {
    if !(min.is_finite() && max.is_finite()) || max < 0.0 {
        return 0..0;
    }
    let start = (min / PIXEL_SCALE).floor().max(0.0);
    let end = (max / PIXEL_SCALE).ceil().min(f32::from(limit));
    if start >= end {
        return 0..0;
    }
    start as u16..end as u16
}

#[derive(Debug, Clone, Copy)]
struct Bounds {
    min: Point,
    max: Point,
}

impl Bounds {
    fn around(points: &[Point], pad: f32) -> Self {
        let mut min = Point::new(f32::INFINITY, f32::INFINITY);
        let mut max = Point::new(f32::NEG_INFINITY, f32::NEG_INFINITY);
        for p in points {
            min = Point::new(min.x.min(p.x), min.y.min(p.y));
            max = Point::new(max.x.max(p.x), max.y.max(p.y));
        }
        Self {
            min: Point::new(min.x - pad, min.y - pad),
            max: Point::new(max.x + pad, max.y + pad),
        }
    }

    fn rect(origin: Point, width: f32, height: f32) -> Self {
        Self {
            min: origin,
            max: Point::new(origin.x + width, origin.y + height),
        }
    }

    fn contains(self, p: Point) -> bool {
        p.x >= self.min.x && p.x < self.max.x && p.y >= self.min.y && p.y < self.max.y
    }
}

fn distance(a: Point, b: Point) -> f32 {
    (a.x - b.x).hypot(a.y - b.y)
}

fn segment_distance(p: Point, a: Point, b: Point) -> f32 {
    let (abx, aby) = (b.x - a.x, b.y - a.y);
    let len_sq = abx * abx + aby * aby;
    if len_sq <= f32::EPSILON {
        return distance(p, a);
    }
    let t = (((p.x - a.x) * abx + (p.y - a.y) * aby) / len_sq).clamp(0.0, 1.0);
    distance(p, Point::new(a.x + abx * t, a.y + aby * t))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::transition::{TransitionType, compose};

    fn quad(colors: [Pixel; 4]) -> Bitmap {
        Bitmap::from_rgb(2, 2, colors.concat())
    }

    fn from_bitmap() -> Bitmap {
        quad([[200, 0, 0], [0, 200, 0], [0, 0, 200], [200, 200, 0]])
    }

    fn to_bitmap() -> Bitmap {
        quad([[10, 20, 30], [40, 50, 60], [70, 80, 90], [100, 110, 120]])
    }

    fn render(layers: &[Layer]) -> Framebuffer {
        let mut fb = Framebuffer::for_cells(4, 2);
        let (from, to) = (from_bitmap(), to_bitmap());
        paint_layers(&mut fb, layers, Some(&from), Some(&to), true);
        fb
    }

    fn single(source: Source) -> Vec<Layer> {
        vec![Layer::Image {
            source,
            fit: FitMode::Crop,
            transform: LayerTransform::IDENTITY,
        }]
    }

    #[test]
    fn viewport_is_eight_logical_units_per_pixel() {
        let fb = Framebuffer::for_cells(10, 5);
        assert_eq!(fb.height(), 10);
        assert_eq!(fb.viewport(), Viewport::new(80.0, 80.0));
    }

    #[test]
    fn start_of_every_transition_shows_only_the_outgoing_image() {
        let expected = render(&single(Source::From));
        let vp = Framebuffer::for_cells(4, 2).viewport();
        for kind in TransitionType::ALL {
            let layers = compose(FitMode::Crop, kind, 0.0, vp);
            assert_eq!(render(&layers), expected, "{kind:?}");
        }
    }

    #[test]
    fn end_of_every_transition_shows_only_the_incoming_image() {
        let expected = render(&single(Source::To));
        let vp = Framebuffer::for_cells(4, 2).viewport();
        for kind in TransitionType::ALL {
            let layers = compose(FitMode::Crop, kind, 1.0, vp);
            assert_eq!(render(&layers), expected, "{kind:?}");
        }
    }

    #[test]
    fn fade_to_black_midpoint_is_black() {
        let vp = Framebuffer::for_cells(4, 2).viewport();
        let fb = render(&compose(FitMode::Crop, TransitionType::FadeToBlack, 0.5, vp));
        for y in 0..fb.height() {
            for x in 0..fb.width() {
                assert_eq!(fb.get(x, y), [0, 0, 0]);
            }
        }
    }

    #[test]
    fn horizontal_wipe_reveals_from_the_left() {
        let vp = Framebuffer::for_cells(4, 2).viewport();
        let fb = render(&compose(FitMode::Crop, TransitionType::WipeHorizontal, 0.5, vp));
        let from = render(&single(Source::From));
        let to = render(&single(Source::To));
        assert_eq!(fb.get(0, 0), to.get(0, 0));
        assert_eq!(fb.get(3, 0), from.get(3, 0));
    }

    #[test]
    fn missing_bitmaps_leave_the_frame_black() {
        let mut fb = Framebuffer::for_cells(4, 2);
        paint_layers(&mut fb, &single(Source::To), None, None, true);
        assert_eq!(fb.get(1, 1), [0, 0, 0]);
    }

    #[test]
    fn letterboxed_fit_shows_the_dimmed_backdrop_behind() {
        let wide = Bitmap::from_rgb(4, 1, vec![200; 12]);
        let layers = vec![Layer::Image {
            source: Source::From,
            fit: FitMode::Fit,
            transform: LayerTransform::IDENTITY,
        }];
        let mut with = Framebuffer::for_cells(4, 2);
        paint_layers(&mut with, &layers, Some(&wide), None, true);
        let mut without = Framebuffer::for_cells(4, 2);
        paint_layers(&mut without, &layers, Some(&wide), None, false);
        assert_eq!(without.get(0, 0), [0, 0, 0]);
        assert_eq!(with.get(0, 0), [90, 90, 90]);
        assert_eq!(with.get(1, 1), [200, 200, 200]);
    }

    #[test]
    fn thin_lines_still_cover_a_pixel() {
        let mut fb = Framebuffer::for_cells(4, 2);
        let mut list = DrawList::new();
        list.push(Shape::Line {
            from: Point::new(12.0, 0.0),
            to: Point::new(12.0, 32.0),
            width: 1.0,
            color: Rgba::WHITE,
        });
        paint_shapes(&mut fb, &list);
        assert_eq!(fb.get(1, 0), [255, 255, 255]);
        assert_eq!(fb.get(1, 3), [255, 255, 255]);
        assert_eq!(fb.get(3, 0), [0, 0, 0]);
    }

    #[test]
    fn glow_fades_from_the_centre() {
        let mut fb = Framebuffer::for_cells(8, 4);
        let mut list = DrawList::new();
        list.push(Shape::Glow {
            center: Point::new(4.0, 4.0),
            radius: 48.0,
            color: Rgba::WHITE,
        });
        paint_shapes(&mut fb, &list);
        let near = fb.get(0, 0)[0];
        let far = fb.get(4, 0)[0];
        assert!(near > far);
        assert_eq!(fb.get(7, 7), [0, 0, 0]);
    }

    #[test]
    fn shapes_outside_the_frame_are_ignored() {
        let mut fb = Framebuffer::for_cells(2, 1);
        let mut list = DrawList::new();
        list.push(Shape::Disc {
            center: Point::new(-100.0, 500.0),
            radius: 3.0,
            color: Rgba::WHITE,
        });
        paint_shapes(&mut fb, &list);
        assert_eq!(fb, Framebuffer::for_cells(2, 1));
    }
}
