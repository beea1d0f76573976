//! Draw-list primitives emitted by the simulations. Coordinates are logical
//! viewport pixels; the compositor owns rasterization.

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    pub const WHITE: Self = Self::opaque(255, 255, 255);
    pub const BLACK: Self = Self::opaque(0, 0, 0);
    pub const TRANSPARENT: Self = Self {
        r: 0,
        g: 0,
        b: 0,
        a: 0.0,
    };

    #[must_use]
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// `0xRRGGBB`, fully opaque.
    #[must_use]
    pub const fn from_hex(rgb: u32) -> Self {
        Self::opaque((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8)
    }

    #[must_use]
    pub fn with_alpha(self, a: f32) -> Self {
        Self {
            a: a.clamp(0.0, 1.0),
            ..self
        }
    }

    #[must_use]
    pub fn is_visible(self) -> bool {
        self.a > 0.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Line {
        from: Point,
        to: Point,
        width: f32,
        color: Rgba,
    },
    Polyline {
        points: Vec<Point>,
        width: f32,
        color: Rgba,
    },
    Ring {
        center: Point,
        radius: f32,
        width: f32,
        color: Rgba,
    },
    Disc {
        center: Point,
        radius: f32,
        color: Rgba,
    },
    Rect {
        origin: Point,
        width: f32,
        height: f32,
        color: Rgba,
    },
    RoundedRect {
        origin: Point,
        width: f32,
        height: f32,
        corner: f32,
        color: Rgba,
    },
    Ellipse {
        center: Point,
        radius_x: f32,
        radius_y: f32,
        rotation_deg: f32,
        color: Rgba,
    },
    /// Radial gradient from `color` at the centre to transparent at `radius`.
    Glow {
        center: Point,
        radius: f32,
        color: Rgba,
    },
}

impl Shape {
    #[must_use]
    pub fn color(&self) -> Rgba {
        match self {
            Self::Line { color, .. }
            | Self::Polyline { color, .. }
            | Self::Ring { color, .. }
            | Self::Disc { color, .. }
            | Self::Rect { color, .. }
            | Self::RoundedRect { color, .. }
            | Self::Ellipse { color, .. }
            | Self::Glow { color, .. } => *color,
        }
    }
}

/// Particle overlay for one frame, drawn in push order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DrawList {
    shapes: Vec<Shape>,
}

impl DrawList {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, shape: Shape) {
        if shape.color().is_visible() {
            self.shapes.push(shape);
        }
    }

    pub fn clear(&mut self) {
        self.shapes.clear();
    }

    #[must_use]
    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }
}
