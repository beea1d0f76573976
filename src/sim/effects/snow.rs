#![allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]

use rand::Rng;

use crate::sim::{
    draw::{DrawList, Point, Rgba, Shape},
    math::{Intensity, Viewport},
    particles::Snowflake,
};

/// Pile height lost per second in every column.
pub const MELT_RATE: f32 = 0.1;
const MIN_PILE_COLUMNS: usize = 60;
const PIXELS_PER_COLUMN: f32 = 6.0;
const MIN_IMPACT: f32 = 4.0;

/// Accumulated snow per column across the bottom edge.
#[derive(Debug, Clone, PartialEq)]
pub struct SnowPile {
    heights: Vec<f32>,
    max_height: f32,
}

impl SnowPile {
    #[must_use]
    pub fn new(viewport: Viewport, max_height: f32) -> Self {
        let columns = ((viewport.width / PIXELS_PER_COLUMN).round() as usize).max(MIN_PILE_COLUMNS);
        Self {
            heights: vec![0.0; columns],
            max_height: max_height.max(0.0),
        }
    }

    #[must_use]
    pub fn column_for(&self, x: f32, width: f32) -> usize {
        if width <= 0.0 {
            return 0;
        }
        let last = self.heights.len().saturating_sub(1);
        ((x / width * self.heights.len() as f32).max(0.0) as usize).min(last)
    }

    #[must_use]
    pub fn height_at(&self, column: usize) -> f32 {
        self.heights.get(column).copied().unwrap_or(0.0)
    }

    pub fn land(&mut self, column: usize, flake_size: f32) {
        if let Some(height) = self.heights.get_mut(column) {
            let impact = (flake_size * 2.0).max(MIN_IMPACT);
            *height = (*height + impact).min(self.max_height);
        }
    }

    pub fn melt(&mut self, dt: f32) {
        let loss = MELT_RATE * dt.max(0.0);
        for height in &mut self.heights {
            *height = (*height - loss).max(0.0);
        }
    }

    /// Column height averaged with its neighbours, for a softer outline.
    #[must_use]
    pub fn smoothed(&self, column: usize) -> f32 {
        let left = column
            .checked_sub(1)
            .map_or(0.0, |idx| self.height_at(idx));
        let right = self.height_at(column + 1);
        (left + self.height_at(column) + right) / 3.0
    }

    #[must_use]
    pub fn heights(&self) -> &[f32] {
        &self.heights
    }

    #[must_use]
    pub fn max_height(&self) -> f32 {
        self.max_height
    }

    #[must_use]
    pub fn total(&self) -> f32 {
        self.heights.iter().sum()
    }
}

#[derive(Debug, Clone)]
pub struct SnowEffect {
    intensity: Intensity,
    flakes: Vec<Snowflake>,
    pile: SnowPile,
}

impl SnowEffect {
    pub fn new<R: Rng + ?Sized>(rng: &mut R, viewport: Viewport, intensity: Intensity) -> Self {
        Self {
            intensity,
            flakes: (0..flake_count(intensity))
                .map(|_| Snowflake::random(rng, viewport, intensity))
                .collect(),
            pile: SnowPile::new(viewport, max_pile_height(intensity)),
        }
    }

    pub fn tick<R: Rng + ?Sized>(&mut self, rng: &mut R, dt: f32, viewport: Viewport) {
        for flake in &mut self.flakes {
            flake.drift(dt, viewport);
            let column = self.pile.column_for(flake.x, viewport.width);
            let surface = viewport.height - self.pile.height_at(column);
            if flake.y + flake.size >= surface {
                self.pile.land(column, flake.size);
                *flake = Snowflake::respawn_top(rng, viewport, self.intensity);
            }
        }
        self.pile.melt(dt);
    }

    pub fn draw(&self, list: &mut DrawList, viewport: Viewport) {
        for flake in &self.flakes {
            list.push(Shape::Disc {
                center: Point::new(flake.x, flake.y),
                radius: flake.size,
                color: Rgba::WHITE.with_alpha(flake.shimmer()),
            });
        }
        let columns = self.pile.heights().len();
        if columns == 0 {
            return;
        }
        let slice = viewport.width / columns as f32;
        for column in 0..columns {
            if self.pile.height_at(column) <= 0.0 {
                continue;
            }
            let height = self.pile.smoothed(column);
            list.push(Shape::Rect {
                origin: Point::new(column as f32 * slice, viewport.height - height),
                width: slice + 1.0,
                height,
                color: Rgba::WHITE,
            });
        }
    }

    #[must_use]
    pub fn pile(&self) -> &SnowPile {
        &self.pile
    }

    #[must_use]
    pub fn flakes(&self) -> &[Snowflake] {
        &self.flakes
    }
}

#[must_use]
pub fn flake_count(intensity: Intensity) -> usize {
    intensity.lerp_count(50, 200)
}

#[must_use]
pub fn max_pile_height(intensity: Intensity) -> f32 {
    intensity.lerp(20.0, 40.0)
}
