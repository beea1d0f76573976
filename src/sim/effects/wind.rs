use rand::Rng;

use crate::{
    domain::season::Season,
    sim::{
        draw::{DrawList, Point, Rgba, Shape},
        math::{Intensity, Viewport},
        particles::{LeafParticle, Snowflake, Step, WindLine},
    },
};

const LINE_ALPHA: f32 = 0.2;

/// Streaks plus seasonal debris: leaves most of the year, snow in winter.
#[derive(Debug, Clone)]
pub struct WindEffect {
    intensity: Intensity,
    season: Season,
    lines: Vec<WindLine>,
    leaves: Vec<LeafParticle>,
    flakes: Vec<Snowflake>,
}

impl WindEffect {
    pub fn new<R: Rng + ?Sized>(
        rng: &mut R,
        viewport: Viewport,
        intensity: Intensity,
        season: Season,
    ) -> Self {
        let counts = WindCounts::for_season(intensity, season);
        Self {
            intensity,
            season,
            lines: (0..counts.lines)
                .map(|_| WindLine::random(rng, viewport, intensity))
                .collect(),
            leaves: (0..counts.leaves)
                .map(|_| LeafParticle::random(rng, viewport, intensity, season))
                .collect(),
            flakes: (0..counts.flakes)
                .map(|_| Snowflake::random(rng, viewport, intensity))
                .collect(),
        }
    }

    pub fn tick<R: Rng + ?Sized>(&mut self, rng: &mut R, dt: f32, viewport: Viewport) {
        let (intensity, season) = (self.intensity, self.season);
        for line in &mut self.lines {
            if line.advance(dt, viewport) == Step::Exited {
                *line = WindLine::respawn_left(rng, viewport, intensity);
            }
        }
        for leaf in &mut self.leaves {
            if leaf.advance(dt, viewport) == Step::Exited {
                *leaf = LeafParticle::respawn_left(rng, viewport, intensity, season);
            }
        }
        for flake in &mut self.flakes {
            if flake.gust(dt, viewport) == Step::Exited {
                *flake = Snowflake::respawn_left(rng, viewport, intensity);
            }
        }
    }

    pub fn draw(&self, list: &mut DrawList) {
        let line_color = Rgba::WHITE.with_alpha(LINE_ALPHA);
        for line in &self.lines {
            let y = line.y();
            list.push(Shape::Line {
                from: Point::new(line.x, y),
                to: Point::new(line.x - line.length, y),
                width: line.thickness,
                color: line_color,
            });
        }
        for leaf in &self.leaves {
            list.push(Shape::Ellipse {
                center: Point::new(leaf.x, leaf.y),
                radius_x: leaf.size / 2.0,
                radius_y: leaf.size / 4.0,
                rotation_deg: leaf.rotation,
                color: leaf.color,
            });
        }
        for flake in &self.flakes {
            list.push(Shape::Disc {
                center: Point::new(flake.x, flake.y),
                radius: flake.size,
                color: Rgba::WHITE.with_alpha(flake.alpha),
            });
        }
    }

    #[must_use]
    pub fn season(&self) -> Season {
        self.season
    }

    #[must_use]
    pub fn lines(&self) -> &[WindLine] {
        &self.lines
    }

    #[must_use]
    pub fn leaves(&self) -> &[LeafParticle] {
        &self.leaves
    }

    #[must_use]
    pub fn flakes(&self) -> &[Snowflake] {
        &self.flakes
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindCounts {
    pub lines: usize,
    pub leaves: usize,
    pub flakes: usize,
}

impl WindCounts {
    #[must_use]
    pub fn for_season(intensity: Intensity, season: Season) -> Self {
        let winter = season == Season::Winter;
        Self {
            lines: intensity.lerp_count(10, 30),
            leaves: if winter { 0 } else { intensity.lerp_count(3, 10) },
            flakes: if winter { intensity.lerp_count(10, 25) } else { 0 },
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;

    #[test]
    fn winter_wind_carries_snow_instead_of_leaves() {
        let counts = WindCounts::for_season(Intensity::MODERATE, Season::Winter);
        assert_eq!(counts.leaves, 0);
        assert!(counts.flakes > 0);

        let counts = WindCounts::for_season(Intensity::MODERATE, Season::Summer);
        assert!(counts.leaves > 0);
        assert_eq!(counts.flakes, 0);
    }

    #[test]
    fn debris_respawns_at_the_left_edge() {
        let mut rng = StdRng::seed_from_u64(23);
        let viewport = Viewport::new(300.0, 200.0);
        let mut wind = WindEffect::new(&mut rng, viewport, Intensity::HEAVY, Season::Fall);
        for _ in 0..100 {
            wind.tick(&mut rng, 0.05, viewport);
            for line in wind.lines() {
                assert!(line.x <= viewport.width);
            }
            for leaf in wind.leaves() {
                assert!(leaf.x <= viewport.width);
                assert!(leaf.y <= viewport.height);
            }
        }
    }
}
