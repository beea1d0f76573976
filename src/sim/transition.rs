//! Image transition engine: a progress tween plus the per-frame layer
//! stack for each [`TransitionType`].

use std::time::Duration;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::sim::{draw::Rgba, fit::FitMode, math::Viewport};

pub const TRANSITION_DURATION: Duration = Duration::from_millis(1000);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Serialize, Deserialize, Default)]
pub enum TransitionType {
    #[default]
    Crossfade,
    SlideLeft,
    SlideRight,
    SlideUp,
    SlideDown,
    ZoomIn,
    ZoomOut,
    RotateIn,
    RotateOut,
    FadeToBlack,
    WipeHorizontal,
    WipeVertical,
}

impl TransitionType {
    pub const ALL: [Self; 12] = [
        Self::Crossfade,
        Self::SlideLeft,
        Self::SlideRight,
        Self::SlideUp,
        Self::SlideDown,
        Self::ZoomIn,
        Self::ZoomOut,
        Self::RotateIn,
        Self::RotateOut,
        Self::FadeToBlack,
        Self::WipeHorizontal,
        Self::WipeVertical,
    ];

    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Crossfade => "Crossfade",
            Self::SlideLeft => "Slide left",
            Self::SlideRight => "Slide right",
            Self::SlideUp => "Slide up",
            Self::SlideDown => "Slide down",
            Self::ZoomIn => "Zoom in",
            Self::ZoomOut => "Zoom out",
            Self::RotateIn => "Rotate in",
            Self::RotateOut => "Rotate out",
            Self::FadeToBlack => "Fade to black",
            Self::WipeHorizontal => "Wipe horizontal",
            Self::WipeVertical => "Wipe vertical",
        }
    }

    #[must_use]
    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|t| *t == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

/// Standard "fast out, slow in" curve: cubic bezier (0.4, 0, 0.2, 1).
#[must_use]
pub fn ease(t: f32) -> f32 {
    const X1: f32 = 0.4;
    const X2: f32 = 0.2;
    const Y1: f32 = 0.0;
    const Y2: f32 = 1.0;

    if t.is_nan() || t <= 0.0 {
        return 0.0;
    }
    if t >= 1.0 {
        return 1.0;
    }
    let bezier = |s: f32, p1: f32, p2: f32| {
        let inv = 1.0 - s;
        3.0 * inv * inv * s * p1 + 3.0 * inv * s * s * p2 + s * s * s
    };
    // Bisection on x(s) = t; x is monotonic for these control points.
    let (mut low, mut high) = (0.0_f32, 1.0_f32);
    let mut s = t;
    for _ in 0..24 {
        s = (low + high) / 2.0;
        if bezier(s, X1, X2) < t {
            low = s;
        } else {
            high = s;
        }
    }
    bezier(s, Y1, Y2).clamp(0.0, 1.0)
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Animation {
    direction: Direction,
    elapsed: Duration,
}

/// At most one animation at a time; requests while animating are dropped.
#[derive(Debug, Clone)]
pub struct TransitionEngine {
    kind: TransitionType,
    duration: Duration,
    animation: Option<Animation>,
}

impl TransitionEngine {
    #[must_use]
    pub fn new(kind: TransitionType) -> Self {
        Self {
            kind,
            duration: TRANSITION_DURATION,
            animation: None,
        }
    }

    /// Starts a transition at progress 0. Returns `false` if one is running.
    pub fn begin(&mut self, direction: Direction) -> bool {
        if self.animation.is_some() {
            return false;
        }
        self.animation = Some(Animation {
            direction,
            elapsed: Duration::ZERO,
        });
        true
    }

    /// Advances the tween. Returns the direction exactly once, on the tick
    /// that completes the transition.
    pub fn tick(&mut self, dt: Duration) -> Option<Direction> {
        let animation = self.animation.as_mut()?;
        animation.elapsed = animation.elapsed.saturating_add(dt);
        if animation.elapsed < self.duration {
            return None;
        }
        let direction = animation.direction;
        self.animation = None;
        Some(direction)
    }

    pub fn cancel(&mut self) {
        self.animation = None;
    }

    /// Eased progress in `[0, 1]`; idle reads as 1.
    #[must_use]
    pub fn progress(&self) -> f32 {
        match self.animation {
            Some(animation) if !self.duration.is_zero() => {
                ease(animation.elapsed.as_secs_f32() / self.duration.as_secs_f32())
            }
            _ => 1.0,
        }
    }

    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    #[must_use]
    pub fn kind(&self) -> TransitionType {
        self.kind
    }

    /// Switching type discards any in-flight animation.
    pub fn set_kind(&mut self, kind: TransitionType) {
        if kind != self.kind {
            self.kind = kind;
            self.cancel();
        }
    }

    #[must_use]
    pub fn duration(&self) -> Duration {
        self.duration
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    From,
    To,
}

/// Visible region anchored at the viewport's top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Clip {
    pub width: f32,
    pub height: f32,
}

/// Applied after fitting. Scale and rotation pivot on the viewport centre.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayerTransform {
    pub translate_x: f32,
    pub translate_y: f32,
    pub scale: f32,
    pub rotation_deg: f32,
    pub alpha: f32,
    pub clip: Option<Clip>,
}

impl LayerTransform {
    pub const IDENTITY: Self = Self {
        translate_x: 0.0,
        translate_y: 0.0,
        scale: 1.0,
        rotation_deg: 0.0,
        alpha: 1.0,
        clip: None,
    };

    #[must_use]
    pub fn with_alpha(self, alpha: f32) -> Self {
        Self {
            alpha: alpha.clamp(0.0, 1.0),
            ..self
        }
    }

    /// True when the layer cannot put a single pixel on screen.
    #[must_use]
    pub fn is_invisible(&self, viewport: Viewport) -> bool {
        let clipped_away = self
            .clip
            .is_some_and(|clip| clip.width <= 0.0 || clip.height <= 0.0);
        let off_screen = self.translate_x.abs() >= viewport.width
            || self.translate_y.abs() >= viewport.height;
        self.alpha <= 0.0 || self.scale <= 0.0 || clipped_away || off_screen
    }
}

impl Default for LayerTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Layer {
    Image {
        source: Source,
        fit: FitMode,
        transform: LayerTransform,
    },
    Fill {
        color: Rgba,
    },
}

/// Layer stack for one frame, painted bottom to top over black.
#[must_use]
pub fn compose(
    fit: FitMode,
    kind: TransitionType,
    progress: f32,
    viewport: Viewport,
) -> Vec<Layer> {
    let p = if progress.is_nan() {
        1.0
    } else {
        progress.clamp(0.0, 1.0)
    };
    let image = |source, transform| Layer::Image {
        source,
        fit,
        transform,
    };
    if p >= 1.0 {
        return vec![image(Source::To, LayerTransform::IDENTITY)];
    }

    let base = image(Source::From, LayerTransform::IDENTITY);
    let remaining = 1.0 - p;
    let identity = LayerTransform::IDENTITY;
    let to = match kind {
        TransitionType::Crossfade => identity.with_alpha(p),
        TransitionType::SlideLeft => LayerTransform {
            translate_x: remaining * viewport.width,
            ..identity
        },
        TransitionType::SlideRight => LayerTransform {
            translate_x: -remaining * viewport.width,
            ..identity
        },
        TransitionType::SlideUp => LayerTransform {
            translate_y: remaining * viewport.height,
            ..identity
        },
        TransitionType::SlideDown => LayerTransform {
            translate_y: -remaining * viewport.height,
            ..identity
        },
        TransitionType::ZoomIn => LayerTransform {
            scale: p,
            ..identity.with_alpha(p)
        },
        TransitionType::ZoomOut => LayerTransform {
            scale: 1.0 + remaining,
            ..identity.with_alpha(p)
        },
        TransitionType::RotateIn => LayerTransform {
            rotation_deg: remaining * 360.0,
            ..identity.with_alpha(p)
        },
        TransitionType::RotateOut => LayerTransform {
            rotation_deg: p * 360.0,
            ..identity.with_alpha(p)
        },
        TransitionType::FadeToBlack => {
            return if p < 0.5 {
                vec![
                    base,
                    Layer::Fill {
                        color: Rgba::BLACK.with_alpha(p * 2.0),
                    },
                ]
            } else {
                vec![
                    base,
                    Layer::Fill {
                        color: Rgba::BLACK,
                    },
                    image(Source::To, identity.with_alpha((p - 0.5) * 2.0)),
                ]
            };
        }
        TransitionType::WipeHorizontal => LayerTransform {
            clip: Some(Clip {
                width: p * viewport.width,
                height: viewport.height,
            }),
            ..identity
        },
        TransitionType::WipeVertical => LayerTransform {
            clip: Some(Clip {
                width: viewport.width,
                height: p * viewport.height,
            }),
            ..identity
        },
    };
    vec![base, image(Source::To, to)]
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    const VIEWPORT: Viewport = Viewport {
        width: 640.0,
        height: 360.0,
    };

    fn to_transform(layers: &[Layer]) -> Option<LayerTransform> {
        layers.iter().find_map(|layer| match layer {
            Layer::Image {
                source: Source::To,
                transform,
                ..
            } => Some(*transform),
            _ => None,
        })
    }

    #[test]
    fn easing_hits_both_ends_and_rises() {
        assert!(ease(0.0).abs() < f32::EPSILON);
        assert!((ease(1.0) - 1.0).abs() < f32::EPSILON);
        let mut last = 0.0;
        for step in 1..=100 {
            let value = ease(step as f32 / 100.0);
            assert!(value >= last - 1e-4);
            last = value;
        }
        assert!(ease(0.5) > 0.5, "fast out");
    }

    #[test]
    fn begin_is_rejected_while_animating() {
        let mut engine = TransitionEngine::new(TransitionType::Crossfade);
        assert!(engine.begin(Direction::Forward));
        assert!(!engine.begin(Direction::Backward));
        assert!(engine.is_animating());
    }

    #[test]
    fn completion_fires_exactly_once() {
        let mut engine = TransitionEngine::new(TransitionType::SlideLeft);
        engine.begin(Direction::Backward);
        let mut completions = Vec::new();
        for _ in 0..15 {
            if let Some(direction) = engine.tick(Duration::from_millis(100)) {
                completions.push(direction);
            }
        }
        assert_eq!(completions, vec![Direction::Backward]);
        assert!((engine.progress() - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn progress_starts_at_zero() {
        let mut engine = TransitionEngine::new(TransitionType::ZoomIn);
        assert!((engine.progress() - 1.0).abs() < f32::EPSILON);
        engine.begin(Direction::Forward);
        assert!(engine.progress().abs() < f32::EPSILON);
        engine.tick(Duration::from_millis(500));
        assert!(engine.progress() > 0.0 && engine.progress() < 1.0);
    }

    #[test]
    fn changing_type_cancels_the_animation() {
        let mut engine = TransitionEngine::new(TransitionType::Crossfade);
        engine.begin(Direction::Forward);
        engine.set_kind(TransitionType::WipeVertical);
        assert!(!engine.is_animating());
        assert_eq!(engine.tick(Duration::from_secs(2)), None);
    }

    #[test]
    fn finished_transition_draws_only_the_target() {
        for kind in TransitionType::ALL {
            let layers = compose(FitMode::Crop, kind, 1.0, VIEWPORT);
            assert_eq!(
                layers,
                vec![Layer::Image {
                    source: Source::To,
                    fit: FitMode::Crop,
                    transform: LayerTransform::IDENTITY,
                }]
            );
        }
    }

    #[test]
    fn slides_enter_from_their_side() {
        let left = to_transform(&compose(FitMode::Fit, TransitionType::SlideLeft, 0.25, VIEWPORT))
            .expect("target layer");
        assert!((left.translate_x - 480.0).abs() < 1e-3);
        let down = to_transform(&compose(FitMode::Fit, TransitionType::SlideDown, 0.5, VIEWPORT))
            .expect("target layer");
        assert!((down.translate_y + 180.0).abs() < 1e-3);
    }

    #[test]
    fn wipes_clip_against_the_viewport() {
        let horizontal = to_transform(&compose(
            FitMode::Fit,
            TransitionType::WipeHorizontal,
            0.5,
            VIEWPORT,
        ))
        .expect("target layer");
        assert_eq!(
            horizontal.clip,
            Some(Clip {
                width: 320.0,
                height: 360.0
            })
        );
    }

    #[test]
    fn fade_to_black_is_pure_black_at_midpoint() {
        let layers = compose(FitMode::Crop, TransitionType::FadeToBlack, 0.5, VIEWPORT);
        assert_eq!(
            layers[1],
            Layer::Fill {
                color: Rgba::BLACK
            }
        );
        let target = to_transform(&layers).expect("target layer");
        assert!(target.alpha.abs() < f32::EPSILON);
    }

    proptest! {
        #[test]
        fn target_is_invisible_at_start(idx in 0usize..12) {
            let kind = TransitionType::ALL[idx];
            let layers = compose(FitMode::Crop, kind, 0.0, VIEWPORT);
            prop_assert_eq!(
                layers[0],
                Layer::Image { source: Source::From, fit: FitMode::Crop, transform: LayerTransform::IDENTITY }
            );
            for layer in &layers[1..] {
                match layer {
                    Layer::Image { transform, .. } => prop_assert!(transform.is_invisible(VIEWPORT)),
                    Layer::Fill { color } => prop_assert!(!color.is_visible()),
                }
            }
        }

        #[test]
        fn progress_outside_range_is_clamped(progress in -10.0f32..10.0, idx in 0usize..12) {
            let kind = TransitionType::ALL[idx];
            let layers = compose(FitMode::Fit, kind, progress, VIEWPORT);
            let clamped = compose(FitMode::Fit, kind, progress.clamp(0.0, 1.0), VIEWPORT);
            prop_assert_eq!(layers, clamped);
        }
    }
}
