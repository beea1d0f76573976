//! Particle kinds. Each kind owns its random initial state and its
//! per-tick integration; respawn and removal policy belongs to the
//! effect that holds the particles.

pub mod cloud;
pub mod fog;
pub mod lightning;
pub mod rain;
pub mod snow;
pub mod wind;

use std::f32::consts::TAU;

use rand::Rng;

pub use cloud::Cloud;
pub use fog::FogBand;
pub use lightning::{LightningStrike, bolt_path};
pub use rain::{Raindrop, Splash};
pub use snow::Snowflake;
pub use wind::{LeafParticle, WindLine};

/// Outcome of advancing one particle by one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Alive,
    /// Left its valid bounds; the owner respawns it.
    Exited,
    /// Alpha reached zero; the owner drops it.
    Faded,
}

/// Uniform sample in `[0, 1)`.
pub(crate) fn unit<R: Rng + ?Sized>(rng: &mut R) -> f32 {
    rng.random::<f32>()
}

pub(crate) fn random_phase<R: Rng + ?Sized>(rng: &mut R) -> f32 {
    unit(rng) * TAU
}

pub(crate) fn random_sign<R: Rng + ?Sized>(rng: &mut R) -> f32 {
    if rng.random_bool(0.5) { 1.0 } else { -1.0 }
}
