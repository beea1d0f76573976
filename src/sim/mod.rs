//! Frame-driven simulation core: the shared clock, particle kinds, weather
//! effect simulators, the transition engine and the slideshow sequencer.
//!
//! Nothing in here blocks or performs IO. Every type is advanced from the
//! frame tick and exposes a draw list for the compositor.

pub mod clock;
pub mod draw;
pub mod effects;
pub mod fit;
pub mod math;
pub mod particles;
pub mod selector;
pub mod sequencer;
pub mod transition;
