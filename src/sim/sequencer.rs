use std::{collections::HashSet, time::Duration};

use rand::{Rng, seq::SliceRandom};

use crate::sim::{
    fit::FitMode,
    math::Viewport,
    transition::{Direction, Layer, TransitionEngine, TransitionType, compose},
};

pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(5000);
/// Minimum rest between the end of one transition and the next start.
const MIN_REST: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlideEvent {
    /// `from` and `to` are image indices, not positions in the order.
    Started {
        direction: Direction,
        from: usize,
        to: usize,
    },
    Completed {
        image: usize,
    },
}

/// Shuffled playback order, auto-advance timer and the transition engine.
#[derive(Debug, Clone)]
pub struct Slideshow {
    order: Vec<usize>,
    position: usize,
    from: usize,
    to: usize,
    interval: Duration,
    idle_for: Duration,
    engine: TransitionEngine,
    failed: HashSet<usize>,
}

impl Slideshow {
    #[must_use]
    pub fn new(interval: Duration, kind: TransitionType) -> Self {
        let engine = TransitionEngine::new(kind);
        Self {
            order: Vec::new(),
            position: 0,
            from: 0,
            to: 0,
            interval: clamp_interval(interval, engine.duration()),
            idle_for: Duration::ZERO,
            engine,
            failed: HashSet::new(),
        }
    }

    /// Replaces the image set with a fresh shuffle of `count` images.
    pub fn load<R: Rng + ?Sized>(&mut self, count: usize, rng: &mut R) {
        self.order = (0..count).collect();
        self.order.shuffle(rng);
        self.position = 0;
        let first = self.order.first().copied().unwrap_or(0);
        self.from = first;
        self.to = first;
        self.idle_for = Duration::ZERO;
        self.engine.cancel();
        self.failed.clear();
    }

    pub fn tick(&mut self, dt: Duration) -> Option<SlideEvent> {
        if self.order.is_empty() {
            return None;
        }
        if self.engine.is_animating() {
            return self.engine.tick(dt).map(|direction| self.complete(direction));
        }
        self.idle_for = self.idle_for.saturating_add(dt);
        if self.idle_for >= self.interval.saturating_sub(self.engine.duration()) {
            return self.start(Direction::Forward);
        }
        None
    }

    pub fn next(&mut self) -> Option<SlideEvent> {
        self.start(Direction::Forward)
    }

    pub fn previous(&mut self) -> Option<SlideEvent> {
        self.start(Direction::Backward)
    }

    fn start(&mut self, direction: Direction) -> Option<SlideEvent> {
        if self.engine.is_animating() {
            return None;
        }
        let target = self.target(direction)?;
        if !self.engine.begin(direction) {
            return None;
        }
        self.idle_for = Duration::ZERO;
        self.from = self.order[self.position];
        self.to = self.order[target];
        tracing::debug!(?direction, from = self.from, to = self.to, "transition started");
        Some(SlideEvent::Started {
            direction,
            from: self.from,
            to: self.to,
        })
    }

    fn complete(&mut self, direction: Direction) -> SlideEvent {
        if let Some(target) = self.target(direction) {
            self.position = target;
        }
        self.from = self.to;
        tracing::debug!(image = self.to, "transition completed");
        SlideEvent::Completed { image: self.to }
    }

    /// Nearest position in `direction` whose image has not failed to decode.
    fn target(&self, direction: Direction) -> Option<usize> {
        let len = self.order.len();
        if len < 2 {
            return None;
        }
        (1..len)
            .map(|offset| match direction {
                Direction::Forward => (self.position + offset) % len,
                Direction::Backward => (self.position + len - offset) % len,
            })
            .find(|pos| !self.failed.contains(&self.order[*pos]))
    }

    /// Records an image that could not be decoded; it is skipped from now on.
    pub fn mark_failed(&mut self, image: usize) {
        if image < self.order.len() {
            self.failed.insert(image);
        }
    }

    #[must_use]
    pub fn is_failed(&self, image: usize) -> bool {
        self.failed.contains(&image)
    }

    /// Cancels any running transition without moving the index.
    pub fn set_transition_type(&mut self, kind: TransitionType) {
        let was_animating = self.engine.is_animating();
        self.engine.set_kind(kind);
        if was_animating && !self.engine.is_animating() {
            self.to = self.from;
            self.idle_for = Duration::ZERO;
        }
    }

    pub fn set_interval(&mut self, interval: Duration) {
        self.interval = clamp_interval(interval, self.engine.duration());
    }

    #[must_use]
    pub fn layers(&self, fit: FitMode, viewport: Viewport) -> Vec<Layer> {
        if self.order.is_empty() {
            return Vec::new();
        }
        compose(fit, self.engine.kind(), self.engine.progress(), viewport)
    }

    #[must_use]
    pub fn current_image(&self) -> Option<usize> {
        self.order.get(self.position).copied()
    }

    /// Image under the `From` layer; equal to the current image at rest.
    #[must_use]
    pub fn from_image(&self) -> Option<usize> {
        (!self.order.is_empty()).then_some(self.from)
    }

    #[must_use]
    pub fn to_image(&self) -> Option<usize> {
        (!self.order.is_empty()).then_some(self.to)
    }

    /// Image that follows the current one, for decoding ahead of time.
    #[must_use]
    pub fn upcoming_image(&self) -> Option<usize> {
        self.target(Direction::Forward).map(|pos| self.order[pos])
    }

    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }

    #[must_use]
    pub fn order(&self) -> &[usize] {
        &self.order
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    #[must_use]
    pub fn progress(&self) -> f32 {
        self.engine.progress()
    }

    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.engine.is_animating()
    }

    #[must_use]
    pub fn transition_type(&self) -> TransitionType {
        self.engine.kind()
    }

    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }
}

fn clamp_interval(interval: Duration, transition: Duration) -> Duration {
    interval.max(transition + MIN_REST)
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;

    const STEP: Duration = Duration::from_millis(100);

    fn show(count: usize) -> Slideshow {
        let mut slideshow = Slideshow::new(DEFAULT_INTERVAL, TransitionType::Crossfade);
        slideshow.load(count, &mut StdRng::seed_from_u64(7));
        slideshow
    }

    #[test]
    fn empty_show_is_inert() {
        let mut slideshow = Slideshow::new(DEFAULT_INTERVAL, TransitionType::Crossfade);
        for _ in 0..100 {
            assert_eq!(slideshow.tick(STEP), None);
        }
        assert_eq!(slideshow.next(), None);
        assert!(slideshow.layers(FitMode::Crop, Viewport::new(10.0, 10.0)).is_empty());
        assert_eq!(slideshow.current_image(), None);
    }

    #[test]
    fn load_produces_a_permutation() {
        let slideshow = show(6);
        let mut order = slideshow.order().to_vec();
        order.sort_unstable();
        assert_eq!(order, vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn auto_advance_follows_the_interval() {
        let mut slideshow = show(3);
        let order = slideshow.order().to_vec();
        let mut started_at = None;
        let mut completed_at = None;
        for step in 1..=50u64 {
            match slideshow.tick(STEP) {
                Some(SlideEvent::Started { to, .. }) => {
                    assert_eq!(to, order[1]);
                    started_at.get_or_insert(step * 100);
                }
                Some(SlideEvent::Completed { image }) => {
                    assert_eq!(image, order[1]);
                    completed_at.get_or_insert(step * 100);
                }
                None => {}
            }
            if step * 100 == 5000 {
                assert_eq!(slideshow.position(), 1);
                assert!((slideshow.progress() - 1.0).abs() < f32::EPSILON);
            }
        }
        assert_eq!(started_at, Some(4000));
        assert_eq!(completed_at, Some(5000));
    }

    #[test]
    fn previous_wraps_to_the_last_image() {
        let mut slideshow = show(3);
        let order = slideshow.order().to_vec();
        assert_eq!(
            slideshow.previous(),
            Some(SlideEvent::Started {
                direction: Direction::Backward,
                from: order[0],
                to: order[2],
            })
        );
        for _ in 0..10 {
            slideshow.tick(STEP);
        }
        assert_eq!(slideshow.position(), 2);
    }

    #[test]
    fn requests_while_animating_are_ignored() {
        let mut slideshow = show(4);
        assert!(slideshow.next().is_some());
        assert_eq!(slideshow.next(), None);
        assert_eq!(slideshow.previous(), None);
        for _ in 0..10 {
            slideshow.tick(STEP);
        }
        assert_eq!(slideshow.position(), 1);
    }

    #[test]
    fn failed_images_are_skipped() {
        let mut slideshow = show(4);
        let order = slideshow.order().to_vec();
        slideshow.mark_failed(order[1]);
        match slideshow.next() {
            Some(SlideEvent::Started { to, .. }) => assert_eq!(to, order[2]),
            other => panic!("expected a start, got {other:?}"),
        }
    }

    #[test]
    fn single_image_never_transitions() {
        let mut slideshow = show(1);
        for _ in 0..100 {
            assert_eq!(slideshow.tick(STEP), None);
        }
        assert_eq!(slideshow.current_image(), Some(0));
    }

    #[test]
    fn type_change_cancels_without_advancing() {
        let mut slideshow = show(3);
        slideshow.next();
        slideshow.tick(STEP);
        slideshow.set_transition_type(TransitionType::ZoomOut);
        assert!(!slideshow.is_animating());
        assert_eq!(slideshow.position(), 0);
        assert_eq!(slideshow.from_image(), slideshow.to_image());
    }

    #[test]
    fn interval_never_undercuts_the_transition() {
        let mut slideshow = show(3);
        slideshow.set_interval(Duration::from_millis(200));
        assert_eq!(slideshow.interval(), Duration::from_millis(1500));
    }
}
