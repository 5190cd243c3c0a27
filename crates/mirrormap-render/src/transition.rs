//! Time-based interpolation.

use mirrormap_core::geom::Point;
use std::time::Duration;

/// Maps linear progress in `[0, 1]` onto eased progress.
pub type Easing = fn(f64) -> f64;

pub fn linear(t: f64) -> f64 {
    t.clamp(0.0, 1.0)
}

/// Cubic ease-in-out: slow start, fast middle, slow finish.
pub fn cubic_in_out(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0) * 2.0;
    if t <= 1.0 {
        t * t * t / 2.0
    } else {
        let t = t - 2.0;
        (t * t * t + 2.0) / 2.0
    }
}

pub trait Interpolate {
    /// The value `t` of the way from `self` to `to`; `t = 0` is `self`, `t = 1` is `to`.
    fn interpolate(&self, to: &Self, t: f64) -> Self;
}

impl Interpolate for f64 {
    fn interpolate(&self, to: &Self, t: f64) -> Self {
        if t >= 1.0 {
            return *to;
        }
        self + (to - self) * t
    }
}

impl Interpolate for Point {
    fn interpolate(&self, to: &Self, t: f64) -> Self {
        if t >= 1.0 {
            return *to;
        }
        self.lerp(*to, t)
    }
}

/// Elapsed time against a fixed duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    elapsed: Duration,
    duration: Duration,
}

impl Progress {
    pub fn new(duration: Duration) -> Self {
        Self {
            elapsed: Duration::ZERO,
            duration,
        }
    }

    pub fn advance(&mut self, dt: Duration) {
        self.elapsed = self.elapsed.saturating_add(dt).min(self.duration);
    }

    /// Linear progress in `[0, 1]`. A zero duration counts as finished.
    pub fn fraction(&self) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        (self.elapsed.as_secs_f64() / self.duration.as_secs_f64()).clamp(0.0, 1.0)
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.duration
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }
}

/// A value moving from `from` to `to`.
#[derive(Debug, Clone, PartialEq)]
pub struct Tween<T> {
    pub from: T,
    pub to: T,
    pub progress: Progress,
}

impl<T: Interpolate + Clone> Tween<T> {
    pub fn new(from: T, to: T, duration: Duration) -> Self {
        Self {
            from,
            to,
            progress: Progress::new(duration),
        }
    }

    pub fn sample(&self, easing: Easing) -> T {
        let t = self.progress.fraction();
        if t >= 1.0 {
            return self.to.clone();
        }
        self.from.interpolate(&self.to, easing(t))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mirrormap_core::geom::point;

    #[test]
    fn cubic_in_out_is_symmetric_and_pinned() {
        assert_eq!(cubic_in_out(0.0), 0.0);
        assert_eq!(cubic_in_out(0.5), 0.5);
        assert_eq!(cubic_in_out(1.0), 1.0);
        assert_eq!(cubic_in_out(0.25), 0.0625);
        assert!((cubic_in_out(0.75) - 0.9375).abs() < 1e-12);
        assert_eq!(cubic_in_out(-1.0), 0.0);
        assert_eq!(cubic_in_out(2.0), 1.0);
    }

    #[test]
    fn progress_clamps_to_the_duration() {
        let mut p = Progress::new(Duration::from_millis(500));
        p.advance(Duration::from_millis(250));
        assert_eq!(p.fraction(), 0.5);
        assert!(!p.is_finished());
        p.advance(Duration::from_secs(3));
        assert_eq!(p.elapsed(), Duration::from_millis(500));
        assert!(p.is_finished());
    }

    #[test]
    fn zero_duration_finishes_immediately() {
        let p = Progress::new(Duration::ZERO);
        assert_eq!(p.fraction(), 1.0);
        assert!(p.is_finished());
    }

    #[test]
    fn tween_samples_along_the_eased_curve() {
        let mut tween = Tween::new(point(0.0, 0.0), point(100.0, -40.0), Duration::from_millis(100));
        assert_eq!(tween.sample(cubic_in_out), point(0.0, 0.0));
        tween.progress.advance(Duration::from_millis(50));
        assert_eq!(tween.sample(cubic_in_out), point(50.0, -20.0));
        tween.progress.advance(Duration::from_millis(50));
        assert_eq!(tween.sample(cubic_in_out), point(100.0, -40.0));
    }
}
