//! Linear tweening of the bubble's animated properties.

use crate::geometry::{Axis, Placement, Rect};
use std::time::{Duration, Instant};

/// Length of both the opening and the closing animation.
pub const REVEAL_DURATION: Duration = Duration::from_millis(300);

/// Every property the reveal animates: window bounds, window opacity and the
/// content scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BubbleFrame {
    pub rect: Rect,
    pub opacity: f64,
    pub scale_x: f64,
    pub scale_y: f64,
}

impl Default for BubbleFrame {
    fn default() -> Self {
        Self {
            rect: Rect::default(),
            opacity: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
        }
    }
}

fn lerp(from: f64, to: f64, t: f64) -> f64 {
    from + (to - from) * t
}

impl BubbleFrame {
    pub fn lerp(&self, to: &BubbleFrame, t: f64) -> BubbleFrame {
        BubbleFrame {
            rect: Rect {
                left: lerp(self.rect.left, to.rect.left, t),
                top: lerp(self.rect.top, to.rect.top, t),
                width: lerp(self.rect.width, to.rect.width, t),
                height: lerp(self.rect.height, to.rect.height, t),
            },
            opacity: lerp(self.opacity, to.opacity, t),
            scale_x: lerp(self.scale_x, to.scale_x, t),
            scale_y: lerp(self.scale_y, to.scale_y, t),
        }
    }

    fn with_grow_scale(mut self, axis: Axis, value: f64) -> Self {
        match axis {
            Axis::Horizontal => self.scale_x = value,
            Axis::Vertical => self.scale_y = value,
        }
        self
    }
}

/// First frame of the opening animation: pinned rectangle, transparent, content
/// collapsed on the growth axis. The perpendicular scale stays at 1.
pub fn opening_start(placement: &Placement) -> BubbleFrame {
    BubbleFrame {
        rect: placement.pinned,
        opacity: 0.0,
        scale_x: 1.0,
        scale_y: 1.0,
    }
    .with_grow_scale(placement.grow_axis, 0.0)
}

pub fn opening_end(placement: &Placement) -> BubbleFrame {
    BubbleFrame {
        rect: placement.settled,
        opacity: 1.0,
        scale_x: 1.0,
        scale_y: 1.0,
    }
}

/// Target of the closing animation starting from the `live` frame: growth
/// extent and growth-axis scale go to zero, the growth-axis position returns
/// to its pinned value and opacity goes to zero. Everything else keeps its
/// live value.
pub fn closing_end(live: &BubbleFrame, placement: &Placement) -> BubbleFrame {
    let mut end = *live;
    match placement.grow_axis {
        Axis::Horizontal => {
            end.rect.width = 0.0;
            end.rect.left = placement.pinned.left;
        }
        Axis::Vertical => {
            end.rect.height = 0.0;
            end.rect.top = placement.pinned.top;
        }
    }
    end.opacity = 0.0;
    end.with_grow_scale(placement.grow_axis, 0.0)
}

#[derive(Debug, Clone, Copy)]
pub struct Tween {
    from: BubbleFrame,
    to: BubbleFrame,
    started: Instant,
    duration: Duration,
}

impl Tween {
    pub fn new(from: BubbleFrame, to: BubbleFrame, started: Instant, duration: Duration) -> Self {
        Self {
            from,
            to,
            started,
            duration,
        }
    }

    /// Linear progress in `[0, 1]`.
    pub fn progress(&self, now: Instant) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_duration_since(self.started);
        (elapsed.as_secs_f64() / self.duration.as_secs_f64()).clamp(0.0, 1.0)
    }

    pub fn sample(&self, now: Instant) -> BubbleFrame {
        let t = self.progress(now);
        if t >= 1.0 {
            return self.to;
        }
        self.from.lerp(&self.to, t)
    }

    pub fn is_finished(&self, now: Instant) -> bool {
        self.progress(now) >= 1.0
    }
}

/// Rectangle occupied by content of `width` x `height` after scaling by
/// `(scale_x, scale_y)` around the unit `origin`. Coordinates are local to
/// the content root.
pub fn scaled_content_rect(width: f64, height: f64, frame: &BubbleFrame, origin: (f64, f64)) -> Rect {
    let scaled_w = width * frame.scale_x;
    let scaled_h = height * frame.scale_y;
    Rect {
        left: (width - scaled_w) * origin.0,
        top: (height - scaled_h) * origin.1,
        width: scaled_w,
        height: scaled_h,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{placement, Anchor, Direction, Size};

    #[test]
    fn tween_is_linear_and_clamped() {
        let start = Instant::now();
        let from = BubbleFrame::default();
        let mut to = BubbleFrame::default();
        to.opacity = 1.0;
        to.rect.width = 200.0;
        let tween = Tween::new(from, to, start, Duration::from_millis(300));

        let mid = tween.sample(start + Duration::from_millis(150));
        assert!((mid.opacity - 0.5).abs() < 1e-9);
        assert!((mid.rect.width - 100.0).abs() < 1e-9);

        assert_eq!(tween.sample(start + Duration::from_secs(5)), to);
        assert!(!tween.is_finished(start + Duration::from_millis(299)));
        assert!(tween.is_finished(start + Duration::from_millis(300)));
    }

    #[test]
    fn opening_only_collapses_growth_axis_scale() {
        let p = placement(Anchor::new(10.0, 10.0), Direction::Up, Size::new(80.0, 40.0));
        let start = opening_start(&p);
        assert_eq!(start.scale_x, 1.0);
        assert_eq!(start.scale_y, 0.0);
        assert_eq!(start.rect.height, 0.0);
        assert_eq!(start.rect.width, 80.0);
    }

    #[test]
    fn closing_keeps_cross_axis_values() {
        let p = placement(Anchor::new(500.0, 200.0), Direction::Left, Size::new(120.0, 60.0));
        let mut live = opening_end(&p);
        live.rect.top = 123.0;
        let end = closing_end(&live, &p);
        assert_eq!(end.rect.left, 500.0);
        assert_eq!(end.rect.width, 0.0);
        assert_eq!(end.rect.top, 123.0);
        assert_eq!(end.rect.height, 60.0);
        assert_eq!(end.scale_x, 0.0);
        assert_eq!(end.scale_y, 1.0);
        assert_eq!(end.opacity, 0.0);
    }

    #[test]
    fn content_scales_from_origin() {
        let mut frame = BubbleFrame::default();
        frame.scale_x = 0.5;
        let r = scaled_content_rect(100.0, 40.0, &frame, (1.0, 0.5));
        assert_eq!(r.left, 50.0);
        assert_eq!(r.width, 50.0);
        assert_eq!(r.top, 0.0);
        assert_eq!(r.height, 40.0);
    }
}
