//! Pure geometry helpers shared by the selector, resolver and screen adapter.

use crate::{Point, Rect, Size};

pub type Angle = euclid::Angle<f64>;

/// Bearing from `from` to `to` with the Y delta negated, so that in a space
/// whose Y axis grows upward the angle runs clockwise from east (90 is down).
///
/// Coincident points have no meaningful bearing; zero is returned and callers
/// are expected to gate on [`squared_distance`] first.
pub fn angle(from: Point, to: Point) -> Angle {
    let dx = to.x - from.x;
    let dy = to.y - from.y;
    if dx == 0.0 && dy == 0.0 {
        return Angle::zero();
    }
    Angle::radians((-dy).atan2(dx))
}

pub fn squared_distance(a: Point, b: Point) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    dx * dx + dy * dy
}

pub trait AngleExt {
    /// The same direction expressed in `[0, 360)` degrees.
    fn normalized(self) -> Angle;
}

impl AngleExt for Angle {
    fn normalized(self) -> Angle {
        Angle::degrees(normalize_degrees(self.to_degrees()))
    }
}

pub fn normalize_degrees(degrees: f64) -> f64 {
    ((degrees % 360.0) + 360.0) % 360.0
}

impl Point {
    pub fn flipped_y(&self, max_y: f64) -> Point {
        Point::new(self.x, max_y - self.y)
    }
}

impl Size {
    pub fn area(&self) -> f64 {
        self.width * self.height
    }
}

impl Rect {
    /// Converts between top-left and bottom-left origin conventions against a
    /// reference height. Applying it twice yields the original rect.
    pub fn flipped_y(&self, max_y: f64) -> Rect {
        Rect::new(self.x, max_y - self.y - self.height, self.width, self.height)
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.min_x()
            && point.x < self.max_x()
            && point.y >= self.min_y()
            && point.y < self.max_y()
    }

    pub fn inset(&self, top: f64, bottom: f64, left: f64, right: f64) -> Rect {
        Rect::new(
            self.x + left,
            self.y + top,
            self.width - left - right,
            self.height - top - bottom,
        )
    }

    pub fn inset_uniform(&self, amount: f64) -> Rect {
        self.inset(amount, amount, amount, amount)
    }

    /// Linear interpolation towards `to`; `t` is clamped to `[0, 1]`.
    pub fn lerp(&self, to: &Rect, t: f64) -> Rect {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: f64, b: f64| a + (b - a) * t;
        Rect::new(
            mix(self.x, to.x),
            mix(self.y, to.y),
            mix(self.width, to.width),
            mix(self.height, to.height),
        )
    }

    pub fn approx_eq(&self, other: &Rect, epsilon: f64) -> bool {
        (self.x - other.x).abs() <= epsilon
            && (self.y - other.y).abs() <= epsilon
            && (self.width - other.width).abs() <= epsilon
            && (self.height - other.height).abs() <= epsilon
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn degrees_between(from: (f64, f64), to: (f64, f64)) -> f64 {
        angle(Point::new(from.0, from.1), Point::new(to.0, to.1))
            .normalized()
            .to_degrees()
    }

    #[test]
    fn angle_follows_upward_y_convention() {
        assert!((degrees_between((0.0, 0.0), (10.0, 0.0)) - 0.0).abs() < 1e-9);
        assert!((degrees_between((0.0, 0.0), (0.0, -10.0)) - 90.0).abs() < 1e-9);
        assert!((degrees_between((0.0, 0.0), (-10.0, 0.0)) - 180.0).abs() < 1e-9);
        assert!((degrees_between((0.0, 0.0), (0.0, 10.0)) - 270.0).abs() < 1e-9);
        assert!((degrees_between((5.0, 5.0), (15.0, -5.0)) - 45.0).abs() < 1e-9);
    }

    #[test]
    fn coincident_points_give_stable_angle() {
        let p = Point::new(42.0, -7.0);
        assert_eq!(angle(p, p).to_degrees(), 0.0);
        assert_eq!(angle(p, p).normalized().to_degrees(), 0.0);
    }

    #[test]
    fn normalization_handles_negative_and_large_values() {
        assert_eq!(normalize_degrees(-90.0), 270.0);
        assert_eq!(normalize_degrees(720.0), 0.0);
        assert_eq!(normalize_degrees(-450.0), 270.0);
        assert_eq!(normalize_degrees(359.5), 359.5);
        assert_eq!(normalize_degrees(-1e-18), 0.0);
    }

    #[test]
    fn squared_distance_skips_the_root() {
        assert_eq!(squared_distance(Point::new(1.0, 1.0), Point::new(4.0, 5.0)), 25.0);
    }

    #[test]
    fn flipping_twice_is_identity() {
        let rects = [
            Rect::new(0.0, 0.0, 100.0, 50.0),
            Rect::new(-1440.0, 120.5, 800.0, 600.0),
            Rect::new(10.0, 900.0, 0.0, 0.0),
        ];
        for max_y in [0.0, 1080.0, 1117.0] {
            for r in rects {
                assert_eq!(r.flipped_y(max_y).flipped_y(max_y), r);
            }
        }
    }

    #[test]
    fn flip_moves_top_rect_to_bottom() {
        let top_strip = Rect::new(0.0, 0.0, 1920.0, 25.0);
        assert_eq!(top_strip.flipped_y(1080.0), Rect::new(0.0, 1055.0, 1920.0, 25.0));
    }

    #[test]
    fn lerp_endpoints_are_exact() {
        let from = Rect::new(0.0, 0.0, 100.0, 100.0);
        let to = Rect::new(33.3, 66.6, 0.1, 999.9);
        assert_eq!(from.lerp(&to, 0.0), from);
        assert!(from.lerp(&to, 1.0).approx_eq(&to, 1e-9));
    }
}
