#[cfg(test)]
use proptest_derive::Arbitrary;

#[derive(Default, Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self { Self { x, y } }
}

/// Triangle: top-left, right-middle, bottom-left.
pub type Body = [Point; 3];

/// Base left, base right, mid right, mid left, tip. Points 0..4 trace the inner
/// quadrilateral, points 4, 3, 2 the outer triangle hinged on the 2-3 edge.
pub type Wing = [Point; 5];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(test, derive(Arbitrary))]
pub enum Side {
    Left,
    Right,
}

impl Side {
    // Both sides currently flap in phase.
    pub fn phase_increment(self) -> f64 {
        match self {
            Side::Left => 0.5,
            Side::Right => 0.5,
        }
    }
}

pub fn make_body(x: f64, y: f64, w: f64, h: f64) -> Body {
    [
        Point::new(x, y),
        Point::new(x + w, y + h / 2.0),
        Point::new(x, y + h),
    ]
}

/// Wing rest pose around the centre `(cx, cy)` of the bird's box.
pub fn make_wing(cx: f64, cy: f64, width: f64, pinch: f64, length: f64, tip_length: f64) -> Wing {
    let base_x1 = cx - width / 2.0;
    let base_x2 = cx + width / 2.0;

    [
        // where the wing joins the body
        Point::new(base_x1, cy),
        Point::new(base_x2, cy),
        Point::new(base_x2 - pinch, cy - length),
        Point::new(base_x1 + pinch, cy - length),
        Point::new(cx, cy - length - tip_length),
    ]
}
