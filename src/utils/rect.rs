use crate::math::Point2;

/// A rectangle, with top-left corner at `min`, and bottom-right corner at `max`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Rect {
    pub min: Point2<i32>,
    pub max: Point2<i32>,
}

impl Rect {
    #[inline]
    pub fn new(min: Point2<i32>, max: Point2<i32>) -> Self {
        Rect { min, max }
    }

    /// Constructs a rectangle from its top-left corner and size, the way
    /// `SDL_Rect` describes one.
    #[inline]
    pub fn from_xywh(x: i32, y: i32, w: i32, h: i32) -> Self {
        Rect {
            min: Point2::new(x, y),
            max: Point2::new(x.saturating_add(w), y.saturating_add(h)),
        }
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.max.x - self.min.x
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.max.y - self.min.y
    }
}
