use serde::{Deserialize, Serialize};

/// Axis-aligned box in page points, top-left origin (y grows downward).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct BBox {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

impl BBox {
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// True when the vertical interval `[y0, y1]` touches `[lo, hi]`.
    pub fn intersects_y(&self, lo: f32, hi: f32) -> bool {
        self.y0 <= hi && self.y1 >= lo
    }

    /// True when the horizontal interval lies fully inside `[lo, hi]` and
    /// starts before `hi`, so a zero-width box on a shared edge belongs only
    /// to the band that starts there.
    pub fn within_x(&self, lo: f32, hi: f32) -> bool {
        self.x0 >= lo && self.x0 < hi && self.x1 <= hi
    }

    /// Mirror a bottom-left origin box into the top-left frame.
    pub fn flip_y(&self, page_height: f32) -> Self {
        Self {
            x0: self.x0,
            y0: page_height - self.y1,
            x1: self.x1,
            y1: page_height - self.y0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn vertical_window_touches_edges() {
        let b = BBox::new(0.0, 100.0, 10.0, 110.0);
        assert!(b.intersects_y(110.0, 120.0));
        assert!(b.intersects_y(90.0, 100.0));
        assert!(b.intersects_y(102.0, 104.0));
        assert!(!b.intersects_y(111.0, 130.0));
    }

    #[test]
    fn horizontal_containment_is_inclusive() {
        let b = BBox::new(20.0, 0.0, 60.0, 5.0);
        assert!(b.within_x(20.0, 60.0));
        assert!(!b.within_x(21.0, 60.0));
    }

    #[test]
    fn point_on_shared_edge_starts_the_next_band() {
        let point = BBox::new(60.0, 0.0, 60.0, 5.0);
        assert!(!point.within_x(20.0, 60.0));
        assert!(point.within_x(60.0, 100.0));
    }

    #[test]
    fn flips_into_top_left_frame() {
        let b = BBox::new(5.0, 700.0, 15.0, 712.0);
        assert_eq!(b.flip_y(792.0), BBox::new(5.0, 80.0, 15.0, 92.0));
    }
}
