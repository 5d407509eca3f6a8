/// Template matching data types
use serde::Serialize;

/// Axis-aligned rectangle in screen coordinates
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct Rect {
    /// X coordinate of the left edge
    pub left: i32,
    /// Y coordinate of the top edge
    pub top: i32,
    pub width: u32,
    pub height: u32,
}

/// A single match result
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Match {
    /// Where the template was found
    pub rect: Rect,
    /// Correlation score (0.0-1.0)
    pub correlation: f32,
}

impl Rect {
    pub fn new(left: i32, top: i32, width: u32, height: u32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Exclusive right edge
    pub fn right(&self) -> i32 {
        self.left + self.width as i32
    }

    /// Exclusive bottom edge
    pub fn bottom(&self) -> i32 {
        self.top + self.height as i32
    }

    /// Center point, rounded towards the top-left
    pub fn center(&self) -> (i32, i32) {
        (
            self.left + (self.width / 2) as i32,
            self.top + (self.height / 2) as i32,
        )
    }

    pub fn top_left(&self) -> (i32, i32) {
        (self.left, self.top)
    }

    pub fn overlaps(&self, other: &Rect) -> bool {
        self.left < other.right()
            && other.left < self.right()
            && self.top < other.bottom()
            && other.top < self.bottom()
    }
}

impl Match {
    /// Format match as string with correlation percentage
    pub fn describe(&self, name: &str) -> String {
        let correlation_pct = (self.correlation * 100.0) as u32;
        format!(
            "{} at ({},{}) - {}%",
            name, self.rect.left, self.rect.top, correlation_pct
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_center_rounds_down() {
        let rect = Rect::new(100, 150, 51, 50);
        assert_eq!(rect.center(), (125, 175));
    }

    #[test]
    fn test_overlap() {
        let a = Rect::new(0, 0, 10, 10);
        assert!(a.overlaps(&Rect::new(9, 9, 5, 5)));
        assert!(!a.overlaps(&Rect::new(10, 0, 5, 5)), "edges touching is not overlap");
        assert!(!a.overlaps(&Rect::new(0, 20, 5, 5)));
    }

    #[test]
    fn test_describe() {
        let m = Match {
            rect: Rect::new(3, 4, 10, 10),
            correlation: 0.956,
        };
        assert_eq!(m.describe("mark"), "mark at (3,4) - 95%");
    }
}
