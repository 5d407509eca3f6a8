/// Template matching implementation
///
/// Correlation coefficient scoring over grayscale frames
use super::correlation::{ScoreMap, coefficient_map};
use super::types::{Match, Rect};
use image::GrayImage;
use std::cmp::Ordering;

/// Template matcher with a fixed confidence threshold
///
/// Frames may be crops of a larger screen; `with_origin` shifts every
/// reported rectangle back into screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TemplateMatcher {
    threshold: f32,
    origin: (i32, i32),
}

impl TemplateMatcher {
    /// Create a matcher accepting scores strictly above `threshold`
    pub fn new(threshold: f32) -> Self {
        Self {
            threshold,
            origin: (0, 0),
        }
    }

    /// Screen position of the frame's top-left pixel
    pub fn with_origin(mut self, left: i32, top: i32) -> Self {
        self.origin = (left, top);
        self
    }

    fn accepts(&self, score: f32) -> bool {
        score > self.threshold
    }

    /// First position in raster order (top row first, then left to right) that
    /// scores above the threshold
    pub fn find_first(&self, frame: &GrayImage, template: &GrayImage) -> Option<Match> {
        let scores = self.scores(frame, template)?;

        let (x, y, pixel) = scores
            .enumerate_pixels()
            .find(|(_, _, pixel)| self.accepts(pixel[0]))?;
        let correlation = pixel[0];
        log::trace!("First match at ({x},{y}) score {correlation:.3}");
        Some(Match {
            rect: self.rect_at(x, y, template),
            correlation,
        })
    }

    /// All matches above the threshold, best first
    ///
    /// The returned iterator yields lazily and skips candidates that overlap a
    /// match it already produced.
    pub fn find_all(&self, frame: &GrayImage, template: &GrayImage) -> Matches {
        let Some(scores) = self.scores(frame, template) else {
            return Matches::empty();
        };

        let mut candidates: Vec<(u32, u32, f32)> = scores
            .enumerate_pixels()
            .filter(|(_, _, pixel)| self.accepts(pixel[0]))
            .map(|(x, y, pixel)| (x, y, pixel[0]))
            .collect();

        candidates.sort_by(|a, b| {
            b.2.partial_cmp(&a.2)
                .unwrap_or(Ordering::Equal)
                .then(a.1.cmp(&b.1))
                .then(a.0.cmp(&b.0))
        });

        log::trace!("{} candidate positions above {:.2}", candidates.len(), self.threshold);

        Matches {
            candidates: candidates.into_iter(),
            accepted: Vec::new(),
            size: (template.width(), template.height()),
            origin: self.origin,
        }
    }

    /// Score map, or `None` when the template cannot fit inside the frame
    fn scores(
        &self,
        frame: &GrayImage,
        template: &GrayImage,
    ) -> Option<ScoreMap> {
        if template.width() == 0
            || template.height() == 0
            || template.width() > frame.width()
            || template.height() > frame.height()
        {
            log::debug!(
                "Template {}x{} does not fit in frame {}x{}",
                template.width(),
                template.height(),
                frame.width(),
                frame.height()
            );
            return None;
        }

        Some(coefficient_map(frame, template))
    }

    fn rect_at(&self, x: u32, y: u32, template: &GrayImage) -> Rect {
        Rect::new(
            self.origin.0 + x as i32,
            self.origin.1 + y as i32,
            template.width(),
            template.height(),
        )
    }
}

/// Lazy sequence of non-overlapping matches
#[derive(Debug)]
pub struct Matches {
    candidates: std::vec::IntoIter<(u32, u32, f32)>,
    accepted: Vec<Rect>,
    size: (u32, u32),
    origin: (i32, i32),
}

impl Matches {
    /// A sequence with nothing in it
    pub fn empty() -> Self {
        Self {
            candidates: Vec::new().into_iter(),
            accepted: Vec::new(),
            size: (0, 0),
            origin: (0, 0),
        }
    }

    /// Only the rectangles, in the same order
    pub fn rects(self) -> impl Iterator<Item = Rect> {
        self.map(|m| m.rect)
    }
}

impl Iterator for Matches {
    type Item = Match;

    fn next(&mut self) -> Option<Match> {
        for (x, y, correlation) in self.candidates.by_ref() {
            let rect = Rect::new(
                self.origin.0 + x as i32,
                self.origin.1 + y as i32,
                self.size.0,
                self.size.1,
            );
            if self.accepted.iter().any(|kept| kept.overlaps(&rect)) {
                continue;
            }
            self.accepted.push(rect);
            return Some(Match { rect, correlation });
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    /// Deterministic noise patch with values in 20..=235
    fn noise_patch(seed: u32, width: u32, height: u32) -> GrayImage {
        let mut state = seed;
        GrayImage::from_fn(width, height, |_, _| {
            state = state.wrapping_mul(1_103_515_245).wrapping_add(12_345);
            Luma([20 + ((state >> 16) % 216) as u8])
        })
    }

    fn frame_with(patch: &GrayImage, positions: &[(u32, u32)]) -> GrayImage {
        let mut frame = GrayImage::new(160, 100);
        for &(x, y) in positions {
            image::imageops::replace(&mut frame, patch, x as i64, y as i64);
        }
        frame
    }

    #[test]
    fn test_find_first_locates_patch() {
        let patch = noise_patch(7, 12, 12);
        let frame = frame_with(&patch, &[(40, 25)]);

        let found = TemplateMatcher::new(0.9)
            .find_first(&frame, &patch)
            .expect("patch should be found");
        assert_eq!(found.rect, Rect::new(40, 25, 12, 12));
        assert!(found.correlation > 0.99, "exact copy scores ~1.0");
    }

    #[test]
    fn test_find_first_respects_threshold() {
        let patch = noise_patch(7, 12, 12);
        let other = noise_patch(99, 12, 12);
        let frame = frame_with(&other, &[(40, 25)]);

        assert!(TemplateMatcher::new(0.95).find_first(&frame, &patch).is_none());
    }

    #[test]
    fn test_find_first_takes_raster_order_over_score() {
        let patch = noise_patch(7, 12, 12);
        // a faint checkerboard over the copy keeps it well above 0.9 but below the exact copy
        let marked = GrayImage::from_fn(12, 12, |x, y| {
            let v = patch.get_pixel(x, y)[0];
            Luma([if (x + y) % 2 == 0 { v + 10 } else { v }])
        });
        let mut frame = frame_with(&patch, &[(10, 60)]);
        image::imageops::replace(&mut frame, &marked, 100, 10);

        let found = TemplateMatcher::new(0.9).find_first(&frame, &patch).unwrap();
        assert_eq!(found.rect.top_left(), (100, 10), "upper row comes first");
        assert!(found.correlation < 0.999);

        let best = TemplateMatcher::new(0.9).find_all(&frame, &patch).next().unwrap();
        assert_eq!(best.rect.top_left(), (10, 60), "find_all is best first");
    }

    #[test]
    fn test_flat_grey_frame_never_matches() {
        // bright square on a darker plate, the shape of a typical UI icon
        let icon = GrayImage::from_fn(24, 24, |x, y| {
            let inside = (6..18).contains(&x) && (6..18).contains(&y);
            Luma([if inside { 200 } else { 80 }])
        });
        let frame = GrayImage::from_pixel(400, 240, Luma([120]));

        for threshold in [0.0, 0.6, 0.9] {
            let matcher = TemplateMatcher::new(threshold);
            assert!(matcher.find_first(&frame, &icon).is_none(), "threshold {threshold}");
            assert_eq!(matcher.find_all(&frame, &icon).count(), 0);
        }
    }

    #[test]
    fn test_uniform_brightening_still_matches() {
        let patch = noise_patch(9, 12, 12);
        let mut frame = GrayImage::from_pixel(80, 60, Luma([90]));
        let lifted = GrayImage::from_fn(12, 12, |x, y| Luma([patch.get_pixel(x, y)[0] / 2 + 100]));
        image::imageops::replace(&mut frame, &lifted, 30, 20);

        let found = TemplateMatcher::new(0.95).find_first(&frame, &patch).unwrap();
        assert_eq!(found.rect, Rect::new(30, 20, 12, 12));
    }

    #[test]
    fn test_origin_offsets_results() {
        let patch = noise_patch(3, 10, 10);
        let frame = frame_with(&patch, &[(5, 6)]);

        let found = TemplateMatcher::new(0.9)
            .with_origin(1000, -20)
            .find_first(&frame, &patch)
            .unwrap();
        assert_eq!(found.rect.top_left(), (1005, -14));
    }

    #[test]
    fn test_template_larger_than_frame() {
        let frame = GrayImage::new(8, 8);
        let patch = noise_patch(1, 10, 4);
        let matcher = TemplateMatcher::new(0.5);

        assert!(matcher.find_first(&frame, &patch).is_none());
        assert_eq!(matcher.find_all(&frame, &patch).count(), 0);
    }

    #[test]
    fn test_find_all_returns_every_copy() {
        let patch = noise_patch(11, 12, 12);
        let positions = [(5, 5), (70, 10), (30, 60), (120, 70)];
        let frame = frame_with(&patch, &positions);

        let mut found: Vec<(i32, i32)> = TemplateMatcher::new(0.95)
            .find_all(&frame, &patch)
            .rects()
            .map(|r| r.top_left())
            .collect();
        found.sort();

        let mut expected: Vec<(i32, i32)> =
            positions.iter().map(|&(x, y)| (x as i32, y as i32)).collect();
        expected.sort();
        assert_eq!(found, expected);
    }

    #[test]
    fn test_find_all_suppresses_overlapping_candidates() {
        let patch = noise_patch(11, 12, 12);
        let frame = frame_with(&patch, &[(10, 10), (80, 50)]);

        // a low threshold lets shifted windows through; only the peaks survive
        let matches: Vec<Match> = TemplateMatcher::new(0.4).find_all(&frame, &patch).collect();
        assert_eq!(matches.len(), 2);
        for m in &matches {
            assert!(m.correlation > 0.99);
        }
    }

    #[test]
    fn test_find_all_is_best_first() {
        let patch = noise_patch(5, 12, 12);
        let mut frame = frame_with(&patch, &[(10, 10)]);
        // a dimmed copy still correlates well but below the exact one
        let dimmed = GrayImage::from_fn(12, 12, |x, y| {
            let v = patch.get_pixel(x, y)[0];
            Luma([if (x + y) % 2 == 0 { v / 2 } else { v }])
        });
        image::imageops::replace(&mut frame, &dimmed, 100, 60);

        let matches: Vec<Match> = TemplateMatcher::new(0.8).find_all(&frame, &patch).collect();
        assert!(!matches.is_empty());
        assert_eq!(matches[0].rect.top_left(), (10, 10));
        for pair in matches.windows(2) {
            assert!(pair[0].correlation >= pair[1].correlation);
        }
    }

    #[test]
    fn test_matches_is_lazy() {
        let patch = noise_patch(2, 8, 8);
        let frame = frame_with(&patch, &[(0, 0), (50, 50)]);

        let mut matches = TemplateMatcher::new(0.95).find_all(&frame, &patch);
        assert!(matches.next().is_some());
        assert!(matches.next().is_some());
        assert!(matches.next().is_none());
    }
}
