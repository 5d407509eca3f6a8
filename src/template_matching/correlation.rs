//! Correlation coefficient scoring
//!
//! Every window is scored with the zero-mean normalized cross-correlation
//!
//! ```text
//! (n·ΣIT − ΣI·ΣT) / sqrt((n·ΣT² − (ΣT)²) · (n·ΣI² − (ΣI)²))
//! ```
//!
//! Scores lie in [-1, 1] and do not move with a uniform brightness or contrast
//! change. Window sums come from integral images and the cross term is summed in
//! integers, so flat windows are detected exactly.

use image::{GrayImage, ImageBuffer, Luma};
use imageproc::integral_image::{integral_image, integral_squared_image, sum_image_pixels};

/// One score per template position, indexed by the window's top-left corner
pub type ScoreMap = ImageBuffer<Luma<f32>, Vec<f32>>;

#[derive(Debug, Clone, Copy)]
struct Moments {
    sum: u64,
    squares: u64,
}

impl Moments {
    /// n·Σx² − (Σx)², zero exactly when every pixel has the same value
    fn spread(&self, n: u64) -> u128 {
        (u128::from(n) * u128::from(self.squares)).saturating_sub(u128::from(self.sum).pow(2))
    }
}

fn template_moments(template: &GrayImage) -> Moments {
    template.pixels().fold(Moments { sum: 0, squares: 0 }, |m, p| {
        let v = u64::from(p[0]);
        Moments {
            sum: m.sum + v,
            squares: m.squares + v * v,
        }
    })
}

/// ΣIT for the window whose top-left corner is (x, y)
fn cross_sum(frame: &GrayImage, template: &GrayImage, x: u32, y: u32) -> u64 {
    let frame_width = frame.width() as usize;
    let template_width = template.width() as usize;
    let pixels = frame.as_raw();

    template
        .as_raw()
        .chunks_exact(template_width)
        .enumerate()
        .map(|(dy, row)| {
            let start = (y as usize + dy) * frame_width + x as usize;
            pixels[start..start + template_width]
                .iter()
                .zip(row)
                .map(|(&a, &b)| u64::from(a) * u64::from(b))
                .sum::<u64>()
        })
        .sum()
}

/// Correlation coefficient of `template` at every position inside `frame`
///
/// The template must be non-empty and fit inside the frame. A flat template or
/// a flat window has no coefficient and scores 0.
pub fn coefficient_map(frame: &GrayImage, template: &GrayImage) -> ScoreMap {
    let (tw, th) = template.dimensions();
    let width = frame.width() - tw + 1;
    let height = frame.height() - th + 1;
    let n = u64::from(tw) * u64::from(th);

    let t = template_moments(template);
    let t_spread = t.spread(n);
    if t_spread == 0 {
        log::debug!("Template {tw}x{th} is a single flat color, it cannot match");
        return ScoreMap::new(width, height);
    }

    let sums = integral_image::<_, u64>(frame);
    let squares = integral_squared_image::<_, u64>(frame);

    ScoreMap::from_fn(width, height, |x, y| {
        let (right, bottom) = (x + tw - 1, y + th - 1);
        let window = Moments {
            sum: sum_image_pixels(&sums, x, y, right, bottom)[0],
            squares: sum_image_pixels(&squares, x, y, right, bottom)[0],
        };
        let w_spread = window.spread(n);
        if w_spread == 0 {
            return Luma([0.0]);
        }

        let numerator = i128::from(n) * i128::from(cross_sum(frame, template, x, y))
            - i128::from(window.sum) * i128::from(t.sum);
        let denominator = (t_spread as f64 * w_spread as f64).sqrt();
        Luma([(numerator as f64 / denominator) as f32])
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stripes(width: u32, height: u32) -> GrayImage {
        GrayImage::from_fn(width, height, |x, y| Luma([((x * 37 + y * 11) % 200) as u8 + 20]))
    }

    #[test]
    fn test_exact_copy_scores_one() {
        let template = stripes(6, 5);
        let scores = coefficient_map(&template, &template);
        assert_eq!(scores.dimensions(), (1, 1));
        assert!((scores.get_pixel(0, 0)[0] - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_brightness_and_contrast_do_not_change_score() {
        let template = stripes(6, 5);
        let brighter = GrayImage::from_fn(6, 5, |x, y| Luma([template.get_pixel(x, y)[0] / 2 + 30]));

        let score = coefficient_map(&brighter, &template).get_pixel(0, 0)[0];
        assert!(score > 0.99, "affine copy scored {score}");
    }

    #[test]
    fn test_inverted_copy_scores_minus_one() {
        let template = stripes(6, 5);
        let inverted = GrayImage::from_fn(6, 5, |x, y| Luma([255 - template.get_pixel(x, y)[0]]));

        let score = coefficient_map(&inverted, &template).get_pixel(0, 0)[0];
        assert!((score + 1.0).abs() < 1e-5, "inverted copy scored {score}");
    }

    #[test]
    fn test_flat_window_scores_zero() {
        let frame = GrayImage::from_pixel(20, 10, Luma([120]));
        let scores = coefficient_map(&frame, &stripes(6, 5));
        assert_eq!(scores.dimensions(), (15, 6));
        assert!(scores.pixels().all(|p| p[0] == 0.0));
    }

    #[test]
    fn test_flat_template_scores_zero() {
        let template = GrayImage::from_pixel(4, 4, Luma([200]));
        let scores = coefficient_map(&stripes(20, 10), &template);
        assert!(scores.pixels().all(|p| p[0] == 0.0));
    }
}
