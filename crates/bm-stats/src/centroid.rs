use serde::{Deserialize, Serialize};

use bm_core::{Error, ImageView};

/// Intensity-weighted centre of mass, 1-based pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Centroid {
    pub x: f64,
    pub y: f64,
}

/// Computes the intensity-weighted centroid over the whole view.
///
/// Every sample contributes its intensity as weight; positions follow the
/// 1-based pixel convention, accumulation runs in `f64`. Fails with
/// [`Error::DegenerateImage`] when the total intensity is zero.
pub fn weighted_centroid(img: &ImageView<'_, f32>) -> Result<Centroid, Error> {
    let mut m00 = 0.0f64;
    let mut m10 = 0.0f64;
    let mut m01 = 0.0f64;

    for y in 0..img.height() {
        let mut row_sum = 0.0f64;
        let mut row_xmom = 0.0f64;
        for (x, &v) in img.row(y).iter().enumerate() {
            let w = v as f64;
            row_sum += w;
            row_xmom += w * (x + 1) as f64;
        }
        m00 += row_sum;
        m10 += row_xmom;
        m01 += row_sum * (y + 1) as f64;
    }

    if m00 <= 0.0 {
        return Err(Error::DegenerateImage);
    }

    Ok(Centroid {
        x: m10 / m00,
        y: m01 / m00,
    })
}

#[cfg(test)]
mod tests {
    use super::weighted_centroid;
    use bm_core::{Error, Image};

    fn flipped_h(img: &Image<f32>) -> Image<f32> {
        let mut data = Vec::with_capacity(img.width() * img.height());
        let view = img.as_view();
        for y in 0..view.height() {
            data.extend(view.row(y).iter().rev().copied());
        }
        Image::from_vec(img.width(), img.height(), data).expect("valid image")
    }

    fn flipped_v(img: &Image<f32>) -> Image<f32> {
        let mut data = Vec::with_capacity(img.width() * img.height());
        let view = img.as_view();
        for y in (0..view.height()).rev() {
            data.extend_from_slice(view.row(y));
        }
        Image::from_vec(img.width(), img.height(), data).expect("valid image")
    }

    #[test]
    fn single_pixel_lands_on_its_position() {
        let mut img = Image::new_fill(7, 5, 0.0f32);
        img.data_mut()[2 * 7 + 3] = 50.0;

        let c = weighted_centroid(&img.as_view()).expect("non-degenerate");
        assert_eq!(c.x, 4.0);
        assert_eq!(c.y, 3.0);
    }

    #[test]
    fn weights_pull_towards_brighter_pixels() {
        let mut img = Image::new_fill(5, 1, 0.0f32);
        img.data_mut()[0] = 1.0; // x = 1
        img.data_mut()[4] = 3.0; // x = 5

        let c = weighted_centroid(&img.as_view()).expect("non-degenerate");
        assert!((c.x - 4.0).abs() < 1e-12);
        assert_eq!(c.y, 1.0);
    }

    #[test]
    fn symmetric_pattern_sits_on_its_axis() {
        // Plus-shaped pattern centred on (3, 3) in 1-based coordinates.
        let mut img = Image::new_fill(5, 5, 0.0f32);
        for (x, y) in [(2, 2), (0, 2), (4, 2), (2, 0), (2, 4)] {
            img.data_mut()[y * 5 + x] = 80.0;
        }

        let c = weighted_centroid(&img.as_view()).expect("non-degenerate");
        assert!((c.x - 3.0).abs() < 1e-9);
        assert!((c.y - 3.0).abs() < 1e-9);
    }

    #[test]
    fn flips_mirror_the_centroid() {
        let mut img = Image::new_fill(8, 6, 0.0f32);
        img.data_mut()[1 * 8 + 2] = 10.0;
        img.data_mut()[3 * 8 + 5] = 30.0;
        img.data_mut()[4 * 8 + 1] = 5.0;

        let c = weighted_centroid(&img.as_view()).expect("non-degenerate");
        let ch = weighted_centroid(&flipped_h(&img).as_view()).expect("non-degenerate");
        let cv = weighted_centroid(&flipped_v(&img).as_view()).expect("non-degenerate");

        assert!((ch.x - (8.0 + 1.0 - c.x)).abs() < 1e-9);
        assert!((ch.y - c.y).abs() < 1e-9);
        assert!((cv.y - (6.0 + 1.0 - c.y)).abs() < 1e-9);
        assert!((cv.x - c.x).abs() < 1e-9);

        assert!(c.x >= 1.0 && c.x <= 8.0);
        assert!(c.y >= 1.0 && c.y <= 6.0);
    }

    #[test]
    fn all_zero_image_is_degenerate() {
        let img = Image::new_fill(10, 10, 0.0f32);
        assert_eq!(
            weighted_centroid(&img.as_view()).unwrap_err(),
            Error::DegenerateImage
        );
    }
}
