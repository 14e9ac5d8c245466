use crate::Error;

/// Owned row-major intensity raster.
///
/// The measurement pipeline treats an image as immutable once handed to a
/// profiler; mutable access exists so derived working copies can be edited
/// in place before they are frozen behind a shared reference.
#[derive(Debug, Clone, PartialEq)]
pub struct Image<T> {
    width: usize,
    height: usize,
    data: Vec<T>,
}

impl<T> Image<T> {
    pub fn from_vec(width: usize, height: usize, data: Vec<T>) -> Result<Self, Error> {
        let expected = width.checked_mul(height).ok_or(Error::SizeMismatch {
            expected: usize::MAX,
            actual: data.len(),
        })?;

        if data.len() != expected {
            return Err(Error::SizeMismatch {
                expected,
                actual: data.len(),
            });
        }

        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn data(&self) -> &[T] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    pub fn as_view(&self) -> ImageView<'_, T> {
        ImageView {
            width: self.width,
            height: self.height,
            stride: self.width,
            data: &self.data,
        }
    }
}

impl<T: Clone> Image<T> {
    pub fn new_fill(width: usize, height: usize, value: T) -> Self {
        let len = width.checked_mul(height).expect("image size overflow");
        Self {
            width,
            height,
            data: vec![value; len],
        }
    }
}

/// Borrowed read-only view with element stride.
///
/// `stride` is the distance, in elements, between adjacent row starts and may
/// exceed `width`, so padded camera buffers can be wrapped without a copy.
#[derive(Debug, Clone, Copy)]
pub struct ImageView<'a, T> {
    width: usize,
    height: usize,
    stride: usize,
    data: &'a [T],
}

impl<'a, T> ImageView<'a, T> {
    pub fn from_slice(
        width: usize,
        height: usize,
        stride: usize,
        data: &'a [T],
    ) -> Result<Self, Error> {
        if stride < width {
            return Err(Error::InvalidStride);
        }

        let min_len = stride.checked_mul(height).ok_or(Error::SizeMismatch {
            expected: usize::MAX,
            actual: data.len(),
        })?;

        if data.len() < min_len {
            return Err(Error::SizeMismatch {
                expected: min_len,
                actual: data.len(),
            });
        }

        Ok(Self {
            width,
            height,
            stride,
            data,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn row(&self, y: usize) -> &'a [T] {
        assert!(y < self.height, "row index out of bounds");
        let start = y * self.stride;
        &self.data[start..start + self.width]
    }

    pub fn get(&self, x: usize, y: usize) -> Option<&'a T> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = y * self.stride + x;
        self.data.get(idx)
    }

    pub fn is_contiguous(&self) -> bool {
        self.stride == self.width
    }

    pub fn as_contiguous_slice(&self) -> Option<&'a [T]> {
        if !self.is_contiguous() {
            return None;
        }
        let len = self.width * self.height;
        self.data.get(0..len)
    }
}

pub fn to_f32(img: &ImageView<'_, u8>) -> Image<f32> {
    let mut out = Vec::with_capacity(img.width() * img.height());
    if img.is_contiguous()
        && let Some(src) = img.as_contiguous_slice()
    {
        out.extend(src.iter().map(|&px| px as f32));
    } else {
        for y in 0..img.height() {
            out.extend(img.row(y).iter().map(|&px| px as f32));
        }
    }

    Image {
        width: img.width(),
        height: img.height(),
        data: out,
    }
}

pub fn to_f32_u16(img: &ImageView<'_, u16>) -> Image<f32> {
    let mut out = Vec::with_capacity(img.width() * img.height());
    if img.is_contiguous()
        && let Some(src) = img.as_contiguous_slice()
    {
        out.extend(src.iter().map(|&px| px as f32));
    } else {
        for y in 0..img.height() {
            out.extend(img.row(y).iter().map(|&px| px as f32));
        }
    }

    Image {
        width: img.width(),
        height: img.height(),
        data: out,
    }
}

#[cfg(test)]
mod tests {
    use super::{Image, ImageView, to_f32, to_f32_u16};
    use crate::Error;

    #[test]
    fn from_vec_rejects_wrong_length() {
        let err = Image::from_vec(3, 2, vec![0u8; 5]).unwrap_err();
        assert_eq!(
            err,
            Error::SizeMismatch {
                expected: 6,
                actual: 5
            }
        );
    }

    #[test]
    fn strided_view_rows_skip_padding() {
        let data = vec![
            1.0f32, 2.0, 3.0, -1.0, // row 0 + pad
            4.0, 5.0, 6.0, -1.0, // row 1 + pad
        ];
        let view = ImageView::from_slice(3, 2, 4, &data).expect("valid view");

        assert_eq!(view.row(0), &[1.0, 2.0, 3.0]);
        assert_eq!(view.row(1), &[4.0, 5.0, 6.0]);
        assert_eq!(view.get(1, 1), Some(&5.0));
        assert_eq!(view.get(3, 0), None);
        assert!(!view.is_contiguous());
        assert!(view.as_contiguous_slice().is_none());
    }

    #[test]
    fn from_slice_rejects_short_buffer_and_bad_stride() {
        let data = vec![0u8; 7];
        assert_eq!(
            ImageView::from_slice(3, 2, 4, &data).unwrap_err(),
            Error::SizeMismatch {
                expected: 8,
                actual: 7
            }
        );
        assert_eq!(
            ImageView::from_slice(4, 2, 3, &data).unwrap_err(),
            Error::InvalidStride
        );
    }

    #[test]
    fn widening_handles_contiguous_and_padded_buffers() {
        let img8 = Image::from_vec(2, 2, vec![1u8, 2, 3, 4]).expect("valid image");
        assert_eq!(to_f32(&img8.as_view()).data(), &[1.0, 2.0, 3.0, 4.0]);

        let padded = vec![100u16, 200, 9999, 300, 400, 9999];
        let view = ImageView::from_slice(2, 2, 3, &padded).expect("valid view");
        let out = to_f32_u16(&view);
        assert_eq!(out.width(), 2);
        assert_eq!(out.data(), &[100.0, 200.0, 300.0, 400.0]);
    }
}
