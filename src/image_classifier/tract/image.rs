use crate::config::{Normalization, TensorLayout};
use image::{imageops, DynamicImage};
use tract_onnx::prelude::*;

/// Largest centered square of the image.
pub fn center_crop_square(image: &DynamicImage) -> DynamicImage {
    let (w, h) = (image.width(), image.height());
    if w == h {
        return image.clone();
    }

    let side = w.min(h);
    let x_offset = (w - side) / 2;
    let y_offset = (h - side) / 2;

    image.crop_imm(x_offset, y_offset, side, side)
}

pub fn resize_image(image: &DynamicImage, width: u32, height: u32) -> DynamicImage {
    center_crop_square(image).resize_exact(width, height, imageops::FilterType::Triangle)
}

fn normalize(value: u8, normalization: Normalization) -> f32 {
    match normalization {
        Normalization::Unit => value as f32 / 255.0,
        Normalization::SignedUnit => value as f32 / 127.5 - 1.0,
    }
}

fn image_to_tensor(
    image: &DynamicImage,
    layout: TensorLayout,
    normalization: Normalization,
) -> Tensor {
    let rgb = image.to_rgb8();
    let (w, h) = (rgb.width() as usize, rgb.height() as usize);
    let value_at = |x: usize, y: usize, c: usize| {
        normalize(rgb.get_pixel(x as u32, y as u32)[c], normalization)
    };

    match layout {
        TensorLayout::Nhwc => {
            tract_ndarray::Array4::from_shape_fn((1, h, w, 3), |(_, y, x, c)| value_at(x, y, c))
                .into_tensor()
        }
        TensorLayout::Nchw => {
            tract_ndarray::Array4::from_shape_fn((1, 3, h, w), |(_, c, y, x)| value_at(x, y, c))
                .into_tensor()
        }
    }
}

pub fn resize_image_to_tensor(
    image: &DynamicImage,
    width: u32,
    height: u32,
    layout: TensorLayout,
    normalization: Normalization,
) -> Tensor {
    let resized = resize_image(image, width, height);
    image_to_tensor(&resized, layout, normalization)
}

pub fn tensor_shape(width: u32, height: u32, layout: TensorLayout) -> [usize; 4] {
    match layout {
        TensorLayout::Nhwc => [1, height as usize, width as usize, 3],
        TensorLayout::Nchw => [1, 3, height as usize, width as usize],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgb};

    fn solid(width: u32, height: u32, pixel: [u8; 3]) -> DynamicImage {
        DynamicImage::ImageRgb8(ImageBuffer::from_pixel(width, height, Rgb(pixel)))
    }

    #[test]
    fn test_image_to_tensor_nchw_unit() {
        let image = solid(100, 100, [255, 0, 0]);

        let tensor =
            resize_image_to_tensor(&image, 64, 64, TensorLayout::Nchw, Normalization::Unit);
        assert_eq!(tensor.shape(), &[1, 3, 64, 64]);

        let slice = tensor.as_slice::<f32>().unwrap();
        assert!((slice[0] - 1.0).abs() < 1e-6);
        assert!(slice[64 * 64].abs() < 1e-6);
        assert!(slice[2 * 64 * 64].abs() < 1e-6);
    }

    #[test]
    fn test_image_to_tensor_nhwc_signed() {
        let image = solid(10, 10, [255, 0, 255]);

        let tensor =
            resize_image_to_tensor(&image, 8, 8, TensorLayout::Nhwc, Normalization::SignedUnit);
        assert_eq!(tensor.shape(), &[1, 8, 8, 3]);

        let slice = tensor.as_slice::<f32>().unwrap();
        assert!((slice[0] - 1.0).abs() < 1e-6);
        assert!((slice[1] + 1.0).abs() < 1e-6);
        assert!((slice[2] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_center_crop_keeps_middle() {
        // 30x10: left third black, middle third white, right third black
        let mut img = ImageBuffer::from_pixel(30, 10, Rgb([0u8, 0, 0]));
        for y in 0..10 {
            for x in 10..20 {
                img.put_pixel(x, y, Rgb([255, 255, 255]));
            }
        }

        let cropped = center_crop_square(&DynamicImage::ImageRgb8(img)).to_rgb8();

        assert_eq!((cropped.width(), cropped.height()), (10, 10));
        assert!(cropped.pixels().all(|p| *p == Rgb([255, 255, 255])));
    }

    #[test]
    fn test_normalization_midpoint() {
        let image = solid(4, 4, [128, 128, 128]);

        let tensor = resize_image_to_tensor(&image, 4, 4, TensorLayout::Nchw, Normalization::Unit);
        let slice = tensor.as_slice::<f32>().unwrap();

        let expected = 128.0 / 255.0;
        assert!((slice[0] - expected).abs() < 0.0001);
    }

    #[test]
    fn test_tensor_shape() {
        assert_eq!(tensor_shape(224, 200, TensorLayout::Nhwc), [1, 200, 224, 3]);
        assert_eq!(tensor_shape(224, 200, TensorLayout::Nchw), [1, 3, 200, 224]);
    }
}
