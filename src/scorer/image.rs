use crate::scorer::model_config::InputLayout;
use image::{imageops, DynamicImage};
use tract_onnx::prelude::*;

pub fn resize_square(image: &DynamicImage, size: u32) -> DynamicImage {
    image.resize_exact(size, size, imageops::FilterType::Nearest)
}

fn image_to_tensor(
    image: &DynamicImage,
    layout: InputLayout,
) -> Result<Tensor, Box<dyn std::error::Error + Send + Sync>> {
    let rgb = image.to_rgb8();
    let (width, height) = (rgb.width() as usize, rgb.height() as usize);

    let tensor = match layout {
        InputLayout::Nhwc => {
            tract_ndarray::Array4::from_shape_fn((1, height, width, 3), |(_, y, x, c)| {
                rgb.get_pixel(x as u32, y as u32)[c] as f32 / 255.0
            })
            .into_tensor()
        }
        InputLayout::Nchw => {
            tract_ndarray::Array4::from_shape_fn((1, 3, height, width), |(_, c, y, x)| {
                rgb.get_pixel(x as u32, y as u32)[c] as f32 / 255.0
            })
            .into_tensor()
        }
    };

    Ok(tensor)
}

pub fn resize_image_to_tensor(
    image: &DynamicImage,
    size: u32,
    layout: InputLayout,
) -> Result<Tensor, Box<dyn std::error::Error + Send + Sync>> {
    let resized = resize_square(image, size);
    let tensor = image_to_tensor(&resized, layout)?;

    Ok(tensor)
}
