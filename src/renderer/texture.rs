use std::num::NonZeroU32;

use image::RgbaImage;

/// Uploads an rgba8 image, or a single fallback texel when the load failed.
/// The fallback keeps every bind group fully populated so a missing asset
/// degrades to a flat-colored surface instead of an error.
pub fn create_image_texture(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    image: Option<&RgbaImage>,
    fallback: [u8; 4],
    format: wgpu::TextureFormat,
    label: &str,
) -> wgpu::TextureView {
    let (width, height, pixels) = match image {
        Some(image) => (image.width(), image.height(), image.as_raw().as_slice()),
        None => (1, 1, fallback.as_slice()),
    };

    let size = wgpu::Extent3d {
        width,
        height,
        depth_or_array_layers: 1,
    };
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
    });

    queue.write_texture(
        texture.as_image_copy(),
        pixels,
        wgpu::ImageDataLayout {
            offset: 0,
            bytes_per_row: NonZeroU32::new(4 * width),
            rows_per_image: None,
        },
        size,
    );

    texture.create_view(&wgpu::TextureViewDescriptor::default())
}

/// Flat "straight up" texel for absent normal maps.
pub const NEUTRAL_NORMAL: [u8; 4] = [128, 128, 255, 255];
pub const WHITE: [u8; 4] = [255, 255, 255, 255];
