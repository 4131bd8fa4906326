use std::io::Cursor;

use image::{DynamicImage, GenericImageView, GrayImage, ImageFormat, Luma, Rgba, RgbaImage};
use tracing::debug;

use crate::errors::TransformError;
use crate::traits::{MaskPredictor, SubjectExtractor};

/// Byte-level background removal on top of a mask predictor.
///
/// Decodes whatever format the bytes carry, cuts the subject out with the
/// predicted mask and always encodes the result as PNG so the alpha channel
/// survives.
pub struct Cutout<P: MaskPredictor> {
    predictor: P,
}

impl<P: MaskPredictor> Cutout<P> {
    pub const fn new(predictor: P) -> Self {
        Self { predictor }
    }

    pub fn remove_background(&self, image: &DynamicImage) -> Result<RgbaImage, TransformError> {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(TransformError::InvalidImage {
                reason: format!("image has no pixels ({width}x{height})"),
            });
        }

        let mask = self.predictor.predict_mask(image)?;
        naive_cutout(&image.to_rgba8(), &mask)
    }
}

impl<P: MaskPredictor> SubjectExtractor for Cutout<P> {
    fn extract(&self, input: &[u8]) -> Result<Vec<u8>, TransformError> {
        let image = image::load_from_memory(input).map_err(TransformError::Decode)?;
        debug!(
            width = image.width(),
            height = image.height(),
            color = ?image.color(),
            "decoded image"
        );

        let cutout = self.remove_background(&image)?;
        encode_png(cutout)
    }
}

/// Composites `image` over a fully transparent canvas using `mask` as the
/// blend factor, so every channel including alpha is scaled by `mask / 255`.
pub fn naive_cutout(image: &RgbaImage, mask: &GrayImage) -> Result<RgbaImage, TransformError> {
    if image.dimensions() != mask.dimensions() {
        return Err(TransformError::MaskDimensions {
            image: image.dimensions(),
            mask: mask.dimensions(),
        });
    }

    let mut output = image.clone();
    for (pixel, Luma([alpha])) in output.pixels_mut().zip(mask.pixels()) {
        let Rgba(channels) = pixel;
        for channel in channels.iter_mut() {
            *channel = blend(*channel, *alpha);
        }
    }

    Ok(output)
}

fn blend(channel: u8, alpha: u8) -> u8 {
    ((u16::from(channel) * u16::from(alpha) + 127) / 255) as u8
}

pub fn encode_png(image: RgbaImage) -> Result<Vec<u8>, TransformError> {
    let mut buffer = Vec::new();
    DynamicImage::ImageRgba8(image)
        .write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)
        .map_err(TransformError::Encode)?;
    Ok(buffer)
}
