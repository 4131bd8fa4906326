use std::path::Path;

use crate::{
    errors::{BgRemoveError, TransformError},
    traits::MaskPredictor,
};
use image::{imageops, imageops::FilterType, DynamicImage, GenericImageView, GrayImage, RgbImage};
use ndarray::prelude::*;
use ort::value::TensorRef;
use ort::{
    execution_providers::{CUDAExecutionProvider, TensorRTExecutionProvider},
    session::{builder::SessionBuilder, Session},
};
use parking_lot::Mutex;
use tracing::debug;

/// Side length of the square u2net input.
pub const INPUT_SIZE: u32 = 320;

const MEAN: [f32; 3] = [0.485, 0.456, 0.406];
const STD: [f32; 3] = [0.229, 0.224, 0.225];

/// u2net salient-object model running on ONNX Runtime.
pub struct U2NetModel {
    session: Mutex<Session>,
    input_name: String,
    output_name: String,
}

impl U2NetModel {
    /// Loads the model, failing with [`BgRemoveError::ExtractorUnavailable`]
    /// when the weights are missing or ONNX Runtime rejects them.
    pub fn new(model_path: &Path) -> Result<Self, BgRemoveError> {
        let unavailable = |reason: String| BgRemoveError::ExtractorUnavailable {
            path: model_path.to_path_buf(),
            reason,
        };

        if !model_path.is_file() {
            return Err(unavailable("model file does not exist".to_string()));
        }

        let session = SessionBuilder::new()
            .and_then(|builder| {
                builder.with_execution_providers([
                    TensorRTExecutionProvider::default().build(),
                    CUDAExecutionProvider::default().build(),
                ])
            })
            .and_then(|builder| builder.with_memory_pattern(true))
            .and_then(|builder| builder.commit_from_file(model_path))
            .map_err(|e| unavailable(e.to_string()))?;

        let input_name = session
            .inputs
            .first()
            .map(|input| input.name.clone())
            .ok_or_else(|| unavailable("model declares no inputs".to_string()))?;
        let output_name = session
            .outputs
            .first()
            .map(|output| output.name.clone())
            .ok_or_else(|| unavailable("model declares no outputs".to_string()))?;
        debug!(
            path = %model_path.display(),
            input = %input_name,
            output = %output_name,
            "loaded u2net session"
        );

        Ok(Self {
            session: Mutex::new(session),
            input_name,
            output_name,
        })
    }

    /// Runs the network and returns the raw `[1, 1, H, W]` saliency map.
    pub fn predict(&self, tensor: ArrayView4<f32>) -> Result<Array4<f32>, TransformError> {
        let mut session = self.session.lock();
        let outputs = session.run(ort::inputs![
            self.input_name.as_str() => TensorRef::from_array_view(&tensor.as_standard_layout())?
        ])?;

        let prediction = outputs[self.output_name.as_str()].try_extract_array::<f32>()?;
        let shape = prediction.shape().to_vec();
        prediction
            .into_dimensionality::<Ix4>()
            .map(|p| p.to_owned())
            .map_err(|_| TransformError::UnexpectedOutput { shape })
    }
}

impl MaskPredictor for U2NetModel {
    fn predict_mask(&self, image: &DynamicImage) -> Result<GrayImage, TransformError> {
        let tensor = preprocess(&image.to_rgb8());
        let prediction = self.predict(tensor.view())?;
        let (width, height) = image.dimensions();
        postprocess(prediction.view(), width, height)
    }
}

/// Resizes to the network input and normalizes into an NCHW tensor.
pub fn preprocess(image: &RgbImage) -> Array4<f32> {
    let resized = imageops::resize(image, INPUT_SIZE, INPUT_SIZE, FilterType::Lanczos3);
    let max = resized
        .as_raw()
        .iter()
        .copied()
        .max()
        .map_or(0.0, f32::from)
        .max(1e-6);

    let size = INPUT_SIZE as usize;
    Array4::from_shape_fn((1, 3, size, size), |(_, c, y, x)| {
        let value = f32::from(resized.get_pixel(x as u32, y as u32).0[c]) / max;
        (value - MEAN[c]) / STD[c]
    })
}

/// Min-max normalizes the first saliency map and scales it back to
/// `width` x `height`.
pub fn postprocess(
    prediction: ArrayView4<f32>,
    width: u32,
    height: u32,
) -> Result<GrayImage, TransformError> {
    let shape = prediction.shape();
    if shape[0] == 0 || shape[1] == 0 || shape[2] == 0 || shape[3] == 0 {
        return Err(TransformError::UnexpectedOutput {
            shape: shape.to_vec(),
        });
    }

    let map = prediction.slice(s![0, 0, .., ..]);
    let (min, max) = map
        .iter()
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    let range = max - min;

    let (rows, cols) = map.dim();
    let mask = GrayImage::from_fn(cols as u32, rows as u32, |x, y| {
        let value = map[[y as usize, x as usize]];
        let normalized = if range > 0.0 {
            (value - min) / range
        } else {
            0.0
        };
        image::Luma([(normalized * 255.0) as u8])
    });

    Ok(imageops::resize(&mask, width, height, FilterType::Lanczos3))
}
