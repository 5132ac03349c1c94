use std::path::Path;

use image::imageops::FilterType;
use thiserror::Error;
use tract_onnx::prelude::*;

/// Side length of the square classifier input.
pub const SAMPLE_SIZE: usize = 224;
pub const SAMPLE_CHANNELS: usize = 3;
const SAMPLE_LEN: usize = SAMPLE_SIZE * SAMPLE_SIZE * SAMPLE_CHANNELS;

/// Index of the "match" class in the classifier output.
const MATCH_CLASS: usize = 0;

#[derive(Debug, Error)]
pub enum VisualError {
    #[error("failed to decode image: {0}")]
    Decode(#[from] image::ImageError),
    #[error("sample must hold 224x224x3 values in [0, 1], got {0}")]
    InvalidSample(String),
    #[error("model error: {0}")]
    Model(String),
    #[error("classifier returned no usable probability")]
    EmptyOutput,
}

/// A 224x224 RGB image in HWC order, every channel scaled into [0, 1].
#[derive(Clone, Debug, PartialEq)]
pub struct VisualSample {
    pixels: Vec<f32>,
}

impl VisualSample {
    pub fn from_pixels(pixels: Vec<f32>) -> Result<Self, VisualError> {
        if pixels.len() != SAMPLE_LEN {
            return Err(VisualError::InvalidSample(format!("{} values", pixels.len())));
        }
        if let Some(bad) = pixels.iter().find(|v| !(0.0..=1.0).contains(*v)) {
            return Err(VisualError::InvalidSample(format!("value {bad}")));
        }
        Ok(Self { pixels })
    }

    /// Decodes raw image bytes, resizes to 224x224 and normalizes by 255.
    pub fn from_image_bytes(bytes: &[u8]) -> Result<Self, VisualError> {
        let rgb = image::load_from_memory(bytes)?
            .resize_exact(SAMPLE_SIZE as u32, SAMPLE_SIZE as u32, FilterType::CatmullRom)
            .to_rgb8();
        let pixels = rgb
            .into_raw()
            .into_iter()
            .map(|channel| f32::from(channel) / 255.0)
            .collect();
        Ok(Self { pixels })
    }

    pub fn pixels(&self) -> &[f32] {
        &self.pixels
    }
}

/// Binary image classifier returning class probabilities for one sample.
pub trait VisualClassifier: Send + Sync {
    fn predict(&self, sample: &VisualSample) -> Result<Vec<f32>, VisualError>;
}

/// ONNX classifier taking a `[1, 224, 224, 3]` f32 batch.
pub struct OnnxClassifier {
    plan: TypedRunnableModel<TypedModel>,
}

impl OnnxClassifier {
    pub fn load(path: &Path) -> Result<Self, VisualError> {
        let plan = tract_onnx::onnx()
            .model_for_path(path)
            .and_then(|model| {
                model.with_input_fact(
                    0,
                    f32::fact([1, SAMPLE_SIZE, SAMPLE_SIZE, SAMPLE_CHANNELS]).into(),
                )
            })
            .and_then(|model| model.into_optimized())
            .and_then(|model| model.into_runnable())
            .map_err(|e| VisualError::Model(e.to_string()))?;
        Ok(Self { plan })
    }
}

impl VisualClassifier for OnnxClassifier {
    fn predict(&self, sample: &VisualSample) -> Result<Vec<f32>, VisualError> {
        let input = Tensor::from_shape(
            &[1, SAMPLE_SIZE, SAMPLE_SIZE, SAMPLE_CHANNELS],
            sample.pixels(),
        )
        .map_err(|e| VisualError::Model(e.to_string()))?;

        let outputs = self
            .plan
            .run(tvec!(input.into()))
            .map_err(|e| VisualError::Model(e.to_string()))?;
        let output = outputs.first().ok_or(VisualError::EmptyOutput)?;
        let probabilities = output
            .to_array_view::<f32>()
            .map_err(|e| VisualError::Model(e.to_string()))?;

        Ok(probabilities.iter().copied().collect())
    }
}

/// Loads the classifier at `path`. Any failure leaves the run text-only.
pub fn load_classifier(path: Option<&Path>) -> Option<Box<dyn VisualClassifier>> {
    let Some(path) = path else {
        log::info!("No visual model configured, scoring text only");
        return None;
    };

    match OnnxClassifier::load(path) {
        Ok(classifier) => {
            log::info!("Loaded visual model {}", path.display());
            Some(Box::new(classifier))
        }
        Err(e) => {
            log::warn!(
                "Failed to load visual model {}: {e}; scoring text only",
                path.display()
            );
            None
        }
    }
}

/// Probability of the match class, clamped into [0, 1].
pub fn match_probability(
    classifier: &dyn VisualClassifier,
    sample: &VisualSample,
) -> Result<f32, VisualError> {
    let probabilities = classifier.predict(sample)?;
    match probabilities.get(MATCH_CLASS) {
        Some(&p) if p.is_finite() => Ok(p.clamp(0.0, 1.0)),
        _ => Err(VisualError::EmptyOutput),
    }
}

/// Visual score, absent when there is no model, no sample or inference
/// failed.
pub fn score_visual(
    classifier: Option<&dyn VisualClassifier>,
    sample: Option<&VisualSample>,
) -> Option<f32> {
    let (classifier, sample) = (classifier?, sample?);
    match match_probability(classifier, sample) {
        Ok(probability) => Some(probability),
        Err(e) => {
            log::warn!("Visual scoring failed, using text score only: {e}");
            None
        }
    }
}
