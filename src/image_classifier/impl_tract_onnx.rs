use crate::config::ModelConfig;
use crate::image_classifier::interface::{ImageClassifier, ModelInfo, Prediction};
use crate::image_classifier::models::metadata::ModelMetadata;
use crate::image_classifier::tract::image::{resize_image_to_tensor, tensor_shape};
use crate::image_source::frame::Frame;
use crate::library::logger::interface::Logger;
use std::sync::{Arc, OnceLock};
use tract_onnx::prelude::*;

struct LoadedModel {
    plan: TypedRunnableModel<TypedModel>,
    labels: Vec<String>,
    input_shape: (u32, u32),
    name: Option<String>,
}

pub struct ImageClassifierTractOnnx {
    config: ModelConfig,
    logger: Arc<dyn Logger + Send + Sync>,
    loaded: OnceLock<LoadedModel>,
}

impl ImageClassifierTractOnnx {
    pub fn new(config: ModelConfig, logger: Arc<dyn Logger + Send + Sync>) -> Self {
        Self {
            config,
            logger: logger.with_namespace("image_classifier").with_namespace("tract_onnx"),
            loaded: OnceLock::new(),
        }
    }

    fn load_model(&self) -> Result<LoadedModel, Box<dyn std::error::Error + Send + Sync>> {
        let metadata = ModelMetadata::from_path(&self.config.metadata_path())?;

        let input_shape = metadata
            .image_size
            .map(|size| (size, size))
            .unwrap_or(self.config.input_shape);
        let shape = tensor_shape(input_shape.0, input_shape.1, self.config.layout);

        let model_path = self.config.model_path();
        self.logger
            .info(&format!("Loading {} with input {:?}", model_path.display(), shape))?;

        let plan = tract_onnx::onnx()
            .model_for_path(&model_path)?
            .with_input_fact(0, f32::fact(shape).into())?
            .into_optimized()?
            .into_runnable()?;

        Ok(LoadedModel {
            plan,
            labels: metadata.labels,
            input_shape,
            name: metadata.model_name,
        })
    }
}

fn softmax(scores: &[f32]) -> Vec<f32> {
    let max = scores.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exps = scores.iter().map(|s| (s - max).exp()).collect::<Vec<_>>();
    let total = exps.iter().sum::<f32>();
    exps.into_iter().map(|e| e / total).collect()
}

fn label_scores(
    labels: &[String],
    scores: &[f32],
) -> Result<Vec<Prediction>, Box<dyn std::error::Error + Send + Sync>> {
    if scores.len() != labels.len() {
        return Err(format!(
            "Model produced {} scores for {} labels",
            scores.len(),
            labels.len()
        )
        .into());
    }

    Ok(labels
        .iter()
        .zip(scores)
        .map(|(label, score)| Prediction::new(label, *score))
        .collect())
}

impl ImageClassifier for ImageClassifierTractOnnx {
    fn load(&self) -> Result<ModelInfo, Box<dyn std::error::Error + Send + Sync>> {
        if self.loaded.get().is_none() {
            let model = self.load_model()?;
            let _ = self.loaded.set(model);
        }

        let loaded = self.loaded.get().ok_or("Model failed to initialize")?;
        self.logger.info(&format!(
            "Model loaded, classes: {}",
            loaded.labels.len()
        ))?;

        Ok(ModelInfo {
            name: loaded.name.clone(),
            class_count: loaded.labels.len(),
        })
    }

    fn classify(
        &self,
        frame: &Frame,
    ) -> Result<Vec<Prediction>, Box<dyn std::error::Error + Send + Sync>> {
        let loaded = self.loaded.get().ok_or("Model not loaded")?;

        let input = resize_image_to_tensor(
            &frame.image,
            loaded.input_shape.0,
            loaded.input_shape.1,
            self.config.layout,
            self.config.normalization,
        );

        let outputs = loaded.plan.run(tvec!(input.into_tvalue()))?;
        let output = outputs.first().ok_or("Model produced no output")?;
        let scores = output
            .to_array_view::<f32>()?
            .iter()
            .copied()
            .collect::<Vec<_>>();

        let scores = if self.config.apply_softmax {
            softmax(&scores)
        } else {
            scores
        };

        label_scores(&loaded.labels, &scores)
    }
}
