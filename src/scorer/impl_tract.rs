use crate::library::logger::interface::Logger;
use crate::lotto::label::labels;
use crate::scorer::image::resize_image_to_tensor;
use crate::scorer::interface::{rank_outputs, ClassifiedScore, Scorer, ScorerError};
use crate::scorer::model_config::{InputLayout, ModelConfig};
use image::DynamicImage;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tract_onnx::prelude::*;

type Plan = SimplePlan<TypedFact, Box<dyn TypedOp>, TypedModel>;

const MODEL_FILE_NAME: &str = "model.onnx";

pub struct ScorerTract {
    config: ModelConfig,
    labels: Vec<String>,
    logger: Arc<dyn Logger + Send + Sync>,
    model: Mutex<Option<Plan>>,
}

impl ScorerTract {
    pub fn new(config: ModelConfig, logger: Arc<dyn Logger + Send + Sync>) -> Self {
        let mut all = labels();
        all.truncate(config.num_classes);

        Self {
            config,
            labels: all,
            logger: logger.with_namespace("scorer").with_namespace("tract"),
            model: Mutex::new(None),
        }
    }

    fn input_shape(&self) -> [usize; 4] {
        let size = self.config.image_size as usize;
        match self.config.input_layout {
            InputLayout::Nhwc => [1, size, size, 3],
            InputLayout::Nchw => [1, 3, size, size],
        }
    }

    fn build_plan(&self) -> Result<Plan, ScorerError> {
        let path = resolve_model_path(&self.config.model_url)?;
        let unavailable = |e: TractError| ScorerError::ModelUnavailable(format!("{}: {}", path.display(), e));

        tract_onnx::onnx()
            .model_for_path(&path)
            .map_err(unavailable)?
            .with_input_fact(0, f32::fact(self.input_shape()).into())
            .map_err(unavailable)?
            .into_optimized()
            .map_err(unavailable)?
            .into_runnable()
            .map_err(unavailable)
    }
}

/// Accepts a filesystem path or a `file://` URL. A directory resolves to the
/// `model.onnx` inside it.
pub fn resolve_model_path(model_url: &str) -> Result<PathBuf, ScorerError> {
    if model_url.starts_with("http://") || model_url.starts_with("https://") {
        return Err(ScorerError::ModelUnavailable(format!(
            "remote model urls are not supported: {}",
            model_url
        )));
    }

    let raw = model_url.strip_prefix("file://").unwrap_or(model_url);
    if raw.is_empty() {
        return Err(ScorerError::ModelUnavailable("model url is empty".to_string()));
    }

    let mut path = PathBuf::from(raw);
    if path.is_dir() {
        path.push(MODEL_FILE_NAME);
    }

    if !path.is_file() {
        return Err(ScorerError::ModelUnavailable(format!(
            "model not found at {}",
            path.display()
        )));
    }

    Ok(path)
}

impl Scorer for ScorerTract {
    fn load(&self) -> Result<(), ScorerError> {
        let _ = self
            .logger
            .info(&format!("Loading model from {}...", self.config.model_url));

        let plan = match self.build_plan() {
            Ok(plan) => plan,
            Err(e) => {
                let _ = self.logger.error(&format!("Failed to load model: {}", e));
                return Err(e);
            }
        };

        let mut model = self
            .model
            .lock()
            .map_err(|_| ScorerError::ModelUnavailable("model lock poisoned".to_string()))?;
        *model = Some(plan);

        let _ = self.logger.info("Model loaded");
        Ok(())
    }

    fn score(&self, image: &DynamicImage) -> Result<Vec<ClassifiedScore>, ScorerError> {
        if image.width() == 0 || image.height() == 0 {
            return Err(ScorerError::InferenceFailed("image has no pixels".to_string()));
        }

        let model = self
            .model
            .lock()
            .map_err(|_| ScorerError::InferenceFailed("model lock poisoned".to_string()))?;
        let plan = model.as_ref().ok_or(ScorerError::NotLoaded)?;

        let input = resize_image_to_tensor(image, self.config.image_size, self.config.input_layout)
            .map_err(|e| ScorerError::InferenceFailed(e.to_string()))?;

        let outputs = plan
            .run(tvec!(input.into_tvalue()))
            .map_err(|e| ScorerError::InferenceFailed(e.to_string()))?;

        let output = outputs
            .first()
            .ok_or_else(|| ScorerError::InferenceFailed("model produced no outputs".to_string()))?;
        let values: Vec<f32> = output
            .to_array_view::<f32>()
            .map_err(|e| ScorerError::InferenceFailed(e.to_string()))?
            .iter()
            .copied()
            .collect();

        if values.is_empty() {
            return Err(ScorerError::InferenceFailed("model output is empty".to_string()));
        }
        if values.len() != self.labels.len() {
            let _ = self.logger.error(&format!(
                "Model produced {} scores for {} labels",
                values.len(),
                self.labels.len()
            ));
        }

        Ok(rank_outputs(&self.labels, &values))
    }

    fn release(&self) {
        let mut model = match self.model.lock() {
            Ok(model) => model,
            Err(poisoned) => poisoned.into_inner(),
        };
        if model.take().is_some() {
            let _ = self.logger.info("Model released");
        }
    }

    fn is_loaded(&self) -> bool {
        self.model.lock().map(|m| m.is_some()).unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::logger::impl_fake::LoggerFake;

    fn scorer(model_url: &str) -> ScorerTract {
        let config = ModelConfig {
            model_url: model_url.to_string(),
            ..ModelConfig::default()
        };
        ScorerTract::new(config, Arc::new(LoggerFake::new()))
    }

    #[test]
    fn test_remote_urls_are_unavailable() {
        let result = resolve_model_path("https://example.com/model/");
        assert!(matches!(result, Err(ScorerError::ModelUnavailable(_))));
    }

    #[test]
    fn test_missing_file_is_unavailable() {
        let result = resolve_model_path("file:///definitely/not/here/model.onnx");
        assert!(matches!(result, Err(ScorerError::ModelUnavailable(_))));
    }

    #[test]
    fn test_directory_resolves_to_model_file() {
        let dir = std::env::temp_dir().join(format!("lotto-picture-model-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join(MODEL_FILE_NAME), b"not really onnx").unwrap();

        let path = resolve_model_path(dir.to_str().unwrap()).unwrap();
        assert_eq!(path, dir.join(MODEL_FILE_NAME));

        let tract = scorer(dir.to_str().unwrap());
        assert!(matches!(tract.load(), Err(ScorerError::ModelUnavailable(_))));
        assert!(!tract.is_loaded());

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_score_before_load() {
        let tract = scorer("./missing");
        let image = DynamicImage::new_rgb8(8, 8);

        assert_eq!(tract.score(&image), Err(ScorerError::NotLoaded));
    }

    #[test]
    fn test_release_is_idempotent() {
        let tract = scorer("./missing");
        tract.release();
        tract.release();
        assert!(!tract.is_loaded());
    }

    #[test]
    fn test_labels_follow_num_classes() {
        let config = ModelConfig {
            num_classes: 10,
            ..ModelConfig::default()
        };
        let tract = ScorerTract::new(config, Arc::new(LoggerFake::new()));
        assert_eq!(tract.labels.len(), 10);
    }
}
