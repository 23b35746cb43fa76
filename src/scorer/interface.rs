use image::DynamicImage;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedScore {
    pub label: String,
    pub probability: f32,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScorerError {
    #[error("model unavailable: {0}")]
    ModelUnavailable(String),
    #[error("inference failed: {0}")]
    InferenceFailed(String),
    #[error("model is not loaded")]
    NotLoaded,
}

/// Opaque image classifier over the fixed label set.
///
/// `score` returns one entry per label ordered by descending probability.
/// `release` is safe to call any number of times.
pub trait Scorer: Send + Sync {
    fn load(&self) -> Result<(), ScorerError>;
    fn score(&self, image: &DynamicImage) -> Result<Vec<ClassifiedScore>, ScorerError>;
    fn release(&self);
    fn is_loaded(&self) -> bool;
}

/// Pairs raw model outputs with labels and sorts them, highest first. Extra
/// outputs beyond the label list are ignored.
pub fn rank_outputs(labels: &[String], outputs: &[f32]) -> Vec<ClassifiedScore> {
    let mut ranked: Vec<ClassifiedScore> = labels
        .iter()
        .zip(outputs.iter())
        .map(|(label, &probability)| ClassifiedScore {
            label: label.clone(),
            probability,
        })
        .collect();

    ranked.sort_by(|a, b| b.probability.total_cmp(&a.probability));

    ranked
}
