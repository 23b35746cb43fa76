use crate::library::logger::interface::Logger;
use crate::lotto::label::labels;
use crate::scorer::interface::{rank_outputs, ClassifiedScore, Scorer, ScorerError};
use image::DynamicImage;
use rand::distr::{Distribution, Uniform};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

#[derive(Debug, Clone)]
enum Behavior {
    Random,
    Fixed(Vec<ClassifiedScore>),
    FailLoad(String),
    FailScore(String),
}

pub struct ScorerFake {
    behavior: Behavior,
    logger: Arc<dyn Logger + Send + Sync>,
    loaded: AtomicBool,
    release_count: AtomicUsize,
    score_count: AtomicUsize,
}

impl ScorerFake {
    /// Scores every label with a random probability.
    pub fn new(logger: Arc<dyn Logger + Send + Sync>) -> Self {
        Self::with_behavior(Behavior::Random, logger)
    }

    pub fn with_ranking(ranking: Vec<ClassifiedScore>, logger: Arc<dyn Logger + Send + Sync>) -> Self {
        Self::with_behavior(Behavior::Fixed(ranking), logger)
    }

    pub fn failing_load(message: &str, logger: Arc<dyn Logger + Send + Sync>) -> Self {
        Self::with_behavior(Behavior::FailLoad(message.to_string()), logger)
    }

    pub fn failing_score(message: &str, logger: Arc<dyn Logger + Send + Sync>) -> Self {
        Self::with_behavior(Behavior::FailScore(message.to_string()), logger)
    }

    fn with_behavior(behavior: Behavior, logger: Arc<dyn Logger + Send + Sync>) -> Self {
        Self {
            behavior,
            logger: logger.with_namespace("scorer").with_namespace("fake"),
            loaded: AtomicBool::new(false),
            release_count: AtomicUsize::new(0),
            score_count: AtomicUsize::new(0),
        }
    }

    pub fn release_count(&self) -> usize {
        self.release_count.load(Ordering::SeqCst)
    }

    pub fn score_count(&self) -> usize {
        self.score_count.load(Ordering::SeqCst)
    }

    fn random_ranking(&self) -> Result<Vec<ClassifiedScore>, ScorerError> {
        let mut rng = rand::rng();
        let probability_dist =
            Uniform::new(0.0f32, 1.0).map_err(|e| ScorerError::InferenceFailed(e.to_string()))?;

        let raw: Vec<f32> = labels()
            .iter()
            .map(|_| probability_dist.sample(&mut rng))
            .collect();
        let total: f32 = raw.iter().sum::<f32>().max(f32::EPSILON);
        let normalized: Vec<f32> = raw.iter().map(|p| p / total).collect();

        Ok(rank_outputs(&labels(), &normalized))
    }
}

impl Scorer for ScorerFake {
    fn load(&self) -> Result<(), ScorerError> {
        let _ = self.logger.info("Loading model...");
        if let Behavior::FailLoad(message) = &self.behavior {
            let _ = self.logger.error(&format!("Model load failed: {}", message));
            return Err(ScorerError::ModelUnavailable(message.clone()));
        }
        self.loaded.store(true, Ordering::SeqCst);
        let _ = self.logger.info("Model loaded");
        Ok(())
    }

    fn score(&self, image: &DynamicImage) -> Result<Vec<ClassifiedScore>, ScorerError> {
        if !self.loaded.load(Ordering::SeqCst) {
            return Err(ScorerError::NotLoaded);
        }
        self.score_count.fetch_add(1, Ordering::SeqCst);
        let _ = self.logger.info(&format!(
            "Scoring {}x{} image with fake scorer...",
            image.width(),
            image.height()
        ));

        match &self.behavior {
            Behavior::Fixed(ranking) => Ok(ranking.clone()),
            Behavior::FailScore(message) => Err(ScorerError::InferenceFailed(message.clone())),
            Behavior::Random | Behavior::FailLoad(_) => self.random_ranking(),
        }
    }

    fn release(&self) {
        self.release_count.fetch_add(1, Ordering::SeqCst);
        if self.loaded.swap(false, Ordering::SeqCst) {
            let _ = self.logger.info("Model released");
        }
    }

    fn is_loaded(&self) -> bool {
        self.loaded.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::logger::impl_fake::LoggerFake;

    #[test]
    fn test_random_ranking_covers_all_labels_in_order() {
        let scorer = ScorerFake::new(Arc::new(LoggerFake::new()));
        scorer.load().unwrap();

        let ranking = scorer.score(&DynamicImage::new_rgb8(4, 4)).unwrap();

        assert_eq!(ranking.len(), 45);
        assert!(ranking
            .windows(2)
            .all(|w| w[0].probability >= w[1].probability));
        let total: f32 = ranking.iter().map(|s| s.probability).sum();
        assert!((total - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_score_requires_load() {
        let scorer = ScorerFake::new(Arc::new(LoggerFake::new()));
        assert_eq!(
            scorer.score(&DynamicImage::new_rgb8(4, 4)),
            Err(ScorerError::NotLoaded)
        );
        assert_eq!(scorer.score_count(), 0);
    }

    #[test]
    fn test_failing_load() {
        let logger = LoggerFake::new();
        let scorer = ScorerFake::failing_load("offline", Arc::new(logger.clone()));

        assert_eq!(
            scorer.load(),
            Err(ScorerError::ModelUnavailable("offline".to_string()))
        );
        assert!(!scorer.is_loaded());
        assert!(logger
            .lines()
            .iter()
            .any(|l| l.starts_with("ERROR scorer:fake")));
    }

    #[test]
    fn test_release_counts_every_call() {
        let scorer = ScorerFake::new(Arc::new(LoggerFake::new()));
        scorer.load().unwrap();

        scorer.release();
        scorer.release();

        assert!(!scorer.is_loaded());
        assert_eq!(scorer.release_count(), 2);
    }
}
