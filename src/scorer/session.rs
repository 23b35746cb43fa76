use crate::library::logger::interface::Logger;
use crate::scorer::interface::Scorer;
use std::sync::Arc;

/// Holds a scorer for the lifetime of a run and releases it on drop, on
/// every exit path.
pub struct ScorerSession {
    scorer: Arc<dyn Scorer + Send + Sync>,
    logger: Arc<dyn Logger + Send + Sync>,
}

impl ScorerSession {
    pub fn new(scorer: Arc<dyn Scorer + Send + Sync>, logger: Arc<dyn Logger + Send + Sync>) -> Self {
        Self {
            scorer,
            logger: logger.with_namespace("session"),
        }
    }

    pub fn scorer(&self) -> &Arc<dyn Scorer + Send + Sync> {
        &self.scorer
    }
}

impl Drop for ScorerSession {
    fn drop(&mut self) {
        let _ = self.logger.info("Releasing scorer");
        self.scorer.release();
    }
}
