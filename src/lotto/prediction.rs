use crate::lotto::number_set::LottoNumberSet;
use crate::lotto::selector::select_numbers;
use crate::scorer::interface::ClassifiedScore;
use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LottoPrediction {
    pub numbers: LottoNumberSet,
    pub confidence: f32,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_id: Option<String>,
}

impl LottoPrediction {
    /// Selects numbers from a ranking and keeps the top probability as the
    /// confidence.
    pub fn from_scores<R: Rng + ?Sized>(
        scores: &[ClassifiedScore],
        rng: &mut R,
        timestamp: DateTime<Utc>,
        image_id: Option<String>,
    ) -> Self {
        let confidence = scores
            .first()
            .map(|s| s.probability.clamp(0.0, 1.0))
            .unwrap_or(0.0);

        Self {
            numbers: select_numbers(scores, rng),
            confidence,
            timestamp,
            image_id,
        }
    }

    pub fn confidence_percent(&self) -> u32 {
        (self.confidence * 100.0).round() as u32
    }
}
