use crate::config::Config;
use crate::display::interface::Display;
use crate::library::logger::interface::Logger;
use crate::lotto::prediction::LottoPrediction;
use crate::lotto_picture::core::{Effect, Msg};
use crate::scorer::interface::Scorer;
use crate::storage::interface::{Storage, StorageError};
use crate::store::{load_state, save_state, PersistedState};
use crate::upload::decode_upload;
use chrono::Utc;
use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub struct RunEffect {
    config: Config,
    logger: Arc<dyn Logger + Send + Sync>,
    scorer: Arc<dyn Scorer + Send + Sync>,
    storage: Arc<dyn Storage + Send + Sync>,
    display: Arc<Mutex<dyn Display + Send + Sync>>,
    sender: Sender<Msg>,
    last_saved_revision: Arc<Mutex<u64>>,
}

impl RunEffect {
    pub fn new(
        config: Config,
        logger: Arc<dyn Logger + Send + Sync>,
        scorer: Arc<dyn Scorer + Send + Sync>,
        storage: Arc<dyn Storage + Send + Sync>,
        display: Arc<Mutex<dyn Display + Send + Sync>>,
        sender: Sender<Msg>,
    ) -> Self {
        Self {
            config,
            logger: logger.with_namespace("effect"),
            scorer,
            storage,
            display,
            sender,
            last_saved_revision: Arc::new(Mutex::new(0)),
        }
    }

    pub fn spawn(&self, effects: Vec<Effect>) {
        for effect in effects {
            let self_clone = self.clone();
            std::thread::spawn(move || self_clone.run_effect(effect));
        }
    }

    pub fn run_effect(&self, effect: Effect) {
        let _ = self
            .logger
            .info(&format!("Running effect: {}", effect.to_display_string()));

        match effect {
            Effect::LoadState => {
                let loaded = load_state(self.storage.as_ref());
                if let Err(e) = &loaded {
                    let _ = self.logger.error(&format!("Failed to load saved state: {}", e));
                }
                let _ = self.sender.send(Msg::StateLoaded(loaded));
            }
            Effect::LoadModel => {
                let loaded = self.scorer.load();
                let _ = self.sender.send(Msg::ModelLoadDone(loaded));
            }
            Effect::ReleaseModel => {
                self.scorer.release();
            }
            Effect::DecodeImage { bytes } => {
                let decoded = decode_upload(
                    &bytes,
                    self.config.max_upload_bytes,
                    self.config.preview_max_width,
                );
                let _ = self.sender.send(Msg::ImageDecodeDone(decoded));
            }
            Effect::Score { image } => {
                let result = self.scorer.score(&image.image);
                let _ = self.sender.send(Msg::ScoreDone {
                    image_id: image.id,
                    result,
                });
            }
            Effect::SelectNumbers { scores, image_id } => {
                let prediction =
                    LottoPrediction::from_scores(&scores, &mut rand::rng(), Utc::now(), image_id);
                let _ = self.sender.send(Msg::NumbersSelected(prediction));
            }
            Effect::SaveState { snapshot, revision } => {
                let saved = self.save(&snapshot, revision);
                let _ = self.sender.send(Msg::SaveDone(saved));
            }
            Effect::CopyToClipboard { text } => {
                let copied = match self.display.lock() {
                    Ok(mut display) => display.copy_text(&text),
                    Err(e) => Err(e.to_string().into()),
                };
                if let Err(e) = copied {
                    let _ = self.logger.error(&format!("Failed to copy text: {}", e));
                }
            }
        }
    }

    /// Writes the snapshot unless a newer revision already landed.
    fn save(&self, snapshot: &PersistedState, revision: u64) -> Result<(), StorageError> {
        let mut last_saved = match self.last_saved_revision.lock() {
            Ok(last_saved) => last_saved,
            Err(poisoned) => poisoned.into_inner(),
        };

        if revision <= *last_saved {
            let _ = self.logger.info(&format!(
                "Skipping stale save revision {} (last saved {})",
                revision, *last_saved
            ));
            return Ok(());
        }

        let saved = save_state(self.storage.as_ref(), snapshot);
        match &saved {
            Ok(()) => *last_saved = revision,
            Err(e) => {
                let _ = self.logger.error(&format!("Failed to save state: {}", e));
            }
        }
        saved
    }
}
