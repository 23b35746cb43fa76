use crate::error::AppError;
use crate::lotto::prediction::LottoPrediction;
use crate::lotto_picture::share::share_text;
use crate::scorer::interface::{ClassifiedScore, ScorerError};
use crate::storage::interface::StorageError;
use crate::store::{AppState, PersistedState, PreferencesPatch};
use crate::upload::{UploadError, UploadedImage};

#[derive(Debug, Clone, PartialEq)]
pub enum ScorerStatus {
    Loading,
    Ready,
    Unavailable,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ImageSlot {
    Empty,
    Decoding,
    Ready(UploadedImage),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    Copied,
}

#[derive(Debug, Clone)]
pub struct Model {
    pub scorer: ScorerStatus,
    pub image: ImageSlot,
    pub current: Option<LottoPrediction>,
    pub app: AppState,
    pub pending_generate: bool,
    /// Image id of the scoring run in flight, kept until its numbers land.
    pub scoring: Option<String>,
    pub notice: Option<Notice>,
    pub state_loaded: bool,
    pub save_deferred: bool,
    pub save_revision: u64,
    pub pending_saves: u32,
    pub running: bool,
}

impl Default for Model {
    fn default() -> Self {
        Self {
            scorer: ScorerStatus::Loading,
            image: ImageSlot::Empty,
            current: None,
            app: AppState::default(),
            pending_generate: false,
            scoring: None,
            notice: None,
            state_loaded: false,
            save_deferred: false,
            save_revision: 0,
            pending_saves: 0,
            running: true,
        }
    }
}

impl Model {
    /// True once no work is in flight: stored state merged, no decode,
    /// scoring or save outstanding.
    pub fn is_settled(&self) -> bool {
        self.state_loaded
            && !self.save_deferred
            && self.pending_saves == 0
            && !self.pending_generate
            && self.scoring.is_none()
            && !self.app.is_loading
            && self.image != ImageSlot::Decoding
    }

    fn ready_image_id(&self) -> Option<&str> {
        match &self.image {
            ImageSlot::Ready(image) => Some(image.id.as_str()),
            _ => None,
        }
    }

    pub fn summary(&self) -> String {
        format!(
            "scorer={:?} image={} current={} history={} loading={} pending={} scoring={:?} saves={} error={:?}",
            self.scorer,
            match &self.image {
                ImageSlot::Empty => "empty".to_string(),
                ImageSlot::Decoding => "decoding".to_string(),
                ImageSlot::Ready(image) => image.id.clone(),
            },
            self.current
                .as_ref()
                .map(|p| p.numbers.to_string())
                .unwrap_or_else(|| "-".to_string()),
            self.app.predictions.len(),
            self.app.is_loading,
            self.pending_generate,
            self.scoring,
            self.pending_saves,
            self.app.error,
        )
    }
}

#[derive(Debug)]
pub enum Msg {
    StateLoaded(Result<Option<PersistedState>, StorageError>),
    ModelLoadDone(Result<(), ScorerError>),
    RetryModelLoad,
    ImageSelected { bytes: Vec<u8> },
    ImageDecodeDone(Result<UploadedImage, UploadError>),
    Generate,
    ScoreDone {
        image_id: String,
        result: Result<Vec<ClassifiedScore>, ScorerError>,
    },
    NumbersSelected(LottoPrediction),
    Reset,
    ClearHistory,
    UpdatePreferences(PreferencesPatch),
    CopyShareText,
    SaveDone(Result<(), StorageError>),
    Shutdown,
}

impl Msg {
    pub fn to_display_string(&self) -> String {
        match self {
            Msg::ImageSelected { bytes } => format!("ImageSelected {{ {} bytes }}", bytes.len()),
            Msg::ScoreDone {
                image_id,
                result: Ok(scores),
            } => format!(
                "ScoreDone {{ image_id: {}, top: {:?} }}",
                image_id,
                scores.iter().take(6).map(|s| s.label.as_str()).collect::<Vec<_>>()
            ),
            Msg::StateLoaded(Ok(Some(state))) => format!(
                "StateLoaded(Ok(Some {{ predictions: {}, preferences: {:?} }}))",
                state.predictions.len(),
                state.preferences
            ),
            msg => format!("{:?}", msg),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    LoadState,
    LoadModel,
    ReleaseModel,
    DecodeImage { bytes: Vec<u8> },
    Score { image: UploadedImage },
    SelectNumbers {
        scores: Vec<ClassifiedScore>,
        image_id: Option<String>,
    },
    SaveState {
        snapshot: PersistedState,
        revision: u64,
    },
    CopyToClipboard { text: String },
}

impl Effect {
    pub fn to_display_string(&self) -> String {
        match self {
            Effect::DecodeImage { bytes } => format!("DecodeImage {{ {} bytes }}", bytes.len()),
            Effect::SelectNumbers { scores, image_id } => format!(
                "SelectNumbers {{ scores: {}, image_id: {:?} }}",
                scores.len(),
                image_id
            ),
            Effect::SaveState { snapshot, revision } => format!(
                "SaveState {{ predictions: {}, revision: {} }}",
                snapshot.predictions.len(),
                revision
            ),
            effect => format!("{:?}", effect),
        }
    }
}

pub fn init() -> (Model, Vec<Effect>) {
    (Model::default(), vec![Effect::LoadState, Effect::LoadModel])
}

pub fn transition(model: Model, msg: Msg) -> (Model, Vec<Effect>) {
    let mut model = model;

    match msg {
        Msg::StateLoaded(loaded) => {
            model.state_loaded = true;
            match loaded {
                Ok(Some(persisted)) => model.app.restore(persisted),
                Ok(None) => {}
                Err(error) => {
                    model.app.error = Some(AppError::StorageUnavailable(error.to_string()));
                }
            }
            if std::mem::take(&mut model.save_deferred) {
                save(model)
            } else {
                (model, vec![])
            }
        }

        // Scorer lifecycle
        Msg::ModelLoadDone(Ok(())) => {
            model.scorer = ScorerStatus::Ready;
            try_start_scoring(model)
        }
        Msg::ModelLoadDone(Err(error)) => {
            model.scorer = ScorerStatus::Unavailable;
            model.pending_generate = false;
            model.app.set_error(Some(AppError::from(error)));
            (model, vec![Effect::ReleaseModel])
        }
        Msg::RetryModelLoad => match model.scorer {
            ScorerStatus::Unavailable => {
                model.scorer = ScorerStatus::Loading;
                model.app.set_error(None);
                (model, vec![Effect::LoadModel])
            }
            _ => (model, vec![]),
        },

        // Upload
        Msg::ImageSelected { bytes } => {
            model.image = ImageSlot::Decoding;
            model.current = None;
            model.notice = None;
            model.app.set_error(None);
            (model, vec![Effect::DecodeImage { bytes }])
        }
        Msg::ImageDecodeDone(Ok(image)) => {
            model.image = ImageSlot::Ready(image);
            try_start_scoring(model)
        }
        Msg::ImageDecodeDone(Err(error)) => {
            model.image = ImageSlot::Empty;
            model.pending_generate = false;
            model.app.set_error(Some(AppError::InvalidInputImage(error)));
            (model, vec![])
        }

        // Generation
        Msg::Generate => {
            if model.image == ImageSlot::Empty {
                model.app.set_error(Some(AppError::NoImage));
                return (model, vec![]);
            }
            if model.scorer == ScorerStatus::Unavailable {
                model
                    .app
                    .set_error(Some(AppError::from(ScorerError::NotLoaded)));
                return (model, vec![]);
            }
            if let Some(in_flight) = &model.scoring {
                // A run for a replaced image still counts as in flight; queue
                // behind it instead of scoring twice.
                if model.ready_image_id() != Some(in_flight.as_str()) {
                    model.pending_generate = true;
                }
                return (model, vec![]);
            }
            model.pending_generate = true;
            try_start_scoring(model)
        }
        Msg::ScoreDone { image_id, result } => {
            if model.scoring.as_deref() != Some(image_id.as_str()) {
                return (model, vec![]);
            }
            if model.ready_image_id() != Some(image_id.as_str()) {
                model.scoring = None;
                return try_start_scoring(model);
            }
            match result {
                Ok(scores) => (
                    model,
                    vec![Effect::SelectNumbers {
                        scores,
                        image_id: Some(image_id),
                    }],
                ),
                Err(error) => {
                    model.scoring = None;
                    model.app.set_error(Some(AppError::from(error)));
                    (model, vec![])
                }
            }
        }
        Msg::NumbersSelected(prediction) => {
            let Some(image_id) = prediction.image_id.as_deref() else {
                return (model, vec![]);
            };
            if model.scoring.as_deref() != Some(image_id) {
                return (model, vec![]);
            }
            if model.ready_image_id() != Some(image_id) {
                model.scoring = None;
                return try_start_scoring(model);
            }
            model.scoring = None;
            model.current = Some(prediction.clone());
            model.app.add_prediction(prediction);
            model.app.set_loading(false);
            save(model)
        }
        Msg::Reset => {
            model.image = ImageSlot::Empty;
            model.current = None;
            model.notice = None;
            model.pending_generate = false;
            model.app.set_error(None);
            (model, vec![])
        }

        // History and preferences
        Msg::ClearHistory => {
            model.app.clear_predictions();
            save(model)
        }
        Msg::UpdatePreferences(patch) => {
            if patch.is_empty() {
                return (model, vec![]);
            }
            model.app.update_preferences(&patch);
            save(model)
        }
        Msg::CopyShareText => match &model.current {
            Some(prediction) => {
                let text = share_text(model.app.preferences.language, &prediction.numbers);
                model.notice = Some(Notice::Copied);
                (model, vec![Effect::CopyToClipboard { text }])
            }
            None => (model, vec![]),
        },
        Msg::SaveDone(_) => {
            model.pending_saves = model.pending_saves.saturating_sub(1);
            (model, vec![])
        }

        Msg::Shutdown => {
            model.running = false;
            (model, vec![])
        }
    }
}

/// Fires a pending generate once both the image and the scorer are ready.
fn try_start_scoring(mut model: Model) -> (Model, Vec<Effect>) {
    if !model.pending_generate || model.scoring.is_some() {
        return (model, vec![]);
    }

    let image = match &model.image {
        ImageSlot::Ready(image) if model.scorer == ScorerStatus::Ready => Some(image.clone()),
        _ => None,
    };
    let Some(image) = image else {
        return (model, vec![]);
    };

    model.pending_generate = false;
    model.scoring = Some(image.id.clone());
    model.current = None;
    model.notice = None;
    model.app.set_error(None);
    model.app.set_loading(true);

    (model, vec![Effect::Score { image }])
}

/// Saves wait for the stored state so a write never drops history that has
/// not been read yet.
fn save(mut model: Model) -> (Model, Vec<Effect>) {
    if !model.state_loaded {
        model.save_deferred = true;
        return (model, vec![]);
    }

    model.save_revision += 1;
    model.pending_saves += 1;
    let effect = Effect::SaveState {
        snapshot: model.app.persisted(),
        revision: model.save_revision,
    };
    (model, vec![effect])
}
