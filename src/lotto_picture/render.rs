use crate::display::interface::Display;
use crate::lotto::number_set::{format_number, BallColor, LottoNumberSet};
use crate::lotto::prediction::LottoPrediction;
use crate::lotto_picture::core::{ImageSlot, Model, Notice, ScorerStatus};
use crate::lotto_picture::text::{error_message, format_timestamp, text, Text};
use crate::store::{Language, Theme};
use crate::upload::Preview;
use chrono::FixedOffset;
use std::fmt;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    ModelLoading,
    ModelUnavailable,
    AwaitingImage,
    DecodingImage,
    ImageReady,
    Analyzing,
    Showing,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Ball {
    pub number: u8,
    pub label: String,
    pub color: BallColor,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub when: String,
    pub balls: Vec<Ball>,
    pub confidence_percent: u32,
}

#[derive(Clone)]
pub struct PreviewView {
    pub id: String,
    pub preview: Arc<Preview>,
}

impl fmt::Debug for PreviewView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "PreviewView {{ id: {}, {}x{} }}",
            self.id, self.preview.width, self.preview.height
        )
    }
}

/// Everything a display needs, already localized.
#[derive(Debug, Clone)]
pub struct View {
    pub language: Language,
    pub theme: Theme,
    pub save_history: bool,
    pub status: Status,
    pub status_text: String,
    pub balls: Vec<Ball>,
    pub result_key: Option<String>,
    pub confidence_text: Option<String>,
    pub error_text: Option<String>,
    pub notice_text: Option<String>,
    pub history: Vec<HistoryEntry>,
    pub preview: Option<PreviewView>,
    pub can_generate: bool,
    pub can_retry_model: bool,
}

pub fn balls(numbers: &LottoNumberSet) -> Vec<Ball> {
    numbers
        .iter()
        .map(|number| Ball {
            number,
            label: format_number(number),
            color: BallColor::for_number(number),
        })
        .collect()
}

fn status(model: &Model) -> Status {
    if model.scorer == ScorerStatus::Unavailable {
        return Status::ModelUnavailable;
    }
    if model.app.is_loading {
        return Status::Analyzing;
    }
    if model.current.is_some() {
        return Status::Showing;
    }
    match (&model.image, &model.scorer) {
        (ImageSlot::Empty, _) => Status::AwaitingImage,
        (ImageSlot::Decoding, _) => Status::DecodingImage,
        (ImageSlot::Ready(_), ScorerStatus::Loading) => Status::ModelLoading,
        (ImageSlot::Ready(_), _) => Status::ImageReady,
    }
}

fn status_text(language: Language, status: Status) -> String {
    let key = match status {
        Status::ModelLoading => Text::ModelLoading,
        Status::ModelUnavailable => Text::ModelUnavailable,
        Status::AwaitingImage => Text::UploadPrompt,
        Status::DecodingImage => Text::DecodingImage,
        Status::ImageReady => Text::ImageReady,
        Status::Analyzing => Text::Analyzing,
        Status::Showing => Text::ResultTitle,
    };
    text(language, key).to_string()
}

fn confidence_text(language: Language, prediction: &LottoPrediction) -> String {
    format!(
        "{}: {}%",
        text(language, Text::Confidence),
        prediction.confidence_percent()
    )
}

pub fn view(model: &Model, timezone: FixedOffset) -> View {
    let language = model.app.preferences.language;
    let status = status(model);

    View {
        language,
        theme: model.app.preferences.theme,
        save_history: model.app.preferences.save_history,
        status,
        status_text: status_text(language, status),
        balls: model
            .current
            .as_ref()
            .map(|p| balls(&p.numbers))
            .unwrap_or_default(),
        result_key: model.current.as_ref().map(|p| p.timestamp.to_rfc3339()),
        confidence_text: model
            .current
            .as_ref()
            .map(|p| confidence_text(language, p)),
        error_text: model.app.error.as_ref().map(|e| error_message(language, e)),
        notice_text: model.notice.map(|notice| match notice {
            Notice::Copied => text(language, Text::Copied).to_string(),
        }),
        history: model
            .app
            .predictions
            .iter()
            .map(|p| HistoryEntry {
                when: format_timestamp(language, p.timestamp, timezone),
                balls: balls(&p.numbers),
                confidence_percent: p.confidence_percent(),
            })
            .collect(),
        preview: match &model.image {
            ImageSlot::Ready(image) => Some(PreviewView {
                id: image.id.clone(),
                preview: image.preview.clone(),
            }),
            _ => None,
        },
        can_generate: matches!(model.image, ImageSlot::Ready(_))
            && model.scorer == ScorerStatus::Ready
            && !model.app.is_loading,
        can_retry_model: model.scorer == ScorerStatus::Unavailable,
    }
}

#[derive(Clone)]
pub struct Render {
    display: Arc<Mutex<dyn Display + Send + Sync>>,
    timezone: FixedOffset,
}

impl Render {
    pub fn new(display: Arc<Mutex<dyn Display + Send + Sync>>, timezone: FixedOffset) -> Self {
        Self { display, timezone }
    }

    pub fn render(&self, model: &Model) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let view = view(model, self.timezone);
        let mut display = self
            .display
            .lock()
            .map_err(|_| "display lock poisoned".to_string())?;

        display.render(&view)
    }
}
