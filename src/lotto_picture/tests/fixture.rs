use crate::config::Config;
use crate::display::impl_fake::DisplayFake;
use crate::library::logger::impl_fake::LoggerFake;
use crate::library::logger::interface::Logger;
use crate::lotto_picture::main::LottoPicture;
use crate::scorer::impl_fake::ScorerFake;
use crate::scorer::interface::ClassifiedScore;
use crate::storage::impl_fake::StorageFake;
use crate::upload::{decode_upload, UploadedImage};
use image::{DynamicImage, ImageFormat, RgbImage};
use std::io::Cursor;
use std::sync::{Arc, Mutex};

#[allow(dead_code)]
pub struct Fixture {
    pub config: Config,
    pub logger: Arc<LoggerFake>,
    pub scorer: Arc<ScorerFake>,
    pub storage: Arc<StorageFake>,
    pub display: DisplayFake,
    pub lotto_picture: LottoPicture,
}

impl Fixture {
    #[allow(dead_code)]
    pub fn new() -> Self {
        Self::with_scorer(ScorerFake::new)
    }

    pub fn with_scorer(
        scorer: impl FnOnce(Arc<dyn Logger + Send + Sync>) -> ScorerFake,
    ) -> Self {
        let config = Config::default();
        let logger = Arc::new(LoggerFake::new());
        let scorer = Arc::new(scorer(logger.clone()));
        let storage = Arc::new(StorageFake::new());
        let display = DisplayFake::new();
        let lotto_picture = LottoPicture::new(
            config.clone(),
            logger.clone(),
            scorer.clone(),
            storage.clone(),
            Arc::new(Mutex::new(display.clone())),
        );

        Self {
            config,
            logger,
            scorer,
            storage,
            display,
            lotto_picture,
        }
    }
}

pub fn png(width: u32, height: u32) -> Vec<u8> {
    let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, image::Rgb([200, 40, 90])));
    let mut bytes = Cursor::new(Vec::new());
    image
        .write_to(&mut bytes, ImageFormat::Png)
        .expect("encode png");
    bytes.into_inner()
}

pub fn uploaded_image() -> UploadedImage {
    uploaded_image_of(32, 24)
}

pub fn uploaded_image_of(width: u32, height: u32) -> UploadedImage {
    decode_upload(&png(width, height), 1024 * 1024, 800).expect("decode png")
}

/// Descending scores for `labels`, highest first.
pub fn ranking(labels: &[&str]) -> Vec<ClassifiedScore> {
    labels
        .iter()
        .enumerate()
        .map(|(i, label)| ClassifiedScore {
            label: label.to_string(),
            probability: 0.5 / (i + 1) as f32,
        })
        .collect()
}
