use super::fixture::{png, ranking, Fixture};
use crate::error::AppError;
use crate::lotto_picture::core::{Msg, ScorerStatus};
use crate::lotto_picture::render::Status;
use crate::scorer::impl_fake::ScorerFake;
use crate::scorer::interface::Scorer;
use crate::store::{load_state, PreferencesPatch};

#[test]
fn test_pick_produces_saved_prediction() {
    let fixture = Fixture::with_scorer(|logger| {
        ScorerFake::with_ranking(ranking(&["IE", "AA", "EC", "BA", "GD", "CB", "DD"]), logger)
    });
    let sender = fixture.lotto_picture.sender();
    sender.send(Msg::ImageSelected { bytes: png(64, 48) }).unwrap();
    sender.send(Msg::Generate).unwrap();

    let model = fixture
        .lotto_picture
        .run_until(|model| model.current.is_some() && model.is_settled())
        .unwrap();

    let prediction = model.current.expect("prediction");
    assert_eq!(prediction.numbers.as_slice(), &[1, 6, 12, 23, 34, 45]);
    assert_eq!(prediction.confidence_percent(), 50);
    assert!(prediction.image_id.is_some());

    let stored = load_state(fixture.storage.as_ref())
        .unwrap()
        .expect("stored state");
    assert_eq!(stored.predictions, vec![prediction]);

    assert_eq!(fixture.scorer.score_count(), 1);
    assert!(!fixture.scorer.is_loaded());
    assert!(fixture.scorer.release_count() >= 1);

    let view = fixture.display.last_view().expect("rendered view");
    assert_eq!(view.status, Status::Showing);
    assert_eq!(view.balls.len(), 6);
}

#[test]
fn test_random_scorer_keeps_history_newest_first() {
    let fixture = Fixture::new();
    let sender = fixture.lotto_picture.sender();
    sender.send(Msg::ImageSelected { bytes: png(16, 16) }).unwrap();
    sender.send(Msg::Generate).unwrap();

    let first = fixture
        .lotto_picture
        .run_until(|model| model.current.is_some() && model.is_settled())
        .unwrap();
    let first = first.current.expect("first prediction");

    let second_picture = crate::lotto_picture::main::LottoPicture::new(
        fixture.config.clone(),
        fixture.logger.clone(),
        fixture.scorer.clone(),
        fixture.storage.clone(),
        std::sync::Arc::new(std::sync::Mutex::new(fixture.display.clone())),
    );
    let sender = second_picture.sender();
    sender.send(Msg::ImageSelected { bytes: png(20, 20) }).unwrap();
    sender.send(Msg::Generate).unwrap();

    let model = second_picture
        .run_until(|model| model.current.is_some() && model.is_settled())
        .unwrap();

    assert_eq!(model.app.predictions.len(), 2);
    assert_eq!(model.app.predictions[1], first);
    let stored = load_state(fixture.storage.as_ref()).unwrap().unwrap();
    assert_eq!(stored.predictions, model.app.predictions);
}

#[test]
fn test_model_load_failure_is_reported() {
    let fixture = Fixture::with_scorer(|logger| ScorerFake::failing_load("model.onnx missing", logger));
    let sender = fixture.lotto_picture.sender();
    sender.send(Msg::ImageSelected { bytes: png(8, 8) }).unwrap();
    sender.send(Msg::Generate).unwrap();

    let model = fixture
        .lotto_picture
        .run_until(|model| model.scorer == ScorerStatus::Unavailable && model.is_settled())
        .unwrap();

    assert!(model.current.is_none());
    assert_eq!(
        model.app.error,
        Some(AppError::ScorerUnavailable("model.onnx missing".to_string()))
    );
    assert_eq!(fixture.scorer.score_count(), 0);

    let view = fixture.display.last_view().unwrap();
    assert_eq!(view.status, Status::ModelUnavailable);
    assert!(view.can_retry_model);
}

#[test]
fn test_shutdown_releases_scorer() {
    let fixture = Fixture::new();
    let sender = fixture.lotto_picture.sender();
    sender
        .send(Msg::UpdatePreferences(PreferencesPatch {
            save_history: Some(false),
            ..PreferencesPatch::default()
        }))
        .unwrap();
    sender.send(Msg::Shutdown).unwrap();

    let model = fixture.lotto_picture.run().unwrap();

    assert!(!model.running);
    assert!(!model.app.preferences.save_history);
    assert!(fixture.scorer.release_count() >= 1);
    assert!(fixture
        .logger
        .lines()
        .iter()
        .any(|line| line.contains("Run loop stopped")));
}
