//! Tests for the in-memory feedback store.

use whisker_core::{FeedbackUpdate, NewPredictionFeedback, Prediction, PredictionResult};
use whisker_database::InMemoryFeedbackStore;
use whisker_error::{FeedbackErrorKind, WhiskerErrorKind};
use whisker_interface::FeedbackStore;

fn consented(cat: f64, ms: i32) -> NewPredictionFeedback {
    let prediction = Prediction::from_probabilities(cat, 1.0 - cat).unwrap();
    NewPredictionFeedback::success(&prediction, ms, true, Some("pet.jpg".to_string()))
}

fn feedback_kind(err: &whisker_error::WhiskerError) -> FeedbackErrorKind {
    match err.kind() {
        WhiskerErrorKind::Feedback(e) => e.kind.clone(),
        other => panic!("expected feedback error, got {}", other),
    }
}

#[tokio::test]
async fn test_save_assigns_increasing_ids() {
    let store = InMemoryFeedbackStore::new();
    let first = store.save_prediction(consented(0.9, 10)).await.unwrap();
    let second = store.save_prediction(consented(0.2, 12)).await.unwrap();

    assert!(second.id > first.id);
    assert_eq!(first.prediction_result, PredictionResult::Cat);
    assert_eq!(second.prediction_result, PredictionResult::Dog);
    assert_eq!(first.filename.as_deref(), Some("pet.jpg"));
    assert_eq!(store.len().await, 2);
}

#[tokio::test]
async fn test_filename_dropped_without_consent() {
    let store = InMemoryFeedbackStore::new();
    let prediction = Prediction::from_probabilities(0.7, 0.3).unwrap();
    let record = NewPredictionFeedback::success(&prediction, 5, false, Some("me.png".into()));

    let stored = store.save_prediction(record).await.unwrap();
    assert_eq!(stored.filename, None);
    assert!(!stored.rgpd_consent);
}

#[tokio::test]
async fn test_update_feedback_applies_rating_and_comment() {
    let store = InMemoryFeedbackStore::new();
    let stored = store.save_prediction(consented(0.9, 10)).await.unwrap();

    let update = FeedbackUpdate {
        user_feedback: Some(1),
        user_comment: Some("spot on".to_string()),
    };
    let updated = store.update_feedback(stored.id, update).await.unwrap();

    assert_eq!(updated.user_feedback, Some(1));
    assert_eq!(updated.user_comment.as_deref(), Some("spot on"));
    let fetched = store.get(stored.id).await.unwrap().unwrap();
    assert_eq!(fetched, updated);
}

#[tokio::test]
async fn test_update_without_consent_is_rejected_and_unchanged() {
    let store = InMemoryFeedbackStore::new();
    let prediction = Prediction::from_probabilities(0.7, 0.3).unwrap();
    let stored = store
        .save_prediction(NewPredictionFeedback::success(&prediction, 5, false, None))
        .await
        .unwrap();

    let err = store
        .update_feedback(
            stored.id,
            FeedbackUpdate {
                user_feedback: Some(1),
                user_comment: None,
            },
        )
        .await
        .unwrap_err();

    assert_eq!(feedback_kind(&err), FeedbackErrorKind::ConsentRequired(stored.id));
    let fetched = store.get(stored.id).await.unwrap().unwrap();
    assert_eq!(fetched.user_feedback, None);
}

#[tokio::test]
async fn test_update_rejects_invalid_rating() {
    let store = InMemoryFeedbackStore::new();
    let stored = store.save_prediction(consented(0.9, 10)).await.unwrap();

    let err = store
        .update_feedback(
            stored.id,
            FeedbackUpdate {
                user_feedback: Some(2),
                user_comment: Some("ignored".into()),
            },
        )
        .await
        .unwrap_err();

    assert_eq!(feedback_kind(&err), FeedbackErrorKind::InvalidRating(2));
    let fetched = store.get(stored.id).await.unwrap().unwrap();
    assert_eq!(fetched.user_comment, None);
}

#[tokio::test]
async fn test_update_unknown_id_is_not_found() {
    let store = InMemoryFeedbackStore::new();
    let err = store
        .update_feedback(99, FeedbackUpdate::default())
        .await
        .unwrap_err();
    assert_eq!(feedback_kind(&err), FeedbackErrorKind::NotFound(99));
}

#[tokio::test]
async fn test_recent_predictions_newest_first_and_limited() {
    let store = InMemoryFeedbackStore::new();
    for ms in 0..10 {
        store.save_prediction(consented(0.9, ms)).await.unwrap();
    }

    let recent = store.recent_predictions(5).await.unwrap();
    assert_eq!(recent.len(), 5);
    let ids: Vec<i32> = recent.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![10, 9, 8, 7, 6]);

    assert!(store.recent_predictions(0).await.unwrap().is_empty());
    assert_eq!(store.recent_predictions(100).await.unwrap().len(), 10);
}

#[tokio::test]
async fn test_statistics_over_mixed_records() {
    let store = InMemoryFeedbackStore::new();
    let a = store.save_prediction(consented(0.9, 100)).await.unwrap();
    let b = store.save_prediction(consented(0.1, 300)).await.unwrap();
    store
        .save_prediction(NewPredictionFeedback::failure(50, "boom"))
        .await
        .unwrap();
    store
        .update_feedback(a.id, FeedbackUpdate { user_feedback: Some(1), user_comment: None })
        .await
        .unwrap();
    store
        .update_feedback(b.id, FeedbackUpdate { user_feedback: Some(0), user_comment: None })
        .await
        .unwrap();

    let stats = store.statistics().await.unwrap();
    assert_eq!(stats.total_predictions, 3);
    assert_eq!(stats.successful_predictions, 2);
    assert_eq!(stats.failed_predictions, 1);
    assert_eq!(stats.predictions_by_class.cat, 1);
    assert_eq!(stats.predictions_by_class.dog, 1);
    assert_eq!(stats.feedback_count, 2);
    assert_eq!(stats.satisfaction_rate, Some(50.0));
    assert_eq!(stats.average_inference_time_ms, Some(200.0));
}

#[tokio::test]
async fn test_ping_succeeds() {
    let store = InMemoryFeedbackStore::new();
    assert!(store.ping().await.is_ok());
    assert!(store.is_empty().await);
}
