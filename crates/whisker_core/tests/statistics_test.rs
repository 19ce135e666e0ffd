//! Tests for statistics, alerts and dashboard assembly.

use chrono::{Duration, Utc};
use whisker_core::{
    Alert, DashboardData, FeedbackStatistics, NewPredictionFeedback, Prediction, Severity,
};

fn records() -> Vec<whisker_core::PredictionFeedback> {
    let now = Utc::now();
    let cat = Prediction::from_probabilities(0.9, 0.1).unwrap();
    let dog = Prediction::from_probabilities(0.1, 0.9).unwrap();

    let mut rated = NewPredictionFeedback::success(&cat, 100, true, None).into_record(3, now);
    rated.user_feedback = Some(1);
    let mut unhappy =
        NewPredictionFeedback::success(&dog, 300, true, None).into_record(2, now - Duration::seconds(5));
    unhappy.user_feedback = Some(0);
    let failed =
        NewPredictionFeedback::failure(10, "boom").into_record(1, now - Duration::seconds(10));

    // newest first, as returned by the stores
    vec![rated, unhappy, failed]
}

#[test]
fn statistics_from_records() {
    let stats = FeedbackStatistics::from_records(&records());

    assert_eq!(stats.total_predictions, 3);
    assert_eq!(stats.successful_predictions, 2);
    assert_eq!(stats.failed_predictions, 1);
    assert_eq!(stats.predictions_by_class.cat, 1);
    assert_eq!(stats.predictions_by_class.dog, 1);
    assert_eq!(stats.consented_predictions, 2);
    assert_eq!(stats.feedback_count, 2);
    assert_eq!(stats.satisfaction_rate, Some(50.0));
    assert_eq!(stats.average_inference_time_ms, Some(200.0));
}

#[test]
fn empty_statistics_have_no_rates() {
    let stats = FeedbackStatistics::from_records(&[]);
    assert_eq!(stats.total_predictions, 0);
    assert_eq!(stats.success_rate, 0.0);
    assert_eq!(stats.satisfaction_rate, None);
    assert_eq!(stats.average_inference_time_ms, None);
}

#[test]
fn dashboard_series_are_oldest_first() {
    let recent = records();
    let data = DashboardData::new(FeedbackStatistics::from_records(&recent), &recent);

    assert_eq!(data.inference_series.len(), 2);
    assert_eq!(data.inference_series[0].inference_time_ms, 300);
    assert_eq!(data.satisfaction_series.len(), 2);
    assert_eq!(data.satisfaction_series[1].user_feedback, 1);
}

#[test]
fn severity_colors() {
    assert_eq!(Severity::Info.color(), 3447003);
    assert_eq!(Severity::Critical.color(), 10038562);
}

#[test]
fn high_latency_alert_fields() {
    let alert = Alert::high_latency(5000, 2000);
    assert_eq!(*alert.severity(), Severity::Error);
    assert_eq!(alert.fields()[2].value, "x2.5");
}

#[test]
fn model_degradation_alert_reports_gap() {
    let alert = Alert::model_degradation(0.72, 0.85).unwrap();
    assert_eq!(*alert.severity(), Severity::Warning);
    assert_eq!(alert.title(), "Model Performance Degradation");
    let values: Vec<&str> = alert.fields().iter().map(|f| f.value.as_str()).collect();
    assert_eq!(values, vec!["72.00%", "85.00%", "-13.00%"]);
}

#[test]
fn model_degradation_needs_accuracy_below_threshold() {
    assert!(Alert::model_degradation(0.85, 0.85).is_none());
    assert!(Alert::model_degradation(0.97, 0.85).is_none());
    assert!(Alert::model_degradation(0.8499, 0.85).is_some());
}

#[test]
fn deployment_alert_carries_version() {
    let alert = Alert::deployment_success("1.4.0");
    assert_eq!(*alert.severity(), Severity::Info);
    assert!(alert.message().contains("1.4.0"));
    assert_eq!(alert.fields()[0].value, "1.4.0");
}
