//! In-memory implementation of [`FeedbackStore`].

use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use tokio::sync::RwLock;
use whisker_core::{
    FeedbackStatistics, FeedbackUpdate, NewPredictionFeedback, PredictionFeedback,
};
use whisker_error::{FeedbackError, FeedbackErrorKind, WhiskerResult};
use whisker_interface::FeedbackStore;

#[derive(Debug, Default)]
struct Inner {
    records: BTreeMap<i32, PredictionFeedback>,
    last_id: i32,
}

/// Feedback store kept in process memory.
///
/// Used for local runs without PostgreSQL and in tests. The write lock makes
/// every update atomic with respect to other callers.
#[derive(Debug, Default)]
pub struct InMemoryFeedbackStore {
    inner: RwLock<Inner>,
}

impl InMemoryFeedbackStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records.
    pub async fn len(&self) -> usize {
        self.inner.read().await.records.len()
    }

    /// Whether the store holds no records.
    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.records.is_empty()
    }
}

#[async_trait]
impl FeedbackStore for InMemoryFeedbackStore {
    async fn save_prediction(
        &self,
        record: NewPredictionFeedback,
    ) -> WhiskerResult<PredictionFeedback> {
        let mut inner = self.inner.write().await;
        inner.last_id += 1;
        let stored = record.into_record(inner.last_id, Utc::now());
        inner.records.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn get(&self, id: i32) -> WhiskerResult<Option<PredictionFeedback>> {
        Ok(self.inner.read().await.records.get(&id).cloned())
    }

    async fn update_feedback(
        &self,
        id: i32,
        update: FeedbackUpdate,
    ) -> WhiskerResult<PredictionFeedback> {
        let mut inner = self.inner.write().await;
        let record = inner
            .records
            .get_mut(&id)
            .ok_or_else(|| FeedbackError::new(FeedbackErrorKind::NotFound(id)))?;
        record.apply_update(&update)?;
        Ok(record.clone())
    }

    async fn recent_predictions(&self, limit: i64) -> WhiskerResult<Vec<PredictionFeedback>> {
        let limit = usize::try_from(limit).unwrap_or(0);
        let inner = self.inner.read().await;
        let mut records: Vec<_> = inner.records.values().cloned().collect();
        records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then(b.id.cmp(&a.id)));
        records.truncate(limit);
        Ok(records.into_iter().map(PredictionFeedback::anonymized).collect())
    }

    async fn statistics(&self) -> WhiskerResult<FeedbackStatistics> {
        let inner = self.inner.read().await;
        let records: Vec<_> = inner.records.values().cloned().collect();
        Ok(FeedbackStatistics::from_records(&records))
    }

    async fn ping(&self) -> WhiskerResult<()> {
        Ok(())
    }
}
