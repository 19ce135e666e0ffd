//! PostgreSQL implementation of [`FeedbackStore`].

use crate::models::{FeedbackChangeset, FeedbackRow, NewFeedbackRow};
use crate::schema::prediction_feedback;
use crate::{DatabaseResult, PgPool};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use whisker_core::{
    FeedbackCounts, FeedbackStatistics, FeedbackUpdate, NewPredictionFeedback, PredictionFeedback,
};
use whisker_error::{
    DatabaseError, DatabaseErrorKind, FeedbackError, FeedbackErrorKind, WhiskerResult,
};
use whisker_interface::FeedbackStore;

/// Database-backed feedback store.
///
/// Diesel is synchronous, so every call checks a connection out of the pool
/// and runs on the blocking thread pool.
#[derive(Clone)]
pub struct PostgresFeedbackStore {
    pool: PgPool,
}

impl PostgresFeedbackStore {
    /// Create a store over the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Run migrations on a pooled connection.
    ///
    /// # Errors
    ///
    /// Returns an error if no connection can be obtained or a migration fails.
    pub async fn migrate(&self) -> WhiskerResult<()> {
        self.with_conn(|conn| Ok(crate::run_migrations(conn)?)).await
    }

    async fn with_conn<T, F>(&self, f: F) -> WhiskerResult<T>
    where
        F: FnOnce(&mut PgConnection) -> WhiskerResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut conn = pool
                .get()
                .map_err(|e| DatabaseError::new(DatabaseErrorKind::Pool(e.to_string())))?;
            f(&mut conn)
        })
        .await
        .map_err(|e| DatabaseError::new(DatabaseErrorKind::Query(e.to_string())))?
    }
}

/// Failure inside the update transaction. Either variant rolls it back.
enum UpdateFailure {
    Rejected(FeedbackError),
    Database(DatabaseError),
}

impl From<diesel::result::Error> for UpdateFailure {
    fn from(err: diesel::result::Error) -> Self {
        UpdateFailure::Database(err.into())
    }
}

fn update_in_transaction(
    conn: &mut PgConnection,
    id: i32,
    update: &FeedbackUpdate,
) -> Result<PredictionFeedback, UpdateFailure> {
    conn.transaction(|conn| {
        let row = prediction_feedback::table
            .find(id)
            .select(FeedbackRow::as_select())
            .for_update()
            .first(conn)
            .optional()?
            .ok_or_else(|| {
                UpdateFailure::Rejected(FeedbackError::new(FeedbackErrorKind::NotFound(id)))
            })?;

        let mut record = PredictionFeedback::try_from(row).map_err(UpdateFailure::Database)?;
        record.apply_update(update).map_err(UpdateFailure::Rejected)?;
        if update.is_empty() {
            return Ok(record);
        }

        let updated = diesel::update(prediction_feedback::table.find(id))
            .set(&FeedbackChangeset::from(&record))
            .returning(FeedbackRow::as_returning())
            .get_result(conn)?;
        PredictionFeedback::try_from(updated).map_err(UpdateFailure::Database)
    })
}

fn load_counts(conn: &mut PgConnection) -> DatabaseResult<FeedbackCounts> {
    use crate::schema::prediction_feedback::dsl::*;

    conn.build_transaction()
        .read_only()
        .run(|conn| {
            let total = prediction_feedback.count().get_result(conn)?;
            let successful = prediction_feedback
                .filter(success.eq(true))
                .count()
                .get_result(conn)?;
            let cats = prediction_feedback
                .filter(prediction_result.eq("cat"))
                .count()
                .get_result(conn)?;
            let dogs = prediction_feedback
                .filter(prediction_result.eq("dog"))
                .count()
                .get_result(conn)?;
            let consented = prediction_feedback
                .filter(rgpd_consent.eq(true))
                .count()
                .get_result(conn)?;
            let positive = prediction_feedback
                .filter(user_feedback.eq(1))
                .count()
                .get_result(conn)?;
            let negative = prediction_feedback
                .filter(user_feedback.eq(0))
                .count()
                .get_result(conn)?;
            let time_sum: Option<i64> = prediction_feedback
                .filter(success.eq(true))
                .select(diesel::dsl::sum(inference_time_ms))
                .get_result(conn)?;

            Ok::<_, diesel::result::Error>(FeedbackCounts {
                total,
                successful,
                cats,
                dogs,
                consented,
                positive,
                negative,
                successful_inference_time_ms: time_sum.unwrap_or(0),
            })
        })
        .map_err(Into::into)
}

#[async_trait]
impl FeedbackStore for PostgresFeedbackStore {
    #[tracing::instrument(skip(self, record), fields(success = record.success))]
    async fn save_prediction(
        &self,
        record: NewPredictionFeedback,
    ) -> WhiskerResult<PredictionFeedback> {
        let row = NewFeedbackRow::from(record);
        self.with_conn(move |conn| {
            let inserted = diesel::insert_into(prediction_feedback::table)
                .values(&row)
                .returning(FeedbackRow::as_returning())
                .get_result(conn)
                .map_err(DatabaseError::from)?;
            tracing::debug!(id = inserted.id, "Stored prediction feedback");
            Ok(PredictionFeedback::try_from(inserted)?)
        })
        .await
    }

    async fn get(&self, id: i32) -> WhiskerResult<Option<PredictionFeedback>> {
        self.with_conn(move |conn| {
            let row = prediction_feedback::table
                .find(id)
                .select(FeedbackRow::as_select())
                .first(conn)
                .optional()
                .map_err(DatabaseError::from)?;
            Ok(row.map(PredictionFeedback::try_from).transpose()?)
        })
        .await
    }

    #[tracing::instrument(skip(self, update))]
    async fn update_feedback(
        &self,
        id: i32,
        update: FeedbackUpdate,
    ) -> WhiskerResult<PredictionFeedback> {
        self.with_conn(move |conn| match update_in_transaction(conn, id, &update) {
            Ok(record) => Ok(record),
            Err(UpdateFailure::Rejected(e)) => Err(e.into()),
            Err(UpdateFailure::Database(e)) => Err(e.into()),
        })
        .await
    }

    async fn recent_predictions(&self, limit: i64) -> WhiskerResult<Vec<PredictionFeedback>> {
        if limit <= 0 {
            return Ok(Vec::new());
        }
        self.with_conn(move |conn| {
            let rows = prediction_feedback::table
                .order((
                    prediction_feedback::timestamp.desc(),
                    prediction_feedback::id.desc(),
                ))
                .limit(limit)
                .select(FeedbackRow::as_select())
                .load(conn)
                .map_err(DatabaseError::from)?;
            rows.into_iter()
                .map(|row| Ok(PredictionFeedback::try_from(row)?.anonymized()))
                .collect()
        })
        .await
    }

    async fn statistics(&self) -> WhiskerResult<FeedbackStatistics> {
        self.with_conn(|conn| Ok(FeedbackStatistics::from_counts(load_counts(conn)?)))
            .await
    }

    async fn ping(&self) -> WhiskerResult<()> {
        self.with_conn(|conn| {
            diesel::sql_query("SELECT 1")
                .execute(conn)
                .map_err(DatabaseError::from)?;
            Ok(())
        })
        .await
    }
}
