//! graymatter-surveys
//!
//! Survey assembly and treatment scheduling. Pure logic over a
//! [`SurveySource`]; the PostgreSQL implementation lives in
//! `graymatter-storage`.

pub mod assembly;
pub mod error;
pub mod schedule;

use std::future::Future;

use graymatter_core::lang::Language;
use graymatter_core::models::matrix::Matrix;
use graymatter_core::models::question::StoredQuestion;

/// Boxed failure of the underlying store.
pub type SourceError = Box<dyn std::error::Error + Send + Sync>;

/// Read access to the question and matrix data a survey is assembled from.
pub trait SurveySource: Send + Sync {
    /// Questions attached to `survey_id`, in attachment order, with text in
    /// `lang`. For a non-default language only translated questions are returned.
    fn questions(
        &self,
        survey_id: i32,
        lang: &Language,
    ) -> impl Future<Output = Result<Vec<StoredQuestion>, SourceError>> + Send;

    /// The matrix `matrix_id` in `lang`, or `None` when no such row exists.
    fn matrix(
        &self,
        matrix_id: i32,
        lang: &Language,
    ) -> impl Future<Output = Result<Option<Matrix>, SourceError>> + Send;
}
