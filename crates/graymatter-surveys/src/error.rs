use thiserror::Error;

use crate::SourceError;

#[derive(Debug, Error)]
pub enum AssemblyError {
    #[error("survey source error: {0}")]
    Source(SourceError),
}

#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error("failed to assemble survey {survey_id}: {source}")]
    Assembly {
        survey_id: i32,
        #[source]
        source: AssemblyError,
    },

    #[error("survey {survey_id} at week {week} falls outside the supported date range")]
    DateOutOfRange { survey_id: i32, week: i32 },
}
