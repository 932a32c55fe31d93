use futures::future::try_join_all;
use graymatter_core::lang::Language;
use graymatter_core::models::client_survey::ScheduledSurvey;
use graymatter_core::models::protocol::ProtocolSurvey;
use jiff::Span;
use jiff::civil::Date;
use tracing::info;

use crate::SurveySource;
use crate::assembly::assemble_survey;
use crate::error::ScheduleError;

/// Due date of a survey `week` weeks after `start`.
pub fn survey_date(start: Date, week: i32) -> Option<Date> {
    let offset = Span::new().try_days(i64::from(week) * 7).ok()?;
    start.checked_add(offset).ok()
}

/// Compute one dated, snapshotted instance per protocol survey.
///
/// Every snapshot is assembled in the default language before anything is
/// written, so a failure here leaves no partial schedule behind. The result
/// keeps the attachment order of `attachments`.
pub async fn plan_schedule<S: SurveySource>(
    source: &S,
    attachments: &[ProtocolSurvey],
    start: Date,
) -> Result<Vec<ScheduledSurvey>, ScheduleError> {
    let lang = Language::default();

    let planned = try_join_all(attachments.iter().map(|attachment| {
        let lang = &lang;
        async move {
            let due = survey_date(start, attachment.week).ok_or(
                ScheduleError::DateOutOfRange {
                    survey_id: attachment.survey_id,
                    week: attachment.week,
                },
            )?;
            let snapshot = assemble_survey(source, attachment.survey_id, lang)
                .await
                .map_err(|e| ScheduleError::Assembly {
                    survey_id: attachment.survey_id,
                    source: e,
                })?;
            Ok::<_, ScheduleError>(ScheduledSurvey {
                survey_id: attachment.survey_id,
                survey_date: due,
                snapshot,
            })
        }
    }))
    .await?;

    info!(
        surveys = planned.len(),
        start = %start,
        "planned treatment schedule"
    );
    Ok(planned)
}
