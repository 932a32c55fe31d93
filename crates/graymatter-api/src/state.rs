use std::sync::Arc;

use graymatter_auth::delivery::PasscodeDelivery;
use graymatter_auth::jwt::TokenIssuer;
use graymatter_storage::PgSurveySource;
use jiff::tz::TimeZone;
use sqlx::PgPool;

/// Shared application state, injected into all route handlers via Axum state.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub surveys: PgSurveySource,
    pub tokens: Arc<TokenIssuer>,
    pub delivery: Arc<dyn PasscodeDelivery>,
    pub temp_passcode_ttl: jiff::SignedDuration,
    pub display_time_zone: TimeZone,
}

impl AppState {
    pub fn new(
        db: PgPool,
        tokens: TokenIssuer,
        delivery: Arc<dyn PasscodeDelivery>,
        temp_passcode_ttl: jiff::SignedDuration,
    ) -> Self {
        Self {
            surveys: PgSurveySource::new(db.clone()),
            db,
            tokens: Arc::new(tokens),
            delivery,
            temp_passcode_ttl,
            display_time_zone: TimeZone::UTC,
        }
    }

    pub fn with_display_time_zone(mut self, zone: TimeZone) -> Self {
        self.display_time_zone = zone;
        self
    }
}
