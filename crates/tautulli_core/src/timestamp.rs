use chrono::{DateTime, Local, NaiveDate};

use crate::errors::TautulliError;

const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn local_date(epoch_secs: i64) -> Result<NaiveDate, TautulliError> {
    DateTime::from_timestamp(epoch_secs, 0)
        .map(|utc| utc.with_timezone(&Local).date_naive())
        .ok_or_else(|| TautulliError::Shape(format!("timestamp out of range: {epoch_secs}")))
}

pub fn format_watched_date(epoch_secs: i64) -> Result<String, TautulliError> {
    Ok(local_date(epoch_secs)?.format(DATE_FORMAT).to_string())
}
