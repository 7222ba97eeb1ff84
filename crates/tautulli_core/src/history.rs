use serde_json::Value;
use tracing::{info, warn};

use crate::client::TautulliClient;
use crate::errors::TautulliError;
use crate::models::{ApiEnvelope, HistoryPayload, HistoryRecord};

pub const HISTORY_CMD: &str = "get_history";
pub const MOVIE_MEDIA_TYPE: &str = "movie";

pub struct HistoryFetcher<'a> {
    client: &'a TautulliClient,
    user: &'a str,
}

impl<'a> HistoryFetcher<'a> {
    pub fn new(client: &'a TautulliClient, user: &'a str) -> Self {
        Self { client, user }
    }

    pub async fn count(&self) -> Result<u64, TautulliError> {
        let body = self.client.call(HISTORY_CMD, &self.filters(None)).await?;
        let envelope = decode_envelope(body)?;
        let message = envelope.response.message.clone();
        let rejected = || {
            TautulliError::InvalidCredential(
                message
                    .clone()
                    .unwrap_or_else(|| "response is missing recordsFiltered".to_string()),
            )
        };

        let payload: HistoryPayload =
            serde_json::from_value(envelope.response.data).map_err(|_| rejected())?;
        let count = payload
            .records_filtered
            .and_then(|value| value.as_i64())
            .and_then(|value| u64::try_from(value).ok())
            .ok_or_else(rejected)?;
        info!(user = self.user, count, "history records matched");
        Ok(count)
    }

    pub async fn fetch_all(&self, count: u64) -> Result<Vec<HistoryRecord>, TautulliError> {
        let body = self
            .client
            .call(HISTORY_CMD, &self.filters(Some(count)))
            .await?;
        let envelope = decode_envelope(body)?;
        let payload: HistoryPayload = serde_json::from_value(envelope.response.data)
            .map_err(|err| TautulliError::Shape(format!("history payload: {err}")))?;
        let rows = payload
            .data
            .ok_or_else(|| TautulliError::Shape("history payload has no `data` list".to_string()))?;

        if rows.len() as u64 != count {
            warn!(
                expected = count,
                fetched = rows.len(),
                "history changed between count and fetch"
            );
        }

        rows.into_iter()
            .enumerate()
            .map(|(index, row)| decode_record(index, row))
            .collect()
    }

    fn filters(&self, length: Option<u64>) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("media_type", MOVIE_MEDIA_TYPE.to_string()),
            ("search", self.user.to_string()),
        ];
        if let Some(length) = length {
            params.push(("length", length.to_string()));
        }
        params
    }
}

pub(crate) fn decode_envelope(body: Value) -> Result<ApiEnvelope, TautulliError> {
    serde_json::from_value(body)
        .map_err(|err| TautulliError::InvalidJson(format!("unexpected response envelope: {err}")))
}

fn decode_record(index: usize, row: Value) -> Result<HistoryRecord, TautulliError> {
    serde_json::from_value(row)
        .map_err(|err| TautulliError::Shape(format!("history record {index}: {err}")))
}
