use std::fmt;

use serde_json::Value;
use tracing::{debug, warn};

use crate::client::TautulliClient;
use crate::errors::TautulliError;
use crate::history::decode_envelope;
use crate::models::Scalar;

pub const METADATA_CMD: &str = "get_metadata";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Rating(u8);

impl Rating {
    pub const MAX: u8 = 10;

    pub fn new(value: u8) -> Option<Self> {
        (1..=Self::MAX).contains(&value).then_some(Self(value))
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn from_wire(value: &Value) -> Option<Self> {
        let scalar: Scalar = serde_json::from_value(value.clone()).ok()?;
        let raw = scalar.as_f64()?;
        if !raw.is_finite() || raw <= 0.0 {
            return None;
        }
        Self::new(raw.round().min(f64::from(Self::MAX)) as u8)
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

pub struct RatingResolver<'a> {
    client: &'a TautulliClient,
}

impl<'a> RatingResolver<'a> {
    pub fn new(client: &'a TautulliClient) -> Self {
        Self { client }
    }

    pub async fn resolve(&self, rating_key: &str) -> Result<Option<Rating>, TautulliError> {
        let body = self
            .client
            .call(METADATA_CMD, &[("rating_key", rating_key.to_string())])
            .await?;
        let envelope = decode_envelope(body)?;
        Ok(rating_from_metadata(rating_key, &envelope.response.data))
    }
}

fn rating_from_metadata(rating_key: &str, data: &Value) -> Option<Rating> {
    if is_empty_payload(data) {
        debug!(rating_key, "no metadata, leaving rating empty");
        return None;
    }
    match data.get("user_rating") {
        None | Some(Value::Null) => None,
        Some(Value::String(text)) if text.trim().is_empty() => None,
        Some(raw) => {
            let rating = Rating::from_wire(raw);
            if rating.is_none() {
                warn!(rating_key, value = %raw, "ignoring unparsable user rating");
            }
            rating
        }
    }
}

fn is_empty_payload(data: &Value) -> bool {
    match data {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::String(text) => text.is_empty(),
        _ => false,
    }
}
