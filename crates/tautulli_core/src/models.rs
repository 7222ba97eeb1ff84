use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Clone, Deserialize)]
pub struct ApiEnvelope {
    pub response: ApiResponse,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse {
    #[serde(default)]
    pub result: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Value,
}

// Tautulli sends ids, years and flags as numbers or strings depending on version.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Int(i64),
    Float(f64),
    Text(String),
}

impl Scalar {
    pub fn as_text(&self) -> String {
        match self {
            Scalar::Int(value) => value.to_string(),
            Scalar::Float(value) => value.to_string(),
            Scalar::Text(value) => value.trim().to_string(),
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Scalar::Int(value) => Some(*value as f64),
            Scalar::Float(value) => Some(*value),
            Scalar::Text(value) => value.trim().parse::<f64>().ok(),
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Scalar::Int(value) => Some(*value),
            Scalar::Float(value) if value.fract() == 0.0 => Some(*value as i64),
            Scalar::Float(_) => None,
            Scalar::Text(value) => value.trim().parse::<i64>().ok(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct HistoryPayload {
    #[serde(rename = "recordsFiltered")]
    pub records_filtered: Option<Scalar>,
    #[serde(default)]
    pub data: Option<Vec<Value>>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HistoryRecord {
    pub rating_key: Scalar,
    #[serde(default)]
    pub title: Option<Scalar>,
    #[serde(default)]
    pub year: Option<Scalar>,
    pub watched_status: Scalar,
    pub date: Scalar,
}

impl HistoryRecord {
    pub fn is_watched(&self) -> bool {
        self.watched_status.as_f64() == Some(1.0)
    }

    pub fn rating_key(&self) -> String {
        self.rating_key.as_text()
    }

    pub fn title(&self) -> String {
        self.title.as_ref().map(Scalar::as_text).unwrap_or_default()
    }

    pub fn year(&self) -> String {
        self.year.as_ref().map(Scalar::as_text).unwrap_or_default()
    }

    pub fn watched_at(&self) -> Option<i64> {
        self.date.as_i64()
    }
}
