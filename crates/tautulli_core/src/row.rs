use std::fmt;

use crate::errors::TautulliError;
use crate::models::HistoryRecord;
use crate::rating::Rating;
use crate::timestamp::format_watched_date;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportRow {
    pub title: String,
    pub year: String,
    pub rating: Option<Rating>,
    pub watched_date: String,
}

impl ExportRow {
    pub fn build(record: &HistoryRecord, rating: Option<Rating>) -> Result<Self, TautulliError> {
        let epoch = record.watched_at().ok_or_else(|| {
            TautulliError::Shape(format!(
                "history record `{}` has a non-numeric date",
                record.title()
            ))
        })?;
        Ok(Self {
            title: quote_title(&normalize_title(&record.title())),
            year: record.year(),
            rating,
            watched_date: format_watched_date(epoch)?,
        })
    }

    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ExportRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rating = self.rating.map(|r| r.to_string()).unwrap_or_default();
        write!(
            f,
            "{},{},{},{}",
            self.title, self.year, rating, self.watched_date
        )
    }
}

pub fn normalize_title(raw: &str) -> String {
    raw.split('\n')
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

// Rows are written verbatim, so the quotes live in the value itself.
pub fn quote_title(title: &str) -> String {
    if title.contains(',') {
        format!("\"{title}\"")
    } else {
        title.to_string()
    }
}
