pub mod client;
pub mod csv_utils;
pub mod errors;
pub mod export;
pub mod history;
pub mod models;
pub mod rating;
pub mod row;
pub mod timestamp;

pub use client::{ClientOptions, TautulliClient, API_PATH, DEFAULT_TIMEOUT_SECS};
pub use csv_utils::{resolve_encoding, write_rows, HEADER};
pub use errors::{ExportError, TautulliError};
pub use export::{
    export_history,
    export_history_blocking,
    ExportOptions,
    ExportProgress,
    ExportResult,
    ExportSet,
    ProgressCallback,
};
pub use history::HistoryFetcher;
pub use models::{HistoryRecord, Scalar};
pub use rating::{Rating, RatingResolver};
pub use row::{normalize_title, quote_title, ExportRow};
pub use timestamp::{format_watched_date, local_date};
