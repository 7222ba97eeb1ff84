use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use secrecy::SecretString;
use tokio::runtime::Builder;
use tracing::{debug, info, warn};

use crate::client::{ClientOptions, TautulliClient, DEFAULT_TIMEOUT_SECS};
use crate::csv_utils::write_rows;
use crate::errors::ExportError;
use crate::history::HistoryFetcher;
use crate::rating::RatingResolver;
use crate::row::ExportRow;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportProgress {
    Started { user: String, csv_path: PathBuf },
    Exported { count: usize, title: String },
    Finished { count: usize },
}

pub type ProgressCallback = Arc<dyn Fn(ExportProgress) + Send + Sync + 'static>;

pub struct ExportOptions {
    pub base_url: String,
    pub api_key: SecretString,
    pub user: String,
    pub csv_path: PathBuf,
    pub encoding: String,
    pub timeout_secs: u64,
    pub progress_callback: Option<ProgressCallback>,
}

impl ExportOptions {
    pub fn new(
        base_url: impl Into<String>,
        api_key: SecretString,
        user: impl Into<String>,
        csv_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            api_key,
            user: user.into(),
            csv_path: csv_path.into(),
            encoding: "utf-8".to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            progress_callback: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ExportResult {
    pub csv_path: PathBuf,
    pub user: String,
    pub rows: Vec<String>,
    pub total_count: u64,
    pub processed_count: usize,
    pub watched_count: usize,
}

impl ExportResult {
    pub fn exported_count(&self) -> usize {
        self.rows.len()
    }
}

#[derive(Debug, Default)]
pub struct ExportSet {
    seen: HashSet<String>,
    rows: Vec<String>,
}

impl ExportSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, row: &ExportRow) -> bool {
        let line = row.render();
        if self.seen.contains(&line) {
            return false;
        }
        self.seen.insert(line.clone());
        self.rows.push(line);
        true
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn into_rows(self) -> Vec<String> {
        self.rows
    }
}

pub async fn export_history(options: ExportOptions) -> Result<ExportResult, ExportError> {
    let ExportOptions {
        base_url,
        api_key,
        user,
        csv_path,
        encoding,
        timeout_secs,
        progress_callback,
    } = options;
    let notify = |event: ExportProgress| {
        if let Some(callback) = progress_callback.as_ref() {
            callback(event);
        }
    };

    let client = TautulliClient::new(ClientOptions {
        base_url,
        api_key,
        timeout: Duration::from_secs(timeout_secs),
    })?;
    debug!(endpoint = %client.endpoint(), "client ready");

    let fetcher = HistoryFetcher::new(&client, &user);
    let total_count = fetcher.count().await?;
    if total_count == 0 {
        return Err(ExportError::InvalidUser(format!(
            "no movie history found for user {user}"
        )));
    }
    let records = fetcher.fetch_all(total_count).await?;

    notify(ExportProgress::Started {
        user: user.clone(),
        csv_path: csv_path.clone(),
    });

    let resolver = RatingResolver::new(&client);
    let mut export_set = ExportSet::new();
    let mut watched_count = 0usize;
    for record in records.iter().filter(|record| record.is_watched()) {
        watched_count += 1;
        let rating = resolver.resolve(&record.rating_key()).await?;
        let row = ExportRow::build(record, rating)?;
        if export_set.insert(&row) {
            notify(ExportProgress::Exported {
                count: export_set.len(),
                title: row.title.clone(),
            });
        } else {
            debug!(row = %row, "skipping duplicate row");
        }
    }

    notify(ExportProgress::Finished {
        count: export_set.len(),
    });

    let rows = export_set.into_rows();
    write_rows(&csv_path, &encoding, &rows)?;
    info!(
        user = %user,
        exported = rows.len(),
        watched = watched_count,
        path = %csv_path.display(),
        "export written"
    );

    Ok(ExportResult {
        csv_path,
        user,
        rows,
        total_count,
        processed_count: records.len(),
        watched_count,
    })
}

pub fn export_history_blocking(options: ExportOptions) -> Result<ExportResult, ExportError> {
    let rt = Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|err| ExportError::Runtime(err.to_string()))?;
    let csv_path = options.csv_path.clone();
    rt.block_on(async move {
        tokio::select! {
            result = export_history(options) => result,
            _ = wait_for_interrupt() => Err(ExportError::Interrupted { csv_path }),
        }
    })
}

async fn wait_for_interrupt() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "unable to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
}
