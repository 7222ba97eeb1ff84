use std::fs;
use std::path::Path;

use encoding_rs::{Encoding, UTF_8};

use crate::errors::TautulliError;

pub const HEADER: &str = "Title,Year,Rating10,WatchedDate";

pub fn resolve_encoding(label: &str) -> Result<&'static Encoding, TautulliError> {
    Encoding::for_label(label.trim().as_bytes())
        .ok_or_else(|| TautulliError::Encoding(format!("unsupported encoding: {label}")))
}

pub fn write_rows(path: &Path, encoding: &str, rows: &[String]) -> Result<usize, TautulliError> {
    let enc = resolve_encoding(encoding)?;

    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .quote_style(csv::QuoteStyle::Never)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    csv_writer.write_record([HEADER])?;
    for row in rows {
        csv_writer.write_record([row.as_str()])?;
    }
    csv_writer.flush()?;
    let buffer = csv_writer
        .into_inner()
        .map_err(|err| TautulliError::Io(err.into_error()))?;

    let bytes = if enc == UTF_8 {
        buffer
    } else {
        let utf8 =
            String::from_utf8(buffer).map_err(|err| TautulliError::Encoding(err.to_string()))?;
        let (encoded, _, had_errors) = enc.encode(&utf8);
        if had_errors {
            return Err(TautulliError::Encoding(format!(
                "output contains characters not representable in {}",
                enc.name()
            )));
        }
        encoded.into_owned()
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, bytes)?;
    Ok(rows.len())
}
