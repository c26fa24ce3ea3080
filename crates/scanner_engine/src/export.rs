use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use scanner_core::{title_url, NewTitleRow};
use scanner_logging::scanner_info;
use tempfile::NamedTempFile;

const CSV_HEADERS: [&str; 10] = [
    "Título",
    "Año",
    "Tipo",
    "Plataforma",
    "Monetización",
    "Calidad",
    "IMDB",
    "Géneros",
    "Agregado",
    "URL",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Csv,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("export directory unusable: {0}")]
    OutputDir(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("json encoding failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// `justwatch-new-YYYY-MM-DD.<ext>` for the given day.
pub fn export_filename(day: NaiveDate, format: ExportFormat) -> String {
    format!("justwatch-new-{}.{}", day.format("%Y-%m-%d"), format.extension())
}

pub fn rows_to_json(rows: &[NewTitleRow]) -> Result<String, ExportError> {
    Ok(serde_json::to_string_pretty(rows)?)
}

pub fn rows_to_csv(rows: &[NewTitleRow]) -> String {
    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(CSV_HEADERS.join(","));
    lines.extend(rows.iter().map(csv_line));
    lines.join("\n")
}

fn csv_line(row: &NewTitleRow) -> String {
    let content = row.node.content.clone().unwrap_or_default();
    let offer = row.new_offer.as_ref();
    let fields = [
        quoted(&content.title),
        content
            .original_release_year
            .map(|year| year.to_string())
            .unwrap_or_default(),
        row.node
            .object_type
            .map(|kind| kind.as_str().to_string())
            .unwrap_or_default(),
        quoted(
            offer
                .and_then(|o| o.package.as_ref())
                .map_or("", |p| p.clear_name.as_str()),
        ),
        offer
            .map(|o| o.monetization_type.as_str().to_string())
            .unwrap_or_default(),
        quoted(offer.and_then(|o| o.presentation_type.as_deref()).unwrap_or_default()),
        content
            .imdb_score()
            .map(|score| score.to_string())
            .unwrap_or_default(),
        quoted(&content.genre_names().join(", ")),
        offer
            .and_then(|o| o.last_change_date.clone())
            .unwrap_or_default(),
        quoted(&title_url(&content.full_path)),
    ];
    fields.join(",")
}

/// Free-text fields are always quoted, embedded quotes doubled.
fn quoted(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

/// Writes `rows` into `dir` and returns the written path.
pub fn export_rows(
    rows: &[NewTitleRow],
    format: ExportFormat,
    dir: &Path,
    filename: &str,
) -> Result<PathBuf, ExportError> {
    let content = match format {
        ExportFormat::Json => rows_to_json(rows)?,
        ExportFormat::Csv => rows_to_csv(rows),
    };
    let path = AtomicFileWriter::new(dir.to_path_buf()).write(filename, &content)?;
    scanner_info!("Exported {} rows to {}", rows.len(), path.display());
    Ok(path)
}

fn ensure_output_dir(dir: &Path) -> Result<(), ExportError> {
    if dir.exists() {
        let meta = fs::metadata(dir).map_err(|e| ExportError::OutputDir(e.to_string()))?;
        if !meta.is_dir() {
            return Err(ExportError::OutputDir(format!(
                "{} is not a directory",
                dir.display()
            )));
        }
    } else {
        fs::create_dir_all(dir).map_err(|e| ExportError::OutputDir(e.to_string()))?;
    }
    Ok(())
}

/// Writes a temp file next to the target, then renames it into place.
struct AtomicFileWriter {
    dir: PathBuf,
}

impl AtomicFileWriter {
    fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    fn write(&self, filename: &str, content: &str) -> Result<PathBuf, ExportError> {
        ensure_output_dir(&self.dir)?;

        let target = self.dir.join(filename);
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(content.as_bytes())?;
        tmp.flush()?;
        tmp.as_file_mut().sync_all()?;
        tmp.persist(&target).map_err(|e| ExportError::Io(e.error))?;
        Ok(target)
    }
}
