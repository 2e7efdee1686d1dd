//! Project exporter: JSON and Excel workbook sinks.
//!
//! # Responsibility
//! - Flatten project records into the six exported fields.
//! - Write them to a destination file in the requested format.
//!
//! # Invariants
//! - Key/column order is fixed: id, description, cost, status,
//!   source_type_id, region_id.
//! - Output is staged in a temporary sibling file and renamed into place, so
//!   the destination either holds a complete export or is left untouched.
//! - Operator-chosen file names never leave the export directory.

use crate::model::project::{LookupId, Project, ProjectId, ProjectStatus};
use chrono::{Local, NaiveDate};
use log::{error, info};
use rust_xlsxwriter::{Format, Workbook, XlsxError};
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Header row of the workbook export, matching JSON key order.
pub const EXPORT_COLUMNS: [&str; 6] = [
    "id",
    "description",
    "cost",
    "status",
    "source_type_id",
    "region_id",
];

const DEFAULT_FILE_STEM: &str = "projects";
const WORKSHEET_NAME: &str = "Projects";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Spreadsheet,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 2] = [ExportFormat::Json, ExportFormat::Spreadsheet];

    pub fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Spreadsheet => "xlsx",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Json => "JSON",
            Self::Spreadsheet => "Excel workbook (.xlsx)",
        }
    }
}

/// Flat exported row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportRecord {
    pub id: ProjectId,
    pub description: String,
    pub cost: f64,
    pub status: ProjectStatus,
    pub source_type_id: LookupId,
    pub region_id: LookupId,
}

impl From<&Project> for ExportRecord {
    fn from(project: &Project) -> Self {
        Self {
            id: project.id,
            description: project.description.clone(),
            cost: project.cost,
            status: project.status,
            source_type_id: project.source_type_id,
            region_id: project.region_id,
        }
    }
}

#[derive(Debug)]
pub enum ExportError {
    Io(io::Error),
    Json(serde_json::Error),
    Workbook(XlsxError),
    /// Operator-supplied name that is a path rather than a plain file name.
    InvalidFileName(String),
}

impl Display for ExportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "export i/o failed: {err}"),
            Self::Json(err) => write!(f, "json serialization failed: {err}"),
            Self::Workbook(err) => write!(f, "workbook generation failed: {err}"),
            Self::InvalidFileName(name) => write!(
                f,
                "invalid file name `{name}`: use a plain name without directories"
            ),
        }
    }
}

impl Error for ExportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Json(err) => Some(err),
            Self::Workbook(err) => Some(err),
            Self::InvalidFileName(_) => None,
        }
    }
}

impl From<io::Error> for ExportError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for ExportError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

impl From<XlsxError> for ExportError {
    fn from(value: XlsxError) -> Self {
        Self::Workbook(value)
    }
}

/// Default export file name for `date`, e.g. `projects_2024-11-02.json`.
pub fn default_file_name(format: ExportFormat, date: NaiveDate) -> String {
    format!(
        "{DEFAULT_FILE_STEM}_{}.{}",
        date.format("%Y-%m-%d"),
        format.extension()
    )
}

/// Destination inside `dir`: `file_name` when given, else the dated default
/// for today's local date. A name without an extension gets the format's.
///
/// # Errors
/// - `ExportError::InvalidFileName` when the name is absolute, contains a
///   path separator or is `.`/`..`.
pub fn resolve_destination(
    dir: &Path,
    file_name: Option<&str>,
    format: ExportFormat,
) -> Result<PathBuf, ExportError> {
    let Some(name) = file_name.map(str::trim).filter(|name| !name.is_empty()) else {
        return Ok(dir.join(default_file_name(format, Local::now().date_naive())));
    };

    if !is_plain_file_name(name) {
        return Err(ExportError::InvalidFileName(name.to_string()));
    }

    if Path::new(name).extension().is_some() {
        Ok(dir.join(name))
    } else {
        Ok(dir.join(format!("{name}.{}", format.extension())))
    }
}

fn is_plain_file_name(name: &str) -> bool {
    !name.contains(['/', '\\'])
        && name != "."
        && name != ".."
        && !Path::new(name).is_absolute()
}

/// Writes `records` to `destination` in `format`.
///
/// # Errors
/// - `ExportError::Io` when the parent directory is missing or unwritable.
/// - `ExportError::Json` / `ExportError::Workbook` on serialization failure.
pub fn export_records(
    records: &[ExportRecord],
    format: ExportFormat,
    destination: &Path,
) -> Result<(), ExportError> {
    let result = write_atomically(destination, |writer| match format {
        ExportFormat::Json => write_json(records, writer),
        ExportFormat::Spreadsheet => write_workbook(records, writer),
    });

    match &result {
        Ok(()) => info!(
            "event=export module=export status=ok format={} records={}",
            format.extension(),
            records.len()
        ),
        Err(err) => error!(
            "event=export module=export status=error format={} error={}",
            format.extension(),
            err
        ),
    }
    result
}

fn write_atomically<F>(destination: &Path, write: F) -> Result<(), ExportError>
where
    F: FnOnce(&mut dyn Write) -> Result<(), ExportError>,
{
    let parent = match destination.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    if !parent.is_dir() {
        return Err(ExportError::Io(io::Error::new(
            io::ErrorKind::NotFound,
            format!("directory `{}` does not exist", parent.display()),
        )));
    }

    let staged = NamedTempFile::new_in(&parent)?;
    {
        let mut writer = BufWriter::new(staged.as_file());
        write(&mut writer)?;
        writer.flush()?;
    }
    staged.as_file().sync_all()?;
    staged.persist(destination).map_err(|err| err.error)?;
    Ok(())
}

fn write_json(records: &[ExportRecord], writer: &mut dyn Write) -> Result<(), ExportError> {
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut *writer, formatter);
    records.serialize(&mut serializer)?;
    writer.write_all(b"\n")?;
    Ok(())
}

fn write_workbook(records: &[ExportRecord], writer: &mut dyn Write) -> Result<(), ExportError> {
    let mut workbook = Workbook::new();
    let header = Format::new().set_bold();
    let sheet = workbook.add_worksheet();
    sheet.set_name(WORKSHEET_NAME)?;

    for (col, title) in (0u16..).zip(EXPORT_COLUMNS) {
        sheet.write_string_with_format(0, col, title, &header)?;
    }
    for (row, record) in (1u32..).zip(records) {
        // Identifiers stay well inside f64's exact integer range.
        sheet.write_number(row, 0, record.id as f64)?;
        sheet.write_string(row, 1, record.description.as_str())?;
        sheet.write_number(row, 2, record.cost)?;
        sheet.write_string(row, 3, record.status.as_str())?;
        sheet.write_number(row, 4, record.source_type_id as f64)?;
        sheet.write_number(row, 5, record.region_id as f64)?;
    }

    writer.write_all(&workbook.save_to_buffer()?)?;
    Ok(())
}
