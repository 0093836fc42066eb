use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use calamine::{Data, Reader, Xlsx, open_workbook};
use rust_xlsxwriter::{Format, Workbook, Worksheet};
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
}

impl Cell {
    pub fn text(value: impl Into<String>) -> Self {
        Cell::Text(value.into())
    }

    pub fn opt_text(value: Option<&str>) -> Self {
        value.map(Cell::text).unwrap_or(Cell::Empty)
    }

    pub fn number(value: impl Into<f64>) -> Self {
        Cell::Number(value.into())
    }

    pub fn opt_number(value: Option<f64>) -> Self {
        value.map(Cell::Number).unwrap_or(Cell::Empty)
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }
}

/// One named table: a header row followed by data rows.
#[derive(Debug, Clone, PartialEq)]
pub struct Sheet {
    pub name: String,
    pub header: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl Sheet {
    pub fn new(name: impl Into<String>, header: &[&str], rows: Vec<Vec<Cell>>) -> Self {
        Self {
            name: name.into(),
            header: header.iter().map(|h| h.to_string()).collect(),
            rows,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// Start a new workbook holding exactly the given sheets.
    Create,
    /// Keep the existing workbook; replace same-named sheets, append the rest.
    Upsert,
}

#[derive(Debug, Clone, Default)]
pub struct WriteSummary {
    pub path: PathBuf,
    pub written: Vec<String>,
    pub skipped: Vec<String>,
    pub preserved: Vec<String>,
}

/// Write `sheets` to the workbook at `path`.
///
/// Empty sheets are never written; they are listed in `skipped`. When nothing
/// remains to write, `Upsert` leaves the file alone and `Create` removes it.
pub fn write_sheets(path: &Path, sheets: Vec<Sheet>, mode: WriteMode) -> Result<WriteSummary> {
    let mut summary = WriteSummary {
        path: path.to_path_buf(),
        ..WriteSummary::default()
    };

    let mut incoming = Vec::new();
    for sheet in sheets {
        if sheet.is_empty() {
            warn!(sheet = %sheet.name, "no rows, skipping sheet");
            summary.skipped.push(sheet.name);
        } else {
            incoming.push(sheet);
        }
    }
    if incoming.is_empty() {
        if mode == WriteMode::Create && path.exists() {
            fs::remove_file(path)
                .with_context(|| format!("failed removing {}", path.display()))?;
            warn!(path = %path.display(), "nothing to write, removed previous workbook");
        }
        return Ok(summary);
    }

    let mut book = match mode {
        WriteMode::Create => Vec::new(),
        WriteMode::Upsert if is_xlsx_container(path) => read_workbook(path)?,
        WriteMode::Upsert => {
            if path.exists() {
                warn!(path = %path.display(), "existing file is not an xlsx workbook, replacing");
            }
            Vec::new()
        }
    };

    summary.preserved = book
        .iter()
        .map(|s| s.name.clone())
        .filter(|name| !incoming.iter().any(|s| same_sheet_name(&s.name, name)))
        .collect();

    for sheet in incoming {
        let name = sheet.name.clone();
        upsert_sheet(&mut book, sheet);
        summary.written.retain(|w| !same_sheet_name(w, &name));
        summary.written.push(name);
    }

    save_workbook(path, &book)?;
    info!(
        path = %path.display(),
        written = summary.written.len(),
        preserved = summary.preserved.len(),
        "workbook saved"
    );
    Ok(summary)
}

/// Replace the same-named sheet in place, or append. Names match ignoring
/// case, as they do inside a workbook.
pub fn upsert_sheet(book: &mut Vec<Sheet>, sheet: Sheet) {
    match book.iter_mut().find(|s| same_sheet_name(&s.name, &sheet.name)) {
        Some(existing) => *existing = sheet,
        None => book.push(sheet),
    }
}

/// Load every sheet of an existing workbook. The first row of each sheet is its header.
pub fn read_workbook(path: &Path) -> Result<Vec<Sheet>> {
    let mut wb: Xlsx<_> = open_workbook(path)
        .with_context(|| format!("failed opening workbook {}", path.display()))?;

    let mut out = Vec::new();
    for name in wb.sheet_names() {
        let range = wb
            .worksheet_range(&name)
            .with_context(|| format!("failed reading sheet {name}"))?;
        let mut rows = range.rows();
        let header = rows
            .next()
            .map(|row| row.iter().map(data_to_header).collect())
            .unwrap_or_default();
        let rows = rows
            .map(|row| row.iter().map(data_to_cell).collect())
            .collect();
        out.push(Sheet { name, header, rows });
    }
    Ok(out)
}

pub fn sheet_names(path: &Path) -> Result<Vec<String>> {
    let wb: Xlsx<_> = open_workbook(path)
        .with_context(|| format!("failed opening workbook {}", path.display()))?;
    Ok(wb.sheet_names())
}

fn save_workbook(path: &Path, sheets: &[Sheet]) -> Result<()> {
    if sheets.is_empty() {
        return Err(anyhow!("refusing to save a workbook without sheets"));
    }

    let header_format = Format::new().set_bold();
    let mut workbook = Workbook::new();
    for sheet in sheets {
        let worksheet = workbook.add_worksheet();
        worksheet
            .set_name(&sheet.name)
            .with_context(|| format!("invalid sheet name {:?}", sheet.name))?;
        write_sheet(worksheet, sheet, &header_format)
            .with_context(|| format!("write sheet {}", sheet.name))?;
    }

    let tmp = tmp_path(path);
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)
            .with_context(|| format!("failed creating {}", dir.display()))?;
    }
    workbook
        .save(&tmp)
        .with_context(|| format!("failed writing workbook to {}", tmp.display()))?;
    fs::rename(&tmp, path).with_context(|| format!("failed replacing {}", path.display()))?;
    Ok(())
}

fn write_sheet(worksheet: &mut Worksheet, sheet: &Sheet, header_format: &Format) -> Result<()> {
    for (col_idx, title) in sheet.header.iter().enumerate() {
        worksheet
            .write_string_with_format(0, col_idx as u16, title, header_format)
            .with_context(|| format!("write header cell (0,{col_idx})"))?;
    }
    for (row_idx, row) in sheet.rows.iter().enumerate() {
        let row_num = row_idx as u32 + 1;
        for (col_idx, cell) in row.iter().enumerate() {
            let col_num = col_idx as u16;
            match cell {
                Cell::Empty => {}
                Cell::Text(value) => {
                    worksheet
                        .write_string(row_num, col_num, value)
                        .with_context(|| format!("write cell ({row_num},{col_idx})"))?;
                }
                Cell::Number(value) => {
                    worksheet
                        .write_number(row_num, col_num, *value)
                        .with_context(|| format!("write cell ({row_num},{col_idx})"))?;
                }
            }
        }
    }
    Ok(())
}

fn same_sheet_name(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// xlsx files are zip archives; anything else at the path is treated as absent.
fn is_xlsx_container(path: &Path) -> bool {
    let Ok(mut file) = File::open(path) else {
        return false;
    };
    let mut magic = [0u8; 4];
    file.read_exact(&mut magic).is_ok() && magic == *b"PK\x03\x04"
}

fn data_to_header(value: &Data) -> String {
    match data_to_cell(value) {
        Cell::Empty => String::new(),
        Cell::Text(s) => s,
        Cell::Number(n) => n.to_string(),
    }
}

fn data_to_cell(value: &Data) -> Cell {
    match value {
        Data::Empty => Cell::Empty,
        Data::String(s) => Cell::Text(s.clone()),
        Data::Float(f) => Cell::Number(*f),
        Data::Int(i) => Cell::Number(*i as f64),
        Data::DateTime(dt) => Cell::Number(dt.as_f64()),
        other => Cell::Text(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sheet(name: &str, value: f64) -> Sheet {
        Sheet::new(name, &["v"], vec![vec![Cell::Number(value)]])
    }

    #[test]
    fn upsert_replaces_in_place() {
        let mut book = vec![sheet("S", 1.0), sheet("T", 2.0)];
        upsert_sheet(&mut book, sheet("S", 3.0));
        upsert_sheet(&mut book, sheet("U", 4.0));
        let names: Vec<&str> = book.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["S", "T", "U"]);
        assert_eq!(book[0].rows[0][0], Cell::Number(3.0));
    }

    #[test]
    fn upsert_matches_names_ignoring_case() {
        let mut book = vec![sheet("s", 1.0), sheet("T", 2.0)];
        upsert_sheet(&mut book, sheet("S", 3.0));
        let names: Vec<&str> = book.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["S", "T"]);
        assert_eq!(book[0].rows[0][0], Cell::Number(3.0));
    }

    #[test]
    fn tmp_path_keeps_directory() {
        let tmp = tmp_path(Path::new("out/report.xlsx"));
        assert_eq!(tmp, PathBuf::from("out/report.xlsx.tmp"));
    }
}
