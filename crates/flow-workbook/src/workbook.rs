use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{WorkbookError, WorkbookResult};
use crate::sheet::{csv_error, Sheet};

const SHEET_EXTENSION: &str = "csv";

/// A directory of named CSV sheets.
///
/// The directory need not exist until the first [`Workbook::write_sheet`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Workbook {
    root: PathBuf,
}

impl Workbook {
    /// Open a workbook rooted at `root`.
    pub fn open(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File backing the sheet `name`.
    pub fn sheet_path(&self, name: &str) -> WorkbookResult<PathBuf> {
        validate_sheet_name(name)?;
        Ok(self.root.join(format!("{name}.{SHEET_EXTENSION}")))
    }

    /// Returns `true` if the sheet exists.
    pub fn has_sheet(&self, name: &str) -> bool {
        self.sheet_path(name).map(|p| p.is_file()).unwrap_or(false)
    }

    /// Names of all sheets, sorted.
    pub fn sheet_names(&self) -> WorkbookResult<Vec<String>> {
        if !self.root.is_dir() {
            return Ok(Vec::new());
        }
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some(SHEET_EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                names.push(stem.to_string());
            }
        }
        names.sort();
        Ok(names)
    }

    /// Read a whole sheet.
    pub fn read_sheet(&self, name: &str) -> WorkbookResult<Sheet> {
        let path = self.sheet_path(name)?;
        if !path.is_file() {
            return Err(WorkbookError::SheetNotFound {
                name: name.to_string(),
                root: self.root.clone(),
            });
        }

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_path(&path)
            .map_err(|e| csv_error(&path, e))?;
        let headers: Vec<String> = reader
            .headers()
            .map_err(|e| csv_error(&path, e))?
            .iter()
            .map(str::to_string)
            .collect();

        let mut sheet = Sheet::new(headers);
        for record in reader.records() {
            let record = record.map_err(|e| csv_error(&path, e))?;
            sheet.push_row(record.iter().map(str::to_string).collect())?;
        }

        debug!(sheet = name, rows = sheet.len(), "read sheet");
        Ok(sheet)
    }

    /// Replace (or create) a single sheet.
    ///
    /// The sheet is written to a temporary file inside the workbook
    /// directory and then persisted over the target, so readers never see
    /// a partially written sheet and other sheets are left untouched.
    pub fn write_sheet(&self, name: &str, sheet: &Sheet) -> WorkbookResult<PathBuf> {
        let path = self.sheet_path(name)?;
        fs::create_dir_all(&self.root)?;

        let bytes = sheet.to_csv_bytes()?;
        let mut tmp = tempfile::NamedTempFile::new_in(&self.root)?;
        tmp.write_all(&bytes)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&path).map_err(|e| WorkbookError::Io(e.error))?;

        debug!(sheet = name, rows = sheet.len(), path = %path.display(), "wrote sheet");
        Ok(path)
    }
}

fn validate_sheet_name(name: &str) -> WorkbookResult<()> {
    let invalid = name.trim().is_empty()
        || name.contains(['/', '\\'])
        || name == "."
        || name == "..";
    if invalid {
        return Err(WorkbookError::InvalidSheetName(name.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_sheet() -> Sheet {
        let mut sheet = Sheet::new(["Week", "Amount", "note"]);
        sheet
            .push_row(vec!["1".into(), "10.5".into(), "has, comma".into()])
            .unwrap();
        sheet
            .push_row(vec!["2".into(), "4".into(), String::new()])
            .unwrap();
        sheet
    }

    #[test]
    fn write_then_read_sheet() {
        let dir = tempfile::tempdir().unwrap();
        let book = Workbook::open(dir.path());
        let sheet = sample_sheet();

        book.write_sheet("Input1", &sheet).unwrap();
        let read = book.read_sheet("Input1").unwrap();
        assert_eq!(read, sheet);
        assert!(book.has_sheet("Input1"));
    }

    #[test]
    fn missing_sheet_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let book = Workbook::open(dir.path());
        let err = book.read_sheet("Input9").unwrap_err();
        assert!(matches!(err, WorkbookError::SheetNotFound { ref name, .. } if name == "Input9"));
    }

    #[test]
    fn rewriting_one_sheet_keeps_the_others() {
        let dir = tempfile::tempdir().unwrap();
        let book = Workbook::open(dir.path());
        let first = sample_sheet();
        book.write_sheet("Output1", &first).unwrap();

        let mut second = Sheet::new(["Demand"]);
        second.push_row(vec!["1".into()]).unwrap();
        book.write_sheet("Output2", &second).unwrap();

        let mut replaced = Sheet::new(["Demand"]);
        replaced.push_row(vec!["2--1".into()]).unwrap();
        book.write_sheet("Output2", &replaced).unwrap();

        assert_eq!(book.read_sheet("Output1").unwrap(), first);
        assert_eq!(book.read_sheet("Output2").unwrap(), replaced);
        assert_eq!(book.sheet_names().unwrap(), vec!["Output1", "Output2"]);
    }

    #[test]
    fn creates_missing_directory_on_write() {
        let dir = tempfile::tempdir().unwrap();
        let book = Workbook::open(dir.path().join("nested").join("out"));
        assert!(book.sheet_names().unwrap().is_empty());
        book.write_sheet("Output1", &sample_sheet()).unwrap();
        assert!(book.has_sheet("Output1"));
    }

    #[test]
    fn rejects_path_like_sheet_names() {
        let book = Workbook::open("unused");
        assert!(matches!(
            book.sheet_path("../escape"),
            Err(WorkbookError::InvalidSheetName(_))
        ));
        assert!(book.sheet_path("").is_err());
        assert!(!book.has_sheet("a/b"));
    }
}
