use crate::error::{WorkbookError, WorkbookResult};

/// A rectangular table of string cells with a header row.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Sheet {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Sheet {
    /// Create an empty sheet with the given headers.
    pub fn new<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Append a row. The row must have exactly one cell per header.
    pub fn push_row(&mut self, row: Vec<String>) -> WorkbookResult<()> {
        if row.len() != self.headers.len() {
            return Err(WorkbookError::RowWidth {
                row: self.rows.len(),
                expected: self.headers.len(),
                actual: row.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Number of data rows (header excluded).
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of the column whose header equals `name` after trimming.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h.trim() == name)
    }

    /// Render the sheet as CSV bytes.
    pub fn to_csv_bytes(&self) -> WorkbookResult<Vec<u8>> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        self.write_records(&mut writer)
            .map_err(|e| csv_error("<memory>", e))?;
        writer
            .into_inner()
            .map_err(|e| WorkbookError::Io(e.into_error()))
    }

    pub(crate) fn write_records<W: std::io::Write>(
        &self,
        writer: &mut csv::Writer<W>,
    ) -> Result<(), csv::Error> {
        writer.write_record(&self.headers)?;
        for row in &self.rows {
            writer.write_record(row)?;
        }
        writer.flush()?;
        Ok(())
    }
}

pub(crate) fn csv_error(path: impl Into<std::path::PathBuf>, e: csv::Error) -> WorkbookError {
    WorkbookError::Csv {
        path: path.into(),
        detail: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_row_checks_width() {
        let mut sheet = Sheet::new(["a", "b"]);
        sheet.push_row(vec!["1".into(), "2".into()]).unwrap();
        let err = sheet.push_row(vec!["3".into()]).unwrap_err();
        assert!(matches!(
            err,
            WorkbookError::RowWidth { row: 1, expected: 2, actual: 1 }
        ));
        assert_eq!(sheet.len(), 1);
    }

    #[test]
    fn column_lookup_trims_headers() {
        let sheet = Sheet::new([" Week ", "Amount"]);
        assert_eq!(sheet.column_index("Week"), Some(0));
        assert_eq!(sheet.column_index("Amount"), Some(1));
        assert_eq!(sheet.column_index("Demand"), None);
    }

    #[test]
    fn csv_bytes_include_header_and_empty_cells() {
        let mut sheet = Sheet::new(["Process1", "Demand"]);
        sheet.push_row(vec![String::new(), "1".into()]).unwrap();
        let text = String::from_utf8(sheet.to_csv_bytes().unwrap()).unwrap();
        assert_eq!(text, "Process1,Demand\n,1\n");
    }
}
