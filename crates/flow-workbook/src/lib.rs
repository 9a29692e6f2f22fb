//! Workbook storage for flowtrace.
//!
//! A workbook is a directory of named sheets, one `<name>.csv` file per
//! sheet with a header row. Sheets are read whole and written whole;
//! writing one sheet never touches the others.

pub mod error;
pub mod sheet;
pub mod workbook;

pub use error::{WorkbookError, WorkbookResult};
pub use sheet::Sheet;
pub use workbook::Workbook;
