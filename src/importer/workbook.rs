// ==========================================
// Workbook access
// ==========================================
// WorkbookSource is the seam between the importer and calamine: the
// locator and extractor only see sheet names and cell ranges, so tests
// can feed in-memory sheets without a file on disk.
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use calamine::{open_workbook, Data, Range, Reader, Xlsx};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Source of named worksheets
pub trait WorkbookSource {
    /// Sheet names in workbook order
    fn sheet_names(&self) -> Vec<String>;

    /// Cell range of one worksheet
    fn worksheet(&mut self, name: &str) -> ImportResult<Range<Data>>;
}

// ==========================================
// Xlsx file workbook
// ==========================================

/// Workbook backed by an .xlsx file
pub struct XlsxWorkbook {
    inner: Xlsx<BufReader<File>>,
}

impl std::fmt::Debug for XlsxWorkbook {
    // calamine's Xlsx has no Debug impl, so derive is unavailable
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("XlsxWorkbook").finish_non_exhaustive()
    }
}

impl XlsxWorkbook {
    pub fn open<P: AsRef<Path>>(path: P) -> ImportResult<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ImportError::FileNotFound(path.display().to_string()));
        }

        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        if !ext.eq_ignore_ascii_case("xlsx") {
            return Err(ImportError::UnsupportedFormat(ext.to_string()));
        }

        let inner: Xlsx<_> = open_workbook(path)?;
        Ok(Self { inner })
    }
}

impl WorkbookSource for XlsxWorkbook {
    fn sheet_names(&self) -> Vec<String> {
        self.inner.sheet_names()
    }

    fn worksheet(&mut self, name: &str) -> ImportResult<Range<Data>> {
        Ok(self.inner.worksheet_range(name)?)
    }
}

// ==========================================
// In-memory workbook
// ==========================================

/// Workbook assembled in memory, mainly for tests
#[derive(Default)]
pub struct MemoryWorkbook {
    sheets: Vec<(String, Range<Data>)>,
}

impl MemoryWorkbook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a sheet; insertion order is workbook order
    pub fn add_sheet(&mut self, name: &str, range: Range<Data>) -> &mut Self {
        self.sheets.push((name.to_string(), range));
        self
    }
}

impl WorkbookSource for MemoryWorkbook {
    fn sheet_names(&self) -> Vec<String> {
        self.sheets.iter().map(|(name, _)| name.clone()).collect()
    }

    fn worksheet(&mut self, name: &str) -> ImportResult<Range<Data>> {
        self.sheets
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, range)| range.clone())
            .ok_or_else(|| ImportError::MissingSheet(name.to_string()))
    }
}

/// Build a cell range from dense rows, starting at A1
pub fn range_from_rows(rows: Vec<Vec<Data>>) -> Range<Data> {
    let max_cols = rows.iter().map(|r| r.len()).max().unwrap_or(0);
    if rows.is_empty() || max_cols == 0 {
        return Range::empty();
    }

    let mut range = Range::new((0, 0), (rows.len() as u32 - 1, max_cols as u32 - 1));
    for (r, row) in rows.into_iter().enumerate() {
        for (c, cell) in row.into_iter().enumerate() {
            range.set_value((r as u32, c as u32), cell);
        }
    }
    range
}
