//! Append-only CSV log of every evaluated candidate.
//!
//! ```text
//! "MethodName","Patch","Compiled","AllTestsPassed","TotalExecutionTime(ms)","Fitness","FitnessImprovement"
//! "org.example.Sorter.sort(int[])","|","true","true","1.0","1.0","0.0"
//! ```
//!
//! Every field is quoted; embedded quotes are doubled. Rows are flushed as
//! they are written so a crashed run still leaves a usable prefix.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use super::error::SearchError;
use super::fitness::TestExecutionResult;

/// Column names, in order.
pub const LOG_HEADER: [&str; 7] = [
    "MethodName",
    "Patch",
    "Compiled",
    "AllTestsPassed",
    "TotalExecutionTime(ms)",
    "Fitness",
    "FitnessImprovement",
];

/// One evaluated candidate.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultRow {
    pub method: String,
    pub patch: String,
    pub compiled: bool,
    pub all_passed: bool,
    pub execution_time_ms: f64,
    pub fitness: f64,
    pub improvement: f64,
}

impl ResultRow {
    pub fn new(
        method: &str,
        patch: String,
        result: &TestExecutionResult,
        fitness: f64,
        improvement: f64,
    ) -> Self {
        Self {
            method: method.to_string(),
            patch,
            compiled: result.compiled,
            all_passed: result.all_passed,
            execution_time_ms: result.execution_time_ms(),
            fitness,
            improvement,
        }
    }

    fn fields(&self) -> [String; 7] {
        [
            self.method.clone(),
            self.patch.clone(),
            self.compiled.to_string(),
            self.all_passed.to_string(),
            format!("{:?}", self.execution_time_ms),
            format!("{:?}", self.fitness),
            format!("{:?}", self.improvement),
        ]
    }
}

/// CSV result log for one run.
pub struct ResultLog {
    writer: Box<dyn Write + Send>,
    rows: usize,
}

impl ResultLog {
    /// Create (truncating) the log file and write the header.
    ///
    /// Failing either step is a [`SearchError::LogOpen`].
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self, SearchError> {
        let path = path.as_ref();
        let open_error = |source| SearchError::LogOpen {
            path: path.to_path_buf(),
            source,
        };
        let file = File::create(path).map_err(open_error)?;
        Self::from_writer(BufWriter::new(file)).map_err(open_error)
    }

    /// Log into an arbitrary writer; the header is written immediately.
    pub fn from_writer<W: Write + Send + 'static>(writer: W) -> io::Result<Self> {
        let mut log = Self {
            writer: Box::new(writer),
            rows: 0,
        };
        log.write_record(&LOG_HEADER)?;
        Ok(log)
    }

    /// Append one row and flush.
    pub fn write_row(&mut self, row: &ResultRow) -> Result<(), SearchError> {
        self.write_record(&row.fields())?;
        self.rows += 1;
        Ok(())
    }

    /// Number of data rows written so far.
    pub fn rows(&self) -> usize {
        self.rows
    }

    fn write_record<S: AsRef<str>>(&mut self, fields: &[S]) -> io::Result<()> {
        let line = fields
            .iter()
            .map(|f| quote(f.as_ref()))
            .collect::<Vec<_>>()
            .join(",");
        self.writer.write_all(line.as_bytes())?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()
    }
}

fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}
