use std::borrow::Cow;
use std::fs;

use anyhow::{Context, Result};
use tracing::info;

use crate::extract::extract_records;
use crate::mark_files::MarkFile;
use crate::record::StudentRecord;

/// Somewhere mark text can be read from.
pub trait MarkSource {
    /// Short description for logs and error messages.
    fn describe(&self) -> Cow<'_, str>;

    fn read_marks(&self) -> Result<Cow<'_, str>>;

    /// Reads the marks and extracts every student record from them.
    fn load_records(&self) -> Result<Vec<StudentRecord>> {
        let text = self
            .read_marks()
            .with_context(|| format!("could not read marks from {}", self.describe()))?;
        let records = extract_records(&text).with_context(|| {
            format!(
                "could not extract student records from {}",
                self.describe()
            )
        })?;
        info!(source = %self.describe(), num_records = records.len(), "loaded student records");
        Ok(records)
    }
}

impl MarkSource for MarkFile {
    fn describe(&self) -> Cow<'_, str> {
        self.path().to_string_lossy()
    }

    /// Bytes that are not valid UTF-8 become U+FFFD rather than failing the read, so stray
    /// encodings in the text around student blocks do not lose the blocks themselves.
    fn read_marks(&self) -> Result<Cow<'_, str>> {
        let bytes = fs::read(self.path())?;
        Ok(Cow::Owned(String::from_utf8_lossy(&bytes).into_owned()))
    }
}

impl MarkSource for str {
    fn describe(&self) -> Cow<'_, str> {
        Cow::Borrowed("<text>")
    }

    fn read_marks(&self) -> Result<Cow<'_, str>> {
        Ok(Cow::Borrowed(self))
    }
}
