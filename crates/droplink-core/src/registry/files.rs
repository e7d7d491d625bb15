use std::collections::HashMap;

use crate::models::FileRecord;

/// Uploaded-file metadata keyed by code value, in arrival order. Purely a
/// ledger: it never reads or verifies the bytes on disk.
#[derive(Debug, Default)]
pub(crate) struct FileLedger {
    files: HashMap<String, Vec<FileRecord>>,
}

impl FileLedger {
    pub(crate) fn record(&mut self, code: &str, records: Vec<FileRecord>) {
        self.files.entry(code.to_string()).or_default().extend(records);
    }

    pub(crate) fn list(&self, code: &str) -> Vec<FileRecord> {
        self.files.get(code).cloned().unwrap_or_default()
    }

    /// Drop a code's entries, returning how many records were removed.
    pub(crate) fn remove(&mut self, code: &str) -> usize {
        self.files.remove(code).map(|records| records.len()).unwrap_or(0)
    }
}
