//! Classification sink trait and implementations.

use std::sync::{Arc, Mutex, MutexGuard};

use super::ClassificationRecord;

/// Trait for receiving classification records.
///
/// The engine never persists anything itself; storage lives behind this
/// trait. Recording is best-effort and must not change the classification
/// returned to the caller.
pub trait ClassificationSink: Send + Sync {
    /// Record a single classification.
    fn record(&self, record: ClassificationRecord);

    /// Record multiple classifications.
    ///
    /// Default implementation calls `record()` for each entry.
    fn record_batch(&self, records: Vec<ClassificationRecord>) {
        for record in records {
            self.record(record);
        }
    }
}

/// No-op implementation for contexts that don't persist classifications.
#[derive(Clone, Default)]
pub struct NoOpClassificationSink;

impl ClassificationSink for NoOpClassificationSink {
    fn record(&self, _record: ClassificationRecord) {}
}

/// Mock sink for testing - collects recorded classifications.
#[derive(Clone, Default)]
pub struct MockClassificationSink {
    records: Arc<Mutex<Vec<ClassificationRecord>>>,
}

impl MockClassificationSink {
    pub fn new() -> Self {
        Self::default()
    }

    fn guard(&self) -> MutexGuard<'_, Vec<ClassificationRecord>> {
        self.records.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Returns all collected records.
    pub fn records(&self) -> Vec<ClassificationRecord> {
        self.guard().clone()
    }

    pub fn clear(&self) {
        self.guard().clear();
    }

    pub fn len(&self) -> usize {
        self.guard().len()
    }

    pub fn is_empty(&self) -> bool {
        self.guard().is_empty()
    }
}

impl ClassificationSink for MockClassificationSink {
    fn record(&self, record: ClassificationRecord) {
        self.guard().push(record);
    }
}
