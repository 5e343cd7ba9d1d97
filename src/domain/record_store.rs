//! In-memory store for the patient draft of one form session.

use super::patient::{PatientDraft, PatientRecord};
use super::validation::{ValidationErrors, ValidationReport};

/// Accumulates partial patient input and gates conversion to a complete record.
#[derive(Debug, Clone, Default)]
pub struct PatientRecordStore {
    draft: PatientDraft,
}

impl PatientRecordStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Shallow-merge the fields present in `partial`. No validation happens here.
    pub fn merge(&mut self, partial: PatientDraft) {
        self.draft.merge(partial);
    }

    /// Check all 13 fields and collect every failure.
    #[must_use]
    pub fn validate(&self) -> ValidationReport {
        match PatientRecord::try_from(&self.draft) {
            Ok(_) => ValidationReport::valid(),
            Err(errors) => errors.into(),
        }
    }

    /// Convert the current draft into a complete, typed record.
    ///
    /// # Errors
    /// Returns the same messages [`validate`](Self::validate) would report.
    pub fn to_complete_record(&self) -> Result<PatientRecord, ValidationErrors> {
        PatientRecord::try_from(&self.draft)
    }

    /// Owned copy of the current draft.
    #[must_use]
    pub fn snapshot(&self) -> PatientDraft {
        self.draft.clone()
    }

    /// Reset to an empty draft.
    pub fn clear(&mut self) {
        self.draft = PatientDraft::default();
    }
}
