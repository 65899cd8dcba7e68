use crate::types::CredentialRecord;

/// Holds at most one credential record for one session.
#[derive(Debug, Clone, Default)]
pub struct CredentialCache {
    record: Option<CredentialRecord>,
}

impl CredentialCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> Option<&CredentialRecord> {
        self.record.as_ref()
    }

    /// Replaces whatever record was cached before.
    pub fn put(&mut self, record: CredentialRecord) -> &CredentialRecord {
        self.record.insert(record)
    }

    pub fn clear(&mut self) {
        self.record = None;
    }

    pub fn is_empty(&self) -> bool {
        self.record.is_none()
    }
}
