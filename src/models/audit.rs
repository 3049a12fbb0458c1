use serde::Serialize;
use time::{format_description::well_known::Rfc3339, OffsetDateTime};

use crate::models::IssueDraft;

/// Row shape for the audit table; the draft fields are carried verbatim.
#[derive(Debug, Serialize)]
pub struct AuditRecord {
    pub title: String,
    pub body: String,
    pub labels: Vec<String>,
    pub created_at: String,
}

impl AuditRecord {
    pub fn from_draft(draft: &IssueDraft) -> Self {
        Self {
            title: draft.title.clone(),
            body: draft.body.clone(),
            labels: draft.labels.clone(),
            created_at: OffsetDateTime::now_utc()
                .format(&Rfc3339)
                .unwrap_or_default(),
        }
    }
}
