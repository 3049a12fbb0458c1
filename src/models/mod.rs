mod audit;
mod issue;

pub use audit::AuditRecord;
pub use issue::{validate_labels, IssueDraft, LabelRegistry, ValidationError};
