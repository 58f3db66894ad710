pub mod auditor;
pub mod checks;
pub mod document;
pub mod error;
pub mod result;

pub use auditor::{Auditor, ProgressCallback};
pub use checks::{CheckPolicy, Issue, PageSignals, run_checks};
pub use document::{HtmlDocument, HtmlQuery, PageElement};
pub use error::ScanError;
pub use result::AuditResult;
