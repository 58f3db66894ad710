pub mod commands;
pub mod handlers;

// Re-export commonly used handler functions for convenience
pub use handlers::{AuditSettings, CollectSettings, collect_to_file, expand_path};

// Re-export audit functionality from siteaudit-core
pub use siteaudit_core::audit::{
    AuditOptions, AuditProgressCallback, AuditSummary, execute_audit,
};
