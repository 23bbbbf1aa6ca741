//! Output formatter trait for CLI results.

use anyhow::Result;
use fnpack_core::EntryObserver;
use fnpack_core::PackReport;
use fnpack_core::packaging::PackPlan;
use serde::Serialize;

/// Common output formatter trait
pub trait OutputFormatter {
    /// Observer printing entries while they are packaged, if this output
    /// mode shows them.
    fn entry_observer(&self) -> Option<Box<dyn EntryObserver>>;

    /// Format packaging result
    fn format_pack_result(&self, report: &PackReport) -> Result<()>;

    /// Format the entries a packaging run would write
    fn format_file_list(&self, plan: &PackPlan) -> Result<()>;

    /// Format error message
    fn format_error(&self, operation: &str, error: &anyhow::Error);
}

/// Generic JSON output structure
#[derive(Debug, Serialize)]
pub struct JsonOutput<T> {
    pub operation: String,
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Error,
}

impl<T: Serialize> JsonOutput<T> {
    pub fn success(operation: impl Into<String>, data: T) -> Self {
        Self {
            operation: operation.into(),
            status: Status::Success,
            data: Some(data),
            error: None,
        }
    }
}

impl JsonOutput<()> {
    pub fn error(operation: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            status: Status::Error,
            data: None,
            error: Some(error.into()),
        }
    }
}
