// src/formatter.rs
use chrono::{DateTime, Utc};

use crate::types::ApplicationRecord;

pub const UNKNOWN_TITLE: &str = "Unknown Title";
pub const UNKNOWN_REQUISITION: &str = "N/A";
pub const UNKNOWN_STATUS: &str = "Unknown";
pub const UNKNOWN_DATE: &str = "Unknown Date";

const SEPARATOR: &str = "------------------------------";

/// Render one application as its fixed four-line block plus separator
pub fn format_application(record: &ApplicationRecord) -> String {
    let title = record.posting_title();
    let requisition = record.requisition_id();
    let status = record.status();
    let applied_on = record.date_applied();

    format!(
        "Job Title: {}\nRequisition: {}\nStatus: {}\nApplied On: {}\n{}\n",
        title.as_deref().unwrap_or(UNKNOWN_TITLE),
        requisition.as_deref().unwrap_or(UNKNOWN_REQUISITION),
        status.as_deref().unwrap_or(UNKNOWN_STATUS),
        applied_on.as_deref().unwrap_or(UNKNOWN_DATE),
        SEPARATOR,
    )
}

/// Header line that opens each appended section
pub fn timestamp_header(at: DateTime<Utc>) -> String {
    format!("\n\n===== {} =====\n\n", at.format("%Y-%m-%d %H:%M:%S UTC"))
}

/// Header followed by every record block, in order
pub fn format_section(at: DateTime<Utc>, records: &[ApplicationRecord]) -> String {
    let mut section = timestamp_header(at);
    for record in records {
        section.push_str(&format_application(record));
    }
    section
}
