use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::borrow::Cow;

pub const POSTING_TITLE: &str = "postingTitle";
pub const JOB_REQUISITION_ID: &str = "jobRequisitionId";
pub const STATUS: &str = "status";
pub const DATE_APPLIED: &str = "dateApplied";

/// One entry of the status endpoint's `data` array.
///
/// The endpoint's schema is not fixed, so the raw object is kept and the
/// known fields are read on demand.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApplicationRecord(Map<String, Value>);

impl ApplicationRecord {
    /// Text of `key`, or `None` when absent or `null`.
    /// Strings come back verbatim, anything else as compact JSON.
    pub fn field(&self, key: &str) -> Option<Cow<'_, str>> {
        match self.0.get(key)? {
            Value::Null => None,
            Value::String(s) => Some(Cow::Borrowed(s.as_str())),
            other => Some(Cow::Owned(other.to_string())),
        }
    }

    pub fn posting_title(&self) -> Option<Cow<'_, str>> {
        self.field(POSTING_TITLE)
    }

    pub fn requisition_id(&self) -> Option<Cow<'_, str>> {
        self.field(JOB_REQUISITION_ID)
    }

    pub fn status(&self) -> Option<Cow<'_, str>> {
        self.field(STATUS)
    }

    pub fn date_applied(&self) -> Option<Cow<'_, str>> {
        self.field(DATE_APPLIED)
    }
}
