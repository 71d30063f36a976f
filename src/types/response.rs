use anyhow::{Context, Result};
use serde_json::Value;

use crate::types::application::ApplicationRecord;

const DATA_KEY: &str = "data";

/// Decode a status endpoint body into its application records.
///
/// A missing or `null` `data` key yields no records; any other shape than
/// an object holding an array of objects is an error.
pub fn parse_status_body(body: &str) -> Result<Vec<ApplicationRecord>> {
    let value: Value = serde_json::from_str(body).context("Response body is not valid JSON")?;

    let Value::Object(mut object) = value else {
        anyhow::bail!("Expected a JSON object in response body");
    };

    match object.remove(DATA_KEY) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(data @ Value::Array(_)) => serde_json::from_value::<Vec<ApplicationRecord>>(data)
            .context("Response `data` entries must be JSON objects"),
        Some(_) => anyhow::bail!("Response `data` is not an array"),
    }
}
