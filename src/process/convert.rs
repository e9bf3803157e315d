use serde::{Deserialize, Deserializer};

/// Token the survey files use for a missing observation.
pub const MISSING_SENTINEL: &str = ".";

/// Parse a raw numeric field. Blank, `"."` and malformed text all read as missing.
pub fn parse_value(raw: Option<&str>) -> Option<f64> {
    let value = raw?.trim();
    if value.is_empty() || value == MISSING_SENTINEL {
        return None;
    }
    value.parse().ok()
}

/// `deserialize_with` adapter so typed source rows carry parsed values.
pub fn deserialize_value<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(parse_value(raw.as_deref()))
}
