use serde::{Deserialize, Deserializer};

#[derive(Deserialize, Debug, Clone)]
pub struct Alert {
    /// Monotonically increasing upstream; drives the poll watermark.
    #[serde(deserialize_with = "flexible_i64")]
    pub id: i64,
    pub device: Device,
    pub customer: Customer,
    pub message: String,
    pub timestamp: String,
    #[serde(default)]
    pub can_reset: bool,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Device {
    pub display_name: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Customer {
    #[serde(deserialize_with = "flexible_i64")]
    pub id: i64,
    pub name: String,
}

/// Ids arrive as 123 or "123" depending on the upstream serializer.
fn flexible_i64<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrInt {
        Str(String),
        Int(i64),
    }

    match StringOrInt::deserialize(deserializer)? {
        StringOrInt::Int(i) => Ok(i),
        StringOrInt::Str(s) => s.parse::<i64>().map_err(serde::de::Error::custom),
    }
}
