use serde::{Deserialize, Serialize};

use postcard;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD as B64, Engine};

/// Button payload carried in callback data. The alert id embedded here is
/// the only correlation between a press and the alert it resolves.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum CallbackAction {
    Reset { alert_id: i64 },
    Ticket { alert_id: i64 },
}

impl CallbackAction {
    pub fn alert_id(&self) -> i64 {
        match self {
            CallbackAction::Reset { alert_id } | CallbackAction::Ticket { alert_id } => *alert_id,
        }
    }

    /// Serialization into a compact Base64 string. Callback data is capped
    /// at 64 bytes, so the payload goes through postcard first.
    pub fn to_string(&self) -> String {
        match postcard::to_allocvec(self) {
            Ok(bin) => B64.encode(bin),
            Err(e) => {
                log::error!("Serialization failed: {}", e);
                String::new()
            }
        }
    }

    pub fn from_string(s: &str) -> Result<Self, anyhow::Error> {
        let bin = B64
            .decode(s)
            .map_err(|e| anyhow::anyhow!("Base64 decode failed for '{}': {}", s, e))?;

        postcard::from_bytes(&bin)
            .map_err(|e| anyhow::anyhow!("Binary decode failed. Bytes: {:?}, Error: {}", bin, e))
    }
}
