use serde::{Deserialize, Deserializer, Serialize};

/// Tickets are filed on behalf of a fixed service address, not the person
/// who pressed the button.
pub const REQUESTER_EMAIL: &str = "noreply@ninjarmm.com";

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct TicketRequest {
    pub description: String,
    pub subject: String,
    pub email: String,
    pub priority: u8,
    pub status: u8,
    pub source: u8,
    pub ticket_type: String,
}

impl TicketRequest {
    /// Open incident from the portal, normal priority.
    pub fn incident(subject: String, description: String) -> Self {
        Self {
            description,
            subject,
            email: REQUESTER_EMAIL.to_string(),
            priority: 1,
            status: 2,
            source: 2,
            ticket_type: "Incident".to_string(),
        }
    }
}

#[derive(Deserialize, Debug, Default)]
pub struct TicketResponse {
    #[serde(default, deserialize_with = "truthy")]
    pub status: bool,
    #[serde(default)]
    pub item: Option<TicketItem>,
}

#[derive(Deserialize, Debug)]
pub struct TicketItem {
    pub helpdesk_ticket: HelpdeskTicket,
}

#[derive(Deserialize, Debug)]
pub struct HelpdeskTicket {
    pub display_id: u64,
}

/// The helpdesk reports success as `true` or `1` depending on the API
/// revision.
fn truthy<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum BoolOrInt {
        Bool(bool),
        Int(i64),
    }

    Ok(match BoolOrInt::deserialize(deserializer)? {
        BoolOrInt::Bool(b) => b,
        BoolOrInt::Int(i) => i != 0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn incident_carries_fixed_fields() {
        let ticket = TicketRequest::incident("subject".into(), "description".into());

        assert_eq!(ticket.email, REQUESTER_EMAIL);
        assert_eq!(ticket.priority, 1);
        assert_eq!(ticket.status, 2);
        assert_eq!(ticket.source, 2);
        assert_eq!(ticket.ticket_type, "Incident");
    }

    #[test]
    fn status_accepts_bool_and_number() {
        let numeric: TicketResponse = serde_json::from_str(r#"{"status": 1}"#).unwrap();
        assert!(numeric.status);

        let boolean: TicketResponse = serde_json::from_str(r#"{"status": true}"#).unwrap();
        assert!(boolean.status);

        let falsy: TicketResponse = serde_json::from_str(r#"{"status": 0}"#).unwrap();
        assert!(!falsy.status);

        let empty: TicketResponse = serde_json::from_str("{}").unwrap();
        assert!(!empty.status);
        assert!(empty.item.is_none());
    }
}
