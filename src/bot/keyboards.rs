use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};

use crate::bot::models::CallbackAction;
use crate::ninja::Alert;

/// "Reset Alert" is offered only when the source allows dismissing the
/// alert; escalation is always available.
pub fn alert_actions(alert: &Alert) -> InlineKeyboardMarkup {
    let mut rows = Vec::new();

    if alert.can_reset {
        rows.push(vec![InlineKeyboardButton::callback(
            "🔄 Reset Alert",
            CallbackAction::Reset { alert_id: alert.id }.to_string(),
        )]);
    }

    rows.push(vec![InlineKeyboardButton::callback(
        "🎫 Create ticket",
        CallbackAction::Ticket { alert_id: alert.id }.to_string(),
    )]);

    InlineKeyboardMarkup::new(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use teloxide::types::InlineKeyboardButtonKind;

    fn alert(can_reset: bool) -> Alert {
        serde_json::from_value(serde_json::json!({
            "id": 17,
            "device": {"display_name": "SRV-01"},
            "customer": {"id": 7, "name": "Acme"},
            "message": "Disk almost full",
            "timestamp": "Mon, 05 Jun 2023 14:00:00",
            "can_reset": can_reset
        }))
        .unwrap()
    }

    fn callback_data(button: &InlineKeyboardButton) -> &str {
        match &button.kind {
            InlineKeyboardButtonKind::CallbackData(data) => data,
            other => panic!("expected callback button, got {:?}", other),
        }
    }

    #[test]
    fn resettable_alert_gets_both_actions_reset_first() {
        let kb = alert_actions(&alert(true));
        let rows = &kb.inline_keyboard;

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0][0].text, "🔄 Reset Alert");
        assert_eq!(rows[1][0].text, "🎫 Create ticket");

        let action = CallbackAction::from_string(callback_data(&rows[0][0])).unwrap();
        assert_eq!(action, CallbackAction::Reset { alert_id: 17 });
    }

    #[test]
    fn non_resettable_alert_gets_ticket_only() {
        let kb = alert_actions(&alert(false));
        let rows = &kb.inline_keyboard;

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0][0].text, "🎫 Create ticket");

        let action = CallbackAction::from_string(callback_data(&rows[0][0])).unwrap();
        assert_eq!(action, CallbackAction::Ticket { alert_id: 17 });
    }
}
