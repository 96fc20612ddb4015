use chrono::NaiveDateTime;
use chrono_tz::Tz;

use crate::bot::utils::escape_markdown_v2;
use crate::ninja::{self, Alert};

/// Upstream timestamps are naive wall-clock strings in the vendor's
/// reference zone.
const SOURCE_TZ: Tz = chrono_tz::Europe::London;
const SOURCE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S";
const DISPLAY_FORMAT: &str = "%a, %d %b %Y %H:%M";

pub fn alert_title(alert: &Alert) -> String {
    format!(
        "ALERT for {} at {}",
        alert.device.display_name, alert.customer.name
    )
}

/// MarkdownV2 rendering of one alert: severity marker, linked title, body
/// and the timestamp field.
pub fn render_alert(alert: &Alert, tz: Option<Tz>) -> String {
    let title = alert_title(alert);
    let link = ninja::customer_dashboard_url(alert.customer.id);
    let timestamp = format_timestamp(&alert.timestamp, tz);

    format!(
        "🚨 *[{}]({})*\n\n{}\n\nTimestamp: {}",
        escape_markdown_v2(&title),
        link,
        escape_markdown_v2(&alert.message),
        escape_markdown_v2(&timestamp),
    )
}

/// Plain rendering for when the chat API rejects the formatted message.
pub fn render_alert_fallback(alert: &Alert, tz: Option<Tz>) -> String {
    format!(
        "🚨 {}\n\n{}\n\nTimestamp: {}",
        alert_title(alert),
        alert.message,
        format_timestamp(&alert.timestamp, tz),
    )
}

/// Without a configured display zone the upstream string passes through
/// untouched. With one, the string is re-read as wall-clock time in the
/// source zone and shown in the configured zone; anything unparsable also
/// passes through.
pub fn format_timestamp(raw: &str, tz: Option<Tz>) -> String {
    let Some(tz) = tz else {
        return raw.to_string();
    };

    let Ok(naive) = NaiveDateTime::parse_from_str(raw, SOURCE_FORMAT) else {
        return raw.to_string();
    };

    match naive.and_local_timezone(SOURCE_TZ).earliest() {
        Some(source) => source.with_timezone(&tz).format(DISPLAY_FORMAT).to_string(),
        // A wall-clock instant skipped by a DST jump has no mapping.
        None => raw.to_string(),
    }
}

/// The posted message is the only record of the alert: ticket subject and
/// description are recovered from its displayed text. The first line is the
/// title, everything up to the fields block is the body.
pub fn split_alert_message(text: &str) -> (String, String) {
    let mut lines = text.lines();

    let title = lines
        .next()
        .unwrap_or_default()
        .trim_start_matches('🚨')
        .trim()
        .to_string();

    let body: Vec<&str> = lines
        .take_while(|line| !line.trim_start().starts_with("Timestamp:"))
        .collect();

    (title, body.join("\n").trim().to_string())
}

pub fn reset_note(resolver: Option<&str>) -> String {
    match resolver {
        Some(name) => format!("✅ Alert has been reset by {}", name),
        None => "✅ Alert has been reset!".to_string(),
    }
}

pub fn ticket_note(resolver: Option<&str>, ticket_url: &str) -> String {
    let head = match resolver {
        Some(name) => format!("🎫 Alert made into a ticket by {}", name),
        None => "🎫 Alert made into a ticket!".to_string(),
    };
    format!("{}\n{}", head, ticket_url)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alert() -> Alert {
        serde_json::from_value(serde_json::json!({
            "id": 17,
            "device": {"display_name": "SRV-01"},
            "customer": {"id": 7, "name": "Acme"},
            "message": "Disk almost full",
            "timestamp": "Mon, 05 Jun 2023 14:00:00",
            "can_reset": true
        }))
        .unwrap()
    }

    #[test]
    fn timestamp_passes_through_without_zone() {
        assert_eq!(
            format_timestamp("Mon, 05 Jun 2023 14:00:00", None),
            "Mon, 05 Jun 2023 14:00:00"
        );
    }

    #[test]
    fn timestamp_converts_into_configured_zone() {
        let tz: Tz = "America/New_York".parse().unwrap();
        assert_eq!(
            format_timestamp("Mon, 05 Jun 2023 14:00:00", Some(tz)),
            "Mon, 05 Jun 2023 09:00"
        );

        let tz: Tz = "Europe/Moscow".parse().unwrap();
        assert_eq!(
            format_timestamp("Mon, 05 Jun 2023 14:00:00", Some(tz)),
            "Mon, 05 Jun 2023 16:00"
        );
    }

    #[test]
    fn unparsable_timestamp_passes_through_with_zone() {
        let tz: Tz = "America/New_York".parse().unwrap();
        assert_eq!(format_timestamp("sometime yesterday", Some(tz)), "sometime yesterday");
    }

    #[test]
    fn rendered_alert_links_the_customer_dashboard() {
        let text = render_alert(&alert(), None);

        assert!(text.starts_with("🚨"));
        assert!(text.contains("https://app.ninjarmm.com/#/customerDashboard/7/overview"));
        assert!(text.contains("Timestamp:"));
    }

    #[test]
    fn fallback_rendering_has_no_markup() {
        let text = render_alert_fallback(&alert(), None);

        assert!(!text.contains('*'));
        assert!(!text.contains('['));
        assert!(text.contains("ALERT for SRV-01 at Acme"));
        assert!(text.contains("Mon, 05 Jun 2023 14:00:00"));
    }

    #[test]
    fn displayed_text_splits_into_subject_and_body() {
        // Shape of Message::text() after Telegram strips the formatting.
        let displayed = "🚨 ALERT for SRV-01 at Acme\n\nDisk almost full\n\nTimestamp: Mon, 05 Jun 2023 14:00:00";

        let (subject, body) = split_alert_message(displayed);
        assert_eq!(subject, "ALERT for SRV-01 at Acme");
        assert_eq!(body, "Disk almost full");
    }

    #[test]
    fn split_ignores_appended_resolution_lines() {
        let displayed = "🚨 ALERT for SRV-01 at Acme\n\nDisk almost full\n\nTimestamp: Mon, 05 Jun 2023 14:00:00\n\n✅ Alert has been reset by @ops";

        let (subject, body) = split_alert_message(displayed);
        assert_eq!(subject, "ALERT for SRV-01 at Acme");
        assert_eq!(body, "Disk almost full");
    }

    #[test]
    fn resolution_notes_name_the_resolver_when_known() {
        assert_eq!(reset_note(Some("@ops")), "✅ Alert has been reset by @ops");
        assert_eq!(reset_note(None), "✅ Alert has been reset!");

        let note = ticket_note(Some("@ops"), "https://corp.freshservice.com/helpdesk/tickets/42");
        assert!(note.contains("by @ops"));
        assert!(note.ends_with("/helpdesk/tickets/42"));
    }
}
