//! Output formatting utilities.

use serde_json::Value;

/// Formats an entry as a table row.
pub fn format_table_row(entry: &Value) -> String {
    let sequence = entry
        .get("sequence")
        .and_then(|v| v.as_u64())
        .map(|s| s.to_string())
        .unwrap_or_else(|| "?".to_string());
    let event_id = str_field(entry, "event_id", Some("b64"));
    let event_type = str_field(entry, "event_type", None);
    let occurred_at = str_field(entry, "occurred_at", None);
    let principal_id = str_field(entry, "principal_id", None);

    format!(
        "{:<5} {:<44} {:<16} {:<25} {:<16} {}",
        sequence,
        truncate(event_id, 44),
        event_type,
        truncate(occurred_at, 25),
        truncate(principal_id, 16),
        summary(entry)
    )
}

/// Prints the table header.
#[allow(clippy::print_literal)]
pub fn print_table_header() {
    println!(
        "{:<5} {:<44} {:<16} {:<25} {:<16} {}",
        "SEQ", "EVENT_ID", "TYPE", "OCCURRED_AT", "PRINCIPAL", "DETAILS"
    );
    println!("{}", "-".repeat(120));
}

/// One-line description of what the entry did.
fn summary(entry: &Value) -> String {
    let field = |name: &str| str_field(entry, name, None);
    let number = |name: &str| {
        entry
            .get(name)
            .and_then(|v| v.as_u64())
            .map(|n| n.to_string())
            .unwrap_or_else(|| "?".to_string())
    };
    match field("event_type") {
        "ledger_created" => format!("owner={}", field("owner")),
        "owner_changed" => format!("{} -> {}", field("previous_owner"), field("new_owner")),
        "new_reward_added" => format!("#{} {:?}", number("reward_id"), field("description")),
        "points_earned" => format!(
            "{} +{} = {}",
            field("user"),
            number("amount"),
            number("balance")
        ),
        "points_redeemed" => format!(
            "{} redeemed #{} {:?}",
            field("user"),
            number("reward_id"),
            field("reward_description")
        ),
        _ => String::new(),
    }
}

fn str_field<'a>(entry: &'a Value, name: &str, nested: Option<&str>) -> &'a str {
    let value = entry.get(name);
    let value = match nested {
        Some(inner) => value.and_then(|v| v.get(inner)),
        None => value,
    };
    value.and_then(|v| v.as_str()).unwrap_or("?")
}

/// Shortens `s` to at most `max_len` characters, marking the cut.
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn row_summarises_redemption() {
        let entry = json!({
            "sequence": 4,
            "event_id": { "alg": "sha-256", "b64": "a".repeat(43) },
            "event_type": "points_redeemed",
            "occurred_at": "2026-01-01T00:00:00.000Z",
            "principal_id": "alice",
            "user": "alice",
            "reward_id": 2,
            "reward_description": "mug",
        });
        let row = format_table_row(&entry);
        assert!(row.starts_with("4 "));
        assert!(row.contains("points_redeemed"));
        assert!(row.ends_with("alice redeemed #2 \"mug\""));
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("ééééééé", 5), "éé...");
    }
}
