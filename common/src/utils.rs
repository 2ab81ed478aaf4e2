use chrono::{DateTime, NaiveDateTime, Utc};
use colored::*;

/// Formats a duration in milliseconds as `HH:MM:SS`.
///
/// Sub-second remainders are dropped and hours are not wrapped at 24.
pub fn format_elapsed(millis: u64) -> String {
    let total_seconds = millis / 1000;
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}

/// Parses the timestamps the backend sends: RFC 3339, or ISO 8601 without
/// offset (read as UTC).
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .map(|naive| naive.and_utc())
}

/// Milliseconds between `start` and `end` (or `now` while the order is
/// still open). Missing or unreadable starts count as zero.
pub fn elapsed_millis(start: Option<&str>, end: Option<&str>, now: DateTime<Utc>) -> u64 {
    let Some(start) = start.and_then(parse_timestamp) else {
        return 0;
    };
    let end = end.and_then(parse_timestamp).unwrap_or(now);
    u64::try_from((end - start).num_milliseconds()).unwrap_or(0)
}

pub fn format_sede_name(tenant_id: &str) -> String {
    match tenant_id {
        "pardo_miraflores" => "Pardo Miraflores".to_string(),
        "pardo_surco" => "Pardo Surco".to_string(),
        "pardo" => "Pardo".to_string(),
        other => other.to_string(),
    }
}

pub fn format_category_name(category: &str) -> String {
    match category {
        "pollo" => "Pollo".to_string(),
        "parrillas" => "Parrillas".to_string(),
        "bebidas" => "Bebidas".to_string(),
        "postres" => "Postres".to_string(),
        "combos" => "Combos".to_string(),
        "promociones" => "Promociones".to_string(),
        other => other.to_string(),
    }
}

pub fn print_welcome_message() {
    println!(
        "{}",
        "╔══════════════════════════════════════╗".truecolor(153, 51, 0)
    );
    println!(
        "{}",
        "║     PARDOS CHICKEN · OPERACIONES     ║"
            .truecolor(153, 51, 0)
            .bold()
    );
    println!(
        "{}",
        "╚══════════════════════════════════════╝".truecolor(153, 51, 0)
    );
    println!("{}", "Escribe `help` para ver los comandos.".dimmed());
}
