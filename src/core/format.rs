//! Display helpers shared by the dashboards and the withdrawal flow.

use chrono::{DateTime, FixedOffset, Utc};

/// Formats an amount the way Brazilian users expect: `R$ 1.234,56`.
#[must_use]
pub fn format_brl(amount: f64) -> String {
    let negative = amount < 0.0;
    #[allow(clippy::cast_possible_truncation)] // display only; values are far below i64::MAX
    let cents = (amount.abs() * 100.0).round() as i64;
    let units = (cents / 100).to_string();
    let fraction = cents % 100;

    let mut grouped = String::with_capacity(units.len() + units.len() / 3);
    for (i, digit) in units.chars().enumerate() {
        if i > 0 && (units.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(digit);
    }

    let sign = if negative && cents > 0 { "-" } else { "" };
    format!("{sign}R$ {grouped},{fraction:02}")
}

/// Formats the time left until `deadline` as `HH:MM:SS`, or `00:00:00` once it has passed.
#[must_use]
pub fn format_countdown(deadline: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let remaining = (deadline - now).num_seconds();
    if remaining <= 0 {
        return "00:00:00".to_string();
    }
    let hours = remaining / 3600;
    let minutes = (remaining % 3600) / 60;
    let seconds = remaining % 60;
    format!("{hours:02}:{minutes:02}:{seconds:02}")
}

/// Formats a timestamp as `dd/mm/yyyy HH:MM` in the given offset, or `—` when absent.
#[must_use]
pub fn format_datetime(value: Option<DateTime<Utc>>, offset: FixedOffset) -> String {
    value.map_or_else(
        || "—".to_string(),
        |v| v.with_timezone(&offset).format("%d/%m/%Y %H:%M").to_string(),
    )
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn test_format_brl() {
        assert_eq!(format_brl(0.0), "R$ 0,00");
        assert_eq!(format_brl(150.0), "R$ 150,00");
        assert_eq!(format_brl(1234.5), "R$ 1.234,50");
        assert_eq!(format_brl(1_234_567.891), "R$ 1.234.567,89");
        assert_eq!(format_brl(-12.3), "-R$ 12,30");
    }

    #[test]
    fn test_format_countdown() {
        let now = Utc.with_ymd_and_hms(2026, 3, 2, 12, 0, 0).unwrap();
        assert_eq!(format_countdown(now + Duration::hours(1), now), "01:00:00");
        assert_eq!(
            format_countdown(now + Duration::seconds(3 * 60 + 7), now),
            "00:03:07"
        );
        assert_eq!(format_countdown(now - Duration::seconds(1), now), "00:00:00");
        assert_eq!(format_countdown(now, now), "00:00:00");
    }

    #[test]
    fn test_format_datetime() {
        let offset = FixedOffset::west_opt(3 * 3600).unwrap();
        let value = Utc.with_ymd_and_hms(2026, 3, 2, 15, 30, 0).unwrap();
        assert_eq!(format_datetime(Some(value), offset), "02/03/2026 12:30");
        assert_eq!(format_datetime(None, offset), "—");
    }
}
