use chrono::{DateTime, TimeZone, Utc};

pub const PLACEHOLDER: &str = "—";
pub const NO_DATA: &str = "Sem dados";
pub const NOT_AVAILABLE: &str = "N/A";
pub const NO_TIME: &str = "--:--";

/// Renders `2` for whole numbers and `2.5` otherwise.
pub fn number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

/// Integer with the pt-BR thousands separator: `12345` → `12.345`.
pub fn thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }
    out
}

pub fn stay_duration(minutes: u64) -> String {
    let hours = minutes / 60;
    let rest = minutes % 60;
    if hours > 0 {
        format!("{hours}h{rest}min")
    } else {
        format!("{rest}min")
    }
}

pub fn clock_time<Tz: TimeZone>(at: &DateTime<Utc>, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    at.with_timezone(tz).format("%H:%M").to_string()
}

pub fn date_time<Tz: TimeZone>(at: &DateTime<Utc>, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    at.with_timezone(tz).format("%d/%m/%Y %H:%M").to_string()
}

/// Compact age used on the alerts page: `42s atrás`, `5min atrás`, ...
pub fn relative_age(at: Option<&DateTime<Utc>>, now: DateTime<Utc>) -> String {
    let Some(at) = at else {
        return NOT_AVAILABLE.to_string();
    };
    let seconds = (now - *at).num_seconds();
    if seconds < 60 {
        format!("{seconds}s atrás")
    } else if seconds < 3_600 {
        format!("{}min atrás", seconds / 60)
    } else if seconds < 86_400 {
        format!("{}h atrás", seconds / 3_600)
    } else {
        format!("{}d atrás", seconds / 86_400)
    }
}

/// Spelled-out age used by the main page's alert feed; falls back to the
/// date once the alert is a day old.
pub fn spoken_age<Tz: TimeZone>(at: Option<&DateTime<Utc>>, now: DateTime<Utc>, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let Some(at) = at else {
        return "Agora".to_string();
    };
    let minutes = (now - *at).num_minutes();
    if minutes < 1 {
        return "Agora".to_string();
    }
    if minutes < 60 {
        let plural = if minutes > 1 { "s" } else { "" };
        return format!("Há {minutes} minuto{plural}");
    }
    let hours = minutes / 60;
    if hours < 24 {
        let plural = if hours > 1 { "s" } else { "" };
        return format!("Há {hours} hora{plural}");
    }
    at.with_timezone(tz).format("%d/%m/%Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 17, 12, 0, 0).unwrap()
    }

    #[test]
    fn numbers_drop_trailing_zero_fraction() {
        assert_eq!(number(42.0), "42");
        assert_eq!(number(42.5), "42.5");
    }

    #[test]
    fn thousands_use_dot_separator() {
        assert_eq!(thousands(0), "0");
        assert_eq!(thousands(999), "999");
        assert_eq!(thousands(1_000), "1.000");
        assert_eq!(thousands(22_076), "22.076");
        assert_eq!(thousands(1_234_567), "1.234.567");
    }

    #[test]
    fn stay_duration_splits_hours() {
        assert_eq!(stay_duration(120), "2h0min");
        assert_eq!(stay_duration(95), "1h35min");
        assert_eq!(stay_duration(45), "45min");
    }

    #[test]
    fn relative_age_steps() {
        let now = now();
        assert_eq!(relative_age(None, now), "N/A");
        assert_eq!(relative_age(Some(&(now - Duration::seconds(42))), now), "42s atrás");
        assert_eq!(relative_age(Some(&(now - Duration::minutes(5))), now), "5min atrás");
        assert_eq!(relative_age(Some(&(now - Duration::hours(3))), now), "3h atrás");
        assert_eq!(relative_age(Some(&(now - Duration::days(2))), now), "2d atrás");
    }

    #[test]
    fn spoken_age_pluralizes() {
        let now = now();
        assert_eq!(spoken_age(None, now, &Utc), "Agora");
        assert_eq!(spoken_age(Some(&(now - Duration::seconds(30))), now, &Utc), "Agora");
        assert_eq!(spoken_age(Some(&(now - Duration::minutes(1))), now, &Utc), "Há 1 minuto");
        assert_eq!(spoken_age(Some(&(now - Duration::minutes(7))), now, &Utc), "Há 7 minutos");
        assert_eq!(spoken_age(Some(&(now - Duration::hours(2))), now, &Utc), "Há 2 horas");
        assert_eq!(spoken_age(Some(&(now - Duration::days(3))), now, &Utc), "14/10/2026");
    }

    #[test]
    fn date_time_uses_day_first() {
        assert_eq!(date_time(&now(), &Utc), "17/10/2026 12:00");
        assert_eq!(clock_time(&now(), &Utc), "12:00");
    }
}
