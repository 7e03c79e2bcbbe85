use chrono::{DateTime, Utc};
use chrono_tz::America::Sao_Paulo;
use chrono_tz::Tz;

/// Timezone used for every date shown on cards and head-to-head lines.
pub const LEAGUE_TZ: Tz = Sao_Paulo;

/// `dd/mm • HH:MM` in league local time.
pub fn format_card_datetime(at: DateTime<Utc>) -> String {
    at.with_timezone(&LEAGUE_TZ).format("%d/%m • %H:%M").to_string()
}

/// `dd/mm/yyyy` in league local time.
pub fn format_short_date(at: DateTime<Utc>) -> String {
    at.with_timezone(&LEAGUE_TZ).format("%d/%m/%Y").to_string()
}
