//! Birth time normalization: local wall clock in an IANA zone to UTC.

use crate::error::ValidationError;
use chrono::{
    DateTime, Duration, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, Offset, TimeZone, Utc,
};
use chrono_tz::Tz;

lazy_static::lazy_static! {
    static ref DATE_RE: regex::Regex = regex::Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap();
    static ref TIME_RE: regex::Regex = regex::Regex::new(r"^(?:[01]\d|2[0-3]):[0-5]\d$").unwrap();
}

/// Local time assumed when no birth time is given.
pub const ASSUMED_LOCAL_TIME: &str = "12:00";

/// A birth instant resolved to UTC
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedTime {
    pub utc: DateTime<Utc>,
    /// `YYYY-MM-DDTHH:MM:SSZ`
    pub utc_iso: String,
    /// True when the caller gave no time and local noon was used
    pub time_assumed: bool,
}

/// Resolve a local birth date and optional `HH:MM` time in `timezone` to UTC.
pub fn normalize(
    date: &str,
    time: Option<&str>,
    timezone: &str,
) -> Result<NormalizedTime, ValidationError> {
    let tz: Tz = timezone
        .parse()
        .map_err(|_| ValidationError::InvalidTimezone {
            timezone: timezone.to_string(),
        })?;

    let date = parse_date(date)?;

    let supplied = time.map(str::trim).filter(|t| !t.is_empty());
    let time_assumed = supplied.is_none();
    let time = parse_time(supplied.unwrap_or(ASSUMED_LOCAL_TIME))?;

    let utc = local_to_utc(tz, date.and_time(time));
    Ok(NormalizedTime {
        utc,
        utc_iso: utc.format("%Y-%m-%dT%H:%M:%SZ").to_string(),
        time_assumed,
    })
}

fn parse_date(raw: &str) -> Result<NaiveDate, ValidationError> {
    let raw = raw.trim();
    let invalid = || ValidationError::InvalidDate {
        date: raw.to_string(),
    };
    if !DATE_RE.is_match(raw) {
        return Err(invalid());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| invalid())
}

fn parse_time(raw: &str) -> Result<NaiveTime, ValidationError> {
    let invalid = || ValidationError::InvalidTime {
        time: raw.to_string(),
    };
    if !TIME_RE.is_match(raw) {
        return Err(invalid());
    }
    NaiveTime::parse_from_str(raw, "%H:%M").map_err(|_| invalid())
}

/// Convert a wall-clock time to UTC using the zone's historical rules.
///
/// Ambiguous times (clocks turned back) take the earlier instant. Times
/// inside a gap (clocks turned forward) use the offset in force before it.
fn local_to_utc(tz: Tz, naive: NaiveDateTime) -> DateTime<Utc> {
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => dt.with_timezone(&Utc),
        LocalResult::Ambiguous(earliest, _) => earliest.with_timezone(&Utc),
        LocalResult::None => {
            let before = tz.offset_from_utc_datetime(&(naive - Duration::days(1)));
            let offset = before.fix().local_minus_utc() as i64;
            Utc.from_utc_datetime(&(naive - Duration::seconds(offset)))
        }
    }
}
