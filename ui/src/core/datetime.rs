//! Timestamp parsing and display.
//!
//! Backend rows carry loosely ISO-8601 strings: a space instead of `T`,
//! microsecond fractions, `+00` style offsets. Everything here funnels those
//! through [`parse`], which never fails loudly: unparsable input becomes
//! [`ParsedDate::Invalid`] and every formatter renders it as
//! [`INVALID_DATE`].
//!
//! Returned human strings are English (en-US conventions).

use once_cell::sync::Lazy;
use regex::Regex;
use time::{
    format_description::{well_known::Rfc3339, BorrowedFormatItem},
    macros::format_description,
    Date, OffsetDateTime, PrimitiveDateTime, UtcOffset,
};

use super::format::js_round;

/// Display string for anything [`parse`] rejects.
pub const INVALID_DATE: &str = "Invalid date";

/// Pattern used by [`format_pattern`] callers that don't need anything fancier.
pub const DEFAULT_PATTERN: &str = "YYYY-MM-DD HH:mm:ss";

static EXTRA_FRACTION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\.\d{3})\d+").expect("fraction pattern compiles"));

/// Rewrite the first space separator to `T` and trim fractional seconds to
/// millisecond precision. Empty input is returned unchanged.
pub fn normalize_iso(input: &str) -> String {
    if input.is_empty() {
        return String::new();
    }
    let with_t = input.replacen(' ', "T", 1);
    EXTRA_FRACTION.replace(&with_t, "$1").into_owned()
}

/// Result of [`parse`]: either an instant or the explicit invalid sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParsedDate {
    Valid(OffsetDateTime),
    Invalid,
}

impl ParsedDate {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid(_))
    }

    pub fn instant(self) -> Option<OffsetDateTime> {
        match self {
            Self::Valid(at) => Some(at),
            Self::Invalid => None,
        }
    }

    /// Milliseconds since the Unix epoch, floored.
    pub fn unix_millis(self) -> Option<i128> {
        self.instant()
            .map(|at| at.unix_timestamp_nanos().div_euclid(1_000_000))
    }
}

/// Anything the formatters accept: raw backend text or an already-parsed instant.
#[derive(Debug, Clone, Copy)]
pub enum DateInput<'a> {
    Text(&'a str),
    Instant(OffsetDateTime),
}

impl<'a> From<&'a str> for DateInput<'a> {
    fn from(value: &'a str) -> Self {
        Self::Text(value)
    }
}

impl<'a> From<&'a String> for DateInput<'a> {
    fn from(value: &'a String) -> Self {
        Self::Text(value.as_str())
    }
}

impl From<OffsetDateTime> for DateInput<'_> {
    fn from(value: OffsetDateTime) -> Self {
        Self::Instant(value)
    }
}

/// Parse backend text (or pass an instant through).
///
/// Accepted text, after [`normalize_iso`]:
/// - RFC 3339 with `Z` or `±HH:MM`
/// - date-time with a short `±HH` / `±HHMM` offset
/// - date-time without offset, read in the local zone
/// - bare `YYYY-MM-DD`, read as UTC midnight
pub fn parse<'a>(input: impl Into<DateInput<'a>>) -> ParsedDate {
    match input.into() {
        DateInput::Instant(at) => ParsedDate::Valid(at),
        DateInput::Text(raw) => parse_text(raw),
    }
}

fn parse_text(raw: &str) -> ParsedDate {
    let text = normalize_iso(raw.trim());
    if text.is_empty() {
        return ParsedDate::Invalid;
    }

    if let Ok(at) = OffsetDateTime::parse(&text, &Rfc3339) {
        return ParsedDate::Valid(at);
    }

    let short_offsets = [
        format_description!(
            "[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond][offset_hour sign:mandatory]"
        ),
        format_description!("[year]-[month]-[day]T[hour]:[minute]:[second][offset_hour sign:mandatory]"),
        format_description!(
            "[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond][offset_hour sign:mandatory][offset_minute]"
        ),
        format_description!(
            "[year]-[month]-[day]T[hour]:[minute]:[second][offset_hour sign:mandatory][offset_minute]"
        ),
    ];
    for description in short_offsets {
        if let Ok(at) = OffsetDateTime::parse(&text, description) {
            return ParsedDate::Valid(at);
        }
    }

    let floating = [
        format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond]"),
        format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]"),
        format_description!("[year]-[month]-[day]T[hour]:[minute]"),
    ];
    for description in floating {
        if let Ok(local) = PrimitiveDateTime::parse(&text, description) {
            let offset = local_offset_at(local.assume_utc());
            return ParsedDate::Valid(local.assume_offset(offset));
        }
    }

    match Date::parse(&text, format_description!("[year]-[month]-[day]")) {
        Ok(day) => ParsedDate::Valid(day.midnight().assume_utc()),
        Err(_) => ParsedDate::Invalid,
    }
}

/// The calendar day a `YYYY-MM-DD…` string names, ignoring any time or zone.
pub fn calendar_date(text: &str) -> Option<Date> {
    let head = text.trim().get(..10)?;
    Date::parse(head, format_description!("[year]-[month]-[day]")).ok()
}

/// Axis/tooltip label such as `Mar 5`.
pub fn format_date_label(text: &str) -> String {
    calendar_date(text)
        .and_then(|day| {
            day.format(format_description!("[month repr:short] [day padding:none]"))
                .ok()
        })
        .unwrap_or_else(|| INVALID_DATE.to_string())
}

fn local_offset_at(at: OffsetDateTime) -> UtcOffset {
    // The time crate refuses to read the local zone in some multi-threaded
    // processes; UTC is the fallback there.
    UtcOffset::local_offset_at(at).unwrap_or(UtcOffset::UTC)
}

/// Which wall clock an instant is rendered on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Zone {
    #[default]
    Local,
    Utc,
    Fixed(UtcOffset),
}

impl Zone {
    fn offset_for(self, at: OffsetDateTime) -> UtcOffset {
        match self {
            Zone::Local => local_offset_at(at),
            Zone::Utc => UtcOffset::UTC,
            Zone::Fixed(offset) => offset,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    Short,
    Medium,
    Long,
    Full,
}

/// Options for [`format_human`]. Defaults to medium date and time on a 24-hour
/// clock in the local zone, e.g. `Oct 20, 2025, 16:46:43`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HumanFormat {
    pub date_style: Option<Style>,
    pub time_style: Option<Style>,
    pub hour12: bool,
    pub zone: Zone,
}

impl Default for HumanFormat {
    fn default() -> Self {
        Self {
            date_style: Some(Style::Medium),
            time_style: Some(Style::Medium),
            hour12: false,
            zone: Zone::Local,
        }
    }
}

impl HumanFormat {
    pub fn date_only(style: Style) -> Self {
        Self {
            date_style: Some(style),
            time_style: None,
            ..Self::default()
        }
    }

    pub fn in_zone(mut self, zone: Zone) -> Self {
        self.zone = zone;
        self
    }
}

/// Human-friendly rendering, e.g. `Oct 20, 2025, 16:46:43`.
pub fn format_human<'a>(input: impl Into<DateInput<'a>>, opts: &HumanFormat) -> String {
    let Some(at) = parse(input).instant() else {
        return INVALID_DATE.to_string();
    };
    let Some(at) = at.checked_to_offset(opts.zone.offset_for(at)) else {
        return INVALID_DATE.to_string();
    };

    let date = match opts.date_style {
        Some(style) => render_date(at, style),
        None if opts.time_style.is_none() => render(
            at,
            format_description!("[month padding:none]/[day padding:none]/[year]"),
        ),
        None => None,
    };
    let time = opts.time_style.and_then(|style| render_time(at, style, opts.hour12));

    match (date, time) {
        (Some(date), Some(time)) => {
            let joiner = match opts.date_style {
                Some(Style::Long | Style::Full) => " at ",
                _ => ", ",
            };
            format!("{date}{joiner}{time}")
        }
        (Some(date), None) => date,
        (None, Some(time)) => time,
        (None, None) => "—".to_string(),
    }
}

/// [`format_human`] pinned to UTC.
pub fn format_utc<'a>(input: impl Into<DateInput<'a>>, opts: &HumanFormat) -> String {
    format_human(input, &opts.in_zone(Zone::Utc))
}

fn render(at: OffsetDateTime, description: &[BorrowedFormatItem<'_>]) -> Option<String> {
    at.format(description).ok()
}

fn render_date(at: OffsetDateTime, style: Style) -> Option<String> {
    match style {
        Style::Short => render(
            at,
            format_description!("[month padding:none]/[day padding:none]/[year repr:last_two]"),
        ),
        Style::Medium => render(
            at,
            format_description!("[month repr:short] [day padding:none], [year]"),
        ),
        Style::Long => render(
            at,
            format_description!("[month repr:long] [day padding:none], [year]"),
        ),
        Style::Full => render(
            at,
            format_description!("[weekday], [month repr:long] [day padding:none], [year]"),
        ),
    }
}

fn render_time(at: OffsetDateTime, style: Style, hour12: bool) -> Option<String> {
    let clock = match (style, hour12) {
        (Style::Short, false) => render(at, format_description!("[hour]:[minute]")),
        (Style::Short, true) => render(
            at,
            format_description!("[hour repr:12 padding:none]:[minute] [period]"),
        ),
        (_, false) => render(at, format_description!("[hour]:[minute]:[second]")),
        (_, true) => render(
            at,
            format_description!("[hour repr:12 padding:none]:[minute]:[second] [period]"),
        ),
    }?;

    match style {
        Style::Long | Style::Full => Some(format!("{clock} {}", zone_label(at.offset()))),
        _ => Some(clock),
    }
}

/// `UTC`, `GMT+2`, `GMT-5`, `GMT+5:30`.
fn zone_label(offset: UtcOffset) -> String {
    if offset.is_utc() {
        return "UTC".to_string();
    }
    let (hours, minutes, _) = offset.as_hms();
    let sign = if offset.is_negative() { '-' } else { '+' };
    if minutes == 0 {
        format!("GMT{sign}{}", hours.abs())
    } else {
        format!("GMT{sign}{}:{:02}", hours.abs(), minutes.abs())
    }
}

/// Token substitution in the local zone. Supported tokens: `YYYY MM DD HH mm
/// ss SSS`, `ZZ` (`±HHMM`) and `Z` (`±HH:MM`).
pub fn format_pattern<'a>(input: impl Into<DateInput<'a>>, pattern: &str) -> String {
    let Some(at) = parse(input).instant() else {
        return INVALID_DATE.to_string();
    };
    match at.checked_to_offset(local_offset_at(at)) {
        Some(local) => substitute(local, pattern),
        None => INVALID_DATE.to_string(),
    }
}

/// [`format_pattern`] against an explicit offset instead of the local zone.
pub fn format_pattern_at<'a>(
    input: impl Into<DateInput<'a>>,
    pattern: &str,
    offset: UtcOffset,
) -> String {
    match parse(input).instant() {
        Some(at) => at
            .checked_to_offset(offset)
            .map_or_else(|| INVALID_DATE.to_string(), |shifted| substitute(shifted, pattern)),
        None => INVALID_DATE.to_string(),
    }
}

fn substitute(at: OffsetDateTime, pattern: &str) -> String {
    let offset = at.offset();
    let total_minutes = offset.whole_minutes();
    let sign = if total_minutes >= 0 { '+' } else { '-' };
    let abs = total_minutes.unsigned_abs();
    let (tz_h, tz_m) = (abs / 60, abs % 60);

    pattern
        .replace("YYYY", &at.year().to_string())
        .replace("MM", &format!("{:02}", u8::from(at.month())))
        .replace("DD", &format!("{:02}", at.day()))
        .replace("HH", &format!("{:02}", at.hour()))
        .replace("mm", &format!("{:02}", at.minute()))
        .replace("ss", &format!("{:02}", at.second()))
        .replace("SSS", &format!("{:03}", at.millisecond()))
        .replace("ZZ", &format!("{sign}{tz_h:02}{tz_m:02}"))
        .replace('Z', &format!("{sign}{tz_h:02}:{tz_m:02}"))
}

/// Units for [`format_relative`], coarsest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelativeUnit {
    Year,
    Month,
    Week,
    Day,
    Hour,
    Minute,
    Second,
}

impl RelativeUnit {
    pub const ALL: [RelativeUnit; 7] = [
        RelativeUnit::Year,
        RelativeUnit::Month,
        RelativeUnit::Week,
        RelativeUnit::Day,
        RelativeUnit::Hour,
        RelativeUnit::Minute,
        RelativeUnit::Second,
    ];

    pub fn seconds(self) -> i64 {
        match self {
            RelativeUnit::Year => 31_536_000,
            RelativeUnit::Month => 2_592_000,
            RelativeUnit::Week => 604_800,
            RelativeUnit::Day => 86_400,
            RelativeUnit::Hour => 3_600,
            RelativeUnit::Minute => 60,
            RelativeUnit::Second => 1,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            RelativeUnit::Year => "year",
            RelativeUnit::Month => "month",
            RelativeUnit::Week => "week",
            RelativeUnit::Day => "day",
            RelativeUnit::Hour => "hour",
            RelativeUnit::Minute => "minute",
            RelativeUnit::Second => "second",
        }
    }
}

/// Bucket a signed difference (positive = future) into the coarsest unit
/// whose magnitude is reached.
pub fn relative_parts(diff_secs: i64) -> (i64, RelativeUnit) {
    for unit in RelativeUnit::ALL {
        if diff_secs.abs() >= unit.seconds() || unit == RelativeUnit::Second {
            let value = js_round(diff_secs as f64 / unit.seconds() as f64) as i64;
            return (value, unit);
        }
    }
    (diff_secs, RelativeUnit::Second)
}

/// English phrase for a relative value, preferring words over `1`/`0`
/// (`yesterday`, `next week`, `now`).
pub fn humanize_relative(value: i64, unit: RelativeUnit) -> String {
    let name = unit.name();
    match (unit, value) {
        (RelativeUnit::Second, 0) => "now".to_string(),
        (RelativeUnit::Day, -1) => "yesterday".to_string(),
        (RelativeUnit::Day, 0) => "today".to_string(),
        (RelativeUnit::Day, 1) => "tomorrow".to_string(),
        (RelativeUnit::Minute | RelativeUnit::Hour, 0) => format!("this {name}"),
        (RelativeUnit::Week | RelativeUnit::Month | RelativeUnit::Year, -1) => {
            format!("last {name}")
        }
        (RelativeUnit::Week | RelativeUnit::Month | RelativeUnit::Year, 0) => {
            format!("this {name}")
        }
        (RelativeUnit::Week | RelativeUnit::Month | RelativeUnit::Year, 1) => {
            format!("next {name}")
        }
        _ => {
            let count = value.unsigned_abs();
            let plural = if count == 1 { "" } else { "s" };
            if value < 0 {
                format!("{count} {name}{plural} ago")
            } else {
                format!("in {count} {name}{plural}")
            }
        }
    }
}

/// Relative phrase for `from` measured against now.
pub fn format_relative<'a>(from: impl Into<DateInput<'a>>) -> String {
    format_relative_to(from, OffsetDateTime::now_utc())
}

/// Relative phrase for `from` measured against `to`, e.g. `3 hours ago`.
pub fn format_relative_to<'a, 'b>(
    from: impl Into<DateInput<'a>>,
    to: impl Into<DateInput<'b>>,
) -> String {
    let (Some(start), Some(end)) = (parse(from).unix_millis(), parse(to).unix_millis()) else {
        return INVALID_DATE.to_string();
    };
    let diff_secs = js_round((start - end) as f64 / 1000.0) as i64;
    let (value, unit) = relative_parts(diff_secs);
    humanize_relative(value, unit)
}
