use chrono::{FixedOffset, NaiveDateTime, NaiveTime, Timelike, Weekday};
use log::debug;

use super::error::{ReadError, Result};

// ---------------------------------------------------------------------------
// Header date
// ---------------------------------------------------------------------------

/// Layouts of the `Date:` header value, tried in order.
const HEADER_DATE_FORMATS: &[&str] = &[
    "%a %b %d %H:%M:%S %Y",
    "%b %d %H:%M:%S %Y",
    "%a %b %d %H:%M:%S%.f %Y",
    "%b %d %H:%M:%S%.f %Y",
];

/// Absolute acquisition start declared in the file header.
///
/// OceanView writes the date the way Java's `Date.toString()` does, e.g.
/// `Mon Aug 18 15:23:28 CEST 2025` or `Mon Aug 18 15:23:28 GMT+02:00 2025`.
/// The zone token is removed before parsing; when it names a known offset
/// the offset is kept so the epoch anchor is correct. Without one the
/// timestamp is taken as UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderDate {
    pub naive: NaiveDateTime,
    pub offset: Option<FixedOffset>,
}

impl HeaderDate {
    /// Parse a header date value (a leading `Date:` label is tolerated).
    pub fn parse(raw: &str) -> Result<Self> {
        let mut s = raw.trim();
        if s.get(..5).is_some_and(|p| p.eq_ignore_ascii_case("date:")) {
            s = s[5..].trim_start();
        }

        let (cleaned, offset) = strip_zone(s);
        parse_header_layouts(&cleaned)
            .or_else(|| {
                // chrono rejects a weekday that disagrees with the date
                let (first, rest) = cleaned.split_once(' ')?;
                first.parse::<Weekday>().ok()?;
                debug!("Ignoring weekday '{first}' in header date {cleaned:?}");
                parse_header_layouts(rest)
            })
            .map(|naive| HeaderDate { naive, offset })
            .ok_or_else(|| ReadError::HeaderDate {
                raw: raw.to_string(),
            })
    }

    /// Replace the sub-second part with `millis` milliseconds.
    pub fn with_millis(self, millis: u32) -> Self {
        let naive = self
            .naive
            .with_nanosecond(millis * 1_000_000)
            .unwrap_or(self.naive);
        HeaderDate { naive, ..self }
    }

    /// Unix epoch seconds, honouring the recovered offset (UTC otherwise).
    pub fn epoch_seconds(&self) -> f64 {
        let utc = self.naive.and_utc();
        let offset = self.offset.map_or(0, |o| i64::from(o.local_minus_utc()));
        (utc.timestamp() - offset) as f64 + f64::from(utc.timestamp_subsec_nanos()) / 1e9
    }
}

fn parse_header_layouts(s: &str) -> Option<NaiveDateTime> {
    HEADER_DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
}

/// Collapse whitespace and drop timezone tokens, returning the offset they
/// carried if it is known.
fn strip_zone(s: &str) -> (String, Option<FixedOffset>) {
    let mut offset = None;
    let mut tokens: Vec<&str> = s.split_whitespace().collect();

    tokens.retain(|tok| match gmt_offset(tok) {
        Some(parsed) => {
            offset = offset.or(parsed);
            false
        }
        None => true,
    });

    // The abbreviation sits either just before or just after the year.
    let n = tokens.len();
    let zone_at = if n < 2 {
        None
    } else if is_year(tokens[n - 1]) && is_zone_abbreviation(tokens[n - 2]) {
        Some(n - 2)
    } else if is_year(tokens[n - 2]) && is_zone_abbreviation(tokens[n - 1]) {
        Some(n - 1)
    } else {
        None
    };
    if let Some(at) = zone_at {
        let zone = tokens.remove(at);
        offset = offset.or_else(|| known_zone_offset(zone));
        if offset.is_none() {
            debug!("Unknown timezone '{zone}' in header date, assuming UTC");
        }
    }

    (tokens.join(" "), offset)
}

/// `GMT+2`, `GMT-05:30` → `Some(offset)`. Returns `None` when the token is not
/// a GMT offset at all; `Some(None)` when it is one but out of range.
fn gmt_offset(tok: &str) -> Option<Option<FixedOffset>> {
    let rest = tok.strip_prefix("GMT")?;
    let sign = match rest.chars().next()? {
        '+' => 1,
        '-' => -1,
        _ => return None,
    };
    let rest = &rest[1..];
    let (hours, minutes) = rest.split_once(':').unwrap_or((rest, "00"));
    if !(1..=2).contains(&hours.len()) || minutes.len() != 2 {
        return None;
    }
    if !hours.bytes().chain(minutes.bytes()).all(|b| b.is_ascii_digit()) {
        return None;
    }
    let hours: i32 = hours.parse().ok()?;
    let minutes: i32 = minutes.parse().ok()?;
    Some(FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60)))
}

fn is_year(tok: &str) -> bool {
    tok.len() == 4 && tok.bytes().all(|b| b.is_ascii_digit())
}

fn is_zone_abbreviation(tok: &str) -> bool {
    (2..=5).contains(&tok.len()) && tok.bytes().all(|b| b.is_ascii_uppercase())
}

fn known_zone_offset(zone: &str) -> Option<FixedOffset> {
    let minutes = match zone {
        "UTC" | "GMT" | "WET" => 0,
        "CET" | "WEST" | "BST" => 60,
        "CEST" | "EET" => 120,
        "EEST" => 180,
        "IST" => 330,
        "PST" => -480,
        "PDT" | "MST" => -420,
        "MDT" | "CST" => -360,
        "CDT" | "EST" => -300,
        "EDT" => -240,
        _ => return None,
    };
    FixedOffset::east_opt(minutes * 60)
}

// ---------------------------------------------------------------------------
// Row time
// ---------------------------------------------------------------------------

enum RowTimeFormat {
    DateTime(&'static str),
    TimeOfDay(&'static str),
}

const ROW_TIME_FORMATS: &[RowTimeFormat] = &[
    RowTimeFormat::DateTime("%Y-%m-%d %H:%M:%S%.f"),
    RowTimeFormat::TimeOfDay("%H:%M:%S%.f"),
    RowTimeFormat::DateTime("%Y-%m-%d %H:%M:%S"),
    RowTimeFormat::TimeOfDay("%H:%M:%S"),
    RowTimeFormat::TimeOfDay("%H-%M-%S-%3f"),
];

impl RowTimeFormat {
    fn seconds(&self, stamp: &str) -> Option<f64> {
        match self {
            RowTimeFormat::DateTime(fmt) => {
                let dt = NaiveDateTime::parse_from_str(stamp, fmt).ok()?.and_utc();
                Some(dt.timestamp() as f64 + f64::from(dt.timestamp_subsec_nanos()) / 1e9)
            }
            RowTimeFormat::TimeOfDay(fmt) => {
                let t = NaiveTime::parse_from_str(stamp, fmt).ok()?;
                Some(f64::from(t.num_seconds_from_midnight()) + f64::from(t.nanosecond()) / 1e9)
            }
        }
    }
}

/// Seconds value of a data-row timestamp.
///
/// Clock times give seconds since midnight, full datetimes seconds since the
/// Unix epoch, bare numbers are taken as seconds. Anything else is `NaN`.
pub fn parse_row_time(stamp: &str) -> f64 {
    let stamp = stamp.trim();
    ROW_TIME_FORMATS
        .iter()
        .find_map(|fmt| fmt.seconds(stamp))
        .or_else(|| parse_decimal(stamp))
        .unwrap_or(f64::NAN)
}

// ---------------------------------------------------------------------------
// Filename clock segment and numbers
// ---------------------------------------------------------------------------

/// Milliseconds from a `__HH-MM-SS-mmm` segment in a file path.
///
/// OceanView names each saved spectrum after its acquisition clock time, which
/// is more precise than the whole-second header date.
pub fn filename_millis(path: &str) -> Option<u32> {
    const SEGMENT: &[u8] = b"__00-00-00-000";
    path.as_bytes().windows(SEGMENT.len()).find_map(|w| {
        let matches = w.iter().zip(SEGMENT).all(|(&b, &p)| match p {
            b'0' => b.is_ascii_digit(),
            _ => b == p,
        });
        matches.then(|| {
            w[11..]
                .iter()
                .fold(0u32, |acc, &d| acc * 10 + u32::from(d - b'0'))
        })
    })
}

/// Parse a float that may use a decimal comma.
pub fn parse_decimal(token: &str) -> Option<f64> {
    if token.contains(',') {
        token.replace(',', ".").parse().ok()
    } else {
        token.parse().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn naive(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32, ms: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_milli_opt(h, mi, s, ms)
            .unwrap()
    }

    #[test]
    fn header_date_with_weekday() {
        let date = HeaderDate::parse("Mon Jan 02 03:04:05 2023").unwrap();
        assert_eq!(date.naive, naive(2023, 1, 2, 3, 4, 5, 0));
        assert_eq!(date.offset, None);
        assert_eq!(date.epoch_seconds(), 1_672_628_645.0);
    }

    #[test]
    fn header_date_without_weekday_and_fraction() {
        let date = HeaderDate::parse("Jan 02 03:04:05.250 2023").unwrap();
        assert_eq!(date.naive, naive(2023, 1, 2, 3, 4, 5, 250));
        assert_eq!(date.epoch_seconds(), 1_672_628_645.25);
    }

    #[test]
    fn header_date_label_and_spacing_are_tolerated() {
        let date = HeaderDate::parse("Date:  Mon   Jan 02  03:04:05\t2023 ").unwrap();
        assert_eq!(date.naive, naive(2023, 1, 2, 3, 4, 5, 0));
    }

    #[test]
    fn zone_abbreviation_keeps_naive_time_and_shifts_epoch() {
        let plain = HeaderDate::parse("Mon Jan 02 03:04:05 2023").unwrap();
        let est = HeaderDate::parse("Mon Jan 02 03:04:05 EST 2023").unwrap();
        assert_eq!(plain.naive, est.naive);
        assert_eq!(est.epoch_seconds() - plain.epoch_seconds(), 5.0 * 3600.0);

        let cest = HeaderDate::parse("Mon Aug 18 15:23:28 CEST 2025").unwrap();
        assert_eq!(cest.offset, FixedOffset::east_opt(7200));
    }

    #[test]
    fn zone_abbreviation_after_year() {
        let plain = HeaderDate::parse("Mon Jan 02 03:04:05 2023").unwrap();
        let est = HeaderDate::parse("Mon Jan 02 03:04:05 2023 EST").unwrap();
        assert_eq!(plain.naive, est.naive);
        assert_eq!(est.offset, FixedOffset::east_opt(-5 * 3600));
        assert_eq!(est.epoch_seconds() - plain.epoch_seconds(), 5.0 * 3600.0);
    }

    #[test]
    fn mismatched_weekday_is_ignored() {
        let date = HeaderDate::parse("Mon Jan 03 03:04:05 2023").unwrap();
        assert_eq!(date.naive, naive(2023, 1, 3, 3, 4, 5, 0));

        let date = HeaderDate::parse("Fri Aug 18 15:23:28.5 CEST 2025").unwrap();
        assert_eq!(date.naive, naive(2025, 8, 18, 15, 23, 28, 500));
        assert_eq!(date.offset, FixedOffset::east_opt(7200));
    }

    #[test]
    fn unknown_zone_abbreviation_is_stripped_as_utc() {
        let date = HeaderDate::parse("Mon Jan 02 03:04:05 XYZ 2023").unwrap();
        assert_eq!(date.naive, naive(2023, 1, 2, 3, 4, 5, 0));
        assert_eq!(date.offset, None);
    }

    #[test]
    fn gmt_offset_tokens() {
        let plus = HeaderDate::parse("Mon Aug 18 15:23:28 GMT+2 2025").unwrap();
        assert_eq!(plus.naive, naive(2025, 8, 18, 15, 23, 28, 0));
        assert_eq!(plus.offset, FixedOffset::east_opt(7200));

        let minus = HeaderDate::parse("Mon Aug 18 15:23:28 GMT-05:30 2025").unwrap();
        assert_eq!(minus.offset, FixedOffset::east_opt(-(5 * 3600 + 30 * 60)));
    }

    #[test]
    fn header_date_parsing_is_repeatable() {
        let a = HeaderDate::parse("Tue Mar 14 09:26:53 CET 2023").unwrap();
        let b = HeaderDate::parse("Tue Mar 14 09:26:53 CET 2023").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.epoch_seconds(), b.epoch_seconds());
    }

    #[test]
    fn unparseable_header_date_carries_raw_text() {
        let err = HeaderDate::parse("yesterday afternoon").unwrap_err();
        match err {
            ReadError::HeaderDate { raw } => assert_eq!(raw, "yesterday afternoon"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn millis_replace_subsecond_part() {
        let date = HeaderDate::parse("Mon Jan 02 03:04:05.700 2023")
            .unwrap()
            .with_millis(946);
        assert_eq!(date.naive, naive(2023, 1, 2, 3, 4, 5, 946));
        assert!((date.epoch_seconds() - 1_672_628_645.946).abs() < 1e-6);
    }

    #[test]
    fn row_time_grammar() {
        assert_eq!(parse_row_time("00:00:01.500"), 1.5);
        assert_eq!(parse_row_time("13:42:52"), 49_372.0);
        assert!((parse_row_time("13-42-52-946") - 49_372.946).abs() < 1e-9);
        assert!((parse_row_time("1970-01-01 01:24:29.367452") - 5069.367452).abs() < 1e-9);
        assert_eq!(parse_row_time("1970-01-02 00:00:00"), 86_400.0);
        assert_eq!(parse_row_time(" 12,5 "), 12.5);
        assert_eq!(parse_row_time("42"), 42.0);
        assert!(parse_row_time("not a time").is_nan());
    }

    #[test]
    fn filename_segment() {
        assert_eq!(filename_millis("/data/USB4F__0__13-42-52-946.txt"), Some(946));
        assert_eq!(filename_millis("run__00-00-00-007"), Some(7));
        assert_eq!(filename_millis("run_13-42-52-946.txt"), None);
        assert_eq!(filename_millis("run__1-42-52-946.txt"), None);
        assert_eq!(filename_millis("short"), None);
    }

    #[test]
    fn decimal_comma() {
        assert_eq!(parse_decimal("1,23"), parse_decimal("1.23"));
        assert_eq!(parse_decimal("-0,5"), Some(-0.5));
        assert_eq!(parse_decimal("x"), None);
    }
}
