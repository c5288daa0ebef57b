//! Partial-precision date parsing and comparison.
//!
//! A date argument like `"2020-03"` commits the caller to two fields; the
//! number of supplied fields IS the precision and drives how the value is
//! compared against a fully-resolved header date.

use std::cmp::Ordering;
use std::sync::OnceLock;

use chrono::{DateTime, Datelike, Local, NaiveDate, NaiveDateTime, Timelike};
use regex::Regex;

/// A header date fully resolved to local wall-clock fields:
/// year, month, day, hour, minute, second.
pub type HeaderDate = [i32; 6];

/// A parsed partial date-time argument, 1 to 6 fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateArg {
    fields: Vec<i32>,
}

impl DateArg {
    /// Number of fields the caller supplied.
    pub fn precision(&self) -> usize {
        self.fields.len()
    }

    /// The supplied fields, year first.
    pub fn fields(&self) -> &[i32] {
        &self.fields
    }

    /// The fields zero-padded to all six positions.
    fn padded(&self) -> [i32; 6] {
        let mut out = [0i32; 6];
        out[..self.fields.len()].copy_from_slice(&self.fields);
        out
    }
}

/// Per-field pattern fragments: year, then `-MM`, `-DD`, ` HH`, `:MM`, `:SS`.
const FIELD_PATTERNS: [&str; 6] = [
    r"(\d{4})",
    r"-(\d{1,2})",
    r"-(\d{1,2})",
    r" (\d{1,2})",
    r":(\d{1,2})",
    r":(\d{1,2})",
];

/// The six progressively-extended anchored patterns, compiled once.
fn patterns() -> &'static [Regex] {
    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        let mut prefix = String::new();
        FIELD_PATTERNS
            .iter()
            .map(|fragment| {
                prefix.push_str(fragment);
                Regex::new(&format!("^{prefix}$")).expect("date pattern is valid")
            })
            .collect()
    })
}

/// Parse a partial date-time argument (`YYYY[-MM[-DD[ HH[:MM[:SS]]]]]`).
///
/// The longest pattern matching the entire input decides the precision.
/// With three or more fields the zero-padded tuple must form a valid
/// calendar date-time or the whole parse fails; with exactly two fields
/// only a month above 12 is rejected. Returns `None` when nothing
/// matches.
pub fn parse_time_arg(text: &str) -> Option<DateArg> {
    let mut result = None;

    for re in patterns() {
        if let Some(caps) = re.captures(text) {
            let fields: Vec<i32> = caps
                .iter()
                .skip(1)
                .flatten()
                .filter_map(|m| m.as_str().parse().ok())
                .collect();

            result = match fields.len() {
                n if n >= 3 => {
                    let arg = DateArg { fields };
                    construct(&arg.padded()).map(|_| arg)
                }
                // A month of 0 slips through here; kept for compatibility
                // with the established two-field behavior.
                2 if fields[1] > 12 => None,
                _ => Some(DateArg { fields }),
            };
        }
    }

    result
}

/// Resolve a raw `Date` header value to local wall-clock fields.
///
/// Strict RFC 2822 parsing only; the offset in the header is converted to
/// local time before the fields are extracted. Values that fail strict
/// parsing are treated as absent.
pub fn parse_date_header(raw: Option<&str>) -> Option<HeaderDate> {
    let raw = raw?;
    let parsed = DateTime::parse_from_rfc2822(raw.trim()).ok()?;
    let local = parsed.with_timezone(&Local);
    Some([
        local.year(),
        local.month() as i32,
        local.day() as i32,
        local.hour() as i32,
        local.minute() as i32,
        local.second() as i32,
    ])
}

/// Compare a partial argument against a header date under an ordering.
///
/// `Ordering::Greater` asks "is the argument after the header?" (the test
/// behind *before* predicates); `Ordering::Less` the opposite.
///
/// With three or more fields both sides are zero-padded to full
/// date-times and compared whole. With two fields the rule is
/// `ord(year) || (years equal && ord(month))`, kept exactly as the
/// established behavior even though it is not a full lexicographic
/// comparison. With one field only the years are compared.
pub fn compare_dates(arg: &DateArg, header: &HeaderDate, ord: Ordering) -> bool {
    let precision = arg.precision();

    if precision >= 3 {
        let mut truncated = *header;
        for field in truncated.iter_mut().skip(precision) {
            *field = 0;
        }
        match (construct(&arg.padded()), construct(&truncated)) {
            (Some(a), Some(b)) => a.cmp(&b) == ord,
            _ => false,
        }
    } else if precision == 2 {
        let a = arg.fields();
        a[0].cmp(&header[0]) == ord
            || (a[0] == header[0] && a[1].cmp(&header[1]) == ord)
    } else {
        arg.fields()[0].cmp(&header[0]) == ord
    }
}

/// Field-wise equality at the argument's precision.
///
/// The header is truncated to as many fields as the argument supplied, so
/// a bare year matches every date in that year.
pub fn date_equals(arg: &DateArg, header: &HeaderDate) -> bool {
    arg.fields() == &header[..arg.precision()]
}

/// Build a calendar date-time from six fields, if they form one.
fn construct(fields: &[i32; 6]) -> Option<NaiveDateTime> {
    NaiveDate::from_ymd_opt(fields[0], fields[1] as u32, fields[2] as u32)?.and_hms_opt(
        fields[3] as u32,
        fields[4] as u32,
        fields[5] as u32,
    )
}
