// Built-in validation rules

use crate::{Rule, Tag, UsageError, Value};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use std::str::FromStr;

/// Sentinel timestamp marking a date that failed to parse upstream.
///
/// `isodate` always rejects it.
pub const INVALID_TIME: DateTime<Utc> = DateTime::<Utc>::UNIX_EPOCH;

/// Parameter of `mindate`/`maxdate` resolving to today's UTC date.
pub const NOW: &str = "now";

const DATE_FORMAT: &str = "%Y-%m-%d";

/// The host's zone, accepted by `zoneinfo` next to IANA names.
const LOCAL_ZONE: &str = "Local";

const VALID_GENDERS: [&str; 3] = ["male", "female", "genderqueer"];

// Common regex patterns
static ISO_DATE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap());

static AZ_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-z][a-z_]*$").unwrap());

static AZ09_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-zA-Z0-9][a-zA-Z0-9_]*$").unwrap());

static NAME_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\p{L},.'-][\p{L} ,.'-]*[\p{L},.'-]$").unwrap());

static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    const U: &str = r"\x{00A0}-\x{D7FF}\x{F900}-\x{FDCF}\x{FDF0}-\x{FFEF}";
    let atext = format!(r"[a-zA-Z0-9!#$%&'*+/=?^_`{{|}}~{U}\-]");
    let qtext = format!(r#"[\x20\x21\x23-\x5b\x5d-\x7e{U}]"#);
    let alnum = format!(r"[a-zA-Z0-9{U}]");
    let alpha = format!(r"[a-zA-Z{U}]");
    let inner = format!(r"(?:{alnum}|[\-.~])");

    let local = format!(r#"(?:{atext}+(?:\.{atext}+)*|"(?:{qtext}|\\[\x20-\x7e])*")"#);
    let label = format!(r"(?:{alnum}|{alnum}{inner}*{alnum})");
    let tld = format!(r"(?:{alpha}|{alpha}{inner}*{alpha})");

    Regex::new(&format!(r"^{local}@(?:{label}\.)+{tld}\.?$")).unwrap()
});

static RESOURCE_NAME_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^mtx:[a-z0-9/-]+(?::[a-z0-9/-]+)*$").unwrap());

static RESOURCE_PATTERN_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^mtx:[a-z0-9*/-]+(?::[a-z0-9*/-]+)*$").unwrap());

/// The packaged validation rules.
pub fn standard_rules() -> Vec<Rule> {
    vec![
        Rule::new("required", required, |field, _, _| format!("{} is required", field)),
        Rule::silent("optional", optional),
        Rule::new("gte", gte, gte_error),
        Rule::new("lte", lte, lte_error),
        Rule::new("gender", gender, |field, _, _| {
            format!("{} must be either {}", field, VALID_GENDERS.join(", "))
        }),
        Rule::new("isodate", iso_date, |field, _, _| {
            format!("{} is not a valid date (YYYY-MM-DD)", field)
        }),
        Rule::new("mindate", min_date, |field, _, tag| {
            format!("{} minimum date is {}", field, display_date(&tag.param))
        }),
        Rule::new("maxdate", max_date, |field, _, tag| {
            format!("{} maximum date is {}", field, display_date(&tag.param))
        }),
        Rule::new("name", name, |field, _, _| {
            format!(
                "{} must contain unicode letters -,.' and not start or end with a space",
                field
            )
        }),
        Rule::new("az_", az, |field, _, _| {
            format!("{} must contain a-z, _ and not start with a _", field)
        }),
        Rule::new("aZ09_", az09, |field, _, _| {
            format!("{} must contain 0-9, A-Z, _ and not start with a _", field)
        }),
        Rule::new("zoneinfo", zoneinfo, |field, _, _| {
            format!(
                "{} is not a valid zoneinfo string (example: 'Europe/Amsterdam')",
                field
            )
        }),
        Rule::new("locale", locale, |field, _, _| {
            format!("{} must contain BCP47 language tags separated by spaces", field)
        }),
        Rule::new("url", url, |field, _, _| format!("{} is not a valid url", field)),
        Rule::new("email", email, |field, _, _| format!("{} is not a valid email", field)),
        Rule::new("resourcename", resource_name, |field, _, _| {
            format!(
                "{} must start with 'mtx:' and may contain: a-z, 0-9, -, /, and :",
                field
            )
        }),
        Rule::new("resourcepattern", resource_pattern, |field, _, _| {
            format!(
                "{} must start with 'mtx:' and may contain: a-z, 0-9, -, /, *, and :",
                field
            )
        }),
    ]
}

/// The packaged aliases, in installation order.
pub fn standard_aliases() -> Vec<(&'static str, &'static str)> {
    vec![
        ("username", "aZ09_,gte=4,lte=20"),
        ("birthdate", "isodate,mindate=1900-01-01,maxdate=now"),
    ]
}

/// Fails on the zero, empty or absent form of every kind.
///
/// Records and timestamps are always present.
pub fn required(value: &Value<'_>, _param: &str) -> Result<bool, UsageError> {
    Ok(match value {
        Value::Absent => false,
        Value::Str(s) => !s.is_empty(),
        Value::Int(i) => *i != 0,
        Value::Uint(u) => *u != 0,
        Value::Float(f) => *f != 0.0,
        Value::Bool(b) => *b,
        Value::Seq(items) => !items.is_empty(),
        Value::Map(entries) => !entries.is_empty(),
        Value::Time(_) | Value::Record(_) => true,
    })
}

/// Same predicate as [`required`]; registered without formatter so a
/// failure ends the chain silently.
pub fn optional(value: &Value<'_>, param: &str) -> Result<bool, UsageError> {
    required(value, param)
}

/// Inclusive lower bound on length, count or value.
pub fn gte(value: &Value<'_>, param: &str) -> Result<bool, UsageError> {
    compare("gte", value, param, |ordering| ordering.is_ge())
}

/// Inclusive upper bound on length, count or value.
pub fn lte(value: &Value<'_>, param: &str) -> Result<bool, UsageError> {
    compare("lte", value, param, |ordering| ordering.is_le())
}

fn compare(
    tag: &str,
    value: &Value<'_>,
    param: &str,
    accept: impl Fn(std::cmp::Ordering) -> bool,
) -> Result<bool, UsageError> {
    let ordering = match value {
        Value::Str(s) => (s.chars().count() as i64).cmp(&parse_param::<i64>(tag, param, "int")?),
        Value::Seq(items) => (items.len() as i64).cmp(&parse_param::<i64>(tag, param, "int")?),
        Value::Map(entries) => (entries.len() as i64).cmp(&parse_param::<i64>(tag, param, "int")?),
        Value::Int(i) => i.cmp(&parse_param::<i64>(tag, param, "int")?),
        Value::Uint(u) => u.cmp(&parse_param::<u64>(tag, param, "uint")?),
        Value::Float(f) => match f.partial_cmp(&parse_param::<f64>(tag, param, "float")?) {
            Some(ordering) => ordering,
            None => return Ok(false),
        },
        _ => return Err(UsageError::unsupported(tag)),
    };
    Ok(accept(ordering))
}

fn parse_param<T: FromStr>(tag: &str, param: &str, expected: &'static str) -> Result<T, UsageError> {
    param
        .parse()
        .map_err(|_| UsageError::invalid_param(tag, param, expected))
}

fn gte_error(field: &str, value: &Value<'_>, tag: &Tag) -> String {
    match value {
        Value::Seq(_) | Value::Map(_) => {
            format!("{} must contain at least {} elements", field, tag.param)
        }
        Value::Str(_) => format!("{} must be at least {} characters long", field, tag.param),
        _ => format!("{} must be at least {}", field, tag.param),
    }
}

fn lte_error(field: &str, value: &Value<'_>, tag: &Tag) -> String {
    match value {
        Value::Seq(_) | Value::Map(_) => {
            format!("{} may not contain more than {} elements", field, tag.param)
        }
        Value::Str(_) => format!("{} must be at most {} characters long", field, tag.param),
        _ => format!("{} maximum value is {}", field, tag.param),
    }
}

/// Empty or one of the supported genders.
pub fn gender(value: &Value<'_>, _param: &str) -> Result<bool, UsageError> {
    let s = text("gender", value)?;
    Ok(s.is_empty() || VALID_GENDERS.contains(&s))
}

/// A whole calendar date, either `YYYY-MM-DD` text or a timestamp at midnight.
pub fn iso_date(value: &Value<'_>, _param: &str) -> Result<bool, UsageError> {
    match value {
        Value::Absent => Ok(true),
        Value::Str("") => Ok(true),
        Value::Str(s) => Ok(parse_iso_date(s).is_some()),
        Value::Time(t) => Ok(*t != INVALID_TIME && t.time() == NaiveTime::MIN),
        _ => Err(UsageError::unsupported("isodate")),
    }
}

/// Date on or after the parameter date.
pub fn min_date(value: &Value<'_>, param: &str) -> Result<bool, UsageError> {
    compare_date("mindate", value, param, |date, bound| date >= bound)
}

/// Date on or before the parameter date.
pub fn max_date(value: &Value<'_>, param: &str) -> Result<bool, UsageError> {
    compare_date("maxdate", value, param, |date, bound| date <= bound)
}

fn compare_date(
    tag: &str,
    value: &Value<'_>,
    param: &str,
    accept: impl Fn(NaiveDate, NaiveDate) -> bool,
) -> Result<bool, UsageError> {
    let date = match value {
        Value::Absent | Value::Str("") => return Ok(true),
        Value::Str(s) => match parse_iso_date(s) {
            Some(date) => date,
            None => return Ok(false),
        },
        Value::Time(t) => t.with_timezone(&Utc).date_naive(),
        _ => return Err(UsageError::unsupported(tag)),
    };

    let bound = resolve_date(param).ok_or_else(|| UsageError::invalid_param(tag, param, "date"))?;
    Ok(accept(date, bound))
}

fn parse_iso_date(s: &str) -> Option<NaiveDate> {
    if !ISO_DATE_REGEX.is_match(s) {
        return None;
    }
    NaiveDate::parse_from_str(s, DATE_FORMAT).ok()
}

fn resolve_date(param: &str) -> Option<NaiveDate> {
    if param == NOW {
        return Some(Utc::now().date_naive());
    }
    parse_iso_date(param)
}

fn display_date(param: &str) -> String {
    if param == NOW {
        return Utc::now().date_naive().format(DATE_FORMAT).to_string();
    }
    param.to_string()
}

/// Lowercase letters and underscores, not starting with an underscore.
pub fn az(value: &Value<'_>, _param: &str) -> Result<bool, UsageError> {
    matches_pattern("az_", &AZ_REGEX, value)
}

/// Letters, digits and underscores, not starting with an underscore.
pub fn az09(value: &Value<'_>, _param: &str) -> Result<bool, UsageError> {
    matches_pattern("aZ09_", &AZ09_REGEX, value)
}

/// Unicode letters plus `-,.'` and inner spaces.
pub fn name(value: &Value<'_>, _param: &str) -> Result<bool, UsageError> {
    matches_pattern("name", &NAME_REGEX, value)
}

/// Email address.
pub fn email(value: &Value<'_>, _param: &str) -> Result<bool, UsageError> {
    matches_pattern("email", &EMAIL_REGEX, value)
}

/// `mtx:` prefixed, colon separated resource name.
pub fn resource_name(value: &Value<'_>, _param: &str) -> Result<bool, UsageError> {
    matches_pattern("resourcename", &RESOURCE_NAME_REGEX, value)
}

/// Resource name that may contain `*` wildcards.
pub fn resource_pattern(value: &Value<'_>, _param: &str) -> Result<bool, UsageError> {
    matches_pattern("resourcepattern", &RESOURCE_PATTERN_REGEX, value)
}

/// Match text, or every element of a sequence, against a pattern.
///
/// Empty text passes.
pub fn matches_pattern(tag: &str, pattern: &Regex, value: &Value<'_>) -> Result<bool, UsageError> {
    match value {
        Value::Str(s) => Ok(s.is_empty() || pattern.is_match(s)),
        Value::Seq(items) => {
            for item in items {
                if !matches_pattern(tag, pattern, item)? {
                    return Ok(false);
                }
            }
            Ok(true)
        }
        _ => Err(UsageError::unsupported(tag)),
    }
}

/// Empty, `Local` or a known IANA time zone.
pub fn zoneinfo(value: &Value<'_>, _param: &str) -> Result<bool, UsageError> {
    let s = text("zoneinfo", value)?;
    Ok(s.is_empty() || s == LOCAL_ZONE || s.parse::<chrono_tz::Tz>().is_ok())
}

/// Empty or space separated BCP47 language tags.
pub fn locale(value: &Value<'_>, _param: &str) -> Result<bool, UsageError> {
    let s = text("locale", value)?;
    if s.is_empty() {
        return Ok(true);
    }
    Ok(s.split(' ').all(|tag| tag.parse::<icu_locid::Locale>().is_ok()))
}

/// Empty or an absolute URI with a scheme; any fragment is ignored.
pub fn url(value: &Value<'_>, _param: &str) -> Result<bool, UsageError> {
    let s = text("url", value)?;
    if s.is_empty() {
        return Ok(true);
    }

    let without_fragment = match s.find('#') {
        Some(i) => &s[..i],
        None => s,
    };
    Ok(url::Url::parse(without_fragment).is_ok_and(|u| !u.scheme().is_empty()))
}

fn text<'a>(tag: &str, value: &Value<'a>) -> Result<&'a str, UsageError> {
    value.as_str().ok_or_else(|| UsageError::unsupported(tag))
}
