//! Free-text dates and `start`/`end`/`present` ranges.

use crate::{ContentMap, ContentValue, statics};
use chrono::NaiveDate;

const FULL_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y", "%Y/%m/%d", "%m/%d/%Y"];
const MONTH_SEPARATORS: &[char] = &['-', '/'];

/// Parse the date spellings users typically type. Partial dates (`YYYY-MM`, `YYYY`)
/// land on the first day of the period.
pub fn parse_any_date(text: &str) -> Option<NaiveDate> {
    let s = text.trim();
    if s.is_empty() {
        return None;
    }

    if let Some(date) = FULL_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
    {
        return Some(date);
    }

    // `%Y-%m` has no day, which chrono refuses to parse into a NaiveDate.
    if let Some((y, m)) = s.split_once(MONTH_SEPARATORS) {
        let year = parse_year(y)?;
        let month = m.parse::<u32>().ok()?;
        return NaiveDate::from_ymd_opt(year, month, 1);
    }

    NaiveDate::from_ymd_opt(parse_year(s)?, 1, 1)
}

fn parse_year(s: &str) -> Option<i32> {
    if s.len() != 4 || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

/// `(iso, unix)` for a raw date string; both `None` when it does not parse.
pub fn iso_unix(text: &str) -> (Option<String>, Option<i64>) {
    match parse_any_date(text) {
        Some(date) => {
            let unix = date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc().timestamp());
            (Some(date.format("%Y-%m-%d").to_string()), unix)
        }
        None => (None, None),
    }
}

/// Canonical `YYYY-MM-DD` if the text parses, otherwise the trimmed text unchanged.
pub fn normalize(text: &str) -> String {
    parse_any_date(text)
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| text.trim().to_string())
}

/// A single date stored as `<key>`, `<key>_iso`, `<key>_unix`.
pub fn write_date(record: &mut ContentMap, key: &str, raw: &str) {
    let raw = raw.trim();
    let (iso, unix) = iso_unix(raw);
    record.insert(key.to_string(), ContentValue::string(raw));
    record.insert(format!("{key}{}", statics::SUFFIX_ISO), iso.into());
    record.insert(
        format!("{key}{}", statics::SUFFIX_UNIX),
        unix.map(ContentValue::int).into(),
    );
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DateRange {
    pub start: String,
    pub end: String,
    pub present: bool,
}

impl DateRange {
    /// Hydrate from a record. A start without an end counts as ongoing.
    pub fn from_record(record: &ContentMap) -> Self {
        let text = |key: &str| {
            record
                .get(key)
                .map(ContentValue::display_text)
                .unwrap_or_default()
        };
        let start = text(statics::KEY_START);
        let end = text(statics::KEY_END);
        let stored_present = record
            .get(statics::KEY_PRESENT)
            .and_then(ContentValue::as_bool)
            .unwrap_or(false);
        let present = stored_present || (!start.is_empty() && end.is_empty());
        Self {
            start,
            end,
            present,
        }
    }

    /// Write `start`, `end`, `present` and the derived `_iso`/`_unix` keys.
    /// `present` forces `end` empty and its derived fields null.
    pub fn write_to(&self, record: &mut ContentMap) {
        let end = if self.present { "" } else { self.end.trim() };
        write_date(record, statics::KEY_START, &self.start);
        write_date(record, statics::KEY_END, end);
        record.insert(
            statics::KEY_PRESENT.to_string(),
            ContentValue::Bool(self.present),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::{DateRange, iso_unix, normalize, parse_any_date};
    use crate::{ContentMap, ContentValue};
    use chrono::NaiveDate;

    fn ymd(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(y, m, d)
    }

    #[test]
    fn parses_supported_spellings() {
        assert_eq!(parse_any_date("2023-04-05"), ymd(2023, 4, 5));
        assert_eq!(parse_any_date("05/04/2023"), ymd(2023, 4, 5));
        assert_eq!(parse_any_date("05-04-2023"), ymd(2023, 4, 5));
        assert_eq!(parse_any_date("2023/04/05"), ymd(2023, 4, 5));
        assert_eq!(parse_any_date("12/31/2023"), ymd(2023, 12, 31));
        assert_eq!(parse_any_date("2023-04"), ymd(2023, 4, 1));
        assert_eq!(parse_any_date("2023/11"), ymd(2023, 11, 1));
        assert_eq!(parse_any_date(" 2021 "), ymd(2021, 1, 1));
    }

    #[test]
    fn rejects_free_text() {
        assert_eq!(parse_any_date(""), None);
        assert_eq!(parse_any_date("Spring 2023"), None);
        assert_eq!(parse_any_date("2023-13"), None);
        assert_eq!(iso_unix("soon"), (None, None));
        assert_eq!(normalize(" soon "), "soon");
    }

    #[test]
    fn unix_is_utc_midnight() {
        assert_eq!(
            iso_unix("1970-01-02"),
            (Some("1970-01-02".to_string()), Some(86_400))
        );
    }

    #[test]
    fn present_clears_end_and_derived_fields() {
        let range = DateRange {
            start: "2022-01-10".to_string(),
            end: "2023-01-01".to_string(),
            present: true,
        };
        let mut rec = ContentMap::new();
        range.write_to(&mut rec);
        assert_eq!(rec.get("end"), Some(&ContentValue::string("")));
        assert_eq!(rec.get("end_iso"), Some(&ContentValue::Null));
        assert_eq!(rec.get("end_unix"), Some(&ContentValue::Null));
        assert_eq!(rec.get("present"), Some(&ContentValue::Bool(true)));
        assert_eq!(rec.get("start_iso"), Some(&ContentValue::string("2022-01-10")));
    }

    #[test]
    fn start_without_end_hydrates_as_present() {
        let rec = ContentValue::parse(r#"{"start": "2022-01-01", "end": ""}"#).unwrap();
        let range = DateRange::from_record(rec.as_object().unwrap());
        assert!(range.present);

        let rec = ContentValue::parse(r#"{"start": "", "end": null}"#).unwrap();
        assert!(!DateRange::from_record(rec.as_object().unwrap()).present);
    }
}
