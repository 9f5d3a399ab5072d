//! The card's string attributes and how they are coerced into something
//! always renderable. Nothing here fails: bad input falls back to a default.

use std::collections::{BTreeMap, BTreeSet};

use crate::calendar::{CalendarRequest, YEAR_RANGE};
use crate::theme::Design;

pub const DEFAULT_MONTH: u32 = 1;
pub const DEFAULT_YEAR:  i32 = 2025;
pub const DEFAULT_SIZE:  u32 = 150;

pub const ATTR_MONTH:     &str = "month";
pub const ATTR_YEAR:      &str = "year";
pub const ATTR_SIZE:      &str = "size";
pub const ATTR_HIGHLIGHT: &str = "highlight-days";
pub const ATTR_DESIGN:    &str = "design";

pub const ATTR_NAMES: [&str; 5] = [ATTR_MONTH, ATTR_YEAR, ATTR_SIZE, ATTR_HIGHLIGHT, ATTR_DESIGN];

/// Raw attribute values keyed by attribute name.
pub type Attributes = BTreeMap<String, String>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetAttrs {
    pub month:          u32,
    pub year:           i32,
    pub highlight_days: BTreeSet<u32>,
    /// Pixel width of the rendered table.
    pub size:           u32,
    pub design:         Design,
}

impl Default for WidgetAttrs {
    fn default() -> Self {
        Self {
            month:          DEFAULT_MONTH,
            year:           DEFAULT_YEAR,
            highlight_days: BTreeSet::new(),
            size:           DEFAULT_SIZE,
            design:         Design::default(),
        }
    }
}

impl WidgetAttrs {
    pub fn from_attributes(attrs: &Attributes) -> Self {
        let get = |k: &str| attrs.get(k).map(String::as_str);
        Self {
            month:          parse_month(get(ATTR_MONTH)),
            year:           parse_year(get(ATTR_YEAR)),
            highlight_days: parse_highlight_days(get(ATTR_HIGHLIGHT)),
            size:           parse_size(get(ATTR_SIZE)),
            design:         get(ATTR_DESIGN).map(Design::from_name).unwrap_or_default(),
        }
    }

    /// Canonical attribute values, in a fixed order.
    pub fn to_attributes(&self) -> Vec<(&'static str, String)> {
        vec![
            (ATTR_MONTH,     self.month.to_string()),
            (ATTR_YEAR,      self.year.to_string()),
            (ATTR_SIZE,      self.size.to_string()),
            (ATTR_HIGHLIGHT, self.highlight_list()),
            (ATTR_DESIGN,    self.design.name().to_owned()),
        ]
    }

    pub fn highlight_list(&self) -> String {
        self.highlight_days.iter().map(u32::to_string).collect::<Vec<_>>().join(",")
    }

    pub fn request(&self) -> CalendarRequest {
        CalendarRequest::new(self.month, self.year, self.highlight_days.iter().copied().collect())
    }
}

// ─── Parsers ──────────────────────────────────────────────────────────────────

/// Leading integer of `s`: optional sign then digits, trailing text ignored.
/// `"12px"` → 12, `" -3"` → -3, `"px"` → None.
pub fn parse_leading_int(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (neg, rest) = match s.as_bytes().first() {
        Some(b'-') => (true,  &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _          => (false, s),
    };
    let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 { return None; }
    let n: i64 = rest[..digits].parse().ok()?;
    Some(if neg { -n } else { n })
}

pub fn parse_month(raw: Option<&str>) -> u32 {
    raw.and_then(parse_leading_int)
        .filter(|m| (1..=12).contains(m))
        .map(|m| m as u32)
        .unwrap_or(DEFAULT_MONTH)
}

pub fn parse_year(raw: Option<&str>) -> i32 {
    raw.and_then(parse_leading_int)
        .and_then(|y| i32::try_from(y).ok())
        .filter(|y| YEAR_RANGE.contains(y))
        .unwrap_or(DEFAULT_YEAR)
}

pub fn parse_size(raw: Option<&str>) -> u32 {
    raw.and_then(parse_leading_int)
        .and_then(|s| u32::try_from(s).ok())
        .filter(|s| *s > 0)
        .unwrap_or(DEFAULT_SIZE)
}

/// Comma-separated day numbers. Entries that are not plain non-negative
/// integers are dropped.
pub fn parse_highlight_days(raw: Option<&str>) -> BTreeSet<u32> {
    raw.unwrap_or_default()
        .split(',')
        .filter_map(|part| part.trim().parse::<u32>().ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attrs(pairs: &[(&str, &str)]) -> Attributes {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn missing_attributes_use_defaults() {
        assert_eq!(WidgetAttrs::from_attributes(&Attributes::new()), WidgetAttrs::default());
    }

    #[test]
    fn invalid_month_defaults_to_january() {
        for raw in ["", "abc", "0", "13", "-4", "99999999999999999999"] {
            assert_eq!(parse_month(Some(raw)), 1, "{raw:?}");
        }
        assert_eq!(parse_month(None), 1);
        assert_eq!(parse_month(Some("7")), 7);
        assert_eq!(parse_month(Some(" 12th")), 12);
    }

    #[test]
    fn invalid_size_defaults_to_150() {
        for raw in ["", "wide", "0", "-20"] {
            assert_eq!(parse_size(Some(raw)), DEFAULT_SIZE, "{raw:?}");
        }
        assert_eq!(parse_size(None), DEFAULT_SIZE);
        assert_eq!(parse_size(Some("300px")), 300);
    }

    #[test]
    fn year_outside_range_falls_back() {
        assert_eq!(parse_year(Some("2031")), 2031);
        assert_eq!(parse_year(Some("0")), DEFAULT_YEAR);
        assert_eq!(parse_year(Some("123456")), DEFAULT_YEAR);
        assert_eq!(parse_year(None), DEFAULT_YEAR);
    }

    #[test]
    fn highlight_days_skip_garbage() {
        let days = parse_highlight_days(Some("1, 5,x,,15 ,-2,40"));
        assert_eq!(days.into_iter().collect::<Vec<_>>(), vec![1, 5, 15, 40]);
        assert!(parse_highlight_days(Some("")).is_empty());
        assert!(parse_highlight_days(None).is_empty());
    }

    #[test]
    fn leading_int_parsing() {
        assert_eq!(parse_leading_int("42"), Some(42));
        assert_eq!(parse_leading_int("+8x"), Some(8));
        assert_eq!(parse_leading_int("-"), None);
        assert_eq!(parse_leading_int("x8"), None);
    }

    #[test]
    fn full_attribute_set() {
        let w = WidgetAttrs::from_attributes(&attrs(&[
            ("month", "3"), ("year", "2026"), ("size", "210"),
            ("highlight-days", "8,1"), ("design", "vibrant"),
        ]));
        assert_eq!(w.month, 3);
        assert_eq!(w.year, 2026);
        assert_eq!(w.size, 210);
        assert_eq!(w.highlight_list(), "1,8");
        assert_eq!(w.design, Design::Vibrant);

        let canonical: Attributes = w.to_attributes().into_iter()
            .map(|(k, v)| (k.to_owned(), v))
            .collect();
        assert_eq!(WidgetAttrs::from_attributes(&canonical), w);
    }

    #[test]
    fn request_carries_highlights() {
        let w = WidgetAttrs::from_attributes(&attrs(&[("highlight-days", "2,4")]));
        let req = w.request();
        assert_eq!(req.month, 1);
        assert!(req.highlighted_days.contains(&2) && req.highlighted_days.contains(&4));
    }
}
