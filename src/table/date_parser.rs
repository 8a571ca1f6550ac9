use chrono::{NaiveDate, NaiveDateTime};

/// Parse a date cell: `YYYY-MM-DD` or `YYYY/MM/DD`, optionally followed by
/// a ` HH:MM:SS` / `THH:MM:SS` time part which is discarded.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    // minimal length + separators check
    let head = s.get(0..10).filter(|h| h.is_ascii())?;
    let sep = &head[4..5];
    if (sep != "-" && sep != "/") || &head[7..8] != sep {
        return None;
    }
    let year: i32 = head[0..4].parse().ok()?;
    let month: u32 = head[5..7].parse().ok()?;
    let day: u32 = head[8..10].parse().ok()?;
    let date = NaiveDate::from_ymd_opt(year, month, day)?;

    let rest = &s[10..];
    if rest.is_empty() {
        return Some(date);
    }
    let time_fmt = if sep == "-" {
        ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"]
    } else {
        ["%Y/%m/%d %H:%M:%S", "%Y/%m/%dT%H:%M:%S"]
    };
    time_fmt
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|dt| dt.date())
}
