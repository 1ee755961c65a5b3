use time::format_description::BorrowedFormatItem;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, OffsetDateTime, PrimitiveDateTime, UtcOffset};

pub const NO_DESCRIPTION: &str = "No description available";
pub const UNKNOWN_DATE: &str = "Unknown date";
pub const ELLIPSIS: &str = "...";

/// Shorten `text` to at most `max_length` characters on a word boundary.
///
/// Text that already fits is returned untouched. Otherwise whitespace is
/// collapsed and as many whole words as fit are kept, followed by `...`; the
/// marker counts toward `max_length`, except that widths below its length
/// still yield the whole `...`. Absent or blank text yields
/// [`NO_DESCRIPTION`].
pub fn summarize(text: Option<&str>, max_length: usize) -> String {
    let text = match text {
        Some(t) if !t.trim().is_empty() => t,
        _ => return NO_DESCRIPTION.to_string(),
    };
    if text.chars().count() <= max_length {
        return text.to_string();
    }

    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.chars().count() <= max_length {
        return collapsed;
    }

    let budget = max_length.saturating_sub(ELLIPSIS.len());
    let mut out = String::new();
    let mut used = 0usize;
    for word in collapsed.split(' ') {
        let width = word.chars().count();
        let needed = if out.is_empty() { width } else { width + 1 };
        if used + needed > budget {
            break;
        }
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(word);
        used += needed;
    }
    out.push_str(ELLIPSIS);
    out
}

/// Render an ISO-8601 timestamp as `Month DD, YYYY at HH:MM UTC`.
///
/// Accepts extended and basic offsets, a trailing `Z`, minute or second
/// precision, a space in place of `T`, and bare dates (midnight). Offsets are
/// converted to UTC and timestamps without an offset are taken as UTC.
/// Anything missing or unparsable becomes [`UNKNOWN_DATE`].
pub fn format_date(iso: Option<&str>) -> String {
    let Some(raw) = iso.map(str::trim).filter(|s| !s.is_empty()) else {
        return UNKNOWN_DATE.to_string();
    };
    let Some(parsed) = parse_timestamp(raw) else {
        tracing::debug!(timestamp = raw, "unparsable publish date");
        return UNKNOWN_DATE.to_string();
    };
    let fmt = format_description!("[month repr:long] [day], [year] at [hour]:[minute] UTC");
    parsed
        .to_offset(UtcOffset::UTC)
        .format(&fmt)
        .unwrap_or_else(|_| UNKNOWN_DATE.to_string())
}

fn parse_timestamp(raw: &str) -> Option<OffsetDateTime> {
    if let Ok(dt) = OffsetDateTime::parse(raw, &Rfc3339) {
        return Some(dt);
    }

    let mut s = raw.to_string();
    if s.as_bytes().get(10) == Some(&b' ') {
        s.replace_range(10..11, "T");
    }
    if let Some(stripped) = s.strip_suffix(['Z', 'z']) {
        s = format!("{stripped}+00:00");
    }

    let with_offset: [&[BorrowedFormatItem<'_>]; 6] = [
        format_description!(
            "[year]-[month]-[day]T[hour]:[minute]:[second][optional [.[subsecond]]][offset_hour sign:mandatory]:[offset_minute]"
        ),
        format_description!(
            "[year]-[month]-[day]T[hour]:[minute]:[second][optional [.[subsecond]]][offset_hour sign:mandatory][offset_minute]"
        ),
        format_description!(
            "[year]-[month]-[day]T[hour]:[minute]:[second][optional [.[subsecond]]][offset_hour sign:mandatory]"
        ),
        format_description!(
            "[year]-[month]-[day]T[hour]:[minute][offset_hour sign:mandatory]:[offset_minute]"
        ),
        format_description!(
            "[year]-[month]-[day]T[hour]:[minute][offset_hour sign:mandatory][offset_minute]"
        ),
        format_description!("[year]-[month]-[day]T[hour]:[minute][offset_hour sign:mandatory]"),
    ];
    if let Some(dt) = with_offset
        .iter()
        .find_map(|f| OffsetDateTime::parse(&s, *f).ok())
    {
        return Some(dt);
    }

    let naive: [&[BorrowedFormatItem<'_>]; 2] = [
        format_description!("[year]-[month]-[day]T[hour]:[minute]:[second][optional [.[subsecond]]]"),
        format_description!("[year]-[month]-[day]T[hour]:[minute]"),
    ];
    if let Some(dt) = naive
        .iter()
        .find_map(|f| PrimitiveDateTime::parse(&s, *f).ok())
    {
        return Some(dt.assume_utc());
    }

    Date::parse(&s, format_description!("[year]-[month]-[day]"))
        .ok()
        .map(|d| d.midnight().assume_utc())
}
