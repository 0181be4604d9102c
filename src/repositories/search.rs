// src/repositories/search.rs
//
// Shared helpers for substring search and date columns

use chrono::NaiveDate;
use rusqlite::types::Type;

/// Storage format for every date column
pub(crate) const DATE_FORMAT: &str = "%Y-%m-%d";

/// Normalize a search query. `None`, empty and whitespace-only queries mean
/// "no filter".
pub(crate) fn normalize_query(query: Option<&str>) -> Option<String> {
    query
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .map(str::to_lowercase)
}

/// Build a `LIKE ... ESCAPE '\'` pattern matching `needle` as a literal
/// substring.
pub(crate) fn like_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for ch in needle.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

pub(crate) fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Parse a stored date, reporting failures against the column index so
/// they surface as row conversion errors.
pub(crate) fn parse_date(column: usize, raw: &str) -> Result<NaiveDate, rusqlite::Error> {
    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(column, Type::Text, Box::new(e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_queries_mean_no_filter() {
        assert_eq!(normalize_query(None), None);
        assert_eq!(normalize_query(Some("")), None);
        assert_eq!(normalize_query(Some("   ")), None);
        assert_eq!(normalize_query(Some(" AliCe ")), Some("alice".to_string()));
    }

    #[test]
    fn wildcards_are_escaped() {
        assert_eq!(like_pattern("ali"), "%ali%");
        assert_eq!(like_pattern("50%"), "%50\\%%");
        assert_eq!(like_pattern("a_b"), "%a\\_b%");
        assert_eq!(like_pattern("c:\\"), "%c:\\\\%");
    }

    #[test]
    fn dates_use_iso_format() {
        let date = NaiveDate::from_ymd_opt(2000, 1, 15).unwrap();
        assert_eq!(format_date(date), "2000-01-15");
        assert_eq!(parse_date(0, "2000-01-15").unwrap(), date);
        assert!(parse_date(0, "15/01/2000").is_err());
    }
}
