//! Date handling at the API boundary: calendar dates travel as
//! `YYYY-MM-DD` strings and are parsed/rendered here so the archive
//! core only ever sees `time::Date`.

use time::format_description::FormatItem;
use time::Date;

use super::super::ApiError;

fn date_format() -> Vec<FormatItem<'static>> {
    // The literal is static and well-formed; parse cannot fail on it.
    time::format_description::parse("[year]-[month]-[day]")
        .unwrap_or_default()
}

pub fn parse_date(field: &'static str, raw: &str) -> Result<Date, ApiError> {
    Date::parse(raw.trim(), &date_format()[..])
        .map_err(|_| ApiError::bad_request(field, "expected a YYYY-MM-DD date"))
}

pub fn format_date(date: Date) -> String {
    date.format(&date_format()[..])
        .unwrap_or_else(|_| date.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_iso_dates() {
        let date = parse_date("document_date", "2024-03-07").unwrap();
        assert_eq!(format_date(date), "2024-03-07");
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_date("document_date", "07/03/2024").is_err());
        assert!(parse_date("document_date", "2024-13-40").is_err());
    }
}
