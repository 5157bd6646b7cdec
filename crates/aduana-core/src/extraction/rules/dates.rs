//! Date parsing for Chilean customs documents.

use chrono::NaiveDate;

use super::patterns::{DATE_COMPACT, DATE_DMY, DATE_SPANISH_LONG, DATE_YMD};

/// Parse the first valid date in `text`.
///
/// Formats are tried in order: `yyyy-MM-dd`, `dd-MM-yyyy` (also `/` and `.`
/// separators and two-digit years), verbose Spanish (`26 de Junio del 2025`,
/// `15 ENE 2024`) and finally positional `ddMMyyyy`. Impossible calendar
/// dates are skipped.
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    parse_ymd(text)
        .or_else(|| parse_dmy(text))
        .or_else(|| parse_spanish_long(text))
        .or_else(|| parse_compact(text))
}

fn parse_ymd(text: &str) -> Option<NaiveDate> {
    DATE_YMD.captures_iter(text).find_map(|caps| {
        let year: i32 = caps[1].parse().ok()?;
        let month: u32 = caps[2].parse().ok()?;
        let day: u32 = caps[3].parse().ok()?;
        NaiveDate::from_ymd_opt(year, month, day)
    })
}

fn parse_dmy(text: &str) -> Option<NaiveDate> {
    DATE_DMY.captures_iter(text).find_map(|caps| {
        let day: u32 = caps[1].parse().ok()?;
        let month: u32 = caps[2].parse().ok()?;
        let year = parse_year(&caps[3])?;
        NaiveDate::from_ymd_opt(year, month, day)
    })
}

fn parse_spanish_long(text: &str) -> Option<NaiveDate> {
    DATE_SPANISH_LONG.captures_iter(text).find_map(|caps| {
        let day: u32 = caps[1].parse().ok()?;
        let month = spanish_month_to_number(&caps[2])?;
        let year: i32 = caps[3].parse().ok()?;
        NaiveDate::from_ymd_opt(year, month, day)
    })
}

fn parse_compact(text: &str) -> Option<NaiveDate> {
    DATE_COMPACT.captures_iter(text).find_map(|caps| {
        let day: u32 = caps[1].parse().ok()?;
        let month: u32 = caps[2].parse().ok()?;
        let year: i32 = caps[3].parse().ok()?;
        NaiveDate::from_ymd_opt(year, month, day)
    })
}

fn parse_year(s: &str) -> Option<i32> {
    let year: i32 = s.parse().ok()?;
    if s.len() == 2 {
        // Two-digit year: 00-50 is 2000s, 51-99 is 1900s
        Some(if year <= 50 { 2000 + year } else { 1900 + year })
    } else {
        Some(year)
    }
}

/// Month number for a Spanish month name or its three-letter abbreviation.
pub fn spanish_month_to_number(month: &str) -> Option<u32> {
    let number = match month.to_lowercase().as_str() {
        "enero" | "ene" => 1,
        "febrero" | "feb" => 2,
        "marzo" | "mar" => 3,
        "abril" | "abr" => 4,
        "mayo" | "may" => 5,
        "junio" | "jun" => 6,
        "julio" | "jul" => 7,
        "agosto" | "ago" => 8,
        "septiembre" | "setiembre" | "sep" | "sept" | "set" => 9,
        "octubre" | "oct" => 10,
        "noviembre" | "nov" => 11,
        "diciembre" | "dic" => 12,
        _ => return None,
    };
    Some(number)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_iso() {
        assert_eq!(parse_date("2025-06-24"), Some(date(2025, 6, 24)));
    }

    #[test]
    fn test_parse_dmy_separators() {
        assert_eq!(parse_date("24-06-2025"), Some(date(2025, 6, 24)));
        assert_eq!(parse_date("24/06/2025"), Some(date(2025, 6, 24)));
        assert_eq!(parse_date("22.06.2025"), Some(date(2025, 6, 22)));
        assert_eq!(parse_date("24 - 06 - 2025"), Some(date(2025, 6, 24)));
    }

    #[test]
    fn test_parse_two_digit_year() {
        assert_eq!(parse_date("15/01/24"), Some(date(2024, 1, 15)));
        assert_eq!(parse_date("15/01/98"), Some(date(1998, 1, 15)));
    }

    #[test]
    fn test_parse_spanish_long() {
        assert_eq!(parse_date("26 de Junio del 2025"), Some(date(2025, 6, 26)));
        assert_eq!(parse_date("3 de setiembre de 2024"), Some(date(2024, 9, 3)));
        assert_eq!(parse_date("15 ENE 2024"), Some(date(2024, 1, 15)));
    }

    #[test]
    fn test_parse_compact() {
        assert_eq!(parse_date("12062025"), Some(date(2025, 6, 12)));
    }

    #[test]
    fn test_rejects_impossible_dates() {
        assert_eq!(parse_date("31-02-2025"), None);
        assert_eq!(parse_date("99999999"), None);
        assert_eq!(parse_date("sin fecha"), None);
    }

    #[test]
    fn test_unknown_month_is_none() {
        assert_eq!(spanish_month_to_number("junio"), Some(6));
        assert_eq!(spanish_month_to_number("DIC"), Some(12));
        assert_eq!(spanish_month_to_number("janvier"), None);
    }
}
