//! Header classification and cell cleanup for signup spreadsheets.
//!
//! The signup forms are written by course coordinators, so column titles
//! vary ("E-postadresse", "Mail", "Epost-adresse") and cell values carry
//! country prefixes, stray separators and two-digit years. Everything here
//! is pure string work; the database side lives in [`super::import`].

use chrono::{Local, Months, NaiveDate};
use regex::Regex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    FirstName,
    LastName,
    Email,
    Phone,
    CourseType,
    BirthDate,
    StreetAddress,
    CityZip,
}

/// Maps a raw header cell onto the field it carries, if any.
///
/// Keywords match as prefixes, so "E-postadresse" can never reach the bare
/// "adresse" test, and billing columns ("E-postadresse faktura") map to
/// nothing rather than the signup email.
pub fn classify_header(header: &str) -> Option<FieldKind> {
    let header = header.trim().to_lowercase();

    if (header.starts_with("e-postadresse")
        || header.starts_with("mail")
        || header.starts_with("e-post")
        || header.starts_with("epost"))
        && !header.contains("faktura")
    {
        Some(FieldKind::Email)
    } else if header.starts_with("tlf")
        || header.starts_with("telefon")
        || header.starts_with("mobil")
    {
        Some(FieldKind::Phone)
    } else if header.starts_with("fornavn") {
        Some(FieldKind::FirstName)
    } else if header.starts_with("etternavn") {
        Some(FieldKind::LastName)
    } else if header.starts_with("jeg melder meg p") {
        Some(FieldKind::CourseType)
    } else if header.starts_with("fødselsdato") {
        Some(FieldKind::BirthDate)
    } else if header.starts_with("adresse") {
        Some(FieldKind::StreetAddress)
    } else if header.starts_with("postnr og sted") {
        Some(FieldKind::CityZip)
    } else {
        None
    }
}

/// Resolves the column index of every recognized field in the header row.
pub fn map_headers(headers: &[String]) -> Vec<(usize, FieldKind)> {
    headers
        .iter()
        .enumerate()
        .filter_map(|(index, header)| classify_header(header).map(|kind| (index, kind)))
        .collect()
}

/// One signup row with its cells sorted into fields, still as raw text.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RowData {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub birth_date: String,
    pub street_address: String,
    pub city_zipcode: String,
    pub course_type: String,
}

/// Picks the mapped columns out of a data row. Rows shorter than the
/// header leave the missing fields empty.
pub fn extract_row(mapping: &[(usize, FieldKind)], row: &[String]) -> RowData {
    let mut data = RowData::default();

    for &(index, kind) in mapping {
        let value = row.get(index).map(|cell| cell.trim()).unwrap_or_default();
        let slot = match kind {
            FieldKind::FirstName => &mut data.first_name,
            FieldKind::LastName => &mut data.last_name,
            FieldKind::Email => &mut data.email,
            FieldKind::Phone => &mut data.phone,
            FieldKind::CourseType => &mut data.course_type,
            FieldKind::BirthDate => &mut data.birth_date,
            FieldKind::StreetAddress => &mut data.street_address,
            FieldKind::CityZip => &mut data.city_zipcode,
        };
        *slot = value.to_string();
    }

    data
}

/// Parses a Norwegian phone number into the digits we store. The +47
/// country prefix and inner spaces are dropped first.
pub fn parse_phone_number(raw: &str) -> Option<i32> {
    raw.replace("+47", "").replace(' ', "").trim().parse().ok()
}

/// Parses a hand-typed birth date.
///
/// Any run of non-digits counts as the separator, two-digit years are
/// expanded into the 1900s and the result must fall between 90 and 15
/// years before today, endpoints included. Out-of-window dates are
/// rejected rather than guessed at.
pub fn parse_birth_date(raw: &str) -> Option<NaiveDate> {
    let separators = Regex::new(r"[^0-9]+").ok()?;
    let mut normalized = separators
        .replace_all(raw.trim(), ".")
        .trim_matches('.')
        .to_string();

    let parts: Vec<&str> = normalized.split('.').collect();
    if normalized.len() <= 8 && parts.len() == 3 {
        normalized = format!("{}.{}.19{}", parts[0], parts[1], parts[2]);
    }

    let date = NaiveDate::parse_from_str(&normalized, "%d.%m.%Y").ok()?;

    let today = Local::now().date_naive();
    let oldest = today.checked_sub_months(Months::new(90 * 12))?;
    let youngest = today.checked_sub_months(Months::new(15 * 12))?;
    if date >= oldest && date <= youngest {
        Some(date)
    } else {
        None
    }
}

/// Splits a "postnr og sted" cell like "0563 Oslo" into zip code and city.
/// The city keeps letters only, so separators like "0563, Oslo" drop out.
pub fn parse_zip_city(raw: &str) -> Option<(i32, String)> {
    let zip: i32 = raw
        .chars()
        .filter(char::is_ascii_digit)
        .collect::<String>()
        .parse()
        .ok()?;

    let city: String = raw.chars().filter(|c| c.is_alphabetic()).collect();

    if city.is_empty() {
        return None;
    }

    Some((zip, city))
}

#[cfg(test)]
mod tests {
    use chrono::{Datelike, Local};

    use super::*;

    #[test]
    fn test_classify_header_email_variants() {
        assert_eq!(classify_header("E-postadresse"), Some(FieldKind::Email));
        assert_eq!(classify_header("Mail"), Some(FieldKind::Email));
        assert_eq!(classify_header("Epost"), Some(FieldKind::Email));
        assert_eq!(classify_header("E-post privat"), Some(FieldKind::Email));
    }

    #[test]
    fn test_classify_header_billing_email_stays_unmapped() {
        assert_eq!(classify_header("Faktura e-postadresse"), None);
        assert_eq!(classify_header("E-postadresse faktura"), None);
    }

    #[test]
    fn test_classify_header_separates_email_from_address() {
        assert_eq!(classify_header("E-postadresse"), Some(FieldKind::Email));
        assert_eq!(classify_header("Adresse"), Some(FieldKind::StreetAddress));
    }

    #[test]
    fn test_classify_header_remaining_fields() {
        assert_eq!(classify_header("Fornavn"), Some(FieldKind::FirstName));
        assert_eq!(classify_header("Etternavn"), Some(FieldKind::LastName));
        assert_eq!(classify_header("Tlf"), Some(FieldKind::Phone));
        assert_eq!(classify_header("Telefonnummer"), Some(FieldKind::Phone));
        assert_eq!(classify_header("Mobilnummer"), Some(FieldKind::Phone));
        assert_eq!(classify_header("Fødselsdato"), Some(FieldKind::BirthDate));
        assert_eq!(classify_header("Postnr og sted"), Some(FieldKind::CityZip));
        assert_eq!(
            classify_header("Jeg melder meg på:"),
            Some(FieldKind::CourseType)
        );
        assert_eq!(classify_header("Kommentar"), None);
    }

    #[test]
    fn test_map_headers_and_extract_row() {
        let headers = vec![
            "Tidsmerke".to_string(),
            "Fornavn".to_string(),
            "Etternavn".to_string(),
            "E-postadresse".to_string(),
            "Tlf".to_string(),
        ];
        let mapping = map_headers(&headers);
        assert_eq!(mapping.len(), 4);

        let row = vec![
            "2026-01-05".to_string(),
            " Kari ".to_string(),
            "Nordmann".to_string(),
            "kari@example.no".to_string(),
        ];
        let data = extract_row(&mapping, &row);
        assert_eq!(data.first_name, "Kari");
        assert_eq!(data.last_name, "Nordmann");
        assert_eq!(data.email, "kari@example.no");
        // row is shorter than the header, the phone column stays empty
        assert_eq!(data.phone, "");
    }

    #[test]
    fn test_extract_row_keeps_street_address_next_to_billing_column() {
        let headers = vec![
            "Fornavn".to_string(),
            "Etternavn".to_string(),
            "E-postadresse".to_string(),
            "Adresse".to_string(),
            "Postnr og sted".to_string(),
            "E-postadresse faktura".to_string(),
        ];
        let mapping = map_headers(&headers);
        assert_eq!(mapping.len(), 5);

        let row = vec![
            "Kari".to_string(),
            "Nordmann".to_string(),
            "kari@example.no".to_string(),
            "Storgata 1".to_string(),
            "0563 Oslo".to_string(),
            "faktura@corp.no".to_string(),
        ];
        let data = extract_row(&mapping, &row);
        assert_eq!(data.email, "kari@example.no");
        assert_eq!(data.street_address, "Storgata 1");
        assert_eq!(data.city_zipcode, "0563 Oslo");
    }

    #[test]
    fn test_parse_phone_number() {
        assert_eq!(parse_phone_number("+47 412 34 567"), Some(41234567));
        assert_eq!(parse_phone_number("41234567"), Some(41234567));
        assert_eq!(parse_phone_number("ring meg"), None);
        assert_eq!(parse_phone_number(""), None);
    }

    #[test]
    fn test_parse_birth_date_expands_two_digit_years() {
        let expected = NaiveDate::from_ymd_opt(1986, 3, 14).unwrap();
        assert_eq!(parse_birth_date("14.03.86"), Some(expected));
        assert_eq!(parse_birth_date("14/03/86"), Some(expected));
        assert_eq!(parse_birth_date("14-03-86"), Some(expected));
        assert_eq!(parse_birth_date("14.03.1986"), Some(expected));
    }

    #[test]
    fn test_parse_birth_date_rejects_out_of_window_dates() {
        // older than 90 years
        assert_eq!(parse_birth_date("01.01.1925"), None);
        // younger than 15 years
        let this_year = Local::now().year();
        assert_eq!(parse_birth_date(&format!("01.01.{this_year}")), None);
    }

    #[test]
    fn test_parse_birth_date_accepts_window_endpoints() {
        let today = Local::now().date_naive();
        let youngest = today.checked_sub_months(Months::new(15 * 12)).unwrap();
        let oldest = today.checked_sub_months(Months::new(90 * 12)).unwrap();

        assert_eq!(
            parse_birth_date(&youngest.format("%d.%m.%Y").to_string()),
            Some(youngest)
        );
        assert_eq!(
            parse_birth_date(&oldest.format("%d.%m.%Y").to_string()),
            Some(oldest)
        );

        // one day past the young end falls outside again
        let too_young = youngest.succ_opt().unwrap();
        assert_eq!(
            parse_birth_date(&too_young.format("%d.%m.%Y").to_string()),
            None
        );
    }

    #[test]
    fn test_parse_birth_date_rejects_garbage() {
        assert_eq!(parse_birth_date(""), None);
        assert_eq!(parse_birth_date("ukjent"), None);
        assert_eq!(parse_birth_date("14.03"), None);
    }

    #[test]
    fn test_parse_zip_city() {
        assert_eq!(parse_zip_city("0563 Oslo"), Some((563, "Oslo".to_string())));
        assert_eq!(
            parse_zip_city("Oslo 0563"),
            Some((563, "Oslo".to_string()))
        );
        assert_eq!(parse_zip_city("Oslo"), None);
        assert_eq!(parse_zip_city("0563"), None);
    }

    #[test]
    fn test_parse_zip_city_drops_separators_from_city() {
        assert_eq!(
            parse_zip_city("0563, Oslo"),
            Some((563, "Oslo".to_string()))
        );
        assert_eq!(parse_zip_city("8006 Bodø"), Some((8006, "Bodø".to_string())));
    }
}
