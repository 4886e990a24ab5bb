//! Shared record fragments used by every message-type parser: parties,
//! contacts, references, and header/line-level dates.

use edifact_envelope::Segment;

/// A date or date/time value lifted from a `DTM` segment.
///
/// `qualifier` is the DTM qualifier (e.g. `"137"` for document date,
/// `"2"` for delivery date). `value` is reformatted to `YYYY-MM-DD` when
/// the declared format qualifier is `102`, to `YYYY-MM-DDTHH:MM` when it
/// is `203`, and left raw otherwise, including when the value is shorter
/// than the expected width — preserved verbatim rather than guessed at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Date {
    pub qualifier: String,
    pub value: String,
    pub format_qualifier: Option<String>,
}

/// Line items reuse the same shape as header dates.
pub type LineItemDate = Date;

/// A document- or party-level reference lifted from an `RFF` segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    pub qualifier: String,
    pub value: String,
}

/// A contact person or department, accumulated from `CTA`/`COM` segments
/// following a `NAD`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Contact {
    pub function: Option<String>,
    pub name: Option<String>,
    /// `(communication qualifier, value)` pairs, e.g. `("TE", "+49 30 1234")`.
    pub communications: Vec<(String, String)>,
}

/// A trading partner opened by a `NAD` segment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Party {
    /// Function/role qualifier (e.g. `"BY"` buyer, `"SU"` seller).
    pub qualifier: String,
    pub id: Option<String>,
    pub id_agency: Option<String>,
    pub name: Option<String>,
    pub street1: Option<String>,
    pub street2: Option<String>,
    pub city: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
    pub contacts: Vec<Contact>,
    pub references: Vec<Reference>,
}

impl Party {
    pub fn from_nad(segment: &Segment) -> Self {
        let id = non_empty(segment.get_component(1, 0));
        let id_agency = non_empty(segment.get_component(1, 2));
        let name = non_empty(segment.get_component(3, 0));
        let street1 = non_empty(segment.get_component(4, 0));
        let street2 = non_empty(segment.get_component(4, 1));
        let city = non_empty(segment.get_element(5));
        let postal_code = non_empty(segment.get_element(7));
        let country = non_empty(segment.get_element(8));
        Party {
            qualifier: segment.get_element(0).to_string(),
            id,
            id_agency,
            name,
            street1,
            street2,
            city,
            postal_code,
            country,
            contacts: Vec::new(),
            references: Vec::new(),
        }
    }
}

/// Parses a `DTM` segment into a [`Date`], reformatting qualifier-137
/// dates per the declared format qualifier.
pub fn parse_dtm(segment: &Segment) -> Date {
    let qualifier = segment.get_component(0, 0).to_string();
    let raw_value = segment.get_component(0, 1).to_string();
    let format_qualifier = non_empty(segment.get_component(0, 2));

    let value = match format_qualifier.as_deref() {
        Some("102") => reformat_ccyymmdd(&raw_value).unwrap_or(raw_value),
        Some("203") => reformat_ccyymmddhhmm(&raw_value).unwrap_or(raw_value),
        _ => raw_value,
    };

    Date {
        qualifier,
        value,
        format_qualifier,
    }
}

fn reformat_ccyymmdd(value: &str) -> Option<String> {
    // Too-short/malformed DTM-137 values fall through to `None` and are
    // preserved raw by the caller.
    chrono::NaiveDate::parse_from_str(value, "%Y%m%d")
        .ok()
        .map(|d| d.format("%Y-%m-%d").to_string())
}

fn reformat_ccyymmddhhmm(value: &str) -> Option<String> {
    chrono::NaiveDateTime::parse_from_str(value, "%Y%m%d%H%M")
        .ok()
        .map(|dt| dt.format("%Y-%m-%dT%H:%M").to_string())
}

/// Parses an `RFF` segment into a [`Reference`].
pub fn parse_rff(segment: &Segment) -> Reference {
    Reference {
        qualifier: segment.get_component(0, 0).to_string(),
        value: segment.get_component(0, 1).to_string(),
    }
}

/// Parses a `CTA` segment into a new [`Contact`] (communications are
/// appended separately as `COM` segments follow).
pub fn parse_cta(segment: &Segment) -> Contact {
    Contact {
        function: non_empty(segment.get_element(0)),
        name: non_empty(segment.get_component(1, 1)).or_else(|| non_empty(segment.get_component(1, 0))),
        communications: Vec::new(),
    }
}

/// Parses a `COM` segment into a `(qualifier, value)` communication pair.
pub fn parse_com(segment: &Segment) -> (String, String) {
    (
        segment.get_component(0, 1).to_string(),
        segment.get_component(0, 0).to_string(),
    )
}

/// Parses a numeric value honoring a non-default decimal mark, tolerating
/// a leading sign. Unparsable input silently becomes `0.0` rather than
/// failing the parse.
pub fn parse_decimal(value: &str, decimal: u8) -> f64 {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    let normalized = if decimal != b'.' {
        trimmed.replace(decimal as char, ".")
    } else {
        trimmed.to_string()
    };
    normalized.parse::<f64>().unwrap_or(0.0)
}

pub fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seg(id: &str, elements: Vec<Vec<&str>>) -> Segment {
        Segment::new(
            id,
            elements
                .into_iter()
                .map(|e| e.into_iter().map(|c| c.to_string()).collect())
                .collect(),
        )
    }

    #[test]
    fn parse_dtm_reformats_102_to_iso_date() {
        let date = parse_dtm(&seg("DTM", vec![vec!["137", "20230115", "102"]]));
        assert_eq!(date.value, "2023-01-15");
    }

    #[test]
    fn parse_dtm_reformats_203_to_iso_datetime() {
        let date = parse_dtm(&seg("DTM", vec![vec!["11", "202301151430", "203"]]));
        assert_eq!(date.value, "2023-01-15T14:30");
    }

    #[test]
    fn parse_dtm_keeps_raw_value_when_short() {
        let date = parse_dtm(&seg("DTM", vec![vec!["137", "2023", "102"]]));
        assert_eq!(date.value, "2023");
    }

    #[test]
    fn parse_dtm_keeps_raw_value_without_format_qualifier() {
        let date = parse_dtm(&seg("DTM", vec![vec!["35", "20230120"]]));
        assert_eq!(date.value, "20230120");
        assert_eq!(date.format_qualifier, None);
    }

    #[test]
    fn party_from_nad_splits_street_on_component_separator() {
        let party = Party::from_nad(&seg(
            "NAD",
            vec![
                vec!["BY"],
                vec!["1234567890", "", "9"],
                vec![],
                vec!["Acme Corp"],
                vec!["Main Street 1", "Suite 2"],
                vec!["Springfield"],
                vec![],
                vec!["12345"],
                vec!["US"],
            ],
        ));
        assert_eq!(party.qualifier, "BY");
        assert_eq!(party.id.as_deref(), Some("1234567890"));
        assert_eq!(party.street1.as_deref(), Some("Main Street 1"));
        assert_eq!(party.street2.as_deref(), Some("Suite 2"));
        assert_eq!(party.city.as_deref(), Some("Springfield"));
        assert_eq!(party.postal_code.as_deref(), Some("12345"));
        assert_eq!(party.country.as_deref(), Some("US"));
    }

    #[test]
    fn parse_decimal_handles_custom_decimal_mark() {
        assert_eq!(parse_decimal("12,50", b','), 12.5);
    }

    #[test]
    fn parse_decimal_falls_back_to_zero_on_garbage() {
        assert_eq!(parse_decimal("not-a-number", b'.'), 0.0);
    }

    #[test]
    fn parse_rff_extracts_qualifier_and_value() {
        let rff = parse_rff(&seg("RFF", vec![vec!["ON", "ORDER001"]]));
        assert_eq!(rff.qualifier, "ON");
        assert_eq!(rff.value, "ORDER001");
    }
}
