//! Line-item fragments shared by all four message-type parsers.

use edifact_envelope::Segment;

use crate::common::{non_empty, parse_decimal, LineItemDate, Reference};

/// Where the forward scan currently is within a message body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Header,
    Line,
    Summary,
}

/// A product identifier lifted from `LIN`'s third composite or a
/// subsequent `PIA`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductId {
    pub id: String,
    pub id_type: Option<String>,
    pub agency: Option<String>,
}

/// A quantity triple from `QTY`.
#[derive(Debug, Clone, PartialEq)]
pub struct Quantity {
    pub qualifier: String,
    pub value: f64,
    pub unit: Option<String>,
}

/// A price triple from `PRI`.
#[derive(Debug, Clone, PartialEq)]
pub struct Price {
    pub qualifier: Option<String>,
    pub value: f64,
}

/// A tax entry from `TAX`, with its optional trailing `MOA` folded in.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tax {
    pub qualifier: Option<String>,
    pub category: Option<String>,
    pub rate: Option<f64>,
    pub amount: Option<f64>,
    pub basis: Option<f64>,
}

/// An allowance or charge from `ALC`, with its optional trailing `PCD`
/// percentage and `MOA` amounts folded in.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Allowance {
    /// `"A"` allowance or `"C"` charge (ALC element 0).
    pub indicator: String,
    pub percentage: Option<f64>,
    pub amount: Option<f64>,
    pub basis: Option<f64>,
}

/// One numbered line item, shared shape across ORDERS/ORDRSP/DESADV/INVOIC.
///
/// Not every field is populated by every message type — e.g. `unit_price`
/// is only set by the INVOIC parser (which collapses `PRI` into a single
/// value), while ORDERS keeps the full `prices` list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LineItem {
    pub line_number: String,
    /// `LIN` element 1, retained verbatim for ORDRSP action codes.
    pub action_code: Option<String>,
    pub product_ids: Vec<ProductId>,
    pub description: Option<String>,
    pub quantities: Vec<Quantity>,
    /// First primary quantity, coalesced by INVOIC/DESADV.
    pub quantity: Option<Quantity>,
    pub prices: Vec<Price>,
    /// Collapsed single price, populated by INVOIC.
    pub unit_price: Option<f64>,
    pub dates: Vec<LineItemDate>,
    pub references: Vec<Reference>,
    /// Raw `(qualifier, value)` pairs from line-level `MOA`.
    pub amounts: Vec<(String, f64)>,
    /// Lifted from `MOA` qualifier 203.
    pub line_amount: Option<f64>,
    pub taxes: Vec<Tax>,
    pub allowances: Vec<Allowance>,
    pub free_text: Option<String>,
}

impl LineItem {
    pub fn new(line_number: impl Into<String>) -> Self {
        Self {
            line_number: line_number.into(),
            ..Default::default()
        }
    }
}

pub fn parse_lin_product_id(segment: &Segment, element_index: usize) -> Option<ProductId> {
    let id = non_empty(segment.get_component(element_index, 0))?;
    Some(ProductId {
        id,
        id_type: non_empty(segment.get_component(element_index, 1)),
        agency: non_empty(segment.get_component(element_index, 2)),
    })
}

pub fn parse_qty(segment: &Segment, decimal: u8) -> Quantity {
    Quantity {
        qualifier: segment.get_component(0, 0).to_string(),
        value: parse_decimal(segment.get_component(0, 1), decimal),
        unit: non_empty(segment.get_component(0, 2)),
    }
}

pub fn parse_pri(segment: &Segment, decimal: u8) -> Price {
    Price {
        qualifier: non_empty(segment.get_component(0, 0)),
        value: parse_decimal(segment.get_component(0, 1), decimal),
    }
}

/// Parses an `IMD` free-text description, preferring composite position
/// 3:4 and falling back to 3:1 (1-based element:component positions,
/// i.e. 0-based element 2, components 3 then 0).
pub fn parse_imd_description(segment: &Segment) -> Option<String> {
    non_empty(segment.get_component(2, 3)).or_else(|| non_empty(segment.get_component(2, 0)))
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
    fn parse_qty_reads_qualifier_value_unit() {
        let qty = parse_qty(&seg("QTY", vec![vec!["21", "10", "PCE"]]), b'.');
        assert_eq!(qty.qualifier, "21");
        assert_eq!(qty.value, 10.0);
        assert_eq!(qty.unit.as_deref(), Some("PCE"));
    }

    #[test]
    fn parse_imd_prefers_component_3_over_0() {
        let desc = parse_imd_description(&seg(
            "IMD",
            vec![vec!["F"], vec!["79"], vec!["", "", "", "Widget"]],
        ));
        assert_eq!(desc.as_deref(), Some("Widget"));
    }

    #[test]
    fn parse_imd_falls_back_to_component_0() {
        let desc = parse_imd_description(&seg("IMD", vec![vec!["F"], vec!["79"], vec!["Widget"]]));
        assert_eq!(desc.as_deref(), Some("Widget"));
    }

    #[test]
    fn line_item_new_sets_number_and_defaults() {
        let line = LineItem::new("1");
        assert_eq!(line.line_number, "1");
        assert!(line.product_ids.is_empty());
    }
}
