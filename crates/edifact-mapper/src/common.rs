//! Conversions shared by every message-type mapper: parties, line items,
//! units, and product identifiers.

use edifact_messages::{LineItem, Party, ProductId};

use crate::canonical::{CanonicalLineItem, CanonicalParty, CanonicalProductId, ProductIdKind};

/// Splits a street composite on its component separator when a [`Party`]
/// was built by hand rather than through `Party::from_nad`, which already
/// splits `street1`/`street2` from the NAD segment's fourth element.
pub(crate) fn split_street(value: &str) -> (Option<String>, Option<String>) {
    match value.split_once(':') {
        Some((first, second)) => (Some(first.to_string()), non_empty(second)),
        None => (Some(value.to_string()), None),
    }
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Normalizes an EDIFACT unit-of-measure code. `"PCE"` (piece) becomes
/// `"each"`; every other code passes through verbatim.
pub(crate) fn normalize_unit(unit: &str) -> String {
    match unit {
        "PCE" => "each".to_string(),
        other => other.to_string(),
    }
}

/// Inverse of [`normalize_unit`].
pub(crate) fn denormalize_unit(unit: &str) -> String {
    match unit {
        "each" => "PCE".to_string(),
        other => other.to_string(),
    }
}

/// Maps a parsed `NAD` party to its canonical shape. The qualifier itself
/// is dropped here; callers route on [`crate::canonical::PartyRole`] before
/// or after calling this.
pub(crate) fn party_to_canonical(party: &Party) -> CanonicalParty {
    let (street1, street2) = match (&party.street1, &party.street2) {
        (Some(s1), None) => split_street(s1),
        (s1, s2) => (s1.clone(), s2.clone()),
    };
    CanonicalParty {
        id: party.id.clone(),
        id_agency: party.id_agency.clone(),
        name: party.name.clone(),
        street1,
        street2,
        city: party.city.clone(),
        postal_code: party.postal_code.clone(),
        country: party.country.clone(),
    }
}

/// Builds a [`Party`] from a [`CanonicalParty`]. The qualifier is left
/// empty; callers set it from the party's role before generating a `NAD`.
pub(crate) fn canonical_to_party(party: &CanonicalParty) -> Party {
    Party {
        qualifier: String::new(),
        id: party.id.clone(),
        id_agency: party.id_agency.clone(),
        name: party.name.clone(),
        street1: party.street1.clone(),
        street2: party.street2.clone(),
        city: party.city.clone(),
        postal_code: party.postal_code.clone(),
        country: party.country.clone(),
        contacts: Vec::new(),
        references: Vec::new(),
    }
}

fn product_id_to_canonical(product_id: &ProductId) -> CanonicalProductId {
    CanonicalProductId {
        kind: ProductIdKind::from_id_type(product_id.id_type.as_deref().unwrap_or_default()),
        value: product_id.id.clone(),
    }
}

fn canonical_to_product_id(product_id: &CanonicalProductId) -> ProductId {
    ProductId {
        id: product_id.value.clone(),
        id_type: Some(product_id.kind.to_id_type()),
        agency: None,
    }
}

/// Maps a parsed line item to its canonical shape. Quantity is selected
/// from qualifier `21` (ordered/despatched quantity) when present, falling
/// back to the line's already-coalesced primary quantity (set by
/// DESADV/INVOIC). Unit price prefers the already-coalesced `unit_price`,
/// falling back to the first `PRI` entry (set by ORDERS/ORDRSP/DESADV).
pub(crate) fn line_to_canonical(line: &LineItem) -> CanonicalLineItem {
    let quantity = line
        .quantities
        .iter()
        .find(|q| q.qualifier == "21")
        .or(line.quantity.as_ref());
    let unit_price = line.unit_price.or_else(|| line.prices.first().map(|p| p.value));

    CanonicalLineItem {
        line_number: line.line_number.clone(),
        product_ids: line.product_ids.iter().map(product_id_to_canonical).collect(),
        description: line.description.clone(),
        quantity: quantity.map(|q| q.value),
        unit: quantity.and_then(|q| q.unit.as_deref()).map(normalize_unit),
        unit_price,
        line_amount: line.line_amount,
    }
}

/// Builds a `LIN`-ready line item from a canonical one. The caller is
/// responsible for any message-specific fields (e.g. ORDRSP action codes).
pub(crate) fn canonical_to_line(line: &CanonicalLineItem) -> LineItem {
    let mut edifact_line = LineItem::new(line.line_number.clone());
    edifact_line.product_ids = line.product_ids.iter().map(canonical_to_product_id).collect();
    edifact_line.description = line.description.clone();
    if let Some(value) = line.quantity {
        edifact_line.quantities.push(edifact_messages::Quantity {
            qualifier: "21".to_string(),
            value,
            unit: line.unit.as_deref().map(denormalize_unit),
        });
    }
    if let Some(value) = line.unit_price {
        edifact_line.unit_price = Some(value);
        edifact_line.prices.push(edifact_messages::Price {
            qualifier: Some("AAA".to_string()),
            value,
        });
    }
    edifact_line.line_amount = line.line_amount;
    if let Some(amount) = line.line_amount {
        edifact_line.amounts.push(("203".to_string(), amount));
    }
    edifact_line
}
