//! Mapping from a parsed DESADV despatch advice to canonical [`Shipment`].

use edifact_messages::DesadvMessage;

use crate::canonical::{PartyRole, Shipment};
use crate::common::{line_to_canonical, party_to_canonical};

/// Maps a parsed DESADV message to the vendor-neutral [`Shipment`] shape.
///
/// There is no generator counterpart: DESADV is treated as an inbound-only
/// message type, so this mapping is one-way.
pub fn desadv_to_shipment(record: &DesadvMessage) -> Shipment {
    let mut buyer = None;
    let mut seller = None;
    let mut ship_to = None;

    for party in &record.parties {
        let canonical = party_to_canonical(party);
        match PartyRole::from_nad_qualifier(&party.qualifier) {
            PartyRole::Buyer => buyer = Some(canonical),
            PartyRole::Seller => seller = Some(canonical),
            PartyRole::ShipTo => ship_to = Some(canonical),
            _ => {}
        }
    }

    let order_reference = record
        .references
        .iter()
        .find(|r| r.qualifier == "ON")
        .map(|r| r.value.clone())
        .or_else(|| record.despatch_reference.clone());

    Shipment {
        despatch_number: record.document_number.clone(),
        despatch_date: record.document_date.clone(),
        order_reference,
        buyer,
        seller,
        ship_to,
        carrier: record.transport.as_ref().and_then(|t| t.carrier.clone()),
        package_count: record.packages.len(),
        line_items: record.line_items.iter().map(line_to_canonical).collect(),
    }
}
