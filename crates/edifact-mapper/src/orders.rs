//! Bidirectional mapping between `OrdersMessage` and canonical [`Order`].

use edifact_messages::{OrdersMessage, Party};

use crate::canonical::{MonetaryTotals, Order, OrderType, PartyRole};
use crate::common::{canonical_to_line, canonical_to_party, line_to_canonical, party_to_canonical};

/// Maps a parsed ORDERS message to the vendor-neutral [`Order`] shape.
///
/// `BY`/`SU`/`DP` map to `buyer`/`seller`/`shipping`; every other qualifier
/// (including `IV`) is retained under `other_parties` so no information is
/// silently dropped.
pub fn orders_to_order(record: &OrdersMessage) -> Order {
    let mut buyer = None;
    let mut seller = None;
    let mut shipping = None;
    let mut other_parties = Vec::new();

    for party in &record.parties {
        let role = PartyRole::from_nad_qualifier(&party.qualifier);
        let canonical = party_to_canonical(party);
        match role {
            PartyRole::Buyer => buyer = Some(canonical),
            PartyRole::Seller => seller = Some(canonical),
            PartyRole::ShipTo => shipping = Some(canonical),
            other => other_parties.push((other, canonical)),
        }
    }

    Order {
        order_type: OrderType::PurchaseOrder,
        order_number: record.document_number.clone(),
        order_date: record.document_date.clone(),
        buyer,
        seller,
        shipping,
        other_parties,
        line_items: record.line_items.iter().map(line_to_canonical).collect(),
        totals: MonetaryTotals {
            currency: record.currency.clone(),
            line_items_total: None,
            total_allowances: None,
            total_charges: None,
            total_tax_amount: None,
            grand_total: record.total_amount,
        },
    }
}

/// Maps a canonical [`Order`] back to an [`OrdersMessage`] record, ready
/// for [`edifact_messages::generate_orders`]. The message reference number
/// belongs to the envelope layer, not the canonical document, so the
/// caller supplies it.
pub fn order_to_orders(order: &Order, message_reference_number: impl Into<String>) -> OrdersMessage {
    let mut parties = Vec::new();
    if let Some(buyer) = &order.buyer {
        parties.push(role_party(PartyRole::Buyer, buyer));
    }
    if let Some(seller) = &order.seller {
        parties.push(role_party(PartyRole::Seller, seller));
    }
    if let Some(shipping) = &order.shipping {
        parties.push(role_party(PartyRole::ShipTo, shipping));
    }
    for (role, party) in &order.other_parties {
        parties.push(role_party(role.clone(), party));
    }

    OrdersMessage {
        message_reference_number: message_reference_number.into(),
        document_type_code: "220".to_string(),
        document_number: order.order_number.clone(),
        function_code: "9".to_string(),
        document_date: order.order_date.clone(),
        currency: order.totals.currency.clone(),
        parties,
        line_item_count: Some(order.line_items.len() as u32),
        line_items: order.line_items.iter().map(canonical_to_line).collect(),
        total_amount: order.totals.grand_total,
        ..Default::default()
    }
}

fn role_party(role: PartyRole, party: &crate::canonical::CanonicalParty) -> Party {
    let mut nad = canonical_to_party(party);
    nad.qualifier = role.to_nad_qualifier();
    nad
}
