//! Mapping from a parsed ORDRSP order response to canonical [`OrderResponse`].
//!
//! Not required by the distilled mapping rules, but a natural counterpart
//! to [`crate::orders_to_order`]: ORDRSP shares ORDERS' header/line shape
//! almost exactly, differing mainly in `BGM` function code semantics
//! (confirm/amend/reject) and per-line action codes.

use edifact_messages::OrdrspMessage;

use crate::canonical::{MonetaryTotals, OrderResponse, PartyRole};
use crate::common::{line_to_canonical, party_to_canonical};

pub fn ordrsp_to_order_response(record: &OrdrspMessage) -> OrderResponse {
    let mut buyer = None;
    let mut seller = None;

    for party in &record.parties {
        let canonical = party_to_canonical(party);
        match PartyRole::from_nad_qualifier(&party.qualifier) {
            PartyRole::Buyer => buyer = Some(canonical),
            PartyRole::Seller => seller = Some(canonical),
            _ => {}
        }
    }

    OrderResponse {
        order_reference: record.order_reference.clone(),
        response_number: record.document_number.clone(),
        function_code: record.function_code.clone(),
        response_date: record.document_date.clone(),
        buyer,
        seller,
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
