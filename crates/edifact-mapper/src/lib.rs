//! Bidirectional mapping between EDIFACT message-type records
//! ([`edifact_messages`]) and a vendor-neutral canonical business-document
//! schema.
//!
//! Every mapping function here is total over its input domain: none of
//! them return a `Result`, mirroring the message-type parsers they sit on
//! top of. Unrecognized qualifiers and codes are retained rather than
//! rejected (see [`canonical::PartyRole::Other`] and
//! [`canonical::ProductIdKind::Other`]), so no information is silently
//! dropped on the way into the canonical shape.

pub mod canonical;
mod common;
mod desadv;
mod invoic;
mod ordrsp;
mod orders;

pub use canonical::{
    CanonicalLineItem, CanonicalParty, CanonicalProductId, Invoice, MonetaryTotals, Order,
    OrderResponse, OrderType, PartyRole, ProductIdKind, Shipment,
};
pub use desadv::desadv_to_shipment;
pub use invoic::invoic_to_invoice;
pub use ordrsp::ordrsp_to_order_response;
pub use orders::{order_to_orders, orders_to_order};
