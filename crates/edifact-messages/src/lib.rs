//! Message-type parsers and generator for ORDERS, ORDRSP, DESADV, and INVOIC.
//!
//! Each parser walks a message's flat body-segment list once, driven by a
//! small `Section` state machine (header/line/summary), to build a typed
//! record. Numeric parsing is deliberately lenient: unparsable values become
//! `0` rather than aborting, matching the round-trip fidelity the envelope
//! layer already affords malformed input.

mod common;
mod desadv;
mod generate_orders;
mod invoic;
mod model;
mod ordrsp;
mod orders;

pub use common::{Date, LineItemDate, Party, Reference};
pub use desadv::{parse_desadv, DesadvMessage, Package, Transport};
pub use generate_orders::generate_orders;
pub use invoic::{parse_invoic, InvoicMessage, InvoiceTotals, PaymentInstructions, PaymentTerm};
pub use model::{
    Allowance, LineItem, Price, ProductId, Quantity, Tax,
};
pub use ordrsp::{parse_ordrsp, OrdrspMessage};
pub use orders::{parse_orders, OrdersMessage};
