//! Facade crate: a single `EdifactCodec` entry point over the parser,
//! envelope, message-type, and mapper layers, plus the [`Clock`] and
//! [`ReferenceSource`] seams generation needs to fill in timestamps and
//! reference numbers.
//!
//! Re-exports the lower-level types most callers need (`ParseResult`,
//! `BuildConfig`, `GenerateOptions`, the message-type records and their
//! parsers, and the canonical mapper entry points) so a caller who only
//! depends on `edifact-codec` rarely needs to reach into the layers below
//! it directly.

mod clock;
mod facade;
mod reference;

pub use clock::{Clock, FixedClock, SystemClock};
pub use facade::EdifactCodec;
pub use reference::{CounterReferenceSource, RandomReferenceSource, ReferenceSource};

pub use edifact_envelope::{
    BuildConfig, Diagnostic, GenerateError, GenerateOptions, Interchange, Message, ParseOptions,
    ParseResult, Segment, Severity,
};
pub use edifact_messages::{
    parse_desadv, parse_invoic, parse_ordrsp, parse_orders, generate_orders, DesadvMessage,
    InvoicMessage, OrdersMessage, OrdrspMessage,
};
pub use edifact_mapper::{
    desadv_to_shipment, invoic_to_invoice, order_to_orders, ordrsp_to_order_response,
    orders_to_order, Invoice, Order, OrderResponse, Shipment,
};
