//! Vendor-neutral shapes produced and consumed by the mapper.

use serde::{Deserialize, Serialize};

/// Discriminates what kind of business transaction an [`Order`] represents.
/// Only `PurchaseOrder` is produced today; the enum exists so callers have
/// somewhere to branch if other order kinds are added later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderType {
    PurchaseOrder,
}

/// The role a [`CanonicalParty`] plays in a transaction, mirroring the
/// EDIFACT `NAD` qualifier it was built from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PartyRole {
    Buyer,
    Seller,
    ShipTo,
    Invoicee,
    Other(String),
}

impl PartyRole {
    pub fn from_nad_qualifier(qualifier: &str) -> Self {
        match qualifier {
            "BY" => PartyRole::Buyer,
            "SU" => PartyRole::Seller,
            "DP" => PartyRole::ShipTo,
            "IV" => PartyRole::Invoicee,
            other => PartyRole::Other(other.to_string()),
        }
    }

    pub fn to_nad_qualifier(&self) -> String {
        match self {
            PartyRole::Buyer => "BY".to_string(),
            PartyRole::Seller => "SU".to_string(),
            PartyRole::ShipTo => "DP".to_string(),
            PartyRole::Invoicee => "IV".to_string(),
            PartyRole::Other(code) => code.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CanonicalParty {
    pub id: Option<String>,
    pub id_agency: Option<String>,
    pub name: Option<String>,
    pub street1: Option<String>,
    pub street2: Option<String>,
    pub city: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
}

/// A product identifier's canonical kind, mapped from the EDIFACT `LIN`/
/// `PIA` identifier-type code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProductIdKind {
    Gtin,
    Sku,
    BuyerSku,
    Service,
    Other(String),
}

impl ProductIdKind {
    pub fn from_id_type(id_type: &str) -> Self {
        match id_type {
            "EN" | "UP" => ProductIdKind::Gtin,
            "SA" => ProductIdKind::Sku,
            "IN" => ProductIdKind::BuyerSku,
            "SRV" => ProductIdKind::Service,
            other => ProductIdKind::Other(other.to_string()),
        }
    }

    pub fn to_id_type(&self) -> String {
        match self {
            ProductIdKind::Gtin => "EN".to_string(),
            ProductIdKind::Sku => "SA".to_string(),
            ProductIdKind::BuyerSku => "IN".to_string(),
            ProductIdKind::Service => "SRV".to_string(),
            ProductIdKind::Other(code) => code.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalProductId {
    pub kind: ProductIdKind,
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CanonicalLineItem {
    pub line_number: String,
    pub product_ids: Vec<CanonicalProductId>,
    pub description: Option<String>,
    /// Quantity selected from `QTY` qualifier 21 (ordered/despatched quantity).
    pub quantity: Option<f64>,
    /// Canonical unit of measure; `"PCE"` is normalized to `"each"`.
    pub unit: Option<String>,
    pub unit_price: Option<f64>,
    pub line_amount: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MonetaryTotals {
    pub currency: Option<String>,
    pub line_items_total: Option<f64>,
    pub total_allowances: Option<f64>,
    pub total_charges: Option<f64>,
    pub total_tax_amount: Option<f64>,
    pub grand_total: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub order_type: OrderType,
    pub order_number: String,
    pub order_date: Option<String>,
    pub buyer: Option<CanonicalParty>,
    pub seller: Option<CanonicalParty>,
    pub shipping: Option<CanonicalParty>,
    pub other_parties: Vec<(PartyRole, CanonicalParty)>,
    pub line_items: Vec<CanonicalLineItem>,
    pub totals: MonetaryTotals,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderResponse {
    pub order_reference: Option<String>,
    pub response_number: String,
    /// EDIFACT `BGM` element 3 function code (e.g. `4` confirmed, `27` rejected).
    pub function_code: String,
    pub response_date: Option<String>,
    pub buyer: Option<CanonicalParty>,
    pub seller: Option<CanonicalParty>,
    pub line_items: Vec<CanonicalLineItem>,
    pub totals: MonetaryTotals,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shipment {
    pub despatch_number: String,
    pub despatch_date: Option<String>,
    pub order_reference: Option<String>,
    pub buyer: Option<CanonicalParty>,
    pub seller: Option<CanonicalParty>,
    pub ship_to: Option<CanonicalParty>,
    pub carrier: Option<String>,
    pub package_count: usize,
    pub line_items: Vec<CanonicalLineItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    pub invoice_number: String,
    pub invoice_date: Option<String>,
    pub order_reference: Option<String>,
    pub despatch_reference: Option<String>,
    pub buyer: Option<CanonicalParty>,
    pub seller: Option<CanonicalParty>,
    pub invoicee: Option<CanonicalParty>,
    pub payment_terms: Vec<String>,
    pub line_items: Vec<CanonicalLineItem>,
    pub totals: MonetaryTotals,
}
