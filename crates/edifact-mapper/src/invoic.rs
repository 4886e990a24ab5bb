//! Mapping from a parsed INVOIC invoice to canonical [`Invoice`].

use edifact_messages::InvoicMessage;

use crate::canonical::{Invoice, MonetaryTotals, PartyRole};
use crate::common::{line_to_canonical, party_to_canonical};

/// Maps a parsed INVOIC message to the vendor-neutral [`Invoice`] shape.
///
/// There is no generator counterpart: INVOIC is treated as an inbound-only
/// message type, so this mapping is one-way. Totals are
/// copied from [`edifact_messages::InvoiceTotals`], which already falls
/// back to computing `line_items_total`/`invoice_total` from the line
/// items when the source message omitted the summary `MOA`.
pub fn invoic_to_invoice(record: &InvoicMessage) -> Invoice {
    let mut buyer = None;
    let mut seller = None;
    let mut invoicee = None;

    for party in &record.parties {
        let canonical = party_to_canonical(party);
        match PartyRole::from_nad_qualifier(&party.qualifier) {
            PartyRole::Buyer => buyer = Some(canonical),
            PartyRole::Seller => seller = Some(canonical),
            PartyRole::Invoicee => invoicee = Some(canonical),
            _ => {}
        }
    }

    let payment_terms = record
        .payment_terms
        .iter()
        .filter_map(|term| {
            term.description
                .clone()
                .or_else(|| term.term_type.clone())
        })
        .collect();

    Invoice {
        invoice_number: record.document_number.clone(),
        invoice_date: record.document_date.clone(),
        order_reference: record.order_reference.clone(),
        despatch_reference: record.despatch_reference.clone(),
        buyer,
        seller,
        invoicee,
        payment_terms,
        line_items: record.line_items.iter().map(line_to_canonical).collect(),
        totals: MonetaryTotals {
            currency: record.currency.clone(),
            line_items_total: record.totals.line_items_total,
            total_allowances: record.totals.total_allowances,
            total_charges: record.totals.total_charges,
            total_tax_amount: record.totals.total_tax_amount,
            grand_total: record.totals.invoice_total,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use edifact_messages::{InvoiceTotals, Party, PaymentTerm};

    fn sample_invoic() -> InvoicMessage {
        InvoicMessage {
            document_number: "INV001".to_string(),
            document_date: Some("2023-01-10".to_string()),
            order_reference: Some("ORDER001".to_string()),
            despatch_reference: Some("DESP001".to_string()),
            currency: Some("EUR".to_string()),
            parties: vec![
                Party {
                    qualifier: "BY".to_string(),
                    name: Some("Acme Corp".to_string()),
                    ..Default::default()
                },
                Party {
                    qualifier: "IV".to_string(),
                    name: Some("Acme Billing".to_string()),
                    ..Default::default()
                },
            ],
            payment_terms: vec![PaymentTerm {
                term_type: Some("1".to_string()),
                net_days: Some("30".to_string()),
                description: Some("Net 30 days".to_string()),
            }],
            totals: InvoiceTotals {
                line_items_total: Some(100.0),
                invoice_total: Some(119.0),
                total_tax_amount: Some(19.0),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn order_and_despatch_references_carried_verbatim() {
        let invoice = invoic_to_invoice(&sample_invoic());
        assert_eq!(invoice.order_reference.as_deref(), Some("ORDER001"));
        assert_eq!(invoice.despatch_reference.as_deref(), Some("DESP001"));
    }

    #[test]
    fn invoicee_qualifier_maps_to_invoicee_field() {
        let invoice = invoic_to_invoice(&sample_invoic());
        assert_eq!(invoice.invoicee.unwrap().name.as_deref(), Some("Acme Billing"));
    }

    #[test]
    fn payment_term_description_is_preferred() {
        let invoice = invoic_to_invoice(&sample_invoic());
        assert_eq!(invoice.payment_terms, vec!["Net 30 days".to_string()]);
    }

    #[test]
    fn totals_are_copied_from_already_computed_invoice_totals() {
        let invoice = invoic_to_invoice(&sample_invoic());
        assert_eq!(invoice.totals.line_items_total, Some(100.0));
        assert_eq!(invoice.totals.grand_total, Some(119.0));
        assert_eq!(invoice.totals.total_tax_amount, Some(19.0));
    }
}
