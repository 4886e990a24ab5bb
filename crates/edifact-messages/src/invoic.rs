//! INVOIC (invoice) message-type parser.

use edifact_envelope::Message;

use crate::common::{non_empty, parse_com, parse_cta, parse_dtm, parse_rff, Date, Party, Reference};
use crate::model::{
    parse_imd_description, parse_lin_product_id, parse_pri, parse_qty, Allowance, LineItem, Section,
    Tax,
};

/// A payment term lifted from a `PAT` segment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaymentTerm {
    pub term_type: Option<String>,
    pub net_days: Option<String>,
    pub description: Option<String>,
}

/// Financial institution details, merged from one or more `FII` segments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaymentInstructions {
    pub account_holder_qualifier: Option<String>,
    pub account_number: Option<String>,
    pub institution_name: Option<String>,
}

/// Aggregated monetary totals for the invoice, each either taken directly
/// from a summary `MOA` or, if absent, computed from the line items.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InvoiceTotals {
    pub line_items_total: Option<f64>,
    pub invoice_total: Option<f64>,
    pub taxable_amount: Option<f64>,
    pub total_allowances: Option<f64>,
    pub total_charges: Option<f64>,
    pub total_tax_amount: Option<f64>,
    pub amount_due: Option<f64>,
    pub prepaid_amount: Option<f64>,
}

/// A parsed INVOIC invoice message.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InvoicMessage {
    pub message_reference_number: String,
    pub document_type_code: String,
    pub document_number: String,
    pub function_code: String,
    pub order_reference: Option<String>,
    pub despatch_reference: Option<String>,
    pub document_date: Option<String>,
    pub dates: Vec<Date>,
    pub currency: Option<String>,
    pub free_text: Vec<String>,
    pub references: Vec<Reference>,
    pub parties: Vec<Party>,
    pub payment_terms: Vec<PaymentTerm>,
    pub payment_instructions: Option<PaymentInstructions>,
    pub allowances: Vec<Allowance>,
    pub taxes: Vec<Tax>,
    pub line_items: Vec<LineItem>,
    pub totals: InvoiceTotals,
    pub line_item_count: Option<u32>,
}

pub fn parse_invoic(message: &Message) -> InvoicMessage {
    let decimal = message.decimal_mark();
    let mut doc = InvoicMessage {
        message_reference_number: message.header.message_reference_number.clone(),
        ..Default::default()
    };

    let mut section = Section::Header;
    let mut current_party_idx: Option<usize> = None;
    let mut current_line: Option<LineItem> = None;
    let mut in_com_run = false;

    for segment in &message.body {
        if !segment.is("COM") {
            in_com_run = false;
        }
        match segment.id.as_str() {
            "BGM" => {
                doc.document_type_code = segment.get_element(0).to_string();
                doc.document_number = segment.get_element(1).to_string();
                doc.function_code = segment.get_element(2).to_string();
            }
            "DTM" => {
                let date = parse_dtm(segment);
                if date.qualifier == "137" {
                    doc.document_date = Some(date.value.clone());
                }
                match &mut current_line {
                    Some(line) if section == Section::Line => line.dates.push(date),
                    _ => doc.dates.push(date),
                }
            }
            "FTX" => doc.free_text.push(segment.get_component(3, 0).to_string()),
            "RFF" => {
                let reference = parse_rff(segment);
                match reference.qualifier.as_str() {
                    "ON" => doc.order_reference = Some(reference.value.clone()),
                    "DQ" => doc.despatch_reference = Some(reference.value.clone()),
                    _ => {}
                }
                match &mut current_line {
                    Some(line) if section == Section::Line => line.references.push(reference),
                    _ => match current_party_idx {
                        Some(idx) if section == Section::Header => {
                            doc.parties[idx].references.push(reference)
                        }
                        _ => doc.references.push(reference),
                    },
                }
            }
            "NAD" => {
                doc.parties.push(Party::from_nad(segment));
                current_party_idx = Some(doc.parties.len() - 1);
            }
            "CTA" => {
                if let Some(idx) = current_party_idx {
                    doc.parties[idx].contacts.push(parse_cta(segment));
                }
                in_com_run = true;
            }
            "COM" if in_com_run => {
                if current_party_idx.is_some() {
                    if let Some(party) = doc.parties.last_mut() {
                        if let Some(contact) = party.contacts.last_mut() {
                            contact.communications.push(parse_com(segment));
                        }
                    }
                }
            }
            "CUX" => doc.currency = non_empty(segment.get_component(0, 1)),
            "PAT" => {
                doc.payment_terms.push(PaymentTerm {
                    term_type: non_empty(segment.get_component(0, 0)),
                    net_days: non_empty(segment.get_component(4, 1)),
                    description: non_empty(segment.get_element(1)),
                });
            }
            "FII" => {
                let instructions = doc.payment_instructions.get_or_insert_with(Default::default);
                instructions.account_holder_qualifier = non_empty(segment.get_element(0));
                instructions.account_number = non_empty(segment.get_component(1, 0));
                instructions.institution_name = non_empty(segment.get_component(2, 1));
            }
            "ALC" => {
                let allowance = Allowance {
                    indicator: segment.get_element(0).to_string(),
                    ..Default::default()
                };
                match &mut current_line {
                    Some(line) => line.allowances.push(allowance),
                    None => doc.allowances.push(allowance),
                }
            }
            "PCD" => {
                let percentage = non_empty(segment.get_component(0, 1))
                    .map(|v| crate::common::parse_decimal(&v, decimal));
                match &mut current_line {
                    Some(line) => {
                        if let Some(alc) = line.allowances.last_mut() {
                            alc.percentage = percentage;
                        }
                    }
                    None => {
                        if let Some(alc) = doc.allowances.last_mut() {
                            alc.percentage = percentage;
                        }
                    }
                }
            }
            "TAX" => {
                let tax = Tax {
                    qualifier: non_empty(segment.get_element(0)),
                    category: non_empty(segment.get_component(1, 0)),
                    rate: non_empty(segment.get_element(4)).map(|v| crate::common::parse_decimal(&v, decimal)),
                    ..Default::default()
                };
                match &mut current_line {
                    Some(line) => line.taxes.push(tax),
                    None => doc.taxes.push(tax),
                }
            }
            "LIN" => {
                if let Some(line) = current_line.take() {
                    doc.line_items.push(line);
                }
                section = Section::Line;
                current_party_idx = None;
                let mut line = LineItem::new(segment.get_element(0));
                if let Some(product_id) = parse_lin_product_id(segment, 2) {
                    line.product_ids.push(product_id);
                }
                current_line = Some(line);
            }
            "PIA" => {
                if let Some(line) = &mut current_line {
                    if let Some(product_id) = parse_lin_product_id(segment, 1) {
                        line.product_ids.push(product_id);
                    }
                }
            }
            "IMD" => {
                if let Some(line) = &mut current_line {
                    line.description = parse_imd_description(segment);
                }
            }
            "QTY" => {
                if let Some(line) = &mut current_line {
                    let quantity = parse_qty(segment, decimal);
                    if line.quantity.is_none() {
                        line.quantity = Some(quantity.clone());
                    }
                    line.quantities.push(quantity);
                }
            }
            "PRI" => {
                if let Some(line) = &mut current_line {
                    let price = parse_pri(segment, decimal);
                    if line.unit_price.is_none() {
                        line.unit_price = Some(price.value);
                    }
                    line.prices.push(price);
                }
            }
            "MOA" if current_line.is_none() => {
                let qualifier = segment.get_component(0, 0).to_string();
                let value = crate::common::parse_decimal(segment.get_component(0, 1), decimal);
                if let Some(alc) = doc.allowances.last_mut() {
                    match qualifier.as_str() {
                        "23" | "204" => alc.amount = Some(value),
                        "25" => alc.basis = Some(value),
                        _ => {}
                    }
                } else if let Some(tax) = doc.taxes.last_mut() {
                    match qualifier.as_str() {
                        "124" | "176" => tax.amount = Some(value),
                        "125" => tax.basis = Some(value),
                        _ => {}
                    }
                } else if section == Section::Summary {
                    apply_summary_amount(&mut doc.totals, &qualifier, value);
                }
            }
            "MOA" => {
                if let Some(line) = &mut current_line {
                    let qualifier = segment.get_component(0, 0).to_string();
                    let value = crate::common::parse_decimal(segment.get_component(0, 1), decimal);
                    if let Some(alc) = line.allowances.last_mut() {
                        match qualifier.as_str() {
                            "23" | "204" => alc.amount = Some(value),
                            "25" => alc.basis = Some(value),
                            _ => {}
                        }
                    } else if let Some(tax) = line.taxes.last_mut() {
                        match qualifier.as_str() {
                            "124" | "176" => tax.amount = Some(value),
                            "125" => tax.basis = Some(value),
                            _ => {}
                        }
                    } else {
                        if qualifier == "203" {
                            line.line_amount = Some(value);
                        }
                        line.amounts.push((qualifier, value));
                    }
                }
            }
            "UNS" => {
                if let Some(line) = current_line.take() {
                    doc.line_items.push(line);
                }
                section = Section::Summary;
            }
            "CNT" => {
                let qualifier = segment.get_component(0, 0);
                let value = crate::common::parse_decimal(segment.get_component(0, 1), decimal);
                if qualifier == "2" {
                    doc.line_item_count = Some(value as u32);
                }
            }
            _ => {}
        }
    }

    if let Some(line) = current_line.take() {
        doc.line_items.push(line);
    }

    if doc.totals.line_items_total.is_none() {
        let sum: f64 = doc.line_items.iter().filter_map(|l| l.line_amount).sum();
        doc.totals.line_items_total = Some(sum);
    }
    if doc.totals.invoice_total.is_none() {
        let line_items_total = doc.totals.line_items_total.unwrap_or(0.0);
        let allowances = doc.totals.total_allowances.unwrap_or(0.0);
        let charges = doc.totals.total_charges.unwrap_or(0.0);
        let tax = doc.totals.total_tax_amount.unwrap_or(0.0);
        doc.totals.invoice_total = Some(line_items_total - allowances + charges + tax);
    }

    doc
}

fn apply_summary_amount(totals: &mut InvoiceTotals, qualifier: &str, value: f64) {
    match qualifier {
        "77" | "86" => totals.invoice_total = Some(value),
        "79" => totals.line_items_total = Some(value),
        "125" => totals.taxable_amount = Some(value),
        "131" => totals.total_allowances = Some(value),
        "176" => totals.total_tax_amount = Some(value),
        "259" => totals.total_charges = Some(value),
        "9" => totals.amount_due = Some(value),
        "113" => totals.prepaid_amount = Some(value),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use edifact_envelope::parse;

    fn parse_message(body: &str) -> Message {
        let input = format!(
            "UNA:+.? 'UNB+UNOA:4+SENDER:ZZ+RECEIVER:ZZ+230101:1200+00000001'UNH+1+INVOIC:D:96A:UN'{body}UNT+1+1'UNZ+1+00000001'"
        );
        let result = parse(input.as_bytes());
        assert!(result.success, "errors: {:?}", result.errors);
        result.interchange.unwrap().all_messages()[0].clone()
    }

    #[test]
    fn line_items_total_is_computed_when_not_supplied() {
        let message = parse_message(
            "BGM+380+INV001+9'LIN+1++1234567890123:EN'QTY+47:10:PCE'PRI+AAA:5.00'MOA+203:50.00'UNS+S'",
        );
        let invoic = parse_invoic(&message);
        assert_eq!(invoic.totals.line_items_total, Some(50.0));
    }

    #[test]
    fn invoice_total_is_computed_from_line_items_and_adjustments() {
        let message = parse_message(
            "BGM+380+INV001+9'LIN+1++1234567890123:EN'QTY+47:10:PCE'PRI+AAA:5.00'MOA+203:50.00'UNS+S'MOA+131:5.00'MOA+176:2.00'",
        );
        let invoic = parse_invoic(&message);
        assert_eq!(invoic.totals.line_items_total, Some(50.0));
        assert_eq!(invoic.totals.total_allowances, Some(5.0));
        assert_eq!(invoic.totals.total_tax_amount, Some(2.0));
        assert_eq!(invoic.totals.invoice_total, Some(47.0));
    }

    #[test]
    fn supplied_summary_moa_is_not_recomputed() {
        let message = parse_message(
            "BGM+380+INV001+9'LIN+1++1234567890123:EN'MOA+203:50.00'UNS+S'MOA+79:999.00'MOA+77:1200.00'",
        );
        let invoic = parse_invoic(&message);
        assert_eq!(invoic.totals.line_items_total, Some(999.0));
        assert_eq!(invoic.totals.invoice_total, Some(1200.0));
    }

    #[test]
    fn pri_collapses_to_unit_price() {
        let message = parse_message(
            "BGM+380+INV001+9'LIN+1++1234567890123:EN'PRI+AAA:12.50'PRI+AAB:10.00'",
        );
        let invoic = parse_invoic(&message);
        assert_eq!(invoic.line_items[0].unit_price, Some(12.5));
        assert_eq!(invoic.line_items[0].prices.len(), 2);
    }

    #[test]
    fn pat_and_fii_are_parsed() {
        let message = parse_message("BGM+380+INV001+9'PAT+1'FII+OR+123456:::BANKNAME'");
        let invoic = parse_invoic(&message);
        assert_eq!(invoic.payment_terms[0].term_type.as_deref(), Some("1"));
        let instructions = invoic.payment_instructions.expect("payment instructions set");
        assert_eq!(instructions.account_number.as_deref(), Some("123456"));
    }
}
