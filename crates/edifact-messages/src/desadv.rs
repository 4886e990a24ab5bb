//! DESADV (despatch advice) message-type parser.

use edifact_envelope::Message;

use crate::common::{non_empty, parse_com, parse_cta, parse_dtm, parse_rff, Date, Party, Reference};
use crate::model::{
    parse_imd_description, parse_lin_product_id, parse_pri, parse_qty, Allowance, LineItem, Section,
    Tax,
};

/// Mode-of-transport details lifted from a `TDT` segment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transport {
    pub stage_qualifier: Option<String>,
    pub means_of_transport: Option<String>,
    pub carrier: Option<String>,
}

/// A node in the despatch package hierarchy, opened by `CPS` and filled in
/// by subsequent `PAC`/`PCI`/`GIN` until the next `CPS` or `LIN`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Package {
    pub hierarchical_id: String,
    pub parent_hierarchical_id: Option<String>,
    pub package_type: Option<String>,
    pub package_count: Option<String>,
    pub marks: Option<String>,
    pub identifiers: Vec<String>,
}

/// A parsed DESADV despatch-advice message.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DesadvMessage {
    pub message_reference_number: String,
    pub document_type_code: String,
    pub document_number: String,
    pub function_code: String,
    pub despatch_reference: Option<String>,
    pub document_date: Option<String>,
    pub dates: Vec<Date>,
    pub currency: Option<String>,
    pub free_text: Vec<String>,
    pub references: Vec<Reference>,
    pub parties: Vec<Party>,
    pub transport: Option<Transport>,
    pub equipment: Vec<String>,
    pub packages: Vec<Package>,
    pub allowances: Vec<Allowance>,
    pub taxes: Vec<Tax>,
    pub line_items: Vec<LineItem>,
    pub summary_amounts: Vec<(String, f64)>,
    pub line_item_count: Option<u32>,
    pub total_amount: Option<f64>,
}

pub fn parse_desadv(message: &Message) -> DesadvMessage {
    let decimal = message.decimal_mark();
    let mut doc = DesadvMessage {
        message_reference_number: message.header.message_reference_number.clone(),
        ..Default::default()
    };

    let mut section = Section::Header;
    let mut current_party_idx: Option<usize> = None;
    let mut current_line: Option<LineItem> = None;
    let mut current_package_idx: Option<usize> = None;
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
                if reference.qualifier == "DQ" {
                    doc.despatch_reference = Some(reference.value.clone());
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
            "TDT" => {
                doc.transport = Some(Transport {
                    stage_qualifier: non_empty(segment.get_element(0)),
                    means_of_transport: non_empty(segment.get_component(3, 0)),
                    carrier: non_empty(segment.get_component(4, 0)),
                });
            }
            "EQD" => {
                if let Some(equipment) = non_empty(segment.get_component(1, 0)) {
                    doc.equipment.push(equipment);
                }
            }
            "CPS" => {
                let package = Package {
                    hierarchical_id: segment.get_element(0).to_string(),
                    parent_hierarchical_id: non_empty(segment.get_element(1)),
                    ..Default::default()
                };
                doc.packages.push(package);
                current_package_idx = Some(doc.packages.len() - 1);
            }
            "PAC" => {
                if let Some(idx) = current_package_idx {
                    let package = &mut doc.packages[idx];
                    package.package_count = non_empty(segment.get_element(0));
                    package.package_type = non_empty(segment.get_component(1, 0));
                }
            }
            "PCI" => {
                if let Some(idx) = current_package_idx {
                    doc.packages[idx].marks = non_empty(segment.get_element(0));
                }
            }
            "GIN" => {
                if let Some(idx) = current_package_idx {
                    for component in &segment.elements[1..] {
                        if let Some(value) = component.first().filter(|v| !v.is_empty()) {
                            doc.packages[idx].identifiers.push(value.clone());
                        }
                    }
                }
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
                current_package_idx = None;
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
                    line.prices.push(parse_pri(segment, decimal));
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
                    doc.summary_amounts.push((qualifier, value));
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
                match qualifier {
                    "2" => doc.line_item_count = Some(value as u32),
                    "39" => doc.total_amount = Some(value),
                    _ => {}
                }
            }
            _ => {}
        }
    }

    if let Some(line) = current_line.take() {
        doc.line_items.push(line);
    }

    doc
}
