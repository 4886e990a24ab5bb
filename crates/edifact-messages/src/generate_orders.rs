//! Inverse of [`crate::parse_orders`]: builds an ORDERS [`Message`] body
//! from an [`OrdersMessage`] record in the fixed segment order the
//! reference profile expects.

use edifact_envelope::{Message, Segment, UnhHeader, UntTrailer};

use crate::orders::OrdersMessage;

fn seg(id: &str, elements: Vec<Vec<String>>) -> Segment {
    Segment::new(id, elements)
}

fn one(value: impl Into<String>) -> Vec<String> {
    vec![value.into()]
}

/// Joins a composite, stripping trailing empty components.
fn composite(parts: Vec<String>) -> Vec<String> {
    let mut parts = parts;
    while parts.last().is_some_and(|p| p.is_empty()) {
        parts.pop();
    }
    parts
}

pub fn generate_orders(record: &OrdersMessage, version: &str, release: &str) -> Message {
    let mut body = Vec::new();

    body.push(seg(
        "BGM",
        vec![
            one(record.document_type_code.clone()),
            one(record.document_number.clone()),
            one(record.function_code.clone()),
        ],
    ));

    if let Some(document_date) = &record.document_date {
        body.push(seg(
            "DTM",
            vec![composite(vec![
                "137".to_string(),
                document_date.clone(),
                "102".to_string(),
            ])],
        ));
    }
    for date in &record.dates {
        body.push(seg(
            "DTM",
            vec![composite(vec![
                date.qualifier.clone(),
                date.value.clone(),
                date.format_qualifier.clone().unwrap_or_default(),
            ])],
        ));
    }

    for text in &record.free_text {
        body.push(seg("FTX", vec![one("AAI"), vec![], vec![], one(text.clone())]));
    }

    for reference in &record.references {
        body.push(seg(
            "RFF",
            vec![composite(vec![reference.qualifier.clone(), reference.value.clone()])],
        ));
    }

    for party in &record.parties {
        let mut id_composite = vec![party.id.clone().unwrap_or_default(), String::new()];
        if let Some(agency) = &party.id_agency {
            id_composite.push(agency.clone());
        }
        body.push(seg(
            "NAD",
            vec![
                one(party.qualifier.clone()),
                composite(id_composite),
                vec![],
                one(party.name.clone().unwrap_or_default()),
                composite(vec![
                    party.street1.clone().unwrap_or_default(),
                    party.street2.clone().unwrap_or_default(),
                ]),
                one(party.city.clone().unwrap_or_default()),
                vec![],
                one(party.postal_code.clone().unwrap_or_default()),
                one(party.country.clone().unwrap_or_default()),
            ],
        ));
        for reference in &party.references {
            body.push(seg(
                "RFF",
                vec![composite(vec![reference.qualifier.clone(), reference.value.clone()])],
            ));
        }
        for contact in &party.contacts {
            body.push(seg(
                "CTA",
                vec![
                    one(contact.function.clone().unwrap_or_default()),
                    composite(vec![String::new(), contact.name.clone().unwrap_or_default()]),
                ],
            ));
            for (qualifier, value) in &contact.communications {
                body.push(seg(
                    "COM",
                    vec![composite(vec![value.clone(), qualifier.clone()])],
                ));
            }
        }
    }

    if let Some(currency) = &record.currency {
        body.push(seg(
            "CUX",
            vec![composite(vec!["2".to_string(), currency.clone(), "4".to_string()])],
        ));
    }

    for payment_term in &record.payment_terms {
        body.push(seg(
            "PAT",
            vec![
                one(payment_term.term_type.clone().unwrap_or_default()),
                one(payment_term.description.clone().unwrap_or_default()),
                vec![],
                vec![],
                composite(vec![String::new(), payment_term.net_days.clone().unwrap_or_default()]),
            ],
        ));
    }

    if let Some(tod) = &record.delivery_terms {
        body.push(seg(
            "TOD",
            vec![
                one(tod.function_code.clone().unwrap_or_default()),
                one(tod.transport_charges_payment.clone().unwrap_or_default()),
                composite(vec![tod.terms_code.clone().unwrap_or_default()]),
                composite(vec![tod.location.clone().unwrap_or_default()]),
            ],
        ));
    }

    if let Some(transport) = &record.transport {
        body.push(seg(
            "TDT",
            vec![
                one(transport.stage_qualifier.clone().unwrap_or_default()),
                vec![],
                vec![],
                composite(vec![transport.means_of_transport.clone().unwrap_or_default()]),
                composite(vec![transport.carrier.clone().unwrap_or_default()]),
            ],
        ));
    }

    for allowance in &record.allowances {
        push_allowance(&mut body, allowance);
    }
    for tax in &record.taxes {
        push_tax(&mut body, tax);
    }

    for line in &record.line_items {
        let mut first_product = vec![String::new(), String::new(), String::new()];
        if let Some(product) = line.product_ids.first() {
            first_product = vec![
                product.id.clone(),
                product.id_type.clone().unwrap_or_else(|| "SRV".to_string()),
                product.agency.clone().unwrap_or_else(|| "9".to_string()),
            ];
        }
        body.push(seg(
            "LIN",
            vec![
                one(line.line_number.clone()),
                one(line.action_code.clone().unwrap_or_default()),
                composite(first_product),
            ],
        ));
        for product in line.product_ids.iter().skip(1) {
            body.push(seg(
                "PIA",
                vec![
                    one("5"),
                    composite(vec![
                        product.id.clone(),
                        product.id_type.clone().unwrap_or_default(),
                        product.agency.clone().unwrap_or_default(),
                    ]),
                ],
            ));
        }
        if let Some(description) = &line.description {
            body.push(seg(
                "IMD",
                vec![
                    one("F"),
                    vec![],
                    composite(vec![String::new(), String::new(), String::new(), description.clone()]),
                ],
            ));
        }
        for quantity in &line.quantities {
            body.push(seg(
                "QTY",
                vec![composite(vec![
                    quantity.qualifier.clone(),
                    quantity.value.to_string(),
                    quantity.unit.clone().unwrap_or_else(|| "PCE".to_string()),
                ])],
            ));
        }
        for date in &line.dates {
            body.push(seg(
                "DTM",
                vec![composite(vec![
                    date.qualifier.clone(),
                    date.value.clone(),
                    date.format_qualifier.clone().unwrap_or_default(),
                ])],
            ));
        }
        for price in &line.prices {
            body.push(seg(
                "PRI",
                vec![composite(vec![
                    price.qualifier.clone().unwrap_or_default(),
                    price.value.to_string(),
                ])],
            ));
        }
        for reference in &line.references {
            body.push(seg(
                "RFF",
                vec![composite(vec![reference.qualifier.clone(), reference.value.clone()])],
            ));
        }
        for (qualifier, value) in &line.amounts {
            body.push(seg(
                "MOA",
                vec![composite(vec![qualifier.clone(), value.to_string()])],
            ));
        }
        for tax in &line.taxes {
            push_tax(&mut body, tax);
        }
        for allowance in &line.allowances {
            push_allowance(&mut body, allowance);
        }
    }

    body.push(seg("UNS", vec![one("S")]));

    for (qualifier, value) in &record.summary_amounts {
        body.push(seg(
            "MOA",
            vec![composite(vec![qualifier.clone(), value.to_string()])],
        ));
    }

    if let Some(line_item_count) = record.line_item_count {
        body.push(seg(
            "CNT",
            vec![composite(vec!["2".to_string(), line_item_count.to_string()])],
        ));
    }
    if let Some(total_amount) = record.total_amount {
        body.push(seg(
            "CNT",
            vec![composite(vec!["39".to_string(), total_amount.to_string()])],
        ));
    }

    let segment_count = body.len() as u32 + 2;
    Message {
        header: UnhHeader {
            message_reference_number: record.message_reference_number.clone(),
            message_type: "ORDERS".to_string(),
            message_version: version.to_string(),
            message_release: release.to_string(),
            controlling_agency: "UN".to_string(),
            association_assigned_code: None,
        },
        body,
        trailer: UntTrailer {
            segment_count,
            message_reference_number: record.message_reference_number.clone(),
        },
        delimiters: edifact_types::EdifactDelimiters::default(),
    }
}

fn push_allowance(body: &mut Vec<Segment>, allowance: &crate::model::Allowance) {
    body.push(seg("ALC", vec![one(allowance.indicator.clone())]));
    if let Some(percentage) = allowance.percentage {
        body.push(seg(
            "PCD",
            vec![composite(vec!["3".to_string(), percentage.to_string()])],
        ));
    }
    if let Some(amount) = allowance.amount {
        body.push(seg(
            "MOA",
            vec![composite(vec!["204".to_string(), amount.to_string()])],
        ));
    }
    if let Some(basis) = allowance.basis {
        body.push(seg(
            "MOA",
            vec![composite(vec!["25".to_string(), basis.to_string()])],
        ));
    }
}

fn push_tax(body: &mut Vec<Segment>, tax: &crate::model::Tax) {
    body.push(seg(
        "TAX",
        vec![
            one(tax.qualifier.clone().unwrap_or_default()),
            composite(vec![tax.category.clone().unwrap_or_default()]),
            vec![],
            vec![],
            one(tax
                .rate
                .map(|r| r.to_string())
                .unwrap_or_default()),
        ],
    ));
    if let Some(amount) = tax.amount {
        body.push(seg(
            "MOA",
            vec![composite(vec!["124".to_string(), amount.to_string()])],
        ));
    }
    if let Some(basis) = tax.basis {
        body.push(seg(
            "MOA",
            vec![composite(vec!["125".to_string(), basis.to_string()])],
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orders::parse_orders;
    use edifact_envelope::parse;

    #[test]
    fn round_trips_a_minimal_order_through_generation_and_parsing() {
        let mut record = OrdersMessage {
            message_reference_number: "1".to_string(),
            document_type_code: "220".to_string(),
            document_number: "ORDER001".to_string(),
            function_code: "9".to_string(),
            document_date: Some("2023-01-01".to_string()),
            ..Default::default()
        };
        record.line_items.push(crate::LineItem {
            line_number: "1".to_string(),
            ..Default::default()
        });
        record.line_item_count = Some(1);

        let message = generate_orders(&record, "D", "96A");
        assert_eq!(message.header.message_type, "ORDERS");
        assert_eq!(message.trailer.segment_count, message.body.len() as u32 + 2);

        let reparsed = parse_orders(&message);
        assert_eq!(reparsed.document_number, "ORDER001");
        assert_eq!(reparsed.line_items.len(), 1);
        assert_eq!(reparsed.line_item_count, Some(1));
    }

    #[test]
    fn generates_uns_before_summary_segments() {
        let record = OrdersMessage {
            message_reference_number: "1".to_string(),
            document_type_code: "220".to_string(),
            document_number: "ORDER001".to_string(),
            function_code: "9".to_string(),
            total_amount: Some(99.5),
            ..Default::default()
        };
        let message = generate_orders(&record, "D", "96A");
        let uns_index = message.body.iter().position(|s| s.id == "UNS").unwrap();
        let cnt_index = message.body.iter().position(|s| s.id == "CNT").unwrap();
        assert!(uns_index < cnt_index);
    }

    #[test]
    fn generated_message_parses_back_through_the_envelope() {
        let record = OrdersMessage {
            message_reference_number: "1".to_string(),
            document_type_code: "220".to_string(),
            document_number: "ORDER002".to_string(),
            function_code: "9".to_string(),
            ..Default::default()
        };
        let message = generate_orders(&record, "D", "96A");
        let interchange = edifact_envelope::build_interchange(
            vec![message],
            "SENDER",
            "RECEIVER",
            &edifact_envelope::BuildConfig::default(),
            &edifact_envelope::GenerateOptions::default(),
        )
        .expect("build interchange");
        let generated = edifact_envelope::generate(&interchange, &edifact_envelope::GenerateOptions::default())
            .expect("generate bytes");
        let result = parse(&generated);
        assert!(result.success, "errors: {:?}", result.errors);
    }
}
