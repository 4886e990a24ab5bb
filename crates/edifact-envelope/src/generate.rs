use std::collections::HashMap;

use edifact_types::EdifactDelimiters;

use crate::error::GenerateError;
use crate::model::{
    Body, FunctionalGroup, Interchange, Message, Segment, UneTrailer, UngHeader, UnhHeader,
    UntTrailer, UnbHeader, UnzTrailer,
};

/// Options controlling how an interchange is serialized.
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    /// Override the delimiters carried by the interchange. `None` uses
    /// `interchange.delimiters`.
    pub delimiters: Option<EdifactDelimiters>,
    /// Emit a `\n` after every segment terminator.
    pub line_breaks: bool,
    /// Emit the UNA service string advice segment.
    pub include_una: bool,
    /// Wrap messages in UNG/UNE functional groups when building a fresh
    /// interchange via [`build_interchange`].
    pub use_functional_groups: bool,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            delimiters: None,
            line_breaks: false,
            include_una: true,
            use_functional_groups: false,
        }
    }
}

/// Configuration for assembling a fresh interchange from scratch.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    pub test_indicator: bool,
    pub syntax_identifier: String,
    pub syntax_version: u8,
    /// Base control reference for `UNB`/`UNZ` (and, when grouping, the
    /// prefix each `UNG`/`UNE` index is appended to). `None` falls back to
    /// `"1"`; callers wiring up `edifact-codec` are expected to supply one
    /// from a `ReferenceSource` instead.
    pub control_reference: Option<String>,
    pub version: String,
    pub release: String,
    pub date: String,
    pub time: String,
}

impl BuildConfig {
    fn resolved_control_reference(&self) -> String {
        self.control_reference.clone().unwrap_or_else(|| "1".to_string())
    }
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            test_indicator: false,
            syntax_identifier: "UNOA".to_string(),
            syntax_version: 4,
            control_reference: None,
            version: "D".to_string(),
            release: "96A".to_string(),
            date: String::new(),
            time: String::new(),
        }
    }
}

/// Serializes an interchange to bytes. The serializer recomputes UNZ/UNE/UNT
/// counts and references from the owned tree rather than trusting whatever
/// the tree's own trailers already said, so it is always structurally
/// self-consistent.
pub fn generate(interchange: &Interchange, options: &GenerateOptions) -> Result<Vec<u8>, GenerateError> {
    let delimiters = options.delimiters.unwrap_or(interchange.delimiters);
    validate_delimiters(&delimiters)?;

    let mut out = String::new();
    if options.include_una {
        out.push_str(&delimiters.to_una_string());
        out.push(delimiters.segment as char);
        if options.line_breaks {
            out.push('\n');
        }
    }

    emit(
        &mut out,
        &build_unb_segment(&interchange.header),
        &delimiters,
        options,
    );

    match &interchange.body {
        Body::Messages(messages) => {
            for message in messages {
                write_message(&mut out, message, &delimiters, options);
            }
        }
        Body::Groups(groups) => {
            for group in groups {
                write_group(&mut out, group, &delimiters, options);
            }
        }
    }

    let control_count = match &interchange.body {
        Body::Groups(_) => interchange.body.group_count(),
        Body::Messages(_) => interchange.body.message_count(),
    } as u32;
    emit(
        &mut out,
        &Segment::new(
            "UNZ",
            vec![
                vec![control_count.to_string()],
                vec![interchange.header.control_reference.clone()],
            ],
        ),
        &delimiters,
        options,
    );

    Ok(out.into_bytes())
}

/// Assembles a fresh [`Interchange`] from already-generated messages,
/// grouping by message type (first-seen order) when
/// `options.use_functional_groups` is set.
pub fn build_interchange(
    messages: Vec<Message>,
    sender: &str,
    recipient: &str,
    config: &BuildConfig,
    options: &GenerateOptions,
) -> Result<Interchange, GenerateError> {
    if sender.is_empty() {
        return Err(GenerateError::MissingSender);
    }
    if recipient.is_empty() {
        return Err(GenerateError::MissingRecipient);
    }
    if messages.is_empty() {
        return Err(GenerateError::NoMessages);
    }
    for (index, message) in messages.iter().enumerate() {
        if message.header.message_reference_number.is_empty() {
            return Err(GenerateError::MissingMessageReference {
                index,
                message_type: message.header.message_type.clone(),
            });
        }
    }

    let delimiters = options.delimiters.unwrap_or_default();
    validate_delimiters(&delimiters)?;

    let messages: Vec<Message> = messages
        .into_iter()
        .map(|mut message| {
            message.delimiters = delimiters;
            message
        })
        .collect();

    let header = UnbHeader {
        syntax_identifier: config.syntax_identifier.clone(),
        syntax_version: config.syntax_version.to_string(),
        sender_id: sender.to_string(),
        sender_qualifier: None,
        recipient_id: recipient.to_string(),
        recipient_qualifier: None,
        date: config.date.clone(),
        time: config.time.clone(),
        control_reference: config.resolved_control_reference(),
        application_reference: None,
        test_indicator: config.test_indicator.then(|| "1".to_string()),
    };

    let body = if options.use_functional_groups {
        Body::Groups(group_by_message_type(messages, sender, recipient, config))
    } else {
        Body::Messages(messages)
    };

    let control_count = match &body {
        Body::Groups(_) => body.group_count(),
        Body::Messages(_) => body.message_count(),
    } as u32;

    Ok(Interchange {
        explicit_una: options.include_una,
        delimiters,
        header,
        body,
        trailer: UnzTrailer {
            control_count,
            control_reference: config.resolved_control_reference(),
        },
    })
}

fn group_by_message_type(
    messages: Vec<Message>,
    sender: &str,
    recipient: &str,
    config: &BuildConfig,
) -> Vec<FunctionalGroup> {
    let mut order: Vec<String> = Vec::new();
    let mut buckets: HashMap<String, Vec<Message>> = HashMap::new();
    for message in messages {
        let key = message.header.message_type.clone();
        if !buckets.contains_key(&key) {
            order.push(key.clone());
        }
        buckets.entry(key).or_default().push(message);
    }

    order
        .into_iter()
        .enumerate()
        .map(|(index, message_type)| {
            let group_messages = buckets.remove(&message_type).unwrap_or_default();
            let reference_number = format!("{}{}", config.resolved_control_reference(), index + 1);
            FunctionalGroup {
                header: UngHeader {
                    group_type: message_type,
                    sender_id: sender.to_string(),
                    recipient_id: recipient.to_string(),
                    date: config.date.clone(),
                    time: config.time.clone(),
                    reference_number: reference_number.clone(),
                    controlling_agency: Some("UN".to_string()),
                    message_version: Some(config.version.clone()),
                },
                trailer: UneTrailer {
                    message_count: group_messages.len() as u32,
                    reference_number,
                },
                messages: group_messages,
            }
        })
        .collect()
}

fn validate_delimiters(delimiters: &EdifactDelimiters) -> Result<(), GenerateError> {
    let bytes = [
        delimiters.component,
        delimiters.element,
        delimiters.decimal,
        delimiters.release,
        delimiters.segment,
        delimiters.reserved,
    ];
    for i in 0..bytes.len() {
        for j in (i + 1)..bytes.len() {
            if bytes[i] == bytes[j] {
                return Err(GenerateError::DelimiterCollision { byte: bytes[i] });
            }
        }
    }
    Ok(())
}

fn padded_elements(mut entries: Vec<(usize, Vec<String>)>) -> Vec<Vec<String>> {
    entries.sort_by_key(|(index, _)| *index);
    let max_index = entries.iter().map(|(index, _)| *index).max().unwrap_or(0);
    let mut elements = vec![vec![String::new()]; max_index + 1];
    for (index, value) in entries {
        elements[index] = value;
    }
    elements
}

fn composite(id: &str, qualifier: &Option<String>) -> Vec<String> {
    match qualifier {
        Some(q) => vec![id.to_string(), q.clone()],
        None => vec![id.to_string()],
    }
}

fn build_unb_segment(header: &UnbHeader) -> Segment {
    let mut entries = vec![
        (
            0,
            vec![header.syntax_identifier.clone(), header.syntax_version.clone()],
        ),
        (1, composite(&header.sender_id, &header.sender_qualifier)),
        (2, composite(&header.recipient_id, &header.recipient_qualifier)),
        (3, vec![header.date.clone(), header.time.clone()]),
        (4, vec![header.control_reference.clone()]),
    ];
    if let Some(app_ref) = &header.application_reference {
        entries.push((6, vec![app_ref.clone()]));
    }
    if let Some(test) = &header.test_indicator {
        entries.push((10, vec![test.clone()]));
    }
    Segment::new("UNB", padded_elements(entries))
}

fn build_ung_segment(header: &UngHeader) -> Segment {
    let mut entries = vec![
        (0, vec![header.group_type.clone()]),
        (1, vec![header.sender_id.clone()]),
        (2, vec![header.recipient_id.clone()]),
        (3, vec![header.date.clone(), header.time.clone()]),
        (4, vec![header.reference_number.clone()]),
    ];
    if let Some(agency) = &header.controlling_agency {
        entries.push((5, vec![agency.clone()]));
    }
    if let Some(version) = &header.message_version {
        entries.push((6, vec![version.clone()]));
    }
    Segment::new("UNG", padded_elements(entries))
}

fn build_unh_segment(header: &UnhHeader) -> Segment {
    let mut type_composite = vec![
        header.message_type.clone(),
        header.message_version.clone(),
        header.message_release.clone(),
        header.controlling_agency.clone(),
    ];
    if let Some(assoc) = &header.association_assigned_code {
        type_composite.push(assoc.clone());
    }
    Segment::new(
        "UNH",
        vec![vec![header.message_reference_number.clone()], type_composite],
    )
}

fn write_message(out: &mut String, message: &Message, delimiters: &EdifactDelimiters, options: &GenerateOptions) {
    emit(out, &build_unh_segment(&message.header), delimiters, options);
    for segment in &message.body {
        emit(out, segment, delimiters, options);
    }
    let segment_count = message.body.len() as u32 + 2;
    let unt = Segment::new(
        "UNT",
        vec![
            vec![segment_count.to_string()],
            vec![message.header.message_reference_number.clone()],
        ],
    );
    emit(out, &unt, delimiters, options);
}

fn write_group(out: &mut String, group: &FunctionalGroup, delimiters: &EdifactDelimiters, options: &GenerateOptions) {
    emit(out, &build_ung_segment(&group.header), delimiters, options);
    for message in &group.messages {
        write_message(out, message, delimiters, options);
    }
    let une = Segment::new(
        "UNE",
        vec![
            vec![group.messages.len().to_string()],
            vec![group.header.reference_number.clone()],
        ],
    );
    emit(out, &une, delimiters, options);
}

fn emit(out: &mut String, segment: &Segment, delimiters: &EdifactDelimiters, options: &GenerateOptions) {
    out.push_str(&segment.to_wire_string(delimiters));
    out.push(delimiters.segment as char);
    if options.line_breaks {
        out.push('\n');
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse;

    fn sample_message(reference: &str, doc_number: &str) -> Message {
        Message {
            header: UnhHeader {
                message_reference_number: reference.to_string(),
                message_type: "ORDERS".to_string(),
                message_version: "D".to_string(),
                message_release: "96A".to_string(),
                controlling_agency: "UN".to_string(),
                association_assigned_code: None,
            },
            body: vec![Segment::new(
                "BGM",
                vec![vec!["220".to_string()], vec![doc_number.to_string()], vec!["9".to_string()]],
            )],
            trailer: UntTrailer::default(),
            delimiters: EdifactDelimiters::default(),
        }
    }

    #[test]
    fn build_interchange_rejects_missing_sender() {
        let result = build_interchange(
            vec![sample_message("1", "ORDER001")],
            "",
            "RECEIVER",
            &BuildConfig::default(),
            &GenerateOptions::default(),
        );
        assert!(matches!(result, Err(GenerateError::MissingSender)));
    }

    #[test]
    fn build_interchange_rejects_no_messages() {
        let result = build_interchange(
            vec![],
            "SENDER",
            "RECEIVER",
            &BuildConfig::default(),
            &GenerateOptions::default(),
        );
        assert!(matches!(result, Err(GenerateError::NoMessages)));
    }

    #[test]
    fn generate_round_trips_through_parse() {
        let interchange = build_interchange(
            vec![sample_message("1", "ORDER001")],
            "SENDER",
            "RECEIVER",
            &BuildConfig::default(),
            &GenerateOptions::default(),
        )
        .unwrap();

        let bytes = generate(&interchange, &GenerateOptions::default()).unwrap();
        let result = parse(&bytes);
        assert!(result.success, "errors: {:?}", result.errors);
        let reparsed = result.interchange.unwrap();
        assert_eq!(reparsed.header.sender_id, "SENDER");
        assert_eq!(reparsed.all_messages().len(), 1);
        assert_eq!(reparsed.all_messages()[0].body[0].get_element(1), "ORDER001");
    }

    #[test]
    fn generate_groups_messages_by_type_in_first_seen_order() {
        let mut orders = sample_message("1", "ORDER001");
        orders.header.message_type = "ORDERS".to_string();
        let mut ordrsp = sample_message("2", "RESP001");
        ordrsp.header.message_type = "ORDRSP".to_string();
        let mut second_orders = sample_message("3", "ORDER002");
        second_orders.header.message_type = "ORDERS".to_string();

        let options = GenerateOptions {
            use_functional_groups: true,
            ..GenerateOptions::default()
        };
        let interchange = build_interchange(
            vec![orders, ordrsp, second_orders],
            "SENDER",
            "RECEIVER",
            &BuildConfig::default(),
            &options,
        )
        .unwrap();

        match &interchange.body {
            Body::Groups(groups) => {
                assert_eq!(groups.len(), 2);
                assert_eq!(groups[0].header.group_type, "ORDERS");
                assert_eq!(groups[0].messages.len(), 2);
                assert_eq!(groups[1].header.group_type, "ORDRSP");
            }
            Body::Messages(_) => panic!("expected grouped body"),
        }

        let bytes = generate(&interchange, &options).unwrap();
        let result = parse(&bytes);
        assert!(result.success, "errors: {:?}", result.errors);
        assert_eq!(result.interchange.unwrap().body.group_count(), 2);
    }

    #[test]
    fn escape_round_trip_through_generate_and_parse() {
        let mut message = sample_message("1", "ORDER001");
        message.body.push(Segment::new(
            "FTX",
            vec![
                vec!["AAI".to_string()],
                vec![String::new()],
                vec![String::new()],
                vec!["note with + and ' and : chars".to_string()],
            ],
        ));
        let interchange = build_interchange(
            vec![message],
            "SENDER",
            "RECEIVER",
            &BuildConfig::default(),
            &GenerateOptions::default(),
        )
        .unwrap();
        let bytes = generate(&interchange, &GenerateOptions::default()).unwrap();
        let result = parse(&bytes);
        assert!(result.success, "errors: {:?}", result.errors);
        let reparsed = result.interchange.unwrap();
        let ftx = reparsed.all_messages()[0]
            .body
            .iter()
            .find(|s| s.is("FTX"))
            .unwrap();
        let raw_value = ftx.get_component(3, 0);
        assert_eq!(
            edifact_parser::unescape(raw_value, reparsed.delimiters.release),
            "note with + and ' and : chars"
        );
    }

    #[test]
    fn delimiter_collision_is_rejected() {
        let options = GenerateOptions {
            delimiters: Some(EdifactDelimiters {
                component: b'+',
                ..EdifactDelimiters::default()
            }),
            ..GenerateOptions::default()
        };
        let result = build_interchange(
            vec![sample_message("1", "ORDER001")],
            "SENDER",
            "RECEIVER",
            &BuildConfig::default(),
            &options,
        );
        assert!(matches!(result, Err(GenerateError::DelimiterCollision { .. })));
    }
}
