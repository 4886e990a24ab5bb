use crate::diagnostic::Diagnostic;
use crate::model::{Body, Interchange};

const SUPPORTED_SYNTAX_VERSIONS: &[&str] = &["D:96A", "D:01B", "D:95B", "D:00A"];

/// Validates an already-constructed [`Interchange`] (parsed or built),
/// returning every diagnostic found. Unlike the parser, this never stops
/// early — it runs every check against whatever structure it was given.
pub fn validate(interchange: &Interchange) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();

    if interchange.header.sender_id.is_empty() {
        diagnostics.push(Diagnostic::error(
            "UNB_SENDER_REQUIRED",
            "UNB sender identification must not be empty",
        ));
    }
    if interchange.header.recipient_id.is_empty() {
        diagnostics.push(Diagnostic::error(
            "UNB_RECIPIENT_REQUIRED",
            "UNB recipient identification must not be empty",
        ));
    }

    if interchange.trailer.control_reference != interchange.header.control_reference {
        diagnostics.push(Diagnostic::error(
            "UNZ_CONTROL_REFERENCE_MISMATCH",
            format!(
                "UNZ control reference {:?} does not match UNB control reference {:?}",
                interchange.trailer.control_reference, interchange.header.control_reference
            ),
        ));
    }

    let (group_count, message_count) = (interchange.body.group_count(), interchange.body.message_count());
    let control_count = interchange.trailer.control_count as usize;
    if control_count != group_count && control_count != message_count {
        diagnostics.push(Diagnostic::error(
            "UNZ_COUNT_MISMATCH",
            format!(
                "UNZ control count {control_count} matches neither the group count {group_count} nor the message count {message_count}"
            ),
        ));
    }

    match &interchange.body {
        Body::Groups(groups) => {
            for group in groups {
                if group.trailer.reference_number != group.header.reference_number {
                    diagnostics.push(Diagnostic::error(
                        "UNE_REFERENCE_MISMATCH",
                        format!(
                            "UNE reference {:?} does not match UNG reference {:?}",
                            group.trailer.reference_number, group.header.reference_number
                        ),
                    ));
                }
                for message in &group.messages {
                    validate_message(message, &mut diagnostics);
                }
            }
        }
        Body::Messages(messages) => {
            for message in messages {
                validate_message(message, &mut diagnostics);
            }
        }
    }

    diagnostics
}

fn validate_message(message: &crate::model::Message, diagnostics: &mut Vec<Diagnostic>) {
    if message.trailer.message_reference_number != message.header.message_reference_number {
        diagnostics.push(Diagnostic::error(
            "UNT_REFERENCE_MISMATCH",
            format!(
                "UNT reference {:?} does not match UNH reference {:?}",
                message.trailer.message_reference_number, message.header.message_reference_number
            ),
        ));
    }
    let version_key = format!("{}:{}", message.header.message_version, message.header.message_release);
    if !message.header.message_version.is_empty()
        && !SUPPORTED_SYNTAX_VERSIONS.contains(&version_key.as_str())
    {
        diagnostics.push(Diagnostic::warning(
            "UNSUPPORTED_SYNTAX_VERSION",
            format!("message version/release {version_key:?} is not in the known allow-list"),
        ));
    }
    for segment in &message.body {
        if !is_valid_segment_id(&segment.id) {
            diagnostics.push(
                Diagnostic::error(
                    "INVALID_SEGMENT_ID",
                    format!("segment id {:?} is not three uppercase ASCII letters", segment.id),
                )
                .with_segment_id(segment.id.clone()),
            );
        }
    }
}

fn is_valid_segment_id(id: &str) -> bool {
    id.len() == 3 && id.bytes().all(|b| b.is_ascii_uppercase())
}
