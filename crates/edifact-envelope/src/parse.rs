use edifact_parser::{EdifactHandler, EdifactStreamParser, ParseError};
use edifact_types::{Control, EdifactDelimiters, RawSegment, SegmentPosition};

use crate::diagnostic::Diagnostic;
use crate::model::{
    Body, FunctionalGroup, Interchange, Message, Segment, UneTrailer, UngHeader, UnhHeader,
    UntTrailer, UnbHeader, UnzTrailer,
};

/// Options controlling how far the parser is willing to go on hostile or
/// oversized input.
#[derive(Debug, Clone, Default)]
pub struct ParseOptions {
    /// Abort with a fatal diagnostic once more than this many segments have
    /// been collected. `None` means unbounded.
    pub max_segments: Option<usize>,
}

/// Outcome of parsing an interchange. Never panics and never returns an
/// `Err` — problems are always reported as accumulated diagnostics so
/// callers can inspect partial structure alongside the issues found.
#[derive(Debug)]
pub struct ParseResult {
    pub success: bool,
    pub interchange: Option<Interchange>,
    pub errors: Vec<Diagnostic>,
    pub warnings: Vec<Diagnostic>,
}

struct Positioned {
    segment: Segment,
    position: SegmentPosition,
}

struct Collector {
    segments: Vec<Positioned>,
    delimiters: EdifactDelimiters,
    explicit_una: bool,
    max_segments: Option<usize>,
    budget_exceeded: bool,
}

impl EdifactHandler for Collector {
    fn on_delimiters(&mut self, delimiters: &EdifactDelimiters, explicit_una: bool) {
        self.delimiters = *delimiters;
        self.explicit_una = explicit_una;
    }

    fn on_segment(&mut self, segment: &RawSegment<'_>) -> Control {
        if let Some(max) = self.max_segments {
            if self.segments.len() >= max {
                self.budget_exceeded = true;
                return Control::Stop;
            }
        }
        self.segments.push(Positioned {
            segment: Segment::from_raw(segment),
            position: segment.position,
        });
        Control::Continue
    }
}

/// Parses a raw EDIFACT document with default options.
pub fn parse(input: &[u8]) -> ParseResult {
    parse_with_options(input, &ParseOptions::default())
}

/// Parses a raw EDIFACT document, honoring the given [`ParseOptions`].
pub fn parse_with_options(input: &[u8], options: &ParseOptions) -> ParseResult {
    if input.is_empty() || input.iter().all(u8::is_ascii_whitespace) {
        return fatal(Diagnostic::error("EMPTY_INPUT", "input is empty"));
    }

    let mut collector = Collector {
        segments: Vec::new(),
        delimiters: EdifactDelimiters::default(),
        explicit_una: false,
        max_segments: options.max_segments,
        budget_exceeded: false,
    };

    if let Err(e) = EdifactStreamParser::parse(input, &mut collector) {
        let code = if matches!(e, ParseError::InvalidUna { .. }) {
            "UNA_TOO_SHORT"
        } else {
            "PARSE_FAILURE"
        };
        return fatal(Diagnostic::error(code, e.to_string()));
    }

    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    if collector.budget_exceeded {
        errors.push(Diagnostic::error(
            "SEGMENT_BUDGET_EXCEEDED",
            "input exceeded the configured segment budget",
        ));
    }

    let segments = collector.segments;
    if segments.is_empty() {
        errors.push(Diagnostic::error("EMPTY_INPUT", "no segments found"));
        return ParseResult {
            success: false,
            interchange: None,
            errors,
            warnings,
        };
    }

    let first = &segments[0];
    if !first.segment.is("UNB") {
        errors.push(
            Diagnostic::error("INVALID_UNB", "first segment is not UNB")
                .with_segment_id(first.segment.id.clone())
                .with_position(first.position),
        );
        return ParseResult {
            success: false,
            interchange: None,
            errors,
            warnings,
        };
    }
    let unb = parse_unb(&first.segment, first.position, &mut errors);

    let Some(unz_idx) = segments.iter().position(|s| s.segment.is("UNZ")) else {
        errors.push(Diagnostic::error("MISSING_UNZ", "no UNZ segment found"));
        return ParseResult {
            success: false,
            interchange: None,
            errors,
            warnings,
        };
    };
    let unz = parse_unz(&segments[unz_idx].segment, segments[unz_idx].position, &mut errors);

    if unz.control_reference != unb.control_reference {
        warnings.push(Diagnostic::warning(
            "CONTROL_REFERENCE_MISMATCH",
            format!(
                "UNZ control reference {:?} does not match UNB control reference {:?}",
                unz.control_reference, unb.control_reference
            ),
        ));
    }

    let middle = &segments[1..unz_idx];
    let starts_with_group = middle
        .first()
        .map(|s| s.segment.is("UNG"))
        .unwrap_or(false);

    let body = if starts_with_group {
        match parse_groups(middle, collector.delimiters, &mut errors, &mut warnings) {
            Some(groups) => Body::Groups(groups),
            None => {
                return ParseResult {
                    success: false,
                    interchange: None,
                    errors,
                    warnings,
                }
            }
        }
    } else {
        match parse_messages(middle, collector.delimiters, &mut errors, &mut warnings) {
            Some(messages) => Body::Messages(messages),
            None => {
                return ParseResult {
                    success: false,
                    interchange: None,
                    errors,
                    warnings,
                }
            }
        }
    };

    let group_count = body.group_count();
    let message_count = body.message_count();
    let control_count = unz.control_count as usize;
    if control_count != group_count && control_count != message_count {
        warnings.push(Diagnostic::warning(
            "UNZ_COUNT_MISMATCH",
            format!(
                "UNZ control count {control_count} matches neither the group count {group_count} nor the message count {message_count}"
            ),
        ));
    }

    let success = errors.is_empty();
    ParseResult {
        success,
        interchange: Some(Interchange {
            explicit_una: collector.explicit_una,
            delimiters: collector.delimiters,
            header: unb,
            body,
            trailer: unz,
        }),
        errors,
        warnings,
    }
}

fn fatal(diagnostic: Diagnostic) -> ParseResult {
    ParseResult {
        success: false,
        interchange: None,
        errors: vec![diagnostic],
        warnings: Vec::new(),
    }
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Scans forward from `start` (an opening segment already at that index)
/// for the matching closing segment, balancing any nested occurrences of
/// the same opening/closing pair. Returns the index of the match.
fn find_matching_end(
    segments: &[Positioned],
    start: usize,
    open_id: &str,
    close_id: &str,
) -> Option<usize> {
    let mut depth = 1i32;
    let mut i = start + 1;
    while i < segments.len() {
        if segments[i].segment.is(open_id) {
            depth += 1;
        } else if segments[i].segment.is(close_id) {
            depth -= 1;
            if depth == 0 {
                return Some(i);
            }
        }
        i += 1;
    }
    None
}

fn parse_groups(
    segments: &[Positioned],
    delimiters: EdifactDelimiters,
    errors: &mut Vec<Diagnostic>,
    warnings: &mut Vec<Diagnostic>,
) -> Option<Vec<FunctionalGroup>> {
    let mut groups = Vec::new();
    let mut i = 0;
    while i < segments.len() {
        if !segments[i].segment.is("UNG") {
            i += 1;
            continue;
        }
        let Some(end) = find_matching_end(segments, i, "UNG", "UNE") else {
            errors.push(
                Diagnostic::error("MISSING_UNE", "no matching UNE for UNG")
                    .with_position(segments[i].position),
            );
            return None;
        };
        let header = parse_ung(&segments[i].segment, segments[i].position, errors);
        let trailer = parse_une(&segments[end].segment, segments[end].position, errors);
        let messages = parse_messages(&segments[i + 1..end], delimiters, errors, warnings)?;

        if trailer.reference_number != header.reference_number {
            warnings.push(Diagnostic::warning(
                "UNE_REFERENCE_MISMATCH",
                format!(
                    "UNE reference {:?} does not match UNG reference {:?}",
                    trailer.reference_number, header.reference_number
                ),
            ));
        }
        if trailer.message_count as usize != messages.len() {
            warnings.push(Diagnostic::warning(
                "MESSAGE_COUNT_MISMATCH",
                format!(
                    "UNE message count {} does not match {} parsed messages",
                    trailer.message_count,
                    messages.len()
                ),
            ));
        }

        groups.push(FunctionalGroup {
            header,
            messages,
            trailer,
        });
        i = end + 1;
    }
    Some(groups)
}

fn parse_messages(
    segments: &[Positioned],
    delimiters: EdifactDelimiters,
    errors: &mut Vec<Diagnostic>,
    warnings: &mut Vec<Diagnostic>,
) -> Option<Vec<Message>> {
    let mut messages = Vec::new();
    let mut i = 0;
    while i < segments.len() {
        if !segments[i].segment.is("UNH") {
            i += 1;
            continue;
        }
        let Some(end) = find_matching_end(segments, i, "UNH", "UNT") else {
            errors.push(
                Diagnostic::error("MISSING_UNT", "no matching UNT for UNH")
                    .with_position(segments[i].position),
            );
            return None;
        };
        let header = parse_unh(&segments[i].segment, segments[i].position, errors);
        let trailer = parse_unt(&segments[end].segment, segments[end].position, errors);
        let body: Vec<Segment> = segments[i + 1..end].iter().map(|s| s.segment.clone()).collect();

        if trailer.message_reference_number != header.message_reference_number {
            warnings.push(Diagnostic::warning(
                "UNT_REFERENCE_MISMATCH",
                format!(
                    "UNT reference {:?} does not match UNH reference {:?}",
                    trailer.message_reference_number, header.message_reference_number
                ),
            ));
        }
        let expected_segment_count = body.len() as u32 + 2;
        if trailer.segment_count != expected_segment_count {
            warnings.push(Diagnostic::warning(
                "SEGMENT_COUNT_MISMATCH",
                format!(
                    "UNT segment count {} does not match the actual count {expected_segment_count}",
                    trailer.segment_count
                ),
            ));
        }

        messages.push(Message {
            header,
            body,
            trailer,
            delimiters,
        });
        i = end + 1;
    }
    Some(messages)
}

fn parse_unb(seg: &Segment, position: SegmentPosition, errors: &mut Vec<Diagnostic>) -> UnbHeader {
    if seg.elements.len() < 4 {
        errors.push(
            Diagnostic::error(
                "UNB_ELEMENT_COUNT",
                format!("UNB has {} elements, expected at least 4", seg.elements.len()),
            )
            .with_segment_id("UNB")
            .with_position(position),
        );
    }
    UnbHeader {
        syntax_identifier: seg.get_component(0, 0).to_string(),
        syntax_version: seg.get_component(0, 1).to_string(),
        sender_id: seg.get_component(1, 0).to_string(),
        sender_qualifier: non_empty(seg.get_component(1, 1)),
        recipient_id: seg.get_component(2, 0).to_string(),
        recipient_qualifier: non_empty(seg.get_component(2, 1)),
        date: seg.get_component(3, 0).to_string(),
        time: seg.get_component(3, 1).to_string(),
        control_reference: seg.get_element(4).to_string(),
        application_reference: non_empty(seg.get_element(6)),
        test_indicator: non_empty(seg.get_element(10)),
    }
}

fn parse_unz(seg: &Segment, position: SegmentPosition, errors: &mut Vec<Diagnostic>) -> UnzTrailer {
    if seg.elements.len() < 2 {
        errors.push(
            Diagnostic::error(
                "UNZ_ELEMENT_COUNT",
                format!("UNZ has {} elements, expected at least 2", seg.elements.len()),
            )
            .with_segment_id("UNZ")
            .with_position(position),
        );
    }
    UnzTrailer {
        control_count: seg.get_element(0).parse().unwrap_or(0),
        control_reference: seg.get_element(1).to_string(),
    }
}

fn parse_ung(seg: &Segment, position: SegmentPosition, errors: &mut Vec<Diagnostic>) -> UngHeader {
    if seg.elements.len() < 5 {
        errors.push(
            Diagnostic::error(
                "UNG_ELEMENT_COUNT",
                format!("UNG has {} elements, expected at least 5", seg.elements.len()),
            )
            .with_segment_id("UNG")
            .with_position(position),
        );
    }
    UngHeader {
        group_type: seg.get_element(0).to_string(),
        sender_id: seg.get_component(1, 0).to_string(),
        recipient_id: seg.get_component(2, 0).to_string(),
        date: seg.get_component(3, 0).to_string(),
        time: seg.get_component(3, 1).to_string(),
        reference_number: seg.get_element(4).to_string(),
        controlling_agency: non_empty(seg.get_element(5)),
        message_version: non_empty(seg.get_element(6)),
    }
}

fn parse_une(seg: &Segment, position: SegmentPosition, errors: &mut Vec<Diagnostic>) -> UneTrailer {
    if seg.elements.len() < 2 {
        errors.push(
            Diagnostic::error(
                "UNE_ELEMENT_COUNT",
                format!("UNE has {} elements, expected at least 2", seg.elements.len()),
            )
            .with_segment_id("UNE")
            .with_position(position),
        );
    }
    UneTrailer {
        message_count: seg.get_element(0).parse().unwrap_or(0),
        reference_number: seg.get_element(1).to_string(),
    }
}

fn parse_unh(seg: &Segment, position: SegmentPosition, errors: &mut Vec<Diagnostic>) -> UnhHeader {
    if seg.elements.len() < 2 {
        errors.push(
            Diagnostic::error(
                "UNH_ELEMENT_COUNT",
                format!("UNH has {} elements, expected at least 2", seg.elements.len()),
            )
            .with_segment_id("UNH")
            .with_position(position),
        );
    }
    UnhHeader {
        message_reference_number: seg.get_element(0).to_string(),
        message_type: seg.get_component(1, 0).to_string(),
        message_version: seg.get_component(1, 1).to_string(),
        message_release: seg.get_component(1, 2).to_string(),
        controlling_agency: seg.get_component(1, 3).to_string(),
        association_assigned_code: non_empty(seg.get_component(1, 4)),
    }
}

fn parse_unt(seg: &Segment, position: SegmentPosition, errors: &mut Vec<Diagnostic>) -> UntTrailer {
    if seg.elements.len() < 2 {
        errors.push(
            Diagnostic::error(
                "UNT_ELEMENT_COUNT",
                format!("UNT has {} elements, expected at least 2", seg.elements.len()),
            )
            .with_segment_id("UNT")
            .with_position(position),
        );
    }
    UntTrailer {
        segment_count: seg.get_element(0).parse().unwrap_or(0),
        message_reference_number: seg.get_element(1).to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_is_reported() {
        let result = parse(b"");
        assert!(!result.success);
        assert_eq!(result.errors[0].code, "EMPTY_INPUT");
    }

    #[test]
    fn minimal_orders_interchange_parses() {
        let input = b"UNA:+.? 'UNB+UNOC:3+SENDER+RECEIVER+230101:1200+REF001'UNH+MSG001+ORDERS:D:96A:UN'BGM+220+ORDER001+9'UNT+3+MSG001'UNZ+1+REF001'";
        let result = parse(input);
        assert!(result.success, "errors: {:?}", result.errors);
        let interchange = result.interchange.unwrap();
        assert_eq!(interchange.header.sender_id, "SENDER");
        let messages = interchange.all_messages();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].message_type(), "ORDERS");
        assert_eq!(messages[0].body.len(), 1);
        assert_eq!(messages[0].body[0].id, "BGM");
    }

    #[test]
    fn too_short_una_is_fatal_with_dedicated_code() {
        let input = b"UNA:+.?";
        let result = parse(input);
        assert!(!result.success);
        assert_eq!(result.errors[0].code, "UNA_TOO_SHORT");
    }

    #[test]
    fn missing_unz_is_fatal() {
        let input = b"UNA:+.? 'UNB+UNOC:3+S+R+230101:1200+REF'UNH+1+ORDERS:D:96A:UN'BGM+220+X'UNT+3+1'";
        let result = parse(input);
        assert!(!result.success);
        assert!(result.errors.iter().any(|e| e.code == "MISSING_UNZ"));
    }

    #[test]
    fn control_reference_mismatch_is_a_warning_not_an_error() {
        let input = b"UNA:+.? 'UNB+UNOC:3+S+R+230101:1200+00000001'UNH+1+ORDERS:D:96A:UN'BGM+220+X'UNT+3+1'UNZ+1+00000002'";
        let result = parse(input);
        assert!(result.success);
        assert!(result
            .warnings
            .iter()
            .any(|w| w.code == "CONTROL_REFERENCE_MISMATCH"));
    }

    #[test]
    fn functional_groups_are_parsed_and_flattened() {
        let input = b"UNA:+.? 'UNB+UNOC:3+S+R+230101:1200+REF'UNG+ORDERS+S+R+230101:1200+G1+UN'UNH+1+ORDERS:D:96A:UN'BGM+220+X'UNT+3+1'UNH+2+ORDERS:D:96A:UN'BGM+220+Y'UNT+3+2'UNE+2+G1'UNZ+1+REF'";
        let result = parse(input);
        assert!(result.success, "errors: {:?}", result.errors);
        let interchange = result.interchange.unwrap();
        assert_eq!(interchange.body.group_count(), 1);
        assert_eq!(interchange.all_messages().len(), 2);
    }

    #[test]
    fn empty_element_out_of_bounds_access_is_tolerant() {
        let input = b"UNA:+.? 'UNB+UNOC:3'UNH+1+ORDERS:D:96A:UN'BGM+220'UNT+3+1'UNZ+1'";
        let result = parse(input);
        assert!(result.success);
    }

    mod fuzz {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn parse_never_panics_on_arbitrary_bytes(input in proptest::collection::vec(any::<u8>(), 0..2048)) {
                let _ = parse(&input);
            }

            #[test]
            fn parse_never_panics_on_edifact_like_ascii(input in "[A-Z0-9:+.?' \n\r]{0,1024}") {
                let _ = parse(input.as_bytes());
            }
        }
    }
}
