/// An owned, random-access segment: an identifier plus its elements, each
/// element a vector of components. Promoted from the zero-copy
/// `edifact_types::RawSegment` once a segment needs to outlive the input
/// buffer or be inspected more than once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub id: String,
    pub elements: Vec<Vec<String>>,
}

impl Segment {
    pub fn from_raw(raw: &edifact_types::RawSegment<'_>) -> Self {
        Self {
            id: raw.id.to_string(),
            elements: raw
                .elements
                .iter()
                .map(|e| e.iter().map(|c| c.to_string()).collect())
                .collect(),
        }
    }

    pub fn new(id: impl Into<String>, elements: Vec<Vec<String>>) -> Self {
        Self {
            id: id.into(),
            elements,
        }
    }

    pub fn get_element(&self, index: usize) -> &str {
        self.elements
            .get(index)
            .and_then(|e| e.first())
            .map(|s| s.as_str())
            .unwrap_or("")
    }

    pub fn get_component(&self, element_index: usize, component_index: usize) -> &str {
        self.elements
            .get(element_index)
            .and_then(|e| e.get(component_index))
            .map(|s| s.as_str())
            .unwrap_or("")
    }

    pub fn get_components(&self, element_index: usize) -> &[String] {
        self.elements
            .get(element_index)
            .map(|e| e.as_slice())
            .unwrap_or(&[])
    }

    pub fn is(&self, segment_id: &str) -> bool {
        self.id.eq_ignore_ascii_case(segment_id)
    }

    /// Serializes this segment to its wire form (without the terminator),
    /// escaping every component and eliding trailing empty components and
    /// trailing empty elements.
    pub fn to_wire_string(&self, delimiters: &edifact_types::EdifactDelimiters) -> String {
        let elem_sep = delimiters.element as char;
        let comp_sep = delimiters.component as char;

        let mut result = self.id.clone();
        for element in &self.elements {
            result.push(elem_sep);
            let mut components: Vec<&str> = element.iter().map(|s| s.as_str()).collect();
            while components.len() > 1 && components.last().map(|s| s.is_empty()).unwrap_or(false) {
                components.pop();
            }
            for (j, component) in components.iter().enumerate() {
                if j > 0 {
                    result.push(comp_sep);
                }
                result.push_str(&edifact_parser::escape(component, delimiters));
            }
        }
        while result.ends_with(elem_sep) {
            result.pop();
        }
        result
    }
}

/// UNB: interchange header.
#[derive(Debug, Clone, Default)]
pub struct UnbHeader {
    pub syntax_identifier: String,
    pub syntax_version: String,
    pub sender_id: String,
    pub sender_qualifier: Option<String>,
    pub recipient_id: String,
    pub recipient_qualifier: Option<String>,
    pub date: String,
    pub time: String,
    pub control_reference: String,
    pub application_reference: Option<String>,
    pub test_indicator: Option<String>,
}

/// UNZ: interchange trailer.
#[derive(Debug, Clone, Default)]
pub struct UnzTrailer {
    pub control_count: u32,
    pub control_reference: String,
}

/// UNG: functional group header.
#[derive(Debug, Clone, Default)]
pub struct UngHeader {
    pub group_type: String,
    pub sender_id: String,
    pub recipient_id: String,
    pub date: String,
    pub time: String,
    pub reference_number: String,
    pub controlling_agency: Option<String>,
    pub message_version: Option<String>,
}

/// UNE: functional group trailer.
#[derive(Debug, Clone, Default)]
pub struct UneTrailer {
    pub message_count: u32,
    pub reference_number: String,
}

/// UNH: message header.
#[derive(Debug, Clone, Default)]
pub struct UnhHeader {
    pub message_reference_number: String,
    pub message_type: String,
    pub message_version: String,
    pub message_release: String,
    pub controlling_agency: String,
    pub association_assigned_code: Option<String>,
}

/// UNT: message trailer.
#[derive(Debug, Clone, Default)]
pub struct UntTrailer {
    pub segment_count: u32,
    pub message_reference_number: String,
}

/// A single EDIFACT message: UNH, its body segments (excluding UNH/UNT
/// themselves), and UNT.
///
/// `delimiters` carries the interchange's declared delimiter set (from its
/// `UNA`, or the standard defaults when none was present) so message-type
/// parsers can honor a non-`.` decimal mark without needing a separate
/// parameter threaded alongside every `Message`.
#[derive(Debug, Clone)]
pub struct Message {
    pub header: UnhHeader,
    pub body: Vec<Segment>,
    pub trailer: UntTrailer,
    pub delimiters: edifact_types::EdifactDelimiters,
}

impl Message {
    pub fn message_type(&self) -> &str {
        &self.header.message_type
    }

    /// The decimal mark declared by the owning interchange (`.` by default).
    pub fn decimal_mark(&self) -> u8 {
        self.delimiters.decimal
    }
}

/// An optional UNG/UNE-wrapped group of messages.
#[derive(Debug, Clone)]
pub struct FunctionalGroup {
    pub header: UngHeader,
    pub messages: Vec<Message>,
    pub trailer: UneTrailer,
}

/// The body of an interchange: either flat messages, or messages nested
/// inside functional groups. Never both at once.
#[derive(Debug, Clone)]
pub enum Body {
    Messages(Vec<Message>),
    Groups(Vec<FunctionalGroup>),
}

impl Body {
    pub fn message_count(&self) -> usize {
        match self {
            Body::Messages(messages) => messages.len(),
            Body::Groups(groups) => groups.iter().map(|g| g.messages.len()).sum(),
        }
    }

    pub fn group_count(&self) -> usize {
        match self {
            Body::Messages(_) => 0,
            Body::Groups(groups) => groups.len(),
        }
    }

    /// Iterates over every message in the interchange, flattening groups.
    pub fn all_messages(&self) -> Vec<&Message> {
        match self {
            Body::Messages(messages) => messages.iter().collect(),
            Body::Groups(groups) => groups.iter().flat_map(|g| g.messages.iter()).collect(),
        }
    }
}

/// A complete parsed or assembled EDIFACT interchange.
#[derive(Debug, Clone)]
pub struct Interchange {
    pub explicit_una: bool,
    pub delimiters: edifact_types::EdifactDelimiters,
    pub header: UnbHeader,
    pub body: Body,
    pub trailer: UnzTrailer,
}

impl Interchange {
    pub fn all_messages(&self) -> Vec<&Message> {
        self.body.all_messages()
    }
}
