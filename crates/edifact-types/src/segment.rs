use crate::SegmentPosition;

/// A parsed EDIFACT segment that borrows from the input buffer.
///
/// Zero-copy design: all string data references the original input,
/// avoiding allocations during the parsing hot path.
///
/// # Structure
///
/// An EDIFACT segment like `NAD+Z04+9900123000002:500` has:
/// - `id`: `"NAD"`
/// - `elements[0]`: `["Z04"]` (simple element)
/// - `elements[1]`: `["9900123000002", "500"]` (composite element with 2 components)
#[derive(Debug, Clone)]
pub struct RawSegment<'a> {
    /// Segment identifier (e.g., "NAD", "LOC", "DTM").
    pub id: &'a str,
    /// Elements, where each element is a vector of component strings.
    /// `elements[i][j]` = component `j` of element `i`.
    pub elements: Vec<Vec<&'a str>>,
    /// Position metadata for this segment.
    pub position: SegmentPosition,
}

impl<'a> RawSegment<'a> {
    /// Creates a new RawSegment.
    pub fn new(id: &'a str, elements: Vec<Vec<&'a str>>, position: SegmentPosition) -> Self {
        Self {
            id,
            elements,
            position,
        }
    }

    /// Returns the number of elements (excluding the segment ID).
    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    /// Gets the first component of element at `index`, or empty string if missing.
    ///
    /// This is a convenience method for accessing simple (non-composite) elements.
    pub fn get_element(&self, index: usize) -> &str {
        self.elements
            .get(index)
            .and_then(|e| e.first())
            .copied()
            .unwrap_or("")
    }

    /// Gets a specific component within an element, or empty string if missing.
    ///
    /// `element_index` is the 0-based element position.
    /// `component_index` is the 0-based component position within that element.
    pub fn get_component(&self, element_index: usize, component_index: usize) -> &str {
        self.elements
            .get(element_index)
            .and_then(|e| e.get(component_index))
            .copied()
            .unwrap_or("")
    }

    /// Returns all components of element at `index`, or empty slice if missing.
    pub fn get_components(&self, element_index: usize) -> &[&'a str] {
        self.elements
            .get(element_index)
            .map_or(&[], |e| e.as_slice())
    }

    /// Checks if the segment has the given ID (case-insensitive).
    pub fn is(&self, segment_id: &str) -> bool {
        self.id.eq_ignore_ascii_case(segment_id)
    }

    /// Reconstruct the raw segment string (without terminator) using the given delimiters.
    ///
    /// This produces `ID+elem1:comp1:comp2+elem2` format (without the trailing terminator).
    pub fn to_raw_string(&self, delimiters: &crate::EdifactDelimiters) -> String {
        let elem_sep = delimiters.element as char;
        let comp_sep = delimiters.component as char;

        let mut result = self.id.to_string();

        for element in &self.elements {
            result.push(elem_sep);
            // Preserve ALL components including trailing empty ones for roundtrip fidelity.
            // E.g. CAV+SA::::' must keep the trailing colons.
            for (j, component) in element.iter().enumerate() {
                if j > 0 {
                    result.push(comp_sep);
                }
                result.push_str(component);
            }
        }

        // Trim trailing empty elements (trailing element separators)
        while result.ends_with(elem_sep) {
            result.pop();
        }

        result
    }
}

impl<'a> std::fmt::Display for RawSegment<'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id)?;
        for element in &self.elements {
            write!(f, "+")?;
            for (j, component) in element.iter().enumerate() {
                if j > 0 {
                    write!(f, ":")?;
                }
                write!(f, "{component}")?;
            }
        }
        Ok(())
    }
}
