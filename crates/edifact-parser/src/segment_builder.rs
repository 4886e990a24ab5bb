use edifact_types::{EdifactDelimiters, RawSegment, SegmentPosition};

use crate::EdifactTokenizer;

/// Builds `RawSegment` instances from raw segment strings.
///
/// Takes the tokenized segment string (e.g., "NAD+Z04+9900123000002::293")
/// and splits it into the segment ID, elements, and components.
pub struct SegmentBuilder {
    tokenizer: EdifactTokenizer,
}

impl SegmentBuilder {
    /// Creates a new segment builder with the given delimiters.
    pub fn new(delimiters: EdifactDelimiters) -> Self {
        Self {
            tokenizer: EdifactTokenizer::new(delimiters),
        }
    }

    /// Parses a raw segment string into a `RawSegment`.
    ///
    /// The input is a single segment WITHOUT its terminator character.
    /// Example: `"NAD+Z04+9900123000002::293"`
    ///
    /// Returns `None` if the segment string is empty.
    pub fn build<'a>(
        &self,
        segment_str: &'a str,
        position: SegmentPosition,
    ) -> Option<RawSegment<'a>> {
        if segment_str.is_empty() {
            return None;
        }

        let mut elements_iter = self.tokenizer.tokenize_elements(segment_str);

        // First element is the segment ID
        let id = elements_iter.next()?;
        if id.is_empty() {
            return None;
        }

        // Remaining elements are data elements, each split into components
        let mut elements = Vec::new();
        for element_str in elements_iter {
            let components: Vec<&'a str> =
                self.tokenizer.tokenize_components(element_str).collect();
            elements.push(components);
        }

        Some(RawSegment::new(id, elements, position))
    }
}
