use edifact_envelope::{
    build_interchange, generate, parse_with_options, validate, BuildConfig, Diagnostic,
    GenerateError, GenerateOptions, Interchange, Message, ParseOptions, ParseResult,
};

use crate::clock::{Clock, SystemClock};
use crate::reference::{CounterReferenceSource, ReferenceSource};

/// Single entry point tying the parser, envelope, message-type, and mapper
/// layers together. Holds the injected [`Clock`]/[`ReferenceSource`] used to
/// fill in timestamps and reference numbers callers leave unset when
/// generating a fresh interchange.
pub struct EdifactCodec {
    clock: Box<dyn Clock>,
    references: Box<dyn ReferenceSource>,
}

impl Default for EdifactCodec {
    fn default() -> Self {
        Self {
            clock: Box::new(SystemClock),
            references: Box::new(CounterReferenceSource::starting_at(1)),
        }
    }
}

impl EdifactCodec {
    pub fn new(clock: Box<dyn Clock>, references: Box<dyn ReferenceSource>) -> Self {
        Self { clock, references }
    }

    /// Parses a raw EDIFACT document, honoring `options`. Never fails: problems
    /// surface as diagnostics attached to the returned [`ParseResult`].
    pub fn parse_document(&self, input: &[u8], options: &ParseOptions) -> ParseResult {
        let result = parse_with_options(input, options);
        if !result.success {
            tracing::debug!(errors = result.errors.len(), "parse failed");
        }
        result
    }

    /// Parses a document and, on success, flattens it to the list of messages
    /// it carries (across functional groups, if any). On failure, returns the
    /// diagnostics that explain why.
    pub fn parse_and_extract_messages(&self, input: &[u8]) -> Result<Vec<Message>, Vec<Diagnostic>> {
        let result = self.parse_document(input, &ParseOptions::default());
        match result.interchange {
            Some(interchange) if result.success => {
                Ok(interchange.body.all_messages().into_iter().cloned().collect())
            }
            _ => Err(result.errors),
        }
    }

    /// Assembles and serializes a fresh interchange from already-built
    /// messages. Any `config.date`/`config.time` left empty are filled in
    /// from the codec's [`Clock`]; a missing `config.control_reference` is
    /// filled in from its [`ReferenceSource`].
    pub fn generate_document(
        &self,
        messages: Vec<Message>,
        sender: &str,
        recipient: &str,
        config: &BuildConfig,
        options: &GenerateOptions,
    ) -> Result<Vec<u8>, GenerateError> {
        let resolved_config = self.resolve_build_config(config);
        let interchange = build_interchange(messages, sender, recipient, &resolved_config, options)?;
        tracing::info!(
            control_reference = %interchange.header.control_reference,
            messages = interchange.body.message_count(),
            "generated interchange"
        );
        generate(&interchange, options)
    }

    /// Runs the structural validator over an already-parsed or already-built
    /// interchange.
    pub fn validate_syntax(&self, interchange: &Interchange) -> Vec<Diagnostic> {
        validate(interchange)
    }

    /// Returns a message's EDIFACT message type code (e.g. `"ORDERS"`).
    pub fn get_message_type<'a>(&self, message: &'a Message) -> &'a str {
        message.message_type()
    }

    /// Returns a message's `(version, release)` pair, e.g. `("D", "96A")`.
    pub fn get_document_version<'a>(&self, message: &'a Message) -> (&'a str, &'a str) {
        (&message.header.message_version, &message.header.message_release)
    }

    fn resolve_build_config(&self, config: &BuildConfig) -> BuildConfig {
        let mut resolved = config.clone();
        if resolved.date.is_empty() || resolved.time.is_empty() {
            let (date, time) = self.clock.now();
            if resolved.date.is_empty() {
                resolved.date = date;
            }
            if resolved.time.is_empty() {
                resolved.time = time;
            }
        }
        if resolved.control_reference.is_none() {
            resolved.control_reference = Some(self.references.next_reference());
        }
        resolved
    }
}
