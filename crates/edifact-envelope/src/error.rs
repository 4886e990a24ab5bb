/// Errors raised while building or serializing an interchange.
///
/// Unlike parsing (which accumulates diagnostics and keeps going), the
/// generator validates its structural preconditions eagerly and fails
/// fast: it never emits a partially-written interchange.
#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    #[error("sender identification is required to build an interchange")]
    MissingSender,

    #[error("recipient identification is required to build an interchange")]
    MissingRecipient,

    #[error("at least one message is required to build an interchange")]
    NoMessages,

    #[error("delimiter bytes must be pairwise distinct, found a collision on {byte:?}")]
    DelimiterCollision { byte: u8 },

    #[error("message {index} has message type {message_type:?}, which requires a non-empty message reference number")]
    MissingMessageReference { index: usize, message_type: String },
}
