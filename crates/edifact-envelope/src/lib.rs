//! UNB/UNZ, optional UNG/UNE, and UNH/UNT envelope handling.
//!
//! This crate sits directly on top of `edifact-parser`'s streaming tokenizer:
//! it collects segments into an owned, random-access tree (pass one), then
//! walks that tree to reconstruct the envelope structure with nested
//! UNG/UNE and UNH/UNT balancing (pass two). It also provides the inverse
//! (serialize a tree back to bytes) and a structural validator.

mod diagnostic;
mod error;
mod generate;
mod model;
mod parse;
mod validate;

pub use diagnostic::{Diagnostic, Severity};
pub use error::GenerateError;
pub use generate::{build_interchange, generate, BuildConfig, GenerateOptions};
pub use model::{
    Body, FunctionalGroup, Interchange, Message, Segment, UneTrailer, UngHeader, UnhHeader,
    UntTrailer, UnbHeader, UnzTrailer,
};
pub use parse::{parse, parse_with_options, ParseOptions, ParseResult};
pub use validate::validate;
