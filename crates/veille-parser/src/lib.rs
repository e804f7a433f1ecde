pub mod dates;
pub mod errors;
pub mod model;
mod normalizer;
pub mod schema;

pub use errors::ParserError;
pub use model::{DataQuality, Mention, MentionSet, SentimentCategory};
pub use normalizer::{normalize_mentions, normalize_mentions_with, NormalizerOptions};

#[cfg(test)]
mod tests;
