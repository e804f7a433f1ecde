pub mod authors;
pub mod error;
pub mod filters;
pub mod keywords;
pub mod outputs;
pub mod pipelines;
pub mod sentiment;
pub mod temporal;

pub use veille_parser::{Mention, MentionSet, SentimentCategory};
