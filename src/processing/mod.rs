use std::fmt;

use serde::Deserialize;

use crate::domain::item::Candidate;

pub mod feed;
pub mod fusion;
pub mod sequence;
pub mod text;
pub mod visual;

#[derive(Deserialize, Debug)]
pub enum ZMQMessage {
    /// Feed page URLs to crawl.
    Feed(Vec<String>),
    /// Path of a JSON fixture with recorded candidates.
    Fixture(String),
    /// Candidates extracted by an external backend.
    Candidates(Vec<Candidate>),
}

impl fmt::Display for ZMQMessage {
    /// Variant and size only; payloads can be large.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ZMQMessage::Feed(pages) => write!(f, "Feed({} pages)", pages.len()),
            ZMQMessage::Fixture(path) => write!(f, "Fixture({path})"),
            ZMQMessage::Candidates(candidates) => {
                write!(f, "Candidates({} items)", candidates.len())
            }
        }
    }
}
