pub mod content;
pub mod learning;
pub mod progress;

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Shared key half for everything in the progress store: learning history,
/// daily assignments and the wrong-answer ledger all address content as a
/// (kind, id) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Word,
    Grammar,
}

impl ContentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Word => "word",
            Self::Grammar => "grammar",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "word" => Some(Self::Word),
            "grammar" => Some(Self::Grammar),
            _ => None,
        }
    }
}

pub(crate) fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
