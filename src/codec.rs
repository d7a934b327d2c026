// File: src/codec.rs
use crate::core::types::Word;
use crate::error::{Result, TrainerError};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Version tag written into every envelope.
pub const FORMAT_VERSION: u32 = 1;

/// On-disk layout of the saved words, borrowed for encoding.
#[derive(Serialize)]
struct SavedWordsRef<'a> {
    version: u32,
    words: &'a [Word],
}

/// Owned counterpart of [`SavedWordsRef`] produced by decoding.
#[derive(Deserialize)]
struct SavedWords {
    version: u32,
    words: Vec<Word>,
}

/// Converts a word collection to and from the persisted byte form.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Codec {
    /// Compact JSON. Readable without any schema.
    #[default]
    Json,
    /// bincode over the same envelope.
    Binary,
}

impl Codec {
    pub fn encode(&self, words: &[Word]) -> Result<Vec<u8>> {
        let envelope = SavedWordsRef { version: FORMAT_VERSION, words };
        let bytes = match self {
            Codec::Json => serde_json::to_vec(&envelope)?,
            Codec::Binary => bincode::serialize(&envelope)?,
        };
        Ok(bytes)
    }

    /// Decodes and validates a collection. Any failure leaves the caller's state untouched.
    pub fn decode(&self, bytes: &[u8]) -> Result<Vec<Word>> {
        let envelope: SavedWords = match self {
            Codec::Json => serde_json::from_slice(bytes)?,
            Codec::Binary => bincode::deserialize(bytes)?,
        };
        if envelope.version != FORMAT_VERSION {
            return Err(TrainerError::UnsupportedFormatVersion(envelope.version));
        }

        let mut terms = HashSet::with_capacity(envelope.words.len());
        // Per-word invariants are checked while deserializing `Word`.
        for word in &envelope.words {
            if !terms.insert(word.term()) {
                return Err(TrainerError::InvalidData(format!(
                    "term '{}' appears more than once",
                    word.term()
                )));
            }
        }
        Ok(envelope.words)
    }
}
