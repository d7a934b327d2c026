// src/core/types.rs
use crate::error::{Result, TrainerError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A unique identifier for a vocabulary word. Never reused.
pub type WordId = Uuid;

/// One vocabulary term with every definition the user has accepted for it.
///
/// `id`, `term` and `date_added` are fixed at creation; only the definition
/// list grows. A word always carries at least one definition.
///
/// Deserialization goes through the same invariant checks, so no `Word` can
/// exist with an empty term, no definitions, or a repeated definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawWord")]
pub struct Word {
    id: WordId,
    term: String,
    /// Insertion order is kept for display; grading ignores it.
    definitions: Vec<String>,
    date_added: DateTime<Utc>,
}

/// Unchecked wire form of [`Word`].
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawWord {
    id: WordId,
    term: String,
    definitions: Vec<String>,
    date_added: DateTime<Utc>,
}

impl TryFrom<RawWord> for Word {
    type Error = TrainerError;

    fn try_from(raw: RawWord) -> Result<Self> {
        let word = Word {
            id: raw.id,
            term: raw.term,
            definitions: raw.definitions,
            date_added: raw.date_added,
        };
        word.validate()?;
        Ok(word)
    }
}

impl Word {
    /// Creates a word with a fresh id, the current timestamp and a single definition.
    pub fn new(term: impl Into<String>, definition: impl Into<String>) -> Result<Self> {
        let term = term.into();
        let definition = definition.into();
        if term.is_empty() {
            return Err(TrainerError::EmptyTerm);
        }
        if definition.is_empty() {
            return Err(TrainerError::EmptyDefinition);
        }
        Ok(Self {
            id: Uuid::new_v4(),
            term,
            definitions: vec![definition],
            date_added: Utc::now(),
        })
    }

    pub fn id(&self) -> WordId {
        self.id
    }

    pub fn term(&self) -> &str {
        &self.term
    }

    pub fn definitions(&self) -> &[String] {
        &self.definitions
    }

    pub fn date_added(&self) -> DateTime<Utc> {
        self.date_added
    }

    pub fn has_definition(&self, definition: &str) -> bool {
        self.definitions.iter().any(|d| d == definition)
    }

    /// Returns this word with `definition` appended, unless it is already
    /// present (or empty), in which case the word comes back unchanged.
    pub fn add_definition(mut self, definition: impl Into<String>) -> Self {
        self.push_definition(definition.into());
        self
    }

    /// In-place form of [`Word::add_definition`]. Returns whether the list grew.
    pub(crate) fn push_definition(&mut self, definition: String) -> bool {
        if definition.is_empty() || self.has_definition(&definition) {
            return false;
        }
        self.definitions.push(definition);
        true
    }

    /// Checks the invariants a decoded word must hold.
    fn validate(&self) -> Result<()> {
        if self.term.is_empty() {
            return Err(TrainerError::InvalidData(format!("word {} has an empty term", self.id)));
        }
        if self.definitions.is_empty() {
            return Err(TrainerError::InvalidData(format!("'{}' has no definitions", self.term)));
        }
        for (i, definition) in self.definitions.iter().enumerate() {
            if definition.is_empty() {
                return Err(TrainerError::InvalidData(format!(
                    "'{}' has an empty definition",
                    self.term
                )));
            }
            if self.definitions[..i].contains(definition) {
                return Err(TrainerError::InvalidData(format!(
                    "'{}' repeats the definition '{}'",
                    self.term, definition
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_word_has_single_definition() {
        let word = Word::new("cat", "feline").unwrap();
        assert_eq!(word.term(), "cat");
        assert_eq!(word.definitions(), &["feline".to_string()]);
        assert!(word.date_added() <= Utc::now());
    }

    #[test]
    fn test_new_word_rejects_empty_fields() {
        assert!(matches!(Word::new("", "feline"), Err(TrainerError::EmptyTerm)));
        assert!(matches!(Word::new("cat", ""), Err(TrainerError::EmptyDefinition)));
    }

    #[test]
    fn test_ids_are_unique() {
        let a = Word::new("cat", "feline").unwrap();
        let b = Word::new("cat", "feline").unwrap();
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_add_definition_appends_in_order() {
        let word = Word::new("cat", "feline")
            .unwrap()
            .add_definition("a small domesticated animal");
        assert_eq!(word.definitions(), &["feline", "a small domesticated animal"]);
    }

    #[test]
    fn test_add_definition_ignores_duplicates() {
        let word = Word::new("cat", "feline").unwrap();
        let id = word.id();
        let word = word.add_definition("feline").add_definition("");
        assert_eq!(word.definitions(), &["feline"]);
        assert_eq!(word.id(), id);
    }

    #[test]
    fn test_deserialize_enforces_invariants() {
        let word = Word::new("cat", "feline").unwrap();
        let json = serde_json::to_string(&word).unwrap();
        assert_eq!(serde_json::from_str::<Word>(&json).unwrap(), word);

        let id = "67e55044-10b1-426f-9247-bb680e5fe0c8";
        let at = "2024-10-27T10:00:00Z";
        for bad in [
            format!(r#"{{"id":"{id}","term":"cat","definitions":[],"dateAdded":"{at}"}}"#),
            format!(r#"{{"id":"{id}","term":"","definitions":["feline"],"dateAdded":"{at}"}}"#),
            format!(r#"{{"id":"{id}","term":"cat","definitions":["a","a"],"dateAdded":"{at}"}}"#),
            format!(r#"{{"id":"{id}","term":"cat","definitions":[""],"dateAdded":"{at}"}}"#),
        ] {
            assert!(serde_json::from_str::<Word>(&bad).is_err(), "accepted {}", bad);
        }
    }

    #[test]
    fn test_validate_catches_repeated_definition() {
        let mut word = Word::new("cat", "feline").unwrap();
        word.definitions.push("feline".to_string());
        assert!(matches!(word.validate(), Err(TrainerError::InvalidData(_))));
    }
}
