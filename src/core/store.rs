// File: src/core/store.rs
use crate::codec::Codec;
use crate::core::types::Word;
use crate::error::Result;
use crate::persistence::BlobStore;
use std::collections::BTreeSet;

/// What a call to [`WordStore::add`] did to the collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// The term was new and the word was appended at `index`.
    Inserted { index: usize },
    /// The term already existed at `index`; `added` definitions were new.
    Merged { index: usize, added: usize },
}

impl AddOutcome {
    pub fn index(&self) -> usize {
        match *self {
            AddOutcome::Inserted { index } | AddOutcome::Merged { index, .. } => index,
        }
    }
}

/// Change notification delivered to subscribers after a mutation completes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEvent {
    Added(AddOutcome),
    /// Positions removed, ascending, relative to the collection before removal.
    Removed(Vec<usize>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Subscriber = Box<dyn FnMut(&StoreEvent)>;

/// Ordered, term-unique word collection that persists itself after every mutation.
pub struct WordStore {
    words: Vec<Word>,
    backend: Box<dyn BlobStore>,
    codec: Codec,
    key: String,
    subscribers: Vec<(SubscriptionId, Subscriber)>,
    next_subscription: u64,
}

impl WordStore {
    /// Opens the store, loading whatever `backend` holds under `key`.
    /// Absent or undecodable data yields an empty collection.
    pub fn open(backend: Box<dyn BlobStore>, codec: Codec, key: impl Into<String>) -> Self {
        let key = key.into();
        let words = match load_words(backend.as_ref(), codec, &key) {
            Ok(Some(words)) => {
                log::debug!("Loaded {} words from '{}'", words.len(), key);
                words
            }
            Ok(None) => Vec::new(),
            Err(e) => {
                log::warn!("Discarding saved words under '{}': {}", key, e);
                Vec::new()
            }
        };
        Self {
            words,
            backend,
            codec,
            key,
            subscribers: Vec::new(),
            next_subscription: 0,
        }
    }

    /// Read-only snapshot in display order.
    pub fn all(&self) -> &[Word] {
        &self.words
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Word> {
        self.words.get(index)
    }

    /// Exact, case-sensitive term lookup.
    pub fn position(&self, term: &str) -> Option<usize> {
        self.words.iter().position(|w| w.term() == term)
    }

    pub fn find(&self, term: &str) -> Option<&Word> {
        self.position(term).map(|i| &self.words[i])
    }

    /// Appends `new_word`, or merges its definitions into the existing word
    /// with the same term. The existing word keeps its id and date.
    pub fn add(&mut self, new_word: Word) -> AddOutcome {
        let outcome = match self.position(new_word.term()) {
            Some(index) => {
                let existing = &mut self.words[index];
                let added = new_word
                    .definitions()
                    .iter()
                    .filter(|d| existing.push_definition((*d).clone()))
                    .count();
                log::debug!("Merged {} new definition(s) into '{}'", added, existing.term());
                AddOutcome::Merged { index, added }
            }
            None => {
                log::debug!("Added new word '{}'", new_word.term());
                self.words.push(new_word);
                AddOutcome::Inserted { index: self.words.len() - 1 }
            }
        };
        self.persist_best_effort();
        self.notify(&StoreEvent::Added(outcome));
        outcome
    }

    /// Removes the word at `index`. Out-of-range indices leave the store untouched.
    pub fn remove(&mut self, index: usize) -> bool {
        self.remove_many(&[index])
    }

    /// Removes every listed position. If any index is out of range nothing is removed.
    /// Duplicate indices are treated as one.
    pub fn remove_many(&mut self, indices: &[usize]) -> bool {
        let positions: BTreeSet<usize> = indices.iter().copied().collect();
        if positions.is_empty() || positions.iter().any(|&i| i >= self.words.len()) {
            return false;
        }
        for &index in positions.iter().rev() {
            let removed = self.words.remove(index);
            log::debug!("Removed word '{}'", removed.term());
        }
        self.persist_best_effort();
        self.notify(&StoreEvent::Removed(positions.into_iter().collect()));
        true
    }

    /// Encodes the collection and writes it through the backend.
    pub fn persist(&mut self) -> Result<()> {
        let bytes = self.codec.encode(&self.words)?;
        self.backend.write(&self.key, &bytes)
    }

    /// Registers a callback run after every completed mutation.
    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(&StoreEvent) + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscribers.push((id, Box::new(callback)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sid, _)| *sid != id);
        self.subscribers.len() != before
    }

    fn persist_best_effort(&mut self) {
        if let Err(e) = self.persist() {
            log::warn!("Failed to save words under '{}': {}", self.key, e);
        }
    }

    fn notify(&mut self, event: &StoreEvent) {
        for (_, subscriber) in self.subscribers.iter_mut() {
            subscriber(event);
        }
    }
}

fn load_words(backend: &dyn BlobStore, codec: Codec, key: &str) -> Result<Option<Vec<Word>>> {
    match backend.read(key)? {
        Some(bytes) => codec.decode(&bytes).map(Some),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TrainerError;
    use crate::persistence::{MemoryBlobStore, SAVED_WORDS_KEY};
    use std::cell::RefCell;
    use std::rc::Rc;

    struct FailingBlobStore;

    impl BlobStore for FailingBlobStore {
        fn read(&self, _key: &str) -> Result<Option<Vec<u8>>> {
            Err(std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied").into())
        }

        fn write(&mut self, _key: &str, _value: &[u8]) -> Result<()> {
            Err(std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied").into())
        }
    }

    fn memory_store() -> (WordStore, MemoryBlobStore) {
        let backend = MemoryBlobStore::new();
        let store = WordStore::open(Box::new(backend.clone()), Codec::Json, SAVED_WORDS_KEY);
        (store, backend)
    }

    fn word(term: &str, definition: &str) -> Word {
        Word::new(term, definition).unwrap()
    }

    fn terms(store: &WordStore) -> Vec<&str> {
        store.all().iter().map(|w| w.term()).collect()
    }

    #[test]
    fn test_add_merges_same_term() {
        let (mut store, _) = memory_store();
        assert_eq!(store.add(word("cat", "feline")), AddOutcome::Inserted { index: 0 });
        assert_eq!(
            store.add(word("cat", "a small domesticated animal")),
            AddOutcome::Merged { index: 0, added: 1 }
        );
        assert_eq!(store.len(), 1);
        assert_eq!(
            store.all()[0].definitions(),
            &["feline", "a small domesticated animal"]
        );
    }

    #[test]
    fn test_add_duplicate_definition_is_noop() {
        let (mut store, _) = memory_store();
        let first = word("cat", "feline");
        let id = first.id();
        store.add(first);
        assert_eq!(
            store.add(word("cat", "feline")),
            AddOutcome::Merged { index: 0, added: 0 }
        );
        assert_eq!(store.all()[0].definitions(), &["feline"]);
        assert_eq!(store.all()[0].id(), id);
    }

    #[test]
    fn test_merge_is_case_sensitive() {
        let (mut store, _) = memory_store();
        store.add(word("cat", "feline"));
        store.add(word("Cat", "a person"));
        assert_eq!(terms(&store), vec!["cat", "Cat"]);
    }

    #[test]
    fn test_merge_adds_every_new_definition() {
        let (mut store, _) = memory_store();
        store.add(word("run", "to move fast"));
        let incoming = word("run", "to operate")
            .add_definition("to move fast")
            .add_definition("a sequence");
        assert_eq!(store.add(incoming), AddOutcome::Merged { index: 0, added: 2 });
        assert_eq!(
            store.find("run").unwrap().definitions(),
            &["to move fast", "to operate", "a sequence"]
        );
    }

    #[test]
    fn test_add_persists() {
        let (mut store, backend) = memory_store();
        store.add(word("cat", "feline"));
        let saved = Codec::Json
            .decode(&backend.get(SAVED_WORDS_KEY).unwrap())
            .unwrap();
        assert_eq!(saved, store.all());
    }

    #[test]
    fn test_remove_out_of_range_is_noop() {
        let (mut store, backend) = memory_store();
        store.add(word("cat", "feline"));
        let saved = backend.get(SAVED_WORDS_KEY);
        assert!(!store.remove(1));
        assert!(!store.remove_many(&[0, 5]));
        assert!(!store.remove_many(&[]));
        assert_eq!(terms(&store), vec!["cat"]);
        assert_eq!(backend.get(SAVED_WORDS_KEY), saved);
    }

    #[test]
    fn test_remove_many_keeps_remaining_order() {
        let (mut store, _) = memory_store();
        for term in ["a", "b", "c", "d", "e"] {
            store.add(word(term, "letter"));
        }
        assert!(store.remove_many(&[3, 0, 3]));
        assert_eq!(terms(&store), vec!["b", "c", "e"]);
        assert!(store.remove(2));
        assert_eq!(terms(&store), vec!["b", "c"]);
    }

    #[test]
    fn test_reopen_restores_collection() {
        let (mut store, backend) = memory_store();
        store.add(word("cat", "feline"));
        store.add(word("dog", "canine"));
        store.remove(0);
        let reopened = WordStore::open(Box::new(backend), Codec::Json, SAVED_WORDS_KEY);
        assert_eq!(reopened.all(), store.all());
    }

    #[test]
    fn test_corrupt_data_loads_empty() {
        let backend = MemoryBlobStore::new();
        backend.insert(SAVED_WORDS_KEY, b"\x00garbage".to_vec());
        let store = WordStore::open(Box::new(backend), Codec::Json, SAVED_WORDS_KEY);
        assert!(store.is_empty());
    }

    #[test]
    fn test_failing_backend_does_not_break_mutators() {
        let mut store = WordStore::open(Box::new(FailingBlobStore), Codec::Json, SAVED_WORDS_KEY);
        assert!(store.is_empty());
        store.add(word("cat", "feline"));
        assert_eq!(store.len(), 1);
        assert!(matches!(store.persist(), Err(TrainerError::Io(_))));
    }

    #[test]
    fn test_subscribers_see_mutations() {
        let (mut store, _) = memory_store();
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        let id = store.subscribe(move |event| sink.borrow_mut().push(event.clone()));

        store.add(word("cat", "feline"));
        store.add(word("cat", "furry"));
        store.remove(9);
        store.remove(0);
        assert!(store.unsubscribe(id));
        store.add(word("dog", "canine"));

        assert_eq!(
            *events.borrow(),
            vec![
                StoreEvent::Added(AddOutcome::Inserted { index: 0 }),
                StoreEvent::Added(AddOutcome::Merged { index: 0, added: 1 }),
                StoreEvent::Removed(vec![0]),
            ]
        );
        assert!(!store.unsubscribe(id));
    }
}
