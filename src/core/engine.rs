use crate::config::TrainerConfig;
use crate::core::store::{AddOutcome, WordStore};
use crate::core::types::Word;
use crate::error::Result;
use crate::persistence::{BlobStore, FileBlobStore};
use crate::practice::PracticeSession;
use rand::Rng;

// The trainer ties the word store to its backend and the practice settings.
pub struct Trainer {
    store: WordStore,
    choice_target: usize,
}

impl Trainer {
    /// Opens the file-backed collection described by `config`.
    pub fn open(config: &TrainerConfig) -> Self {
        log::debug!("Opening word collection in {:?}", config.data_dir);
        let backend = FileBlobStore::new(&config.data_dir);
        Self::with_backend(Box::new(backend), config)
    }

    pub fn with_backend(backend: Box<dyn BlobStore>, config: &TrainerConfig) -> Self {
        Self {
            store: WordStore::open(backend, config.codec, config.storage_key.clone()),
            choice_target: config.choice_target,
        }
    }

    /// Validates the input, then inserts or merges the word.
    /// Nothing changes when validation fails.
    pub fn add_word(&mut self, term: &str, definition: &str) -> Result<AddOutcome> {
        let word = Word::new(term.trim(), definition.trim())?;
        Ok(self.store.add(word))
    }

    /// Returns how many words were removed; zero when any index is out of range.
    pub fn remove_words(&mut self, indices: &[usize]) -> usize {
        let before = self.store.len();
        self.store.remove_many(indices);
        before - self.store.len()
    }

    pub fn words(&self) -> &[Word] {
        self.store.all()
    }

    pub fn store(&self) -> &WordStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut WordStore {
        &mut self.store
    }

    pub fn start_practice(&self) -> PracticeSession {
        PracticeSession::start(self.store.all(), self.choice_target)
    }

    pub fn start_practice_with_rng<R: Rng>(&self, rng: R) -> PracticeSession<R> {
        PracticeSession::start_with_rng(self.store.all(), self.choice_target, rng)
    }

    /// Advances `session` against the live collection.
    pub fn next_round<R: Rng>(&self, session: &mut PracticeSession<R>) {
        session.next(self.store.all());
    }
}
