// src/lib.rs

pub mod codec;
pub mod config;
pub mod core;
pub mod error;
pub mod persistence;
pub mod practice;

pub use crate::codec::Codec;
pub use crate::config::TrainerConfig;
pub use crate::core::engine::Trainer;
pub use crate::core::store::{AddOutcome, StoreEvent, SubscriptionId, WordStore};
pub use crate::core::types::{Word, WordId};
pub use crate::error::{Result, TrainerError};
pub use crate::persistence::{BlobStore, FileBlobStore, MemoryBlobStore, SAVED_WORDS_KEY};
pub use crate::practice::{compute_choices, PracticeSession, RoundState};
