// File: src/practice.rs
use crate::core::types::{Word, WordId};
use crate::error::{Result, TrainerError};
use rand::rngs::ThreadRng;
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashSet;

/// Number of choices a round aims to show.
pub const DEFAULT_CHOICE_TARGET: usize = 5;

/// Where the session sits in the present/grade cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundState {
    /// There were no words when the pool was last built.
    Empty,
    /// Choices are shown and the selection can change.
    Presenting,
    /// The answer was submitted; `correct` is the verdict.
    Graded { correct: bool },
}

/// Builds the choice set for `word`: all of its definitions plus random
/// distractors from other terms, up to `target` entries, shuffled.
///
/// Distractors are distinct and never equal one of the word's own
/// definitions. A word with `target` or more definitions gets no distractors
/// and its list is not truncated.
pub fn compute_choices<R: Rng + ?Sized>(
    word: &Word,
    all_words: &[Word],
    target: usize,
    rng: &mut R,
) -> Vec<String> {
    let mut choices: Vec<String> = word.definitions().to_vec();

    let mut seen: HashSet<&str> = HashSet::new();
    let pool: Vec<&str> = all_words
        .iter()
        .filter(|w| w.term() != word.term())
        .flat_map(|w| w.definitions().iter().map(String::as_str))
        .filter(|d| !word.has_definition(d) && seen.insert(*d))
        .collect();

    let need = target.saturating_sub(choices.len());
    choices.extend(pool.choose_multiple(&mut *rng, need).map(|d| d.to_string()));
    choices.shuffle(rng);
    choices
}

/// A multiple-choice quiz over a shuffled pool of words.
///
/// The session never owns the word collection. Callers hand in the current
/// snapshot when advancing so that rounds pick up words added mid-session.
pub struct PracticeSession<R: Rng = ThreadRng> {
    rng: R,
    choice_target: usize,
    pool: Vec<Word>,
    current: usize,
    choices: Vec<String>,
    selection: HashSet<String>,
    state: RoundState,
}

impl PracticeSession<ThreadRng> {
    pub fn start(words: &[Word], choice_target: usize) -> Self {
        Self::start_with_rng(words, choice_target, rand::thread_rng())
    }
}

impl<R: Rng> PracticeSession<R> {
    pub fn start_with_rng(words: &[Word], choice_target: usize, rng: R) -> Self {
        let mut session = Self {
            rng,
            choice_target,
            pool: Vec::new(),
            current: 0,
            choices: Vec::new(),
            selection: HashSet::new(),
            state: RoundState::Empty,
        };
        session.reshuffle(words);
        session
    }

    pub fn state(&self) -> RoundState {
        self.state
    }

    pub fn is_empty(&self) -> bool {
        self.state == RoundState::Empty
    }

    /// The word under test. Still available once the round is graded so the
    /// correct definitions can be revealed.
    pub fn current_word(&self) -> Option<&Word> {
        match self.state {
            RoundState::Empty => None,
            _ => self.pool.get(self.current),
        }
    }

    pub fn choices(&self) -> &[String] {
        &self.choices
    }

    pub fn selection(&self) -> &HashSet<String> {
        &self.selection
    }

    pub fn is_selected(&self, definition: &str) -> bool {
        self.selection.contains(definition)
    }

    /// Rounds left in the pool after the current one.
    pub fn remaining(&self) -> usize {
        match self.state {
            RoundState::Empty => 0,
            _ => self.pool.len().saturating_sub(self.current + 1),
        }
    }

    /// Marks or unmarks a choice. Returns whether it is selected afterwards.
    pub fn toggle_selection(&mut self, definition: &str) -> Result<bool> {
        match self.state {
            RoundState::Empty => return Err(TrainerError::NoActiveRound),
            RoundState::Graded { .. } => return Err(TrainerError::RoundGraded),
            RoundState::Presenting => {}
        }
        if !self.choices.iter().any(|c| c == definition) {
            return Err(TrainerError::UnknownChoice(definition.to_string()));
        }
        if self.selection.remove(definition) {
            Ok(false)
        } else {
            self.selection.insert(definition.to_string());
            Ok(true)
        }
    }

    /// Grades the selection: correct only when it equals the word's definition set.
    /// Submitting an already graded round returns the recorded verdict.
    pub fn submit(&mut self) -> Result<bool> {
        match self.state {
            RoundState::Empty => Err(TrainerError::NoActiveRound),
            RoundState::Graded { correct } => Ok(correct),
            RoundState::Presenting => {
                let word = &self.pool[self.current];
                let expected: HashSet<&str> = word.definitions().iter().map(String::as_str).collect();
                let chosen: HashSet<&str> = self.selection.iter().map(String::as_str).collect();
                let correct = chosen == expected;
                log::debug!("Graded '{}': correct={}", word.term(), correct);
                self.state = RoundState::Graded { correct };
                Ok(correct)
            }
        }
    }

    /// Moves to the next round, drawing distractors from `words`.
    ///
    /// Pool entries removed from `words` since the pool was built are skipped,
    /// and surviving entries pick up any merged definitions. Once the pool is
    /// exhausted a fresh one is shuffled from `words`. An empty session stays empty.
    pub fn next(&mut self, words: &[Word]) -> RoundState {
        if self.state == RoundState::Empty {
            return self.state;
        }
        loop {
            self.current += 1;
            if self.current >= self.pool.len() {
                self.reshuffle(words);
                return self.state;
            }
            let id = self.pool[self.current].id();
            if let Some(live) = find_by_id(words, id) {
                self.pool[self.current] = live.clone();
                self.present(words);
                return self.state;
            }
        }
    }

    fn reshuffle(&mut self, words: &[Word]) {
        self.pool = words.to_vec();
        self.pool.shuffle(&mut self.rng);
        self.current = 0;
        if self.pool.is_empty() {
            log::debug!("No words to practice");
            self.choices.clear();
            self.selection.clear();
            self.state = RoundState::Empty;
        } else {
            log::debug!("Shuffled a practice pool of {} words", self.pool.len());
            self.present(words);
        }
    }

    fn present(&mut self, words: &[Word]) {
        self.selection.clear();
        self.choices = compute_choices(
            &self.pool[self.current],
            words,
            self.choice_target,
            &mut self.rng,
        );
        self.state = RoundState::Presenting;
    }
}

fn find_by_id(words: &[Word], id: WordId) -> Option<&Word> {
    words.iter().find(|w| w.id() == id)
}
