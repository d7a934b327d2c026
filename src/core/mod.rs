// src/core/mod.rs

pub mod engine;
pub mod store;
pub mod types;
