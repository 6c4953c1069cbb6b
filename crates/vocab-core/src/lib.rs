//! vocab-core — Word store, quiz engine, and statistics.
//!
//! This crate holds everything the vocabulary trainer knows: the word
//! collection and its text import/export format, the quiz engine with its
//! bounded result history, statistics over that history, and the
//! [`state::AppState`] that ties them together behind an observer API.
//! Persistence goes through the [`traits::Storage`] seam.

pub mod codec;
pub mod config;
pub mod debounce;
pub mod engine;
pub mod error;
pub mod history;
pub mod model;
pub mod samples;
pub mod state;
pub mod statistics;
pub mod storage;
pub mod store;
pub mod traits;
