//! Core types and logic for the Etude practice tracker.
//!
//! This crate is deliberately free of database and CLI dependencies. Storage
//! backends implement [`store::PracticeStore`]; the [`tracker::Tracker`]
//! service drives the Session Reconciler and the Gamification Engine over any
//! such backend.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod context;
pub mod error;
pub mod gamify;
pub mod levels;
pub mod profile;
pub mod rating;
pub mod reconcile;
pub mod session;
pub mod store;
pub mod summary;
pub mod target;
pub mod time;
pub mod timer;
pub mod tracker;

pub use error::{Error, Result};
