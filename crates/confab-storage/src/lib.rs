//! Confab Storage - Low-level storage abstraction layer
//!
//! This crate provides the persistence layer for Confab, using redb as the
//! embedded database. Records are stored as JSON bytes under string keys
//! whose lexicographic order matches chronological order, so range scans
//! over a table walk the log oldest-to-newest.
//!
//! # Tables
//!
//! - `conversations` - Question/answer exchange log

pub mod conversation;

pub use conversation::{Conversation, ConversationStorage};
