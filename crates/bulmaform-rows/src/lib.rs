//! `bulmaform-rows` - Client-side behaviors for dynamic nested-form rows
//!
//! The server renders each nested association's row markup once, inside a `<template>`
//! element, with the sentinel `NEW_RECORD` standing in for the record index. This crate holds
//! the other half:
//!
//! - the add-row behavior clones that template, substitutes a fresh token for the sentinel
//!   and inserts the result into a container;
//! - the delete-row behavior removes a row, or flags a persisted row for destruction through
//!   its hidden `_destroy` field and hides it.
//!
//! Behaviors work against the [`RowDocument`] trait. [`MemoryDocument`] implements it natively;
//! on `wasm32` the `browser` module implements it over `web-sys` and installs a delegated click
//! listener.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod add_row;
#[cfg(target_arch = "wasm32")]
pub mod browser;
pub mod contract;
pub mod delete_row;
pub mod dispatch;
pub mod document;
pub mod error;
pub mod extension;
pub mod memory;
pub mod selector;
pub mod template;
pub mod token;

pub use add_row::{AddOutcome, AddRowConfig, AddRowController};
pub use contract::{DeleteAction, InsertPosition, SENTINEL};
pub use delete_row::{DeleteOutcome, DeleteRowConfig, DeleteRowController};
pub use dispatch::{ActionOutcome, RowActions, RowSettings};
pub use document::{RowDocument, RowEvent, RowEventKind, TriggerEvent};
pub use error::{Result, RowError};
pub use extension::{AddRowExtension, BeforeAdd, ExtensionRegistry};
pub use memory::{MemoryDocument, NodeId};
pub use template::{Instance, TokenTemplate};
pub use token::{ClockTokens, SequentialTokens, TokenFn, TokenSource};
