//! `bulmaform` - Bulma form markup with dynamic nested rows
//!
//! This library renders Bulma-styled form fields from a dynamic [`Record`] and handles the
//! server half of nested dynamic rows: every nested association that has an add button gets
//! one `<template>` element, rendered with the sentinel `NEW_RECORD` as its record index. The
//! client half (cloning templates, removing rows) lives in `bulmaform-rows`.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod blueprint;
pub mod cli;
pub mod config;
pub mod error;
pub mod form;
pub mod logging;
pub mod markup;
pub mod nested;
pub mod record;
pub mod simulation;

pub use config::Config;
pub use error::{Error, Result};
pub use form::FormBuilder;
pub use logging::init_logging;
pub use record::{Association, Record};
