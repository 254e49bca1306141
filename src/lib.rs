//! Falling-block simulation (workspace facade crate).
//!
//! The rules live in `tetr-core` and the shared data types in `tetr-types`;
//! this package re-exports both under `tetr::{core, types}` and adds the
//! headless runner used by the `tetr-sim` binary.

pub use tetr_core as core;
pub use tetr_types as types;

pub mod event_log;
pub mod runner;
