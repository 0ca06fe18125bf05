//! # Userdir Server Library
//!
//! Component wiring, logging setup and the application runner used by the
//! `userdir-server` binary.

pub mod app;
pub mod di;
pub mod startup;
