// lib.rs
pub mod alias;
pub mod app_output;
pub mod catalog;
pub mod combinator;
pub mod commands;
pub mod config;
pub mod error;
pub mod fileset;
pub mod layout;
pub mod linker;
pub mod listing;
pub mod template;
pub mod tmpdir;

pub use error::{FixtureError, Result};
