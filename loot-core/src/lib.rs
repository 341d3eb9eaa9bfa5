//! Core library for the OSRS loot database.
//!
//! Two independent pipelines share one SQLite file: the build step reads a
//! MediaWiki export, extracts monster drop tables from the template markup,
//! and loads them into a fixed relational schema; the query step turns a set
//! of optional filters into a single grouped query and formats the result
//! rows as CSV or wiki markup.

pub mod database;
pub mod error;
pub mod export;
pub mod models;
pub mod output;
pub mod parsers;

pub use error::{LootError, Result};
