//! AC'SCENT survey archive library
//!
//! Synthetic survey archive for the AC'SCENT scent and music exhibition,
//! plus the storage, statistics and export pieces the admin dashboard uses.

pub mod audit;
pub mod calendar;
pub mod catalog;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod generator;
pub mod persistence;
pub mod random;
pub mod session;
pub mod survey;

pub use error::{ArchiveError, Result};
