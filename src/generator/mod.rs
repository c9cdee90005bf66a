//! Synthetic response generation.
//!
//! Manufactures a plausible, fully reproducible history of kiosk visits:
//! weighted samplers for each answer, a seasonal visitor-volume model and
//! the synthesizer that walks the calendar.

pub mod samplers;
pub mod synthesizer;
pub mod volume;

pub use synthesizer::{generate_archive, Synthesizer};
pub use volume::{DayVolume, HolidayRush};
