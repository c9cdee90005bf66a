//! Response persistence - storage blob and export.
//!
//! Saves and loads the response archive as one JSON file, and exports it
//! to the dashboard's CSV layout.

pub mod csv;
pub mod store;

pub use csv::{default_file_name, export_csv, parse_columns, write_csv, CsvColumn};
pub use store::{append_responses, load_or_generate, load_responses, regenerate, save_responses};
