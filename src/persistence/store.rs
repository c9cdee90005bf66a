//! Response store: the whole archive as a single JSON array.
//!
//! The kiosk keeps every response under one storage key; on disk that blob
//! is one JSON file. When the dashboard finds it empty, it seeds it with
//! the synthetic archive.

use std::fs;
use std::path::Path;

use tracing::{debug, info, warn};

use crate::error::{ArchiveError, Result};
use crate::generator::Synthesizer;
use crate::survey::SurveyResponse;

/// Save the responses as one JSON array.
pub fn save_responses(responses: &[SurveyResponse], path: &Path) -> Result<()> {
    let json = serde_json::to_string(responses).map_err(|e| ArchiveError::json(path, e))?;
    fs::write(path, json).map_err(|e| ArchiveError::io(path, e))?;
    info!(path = %path.display(), count = responses.len(), "saved responses");
    Ok(())
}

/// Load responses saved by `save_responses`.
pub fn load_responses(path: &Path) -> Result<Vec<SurveyResponse>> {
    let contents = fs::read_to_string(path).map_err(|e| ArchiveError::io(path, e))?;
    if contents.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(&contents).map_err(|e| ArchiveError::json(path, e))
}

/// Return the stored responses, or generate, save and return the synthetic
/// archive when the store is missing or empty.
///
/// A failed save is logged and the generated responses are still returned.
/// An unreadable store is left untouched and the archive is generated in
/// memory only.
pub fn load_or_generate(path: &Path, synthesizer: &mut Synthesizer) -> Result<Vec<SurveyResponse>> {
    if path.exists() {
        match load_responses(path) {
            Ok(stored) if !stored.is_empty() => {
                info!(path = %path.display(), count = stored.len(), "loaded stored responses");
                return Ok(stored);
            }
            Ok(_) => {}
            Err(e) => {
                warn!(error = %e, "store unreadable, generating archive in memory");
                return synthesizer.generate();
            }
        }
    }

    info!(path = %path.display(), "no stored responses, generating archive");
    let generated = synthesizer.generate()?;
    if let Err(e) = save_responses(&generated, path) {
        warn!(error = %e, "could not persist generated archive, keeping it in memory");
    }
    Ok(generated)
}

/// Add responses to the end of the store, creating it if needed. Returns
/// the number of stored responses afterwards.
pub fn append_responses(responses: &[SurveyResponse], path: &Path) -> Result<usize> {
    let mut stored = if path.exists() { load_responses(path)? } else { Vec::new() };
    stored.extend_from_slice(responses);
    save_responses(&stored, path)?;
    debug!(path = %path.display(), added = responses.len(), "appended responses");
    Ok(stored.len())
}

/// Wipe the store and fill it with a freshly generated archive.
///
/// Like `load_or_generate`, a store that cannot be cleared or written is
/// logged and the generated responses are still returned.
pub fn regenerate(path: &Path, synthesizer: &mut Synthesizer) -> Result<Vec<SurveyResponse>> {
    if path.exists() {
        match fs::remove_file(path) {
            Ok(()) => info!(path = %path.display(), "cleared stored responses"),
            Err(e) => {
                let err = ArchiveError::io(path, e);
                warn!(error = %err, "could not clear store");
            }
        }
    }

    let generated = synthesizer.generate()?;
    if let Err(e) = save_responses(&generated, path) {
        warn!(error = %e, "could not persist regenerated archive, keeping it in memory");
    }
    Ok(generated)
}
