use crate::error::PortalError;
use crate::types::api::StudentCreate;
use std::{fs, path::Path};
use tracing::{info, warn};

/// Load roster seed JSON files from a directory. Each file holds either one
/// record or an array of records; unreadable files are skipped with a warning.
pub fn load_from_dir(dir: &Path) -> Result<Vec<StudentCreate>, PortalError> {
    if !dir.exists() {
        info!(path = %dir.display(), "roster seed directory not found; skipping load");
        return Ok(Vec::new());
    }

    let loaded: Vec<StudentCreate> = fs::read_dir(dir)?
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry.path()),
            Err(e) => {
                let err: PortalError = e.into();
                warn!(error = %err, "failed to read seed dir entry");
                None
            }
        })
        .filter(|path| is_json_file(path))
        .filter_map(|path| {
            load_seed_file(&path)
                .inspect_err(|e| {
                    warn!(path = %path.display(), error = %e, "failed to load seed file");
                })
                .ok()
        })
        .flatten()
        .collect();

    Ok(loaded)
}

fn is_json_file(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        == Some(true)
}

fn load_seed_file(path: &Path) -> Result<Vec<StudentCreate>, PortalError> {
    let contents = fs::read_to_string(path)?;
    match serde_json::from_str::<Vec<StudentCreate>>(&contents) {
        Ok(records) => Ok(records),
        Err(_) => Ok(vec![serde_json::from_str::<StudentCreate>(&contents)?]),
    }
}
