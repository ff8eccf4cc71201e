use std::fs;
use std::path::{Path, PathBuf};

use netlog_core::error::{NetlogError, Result};
use netlog_core::time_utils::{plots_dir_name, Clock};
use tracing::info;

/// Create the per-run chart directory `<root>/plots_<YYYYMMDD>_<HHMMSS>`.
///
/// The timestamp comes from `clock`. A directory left by an earlier run in
/// the same second is reused.
pub fn create_plots_dir(root: &Path, clock: &dyn Clock) -> Result<PathBuf> {
    let dir = root.join(plots_dir_name(clock.now()));
    fs::create_dir_all(&dir).map_err(|source| NetlogError::CreateDir {
        path: dir.clone(),
        source,
    })?;
    info!("Writing plots to {}", dir.display());
    Ok(dir)
}
