use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use gocodeo_logging::gocodeo_home;

const ENV_FILE: &str = ".env";

/// Load `./.env`, then the workspace `.env` in the gocodeo home directory.
///
/// Variables that are already set are never overridden, so the process
/// environment wins over the local file, which wins over the workspace file.
/// Returns the files that were loaded.
pub fn load_workspace_env() -> Result<Vec<PathBuf>> {
    let mut loaded = Vec::new();

    let local = PathBuf::from(ENV_FILE);
    if load_env_file(&local)? {
        loaded.push(local);
    }

    let workspace = workspace_env_path()?;
    if load_env_file(&workspace)? {
        loaded.push(workspace);
    }

    Ok(loaded)
}

/// Path of the `.env` shared by every project
pub fn workspace_env_path() -> Result<PathBuf> {
    Ok(gocodeo_home()?.join(ENV_FILE))
}

fn load_env_file(path: &Path) -> Result<bool> {
    if !path.is_file() {
        return Ok(false);
    }
    dotenvy::from_path(path).with_context(|| format!("Failed to load {}", path.display()))?;
    log::debug!("Loaded environment from {}", path.display());
    Ok(true)
}
