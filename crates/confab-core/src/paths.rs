use anyhow::Result;
use std::path::PathBuf;

const CONFAB_DIR: &str = ".confab";
const DB_FILE: &str = "confab.db";
const VOCABULARY_FILE: &str = "vocabulary.json";

/// Environment variable to override the Confab directory.
pub(crate) const CONFAB_DIR_ENV: &str = "CONFAB_DIR";

/// Resolve the Confab data directory.
/// Priority: CONFAB_DIR env var > ~/.confab/
pub fn resolve_confab_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var(CONFAB_DIR_ENV)
        && !dir.trim().is_empty()
    {
        return Ok(PathBuf::from(dir));
    }
    dirs::home_dir()
        .map(|h| h.join(CONFAB_DIR))
        .ok_or_else(|| anyhow::anyhow!("Failed to determine home directory"))
}

/// Ensure the Confab directory exists and return its path.
pub fn ensure_confab_dir() -> Result<PathBuf> {
    let dir = resolve_confab_dir()?;
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Get the database path: ~/.confab/confab.db
pub fn database_path() -> Result<PathBuf> {
    Ok(resolve_confab_dir()?.join(DB_FILE))
}

/// Ensure database path exists and return as string.
pub fn ensure_database_path() -> Result<PathBuf> {
    Ok(ensure_confab_dir()?.join(DB_FILE))
}

/// Convenience helper returning the database path as a UTF-8 string.
pub fn ensure_database_path_string() -> Result<String> {
    Ok(ensure_database_path()?.to_string_lossy().into_owned())
}

/// Default vocabulary file path: ~/.confab/vocabulary.json
pub fn vocabulary_path() -> Result<PathBuf> {
    Ok(ensure_confab_dir()?.join(VOCABULARY_FILE))
}

/// Serializes env-var mutation across test threads.
#[cfg(test)]
pub(crate) fn env_lock() -> std::sync::MutexGuard<'static, ()> {
    use std::sync::{Mutex, OnceLock};
    static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    LOCK.get_or_init(|| Mutex::new(())).lock().unwrap()
}
