use std::env;
use std::path::PathBuf;

/// Get the path to the Promemoria directory (~/.promemoria)
pub fn promemoria_dir() -> PathBuf {
    // First try HOME environment variable (useful for tests)
    if let Ok(home) = env::var("HOME") {
        PathBuf::from(home).join(".promemoria")
    } else {
        // Fall back to dirs crate for normal usage
        dirs::home_dir()
            .expect("Unable to get home directory")
            .join(".promemoria")
    }
}

/// Get the default path to the task database (~/.promemoria/promemoria.db)
pub fn database_file() -> PathBuf {
    promemoria_dir().join("promemoria.db")
}
