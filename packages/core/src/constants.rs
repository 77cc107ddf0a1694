// ABOUTME: Filesystem location of the Curbside database
// ABOUTME: HOME is consulted before the dirs crate so tests can redirect it

use std::path::PathBuf;

/// Path to the SQLite database file (~/.curbside/curbside.db)
pub fn database_file() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .or_else(dirs::home_dir)
        .expect("Unable to get home directory")
        .join(".curbside")
        .join("curbside.db")
}
