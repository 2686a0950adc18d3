//! Locating optional model files and scratch directories for tests.

use std::path::PathBuf;

/// Environment variable naming a directory of real model output.
pub const TEST_DATA_ENV: &str = "TEST_DATA_DIR";

/// Find `name` in `$TEST_DATA_DIR`, then in `testdata/` at the workspace root.
pub fn find_test_file(name: &str) -> Option<PathBuf> {
    let from_env = std::env::var_os(TEST_DATA_ENV).map(|dir| PathBuf::from(dir).join(name));
    // crates/test-utils -> workspace root
    let in_workspace = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .ancestors()
        .nth(2)
        .map(|root| root.join("testdata").join(name));

    from_env
        .into_iter()
        .chain(in_workspace)
        .find(|path| path.is_file())
}

/// A scratch directory removed when dropped.
pub fn temp_test_dir() -> tempfile::TempDir {
    tempfile::Builder::new()
        .prefix("snow-test-")
        .tempdir()
        .expect("cannot create scratch directory")
}
