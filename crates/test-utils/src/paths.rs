//! Path utilities for locating test data files.
//!
//! Real Level 3 captures are large and not checked in; tests that want one
//! look it up here and skip when it is missing.

use std::path::PathBuf;

/// Returns the workspace root directory.
pub fn workspace_root() -> PathBuf {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    PathBuf::from(manifest_dir)
        .parent() // crates/
        .and_then(|p| p.parent()) // workspace root
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| PathBuf::from(manifest_dir))
}

/// Returns `crates/{crate_name}/testdata/`.
pub fn crate_testdata_dir(crate_name: &str) -> PathBuf {
    workspace_root()
        .join("crates")
        .join(crate_name)
        .join("testdata")
}

/// Searches for a test file in multiple locations.
///
/// Checked in order:
/// 1. `TEST_DATA_DIR` (if set)
/// 2. `crates/level3-parser/testdata/`
/// 3. `crates/renderer/testdata/`
/// 4. workspace `testdata/`
/// 5. the bundled `palettes/` directory
pub fn find_test_file(name: &str) -> Option<PathBuf> {
    test_file_candidates(name)
        .into_iter()
        .find(|path| path.exists())
}

/// Every location [`find_test_file`] checks, in order.
pub fn test_file_candidates(name: &str) -> Vec<PathBuf> {
    let mut candidates = Vec::new();

    if let Ok(test_data_dir) = std::env::var("TEST_DATA_DIR") {
        candidates.push(PathBuf::from(test_data_dir).join(name));
    }

    let root = workspace_root();
    candidates.extend([
        crate_testdata_dir("level3-parser").join(name),
        crate_testdata_dir("renderer").join(name),
        root.join("testdata").join(name),
        root.join("palettes").join(name),
    ]);
    candidates
}

/// Creates a temporary directory for test output, removed on drop.
pub fn temp_test_dir() -> tempfile::TempDir {
    tempfile::tempdir().expect("Failed to create temporary test directory")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workspace_root_is_valid() {
        let root = workspace_root();
        assert!(
            root.join("Cargo.toml").exists(),
            "Workspace root should contain Cargo.toml: {:?}",
            root
        );
    }

    #[test]
    fn test_crate_testdata_dir() {
        let dir = crate_testdata_dir("level3-parser");
        assert!(dir.to_string_lossy().contains("level3-parser"));
        assert!(dir.to_string_lossy().ends_with("testdata"));
    }

    #[test]
    fn test_candidates_include_crate_testdata() {
        let candidates = test_file_candidates("KTLX.l3");
        let tail = &candidates[candidates.len() - 4..];
        assert_eq!(tail[0], crate_testdata_dir("level3-parser").join("KTLX.l3"));
        assert_eq!(tail[1], crate_testdata_dir("renderer").join("KTLX.l3"));
        assert_eq!(tail[3], workspace_root().join("palettes").join("KTLX.l3"));
    }

    #[test]
    fn test_bundled_palette_is_found() {
        let path = find_test_file("reflectivity.pal").unwrap();
        assert!(path.ends_with("palettes/reflectivity.pal"));
    }

    #[test]
    fn test_missing_file_is_none() {
        assert!(find_test_file("definitely_not_here.l3").is_none());
    }

    #[test]
    fn test_temp_test_dir() {
        let dir = temp_test_dir();
        assert!(dir.path().exists());
    }
}
