//! Test fixture loader for Reskpoints golden causality scenarios.
//!
//! Fixtures live in the workspace-level `test-fixtures/` directory and are
//! found from any crate by walking up from `CARGO_MANIFEST_DIR`.

pub mod scenario;

use serde::de::DeserializeOwned;
use std::path::PathBuf;

pub use scenario::{
    ExpectedEdge, ExpectedImpact, ExpectedRootCause, GoldenScenario, ScenarioEvent,
};

/// Directory holding the golden causality scenarios.
pub const GOLDEN_CAUSALITY_DIR: &str = "golden/causality";

/// Root directory of the test-fixtures folder.
fn fixtures_root() -> PathBuf {
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR").unwrap_or_else(|_| ".".to_string());
    let mut path = PathBuf::from(&manifest_dir);

    // Crates sit below the workspace root; climb until the data folder shows up.
    while !path.join("test-fixtures").join("golden").exists() {
        if !path.pop() {
            panic!(
                "Could not find test-fixtures directory from CARGO_MANIFEST_DIR={}",
                manifest_dir
            );
        }
    }
    path.join("test-fixtures")
}

/// Load and deserialize a JSON fixture file.
///
/// # Panics
/// Panics if the file doesn't exist or can't be deserialized.
pub fn load_fixture<T: DeserializeOwned>(relative_path: &str) -> T {
    let path = fixtures_root().join(relative_path);
    let content = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read fixture {}: {}", path.display(), e));
    serde_json::from_str(&content)
        .unwrap_or_else(|e| panic!("Failed to parse fixture {}: {}", path.display(), e))
}

/// Load a fixture file as raw JSON Value.
pub fn load_fixture_value(relative_path: &str) -> serde_json::Value {
    load_fixture(relative_path)
}

pub fn fixture_exists(relative_path: &str) -> bool {
    fixtures_root().join(relative_path).exists()
}

/// List all JSON files in a fixture subdirectory, sorted by name.
pub fn list_fixtures(subdir: &str) -> Vec<PathBuf> {
    let dir = fixtures_root().join(subdir);
    if !dir.exists() {
        return Vec::new();
    }
    let mut files: Vec<PathBuf> = std::fs::read_dir(&dir)
        .unwrap_or_else(|e| panic!("Failed to read directory {}: {}", dir.display(), e))
        .filter_map(|entry| {
            let path = entry.ok()?.path();
            path.extension()
                .is_some_and(|ext| ext == "json")
                .then_some(path)
        })
        .collect();
    files.sort();
    files
}

/// Every golden causality scenario.
pub fn golden_scenarios() -> Vec<GoldenScenario> {
    list_fixtures(GOLDEN_CAUSALITY_DIR)
        .into_iter()
        .map(|path| {
            let content = std::fs::read_to_string(&path)
                .unwrap_or_else(|e| panic!("Failed to read {}: {}", path.display(), e));
            serde_json::from_str(&content)
                .unwrap_or_else(|e| panic!("Failed to parse {}: {}", path.display(), e))
        })
        .collect()
}
