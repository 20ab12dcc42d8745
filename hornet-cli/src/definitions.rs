//! Benchmark Definitions
//!
//! Loads the suite file: a version string, the technology/app tags and the
//! ordered benchmark records. Everything past parsing is validated by
//! `Registry` and `TagIndex`.

use anyhow::Context;
use hornet_core::{BenchmarkDef, Registry, TagDef, TagIndex};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Contents of a definitions file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuiteFile {
    /// Suite version shown next to the index
    #[serde(default)]
    pub version: String,
    /// Technology and app tags, in declaration order
    #[serde(default)]
    pub tags: Vec<TagDef>,
    /// Benchmarks in run order
    pub benchmarks: Vec<BenchmarkDef>,
}

impl SuiteFile {
    /// Parse a definitions file
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read definitions {}", path.display()))?;
        Self::parse(&json).with_context(|| format!("Invalid definitions in {}", path.display()))
    }

    /// Parse definitions from a JSON string
    pub fn parse(json: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Build the registry and tag index
    pub fn build(self) -> anyhow::Result<(Registry, TagIndex)> {
        let registry = Registry::new(self.benchmarks)?;
        let tags = TagIndex::new(&registry, self.tags)?;
        Ok((registry, tags))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hornet_core::TagKind;

    const SUITE: &str = r#"{
        "version": "RH-A1",
        "tags": [
            { "name": "DOM", "prettyName": "DOM", "type": "technology" },
            { "name": "GMAIL", "prettyName": "Gmail", "type": "app" }
        ],
        "benchmarks": [
            {
                "name": "Add Rows",
                "filename": "benchmarks/addrow.html",
                "runs": [["250", 250], ["1000", 1000]],
                "weight": 2,
                "baselineTime": 12.5,
                "tags": ["DOM", "GMAIL"],
                "issueNumber": 10
            },
            {
                "name": "Canvas Text",
                "filename": "benchmarks/canvastext.html",
                "runs": [["10", 10]],
                "weight": 6,
                "baselineTime": 40,
                "extended": true
            }
        ]
    }"#;

    #[test]
    fn test_parse_and_build() {
        let suite = SuiteFile::parse(SUITE).unwrap();
        assert_eq!(suite.version, "RH-A1");
        assert_eq!(suite.tags[1].kind, TagKind::App);

        let (registry, tags) = suite.build().unwrap();
        assert_eq!(registry.len(), 2);
        assert_eq!(registry[0].id(), "addrow");
        assert!((registry[0].computed_weight() - 25.0).abs() < 1e-9);
        assert!(tags.extended().is_some());
        assert_eq!(tags.get("gmail").unwrap().members(), &[0]);
    }

    #[test]
    fn test_unknown_tag_fails_build() {
        let json = SUITE.replace(r#""tags": ["DOM", "GMAIL"]"#, r#""tags": ["WEBGL"]"#);
        let err = SuiteFile::parse(&json).unwrap().build().unwrap_err();
        assert!(err.to_string().contains("WEBGL"));
    }

    #[test]
    fn test_load_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = SuiteFile::load(&path).unwrap_err();
        assert!(err.to_string().contains("broken.json"));
    }
}
