//! Tag Index
//!
//! Groups benchmarks for bulk selection. Three special tags are synthesized
//! from the registry:
//! - `CORE`: every benchmark that is not extended (always present)
//! - `EXTENDED`: every benchmark (present only if at least one is extended)
//! - `NONE`: empty sentinel meaning "nothing enabled" (always present)
//!
//! Technology and app tags are supplied by the caller. Membership is kept as
//! two mappings built once (tag → benchmark indices, benchmark → tag
//! indices) and never mutated afterwards.

use crate::registry::Registry;
use fxhash::FxHashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Name of the default selection tag
pub const CORE_TAG: &str = "CORE";
/// Name of the all-benchmarks tag
pub const EXTENDED_TAG: &str = "EXTENDED";
/// Name of the empty sentinel tag
pub const NONE_TAG: &str = "NONE";

/// Errors raised while building a tag index
#[derive(Debug, Error)]
pub enum TagError {
    /// A benchmark names a tag that was not supplied
    #[error("Benchmark '{benchmark}' references unknown tag '{tag}'")]
    UnknownTag {
        /// Benchmark id
        benchmark: String,
        /// Tag as written in the definition
        tag: String,
    },

    /// Two tags share a name, or a tag reuses a special name
    #[error("Duplicate tag: {0}")]
    DuplicateTag(String),
}

/// Tag category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TagKind {
    /// Synthesized CORE / EXTENDED / NONE
    Special,
    /// Groups benchmarks by web technology
    Technology,
    /// Groups benchmarks by the kind of app they model
    App,
}

/// Externally supplied tag definition
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagDef {
    /// Canonical name (case-insensitive)
    pub name: String,
    /// Display name
    pub pretty_name: String,
    /// Category
    #[serde(rename = "type")]
    pub kind: TagKind,
}

impl TagDef {
    /// Create a tag definition
    pub fn new(name: impl Into<String>, pretty_name: impl Into<String>, kind: TagKind) -> Self {
        Self {
            name: name.into(),
            pretty_name: pretty_name.into(),
            kind,
        }
    }
}

/// A tag and its members
#[derive(Debug, Clone)]
pub struct Tag {
    name: String,
    pretty_name: String,
    kind: TagKind,
    members: Vec<usize>,
}

impl Tag {
    /// Canonical upper-case name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Display name
    pub fn pretty_name(&self) -> &str {
        &self.pretty_name
    }

    /// Category
    pub fn kind(&self) -> TagKind {
        self.kind
    }

    /// Registry indices of member benchmarks, in registry order
    pub fn members(&self) -> &[usize] {
        &self.members
    }

    /// Whether the benchmark at `index` belongs to this tag
    pub fn contains(&self, index: usize) -> bool {
        self.members.binary_search(&index).is_ok()
    }

    /// Whether this is the CORE tag
    pub fn is_core(&self) -> bool {
        self.name == CORE_TAG
    }
}

/// How much of a tag is currently enabled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagActivity {
    /// Every member enabled (for NONE: nothing enabled at all)
    Active,
    /// Some members enabled
    Partial,
    /// No member enabled
    Inactive,
}

/// Immutable tag lookup built once per session
#[derive(Debug, Clone)]
pub struct TagIndex {
    /// Tags in display order
    tags: Vec<Tag>,
    by_name: FxHashMap<String, usize>,
    /// Benchmark index → tag indices (declared tags, then CORE/EXTENDED)
    benchmark_tags: Vec<Vec<usize>>,
}

impl TagIndex {
    /// Build the index for `registry` from externally supplied tag definitions.
    pub fn new(
        registry: &Registry,
        definitions: impl IntoIterator<Item = TagDef>,
    ) -> Result<Self, TagError> {
        let core_members: Vec<usize> = registry
            .iter()
            .filter(|b| !b.is_extended())
            .map(|b| b.index())
            .collect();

        let mut tags = vec![Tag {
            name: CORE_TAG.to_string(),
            pretty_name: "Core".to_string(),
            kind: TagKind::Special,
            members: core_members,
        }];
        if registry.has_extended() {
            tags.push(Tag {
                name: EXTENDED_TAG.to_string(),
                pretty_name: "Extended".to_string(),
                kind: TagKind::Special,
                members: (0..registry.len()).collect(),
            });
        }
        tags.push(Tag {
            name: NONE_TAG.to_string(),
            pretty_name: "None".to_string(),
            kind: TagKind::Special,
            members: Vec::new(),
        });

        // Technology tags first, then everything else, each in declaration order
        let (technology, apps): (Vec<TagDef>, Vec<TagDef>) = definitions
            .into_iter()
            .partition(|d| d.kind == TagKind::Technology);

        let mut by_name: FxHashMap<String, usize> = FxHashMap::default();
        for (i, tag) in tags.iter().enumerate() {
            by_name.insert(tag.name.clone(), i);
        }
        // EXTENDED is reserved even when it is not synthesized
        let reserved = [CORE_TAG, EXTENDED_TAG, NONE_TAG];

        for def in technology.into_iter().chain(apps) {
            let name = def.name.to_uppercase();
            if reserved.contains(&name.as_str()) || by_name.contains_key(&name) {
                return Err(TagError::DuplicateTag(name));
            }
            by_name.insert(name.clone(), tags.len());
            tags.push(Tag {
                name,
                pretty_name: def.pretty_name,
                kind: def.kind,
                members: Vec::new(),
            });
        }

        let mut benchmark_tags = Vec::with_capacity(registry.len());
        for benchmark in registry {
            let mut own = Vec::with_capacity(benchmark.declared_tags().len() + 2);
            for name in benchmark.declared_tags() {
                let tag_index = by_name
                    .get(name)
                    .copied()
                    .filter(|&i| tags[i].kind != TagKind::Special)
                    .ok_or_else(|| TagError::UnknownTag {
                        benchmark: benchmark.id().to_string(),
                        tag: name.clone(),
                    })?;
                tags[tag_index].members.push(benchmark.index());
                own.push(tag_index);
            }
            if !benchmark.is_extended() {
                own.push(by_name[CORE_TAG]);
            }
            if let Some(&extended) = by_name.get(EXTENDED_TAG) {
                own.push(extended);
            }
            benchmark_tags.push(own);
        }

        Ok(Self {
            tags,
            by_name,
            benchmark_tags,
        })
    }

    /// Look up a tag by name (case-insensitive)
    pub fn get(&self, name: &str) -> Option<&Tag> {
        self.by_name
            .get(&name.to_uppercase())
            .map(|&i| &self.tags[i])
    }

    /// The CORE tag
    pub fn core(&self) -> &Tag {
        &self.tags[0]
    }

    /// The EXTENDED tag, if any benchmark is extended
    pub fn extended(&self) -> Option<&Tag> {
        self.get(EXTENDED_TAG)
    }

    /// The NONE sentinel tag
    pub fn none(&self) -> &Tag {
        let index = self.by_name[NONE_TAG];
        &self.tags[index]
    }

    /// Tags in display order: CORE, EXTENDED, NONE, technology, app
    pub fn iter(&self) -> impl Iterator<Item = &Tag> {
        self.tags.iter()
    }

    /// Number of tags, special ones included
    pub fn len(&self) -> usize {
        self.tags.len()
    }

    /// Always false: CORE and NONE are always present
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Tags of the benchmark at `index`: declared ones, then CORE/EXTENDED
    pub fn tags_of(&self, index: usize) -> impl Iterator<Item = &Tag> {
        self.benchmark_tags
            .get(index)
            .into_iter()
            .flatten()
            .map(|&i| &self.tags[i])
    }

    /// Current activity of `tag` against the registry's enabled flags
    pub fn activity(&self, tag: &Tag, registry: &Registry) -> TagActivity {
        if tag.kind == TagKind::Special && tag.members.is_empty() {
            return if registry.enabled_count() == 0 {
                TagActivity::Active
            } else {
                TagActivity::Inactive
            };
        }

        let enabled = tag
            .members
            .iter()
            .filter(|&&i| registry[i].is_enabled())
            .count();
        if enabled == tag.members.len() {
            TagActivity::Active
        } else if enabled > 0 {
            TagActivity::Partial
        } else {
            TagActivity::Inactive
        }
    }
}
