//! Selection Codec
//!
//! `encode` prefers a single tag that covers the enabled set exactly and
//! falls back to the shorter of the disabled/enabled id lists. `decode`
//! applies a fragment onto a registry; unknown tags and ids are ignored.

use crate::selection::select_tag;
use crate::{DISABLED_KEY, ENABLED_KEY, ENABLED_TAG_KEY};
use hornet_core::{NONE_TAG, Registry, Tag, TagIndex};
use tracing::debug;

/// One `key=value` segment of a fragment
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// `et=<tag>`: select exactly this tag
    EnabledTag(String),
    /// `e=<ids>`: disable everything, then enable these ids
    Enable(Vec<String>),
    /// `d=<ids>`: disable these ids
    Disable(Vec<String>),
    /// Any other key
    Unknown(String),
}

/// Split a fragment into segments.
///
/// A leading `#` is ignored and everything is case-folded to lower case.
/// Empty segments and empty ids are skipped.
pub fn parse_fragment(fragment: &str) -> Vec<Segment> {
    let fragment = fragment.trim_start_matches('#').to_lowercase();

    fragment
        .split('&')
        .filter(|s| !s.is_empty())
        .map(|segment| {
            let (key, value) = segment.split_once('=').unwrap_or((segment, ""));
            let ids = || -> Vec<String> {
                value
                    .split(',')
                    .filter(|id| !id.is_empty())
                    .map(str::to_string)
                    .collect()
            };
            match key {
                ENABLED_TAG_KEY => Segment::EnabledTag(value.to_string()),
                ENABLED_KEY => Segment::Enable(ids()),
                DISABLED_KEY => Segment::Disable(ids()),
                other => Segment::Unknown(other.to_string()),
            }
        })
        .collect()
}

/// Encode the registry's current selection.
pub fn encode(registry: &Registry, tags: &TagIndex) -> String {
    let enabled = registry.enabled_ids();
    if enabled.is_empty() {
        return format!("{ENABLED_TAG_KEY}={}", NONE_TAG.to_lowercase());
    }

    // Largest tag whose whole membership is enabled; earlier tags win ties
    let mut best: Option<(&Tag, usize)> = None;
    for tag in tags.iter() {
        let members = tag.members();
        if members.is_empty() {
            continue;
        }
        let coverage = members.iter().filter(|&&i| registry[i].is_enabled()).count();
        if coverage < members.len() {
            continue;
        }
        if best.is_none_or(|(_, c)| coverage > c) {
            best = Some((tag, coverage));
        }
    }

    match best {
        Some((tag, coverage)) if coverage == enabled.len() => {
            if tag.is_core() {
                String::new()
            } else {
                format!("{ENABLED_TAG_KEY}={}", tag.name().to_lowercase())
            }
        }
        _ => {
            let disabled = registry.disabled_ids();
            if disabled.is_empty() {
                String::new()
            } else if disabled.len() < enabled.len() {
                format!("{DISABLED_KEY}={}", disabled.join(","))
            } else {
                format!("{ENABLED_KEY}={}", enabled.join(","))
            }
        }
    }
}

/// Apply `fragment` onto the registry's enabled flags.
///
/// - The empty fragment (or a bare `#`) selects CORE. A fragment with no
///   usable segments, such as `&`, leaves the selection unchanged.
/// - The first `et` segment naming a known tag selects exactly that tag;
///   every other segment is then ignored.
/// - Otherwise `e` and `d` segments apply left to right: `e` disables all
///   benchmarks and enables its ids, `d` disables its ids and leaves the
///   rest as they are.
pub fn decode(fragment: &str, registry: &mut Registry, tags: &TagIndex) {
    if fragment.trim_start_matches('#').is_empty() {
        select_tag(registry, tags.core());
        return;
    }
    let segments = parse_fragment(fragment);

    for segment in &segments {
        if let Segment::EnabledTag(name) = segment {
            match tags.get(name) {
                Some(tag) => {
                    select_tag(registry, tag);
                    return;
                }
                None => debug!("ignoring unknown tag '{}' in selection", name),
            }
        }
    }

    for segment in segments {
        match segment {
            Segment::Enable(ids) => {
                registry.disable_all();
                apply_ids(registry, &ids, true);
            }
            Segment::Disable(ids) => apply_ids(registry, &ids, false),
            Segment::EnabledTag(_) => {}
            Segment::Unknown(key) => debug!("ignoring unknown selection key '{}'", key),
        }
    }
}

fn apply_ids(registry: &mut Registry, ids: &[String], enabled: bool) {
    for id in ids {
        if !registry.set_enabled(id, enabled) {
            debug!("ignoring unknown benchmark id '{}' in selection", id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hornet_core::{BenchmarkDef, TagDef, TagKind};

    fn make_def(filename: &str, tags: &[&str], extended: bool) -> BenchmarkDef {
        BenchmarkDef {
            name: filename.to_string(),
            description: String::new(),
            filename: filename.to_string(),
            runs: Vec::new(),
            weight: 1.0,
            baseline_time: 10.0,
            tags: tags.iter().map(|t| t.to_string()).collect(),
            issue_number: None,
            extended,
        }
    }

    /// a, b, c core; d, e extended. DOM = {a, b}, CANVAS = {c, d}
    fn make_suite() -> (Registry, TagIndex) {
        let registry = Registry::new(vec![
            make_def("b/a.html", &["dom"], false),
            make_def("b/b.html", &["dom"], false),
            make_def("b/c.html", &["canvas"], false),
            make_def("b/d.html", &["canvas"], true),
            make_def("b/e.html", &[], true),
        ])
        .unwrap();
        let tags = TagIndex::new(
            &registry,
            vec![
                TagDef::new("DOM", "DOM", TagKind::Technology),
                TagDef::new("CANVAS", "Canvas", TagKind::Technology),
            ],
        )
        .unwrap();
        (registry, tags)
    }

    fn enabled_mask(registry: &Registry) -> Vec<bool> {
        registry.iter().map(|b| b.is_enabled()).collect()
    }

    fn set_mask(registry: &mut Registry, mask: u32) {
        for i in 0..registry.len() {
            if let Some(b) = registry.get_mut(i) {
                b.set_enabled(mask & (1 << i) != 0);
            }
        }
    }

    #[test]
    fn test_parse_fragment() {
        let segments = parse_fragment("#E=A,,B&D=c&&x=1&et=DOM");
        assert_eq!(
            segments,
            vec![
                Segment::Enable(vec!["a".into(), "b".into()]),
                Segment::Disable(vec!["c".into()]),
                Segment::Unknown("x".into()),
                Segment::EnabledTag("dom".into()),
            ]
        );
        assert!(parse_fragment("").is_empty());
        assert!(parse_fragment("#").is_empty());
    }

    #[test]
    fn test_encode_nothing_enabled() {
        let (mut registry, tags) = make_suite();
        registry.disable_all();
        assert_eq!(encode(&registry, &tags), "et=none");
    }

    #[test]
    fn test_decode_none_disables_everything() {
        let (mut registry, tags) = make_suite();
        decode("et=none", &mut registry, &tags);
        assert_eq!(registry.enabled_count(), 0);
    }

    #[test]
    fn test_core_encodes_as_empty() {
        let (mut registry, tags) = make_suite();
        select_tag(&mut registry, tags.core());
        assert_eq!(encode(&registry, &tags), "");

        registry.enable_all();
        decode("", &mut registry, &tags);
        assert_eq!(registry.enabled_ids(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_exact_tag_encodes_as_tag() {
        let (mut registry, tags) = make_suite();
        select_tag(&mut registry, tags.get("canvas").unwrap());
        assert_eq!(encode(&registry, &tags), "et=canvas");

        registry.enable_all();
        assert_eq!(encode(&registry, &tags), "et=extended");
    }

    #[test]
    fn test_single_disabled_encodes_as_d() {
        let (mut registry, tags) = make_suite();
        registry.set_enabled("b", false);
        assert_eq!(encode(&registry, &tags), "d=b");

        let (mut fresh, _) = make_suite();
        decode("d=b", &mut fresh, &tags);
        assert_eq!(fresh.disabled_ids(), vec!["b"]);
        assert_eq!(fresh.enabled_count(), 4);
    }

    #[test]
    fn test_minority_enabled_encodes_as_e() {
        let (mut registry, tags) = make_suite();
        registry.disable_all();
        registry.set_enabled("a", true);
        registry.set_enabled("c", true);
        assert_eq!(encode(&registry, &tags), "e=a,c");
    }

    #[test]
    fn test_partial_tag_is_not_a_candidate() {
        let (mut registry, tags) = make_suite();
        // DOM fully enabled plus a stray member of CANVAS
        registry.disable_all();
        registry.set_enabled("a", true);
        registry.set_enabled("b", true);
        registry.set_enabled("d", true);
        assert_eq!(encode(&registry, &tags), "d=c,e");
    }

    #[test]
    fn test_separators_only_keep_selection() {
        let (mut registry, tags) = make_suite();
        decode("e=b,d", &mut registry, &tags);

        for fragment in ["&", "#&&", "x=1", "et=bogus"] {
            decode(fragment, &mut registry, &tags);
            assert_eq!(registry.enabled_ids(), vec!["b", "d"], "fragment '{fragment}'");
        }

        decode("#", &mut registry, &tags);
        assert_eq!(registry.enabled_ids(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_decode_first_known_tag_wins() {
        let (mut registry, tags) = make_suite();
        decode("et=bogus&et=DOM&et=canvas&d=a", &mut registry, &tags);
        assert_eq!(registry.enabled_ids(), vec!["a", "b"]);
    }

    #[test]
    fn test_decode_unknown_ids_ignored() {
        let (mut registry, tags) = make_suite();
        decode("e=zzz,c,yyy", &mut registry, &tags);
        assert_eq!(registry.enabled_ids(), vec!["c"]);
    }

    #[test]
    fn test_decode_unknown_tag_falls_through() {
        let (mut registry, tags) = make_suite();
        decode("et=bogus&d=e", &mut registry, &tags);
        assert_eq!(registry.disabled_ids(), vec!["e"]);
    }

    #[test]
    fn test_decode_segments_apply_left_to_right() {
        let (mut registry, tags) = make_suite();
        decode("e=a,b,c&d=b", &mut registry, &tags);
        assert_eq!(registry.enabled_ids(), vec!["a", "c"]);

        decode("d=a&e=a,e", &mut registry, &tags);
        assert_eq!(registry.enabled_ids(), vec!["a", "e"]);
    }

    #[test]
    fn test_decode_is_case_insensitive() {
        let (mut registry, tags) = make_suite();
        decode("#ET=Canvas", &mut registry, &tags);
        assert_eq!(registry.enabled_ids(), vec!["c", "d"]);

        decode("E=A,E", &mut registry, &tags);
        assert_eq!(registry.enabled_ids(), vec!["a", "e"]);
    }

    #[test]
    fn test_round_trip_every_partition() {
        let (mut registry, tags) = make_suite();
        let count = registry.len() as u32;

        for mask in 0..(1u32 << count) {
            set_mask(&mut registry, mask);
            let expected = enabled_mask(&registry);
            let fragment = encode(&registry, &tags);

            // Decoding starts from a freshly built registry, all enabled
            let (mut fresh, _) = make_suite();
            decode(&fragment, &mut fresh, &tags);
            assert_eq!(
                enabled_mask(&fresh),
                expected,
                "mask {mask:05b} encoded as '{fragment}'"
            );
        }
    }

    #[test]
    fn test_round_trip_without_extended() {
        let registry = Registry::new(vec![
            make_def("b/a.html", &[], false),
            make_def("b/b.html", &[], false),
            make_def("b/c.html", &[], false),
        ])
        .unwrap();
        let tags = TagIndex::new(&registry, Vec::new()).unwrap();
        let mut registry = registry;

        for mask in 0..8u32 {
            set_mask(&mut registry, mask);
            let fragment = encode(&registry, &tags);
            let mut fresh = Registry::new(vec![
                make_def("b/a.html", &[], false),
                make_def("b/b.html", &[], false),
                make_def("b/c.html", &[], false),
            ])
            .unwrap();
            decode(&fragment, &mut fresh, &tags);
            assert_eq!(enabled_mask(&fresh), enabled_mask(&registry));
        }
    }
}
