//! Tag-based selection operations

use hornet_core::{Registry, Tag};

/// Disable every benchmark, then enable exactly `tag`'s members
pub fn select_tag(registry: &mut Registry, tag: &Tag) {
    registry.disable_all();
    add_tag_to_selection(registry, tag);
}

/// Enable `tag`'s members, leaving every other benchmark as it is
pub fn add_tag_to_selection(registry: &mut Registry, tag: &Tag) {
    for &index in tag.members() {
        if let Some(benchmark) = registry.get_mut(index) {
            benchmark.set_enabled(true);
        }
    }
}
