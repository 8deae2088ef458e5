//! Known duplicate identities in the shipped seed data.
//!
//! The second and later occurrences of a listed id are rewritten to its
//! fixed substitute so every loaded record has a unique identity.

use std::collections::HashSet;

/// `(duplicated id, substitute)` pairs.
pub const DUPLICATE_ID_REMAP: &[(&str, &str)] = &[(
    "53aaf9d4-04d3-43d3-9f40-6ce4a9282a5c",
    "1379a764-2543-45fd-a78b-8c5a65827417",
)];

/// Rewrites repeated ids found in `remap`, preserving order. The first
/// occurrence keeps its id; ids absent from `remap` are left alone even if
/// repeated.
pub fn remap_duplicate_ids<T>(
    mut items: Vec<T>,
    id_of: impl Fn(&mut T) -> &mut String,
    remap: &[(&str, &str)],
) -> Vec<T> {
    let mut seen: HashSet<String> = HashSet::new();

    for item in items.iter_mut() {
        let id = id_of(item);
        if seen.contains(id.as_str()) {
            if let Some((_, substitute)) = remap.iter().find(|(from, _)| *from == id.as_str()) {
                tracing::debug!(from = %id, to = %substitute, "remapped duplicate seed id");
                *id = (*substitute).to_string();
            }
        }
        seen.insert(id.clone());
    }

    items
}
