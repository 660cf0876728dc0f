// SPDX-License-Identifier: MIT

//! Seed/live event merge.

use crate::models::Event;
use std::collections::HashSet;

/// Merge the fixed seed set with a live snapshot.
///
/// A live event with a title equal to a seed title is the same logical entity
/// and the live version is authoritative, so the seed copy is suppressed. The
/// result is the non-suppressed seed entries in their original order, followed
/// by the live entries in store order; live entries are not re-sorted against
/// the seed. Applying the same snapshot twice yields the same list.
pub fn merge_with_seed(seed: &[Event], live: &[Event]) -> Vec<Event> {
    let live_titles: HashSet<&str> = live.iter().map(|e| e.title.as_str()).collect();

    seed.iter()
        .filter(|e| !live_titles.contains(e.title.as_str()))
        .chain(live.iter())
        .cloned()
        .collect()
}
