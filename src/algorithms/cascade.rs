//! Transitive closure over the phase dependency graph.
//!
//! A cascading shift moves every phase whose dependency chain reaches one of
//! the directly shifted phases. The closure is computed over the arena's
//! reverse edges before anything is written, so the caller can apply the
//! whole shift set or none of it.

use crate::core::arena::PhaseArena;

/// All phase indices reachable from `seeds` via dependents, seeds included.
///
/// The result is sorted ascending so downstream application and audit order
/// are deterministic regardless of seed order.
pub fn closure(arena: &PhaseArena<'_>, seeds: &[usize]) -> Vec<usize> {
    let mut included = vec![false; arena.len()];
    let mut queue: Vec<usize> = Vec::new();

    for &seed in seeds {
        if seed < arena.len() && !included[seed] {
            included[seed] = true;
            queue.push(seed);
        }
    }

    while let Some(node) = queue.pop() {
        for &dependent in arena.dependents_of(node) {
            if !included[dependent] {
                included[dependent] = true;
                queue.push(dependent);
            }
        }
    }

    included
        .iter()
        .enumerate()
        .filter_map(|(idx, &hit)| hit.then_some(idx))
        .collect()
}
