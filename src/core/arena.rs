//! Indexed phase arena with resolved dependency edges.
//!
//! Phases reference their dependency by arena index rather than by name, so
//! the graph is resolved exactly once when a timeline is loaded. The arena
//! also carries the reverse (dependents) adjacency needed for cascade walks
//! and performs depth-first cycle detection up front, turning a cyclic
//! dependency into a hard validation error instead of runaway recursion.

use crate::core::domain::Phase;

/// Structural errors in a timeline's dependency graph.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PhaseGraphError {
    #[error("phase '{phase}' depends on missing phase index {index}")]
    DanglingDependency { phase: String, index: usize },

    #[error("phase '{phase}' depends on itself")]
    SelfDependency { phase: String },

    #[error("dependency cycle through phase '{phase}'")]
    Cycle { phase: String },
}

/// A validated, index-addressed view of a snapshot's phase list.
pub struct PhaseArena<'a> {
    phases: &'a [Phase],
    dependents: Vec<Vec<usize>>,
}

impl<'a> PhaseArena<'a> {
    /// Build the arena, rejecting dangling and self dependencies.
    pub fn build(phases: &'a [Phase]) -> Result<Self, PhaseGraphError> {
        let mut dependents = vec![Vec::new(); phases.len()];
        for (idx, phase) in phases.iter().enumerate() {
            if let Some(dep) = phase.dependency {
                if dep >= phases.len() {
                    return Err(PhaseGraphError::DanglingDependency {
                        phase: phase.name.clone(),
                        index: dep,
                    });
                }
                if dep == idx {
                    return Err(PhaseGraphError::SelfDependency {
                        phase: phase.name.clone(),
                    });
                }
                dependents[dep].push(idx);
            }
        }
        Ok(Self { phases, dependents })
    }

    pub fn len(&self) -> usize {
        self.phases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phases.is_empty()
    }

    /// Phases that directly depend on the phase at `index`.
    pub fn dependents_of(&self, index: usize) -> &[usize] {
        &self.dependents[index]
    }

    /// Depth-first cycle check over the whole dependency graph.
    ///
    /// Uses the usual white/grey/black marking: a dependency edge into a
    /// grey (in-progress) node is a cycle.
    pub fn ensure_acyclic(&self) -> Result<(), PhaseGraphError> {
        #[derive(Clone, Copy, PartialEq)]
        enum Mark {
            Unvisited,
            InProgress,
            Done,
        }

        let mut marks = vec![Mark::Unvisited; self.phases.len()];

        for start in 0..self.phases.len() {
            if marks[start] != Mark::Unvisited {
                continue;
            }
            // Walk the single-parent dependency chain from `start`.
            let mut chain = Vec::new();
            let mut node = start;
            loop {
                match marks[node] {
                    Mark::Done => break,
                    Mark::InProgress => {
                        return Err(PhaseGraphError::Cycle {
                            phase: self.phases[node].name.clone(),
                        });
                    }
                    Mark::Unvisited => {
                        marks[node] = Mark::InProgress;
                        chain.push(node);
                        match self.phases[node].dependency {
                            Some(dep) => node = dep,
                            None => break,
                        }
                    }
                }
            }
            for visited in chain {
                marks[visited] = Mark::Done;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn phase(name: &str, dependency: Option<usize>) -> Phase {
        Phase {
            name: name.to_string(),
            sort_order: 0,
            start_date: None,
            end_date: None,
            dependency,
            resource: None,
        }
    }

    #[test]
    fn build_rejects_dangling_and_self_dependencies() {
        let dangling = vec![phase("A", Some(5))];
        assert!(matches!(
            PhaseArena::build(&dangling),
            Err(PhaseGraphError::DanglingDependency { index: 5, .. })
        ));

        let self_dep = vec![phase("A", Some(0))];
        assert!(matches!(
            PhaseArena::build(&self_dep),
            Err(PhaseGraphError::SelfDependency { .. })
        ));
    }

    #[test]
    fn dependents_are_reverse_edges() {
        let phases = vec![phase("A", None), phase("B", Some(0)), phase("C", Some(0))];
        let arena = PhaseArena::build(&phases).unwrap();
        assert_eq!(arena.dependents_of(0), &[1, 2]);
        assert!(arena.dependents_of(1).is_empty());
    }

    #[test]
    fn chain_is_acyclic() {
        let phases = vec![phase("A", None), phase("B", Some(0)), phase("C", Some(1))];
        let arena = PhaseArena::build(&phases).unwrap();
        assert!(arena.ensure_acyclic().is_ok());
    }

    #[test]
    fn two_node_cycle_is_detected() {
        let phases = vec![phase("A", Some(1)), phase("B", Some(0))];
        let arena = PhaseArena::build(&phases).unwrap();
        assert!(matches!(
            arena.ensure_acyclic(),
            Err(PhaseGraphError::Cycle { .. })
        ));
    }

    #[test]
    fn diamond_shares_a_dependency_without_cycling() {
        // B and C both depend on A; D depends on B.
        let phases = vec![
            phase("A", None),
            phase("B", Some(0)),
            phase("C", Some(0)),
            phase("D", Some(1)),
        ];
        let arena = PhaseArena::build(&phases).unwrap();
        assert!(arena.ensure_acyclic().is_ok());
    }
}
