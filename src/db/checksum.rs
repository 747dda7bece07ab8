//! Snapshot fingerprinting for idempotent stores.

use sha2::{Digest, Sha256};

use crate::core::domain::Phase;

/// SHA-256 fingerprint of a phase list.
///
/// Two snapshots with identical phases (names, order, dates, dependencies,
/// resources) produce the same checksum regardless of when they were
/// captured, which is what lets a re-seed or a re-derived snapshot be
/// recognized as already stored.
pub fn snapshot_checksum(phases: &[Phase]) -> String {
    let mut hasher = Sha256::new();
    for phase in phases {
        hasher.update(phase.name.as_bytes());
        hasher.update(phase.sort_order.to_le_bytes());
        for date in [phase.start_date, phase.end_date] {
            match date {
                Some(day) => hasher.update(day.to_string().as_bytes()),
                None => hasher.update(b"-"),
            }
        }
        match phase.dependency {
            Some(dep) => hasher.update(dep.to_le_bytes()),
            None => hasher.update(b"-"),
        }
        match phase.resource {
            Some(resource) => hasher.update(resource.0.to_le_bytes()),
            None => hasher.update(b"-"),
        }
        hasher.update(b"\x1f");
    }
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::Day;

    fn phase(name: &str, start: &str) -> Phase {
        Phase {
            name: name.to_string(),
            sort_order: 0,
            start_date: Some(Day::parse(start).unwrap()),
            end_date: Some(Day::parse(start).unwrap()),
            dependency: None,
            resource: None,
        }
    }

    #[test]
    fn identical_phase_lists_share_a_checksum() {
        let a = vec![phase("Framing", "2024-02-01")];
        let b = vec![phase("Framing", "2024-02-01")];
        assert_eq!(snapshot_checksum(&a), snapshot_checksum(&b));
    }

    #[test]
    fn a_one_day_shift_changes_the_checksum() {
        let a = vec![phase("Framing", "2024-02-01")];
        let b = vec![phase("Framing", "2024-02-02")];
        assert_ne!(snapshot_checksum(&a), snapshot_checksum(&b));
    }

    #[test]
    fn phase_order_is_part_of_the_fingerprint() {
        let a = vec![phase("Framing", "2024-02-01"), phase("Roofing", "2024-03-01")];
        let b = vec![phase("Roofing", "2024-03-01"), phase("Framing", "2024-02-01")];
        assert_ne!(snapshot_checksum(&a), snapshot_checksum(&b));
    }
}
