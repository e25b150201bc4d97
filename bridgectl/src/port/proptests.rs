//! Property-based tests for port types and the sequential prober.

use std::collections::HashSet;

use proptest::prelude::*;

use super::occupancy::{MockOccupancyChecker, PortOccupancyChecker};
use super::prober::PortProber;
use super::{Port, PortRange};

const MIN_VALID_PORT: u16 = Port::MIN;
const MAX_VALID_PORT: u16 = Port::MAX;

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 2000,
        .. ProptestConfig::default()
    })]

    #[test]
    fn port_accepts_every_nonzero_value(value in MIN_VALID_PORT..=MAX_VALID_PORT) {
        let port = Port::try_from(value);
        prop_assert!(port.is_ok());
        prop_assert_eq!(port.unwrap().value(), value);
    }

    #[test]
    fn window_never_exceeds_limit(start in MIN_VALID_PORT..=MAX_VALID_PORT, limit in 1u16..=u16::MAX) {
        let range = PortRange::starting_at(Port::try_from(start).unwrap(), limit).unwrap();
        prop_assert_eq!(range.min().value(), start);
        prop_assert!(range.len() <= u32::from(limit));
        prop_assert_eq!(range.iter().count() as u32, range.len());
    }

    #[test]
    fn result_is_first_free_at_or_above_base(
        base in 1u16..=60000,
        occupied_offsets in prop::collection::hash_set(0u16..64, 0..48),
    ) {
        let base_port = Port::try_from(base).unwrap();
        let checker = MockOccupancyChecker::from_ports(occupied_offsets.iter().map(|o| base + o));
        let prober = PortProber::new(checker, base_port, 1000).unwrap();

        let found = prober.find_available().unwrap();
        prop_assert!(found >= base_port);
        prop_assert!(!prober.checker().is_occupied(found).unwrap());

        let skipped = found.value() - base;
        for offset in 0..skipped {
            prop_assert!(occupied_offsets.contains(&offset));
        }
    }

    #[test]
    fn free_base_is_returned_unchanged(base in 1u16..=MAX_VALID_PORT) {
        let base_port = Port::try_from(base).unwrap();
        let prober = PortProber::new(MockOccupancyChecker::empty(), base_port, 1000).unwrap();
        prop_assert_eq!(prober.find_available().unwrap(), base_port);
    }

    #[test]
    fn occupied_run_then_free(base in 1u16..=60000, run in 0u16..200) {
        let checker = MockOccupancyChecker::from_ports(base..base + run);
        let prober = PortProber::new(checker, Port::try_from(base).unwrap(), 1000).unwrap();
        prop_assert_eq!(prober.find_available().unwrap().value(), base + run);
    }

    #[test]
    fn fully_occupied_window_is_exhausted(base in 1u16..=60000, limit in 1u16..50) {
        let occupied: HashSet<Port> = (base..base + limit)
            .map(|p| Port::try_from(p).unwrap())
            .collect();
        let prober = PortProber::new(
            MockOccupancyChecker::new(occupied),
            Port::try_from(base).unwrap(),
            limit,
        ).unwrap();
        prop_assert!(prober.find_available().unwrap_err().is_exhaustion());
    }
}
