//! # Script Timeline Tests
//!
//! Sort order, tie handling and the forward-only cursor.

use acpsim_core::sim::script::ScriptEvent;
use acpsim_core::sim::timeline::ScriptTimeline;
use proptest::prelude::*;

fn at(due: u32, address: u16) -> ScriptEvent {
    ScriptEvent {
        due,
        address,
        payload: vec![0],
    }
}

#[test]
fn test_sorted_by_due() {
    let timeline = ScriptTimeline::new(vec![at(9, 1), at(0, 2), at(4, 3)]);
    let dues: Vec<u32> = timeline.events().iter().map(|e| e.due).collect();
    assert_eq!(dues, vec![0, 4, 9]);
}

#[test]
fn test_ties_keep_input_order() {
    let timeline = ScriptTimeline::new(vec![at(3, 1), at(1, 9), at(3, 2), at(3, 3)]);
    let addrs: Vec<u16> = timeline.events().iter().map(|e| e.address).collect();
    assert_eq!(addrs, vec![9, 1, 2, 3]);
}

#[test]
fn test_next_due_stops_at_future_event() {
    let mut timeline = ScriptTimeline::new(vec![at(0, 1), at(2, 2)]);
    assert_eq!(timeline.next_due(1), Some(0));
    assert_eq!(timeline.next_due(1), None);
    assert_eq!(timeline.cursor(), 1);
    assert_eq!(timeline.next_due(2), Some(1));
    assert_eq!(timeline.next_due(u64::MAX), None);
    assert_eq!(timeline.remaining(), 0);
}

#[test]
fn test_empty_timeline() {
    let mut timeline = ScriptTimeline::new(Vec::new());
    assert!(timeline.is_empty());
    assert_eq!(timeline.next_due(0), None);
}

#[test]
fn test_due_beyond_u32_counts() {
    let mut timeline = ScriptTimeline::new(vec![at(u32::MAX, 1)]);
    assert_eq!(timeline.next_due(u64::from(u32::MAX) - 1), None);
    assert_eq!(timeline.next_due(u64::from(u32::MAX) + 5), Some(0));
}

proptest! {
    #[test]
    fn prop_sorted_after_construction(dues in proptest::collection::vec(any::<u32>(), 0..100)) {
        let events = dues.iter().map(|&d| at(d, 0)).collect();
        let timeline = ScriptTimeline::new(events);
        for pair in timeline.events().windows(2) {
            prop_assert!(pair[0].due <= pair[1].due);
        }
    }

    #[test]
    fn prop_each_event_claimed_once_in_order(
        dues in proptest::collection::vec(0u32..50, 0..60),
        checkpoints in proptest::collection::vec(0u64..60, 1..20),
    ) {
        let mut checkpoints = checkpoints;
        checkpoints.sort_unstable();
        let mut timeline = ScriptTimeline::new(dues.iter().map(|&d| at(d, 0)).collect());

        let mut claimed = Vec::new();
        for &samples in &checkpoints {
            let before = timeline.cursor();
            while let Some(index) = timeline.next_due(samples) {
                prop_assert!(u64::from(timeline.event(index).due) <= samples);
                claimed.push(index);
            }
            prop_assert!(timeline.cursor() >= before);
        }

        let last = *checkpoints.last().unwrap();
        let expected = dues.iter().filter(|&&d| u64::from(d) <= last).count();
        prop_assert_eq!(claimed, (0..expected).collect::<Vec<_>>());
    }
}
