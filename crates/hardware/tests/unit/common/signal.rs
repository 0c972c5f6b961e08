//! # Stop Signal Tests

use acpsim_core::common::{Flow, Stop};

fn nested(depth: u32) -> Flow {
    if depth == 0 {
        return Err(Stop::Script { samples: 9 });
    }
    nested(depth - 1)?;
    panic!("unreachable after a stop");
}

#[test]
fn test_stop_unwinds_nested_frames() {
    assert_eq!(nested(50), Err(Stop::Script { samples: 9 }));
}

#[test]
fn test_stop_display() {
    assert_eq!(Stop::Script { samples: 5 }.to_string(), "script end at sample 5");
    assert_eq!(
        Stop::SampleLimit { samples: 7 }.to_string(),
        "sample limit reached at 7"
    );
    assert_eq!(Stop::SinkClosed.to_string(), "output stream closed");
}
