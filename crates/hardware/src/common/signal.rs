//! Out-of-band run termination.
//!
//! A [`Stop`] travels back to the driver through `Result<(), Stop>` so that `?`
//! unwinds any nesting of CPU step, bus write, sample emission and script replay.
//! It is a control outcome, not a failure: it carries no error source and does not
//! implement `std::error::Error`.

use std::fmt;

/// Reason an emulation run was cut short from inside a callback chain.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stop {
    /// The script's termination sentinel (`address == 0`, empty payload) fired.
    Script {
        /// Sample count at which the sentinel was consumed.
        samples: u64,
    },
    /// The configured sample budget was reached.
    SampleLimit {
        /// Sample count when the budget tripped.
        samples: u64,
    },
    /// The raw output stream stopped accepting bytes (e.g. a closed pipe).
    SinkClosed,
}

/// Result of any operation that may be unwound by a [`Stop`].
pub type Flow = Result<(), Stop>;

impl fmt::Display for Stop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Script { samples } => write!(f, "script end at sample {samples}"),
            Self::SampleLimit { samples } => write!(f, "sample limit reached at {samples}"),
            Self::SinkClosed => write!(f, "output stream closed"),
        }
    }
}
