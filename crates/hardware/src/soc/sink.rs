//! Sample clock and raw output sink.
//!
//! Every byte written to the sample trap goes out here verbatim, in emission
//! order, and advances the clock by exactly one. Nothing is left in a sink
//! buffer between samples. The clock is the shared timebase the script
//! timeline is keyed on.

use std::io::Write;

use crate::common::{Flow, Stop};

/// Monotonic sample counter bound to a raw byte sink.
#[derive(Debug)]
pub struct SampleClock<W> {
    out: W,
    samples: u64,
    limit: Option<u64>,
}

impl<W: Write> SampleClock<W> {
    /// Creates a clock at sample zero writing to `out`.
    pub const fn new(out: W) -> Self {
        Self {
            out,
            samples: 0,
            limit: None,
        }
    }

    /// Sets a sample budget; see [`check_limit`](Self::check_limit).
    pub fn with_limit(mut self, limit: Option<u64>) -> Self {
        self.limit = limit;
        self
    }

    /// Number of samples emitted so far.
    #[inline(always)]
    pub const fn samples(&self) -> u64 {
        self.samples
    }

    /// Writes one sample and advances the clock.
    ///
    /// The byte is written and the sink flushed before the clock advances, so a
    /// buffered sink holds nothing back between samples. A sink that refuses
    /// either ends the run with [`Stop::SinkClosed`] and the clock stays put.
    pub fn tick(&mut self, sample: u8) -> Flow {
        if let Err(e) = self.out.write_all(&[sample]).and_then(|()| self.out.flush()) {
            tracing::error!("sample sink failed at sample {}: {e}", self.samples);
            return Err(Stop::SinkClosed);
        }
        self.samples += 1;
        Ok(())
    }

    /// Raises [`Stop::SampleLimit`] once the budget has been reached.
    pub fn check_limit(&self) -> Flow {
        match self.limit {
            Some(limit) if self.samples >= limit => Err(Stop::SampleLimit {
                samples: self.samples,
            }),
            _ => Ok(()),
        }
    }

    /// Flushes the sink; the driver treats a failure here as a closed sink.
    pub fn flush(&mut self) -> std::io::Result<()> {
        self.out.flush()
    }

    /// Returns the sink.
    pub const fn sink(&self) -> &W {
        &self.out
    }

    /// Consumes the clock and returns the sink.
    pub fn into_sink(self) -> W {
        self.out
    }
}
