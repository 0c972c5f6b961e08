//! Scripted processor.
//!
//! Plays back a fixed plan of batches instead of executing code, and records every
//! call the driver makes so the wait/interrupt protocol can be asserted directly.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use acpsim_core::common::Flow;
use acpsim_core::core::{Bus, CpuSnapshot, Processor, Tally};

/// A driver call observed by [`ScriptedCpu`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Call {
    Batch(u32),
    Request,
    Clear,
}

/// What one `run_batch` call does.
#[derive(Clone, Debug, Default)]
pub struct Batch {
    /// Bus writes performed in order.
    pub writes: Vec<(u16, u8)>,
    /// Instructions charged (capped at the budget).
    pub instructions: u64,
    /// Whether the core parks at the end of the batch.
    pub wait: bool,
    /// Whether the core reports itself halted from this batch on.
    pub freeze: bool,
}

pub type CallLog = Rc<RefCell<Vec<Call>>>;

/// A processor that follows a plan. Once the plan is exhausted every batch
/// spends its whole budget doing nothing, two cycles per instruction.
#[derive(Debug)]
pub struct ScriptedCpu {
    plan: VecDeque<Batch>,
    waiting: bool,
    frozen: bool,
    log: CallLog,
}

impl ScriptedCpu {
    pub fn new(plan: Vec<Batch>) -> (Self, CallLog) {
        let log = CallLog::default();
        let cpu = Self {
            plan: plan.into(),
            waiting: false,
            frozen: false,
            log: Rc::clone(&log),
        };
        (cpu, log)
    }
}

impl Processor for ScriptedCpu {
    fn attach<B: Bus>(_bus: &mut B) -> Self {
        Self::new(Vec::new()).0
    }

    fn run_batch<B: Bus>(&mut self, bus: &mut B, max_steps: u32, tally: &mut Tally) -> Flow {
        self.log.borrow_mut().push(Call::Batch(max_steps));
        let Some(batch) = self.plan.pop_front() else {
            tally.instructions += u64::from(max_steps);
            tally.cycles += 2 * u64::from(max_steps);
            return Ok(());
        };

        let instructions = batch.instructions.min(u64::from(max_steps));
        tally.instructions += instructions;
        tally.cycles += 2 * instructions;
        for (addr, value) in batch.writes {
            bus.write(addr, value)?;
        }
        self.waiting = batch.wait;
        self.frozen |= batch.freeze;
        Ok(())
    }

    fn is_waiting(&self) -> bool {
        self.waiting
    }

    fn request_interrupt<B: Bus>(&mut self, _bus: &mut B, _tally: &mut Tally) -> Flow {
        self.log.borrow_mut().push(Call::Request);
        self.waiting = false;
        Ok(())
    }

    fn clear_interrupt(&mut self) {
        self.log.borrow_mut().push(Call::Clear);
    }

    fn snapshot(&self) -> CpuSnapshot {
        CpuSnapshot {
            waiting: self.waiting,
            freeze: self.frozen,
            ..CpuSnapshot::default()
        }
    }
}
