//! # Driver Tests
//!
//! Startup ordering, the wait/interrupt protocol, batch budgets and run limits,
//! exercised with a scripted processor.

use std::io::BufWriter;

use acpsim_core::common::Stop;
use acpsim_core::config::{Config, RunConfig};
use acpsim_core::core::CpuSnapshot;
use acpsim_core::sim::driver::{Driver, RunEnd};
use acpsim_core::sim::script::{Poke, parse_script};
use acpsim_core::sim::timeline::ScriptTimeline;
use acpsim_core::soc::System;
use acpsim_core::soc::memory::MemoryImage;
use pretty_assertions::assert_eq;

use crate::common::harness::{TestContext, instruction_limit};
use crate::common::mocks::processor::{Batch, Call, ScriptedCpu};
use crate::common::mocks::sink::{ClosedSink, UnflushableSink};

fn trap_writes(values: &[u8]) -> Vec<(u16, u8)> {
    values.iter().map(|&v| (0x8000, v)).collect()
}

#[test]
fn test_wait_gets_one_request_and_clear() {
    let ctx = TestContext::new();
    let run = RunConfig {
        batch_steps: 10,
        max_instructions: Some(25),
        ..RunConfig::default()
    };
    let plan = vec![
        Batch { instructions: 1, wait: true, ..Batch::default() },
        Batch { instructions: 1, ..Batch::default() },
        Batch { instructions: 1, wait: true, ..Batch::default() },
    ];
    let (cpu, log) = ScriptedCpu::new(plan);

    let mut driver = Driver::new(ctx.system, run);
    let report = driver.run_with(move |_| cpu);

    assert_eq!(report.end, RunEnd::InstructionLimit);
    assert_eq!(report.stats.instructions, 25);
    assert_eq!(report.stats.interrupts, 2);
    assert_eq!(
        *log.borrow(),
        vec![
            Call::Batch(10),
            Call::Request,
            Call::Clear,
            Call::Batch(10),
            Call::Batch(10),
            Call::Request,
            Call::Clear,
            Call::Batch(10),
            Call::Batch(10),
            Call::Batch(2),
        ]
    );
}

#[test]
fn test_stop_inside_batch_ends_run() {
    let ctx = TestContext::new().with_script("2:0=");
    let (cpu, _log) = ScriptedCpu::new(vec![Batch {
        writes: trap_writes(&[7, 8, 9]),
        instructions: 3,
        ..Batch::default()
    }]);

    let mut driver = Driver::new(ctx.system, RunConfig::default());
    let report = driver.run_with(move |_| cpu);

    assert_eq!(report.end, RunEnd::Stopped(Stop::Script { samples: 2 }));
    assert_eq!(report.stats.samples, 2);
    assert_eq!(report.exit_code(), 0);
    assert_eq!(driver.system().clock.sink().as_slice(), &[7, 8]);
}

#[test]
fn test_sentinel_at_zero_stops_before_attach() {
    let ctx = TestContext::new().with_script("0:0x40=01\n0:0=");
    let mut driver = Driver::new(ctx.system, RunConfig::default());

    let report = driver.run_with(|_: &mut System<Vec<u8>>| -> ScriptedCpu {
        panic!("core must not be attached")
    });

    assert_eq!(report.end, RunEnd::Stopped(Stop::Script { samples: 0 }));
    assert_eq!(report.cpu, CpuSnapshot::default());
    assert_eq!(report.stats.instructions, 0);
    assert_eq!(driver.system().memory.read(0x40), 1);
}

#[test]
fn test_pokes_precede_sample_zero_replay() {
    let ctx = TestContext::new().with_script("0:0x10=22\n0:0x11=33");
    let pokes = vec![Poke::parse("0x10=11").unwrap(), Poke::parse("0x12=44").unwrap()];

    let mut driver = Driver::new(ctx.system, instruction_limit(0)).with_pokes(pokes);
    let report = driver.run::<ScriptedCpu>();

    assert_eq!(report.end, RunEnd::InstructionLimit);
    let memory = &driver.system().memory;
    assert_eq!(memory.read(0x10), 0x22);
    assert_eq!(memory.read(0x11), 0x33);
    assert_eq!(memory.read(0x12), 0x44);
}

#[test]
fn test_poke_to_trap_emits_and_replays() {
    let ctx = TestContext::new().with_script("0:0x10=22\n1:0=");
    let pokes = vec![Poke::parse("0x8000=ab").unwrap()];

    let mut driver = Driver::new(ctx.system, RunConfig::default()).with_pokes(pokes);
    let report = driver.run_with(|_: &mut System<Vec<u8>>| -> ScriptedCpu {
        panic!("core must not be attached")
    });

    assert_eq!(report.end, RunEnd::Stopped(Stop::Script { samples: 1 }));
    assert_eq!(driver.system().clock.sink().as_slice(), &[0xAB]);
    assert_eq!(driver.system().memory.read(0x10), 0x22);
}

#[test]
fn test_zero_batch_steps_runs_single_steps() {
    let ctx = TestContext::new();
    let run = RunConfig {
        batch_steps: 0,
        max_instructions: Some(2),
        ..RunConfig::default()
    };
    let (cpu, log) = ScriptedCpu::new(Vec::new());

    let mut driver = Driver::new(ctx.system, run);
    let report = driver.run_with(move |_| cpu);

    assert_eq!(report.end, RunEnd::InstructionLimit);
    assert_eq!(*log.borrow(), vec![Call::Batch(1), Call::Batch(1)]);
}

#[test]
fn test_sample_limit() {
    let run = RunConfig {
        max_samples: Some(3),
        ..RunConfig::default()
    };
    let config = Config {
        run: run.clone(),
        ..Config::default()
    };
    let ctx = TestContext::new().with_config(&config);
    let (cpu, _log) = ScriptedCpu::new(vec![Batch {
        writes: trap_writes(&[1, 2, 3, 4, 5]),
        ..Batch::default()
    }]);

    let mut driver = Driver::new(ctx.system, run);
    let report = driver.run_with(move |_| cpu);

    assert_eq!(report.end, RunEnd::Stopped(Stop::SampleLimit { samples: 3 }));
    assert_eq!(driver.system().clock.sink().as_slice(), &[1, 2, 3]);
}

#[test]
fn test_closed_sink_exit_code() {
    let system = System::new(MemoryImage::new(), ScriptTimeline::default(), ClosedSink::new(2));
    let (cpu, _log) = ScriptedCpu::new(vec![Batch {
        writes: trap_writes(&[1, 2, 3]),
        ..Batch::default()
    }]);

    let mut driver = Driver::new(system, RunConfig::default());
    let report = driver.run_with(move |_| cpu);

    assert_eq!(report.end, RunEnd::Stopped(Stop::SinkClosed));
    assert_eq!(report.exit_code(), 3);
    assert_eq!(report.stats.samples, 2);
}

#[test]
fn test_buffered_failing_sink_exit_code() {
    let sink = BufWriter::new(ClosedSink::new(0));
    let mut system = System::new(MemoryImage::new(), ScriptTimeline::default(), sink);
    system.timeline = ScriptTimeline::new(parse_script("5:0="));
    let (cpu, _log) = ScriptedCpu::new(vec![Batch {
        writes: trap_writes(&[1, 2, 3, 4, 5]),
        ..Batch::default()
    }]);

    let mut driver = Driver::new(system, RunConfig::default());
    let report = driver.run_with(move |_| cpu);

    assert_eq!(report.end, RunEnd::Stopped(Stop::SinkClosed));
    assert_eq!(report.exit_code(), 3);
    assert_eq!(report.stats.samples, 0);
}

#[test]
fn test_failed_final_flush_is_closed_sink() {
    let mut system = System::new(
        MemoryImage::new(),
        ScriptTimeline::default(),
        UnflushableSink::default(),
    );
    system.timeline = ScriptTimeline::new(parse_script("0:0="));

    let mut driver = Driver::new(system, RunConfig::default());
    let report = driver.run::<ScriptedCpu>();

    assert_eq!(report.end, RunEnd::Stopped(Stop::SinkClosed));
    assert_eq!(report.exit_code(), 3);
}

#[test]
fn test_halted_core_keeps_getting_batches() {
    let ctx = TestContext::new();
    let run = RunConfig {
        batch_steps: 10,
        max_instructions: Some(30),
        ..RunConfig::default()
    };
    let (cpu, log) = ScriptedCpu::new(vec![Batch {
        writes: trap_writes(&[7]),
        instructions: 1,
        freeze: true,
        ..Batch::default()
    }]);

    let mut driver = Driver::new(ctx.system, run);
    let report = driver.run_with(move |_| cpu);

    assert_eq!(report.end, RunEnd::InstructionLimit);
    assert!(report.cpu.freeze);
    assert_eq!(report.exit_code(), 0);
    assert_eq!(driver.system().clock.sink().as_slice(), &[7]);
    assert_eq!(
        *log.borrow(),
        vec![Call::Batch(10), Call::Batch(10), Call::Batch(10), Call::Batch(9)]
    );
}

#[test]
fn test_cycle_limit_shrinks_batches_near_the_limit() {
    let ctx = TestContext::new();
    let run = RunConfig {
        batch_steps: 10,
        max_cycles: Some(25),
        ..RunConfig::default()
    };
    let (cpu, log) = ScriptedCpu::new(Vec::new());

    let mut driver = Driver::new(ctx.system, run);
    let report = driver.run_with(move |_| cpu);

    assert_eq!(report.end, RunEnd::CycleLimit);
    assert_eq!(report.stats.cycles, 26);
    assert_eq!(report.stats.instructions, 13);
    let mut expected = vec![Call::Batch(3), Call::Batch(2)];
    expected.extend([Call::Batch(1); 8]);
    assert_eq!(*log.borrow(), expected);
}

#[test]
fn test_cycle_limit_zero() {
    let ctx = TestContext::new();
    let run = RunConfig {
        max_cycles: Some(0),
        ..RunConfig::default()
    };
    let (cpu, log) = ScriptedCpu::new(Vec::new());

    let mut driver = Driver::new(ctx.system, run);
    let report = driver.run_with(move |_| cpu);

    assert_eq!(report.end, RunEnd::CycleLimit);
    assert!(log.borrow().is_empty());
}

#[test]
fn test_seconds_limit() {
    let run = RunConfig {
        max_seconds: Some(0.001),
        ..RunConfig::default()
    };
    let config = Config {
        run: run.clone(),
        ..Config::default()
    };
    let ctx = TestContext::new().with_config(&config);
    let values: Vec<u8> = (0..60).collect();
    let (cpu, _log) = ScriptedCpu::new(vec![Batch {
        writes: trap_writes(&values),
        ..Batch::default()
    }]);

    let mut driver = Driver::new(ctx.system, run);
    let report = driver.run_with(move |_| cpu);

    assert_eq!(report.end, RunEnd::Stopped(Stop::SampleLimit { samples: 45 }));
    assert_eq!(driver.system().clock.sink().as_slice(), &values[..45]);
}

#[test]
fn test_instruction_limit_zero() {
    let ctx = TestContext::new();
    let (cpu, log) = ScriptedCpu::new(Vec::new());

    let mut driver = Driver::new(ctx.system, instruction_limit(0));
    let report = driver.run_with(move |_| cpu);

    assert_eq!(report.end, RunEnd::InstructionLimit);
    assert!(log.borrow().is_empty());
}

#[test]
fn test_report_lines() {
    let ctx = TestContext::new().with_script("0:0=");
    let mut driver = Driver::new(ctx.system, RunConfig::default());
    let text = driver.run::<ScriptedCpu>().to_string();

    assert!(text.starts_with("Stopped: script end at sample 0"));
    assert!(text.contains("Exiting after 0 cycles, 0 instructions, 0 samples"));
    assert!(text.ends_with(
        "Ran 0 cycles: A=00 X=00 Y=00 sp=00 pc=0000 st=00 freeze=0 waiting=0 illegal=0 ilsrc=0000"
    ));
}
