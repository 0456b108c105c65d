pub mod alu;
pub mod branch;
pub mod datapath;
pub mod decode;
pub mod fsm;
pub mod lsu;
pub mod regs;

use std::fmt;

use thiserror::Error;

use crate::config::Config;
use crate::mem::{MemError, MemPort, Ram};
use datapath::Datapath;
use decode::OpClass;
use fsm::{State, Transition};
use regs::RegisterFile;

// Memory port error handling macro
// Attaches the PC of the instruction in flight to a MemError
macro_rules! mem {
    ($pc:expr, $expr:expr) => {
        $expr.map_err(|err| $crate::cpu::StepError::Mem { pc: $pc, err })
    };
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StepError {
    #[error("memory error at pc=0x{pc:08x}: {err}")]
    Mem { pc: u32, err: MemError },
}

/// Why [`Machine::run`] returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Halt {
    /// A system instruction executed; the core would spin on it forever.
    System { pc: u32, instr: u32 },
    CycleLimit(u64),
}

impl fmt::Display for Halt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Halt::System { pc, instr } => {
                write!(f, "system instruction 0x{instr:08x} at pc=0x{pc:08x}")
            }
            Halt::CycleLimit(n) => write!(f, "cycle limit reached after {n} cycles"),
        }
    }
}

/// Architectural and sequencer state of the core.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cpu {
    pub regs: RegisterFile,
    pub pc: u32,
    /// Instruction latch.
    pub instr: u32,
    /// Address `instr` was fetched from. Not part of the datapath; kept for tracing.
    pub instr_pc: u32,
    pub rs1: u32,
    pub rs2: u32,
    pub state: State,
}

impl Cpu {
    pub fn new(reset_addr: u32) -> Self {
        Self {
            regs: RegisterFile::new(),
            pc: reset_addr,
            instr: decode::RESET_INSTR,
            instr_pc: reset_addr,
            rs1: 0,
            rs2: 0,
            state: State::FetchInstr,
        }
    }

    fn commit(&mut self, t: &Transition) {
        if let Some(instr) = t.instr {
            self.instr = instr;
            self.instr_pc = self.pc;
        }
        if let Some((rs1, rs2)) = t.operands {
            self.rs1 = rs1;
            self.rs2 = rs2;
        }
        if let Some(pc) = t.pc {
            self.pc = pc;
        }
        if let Some((rd, val)) = t.writeback {
            self.regs.write(rd, val);
        }
        self.state = t.next;
    }
}

/// An instruction that finished on this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Retired {
    pub pc: u32,
    pub instr: u32,
    pub class: OpClass,
}

/// What one [`Machine::tick`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickEvent {
    /// The state the sequencer was in during the tick.
    pub state: State,
    pub retired: Option<Retired>,
}

/// The core wired to its memory.
pub struct Machine<M: MemPort = Ram> {
    pub cpu: Cpu,
    pub mem: M,
    pub reset_addr: u32,
    pub stop_on_system: bool,
    pub cycles: u64,
    pub retired: u64,
}

impl Machine<Ram> {
    pub fn new(config: &Config) -> Self {
        let mut machine = Self::with_memory(
            Ram::new(config.ram_base, config.ram_bytes),
            config.reset_addr,
        );
        machine.stop_on_system = config.stop_on_system;
        machine
    }
}

impl<M: MemPort> Machine<M> {
    pub fn with_memory(mem: M, reset_addr: u32) -> Self {
        Self {
            cpu: Cpu::new(reset_addr),
            mem,
            reset_addr,
            stop_on_system: true,
            cycles: 0,
            retired: 0,
        }
    }

    /// Returns the core to its reset state. Memory is left alone.
    pub fn reset(&mut self) {
        self.cpu = Cpu::new(self.reset_addr);
        self.cycles = 0;
        self.retired = 0;
    }

    /// Advances one clock.
    pub fn tick(&mut self) -> Result<TickEvent, StepError> {
        let state = self.cpu.state;
        let read_data = self.mem.read_data();
        let dp = Datapath::evaluate(&self.cpu, read_data);
        let t = fsm::step(state, &dp, &self.cpu.regs, read_data);

        log::trace!(
            "cycle {} {:?} pc=0x{:08x} bus={:?}",
            self.cycles,
            state,
            self.cpu.pc,
            t.bus
        );

        // A fetch faults at the address being fetched, not the last instruction.
        let fault_pc = if state == State::FetchInstr {
            self.cpu.pc
        } else {
            self.cpu.instr_pc
        };
        mem!(fault_pc, self.mem.clock(&t.bus))?;

        let retired = t.retires().then(|| Retired {
            pc: self.cpu.instr_pc,
            instr: self.cpu.instr,
            class: dp.decoded.class,
        });

        self.cpu.commit(&t);
        self.cycles += 1;

        if let Some(r) = &retired {
            self.retired += 1;
            if r.class == OpClass::Unknown {
                log::warn!(
                    "unrecognized opcode 0x{:02x} at pc=0x{:08x} executed as no-op",
                    r.instr & 0x7f,
                    r.pc
                );
            }
            crate::debug::trace(r, t.writeback, self.cycles);
        }

        Ok(TickEvent { state, retired })
    }

    /// Runs until a halt condition. `max_cycles` of 0 means no limit.
    pub fn run(&mut self, max_cycles: u64) -> Result<Halt, StepError> {
        loop {
            if max_cycles > 0 && self.cycles >= max_cycles {
                return Ok(Halt::CycleLimit(self.cycles));
            }
            let ev = self.tick()?;
            if let Some(r) = ev.retired {
                if self.stop_on_system && r.class == OpClass::System {
                    let halt = Halt::System {
                        pc: r.pc,
                        instr: r.instr,
                    };
                    log::info!("halted: {halt}");
                    return Ok(halt);
                }
            }
        }
    }
}
