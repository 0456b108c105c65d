use super::datapath::Datapath;
use super::regs::{RegIdx, RegisterFile};
use crate::mem::BusRequest;

/// Control sequencer states.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum State {
    #[default]
    FetchInstr,
    WaitInstr,
    FetchRegs,
    Execute,
    Load,
    WaitData,
    Store,
}

/// Everything one tick wants to latch, plus what it drives on the bus.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Transition {
    pub next: State,
    pub bus: BusRequest,
    /// New contents of the instruction latch.
    pub instr: Option<u32>,
    /// New `(rs1, rs2)` operand latches.
    pub operands: Option<(u32, u32)>,
    pub pc: Option<u32>,
    /// Register write; never targets x0.
    pub writeback: Option<(RegIdx, u32)>,
}

impl Transition {
    /// True when this tick closes the current instruction.
    pub fn retires(&self) -> bool {
        self.next == State::FetchInstr
    }
}

fn next_state(state: State, dp: &Datapath) -> State {
    match state {
        State::FetchInstr => State::WaitInstr,
        State::WaitInstr => State::FetchRegs,
        State::FetchRegs => State::Execute,
        State::Execute if dp.decoded.is_load() => State::Load,
        State::Execute if dp.decoded.is_store() => State::Store,
        State::Execute => State::FetchInstr,
        State::Load => State::WaitData,
        State::WaitData | State::Store => State::FetchInstr,
    }
}

fn bus_request(state: State, dp: &Datapath) -> BusRequest {
    let d = &dp.decoded;
    let addr = match state {
        State::FetchInstr | State::WaitInstr => dp.pc,
        _ if d.is_load_store() => dp.lsu.addr,
        _ => 0,
    };
    // The load strobe goes out in EXECUTE; LOAD and WAIT_DATA only wait it out.
    let read_strobe = state == State::FetchInstr || (state == State::Execute && d.is_load());
    // Operand latches are only valid from EXECUTE on, so writes wait for STORE.
    let write_mask = if state == State::Store {
        dp.lsu.store_mask
    } else {
        [false; 4]
    };

    BusRequest {
        addr,
        read_strobe,
        write_mask,
        write_data: dp.lsu.store_data,
    }
}

/// One clock of the sequencer. Pure: the caller applies the result.
pub fn step(state: State, dp: &Datapath, regs: &RegisterFile, read_data: u32) -> Transition {
    let d = &dp.decoded;

    let instr = (state == State::WaitInstr).then_some(read_data);
    let operands =
        (state == State::FetchRegs).then(|| (regs.read(d.rs1), regs.read(d.rs2)));
    let pc = (state == State::Execute && !d.is_system()).then_some(dp.next_pc.next);

    // A load also writes in EXECUTE; WAIT_DATA overwrites it with the real data.
    let writeback_en =
        (state == State::Execute && !(d.is_branch() || d.is_store())) || state == State::WaitData;
    let writeback = (writeback_en && !d.rd.is_zero()).then_some((d.rd, dp.writeback_data));

    Transition {
        next: next_state(state, dp),
        bus: bus_request(state, dp),
        instr,
        operands,
        pc,
        writeback,
    }
}
