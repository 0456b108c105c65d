use super::alu::{self, AluResult};
use super::branch::NextPc;
use super::decode::{self, Decoded, OpClass};
use super::lsu::LsuResult;
use super::Cpu;

/// Combinational signals for one tick, derived from the latched state.
///
/// Evaluated in dependency order: decode, ALU, next PC, load/store, then
/// the writeback mux. Nothing here is stored across ticks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Datapath {
    pub pc: u32,
    pub decoded: Decoded,
    pub alu: AluResult,
    pub next_pc: NextPc,
    pub lsu: LsuResult,
    pub writeback_data: u32,
}

impl Datapath {
    pub fn evaluate(cpu: &Cpu, read_data: u32) -> Self {
        let decoded = decode::decode(cpu.instr);
        let alu = alu::execute(&decoded, cpu.rs1, cpu.rs2);
        let next_pc = NextPc::compute(cpu.pc, &decoded, &alu);
        let lsu = LsuResult::compute(&decoded, cpu.rs1, cpu.rs2, read_data);

        let writeback_data = match decoded.class {
            OpClass::System => 0, // no CSR file
            OpClass::Lui => decoded.imm_u,
            OpClass::Auipc => next_pc.pc_plus_imm,
            OpClass::Jal | OpClass::Jalr => next_pc.pc_plus_4,
            OpClass::Load => lsu.load_value,
            _ => alu.out,
        };

        Self {
            pc: cpu.pc,
            decoded,
            alu,
            next_pc,
            lsu,
            writeback_data,
        }
    }
}
