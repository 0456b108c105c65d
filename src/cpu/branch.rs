use super::alu::{AluResult, Comparison};
use super::decode::{Decoded, OpClass};

/// Conditional branch predicate selected by funct3.
pub fn take_branch(funct3: u8, cmp: Comparison) -> bool {
    match funct3 {
        0b000 => cmp.eq,   // BEQ
        0b001 => !cmp.eq,  // BNE
        0b100 => cmp.lt,   // BLT
        0b101 => !cmp.lt,  // BGE
        0b110 => cmp.ltu,  // BLTU
        0b111 => !cmp.ltu, // BGEU
        _ => false,
    }
}

/// Program counter candidates, computed every tick and committed only in EXECUTE.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NextPc {
    pub pc_plus_4: u32,
    /// PC-relative target: J-imm for JAL, U-imm for AUIPC, B-imm otherwise.
    pub pc_plus_imm: u32,
    pub taken: bool,
    pub next: u32,
}

impl NextPc {
    pub fn compute(pc: u32, d: &Decoded, alu: &AluResult) -> Self {
        let offset = match d.class {
            OpClass::Jal => d.imm_j,
            OpClass::Auipc => d.imm_u,
            _ => d.imm_b,
        };
        let pc_plus_imm = pc.wrapping_add(offset);
        let pc_plus_4 = pc.wrapping_add(4);
        let taken = d.is_branch() && take_branch(d.funct3, alu.cmp);

        let next = if taken || d.is_jal() {
            pc_plus_imm
        } else if d.is_jalr() {
            alu.plus & !1
        } else {
            pc_plus_4
        };

        Self {
            pc_plus_4,
            pc_plus_imm,
            taken,
            next,
        }
    }
}
