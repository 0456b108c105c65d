use super::regs::RegIdx;

// 7-bit major opcodes (inst[6:0])
pub const OP_ALU_REG: u32 = 0b0110011;
pub const OP_ALU_IMM: u32 = 0b0010011;
pub const OP_LOAD: u32 = 0b0000011;
pub const OP_STORE: u32 = 0b0100011;
pub const OP_BRANCH: u32 = 0b1100011;
pub const OP_JAL: u32 = 0b1101111;
pub const OP_JALR: u32 = 0b1100111;
pub const OP_LUI: u32 = 0b0110111;
pub const OP_AUIPC: u32 = 0b0010111;
pub const OP_SYSTEM: u32 = 0b1110011;

/// `ADD x0, x0, x0`, the value of the instruction latch out of reset.
pub const RESET_INSTR: u32 = OP_ALU_REG;

/// Mutually exclusive opcode class of a latched instruction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OpClass {
    AluReg,
    AluImm,
    Load,
    Store,
    Branch,
    Jal,
    Jalr,
    Lui,
    Auipc,
    System,
    /// inst[6:0] matches none of the ten known opcodes; every class flag is false.
    Unknown,
}

impl OpClass {
    pub fn from_opcode(opcode: u32) -> Self {
        match opcode & 0x7f {
            OP_ALU_REG => OpClass::AluReg,
            OP_ALU_IMM => OpClass::AluImm,
            OP_LOAD => OpClass::Load,
            OP_STORE => OpClass::Store,
            OP_BRANCH => OpClass::Branch,
            OP_JAL => OpClass::Jal,
            OP_JALR => OpClass::Jalr,
            OP_LUI => OpClass::Lui,
            OP_AUIPC => OpClass::Auipc,
            OP_SYSTEM => OpClass::System,
            _ => OpClass::Unknown,
        }
    }
}

/// Memory access width, from funct3[1:0].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AccessWidth {
    Byte,
    Half,
    /// funct3[1:0] = 10, and the undefined 11 encoding falls through here too.
    Word,
}

/// Every field the datapath needs from one instruction word.
///
/// Rebuilt from the instruction latch on every tick; nothing here outlives
/// the instruction it came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Decoded {
    pub inst: u32,
    pub class: OpClass,
    pub rd: RegIdx,
    pub rs1: RegIdx,
    pub rs2: RegIdx,
    pub funct3: u8,
    pub funct7: u8,
    pub imm_u: u32,
    pub imm_i: u32,
    pub imm_s: u32,
    pub imm_b: u32,
    pub imm_j: u32,
}

fn sign_extend(value: u32, bits: u32) -> u32 {
    let shift = 32 - bits;
    (((value << shift) as i32) >> shift) as u32
}

pub fn decode(inst: u32) -> Decoded {
    let imm_u = inst & 0xffff_f000;
    let imm_i = sign_extend(inst >> 20, 12);
    let imm_s = {
        let imm4_0 = (inst >> 7) & 0x1f;
        let imm11_5 = (inst >> 25) & 0x7f;
        sign_extend((imm11_5 << 5) | imm4_0, 12)
    };
    let imm_b = {
        let imm11 = (inst >> 7) & 0x1;
        let imm4_1 = (inst >> 8) & 0xf;
        let imm10_5 = (inst >> 25) & 0x3f;
        let imm12 = (inst >> 31) & 0x1;
        sign_extend(
            (imm12 << 12) | (imm11 << 11) | (imm10_5 << 5) | (imm4_1 << 1),
            13,
        )
    };
    let imm_j = {
        let imm19_12 = (inst >> 12) & 0xff;
        let imm11 = (inst >> 20) & 0x1;
        let imm10_1 = (inst >> 21) & 0x3ff;
        let imm20 = (inst >> 31) & 0x1;
        sign_extend(
            (imm20 << 20) | (imm19_12 << 12) | (imm11 << 11) | (imm10_1 << 1),
            21,
        )
    };

    Decoded {
        inst,
        class: OpClass::from_opcode(inst),
        rd: RegIdx::from_field(inst >> 7),
        rs1: RegIdx::from_field(inst >> 15),
        rs2: RegIdx::from_field(inst >> 20),
        funct3: ((inst >> 12) & 0x7) as u8,
        funct7: ((inst >> 25) & 0x7f) as u8,
        imm_u,
        imm_i,
        imm_s,
        imm_b,
        imm_j,
    }
}

impl Decoded {
    pub fn is_alu_reg(&self) -> bool {
        self.class == OpClass::AluReg
    }

    pub fn is_alu_imm(&self) -> bool {
        self.class == OpClass::AluImm
    }

    pub fn is_load(&self) -> bool {
        self.class == OpClass::Load
    }

    pub fn is_store(&self) -> bool {
        self.class == OpClass::Store
    }

    pub fn is_branch(&self) -> bool {
        self.class == OpClass::Branch
    }

    pub fn is_jal(&self) -> bool {
        self.class == OpClass::Jal
    }

    pub fn is_jalr(&self) -> bool {
        self.class == OpClass::Jalr
    }

    pub fn is_lui(&self) -> bool {
        self.class == OpClass::Lui
    }

    pub fn is_auipc(&self) -> bool {
        self.class == OpClass::Auipc
    }

    pub fn is_system(&self) -> bool {
        self.class == OpClass::System
    }

    pub fn is_alu(&self) -> bool {
        self.is_alu_reg() || self.is_alu_imm()
    }

    pub fn is_load_store(&self) -> bool {
        self.is_load() || self.is_store()
    }

    /// CSR access (system opcode with nonzero funct3). Decoded, never acted on.
    pub fn is_csr(&self) -> bool {
        self.is_system() && self.funct3 != 0
    }

    /// The ten class flags in opcode-table order.
    pub fn class_flags(&self) -> [bool; 10] {
        [
            self.is_alu_reg(),
            self.is_alu_imm(),
            self.is_load(),
            self.is_store(),
            self.is_branch(),
            self.is_jal(),
            self.is_jalr(),
            self.is_lui(),
            self.is_auipc(),
            self.is_system(),
        ]
    }

    /// funct7[5]: selects SUB over ADD and SRA over SRL.
    pub fn funct7_bit5(&self) -> bool {
        self.funct7 & 0x20 != 0
    }

    /// Shift amount field for immediate shifts, inst[24:20].
    pub fn shamt_imm(&self) -> u32 {
        (self.inst >> 20) & 0x1f
    }

    pub fn access_width(&self) -> AccessWidth {
        match self.funct3 & 0b11 {
            0b00 => AccessWidth::Byte,
            0b01 => AccessWidth::Half,
            _ => AccessWidth::Word,
        }
    }

    /// funct3[2] set means LBU/LHU: zero-extend instead of sign-extend.
    pub fn load_unsigned(&self) -> bool {
        self.funct3 & 0b100 != 0
    }
}
