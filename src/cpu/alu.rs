use super::decode::Decoded;

/// Comparator outputs, shared with the branch unit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Comparison {
    pub eq: bool,
    /// Signed less-than.
    pub lt: bool,
    /// Unsigned less-than (borrow out of `in1 - in2`).
    pub ltu: bool,
}

impl Comparison {
    pub fn of(in1: u32, in2: u32) -> Self {
        // 33-bit subtraction: bit 32 of the result is the borrow.
        let minus = (in1 as u64).wrapping_sub(in2 as u64);
        let eq = minus as u32 == 0;
        let ltu = (minus >> 32) & 1 != 0;
        // Operands of different sign: the negative one is smaller.
        let lt = if (in1 ^ in2) >> 31 != 0 {
            in1 >> 31 != 0
        } else {
            ltu
        };
        Self { eq, lt, ltu }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AluResult {
    pub out: u32,
    /// Raw adder output, `in1 + in2`. JALR targets come from here.
    pub plus: u32,
    pub cmp: Comparison,
}

/// Operand selection: `(in1, in2, shamt)`.
///
/// Register-register and branch instructions compare/combine `rs2`; all
/// others use the I-immediate. Register shifts take `rs2[4:0]`, immediate
/// shifts take inst[24:20].
pub fn operands(d: &Decoded, rs1: u32, rs2: u32) -> (u32, u32, u32) {
    let in2 = if d.is_alu_reg() || d.is_branch() {
        rs2
    } else {
        d.imm_i
    };
    let shamt = if d.is_alu_reg() {
        rs2 & 0x1f
    } else {
        d.shamt_imm()
    };
    (rs1, in2, shamt)
}

pub fn execute(d: &Decoded, rs1: u32, rs2: u32) -> AluResult {
    let (in1, in2, shamt) = operands(d, rs1, rs2);
    let plus = in1.wrapping_add(in2);
    let cmp = Comparison::of(in1, in2);

    // inst[5] separates OP (0110011) from OP-IMM (0010011), so ADDI never subtracts.
    let subtract = d.funct7_bit5() && d.inst & 0x20 != 0;

    let out = match d.funct3 {
        0b000 if subtract => in1.wrapping_sub(in2),
        0b000 => plus,
        0b001 => in1 << shamt,
        0b010 => cmp.lt as u32,
        0b011 => cmp.ltu as u32,
        0b100 => in1 ^ in2,
        0b101 if d.funct7_bit5() => ((in1 as i32) >> shamt) as u32,
        0b101 => in1 >> shamt,
        0b110 => in1 | in2,
        _ => in1 & in2,
    };

    AluResult { out, plus, cmp }
}
