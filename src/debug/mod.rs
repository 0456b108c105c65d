use crate::cpu::Retired;
use crate::cpu::regs::{RegIdx, RegisterFile};

const ABI_NAMES: [&str; 32] = [
    "zero", "ra", "sp", "gp", "tp", "t0", "t1", "t2", "s0", "s1", "a0", "a1", "a2", "a3", "a4",
    "a5", "a6", "a7", "s2", "s3", "s4", "s5", "s6", "s7", "s8", "s9", "s10", "s11", "t3", "t4",
    "t5", "t6",
];

pub fn abi_name(idx: RegIdx) -> &'static str {
    ABI_NAMES[idx.index()]
}

pub fn trace(r: &Retired, writeback: Option<(RegIdx, u32)>, cycle: u64) {
    match writeback {
        Some((rd, val)) => log::debug!(
            "[{:08}] pc=0x{:08x} inst=0x{:08x} {:?} {}({})=0x{:08x}",
            cycle,
            r.pc,
            r.instr,
            r.class,
            rd,
            abi_name(rd),
            val
        ),
        None => log::debug!(
            "[{:08}] pc=0x{:08x} inst=0x{:08x} {:?}",
            cycle,
            r.pc,
            r.instr,
            r.class
        ),
    }
}

/// Four registers per line, `x5 (t0) = 0x00000005`.
pub fn format_regs(regs: &RegisterFile) -> String {
    let mut out = String::new();
    for (idx, val) in regs.iter() {
        let cell = format!("{:>3} ({:>4}) = 0x{:08x}", idx.to_string(), abi_name(idx), val);
        out.push_str(&cell);
        out.push(if idx.index() % 4 == 3 { '\n' } else { ' ' });
    }
    out
}
