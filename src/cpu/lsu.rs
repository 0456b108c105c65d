use super::decode::{AccessWidth, Decoded};

/// Effective address: `rs1 + S-imm` for stores, `rs1 + I-imm` otherwise.
pub fn address(d: &Decoded, rs1: u32) -> u32 {
    let off = if d.is_store() { d.imm_s } else { d.imm_i };
    rs1.wrapping_add(off)
}

/// Extracts the loaded value from the raw memory word.
///
/// Only addr[1:0] is looked at; a misaligned halfword or word access simply
/// reads the lanes those bits select.
pub fn load_value(width: AccessWidth, unsigned: bool, addr: u32, word: u32) -> u32 {
    let half = if addr & 0b10 != 0 {
        (word >> 16) as u16
    } else {
        word as u16
    };
    let byte = if addr & 0b01 != 0 {
        (half >> 8) as u8
    } else {
        half as u8
    };

    match width {
        AccessWidth::Byte if unsigned => byte as u32,
        AccessWidth::Byte => byte as i8 as i32 as u32,
        AccessWidth::Half if unsigned => half as u32,
        AccessWidth::Half => half as i16 as i32 as u32,
        AccessWidth::Word => word,
    }
}

/// Places `rs2` on the write-data bus so every lane the mask may select
/// already holds the right byte.
pub fn store_data(addr: u32, rs2: u32) -> u32 {
    let [b0, b1, b2, b3] = rs2.to_le_bytes();
    let a0 = addr & 0b01 != 0;
    let a1 = addr & 0b10 != 0;

    let lane1 = if a0 { b0 } else { b1 };
    let lane2 = if a1 { b0 } else { b2 };
    let lane3 = if a0 {
        b0
    } else if a1 {
        b1
    } else {
        b3
    };
    u32::from_le_bytes([b0, lane1, lane2, lane3])
}

/// Byte-lane write enables for a store of `width` at `addr`.
pub fn store_mask(width: AccessWidth, addr: u32) -> [bool; 4] {
    match width {
        AccessWidth::Byte => {
            let mut mask = [false; 4];
            mask[(addr & 0b11) as usize] = true;
            mask
        }
        AccessWidth::Half if addr & 0b10 != 0 => [false, false, true, true],
        AccessWidth::Half => [true, true, false, false],
        AccessWidth::Word => [true; 4],
    }
}

/// Everything the load/store unit drives for one instruction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LsuResult {
    pub addr: u32,
    pub load_value: u32,
    pub store_data: u32,
    /// All false unless the instruction is a store.
    pub store_mask: [bool; 4],
}

impl LsuResult {
    pub fn compute(d: &Decoded, rs1: u32, rs2: u32, read_data: u32) -> Self {
        let addr = address(d, rs1);
        let width = d.access_width();
        let store_mask = if d.is_store() {
            store_mask(width, addr)
        } else {
            [false; 4]
        };
        Self {
            addr,
            load_value: load_value(width, d.load_unsigned(), addr, read_data),
            store_data: store_data(addr, rs2),
            store_mask,
        }
    }
}
