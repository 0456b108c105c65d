use std::fmt;

/// A register number, guaranteed to be in `0..32`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RegIdx(u8);

impl RegIdx {
    pub const ZERO: RegIdx = RegIdx(0);

    pub fn new(idx: u8) -> Option<Self> {
        (idx < 32).then_some(Self(idx))
    }

    /// Takes the low five bits of an instruction field.
    pub(crate) fn from_field(field: u32) -> Self {
        Self((field & 0x1f) as u8)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for RegIdx {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "x{}", self.0)
    }
}

/// 32 general-purpose registers. `x0` reads as zero and ignores writes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RegisterFile {
    regs: [u32; 32],
}

impl RegisterFile {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn read(&self, idx: RegIdx) -> u32 {
        self.regs[idx.index()]
    }

    pub fn write(&mut self, idx: RegIdx, val: u32) {
        if !idx.is_zero() {
            self.regs[idx.index()] = val;
        } // x0 hardwired
    }

    pub fn reset(&mut self) {
        self.regs = [0; 32];
    }

    pub fn iter(&self) -> impl Iterator<Item = (RegIdx, u32)> + '_ {
        self.regs
            .iter()
            .enumerate()
            .map(|(i, &v)| (RegIdx::from_field(i as u32), v))
    }
}
