use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MemError {
    #[error("address out of range: 0x{0:08x}")]
    OutOfRange(u32),
}

/// Signals the core drives toward memory for one clock.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BusRequest {
    pub addr: u32,
    pub read_strobe: bool,
    pub write_mask: [bool; 4],
    pub write_data: u32,
}

impl BusRequest {
    pub fn is_write(&self) -> bool {
        self.write_mask.iter().any(|&lane| lane)
    }

    pub fn is_idle(&self) -> bool {
        !self.read_strobe && !self.is_write()
    }
}

/// Synchronous memory with one cycle of read latency.
///
/// `read_data` is the value latched on the previous clock edge. `clock`
/// performs one edge: a strobed read latches the addressed word, and every
/// enabled write lane replaces that byte of the addressed word.
pub trait MemPort {
    fn read_data(&self) -> u32;

    fn clock(&mut self, req: &BusRequest) -> Result<(), MemError>;
}

/// Word-organised RAM. Address bits [1:0] never select anything; lanes do.
pub struct Ram {
    words: Vec<u32>,
    pub base: u32,
    read_data: u32,
}

impl Ram {
    pub fn new(base: u32, bytes: usize) -> Self {
        Self {
            words: vec![0; bytes.div_ceil(4)],
            base,
            read_data: 0,
        }
    }

    fn word_index(&self, addr: u32) -> Result<usize, MemError> {
        let off = addr.checked_sub(self.base).ok_or(MemError::OutOfRange(addr))?;
        let idx = (off >> 2) as usize;
        if idx >= self.words.len() {
            return Err(MemError::OutOfRange(addr));
        }
        Ok(idx)
    }

    pub fn size_bytes(&self) -> usize {
        self.words.len() * 4
    }

    /// One past the last byte address.
    pub fn end_addr(&self) -> u64 {
        self.base as u64 + self.size_bytes() as u64
    }

    pub fn contains(&self, addr: u32, len: usize) -> bool {
        let start = addr as u64;
        start >= self.base as u64 && start + len as u64 <= self.end_addr()
    }

    pub fn read_word(&self, addr: u32) -> Result<u32, MemError> {
        let idx = self.word_index(addr)?;
        Ok(self.words[idx])
    }

    pub fn write_word(&mut self, addr: u32, v: u32) -> Result<(), MemError> {
        let idx = self.word_index(addr)?;
        self.words[idx] = v;
        Ok(())
    }

    /// Copies consecutive words starting at `addr`.
    pub fn load_words(&mut self, addr: u32, words: &[u32]) -> Result<(), MemError> {
        if !self.contains(addr, words.len() * 4) {
            return Err(MemError::OutOfRange(addr));
        }
        let start = self.word_index(addr)?;
        self.words[start..start + words.len()].copy_from_slice(words);
        Ok(())
    }

    /// Little-endian byte copy for loaders; `addr` need not be aligned.
    pub fn write_bytes(&mut self, addr: u32, bytes: &[u8]) -> Result<(), MemError> {
        if !self.contains(addr, bytes.len()) {
            return Err(MemError::OutOfRange(addr));
        }
        for (i, &b) in bytes.iter().enumerate() {
            let a = addr.wrapping_add(i as u32);
            let idx = self.word_index(a)?;
            let shift = (a & 0b11) * 8;
            self.words[idx] = (self.words[idx] & !(0xff << shift)) | ((b as u32) << shift);
        }
        Ok(())
    }
}

impl MemPort for Ram {
    fn read_data(&self) -> u32 {
        self.read_data
    }

    fn clock(&mut self, req: &BusRequest) -> Result<(), MemError> {
        if req.is_idle() {
            return Ok(());
        }
        let idx = self.word_index(req.addr)?;

        // Read sees the word as it was before this edge's write.
        if req.read_strobe {
            self.read_data = self.words[idx];
        }

        let mut bytes = self.words[idx].to_le_bytes();
        let new = req.write_data.to_le_bytes();
        for lane in 0..4 {
            if req.write_mask[lane] {
                bytes[lane] = new[lane];
            }
        }
        self.words[idx] = u32::from_le_bytes(bytes);
        Ok(())
    }
}
