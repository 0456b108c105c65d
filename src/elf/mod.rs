use crate::mem::{MemError, Ram};
use goblin::elf::{
    Elf,
    header::{self, ELFCLASS32, ELFDATA2LSB, EM_RISCV, ET_DYN, ET_EXEC},
};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ElfError {
    #[error("cannot read ELF: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed ELF: {0}")]
    Parse(#[from] goblin::error::Error),

    #[error("unsupported ELF: {0}")]
    Unsupported(&'static str),

    #[error("bad segment: {0}")]
    Segment(String),

    #[error("mem write failed: {0}")]
    Mem(#[from] MemError),
}

/// Copies the `PT_LOAD` segments of an RV32 ELF into RAM and returns its entry point.
pub fn load_elf_into_memory(path: &Path, mem: &mut Ram) -> Result<u32, ElfError> {
    let bytes = fs::read(path)?;
    load_elf_bytes(&bytes, mem)
}

pub fn load_elf_bytes(bytes: &[u8], mem: &mut Ram) -> Result<u32, ElfError> {
    let elf = Elf::parse(bytes)?;

    // Only little-endian RV32 executables can run on this core.
    if elf.header.e_ident[header::EI_CLASS] != ELFCLASS32 {
        return Err(ElfError::Unsupported("expected 32-bit ELF"));
    }
    if elf.header.e_ident[header::EI_DATA] != ELFDATA2LSB {
        return Err(ElfError::Unsupported("expected little-endian ELF"));
    }
    if elf.header.e_machine != EM_RISCV {
        return Err(ElfError::Unsupported("expected RISC-V ELF"));
    }
    if elf.header.e_type != ET_EXEC && elf.header.e_type != ET_DYN {
        return Err(ElfError::Unsupported(
            "not an executable (ET_EXEC/ET_DYN) image",
        ));
    }

    for ph in &elf.program_headers {
        if ph.p_type != goblin::elf::program_header::PT_LOAD {
            continue;
        }
        let file_off = ph.p_offset as usize;
        let file_sz = ph.p_filesz as usize;
        let mem_sz = ph.p_memsz as usize;

        let end = file_off
            .checked_add(file_sz)
            .ok_or_else(|| ElfError::Segment("program header file range overflow".into()))?;
        if end > bytes.len() {
            return Err(ElfError::Segment(format!(
                "segment outside file: off=0x{file_off:x} size=0x{file_sz:x}"
            )));
        }
        if mem_sz < file_sz {
            return Err(ElfError::Segment(format!(
                "p_memsz smaller than p_filesz for segment at off=0x{file_off:x}"
            )));
        }

        let vaddr = u32::try_from(ph.p_vaddr)
            .map_err(|_| ElfError::Segment(format!("vaddr 0x{:x} exceeds 32 bits", ph.p_vaddr)))?;
        if !mem.contains(vaddr, mem_sz) {
            return Err(ElfError::Segment(format!(
                "segment outside RAM: [0x{vaddr:x},0x{:x}) not within [0x{:x},0x{:x})",
                vaddr as u64 + mem_sz as u64,
                mem.base,
                mem.end_addr()
            )));
        }

        mem.write_bytes(vaddr, &bytes[file_off..end])?;

        // .bss: the tail of the segment with no file bytes behind it
        if mem_sz > file_sz {
            let zeros = vec![0u8; mem_sz - file_sz];
            mem.write_bytes(vaddr + file_sz as u32, &zeros)?;
        }
        log::info!("loaded segment [0x{vaddr:08x}, +0x{mem_sz:x})");
    }

    u32::try_from(elf.entry).map_err(|_| ElfError::Unsupported("entry point exceeds 32 bits"))
}
