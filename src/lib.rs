//! Cycle-accurate model of a multi-cycle RV32I core.
//!
//! The core is driven one clock at a time through [`cpu::Machine::tick`]; all
//! memory traffic goes through the [`mem::MemPort`] contract.

pub mod config;
pub mod cpu;
pub mod debug;
pub mod elf;
pub mod hex;
pub mod mem;
