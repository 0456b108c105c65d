//! Word-per-line firmware images.
//!
//! Each line reads `@AAAAAAAA WWWWWWWW`: a hexadecimal word index followed by
//! the 32-bit word stored there. Word `n` lands at byte address `4 * n`.
//! Indices skipped between two listed words are written as zero.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::mem::{MemError, Ram};

#[derive(Error, Debug)]
pub enum HexError {
    #[error("cannot read firmware: {0}")]
    Io(#[from] std::io::Error),

    #[error("line {line}: {msg}")]
    Parse { line: usize, msg: String },

    #[error("firmware does not fit in RAM: {0}")]
    Mem(#[from] MemError),
}

fn parse_line(line: &str) -> Result<(u32, u32), String> {
    let mut fields = line.split_whitespace();
    let addr = fields.next().ok_or("missing address")?;
    let word = fields.next().ok_or("missing data word")?;
    if fields.next().is_some() {
        return Err("trailing fields".into());
    }

    let addr = addr
        .strip_prefix('@')
        .ok_or_else(|| format!("address must start with '@': {addr}"))?;
    let index = u32::from_str_radix(addr, 16).map_err(|e| format!("bad address {addr}: {e}"))?;
    let word = u32::from_str_radix(word, 16).map_err(|e| format!("bad word {word}: {e}"))?;
    Ok((index, word))
}

/// Parses an image into `(word index, word)` pairs, in file order.
pub fn parse(text: &str) -> Result<Vec<(u32, u32)>, HexError> {
    text.lines()
        .enumerate()
        .filter(|(_, l)| !l.trim().is_empty())
        .map(|(n, l)| parse_line(l).map_err(|msg| HexError::Parse { line: n + 1, msg }))
        .collect()
}

fn word_addr(index: u32) -> Result<u32, MemError> {
    index.checked_mul(4).ok_or(MemError::OutOfRange(index))
}

/// Loads an image, returning the number of words written.
pub fn load_hex_into_memory(path: &Path, mem: &mut Ram) -> Result<usize, HexError> {
    let text = fs::read_to_string(path)?;
    let words = parse(&text)?;
    let mut prev: Option<u32> = None;
    for &(index, word) in &words {
        if let Some(p) = prev {
            for gap in p.saturating_add(1)..index {
                mem.write_word(word_addr(gap)?, 0)?;
            }
        }
        mem.write_word(word_addr(index)?, word)?;
        prev = Some(index);
    }
    log::info!("loaded {} words from {}", words.len(), path.display());
    Ok(words.len())
}
