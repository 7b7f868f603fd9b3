//! Option labels: the 26 uppercase Latin letters, in order.

use crate::error::{BenchError, Result};

pub const LETTER_SPACE: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Index of the letter an answer starts with.
///
/// Takes the first non-whitespace character and upper-cases it, so `"A"`,
/// `"a"`, `"A)"` and `" a "` all map to `0`. Empty input, missing input and
/// anything outside the alphabet yield `None`.
pub fn letter_to_index(answer: Option<&str>) -> Option<usize> {
    let first = answer?.trim_start().chars().next()?;
    let upper = first.to_ascii_uppercase();
    if upper.is_ascii_uppercase() {
        Some((upper as u8 - b'A') as usize)
    } else {
        None
    }
}

pub fn index_to_letter(index: usize) -> Result<char> {
    LETTER_SPACE.chars().nth(index).ok_or_else(|| {
        BenchError::Configuration(format!(
            "Option index {} has no label; at most {} options are supported",
            index,
            LETTER_SPACE.len()
        ))
    })
}
