use thiserror::Error;

/// Fatal decode failures.
///
/// Malformed modifier bytes and unrecognized opcode bytes are *not* errors:
/// both decode to a renderable result and a positive cursor advance. The
/// only fatal condition is a buffer that ends inside an instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DecodeError {
    /// Fewer bytes remain than the decode path needs to read.
    #[error(
        "truncated instruction at offset {offset:#06X}: need {needed} bytes, {available} remain"
    )]
    Truncated {
        /// Offset of the instruction whose tail is missing.
        offset: usize,
        /// Bytes the decode path required from that offset.
        needed: usize,
        /// Bytes actually remaining in the buffer.
        available: usize,
    },
}
