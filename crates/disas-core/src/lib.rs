//! Core decoder crate for the CoreLink DMA-330 disassembler.
//!
//! Two pure components: the instruction decoder, which reads one
//! channel-program instruction from a byte buffer and advances a cursor by
//! its exact byte length, and the channel control register formatter used
//! by the decoder's MOV-to-CCR rendering path. Neither holds state; a
//! driver loops [`decode_step`] (or calls [`render_listing`]) to
//! disassemble a whole buffer.

/// Ordered masked opcode rule table and first-byte classification.
pub mod encoding;
pub use encoding::{match_opcode, Opcode, OpcodeRule, OPCODE_RULE_TABLE};

/// Instruction decode with typed operand extraction.
pub mod decoder;
pub use decoder::{
    decode_at, AddressRegister, DecodedInstruction, InstructionBody, MovRegister, RequestHint,
    WaitKind,
};

/// Channel control register field view and formatter.
pub mod ccr;
pub use ccr::{endian_swap_size, format_ccr, CcrHalf};

/// Decode error taxonomy.
pub mod error;
pub use error::DecodeError;

/// Mnemonic rendering and whole-buffer listing.
pub mod disasm;
pub use disasm::{
    decode_step, disassemble, format_instruction, render_line, render_listing, INVALID_TOKEN,
    MNEMONIC_WIDTH,
};

#[cfg(test)]
use proptest as _;
#[cfg(test)]
use rstest as _;
