//! Instruction decode with typed operand extraction.
//!
//! [`decode_at`] reads one instruction from a byte buffer and produces a
//! [`DecodedInstruction`] carrying the extracted operand fields, separated
//! from text rendering so the two can be tested independently. Decoding is
//! total over recognized and unrecognized bytes alike; the only fatal
//! outcome is a buffer that ends inside an instruction.

use crate::encoding::{match_opcode, Opcode};
use crate::error::DecodeError;

/// Address registers targeted by ADDH and ADNH.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[allow(missing_docs)]
pub enum AddressRegister {
    Sar,
    Dar,
}

/// Destination registers addressable by MOV.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[allow(missing_docs)]
pub enum MovRegister {
    Sar,
    Ccr,
    Dar,
    /// Reserved selector values 3..=7; renders the invalid token.
    Reserved,
}

/// Request hint carried in the low two bits of LD, ST, and LPEND.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RequestHint {
    /// No suffix: the transfer runs unconditionally.
    Unconditional,
    /// `S` suffix: single-request variant.
    Single,
    /// `B` suffix: burst-request variant.
    Burst,
    /// The reserved bit pattern `10`; renders the invalid token.
    Reserved,
}

impl RequestHint {
    /// Extracts the hint from the low two bits of the opcode byte.
    #[must_use]
    pub const fn from_low_bits(byte: u8) -> Self {
        match byte & 0x03 {
            0 => Self::Unconditional,
            1 => Self::Single,
            2 => Self::Reserved,
            _ => Self::Burst,
        }
    }
}

/// Wait kind carried in the low two bits of WFP.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum WaitKind {
    /// Wait for a single transfer request.
    Single,
    /// Wait with the peripheral choosing single or burst.
    Periph,
    /// Wait for a burst transfer request.
    Burst,
    /// The reserved bit pattern `11`; renders the invalid token.
    Reserved,
}

impl WaitKind {
    /// Extracts the kind from the low two bits of the opcode byte.
    #[must_use]
    pub const fn from_low_bits(byte: u8) -> Self {
        match byte & 0x03 {
            0 => Self::Single,
            1 => Self::Periph,
            2 => Self::Burst,
            _ => Self::Reserved,
        }
    }
}

/// Operand payload of one decoded instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InstructionBody {
    /// ADDH: add a 16-bit immediate to an address register.
    AddHalf {
        /// Destination address register.
        reg: AddressRegister,
        /// Unsigned 16-bit immediate.
        imm: u16,
    },
    /// ADNH: add a negated 16-bit immediate to an address register.
    AddNegHalf {
        /// Destination address register.
        reg: AddressRegister,
        /// Unsigned 16-bit immediate.
        imm: u16,
    },
    /// END: end of channel program.
    End,
    /// FLUSHP: flush a peripheral's request state.
    FlushPeriph {
        /// Peripheral identifier.
        periph: u8,
    },
    /// GO: start a channel program at an absolute address.
    Go {
        /// Channel identifier.
        channel: u8,
        /// Absolute start address of the channel program.
        addr: u32,
        /// Non-secure execution requested.
        non_secure: bool,
    },
    /// KILL: terminate the executing thread.
    Kill,
    /// LD family: load from the source address.
    Load {
        /// Request hint suffix.
        hint: RequestHint,
    },
    /// LDPS/LDPB: peripheral-gated load.
    LoadPeriph {
        /// Burst variant (`LDPB`) when true, single (`LDPS`) otherwise.
        burst: bool,
        /// Peripheral identifier.
        periph: u8,
    },
    /// LP: program a loop counter.
    LoopStart {
        /// Loop counter index (0 or 1).
        counter: u8,
        /// Iteration count (encoded byte plus one).
        iterations: u16,
    },
    /// LPEND family: close a loop with a backward branch.
    LoopEnd {
        /// Request hint suffix.
        hint: RequestHint,
        /// Loop-forever variant (`.FE` suffix) when true.
        forever: bool,
        /// Loop counter index (0 or 1); meaningful when not `forever`.
        counter: u8,
        /// Absolute backward branch target within the buffer.
        target: usize,
    },
    /// MOV: load a 32-bit immediate into SAR, CCR, or DAR.
    Mov {
        /// Destination register.
        reg: MovRegister,
        /// 32-bit immediate.
        imm: u32,
    },
    /// NOP.
    Nop,
    /// RMB: read memory barrier.
    ReadBarrier,
    /// SEV: signal an event.
    SendEvent {
        /// Event identifier.
        event: u8,
    },
    /// ST family: store to the destination address.
    Store {
        /// Request hint suffix.
        hint: RequestHint,
    },
    /// STPS/STPB: peripheral-gated store.
    StorePeriph {
        /// Burst variant (`STPB`) when true, single (`STPS`) otherwise.
        burst: bool,
        /// Peripheral identifier.
        periph: u8,
    },
    /// STZ: store zeros to the destination address.
    StoreZero,
    /// WFE: wait for an event.
    WaitForEvent {
        /// Event identifier.
        event: u8,
        /// The invalidate-instruction-cache marker bit was set.
        invalid_wait: bool,
    },
    /// WFP: wait for a peripheral request.
    WaitForPeriph {
        /// Wait kind operand.
        kind: WaitKind,
        /// Peripheral identifier.
        periph: u8,
    },
    /// WMB: write memory barrier.
    WriteBarrier,
    /// Unrecognized byte, rendered as a raw-data placeholder.
    Raw {
        /// The literal byte value.
        byte: u8,
    },
    /// A modifier byte violated its required-zero-bits constraint.
    Invalid,
}

/// One decoded instruction: where it starts, how many bytes it consumed,
/// and its extracted operands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DecodedInstruction {
    /// Offset of the first byte of this instruction.
    pub offset: usize,
    /// Bytes consumed, always positive.
    pub len_bytes: usize,
    /// Extracted operand payload.
    pub body: InstructionBody,
}

impl DecodedInstruction {
    /// Offset of the instruction that follows this one.
    #[must_use]
    pub const fn next_offset(&self) -> usize {
        self.offset + self.len_bytes
    }
}

fn require(buf: &[u8], offset: usize, needed: usize) -> Result<(), DecodeError> {
    let available = buf.len().saturating_sub(offset);
    if available < needed {
        return Err(DecodeError::Truncated {
            offset,
            needed,
            available,
        });
    }
    Ok(())
}

fn read_u16_le(buf: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes([buf[offset], buf[offset + 1]])
}

fn read_u32_le(buf: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        buf[offset],
        buf[offset + 1],
        buf[offset + 2],
        buf[offset + 3],
    ])
}

const fn address_register(byte: u8) -> AddressRegister {
    if byte & 0x02 != 0 {
        AddressRegister::Dar
    } else {
        AddressRegister::Sar
    }
}

/// Decodes the instruction starting at `offset`.
///
/// Reads at most 6 bytes (opcode, optional modifier, optional little-endian
/// immediate) and never indexes past the buffer end. Unrecognized opcode
/// bytes decode to [`InstructionBody::Raw`]; modifier bytes that violate a
/// required-zero-bits constraint decode to [`InstructionBody::Invalid`]
/// with a 2-byte length so the cursor resynchronizes at the next byte the
/// decoder has not inspected.
///
/// # Errors
///
/// Returns [`DecodeError::Truncated`] when fewer bytes remain than the
/// decode path needs to read.
#[allow(clippy::too_many_lines)]
pub fn decode_at(buf: &[u8], offset: usize) -> Result<DecodedInstruction, DecodeError> {
    require(buf, offset, 1)?;
    let first = buf[offset];

    let (len_bytes, body) = match match_opcode(first) {
        Opcode::AddHalf => {
            require(buf, offset, 3)?;
            (
                3,
                InstructionBody::AddHalf {
                    reg: address_register(first),
                    imm: read_u16_le(buf, offset + 1),
                },
            )
        }
        Opcode::AddNegHalf => {
            require(buf, offset, 3)?;
            (
                3,
                InstructionBody::AddNegHalf {
                    reg: address_register(first),
                    imm: read_u16_le(buf, offset + 1),
                },
            )
        }
        Opcode::End => (1, InstructionBody::End),
        Opcode::FlushPeriph => {
            require(buf, offset, 2)?;
            let modifier = buf[offset + 1];
            if modifier & 0x07 == 0 {
                (
                    2,
                    InstructionBody::FlushPeriph {
                        periph: modifier >> 3,
                    },
                )
            } else {
                (2, InstructionBody::Invalid)
            }
        }
        Opcode::Go => {
            require(buf, offset, 2)?;
            let modifier = buf[offset + 1];
            if modifier & 0x07 == 0 {
                require(buf, offset, 6)?;
                (
                    6,
                    InstructionBody::Go {
                        channel: modifier & 0x07,
                        addr: read_u32_le(buf, offset + 2),
                        non_secure: first & 0x02 != 0,
                    },
                )
            } else {
                (2, InstructionBody::Invalid)
            }
        }
        Opcode::Kill => (1, InstructionBody::Kill),
        Opcode::Load => (
            1,
            InstructionBody::Load {
                hint: RequestHint::from_low_bits(first),
            },
        ),
        Opcode::LoadPeriph => {
            require(buf, offset, 2)?;
            let modifier = buf[offset + 1];
            if modifier & 0x07 == 0 {
                (
                    2,
                    InstructionBody::LoadPeriph {
                        burst: first & 0x02 != 0,
                        periph: modifier >> 3,
                    },
                )
            } else {
                (2, InstructionBody::Invalid)
            }
        }
        Opcode::LoopStart => {
            require(buf, offset, 2)?;
            (
                2,
                InstructionBody::LoopStart {
                    counter: (first >> 1) & 0x01,
                    iterations: u16::from(buf[offset + 1]) + 1,
                },
            )
        }
        Opcode::LoopEnd => {
            require(buf, offset, 2)?;
            let backward = usize::from(buf[offset + 1]);
            (
                2,
                InstructionBody::LoopEnd {
                    hint: RequestHint::from_low_bits(first),
                    forever: first & 0x10 == 0,
                    counter: (first >> 2) & 0x01,
                    target: offset.saturating_sub(backward),
                },
            )
        }
        Opcode::Mov => {
            require(buf, offset, 2)?;
            let modifier = buf[offset + 1];
            if modifier & 0xF8 == 0 {
                require(buf, offset, 6)?;
                let reg = match modifier {
                    0 => MovRegister::Sar,
                    1 => MovRegister::Ccr,
                    2 => MovRegister::Dar,
                    _ => MovRegister::Reserved,
                };
                (
                    6,
                    InstructionBody::Mov {
                        reg,
                        imm: read_u32_le(buf, offset + 2),
                    },
                )
            } else {
                (2, InstructionBody::Invalid)
            }
        }
        Opcode::Nop => (1, InstructionBody::Nop),
        Opcode::ReadBarrier => (1, InstructionBody::ReadBarrier),
        Opcode::SendEvent => {
            require(buf, offset, 2)?;
            let modifier = buf[offset + 1];
            if modifier & 0x07 == 0 {
                (
                    2,
                    InstructionBody::SendEvent {
                        event: modifier >> 3,
                    },
                )
            } else {
                (2, InstructionBody::Invalid)
            }
        }
        Opcode::Store => (
            1,
            InstructionBody::Store {
                hint: RequestHint::from_low_bits(first),
            },
        ),
        Opcode::StorePeriph => {
            require(buf, offset, 2)?;
            let modifier = buf[offset + 1];
            if modifier & 0x07 == 0 {
                (
                    2,
                    InstructionBody::StorePeriph {
                        burst: first & 0x02 != 0,
                        periph: modifier >> 3,
                    },
                )
            } else {
                (2, InstructionBody::Invalid)
            }
        }
        Opcode::StoreZero => (1, InstructionBody::StoreZero),
        Opcode::WaitForEvent => {
            require(buf, offset, 2)?;
            let modifier = buf[offset + 1];
            if modifier & 0x05 == 0 {
                (
                    2,
                    InstructionBody::WaitForEvent {
                        event: modifier >> 3,
                        invalid_wait: modifier & 0x02 != 0,
                    },
                )
            } else {
                (2, InstructionBody::Invalid)
            }
        }
        Opcode::WaitForPeriph => {
            require(buf, offset, 2)?;
            let modifier = buf[offset + 1];
            if modifier & 0x07 == 0 {
                (
                    2,
                    InstructionBody::WaitForPeriph {
                        kind: WaitKind::from_low_bits(first),
                        periph: modifier >> 3,
                    },
                )
            } else {
                (2, InstructionBody::Invalid)
            }
        }
        Opcode::WriteBarrier => (1, InstructionBody::WriteBarrier),
        Opcode::Raw => (1, InstructionBody::Raw { byte: first }),
    };

    Ok(DecodedInstruction {
        offset,
        len_bytes,
        body,
    })
}
