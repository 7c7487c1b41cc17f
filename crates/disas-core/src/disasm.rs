//! Mnemonic rendering and whole-buffer listing.
//!
//! This module turns [`DecodedInstruction`] values into the canonical text
//! form: mnemonics left-aligned in a 14-column field ahead of their
//! operands, bare mnemonics for operand-less instructions, and the
//! `<invalid>` token for malformed modifier encodings.

use crate::ccr::format_ccr;
use crate::decoder::{
    decode_at, AddressRegister, DecodedInstruction, InstructionBody, MovRegister, RequestHint,
    WaitKind,
};
use crate::error::DecodeError;

/// Column width of the mnemonic field when operands follow.
pub const MNEMONIC_WIDTH: usize = 14;

/// Token rendered for malformed encodings and reserved operand patterns.
pub const INVALID_TOKEN: &str = "<invalid>";

const fn hint_suffix(hint: RequestHint) -> &'static str {
    match hint {
        RequestHint::Unconditional => "",
        RequestHint::Single => "S",
        RequestHint::Burst => "B",
        RequestHint::Reserved => INVALID_TOKEN,
    }
}

const fn wait_kind_name(kind: WaitKind) -> &'static str {
    match kind {
        WaitKind::Single => "single",
        WaitKind::Periph => "periph",
        WaitKind::Burst => "burst",
        WaitKind::Reserved => INVALID_TOKEN,
    }
}

const fn address_register_name(reg: AddressRegister) -> &'static str {
    match reg {
        AddressRegister::Sar => "SAR",
        AddressRegister::Dar => "DAR",
    }
}

const fn mov_register_name(reg: MovRegister) -> &'static str {
    match reg {
        MovRegister::Sar => "SAR",
        MovRegister::Ccr => "CCR",
        MovRegister::Dar => "DAR",
        MovRegister::Reserved => INVALID_TOKEN,
    }
}

fn mnemonic(body: &InstructionBody) -> String {
    match body {
        InstructionBody::AddHalf { .. } => "ADDH".to_string(),
        InstructionBody::AddNegHalf { .. } => "ADNH".to_string(),
        InstructionBody::End => "END".to_string(),
        InstructionBody::FlushPeriph { .. } => "FLUSHP".to_string(),
        InstructionBody::Go { .. } => "GO".to_string(),
        InstructionBody::Kill => "KILL".to_string(),
        InstructionBody::Load { hint } => format!("LD{}", hint_suffix(*hint)),
        InstructionBody::LoadPeriph { burst, .. } => {
            format!("LDP{}", if *burst { "B" } else { "S" })
        }
        InstructionBody::LoopStart { counter, .. } => format!("LP.{counter}"),
        InstructionBody::LoopEnd {
            hint,
            forever,
            counter,
            ..
        } => {
            let index = if *forever {
                ".FE".to_string()
            } else {
                format!(".{counter}")
            };
            format!("LPEND{}{index}", hint_suffix(*hint))
        }
        InstructionBody::Mov { .. } => "MOV".to_string(),
        InstructionBody::Nop => "NOP".to_string(),
        InstructionBody::ReadBarrier => "RMB".to_string(),
        InstructionBody::SendEvent { .. } => "SEV".to_string(),
        InstructionBody::Store { hint } => format!("ST{}", hint_suffix(*hint)),
        InstructionBody::StorePeriph { burst, .. } => {
            format!("STP{}", if *burst { "B" } else { "S" })
        }
        InstructionBody::StoreZero => "STZ".to_string(),
        InstructionBody::WaitForEvent { .. } => "WFE".to_string(),
        InstructionBody::WaitForPeriph { .. } => "WFP".to_string(),
        InstructionBody::WriteBarrier => "WMB".to_string(),
        InstructionBody::Raw { .. } => ".DCB".to_string(),
        InstructionBody::Invalid => INVALID_TOKEN.to_string(),
    }
}

fn operands(body: &InstructionBody) -> String {
    match body {
        InstructionBody::AddHalf { reg, imm } | InstructionBody::AddNegHalf { reg, imm } => {
            format!("{}, #0x{imm:X}", address_register_name(*reg))
        }
        InstructionBody::FlushPeriph { periph }
        | InstructionBody::LoadPeriph { periph, .. }
        | InstructionBody::StorePeriph { periph, .. } => format!("0x{periph:X}"),
        InstructionBody::Go {
            channel,
            addr,
            non_secure,
        } => {
            let suffix = if *non_secure { ", ns" } else { "" };
            format!("C{channel}, 0x{addr:08X}{suffix}")
        }
        InstructionBody::LoopStart { iterations, .. } => format!("0x{iterations:X}"),
        InstructionBody::LoopEnd { target, .. } => format!("{target:08X}"),
        InstructionBody::Mov { reg, imm } => match reg {
            MovRegister::Ccr => format!("CCR, {}", format_ccr(*imm)),
            _ => format!("{}, #0x{imm:08X}", mov_register_name(*reg)),
        },
        InstructionBody::SendEvent { event } => format!("0x{event:X}"),
        InstructionBody::WaitForEvent {
            event,
            invalid_wait,
        } => {
            let marker = if *invalid_wait { ", invalid" } else { "" };
            format!("0x{event:X}{marker}")
        }
        InstructionBody::WaitForPeriph { kind, periph } => {
            format!("0x{periph:X}, {}", wait_kind_name(*kind))
        }
        InstructionBody::Raw { byte } => format!("0x{byte:02X}"),
        InstructionBody::End
        | InstructionBody::Kill
        | InstructionBody::Load { .. }
        | InstructionBody::Nop
        | InstructionBody::ReadBarrier
        | InstructionBody::Store { .. }
        | InstructionBody::StoreZero
        | InstructionBody::WriteBarrier
        | InstructionBody::Invalid => String::new(),
    }
}

/// Renders one decoded instruction as mnemonic-plus-operands text.
#[must_use]
pub fn format_instruction(instruction: &DecodedInstruction) -> String {
    let mnemonic = mnemonic(&instruction.body);
    let operands = operands(&instruction.body);
    if operands.is_empty() {
        mnemonic
    } else {
        format!("{mnemonic:<width$}{operands}", width = MNEMONIC_WIDTH)
    }
}

/// Decodes one instruction and returns `(next_offset, text)`.
///
/// # Errors
///
/// Returns [`DecodeError::Truncated`] when the buffer ends inside the
/// instruction.
pub fn decode_step(buffer: &[u8], offset: usize) -> Result<(usize, String), DecodeError> {
    let instruction = decode_at(buffer, offset)?;
    Ok((instruction.next_offset(), format_instruction(&instruction)))
}

/// Decodes a buffer end to end from offset 0.
///
/// # Errors
///
/// Returns [`DecodeError::Truncated`] when the buffer ends inside the
/// trailing instruction; instructions decoded before that point are
/// discarded with it.
pub fn disassemble(buffer: &[u8]) -> Result<Vec<DecodedInstruction>, DecodeError> {
    let mut rows = Vec::new();
    let mut offset = 0;
    while offset < buffer.len() {
        let instruction = decode_at(buffer, offset)?;
        offset = instruction.next_offset();
        rows.push(instruction);
    }
    Ok(rows)
}

/// Renders one listing line: zero-padded 8-digit address, colon, text.
///
/// `base_address` offsets only the printed address, never the cursor.
#[must_use]
pub fn render_line(base_address: u64, instruction: &DecodedInstruction) -> String {
    let address = base_address.wrapping_add(instruction.offset as u64);
    format!("{address:08X}:    {}", format_instruction(instruction))
}

/// Disassembles a whole buffer into a newline-joined listing.
///
/// # Errors
///
/// Returns [`DecodeError::Truncated`] when the buffer ends inside the
/// trailing instruction.
pub fn render_listing(buffer: &[u8], base_address: u64) -> Result<String, DecodeError> {
    let rows = disassemble(buffer)?;
    let lines: Vec<String> = rows
        .iter()
        .map(|row| render_line(base_address, row))
        .collect();
    Ok(lines.join("\n"))
}
