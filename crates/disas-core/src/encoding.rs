//! First-byte classification for DMA-330 channel-program instructions.
//!
//! Classification is a single ordered table of masked predicates. Rules may
//! overlap; the first matching rule wins, and the final catch-all rule
//! matches every byte, so classification is total over all 256 values.

/// Instruction families of the DMA-330 channel-program instruction set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[allow(missing_docs)]
pub enum Opcode {
    AddHalf,
    AddNegHalf,
    End,
    FlushPeriph,
    Go,
    Kill,
    Load,
    LoadPeriph,
    LoopStart,
    LoopEnd,
    Mov,
    Nop,
    ReadBarrier,
    SendEvent,
    Store,
    StorePeriph,
    StoreZero,
    WaitForEvent,
    WaitForPeriph,
    WriteBarrier,
    Raw,
}

impl Opcode {
    /// Declared byte length of a well-formed instruction of this family,
    /// counting the opcode byte, the modifier byte, and any immediate.
    #[must_use]
    pub const fn nominal_len(self) -> usize {
        match self {
            Self::End
            | Self::Kill
            | Self::Load
            | Self::Nop
            | Self::ReadBarrier
            | Self::Store
            | Self::StoreZero
            | Self::WriteBarrier
            | Self::Raw => 1,
            Self::FlushPeriph
            | Self::LoadPeriph
            | Self::LoopStart
            | Self::LoopEnd
            | Self::SendEvent
            | Self::StorePeriph
            | Self::WaitForEvent
            | Self::WaitForPeriph => 2,
            Self::AddHalf | Self::AddNegHalf => 3,
            Self::Go | Self::Mov => 6,
        }
    }
}

/// A single masked predicate over the first instruction byte.
///
/// A rule matches when `byte & mask == value`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpcodeRule {
    /// Bits of the first byte the rule constrains.
    pub mask: u8,
    /// Required value of the constrained bits.
    pub value: u8,
    /// Instruction family selected by this rule.
    pub opcode: Opcode,
}

impl OpcodeRule {
    const fn new(mask: u8, value: u8, opcode: Opcode) -> Self {
        Self {
            mask,
            value,
            opcode,
        }
    }

    /// Returns true if the first byte satisfies this rule's predicate.
    #[must_use]
    pub const fn matches(&self, byte: u8) -> bool {
        byte & self.mask == self.value
    }
}

/// Single source-of-truth opcode rule table, in match priority order.
///
/// `LoopEnd` occupies two rows: its match set (`byte & 0xE8 == 0x28`, minus
/// the values with bit 4 clear and bit 0 set that encode STP) is not
/// expressible as one mask/value pair. The final row is the universal
/// catch-all for raw data bytes.
pub const OPCODE_RULE_TABLE: &[OpcodeRule] = &[
    OpcodeRule::new(0xFD, 0x54, Opcode::AddHalf),
    OpcodeRule::new(0xFD, 0x5C, Opcode::AddNegHalf),
    OpcodeRule::new(0xFF, 0x00, Opcode::End),
    OpcodeRule::new(0xFF, 0x35, Opcode::FlushPeriph),
    OpcodeRule::new(0xFD, 0xA0, Opcode::Go),
    OpcodeRule::new(0xFF, 0x01, Opcode::Kill),
    OpcodeRule::new(0xFC, 0x04, Opcode::Load),
    OpcodeRule::new(0xFD, 0x25, Opcode::LoadPeriph),
    OpcodeRule::new(0xFD, 0x20, Opcode::LoopStart),
    OpcodeRule::new(0xE9, 0x28, Opcode::LoopEnd),
    OpcodeRule::new(0xF9, 0x39, Opcode::LoopEnd),
    OpcodeRule::new(0xFF, 0xBC, Opcode::Mov),
    OpcodeRule::new(0xFF, 0x18, Opcode::Nop),
    OpcodeRule::new(0xFF, 0x12, Opcode::ReadBarrier),
    OpcodeRule::new(0xFF, 0x34, Opcode::SendEvent),
    OpcodeRule::new(0xFC, 0x08, Opcode::Store),
    OpcodeRule::new(0xFD, 0x29, Opcode::StorePeriph),
    OpcodeRule::new(0xFF, 0x0C, Opcode::StoreZero),
    OpcodeRule::new(0xFF, 0x36, Opcode::WaitForEvent),
    OpcodeRule::new(0xFC, 0x30, Opcode::WaitForPeriph),
    OpcodeRule::new(0xFF, 0x13, Opcode::WriteBarrier),
    OpcodeRule::new(0x00, 0x00, Opcode::Raw),
];

/// Classifies the first byte of an instruction.
///
/// Evaluates the rule table in priority order and returns the first match.
/// Total: the catch-all rule guarantees a result for every byte value.
#[must_use]
pub fn match_opcode(byte: u8) -> Opcode {
    OPCODE_RULE_TABLE
        .iter()
        .find(|rule| rule.matches(byte))
        .map_or(Opcode::Raw, |rule| rule.opcode)
}
