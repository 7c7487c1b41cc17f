//! Channel control register decomposition and rendering.
//!
//! The CCR packs a source half (bits 0-13), a destination half (bits
//! 14-27), and an endian-swap size (bits 28-29). [`format_ccr`] renders
//! only the non-default fields, so the all-zero register produces an
//! empty string.

const HALF_MASK: u32 = 0x3FFF;

/// One 14-bit half (source or destination) of the channel control register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CcrHalf(u16);

impl CcrHalf {
    /// Source half: bits 0-13.
    #[must_use]
    pub const fn source(ccr: u32) -> Self {
        Self((ccr & HALF_MASK) as u16)
    }

    /// Destination half: bits 14-27.
    #[must_use]
    pub const fn destination(ccr: u32) -> Self {
        Self(((ccr >> 14) & HALF_MASK) as u16)
    }

    /// Fixed-address transfer mode (bit 0); incrementing is the default
    /// and renders nothing.
    #[must_use]
    pub const fn fixed_address(self) -> bool {
        self.0 & 0x0001 != 0
    }

    /// Beat size exponent (bits 1-3); a beat transfers `8 << n` bits.
    #[must_use]
    pub const fn beat_size(self) -> u8 {
        ((self.0 >> 1) & 0x0007) as u8
    }

    /// Burst length minus one (bits 4-7).
    #[must_use]
    pub const fn burst_len(self) -> u8 {
        ((self.0 >> 4) & 0x000F) as u8
    }

    /// Protection control (bits 8-10).
    #[must_use]
    pub const fn protection(self) -> u8 {
        ((self.0 >> 8) & 0x0007) as u8
    }

    /// Cache control (bits 11-13).
    #[must_use]
    pub const fn cache(self) -> u8 {
        ((self.0 >> 11) & 0x0007) as u8
    }
}

/// Endian-swap size exponent (bits 28-29) of a CCR value.
#[must_use]
pub const fn endian_swap_size(ccr: u32) -> u8 {
    ((ccr >> 28) & 0x0003) as u8
}

fn width_token(exponent: u8) -> String {
    if exponent > 4 {
        "<reserved>".to_string()
    } else {
        (8u32 << exponent).to_string()
    }
}

fn push_half_tokens(tokens: &mut Vec<String>, half: CcrHalf, prefix: char) {
    if half.burst_len() != 0 {
        tokens.push(format!("{prefix}B{}", half.burst_len() + 1));
    }
    if half.beat_size() != 0 {
        tokens.push(format!("{prefix}S{}", width_token(half.beat_size())));
    }
    if half.fixed_address() {
        tokens.push(format!("{prefix}AF"));
    }
    if half.protection() != 0 {
        tokens.push(format!("{prefix}P{}", half.protection()));
    }
    if half.cache() != 0 {
        tokens.push(format!("{prefix}C{}", half.cache()));
    }
}

/// Renders the non-default fields of a 32-bit CCR value.
///
/// Source tokens (prefix `S`) precede destination tokens (prefix `D`),
/// each half in the fixed order B, S, A, P, C; an `ES` token follows when
/// the endian-swap field is nonzero. Tokens are space-joined. Pure and
/// total; `format_ccr(0)` is the empty string.
#[must_use]
pub fn format_ccr(value: u32) -> String {
    let mut tokens = Vec::new();
    push_half_tokens(&mut tokens, CcrHalf::source(value), 'S');
    push_half_tokens(&mut tokens, CcrHalf::destination(value), 'D');
    let es = endian_swap_size(value);
    if es != 0 {
        tokens.push(format!("ES{}", width_token(es)));
    }
    tokens.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_default_register_renders_nothing() {
        assert_eq!(format_ccr(0), "");
    }

    #[test]
    fn half_views_extract_packed_fields() {
        // Source: fixed, beat 16 bits, burst 4, prot 2, cache 5.
        let src = 0b101_010_0011_001_1u32;
        let half = CcrHalf::source(src);
        assert!(half.fixed_address());
        assert_eq!(half.beat_size(), 1);
        assert_eq!(half.burst_len(), 3);
        assert_eq!(half.protection(), 2);
        assert_eq!(half.cache(), 5);
    }

    #[test]
    fn destination_half_starts_at_bit_fourteen() {
        let ccr = 0x0001u32 << 14;
        assert!(CcrHalf::destination(ccr).fixed_address());
        assert!(!CcrHalf::source(ccr).fixed_address());
    }

    #[test]
    fn token_order_is_b_s_a_p_c_per_half() {
        let src = 0b101_010_0011_001_1u32;
        assert_eq!(format_ccr(src), "SB4 SS16 SAF SP2 SC5");
        assert_eq!(format_ccr(src << 14), "DB4 DS16 DAF DP2 DC5");
    }

    #[test]
    fn source_tokens_precede_destination_tokens() {
        // Source burst 2, destination burst 16.
        let ccr = (0x1u32 << 4) | (0xFu32 << 18);
        assert_eq!(format_ccr(ccr), "SB2 DB16");
    }

    #[test]
    fn beat_size_above_four_is_reserved() {
        let ccr = 0x5u32 << 1;
        assert_eq!(format_ccr(ccr), "SS<reserved>");
        let ccr = 0x7u32 << 15;
        assert_eq!(format_ccr(ccr), "DS<reserved>");
    }

    #[test]
    fn endian_swap_token_comes_last() {
        let ccr = (0x1u32 << 4) | (0x2u32 << 28);
        assert_eq!(format_ccr(ccr), "SB2 ES32");
        assert_eq!(format_ccr(0x3u32 << 28), "ES64");
    }
}
