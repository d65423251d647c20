//! Custom glyph (CGRAM) layout.
//!
//! The HD44780 has eight programmable 5x8 glyphs. The 6-bit CGRAM address
//! selects the glyph slot in its upper three bits and the pattern row in the
//! lower three.

/// Number of programmable glyph slots
pub const GLYPH_SLOTS: usize = 8;

/// Pattern rows per glyph
pub const GLYPH_ROWS: usize = 8;

/// Only the low five bits of a pattern row are pixels
pub const GLYPH_ROW_MASK: u8 = 0x1F;

/// Mask for a CGRAM address
pub const CGRAM_ADDRESS_MASK: u8 = 0x3F;

/// One glyph: eight rows, bit 4 is the leftmost pixel
pub type GlyphBitmap = [u8; GLYPH_ROWS];

/// A blank glyph
pub const BLANK_GLYPH: GlyphBitmap = [0; GLYPH_ROWS];

/// Glyph slot addressed by a CGRAM address
pub const fn cgram_slot(address: u8) -> u8 {
    (address >> 3) & 0x07
}

/// Pattern row addressed by a CGRAM address
pub const fn cgram_row(address: u8) -> u8 {
    address & 0x07
}

/// CGRAM address of a (slot, row) pair
pub const fn cgram_address(slot: u8, row: u8) -> u8 {
    ((slot & 0x07) << 3) | (row & 0x07)
}

/// Glyph slot a character code displays, if it is a CGRAM code
///
/// Codes 8-15 alias slots 0-7 on the controller.
pub const fn glyph_slot_for_code(code: u8) -> Option<u8> {
    if code < 0x10 {
        Some(code & 0x07)
    } else {
        None
    }
}
