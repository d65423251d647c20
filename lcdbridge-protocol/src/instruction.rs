//! HD44780 instruction set decoding.
//!
//! Opcodes are matched by masked bit pattern, most specific first, so the
//! order of the checks in [`Instruction::decode`] is significant.

/// Opcode constants and masks
pub mod opcode {
    pub const CLEAR: u8 = 0x01;
    pub const HOME: u8 = 0x02;

    pub const ENTRY_MODE: u8 = 0x04;
    pub const ENTRY_MODE_MASK: u8 = 0xFC;
    pub const ENTRY_INCREMENT: u8 = 0x02;
    pub const ENTRY_SHIFT: u8 = 0x01;

    pub const DISPLAY_CONTROL: u8 = 0x08;
    pub const DISPLAY_CONTROL_MASK: u8 = 0xF8;
    pub const DISPLAY_ON: u8 = 0x04;
    pub const CURSOR_ON: u8 = 0x02;
    pub const BLINK_ON: u8 = 0x01;

    pub const CURSOR_SHIFT: u8 = 0x10;
    pub const CURSOR_SHIFT_MASK: u8 = 0xF0;
    pub const SHIFT_DISPLAY: u8 = 0x08;
    pub const SHIFT_RIGHT: u8 = 0x04;

    pub const FUNCTION_SET: u8 = 0x20;
    pub const FUNCTION_SET_MASK: u8 = 0xE0;
    pub const EIGHT_BIT: u8 = 0x10;
    pub const TWO_LINES: u8 = 0x08;
    pub const LARGE_FONT: u8 = 0x04;

    pub const SET_CGRAM_ADDRESS: u8 = 0x40;
    pub const SET_DDRAM_ADDRESS: u8 = 0x80;
    pub const DDRAM_ADDRESS_MASK: u8 = 0x7F;
}

use crate::glyph::CGRAM_ADDRESS_MASK;
use opcode::*;

/// A decoded HD44780 instruction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Instruction {
    /// Clear display and return home
    Clear,
    /// Return home without clearing
    Home,
    /// Cursor direction and display shift on write
    EntryMode { increment: bool, shift: bool },
    /// Display, cursor and blink enable bits
    DisplayControl {
        display: bool,
        cursor: bool,
        blink: bool,
    },
    /// Move the cursor or shift the whole display by one position
    CursorShift { display: bool, right: bool },
    /// Interface width, line count and font selection
    FunctionSet {
        eight_bit: bool,
        two_lines: bool,
        large_font: bool,
    },
    /// Select a display RAM address (7 bits)
    SetDdramAddress(u8),
    /// Select a character generator RAM address (6 bits)
    SetCgramAddress(u8),
    /// Opcode with no defined meaning (`0x00`, `0x03`)
    Unsupported(u8),
}

impl Instruction {
    /// Decode an opcode byte
    pub fn decode(value: u8) -> Self {
        if value == CLEAR {
            return Instruction::Clear;
        }
        if value == HOME {
            return Instruction::Home;
        }
        if value & ENTRY_MODE_MASK == ENTRY_MODE {
            return Instruction::EntryMode {
                increment: value & ENTRY_INCREMENT != 0,
                shift: value & ENTRY_SHIFT != 0,
            };
        }
        if value & DISPLAY_CONTROL_MASK == DISPLAY_CONTROL {
            return Instruction::DisplayControl {
                display: value & DISPLAY_ON != 0,
                cursor: value & CURSOR_ON != 0,
                blink: value & BLINK_ON != 0,
            };
        }
        if value & CURSOR_SHIFT_MASK == CURSOR_SHIFT {
            return Instruction::CursorShift {
                display: value & SHIFT_DISPLAY != 0,
                right: value & SHIFT_RIGHT != 0,
            };
        }
        if value & FUNCTION_SET_MASK == FUNCTION_SET {
            return Instruction::FunctionSet {
                eight_bit: value & EIGHT_BIT != 0,
                two_lines: value & TWO_LINES != 0,
                large_font: value & LARGE_FONT != 0,
            };
        }
        if value & SET_DDRAM_ADDRESS != 0 {
            return Instruction::SetDdramAddress(value & DDRAM_ADDRESS_MASK);
        }
        if value & SET_CGRAM_ADDRESS != 0 {
            return Instruction::SetCgramAddress(value & CGRAM_ADDRESS_MASK);
        }
        Instruction::Unsupported(value)
    }

    /// Encode back to the opcode byte
    pub fn to_byte(self) -> u8 {
        fn bit(set: bool, mask: u8) -> u8 {
            if set {
                mask
            } else {
                0
            }
        }

        match self {
            Instruction::Clear => CLEAR,
            Instruction::Home => HOME,
            Instruction::EntryMode { increment, shift } => {
                ENTRY_MODE | bit(increment, ENTRY_INCREMENT) | bit(shift, ENTRY_SHIFT)
            }
            Instruction::DisplayControl {
                display,
                cursor,
                blink,
            } => {
                DISPLAY_CONTROL
                    | bit(display, DISPLAY_ON)
                    | bit(cursor, CURSOR_ON)
                    | bit(blink, BLINK_ON)
            }
            Instruction::CursorShift { display, right } => {
                CURSOR_SHIFT | bit(display, SHIFT_DISPLAY) | bit(right, SHIFT_RIGHT)
            }
            Instruction::FunctionSet {
                eight_bit,
                two_lines,
                large_font,
            } => {
                FUNCTION_SET
                    | bit(eight_bit, EIGHT_BIT)
                    | bit(two_lines, TWO_LINES)
                    | bit(large_font, LARGE_FONT)
            }
            Instruction::SetDdramAddress(address) => {
                SET_DDRAM_ADDRESS | (address & DDRAM_ADDRESS_MASK)
            }
            Instruction::SetCgramAddress(address) => {
                SET_CGRAM_ADDRESS | (address & CGRAM_ADDRESS_MASK)
            }
            Instruction::Unsupported(value) => value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_opcodes() {
        assert_eq!(Instruction::decode(0x01), Instruction::Clear);
        assert_eq!(Instruction::decode(0x02), Instruction::Home);
        // Neither matches exactly, and no mask claims them
        assert_eq!(Instruction::decode(0x00), Instruction::Unsupported(0x00));
        assert_eq!(Instruction::decode(0x03), Instruction::Unsupported(0x03));
    }

    #[test]
    fn test_entry_mode_bits() {
        assert_eq!(
            Instruction::decode(0x06),
            Instruction::EntryMode {
                increment: true,
                shift: false
            }
        );
        assert_eq!(
            Instruction::decode(0x05),
            Instruction::EntryMode {
                increment: false,
                shift: true
            }
        );
    }

    #[test]
    fn test_display_control_bits() {
        assert_eq!(
            Instruction::decode(0x0C),
            Instruction::DisplayControl {
                display: true,
                cursor: false,
                blink: false
            }
        );
        assert_eq!(
            Instruction::decode(0x0B),
            Instruction::DisplayControl {
                display: false,
                cursor: true,
                blink: true
            }
        );
    }

    #[test]
    fn test_shift_and_function_set() {
        assert_eq!(
            Instruction::decode(0x1C),
            Instruction::CursorShift {
                display: true,
                right: true
            }
        );
        assert_eq!(
            Instruction::decode(0x38),
            Instruction::FunctionSet {
                eight_bit: true,
                two_lines: true,
                large_font: false
            }
        );
    }

    #[test]
    fn test_ddram_takes_priority_over_cgram() {
        // 0xC0 has both the DDRAM and CGRAM bits set
        assert_eq!(Instruction::decode(0xC0), Instruction::SetDdramAddress(0x40));
        assert_eq!(Instruction::decode(0x80), Instruction::SetDdramAddress(0x00));
        assert_eq!(Instruction::decode(0xFF), Instruction::SetDdramAddress(0x7F));
    }

    #[test]
    fn test_cgram_address() {
        assert_eq!(Instruction::decode(0x40), Instruction::SetCgramAddress(0x00));
        assert_eq!(Instruction::decode(0x58), Instruction::SetCgramAddress(0x18));
        assert_eq!(Instruction::decode(0x7F), Instruction::SetCgramAddress(0x3F));
    }

    #[test]
    fn test_fully_specified_opcodes_reencode() {
        // Shift and function-set ignore their two low bits, everything else
        // is lossless
        let lossless = (0x04..=0x0F).chain(0x40..=0xFF);
        for value in lossless {
            assert_eq!(Instruction::decode(value).to_byte(), value, "opcode {:#04x}", value);
        }
    }
}
