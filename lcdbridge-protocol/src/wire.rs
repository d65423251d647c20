//! Host byte classification.
//!
//! Byte format:
//! - `0xFE` followed by one opcode byte: HD44780 instruction
//! - `0xFD` followed by one level byte: backlight level
//! - anything else: literal data

/// Prefix announcing that the next byte is an HD44780 instruction
pub const INSTRUCTION_PREFIX: u8 = 0xFE;

/// Prefix announcing that the next byte is a backlight level
pub const BACKLIGHT_PREFIX: u8 = 0xFD;

/// A classified host byte
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HostByte {
    /// HD44780 opcode that followed [`INSTRUCTION_PREFIX`]
    Instruction(u8),
    /// Backlight level that followed [`BACKLIGHT_PREFIX`]
    Backlight(u8),
    /// Character or CGRAM pattern data
    Data(u8),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParseState {
    /// Next byte is classified on its own
    Idle,
    /// Got 0xFE, next byte is the opcode
    WaitingForInstruction,
    /// Got 0xFD, next byte is the level
    WaitingForBacklight,
}

/// State machine turning the raw host stream into [`HostByte`]s
///
/// The operand after a prefix is taken verbatim, so `FE FE` is the
/// instruction `0xFE` and `FD FE` sets the backlight to `0xFE`.
#[derive(Debug, Clone)]
pub struct ByteParser {
    state: ParseState,
}

impl Default for ByteParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ByteParser {
    /// Create a new parser
    pub const fn new() -> Self {
        Self {
            state: ParseState::Idle,
        }
    }

    /// Drop any half-received prefix
    pub fn reset(&mut self) {
        self.state = ParseState::Idle;
    }

    /// Returns true while a prefix is waiting for its operand
    pub fn is_pending(&self) -> bool {
        self.state != ParseState::Idle
    }

    /// Feed a single byte to the parser
    ///
    /// Returns `Some` when the byte completes a unit, `None` when it was a
    /// prefix and the operand is still to come.
    pub fn feed(&mut self, byte: u8) -> Option<HostByte> {
        match self.state {
            ParseState::Idle => match byte {
                INSTRUCTION_PREFIX => {
                    self.state = ParseState::WaitingForInstruction;
                    None
                }
                BACKLIGHT_PREFIX => {
                    self.state = ParseState::WaitingForBacklight;
                    None
                }
                _ => Some(HostByte::Data(byte)),
            },
            ParseState::WaitingForInstruction => {
                self.state = ParseState::Idle;
                Some(HostByte::Instruction(byte))
            }
            ParseState::WaitingForBacklight => {
                self.state = ParseState::Idle;
                Some(HostByte::Backlight(byte))
            }
        }
    }
}
