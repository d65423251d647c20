//! HD44780 instruction translation
//!
//! Replays the host's HD44780 instruction stream against any
//! [`CharDisplay`]. The translator keeps the controller's register model
//! (entry mode, DDRAM/CGRAM address, display control bits) and turns it into
//! explicit cursor positions, so backends never have to emulate HD44780
//! addressing themselves.

use lcdbridge_protocol::glyph::{
    cgram_row, cgram_slot, BLANK_GLYPH, CGRAM_ADDRESS_MASK, GLYPH_ROW_MASK,
};
use lcdbridge_protocol::{Geometry, GlyphBitmap, Instruction, Position, GLYPH_SLOTS};

use crate::traits::CharDisplay;

/// HD44780 register model driving a [`CharDisplay`]
///
/// The translator does not own the display; every call borrows it so the
/// session can keep a single owner.
#[derive(Debug, Clone)]
pub struct Hd44780Translator {
    geometry: Geometry,
    increment: bool,
    shift_on_write: bool,
    display_enabled: bool,
    cursor_enabled: bool,
    blink_enabled: bool,
    ddram_address: u8,
    cursor: Position,
    cgram_active: bool,
    cgram_address: u8,
    cgram_cache: [GlyphBitmap; GLYPH_SLOTS],
}

impl Hd44780Translator {
    pub fn new(geometry: Geometry) -> Self {
        Self {
            geometry: geometry.fit(),
            increment: true,
            shift_on_write: false,
            display_enabled: true,
            cursor_enabled: false,
            blink_enabled: false,
            ddram_address: 0,
            cursor: Position::ORIGIN,
            cgram_active: false,
            cgram_address: 0,
            cgram_cache: [BLANK_GLYPH; GLYPH_SLOTS],
        }
    }

    /// Restore power-on register state
    ///
    /// Call on every host reconnect. The glyph cache is blanked too.
    pub fn reset(&mut self) {
        *self = Self::new(self.geometry);
    }

    /// Change the panel geometry, which also resets all state
    pub fn set_geometry(&mut self, geometry: Geometry) {
        *self = Self::new(geometry);
    }

    /// Handle the operand of an instruction-prefix byte
    pub fn handle_command<D: CharDisplay + ?Sized>(&mut self, display: &mut D, value: u8) {
        match Instruction::decode(value) {
            Instruction::Clear => {
                self.cgram_active = false;
                display.clear();
                display.home();
                self.ddram_address = 0;
                self.cursor = Position::ORIGIN;
            }
            Instruction::Home => {
                self.cgram_active = false;
                display.home();
                self.ddram_address = 0;
                self.cursor = Position::ORIGIN;
            }
            Instruction::EntryMode { increment, shift } => {
                self.increment = increment;
                self.shift_on_write = shift;
            }
            Instruction::DisplayControl {
                display: display_on,
                cursor,
                blink,
            } => {
                self.display_enabled = display_on;
                self.cursor_enabled = cursor;
                self.blink_enabled = blink;
                if display_on {
                    display.flush();
                }
            }
            // Display shift would need text reflow on every backend
            Instruction::CursorShift { .. } => {}
            Instruction::FunctionSet { .. } => {}
            Instruction::SetDdramAddress(address) => {
                self.cgram_active = false;
                self.ddram_address = address;
                if let Some(position) = self.geometry.decode(address) {
                    self.cursor = position;
                    display.set_cursor(position.column, position.row);
                }
            }
            Instruction::SetCgramAddress(address) => {
                self.cgram_active = true;
                self.cgram_address = address & CGRAM_ADDRESS_MASK;
            }
            Instruction::Unsupported(_) => {}
        }
    }

    /// Handle a data byte
    ///
    /// Returns true if the byte was consumed (always, since text is written
    /// by the translator itself). Callers forward the byte as text only on
    /// false.
    pub fn handle_data<D: CharDisplay + ?Sized>(&mut self, display: &mut D, value: u8) -> bool {
        if self.cgram_active {
            self.store_glyph_row(display, value & GLYPH_ROW_MASK);
            return true;
        }

        display.set_cursor(self.cursor.column, self.cursor.row);
        display.write(value);
        self.cursor = self.geometry.advance(self.cursor, self.increment);
        self.ddram_address = self.geometry.encode(self.cursor);
        true
    }

    fn store_glyph_row<D: CharDisplay + ?Sized>(&mut self, display: &mut D, pattern: u8) {
        let slot = cgram_slot(self.cgram_address);
        let row = cgram_row(self.cgram_address);
        let bitmap = &mut self.cgram_cache[slot as usize];
        bitmap[row as usize] = pattern;
        display.define_glyph(slot, bitmap);

        let next = if self.increment {
            self.cgram_address.wrapping_add(1)
        } else {
            self.cgram_address.wrapping_sub(1)
        };
        self.cgram_address = next & CGRAM_ADDRESS_MASK;
    }

    pub fn geometry(&self) -> Geometry {
        self.geometry
    }

    /// Logical cursor the next text byte lands on
    pub fn cursor(&self) -> Position {
        self.cursor
    }

    /// Raw DDRAM address register
    pub fn ddram_address(&self) -> u8 {
        self.ddram_address
    }

    /// Raw CGRAM address register
    pub fn cgram_address(&self) -> u8 {
        self.cgram_address
    }

    /// Returns true while data bytes program glyph rows
    pub fn is_programming_glyph(&self) -> bool {
        self.cgram_active
    }

    pub fn is_incrementing(&self) -> bool {
        self.increment
    }

    /// Entry-mode shift bit (stored, display shift is not emulated)
    pub fn shift_on_write(&self) -> bool {
        self.shift_on_write
    }

    /// Display control bits as `(display, cursor, blink)`
    pub fn display_control(&self) -> (bool, bool, bool) {
        (self.display_enabled, self.cursor_enabled, self.blink_enabled)
    }

    /// Cached pattern of glyph `slot`
    pub fn glyph(&self, slot: u8) -> &GlyphBitmap {
        &self.cgram_cache[slot as usize % GLYPH_SLOTS]
    }
}
