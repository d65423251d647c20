//! SSD1306/SH1106 OLED as a character display
//!
//! The 128x64 panel is divided into 6x8 pixel cells (5x7 font plus one
//! column of spacing). Each character row occupies one 8-pixel page; rows
//! are spread evenly across the eight pages, so a 20x4 layout uses pages
//! 0, 2, 4 and 6. At most 21 columns fit; cells further right are tracked
//! but not drawn.
//!
//! The controller is written in page addressing mode, which both chips
//! support. The SH1106 has 132 columns of RAM with the glass starting at
//! column 2, set through [`OledSettings::column_offset`].

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use embedded_hal::i2c::I2c;
use lcdbridge_core::{CharDisplay, OledSettings};
use lcdbridge_protocol::glyph::{glyph_slot_for_code, BLANK_GLYPH, GLYPH_ROW_MASK};
use lcdbridge_protocol::{Geometry, GlyphBitmap, Position, GLYPH_SLOTS, MAX_CELLS};

use crate::font::{self, GLYPH_WIDTH};

/// Panel width in pixels
pub const WIDTH: usize = 128;

/// 8-pixel pages on a 64-pixel panel
pub const PAGES: usize = 8;

/// Character cell width in pixels
pub const CELL_WIDTH: usize = 6;

/// Columns that fit across the panel
pub const VISIBLE_COLUMNS: u8 = (WIDTH / CELL_WIDTH) as u8;

/// Controller commands
#[allow(dead_code)]
mod cmd {
    pub const DISPLAY_OFF: u8 = 0xAE;
    pub const DISPLAY_ON: u8 = 0xAF;
    pub const SET_CONTRAST: u8 = 0x81;
    pub const SET_NORMAL: u8 = 0xA6;
    pub const SET_DISPLAY_OFFSET: u8 = 0xD3;
    pub const SET_COM_PINS: u8 = 0xDA;
    pub const SET_VCOM_DETECT: u8 = 0xDB;
    pub const SET_CLOCK_DIV: u8 = 0xD5;
    pub const SET_PRECHARGE: u8 = 0xD9;
    pub const SET_MUX_RATIO: u8 = 0xA8;
    pub const SET_LOW_COLUMN: u8 = 0x00;
    pub const SET_HIGH_COLUMN: u8 = 0x10;
    pub const SET_PAGE_ADDR: u8 = 0xB0;
    pub const SET_START_LINE: u8 = 0x40;
    pub const SET_SEG_REMAP: u8 = 0xA1;
    pub const SET_COM_SCAN_DEC: u8 = 0xC8;
    pub const SET_CHARGE_PUMP: u8 = 0x8D;
}

/// Control byte announcing a command stream
const COMMAND_PREFIX: u8 = 0x00;

/// Control byte announcing display data
const DATA_PREFIX: u8 = 0x40;

/// Error from a bus transfer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OledError<E> {
    /// I2C transfer failed
    I2c(E),
    /// The reset line failed to switch
    ResetPin,
}

impl<E> OledError<E> {
    pub fn fault(&self) -> OledFault {
        match self {
            OledError::I2c(_) => OledFault::I2c,
            OledError::ResetPin => OledFault::ResetPin,
        }
    }
}

/// Kind of the last swallowed error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OledFault {
    I2c,
    ResetPin,
}

/// OLED character display
pub struct Oled<I, R, D> {
    i2c: I,
    reset: R,
    delay: D,
    settings: OledSettings,
    geometry: Geometry,
    /// Mirror of controller RAM, one byte per column per page
    framebuffer: [[u8; WIDTH]; PAGES],
    /// Character code shown in each cell
    cells: [u8; MAX_CELLS],
    glyphs: [GlyphBitmap; GLYPH_SLOTS],
    cursor: Position,
    faults: u32,
    last_fault: Option<OledFault>,
}

impl<I, R, D> Oled<I, R, D>
where
    I: I2c,
    R: OutputPin,
    D: DelayNs,
{
    pub fn new(i2c: I, reset: R, delay: D, settings: OledSettings) -> Self {
        Self {
            i2c,
            reset,
            delay,
            settings,
            geometry: Geometry::default(),
            framebuffer: [[0; WIDTH]; PAGES],
            cells: [b' '; MAX_CELLS],
            glyphs: [BLANK_GLYPH; GLYPH_SLOTS],
            cursor: Position::ORIGIN,
            faults: 0,
            last_fault: None,
        }
    }

    pub fn framebuffer(&self) -> &[[u8; WIDTH]; PAGES] {
        &self.framebuffer
    }

    /// Character code in the cell at `position`, if it is on the panel
    pub fn cell(&self, position: Position) -> Option<u8> {
        if self.geometry.contains(position) {
            Some(self.cells[self.geometry.index(position)])
        } else {
            None
        }
    }

    pub fn cursor(&self) -> Position {
        self.cursor
    }

    pub fn last_fault(&self) -> Option<OledFault> {
        self.last_fault
    }

    pub fn release(self) -> (I, R, D) {
        (self.i2c, self.reset, self.delay)
    }

    /// Page holding character row `row`
    pub fn page_for_row(&self, row: u8) -> usize {
        row as usize * PAGES / self.geometry.rows.max(1) as usize
    }

    /// Left pixel of `column`, or `None` if the column is off the glass
    ///
    /// Narrow layouts are centered horizontally.
    pub fn x_for_column(&self, column: u8) -> Option<usize> {
        let visible = self.geometry.columns.min(VISIBLE_COLUMNS);
        if column >= visible {
            return None;
        }
        let margin = (WIDTH - visible as usize * CELL_WIDTH) / 2;
        Some(margin + column as usize * CELL_WIDTH)
    }

    /// Contrast register value for a backlight level
    ///
    /// Level 0 switches the panel fully dark; anything else is mapped
    /// linearly onto the configured brightness range.
    pub fn contrast_for_level(&self, level: u8) -> u8 {
        let OledSettings {
            brightness_min: min,
            brightness_max: max,
            ..
        } = self.settings;
        if level == 0 {
            return 0;
        }
        if max <= min {
            return max;
        }
        let span = (max - min) as u16;
        (min as u16 + level as u16 * span / u8::MAX as u16) as u8
    }

    fn hardware_reset(&mut self) -> Result<(), OledError<I::Error>> {
        self.reset.set_low().map_err(|_| OledError::ResetPin)?;
        self.delay.delay_ms(1);
        self.reset.set_high().map_err(|_| OledError::ResetPin)?;
        self.delay.delay_ms(10);
        Ok(())
    }

    fn init(&mut self) -> Result<(), OledError<I::Error>> {
        self.hardware_reset()?;
        self.commands(&[
            cmd::DISPLAY_OFF,
            cmd::SET_CLOCK_DIV,
            0x80,
            cmd::SET_MUX_RATIO,
            0x3F,
            cmd::SET_DISPLAY_OFFSET,
            0x00,
            cmd::SET_START_LINE,
            cmd::SET_CHARGE_PUMP,
            0x14,
            cmd::SET_SEG_REMAP,
            cmd::SET_COM_SCAN_DEC,
            cmd::SET_COM_PINS,
            0x12,
            cmd::SET_CONTRAST,
            self.settings.brightness_max,
            cmd::SET_PRECHARGE,
            0xF1,
            cmd::SET_VCOM_DETECT,
            0x40,
            cmd::SET_NORMAL,
        ])?;
        self.blank()?;
        self.commands(&[cmd::DISPLAY_ON])
    }

    fn commands(&mut self, commands: &[u8]) -> Result<(), OledError<I::Error>> {
        let mut buf = [0u8; 24];
        let len = commands.len().min(buf.len() - 1);
        buf[0] = COMMAND_PREFIX;
        buf[1..=len].copy_from_slice(&commands[..len]);
        self.i2c
            .write(self.settings.i2c_address, &buf[..=len])
            .map_err(OledError::I2c)
    }

    /// Send `len` framebuffer columns of `page` starting at pixel `x`
    fn transmit(&mut self, page: usize, x: usize, len: usize) -> Result<(), OledError<I::Error>> {
        let column = x + self.settings.column_offset as usize;
        self.commands(&[
            cmd::SET_PAGE_ADDR | page as u8,
            cmd::SET_LOW_COLUMN | (column & 0x0F) as u8,
            cmd::SET_HIGH_COLUMN | ((column >> 4) & 0x0F) as u8,
        ])?;

        let mut data = [0u8; WIDTH + 1];
        data[0] = DATA_PREFIX;
        data[1..=len].copy_from_slice(&self.framebuffer[page][x..x + len]);
        self.i2c
            .write(self.settings.i2c_address, &data[..=len])
            .map_err(OledError::I2c)
    }

    /// Zero the framebuffer and every cell, then push the whole frame
    fn blank(&mut self) -> Result<(), OledError<I::Error>> {
        self.framebuffer = [[0; WIDTH]; PAGES];
        self.cells = [b' '; MAX_CELLS];
        for page in 0..PAGES {
            self.transmit(page, 0, WIDTH)?;
        }
        Ok(())
    }

    /// Pixel columns of a character code
    fn cell_columns(&self, code: u8) -> [u8; CELL_WIDTH] {
        let mut columns = [0u8; CELL_WIDTH];
        if let Some(slot) = glyph_slot_for_code(code) {
            let bitmap = &self.glyphs[slot as usize];
            for (column, byte) in columns.iter_mut().take(GLYPH_WIDTH).enumerate() {
                for (row, &pattern) in bitmap.iter().enumerate() {
                    *byte |= ((pattern >> (GLYPH_WIDTH - 1 - column)) & 1) << row;
                }
            }
        } else if let Some(glyph) = font::glyph(code) {
            columns[..GLYPH_WIDTH].copy_from_slice(glyph);
        }
        columns
    }

    /// Draw the cell at `position` and send it to the panel
    fn draw_cell(&mut self, position: Position) -> Result<(), OledError<I::Error>> {
        let Some(x) = self.x_for_column(position.column) else {
            return Ok(());
        };
        let page = self.page_for_row(position.row);
        let columns = self.cell_columns(self.cells[self.geometry.index(position)]);
        self.framebuffer[page][x..x + CELL_WIDTH].copy_from_slice(&columns);
        self.transmit(page, x, CELL_WIDTH)
    }

    fn put(&mut self, value: u8) -> Result<(), OledError<I::Error>> {
        let position = self.cursor;
        self.cursor = self.geometry.advance(position, true);
        if !self.geometry.contains(position) {
            return Ok(());
        }
        self.cells[self.geometry.index(position)] = value;
        self.draw_cell(position)
    }

    /// Store a glyph and redraw every cell that shows it
    fn redefine(&mut self, slot: u8, bitmap: &GlyphBitmap) -> Result<(), OledError<I::Error>> {
        let mut masked = *bitmap;
        for row in masked.iter_mut() {
            *row &= GLYPH_ROW_MASK;
        }
        self.glyphs[slot as usize] = masked;

        for row in 0..self.geometry.rows {
            for column in 0..self.geometry.columns {
                let position = Position::new(column, row);
                if glyph_slot_for_code(self.cells[self.geometry.index(position)]) == Some(slot) {
                    self.draw_cell(position)?;
                }
            }
        }
        Ok(())
    }

    fn absorb(&mut self, result: Result<(), OledError<I::Error>>) -> bool {
        match result {
            Ok(()) => true,
            Err(e) => {
                let fault = e.fault();
                self.faults = self.faults.saturating_add(1);
                self.last_fault = Some(fault);

                #[cfg(feature = "defmt")]
                defmt::warn!("oled fault: {}", fault);

                false
            }
        }
    }
}

impl<I, R, D> CharDisplay for Oled<I, R, D>
where
    I: I2c,
    R: OutputPin,
    D: DelayNs,
{
    fn begin(&mut self, columns: u8, rows: u8) {
        self.geometry = Geometry::new(columns, rows).fit();
        self.cursor = Position::ORIGIN;
        let result = self.init();
        self.absorb(result);
    }

    fn clear(&mut self) {
        self.cursor = Position::ORIGIN;
        let result = self.blank();
        self.absorb(result);
    }

    fn home(&mut self) {
        self.cursor = Position::ORIGIN;
    }

    fn flush(&mut self) {
        let result = self.commands(&[cmd::DISPLAY_ON]);
        self.absorb(result);
    }

    fn set_cursor(&mut self, column: u8, row: u8) {
        self.cursor = self.geometry.clamp(Position::new(column, row));
    }

    fn write(&mut self, value: u8) -> usize {
        let result = self.put(value);
        if self.absorb(result) {
            1
        } else {
            0
        }
    }

    fn define_glyph(&mut self, slot: u8, bitmap: &GlyphBitmap) {
        let result = self.redefine(slot % GLYPH_SLOTS as u8, bitmap);
        self.absorb(result);
    }

    /// HD44780 instructions have no OLED equivalent
    fn raw_command(&mut self, _value: u8) {}

    fn set_backlight(&mut self, level: u8) {
        let contrast = self.contrast_for_level(level);
        let result = self.commands(&[cmd::SET_CONTRAST, contrast]);
        self.absorb(result);
    }

    fn fault_count(&self) -> u32 {
        self.faults
    }
}
