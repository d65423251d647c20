//! Shared test doubles: a recording display and a settable clock.

#![allow(dead_code)]

use std::cell::Cell;

use lcdbridge_core::{CharDisplay, SecondaryPump};
use lcdbridge_hal::Clock;
use lcdbridge_protocol::GlyphBitmap;

/// One call made on a [`Recorder`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Begin(u8, u8),
    Clear,
    Home,
    Flush,
    SetCursor(u8, u8),
    Write(u8),
    DefineGlyph(u8, GlyphBitmap),
    RawCommand(u8),
    Backlight(u8),
}

/// Display that logs every call and keeps a 40x4 character screen
pub struct Recorder {
    pub ops: Vec<Op>,
    pub screen: [[u8; 40]; 4],
    pub cursor: (u8, u8),
}

impl Recorder {
    pub fn new() -> Self {
        Self {
            ops: Vec::new(),
            screen: [[b' '; 40]; 4],
            cursor: (0, 0),
        }
    }

    /// First `columns` characters of `row`
    pub fn row(&self, row: u8, columns: u8) -> &[u8] {
        &self.screen[row as usize][..columns as usize]
    }

    pub fn writes(&self) -> Vec<u8> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                Op::Write(value) => Some(*value),
                _ => None,
            })
            .collect()
    }

    pub fn take_ops(&mut self) -> Vec<Op> {
        std::mem::take(&mut self.ops)
    }
}

impl CharDisplay for Recorder {
    fn begin(&mut self, columns: u8, rows: u8) {
        self.ops.push(Op::Begin(columns, rows));
    }

    fn clear(&mut self) {
        self.ops.push(Op::Clear);
        self.screen = [[b' '; 40]; 4];
        self.cursor = (0, 0);
    }

    fn home(&mut self) {
        self.ops.push(Op::Home);
        self.cursor = (0, 0);
    }

    fn flush(&mut self) {
        self.ops.push(Op::Flush);
    }

    fn set_cursor(&mut self, column: u8, row: u8) {
        self.ops.push(Op::SetCursor(column, row));
        self.cursor = (column.min(39), row.min(3));
    }

    fn write(&mut self, value: u8) -> usize {
        self.ops.push(Op::Write(value));
        let (column, row) = self.cursor;
        self.screen[row as usize][column as usize] = value;
        self.cursor = ((column + 1).min(39), row);
        1
    }

    fn define_glyph(&mut self, slot: u8, bitmap: &GlyphBitmap) {
        self.ops.push(Op::DefineGlyph(slot, *bitmap));
    }

    fn raw_command(&mut self, value: u8) {
        self.ops.push(Op::RawCommand(value));
    }

    fn set_backlight(&mut self, level: u8) {
        self.ops.push(Op::Backlight(level));
    }
}

impl SecondaryPump for Recorder {}

/// Clock the test moves by hand
pub struct ManualClock(Cell<u32>);

impl ManualClock {
    pub fn new() -> Self {
        Self(Cell::new(0))
    }

    pub fn advance(&self, us: u32) {
        self.0.set(self.0.get().wrapping_add(us));
    }
}

impl Clock for ManualClock {
    fn now_us(&self) -> u32 {
        self.0.get()
    }
}
