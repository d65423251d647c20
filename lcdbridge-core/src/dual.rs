//! Dual-display mirroring
//!
//! [`DualDisplay`] presents two backends as one. The primary (a parallel
//! HD44780, a few microseconds per operation) is always updated on the byte
//! path. The secondary (an I2C OLED, hundreds of microseconds per cell) can
//! instead be caught up from a shadow buffer while the host is quiet, so the
//! UART receive buffer never overflows behind a slow bus transfer.
//!
//! ```text
//! write ──► primary (now)
//!       └─► shadow[row][col], dirty_rows |= row
//!                                   │
//! pump_secondary (idle) ────────────┴──► glyphs first, then rows ──► secondary
//! ```

use lcdbridge_hal::Clock;
use lcdbridge_protocol::glyph::BLANK_GLYPH;
use lcdbridge_protocol::{Geometry, GlyphBitmap, Position, GLYPH_SLOTS, MAX_CELLS};

use crate::traits::{CharDisplay, SecondaryPump};

/// Primary/secondary display pair with deferred secondary updates
pub struct DualDisplay<P, S, C> {
    primary: P,
    secondary: S,
    clock: C,
    geometry: Geometry,
    idle_threshold_us: u32,
    shadow: [u8; MAX_CELLS],
    dirty_rows: u8,
    cgram_shadow: [GlyphBitmap; GLYPH_SLOTS],
    cgram_dirty: u8,
    cursor: Position,
    last_activity_us: u32,
    queueing: bool,
}

impl<P, S, C> DualDisplay<P, S, C>
where
    P: CharDisplay,
    S: CharDisplay,
    C: Clock,
{
    /// Wrap two backends
    ///
    /// Queueing starts disabled: every operation reaches both backends until
    /// [`SecondaryPump::set_queueing_enabled`] is called.
    pub fn new(
        primary: P,
        secondary: S,
        clock: C,
        geometry: Geometry,
        idle_threshold_us: u32,
    ) -> Self {
        let last_activity_us = clock.now_us();
        Self {
            primary,
            secondary,
            clock,
            geometry: geometry.fit(),
            idle_threshold_us,
            shadow: [b' '; MAX_CELLS],
            dirty_rows: 0,
            cgram_shadow: [BLANK_GLYPH; GLYPH_SLOTS],
            cgram_dirty: 0,
            cursor: Position::ORIGIN,
            last_activity_us,
            queueing: false,
        }
    }

    pub fn primary(&self) -> &P {
        &self.primary
    }

    pub fn secondary(&self) -> &S {
        &self.secondary
    }

    pub fn geometry(&self) -> Geometry {
        self.geometry
    }

    /// Cursor the next write lands on
    pub fn cursor(&self) -> Position {
        self.cursor
    }

    pub fn is_queueing_enabled(&self) -> bool {
        self.queueing
    }

    /// Shadow content of `row`, empty if the row is off the panel
    pub fn shadow_row(&self, row: u8) -> &[u8] {
        if row >= self.geometry.rows {
            return &[];
        }
        let start = self.geometry.index(Position::new(0, row));
        &self.shadow[start..start + self.geometry.columns as usize]
    }

    /// Cached pattern of glyph `slot`
    pub fn shadow_glyph(&self, slot: u8) -> &GlyphBitmap {
        &self.cgram_shadow[slot as usize % GLYPH_SLOTS]
    }

    fn touch(&mut self) {
        self.last_activity_us = self.clock.now_us();
    }

    fn all_rows_mask(&self) -> u8 {
        ((1u16 << self.geometry.rows) - 1) as u8
    }

    fn flush_glyph(&mut self, slot: u8) {
        self.secondary
            .define_glyph(slot, &self.cgram_shadow[slot as usize]);
        self.cgram_dirty &= !(1 << slot);
    }

    fn repaint_row(&mut self, row: u8) {
        self.primary.set_cursor(0, row);
        self.secondary.set_cursor(0, row);

        let start = self.geometry.index(Position::new(0, row));
        let end = start + self.geometry.columns as usize;
        for &code in &self.shadow[start..end] {
            self.secondary.write(code);
        }

        // Host writes that omit a position continue from the tracked cursor
        self.primary.set_cursor(self.cursor.column, self.cursor.row);
        self.dirty_rows &= !(1 << row);
    }
}

impl<P, S, C> CharDisplay for DualDisplay<P, S, C>
where
    P: CharDisplay,
    S: CharDisplay,
    C: Clock,
{
    fn begin(&mut self, columns: u8, rows: u8) {
        self.geometry = Geometry::new(columns, rows).fit();
        self.shadow = [b' '; MAX_CELLS];
        self.dirty_rows = 0;
        self.cgram_shadow = [BLANK_GLYPH; GLYPH_SLOTS];
        self.cgram_dirty = 0;
        self.cursor = Position::ORIGIN;

        self.primary.begin(columns, rows);
        self.secondary.begin(columns, rows);
        self.touch();
    }

    fn clear(&mut self) {
        self.primary.clear();
        self.touch();

        self.shadow = [b' '; MAX_CELLS];
        self.cursor = Position::ORIGIN;
        if self.queueing {
            self.dirty_rows = self.all_rows_mask();
        } else {
            self.secondary.clear();
            self.dirty_rows = 0;
        }
    }

    fn home(&mut self) {
        self.primary.home();
        self.touch();

        self.cursor = Position::ORIGIN;
        if !self.queueing {
            self.secondary.home();
        }
    }

    fn flush(&mut self) {
        self.primary.flush();
        self.secondary.flush();
        self.touch();
    }

    fn set_cursor(&mut self, column: u8, row: u8) {
        self.primary.set_cursor(column, row);
        self.touch();

        self.cursor = self.geometry.clamp(Position::new(column, row));
        if !self.queueing {
            self.secondary.set_cursor(column, row);
        }
    }

    fn write(&mut self, value: u8) -> usize {
        let written = self.primary.write(value);
        self.touch();

        let cursor = self.cursor;
        if self.geometry.contains(cursor) {
            self.shadow[self.geometry.index(cursor)] = value;
            if self.queueing {
                self.dirty_rows |= 1 << cursor.row;
            }
        }
        if !self.queueing {
            self.secondary.write(value);
        }

        self.cursor = self.geometry.advance(cursor, true);
        written
    }

    fn define_glyph(&mut self, slot: u8, bitmap: &GlyphBitmap) {
        let slot = slot % GLYPH_SLOTS as u8;
        self.primary.define_glyph(slot, bitmap);
        self.touch();

        self.cgram_shadow[slot as usize] = *bitmap;
        self.cgram_dirty |= 1 << slot;
        if !self.queueing {
            self.flush_glyph(slot);
        }
    }

    fn raw_command(&mut self, value: u8) {
        self.primary.raw_command(value);
        self.touch();

        if !self.queueing {
            self.secondary.raw_command(value);
        }
    }

    fn set_backlight(&mut self, level: u8) {
        self.primary.set_backlight(level);
        self.secondary.set_backlight(level);
    }

    fn fault_count(&self) -> u32 {
        self.primary
            .fault_count()
            .saturating_add(self.secondary.fault_count())
    }
}

impl<P, S, C> SecondaryPump for DualDisplay<P, S, C>
where
    P: CharDisplay,
    S: CharDisplay,
    C: Clock,
{
    fn pump_secondary(&mut self, max_ops: usize, host_pending: bool) -> usize {
        if !self.queueing || max_ops == 0 || host_pending {
            return 0;
        }
        if self.clock.elapsed_us(self.last_activity_us) < self.idle_threshold_us {
            return 0;
        }

        let mut done = 0;
        while done < max_ops {
            // A repainted row may show a custom glyph, so glyphs go first
            if self.cgram_dirty != 0 {
                let slot = self.cgram_dirty.trailing_zeros() as u8;
                self.flush_glyph(slot);
            } else if self.dirty_rows != 0 {
                let row = self.dirty_rows.trailing_zeros() as u8;
                self.repaint_row(row);
            } else {
                break;
            }
            done += 1;
        }
        done
    }

    fn pending_secondary_writes(&self) -> usize {
        (self.dirty_rows.count_ones() + self.cgram_dirty.count_ones()) as usize
    }

    fn set_queueing_enabled(&mut self, enabled: bool) {
        if self.queueing == enabled {
            return;
        }
        self.queueing = enabled;

        #[cfg(feature = "defmt")]
        defmt::debug!("secondary queueing {}", enabled);

        if !enabled {
            // Direct writes resume from wherever the host left the cursor
            self.secondary.set_cursor(self.cursor.column, self.cursor.row);
        }
    }
}
