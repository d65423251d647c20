//! Character display capability trait

use lcdbridge_protocol::GlyphBitmap;

/// Character display backend
///
/// Every backend (parallel HD44780, I2C OLED, the dual-display wrapper)
/// implements this trait; the rest of the bridge only talks to it.
///
/// Operations are infallible: the host cannot be told about a failure
/// mid-stream, so backends absorb bus errors and count them in
/// [`CharDisplay::fault_count`]. Out-of-range cursor positions are clamped
/// by the backend, never rejected.
pub trait CharDisplay {
    /// Initialize the hardware for a panel of `columns` x `rows` characters
    fn begin(&mut self, columns: u8, rows: u8);

    /// Blank every cell and move the cursor to (0, 0)
    fn clear(&mut self);

    /// Move the cursor to (0, 0) without touching content
    fn home(&mut self);

    /// Switch the panel on and push any buffered content to it
    fn flush(&mut self);

    /// Position the cursor
    ///
    /// - `column`: Column number (0-based)
    /// - `row`: Row number (0-based)
    fn set_cursor(&mut self, column: u8, row: u8);

    /// Draw one character code at the cursor
    ///
    /// Returns the number of bytes written (1, or 0 if the backend dropped it).
    fn write(&mut self, value: u8) -> usize;

    /// Draw a string of character codes, stopping at the first NUL
    fn write_bytes(&mut self, text: &[u8]) -> usize {
        let mut written = 0;
        for &byte in text.iter().take_while(|&&byte| byte != 0) {
            written += self.write(byte);
        }
        written
    }

    /// Program custom glyph `slot` (0-7)
    ///
    /// Backends must accept redefining a slot at any time.
    fn define_glyph(&mut self, slot: u8, bitmap: &GlyphBitmap);

    /// Issue a raw HD44780 instruction
    ///
    /// Backends that are not HD44780s may ignore this.
    fn raw_command(&mut self, value: u8);

    /// Set backlight or contrast level (0-255)
    fn set_backlight(&mut self, level: u8) {
        let _ = level;
    }

    /// Number of bus or pin errors swallowed since startup
    fn fault_count(&self) -> u32 {
        0
    }
}

impl<T: CharDisplay + ?Sized> CharDisplay for &mut T {
    fn begin(&mut self, columns: u8, rows: u8) {
        (**self).begin(columns, rows)
    }

    fn clear(&mut self) {
        (**self).clear()
    }

    fn home(&mut self) {
        (**self).home()
    }

    fn flush(&mut self) {
        (**self).flush()
    }

    fn set_cursor(&mut self, column: u8, row: u8) {
        (**self).set_cursor(column, row)
    }

    fn write(&mut self, value: u8) -> usize {
        (**self).write(value)
    }

    fn write_bytes(&mut self, text: &[u8]) -> usize {
        (**self).write_bytes(text)
    }

    fn define_glyph(&mut self, slot: u8, bitmap: &GlyphBitmap) {
        (**self).define_glyph(slot, bitmap)
    }

    fn raw_command(&mut self, value: u8) {
        (**self).raw_command(value)
    }

    fn set_backlight(&mut self, level: u8) {
        (**self).set_backlight(level)
    }

    fn fault_count(&self) -> u32 {
        (**self).fault_count()
    }
}

/// Deferred secondary-display work, driven by the session loop
///
/// Not part of [`CharDisplay`]: only the session loop schedules this work.
/// Backends without a deferred secondary keep the default no-op methods.
pub trait SecondaryPump {
    /// Spend up to `max_ops` units of work catching the secondary up
    ///
    /// Returns the number of units performed. Does nothing while
    /// `host_pending` is true.
    fn pump_secondary(&mut self, max_ops: usize, host_pending: bool) -> usize {
        let _ = (max_ops, host_pending);
        0
    }

    /// Units of work still owed to the secondary
    fn pending_secondary_writes(&self) -> usize {
        0
    }

    /// Start or stop accumulating secondary backlog
    fn set_queueing_enabled(&mut self, enabled: bool) {
        let _ = enabled;
    }
}

impl<T: SecondaryPump + ?Sized> SecondaryPump for &mut T {
    fn pump_secondary(&mut self, max_ops: usize, host_pending: bool) -> usize {
        (**self).pump_secondary(max_ops, host_pending)
    }

    fn pending_secondary_writes(&self) -> usize {
        (**self).pending_secondary_writes()
    }

    fn set_queueing_enabled(&mut self, enabled: bool) {
        (**self).set_queueing_enabled(enabled)
    }
}
