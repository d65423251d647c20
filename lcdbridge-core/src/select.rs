//! Run-time backend selection

use lcdbridge_hal::Clock;
use lcdbridge_protocol::GlyphBitmap;

use crate::dual::DualDisplay;
use crate::traits::{CharDisplay, SecondaryPump};

/// One of the supported backend arrangements, picked at run time
pub enum SelectedDisplay<P, S, C> {
    /// Primary backend alone
    Primary(P),
    /// Secondary backend alone
    Secondary(S),
    /// Both, mirrored
    Dual(DualDisplay<P, S, C>),
}

macro_rules! delegate {
    ($self:ident, $display:ident => $call:expr) => {
        match $self {
            SelectedDisplay::Primary($display) => $call,
            SelectedDisplay::Secondary($display) => $call,
            SelectedDisplay::Dual($display) => $call,
        }
    };
}

impl<P, S, C> CharDisplay for SelectedDisplay<P, S, C>
where
    P: CharDisplay,
    S: CharDisplay,
    C: Clock,
{
    fn begin(&mut self, columns: u8, rows: u8) {
        delegate!(self, display => display.begin(columns, rows))
    }

    fn clear(&mut self) {
        delegate!(self, display => display.clear())
    }

    fn home(&mut self) {
        delegate!(self, display => display.home())
    }

    fn flush(&mut self) {
        delegate!(self, display => display.flush())
    }

    fn set_cursor(&mut self, column: u8, row: u8) {
        delegate!(self, display => display.set_cursor(column, row))
    }

    fn write(&mut self, value: u8) -> usize {
        delegate!(self, display => display.write(value))
    }

    fn define_glyph(&mut self, slot: u8, bitmap: &GlyphBitmap) {
        delegate!(self, display => display.define_glyph(slot, bitmap))
    }

    fn raw_command(&mut self, value: u8) {
        delegate!(self, display => display.raw_command(value))
    }

    fn set_backlight(&mut self, level: u8) {
        delegate!(self, display => display.set_backlight(level))
    }

    fn fault_count(&self) -> u32 {
        delegate!(self, display => display.fault_count())
    }
}

impl<P, S, C> SecondaryPump for SelectedDisplay<P, S, C>
where
    P: CharDisplay,
    S: CharDisplay,
    C: Clock,
{
    fn pump_secondary(&mut self, max_ops: usize, host_pending: bool) -> usize {
        match self {
            SelectedDisplay::Dual(display) => display.pump_secondary(max_ops, host_pending),
            _ => 0,
        }
    }

    fn pending_secondary_writes(&self) -> usize {
        match self {
            SelectedDisplay::Dual(display) => display.pending_secondary_writes(),
            _ => 0,
        }
    }

    fn set_queueing_enabled(&mut self, enabled: bool) {
        if let SelectedDisplay::Dual(display) = self {
            display.set_queueing_enabled(enabled);
        }
    }
}
