//! HD44780 character LCD on an 8-bit parallel bus
//!
//! Write-only wiring (R/W tied low), so busy flags are never read and the
//! driver waits out the datasheet execution times instead.

use core::convert::Infallible;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{OutputPin, PinState};
use embedded_hal::pwm::{self, Error as _, SetDutyCycle};
use lcdbridge_core::CharDisplay;
use lcdbridge_protocol::glyph::{cgram_address, GLYPH_ROW_MASK};
use lcdbridge_protocol::{Geometry, GlyphBitmap, Instruction, Position, GLYPH_SLOTS};

/// Execution time of most instructions and data writes (µs)
const INSTRUCTION_US: u32 = 37;

/// Execution time of clear and home (µs)
const CLEAR_HOME_US: u32 = 1_520;

/// Supply settle time before the first instruction (ms)
const POWER_ON_MS: u32 = 50;

/// Enable pulse width (ns), datasheet minimum is 450
const ENABLE_PULSE_NS: u32 = 500;

/// Error from a bus transfer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hd44780Error<E> {
    /// A control or data pin failed to switch
    Pin(E),
    /// The backlight PWM rejected the duty cycle
    Backlight(pwm::ErrorKind),
}

impl<E> Hd44780Error<E> {
    pub fn fault(&self) -> Hd44780Fault {
        match self {
            Hd44780Error::Pin(_) => Hd44780Fault::Pin,
            Hd44780Error::Backlight(_) => Hd44780Fault::Backlight,
        }
    }
}

/// Kind of the last swallowed error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Hd44780Fault {
    Pin,
    Backlight,
}

/// Backlight stand-in for panels with a fixed backlight
pub struct NoBacklight;

impl pwm::ErrorType for NoBacklight {
    type Error = Infallible;
}

impl SetDutyCycle for NoBacklight {
    fn max_duty_cycle(&self) -> u16 {
        u16::MAX
    }

    fn set_duty_cycle(&mut self, _duty: u16) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// HD44780 driver
///
/// All bus pins share one type, as they do with `embassy` `Output`.
pub struct Hd44780<P, D, B> {
    rs: P,
    enable: P,
    data: [P; 8],
    delay: D,
    backlight: B,
    geometry: Geometry,
    /// DDRAM address counter as the controller holds it
    address: u8,
    faults: u32,
    last_fault: Option<Hd44780Fault>,
}

impl<P, D, B> Hd44780<P, D, B>
where
    P: OutputPin,
    D: DelayNs,
    B: SetDutyCycle,
{
    /// Wrap the bus; the panel is not touched until `begin`
    ///
    /// `data[0]` is D0.
    pub fn new(rs: P, enable: P, data: [P; 8], delay: D, backlight: B) -> Self {
        Self {
            rs,
            enable,
            data,
            delay,
            backlight,
            geometry: Geometry::default(),
            address: 0,
            faults: 0,
            last_fault: None,
        }
    }

    pub fn last_fault(&self) -> Option<Hd44780Fault> {
        self.last_fault
    }

    /// DDRAM address the next character is written to
    pub fn address(&self) -> u8 {
        self.address
    }

    pub fn release(self) -> (P, P, [P; 8], D, B) {
        (self.rs, self.enable, self.data, self.delay, self.backlight)
    }

    /// Power-on initialization by instruction (datasheet figure 23)
    fn init(&mut self) -> Result<(), Hd44780Error<P::Error>> {
        self.delay.delay_ms(POWER_ON_MS);

        let wake = Instruction::FunctionSet {
            eight_bit: true,
            two_lines: false,
            large_font: false,
        }
        .to_byte();
        self.command(wake)?;
        self.delay.delay_us(4_100);
        self.command(wake)?;
        self.delay.delay_us(100);
        self.command(wake)?;

        self.instruction(Instruction::FunctionSet {
            eight_bit: true,
            two_lines: self.geometry.rows > 1,
            large_font: false,
        })?;
        self.instruction(Instruction::DisplayControl {
            display: true,
            cursor: false,
            blink: false,
        })?;
        self.instruction(Instruction::Clear)?;
        self.instruction(Instruction::EntryMode {
            increment: true,
            shift: false,
        })
    }

    fn instruction(&mut self, instruction: Instruction) -> Result<(), Hd44780Error<P::Error>> {
        self.command(instruction.to_byte())
    }

    /// Send an instruction byte and wait for it to execute
    fn command(&mut self, value: u8) -> Result<(), Hd44780Error<P::Error>> {
        self.send(value, false)?;
        match Instruction::decode(value) {
            Instruction::Clear | Instruction::Home => {
                self.address = 0;
                self.delay.delay_us(CLEAR_HOME_US);
            }
            Instruction::SetDdramAddress(address) => {
                self.address = address;
                self.delay.delay_us(INSTRUCTION_US);
            }
            _ => self.delay.delay_us(INSTRUCTION_US),
        }
        Ok(())
    }

    fn data(&mut self, value: u8) -> Result<(), Hd44780Error<P::Error>> {
        self.send(value, true)?;
        self.delay.delay_us(INSTRUCTION_US);
        Ok(())
    }

    /// Put a byte on the bus and latch it on the falling enable edge
    fn send(&mut self, value: u8, rs: bool) -> Result<(), Hd44780Error<P::Error>> {
        self.rs.set_state(PinState::from(rs)).map_err(Hd44780Error::Pin)?;
        for (bit, pin) in self.data.iter_mut().enumerate() {
            pin.set_state(PinState::from(value & (1 << bit) != 0))
                .map_err(Hd44780Error::Pin)?;
        }
        self.enable.set_high().map_err(Hd44780Error::Pin)?;
        self.delay.delay_ns(ENABLE_PULSE_NS);
        self.enable.set_low().map_err(Hd44780Error::Pin)
    }

    fn create_char(
        &mut self,
        slot: u8,
        bitmap: &GlyphBitmap,
    ) -> Result<(), Hd44780Error<P::Error>> {
        let restore = self.address;
        self.instruction(Instruction::SetCgramAddress(cgram_address(slot, 0)))?;
        for &row in bitmap {
            self.data(row & GLYPH_ROW_MASK)?;
        }
        // Data writes go to CGRAM until a DDRAM address is set again
        self.instruction(Instruction::SetDdramAddress(restore))
    }

    fn apply_backlight(&mut self, level: u8) -> Result<(), Hd44780Error<P::Error>> {
        self.backlight
            .set_duty_cycle_fraction(level as u16, u8::MAX as u16)
            .map_err(|e| Hd44780Error::Backlight(e.kind()))
    }

    /// Address counter after one data write in DDRAM
    fn next_address(&self) -> u8 {
        if self.geometry.rows > 1 {
            match self.address {
                0x27 => 0x40,
                0x67 => 0x00,
                address => (address + 1) & 0x7F,
            }
        } else if self.address >= 0x4F {
            0x00
        } else {
            self.address + 1
        }
    }

    fn absorb(&mut self, result: Result<(), Hd44780Error<P::Error>>) -> bool {
        match result {
            Ok(()) => true,
            Err(e) => {
                let fault = e.fault();
                self.faults = self.faults.saturating_add(1);
                self.last_fault = Some(fault);

                #[cfg(feature = "defmt")]
                defmt::warn!("hd44780 fault: {}", fault);

                false
            }
        }
    }
}

impl<P, D, B> CharDisplay for Hd44780<P, D, B>
where
    P: OutputPin,
    D: DelayNs,
    B: SetDutyCycle,
{
    fn begin(&mut self, columns: u8, rows: u8) {
        self.geometry = Geometry::new(columns, rows).fit();
        let result = self.init();
        self.absorb(result);
    }

    fn clear(&mut self) {
        let result = self.instruction(Instruction::Clear);
        self.absorb(result);
    }

    fn home(&mut self) {
        let result = self.instruction(Instruction::Home);
        self.absorb(result);
    }

    fn flush(&mut self) {
        let result = self.instruction(Instruction::DisplayControl {
            display: true,
            cursor: false,
            blink: false,
        });
        self.absorb(result);
    }

    fn set_cursor(&mut self, column: u8, row: u8) {
        let position = self.geometry.clamp(Position::new(column, row));
        let address = self.geometry.encode(position);
        let result = self.instruction(Instruction::SetDdramAddress(address));
        self.absorb(result);
    }

    fn write(&mut self, value: u8) -> usize {
        let result = self.data(value);
        if self.absorb(result) {
            self.address = self.next_address();
            1
        } else {
            0
        }
    }

    fn define_glyph(&mut self, slot: u8, bitmap: &GlyphBitmap) {
        let result = self.create_char(slot % GLYPH_SLOTS as u8, bitmap);
        self.absorb(result);
    }

    fn raw_command(&mut self, value: u8) {
        let result = self.command(value);
        self.absorb(result);
    }

    fn set_backlight(&mut self, level: u8) {
        let result = self.apply_backlight(level);
        self.absorb(result);
    }

    fn fault_count(&self) -> u32 {
        self.faults
    }
}
