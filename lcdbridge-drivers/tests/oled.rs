//! OLED backend transfers and character cell emulation.

use embedded_hal::i2c::{ErrorKind, ErrorType, I2c, Operation};
use embedded_hal_mock::eh1::delay::NoopDelay;
use embedded_hal_mock::eh1::digital::{
    Mock as PinMock, State as PinState, Transaction as PinTransaction,
};
use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction as I2cTransaction};
use lcdbridge_core::{CharDisplay, OledSettings};
use lcdbridge_drivers::oled::{PAGES, WIDTH};
use lcdbridge_drivers::{Oled, OledFault};
use lcdbridge_protocol::Position;

const ADDRESS: u8 = 0x3C;

/// I2C bus that keeps every write and can be told to fail
#[derive(Default)]
struct RecordingBus {
    writes: Vec<Vec<u8>>,
    fail: bool,
}

impl RecordingBus {
    /// Data transfers only, control byte stripped
    fn data_writes(&self) -> Vec<&[u8]> {
        self.writes
            .iter()
            .filter(|write| write.first() == Some(&0x40))
            .map(|write| &write[1..])
            .collect()
    }
}

impl ErrorType for RecordingBus {
    type Error = ErrorKind;
}

impl I2c for RecordingBus {
    fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), ErrorKind> {
        assert_eq!(address, ADDRESS);
        if self.fail {
            return Err(ErrorKind::Other);
        }
        for operation in operations {
            if let Operation::Write(bytes) = operation {
                self.writes.push(bytes.to_vec());
            }
        }
        Ok(())
    }
}

fn reset_pulse() -> PinMock {
    PinMock::new(&[
        PinTransaction::set(PinState::Low),
        PinTransaction::set(PinState::High),
    ])
}

fn started(columns: u8, rows: u8) -> Oled<RecordingBus, PinMock, NoopDelay> {
    let mut oled = Oled::new(
        RecordingBus::default(),
        reset_pulse(),
        NoopDelay::new(),
        OledSettings::default(),
    );
    oled.begin(columns, rows);
    oled
}

#[test]
fn test_begin_resets_and_blanks_frame() {
    let oled = started(20, 4);
    let (bus, mut reset, _) = oled.release();
    reset.done();

    assert_eq!(bus.writes[0][..3], [0x00, 0xAE, 0xD5]);
    let frame = bus.data_writes();
    assert_eq!(frame.len(), PAGES);
    assert!(frame.iter().all(|page| page.len() == WIDTH && page.iter().all(|&b| b == 0)));
    assert_eq!(bus.writes.last(), Some(&vec![0x00, 0xAF]));
}

#[test]
fn test_write_sends_one_cell() {
    // Geometry defaults to 20x4 before begin; column 0 sits at pixel 4
    let expectations = [
        I2cTransaction::write(ADDRESS, vec![0x00, 0xB0, 0x06, 0x10]),
        I2cTransaction::write(ADDRESS, vec![0x40, 0x7E, 0x11, 0x11, 0x11, 0x7E, 0x00]),
        I2cTransaction::write(ADDRESS, vec![0x00, 0xB6, 0x08, 0x17]),
        I2cTransaction::write(ADDRESS, vec![0x40, 0x42, 0x61, 0x51, 0x49, 0x46, 0x00]),
    ];
    let mut oled = Oled::new(
        I2cMock::new(&expectations),
        PinMock::new(&[]),
        NoopDelay::new(),
        OledSettings::default(),
    );

    assert_eq!(oled.write(b'A'), 1);
    // Row 3 is page 6; column 19 is pixel 118, RAM column 120
    oled.set_cursor(19, 3);
    assert_eq!(oled.write(b'2'), 1);
    assert_eq!(oled.cursor(), Position::ORIGIN);

    let (mut i2c, mut reset, _) = oled.release();
    i2c.done();
    reset.done();
}

#[test]
fn test_backlight_maps_to_contrast() {
    let expectations = [
        I2cTransaction::write(ADDRESS, vec![0x00, 0x81, 0x00]),
        I2cTransaction::write(ADDRESS, vec![0x00, 0x81, 0x10]),
        I2cTransaction::write(ADDRESS, vec![0x00, 0x81, 0xFF]),
    ];
    let mut oled = Oled::new(
        I2cMock::new(&expectations),
        PinMock::new(&[]),
        NoopDelay::new(),
        OledSettings::default(),
    );

    oled.set_backlight(0);
    oled.set_backlight(1);
    oled.set_backlight(255);
    // No OLED equivalent, so nothing is sent
    oled.raw_command(0x01);

    let (mut i2c, mut reset, _) = oled.release();
    i2c.done();
    reset.done();
}

#[test]
fn test_glyph_updates_reach_existing_cells() {
    let mut oled = started(20, 4);
    oled.set_cursor(2, 1);
    oled.write(0x03);
    oled.set_cursor(7, 2);
    oled.write(0x0B);
    oled.write(b'x');

    oled.define_glyph(3, &[0x1F; 8]);

    let full = [0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0x00];
    let left = oled.x_for_column(2).unwrap();
    let right = oled.x_for_column(7).unwrap();
    assert_eq!(oled.framebuffer()[2][left..left + 6], full);
    assert_eq!(oled.framebuffer()[4][right..right + 6], full);
    assert_eq!(oled.cell(Position::new(8, 2)), Some(b'x'));

    let (bus, mut reset, _) = oled.release();
    reset.done();
    // Two cells redrawn, the 'x' next to them is not
    let writes = bus.data_writes();
    let redraws = &writes[writes.len() - 2..];
    assert!(redraws.iter().all(|cell| *cell == full));
}

#[test]
fn test_out_of_range_cursor_is_clamped() {
    let mut oled = started(16, 2);
    oled.set_cursor(200, 9);
    assert_eq!(oled.cursor(), Position::new(15, 1));
    oled.write(b'!');
    assert_eq!(oled.cell(Position::new(15, 1)), Some(b'!'));
    let (_, mut reset, _) = oled.release();
    reset.done();
}

#[test]
fn test_clear_blanks_cells_and_frame() {
    let mut oled = started(16, 2);
    oled.write_bytes(b"hello");
    oled.clear();
    assert_eq!(oled.cell(Position::new(0, 0)), Some(b' '));
    assert!(oled.framebuffer().iter().all(|page| page.iter().all(|&b| b == 0)));
    assert_eq!(oled.cursor(), Position::ORIGIN);
    let (_, mut reset, _) = oled.release();
    reset.done();
}

#[test]
fn test_bus_errors_are_counted() {
    let mut oled = started(20, 4);
    let (mut bus, reset, delay) = oled.release();
    bus.fail = true;
    let mut oled = Oled::new(bus, reset, delay, OledSettings::default());

    assert_eq!(oled.write(b'a'), 0);
    oled.set_backlight(10);
    assert_eq!(oled.fault_count(), 2);
    assert_eq!(oled.last_fault(), Some(OledFault::I2c));

    let (_, mut reset, _) = oled.release();
    reset.done();
}
