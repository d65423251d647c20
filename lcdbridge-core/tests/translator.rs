//! Instruction stream replay through the translator.

mod common;

use common::{Op, Recorder};
use lcdbridge_core::{CharDisplay, Hd44780Translator};
use lcdbridge_protocol::{Geometry, Position};

fn feed(translator: &mut Hd44780Translator, display: &mut Recorder, stream: &[u8]) {
    let mut bytes = stream.iter();
    while let Some(&byte) = bytes.next() {
        if byte == 0xFE {
            if let Some(&value) = bytes.next() {
                translator.handle_command(display, value);
            }
        } else if !translator.handle_data(display, byte) {
            display.write(byte);
        }
    }
}

#[test]
fn test_clear_then_hello() {
    let mut translator = Hd44780Translator::new(Geometry::new(20, 4));
    let mut display = Recorder::new();

    feed(&mut translator, &mut display, b"\xFE\x01\xFE\x80HELLO");

    assert_eq!(
        display.ops,
        vec![
            Op::Clear,
            Op::Home,
            Op::SetCursor(0, 0),
            Op::SetCursor(0, 0),
            Op::Write(b'H'),
            Op::SetCursor(1, 0),
            Op::Write(b'E'),
            Op::SetCursor(2, 0),
            Op::Write(b'L'),
            Op::SetCursor(3, 0),
            Op::Write(b'L'),
            Op::SetCursor(4, 0),
            Op::Write(b'O'),
        ]
    );
    assert_eq!(translator.cursor(), Position::new(5, 0));
    assert_eq!(translator.ddram_address(), 0x05);
}

#[test]
fn test_clear_resets_cursor_before_next_write() {
    let mut translator = Hd44780Translator::new(Geometry::new(16, 2));
    let mut display = Recorder::new();

    feed(&mut translator, &mut display, b"\xFE\xC7ab");
    display.take_ops();
    feed(&mut translator, &mut display, b"\xFE\x01");

    assert_eq!(translator.cursor(), Position::ORIGIN);
    assert_eq!(translator.ddram_address(), 0);
    assert_eq!(display.take_ops(), vec![Op::Clear, Op::Home]);

    feed(&mut translator, &mut display, b"x");
    assert_eq!(display.ops, vec![Op::SetCursor(0, 0), Op::Write(b'x')]);
}

#[test]
fn test_full_row_wraps_to_next_row() {
    for geometry in [Geometry::new(16, 2), Geometry::new(20, 4), Geometry::new(20, 3)] {
        for row in 0..geometry.rows {
            let mut translator = Hd44780Translator::new(geometry);
            let mut display = Recorder::new();
            let address = 0x80 | geometry.encode(Position::new(0, row));
            translator.handle_command(&mut display, address);

            for _ in 0..geometry.columns {
                translator.handle_data(&mut display, b'#');
            }
            assert_eq!(
                translator.cursor(),
                Position::new(0, (row + 1) % geometry.rows),
                "{:?} row {}",
                geometry,
                row
            );
        }
    }
}

#[test]
fn test_decrement_wraps_to_previous_row() {
    let geometry = Geometry::new(20, 4);
    let mut translator = Hd44780Translator::new(geometry);
    let mut display = Recorder::new();

    // Entry mode: decrement, no shift
    translator.handle_command(&mut display, 0x04);

    translator.handle_command(&mut display, 0x80 | 0x40);
    translator.handle_data(&mut display, b'a');
    assert_eq!(translator.cursor(), Position::new(19, 0));

    translator.handle_data(&mut display, b'b');
    assert_eq!(translator.cursor(), Position::new(18, 0));

    translator.handle_command(&mut display, 0x80);
    translator.handle_data(&mut display, b'c');
    assert_eq!(translator.cursor(), Position::new(19, 3));
    assert_eq!(translator.ddram_address(), 0x54 + 19);
}

#[test]
fn test_row_offsets_on_four_rows() {
    let mut translator = Hd44780Translator::new(Geometry::new(20, 4));
    let mut display = Recorder::new();

    feed(
        &mut translator,
        &mut display,
        b"\xFE\x80r0\xFE\xC0r1\xFE\x94r2\xFE\xD4r3",
    );

    assert_eq!(display.row(0, 2), b"r0");
    assert_eq!(display.row(1, 2), b"r1");
    assert_eq!(display.row(2, 2), b"r2");
    assert_eq!(display.row(3, 2), b"r3");
}

#[test]
fn test_glyph_programming_pushes_whole_slot() {
    let mut translator = Hd44780Translator::new(Geometry::new(16, 2));
    let mut display = Recorder::new();

    // CGRAM address of slot 2, row 0, then three pattern rows
    feed(&mut translator, &mut display, b"\xFE\x50\x1F\x11\xFF");

    assert_eq!(
        display.ops,
        vec![
            Op::DefineGlyph(2, [0x1F, 0, 0, 0, 0, 0, 0, 0]),
            Op::DefineGlyph(2, [0x1F, 0x11, 0, 0, 0, 0, 0, 0]),
            Op::DefineGlyph(2, [0x1F, 0x11, 0x1F, 0, 0, 0, 0, 0]),
        ]
    );
    assert!(translator.is_programming_glyph());
    assert_eq!(translator.cgram_address(), 0x13);
    assert!(display.writes().is_empty());
}

#[test]
fn test_glyph_programming_runs_into_next_slot() {
    let mut translator = Hd44780Translator::new(Geometry::new(16, 2));
    let mut display = Recorder::new();

    translator.handle_command(&mut display, 0x40 | 0x07);
    translator.handle_data(&mut display, 0x01);
    translator.handle_data(&mut display, 0x02);

    assert_eq!(translator.glyph(0)[7], 0x01);
    assert_eq!(translator.glyph(1)[0], 0x02);
}

#[test]
fn test_ddram_address_ends_glyph_programming() {
    let mut translator = Hd44780Translator::new(Geometry::new(16, 2));
    let mut display = Recorder::new();

    feed(&mut translator, &mut display, b"\xFE\x40\x0E\xFE\x80\x00");

    assert!(!translator.is_programming_glyph());
    assert_eq!(display.writes(), vec![0x00]);
    assert_eq!(translator.cursor(), Position::new(1, 0));
}

#[test]
fn test_home_keeps_content() {
    let mut translator = Hd44780Translator::new(Geometry::new(16, 2));
    let mut display = Recorder::new();

    feed(&mut translator, &mut display, b"abc\xFE\x02Z");

    assert!(!display.ops.contains(&Op::Clear));
    assert_eq!(display.row(0, 3), b"Zbc");
    assert_eq!(translator.cursor(), Position::new(1, 0));
}

#[test]
fn test_display_control_flushes_when_on() {
    let mut translator = Hd44780Translator::new(Geometry::new(16, 2));
    let mut display = Recorder::new();

    translator.handle_command(&mut display, 0x08);
    assert!(display.take_ops().is_empty());
    assert_eq!(translator.display_control(), (false, false, false));

    translator.handle_command(&mut display, 0x0F);
    assert_eq!(display.take_ops(), vec![Op::Flush]);
    assert_eq!(translator.display_control(), (true, true, true));
}

#[test]
fn test_ignored_instructions_touch_nothing() {
    let mut translator = Hd44780Translator::new(Geometry::new(16, 2));
    let mut display = Recorder::new();

    feed(&mut translator, &mut display, b"\xFE\xC3");
    display.take_ops();

    // Unsupported, cursor shift, function set
    for value in [0x00, 0x03, 0x10, 0x1C, 0x38, 0x3F] {
        translator.handle_command(&mut display, value);
    }
    assert!(display.ops.is_empty());
    assert_eq!(translator.cursor(), Position::new(3, 1));
}

#[test]
fn test_prefix_values_are_ordinary_text() {
    let mut translator = Hd44780Translator::new(Geometry::new(16, 2));
    let mut display = Recorder::new();

    translator.handle_data(&mut display, 0xFD);
    assert_eq!(display.writes(), vec![0xFD]);
}
