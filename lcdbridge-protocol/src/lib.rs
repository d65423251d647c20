//! LCDproc Serial Bridge Protocol
//!
//! This crate defines the byte stream a host running LCDproc's `hd44780`
//! driver (the "los-panel" serial flavour) sends to the bridge, and the
//! HD44780 controller semantics needed to reproduce it on other hardware.
//!
//! # Protocol Overview
//!
//! There is no framing. Every byte is either a prefix or a literal:
//! ```text
//! ┌──────┬─────────┐
//! │ 0xFE │ OPCODE  │  HD44780 instruction (clear, set DDRAM address, ...)
//! ├──────┼─────────┤
//! │ 0xFD │ LEVEL   │  backlight / contrast level 0-255
//! ├──────┴─────────┤
//! │ any other byte │  character data (or CGRAM pattern data)
//! └────────────────┘
//! ```
//!
//! The HD44780 addresses its display RAM in a non-contiguous way that depends
//! on the panel geometry; [`ddram::Geometry`] captures that mapping.

#![no_std]
#![deny(unsafe_code)]

pub mod ddram;
pub mod glyph;
pub mod instruction;
pub mod wire;

pub use ddram::{Geometry, Position, MAX_CELLS, MAX_COLUMNS, MAX_ROWS};
pub use glyph::{GlyphBitmap, GLYPH_ROWS, GLYPH_SLOTS};
pub use instruction::Instruction;
pub use wire::{ByteParser, HostByte, BACKLIGHT_PREFIX, INSTRUCTION_PREFIX};
