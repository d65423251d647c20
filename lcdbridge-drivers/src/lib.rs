//! Display backend implementations
//!
//! Concrete [`lcdbridge_core::CharDisplay`] implementations over
//! `embedded-hal` 1.0 traits:
//!
//! - [`Hd44780`]: character LCD on an 8-bit parallel bus
//! - [`Oled`]: 128x64 SSD1306/SH1106 OLED on I2C, emulating a character
//!   display with a 5x7 font and programmable glyphs

#![no_std]
#![deny(unsafe_code)]

pub mod font;
pub mod hd44780;
pub mod oled;

pub use hd44780::{Hd44780, Hd44780Error, Hd44780Fault, NoBacklight};
pub use oled::{Oled, OledError, OledFault};
