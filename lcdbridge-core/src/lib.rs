//! Board-agnostic core logic for the LCD bridge firmware
//!
//! This crate contains everything between the serial byte stream and the
//! display backends that does not depend on specific hardware:
//!
//! - The display capability trait every backend implements
//! - HD44780 instruction translation for backends that are not HD44780s
//! - Dual-display mirroring with deferred updates to a slow secondary
//! - The session loop that classifies host bytes and yields to the secondary
//! - Runtime configuration

#![no_std]
#![deny(unsafe_code)]

pub mod config;
pub mod dual;
pub mod select;
pub mod session;
pub mod traits;
pub mod translator;

pub use config::{BackendKind, BridgeConfig, ConfigError, OledSettings};
pub use dual::DualDisplay;
pub use select::SelectedDisplay;
pub use session::Session;
pub use traits::{CharDisplay, SecondaryPump};
pub use translator::Hd44780Translator;
