//! STM32F0-specific HAL for the LCD bridge firmware
//!
//! Adapters from `embassy-stm32` peripherals to the `lcdbridge-hal` traits.
//! Supported chips:
//!
//! - STM32F042K6 (reference board)
//! - STM32F042F6
//!
//! # Features
//!
//! - `stm32f042k6` / `stm32f042f6` - Select the chip
//! - `defmt` - Enable debug formatting support
//!
//! The display buses (GPIO, I2C) already implement `embedded-hal` 1.0 in
//! embassy and are handed to the drivers unchanged.

#![no_std]
#![deny(unsafe_code)]

pub mod time;
pub mod uart;

pub use time::EmbassyClock;
pub use uart::{usart_config, SerialRx, UartBusError};
