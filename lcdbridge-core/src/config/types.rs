//! Configuration type definitions

use lcdbridge_hal::UartConfig;
use lcdbridge_protocol::Geometry;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Which backends are attached
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum BackendKind {
    /// Parallel HD44780 only; host instructions are passed through raw
    Hd44780,
    /// I2C OLED only; host instructions are translated
    Oled,
    /// HD44780 primary mirrored to an OLED secondary
    #[default]
    Dual,
}

impl BackendKind {
    /// Returns true if host instructions can be forwarded without translation
    pub fn is_native(&self) -> bool {
        matches!(self, BackendKind::Hd44780)
    }
}

/// OLED backend settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct OledSettings {
    /// 7-bit I2C address (0x3C or 0x3D)
    pub i2c_address: u8,
    /// First visible column in controller RAM (SH1106: 2, SSD1306: 0)
    pub column_offset: u8,
    /// Contrast used for the lowest non-zero backlight level
    pub brightness_min: u8,
    /// Contrast used for backlight level 255
    pub brightness_max: u8,
}

impl Default for OledSettings {
    fn default() -> Self {
        Self {
            i2c_address: 0x3C,
            column_offset: 2,
            brightness_min: 0x10,
            brightness_max: 0xFF,
        }
    }
}

/// Bridge configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BridgeConfig {
    /// Panel size in characters
    pub geometry: Geometry,
    /// Attached backends
    pub backend: BackendKind,
    /// Defer secondary updates to host idle time
    pub queueing_enabled: bool,
    /// Host silence required before secondary work may run (µs)
    pub idle_threshold_us: u32,
    /// Units of secondary work per idle spin
    pub pump_budget: u8,
    /// Backlight level applied at power-on
    pub startup_brightness: u8,
    /// Host link baud rate
    pub baudrate: u32,
    /// Show the startup banner until the host sends its first byte
    pub banner: bool,
    /// OLED backend settings
    pub oled: OledSettings,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            geometry: Geometry::new(20, 4),
            backend: BackendKind::Dual,
            queueing_enabled: true,
            // About a dozen byte times at 57600 baud
            idle_threshold_us: 2_000,
            pump_budget: 1,
            startup_brightness: 2,
            baudrate: 57_600,
            banner: true,
            oled: OledSettings::default(),
        }
    }
}

impl BridgeConfig {
    /// Host link framing: LCDproc always talks 8N1
    pub fn uart_config(&self) -> UartConfig {
        UartConfig {
            baudrate: self.baudrate,
            ..UartConfig::default()
        }
    }
}
