//! Configuration validation

use lcdbridge_protocol::{Geometry, MAX_COLUMNS, MAX_ROWS};

use super::types::BridgeConfig;

/// Configuration validation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Panel has no columns or no rows
    ZeroGeometry,
    /// More rows than the controller addresses
    TooManyRows(u8),
    /// More columns than a controller row holds
    TooManyColumns(u8),
    /// Rows would share display RAM addresses (3-4 rows wider than 20)
    OverlappingRows { columns: u8, rows: u8 },
    /// OLED brightness floor above its ceiling
    BrightnessRange { min: u8, max: u8 },
    /// Baud rate of zero
    ZeroBaudrate,
    /// Idle threshold shorter than one byte on the host link
    IdleThresholdTooShort { threshold_us: u32, byte_time_us: u32 },
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ConfigError::ZeroGeometry => {
                write!(f, "geometry must have at least one row and column")
            }
            ConfigError::TooManyRows(rows) => {
                write!(f, "{} rows exceeds the maximum of {}", rows, MAX_ROWS)
            }
            ConfigError::TooManyColumns(columns) => {
                write!(f, "{} columns exceeds the maximum of {}", columns, MAX_COLUMNS)
            }
            ConfigError::OverlappingRows { columns, rows } => write!(
                f,
                "{}x{} overlaps in display RAM (at most {} columns with {} rows)",
                columns,
                rows,
                Geometry::max_columns_for_rows(*rows),
                rows
            ),
            ConfigError::BrightnessRange { min, max } => {
                write!(f, "oled brightness_min {} is above brightness_max {}", min, max)
            }
            ConfigError::ZeroBaudrate => write!(f, "baudrate must be non-zero"),
            ConfigError::IdleThresholdTooShort {
                threshold_us,
                byte_time_us,
            } => write!(
                f,
                "idle_threshold_us {} is shorter than one byte time ({} us)",
                threshold_us, byte_time_us
            ),
        }
    }
}

impl BridgeConfig {
    /// Check the configuration against controller limits
    pub fn validate(&self) -> Result<(), ConfigError> {
        let Geometry { columns, rows } = self.geometry;
        if columns == 0 || rows == 0 {
            return Err(ConfigError::ZeroGeometry);
        }
        if rows > MAX_ROWS {
            return Err(ConfigError::TooManyRows(rows));
        }
        if columns > MAX_COLUMNS {
            return Err(ConfigError::TooManyColumns(columns));
        }
        if columns > Geometry::max_columns_for_rows(rows) {
            return Err(ConfigError::OverlappingRows { columns, rows });
        }
        if self.oled.brightness_min > self.oled.brightness_max {
            return Err(ConfigError::BrightnessRange {
                min: self.oled.brightness_min,
                max: self.oled.brightness_max,
            });
        }
        if self.baudrate == 0 {
            return Err(ConfigError::ZeroBaudrate);
        }
        // A gap shorter than one character is just the next byte in flight
        let byte_time_us = self.uart_config().byte_time_us();
        if self.idle_threshold_us < byte_time_us {
            return Err(ConfigError::IdleThresholdTooShort {
                threshold_us: self.idle_threshold_us,
                byte_time_us,
            });
        }
        Ok(())
    }
}
