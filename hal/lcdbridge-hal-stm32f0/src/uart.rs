//! UART receiver for STM32F0
//!
//! Receives the LCDproc host stream through the interrupt-driven
//! `BufferedUartRx`, so bytes keep arriving while the session loop is busy
//! drawing.

use embassy_stm32::usart::{self, Error as UsartError};
use embedded_io::{Read, ReadReady};
use lcdbridge_hal::uart::{DataBits, Parity, StopBits};
use lcdbridge_hal::{UartConfig, UartRx};

/// Translate a link description into the embassy USART configuration
pub fn usart_config(config: &UartConfig) -> usart::Config {
    let mut usart_config = usart::Config::default();
    usart_config.baudrate = config.baudrate;
    usart_config.data_bits = match config.data_bits {
        DataBits::Seven => usart::DataBits::DataBits7,
        DataBits::Eight => usart::DataBits::DataBits8,
        DataBits::Nine => usart::DataBits::DataBits9,
    };
    usart_config.parity = match config.parity {
        Parity::None => usart::Parity::ParityNone,
        Parity::Even => usart::Parity::ParityEven,
        Parity::Odd => usart::Parity::ParityOdd,
    };
    usart_config.stop_bits = match config.stop_bits {
        StopBits::One => usart::StopBits::STOP1,
        StopBits::Two => usart::StopBits::STOP2,
    };
    usart_config
}

/// Error from UART operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum UartBusError {
    /// Framing error
    Framing,
    /// Noise error
    Noise,
    /// Overrun error
    Overrun,
    /// Parity error
    Parity,
    /// Other error
    Other,
}

impl From<UsartError> for UartBusError {
    fn from(e: UsartError) -> Self {
        match e {
            UsartError::Framing => UartBusError::Framing,
            UsartError::Noise => UartBusError::Noise,
            UsartError::Overrun => UartBusError::Overrun,
            UsartError::Parity => UartBusError::Parity,
            _ => UartBusError::Other,
        }
    }
}

/// [`UartRx`] over any blocking `embedded-io` reader with a readiness probe
pub struct SerialRx<R> {
    inner: R,
}

impl<R> SerialRx<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    pub fn release(self) -> R {
        self.inner
    }
}

impl<R> UartRx for SerialRx<R>
where
    R: Read + ReadReady,
    UartBusError: From<R::Error>,
{
    type Error = UartBusError;

    fn is_ready(&mut self) -> Result<bool, Self::Error> {
        Ok(self.inner.read_ready()?)
    }

    fn read_blocking(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        Ok(self.inner.read(buf)?)
    }
}
