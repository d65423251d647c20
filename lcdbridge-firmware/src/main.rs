//! LCD Bridge Firmware
//!
//! Presents an HD44780 "lcdserializer" endpoint to LCDproc on USART2 and
//! drives an HD44780 LCD, an I2C OLED, or both mirrored (STM32F042K6).
//!
//! Pinout:
//!
//! | Signal        | Pin                              |
//! |---------------|----------------------------------|
//! | Host RX / TX  | PA3 / PA2                        |
//! | LCD RS / E    | PA0 / PA1                        |
//! | LCD D0-D7     | PA4 PA5 PA6 PA7 PA8 PA9 PA10 PA15 |
//! | OLED SCL/SDA  | PB6 / PB7                        |
//! | OLED RESET    | PB1                              |

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_stm32::bind_interrupts;
use embassy_stm32::gpio::{Level, Output, Speed};
use embassy_stm32::i2c::{self, I2c};
use embassy_stm32::peripherals::USART2;
use embassy_stm32::usart::{self, BufferedUart};
use embassy_time::Delay;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use lcdbridge_core::{
    BackendKind, BridgeConfig, DualDisplay, OledSettings, SelectedDisplay, Session,
};
use lcdbridge_drivers::{Hd44780, NoBacklight, Oled};
use lcdbridge_hal_stm32f0::{usart_config, EmbassyClock, SerialRx};
use lcdbridge_protocol::Geometry;

include!(concat!(env!("OUT_DIR"), "/bridge_config.rs"));

bind_interrupts!(struct Irqs {
    USART2 => usart::BufferedInterruptHandler<USART2>;
});

/// Holds host bytes that arrive while a slow display write is in progress
const RX_BUFFER_SIZE: usize = 256;

static RX_BUFFER: StaticCell<[u8; RX_BUFFER_SIZE]> = StaticCell::new();
static TX_BUFFER: StaticCell<[u8; 8]> = StaticCell::new();

#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    info!("LCD bridge firmware starting...");

    let config = match BRIDGE_CONFIG.validate() {
        Ok(()) => BRIDGE_CONFIG,
        Err(e) => {
            warn!("Embedded config rejected ({}), using defaults", e);
            BridgeConfig::default()
        }
    };
    info!(
        "{}x{} {} at {} baud",
        config.geometry.columns, config.geometry.rows, config.backend, config.baudrate
    );

    let p = embassy_stm32::init(Default::default());

    // TODO: drive the LCD backlight from TIM3 PWM once the board routes it
    let lcd = Hd44780::new(
        Output::new(p.PA0, Level::Low, Speed::Low),
        Output::new(p.PA1, Level::Low, Speed::Low),
        [
            Output::new(p.PA4, Level::Low, Speed::Low),
            Output::new(p.PA5, Level::Low, Speed::Low),
            Output::new(p.PA6, Level::Low, Speed::Low),
            Output::new(p.PA7, Level::Low, Speed::Low),
            Output::new(p.PA8, Level::Low, Speed::Low),
            Output::new(p.PA9, Level::Low, Speed::Low),
            Output::new(p.PA10, Level::Low, Speed::Low),
            Output::new(p.PA15, Level::Low, Speed::Low),
        ],
        Delay,
        NoBacklight,
    );

    let i2c = I2c::new_blocking(p.I2C1, p.PB6, p.PB7, i2c::Config::default());
    let oled = Oled::new(
        i2c,
        Output::new(p.PB1, Level::High, Speed::Low),
        Delay,
        config.oled,
    );

    let display = match config.backend {
        BackendKind::Hd44780 => SelectedDisplay::Primary(lcd),
        BackendKind::Oled => SelectedDisplay::Secondary(oled),
        BackendKind::Dual => SelectedDisplay::Dual(DualDisplay::new(
            lcd,
            oled,
            EmbassyClock,
            config.geometry,
            config.idle_threshold_us,
        )),
    };

    let uart_config = usart_config(&config.uart_config());
    let uart = match BufferedUart::new(
        p.USART2,
        p.PA3, // RX
        p.PA2, // TX
        TX_BUFFER.init([0; 8]),
        RX_BUFFER.init([0; RX_BUFFER_SIZE]),
        Irqs,
        uart_config,
    ) {
        Ok(uart) => uart,
        Err(e) => panic!("USART2 rejected its configuration: {}", e),
    };
    // The host never reads from the bridge
    let (_tx, rx) = uart.split();
    let mut rx = SerialRx::new(rx);

    let mut session = Session::new(display, config);
    session.start();
    info!("Session started, waiting for host");

    // Secondary work only runs from poll, between host bytes
    loop {
        session.poll(&mut rx);
    }
}
