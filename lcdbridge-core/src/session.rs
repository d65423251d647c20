//! Host session loop
//!
//! The session owns the display and drives it from the host byte stream:
//!
//! ```text
//! UartRx ──► ByteParser ──► Instruction ──► translator / raw_command
//!                      ├──► Backlight   ──► set_backlight
//!                      └──► Data        ──► translator / write
//!
//! no byte ready ──► idle() ──► pump_secondary
//! ```
//!
//! Waiting for the next host byte is the only place deferred secondary work
//! runs.

use core::fmt::Write;

use heapless::String;
use lcdbridge_hal::UartRx;
use lcdbridge_protocol::{ByteParser, Geometry, HostByte, MAX_COLUMNS};

use crate::config::BridgeConfig;
use crate::traits::{CharDisplay, SecondaryPump};
use crate::translator::Hd44780Translator;

const BANNER_TITLE: &str = "LCD bridge ready";
const BANNER_WAITING: &str = "Waiting for host...";

/// A host session over one display
pub struct Session<D> {
    display: D,
    config: BridgeConfig,
    parser: ByteParser,
    translator: Option<Hd44780Translator>,
    host_active: bool,
    banner_visible: bool,
    rx_errors: u32,
}

impl<D> Session<D>
where
    D: CharDisplay + SecondaryPump,
{
    /// Create a session; nothing is sent to the display until [`Session::start`]
    ///
    /// HD44780-only configurations forward instructions untranslated.
    pub fn new(display: D, config: BridgeConfig) -> Self {
        let translator = if config.backend.is_native() {
            None
        } else {
            Some(Hd44780Translator::new(config.geometry))
        };
        Self {
            display,
            config,
            parser: ByteParser::new(),
            translator,
            host_active: false,
            banner_visible: false,
            rx_errors: 0,
        }
    }

    /// Power-on sequence: initialize the display and show the banner
    pub fn start(&mut self) {
        let Geometry { columns, rows } = self.config.geometry;
        self.display.begin(columns, rows);
        self.display.set_backlight(self.config.startup_brightness);
        self.display.flush();
        if let Some(translator) = self.translator.as_mut() {
            translator.reset();
        }
        self.parser.reset();
        self.host_active = false;

        if self.config.banner {
            self.show_banner();
        }

        #[cfg(feature = "defmt")]
        defmt::info!("session started: {}x{}", columns, rows);
    }

    /// Feed one byte received from the host
    pub fn handle_byte(&mut self, byte: u8) {
        if !self.host_active {
            self.host_connected();
        }

        match self.parser.feed(byte) {
            None => {}
            Some(HostByte::Instruction(value)) => match self.translator.as_mut() {
                Some(translator) => translator.handle_command(&mut self.display, value),
                None => self.display.raw_command(value),
            },
            Some(HostByte::Backlight(level)) => self.display.set_backlight(level),
            Some(HostByte::Data(value)) => {
                let consumed = match self.translator.as_mut() {
                    Some(translator) => translator.handle_data(&mut self.display, value),
                    None => false,
                };
                if !consumed {
                    self.display.write(value);
                }
            }
        }
    }

    /// Handle one host byte if one is ready, otherwise give the secondary
    /// display a turn
    ///
    /// Returns true if a host byte was handled. Receive errors drop the byte.
    pub fn poll<R: UartRx>(&mut self, rx: &mut R) -> bool {
        match rx.is_ready() {
            Ok(true) => match rx.read_byte() {
                Ok(byte) => {
                    self.handle_byte(byte);
                    true
                }
                Err(_) => {
                    self.receive_error();
                    false
                }
            },
            Ok(false) => {
                self.idle(false);
                false
            }
            Err(_) => {
                self.receive_error();
                false
            }
        }
    }

    /// Run deferred secondary work
    ///
    /// Returns the number of work units done. Nothing runs while
    /// `host_pending` is true.
    pub fn idle(&mut self, host_pending: bool) -> usize {
        let pending = self.display.pending_secondary_writes();
        if pending == 0 {
            return 0;
        }

        let mut budget = self.config.pump_budget as usize;
        if pending > self.config.geometry.rows as usize {
            budget *= 2;
        }
        self.display.pump_secondary(budget, host_pending)
    }

    /// Drop the current host session and wait for a new one
    pub fn reconnect(&mut self) {
        self.display.set_queueing_enabled(false);
        self.parser.reset();
        if let Some(translator) = self.translator.as_mut() {
            translator.reset();
        }
        self.host_active = false;

        if self.config.banner {
            self.show_banner();
        }

        #[cfg(feature = "defmt")]
        defmt::debug!("host disconnected");
    }

    /// Switch to a different panel size, which starts a new session
    pub fn set_geometry(&mut self, geometry: Geometry) {
        let geometry = geometry.fit();
        self.config.geometry = geometry;
        self.display.begin(geometry.columns, geometry.rows);
        if let Some(translator) = self.translator.as_mut() {
            translator.set_geometry(geometry);
        }
        self.reconnect();
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    pub fn translator(&self) -> Option<&Hd44780Translator> {
        self.translator.as_ref()
    }

    /// Returns true once the host has sent a byte this session
    pub fn is_host_active(&self) -> bool {
        self.host_active
    }

    pub fn is_banner_visible(&self) -> bool {
        self.banner_visible
    }

    /// Receive errors since startup
    pub fn rx_errors(&self) -> u32 {
        self.rx_errors
    }

    fn host_connected(&mut self) {
        self.host_active = true;
        if self.banner_visible {
            self.banner_visible = false;
            self.display.clear();
            self.display.home();
        }
        // Both backends are blank here, so the secondary has no backlog
        if self.config.queueing_enabled {
            self.display.set_queueing_enabled(true);
        }

        #[cfg(feature = "defmt")]
        defmt::debug!("host connected");
    }

    fn receive_error(&mut self) {
        self.rx_errors = self.rx_errors.wrapping_add(1);

        #[cfg(feature = "defmt")]
        defmt::warn!("host byte dropped: uart receive error");
    }

    fn show_banner(&mut self) {
        self.display.clear();
        self.display.home();

        let mut link: String<{ MAX_COLUMNS as usize }> = String::new();
        // Cannot overflow: a u32 baud rate is at most 10 digits
        let _ = write!(link, "{} baud 8N1", self.config.baudrate);

        let lines = [BANNER_TITLE, BANNER_WAITING, link.as_str()];
        let rows = self.config.geometry.rows as usize;
        for (row, line) in lines.iter().take(rows).enumerate() {
            self.write_centered(line.as_bytes(), row as u8);
        }
        self.banner_visible = true;
    }

    fn write_centered(&mut self, text: &[u8], row: u8) {
        let columns = self.config.geometry.columns as usize;
        let text = &text[..text.len().min(columns)];
        let column = (columns - text.len()) / 2;
        self.display.set_cursor(column as u8, row);
        self.display.write_bytes(text);
    }
}
