//! End-to-end host sessions over a dual display.

mod common;

use std::collections::VecDeque;

use common::{ManualClock, Op, Recorder};
use lcdbridge_core::{BackendKind, BridgeConfig, DualDisplay, SecondaryPump, Session};
use lcdbridge_hal::UartRx;
use lcdbridge_protocol::Geometry;

type TestSession<'a> = Session<DualDisplay<Recorder, Recorder, &'a ManualClock>>;

#[derive(Debug, PartialEq)]
struct Overrun;

/// Scripted receive queue; `None` entries become receive errors
struct ScriptedRx(VecDeque<Option<u8>>);

impl ScriptedRx {
    fn new(bytes: &[u8]) -> Self {
        Self(bytes.iter().map(|&byte| Some(byte)).collect())
    }
}

impl UartRx for ScriptedRx {
    type Error = Overrun;

    fn is_ready(&mut self) -> Result<bool, Overrun> {
        Ok(!self.0.is_empty())
    }

    fn read_blocking(&mut self, buf: &mut [u8]) -> Result<usize, Overrun> {
        if buf.is_empty() {
            return Ok(0);
        }
        match self.0.pop_front() {
            Some(Some(byte)) => {
                buf[0] = byte;
                Ok(1)
            }
            Some(None) => Err(Overrun),
            None => Ok(0),
        }
    }
}

fn session(clock: &ManualClock, config: BridgeConfig) -> TestSession<'_> {
    let display = DualDisplay::new(
        Recorder::new(),
        Recorder::new(),
        clock,
        config.geometry,
        config.idle_threshold_us,
    );
    let mut session = Session::new(display, config);
    session.start();
    session
}

fn send(session: &mut TestSession<'_>, bytes: &[u8]) {
    for &byte in bytes {
        session.handle_byte(byte);
    }
}

#[test]
fn test_start_sequence() {
    let clock = ManualClock::new();
    let session = session(&clock, BridgeConfig::default());

    let primary = &session.display().primary().ops;
    assert_eq!(
        primary[..5],
        [Op::Begin(20, 4), Op::Backlight(2), Op::Flush, Op::Clear, Op::Home]
    );
    assert_eq!(session.display().primary().row(0, 20), b"  LCD bridge ready  ");
    assert_eq!(session.display().secondary().row(0, 20), b"  LCD bridge ready  ");
    assert!(!session.display().is_queueing_enabled());
}

#[test]
fn test_banner_disabled() {
    let clock = ManualClock::new();
    let config = BridgeConfig {
        banner: false,
        ..BridgeConfig::default()
    };
    let session = session(&clock, config);

    assert_eq!(
        session.display().primary().ops,
        vec![Op::Begin(20, 4), Op::Backlight(2), Op::Flush]
    );
    assert!(!session.is_banner_visible());
}

#[test]
fn test_host_text_reaches_secondary_at_idle() {
    let clock = ManualClock::new();
    let mut session = session(&clock, BridgeConfig::default());

    send(&mut session, b"\xFE\x01\xFE\xC0Hi");
    assert!(session.is_host_active());
    assert!(session.display().is_queueing_enabled());
    assert_eq!(session.display().primary().row(1, 4), b"Hi  ");
    assert_eq!(session.display().secondary().row(1, 4), b"    ");

    clock.advance(2_000);
    let mut rx = ScriptedRx::new(&[]);
    while session.display().pending_secondary_writes() > 0 {
        assert!(!session.poll(&mut rx));
    }
    assert_eq!(session.display().secondary().row(0, 20), [b' '; 20]);
    assert_eq!(session.display().secondary().row(1, 4), b"Hi  ");
}

#[test]
fn test_poll_prefers_host_bytes() {
    let clock = ManualClock::new();
    let mut session = session(&clock, BridgeConfig::default());
    let mut rx = ScriptedRx::new(b"abc");

    clock.advance(10_000);
    for _ in 0..3 {
        assert!(session.poll(&mut rx));
    }
    assert_eq!(session.display().primary().row(0, 3), b"abc");
    assert!(session.display().pending_secondary_writes() > 0);

    // The clock has not moved since the last host byte
    assert!(!session.poll(&mut rx));
    assert!(session.display().pending_secondary_writes() > 0);
}

#[test]
fn test_receive_error_drops_byte() {
    let clock = ManualClock::new();
    let mut session = session(&clock, BridgeConfig::default());
    let mut rx = ScriptedRx(VecDeque::from([Some(b'a'), None, Some(b'b')]));

    assert!(session.poll(&mut rx));
    assert!(!session.poll(&mut rx));
    assert!(session.poll(&mut rx));

    assert_eq!(session.rx_errors(), 1);
    assert_eq!(session.display().primary().row(0, 2), b"ab");
}

#[test]
fn test_backlight_prefix() {
    let clock = ManualClock::new();
    let mut session = session(&clock, BridgeConfig::default());

    send(&mut session, &[0xFD, 0x80]);
    assert_eq!(session.display().primary().ops.last(), Some(&Op::Backlight(0x80)));
    assert_eq!(session.display().secondary().ops.last(), Some(&Op::Backlight(0x80)));

    // 0xFE right after 0xFD is the level, not a prefix
    send(&mut session, &[0xFD, 0xFE, b'x']);
    assert_eq!(session.display().primary().ops.last(), Some(&Op::Write(b'x')));
}

#[test]
fn test_idle_budget_doubles_under_backlog() {
    let clock = ManualClock::new();
    let mut session = session(&clock, BridgeConfig::default());

    // Four dirty rows plus two glyphs is more than one unit per row
    send(&mut session, b"\xFE\x40\x01\xFE\x48\x02");
    for address in [0x80u8, 0xC0, 0x94, 0xD4] {
        send(&mut session, &[0xFE, address, b'#']);
    }
    assert_eq!(session.display().pending_secondary_writes(), 6);

    clock.advance(2_000);
    assert_eq!(session.idle(true), 0);
    assert_eq!(session.idle(false), 2);
    assert_eq!(session.display().pending_secondary_writes(), 4);
    assert_eq!(session.idle(false), 1);
}

#[test]
fn test_reconnect_shows_banner_again() {
    let clock = ManualClock::new();
    let mut session = session(&clock, BridgeConfig::default());
    send(&mut session, b"\xFE\x01hello");

    session.reconnect();
    assert!(!session.is_host_active());
    assert!(session.is_banner_visible());
    assert!(!session.display().is_queueing_enabled());
    assert_eq!(session.display().secondary().row(1, 20), b"Waiting for host... ");

    send(&mut session, b"x");
    assert!(session.display().is_queueing_enabled());
    assert_eq!(session.translator().map(|t| t.cursor().column), Some(1));
}

#[test]
fn test_geometry_change_restarts_session() {
    let clock = ManualClock::new();
    let mut session = session(&clock, BridgeConfig::default());
    send(&mut session, b"abc");

    session.set_geometry(Geometry::new(16, 2));
    assert_eq!(session.config().geometry, Geometry::new(16, 2));
    assert_eq!(session.display().geometry(), Geometry::new(16, 2));
    assert_eq!(session.translator().map(|t| t.geometry()), Some(Geometry::new(16, 2)));
    assert_eq!(session.display().primary().row(0, 16), b"LCD bridge ready");
}

#[test]
fn test_oled_only_still_translates() {
    let clock = ManualClock::new();
    let config = BridgeConfig {
        backend: BackendKind::Oled,
        ..BridgeConfig::default()
    };
    let session = session(&clock, config);
    assert!(session.translator().is_some());
}
