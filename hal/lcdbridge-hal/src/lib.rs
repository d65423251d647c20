//! LCD Bridge Hardware Abstraction Layer
//!
//! This crate defines the few hardware services the bridge core needs from
//! a chip-specific HAL. Display backends talk to their buses through
//! `embedded-hal` directly; what is left here is the host link and time.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  lcdbridge-core (session, dual display) │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  lcdbridge-hal (this crate - traits)    │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//!          ┌─────────────────────┐
//!          │ lcdbridge-hal-      │
//!          │    stm32f0          │
//!          └─────────────────────┘
//! ```
//!
//! # Traits
//!
//! - [`uart::UartRx`] - Host byte source with a non-blocking readiness probe
//! - [`time::Clock`] - Free-running microsecond counter

#![no_std]
#![deny(unsafe_code)]

pub mod time;
pub mod uart;

// Re-export key traits at crate root for convenience
pub use time::Clock;
pub use uart::{UartConfig, UartRx};
