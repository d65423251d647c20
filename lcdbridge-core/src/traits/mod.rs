//! Hardware abstraction traits
//!
//! These traits define the interface between the bridge logic and the
//! display backends.

pub mod display;

pub use display::{CharDisplay, SecondaryPump};
