//! E-paper panel driver for the 7.5" 880x528 black/white/red display
//!
//! The driver only needs the `embedded-hal` traits for its bus, lines and
//! delays. With the `linux` feature, [`epd7in5b::linux::open`] wires it to
//! spidev and the GPIO character device of a Raspberry Pi.
//!
//! ```rust, ignore
//! use epaper::epd7in5b::linux::{self, HardwareConfig};
//!
//! let mut epd = linux::open(&HardwareConfig::default())?;
//! epd.initialize()?;
//! epd.clear_display()?;
//! epd.display_image(Some(&black), Some(&red))?;
//! epd.sleep()?;
//! epd.teardown()?;
//! ```
#![deny(missing_docs)]
#![allow(clippy::pedantic)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]

pub mod epd7in5b;

pub use crate::epd7in5b::convert::{convert, Canvas, PixelSource};
pub use crate::epd7in5b::driver::Epd7in5b;
pub use crate::epd7in5b::error::{Error, PanelState, SetupError};
pub use crate::epd7in5b::pins::Pins;
