//! Driver for the 7.5" 880x528 black/white/red e-paper panel
//!
//! The panel is driven over SPI plus four lines: reset, data/command,
//! chip select and busy. Every command and every data byte is framed on its
//! own (D/C level, CS low, one byte, CS high).
//!
//! ### Usage
//! 1. create the driver from a bus, the lines and a delay
//!    ([`driver::Epd7in5b::new`], or [`linux::open`] on a Raspberry Pi)
//! 1. [`driver::Epd7in5b::initialize`] the panel
//! 1. [`driver::Epd7in5b::clear_display`] and/or
//!    [`driver::Epd7in5b::display_image`] with one image per colour
//! 1. put it to [`driver::Epd7in5b::sleep`] and
//!    [`driver::Epd7in5b::teardown`] the lines
//!
//! Any [`convert::PixelSource`] can be displayed: `image` crate buffers or a
//! [`convert::Canvas`] drawn with `embedded-graphics`.

mod cmd;
pub mod convert;
pub mod driver;
pub mod error;
mod flag;
pub mod interface;
#[cfg(feature = "linux")]
pub mod linux;
pub mod pins;

/// Display height, pixels vertically
pub const HEIGHT: u16 = 528;

/// Display width, pixels horizontally
pub const WIDTH: u16 = 880;

/// Bytes per row of a plane
pub const STRIDE: usize = (WIDTH as usize).div_ceil(8);

/// Bytes per plane
pub const BUFFER_LEN: usize = STRIDE * HEIGHT as usize;
