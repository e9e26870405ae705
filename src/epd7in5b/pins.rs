//! Pin definitions for the panel HAT on a Raspberry Pi
//!
//! Line numbers are BCM offsets on `/dev/gpiochip0`.

/// Pin configuration constants for the panel
pub struct Pins;

impl Pins {
    /// Reset pin for display
    pub const RST: u32 = 17;
    /// Data/Command control pin (High for data, Low for command)
    pub const DC: u32 = 25;
    /// Chip Select pin, toggled by the driver around every byte
    pub const CS: u32 = 8;
    /// Busy status pin (High when display is busy)
    pub const BSY: u32 = 24;

    /// SPI device node
    pub const SPI_DEVICE: &'static str = "/dev/spidev0.0";
    /// GPIO character device
    pub const GPIO_CHIP: &'static str = "/dev/gpiochip0";
    /// SPI clock, Hz
    pub const SPI_SPEED_HZ: u32 = 4_000_000;
}
