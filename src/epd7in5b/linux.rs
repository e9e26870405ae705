//! Raspberry Pi transport through spidev and the GPIO character device
use linux_embedded_hal::{
    gpio_cdev::{Chip, LineRequestFlags},
    spidev::{SpiModeFlags, Spidev, SpidevOptions},
    CdevPin, Delay, SpidevDevice,
};

use crate::epd7in5b::driver::Epd7in5b;
use crate::epd7in5b::error::SetupError;
use crate::epd7in5b::pins::Pins;

/// The driver over the Linux transport
pub type LinuxEpd = Epd7in5b<SpidevDevice, CdevPin, CdevPin, CdevPin, CdevPin, Delay>;

/// Where the panel is attached
#[derive(Debug, Clone)]
pub struct HardwareConfig {
    /// SPI device node
    pub spi_device: String,
    /// GPIO character device holding the control lines
    pub gpio_chip: String,
    /// Reset line offset
    pub rst: u32,
    /// Data/command line offset
    pub dc: u32,
    /// Chip select line offset
    pub cs: u32,
    /// Busy line offset
    pub busy: u32,
    /// Bus clock
    pub speed_hz: u32,
}

impl Default for HardwareConfig {
    fn default() -> Self {
        HardwareConfig {
            spi_device: Pins::SPI_DEVICE.to_string(),
            gpio_chip: Pins::GPIO_CHIP.to_string(),
            rst: Pins::RST,
            dc: Pins::DC,
            cs: Pins::CS,
            busy: Pins::BSY,
            speed_hz: Pins::SPI_SPEED_HZ,
        }
    }
}

/// Open the bus and request the four lines.
///
/// The chip select line is driven by the driver, so the kernel is told not
/// to assert one of its own (`SPI_NO_CS`). The line must not be claimed by
/// the SPI controller's device tree overlay.
pub fn open(config: &HardwareConfig) -> Result<LinuxEpd, SetupError> {
    log::info!(
        "Opening {} at {} Hz and {}",
        config.spi_device,
        config.speed_hz,
        config.gpio_chip
    );

    let mut spi = Spidev::open(&config.spi_device)
        .map(SpidevDevice)
        .map_err(|e| SetupError::new(format!("opening {}", config.spi_device), e))?;
    spi.0
        .configure(
            &SpidevOptions::new()
                .bits_per_word(8)
                .max_speed_hz(config.speed_hz)
                .mode(SpiModeFlags::SPI_MODE_0 | SpiModeFlags::SPI_NO_CS)
                .build(),
        )
        .map_err(|e| SetupError::new(format!("configuring {}", config.spi_device), e))?;

    let mut chip = Chip::new(&config.gpio_chip)
        .map_err(|e| SetupError::new(format!("opening {}", config.gpio_chip), e))?;

    let mut request = |offset: u32, flags: LineRequestFlags, default: u8, consumer: &str| {
        chip.get_line(offset)
            .and_then(|line| line.request(flags, default, consumer))
            .and_then(CdevPin::new)
            .map_err(|e| SetupError::new(format!("requesting line {} ({})", offset, consumer), e))
    };

    let rst = request(config.rst, LineRequestFlags::OUTPUT, 0, "epd7in5b_rst")?;
    let dc = request(config.dc, LineRequestFlags::OUTPUT, 0, "epd7in5b_dc")?;
    let cs = request(config.cs, LineRequestFlags::OUTPUT, 1, "epd7in5b_cs")?;
    let busy = request(config.busy, LineRequestFlags::INPUT, 0, "epd7in5b_busy")?;

    Ok(Epd7in5b::new(spi, busy, dc, cs, rst, Delay))
}
