//! Panel command sequences
//!
//! This module holds the driver that walks the controller through its
//! lifecycle:
//!
//! - `initialize()` - hardware reset and the controller init sequence
//! - `clear_display()` - white black plane, empty red plane, refresh
//! - `display_image()` - convert and send up to two images, refresh
//! - `sleep()` - enter deep sleep
//! - `teardown()` - drive the output lines low and stop using the bus
//!
//! ## Critical Implementation Details
//!
//! ### Red plane polarity
//!
//! The red RAM is inverted relative to the black RAM: a converted red image
//! is complemented byte by byte before it is sent, so ink (black in the
//! source) ends up red.
//!
//! ### Operation order
//!
//! The driver tracks a [`PanelState`] and rejects operations the panel can
//! not accept in that state with [`Error::Sequence`] instead of sending
//! them.
//!
//! ### Teardown
//!
//! `teardown()` runs once. If the caller never calls it, dropping the driver
//! does it.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};
use embedded_hal::spi::SpiDevice;

use crate::epd7in5b::convert::{convert, PixelSource};
use crate::epd7in5b::error::{Error, PanelState};
use crate::epd7in5b::interface::DisplayInterface;
use crate::epd7in5b::{cmd::Cmd, flag::Flag, BUFFER_LEN};

/// Settle time between MASTER_ACTIVATE and the first busy poll
const ACTIVATE_SETTLE_MS: u32 = 200;

/// Driver for the 7.5" black/white/red panel
///
/// ## Type Parameters
///
/// - `SPI` - SPI device for communication
/// - `BSY` - BUSY input pin (HIGH when display is busy)
/// - `DC` - Data/Command output pin
/// - `CS` - Chip select output pin
/// - `RST` - Reset output pin
/// - `DELAY` - Delay provider for timing
pub struct Epd7in5b<SPI, BSY, DC, CS, RST, DELAY>
where
    SPI: SpiDevice,
    BSY: InputPin,
    DC: OutputPin,
    CS: OutputPin,
    RST: OutputPin,
    DELAY: DelayNs,
{
    interface: DisplayInterface<SPI, BSY, DC, CS, RST, DELAY>,
    state: PanelState,
}

impl<SPI, BSY, DC, CS, RST, DELAY> Epd7in5b<SPI, BSY, DC, CS, RST, DELAY>
where
    SPI: SpiDevice,
    BSY: InputPin,
    DC: OutputPin,
    CS: OutputPin,
    RST: OutputPin,
    DELAY: DelayNs,
{
    /// Take ownership of the bus and lines. Nothing is sent yet.
    pub fn new(spi: SPI, busy: BSY, dc: DC, cs: CS, rst: RST, delay: DELAY) -> Self {
        Self::from_interface(DisplayInterface::new(spi, busy, dc, cs, rst, delay))
    }

    /// Create a new instance from an existing interface without initialization
    pub fn from_interface(interface: DisplayInterface<SPI, BSY, DC, CS, RST, DELAY>) -> Self {
        log::debug!("creating new Epd7in5b instance");
        Epd7in5b {
            interface,
            state: PanelState::Uninitialized,
        }
    }

    /// Current lifecycle state
    pub fn state(&self) -> PanelState {
        self.state
    }

    fn expect_ready(&self, operation: &'static str) -> Result<(), Error> {
        if self.state.is_ready() {
            Ok(())
        } else {
            log::error!("{} rejected, panel is {}", operation, self.state);
            Err(Error::Sequence {
                operation,
                state: self.state,
            })
        }
    }

    /// Reset the panel and run the controller init sequence.
    ///
    /// Valid in every state until teardown, so a sleeping panel can be
    /// woken up with it. If the sequence fails the panel is left
    /// [`PanelState::Uninitialized`].
    pub fn initialize(&mut self) -> Result<(), Error> {
        if self.state == PanelState::Released {
            return Err(Error::Sequence {
                operation: "initialize",
                state: self.state,
            });
        }
        log::info!("Initializing e-paper panel");

        // the controller loses its setup with the reset pulse
        self.state = PanelState::Uninitialized;
        self.interface.reset()?;

        self.interface.cmd(Cmd::SW_RESET)?;
        self.interface.wait_until_idle()?;

        self.interface
            .cmd_with_data(Cmd::AUTO_WRITE_RED_RAM, &[Flag::AUTO_WRITE_PATTERN])?;
        self.interface.wait_until_idle()?;

        self.interface
            .cmd_with_data(Cmd::AUTO_WRITE_BW_RAM, &[Flag::AUTO_WRITE_PATTERN])?;
        self.interface.wait_until_idle()?;

        self.interface
            .cmd_with_data(Cmd::SOFT_START_SETTING, &Flag::SOFT_START)?;

        self.interface
            .cmd_with_data(Cmd::DRIVER_CONTROL, &Flag::DRIVER_OUTPUT)?;

        self.interface
            .cmd_with_data(Cmd::DATA_ENTRY_MODE, &[Flag::DATA_ENTRY_DECRY_INCRX])?;

        self.interface
            .cmd_with_data(Cmd::SET_RAMXPOS, &Flag::RAM_X_WINDOW)?;
        self.interface
            .cmd_with_data(Cmd::SET_RAMYPOS, &Flag::RAM_Y_WINDOW)?;

        self.interface.cmd_with_data(
            Cmd::BORDER_WAVEFORM_CONTROL,
            &[Flag::BORDER_WAVEFORM_LUT1_WHITE],
        )?;

        // load temperature and waveform setting
        self.interface
            .cmd_with_data(Cmd::TEMP_CONTROL, &[Flag::INTERNAL_TEMP_SENSOR])?;
        self.interface.cmd_with_data(
            Cmd::DISPLAY_UPDATE_CTRL2,
            &[Flag::DISPLAY_UPDATE_LOAD_TEMP_WAVEFORM],
        )?;
        self.interface.cmd(Cmd::MASTER_ACTIVATE)?;
        self.interface.wait_until_idle()?;

        self.interface
            .cmd_with_data(Cmd::SET_RAMX_COUNTER, &Flag::RAM_X_ORIGIN)?;

        self.prepare_draw()?;

        self.state = PanelState::Initialized;
        log::info!("Panel initialized");
        Ok(())
    }

    /// Point the RAM address counter at the start of the window
    fn prepare_draw(&mut self) -> Result<(), Error> {
        self.interface
            .cmd_with_data(Cmd::SET_RAMY_COUNTER, &Flag::RAM_Y_ORIGIN)
    }

    /// Refresh the panel from RAM with the built-in LUT and wait for it
    fn turn_on_display(&mut self) -> Result<(), Error> {
        log::info!("Refreshing panel");
        self.interface.cmd_with_data(
            Cmd::DISPLAY_UPDATE_CTRL2,
            &[Flag::DISPLAY_UPDATE_BUILTIN_LUT],
        )?;
        self.interface.cmd(Cmd::MASTER_ACTIVATE)?;
        self.interface.delay.delay_ms(ACTIVATE_SETTLE_MS);
        self.interface.wait_until_idle()
    }

    /// Make the black plane white, empty the red plane and refresh.
    pub fn clear_display(&mut self) -> Result<(), Error> {
        self.expect_ready("clear_display")?;
        log::info!("Clearing panel");
        self.prepare_draw()?;

        self.interface.cmd(Cmd::WRITE_BW_DATA)?;
        self.interface.data_x_times(Flag::BW_RAM_WHITE, BUFFER_LEN)?;

        self.interface.cmd(Cmd::WRITE_RED_DATA)?;
        self.interface.data_x_times(Flag::RED_RAM_NONE, BUFFER_LEN)?;

        self.turn_on_display()?;
        self.state = PanelState::Cleared;
        Ok(())
    }

    /// Show `black` in black and `red` in red, then refresh.
    ///
    /// A plane whose image is `None` is not written and keeps what it held.
    /// The refresh runs even when both are `None`.
    pub fn display_image(
        &mut self,
        black: Option<&dyn PixelSource>,
        red: Option<&dyn PixelSource>,
    ) -> Result<(), Error> {
        self.expect_ready("display_image")?;
        self.prepare_draw()?;

        if let Some(image) = black {
            log::info!("Writing black plane");
            let plane = convert(image);
            self.interface.cmd(Cmd::WRITE_BW_DATA)?;
            self.interface.data(&plane)?;
        }

        if let Some(image) = red {
            log::info!("Writing red plane");
            let plane = convert(image);
            self.interface.cmd(Cmd::WRITE_RED_DATA)?;
            for byte in plane {
                self.interface.data_byte(!byte)?;
            }
        }

        self.turn_on_display()?;
        self.state = PanelState::Displaying;
        Ok(())
    }

    /// Enter deep sleep. Only [`initialize`](Self::initialize) wakes the panel.
    pub fn sleep(&mut self) -> Result<(), Error> {
        self.expect_ready("sleep")?;
        log::info!("Putting panel to deep sleep");
        self.interface
            .cmd_with_data(Cmd::DEEP_SLEEP_MODE, &[Flag::DEEP_SLEEP_MODE_1])?;
        self.state = PanelState::Sleeping;
        Ok(())
    }

    /// Drive reset, D/C and CS low and stop using the bus.
    ///
    /// Runs once; later calls return `Ok` without touching the lines.
    pub fn teardown(&mut self) -> Result<(), Error> {
        if self.state == PanelState::Released {
            return Ok(());
        }
        log::info!("Releasing panel lines");
        self.state = PanelState::Released;
        self.interface.release_lines()
    }
}

impl<SPI, BSY, DC, CS, RST, DELAY> Drop for Epd7in5b<SPI, BSY, DC, CS, RST, DELAY>
where
    SPI: SpiDevice,
    BSY: InputPin,
    DC: OutputPin,
    CS: OutputPin,
    RST: OutputPin,
    DELAY: DelayNs,
{
    fn drop(&mut self) {
        if let Err(e) = self.teardown() {
            log::error!("Teardown on drop failed: {}", e);
        }
    }
}
