//! Display interface using SPI
use crate::epd7in5b::error::{DisplayError, Error};
use embedded_hal::{
    delay::DelayNs,
    digital::{InputPin, OutputPin},
    spi::SpiDevice,
};

const RESET_DELAY_MS: u32 = 200;
const RESET_PULSE_MS: u32 = 2;
const BUSY_POLL_MS: u32 = 10;
const BUSY_SETTLE_MS: u32 = 200;

/// The connection to the panel controller: the SPI bus and the four control
/// lines, plus the delay source used for every timed step.
pub struct DisplayInterface<SPI, BSY, DC, CS, RST, DELAY> {
    /// SPI device
    spi: SPI,
    /// High for busy, wait until display is ready!
    busy: BSY,
    /// Data/Command Control Pin (High for data, Low for command)
    dc: DC,
    /// Chip select, low while a byte is on the bus
    cs: CS,
    /// Pin for Reseting
    rst: RST,
    /// Delay provider
    pub(crate) delay: DELAY,
}

impl<SPI, BSY, DC, CS, RST, DELAY> DisplayInterface<SPI, BSY, DC, CS, RST, DELAY> {
    /// Bundle the bus, lines and delay
    pub fn new(spi: SPI, busy: BSY, dc: DC, cs: CS, rst: RST, delay: DELAY) -> Self {
        DisplayInterface {
            spi,
            busy,
            dc,
            cs,
            rst,
            delay,
        }
    }
}

impl<SPI, BSY, DC, CS, RST, DELAY> DisplayInterface<SPI, BSY, DC, CS, RST, DELAY>
where
    SPI: SpiDevice,
    BSY: InputPin,
    DC: OutputPin,
    CS: OutputPin,
    RST: OutputPin,
    DELAY: DelayNs,
{
    /// Send one command byte
    pub(crate) fn cmd(&mut self, command: u8) -> Result<(), Error> {
        // low for commands
        self.dc.set_low().map_err(|_| DisplayError::DCError)?;
        self.transmit(command).inspect_err(|_| {
            log::error!("SPI write error for command 0x{:02X}", command);
        })
    }

    /// Send data bytes, each one framed on its own
    pub(crate) fn data(&mut self, data: &[u8]) -> Result<(), Error> {
        for &byte in data {
            self.data_byte(byte)?;
        }
        Ok(())
    }

    /// Send one data byte
    pub(crate) fn data_byte(&mut self, byte: u8) -> Result<(), Error> {
        // high for data
        self.dc.set_high().map_err(|_| DisplayError::DCError)?;
        self.transmit(byte)
    }

    /// Basic function for sending a command and the data belonging to it.
    pub(crate) fn cmd_with_data(&mut self, command: u8, data: &[u8]) -> Result<(), Error> {
        self.cmd(command)?;
        self.data(data)
    }

    /// Send the same data byte `repetitions` times.
    /// Used for setting one value for the whole plane
    pub(crate) fn data_x_times(&mut self, val: u8, repetitions: usize) -> Result<(), Error> {
        for _ in 0..repetitions {
            self.data_byte(val)?;
        }
        log::debug!("Completed sending {} bytes of 0x{:02X}", repetitions, val);
        Ok(())
    }

    fn transmit(&mut self, byte: u8) -> Result<(), Error> {
        self.cs.set_low().map_err(|_| DisplayError::CSError)?;
        self.spi
            .write(&[byte])
            .map_err(|_| DisplayError::BusWriteError)?;
        self.cs.set_high().map_err(|_| DisplayError::CSError)?;
        Ok(())
    }

    /// Hardware reset: high, short low pulse, high again
    pub(crate) fn reset(&mut self) -> Result<(), Error> {
        self.rst.set_high().map_err(|_| DisplayError::RSError)?;
        self.delay.delay_ms(RESET_DELAY_MS);
        self.rst.set_low().map_err(|_| DisplayError::RSError)?;
        self.delay.delay_ms(RESET_PULSE_MS);
        self.rst.set_high().map_err(|_| DisplayError::RSError)?;
        self.delay.delay_ms(RESET_DELAY_MS);
        Ok(())
    }

    /// Block until the busy line goes low, then let the controller settle.
    ///
    /// There is no timeout. A panel that never releases the busy line
    /// blocks the caller forever.
    pub(crate) fn wait_until_idle(&mut self) -> Result<(), Error> {
        let mut polls: u32 = 0;
        loop {
            polls += 1;
            if !self.busy.is_high().map_err(|_| Error::BusyLine)? {
                break;
            }
            self.delay.delay_ms(BUSY_POLL_MS);
        }
        log::debug!("Busy line released after {} polls", polls);
        self.delay.delay_ms(BUSY_SETTLE_MS);
        Ok(())
    }

    /// Drive the three output lines low.
    ///
    /// Every line is attempted; the first failure is returned.
    pub(crate) fn release_lines(&mut self) -> Result<(), Error> {
        let cs = self.cs.set_low().map_err(|_| DisplayError::CSError);
        let dc = self.dc.set_low().map_err(|_| DisplayError::DCError);
        let rst = self.rst.set_low().map_err(|_| DisplayError::RSError);
        for result in [&cs, &dc, &rst] {
            if let Err(e) = result {
                log::warn!("Failed to drive line low on release: {:?}", e);
            }
        }
        cs.and(dc).and(rst).map_err(Error::from)
    }
}

#[cfg(test)]
pub(crate) mod mock {
    //! Recording doubles for the transport traits
    use core::convert::Infallible;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    use embedded_hal::delay::DelayNs;
    use embedded_hal::digital::{ErrorType as PinErrorType, InputPin, OutputPin};
    use embedded_hal::spi::{ErrorType as SpiErrorType, Operation, SpiDevice};

    /// Something the driver did to the hardware
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum Event {
        Line(Line, bool),
        Byte(u8),
        BusyRead(bool),
        DelayMs(u32),
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum Line {
        Dc,
        Cs,
        Rst,
    }

    pub type Log = Rc<RefCell<Vec<Event>>>;

    pub struct MockSpi(pub Log);

    impl SpiErrorType for MockSpi {
        type Error = Infallible;
    }

    impl SpiDevice for MockSpi {
        fn transaction(&mut self, operations: &mut [Operation<'_, u8>]) -> Result<(), Infallible> {
            for op in operations.iter() {
                if let Operation::Write(bytes) = op {
                    let mut log = self.0.borrow_mut();
                    log.extend(bytes.iter().map(|&b| Event::Byte(b)));
                }
            }
            Ok(())
        }
    }

    pub struct MockPin(pub Line, pub Log);

    impl PinErrorType for MockPin {
        type Error = Infallible;
    }

    impl OutputPin for MockPin {
        fn set_low(&mut self) -> Result<(), Infallible> {
            self.1.borrow_mut().push(Event::Line(self.0, false));
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Infallible> {
            self.1.borrow_mut().push(Event::Line(self.0, true));
            Ok(())
        }
    }

    /// Reads busy for as many polls as `remaining` holds, then idle.
    /// Every read fails while `fault` is set.
    pub struct MockBusy {
        pub remaining: Rc<Cell<u32>>,
        pub fault: Rc<Cell<bool>>,
        pub log: Log,
    }

    impl PinErrorType for MockBusy {
        type Error = PinFault;
    }

    impl InputPin for MockBusy {
        fn is_high(&mut self) -> Result<bool, PinFault> {
            if self.fault.get() {
                return Err(PinFault);
            }
            let left = self.remaining.get();
            let busy = left > 0;
            if busy {
                self.remaining.set(left - 1);
            }
            self.log.borrow_mut().push(Event::BusyRead(busy));
            Ok(busy)
        }

        fn is_low(&mut self) -> Result<bool, PinFault> {
            self.is_high().map(|high| !high)
        }
    }

    pub struct MockDelay(pub Log);

    impl DelayNs for MockDelay {
        fn delay_ns(&mut self, ns: u32) {
            self.0.borrow_mut().push(Event::DelayMs(ns / 1_000_000));
        }

        fn delay_ms(&mut self, ms: u32) {
            self.0.borrow_mut().push(Event::DelayMs(ms));
        }
    }

    /// A pin whose every operation fails
    pub struct BrokenPin;

    #[derive(Debug)]
    pub struct PinFault;

    impl embedded_hal::digital::Error for PinFault {
        fn kind(&self) -> embedded_hal::digital::ErrorKind {
            embedded_hal::digital::ErrorKind::Other
        }
    }

    impl PinErrorType for BrokenPin {
        type Error = PinFault;
    }

    impl OutputPin for BrokenPin {
        fn set_low(&mut self) -> Result<(), PinFault> {
            Err(PinFault)
        }

        fn set_high(&mut self) -> Result<(), PinFault> {
            Err(PinFault)
        }
    }

    impl InputPin for BrokenPin {
        fn is_high(&mut self) -> Result<bool, PinFault> {
            Err(PinFault)
        }

        fn is_low(&mut self) -> Result<bool, PinFault> {
            Err(PinFault)
        }
    }

    pub type MockInterface =
        super::DisplayInterface<MockSpi, MockBusy, MockPin, MockPin, MockPin, MockDelay>;

    /// Interface over fresh doubles; `busy` counts the busy polls of the next waits.
    pub fn interface() -> (MockInterface, Log, Rc<Cell<u32>>) {
        let (interface, log, busy, _) = interface_with_busy_fault();
        (interface, log, busy)
    }

    /// Like [`interface`], plus a switch that makes the busy line unreadable.
    pub fn interface_with_busy_fault() -> (MockInterface, Log, Rc<Cell<u32>>, Rc<Cell<bool>>) {
        let log: Log = Rc::default();
        let busy = Rc::new(Cell::new(0));
        let fault = Rc::new(Cell::new(false));
        let interface = super::DisplayInterface::new(
            MockSpi(log.clone()),
            MockBusy {
                remaining: busy.clone(),
                fault: fault.clone(),
                log: log.clone(),
            },
            MockPin(Line::Dc, log.clone()),
            MockPin(Line::Cs, log.clone()),
            MockPin(Line::Rst, log.clone()),
            MockDelay(log.clone()),
        );
        (interface, log, busy, fault)
    }

    /// A command byte and the data bytes that followed it
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct Frame {
        pub cmd: u8,
        pub data: Vec<u8>,
    }

    /// Rebuild the command/data stream from the log using the D/C level
    /// at the moment each byte went out.
    pub fn frames(log: &[Event]) -> Vec<Frame> {
        let mut frames: Vec<Frame> = Vec::new();
        let mut dc = false;
        for event in log {
            match *event {
                Event::Line(Line::Dc, level) => dc = level,
                Event::Byte(b) if !dc => frames.push(Frame {
                    cmd: b,
                    data: Vec::new(),
                }),
                Event::Byte(b) => {
                    if let Some(frame) = frames.last_mut() {
                        frame.data.push(b);
                    }
                }
                _ => {}
            }
        }
        frames
    }
}
