use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use image::DynamicImage;
use tracing_subscriber::filter::LevelFilter;

use epaper::epd7in5b::linux::{self, HardwareConfig, LinuxEpd};
use epaper::{PixelSource, Pins};

/// Show PNG images on the 7.5" black/white/red e-paper panel
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Image drawn in black
    black: PathBuf,

    /// Image drawn in red
    red: Option<PathBuf>,

    /// SPI device node
    #[arg(long, default_value = Pins::SPI_DEVICE)]
    spi: String,

    /// GPIO character device
    #[arg(long, default_value = Pins::GPIO_CHIP)]
    gpio_chip: String,

    /// Do not clear the panel before drawing
    #[arg(long)]
    no_clear: bool,

    /// Leave the panel awake when done
    #[arg(long)]
    no_sleep: bool,

    /// Pause between steps, in milliseconds
    #[arg(long, default_value_t = 500)]
    pause_ms: u64,

    /// Log every step of the panel protocol
    #[arg(short, long)]
    verbose: bool,
}

fn load_png(path: &Path) -> Result<DynamicImage> {
    let img = image::open(path).with_context(|| format!("failed to load {}", path.display()))?;
    log::info!(
        "Loaded {} ({}x{})",
        path.display(),
        img.width(),
        img.height()
    );
    Ok(img)
}

fn run(
    epd: &mut LinuxEpd,
    args: &Args,
    black: &DynamicImage,
    red: Option<&DynamicImage>,
) -> Result<()> {
    let pause = Duration::from_millis(args.pause_ms);

    epd.initialize().context("initializing panel")?;

    if !args.no_clear {
        epd.clear_display().context("clearing panel")?;
        thread::sleep(pause);
    }

    epd.display_image(Some(black), red.map(|img| img as &dyn PixelSource))
        .context("displaying images")?;
    thread::sleep(pause);

    if !args.no_sleep {
        epd.sleep().context("putting panel to sleep")?;
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(if args.verbose {
            LevelFilter::DEBUG
        } else {
            LevelFilter::INFO
        })
        .init();

    // decode everything before touching the hardware
    let black = load_png(&args.black)?;
    let red = args.red.as_deref().map(load_png).transpose()?;

    let config = HardwareConfig {
        spi_device: args.spi.clone(),
        gpio_chip: args.gpio_chip.clone(),
        ..HardwareConfig::default()
    };
    let mut epd = linux::open(&config).context("fatal: could not set up the panel")?;

    let outcome = run(&mut epd, &args, &black, red.as_ref());
    let released = epd.teardown().context("releasing panel lines");

    outcome.and(released)?;
    log::info!("Done");
    Ok(())
}
