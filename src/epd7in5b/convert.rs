//! Conversion of source images into the panel's packed colour planes
//!
//! A plane holds one bit per pixel, most significant bit first, rows of
//! [`STRIDE`] bytes from the top-left corner. The loop always covers the
//! whole panel: larger images are cropped and smaller ones are padded with
//! white.
//!
//! A white pixel sets its own bit and every lower bit of the byte it falls
//! in, so the first white pixel of a byte also whitens the pixels after it.
//! The panel was brought up with this packing and it is kept as is.

use core::convert::Infallible;

use embedded_graphics::{pixelcolor::BinaryColor, prelude::*};
use image::{DynamicImage, GenericImageView, ImageBuffer, Pixel as _, Rgba};

use crate::epd7in5b::{BUFFER_LEN, HEIGHT, STRIDE, WIDTH};

/// A read-only 2-D pixel grid that can be reduced to black and white.
pub trait PixelSource {
    /// Width and height in pixels
    fn dimensions(&self) -> (u32, u32);

    /// Whether the pixel at `(x, y)` is nearer white than black.
    ///
    /// Only called for coordinates inside [`dimensions`](Self::dimensions).
    fn is_white(&self, x: u32, y: u32) -> bool;
}

/// Convert `image` into a plane of [`BUFFER_LEN`] bytes.
pub fn convert<S: PixelSource + ?Sized>(image: &S) -> Vec<u8> {
    let (image_width, image_height) = image.dimensions();
    let mut buffer = vec![0u8; BUFFER_LEN];
    let mut byte: u8 = 0x00;

    for j in 0..HEIGHT as u32 {
        for i in 0..WIDTH as u32 {
            let white = if i < image_width && j < image_height {
                image.is_white(i, j)
            } else {
                true
            };

            if white {
                byte |= 0xFF >> (i % 8);
            }

            if i % 8 == 7 {
                buffer[(i / 8) as usize + j as usize * STRIDE] = byte;
                byte = 0x00;
            }
        }
    }
    buffer
}

/// Nearest match of a straight-alpha RGBA pixel against {black, white}.
///
/// Distances are taken on alpha-premultiplied 16-bit channels. A tie goes
/// to black.
pub fn is_nearer_white(Rgba([r, g, b, a]): Rgba<u8>) -> bool {
    let alpha = u32::from(a);
    let premultiply = |c: u8| (u32::from(c) * 0x101) * alpha / 0xFF;
    let pixel = [premultiply(r), premultiply(g), premultiply(b), alpha * 0x101];

    let distance = |palette: [u32; 4]| -> u32 {
        pixel
            .iter()
            .zip(palette)
            .map(|(&c, p)| {
                let d = c.abs_diff(p);
                (d * d) >> 2
            })
            .sum()
    };

    let to_black = distance([0, 0, 0, 0xFFFF]);
    let to_white = distance([0xFFFF; 4]);
    to_white < to_black
}

impl PixelSource for DynamicImage {
    fn dimensions(&self) -> (u32, u32) {
        GenericImageView::dimensions(self)
    }

    fn is_white(&self, x: u32, y: u32) -> bool {
        is_nearer_white(GenericImageView::get_pixel(self, x, y))
    }
}

impl<P> PixelSource for ImageBuffer<P, Vec<u8>>
where
    P: image::Pixel<Subpixel = u8>,
{
    fn dimensions(&self) -> (u32, u32) {
        ImageBuffer::dimensions(self)
    }

    fn is_white(&self, x: u32, y: u32) -> bool {
        is_nearer_white(ImageBuffer::get_pixel(self, x, y).to_rgba())
    }
}

/// An in-memory drawing surface for `embedded-graphics`.
///
/// `BinaryColor::On` is ink (black or red, depending on which plane the
/// canvas is sent as), `BinaryColor::Off` is background.
#[derive(Debug, Clone)]
pub struct Canvas {
    width: u32,
    height: u32,
    ink: Vec<bool>,
}

impl Canvas {
    /// Blank canvas of the given size
    pub fn new(width: u32, height: u32) -> Self {
        Canvas {
            width,
            height,
            ink: vec![false; width as usize * height as usize],
        }
    }

    /// Blank canvas covering the whole panel
    pub fn full_panel() -> Self {
        Canvas::new(u32::from(WIDTH), u32::from(HEIGHT))
    }

    fn index(&self, point: Point) -> Option<usize> {
        let x = u32::try_from(point.x).ok()?;
        let y = u32::try_from(point.y).ok()?;
        (x < self.width && y < self.height).then(|| y as usize * self.width as usize + x as usize)
    }
}

impl OriginDimensions for Canvas {
    fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

impl DrawTarget for Canvas {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if let Some(idx) = self.index(point) {
                self.ink[idx] = color.is_on();
            }
        }
        Ok(())
    }
}

impl PixelSource for Canvas {
    fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn is_white(&self, x: u32, y: u32) -> bool {
        !self.ink[y as usize * self.width as usize + x as usize]
    }
}
