use std::{num::NonZeroU32, path::Path};

use frameloop_common::args;
use image::{imageops, io::Reader as ImageReader, DynamicImage, GrayImage};

const DEFAULT_SIDE: NonZeroU32 = match NonZeroU32::new(64) {
    Some(side) => side,
    None => panic!("64 is not zero"),
};

args! {
    #[derive(Copy, Clone)]
    Downscale {
        "Width of the grayscale thumbnail that frames are compared by"
        signature_width: NonZeroU32 = DEFAULT_SIDE;

        "Height of the grayscale thumbnail that frames are compared by"
        signature_height: NonZeroU32 = DEFAULT_SIDE;
    }
}

impl Downscale {
    pub fn dimensions(&self) -> (u32, u32) {
        (self.signature_width.get(), self.signature_height.get())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SignatureError {
    #[error("a {width}x{height} signature needs {expected} values, got {actual}")]
    WrongLength {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
}

/// A heavily downscaled grayscale version of a frame. Only coarse structure survives,
/// which makes it a cheap proxy for visual similarity.
#[derive(Clone, Debug, PartialEq)]
pub struct Signature {
    width: u32,
    height: u32,
    values: Vec<f32>,
}

impl Signature {
    pub fn new(width: u32, height: u32, values: Vec<f32>) -> Result<Self, SignatureError> {
        let expected = width as usize * height as usize;
        if values.len() != expected {
            return Err(SignatureError::WrongLength {
                width,
                height,
                expected,
                actual: values.len(),
            });
        }
        Ok(Self {
            width,
            height,
            values,
        })
    }

    pub fn uniform(width: u32, height: u32, value: f32) -> Self {
        Self {
            width,
            height,
            values: vec![value; width as usize * height as usize],
        }
    }

    pub fn from_gray(img: &GrayImage) -> Self {
        Self {
            width: img.width(),
            height: img.height(),
            values: img.pixels().map(|luma| f32::from(luma[0])).collect(),
        }
    }

    /// Converts to luma and area-averages it down to the configured size.
    pub fn from_image(img: &DynamicImage, conf: &Downscale) -> Self {
        let (width, height) = conf.dimensions();
        let gray = img.to_luma8();
        Self::from_gray(&imageops::thumbnail(&gray, width, height))
    }

    /// Decodes by content, the extension is only a fallback.
    pub fn from_path(path: impl AsRef<Path>, conf: &Downscale) -> image::ImageResult<Self> {
        let img = ImageReader::open(path)?.with_guessed_format()?.decode()?;
        Ok(Self::from_image(&img, conf))
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }

    /// Sum of squared differences
    pub fn distance(&self, other: &Signature) -> f64 {
        assert_eq!(
            self.dimensions(),
            other.dimensions(),
            "signatures of different sizes are not comparable"
        );
        self.values
            .iter()
            .zip(other.values.iter())
            .map(|(&a, &b)| {
                let diff = f64::from(a) - f64::from(b);
                diff * diff
            })
            .sum()
    }
}
