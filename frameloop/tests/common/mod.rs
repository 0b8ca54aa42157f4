// NOTE: every test will complain about the functions it doesn't use
#![allow(unused)]

use std::path::{Path, PathBuf};

use image::{Rgb, RgbImage};
use tempfile::TempDir;

pub const FRAME_SIZE: u32 = 128;

/// Returns a fresh temporary directory
pub fn tmp_dir() -> TempDir {
    tempfile::tempdir().expect("could not create temporary dir")
}

/// Writes a frame of a single gray level
pub fn write_uniform(dir: &Path, name: &str, value: u8) -> PathBuf {
    let path = dir.join(name);
    RgbImage::from_pixel(FRAME_SIZE, FRAME_SIZE, Rgb([value, value, value]))
        .save(&path)
        .expect("could not save the frame");
    path
}

/// Writes a frame where a white vertical bar sits at column `x` of a black background
pub fn write_bar(dir: &Path, name: &str, x: u32) -> PathBuf {
    let path = dir.join(name);
    RgbImage::from_fn(FRAME_SIZE, FRAME_SIZE, |px, _| {
        if px.abs_diff(x) <= 2 {
            Rgb([255, 255, 255])
        } else {
            Rgb([0, 0, 0])
        }
    })
    .save(&path)
    .expect("could not save the frame");
    path
}

/// Writes a file with an image extension that isn't an image
pub fn write_garbage(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, b"this is not an image").expect("could not write garbage");
    path
}

pub fn file_names(paths: &[PathBuf]) -> Vec<String> {
    paths
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect()
}
