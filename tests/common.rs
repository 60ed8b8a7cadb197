#![allow(dead_code)]

use assert_fs::prelude::*;
use assert_fs::TempDir;
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use std::io::Cursor;

/// Encode a small gradient as PNG bytes.
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x * 5 % 256) as u8, (y * 3 % 256) as u8, 128])
    });
    let mut cursor = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(img)
        .write_to(&mut cursor, ImageFormat::Png)
        .unwrap();
    cursor.into_inner()
}

/// Lay out a mixed input directory:
/// two real PNGs, one corrupt "jpg", one text file and one existing webp.
pub fn create_mixed_inputs(temp_dir: &TempDir) {
    temp_dir.child("a.png").write_binary(&png_bytes(24, 16)).unwrap();
    temp_dir.child("b.png").write_binary(&png_bytes(40, 40)).unwrap();
    temp_dir.child("broken.jpg").write_binary(b"fake jpg data").unwrap();
    temp_dir.child("notes.txt").write_str("not an image").unwrap();
    temp_dir.child("done.webp").write_binary(b"RIFF....WEBP").unwrap();
}

pub fn create_temp_directory() -> TempDir {
    TempDir::new().unwrap()
}
