//! Blood region detection over segmentation masks.

use std::path::{Path, PathBuf};

use image::{imageops, GrayImage, RgbImage};

use crate::config::{BLOOD_BLURRED_SUFFIX, BLOOD_RED_RATIO_THRESHOLD};

/// Boolean per-pixel membership of one segmented region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentMask {
    width: u32,
    height: u32,
    pixels: Vec<bool>,
}

impl SegmentMask {
    /// Mask with no pixels set.
    pub fn empty(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![false; (width as usize) * (height as usize)],
        }
    }

    /// Axis-aligned rectangle, clipped to the mask bounds.
    pub fn rect(width: u32, height: u32, x: u32, y: u32, w: u32, h: u32) -> Self {
        let mut mask = Self::empty(width, height);
        for py in y..(y.saturating_add(h)).min(height) {
            for px in x..(x.saturating_add(w)).min(width) {
                mask.set(px, py);
            }
        }
        mask
    }

    /// Interpret a grayscale image as a mask; bright pixels are members.
    pub fn from_luma(image: &GrayImage) -> Self {
        Self {
            width: image.width(),
            height: image.height(),
            pixels: image.pixels().map(|p| p.0[0] > 127).collect(),
        }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn index(&self, x: u32, y: u32) -> usize {
        (y as usize) * (self.width as usize) + (x as usize)
    }

    pub fn set(&mut self, x: u32, y: u32) {
        let i = self.index(x, y);
        self.pixels[i] = true;
    }

    pub fn contains(&self, x: u32, y: u32) -> bool {
        x < self.width && y < self.height && self.pixels[self.index(x, y)]
    }

    pub fn area(&self) -> usize {
        self.pixels.iter().filter(|p| **p).count()
    }

    pub fn is_empty(&self) -> bool {
        self.area() == 0
    }

    fn members(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        let width = self.width as usize;
        self.pixels
            .iter()
            .enumerate()
            .filter(|(_, set)| **set)
            .map(move |(i, _)| ((i % width) as u32, (i / width) as u32))
    }
}

/// Mean RGB over the masked pixels, `None` when the mask is empty or does
/// not match the image size.
pub fn mean_color(image: &RgbImage, mask: &SegmentMask) -> Option<[f32; 3]> {
    if mask.dimensions() != image.dimensions() {
        tracing::warn!(
            mask = ?mask.dimensions(),
            image = ?image.dimensions(),
            "Segment mask size does not match image"
        );
        return None;
    }

    let mut sum = [0f64; 3];
    let mut count = 0usize;
    for (x, y) in mask.members() {
        let pixel = image.get_pixel(x, y).0;
        for (acc, channel) in sum.iter_mut().zip(pixel) {
            *acc += f64::from(channel);
        }
        count += 1;
    }

    if count == 0 {
        return None;
    }
    Some(sum.map(|s| (s / count as f64) as f32))
}

/// Red share of a color: `R / (R + G + B + 1e-6)`.
pub fn red_ratio(color: [f32; 3]) -> f32 {
    let [r, g, b] = color;
    r / (r + g + b + 1e-6)
}

/// Whether the region's mean color is red-dominant.
pub fn is_blood_region(image: &RgbImage, mask: &SegmentMask) -> bool {
    mean_color(image, mask)
        .map(|color| red_ratio(color) > BLOOD_RED_RATIO_THRESHOLD)
        .unwrap_or(false)
}

/// Replace every pixel covered by `masks` with a Gaussian-blurred copy of
/// the image. Pixels outside the masks are left untouched.
pub fn blur_regions(image: &RgbImage, masks: &[&SegmentMask], sigma: f32) -> RgbImage {
    let mut output = image.clone();
    if masks.is_empty() {
        return output;
    }

    let blurred = imageops::blur(image, sigma);
    for mask in masks {
        for (x, y) in mask.members() {
            if x < output.width() && y < output.height() {
                output.put_pixel(x, y, *blurred.get_pixel(x, y));
            }
        }
    }
    output
}

/// Split an image into square tiles, one mask per tile.
pub fn tile_masks(width: u32, height: u32, tile: u32) -> Vec<SegmentMask> {
    let tile = tile.max(1);
    let mut masks = Vec::new();
    for y in (0..height).step_by(tile as usize) {
        for x in (0..width).step_by(tile as usize) {
            masks.push(SegmentMask::rect(width, height, x, y, tile, tile));
        }
    }
    masks
}

/// `dir/photo.png` becomes `dir/photo_blood_blurred.png`.
pub fn blurred_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let file_name = match input.extension() {
        Some(ext) => format!("{}{}.{}", stem, BLOOD_BLURRED_SUFFIX, ext.to_string_lossy()),
        None => format!("{}{}", stem, BLOOD_BLURRED_SUFFIX),
    };
    input.with_file_name(file_name)
}
