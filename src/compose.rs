use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};

/// Lanczos resample to exactly `width` x `height`. Aspect ratio is the caller's problem.
///
/// Colour is resampled premultiplied by alpha, so fully transparent pixels
/// contribute nothing to the edges of the logo.
pub fn resize(image: &RgbaImage, width: u32, height: u32) -> RgbaImage {
    let mut premultiplied = image.clone();
    premultiply(&mut premultiplied);
    let mut resized = imageops::resize(&premultiplied, width, height, FilterType::Lanczos3);
    unpremultiply(&mut resized);
    resized
}

fn premultiply(image: &mut RgbaImage) {
    for pixel in image.pixels_mut() {
        let alpha = pixel[3] as u32;
        for c in 0..3 {
            pixel[c] = div255(pixel[c] as u32 * alpha);
        }
    }
}

fn unpremultiply(image: &mut RgbaImage) {
    for pixel in image.pixels_mut() {
        let alpha = pixel[3] as u32;
        for c in 0..3 {
            pixel[c] = if alpha == 0 {
                0
            } else {
                ((pixel[c] as u32 * 255 + alpha / 2) / alpha).min(255) as u8
            };
        }
    }
}

/// Side of the logo when it fills `fraction` of a `canvas_size` square, truncated.
pub fn logo_size(canvas_size: u32, fraction: f64) -> u32 {
    (canvas_size as f64 * fraction) as u32
}

/// Floor division: odd remainders push the logo towards the top-left.
pub fn centered_offset(canvas_size: u32, logo_size: u32) -> u32 {
    canvas_size.saturating_sub(logo_size) / 2
}

/// Opaque `canvas_size` square with the logo resized to `logo_size` and
/// pasted at (`offset`, `offset`) through its own alpha.
pub fn compose_at(
    logo: &RgbaImage,
    canvas_size: u32,
    logo_size: u32,
    offset: u32,
    background: Rgba<u8>,
) -> RgbaImage {
    let mut canvas = RgbaImage::from_pixel(canvas_size, canvas_size, background);
    let resized = resize(logo, logo_size, logo_size);
    log::debug!(
        "Compositing {}px logo at ({}, {}) on {}px canvas",
        logo_size, offset, offset, canvas_size
    );
    paste_masked(&mut canvas, &resized, offset, offset);
    canvas
}

pub fn compose_on_canvas(
    logo: &RgbaImage,
    canvas_size: u32,
    fraction: f64,
    background: Rgba<u8>,
) -> RgbaImage {
    let size = logo_size(canvas_size, fraction);
    let offset = centered_offset(canvas_size, size);
    compose_at(logo, canvas_size, size, offset, background)
}

/// Blends every channel of `src` into `canvas`, alpha included, weighted by
/// the source alpha. Pixels falling outside the canvas are dropped.
pub fn paste_masked(canvas: &mut RgbaImage, src: &RgbaImage, x: u32, y: u32) {
    let (canvas_w, canvas_h) = canvas.dimensions();
    for (sx, sy, pixel) in src.enumerate_pixels() {
        let (dx, dy) = (x + sx, y + sy);
        if dx >= canvas_w || dy >= canvas_h {
            continue;
        }
        let mask = pixel[3];
        let dst = canvas.get_pixel_mut(dx, dy);
        for c in 0..4 {
            dst[c] = blend(dst[c], pixel[c], mask);
        }
    }
}

fn blend(dst: u8, src: u8, mask: u8) -> u8 {
    let v = dst as u32 * (255 - mask as u32) + src as u32 * mask as u32;
    div255(v)
}

// Rounded division by 255 without a divide.
fn div255(v: u32) -> u8 {
    let tmp = v + 128;
    (((tmp >> 8) + tmp) >> 8) as u8
}
