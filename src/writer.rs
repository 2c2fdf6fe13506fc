use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use image::codecs::ico::{IcoEncoder, IcoFrame};
use image::{ColorType, ImageFormat, RgbaImage};
use crate::error::IconError;

pub fn save_png(image: &RgbaImage, path: &Path) -> Result<(), IconError> {
    image
        .save_with_format(path, ImageFormat::Png)
        .map_err(|e| IconError::image(path, e))?;
    log::debug!("Wrote {} ({}x{})", path.display(), image.width(), image.height());
    Ok(())
}

/// Writes one ICO container with a PNG-encoded entry per frame, smallest first.
///
/// Frames must be square, at most 256px, and of distinct sizes.
pub fn save_multi_frame_icon(frames: &[&RgbaImage], path: &Path) -> Result<(), IconError> {
    debug_assert!(
        frames.iter().all(|frame| frame.width() == frame.height()),
        "icon frames must be square"
    );
    let mut ordered = frames.to_vec();
    ordered.sort_by_key(|frame| frame.width());

    let entries = ordered
        .iter()
        .map(|frame| {
            IcoFrame::as_png(frame.as_raw(), frame.width(), frame.height(), ColorType::Rgba8)
        })
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| IconError::image(path, e))?;

    let file = File::create(path).map_err(|e| IconError::io(path, e))?;
    let mut writer = BufWriter::new(file);
    IcoEncoder::new(&mut writer)
        .encode_images(&entries)
        .map_err(|e| IconError::image(path, e))?;
    writer.flush().map_err(|e| IconError::io(path, e))?;

    let sizes: Vec<u32> = ordered.iter().map(|frame| frame.width()).collect();
    log::debug!("Wrote {} with frames {:?}", path.display(), sizes);
    Ok(())
}
