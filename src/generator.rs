use std::path::PathBuf;
use image::{Rgba, RgbaImage};
use crate::compose::{compose_at, compose_on_canvas, resize};
use crate::config::GeneratorConfig;
use crate::error::IconError;
use crate::writer::{save_multi_frame_icon, save_png};

pub const ICO_SIZES: [u32; 3] = [16, 32, 48];
pub const APPLE_TOUCH_SIZE: u32 = 180;
pub const APPLE_TOUCH_LOGO: u32 = 140;
pub const APPLE_TOUCH_OFFSET: u32 = 20;
pub const MANIFEST_SIZES: [u32; 2] = [192, 512];
pub const MANIFEST_LOGO_FRACTION: f64 = 0.75;

pub struct IconGenerator {
    config: GeneratorConfig,
    source: RgbaImage,
}

impl IconGenerator {
    /// Decodes the source logo. Nothing is written if this fails.
    pub fn load(config: GeneratorConfig) -> Result<Self, IconError> {
        let path = config.source_path();
        log::info!("Loading source logo from {}", path.display());
        let source = image::open(&path)
            .map_err(|e| IconError::image(&path, e))?
            .to_rgba8();
        log::debug!("Source logo is {}x{}", source.width(), source.height());
        Ok(Self { config, source })
    }

    fn background(&self) -> Rgba<u8> {
        Rgba(self.config.background)
    }

    /// Writes every asset in order and returns the paths written.
    pub fn generate(&self) -> Result<Vec<PathBuf>, IconError> {
        let mut written = Vec::new();

        written.push(self.write_favicon_ico()?);
        println!("favicon.ico done");

        written.push(self.write_apple_touch_icon()?);
        println!("apple-touch-icon.png done");

        for size in MANIFEST_SIZES {
            written.push(self.write_manifest_icon(size)?);
            println!("icon-{}.png done", size);
        }

        written.extend(self.write_png_favicons()?);
        println!("favicon PNGs done");

        println!("All done!");
        Ok(written)
    }

    fn write_favicon_ico(&self) -> Result<PathBuf, IconError> {
        let frames: Vec<RgbaImage> = ICO_SIZES
            .iter()
            .map(|&size| resize(&self.source, size, size))
            .collect();
        let path = self.config.output_path("favicon.ico");
        save_multi_frame_icon(&frames.iter().collect::<Vec<_>>(), &path)?;
        Ok(path)
    }

    fn write_apple_touch_icon(&self) -> Result<PathBuf, IconError> {
        let icon = compose_at(
            &self.source,
            APPLE_TOUCH_SIZE,
            APPLE_TOUCH_LOGO,
            APPLE_TOUCH_OFFSET,
            self.background(),
        );
        let path = self.config.output_path("apple-touch-icon.png");
        save_png(&icon, &path)?;
        Ok(path)
    }

    fn write_manifest_icon(&self, size: u32) -> Result<PathBuf, IconError> {
        let icon = compose_on_canvas(&self.source, size, MANIFEST_LOGO_FRACTION, self.background());
        let path = self.config.output_path(&format!("icon-{}.png", size));
        save_png(&icon, &path)?;
        Ok(path)
    }

    // favicon-32x32.png is the unscaled source, as the site has always shipped it.
    fn write_png_favicons(&self) -> Result<Vec<PathBuf>, IconError> {
        let large = self.config.output_path("favicon-32x32.png");
        save_png(&self.source, &large)?;

        let small = self.config.output_path("favicon-16x16.png");
        save_png(&resize(&self.source, 16, 16), &small)?;

        Ok(vec![large, small])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};
    use std::path::Path;

    const BG: Rgba<u8> = Rgba([10, 10, 10, 255]);
    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);

    const OUTPUTS: [&str; 6] = [
        "favicon.ico",
        "apple-touch-icon.png",
        "icon-192.png",
        "icon-512.png",
        "favicon-32x32.png",
        "favicon-16x16.png",
    ];

    fn config_for(dir: &Path) -> GeneratorConfig {
        GeneratorConfig {
            public_dir: dir.to_path_buf(),
            ..GeneratorConfig::default()
        }
    }

    fn write_source(dir: &Path, image: &RgbaImage) {
        image
            .save(dir.join("clyvuum-logo-dark.png"))
            .unwrap();
    }

    fn open(dir: &Path, name: &str) -> RgbaImage {
        image::open(dir.join(name)).unwrap().to_rgba8()
    }

    #[test]
    fn test_generates_all_outputs() {
        let dir = tempfile::tempdir().unwrap();
        write_source(dir.path(), &RgbaImage::from_pixel(64, 64, RED));

        let generator = IconGenerator::load(config_for(dir.path())).unwrap();
        let written = generator.generate().unwrap();

        let expected: Vec<PathBuf> = OUTPUTS.iter().map(|name| dir.path().join(name)).collect();
        assert_eq!(written, expected);
        assert!(expected.iter().all(|path| path.is_file()));
    }

    #[test]
    fn test_ico_has_three_frames() {
        let dir = tempfile::tempdir().unwrap();
        write_source(dir.path(), &RgbaImage::from_pixel(64, 64, RED));
        IconGenerator::load(config_for(dir.path())).unwrap().generate().unwrap();

        let icon = ico::IconDir::read(File::open(dir.path().join("favicon.ico")).unwrap()).unwrap();
        let sizes: Vec<u32> = icon.entries().iter().map(|entry| entry.width()).collect();
        assert_eq!(sizes, vec![16, 32, 48]);
        assert!(icon.entries().iter().all(|entry| entry.width() == entry.height()));
    }

    #[test]
    fn test_apple_touch_icon_logo_inside_padding() {
        let dir = tempfile::tempdir().unwrap();
        write_source(dir.path(), &RgbaImage::from_pixel(64, 64, RED));
        IconGenerator::load(config_for(dir.path())).unwrap().generate().unwrap();

        let apple = open(dir.path(), "apple-touch-icon.png");
        assert_eq!(apple.dimensions(), (180, 180));
        for (x, y, pixel) in apple.enumerate_pixels() {
            let inside = (20..160).contains(&x) && (20..160).contains(&y);
            if inside {
                assert_eq!(*pixel, RED, "logo pixel at ({}, {})", x, y);
            } else {
                assert_eq!(*pixel, BG, "padding pixel at ({}, {})", x, y);
            }
        }
    }

    #[test]
    fn test_manifest_icons_fill_three_quarters() {
        let dir = tempfile::tempdir().unwrap();
        write_source(dir.path(), &RgbaImage::from_pixel(64, 64, RED));
        IconGenerator::load(config_for(dir.path())).unwrap().generate().unwrap();

        for (size, logo, offset) in [(192u32, 144u32, 24u32), (512, 384, 64)] {
            let icon = open(dir.path(), &format!("icon-{}.png", size));
            assert_eq!(icon.dimensions(), (size, size));
            assert_eq!(*icon.get_pixel(offset - 1, offset - 1), BG);
            assert_eq!(*icon.get_pixel(offset, offset), RED);
            assert_eq!(*icon.get_pixel(offset + logo - 1, offset + logo - 1), RED);
            assert_eq!(*icon.get_pixel(offset + logo, offset + logo), BG);
        }
    }

    #[test]
    fn test_transparent_logo_leaves_background() {
        let dir = tempfile::tempdir().unwrap();
        write_source(dir.path(), &RgbaImage::from_pixel(64, 64, Rgba([0, 0, 0, 0])));
        IconGenerator::load(config_for(dir.path())).unwrap().generate().unwrap();

        let icon = open(dir.path(), "icon-192.png");
        assert!(icon.pixels().all(|p| *p == BG));
    }

    // The 32px PNG keeps the source resolution; only the 16px sibling is resized.
    #[test]
    fn test_favicon_32_is_unscaled_source() {
        let dir = tempfile::tempdir().unwrap();
        let mut source = RgbaImage::from_pixel(64, 64, RED);
        source.put_pixel(3, 5, Rgba([0, 200, 100, 77]));
        write_source(dir.path(), &source);
        IconGenerator::load(config_for(dir.path())).unwrap().generate().unwrap();

        let favicon32 = open(dir.path(), "favicon-32x32.png");
        assert_eq!(favicon32.dimensions(), (64, 64));
        assert_eq!(favicon32, source);

        let favicon16 = open(dir.path(), "favicon-16x16.png");
        assert_eq!(favicon16.dimensions(), (16, 16));
    }

    #[test]
    fn test_rerun_is_byte_identical() {
        let dir = tempfile::tempdir().unwrap();
        let mut source = RgbaImage::from_pixel(50, 50, Rgba([0, 0, 0, 0]));
        for x in 10..40 {
            for y in 10..40 {
                source.put_pixel(x, y, Rgba([240, (x * 5) as u8, (y * 5) as u8, 255]));
            }
        }
        write_source(dir.path(), &source);
        let generator = IconGenerator::load(config_for(dir.path())).unwrap();

        generator.generate().unwrap();
        let first: Vec<Vec<u8>> = OUTPUTS
            .iter()
            .map(|name| fs::read(dir.path().join(name)).unwrap())
            .collect();

        generator.generate().unwrap();
        let second: Vec<Vec<u8>> = OUTPUTS
            .iter()
            .map(|name| fs::read(dir.path().join(name)).unwrap())
            .collect();

        assert_eq!(first, second);
    }

    #[test]
    fn test_missing_source_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();

        let result = IconGenerator::load(config_for(dir.path()));
        assert!(matches!(result, Err(IconError::Io { .. })));
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_undecodable_source_is_image_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("clyvuum-logo-dark.png"), b"this file is plain text and not a png image").unwrap();

        let result = IconGenerator::load(config_for(dir.path()));
        assert!(matches!(result, Err(IconError::Image { .. })));
    }

    #[test]
    fn test_custom_background() {
        let dir = tempfile::tempdir().unwrap();
        write_source(dir.path(), &RgbaImage::from_pixel(64, 64, RED));
        let config = GeneratorConfig {
            background: [255, 255, 255, 255],
            ..config_for(dir.path())
        };
        IconGenerator::load(config).unwrap().generate().unwrap();

        let apple = open(dir.path(), "apple-touch-icon.png");
        assert_eq!(*apple.get_pixel(0, 0), Rgba([255, 255, 255, 255]));
    }
}
