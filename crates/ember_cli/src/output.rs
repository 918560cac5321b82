//! Image output: ASCII PPM or anything the `image` crate can encode.

use anyhow::{Context, Result};
use ember_renderer::{color_to_rgb8, ImageBuffer};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Write `image` to `path`, choosing the format from the extension.
pub fn write_image(image: &ImageBuffer, path: &Path) -> Result<()> {
    let is_ppm = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("ppm"));

    if is_ppm {
        let file = File::create(path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        let mut writer = BufWriter::new(file);
        write_ppm(image, &mut writer)
            .and_then(|()| writer.flush())
            .with_context(|| format!("Failed to write {}", path.display()))?;
    } else {
        let rgb = image::RgbImage::from_raw(image.width, image.height, image.to_rgb8())
            .context("Pixel buffer does not match image dimensions")?;
        rgb.save(path)
            .with_context(|| format!("Failed to encode {}", path.display()))?;
    }

    Ok(())
}

/// ASCII PPM (P3), top row first, one pixel per line.
pub fn write_ppm<W: Write>(image: &ImageBuffer, writer: &mut W) -> std::io::Result<()> {
    writeln!(writer, "P3")?;
    writeln!(writer, "{} {}", image.width, image.height)?;
    writeln!(writer, "255")?;

    for y in 0..image.height {
        for x in 0..image.width {
            let [r, g, b] = color_to_rgb8(image.get(x, y), image.samples_per_pixel);
            writeln!(writer, "{} {} {}", r, g, b)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ember_renderer::Color;

    #[test]
    fn test_write_ppm() {
        let mut image = ImageBuffer::new(2, 1, 4);
        image.set(0, 0, Color::splat(4.0));
        image.set(1, 0, Color::new(1.0, 0.0, 0.0));

        let mut out = Vec::new();
        write_ppm(&image, &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, "P3\n2 1\n255\n255 255 255\n128 0 0\n");
    }

    #[test]
    fn test_write_png_and_ppm_files() {
        let dir = std::env::temp_dir().join(format!("ember_output_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();

        let mut image = ImageBuffer::new(3, 2, 1);
        image.set(2, 1, Color::ONE);

        let png = dir.join("out.png");
        write_image(&image, &png).unwrap();
        let decoded = image::open(&png).unwrap().to_rgb8();
        assert_eq!(decoded.dimensions(), (3, 2));
        assert_eq!(decoded.get_pixel(2, 1).0, [255, 255, 255]);
        assert_eq!(decoded.get_pixel(0, 0).0, [0, 0, 0]);

        let ppm = dir.join("out.PPM");
        write_image(&image, &ppm).unwrap();
        let text = std::fs::read_to_string(&ppm).unwrap();
        assert!(text.starts_with("P3\n3 2\n255\n"));

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_write_into_missing_directory_fails() {
        let image = ImageBuffer::new(1, 1, 1);
        let err = write_image(&image, Path::new("/nonexistent/dir/out.ppm")).unwrap_err();
        assert!(err.to_string().contains("Failed to create"));
    }
}
