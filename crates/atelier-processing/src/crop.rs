//! Center square crop.

use std::io::Cursor;

use image::{DynamicImage, GenericImageView, ImageError, ImageReader};

use crate::error::UploadError;

/// Offsets and side of the centered square inside a `width` x `height` image.
///
/// Offsets use integer division, so an odd remainder leaves the extra pixel on
/// the right/bottom edge.
pub fn center_square(width: u32, height: u32) -> (u32, u32, u32) {
    let side = width.min(height);
    ((width - side) / 2, (height - side) / 2, side)
}

/// Crop `img` to its centered square. Resolution is left untouched.
pub fn crop_to_square(img: &DynamicImage) -> DynamicImage {
    let (width, height) = img.dimensions();
    let (x, y, side) = center_square(width, height);
    if x == 0 && y == 0 && side == width && side == height {
        return img.clone();
    }
    img.crop_imm(x, y, side, side)
}

/// Decode raster bytes, detecting the format from content rather than name.
pub fn decode_image(data: &[u8]) -> Result<DynamicImage, UploadError> {
    let reader = ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .map_err(|e| UploadError::Decode(ImageError::IoError(e)))?;
    reader.decode().map_err(UploadError::Decode)
}

pub fn decode_and_crop(data: &[u8]) -> Result<DynamicImage, UploadError> {
    let img = decode_image(data)?;
    Ok(crop_to_square(&img))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgb, RgbImage};

    fn gradient(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x % 256) as u8, (y % 256) as u8, 128])
        }))
    }

    #[test]
    fn crop_is_square_for_any_aspect() {
        for (w, h) in [(40, 30), (30, 40), (25, 25), (1, 9), (101, 50)] {
            let cropped = crop_to_square(&gradient(w, h));
            assert_eq!(cropped.dimensions(), (w.min(h), w.min(h)), "{}x{}", w, h);
        }
    }

    #[test]
    fn crop_takes_center_region() {
        assert_eq!(center_square(4000, 3000), (500, 0, 3000));
        assert_eq!(center_square(3000, 4000), (0, 500, 3000));
        assert_eq!(center_square(7, 4), (1, 0, 4));

        let img = gradient(40, 30);
        let cropped = crop_to_square(&img);
        assert_eq!(cropped.get_pixel(0, 0), img.get_pixel(5, 0));
    }

    #[test]
    fn decode_guesses_format_from_content() {
        let mut png = Vec::new();
        gradient(12, 8)
            .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
            .unwrap();

        let cropped = decode_and_crop(&png).unwrap();
        assert_eq!(cropped.dimensions(), (8, 8));
    }

    #[test]
    fn text_is_a_decode_failure() {
        let err = decode_and_crop(b"definitely not an image").unwrap_err();
        assert!(matches!(err, UploadError::Decode(_)));
        assert!(matches!(decode_image(&[]), Err(UploadError::Decode(_))));
    }
}
