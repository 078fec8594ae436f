use lopdf::{dictionary, Document, Object, ObjectId, Stream};
use std::path::Path;
use tracing::{error, info};

use crate::error::{Result, SheetError};

/// A decoded signature image, split into color and alpha planes.
pub struct SignatureImage {
    pub width: u32,
    pub height: u32,
    rgb: Vec<u8>,
    alpha: Option<Vec<u8>>,
}

impl SignatureImage {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading signature image from {}", path.display());

        let bytes = std::fs::read(path).map_err(|e| {
            error!("Failed to read signature image {}: {}", path.display(), e);
            SheetError::invalid_resource(path, e)
        })?;

        Self::from_bytes(&bytes).map_err(|reason| {
            error!("Failed to decode signature image {}: {}", path.display(), reason);
            SheetError::invalid_resource(path, reason)
        })
    }

    pub fn from_bytes(bytes: &[u8]) -> std::result::Result<Self, String> {
        let decoded = image::load_from_memory(bytes).map_err(|e| e.to_string())?;
        let rgba = decoded.to_rgba8();
        let (width, height) = rgba.dimensions();
        if width == 0 || height == 0 {
            return Err("image has no pixels".to_string());
        }

        let mut rgb = Vec::with_capacity((width * height * 3) as usize);
        let mut alpha = Vec::with_capacity((width * height) as usize);
        for pixel in rgba.pixels() {
            let [r, g, b, a] = pixel.0;
            rgb.extend_from_slice(&[r, g, b]);
            alpha.push(a);
        }

        let opaque = alpha.iter().all(|&a| a == u8::MAX);
        info!(
            "Decoded signature image {}x{} ({})",
            width,
            height,
            if opaque { "opaque" } else { "with transparency" }
        );

        Ok(SignatureImage {
            width,
            height,
            rgb,
            alpha: (!opaque).then_some(alpha),
        })
    }

    /// Largest (width, height) with the image's aspect ratio fitting in the box.
    pub fn fit(&self, max_width: f32, max_height: f32) -> (f32, f32) {
        let scale = (max_width / self.width as f32).min(max_height / self.height as f32);
        (self.width as f32 * scale, self.height as f32 * scale)
    }

    /// Adds the image (and its soft mask, if any) to `doc` as an image XObject.
    pub fn embed(&self, doc: &mut Document) -> ObjectId {
        let mut image_dict = dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => self.width as i64,
            "Height" => self.height as i64,
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8,
        };

        if let Some(alpha) = &self.alpha {
            let mask_dict = dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => self.width as i64,
                "Height" => self.height as i64,
                "ColorSpace" => "DeviceGray",
                "BitsPerComponent" => 8,
            };
            let mask_id = doc.add_object(Stream::new(mask_dict, alpha.clone()));
            image_dict.set("SMask", Object::Reference(mask_id));
        }

        doc.add_object(Stream::new(image_dict, self.rgb.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgba, RgbaImage};
    use std::io::Cursor;

    fn png(width: u32, height: u32, pixel: Rgba<u8>) -> Vec<u8> {
        let img = RgbaImage::from_pixel(width, height, pixel);
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, ImageFormat::Png).unwrap();
        out.into_inner()
    }

    #[test]
    fn opaque_png_has_no_mask() {
        let sig = SignatureImage::from_bytes(&png(4, 2, Rgba([0, 0, 0, 255]))).unwrap();
        assert_eq!((sig.width, sig.height), (4, 2));
        assert!(sig.alpha.is_none());
        assert_eq!(sig.rgb.len(), 4 * 2 * 3);
    }

    #[test]
    fn transparent_png_keeps_alpha() {
        let sig = SignatureImage::from_bytes(&png(3, 3, Rgba([10, 20, 30, 0]))).unwrap();
        assert!(sig.alpha.is_some());

        let mut doc = Document::with_version("1.5");
        let id = sig.embed(&mut doc);
        let stream = doc.get_object(id).unwrap().as_stream().unwrap();
        assert!(stream.dict.get(b"SMask").is_ok());
    }

    #[test]
    fn fit_preserves_aspect_ratio() {
        let sig = SignatureImage::from_bytes(&png(40, 10, Rgba([0, 0, 0, 255]))).unwrap();
        assert_eq!(sig.fit(100.0, 10.0), (40.0, 10.0));
        assert_eq!(sig.fit(20.0, 10.0), (20.0, 5.0));
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(SignatureImage::from_bytes(b"not an image").is_err());
    }

    #[test]
    fn missing_file_is_invalid_resource() {
        let result = SignatureImage::load("/nonexistent/signature.png");
        assert!(matches!(result, Err(SheetError::InvalidResource { .. })));
    }
}
