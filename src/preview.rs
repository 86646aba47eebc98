//! Preview decoding: turning the staged file into displayable pixels.
//!
//! The original contract left decode failures unhandled; here the policy is
//! fail closed. A file that sniffs as an image but does not decode is
//! reported with [`AnalyzeError::PreviewDecode`] and never becomes the
//! staged selection, so the component stays in its intake state.

use crate::error::{AnalyzeError, AnalyzeResult};
use crate::intake::SelectedFile;

/// Decoded preview pixels for the staged file.
///
/// Always RGBA8, row-major, ready to upload as a GUI texture.
#[derive(Debug, Clone)]
pub struct PreviewImage {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// RGBA8 pixel data, `width * height * 4` bytes
    pub rgba: Vec<u8>,
}

impl PreviewImage {
    /// Pixel dimensions as `[width, height]`, the shape GUI texture APIs take.
    pub fn size(&self) -> [usize; 2] {
        [self.width as usize, self.height as usize]
    }
}

/// Decode the staged file into preview pixels.
///
/// # Errors
///
/// Returns [`AnalyzeError::PreviewDecode`] if the bytes do not decode as an
/// image despite having passed the intake sniff (truncated files, exotic
/// subformats).
pub fn decode_preview(file: &SelectedFile) -> AnalyzeResult<PreviewImage> {
    let decoded = image::load_from_memory(&file.bytes)
        .map_err(|e| AnalyzeError::preview_decode(file.name.clone(), e.to_string()))?;

    let rgba = decoded.to_rgba8();
    let (width, height) = rgba.dimensions();
    Ok(PreviewImage {
        width,
        height,
        rgba: rgba.into_raw(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intake::stage_bytes;

    #[test]
    fn decodes_staged_png() {
        // 1x1 transparent PNG
        let png: Vec<u8> = vec![
            0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48,
            0x44, 0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00,
            0x00, 0x1F, 0x15, 0xC4, 0x89, 0x00, 0x00, 0x00, 0x0B, 0x49, 0x44, 0x41, 0x54, 0x78,
            0x9C, 0x63, 0x60, 0x00, 0x02, 0x00, 0x00, 0x05, 0x00, 0x01, 0x7A, 0x5E, 0xAB, 0x3F,
            0x00, 0x00, 0x00, 0x00, 0x49, 0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82,
        ];
        let file = stage_bytes("dot.png", png).unwrap();
        let preview = decode_preview(&file).unwrap();
        assert_eq!(preview.size(), [1, 1]);
        assert_eq!(preview.rgba.len(), 4);
    }

    #[test]
    fn truncated_image_fails_closed() {
        // Valid PNG signature, nothing else: passes the sniff, fails decode.
        let file = SelectedFile {
            name: "broken.png".into(),
            mime: "image/png".into(),
            bytes: vec![0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A],
        };
        let err = decode_preview(&file).unwrap_err();
        assert!(matches!(err, AnalyzeError::PreviewDecode { .. }));
    }
}
