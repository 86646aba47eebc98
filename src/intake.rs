//! File intake: staging a user-offered file and rejecting non-images.
//!
//! A file arrives either as a filesystem path (native file dialog, CLI
//! argument) or as raw bytes with a name (drag-and-drop). Either way it is
//! validated before becoming the staged [`SelectedFile`]: the MIME type must
//! start with `image/`. The type is sniffed from the content first and only
//! falls back to the file extension, so a renamed text file does not slip
//! through.
//!
//! Rejection never mutates any state; the caller simply shows the error.

use std::path::Path;

use image::ImageFormat;

use crate::error::{AnalyzeError, AnalyzeResult};

/// The single image file currently staged for analysis.
///
/// At most one of these exists per component instance; it lives from intake
/// acceptance until Remove or a replacing selection. Never persisted.
#[derive(Debug, Clone)]
pub struct SelectedFile {
    /// Display name (file name, without directory components)
    pub name: String,
    /// MIME type, always starting with `image/`
    pub mime: String,
    /// Raw file contents, sent verbatim to the server
    pub bytes: Vec<u8>,
}

impl SelectedFile {
    /// Size of the staged file in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the staged file is empty.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Stage a file from a filesystem path.
///
/// # Errors
///
/// Returns [`AnalyzeError::InvalidFileType`] if the content is not
/// recognizable as an image, or [`AnalyzeError::PreviewDecode`] if the file
/// cannot be read at all.
pub fn stage_path(path: &Path) -> AnalyzeResult<SelectedFile> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    let bytes = std::fs::read(path)
        .map_err(|e| AnalyzeError::preview_decode(name.clone(), e.to_string()))?;

    stage_bytes(name, bytes)
}

/// Stage a file from in-memory bytes, as delivered by drag-and-drop.
///
/// # Errors
///
/// Returns [`AnalyzeError::InvalidFileType`] if neither the content nor the
/// name identifies the data as an image.
pub fn stage_bytes(name: impl Into<String>, bytes: Vec<u8>) -> AnalyzeResult<SelectedFile> {
    let name = name.into();
    match detect_mime(&name, &bytes) {
        Some(mime) if is_image_mime(&mime) => Ok(SelectedFile { name, mime, bytes }),
        detected => Err(AnalyzeError::invalid_file_type(name, detected)),
    }
}

/// Whether a MIME type is acceptable for intake.
pub fn is_image_mime(mime: &str) -> bool {
    mime.starts_with("image/")
}

/// Detect the MIME type of an offered file.
///
/// Content sniffing via the image decoder's magic-byte check takes
/// precedence; the extension is only consulted when the content is not a
/// known image format (and then only yields non-image types, since an image
/// extension on undecodable bytes is exactly the case to reject).
fn detect_mime(name: &str, bytes: &[u8]) -> Option<String> {
    if let Ok(format) = image::guess_format(bytes) {
        return Some(format.to_mime_type().to_string());
    }
    mime_from_extension(name)
}

/// Best-effort MIME from a file extension, for error reporting only.
fn mime_from_extension(name: &str) -> Option<String> {
    let ext = Path::new(name).extension()?.to_str()?.to_ascii_lowercase();
    // Image extensions resolve through ImageFormat so the mapping stays in
    // one place; anything else gets a coarse label for the error message.
    if let Some(format) = ImageFormat::from_extension(&ext) {
        return Some(format.to_mime_type().to_string());
    }
    let mime = match ext.as_str() {
        "txt" | "md" | "csv" => "text/plain",
        "pdf" => "application/pdf",
        "json" => "application/json",
        _ => "application/octet-stream",
    };
    Some(mime.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    // 1x1 transparent PNG, smallest well-formed image for tests
    pub(crate) const TINY_PNG: &[u8] = &[
        0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, // PNG signature
        0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44, 0x52, // IHDR
        0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, // 1x1
        0x08, 0x06, 0x00, 0x00, 0x00, 0x1F, 0x15, 0xC4, 0x89, // RGBA, CRC
        0x00, 0x00, 0x00, 0x0B, 0x49, 0x44, 0x41, 0x54, // IDAT
        0x78, 0x9C, 0x63, 0x60, 0x00, 0x02, 0x00, 0x00, 0x05, 0x00, 0x01, 0x7A, 0x5E, 0xAB,
        0x3F, // data, CRC
        0x00, 0x00, 0x00, 0x00, 0x49, 0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82, // IEND
    ];

    #[test]
    fn accepts_png_bytes() {
        let file = stage_bytes("signature.png", TINY_PNG.to_vec()).unwrap();
        assert_eq!(file.mime, "image/png");
        assert_eq!(file.name, "signature.png");
        assert!(!file.is_empty());
    }

    #[test]
    fn rejects_text_bytes_even_with_image_extension() {
        let err = stage_bytes("sneaky.png", b"hello world".to_vec()).unwrap_err();
        assert!(matches!(
            err,
            AnalyzeError::InvalidFileType { .. }
        ));
    }

    #[test]
    fn rejects_plain_text_file() {
        let err = stage_bytes("notes.txt", b"not an image".to_vec()).unwrap_err();
        match err {
            AnalyzeError::InvalidFileType { detected, .. } => {
                assert_eq!(detected.as_deref(), Some("text/plain"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn sniffed_content_wins_over_misleading_extension() {
        let file = stage_bytes("scan.txt", TINY_PNG.to_vec()).unwrap();
        assert_eq!(file.mime, "image/png");
    }
}
