//! File signature ("magic number") checks
//!
//! The declared `Content-Type` of an upload is client-controlled. These checks
//! anchor it to the leading bytes of the payload: a declared type passes only if
//! the bytes carry that format's signature.

use campus_core::models::bucket::{
    IMAGE_GIF, IMAGE_JPEG, IMAGE_PNG, IMAGE_WEBP, VIDEO_MP4, VIDEO_QUICKTIME, VIDEO_WEBM,
};

/// Bytes expected at a fixed offset
struct Marker {
    offset: usize,
    bytes: &'static [u8],
}

impl Marker {
    const fn at(offset: usize, bytes: &'static [u8]) -> Self {
        Self { offset, bytes }
    }

    fn matches(&self, data: &[u8]) -> bool {
        data.get(self.offset..self.offset + self.bytes.len()) == Some(self.bytes)
    }
}

/// All markers of one signature must match
type Signature = &'static [Marker];

const JPEG: Signature = &[Marker::at(0, &[0xFF, 0xD8, 0xFF])];
const PNG: Signature = &[Marker::at(0, &[0x89, 0x50, 0x4E, 0x47])];
const GIF: Signature = &[Marker::at(0, &[0x47, 0x49, 0x46])];
const WEBP: Signature = &[Marker::at(0, b"RIFF"), Marker::at(8, b"WEBP")];
const ISO_BMFF: Signature = &[Marker::at(4, b"ftyp")];
const QUICKTIME_BRAND: Signature = &[Marker::at(4, b"ftyp"), Marker::at(8, b"qt  ")];
const EBML: Signature = &[Marker::at(0, &[0x1A, 0x45, 0xDF, 0xA3])];
// Pre-ftyp QuickTime files open directly with an atom
const QT_MOOV: Signature = &[Marker::at(4, b"moov")];
const QT_MDAT: Signature = &[Marker::at(4, b"mdat")];
const QT_WIDE: Signature = &[Marker::at(4, b"wide")];

/// Accepted signatures per MIME type; any one of them is enough
fn signatures_for(mime_type: &str) -> Option<&'static [Signature]> {
    let mime_type = mime_type.trim().to_ascii_lowercase();
    let signatures: &'static [Signature] = match mime_type.as_str() {
        IMAGE_JPEG => &[JPEG],
        IMAGE_PNG => &[PNG],
        IMAGE_GIF => &[GIF],
        IMAGE_WEBP => &[WEBP],
        VIDEO_MP4 => &[ISO_BMFF],
        VIDEO_WEBM => &[EBML],
        VIDEO_QUICKTIME => &[ISO_BMFF, QT_MOOV, QT_MDAT, QT_WIDE],
        _ => return None,
    };
    Some(signatures)
}

fn matches_signature(data: &[u8], signature: &[Marker]) -> bool {
    signature.iter().all(|marker| marker.matches(data))
}

/// Whether `data` starts like a file of `declared_mime_type`.
///
/// Returns false for types without a known signature and for buffers too short
/// to hold the signature.
pub fn validate_magic_bytes(data: &[u8], declared_mime_type: &str) -> bool {
    match signatures_for(declared_mime_type) {
        Some(signatures) => signatures
            .iter()
            .any(|signature| matches_signature(data, signature)),
        None => {
            tracing::debug!(
                content_type = %declared_mime_type,
                "No known signature for declared type"
            );
            false
        }
    }
}

/// Best guess of the real format of `data`, used when logging a mismatch.
pub fn sniff_mime_type(data: &[u8]) -> Option<&'static str> {
    const DETECTION_ORDER: &[(Signature, &str)] = &[
        (JPEG, IMAGE_JPEG),
        (PNG, IMAGE_PNG),
        (GIF, IMAGE_GIF),
        (WEBP, IMAGE_WEBP),
        (EBML, VIDEO_WEBM),
        (QUICKTIME_BRAND, VIDEO_QUICKTIME),
        (ISO_BMFF, VIDEO_MP4),
        (QT_MOOV, VIDEO_QUICKTIME),
        (QT_MDAT, VIDEO_QUICKTIME),
        (QT_WIDE, VIDEO_QUICKTIME),
    ];

    DETECTION_ORDER
        .iter()
        .find(|(signature, _)| matches_signature(data, signature))
        .map(|(_, mime_type)| *mime_type)
}

#[cfg(test)]
mod tests {
    use super::*;

    const IMAGE_TYPES: [&str; 4] = [IMAGE_JPEG, IMAGE_PNG, IMAGE_GIF, IMAGE_WEBP];

    fn jpeg() -> Vec<u8> {
        vec![0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F', 0x00, 0x01]
    }

    fn png() -> Vec<u8> {
        vec![0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0x0D]
    }

    fn gif() -> Vec<u8> {
        b"GIF89a\x01\x00\x01\x00\x00\x00".to_vec()
    }

    fn webp() -> Vec<u8> {
        b"RIFF\x24\x00\x00\x00WEBPVP8 ".to_vec()
    }

    fn sample_for(mime_type: &str) -> Vec<u8> {
        match mime_type {
            IMAGE_JPEG => jpeg(),
            IMAGE_PNG => png(),
            IMAGE_GIF => gif(),
            IMAGE_WEBP => webp(),
            other => panic!("no sample for {}", other),
        }
    }

    #[test]
    fn test_each_image_validates_only_as_its_own_type() {
        for true_type in IMAGE_TYPES {
            let data = sample_for(true_type);
            for declared in IMAGE_TYPES {
                assert_eq!(
                    validate_magic_bytes(&data, declared),
                    declared == true_type,
                    "{} bytes declared as {}",
                    true_type,
                    declared
                );
            }
        }
    }

    #[test]
    fn test_jpeg_declared_as_png_fails() {
        assert!(!validate_magic_bytes(&jpeg(), "image/png"));
        assert!(validate_magic_bytes(&jpeg(), "IMAGE/JPEG"));
    }

    #[test]
    fn test_webp_needs_both_markers() {
        let mut riff_wave = webp();
        riff_wave[8..12].copy_from_slice(b"WAVE");
        assert!(!validate_magic_bytes(&riff_wave, IMAGE_WEBP));

        // RIFF header cut off before the form type
        assert!(!validate_magic_bytes(b"RIFF\x24\x00", IMAGE_WEBP));
    }

    #[test]
    fn test_unknown_declared_type_fails() {
        assert!(!validate_magic_bytes(&jpeg(), "application/octet-stream"));
        assert!(!validate_magic_bytes(b"<svg xmlns=", "image/svg+xml"));
    }

    #[test]
    fn test_short_and_empty_buffers_fail() {
        assert!(!validate_magic_bytes(&[], IMAGE_JPEG));
        assert!(!validate_magic_bytes(&[0xFF, 0xD8], IMAGE_JPEG));
        assert!(!validate_magic_bytes(&[0x89, 0x50, 0x4E], IMAGE_PNG));
    }

    #[test]
    fn test_script_disguised_as_image_fails() {
        let script = b"#!/bin/sh\nrm -rf /\n";
        for declared in IMAGE_TYPES {
            assert!(!validate_magic_bytes(script, declared));
        }
        assert_eq!(sniff_mime_type(script), None);
    }

    #[test]
    fn test_video_signatures() {
        let mp4 = b"\x00\x00\x00\x18ftypmp42\x00\x00\x00\x00".to_vec();
        let mov = b"\x00\x00\x00\x14ftypqt  \x00\x00\x00\x00".to_vec();
        let webm = vec![0x1A, 0x45, 0xDF, 0xA3, 0x9F, 0x42, 0x86, 0x81];

        assert!(validate_magic_bytes(&mp4, VIDEO_MP4));
        assert!(validate_magic_bytes(&mov, VIDEO_QUICKTIME));
        assert!(validate_magic_bytes(b"\x00\x00\x00\x08wide", VIDEO_QUICKTIME));
        assert!(validate_magic_bytes(&webm, VIDEO_WEBM));
        assert!(!validate_magic_bytes(&webm, VIDEO_MP4));
        assert!(!validate_magic_bytes(&jpeg(), VIDEO_MP4));

        assert_eq!(sniff_mime_type(&mp4), Some(VIDEO_MP4));
        assert_eq!(sniff_mime_type(&mov), Some(VIDEO_QUICKTIME));
        assert_eq!(sniff_mime_type(&webm), Some(VIDEO_WEBM));
    }

    #[test]
    fn test_sniff_images() {
        for mime_type in IMAGE_TYPES {
            assert_eq!(sniff_mime_type(&sample_for(mime_type)), Some(mime_type));
        }
    }
}
