//! Environment image decoding.

use image::ImageFormat;

use super::AssetLoadError;
use crate::scene::EnvironmentMap;

/// Decode an equirectangular environment image to linear RGBA `f32`.
///
/// Radiance `.hdr` data is already linear. 8-bit formats (PNG, JPEG) are
/// treated as sRGB and linearized.
///
/// # Errors
///
/// [`AssetLoadError::Decode`] when the bytes are not a supported image.
pub fn decode_environment(
    bytes: &[u8],
) -> Result<EnvironmentMap, AssetLoadError> {
    let format = image::guess_format(bytes)
        .map_err(|e| AssetLoadError::Decode(format!("environment: {e}")))?;
    let decoded = image::load_from_memory_with_format(bytes, format)
        .map_err(|e| AssetLoadError::Decode(format!("environment: {e}")))?;
    let linear = format == ImageFormat::Hdr;
    let rgba = decoded.into_rgba32f();
    let (width, height) = rgba.dimensions();
    let texels = rgba
        .into_raw()
        .chunks_exact(4)
        .map(|c| {
            let [r, g, b] = if linear {
                [c[0], c[1], c[2]]
            } else {
                [c[0], c[1], c[2]].map(srgb_to_linear)
            };
            [r, g, b, 1.0]
        })
        .collect();
    EnvironmentMap::new(width, height, texels).ok_or_else(|| {
        AssetLoadError::Decode("environment image has no pixels".to_owned())
    })
}

fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Uncompressed 2x1 Radiance image: one texel of 1.0, one of 0.5.
    fn tiny_hdr() -> Vec<u8> {
        let mut bytes =
            b"#?RADIANCE\nFORMAT=32-bit_rle_rgbe\n\n-Y 1 +X 2\n".to_vec();
        bytes.extend_from_slice(&[128, 128, 128, 129]);
        bytes.extend_from_slice(&[128, 128, 128, 128]);
        bytes
    }

    #[test]
    fn radiance_texels_stay_linear() {
        let map = decode_environment(&tiny_hdr()).unwrap();
        assert_eq!((map.width(), map.height()), (2, 1));
        assert!((map.texels()[0][0] - 1.0).abs() < 1e-6);
        assert!((map.texels()[1][2] - 0.5).abs() < 1e-6);
        assert_eq!(map.texels()[0][3], 1.0);
    }

    #[test]
    fn unknown_bytes_are_decode_error() {
        let err = decode_environment(b"\0\0not an image").unwrap_err();
        assert!(matches!(err, AssetLoadError::Decode(_)));
    }

    #[test]
    fn srgb_curve_endpoints() {
        assert_eq!(srgb_to_linear(0.0), 0.0);
        assert!((srgb_to_linear(1.0) - 1.0).abs() < 1e-6);
        assert!(srgb_to_linear(0.5) < 0.5);
    }
}
