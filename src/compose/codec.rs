use std::io::Cursor;

use base64::prelude::*;
use image::{ImageFormat, RgbImage};

use crate::error::Result;

/// Lossless PNG bytes for an artifact.
pub fn encode_png(artifact: &RgbImage) -> Result<Vec<u8>> {
    let mut png = Vec::new();
    artifact.write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;
    Ok(png)
}

/// PNG, then base64 so the artifact can live inside a JSON document.
pub fn encode(artifact: &RgbImage) -> Result<String> {
    Ok(BASE64_STANDARD.encode(encode_png(artifact)?))
}

pub fn decode_png(png: &[u8]) -> Result<RgbImage> {
    Ok(image::load_from_memory_with_format(png, ImageFormat::Png)?.to_rgb8())
}

pub fn decode(encoded: &str) -> Result<RgbImage> {
    let png = BASE64_STANDARD.decode(encoded.trim())?;
    decode_png(&png)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use image::Rgb;

    #[test]
    fn round_trip_is_exact() {
        let artifact = RgbImage::from_fn(37, 23, |x, y| {
            Rgb([(x * 7) as u8, (y * 11) as u8, ((x + y) * 3) as u8])
        });
        let encoded = encode(&artifact).unwrap();
        assert!(encoded.is_ascii());
        assert_eq!(decode(&encoded).unwrap(), artifact);
    }

    #[test]
    fn encoded_payload_is_png() {
        let png = encode_png(&RgbImage::new(2, 2)).unwrap();
        assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
    }

    #[test]
    fn garbage_is_a_codec_error() {
        assert_eq!(decode("not base64!!").unwrap_err().kind(), ErrorKind::Codec);
        let not_png = BASE64_STANDARD.encode(b"hello");
        assert_eq!(decode(&not_png).unwrap_err().kind(), ErrorKind::Codec);
    }
}
