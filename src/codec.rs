//! Compressed text payloads.
//!
//! Large protobuf descriptors and proto file bodies travel inside the vendor
//! model as zlib-compressed, standard-base64-encoded strings.

use std::io::{Read, Write};

use base64::{engine::general_purpose::STANDARD, Engine};
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;

use crate::error::CodecError;

/// Compress `value` with zlib and encode the bytes as standard base64.
pub fn compress_and_encode(value: &str) -> Result<String, CodecError> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(value.as_bytes())?;
    let compressed = encoder.finish()?;
    Ok(STANDARD.encode(compressed))
}

/// Inverse of [`compress_and_encode`].
///
/// Fails on invalid base64, a broken zlib stream, or non UTF-8 output. No
/// partial text is ever returned.
pub fn decode_and_decompress(value: &str) -> Result<String, CodecError> {
    let compressed = STANDARD.decode(value)?;
    let mut decoder = ZlibDecoder::new(compressed.as_slice());
    let mut bytes = Vec::new();
    decoder.read_to_end(&mut bytes)?;
    Ok(String::from_utf8(bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const PROTO_FILE: &str = r#"syntax = "proto3";
package helloworld;
service Greeter {
  rpc SayHello (HelloRequest) returns (HelloReply) {}
}
message HelloRequest { string name = 1; }
message HelloReply { string message = 1; }
"#;

    #[test]
    fn test_round_trip_proto_file() {
        let encoded = compress_and_encode(PROTO_FILE).unwrap();
        assert_ne!(encoded, PROTO_FILE);
        assert_eq!(decode_and_decompress(&encoded).unwrap(), PROTO_FILE);
    }

    #[test]
    fn test_round_trip_empty_string() {
        let encoded = compress_and_encode("").unwrap();
        assert!(!encoded.is_empty());
        assert_eq!(decode_and_decompress(&encoded).unwrap(), "");
    }

    #[test]
    fn test_round_trip_multi_megabyte() {
        let text: String = (0..200_000)
            .map(|i| format!("line {} ünïcødé {}\n", i, i * 7))
            .collect();
        assert!(text.len() > 4 * 1024 * 1024);

        let encoded = compress_and_encode(&text).unwrap();
        assert!(encoded.len() < text.len());
        assert_eq!(decode_and_decompress(&encoded).unwrap(), text);
    }

    #[test]
    fn test_encoding_is_zlib_then_standard_base64() {
        let encoded = compress_and_encode("hello").unwrap();
        let raw = STANDARD.decode(&encoded).unwrap();
        // zlib header with default compression
        assert_eq!(raw[0], 0x78);
        assert_eq!(raw[1], 0x9c);
    }

    #[test]
    fn test_invalid_base64_is_fatal() {
        let err = decode_and_decompress("not base64 at all!").unwrap_err();
        assert!(matches!(err, CodecError::Base64(_)));
    }

    #[test]
    fn test_invalid_zlib_stream_is_fatal() {
        let err = decode_and_decompress(&STANDARD.encode(b"plain bytes")).unwrap_err();
        assert!(matches!(err, CodecError::Io(_)));
    }

    #[test]
    fn test_non_utf8_payload_is_fatal() {
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&[0xff, 0xfe, 0xfd]).unwrap();
        let encoded = STANDARD.encode(encoder.finish().unwrap());

        let err = decode_and_decompress(&encoded).unwrap_err();
        assert!(matches!(err, CodecError::Utf8(_)));
    }

    proptest! {
        #[test]
        fn prop_round_trip_is_byte_exact(text in any::<String>()) {
            let encoded = compress_and_encode(&text).unwrap();
            prop_assert_eq!(decode_and_decompress(&encoded).unwrap(), text);
        }
    }
}
