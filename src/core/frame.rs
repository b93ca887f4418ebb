//! Wire framing
//!
//! Each record travels as one fixed-size frame: the JSON payload followed by
//! ASCII spaces up to [`FRAME_SIZE`] bytes, so the daemon can read frames
//! with a single fixed-length read.

use super::error::{LoggerError, Result};
use super::log_record::LogRecord;

/// Size of every frame written to the socket
pub const FRAME_SIZE: usize = 2000;

/// Byte used to pad payloads up to [`FRAME_SIZE`]
pub const PADDING_BYTE: u8 = b' ';

/// Serialize a record into a padded frame
///
/// Fails with [`LoggerError::FrameTooLarge`] instead of truncating.
pub fn encode_frame(record: &LogRecord) -> Result<Vec<u8>> {
    let mut frame = serde_json::to_vec(record)?;
    if frame.len() > FRAME_SIZE {
        return Err(LoggerError::frame_too_large(frame.len(), FRAME_SIZE));
    }
    frame.resize(FRAME_SIZE, PADDING_BYTE);
    Ok(frame)
}

/// Parse a frame produced by [`encode_frame`], as the daemon does
pub fn decode_frame(frame: &[u8]) -> Result<LogRecord> {
    let end = frame
        .iter()
        .rposition(|b| *b != PADDING_BYTE)
        .map_or(0, |idx| idx + 1);
    Ok(serde_json::from_slice(&frame[..end])?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{RecordBuilder, Severity};

    #[test]
    fn test_frame_is_fixed_size_and_space_padded() {
        let record = RecordBuilder::new()
            .with_body("hello")
            .with_service_name("svc")
            .build();
        let payload = record.to_json().unwrap();
        let frame = encode_frame(&record).unwrap();

        assert_eq!(frame.len(), FRAME_SIZE);
        assert_eq!(&frame[..payload.len()], payload.as_bytes());
        assert!(frame[payload.len()..].iter().all(|b| *b == b' '));
    }

    #[test]
    fn test_decode_restores_record() {
        let record = RecordBuilder::new()
            .with_body("trailing spaces inside   ")
            .with_severity(Severity::Error2)
            .with_service_name("svc")
            .with_trace_flags(1)
            .build();
        let decoded = decode_frame(&encode_frame(&record).unwrap()).unwrap();
        assert_eq!(decoded, record);
    }

    #[test]
    fn test_oversized_payload_fails() {
        let record = RecordBuilder::new().with_body("x".repeat(FRAME_SIZE)).build();
        match encode_frame(&record) {
            Err(LoggerError::FrameTooLarge { size, max }) => {
                assert!(size > FRAME_SIZE);
                assert_eq!(max, FRAME_SIZE);
            }
            other => panic!("expected FrameTooLarge, got {other:?}"),
        }
    }

    #[test]
    fn test_decode_garbage() {
        let err = decode_frame(&[b' '; FRAME_SIZE]).unwrap_err();
        assert!(matches!(err, LoggerError::Json(_)));
    }
}
