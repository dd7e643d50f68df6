//! Line framing: newline-delimited text records over a byte stream.
//! Shared by the producer ingress, the engine link and the engine query client.

use bytes::{BufMut, BytesMut};
use tokio_util::codec::{Decoder, Encoder};

use super::errors::FrameError;

pub const DEFAULT_MAX_LINE_LEN: usize = 1024 * 1024;

/// Splits an arbitrary byte stream into trimmed, non-empty text records.
/// Tolerates partial reads and multiple records per chunk. An unterminated
/// line longer than `max_line_len` is a framing error and closes the
/// connection instead of growing the accumulator forever.
#[derive(Debug, Clone)]
pub struct LineCodec {
    max_line_len: usize,
}

impl LineCodec {
    pub fn new(max_line_len: usize) -> Self {
        Self { max_line_len }
    }
}

impl Default for LineCodec {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_LINE_LEN)
    }
}

impl Decoder for LineCodec {
    type Item = String;
    type Error = FrameError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        loop {
            let newline = src.iter().position(|&b| b == b'\n');

            let idx = match newline {
                Some(idx) => idx,
                None => {
                    if src.len() > self.max_line_len {
                        return Err(FrameError::LineTooLong(src.len()));
                    }
                    return Ok(None);
                }
            };

            let line = src.split_to(idx + 1);
            let record = String::from_utf8_lossy(&line[..idx]).trim().to_string();

            // Empty records (post-trim) are silently dropped.
            if !record.is_empty() {
                return Ok(Some(record));
            }
        }
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        match self.decode(src)? {
            Some(record) => Ok(Some(record)),
            None => {
                // A record requires its terminating newline; partial data
                // left at EOF is discarded, not emitted.
                src.clear();
                Ok(None)
            }
        }
    }
}

impl Encoder<String> for LineCodec {
    type Error = FrameError;

    fn encode(&mut self, item: String, dst: &mut BytesMut) -> Result<(), Self::Error> {
        dst.reserve(item.len() + 1);
        dst.put_slice(item.as_bytes());
        dst.put_u8(b'\n');
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codec() -> LineCodec {
        LineCodec::default()
    }

    #[test]
    fn splits_multiple_records_in_one_chunk() {
        let mut codec = codec();
        let mut buf = BytesMut::from(&b"one\ntwo\nthree\n"[..]);

        assert_eq!(codec.decode(&mut buf).unwrap(), Some("one".to_string()));
        assert_eq!(codec.decode(&mut buf).unwrap(), Some("two".to_string()));
        assert_eq!(codec.decode(&mut buf).unwrap(), Some("three".to_string()));
        assert_eq!(codec.decode(&mut buf).unwrap(), None);
    }

    #[test]
    fn reassembles_record_across_partial_reads() {
        let mut codec = codec();
        let mut buf = BytesMut::new();

        buf.extend_from_slice(b"{\"topic\":");
        assert_eq!(codec.decode(&mut buf).unwrap(), None);

        buf.extend_from_slice(b"\"orders\"}\n");
        assert_eq!(
            codec.decode(&mut buf).unwrap(),
            Some("{\"topic\":\"orders\"}".to_string())
        );
    }

    #[test]
    fn drops_empty_and_whitespace_records() {
        let mut codec = codec();
        let mut buf = BytesMut::from(&b"\n   \n\t\nreal\n"[..]);

        assert_eq!(codec.decode(&mut buf).unwrap(), Some("real".to_string()));
        assert_eq!(codec.decode(&mut buf).unwrap(), None);
    }

    #[test]
    fn trims_surrounding_whitespace() {
        let mut codec = codec();
        let mut buf = BytesMut::from(&b"  padded record \r\n"[..]);

        assert_eq!(codec.decode(&mut buf).unwrap(), Some("padded record".to_string()));
    }

    #[test]
    fn rejects_unterminated_line_past_cap() {
        let mut codec = LineCodec::new(16);
        let mut buf = BytesMut::from(&[b'x'; 32][..]);

        assert_eq!(codec.decode(&mut buf), Err(FrameError::LineTooLong(32)));
    }

    #[test]
    fn partial_data_at_eof_is_discarded() {
        let mut codec = codec();
        let mut buf = BytesMut::from(&b"complete\nunterminated"[..]);

        assert_eq!(codec.decode_eof(&mut buf).unwrap(), Some("complete".to_string()));
        assert_eq!(codec.decode_eof(&mut buf).unwrap(), None);
        assert!(buf.is_empty());
    }

    #[test]
    fn encode_appends_newline() {
        let mut codec = codec();
        let mut buf = BytesMut::new();

        codec.encode("{\"type\":\"TOPICS\"}".to_string(), &mut buf).unwrap();

        assert_eq!(&buf[..], b"{\"type\":\"TOPICS\"}\n");
    }
}
