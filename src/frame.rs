//! Length-prefixed message framing.
//!
//! Every message travels as a 4-byte big-endian payload length followed by
//! that many bytes of UTF-8 text. One frame carries exactly one JSON request
//! or response.

use std::io::{self, BufReader, BufWriter, Read, Write};

use crate::{Result, SockError};

/// Default upper bound on a single frame payload.
pub const DEFAULT_MAX_FRAME_LEN: usize = 1024 * 1024;

const HEADER_LEN: usize = 4;

/// Reads framed messages from a byte stream.
pub struct FrameReader<R: Read> {
    reader: BufReader<R>,
    max_len: usize,
}

impl<R: Read> FrameReader<R> {
    /// Wraps `inner` with the default frame size limit.
    pub fn new(inner: R) -> Self {
        Self {
            reader: BufReader::new(inner),
            max_len: DEFAULT_MAX_FRAME_LEN,
        }
    }

    /// Sets the largest payload this reader accepts.
    pub fn with_max_len(mut self, max_len: usize) -> Self {
        self.max_len = max_len;
        self
    }

    /// Reads the next message.
    ///
    /// Returns `Ok(None)` when the peer closed the stream cleanly between
    /// frames. A stream that ends part way through a frame is an error.
    pub fn read_message(&mut self) -> Result<Option<String>> {
        let mut header = [0u8; HEADER_LEN];
        let mut filled = 0;
        while filled < HEADER_LEN {
            match self.reader.read(&mut header[filled..]) {
                Ok(0) if filled == 0 => return Ok(None),
                Ok(0) => return Err(io::Error::from(io::ErrorKind::UnexpectedEof).into()),
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }

        let len = u32::from_be_bytes(header) as usize;
        if len > self.max_len {
            return Err(SockError::FrameTooLarge {
                len,
                max: self.max_len,
            });
        }

        let mut payload = vec![0u8; len];
        self.reader.read_exact(&mut payload)?;
        Ok(Some(String::from_utf8(payload)?))
    }
}

/// Writes framed messages to a byte stream.
pub struct FrameWriter<W: Write> {
    writer: BufWriter<W>,
}

impl<W: Write> FrameWriter<W> {
    /// Wraps `inner`.
    pub fn new(inner: W) -> Self {
        Self {
            writer: BufWriter::new(inner),
        }
    }

    /// Writes one message and flushes it to the peer.
    pub fn write_message(&mut self, message: &str) -> Result<()> {
        let len = u32::try_from(message.len()).map_err(|_| SockError::FrameTooLarge {
            len: message.len(),
            max: u32::MAX as usize,
        })?;
        self.writer.write_all(&len.to_be_bytes())?;
        self.writer.write_all(message.as_bytes())?;
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn encode(messages: &[&str]) -> Vec<u8> {
        let mut buf = Vec::new();
        {
            let mut writer = FrameWriter::new(&mut buf);
            for message in messages {
                writer.write_message(message).unwrap();
            }
        }
        buf
    }

    #[test]
    fn reads_back_to_back_frames_then_clean_eof() {
        let bytes = encode(&[r#"{"type":"echo","data":"a\nb"}"#, "not json"]);
        let mut reader = FrameReader::new(Cursor::new(bytes));

        assert_eq!(
            reader.read_message().unwrap().as_deref(),
            Some(r#"{"type":"echo","data":"a\nb"}"#)
        );
        assert_eq!(reader.read_message().unwrap().as_deref(), Some("not json"));
        assert!(reader.read_message().unwrap().is_none());
    }

    #[test]
    fn header_is_big_endian_length() {
        let bytes = encode(&["hi"]);
        assert_eq!(bytes, vec![0, 0, 0, 2, b'h', b'i']);
    }

    #[test]
    fn truncated_payload_is_an_error() {
        let mut bytes = encode(&["hello"]);
        bytes.truncate(6);
        let mut reader = FrameReader::new(Cursor::new(bytes));
        match reader.read_message() {
            Err(SockError::Io(e)) => assert_eq!(e.kind(), io::ErrorKind::UnexpectedEof),
            other => panic!("expected unexpected EOF, got {:?}", other),
        }
    }

    #[test]
    fn truncated_header_is_an_error() {
        let mut reader = FrameReader::new(Cursor::new(vec![0u8, 0]));
        assert!(matches!(reader.read_message(), Err(SockError::Io(_))));
    }

    #[test]
    fn oversized_frame_is_rejected() {
        let bytes = encode(&["0123456789"]);
        let mut reader = FrameReader::new(Cursor::new(bytes)).with_max_len(4);
        assert!(matches!(
            reader.read_message(),
            Err(SockError::FrameTooLarge { len: 10, max: 4 })
        ));
    }

    #[test]
    fn invalid_utf8_is_rejected() {
        let bytes = vec![0, 0, 0, 2, 0xff, 0xfe];
        let mut reader = FrameReader::new(Cursor::new(bytes));
        assert!(matches!(
            reader.read_message(),
            Err(SockError::InvalidUtf8(_))
        ));
    }
}
