use std::net::{TcpStream, ToSocketAddrs};

use serde_json::Value;

use crate::frame::{FrameReader, FrameWriter};
use crate::{Response, Result};

/// A blocking client for the request server.
pub struct SockClient {
    reader: FrameReader<TcpStream>,
    writer: FrameWriter<TcpStream>,
}

impl SockClient {
    /// Connects to the server at the given address.
    pub fn connect(addr: impl ToSocketAddrs) -> Result<Self> {
        let reader_stream = TcpStream::connect(addr)?;
        let writer_stream = reader_stream.try_clone()?;
        Ok(Self {
            reader: FrameReader::new(reader_stream),
            writer: FrameWriter::new(writer_stream),
        })
    }

    /// Sends a JSON request and waits for its response.
    pub fn request(&mut self, request: &Value) -> Result<Response> {
        self.send_raw(&serde_json::to_string(request)?)
    }

    /// Sends `text` verbatim as one frame and waits for the response.
    ///
    /// Useful for exercising the server with text that is not JSON.
    pub fn send_raw(&mut self, text: &str) -> Result<Response> {
        self.writer.write_message(text)?;
        let reply = self.reader.read_message()?.ok_or_else(|| {
            std::io::Error::new(
                std::io::ErrorKind::UnexpectedEof,
                "server closed the connection",
            )
        })?;
        Ok(serde_json::from_str(&reply)?)
    }
}
