//! Stream transport

use std::time::Duration;

use async_trait::async_trait;
use bytes::BytesMut;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::{debug, trace};

use crate::{Transport, error::*};

/// Largest chunk taken from the stream in one read
const READ_CHUNK: usize = 64 * 1024;

/// Transport over an already connected byte stream
///
/// Works with anything tokio can read and write: TCP sockets, serial port
/// adapters, in-memory pipes.
pub struct StreamTransport<S> {
    stream: S,
    peer: String,
}

/// TCP transport for panels (port 4370 by default)
pub type TcpTransport = StreamTransport<TcpStream>;

impl<S> StreamTransport<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    /// Wrap a connected stream
    pub fn new(stream: S, peer: impl Into<String>) -> Self {
        Self {
            stream,
            peer: peer.into(),
        }
    }

    /// Get the underlying stream
    pub fn get_ref(&self) -> &S {
        &self.stream
    }

    /// Give back the underlying stream
    pub fn into_inner(self) -> S {
        self.stream
    }
}

impl StreamTransport<TcpStream> {
    /// Wrap a connected TCP socket
    pub fn from_tcp(stream: TcpStream) -> Result<Self> {
        // Disable Nagle's algorithm for low latency
        stream.set_nodelay(true)?;

        let peer = stream.peer_addr()?.to_string();
        debug!("Using TCP stream to {}", peer);

        Ok(Self::new(stream, peer))
    }
}

#[async_trait]
impl<S> Transport for StreamTransport<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    async fn send(&mut self, data: &[u8]) -> Result<()> {
        trace!("Sending {} bytes to {}: {:02X?}", data.len(), self.peer, &data[..data.len().min(32)]);

        self.stream.write_all(data).await?;
        self.stream.flush().await?;

        Ok(())
    }

    async fn receive(&mut self, max_bytes: usize, read_timeout: Duration) -> Result<BytesMut> {
        let mut buf = BytesMut::with_capacity(max_bytes.min(READ_CHUNK));
        let mut limited = (&mut self.stream).take(max_bytes as u64);

        let n = timeout(read_timeout, limited.read_buf(&mut buf))
            .await
            .map_err(|_| Error::ReadTimeout(read_timeout))??;

        if n == 0 {
            debug!("{} closed the stream", self.peer);
            return Ok(buf);
        }

        trace!("Received {} bytes from {}: {:02X?}", n, self.peer, &buf[..n.min(32)]);

        Ok(buf)
    }

    fn peer(&self) -> String {
        self.peer.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::duplex;

    #[tokio::test]
    async fn test_send_receive() {
        let (client, mut panel) = duplex(1024);
        let mut transport = StreamTransport::new(client, "panel");

        transport.send(&[0xAA, 0x01, 0x01]).await.unwrap();

        let mut got = [0u8; 3];
        panel.read_exact(&mut got).await.unwrap();
        assert_eq!(got, [0xAA, 0x01, 0x01]);

        panel.write_all(&[0x55; 4]).await.unwrap();
        let buf = transport.receive(1024, Duration::from_secs(1)).await.unwrap();
        assert_eq!(&buf[..], &[0x55; 4]);
    }

    #[tokio::test]
    async fn test_receive_respects_max_bytes() {
        let (client, mut panel) = duplex(1024);
        let mut transport = StreamTransport::new(client, "panel");

        panel.write_all(&[1, 2, 3, 4, 5, 6]).await.unwrap();

        let first = transport.receive(4, Duration::from_secs(1)).await.unwrap();
        let rest = transport.receive(4, Duration::from_secs(1)).await.unwrap();
        assert_eq!(&first[..], &[1, 2, 3, 4]);
        assert_eq!(&rest[..], &[5, 6]);
    }

    #[tokio::test]
    async fn test_receive_after_close_is_empty() {
        let (client, panel) = duplex(64);
        let mut transport = StreamTransport::new(client, "panel");
        drop(panel);

        let buf = transport.receive(64, Duration::from_secs(1)).await.unwrap();
        assert!(buf.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_receive_timeout() {
        let (client, _panel) = duplex(64);
        let mut transport = StreamTransport::new(client, "panel");

        let result = transport.receive(64, Duration::from_millis(100)).await;
        assert!(matches!(result, Err(Error::ReadTimeout(_))));
    }

    #[tokio::test]
    async fn test_tcp_transport() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let stream = TcpStream::connect(addr).await.unwrap();
        let transport = TcpTransport::from_tcp(stream).unwrap();

        assert_eq!(transport.peer(), addr.to_string());
    }
}
