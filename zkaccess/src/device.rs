//! High-level panel interface

use std::sync::Arc;
use std::time::Duration;

use bytes::{Bytes, BytesMut};
use tracing::{debug, info, trace, warn};

use zkaccess_core::{
    Command, Frame,
    checksum,
    constants::{DEFAULT_READ_TIMEOUT, MAX_RESPONSE_SIZE, payloads},
    frame, rows, table,
};
use zkaccess_transport::Transport;
use zkaccess_types::Record;

use crate::error::{Error, Result};
use crate::query::TableQuery;
use crate::trace::{Direction, TraceHook};

/// Driver tuning
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceConfig {
    /// Longest wait for each read
    pub read_timeout: Duration,

    /// Fixed pause between sending a request and reading the answer
    pub settle_delay: Duration,

    /// Largest response accepted
    pub max_response_size: usize,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            read_timeout: Duration::from_secs(DEFAULT_READ_TIMEOUT),
            settle_delay: Duration::ZERO,
            max_response_size: MAX_RESPONSE_SIZE,
        }
    }
}

/// Access-control panel
///
/// Drives the request/response exchanges with one panel over a transport
/// the caller has already connected. Every call is a single round trip and
/// takes `&mut self`, so only one request is ever in flight.
///
/// # Examples
///
/// ```no_run
/// use tokio::net::TcpStream;
/// use zkaccess::{Device, TableQuery, TcpTransport};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let stream = TcpStream::connect("192.168.1.201:4370").await?;
///     let mut device = Device::new(TcpTransport::from_tcp(stream)?, 0x01);
///
///     device.connect().await?;
///     device.test_connection().await?;
///
///     for user in device.fetch_table(&TableQuery::all_users()).await? {
///         println!("{}", user);
///     }
///     Ok(())
/// }
/// ```
pub struct Device {
    transport: Box<dyn Transport>,
    device_id: u8,
    config: DeviceConfig,
    trace_hook: Option<TraceHook>,
}

impl Device {
    /// Create a driver for the panel at address `device_id`
    pub fn new(transport: impl Transport + 'static, device_id: u8) -> Self {
        Self {
            transport: Box::new(transport),
            device_id,
            config: DeviceConfig::default(),
            trace_hook: None,
        }
    }

    /// Replace the whole configuration
    pub fn with_config(mut self, config: DeviceConfig) -> Self {
        self.config = config;
        self
    }

    /// Set read timeout
    pub fn with_read_timeout(mut self, timeout: Duration) -> Self {
        self.config.read_timeout = timeout;
        self
    }

    /// Set a fixed delay between request and response
    pub fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.config.settle_delay = delay;
        self
    }

    /// Set the largest response accepted
    pub fn with_max_response_size(mut self, max: usize) -> Self {
        self.config.max_response_size = max;
        self
    }

    /// Capture every buffer sent to and received from the panel
    pub fn with_trace_hook<F>(mut self, hook: F) -> Self
    where
        F: Fn(Direction, &[u8]) + Send + Sync + 'static,
    {
        self.trace_hook = Some(Arc::new(hook));
        self
    }

    pub fn device_id(&self) -> u8 {
        self.device_id
    }

    pub fn config(&self) -> &DeviceConfig {
        &self.config
    }

    /// Give back the transport
    pub fn into_transport(self) -> Box<dyn Transport> {
        self.transport
    }

    /// Open a session
    ///
    /// Returns the panel's raw answer; its content is device-defined.
    pub async fn connect(&mut self) -> Result<Bytes> {
        info!("Connecting to panel 0x{:02X} at {}...", self.device_id, self.transport.peer());

        let frame = Frame::new(
            self.device_id,
            Command::Connect,
            Bytes::from_static(&payloads::CONNECT),
            checksum::CONNECT,
        );
        let response = self.round_trip(&frame).await?;

        info!("Connected ({} byte handshake)", response.len());
        Ok(response.freeze())
    }

    /// Check the panel answers
    ///
    /// Returns the panel's raw answer.
    pub async fn test_connection(&mut self) -> Result<Bytes> {
        debug!("Testing connection...");

        let frame = Frame::new(
            self.device_id,
            Command::Test,
            Bytes::from_static(&payloads::TEST),
            checksum::TEST,
        );
        let response = self.round_trip(&frame).await?;

        Ok(response.freeze())
    }

    /// Pull a table
    ///
    /// # Errors
    ///
    /// - [`Error::Schema`] if the query selects no known column
    /// - [`Error::InvalidRequest`] if the selection does not fit a request
    /// - [`Error::NoResponse`] if the panel stays silent
    /// - [`Error::MalformedResponse`] if the answer cannot be decoded
    /// - [`Error::Transport`] if reading or writing fails
    pub async fn fetch_table(&mut self, query: &TableQuery) -> Result<Vec<Record>> {
        let schema = query.schema();
        let selection = query.selection()?;

        debug!(
            "Fetching {} ({} of {} columns, options={:?})",
            schema,
            selection.len(),
            schema.column_count(),
            query.fetch_options()
        );

        let payload = TableQuery::encode(schema, &selection, query.fetch_options())?;
        let frame = Frame::new(self.device_id, Command::GetDeviceData, payload, query.checksum());

        let raw = self.round_trip(&frame).await?;

        let response = frame::decode(&raw).map_err(zkaccess_core::Error::from)?;
        if response.device_id != self.device_id {
            return Err(zkaccess_core::Error::DeviceMismatch {
                expected: self.device_id,
                actual: response.device_id,
            }
            .into());
        }
        if let Some(expected) = query.response_checksum() {
            response
                .verify_checksum(expected)
                .map_err(zkaccess_core::Error::from)?;
        }

        let body = table::response_rows(&response.payload, selection.len())?;
        let labels = query.labels(&selection);

        let decoded = rows::decode_rows_with(body, labels.len(), query.trailing_policy())
            .map_err(zkaccess_core::Error::from)?;

        let records: Vec<Record> = decoded.iter().map(|row| Record::from_row(labels, row)).collect();

        debug!("Fetched {} records from {}", records.len(), schema.name);
        Ok(records)
    }

    // Helper methods

    /// Send one frame and collect the answer
    async fn round_trip(&mut self, frame: &Frame) -> Result<BytesMut> {
        self.send_frame(frame).await?;

        if !self.config.settle_delay.is_zero() {
            tokio::time::sleep(self.config.settle_delay).await;
        }

        self.receive_response().await
    }

    async fn send_frame(&mut self, frame: &Frame) -> Result<()> {
        let data = frame
            .encode()
            .map_err(|e| Error::InvalidRequest(e.into()))?;

        trace!("Sending {}: {}", frame, hex::encode(&data));
        self.capture(Direction::Sent, &data);

        self.transport.send(&data).await?;

        Ok(())
    }

    /// Read one response, reassembling a frame split across reads
    ///
    /// Non-frame answers are returned as first read.
    async fn receive_response(&mut self) -> Result<BytesMut> {
        let max = self.config.max_response_size;
        let timeout = self.config.read_timeout;

        let mut buf = match self.transport.receive(max, timeout).await {
            Ok(buf) if buf.is_empty() => return Err(Error::NoResponse),
            Ok(buf) => buf,
            Err(e) if e.is_timeout() => {
                warn!("No response within {:?}", timeout);
                return Err(Error::NoResponse);
            }
            Err(e) => return Err(e.into()),
        };

        loop {
            let missing = frame::missing_bytes(&buf);
            if missing == 0 {
                break;
            }
            if buf.len() + missing > max {
                return Err(Error::ResponseTooLarge { max });
            }

            trace!("Waiting for {} more bytes", missing);

            match self.transport.receive(missing, timeout).await {
                Ok(more) if more.is_empty() => {
                    warn!("Stream closed mid-frame after {} bytes", buf.len());
                    break;
                }
                Ok(more) => buf.extend_from_slice(&more),
                Err(e) if e.is_timeout() => {
                    warn!("Frame incomplete after {:?} ({} bytes)", timeout, buf.len());
                    break;
                }
                Err(e) => return Err(e.into()),
            }
        }

        trace!("Received {} bytes: {}", buf.len(), hex::encode(&buf));
        self.capture(Direction::Received, &buf);

        Ok(buf)
    }

    fn capture(&self, direction: Direction, data: &[u8]) {
        if let Some(hook) = &self.trace_hook {
            hook(direction, data);
        }
    }
}
