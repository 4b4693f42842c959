// Serial transport for the microcontroller link
//
// Reads are best-effort snapshots of whatever bytes the port has buffered;
// writes put one complete command line on the wire per call.

use std::io::{Read, Write};
use std::time::Duration;

use serialport::SerialPort;
use tracing::info;

/// Read timeout on the underlying port. Reads only ask for bytes already
/// buffered, so this bounds a worst-case stall, not cycle latency.
const READ_TIMEOUT_MS: u64 = 10;

/// Error types for the bridge hardware layer
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    #[error("serial port error: {0}")]
    Serial(#[from] serialport::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, BridgeError>;

/// Byte transport the bridge writes command lines to and drains telemetry
/// from. Tests substitute an in-memory implementation.
pub trait Transport {
    /// Write one encoded command line as a single unit.
    fn send_line(&mut self, line: &str) -> Result<()>;

    /// Return whatever bytes are currently available, possibly none.
    fn read_available(&mut self) -> Result<String>;
}

/// Transport over a real serial device
pub struct SerialTransport {
    port: Box<dyn SerialPort>,
}

impl SerialTransport {
    /// Open the device at the given baud rate.
    pub fn open(path: &str, baud: u32) -> Result<Self> {
        info!("Opening serial device {} at {} baud", path, baud);
        let port = serialport::new(path, baud)
            .timeout(Duration::from_millis(READ_TIMEOUT_MS))
            .open()?;
        Ok(Self { port })
    }
}

impl Transport for SerialTransport {
    fn send_line(&mut self, line: &str) -> Result<()> {
        self.port.write_all(line.as_bytes())?;
        self.port.flush()?;
        Ok(())
    }

    fn read_available(&mut self) -> Result<String> {
        let available = self.port.bytes_to_read()? as usize;
        if available == 0 {
            return Ok(String::new());
        }
        let mut buf = vec![0u8; available];
        let n = self.port.read(&mut buf)?;
        buf.truncate(n);
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}
