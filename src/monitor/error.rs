use thiserror::Error;

#[derive(Debug, Error)]
pub enum MonitorError {
    #[error("failed to open serial device {device}")]
    Connection {
        device: String,
        #[source]
        source: serialport::Error,
    },
    #[error("serial port error: {0}")]
    Serial(#[from] serialport::Error),
    #[error("serial read failed: {0}")]
    Read(std::io::Error),
    #[error("log sink write failed: {0}")]
    Log(std::io::Error),
    #[error("channel count mismatch: expected {expected}, got {actual}")]
    ChannelMismatch { expected: usize, actual: usize },
    #[error("serial stream closed by device")]
    Disconnected,
}
