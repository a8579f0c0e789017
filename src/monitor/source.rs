use std::collections::VecDeque;
use std::io::{BufRead, BufReader, ErrorKind};
use std::time::Duration;

use crate::monitor::MonitorError;

/// How long one blocking read attempt may wait before we poll again.
/// A timed-out attempt keeps any partial line and retries, so from the
/// caller's point of view `read_line` blocks until a full line arrives.
const READ_TIMEOUT: Duration = Duration::from_millis(200);

/// Trait representing something that can yield raw sample lines.
pub trait LineSource {
    /// Non-blocking check whether at least one byte is waiting.
    fn data_ready(&mut self) -> Result<bool, MonitorError>;
    /// Blocks until one full line arrived; returns it whitespace-trimmed.
    fn read_line(&mut self) -> Result<String, MonitorError>;
}

/// Line source backed by a real serial port, opened once for the process
/// lifetime. No reconnect logic: an open failure is fatal to the caller.
pub struct SerialLineSource {
    reader: BufReader<Box<dyn serialport::SerialPort>>,
}

impl SerialLineSource {
    pub fn open(device: &str, baud: u32) -> Result<Self, MonitorError> {
        let port = serialport::new(device, baud)
            .timeout(READ_TIMEOUT)
            .open()
            .map_err(|source| MonitorError::Connection {
                device: device.to_owned(),
                source,
            })?;
        Ok(Self {
            reader: BufReader::new(port),
        })
    }
}

impl LineSource for SerialLineSource {
    fn data_ready(&mut self) -> Result<bool, MonitorError> {
        if !self.reader.buffer().is_empty() {
            return Ok(true);
        }
        Ok(self.reader.get_ref().bytes_to_read()? > 0)
    }

    fn read_line(&mut self) -> Result<String, MonitorError> {
        let mut line = String::new();
        loop {
            match self.reader.read_line(&mut line) {
                Ok(0) => return Err(MonitorError::Disconnected),
                Ok(_) => return Ok(line.trim().to_owned()),
                // Timeout mid-line: the partial line stays in `line`,
                // keep waiting for the terminator.
                Err(err) if err.kind() == ErrorKind::TimedOut => continue,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(MonitorError::Read(err)),
            }
        }
    }
}

/// In-memory source useful for tests and deterministic playback.
pub struct ManualSource {
    queue: VecDeque<String>,
}

impl ManualSource {
    pub fn new(lines: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            queue: lines.into_iter().map(Into::into).collect(),
        }
    }
}

impl LineSource for ManualSource {
    fn data_ready(&mut self) -> Result<bool, MonitorError> {
        Ok(!self.queue.is_empty())
    }

    fn read_line(&mut self) -> Result<String, MonitorError> {
        match self.queue.pop_front() {
            Some(line) => Ok(line.trim().to_owned()),
            None => Err(MonitorError::Disconnected),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_source_yields_lines_in_order_then_disconnects() {
        let mut source = ManualSource::new(["12.5,30.0", "  42 \r"]);
        assert!(source.data_ready().unwrap());
        assert_eq!(source.read_line().unwrap(), "12.5,30.0");
        assert_eq!(source.read_line().unwrap(), "42");
        assert!(!source.data_ready().unwrap());
        assert!(matches!(
            source.read_line(),
            Err(MonitorError::Disconnected)
        ));
    }
}
