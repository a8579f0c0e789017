use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use chrono::{DateTime, Local};

use crate::monitor::MonitorError;

/// Formats one sample record the way the Arduino monitor always has:
/// `[<timestamp>] <value(s)> ppm CH4 (sample <index>) | Plot size <len>`.
/// Values are integer-truncated; the two-channel form reads `sensor 1/2:`.
pub fn format_record(
    timestamp: &DateTime<Local>,
    values: &[f64],
    index: u64,
    window_len: usize,
) -> String {
    let stamp = timestamp.format("%Y-%m-%d %H:%M:%S%.6f");
    let reading = match values {
        [v1, v2] => format!("sensor 1/2: {}/{}", *v1 as i64, *v2 as i64),
        [v] => format!("{}", *v as i64),
        other => other
            .iter()
            .map(|v| (*v as i64).to_string())
            .collect::<Vec<_>>()
            .join("/"),
    };
    format!("[{stamp}] {reading} ppm CH4 (sample {index}) | Plot size {window_len}")
}

/// Append-only sink for sample records, opened once for the process
/// lifetime. Each record is also mirrored to stdout. Write failures are
/// fatal to the run: the log is the whole point of the tool.
pub struct SampleLog<W: Write> {
    writer: W,
    echo_stdout: bool,
}

impl SampleLog<BufWriter<File>> {
    pub fn create(path: &Path) -> Result<Self, MonitorError> {
        let file = File::create(path).map_err(MonitorError::Log)?;
        Ok(Self {
            writer: BufWriter::new(file),
            echo_stdout: true,
        })
    }
}

impl<W: Write> SampleLog<W> {
    pub fn with_writer(writer: W) -> Self {
        Self {
            writer,
            echo_stdout: false,
        }
    }

    /// Appends exactly one record line and returns it (the GUI shows a
    /// tail of recent records).
    pub fn append(
        &mut self,
        values: &[f64],
        index: u64,
        window_len: usize,
    ) -> Result<String, MonitorError> {
        let line = format_record(&Local::now(), values, index, window_len);
        writeln!(self.writer, "{line}").map_err(MonitorError::Log)?;
        if self.echo_stdout {
            println!("{line}");
        }
        Ok(line)
    }

    pub fn flush(&mut self) -> Result<(), MonitorError> {
        self.writer.flush().map_err(MonitorError::Log)
    }
}

impl<W: Write> Drop for SampleLog<W> {
    fn drop(&mut self) {
        let _ = self.writer.flush();
    }
}
