use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use log::info;

use crate::monitor::parse::parse_or_zero;
use crate::monitor::recorder::SampleLog;
use crate::monitor::source::LineSource;
use crate::monitor::window::SampleWindow;
use crate::monitor::MonitorError;

/// One accepted input line after it went through the whole pipeline.
#[derive(Clone, Debug)]
pub struct SampleRecord {
    pub index: u64,
    pub values: Vec<f64>,
    pub log_line: String,
}

/// Ties reader, parser, window and log together behind one `poll()` call.
///
/// `poll()` is the single safe point of the loop: the asynchronous reset
/// request (SIGUSR1, or the GUI reset button) only ever takes effect here,
/// never in the middle of an append.
pub struct Monitor<S: LineSource, W: Write> {
    source: S,
    log: SampleLog<W>,
    window: SampleWindow,
    channels: usize,
    next_index: u64,
    reset: Arc<AtomicBool>,
}

impl<S: LineSource, W: Write> Monitor<S, W> {
    pub fn new(
        source: S,
        log: SampleLog<W>,
        channels: usize,
        capacity: Option<usize>,
        reset: Arc<AtomicBool>,
    ) -> Self {
        Self {
            source,
            log,
            window: SampleWindow::new(channels, capacity),
            channels,
            next_index: 0,
            reset,
        }
    }

    pub fn window(&self) -> &SampleWindow {
        &self.window
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Requests a window clear; applied at the next `poll()`.
    pub fn reset_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.reset)
    }

    /// Processes at most one pending line.
    ///
    /// Returns `Ok(None)` when no complete line is waiting. Malformed
    /// lines are accepted as all-zero samples and still consume an index
    /// and produce a log record. The index counter survives window
    /// clears on purpose (matches the device monitor's historic
    /// behavior).
    pub fn poll(&mut self) -> Result<Option<SampleRecord>, MonitorError> {
        if self.reset.swap(false, Ordering::SeqCst) {
            info!("reset requested; clearing sample window");
            self.window.clear();
        }
        if !self.source.data_ready()? {
            return Ok(None);
        }
        let line = self.source.read_line()?;
        let values = parse_or_zero(&line, self.channels);
        let index = self.next_index;
        self.next_index += 1;
        self.window.append(index, &values)?;
        let log_line = self.log.append(&values, index, self.window.len())?;
        Ok(Some(SampleRecord {
            index,
            values,
            log_line,
        }))
    }

    /// Drains every line already waiting on the source.
    pub fn poll_pending(&mut self) -> Result<Vec<SampleRecord>, MonitorError> {
        let mut records = Vec::new();
        while let Some(record) = self.poll()? {
            records.push(record);
        }
        Ok(records)
    }

    pub fn flush_log(&mut self) -> Result<(), MonitorError> {
        self.log.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::monitor::source::ManualSource;

    fn monitor(
        lines: &[&str],
        channels: usize,
        capacity: Option<usize>,
    ) -> Monitor<ManualSource, Vec<u8>> {
        Monitor::new(
            ManualSource::new(lines.iter().copied()),
            SampleLog::with_writer(Vec::new()),
            channels,
            capacity,
            Arc::new(AtomicBool::new(false)),
        )
    }

    #[test]
    fn processes_lines_in_arrival_order() {
        let mut m = monitor(&["10", "20", "30"], 1, Some(1000));
        let records = m.poll_pending().unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].values, vec![10.0]);
        assert_eq!(records[2].index, 2);
        assert_eq!(m.window().points(0), vec![[0.0, 10.0], [1.0, 20.0], [2.0, 30.0]]);
        assert!(m.poll().unwrap().is_none());
    }

    #[test]
    fn malformed_lines_still_consume_an_index_and_log_a_record() {
        let mut m = monitor(&["boot garbage", "415", "???"], 1, Some(1000));
        let records = m.poll_pending().unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].values, vec![0.0]);
        assert_eq!(records[1].values, vec![415.0]);
        assert_eq!(records[2].values, vec![0.0]);
        assert_eq!(records[2].index, 2);
        assert!(records[2].log_line.contains("(sample 2) | Plot size 3"));
    }

    #[test]
    fn two_channel_lines_feed_both_queues() {
        let mut m = monitor(&["12.5,30.0", "13.0,29.5"], 2, Some(1000));
        m.poll_pending().unwrap();
        assert_eq!(m.window().points(0), vec![[0.0, 12.5], [1.0, 13.0]]);
        assert_eq!(m.window().points(1), vec![[0.0, 30.0], [1.0, 29.5]]);
    }

    #[test]
    fn reset_clears_window_but_index_keeps_increasing() {
        let mut m = monitor(&["1", "2", "3"], 1, Some(1000));
        m.poll().unwrap();
        m.poll().unwrap();
        m.reset_flag().store(true, Ordering::SeqCst);
        let record = m.poll().unwrap().unwrap();
        assert_eq!(record.index, 2);
        assert_eq!(m.window().len(), 1);
        assert_eq!(m.window().points(0), vec![[2.0, 3.0]]);
    }

    #[test]
    fn reset_with_no_pending_data_just_clears() {
        let mut m = monitor(&["5"], 1, Some(1000));
        m.poll().unwrap();
        m.reset_flag().store(true, Ordering::SeqCst);
        assert!(m.poll().unwrap().is_none());
        assert!(m.window().is_empty());
    }

    #[test]
    fn window_capacity_applies_through_the_pipeline() {
        let mut m = monitor(&["0", "1", "2", "3"], 1, Some(3));
        let records = m.poll_pending().unwrap();
        assert_eq!(records.len(), 4);
        assert_eq!(m.window().indices().collect::<Vec<_>>(), vec![1, 2, 3]);
        // the log still saw every line, capped window or not
        assert!(records[3].log_line.contains("Plot size 3"));
    }
}
