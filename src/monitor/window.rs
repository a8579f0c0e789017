use std::collections::VecDeque;

use crate::monitor::MonitorError;

/// Rolling window over the most recent samples, one value queue per
/// channel plus a matching index axis.
///
/// Invariant: the index queue and every channel queue always have equal
/// length. `capacity: None` means unbounded growth (the caller pays the
/// CPU/memory cost).
pub struct SampleWindow {
    indices: VecDeque<u64>,
    channels: Vec<VecDeque<f64>>,
    capacity: Option<usize>,
}

impl SampleWindow {
    pub fn new(channel_count: usize, capacity: Option<usize>) -> Self {
        Self {
            indices: VecDeque::new(),
            channels: vec![VecDeque::new(); channel_count],
            capacity,
        }
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Pushes one sample onto every queue, evicting the oldest
    /// (index, values) pair first when the window is at capacity.
    pub fn append(&mut self, index: u64, values: &[f64]) -> Result<(), MonitorError> {
        if values.len() != self.channels.len() {
            return Err(MonitorError::ChannelMismatch {
                expected: self.channels.len(),
                actual: values.len(),
            });
        }
        if let Some(capacity) = self.capacity {
            while self.indices.len() >= capacity.max(1) {
                self.indices.pop_front();
                for channel in &mut self.channels {
                    channel.pop_front();
                }
            }
        }
        self.indices.push_back(index);
        for (channel, &value) in self.channels.iter_mut().zip(values) {
            channel.push_back(value);
        }
        Ok(())
    }

    /// Empties every queue. Deliberately does NOT touch the external
    /// sample index counter; indices keep increasing across clears.
    pub fn clear(&mut self) {
        self.indices.clear();
        for channel in &mut self.channels {
            channel.clear();
        }
    }

    pub fn indices(&self) -> impl Iterator<Item = u64> + '_ {
        self.indices.iter().copied()
    }

    /// (index, value) pairs of one channel, oldest first, in the
    /// `[x, y]` shape egui_plot consumes.
    pub fn points(&self, channel: usize) -> Vec<[f64; 2]> {
        let Some(values) = self.channels.get(channel) else {
            return Vec::new();
        };
        self.indices
            .iter()
            .zip(values)
            .map(|(&i, &v)| [i as f64, v])
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn queues_stay_equal_length() {
        let mut window = SampleWindow::new(2, Some(4));
        for i in 0..10 {
            window.append(i, &[i as f64, -(i as f64)]).unwrap();
            assert_eq!(window.points(0).len(), window.len());
            assert_eq!(window.points(1).len(), window.len());
        }
    }

    #[test]
    fn evicts_oldest_pair_beyond_capacity() {
        let mut window = SampleWindow::new(1, Some(3));
        for (i, v) in [10.0, 11.0, 12.0, 13.0].iter().enumerate() {
            window.append(i as u64, &[*v]).unwrap();
        }
        assert_eq!(window.len(), 3);
        assert_eq!(window.indices().collect::<Vec<_>>(), vec![1, 2, 3]);
        assert_eq!(
            window.points(0),
            vec![[1.0, 11.0], [2.0, 12.0], [3.0, 13.0]]
        );
    }

    #[test]
    fn unbounded_window_never_evicts() {
        let mut window = SampleWindow::new(1, None);
        for i in 0..2500 {
            window.append(i, &[0.0]).unwrap();
        }
        assert_eq!(window.len(), 2500);
    }

    #[test]
    fn clear_resets_length_and_next_append_is_length_one() {
        let mut window = SampleWindow::new(2, Some(100));
        window.append(0, &[1.0, 2.0]).unwrap();
        window.append(1, &[3.0, 4.0]).unwrap();
        window.clear();
        assert!(window.is_empty());
        assert!(window.points(0).is_empty());
        window.append(2, &[5.0, 6.0]).unwrap();
        assert_eq!(window.len(), 1);
        assert_eq!(window.points(1), vec![[2.0, 6.0]]);
    }

    #[test]
    fn clearing_an_empty_window_is_a_noop() {
        let mut window = SampleWindow::new(1, Some(10));
        window.clear();
        assert_eq!(window.len(), 0);
    }

    #[test]
    fn append_rejects_wrong_channel_count() {
        let mut window = SampleWindow::new(2, Some(10));
        assert!(matches!(
            window.append(0, &[1.0]),
            Err(MonitorError::ChannelMismatch {
                expected: 2,
                actual: 1
            })
        ));
        assert!(window.is_empty());
    }
}
