//! Running usage counters for a chat session.

/// Point-in-time view of the session metrics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub total_tokens: u64,
    pub message_count: u64,
    pub average_response_time_ms: u64,
    pub throughput_tokens_per_second: u64,
}

#[derive(Debug, Clone, Default)]
pub struct MetricsAggregator {
    total_tokens: u64,
    message_count: u64,
    response_time_samples: Vec<u64>,
    total_response_time_ms: u64,
}

impl MetricsAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_exchange(&mut self, tokens: u64, response_time_ms: u64) {
        self.response_time_samples.push(response_time_ms);
        self.total_response_time_ms += response_time_ms;
        self.total_tokens += tokens;
        self.message_count += 1;
    }

    pub fn response_time_samples(&self) -> &[u64] {
        &self.response_time_samples
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let samples = self.response_time_samples.len() as u64;
        let average_response_time_ms = if samples == 0 {
            0
        } else {
            (self.total_response_time_ms as f64 / samples as f64).round() as u64
        };

        let throughput_tokens_per_second = if self.total_response_time_ms == 0 {
            0
        } else {
            let seconds = self.total_response_time_ms as f64 / 1000.0;
            (self.total_tokens as f64 / seconds).round() as u64
        };

        MetricsSnapshot {
            total_tokens: self.total_tokens,
            message_count: self.message_count,
            average_response_time_ms,
            throughput_tokens_per_second,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_after_two_exchanges() {
        let mut metrics = MetricsAggregator::new();
        metrics.record_exchange(10, 2000);
        metrics.record_exchange(30, 1000);

        assert_eq!(
            metrics.snapshot(),
            MetricsSnapshot {
                total_tokens: 40,
                message_count: 2,
                average_response_time_ms: 1500,
                throughput_tokens_per_second: 13,
            }
        );
        assert_eq!(metrics.response_time_samples(), &[2000, 1000]);
    }

    #[test]
    fn empty_and_zero_time_snapshots_are_zero() {
        let mut metrics = MetricsAggregator::new();
        assert_eq!(metrics.snapshot(), MetricsSnapshot::default());

        metrics.record_exchange(25, 0);
        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.total_tokens, 25);
        assert_eq!(snapshot.average_response_time_ms, 0);
        assert_eq!(snapshot.throughput_tokens_per_second, 0);
    }

    #[test]
    fn reset_clears_everything() {
        let mut metrics = MetricsAggregator::new();
        metrics.record_exchange(12, 480);
        metrics.reset();
        assert_eq!(metrics.snapshot(), MetricsSnapshot::default());
        assert!(metrics.response_time_samples().is_empty());
    }
}
