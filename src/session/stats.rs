//! Stats dashboard state.

use crate::charts::{ChartSurface, StreamingChartSet};
use crate::control::SystemInfo;
use crate::core::{Result, Sample};
use crate::stream::{ConnectionStatus, StreamEvent};

/// Everything the stats view shows, fed from one event loop.
#[derive(Debug)]
pub struct StatsSession<S> {
    charts: StreamingChartSet<S>,
    status: ConnectionStatus,
    last_sample: Option<Sample>,
    received: u64,
    rejected: u64,
    server_info: Option<SystemInfo>,
}

impl<S: ChartSurface> StatsSession<S> {
    pub fn new(charts: StreamingChartSet<S>) -> Self {
        Self {
            charts,
            status: ConnectionStatus::Connecting,
            last_sample: None,
            received: 0,
            rejected: 0,
            server_info: None,
        }
    }

    /// Apply one channel event. Malformed messages are logged and counted.
    pub fn handle(&mut self, event: &StreamEvent) {
        self.status.observe(event);
        if let StreamEvent::Message(text) = event {
            if let Err(e) = self.ingest(text) {
                tracing::warn!("Rejected stats message: {}", e);
            }
        }
    }

    /// Decode one stats message and append it to the charts.
    pub fn ingest(&mut self, text: &str) -> Result<()> {
        self.received += 1;
        let sample = match Sample::from_json(text) {
            Ok(sample) => sample,
            Err(e) => {
                self.rejected += 1;
                return Err(e);
            },
        };

        if let Some(last) = &self.last_sample {
            if sample.timestamp < last.timestamp {
                tracing::debug!(
                    "Sample at {} is older than the previous one at {}",
                    sample.timestamp,
                    last.timestamp
                );
            }
        }

        self.charts.append(&sample);
        self.last_sample = Some(sample);
        Ok(())
    }

    pub fn charts(&self) -> &StreamingChartSet<S> {
        &self.charts
    }

    pub fn charts_mut(&mut self) -> &mut StreamingChartSet<S> {
        &mut self.charts
    }

    pub fn status(&self) -> &ConnectionStatus {
        &self.status
    }

    /// Most recent accepted sample, for the stat readouts
    pub fn last_sample(&self) -> Option<&Sample> {
        self.last_sample.as_ref()
    }

    /// Host description fetched from the server, once it arrives
    pub fn server_info(&self) -> Option<&SystemInfo> {
        self.server_info.as_ref()
    }

    pub fn set_server_info(&mut self, info: SystemInfo) {
        tracing::debug!("Server info: {}", info.summary());
        self.server_info = Some(info);
    }

    pub fn received(&self) -> u64 {
        self.received
    }

    pub fn rejected(&self) -> u64 {
        self.rejected
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::{ChartSpec, RedrawTracker};

    const GOOD: &str = r#"{"time":"2024-03-01T12:00:00Z","tasks":4,"sync_threads":1,
        "mem":900,"mem_proc":12,"cpu":3.5,"cpu_proc":0.1,"keys":77}"#;

    fn session() -> StatsSession<RedrawTracker> {
        let charts =
            StreamingChartSet::initialize(ChartSpec::default_layout(), 60, RedrawTracker::new(3), None)
                .unwrap();
        StatsSession::new(charts)
    }

    #[test]
    fn test_message_updates_charts_and_readouts() {
        let mut session = session();
        session.handle(&StreamEvent::Connected);
        session.handle(&StreamEvent::Message(GOOD.to_string()));

        assert!(session.status().is_connected());
        assert_eq!(session.last_sample().unwrap().key_count, 77);
        assert_eq!(session.charts().chart("cpu").unwrap().len(), 1);
        assert!(session.charts_mut().surface_mut().take_dirty());
    }

    #[test]
    fn test_malformed_message_is_not_applied() {
        let mut session = session();
        session.handle(&StreamEvent::Message(r#"{"time":"2024-03-01T12:00:00Z"}"#.to_string()));
        session.handle(&StreamEvent::Message("not json".to_string()));

        assert_eq!(session.received(), 2);
        assert_eq!(session.rejected(), 2);
        assert!(session.last_sample().is_none());
        assert!(session.charts().charts().iter().all(|c| c.is_empty()));
        assert!(!session.charts_mut().surface_mut().take_dirty());
    }

    #[test]
    fn test_disconnect_keeps_history() {
        let mut session = session();
        session.handle(&StreamEvent::Message(GOOD.to_string()));
        session.handle(&StreamEvent::Disconnected { reason: "reset".to_string() });

        assert!(!session.status().is_connected());
        assert_eq!(session.charts().chart("mem").unwrap().len(), 1);
    }
}
