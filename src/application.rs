//! Main application entry point for liveboard.

use crate::charts::{self, ChartSurface, LogSurface, RedrawTracker, StreamingChartSet};
use crate::control::{DemoClient, SystemInfo};
use crate::core::{Config, Result, Sample};
use crate::field::FieldBounds;
use crate::session::{FieldSession, StatsSession};
use crate::stream::{StreamConfig, StreamEvent, StreamHandle};
use crate::tui;
use tokio::sync::oneshot;

/// Which stream to follow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Server stats charts
    Stats,
    /// Soccer field position sync
    Field,
}

/// Wires a session to its stream and runs it in the terminal or headless.
pub struct Application {
    config: Config,
    view: View,
    headless: bool,
}

impl Application {
    /// Create a new Application with the given configuration.
    pub fn new(config: Config, view: View, headless: bool) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            view,
            headless,
        })
    }

    /// Run until the user quits (or Ctrl-C when headless).
    pub async fn run(self) -> Result<()> {
        tracing::info!(
            "Starting liveboard ({:?}, {})",
            self.view,
            if self.headless { "headless" } else { "terminal" }
        );
        match self.view {
            View::Stats => self.run_stats().await,
            View::Field => self.run_field().await,
        }
    }

    async fn run_stats(&self) -> Result<()> {
        let seed = self.load_seed().await?;
        let stream_config = StreamConfig::from_config(&self.config, &self.config.server.stats_path)?;
        let layout = self.config.charts.layout.clone();
        let window = self.config.charts.window;
        let server_info = self.fetch_server_info();

        if self.headless {
            let charts = StreamingChartSet::initialize(layout, window, LogSurface, seed.as_deref())?;
            let mut session = StatsSession::new(charts);
            tokio::spawn(async move {
                if let Ok(info) = server_info.await {
                    tracing::info!("Server: {}", info.summary());
                }
            });
            let mut stream = StreamHandle::spawn(stream_config);
            let result = run_headless(&mut stream, |event| session.handle(event)).await;
            log_stats_summary(&session);
            close(stream, result).await
        } else {
            let surface = RedrawTracker::new(tui::CHART_PANES);
            let charts = StreamingChartSet::initialize(layout, window, surface, seed.as_deref())?;
            let mut session = StatsSession::new(charts);
            let mut stream = StreamHandle::spawn(stream_config);
            let tick_rate = self.config.ui.tick_rate;
            let result = tui::run_stats(&mut session, &mut stream, tick_rate, server_info).await;
            log_stats_summary(&session);
            close(stream, result).await
        }
    }

    async fn run_field(&self) -> Result<()> {
        let bounds = FieldBounds::new(self.config.field.height, self.config.field.width);
        let stream_config = StreamConfig::from_config(&self.config, &self.config.server.field_path)?;
        let mut session = FieldSession::new(bounds);
        let mut stream = StreamHandle::spawn(stream_config);

        let result = if self.headless {
            run_headless(&mut stream, |event| match event {
                StreamEvent::Message(text) => match session.ingest(text) {
                    Ok(report) => tracing::info!(
                        players = session.scene().players().len(),
                        created = report.created,
                        updated = report.updated,
                        removed = report.removed,
                        "field snapshot"
                    ),
                    Err(e) => tracing::warn!("Rejected field message: {}", e),
                },
                event => session.handle(event),
            })
            .await
        } else {
            tui::run_field(
                &mut session,
                &mut stream,
                self.config.ui.tick_rate,
                self.config.field.send_interval,
            )
            .await
        };

        tracing::info!(
            "Field session ended: {} messages, {} rejected",
            session.received(),
            session.rejected()
        );
        close(stream, result).await
    }

    /// Ask the server about its host in the background. The receiver
    /// errors out if the server has nothing to say.
    fn fetch_server_info(&self) -> oneshot::Receiver<SystemInfo> {
        let (tx, rx) = oneshot::channel();
        match DemoClient::from_config(&self.config) {
            Ok(client) => {
                tokio::spawn(async move {
                    match client.system_info().await {
                        Ok(info) => {
                            let _ = tx.send(info);
                        },
                        Err(e) => tracing::info!("Server info unavailable: {}", e),
                    }
                });
            },
            Err(e) => tracing::warn!("No HTTP client for server info: {}", e),
        }
        rx
    }

    async fn load_seed(&self) -> Result<Option<Vec<Sample>>> {
        match &self.config.charts.seed_file {
            Some(path) => Ok(Some(charts::load_seed(path).await?)),
            None => Ok(None),
        }
    }

    /// Get a reference to the configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get the selected view.
    pub fn view(&self) -> View {
        self.view
    }
}

/// Feed channel events to `on_event` until Ctrl-C or the stream ends.
async fn run_headless<F>(stream: &mut StreamHandle, mut on_event: F) -> Result<()>
where
    F: FnMut(&StreamEvent),
{
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            signal = &mut ctrl_c => {
                signal?;
                tracing::info!("Received shutdown signal, stopping...");
                return Ok(());
            },
            event = stream.next_event() => match event {
                Some(event) => on_event(&event),
                None => {
                    tracing::warn!("Stream ended");
                    return Ok(());
                },
            },
        }
    }
}

/// Release the channel; the loop's own error wins over a shutdown error.
async fn close(stream: StreamHandle, result: Result<()>) -> Result<()> {
    let closed = stream.shutdown().await;
    result.and(closed)
}

fn log_stats_summary<S: ChartSurface>(session: &StatsSession<S>) {
    tracing::info!(
        "Stats session ended: {} messages, {} rejected",
        session.received(),
        session.rejected()
    );
}
