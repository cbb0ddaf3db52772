//! Command-line interface for liveboard.
//!
//! `liveboard stats` follows the server stats stream, `liveboard field`
//! joins the soccer field. Run without a subcommand to get the stats view.
//! `liveboard trigger <generator>` starts one of the server's load
//! generators, typically from a second terminal while the charts run.

use crate::application::{Application, View};
use crate::control::{DemoClient, Trigger};
use crate::core::config::{ConfigBuilder, LogLevel};
use crate::core::{Config, LiveboardError, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;

/// Live terminal dashboard for a WebSocket demo server
#[derive(Parser, Debug)]
#[command(name = "liveboard")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// View to run
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Base URL of the demo server
    #[arg(long, global = true, env = "LIVEBOARD_SERVER")]
    pub server: Option<String>,

    /// Configuration file path (default: ~/.config/liveboard/config.yaml)
    #[arg(short, long, global = true, env = "LIVEBOARD_CONFIG")]
    pub config: Option<PathBuf>,

    /// Points kept per chart series
    #[arg(long, global = true, env = "LIVEBOARD_WINDOW")]
    pub window: Option<usize>,

    /// JSON file of historical samples to seed the charts with
    #[arg(long, global = true, env = "LIVEBOARD_SEED")]
    pub seed: Option<PathBuf>,

    /// Milliseconds between position updates on the field
    #[arg(long, global = true, env = "LIVEBOARD_SEND_INTERVAL_MS")]
    pub send_interval_ms: Option<u64>,

    /// Do not reconnect after the stream drops
    #[arg(long, global = true, env = "LIVEBOARD_NO_RECONNECT")]
    pub no_reconnect: bool,

    /// Enable debug logging
    #[arg(short, long, global = true, env = "LIVEBOARD_DEBUG")]
    pub debug: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, env = "LIVEBOARD_LOG_LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Run without a terminal UI, logging updates until Ctrl-C
    #[arg(long, global = true, env = "LIVEBOARD_HEADLESS")]
    pub headless: bool,

    /// Validate configuration and exit
    #[arg(long, global = true)]
    pub check_config: bool,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Live charts of the server stats stream
    Stats,
    /// Soccer field with pointer-driven position sync
    Field,
    /// Start a load generator on the server
    Trigger {
        #[command(subcommand)]
        generator: Generator,
    },
}

/// Load generators of the demo server
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Generator {
    /// Spawn tasks that sleep
    Sleeper {
        /// Number of tasks
        #[arg(long, default_value_t = 1000)]
        tasks: u64,
        /// Seconds each task sleeps
        #[arg(long, default_value_t = 10)]
        time: u64,
    },
    /// Spawn receivers woken over a watch channel
    Channel {
        /// Number of receiving tasks
        #[arg(long, default_value_t = 1000)]
        tasks: u64,
        /// Seconds between pings
        #[arg(long, default_value_t = 1)]
        time: u64,
        /// Number of pings before the receivers terminate
        #[arg(long, default_value_t = 10)]
        repeat: u64,
    },
    /// Block runtime workers with synchronous sleeps
    Blockers {
        /// Number of blocking tasks
        #[arg(long, default_value_t = 4)]
        tasks: u64,
        /// Seconds each task blocks
        #[arg(long, default_value_t = 10)]
        time: u64,
        /// Run on the blocking pool instead of the workers
        #[arg(long)]
        spawn_blocking: bool,
    },
    /// Burn CPU on dedicated threads
    Cpuloadgen {
        /// Number of threads
        #[arg(long, default_value_t = 2)]
        threads: u64,
        /// Seconds to keep them busy
        #[arg(long, default_value_t = 10)]
        duration: u64,
    },
    /// Insert (and optionally delete) Redis keys
    Rediskeys {
        /// Number of inserting tasks
        #[arg(long, default_value_t = 10)]
        tasks: u64,
        /// Keys per task
        #[arg(long, default_value_t = 1000)]
        keys: u64,
        /// Delete the keys again afterwards
        #[arg(long)]
        delete: bool,
    },
}

impl From<Generator> for Trigger {
    fn from(generator: Generator) -> Self {
        match generator {
            Generator::Sleeper { tasks, time } => Trigger::Sleeper {
                tasks,
                time_secs: time,
            },
            Generator::Channel { tasks, time, repeat } => Trigger::Channel {
                tasks,
                time_secs: time,
                repeat,
            },
            Generator::Blockers {
                tasks,
                time,
                spawn_blocking,
            } => Trigger::Blockers {
                tasks,
                time_secs: time,
                spawn_blocking,
            },
            Generator::Cpuloadgen { threads, duration } => Trigger::CpuLoad {
                threads,
                duration_secs: duration,
            },
            Generator::Rediskeys { tasks, keys, delete } => Trigger::RedisKeys { tasks, keys, delete },
        }
    }
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Cli::parse()
    }

    /// Selected view, stats by default.
    pub fn view(&self) -> View {
        match self.command {
            Some(Command::Field) => View::Field,
            _ => View::Stats,
        }
    }

    /// Load generator to start instead of running a view
    pub fn trigger(&self) -> Option<Trigger> {
        match &self.command {
            Some(Command::Trigger { generator }) => Some(Trigger::from(*generator)),
            _ => None,
        }
    }

    /// Load configuration with proper precedence:
    /// 1. CLI arguments (highest priority)
    /// 2. Environment variables
    /// 3. Config file
    /// 4. Defaults (lowest priority)
    pub async fn load_config(&self) -> Result<Config> {
        let mut builder = ConfigBuilder::new();

        let config_path = match &self.config {
            Some(path) => Some(path.clone()),
            None => dirs::config_dir()
                .map(|d| d.join("liveboard").join("config.yaml"))
                .filter(|path| path.exists()),
        };

        if let Some(path) = config_path {
            match tokio::fs::read_to_string(&path).await {
                Ok(content) => builder = builder.from_yaml(&content)?,
                Err(e) if self.config.is_some() => {
                    // Explicitly requested file must exist
                    return Err(LiveboardError::config(format!(
                        "Failed to read config file {:?}: {}",
                        path, e
                    )));
                },
                Err(_) => {},
            }
        }

        self.build_config_from_args(builder)
    }

    fn build_config_from_args(&self, mut builder: ConfigBuilder) -> Result<Config> {
        if let Some(server) = &self.server {
            builder = builder.base_url(server.clone());
        }
        if let Some(window) = self.window {
            builder = builder.window(window);
        }
        if let Some(seed) = &self.seed {
            builder = builder.seed_file(seed.clone());
        }
        if let Some(ms) = self.send_interval_ms {
            builder = builder.send_interval(Duration::from_millis(ms));
        }
        if self.no_reconnect {
            builder = builder.reconnect(false);
        }
        if let Some(level) = self.log_level {
            builder = builder.log_level(level);
        }

        builder.debug(self.debug).build()
    }

    /// Initialize logging. The terminal UI owns stdout, so interactive runs
    /// log to `logging.file` or nowhere; headless runs and triggers log to stderr.
    pub fn init_logging(&self, config: &Config) -> Result<()> {
        use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config.log_filter()));

        let to_stderr = self.headless || self.trigger().is_some();
        let stderr_layer = to_stderr.then(|| {
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_line_number(true)
                .compact()
        });

        let file_layer = match (&config.logging.file, to_stderr) {
            (Some(path), false) => {
                let file = std::fs::OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(path)
                    .map_err(|e| {
                        LiveboardError::config(format!("Failed to open log file {:?}: {}", path, e))
                    })?;
                Some(
                    fmt::layer()
                        .with_writer(Mutex::new(file))
                        .with_ansi(false)
                        .with_target(false),
                )
            },
            _ => None,
        };

        tracing_subscriber::registry()
            .with(filter)
            .with(stderr_layer)
            .with(file_layer)
            .try_init()
            .map_err(|e| LiveboardError::config(format!("Failed to initialize logging: {}", e)))?;

        Ok(())
    }
}

/// Execute the liveboard application.
pub async fn execute(cli: Cli) -> Result<()> {
    let config = cli.load_config().await?;

    if cli.check_config {
        config.validate()?;
        println!("Configuration is valid!");
        println!("  Server: {}", config.server.base_url);
        println!("  Stats stream: {}", config.server.stats_path);
        println!("  Field stream: {}", config.server.field_path);
        println!("  Window: {} points", config.charts.window);
        println!("  Charts: {}", config.charts.layout.len());
        println!("  Field: {} x {}", config.field.height, config.field.width);
        return Ok(());
    }

    cli.init_logging(&config)?;

    if let Some(trigger) = cli.trigger() {
        let client = DemoClient::from_config(&config)?;
        client.trigger(&trigger).await?;
        println!("Started {} on {}", trigger.path(), config.server.base_url);
        return Ok(());
    }

    let app = Application::new(config, cli.view(), cli.headless)?;
    app.run().await
}
