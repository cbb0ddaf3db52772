//! HTTP side of the demo server: load generators and host information.
//!
//! The server exposes a handful of form endpoints that make it misbehave on
//! purpose (sleeping tasks, blocked workers, CPU burners, Redis churn) so the
//! effect shows up on the stats charts, plus `/api/sysinfo` describing the
//! host it runs on.

use crate::core::{Config, LiveboardError, Result};
use serde::Deserialize;
use std::time::Duration;

/// Path of the host information endpoint
pub const SYSINFO_PATH: &str = "/api/sysinfo";

/// One load generator run on the demo server
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Trigger {
    /// Spawn `tasks` tasks that each sleep for `time_secs`
    Sleeper { tasks: u64, time_secs: u64 },
    /// Spawn `tasks` receivers pinged `repeat` times, `time_secs` apart
    Channel {
        tasks: u64,
        time_secs: u64,
        repeat: u64,
    },
    /// Block `tasks` runtime workers (or blocking threads) for `time_secs`
    Blockers {
        tasks: u64,
        time_secs: u64,
        spawn_blocking: bool,
    },
    /// Burn CPU on `threads` threads for `duration_secs`
    CpuLoad { threads: u64, duration_secs: u64 },
    /// Insert `keys` Redis keys from each of `tasks` tasks, optionally deleting them again
    RedisKeys { tasks: u64, keys: u64, delete: bool },
}

impl Trigger {
    /// Endpoint the trigger is posted to.
    pub fn path(&self) -> &'static str {
        match self {
            Trigger::Sleeper { .. } => "/sleeper",
            Trigger::Channel { .. } => "/channel",
            Trigger::Blockers { .. } => "/blockers",
            Trigger::CpuLoad { .. } => "/cpuloadgen",
            Trigger::RedisKeys { .. } => "/rediskeys",
        }
    }

    /// Form fields in the order the server's HTML form sends them.
    /// Checkboxes are sent as `on` when set and left out otherwise.
    pub fn form(&self) -> Vec<(&'static str, String)> {
        let mut fields = Vec::new();
        match *self {
            Trigger::Sleeper { tasks, time_secs } => {
                fields.push(("tasks", tasks.to_string()));
                fields.push(("time", time_secs.to_string()));
            },
            Trigger::Channel {
                tasks,
                time_secs,
                repeat,
            } => {
                fields.push(("tasks", tasks.to_string()));
                fields.push(("time", time_secs.to_string()));
                fields.push(("repeat", repeat.to_string()));
            },
            Trigger::Blockers {
                tasks,
                time_secs,
                spawn_blocking,
            } => {
                fields.push(("tasks", tasks.to_string()));
                fields.push(("time", time_secs.to_string()));
                if spawn_blocking {
                    fields.push(("spawn_blocking", "on".to_string()));
                }
            },
            Trigger::CpuLoad {
                threads,
                duration_secs,
            } => {
                fields.push(("threads", threads.to_string()));
                fields.push(("duration", duration_secs.to_string()));
            },
            Trigger::RedisKeys { tasks, keys, delete } => {
                fields.push(("tasks", tasks.to_string()));
                fields.push(("keys", keys.to_string()));
                if delete {
                    fields.push(("delete", "on".to_string()));
                }
            },
        }
        fields
    }
}

/// Host information reported by the demo server.
///
/// Every field is optional on the wire; older servers only render this into
/// their landing page and answer 404 on the endpoint.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct SystemInfo {
    /// Aggregate CPU description
    pub cpu: CpuInfo,
    /// One entry per logical core
    pub cpus: Vec<CpuInfo>,
    /// Total memory as reported by the host
    pub mem: u64,
    /// Host uptime in seconds
    pub uptime: u64,
    pub os: Option<String>,
    pub hostname: Option<String>,
    /// Runtime worker threads
    pub workers: usize,
    /// Tasks spawned since the server started
    pub spawned_tasks: Option<u64>,
}

/// CPU description
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct CpuInfo {
    pub brand: String,
    pub name: String,
    pub vendor_id: String,
    /// Clock in MHz
    pub frequency: u64,
}

impl SystemInfo {
    /// One-line description for the dashboard header.
    pub fn summary(&self) -> String {
        let mut parts = Vec::new();
        if let Some(hostname) = &self.hostname {
            parts.push(hostname.clone());
        }
        if let Some(os) = &self.os {
            parts.push(os.clone());
        }
        let brand = self.cpu.brand.trim();
        match (brand.is_empty(), self.cpus.len()) {
            (false, 0) => parts.push(brand.to_string()),
            (false, cores) => parts.push(format!("{} x{}", brand, cores)),
            (true, 0) => {},
            (true, cores) => parts.push(format!("{} cores", cores)),
        }
        if self.workers > 0 {
            parts.push(format!("{} workers", self.workers));
        }
        if self.uptime > 0 {
            parts.push(format!("up {}", format_uptime(self.uptime)));
        }
        parts.join(" | ")
    }
}

fn format_uptime(secs: u64) -> String {
    let days = secs / 86_400;
    let hours = (secs % 86_400) / 3600;
    let minutes = (secs % 3600) / 60;
    if days > 0 {
        format!("{}d {}h", days, hours)
    } else if hours > 0 {
        format!("{}h {}m", hours, minutes)
    } else {
        format!("{}m", minutes)
    }
}

/// Turn a ws(s) or http(s) base URL into the http(s) URL of `path`.
pub fn http_url(base: &str, path: &str) -> Result<String> {
    let base = base.trim_end_matches('/');
    let http_base = if let Some(rest) = base.strip_prefix("wss://") {
        format!("https://{}", rest)
    } else if let Some(rest) = base.strip_prefix("ws://") {
        format!("http://{}", rest)
    } else if base.starts_with("http://") || base.starts_with("https://") {
        base.to_string()
    } else {
        return Err(LiveboardError::config(format!("Unsupported server URL '{}'", base)));
    };
    Ok(format!("{}{}", http_base, path))
}

/// Client for the demo server's HTTP endpoints
#[derive(Debug, Clone)]
pub struct DemoClient {
    base_url: String,
    client: reqwest::Client,
}

impl DemoClient {
    /// Client for `base_url`; every request is bounded by `timeout`.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        // Validates the scheme up front
        http_url(base_url, "")?;
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    /// Client for the configured server.
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(&config.server.base_url, config.server.connect_timeout)
    }

    /// Start a load generator. The server answers once the work is spawned
    /// (or, for Redis keys, finished).
    pub async fn trigger(&self, trigger: &Trigger) -> Result<()> {
        let url = http_url(&self.base_url, trigger.path())?;
        tracing::info!("Posting {:?} to {}", trigger, url);
        self.client
            .post(&url)
            .form(&trigger.form())
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    /// Fetch host information from the server.
    pub async fn system_info(&self) -> Result<SystemInfo> {
        let url = http_url(&self.base_url, SYSINFO_PATH)?;
        let info = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_url_protocol_switch() {
        assert_eq!(
            http_url("ws://127.0.0.1:8123/", "/sleeper").unwrap(),
            "http://127.0.0.1:8123/sleeper"
        );
        assert_eq!(
            http_url("wss://demo.example.com", SYSINFO_PATH).unwrap(),
            "https://demo.example.com/api/sysinfo"
        );
        assert_eq!(
            http_url("https://demo.example.com", "/channel").unwrap(),
            "https://demo.example.com/channel"
        );
        assert!(http_url("demo.example.com", "/channel").is_err());
    }

    #[test]
    fn test_trigger_forms() {
        let trigger = Trigger::Channel {
            tasks: 10,
            time_secs: 2,
            repeat: 5,
        };
        assert_eq!(trigger.path(), "/channel");
        assert_eq!(
            trigger.form(),
            vec![
                ("tasks", "10".to_string()),
                ("time", "2".to_string()),
                ("repeat", "5".to_string())
            ]
        );

        let blocking = Trigger::Blockers {
            tasks: 4,
            time_secs: 3,
            spawn_blocking: true,
        };
        assert_eq!(blocking.form().last(), Some(&("spawn_blocking", "on".to_string())));

        let keep = Trigger::RedisKeys {
            tasks: 2,
            keys: 100,
            delete: false,
        };
        assert_eq!(keep.path(), "/rediskeys");
        assert!(keep.form().iter().all(|(name, _)| *name != "delete"));

        let cpu = Trigger::CpuLoad {
            threads: 2,
            duration_secs: 30,
        };
        assert_eq!(cpu.path(), "/cpuloadgen");
        assert_eq!(cpu.form()[1], ("duration", "30".to_string()));
    }

    #[test]
    fn test_system_info_summary() {
        let info: SystemInfo = serde_json::from_str(
            r#"{"cpu":{"brand":"AMD Ryzen 7","name":"cpu","cpu_usage":3.2},
                "cpus":[{"brand":"AMD Ryzen 7"},{"brand":"AMD Ryzen 7"}],
                "mem":16000000,"uptime":93784,"os":"Linux 22.04",
                "hostname":"demo","workers":8,"spawned_tasks":1200}"#,
        )
        .unwrap();
        assert_eq!(info.summary(), "demo | Linux 22.04 | AMD Ryzen 7 x2 | 8 workers | up 1d 2h");
        assert_eq!(info.spawned_tasks, Some(1200));
    }

    #[test]
    fn test_sparse_system_info() {
        let info: SystemInfo = serde_json::from_str(r#"{"hostname":null,"uptime":125}"#).unwrap();
        assert_eq!(info.summary(), "up 2m");
        assert_eq!(SystemInfo::default().summary(), "");
    }

    #[test]
    fn test_client_rejects_unknown_scheme() {
        assert!(DemoClient::new("ftp://demo", Duration::from_secs(1)).is_err());
        assert!(DemoClient::new("ws://127.0.0.1:8123", Duration::from_secs(1)).is_ok());
    }
}
