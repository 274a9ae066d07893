use crate::models::disk::DiskKind;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub devices: DevicesConfig,

    #[serde(default)]
    pub benchmark: BenchmarkConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Seconds before an external tool is killed
    pub tool_timeout_sec: u64,
    /// Always list individual memory modules (same as --detail)
    pub memory_detail: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DevicesConfig {
    /// Glob-style patterns of devices to exclude (e.g. "loop*", "sr*")
    pub exclude: Vec<String>,
}

/// Throughput floors in decimal MB/s; a slower result is flagged as
/// advisory, never critical.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BenchmarkConfig {
    pub size_mib:       u64,
    pub floor_hdd_mb_s:  f64,
    pub floor_ssd_mb_s:  f64,
    pub floor_nvme_mb_s: f64,
}

// ── Defaults ─────────────────────────────────────────────────────────

impl Default for GeneralConfig {
    fn default() -> Self {
        Self { tool_timeout_sec: 30, memory_detail: false }
    }
}

impl Default for DevicesConfig {
    fn default() -> Self {
        Self {
            exclude: vec!["loop*".into(), "sr*".into(), "ram*".into(), "zram*".into(), "fd*".into()],
        }
    }
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        Self {
            size_mib:        256,
            floor_hdd_mb_s:  100.0,
            floor_ssd_mb_s:  300.0,
            floor_nvme_mb_s: 1000.0,
        }
    }
}

impl GeneralConfig {
    pub fn tool_timeout(&self) -> Duration {
        Duration::from_secs(self.tool_timeout_sec.max(1))
    }
}

impl DevicesConfig {
    pub fn is_excluded(&self, name: &str) -> bool {
        self.exclude.iter().any(|pat| {
            if let Some(p) = pat.strip_suffix('*') { name.starts_with(p) }
            else { pat == name }
        })
    }
}

impl BenchmarkConfig {
    pub fn floor(&self, kind: DiskKind) -> f64 {
        match kind {
            DiskKind::Hdd  => self.floor_hdd_mb_s,
            DiskKind::Ssd  => self.floor_ssd_mb_s,
            DiskKind::Nvme => self.floor_nvme_mb_s,
        }
    }
}

// ── Load / Save ───────────────────────────────────────────────────────

impl Config {
    pub fn load() -> Self {
        match try_load() {
            Ok(c)  => c,
            Err(e) => {
                tracing::debug!(error = %e, "using default config");
                // Write defaults on first run (best-effort)
                let _ = try_write_defaults();
                Config::default()
            }
        }
    }

    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("hwcheck").join("hwcheck.toml"))
    }

    pub fn parse(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }
}

fn try_load() -> Result<Config> {
    let path = Config::config_path().ok_or_else(|| anyhow::anyhow!("no config dir"))?;
    let text = fs::read_to_string(path)?;
    Config::parse(&text)
}

fn try_write_defaults() -> Result<()> {
    let path = Config::config_path().ok_or_else(|| anyhow::anyhow!("no config dir"))?;
    if path.exists() {
        return Ok(());
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let text = toml::to_string_pretty(&Config::default())?;
    fs::write(path, format!("# hwcheck configuration\n# Generated on first run, edit freely\n\n{}", text))?;
    Ok(())
}
