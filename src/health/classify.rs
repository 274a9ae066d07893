//! Fixed thresholds mapping one canonical metric to a severity tier.
//!
//! Every function here is pure. Callers skip absent metrics entirely, so a
//! tier exists only for values that were actually reported.

use crate::models::disk::HealthStatus;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Ok,
    Advisory,
    Critical,
}

impl Severity {
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Ok       => "OK",
            Severity::Advisory => "WARN",
            Severity::Critical => "CRIT",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub severity: Severity,
    pub label:    String,
}

impl Classification {
    fn new(severity: Severity, label: impl Into<String>) -> Self {
        Self { severity, label: label.into() }
    }

    pub fn is_critical(&self) -> bool {
        self.severity == Severity::Critical
    }
}

pub const TEMP_CRITICAL_C: i64 = 60;
pub const TEMP_ELEVATED_C: i64 = 50;
pub const TEMP_WARM_C: i64 = 40;

pub const WEAR_CRITICAL_PCT: u8 = 80;
pub const WEAR_HIGH_PCT: u8 = 50;
pub const WEAR_MODERATE_PCT: u8 = 20;

pub fn temperature(celsius: i64) -> Classification {
    if celsius > TEMP_CRITICAL_C {
        Classification::new(Severity::Critical, "critical")
    } else if celsius > TEMP_ELEVATED_C {
        Classification::new(Severity::Advisory, "elevated")
    } else if celsius > TEMP_WARM_C {
        Classification::new(Severity::Advisory, "warm")
    } else {
        Classification::new(Severity::Ok, "normal")
    }
}

pub fn wear(used_pct: u8) -> Classification {
    if used_pct >= WEAR_CRITICAL_PCT {
        Classification::new(Severity::Critical, "replace soon")
    } else if used_pct >= WEAR_HIGH_PCT {
        Classification::new(Severity::Advisory, "high wear")
    } else if used_pct >= WEAR_MODERATE_PCT {
        Classification::new(Severity::Advisory, "moderate wear")
    } else {
        Classification::new(Severity::Ok, "good")
    }
}

/// Remapped sectors are worth watching but never critical on their own.
pub fn reallocated_sectors(count: u64) -> Classification {
    if count > 0 {
        Classification::new(Severity::Advisory, "sectors remapped")
    } else {
        Classification::new(Severity::Ok, "none")
    }
}

pub fn pending_sectors(count: u64) -> Classification {
    if count > 0 {
        Classification::new(Severity::Critical, "unreadable sectors pending")
    } else {
        Classification::new(Severity::Ok, "none")
    }
}

pub fn offline_uncorrectable(count: u64) -> Classification {
    if count > 0 {
        Classification::new(Severity::Critical, "uncorrectable sectors")
    } else {
        Classification::new(Severity::Ok, "none")
    }
}

/// `None` for `Unknown`: missing health data is not a health verdict.
pub fn health(status: HealthStatus) -> Option<Classification> {
    match status {
        HealthStatus::Ok      => Some(Classification::new(Severity::Ok, "passed")),
        HealthStatus::Warning => Some(Classification::new(Severity::Critical, "failing")),
        HealthStatus::Unknown => None,
    }
}

const RAID_HEALTHY: &[&str] = &["clean", "active", "clean, checking"];
const RAID_DEGRADED_PATTERNS: &[&str] = &["degraded", "fail", "recover", "resyncing"];

pub fn raid_state(state: &str) -> Classification {
    let norm = state.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase();
    if RAID_DEGRADED_PATTERNS.iter().any(|p| norm.contains(p)) {
        Classification::new(Severity::Critical, "degraded")
    } else if RAID_HEALTHY.contains(&norm.as_str()) {
        Classification::new(Severity::Ok, "healthy")
    } else {
        Classification::new(Severity::Advisory, "unusual state")
    }
}

pub fn raid_failed_devices(count: u64) -> Classification {
    if count > 0 {
        Classification::new(Severity::Critical, "member failed")
    } else {
        Classification::new(Severity::Ok, "none")
    }
}

/// Informational only; a slow disk is never a critical issue.
pub fn throughput(mb_per_sec: f64, floor_mb_per_sec: f64) -> Classification {
    if mb_per_sec < floor_mb_per_sec {
        Classification::new(Severity::Advisory, "below expected")
    } else {
        Classification::new(Severity::Ok, "good")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn temperature_boundaries() {
        assert_eq!(temperature(40).severity, Severity::Ok);
        assert_eq!(temperature(41).severity, Severity::Advisory);
        assert_eq!(temperature(50).label, "warm");
        assert_eq!(temperature(51).label, "elevated");
        assert_eq!(temperature(60).severity, Severity::Advisory);
        assert_eq!(temperature(61).severity, Severity::Critical);
        assert_eq!(temperature(-3).severity, Severity::Ok);
    }

    #[test]
    fn wear_boundaries() {
        assert_eq!(wear(19).severity, Severity::Ok);
        assert_eq!(wear(20).label, "moderate wear");
        assert_eq!(wear(50).label, "high wear");
        assert_eq!(wear(79).severity, Severity::Advisory);
        assert_eq!(wear(80).severity, Severity::Critical);
        assert_eq!(wear(100).severity, Severity::Critical);
    }

    #[test]
    fn sector_counts() {
        assert_eq!(reallocated_sectors(0).severity, Severity::Ok);
        assert_eq!(reallocated_sectors(5000).severity, Severity::Advisory);
        assert_eq!(pending_sectors(1).severity, Severity::Critical);
        assert_eq!(offline_uncorrectable(0).severity, Severity::Ok);
        assert_eq!(offline_uncorrectable(3).severity, Severity::Critical);
    }

    #[test]
    fn health_status() {
        assert_eq!(health(HealthStatus::Ok).map(|c| c.severity), Some(Severity::Ok));
        assert_eq!(health(HealthStatus::Warning).map(|c| c.severity), Some(Severity::Critical));
        assert_eq!(health(HealthStatus::Unknown), None);
    }

    #[test]
    fn raid_states() {
        for ok in ["clean", "active", "clean, checking", "Clean,  Checking"] {
            assert_eq!(raid_state(ok).severity, Severity::Ok, "{ok}");
        }
        for bad in ["degraded", "clean, degraded", "active, FAILED", "clean, degraded, recovering", "clean, resyncing"] {
            assert_eq!(raid_state(bad).severity, Severity::Critical, "{bad}");
        }
        for odd in ["inactive", "active, checking", "clean, reshaping"] {
            assert_eq!(raid_state(odd).severity, Severity::Advisory, "{odd}");
        }
    }

    #[test]
    fn severities_are_ordered() {
        assert!(Severity::Ok < Severity::Advisory);
        assert!(Severity::Advisory < Severity::Critical);
    }

    #[test]
    fn throughput_is_never_critical() {
        assert_eq!(throughput(12.0, 100.0).severity, Severity::Advisory);
        assert_eq!(throughput(150.0, 100.0).severity, Severity::Ok);
    }
}
