use crate::extract::Field;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DiskKind {
    #[serde(rename = "HDD")]
    Hdd,
    #[serde(rename = "SSD")]
    Ssd,
    #[serde(rename = "NVMe")]
    Nvme,
}

impl DiskKind {
    pub fn label(&self) -> &'static str {
        match self {
            DiskKind::Hdd  => "HDD",
            DiskKind::Ssd  => "SSD",
            DiskKind::Nvme => "NVMe",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HealthStatus {
    Ok,
    Warning,
    Unknown,
}

impl HealthStatus {
    pub fn label(&self) -> &'static str {
        match self {
            HealthStatus::Ok      => "OK",
            HealthStatus::Warning => "WARNING",
            HealthStatus::Unknown => "UNKNOWN",
        }
    }
}

/// Why a record carries listing metadata instead of SMART data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackReason {
    ToolUnavailable,
    Restricted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordSource {
    Smart,
    Fallback(FallbackReason),
}

/// SATA/SAS sector-error counters.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct AtaCounters {
    pub reallocated_sectors:   Field<u64>,
    pub pending_sectors:       Field<u64>,
    pub offline_uncorrectable: Field<u64>,
}

/// NVMe health-log fields with no SATA counterpart.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct NvmeLog {
    /// Raw critical-warning byte, not decoded per bit.
    pub critical_warning: Field<u8>,
    pub media_errors:     Field<u64>,
    pub available_spare:  Field<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "protocol", rename_all = "snake_case")]
pub enum DiskVariant {
    Ata(AtaCounters),
    Nvme(NvmeLog),
}

/// One storage device after normalization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiskRecord {
    pub path:           String,
    pub kind:           DiskKind,
    pub source:         RecordSource,
    pub model:          Field<String>,
    pub serial:         Field<String>,
    pub firmware:       Field<String>,
    pub capacity_bytes: Field<u64>,
    pub health:         HealthStatus,
    pub power_on_hours: Field<u64>,
    pub power_cycles:   Field<u64>,
    pub temperature_c:  Field<i64>,
    /// Rated write endurance consumed, 0–100. Never set for HDDs.
    pub wear_used_pct:  Field<u8>,
    pub bytes_written:  Field<u64>,
    pub variant:        DiskVariant,
}

impl DiskRecord {
    /// Counters for SATA/SAS devices; `None` for NVMe.
    pub fn ata(&self) -> Option<&AtaCounters> {
        match &self.variant {
            DiskVariant::Ata(c) => Some(c),
            DiskVariant::Nvme(_) => None,
        }
    }

    pub fn nvme(&self) -> Option<&NvmeLog> {
        match &self.variant {
            DiskVariant::Nvme(n) => Some(n),
            DiskVariant::Ata(_) => None,
        }
    }

    /// Approximate age, using 24 × 365 hours per year.
    pub fn power_on_years(&self) -> Option<f64> {
        self.power_on_hours.known().map(|h| *h as f64 / (24.0 * 365.0))
    }
}
