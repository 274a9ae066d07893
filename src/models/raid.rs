use crate::extract::Field;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RaidMember {
    pub device: Option<String>,
    pub state:  String,   // "active sync", "faulty", "removed", ...
}

/// One Linux software RAID array.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RaidRecord {
    pub path:             String,
    pub level:            Field<String>,   // "raid1", "raid5", ...
    pub state:            Field<String>,   // "clean", "clean, degraded", ...
    pub array_size_bytes: Field<u64>,
    pub raid_devices:     Field<u64>,
    pub total_devices:    Field<u64>,
    pub active_devices:   Field<u64>,
    pub working_devices:  Field<u64>,
    pub failed_devices:   Field<u64>,
    pub spare_devices:    Field<u64>,
    pub members:          Vec<RaidMember>,
    pub rebuild_pct:      Option<f64>,
}

/// One array line group from /proc/mdstat.
#[derive(Debug, Clone, PartialEq)]
pub struct MdstatArray {
    pub name:           String,
    pub state:          String,   // "active", "inactive"
    pub level:          String,   // "raid1", "linear", "unknown"
    pub members:        Vec<String>,
    pub failed_members: usize,    // members marked "(F)"
    pub capacity_bytes: u64,
    pub bitmap:         String,   // e.g. "[2/1] [U_]"
    pub degraded:       bool,
    pub sync_action:    Option<String>,   // "recovery", "resync", "check", "reshape"
    pub rebuild_pct:    Option<f64>,
}

impl MdstatArray {
    /// `[n/m]` → (n, m): configured and active member counts.
    pub fn member_counts(&self) -> Option<(u64, u64)> {
        let inner = self.bitmap.strip_prefix('[')?.split(']').next()?;
        let (n, m) = inner.split_once('/')?;
        Some((n.parse().ok()?, m.parse().ok()?))
    }
}
