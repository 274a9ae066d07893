use crate::extract::{value, Field, Fields, NvmeKey, SmartKey};
use crate::models::disk::{
    AtaCounters, DiskKind, DiskRecord, DiskVariant, FallbackReason, HealthStatus, NvmeLog,
    RecordSource,
};

/// NVMe data units are 1000 × 512 bytes.
const NVME_DATA_UNIT: u64 = 512 * 1000;
const LBA_SIZE: u64 = 512;

/// What block-device enumeration knows about a disk before SMART is read.
/// Supplies the kind hint and the fallback fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceHint {
    pub path:           String,
    pub kind:           DiskKind,
    pub model:          Option<String>,
    pub serial:         Option<String>,
    pub capacity_bytes: Option<u64>,
}

/// Build a disk record from a `smartctl -a` dump (or `nvme smart-log`).
pub fn normalize_disk(text: &str, hint: &DeviceHint) -> DiskRecord {
    let fields = Fields::parse(text);
    if fields.is_restricted() {
        return fallback_disk(hint, FallbackReason::Restricted);
    }
    match hint.kind {
        DiskKind::Nvme => nvme_record(&fields, hint),
        DiskKind::Hdd | DiskKind::Ssd => ata_record(&fields, hint),
    }
}

/// Record built from listing metadata alone; health is always `Unknown`.
pub fn fallback_disk(hint: &DeviceHint, reason: FallbackReason) -> DiskRecord {
    fn missing<T>(reason: FallbackReason) -> Field<T> {
        match reason {
            FallbackReason::Restricted      => Field::Restricted,
            FallbackReason::ToolUnavailable => Field::Absent,
        }
    }

    let variant = match hint.kind {
        DiskKind::Nvme => DiskVariant::Nvme(NvmeLog {
            critical_warning: missing(reason),
            media_errors:     missing(reason),
            available_spare:  missing(reason),
        }),
        DiskKind::Hdd | DiskKind::Ssd => DiskVariant::Ata(AtaCounters {
            reallocated_sectors:   missing(reason),
            pending_sectors:       missing(reason),
            offline_uncorrectable: missing(reason),
        }),
    };
    let wear = if hint.kind == DiskKind::Hdd { Field::Absent } else { missing(reason) };

    DiskRecord {
        path:           hint.path.clone(),
        kind:           hint.kind,
        source:         RecordSource::Fallback(reason),
        model:          missing(reason).or_fallback(hint.model.clone()),
        serial:         missing(reason).or_fallback(hint.serial.clone()),
        firmware:       missing(reason),
        capacity_bytes: missing(reason).or_fallback(hint.capacity_bytes),
        health:         HealthStatus::Unknown,
        power_on_hours: missing(reason),
        power_cycles:   missing(reason),
        temperature_c:  missing(reason),
        wear_used_pct:  wear,
        bytes_written:  missing(reason),
        variant,
    }
}

fn text(f: Field<&str>) -> Field<String> {
    f.map(|s| s.to_string())
}

fn count(f: Field<&str>) -> Field<u64> {
    f.and_then(value::count)
}

/// "PASSED" (ATA) and "OK" (SAS) are healthy; anything else reported is not.
fn overall_health(raw: Field<&str>) -> HealthStatus {
    match raw {
        Field::Known(v) => {
            let verdict = v.split_whitespace().next().unwrap_or("");
            if verdict.eq_ignore_ascii_case("PASSED") || verdict.eq_ignore_ascii_case("OK") {
                HealthStatus::Ok
            } else {
                HealthStatus::Warning
            }
        }
        Field::Absent | Field::Restricted => HealthStatus::Unknown,
    }
}

/// The rotation-rate line overrides the listing's rotational flag, which is
/// unreliable behind USB bridges and hypervisors.
fn refine_ata_kind(fields: &Fields, hinted: DiskKind) -> DiskKind {
    match fields.get(SmartKey::RotationRate) {
        Field::Known(r) if r.to_lowercase().contains("solid state") => DiskKind::Ssd,
        Field::Known(r) if r.to_lowercase().contains("rpm") => DiskKind::Hdd,
        _ => hinted,
    }
}

fn ata_record(fields: &Fields, hint: &DeviceHint) -> DiskRecord {
    let kind = refine_ata_kind(fields, hint.kind);

    let wear_used_pct = if kind == DiskKind::Hdd {
        Field::Absent
    } else {
        fields
            .get(SmartKey::WearUsed)
            .and_then(value::percent)
            .or_else(|| {
                fields
                    .get(SmartKey::LifeRemaining)
                    .and_then(value::count)
                    .map(|remaining| 100u8.saturating_sub(remaining.min(100) as u8))
            })
    };

    DiskRecord {
        path:           hint.path.clone(),
        kind,
        source:         RecordSource::Smart,
        model:          text(fields.get(SmartKey::Model)).or_fallback(hint.model.clone()),
        serial:         text(fields.get(SmartKey::Serial)).or_fallback(hint.serial.clone()),
        firmware:       text(fields.get(SmartKey::Firmware)),
        capacity_bytes: fields
            .get(SmartKey::Capacity)
            .and_then(|v| value::size_bytes(v, 1))
            .or_fallback(hint.capacity_bytes),
        health:         overall_health(fields.get(SmartKey::Health)),
        power_on_hours: count(fields.get(SmartKey::PowerOnHours)),
        power_cycles:   count(fields.get(SmartKey::PowerCycles)),
        temperature_c:  fields.get(SmartKey::Temperature).and_then(value::celsius),
        wear_used_pct,
        bytes_written:  count(fields.get(SmartKey::LbasWritten))
            .and_then(|lbas| lbas.checked_mul(LBA_SIZE)),
        variant:        DiskVariant::Ata(AtaCounters {
            reallocated_sectors:   count(fields.get(SmartKey::Reallocated)),
            pending_sectors:       count(fields.get(SmartKey::Pending)),
            offline_uncorrectable: count(fields.get(SmartKey::OfflineUncorrectable)),
        }),
    }
}

fn nvme_record(fields: &Fields, hint: &DeviceHint) -> DiskRecord {
    let critical_warning = fields
        .get(NvmeKey::CriticalWarning)
        .and_then(value::count)
        .map(|v| v.min(u8::MAX as u64) as u8);

    // The critical-warning byte outranks the overall-health line. Any set bit
    // is a warning; individual bits are not decoded.
    let health = match critical_warning {
        Field::Known(0) => HealthStatus::Ok,
        Field::Known(_) => HealthStatus::Warning,
        _ => overall_health(fields.get(NvmeKey::Health)),
    };

    DiskRecord {
        path:           hint.path.clone(),
        kind:           DiskKind::Nvme,
        source:         RecordSource::Smart,
        model:          text(fields.get(NvmeKey::Model)).or_fallback(hint.model.clone()),
        serial:         text(fields.get(NvmeKey::Serial)).or_fallback(hint.serial.clone()),
        firmware:       text(fields.get(NvmeKey::Firmware)),
        capacity_bytes: fields
            .get(NvmeKey::Capacity)
            .and_then(|v| value::size_bytes(v, 1))
            .or_fallback(hint.capacity_bytes),
        health,
        power_on_hours: count(fields.get(NvmeKey::PowerOnHours)),
        power_cycles:   count(fields.get(NvmeKey::PowerCycles)),
        temperature_c:  fields.get(NvmeKey::Temperature).and_then(value::celsius),
        wear_used_pct:  fields.get(NvmeKey::PercentageUsed).and_then(value::percent),
        bytes_written:  count(fields.get(NvmeKey::DataUnitsWritten))
            .and_then(|units| units.checked_mul(NVME_DATA_UNIT)),
        variant:        DiskVariant::Nvme(NvmeLog {
            critical_warning,
            media_errors:    count(fields.get(NvmeKey::MediaErrors)),
            available_spare: fields.get(NvmeKey::AvailableSpare).and_then(value::percent),
        }),
    }
}
