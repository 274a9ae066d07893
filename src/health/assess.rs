use super::classify::{self, Classification};
use super::issues::{CriticalIssue, IssueAggregator, IssueCategory};
use crate::extract::Field;
use crate::models::disk::DiskRecord;
use crate::models::raid::RaidRecord;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Health,
    Temperature,
    Wear,
    ReallocatedSectors,
    PendingSectors,
    OfflineUncorrectable,
    RaidState,
    FailedDevices,
}

impl Metric {
    pub fn label(&self) -> &'static str {
        match self {
            Metric::Health               => "Health",
            Metric::Temperature          => "Temp",
            Metric::Wear                 => "Wear",
            Metric::ReallocatedSectors   => "Reallocated",
            Metric::PendingSectors       => "Pending",
            Metric::OfflineUncorrectable => "Offline unc.",
            Metric::RaidState            => "State",
            Metric::FailedDevices        => "Failed",
        }
    }
}

/// One classified metric, kept for display alongside the record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reading {
    pub metric: Metric,
    pub value:  String,
    #[serde(flatten)]
    pub class:  Classification,
}

/// Collects readings for one device and forwards critical ones to the
/// aggregator in the order they are classified.
struct Assessor<'a> {
    device:   &'a str,
    agg:      &'a mut IssueAggregator,
    readings: Vec<Reading>,
}

impl<'a> Assessor<'a> {
    fn new(device: &'a str, agg: &'a mut IssueAggregator) -> Self {
        Self { device, agg, readings: Vec::new() }
    }

    /// Store the reading; true when it is critical.
    fn read(&mut self, metric: Metric, value: String, class: Classification) -> bool {
        let critical = class.is_critical();
        self.readings.push(Reading { metric, value, class });
        critical
    }

    fn flag(&mut self, category: IssueCategory, message: String) {
        self.agg.record(CriticalIssue::new(self.device, category, message));
    }
}

/// Classify every reported disk metric. Absent and restricted metrics are
/// skipped, so a fallback record never produces issues.
pub fn assess_disk(disk: &DiskRecord, agg: &mut IssueAggregator) -> Vec<Reading> {
    let mut a = Assessor::new(&disk.path, agg);

    if let Some(class) = classify::health(disk.health) {
        if a.read(Metric::Health, disk.health.label().to_string(), class) {
            let detail = match disk.nvme().map(|n| n.critical_warning) {
                Some(Field::Known(cw)) => format!(" (critical warning 0x{cw:02X})"),
                _ => String::new(),
            };
            a.flag(IssueCategory::SmartHealth, format!("SMART health {}{detail}", disk.health.label()));
        }
    }

    if let Field::Known(t) = disk.temperature_c {
        if a.read(Metric::Temperature, format!("{t}°C"), classify::temperature(t)) {
            a.flag(
                IssueCategory::Temperature,
                format!("{t}°C exceeds {}°C", classify::TEMP_CRITICAL_C),
            );
        }
    }

    if let Field::Known(w) = disk.wear_used_pct {
        if a.read(Metric::Wear, format!("{w}%"), classify::wear(w)) {
            a.flag(IssueCategory::Wear, format!("{w}% of rated write endurance used"));
        }
    }

    if let Some(ata) = disk.ata() {
        if let Field::Known(n) = ata.reallocated_sectors {
            a.read(Metric::ReallocatedSectors, n.to_string(), classify::reallocated_sectors(n));
        }
        if let Field::Known(n) = ata.pending_sectors {
            if a.read(Metric::PendingSectors, n.to_string(), classify::pending_sectors(n)) {
                a.flag(IssueCategory::PendingSectors, format!("{n} sector(s) pending reallocation"));
            }
        }
        if let Field::Known(n) = ata.offline_uncorrectable {
            if a.read(Metric::OfflineUncorrectable, n.to_string(), classify::offline_uncorrectable(n)) {
                a.flag(IssueCategory::OfflineSectors, format!("{n} offline-uncorrectable sector(s)"));
            }
        }
    }

    a.readings
}

pub fn assess_raid(raid: &RaidRecord, agg: &mut IssueAggregator) -> Vec<Reading> {
    let mut a = Assessor::new(&raid.path, agg);

    if let Field::Known(state) = &raid.state {
        if a.read(Metric::RaidState, state.clone(), classify::raid_state(state)) {
            a.flag(IssueCategory::RaidDegraded, format!("array state is '{state}'"));
        }
    }

    if let Field::Known(n) = raid.failed_devices {
        if a.read(Metric::FailedDevices, n.to_string(), classify::raid_failed_devices(n)) {
            a.flag(IssueCategory::RaidFailedDevices, format!("{n} failed member device(s)"));
        }
    }

    a.readings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::health::classify::Severity;
    use crate::models::disk::{AtaCounters, DiskKind, DiskVariant, HealthStatus, NvmeLog, RecordSource};

    fn hdd() -> DiskRecord {
        DiskRecord {
            path:           "/dev/sda".into(),
            kind:           DiskKind::Hdd,
            source:         RecordSource::Smart,
            model:          Field::Known("WDC WD40EFRX".into()),
            serial:         Field::Absent,
            firmware:       Field::Absent,
            capacity_bytes: Field::Known(4_000_787_030_016),
            health:         HealthStatus::Ok,
            power_on_hours: Field::Known(43_800),
            power_cycles:   Field::Known(57),
            temperature_c:  Field::Known(31),
            wear_used_pct:  Field::Absent,
            bytes_written:  Field::Absent,
            variant:        DiskVariant::Ata(AtaCounters {
                reallocated_sectors:   Field::Known(8),
                pending_sectors:       Field::Known(0),
                offline_uncorrectable: Field::Known(2),
            }),
        }
    }

    fn raid(state: &str, failed: u64) -> RaidRecord {
        RaidRecord {
            path:             "/dev/md0".into(),
            level:            Field::Known("raid1".into()),
            state:            Field::Known(state.into()),
            array_size_bytes: Field::Absent,
            raid_devices:     Field::Known(2),
            total_devices:    Field::Known(2),
            active_devices:   Field::Known(2 - failed),
            working_devices:  Field::Known(2 - failed),
            failed_devices:   Field::Known(failed),
            spare_devices:    Field::Known(0),
            members:          Vec::new(),
            rebuild_pct:      None,
        }
    }

    #[test]
    fn hdd_offline_sectors_are_the_only_issue() {
        let mut agg = IssueAggregator::new();
        let readings = assess_disk(&hdd(), &mut agg);

        let issues = agg.snapshot();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].category(), IssueCategory::OfflineSectors);
        assert_eq!(issues[0].device(), "/dev/sda");

        let realloc = readings.iter().find(|r| r.metric == Metric::ReallocatedSectors).unwrap();
        assert_eq!(realloc.class.severity, Severity::Advisory);
        assert!(readings.iter().all(|r| r.metric != Metric::Wear));
    }

    #[test]
    fn nvme_with_warning_and_worn_out() {
        let mut rec = hdd();
        rec.path = "/dev/nvme0n1".into();
        rec.kind = DiskKind::Nvme;
        rec.health = HealthStatus::Warning;
        rec.temperature_c = Field::Known(44);
        rec.wear_used_pct = Field::Known(85);
        rec.variant = DiskVariant::Nvme(NvmeLog {
            critical_warning: Field::Known(1),
            media_errors:     Field::Known(0),
            available_spare:  Field::Known(9),
        });

        let mut agg = IssueAggregator::new();
        assess_disk(&rec, &mut agg);

        let cats: Vec<_> = agg.snapshot().iter().map(|i| i.category()).collect();
        assert_eq!(cats, vec![IssueCategory::SmartHealth, IssueCategory::Wear]);
        assert!(agg.snapshot()[0].message().contains("0x01"));
        assert_eq!(agg.exit_code(), 2);
    }

    #[test]
    fn restricted_fields_produce_nothing() {
        let mut rec = hdd();
        rec.health = HealthStatus::Unknown;
        rec.temperature_c = Field::Restricted;
        rec.variant = DiskVariant::Ata(AtaCounters {
            reallocated_sectors:   Field::Restricted,
            pending_sectors:       Field::Restricted,
            offline_uncorrectable: Field::Restricted,
        });

        let mut agg = IssueAggregator::new();
        let readings = assess_disk(&rec, &mut agg);
        assert!(readings.is_empty());
        assert!(!agg.has_critical());
    }

    #[test]
    fn hot_disk_is_critical() {
        let mut rec = hdd();
        rec.temperature_c = Field::Known(61);
        rec.variant = DiskVariant::Ata(AtaCounters::default());

        let mut agg = IssueAggregator::new();
        assess_disk(&rec, &mut agg);
        assert_eq!(agg.snapshot().len(), 1);
        assert_eq!(agg.snapshot()[0].category(), IssueCategory::Temperature);
    }

    #[test]
    fn degraded_array_records_two_issues() {
        let mut agg = IssueAggregator::new();
        let readings = assess_raid(&raid("clean, degraded", 1), &mut agg);

        assert_eq!(readings.len(), 2);
        let cats: Vec<_> = agg.snapshot().iter().map(|i| i.category()).collect();
        assert_eq!(cats, vec![IssueCategory::RaidDegraded, IssueCategory::RaidFailedDevices]);
    }

    #[test]
    fn failed_member_counts_even_when_state_is_clean() {
        let mut agg = IssueAggregator::new();
        let readings = assess_raid(&raid("clean", 1), &mut agg);

        let state = readings.iter().find(|r| r.metric == Metric::RaidState).unwrap();
        assert_eq!(state.class.severity, Severity::Ok);
        let cats: Vec<_> = agg.snapshot().iter().map(|i| i.category()).collect();
        assert_eq!(cats, vec![IssueCategory::RaidFailedDevices]);
        assert_eq!(agg.snapshot()[0].device(), "/dev/md0");
        assert_eq!(agg.exit_code(), 2);
    }

    #[test]
    fn clean_array_is_quiet() {
        let mut agg = IssueAggregator::new();
        assess_raid(&raid("clean", 0), &mut agg);
        assert!(!agg.has_critical());
    }

    #[test]
    fn issue_indices_span_devices() {
        let mut agg = IssueAggregator::new();
        assess_disk(&hdd(), &mut agg);
        assess_raid(&raid("active, degraded", 1), &mut agg);
        let idx: Vec<_> = agg.snapshot().iter().map(|i| i.index()).collect();
        assert_eq!(idx, vec![0, 1, 2]);
    }
}
