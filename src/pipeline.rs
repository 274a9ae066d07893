//! One pass over the machine: collect, normalize, classify, aggregate.

use crate::collectors::{bench, lsblk, mdraid, smart, system};
use crate::config::Config;
use crate::error::ToolError;
use crate::extract::is_restricted;
use crate::health::{
    assess_disk, assess_raid, classify, Classification, CriticalIssue, IssueAggregator, Notice,
    NoticeKind, Reading,
};
use crate::models::cpu::CpuRecord;
use crate::models::disk::{DiskRecord, FallbackReason, RecordSource};
use crate::models::memory::MemoryRecord;
use crate::models::raid::{MdstatArray, RaidRecord};
use crate::normalize::{
    fallback_disk, normalize_cpu, normalize_disk, normalize_memory, normalize_raid,
    raid_from_mdstat, DeviceHint,
};
use crate::util::interrupt;
use serde::Serialize;
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Which optional stages run.
#[derive(Debug, Clone, Copy)]
pub struct RunOptions {
    pub smart:         bool,
    pub raid:          bool,
    pub benchmark:     bool,
    pub memory_detail: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct BenchReport {
    pub mount:      PathBuf,
    pub mb_per_sec: f64,
    pub floor:      f64,
    pub class:      Classification,
}

#[derive(Debug, Clone, Serialize)]
pub struct DiskReport {
    pub disk:      DiskRecord,
    pub readings:  Vec<Reading>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub benchmark: Option<BenchReport>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RaidReport {
    pub array:    RaidRecord,
    pub readings: Vec<Reading>,
}

/// Everything the renderer needs, in display order.
#[derive(Debug, Serialize)]
pub struct Snapshot {
    pub generated_at: String,
    pub cpu:          Option<CpuRecord>,
    pub memory:       MemoryRecord,
    pub disks:        Vec<DiskReport>,
    pub raids:        Vec<RaidReport>,
    pub issues:       Vec<CriticalIssue>,
    pub notices:      Vec<Notice>,
    pub exit_code:    i32,
    /// Set when Ctrl-C cut the run short.
    #[serde(skip)]
    pub interrupted:  bool,
}

fn tool_notice(err: &ToolError, lost: &str) -> Notice {
    let kind = match err {
        ToolError::PermissionDenied(_) => NoticeKind::PermissionDenied,
        _ => NoticeKind::ToolUnavailable,
    };
    Notice::new(kind, err.tool(), format!("{}; {}", err, lost))
}

/// Normalize and assess one disk from the outcome of its SMART read.
pub fn process_disk(
    dump: Result<String, ToolError>,
    hint: &DeviceHint,
    agg: &mut IssueAggregator,
) -> DiskReport {
    let disk = match dump {
        Ok(text) => {
            let disk = normalize_disk(&text, hint);
            if disk.source == RecordSource::Fallback(FallbackReason::Restricted) {
                agg.note(Notice::new(
                    NoticeKind::PermissionDenied,
                    disk.path.as_str(),
                    "SMART data needs root; showing device listing only",
                ));
            }
            disk
        }
        Err(e) => {
            warn!(device = %hint.path, error = %e, "no SMART data");
            agg.note(tool_notice(&e, "SMART data unavailable"));
            let reason = match e {
                ToolError::PermissionDenied(_) => FallbackReason::Restricted,
                _ => FallbackReason::ToolUnavailable,
            };
            fallback_disk(hint, reason)
        }
    };

    let readings = assess_disk(&disk, agg);
    DiskReport { disk, readings, benchmark: None }
}

/// Normalize and assess one array; `detail` is the `mdadm --detail` outcome.
pub fn process_raid(
    array: &MdstatArray,
    detail: Result<String, ToolError>,
    agg: &mut IssueAggregator,
) -> RaidReport {
    let record = match detail {
        Ok(text) => {
            if is_restricted(&text) {
                agg.note(Notice::new(
                    NoticeKind::PermissionDenied,
                    format!("/dev/{}", array.name),
                    "mdadm needs root; state taken from /proc/mdstat",
                ));
            }
            normalize_raid(&text, array)
        }
        Err(e) => {
            agg.note(tool_notice(&e, "RAID state taken from /proc/mdstat"));
            raid_from_mdstat(array)
        }
    };
    let readings = assess_raid(&record, agg);
    RaidReport { array: record, readings }
}

/// Normalize memory from the DMI table (if readable) and /proc/meminfo.
pub fn process_memory(
    dmi: Result<String, ToolError>,
    meminfo: Option<&str>,
    detail: bool,
    agg: &mut IssueAggregator,
) -> MemoryRecord {
    let dmi = match dmi {
        Ok(text) => {
            if is_restricted(&text) {
                agg.note(Notice::new(
                    NoticeKind::PermissionDenied,
                    "dmidecode",
                    "memory module details need root",
                ));
            }
            Some(text)
        }
        Err(e) => {
            agg.note(tool_notice(&e, "memory module details unavailable"));
            None
        }
    };
    if dmi.is_none() && meminfo.is_none() {
        agg.note(Notice::new(NoticeKind::ToolUnavailable, "/proc/meminfo", "memory size unknown"));
    }
    normalize_memory(dmi.as_deref(), meminfo, detail)
}

fn benchmark_disk(report: &mut DiskReport, disk: &lsblk::LsblkDisk, cfg: &Config, agg: &mut IssueAggregator) {
    let size = cfg.benchmark.size_mib;
    let dir = match bench::find_target(disk.mountpoints(), size) {
        Ok(dir) => dir,
        Err(e) => {
            agg.note(Notice::new(NoticeKind::DeviceUnreachable, report.disk.path.as_str(), format!("benchmark skipped: {}", e)));
            return;
        }
    };

    info!(device = %report.disk.path, dir = %dir.display(), size_mib = size, "benchmarking");
    match bench::write_throughput(&dir, size, interrupt::flag()) {
        Ok(t) => {
            let floor = cfg.benchmark.floor(report.disk.kind);
            let mb_per_sec = t.mb_per_sec();
            report.benchmark = Some(BenchReport {
                mount: dir,
                mb_per_sec,
                floor,
                class: classify::throughput(mb_per_sec, floor),
            });
        }
        Err(e) => {
            agg.note(Notice::new(
                NoticeKind::Informational,
                report.disk.path.as_str(),
                format!("benchmark failed: {:#}", e),
            ));
        }
    }
}

fn collect_disks(cfg: &Config, opts: &RunOptions, agg: &mut IssueAggregator) -> Vec<DiskReport> {
    let timeout = cfg.general.tool_timeout();
    let listing = match lsblk::run_lsblk(timeout) {
        Ok(l) => l,
        Err(e) => {
            warn!(error = %e, "lsblk failed");
            agg.note(Notice::new(NoticeKind::ToolUnavailable, "lsblk", format!("{:#}; disks skipped", e)));
            return Vec::new();
        }
    };

    let mut reports = Vec::new();
    for disk in listing.iter().filter(|d| !cfg.devices.is_excluded(&d.name)) {
        if interrupt::requested() { break; }
        let Some(hint) = disk.hint() else {
            debug!(name = %disk.name, "virtual device, skipped");
            continue;
        };

        let mut report = if opts.smart {
            process_disk(smart::read_smart(&hint.path, timeout), &hint, agg)
        } else {
            let record = fallback_disk(&hint, FallbackReason::ToolUnavailable);
            DiskReport { disk: record, readings: Vec::new(), benchmark: None }
        };

        if opts.benchmark && !interrupt::requested() {
            benchmark_disk(&mut report, disk, cfg, agg);
        }
        reports.push(report);
    }
    reports
}

fn collect_raids(timeout: std::time::Duration, agg: &mut IssueAggregator) -> Vec<RaidReport> {
    let mut arrays = mdraid::read_mdstat();
    arrays.sort_by(|a, b| a.name.cmp(&b.name));

    let mut reports = Vec::new();
    for array in &arrays {
        if interrupt::requested() { break; }
        reports.push(process_raid(array, mdraid::read_detail(&array.name, timeout), agg));
    }
    reports
}

/// Run every enabled stage in order: CPU, memory, disks, RAID.
pub fn collect(cfg: &Config, opts: &RunOptions) -> Snapshot {
    let timeout = cfg.general.tool_timeout();
    let mut agg = IssueAggregator::new();

    if !system::is_root() {
        agg.note(Notice::new(
            NoticeKind::Informational,
            "hwcheck",
            "not running as root; SMART, DMI and mdadm data may be incomplete",
        ));
    }

    let cpu = system::read_cpuinfo().map(|text| normalize_cpu(&text));
    let meminfo = system::read_meminfo();
    let memory = process_memory(system::read_dmi_memory(timeout), meminfo.as_deref(), opts.memory_detail, &mut agg);

    let disks = collect_disks(cfg, opts, &mut agg);
    let raids = if opts.raid && !interrupt::requested() {
        collect_raids(timeout, &mut agg)
    } else {
        Vec::new()
    };

    info!(disks = disks.len(), arrays = raids.len(), issues = agg.snapshot().len(), "collection finished");
    Snapshot {
        generated_at: chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        cpu,
        memory,
        disks,
        raids,
        issues:       agg.snapshot().to_vec(),
        notices:      agg.notices().to_vec(),
        exit_code:    agg.exit_code(),
        interrupted:  interrupt::requested(),
    }
}
