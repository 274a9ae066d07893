use crate::extract::Field;
use crate::health::{NoticeKind, Reading, Severity};
use crate::models::disk::{DiskRecord, RecordSource};
use crate::models::memory::MemoryRecord;
use crate::pipeline::{DiskReport, RaidReport, Snapshot};
use crate::util::human::{fmt_bytes, fmt_hours, fmt_mb_s};
use crossterm::style::Stylize;
use std::fmt::Display;

const RULE: &str = "═══════════════════════════════════════════════";

/// Applies severity colors, or nothing when output is not a terminal.
#[derive(Debug, Clone, Copy)]
pub struct Painter {
    color: bool,
}

impl Painter {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    fn sev(&self, sev: Severity, text: &str) -> String {
        if !self.color {
            return text.to_string();
        }
        match sev {
            Severity::Ok       => text.green().to_string(),
            Severity::Advisory => text.yellow().to_string(),
            Severity::Critical => text.red().bold().to_string(),
        }
    }

    fn dim(&self, text: &str) -> String {
        if self.color { text.dark_grey().to_string() } else { text.to_string() }
    }

    fn bold(&self, text: &str) -> String {
        if self.color { text.bold().to_string() } else { text.to_string() }
    }
}

fn show<T: Display>(f: &Field<T>) -> String {
    match f {
        Field::Known(v)   => v.to_string(),
        Field::Absent     => "—".to_string(),
        Field::Restricted => "n/a (root)".to_string(),
    }
}

fn show_with<T>(f: &Field<T>, fmt: impl Fn(&T) -> String) -> String {
    match f {
        Field::Known(v) => fmt(v),
        other => show(&other.as_ref().map(|_| "")),
    }
}

fn section(out: &mut String, p: &Painter, title: &str) {
    let head = format!("── {} ", title);
    let pad = 47usize.saturating_sub(head.chars().count());
    out.push_str(&p.bold(&format!("{}{}", head, "─".repeat(pad))));
    out.push('\n');
}

fn readings_line(p: &Painter, readings: &[Reading]) -> String {
    readings
        .iter()
        .map(|r| {
            let tag = format!("[{}]", r.class.severity.label());
            format!("{}: {} {} {}", r.metric.label(), r.value, p.sev(r.class.severity, &tag), p.dim(&r.class.label))
        })
        .collect::<Vec<_>>()
        .join("   ")
}

/// Generate the human-readable hardware report.
pub fn generate(snap: &Snapshot, p: &Painter) -> String {
    let mut out = String::new();

    out.push_str(&format!("{}\n", RULE));
    out.push_str(&format!("  hwcheck Hardware Report, {}\n", snap.generated_at));
    out.push_str(&format!("{}\n\n", RULE));

    // ── Critical issues ────────────────────────────────────────────────
    section(&mut out, p, &format!("Critical Issues ({})", snap.issues.len()));
    if snap.issues.is_empty() {
        out.push_str(&format!("  {}\n", p.sev(Severity::Ok, "● No critical hardware issues")));
    } else {
        for issue in &snap.issues {
            let tag = p.sev(Severity::Critical, "[CRIT]");
            out.push_str(&format!(
                "  {} {:>2}. {:<14} {:<16} {}\n",
                tag,
                issue.index() + 1,
                issue.device(),
                issue.category().label(),
                issue.message(),
            ));
        }
    }
    out.push('\n');

    // ── CPU ────────────────────────────────────────────────────────────
    if let Some(cpu) = &snap.cpu {
        section(&mut out, p, "CPU");
        out.push_str(&format!("  Model: {}\n", show(&cpu.model)));
        out.push_str(&format!(
            "  Cores: {} physical / {} logical   Clock: {}\n\n",
            show(&cpu.physical_cores),
            show(&cpu.logical_cpus),
            show_with(&cpu.mhz, |m| format!("{:.0} MHz", m)),
        ));
    }

    render_memory(&mut out, p, &snap.memory);

    // ── Disks ──────────────────────────────────────────────────────────
    section(&mut out, p, &format!("Disks ({})", snap.disks.len()));
    if snap.disks.is_empty() {
        out.push_str("  (none found)\n");
    }
    for report in &snap.disks {
        render_disk(&mut out, p, report);
    }
    out.push('\n');

    // ── RAID ───────────────────────────────────────────────────────────
    if !snap.raids.is_empty() {
        section(&mut out, p, &format!("Software RAID ({})", snap.raids.len()));
        for report in &snap.raids {
            render_raid(&mut out, p, report);
        }
        out.push('\n');
    }

    // ── Benchmark ──────────────────────────────────────────────────────
    let benches: Vec<_> = snap.disks.iter().filter_map(|d| d.benchmark.as_ref().map(|b| (&d.disk, b))).collect();
    if !benches.is_empty() {
        section(&mut out, p, "Write Benchmark");
        for (disk, b) in benches {
            let tag = format!("[{}]", b.class.severity.label());
            out.push_str(&format!(
                "  {:<14} {:>12}  (floor {})  {} {}  on {}\n",
                disk.path,
                fmt_mb_s(b.mb_per_sec),
                fmt_mb_s(b.floor),
                p.sev(b.class.severity, &tag),
                b.class.label,
                b.mount.display(),
            ));
        }
        out.push('\n');
    }

    // ── Notices ────────────────────────────────────────────────────────
    if !snap.notices.is_empty() {
        section(&mut out, p, &format!("Notices ({})", snap.notices.len()));
        for n in &snap.notices {
            // Pad before coloring; escape codes count toward the width.
            let tag = format!("{:<9}", format!("[{}]", n.kind.label()));
            let tag = if n.kind == NoticeKind::Informational { p.dim(&tag) } else { p.sev(Severity::Advisory, &tag) };
            out.push_str(&format!("  {} {}: {}\n", tag, n.subject, n.message));
        }
        out.push('\n');
    }

    out.push_str(&format!("{}\n", RULE));
    let verdict = if snap.exit_code == 0 {
        p.sev(Severity::Ok, "no critical issues")
    } else {
        p.sev(Severity::Critical, "critical issues found")
    };
    out.push_str(&format!("  Exit status {}: {}\n", snap.exit_code, verdict));
    out
}

fn render_memory(out: &mut String, p: &Painter, mem: &MemoryRecord) {
    section(out, p, "Memory");
    let slots = match (mem.slots_populated, mem.slots_total) {
        (Some(used), Some(total)) => format!("{}/{}", used, total),
        (Some(used), None)        => used.to_string(),
        _                         => "—".to_string(),
    };
    out.push_str(&format!(
        "  Total: {}   Type: {}   Speed: {}   ECC: {}   Slots: {}\n",
        show_with(&mem.total_bytes, |b| fmt_bytes(*b)),
        show(&mem.module_type),
        show(&mem.speed),
        show(&mem.ecc),
        slots,
    ));
    for m in &mem.modules {
        out.push_str(&format!(
            "    {:<12} {:>9}  {:<6} {:<12} {:<14} {:<20} SN {}\n",
            m.slot,
            fmt_bytes(m.size_bytes),
            show(&m.module_type),
            show(&m.speed),
            show(&m.manufacturer),
            show(&m.part_number),
            show(&m.serial),
        ));
    }
    out.push('\n');
}

fn render_disk(out: &mut String, p: &Painter, report: &DiskReport) {
    let d: &DiskRecord = &report.disk;
    out.push_str(&format!(
        "  {:<14} {:<4}  {}  Cap: {}\n",
        p.bold(&d.path),
        d.kind.label(),
        show(&d.model),
        show_with(&d.capacity_bytes, |b| fmt_bytes(*b)),
    ));
    out.push_str(&format!("    Serial: {}   FW: {}\n", show(&d.serial), show(&d.firmware)));

    if let RecordSource::Fallback(_) = d.source {
        out.push_str(&format!("    {}\n", p.dim("SMART: unavailable, listing fields only")));
        return;
    }

    out.push_str(&format!(
        "    Power-on: {}   Cycles: {}   Written: {}\n",
        show_with(&d.power_on_hours, |h| fmt_hours(*h, d.power_on_years().unwrap_or_default())),
        show(&d.power_cycles),
        show_with(&d.bytes_written, |b| fmt_bytes(*b)),
    ));
    if let Some(n) = d.nvme() {
        out.push_str(&format!(
            "    Critical warning: {}   Spare: {}   Media errors: {}\n",
            show_with(&n.critical_warning, |cw| format!("0x{:02X}", cw)),
            show_with(&n.available_spare, |s| format!("{}%", s)),
            show(&n.media_errors),
        ));
    }
    if !report.readings.is_empty() {
        out.push_str(&format!("    {}\n", readings_line(p, &report.readings)));
    }
}

fn render_raid(out: &mut String, p: &Painter, report: &RaidReport) {
    let r = &report.array;
    let rebuild = r.rebuild_pct.map(|pct| format!("   Rebuild: {:.1}%", pct)).unwrap_or_default();
    out.push_str(&format!(
        "  {:<10} {:<8} Size: {}{}\n",
        p.bold(&r.path),
        show(&r.level),
        show_with(&r.array_size_bytes, |b| fmt_bytes(*b)),
        rebuild,
    ));
    out.push_str(&format!(
        "    Devices: {} raid, {} total, {} active, {} working, {} spare\n",
        show(&r.raid_devices),
        show(&r.total_devices),
        show(&r.active_devices),
        show(&r.working_devices),
        show(&r.spare_devices),
    ));
    if !report.readings.is_empty() {
        out.push_str(&format!("    {}\n", readings_line(p, &report.readings)));
    }
    for m in &r.members {
        out.push_str(&format!("      {:<12} {}\n", m.device.as_deref().unwrap_or("-"), m.state));
    }
}
