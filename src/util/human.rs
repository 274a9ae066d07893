/// Format a raw byte count into a human-readable string: "12.5 GB"
pub fn fmt_bytes(bytes: u64) -> String {
    fmt_bytes_f(bytes as f64)
}

fn fmt_bytes_f(b: f64) -> String {
    const TB: f64 = 1_099_511_627_776.0;
    const GB: f64 = 1_073_741_824.0;
    const MB: f64 = 1_048_576.0;
    const KB: f64 = 1_024.0;
    if b >= TB      { format!("{:.1} TB", b / TB) }
    else if b >= GB { format!("{:.1} GB", b / GB) }
    else if b >= MB { format!("{:.1} MB", b / MB) }
    else if b >= KB { format!("{:.1} KB", b / KB) }
    else            { format!("{:.0} B",  b) }
}

/// "43800 h (5.0 y)"
pub fn fmt_hours(hours: u64, years: f64) -> String {
    format!("{} h ({:.1} y)", hours, years)
}

/// "196.4 MB/s"
pub fn fmt_mb_s(mb_per_sec: f64) -> String {
    format!("{:.1} MB/s", mb_per_sec)
}
