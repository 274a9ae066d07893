use super::tool;
use crate::error::ToolError;
use crate::models::raid::MdstatArray;
use std::fs;
use std::time::Duration;

const SYNC_ACTIONS: &[&str] = &["recovery", "resync", "check", "reshape"];

/// Parse /proc/mdstat. An unreadable file (no md driver) means no arrays.
pub fn read_mdstat() -> Vec<MdstatArray> {
    match fs::read_to_string("/proc/mdstat") {
        Ok(c)  => parse_mdstat(&c),
        Err(_) => Vec::new(),
    }
}

/// Run `mdadm --detail /dev/<name>`.
pub fn read_detail(name: &str, timeout: Duration) -> Result<String, ToolError> {
    let path = format!("/dev/{}", name);
    let out = tool::run("mdadm", &["--detail", &path], timeout)?;
    Ok(out.text())
}

pub fn parse_mdstat(content: &str) -> Vec<MdstatArray> {
    let mut arrays = Vec::new();
    let mut lines = content.lines().peekable();

    while let Some(line) = lines.next() {
        // Each array starts with "mdX : "
        if !line.starts_with("md") || !line.contains(" : ") { continue; }

        let Some((name, rest)) = line.split_once(" : ") else { continue };
        let name = name.trim().to_string();

        // e.g. "active raid1 sda1[0] sdb1[1](F)"
        let tokens: Vec<&str> = rest.split_whitespace().collect();
        let state = tokens.first().unwrap_or(&"unknown").to_string();

        let level = tokens.iter()
            .find(|t| t.starts_with("raid") || **t == "linear" || **t == "multipath")
            .map(|s| s.to_string())
            .unwrap_or_else(|| "unknown".to_string());

        let member_tokens: Vec<&&str> = tokens.iter().filter(|t| t.contains('[')).collect();
        let failed_members = member_tokens.iter().filter(|t| t.ends_with("(F)")).count();
        let members: Vec<String> = member_tokens.iter()
            .map(|t| {
                let end = t.find('[').unwrap_or(t.len());
                t[..end].to_string()
            })
            .collect();

        // Indented continuation lines up to the next blank line.
        let mut capacity_bytes = 0;
        let mut bitmap = String::new();
        let mut sync_action = None;
        let mut rebuild_pct = None;
        while let Some(next) = lines.peek() {
            if next.trim().is_empty() || !next.starts_with(char::is_whitespace) { break; }
            let detail = next.trim();

            if detail.contains(" blocks") {
                // Block counts are 1 KiB units.
                capacity_bytes = detail
                    .split_whitespace()
                    .next()
                    .and_then(|s| s.parse::<u64>().ok())
                    .map(|kib| kib * 1024)
                    .unwrap_or(0);
                bitmap = status_groups(detail);
            } else if let Some((action, pct)) = sync_progress(detail) {
                sync_action = Some(action);
                rebuild_pct = pct;
            }
            lines.next();
        }

        let degraded = bitmap.contains('_') || failed_members > 0;

        arrays.push(MdstatArray {
            name,
            state,
            level,
            members,
            failed_members,
            capacity_bytes,
            bitmap,
            degraded,
            sync_action,
            rebuild_pct,
        });
    }

    arrays
}

/// Trailing "[n/m] [UU_]" of a block-count line.
fn status_groups(detail: &str) -> String {
    let groups: Vec<&str> = detail
        .split_whitespace()
        .filter(|t| t.starts_with('[') && t.ends_with(']'))
        .collect();
    groups.join(" ")
}

/// "[=>...]  recovery = 12.6% (...)" or "resync=DELAYED".
fn sync_progress(detail: &str) -> Option<(String, Option<f64>)> {
    for action in SYNC_ACTIONS {
        let Some(pos) = detail.find(action) else { continue };
        let after = detail[pos + action.len()..].trim_start();
        if let Some(value) = after.strip_prefix('=') {
            let pct = value
                .trim()
                .split('%')
                .next()
                .and_then(|s| s.trim().parse::<f64>().ok());
            return Some((action.to_string(), pct));
        }
    }
    None
}
