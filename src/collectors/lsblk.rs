use super::tool;
use crate::models::disk::DiskKind;
use crate::normalize::DeviceHint;
use anyhow::{bail, Context, Result};
use serde_json::Value;
use std::time::Duration;

/// Metadata for one top-level disk device from lsblk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LsblkDisk {
    pub name:       String,
    pub size:       u64,
    pub model:      Option<String>,
    pub serial:     Option<String>,
    pub rotational: bool,
    pub transport:  Option<String>,
    /// Mount targets of the disk and every device stacked on it
    /// (partitions, LVM volumes, dm-crypt mappings).
    pub mounts:     Vec<String>,
}

impl LsblkDisk {
    pub fn path(&self) -> String {
        format!("/dev/{}", self.name)
    }

    /// None for virtual block devices (md, device-mapper, loop, zram),
    /// which have no SMART data of their own.
    pub fn kind(&self) -> Option<DiskKind> {
        let tran = self.transport.as_deref().unwrap_or("").to_lowercase();
        if tran == "nvme" || self.name.starts_with("nvme") {
            Some(DiskKind::Nvme)
        } else if ["md", "dm-", "loop", "zram"].iter().any(|p| self.name.starts_with(p)) {
            None
        } else if self.rotational {
            Some(DiskKind::Hdd)
        } else {
            Some(DiskKind::Ssd)
        }
    }

    pub fn hint(&self) -> Option<DeviceHint> {
        Some(DeviceHint {
            path:           self.path(),
            kind:           self.kind()?,
            model:          self.model.clone(),
            serial:         self.serial.clone(),
            capacity_bytes: (self.size > 0).then_some(self.size),
        })
    }

    /// Filesystem mountpoints, swap excluded.
    pub fn mountpoints(&self) -> impl Iterator<Item = &str> {
        self.mounts
            .iter()
            .map(String::as_str)
            .filter(|m| m.starts_with('/'))
    }
}

/// Run `lsblk --json --bytes` and return top-level disk devices with their partitions.
pub fn run_lsblk(timeout: Duration) -> Result<Vec<LsblkDisk>> {
    let out = tool::run(
        "lsblk",
        &[
            "--json",
            "--bytes",
            "-o",
            "NAME,TYPE,SIZE,MOUNTPOINT,MODEL,SERIAL,ROTA,TRAN",
        ],
        timeout,
    )?;
    if !out.success && out.stdout.trim().is_empty() {
        bail!("lsblk failed: {}", out.stderr.trim());
    }
    parse_lsblk(&out.stdout)
}

pub fn parse_lsblk(json: &str) -> Result<Vec<LsblkDisk>> {
    let v: Value = serde_json::from_str(json).context("lsblk produced invalid JSON")?;
    let devices = v["blockdevices"]
        .as_array()
        .cloned()
        .unwrap_or_default();

    let mut disks = Vec::new();
    for dev in &devices {
        let name     = dev["name"].as_str().unwrap_or("").to_string();
        let dev_type = dev["type"].as_str().unwrap_or("");
        if name.is_empty() { continue; }
        if dev_type != "disk" { continue; }

        let mut mounts = Vec::new();
        collect_mounts(dev, &mut mounts);
        disks.push(LsblkDisk {
            name,
            size:       num(&dev["size"]),
            model:      str_opt(&dev["model"]),
            serial:     str_opt(&dev["serial"]),
            rotational: flag(&dev["rota"]),
            transport:  str_opt(&dev["tran"]),
            mounts,
        });
    }
    disks.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(disks)
}

/// Depth-first over `children`, which nest once per stacking layer.
fn collect_mounts(dev: &Value, out: &mut Vec<String>) {
    if let Some(m) = str_opt(&dev["mountpoint"]) {
        out.push(m);
    }
    if let Some(children) = dev["children"].as_array() {
        for child in children {
            collect_mounts(child, out);
        }
    }
}

fn str_opt(v: &Value) -> Option<String> {
    v.as_str()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

// Older util-linux prints numbers and booleans as strings.
fn num(v: &Value) -> u64 {
    v.as_u64()
        .or_else(|| v.as_str().and_then(|s| s.trim().parse().ok()))
        .unwrap_or(0)
}

fn flag(v: &Value) -> bool {
    v.as_bool()
        .or_else(|| v.as_str().map(|s| s.trim() == "1"))
        .or_else(|| v.as_u64().map(|n| n != 0))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    const LSBLK: &str = r#"{
   "blockdevices": [
      {"name":"sdb", "type":"disk", "size":4000787030016, "fstype":null, "mountpoint":null, "model":"WDC WD40EFRX-68N32N0", "serial":"WD-WCC7K1234567", "rota":true, "tran":"sata"},
      {"name":"nvme0n1", "type":"disk", "size":1000204886016, "fstype":null, "mountpoint":null, "model":"Samsung SSD 970 EVO Plus 1TB", "serial":"S4EWNX0R123456", "rota":false, "tran":"nvme",
         "children": [
            {"name":"nvme0n1p1", "type":"part", "size":536870912, "fstype":"vfat", "mountpoint":"/boot/efi"},
            {"name":"nvme0n1p2", "type":"part", "size":999666221056, "fstype":"ext4", "mountpoint":"/"},
            {"name":"nvme0n1p3", "type":"part", "size":1024, "fstype":"swap", "mountpoint":"[SWAP]"}
         ]
      },
      {"name":"sr0", "type":"rom", "size":1073741312, "fstype":null, "mountpoint":null, "model":"DVD-RAM", "serial":null, "rota":true, "tran":"sata"},
      {"name":"md0", "type":"raid1", "size":1000070512640, "fstype":"ext4", "mountpoint":"/srv", "model":null, "serial":null, "rota":false, "tran":null}
   ]
}"#;

    #[test]
    fn keeps_disks_sorted_by_name() {
        let disks = parse_lsblk(LSBLK).unwrap();
        let names: Vec<_> = disks.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["nvme0n1", "sdb"]);
    }

    #[test]
    fn infers_kinds_and_hints() {
        let disks = parse_lsblk(LSBLK).unwrap();
        assert_eq!(disks[0].kind(), Some(DiskKind::Nvme));
        assert_eq!(disks[1].kind(), Some(DiskKind::Hdd));

        let hint = disks[1].hint().unwrap();
        assert_eq!(hint.path, "/dev/sdb");
        assert_eq!(hint.capacity_bytes, Some(4_000_787_030_016));
        assert_eq!(hint.model.as_deref(), Some("WDC WD40EFRX-68N32N0"));
    }

    #[test]
    fn mountpoints_skip_swap() {
        let disks = parse_lsblk(LSBLK).unwrap();
        let mounts: Vec<_> = disks[0].mountpoints().collect();
        assert_eq!(mounts, vec!["/boot/efi", "/"]);
        assert_eq!(disks[1].mountpoints().count(), 0);
    }

    #[test]
    fn mountpoints_reach_through_lvm_and_crypt() {
        let json = r#"{"blockdevices": [
            {"name":"sda", "type":"disk", "size":500107862016, "mountpoint":null, "rota":false, "tran":"sata",
             "children": [
                {"name":"sda1", "type":"part", "size":1073741824, "mountpoint":"/boot"},
                {"name":"sda2", "type":"part", "size":499033849856, "mountpoint":null,
                 "children": [
                    {"name":"luks-root", "type":"crypt", "size":499017072640, "mountpoint":null,
                     "children": [
                        {"name":"vg0-root", "type":"lvm", "size":107374182400, "mountpoint":"/"},
                        {"name":"vg0-home", "type":"lvm", "size":391642890240, "mountpoint":"/home"},
                        {"name":"vg0-swap", "type":"lvm", "size":8589934592, "mountpoint":"[SWAP]"}
                     ]}
                 ]}
             ]}
        ]}"#;
        let disks = parse_lsblk(json).unwrap();
        let mounts: Vec<_> = disks[0].mountpoints().collect();
        assert_eq!(mounts, vec!["/boot", "/", "/home"]);
    }

    #[test]
    fn old_lsblk_string_values() {
        let json = r#"{"blockdevices": [{"name":"sda", "type":"disk", "size":"500107862016", "rota":"0", "tran":"sata", "model":"  Crucial MX500  "}]}"#;
        let disks = parse_lsblk(json).unwrap();
        assert_eq!(disks[0].size, 500_107_862_016);
        assert_eq!(disks[0].kind(), Some(DiskKind::Ssd));
        assert_eq!(disks[0].model.as_deref(), Some("Crucial MX500"));
    }

    #[test]
    fn virtual_devices_have_no_hint() {
        let json = r#"{"blockdevices": [{"name":"dm-0", "type":"disk", "size":1024, "rota":false}]}"#;
        let disks = parse_lsblk(json).unwrap();
        assert!(disks[0].hint().is_none());
    }

    #[test]
    fn garbage_is_an_error() {
        assert!(parse_lsblk("lsblk: unknown column").is_err());
    }
}
