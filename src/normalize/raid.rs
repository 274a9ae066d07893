use crate::extract::{raid_member_rows, value, Field, Fields, RaidKey};
use crate::models::raid::{MdstatArray, RaidMember, RaidRecord};

/// State string synthesized from /proc/mdstat, in mdadm's vocabulary.
fn mdstat_state(array: &MdstatArray) -> String {
    let mut parts = vec![array.state.clone()];
    if array.degraded {
        parts.push("degraded".into());
    }
    match array.sync_action.as_deref() {
        Some("recovery") => parts.push("recovering".into()),
        Some("resync")   => parts.push("resyncing".into()),
        Some("check")    => parts.push("checking".into()),
        Some("reshape")  => parts.push("reshaping".into()),
        _ => {}
    }
    parts.join(", ")
}

/// Record built from /proc/mdstat alone (mdadm missing or unreadable).
pub fn raid_from_mdstat(array: &MdstatArray) -> RaidRecord {
    let counts = array.member_counts();
    let level = Some(array.level.clone()).filter(|l| l != "unknown");

    RaidRecord {
        path:             format!("/dev/{}", array.name),
        level:            level.into(),
        state:            Field::Known(mdstat_state(array)),
        array_size_bytes: Some(array.capacity_bytes).filter(|b| *b > 0).into(),
        raid_devices:     counts.map(|(n, _)| n).into(),
        total_devices:    Field::Known(array.members.len() as u64),
        active_devices:   counts.map(|(_, m)| m).into(),
        working_devices:  Field::Absent,
        failed_devices:   Field::Known(array.failed_members as u64),
        spare_devices:    Field::Absent,
        members:          Vec::new(),
        rebuild_pct:      array.rebuild_pct,
    }
}

/// Build a record from `mdadm --detail`, filling gaps from /proc/mdstat.
pub fn normalize_raid(detail: &str, array: &MdstatArray) -> RaidRecord {
    let fields = Fields::parse(detail);
    let base = raid_from_mdstat(array);
    let num = |key: RaidKey| fields.get(key).and_then(value::count);

    let members = if fields.is_restricted() {
        Vec::new()
    } else {
        raid_member_rows(detail)
            .into_iter()
            .map(|row| RaidMember { device: row.device, state: row.state })
            .collect()
    };

    RaidRecord {
        path:             base.path,
        level:            fields.get(RaidKey::Level).map(str::to_string).or_fallback(base.level.into_known()),
        state:            fields.get(RaidKey::State).map(str::to_string).or_fallback(base.state.into_known()),
        array_size_bytes: fields
            .get(RaidKey::ArraySize)
            .and_then(|v| value::size_bytes(v, 1024))
            .or_fallback(base.array_size_bytes.into_known()),
        raid_devices:     num(RaidKey::RaidDevices).or_fallback(base.raid_devices.into_known()),
        total_devices:    num(RaidKey::TotalDevices).or_fallback(base.total_devices.into_known()),
        active_devices:   num(RaidKey::ActiveDevices).or_fallback(base.active_devices.into_known()),
        working_devices:  num(RaidKey::WorkingDevices),
        failed_devices:   num(RaidKey::FailedDevices).or_fallback(base.failed_devices.into_known()),
        spare_devices:    num(RaidKey::SpareDevices),
        members,
        rebuild_pct:      array.rebuild_pct,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn md0(degraded: bool, sync: Option<&str>) -> MdstatArray {
        MdstatArray {
            name:           "md0".into(),
            state:          "active".into(),
            level:          "raid1".into(),
            members:        vec!["sdb1".into(), "sda1".into()],
            failed_members: if degraded { 1 } else { 0 },
            capacity_bytes: 976_630_464 * 1024,
            bitmap:         if degraded { "[2/1]".into() } else { "[2/2]".into() },
            degraded,
            sync_action:    sync.map(str::to_string),
            rebuild_pct:    sync.map(|_| 42.5),
        }
    }

    const DEGRADED: &str = r#"/dev/md0:
           Version : 1.2
     Creation Time : Tue Mar  5 10:12:01 2024
        Raid Level : raid1
        Array Size : 976630464 (931.39 GiB 1000.07 GB)
      Raid Devices : 2
     Total Devices : 2
             State : degraded
    Active Devices : 1
   Working Devices : 1
    Failed Devices : 1
     Spare Devices : 0

    Number   Major   Minor   RaidDevice State
       0       8        1        0      active sync   /dev/sda1
       -       0        0        1      removed

       1       8       17        -      faulty   /dev/sdb1
"#;

    #[test]
    fn detail_fields() {
        let rec = normalize_raid(DEGRADED, &md0(true, None));
        assert_eq!(rec.path, "/dev/md0");
        assert_eq!(rec.level, Field::Known("raid1".to_string()));
        assert_eq!(rec.state, Field::Known("degraded".to_string()));
        assert_eq!(rec.array_size_bytes, Field::Known(976_630_464 * 1024));
        assert_eq!(rec.raid_devices, Field::Known(2));
        assert_eq!(rec.active_devices, Field::Known(1));
        assert_eq!(rec.working_devices, Field::Known(1));
        assert_eq!(rec.failed_devices, Field::Known(1));
        assert_eq!(rec.spare_devices, Field::Known(0));
        assert_eq!(rec.members.len(), 3);
        assert_eq!(rec.members[2].device.as_deref(), Some("/dev/sdb1"));
        assert_eq!(rec.members[2].state, "faulty");
    }

    #[test]
    fn mdstat_only_state_vocabulary() {
        let rec = raid_from_mdstat(&md0(true, Some("recovery")));
        assert_eq!(rec.state, Field::Known("active, degraded, recovering".to_string()));
        assert_eq!(rec.raid_devices, Field::Known(2));
        assert_eq!(rec.active_devices, Field::Known(1));
        assert_eq!(rec.failed_devices, Field::Known(1));
        assert_eq!(rec.rebuild_pct, Some(42.5));

        let rec = raid_from_mdstat(&md0(false, None));
        assert_eq!(rec.state, Field::Known("active".to_string()));
    }

    #[test]
    fn restricted_detail_uses_mdstat() {
        let detail = "mdadm: cannot open /dev/md0: Permission denied\n";
        let rec = normalize_raid(detail, &md0(false, Some("check")));
        assert_eq!(rec.state, Field::Known("active, checking".to_string()));
        assert_eq!(rec.level, Field::Known("raid1".to_string()));
        assert_eq!(rec.working_devices, Field::Restricted);
        assert!(rec.members.is_empty());
    }
}
