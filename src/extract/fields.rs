use super::field::Field;
use super::keys::{AttrColumn, FieldKey};

/// Text that means the tool ran but was not allowed to read the device.
const RESTRICTED_MARKERS: &[&str] = &[
    "permission denied",
    "operation not permitted",
    "requires root",
    "must be root",
];

pub fn is_restricted(text: &str) -> bool {
    let lower = text.to_lowercase();
    RESTRICTED_MARKERS.iter().any(|m| lower.contains(m))
}

/// Lower-case and collapse whitespace so "Device  Model" matches "device model".
fn normalize_label(label: &str) -> String {
    label
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// One row of smartctl's ATA attribute table.
#[derive(Debug, Clone, PartialEq)]
pub struct AtaAttribute {
    pub id:         u16,
    pub name:       String,
    pub normalized: String,
    pub raw:        String,
}

/// Parse the `ID# ATTRIBUTE_NAME ... RAW_VALUE` table, if present.
pub fn ata_attributes(text: &str) -> Vec<AtaAttribute> {
    let mut out = Vec::new();
    let mut in_table = false;

    for line in text.lines() {
        if line.contains("ID#") && line.contains("ATTRIBUTE_NAME") {
            in_table = true;
            continue;
        }
        if !in_table { continue; }
        if line.trim().is_empty() { break; }

        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() < 10 { continue; }
        let Ok(id) = tokens[0].parse::<u16>() else { continue };

        out.push(AtaAttribute {
            id,
            name:       tokens[1].to_string(),
            normalized: tokens[3].to_string(),
            raw:        tokens[9..].join(" "),
        });
    }
    out
}

/// Member row from the device table at the end of `mdadm --detail`.
#[derive(Debug, Clone, PartialEq)]
pub struct MemberRow {
    pub device: Option<String>,
    pub state:  String,
}

/// Parse the `Number Major Minor RaidDevice State` table.
pub fn raid_member_rows(text: &str) -> Vec<MemberRow> {
    let mut out = Vec::new();
    let mut in_table = false;

    for line in text.lines() {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.first() == Some(&"Number") && tokens.contains(&"RaidDevice") {
            in_table = true;
            continue;
        }
        if !in_table || tokens.len() < 5 { continue; }
        let first = tokens[0];
        if first != "-" && first.parse::<u32>().is_err() { continue; }

        let rest = &tokens[4..];
        let (device, state) = match rest.last() {
            Some(last) if last.starts_with("/dev/") => {
                (Some(last.to_string()), rest[..rest.len() - 1].join(" "))
            }
            _ => (None, rest.join(" ")),
        };
        out.push(MemberRow { device, state });
    }
    out
}

/// `label: value` pairs plus the ATA attribute table of one text blob.
///
/// Lookups never fail: a missing or empty value is `Absent`, and every
/// lookup on a blob that reports a privilege failure is `Restricted`.
#[derive(Debug, Clone, Default)]
pub struct Fields {
    pairs:      Vec<(String, String)>,
    attributes: Vec<AtaAttribute>,
    restricted: bool,
}

impl Fields {
    pub fn parse(text: &str) -> Self {
        let mut fields = Self::from_lines(text.lines());
        fields.attributes = ata_attributes(text);
        fields.restricted = is_restricted(text);
        fields
    }

    fn from_lines<'a>(lines: impl Iterator<Item = &'a str>) -> Self {
        let pairs = lines
            .filter_map(|line| {
                let (label, value) = line.split_once(':')?;
                let value = value.trim();
                if value.is_empty() { return None; }
                Some((normalize_label(label), value.to_string()))
            })
            .collect();
        Self { pairs, attributes: Vec::new(), restricted: false }
    }

    pub fn is_restricted(&self) -> bool {
        self.restricted
    }

    /// Value of the first line, in document order, carrying one of the key's
    /// labels (labels tried in the order the key lists them), then the key's
    /// ATA attributes.
    pub fn get<K: FieldKey>(&self, key: K) -> Field<&str> {
        if self.restricted {
            return Field::Restricted;
        }

        for label in key.labels() {
            let label = normalize_label(label);
            if let Some((_, v)) = self.pairs.iter().find(|(l, _)| *l == label) {
                return Field::Known(v.as_str());
            }
        }

        for name in key.attributes() {
            if let Some(attr) = self.attributes.iter().find(|a| a.name.eq_ignore_ascii_case(name)) {
                return Field::Known(match key.column() {
                    AttrColumn::Raw        => attr.raw.as_str(),
                    AttrColumn::Normalized => attr.normalized.as_str(),
                });
            }
        }
        Field::Absent
    }

    /// How many lines carry the key.
    pub fn count<K: FieldKey>(&self, key: K) -> usize {
        let labels: Vec<String> = key.labels().iter().map(|l| normalize_label(l)).collect();
        self.pairs.iter().filter(|(l, _)| labels.contains(l)).count()
    }

    /// How many distinct values the key takes.
    pub fn distinct<K: FieldKey>(&self, key: K) -> usize {
        let labels: Vec<String> = key.labels().iter().map(|l| normalize_label(l)).collect();
        let mut seen: Vec<&str> = Vec::new();
        for (l, v) in &self.pairs {
            if labels.contains(l) && !seen.contains(&v.as_str()) {
                seen.push(v);
            }
        }
        seen.len()
    }
}

/// Split dmidecode-style output into one `Fields` per block whose header
/// line equals `header`.
///
/// A block ends at the next header, at the next `Handle ` line, or at the
/// end of input. Lines outside any block are ignored.
pub fn blocks(text: &str, header: &str) -> Vec<Fields> {
    let mut out = Vec::new();
    let mut current: Option<Vec<&str>> = None;

    for line in text.lines() {
        let trimmed = line.trim();
        if trimmed == header {
            if let Some(lines) = current.take() {
                out.push(Fields::from_lines(lines.into_iter()));
            }
            current = Some(Vec::new());
            continue;
        }
        if trimmed.starts_with("Handle ") {
            if let Some(lines) = current.take() {
                out.push(Fields::from_lines(lines.into_iter()));
            }
            continue;
        }
        if let Some(lines) = current.as_mut() {
            lines.push(line);
        }
    }
    if let Some(lines) = current.take() {
        out.push(Fields::from_lines(lines.into_iter()));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::keys::{DmiKey, NvmeKey, RaidKey, SmartKey};

    const SATA: &str = r#"smartctl 7.3 2022-02-28 r5338 [x86_64-linux-6.1.0] (local build)

=== START OF INFORMATION SECTION ===
Model Family:     Samsung based SSDs
Device Model:     Samsung SSD 860 EVO 500GB
Serial Number:    S3Z1NB0K123456A
Firmware Version: RVT04B6Q
User Capacity:    500,107,862,016 bytes [500 GB]
Rotation Rate:    Solid State Device

=== START OF READ SMART DATA SECTION ===
SMART overall-health self-assessment test result: PASSED

ID# ATTRIBUTE_NAME          FLAG     VALUE WORST THRESH TYPE      UPDATED  WHEN_FAILED RAW_VALUE
  5 Reallocated_Sector_Ct   0x0033   100   100   010    Pre-fail  Always       -       0
  9 Power_On_Hours          0x0032   095   095   000    Old_age   Always       -       21,043
 12 Power_Cycle_Count       0x0032   099   099   000    Old_age   Always       -       412
177 Wear_Leveling_Count     0x0013   093   093   000    Pre-fail  Always       -       71
190 Airflow_Temperature_Cel 0x0032   069   052   000    Old_age   Always       -       31
194 Temperature_Celsius     0x0022   069   052   000    Old_age   Always       -       31 (Min/Max 18/48)
241 Total_LBAs_Written      0x0032   099   099   000    Old_age   Always       -       40514388910

SMART Error Log Version: 1
"#;

    #[test]
    fn label_lookup_tolerates_spacing_and_case() {
        let f = Fields::parse("device   model :   ACME 1TB\nserial number:X1\n");
        assert_eq!(f.get(SmartKey::Model), Field::Known("ACME 1TB"));
        assert_eq!(f.get(SmartKey::Serial), Field::Known("X1"));
        assert_eq!(f.get(SmartKey::Firmware), Field::Absent);
    }

    #[test]
    fn synonyms_resolve_to_one_key() {
        let sas = Fields::parse("Product:              ST4000NM0023\nSMART Health Status: OK\n");
        assert_eq!(sas.get(SmartKey::Model), Field::Known("ST4000NM0023"));
        assert_eq!(sas.get(SmartKey::Health), Field::Known("OK"));
    }

    #[test]
    fn first_occurrence_wins() {
        let f = Fields::parse("Temperature: 31 Celsius\nTemperature Sensor 1: 40 Celsius\nTemperature: 99 Celsius\n");
        assert_eq!(f.get(NvmeKey::Temperature), Field::Known("31 Celsius"));
    }

    #[test]
    fn attribute_table_fallback() {
        let f = Fields::parse(SATA);
        assert_eq!(f.get(SmartKey::Model), Field::Known("Samsung SSD 860 EVO 500GB"));
        assert_eq!(f.get(SmartKey::PowerOnHours), Field::Known("21,043"));
        assert_eq!(f.get(SmartKey::Temperature), Field::Known("31 (Min/Max 18/48)"));
        assert_eq!(f.get(SmartKey::LifeRemaining), Field::Known("093"));
        assert_eq!(f.get(SmartKey::Reallocated), Field::Known("0"));
        assert_eq!(f.get(SmartKey::Pending), Field::Absent);
    }

    #[test]
    fn attribute_table_stops_at_blank_line() {
        let attrs = ata_attributes(SATA);
        assert_eq!(attrs.len(), 7);
        assert_eq!(attrs[0].id, 5);
        assert_eq!(attrs[6].name, "Total_LBAs_Written");
    }

    #[test]
    fn restricted_blob_restricts_every_key() {
        let f = Fields::parse("Smartctl open device: /dev/sda failed: Permission denied\n");
        assert!(f.is_restricted());
        assert_eq!(f.get(SmartKey::Model), Field::Restricted);
        assert_eq!(f.get(SmartKey::Temperature), Field::Restricted);
    }

    #[test]
    fn raid_state_and_members() {
        let detail = r#"/dev/md0:
           Version : 1.2
        Raid Level : raid1
             State : clean, degraded
    Failed Devices : 1

    Number   Major   Minor   RaidDevice State
       0       8        1        0      active sync   /dev/sda1
       -       0        0        1      removed

       2       8       17        -      faulty   /dev/sdb1
"#;
        let f = Fields::parse(detail);
        assert_eq!(f.get(RaidKey::State), Field::Known("clean, degraded"));
        assert_eq!(f.get(RaidKey::FailedDevices), Field::Known("1"));

        let rows = raid_member_rows(detail);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0], MemberRow { device: Some("/dev/sda1".into()), state: "active sync".into() });
        assert_eq!(rows[1], MemberRow { device: None, state: "removed".into() });
        assert_eq!(rows[2].state, "faulty");
    }

    #[test]
    fn blocks_reset_per_header_and_close_at_eof() {
        let dmi = r#"# dmidecode 3.4
Handle 0x0040, DMI type 17, 92 bytes
Memory Device
	Size: 8 GB
	Locator: DIMM_A1
	Type: DDR4

Handle 0x0041, DMI type 17, 92 bytes
Memory Device
	Size: No Module Installed
	Locator: DIMM_A2
Memory Device
	Size: 16 GB
	Locator: DIMM_B1
"#;
        let blocks = blocks(dmi, "Memory Device");
        assert_eq!(blocks.len(), 3);
        assert_eq!(blocks[0].get(DmiKey::Type), Field::Known("DDR4"));
        assert_eq!(blocks[1].get(DmiKey::Type), Field::Absent);
        assert_eq!(blocks[2].get(DmiKey::Locator), Field::Known("DIMM_B1"));
        assert_eq!(blocks[2].get(DmiKey::Size), Field::Known("16 GB"));
    }
}
