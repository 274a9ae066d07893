use crate::extract::{blocks, is_restricted, value, DmiKey, Field, Fields, MeminfoKey};
use crate::models::memory::{MemoryModule, MemoryRecord};

/// DMI placeholders that carry no information.
fn meaningful(v: &str) -> Option<String> {
    match v {
        "Unknown" | "Not Specified" | "None" | "<OUT OF SPEC>" => None,
        _ => Some(v.to_string()),
    }
}

fn dmi_text(fields: &Fields, key: DmiKey) -> Field<String> {
    fields.get(key).and_then(meaningful)
}

fn first_known(modules: &[MemoryModule], pick: impl Fn(&MemoryModule) -> Option<&String>) -> Field<String> {
    modules.iter().find_map(|m| pick(m).cloned()).into()
}

/// Build the memory record from `dmidecode -t memory` and `/proc/meminfo`.
///
/// Installed capacity is the sum of populated DMI modules; the kernel's
/// MemTotal is used when DMI is missing or unreadable. Per-module detail is
/// kept only when `detail` is set.
pub fn normalize_memory(dmi: Option<&str>, meminfo: Option<&str>, detail: bool) -> MemoryRecord {
    let kernel_total = meminfo
        .map(|m| Fields::parse(m).get(MeminfoKey::Total).and_then(|v| value::size_bytes(v, 1024)))
        .unwrap_or_default();

    let Some(dmi) = dmi else {
        return MemoryRecord { total_bytes: kernel_total, ..MemoryRecord::default() };
    };
    if is_restricted(dmi) {
        return MemoryRecord {
            total_bytes: kernel_total,
            module_type: Field::Restricted,
            speed:       Field::Restricted,
            ecc:         Field::Restricted,
            ..MemoryRecord::default()
        };
    }

    let devices = blocks(dmi, "Memory Device");
    let modules: Vec<MemoryModule> = devices
        .iter()
        .enumerate()
        .filter_map(|(i, dev)| {
            let size_bytes = dev.get(DmiKey::Size).and_then(|v| value::size_bytes(v, 1)).into_known()?;
            let slot = dev
                .get(DmiKey::Locator)
                .into_known()
                .map(str::to_string)
                .unwrap_or_else(|| format!("slot {}", i));
            Some(MemoryModule {
                slot,
                size_bytes,
                module_type:  dmi_text(dev, DmiKey::Type),
                speed:        dmi_text(dev, DmiKey::ConfiguredSpeed).or_else(|| dmi_text(dev, DmiKey::Speed)),
                manufacturer: dmi_text(dev, DmiKey::Manufacturer),
                part_number:  dmi_text(dev, DmiKey::PartNumber),
                serial:       dmi_text(dev, DmiKey::Serial),
            })
        })
        .collect();

    let ecc = blocks(dmi, "Physical Memory Array")
        .first()
        .map(|array| dmi_text(array, DmiKey::ErrorCorrection))
        .unwrap_or_default();

    let installed: u64 = modules.iter().map(|m| m.size_bytes).sum();
    let total_bytes = if installed > 0 { Field::Known(installed) } else { kernel_total };

    let module_type = first_known(&modules, |m| m.module_type.known());
    let speed = first_known(&modules, |m| m.speed.known());

    MemoryRecord {
        total_bytes,
        module_type,
        speed,
        ecc,
        slots_populated: (!devices.is_empty()).then_some(modules.len()),
        slots_total:     (!devices.is_empty()).then_some(devices.len()),
        modules:         if detail { modules } else { Vec::new() },
    }
}
