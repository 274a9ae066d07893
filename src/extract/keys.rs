//! Typed field names for each source format, with the vendor spellings that
//! map to each one. Normalizers look fields up by these keys only.

/// Which column of an ATA attribute row a key reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttrColumn {
    Raw,
    Normalized,
}

pub trait FieldKey: Copy {
    /// `label: value` spellings, compared case-insensitively with runs of
    /// whitespace collapsed.
    fn labels(self) -> &'static [&'static str];

    /// ATA attribute-table names, tried after the labels.
    fn attributes(self) -> &'static [&'static str] {
        &[]
    }

    fn column(self) -> AttrColumn {
        AttrColumn::Raw
    }
}

// ── smartctl -a (SATA / SAS) ─────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SmartKey {
    Model,
    Serial,
    Firmware,
    Capacity,
    RotationRate,
    Health,
    Temperature,
    PowerOnHours,
    PowerCycles,
    WearUsed,
    LifeRemaining,
    Reallocated,
    Pending,
    OfflineUncorrectable,
    LbasWritten,
}

impl FieldKey for SmartKey {
    fn labels(self) -> &'static [&'static str] {
        match self {
            SmartKey::Model        => &["Device Model", "Model Number", "Product"],
            SmartKey::Serial       => &["Serial Number"],
            SmartKey::Firmware     => &["Firmware Version", "Revision"],
            SmartKey::Capacity     => &["User Capacity", "Total NVM Capacity"],
            SmartKey::RotationRate => &["Rotation Rate"],
            SmartKey::Health       => &[
                "SMART overall-health self-assessment test result",
                "SMART Health Status",
            ],
            SmartKey::Temperature  => &["Current Drive Temperature", "Current Temperature"],
            // SAS prints "Accumulated power on time, hours:minutes 1234:56";
            // the first colon splits inside the label.
            SmartKey::PowerOnHours => &["Accumulated power on time, hours"],
            SmartKey::PowerCycles  => &["Accumulated start-stop cycles"],
            SmartKey::WearUsed     => &["Percentage used endurance indicator"],
            SmartKey::Reallocated  => &["Elements in grown defect list"],
            SmartKey::LifeRemaining
            | SmartKey::Pending
            | SmartKey::OfflineUncorrectable
            | SmartKey::LbasWritten => &[],
        }
    }

    fn attributes(self) -> &'static [&'static str] {
        match self {
            SmartKey::Temperature   => &["Temperature_Celsius", "Airflow_Temperature_Cel", "Temperature_Internal"],
            SmartKey::PowerOnHours  => &["Power_On_Hours"],
            SmartKey::PowerCycles   => &["Power_Cycle_Count"],
            SmartKey::LifeRemaining => &[
                "Wear_Leveling_Count",
                "Media_Wearout_Indicator",
                "Percent_Lifetime_Remain",
                "SSD_Life_Left",
            ],
            SmartKey::Reallocated   => &["Reallocated_Sector_Ct"],
            SmartKey::Pending       => &["Current_Pending_Sector"],
            SmartKey::OfflineUncorrectable => &["Offline_Uncorrectable"],
            SmartKey::LbasWritten   => &["Total_LBAs_Written"],
            _ => &[],
        }
    }

    fn column(self) -> AttrColumn {
        match self {
            SmartKey::LifeRemaining => AttrColumn::Normalized,
            _ => AttrColumn::Raw,
        }
    }
}

// ── NVMe health log (smartctl -a or nvme smart-log) ──────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NvmeKey {
    Model,
    Serial,
    Firmware,
    Capacity,
    Health,
    CriticalWarning,
    Temperature,
    PercentageUsed,
    AvailableSpare,
    PowerOnHours,
    PowerCycles,
    DataUnitsWritten,
    MediaErrors,
}

impl FieldKey for NvmeKey {
    fn labels(self) -> &'static [&'static str] {
        match self {
            NvmeKey::Model            => &["Model Number"],
            NvmeKey::Serial           => &["Serial Number"],
            NvmeKey::Firmware         => &["Firmware Version"],
            NvmeKey::Capacity         => &["Total NVM Capacity", "Namespace 1 Size/Capacity"],
            NvmeKey::Health           => &["SMART overall-health self-assessment test result"],
            NvmeKey::CriticalWarning  => &["Critical Warning", "critical_warning"],
            NvmeKey::Temperature      => &["Temperature", "Composite Temperature"],
            NvmeKey::PercentageUsed   => &["Percentage Used", "percentage_used"],
            NvmeKey::AvailableSpare   => &["Available Spare", "available_spare"],
            NvmeKey::PowerOnHours     => &["Power On Hours", "power_on_hours"],
            NvmeKey::PowerCycles      => &["Power Cycles", "power_cycles"],
            NvmeKey::DataUnitsWritten => &["Data Units Written", "data_units_written"],
            NvmeKey::MediaErrors      => &["Media and Data Integrity Errors", "media_errors"],
        }
    }
}

// ── mdadm --detail ───────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RaidKey {
    Level,
    State,
    ArraySize,
    RaidDevices,
    TotalDevices,
    ActiveDevices,
    WorkingDevices,
    FailedDevices,
    SpareDevices,
}

impl FieldKey for RaidKey {
    fn labels(self) -> &'static [&'static str] {
        match self {
            RaidKey::Level          => &["Raid Level"],
            RaidKey::State          => &["State"],
            RaidKey::ArraySize      => &["Array Size"],
            RaidKey::RaidDevices    => &["Raid Devices"],
            RaidKey::TotalDevices   => &["Total Devices"],
            RaidKey::ActiveDevices  => &["Active Devices"],
            RaidKey::WorkingDevices => &["Working Devices"],
            RaidKey::FailedDevices  => &["Failed Devices"],
            RaidKey::SpareDevices   => &["Spare Devices"],
        }
    }
}

// ── dmidecode -t memory ──────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DmiKey {
    Size,
    Type,
    Speed,
    ConfiguredSpeed,
    Manufacturer,
    PartNumber,
    Serial,
    Locator,
    ErrorCorrection,
}

impl FieldKey for DmiKey {
    fn labels(self) -> &'static [&'static str] {
        match self {
            DmiKey::Size            => &["Size"],
            DmiKey::Type            => &["Type"],
            DmiKey::Speed           => &["Speed"],
            DmiKey::ConfiguredSpeed => &["Configured Memory Speed", "Configured Clock Speed"],
            DmiKey::Manufacturer    => &["Manufacturer"],
            DmiKey::PartNumber      => &["Part Number"],
            DmiKey::Serial          => &["Serial Number"],
            DmiKey::Locator         => &["Locator"],
            DmiKey::ErrorCorrection => &["Error Correction Type"],
        }
    }
}

// ── /proc/meminfo ────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeminfoKey {
    Total,
}

impl FieldKey for MeminfoKey {
    fn labels(self) -> &'static [&'static str] {
        match self {
            MeminfoKey::Total => &["MemTotal"],
        }
    }
}

// ── /proc/cpuinfo ────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CpuKey {
    Processor,
    Model,
    PhysicalId,
    Cores,
    Mhz,
}

impl FieldKey for CpuKey {
    fn labels(self) -> &'static [&'static str] {
        match self {
            CpuKey::Processor  => &["processor"],
            CpuKey::Model      => &["model name", "cpu model", "Model"],
            CpuKey::PhysicalId => &["physical id"],
            CpuKey::Cores      => &["cpu cores"],
            CpuKey::Mhz        => &["cpu MHz"],
        }
    }
}
