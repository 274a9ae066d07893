use crate::extract::Field;
use serde::Serialize;

/// One populated DIMM slot from the DMI table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemoryModule {
    pub slot:         String,
    pub size_bytes:   u64,
    pub module_type:  Field<String>,
    pub speed:        Field<String>,
    pub manufacturer: Field<String>,
    pub part_number:  Field<String>,
    pub serial:       Field<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct MemoryRecord {
    pub total_bytes:     Field<u64>,
    pub module_type:     Field<String>,
    pub speed:           Field<String>,
    pub ecc:             Field<String>,
    pub slots_populated: Option<usize>,
    pub slots_total:     Option<usize>,
    /// Filled only when module detail was requested.
    pub modules:         Vec<MemoryModule>,
}
