//! Field extraction from raw tool output.

pub mod field;
pub mod fields;
pub mod keys;
pub mod value;

pub use field::Field;
pub use fields::{blocks, is_restricted, raid_member_rows, Fields};
pub use keys::{CpuKey, DmiKey, MeminfoKey, NvmeKey, RaidKey, SmartKey};
