//! Raw fields → typed records.

pub mod cpu;
pub mod disk;
pub mod memory;
pub mod raid;

pub use cpu::normalize_cpu;
pub use disk::{fallback_disk, normalize_disk, DeviceHint};
pub use memory::normalize_memory;
pub use raid::{normalize_raid, raid_from_mdstat};
