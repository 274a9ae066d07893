//! Raw text from system utilities and /proc. No interpretation happens here.

pub mod bench;
pub mod lsblk;
pub mod mdraid;
pub mod smart;
pub mod system;
pub mod tool;
