pub mod human;
pub mod interrupt;
pub mod report;
