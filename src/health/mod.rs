//! Severity thresholds and run-wide issue collection.

pub mod assess;
pub mod classify;
pub mod issues;

pub use assess::{assess_disk, assess_raid, Reading};
pub use classify::{Classification, Severity};
pub use issues::{CriticalIssue, IssueAggregator, Notice, NoticeKind};
