use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum IssueCategory {
    SmartHealth,
    Temperature,
    Wear,
    PendingSectors,
    OfflineSectors,
    RaidDegraded,
    RaidFailedDevices,
}

impl IssueCategory {
    pub fn label(&self) -> &'static str {
        match self {
            IssueCategory::SmartHealth       => "health",
            IssueCategory::Temperature       => "temperature",
            IssueCategory::Wear              => "wear",
            IssueCategory::PendingSectors    => "pending sectors",
            IssueCategory::OfflineSectors    => "offline sectors",
            IssueCategory::RaidDegraded      => "raid state",
            IssueCategory::RaidFailedDevices => "raid members",
        }
    }
}

/// A hardware condition severe enough to fail the run.
///
/// Only the assessment step in this module can build one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CriticalIssue {
    device:   String,
    category: IssueCategory,
    message:  String,
    index:    usize,
}

impl CriticalIssue {
    pub(super) fn new(device: &str, category: IssueCategory, message: String) -> Self {
        Self { device: device.to_string(), category, message, index: 0 }
    }

    pub fn device(&self) -> &str { &self.device }
    pub fn category(&self) -> IssueCategory { self.category }
    pub fn message(&self) -> &str { &self.message }
    /// Position in discovery order.
    pub fn index(&self) -> usize { self.index }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeKind {
    ToolUnavailable,
    PermissionDenied,
    DeviceUnreachable,
    Informational,
}

impl NoticeKind {
    pub fn label(&self) -> &'static str {
        match self {
            NoticeKind::ToolUnavailable   => "MISSING",
            NoticeKind::PermissionDenied  => "DENIED",
            NoticeKind::DeviceUnreachable => "SKIPPED",
            NoticeKind::Informational     => "INFO",
        }
    }
}

/// Missing-information note for the end-of-run summary. Never affects the
/// exit status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub kind:    NoticeKind,
    pub subject: String,
    pub message: String,
}

impl Notice {
    pub fn new(kind: NoticeKind, subject: impl Into<String>, message: impl Into<String>) -> Self {
        Self { kind, subject: subject.into(), message: message.into() }
    }
}

/// Run-scoped, append-only collection of critical issues and notices.
#[derive(Debug, Default)]
pub struct IssueAggregator {
    issues:  Vec<CriticalIssue>,
    notices: Vec<Notice>,
}

impl IssueAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an issue. Issues are never deduplicated.
    pub fn record(&mut self, mut issue: CriticalIssue) {
        issue.index = self.issues.len();
        self.issues.push(issue);
    }

    /// Append a notice unless an identical one is already queued.
    pub fn note(&mut self, notice: Notice) {
        if !self.notices.contains(&notice) {
            self.notices.push(notice);
        }
    }

    pub fn snapshot(&self) -> &[CriticalIssue] {
        &self.issues
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    pub fn has_critical(&self) -> bool {
        !self.issues.is_empty()
    }

    /// 2 when any critical issue was recorded, 0 otherwise.
    pub fn exit_code(&self) -> i32 {
        if self.has_critical() { 2 } else { 0 }
    }
}
