// アプリケーション層モジュール
pub mod daily_report;
pub mod job_event;
pub mod weekly_report;

#[cfg(test)]
pub mod test_support;

// 再エクスポート
pub use daily_report::{DailyCostReport, DailyReportError, DailyReportOutcome};
pub use job_event::{JobEvent, ReportKind};
pub use weekly_report::{WeeklyCostReport, WeeklyReportError};
