// レポート整形モジュール
//
// 計算済みの費用をSlack通知用の固定テンプレート文へ整形する。
// テンプレートは日本語固定で、金額はすべて小数点以下2桁で表示する。

use super::cost_usage::{DailyCostUsage, WeeklyCostUsage};

/// 日次レポートのタイトル
pub const DAILY_REPORT_TITLE: &str = "daily-cost-report";

/// 週次レポートのタイトル
pub const WEEKLY_REPORT_TITLE: &str = "weekly-cost-report";

/// Slack通知ペイロード（タイトル + 本文）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportPayload {
    pub title: String,
    pub body: String,
}

/// 日次レポートの通知ペイロードを生成する
pub fn format_daily_report(usage: &DailyCostUsage) -> ReportPayload {
    ReportPayload {
        title: DAILY_REPORT_TITLE.to_string(),
        body: format!(
            "• 昨日の利用コスト: {:.2} 円\n• 本日時点での今月の利用コスト: {:.2} 円\n• 今月の利用コストの予測値: {:.2} 円",
            usage.yesterday_cost, usage.actual_cost, usage.forecast_cost,
        ),
    }
}

/// 週次レポートの通知ペイロードを生成する
pub fn format_weekly_report(usage: &WeeklyCostUsage) -> ReportPayload {
    ReportPayload {
        title: WEEKLY_REPORT_TITLE.to_string(),
        body: format!(
            "• 先週の利用コスト: {:.2} 円\n• 先々週の利用コスト: {:.2} 円\n• 先週と先々週のコスト増減: {:.2} %",
            usage.last_week_cost, usage.week_before_last_cost, usage.percentage_change,
        ),
    }
}
