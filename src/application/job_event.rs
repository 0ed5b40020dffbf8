// トリガーイベントモジュール
//
// EventBridgeスケジュールから渡されるイベントのレポート種別を判定する。

use serde::Deserialize;

/// レポート種別
///
/// 未知の種別はUnknownとして扱い、処理をスキップする（エラーにしない）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
pub enum ReportKind {
    /// 日次コストレポート
    #[serde(rename = "dailyCostReport", alias = "daily-cost-report")]
    Daily,
    /// 週次コストレポート
    #[serde(rename = "weeklyCostReport", alias = "weekly-cost-report")]
    Weekly,
    /// 未知の種別
    #[default]
    #[serde(other)]
    Unknown,
}

/// Lambdaトリガーイベント
#[derive(Debug, Clone, Deserialize)]
pub struct JobEvent {
    /// レポート種別の識別子
    #[serde(rename = "type", default)]
    pub kind: ReportKind,
}
