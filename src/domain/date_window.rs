// 基準日算出モジュール
//
// 実行日時(JST)からコスト集計に必要な日付ウィンドウを導出する。
// Cost Explorer の DateInterval は End が排他的であるため、
// 各ウィンドウの終了日はそのままクエリに渡せる形で保持する。

use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveDate};

/// JSTタイムゾーン（UTC+9、夏時間なし）
pub fn jst() -> FixedOffset {
    FixedOffset::east_opt(9 * 3600).expect("JSTオフセットの生成に失敗")
}

/// 開始日・終了日のペア
///
/// 終了日はCost Explorerの規約に従い排他的として扱う。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Cost Explorerに渡す開始日文字列 (%Y-%m-%d)
    pub fn start_string(&self) -> String {
        self.start.format("%Y-%m-%d").to_string()
    }

    /// Cost Explorerに渡す終了日文字列 (%Y-%m-%d)
    pub fn end_string(&self) -> String {
        self.end.format("%Y-%m-%d").to_string()
    }
}

/// 日次コストレポートのための基準日情報
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailyReportDates {
    /// 昨日〜本日のウィンドウ
    pub yesterday: DateWindow,
    /// 今月初日〜本日のウィンドウ
    pub month_to_date: DateWindow,
    /// 今日までの日数 (1始まり)
    pub current_day: u32,
    /// 今月の総日数
    pub days_in_month: u32,
}

impl DailyReportDates {
    /// 実行日時から日次レポートの基準日を導出する
    pub fn from_execution_time(exec_time: DateTime<FixedOffset>) -> Self {
        let today = exec_time.date_naive();
        let yesterday = today - Duration::days(1);
        let month_start = NaiveDate::from_ymd_opt(today.year(), today.month(), 1)
            .expect("月初日の生成に失敗");

        Self {
            yesterday: DateWindow::new(yesterday, today),
            month_to_date: DateWindow::new(month_start, today),
            current_day: today.day(),
            days_in_month: days_in_month(today),
        }
    }

    /// 月初日はレポートをスキップする
    ///
    /// 月初時点では当月実績も予測値も意味を持たない。
    pub fn should_skip(&self) -> bool {
        self.current_day == 1
    }
}

/// 週次コストレポートのための基準日情報
///
/// カレンダー週ではなく実行日を起点とした、重複しない固定7日間のウィンドウを使う。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeeklyReportDates {
    /// 先週のウィンドウ (実行日-13日 〜 実行日-7日)
    pub last_week: DateWindow,
    /// 先々週のウィンドウ (実行日-20日 〜 実行日-14日)
    pub week_before_last: DateWindow,
}

impl WeeklyReportDates {
    /// 実行日時から週次レポートの基準日を導出する
    pub fn from_execution_time(exec_time: DateTime<FixedOffset>) -> Self {
        let today = exec_time.date_naive();

        Self {
            last_week: DateWindow::new(
                today - Duration::days(13),
                today - Duration::days(7),
            ),
            week_before_last: DateWindow::new(
                today - Duration::days(20),
                today - Duration::days(14),
            ),
        }
    }
}

/// 当月の総日数を算出する（翌月初日の前日 = 当月末日）
///
/// 12月→翌年1月への繰り越しとうるう年を正しく扱う。
fn days_in_month(date: NaiveDate) -> u32 {
    let (next_year, next_month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };

    let next_month_first =
        NaiveDate::from_ymd_opt(next_year, next_month, 1).expect("翌月初日の生成に失敗");

    (next_month_first - Duration::days(1)).day()
}
