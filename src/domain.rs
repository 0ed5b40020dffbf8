// ドメイン層モジュール
pub mod change_rate;
pub mod cost_usage;
pub mod currency;
pub mod date_window;
pub mod forecast;
pub mod report;
pub mod rounding;

// 再エクスポート
pub use change_rate::percentage_change;
pub use cost_usage::{CostAggregationError, DailyCostUsage, WeeklyCostUsage, sum_amounts};
pub use currency::{CurrencyCode, CurrencyError, ExchangeRateSnapshot};
pub use date_window::{DailyReportDates, DateWindow, WeeklyReportDates, jst};
pub use forecast::{ForecastError, estimate_month_end_cost};
pub use report::{ReportPayload, format_daily_report, format_weekly_report};
pub use rounding::{RoundingError, round_up_two_decimals};
