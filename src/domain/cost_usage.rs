// コスト集計モジュール
//
// Cost Explorer から取得した期間ごとの金額（10進文字列）を合計し、
// レポートに載せる費用の組を保持する。金額は転送中の精度劣化を避けるため
// 文字列のまま受け渡され、この集計境界で初めて数値に変換する。

use thiserror::Error;

use super::currency::{CurrencyError, ExchangeRateSnapshot, convert_to_jpy};

/// コスト集計のエラー型
#[derive(Debug, Error, PartialEq)]
pub enum CostAggregationError {
    /// 金額文字列が10進数として解釈できない
    #[error("金額のパースに失敗しました: {0}")]
    MalformedAmount(String),
}

/// 期間ごとの金額文字列を合計する
///
/// 合計が存在しない期間は0として扱うため、呼び出し側は欠損期間を
/// 単に除外して渡してよい（空の入力は0.0になる）。
/// 1件でもパースできない金額があればエラーとし、レポート全体を中断する。
pub fn sum_amounts<I, S>(amounts: I) -> Result<f64, CostAggregationError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut total = 0.0;

    for amount in amounts {
        let amount = amount.as_ref();
        let parsed: f64 = amount
            .parse()
            .map_err(|_| CostAggregationError::MalformedAmount(amount.to_string()))?;
        total += parsed;
    }

    Ok(total)
}

/// 日次レポートの費用（USDまたはJPY）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DailyCostUsage {
    /// 昨日の利用コスト
    pub yesterday_cost: f64,
    /// 本日時点での今月の利用コスト
    pub actual_cost: f64,
    /// 今月の利用コストの予測値
    pub forecast_cost: f64,
}

impl DailyCostUsage {
    /// 為替レートスナップショットのJPYレートで各費用をJPYへ変換する
    ///
    /// 各値は変換後に小数点以下2桁で切り上げる。
    pub fn to_jpy(&self, snapshot: &ExchangeRateSnapshot) -> Result<Self, CurrencyError> {
        let rate = snapshot.jpy_rate()?;

        Ok(Self {
            yesterday_cost: convert_to_jpy(self.yesterday_cost, rate)?,
            actual_cost: convert_to_jpy(self.actual_cost, rate)?,
            forecast_cost: convert_to_jpy(self.forecast_cost, rate)?,
        })
    }
}

/// 週次レポートの費用
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeeklyCostUsage {
    /// 先週の利用コスト
    pub last_week_cost: f64,
    /// 先々週の利用コスト
    pub week_before_last_cost: f64,
    /// 先週と先々週のコスト増減（%）
    pub percentage_change: f64,
}

impl WeeklyCostUsage {
    /// 為替レートスナップショットのJPYレートで各費用をJPYへ変換する
    ///
    /// 増減率は変換前のUSD金額から算出済みの値をそのまま引き継ぐ。
    pub fn to_jpy(&self, snapshot: &ExchangeRateSnapshot) -> Result<Self, CurrencyError> {
        let rate = snapshot.jpy_rate()?;

        Ok(Self {
            last_week_cost: convert_to_jpy(self.last_week_cost, rate)?,
            week_before_last_cost: convert_to_jpy(self.week_before_last_cost, rate)?,
            percentage_change: self.percentage_change,
        })
    }
}
