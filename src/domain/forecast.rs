// 月末コスト予測モジュール

use thiserror::Error;

/// 予測算出のエラー型
#[derive(Debug, Error, PartialEq)]
pub enum ForecastError {
    /// 経過日数が0（月初スキップにより通常は到達しない）
    #[error("経過日数が0のため予測値を算出できません")]
    ZeroElapsedDays,
}

/// 当月実績から月末時点の利用コストを線形外挿で予測する
///
/// 1日あたりの平均コストに当月総日数を掛ける単純なモデルで、
/// 日々の利用が一様であることを仮定している。
pub fn estimate_month_end_cost(
    actual_cost: f64,
    current_day: u32,
    days_in_month: u32,
) -> Result<f64, ForecastError> {
    if current_day == 0 {
        return Err(ForecastError::ZeroElapsedDays);
    }

    let average_cost_per_day = actual_cost / current_day as f64;
    Ok(average_cost_per_day * days_in_month as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forecast_matches_linear_extrapolation() {
        let forecast = estimate_month_end_cost(114.52, 29, 31).unwrap();
        assert_eq!(forecast, (114.52 / 29.0) * 31.0);
        assert!((forecast - 122.42).abs() < 0.01);
    }

    // 月末日の実行では実績と予測が一致する
    #[test]
    fn test_forecast_on_last_day_equals_actual() {
        let forecast = estimate_month_end_cost(310.0, 31, 31).unwrap();
        assert_eq!(forecast, 310.0);
    }

    #[test]
    fn test_forecast_zero_actual_cost() {
        assert_eq!(estimate_month_end_cost(0.0, 10, 30), Ok(0.0));
    }

    // 月初スキップにより到達しないが、防御的にエラーとする
    #[test]
    fn test_forecast_zero_elapsed_days_is_error() {
        assert_eq!(
            estimate_month_end_cost(100.0, 0, 30),
            Err(ForecastError::ZeroElapsedDays)
        );
    }
}
