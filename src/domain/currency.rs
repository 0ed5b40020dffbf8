// 通貨モジュール
//
// 通貨コードと為替レートスナップショットを提供する。

use std::collections::HashMap;

use thiserror::Error;

use super::rounding::{RoundingError, round_up_two_decimals};

/// 通貨コード
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurrencyCode {
    Usd,
    Eur,
    Jpy,
    Gbp,
    Aud,
}

impl CurrencyCode {
    /// ISO 4217形式の文字列を返す
    pub fn as_str(&self) -> &'static str {
        match self {
            CurrencyCode::Usd => "USD",
            CurrencyCode::Eur => "EUR",
            CurrencyCode::Jpy => "JPY",
            CurrencyCode::Gbp => "GBP",
            CurrencyCode::Aud => "AUD",
        }
    }

    /// 文字列から通貨コードを解釈する
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "USD" => Some(CurrencyCode::Usd),
            "EUR" => Some(CurrencyCode::Eur),
            "JPY" => Some(CurrencyCode::Jpy),
            "GBP" => Some(CurrencyCode::Gbp),
            "AUD" => Some(CurrencyCode::Aud),
            _ => None,
        }
    }

    /// 基軸通貨として有効かを検証する
    ///
    /// 現状のプランではUSD以外を基軸通貨に指定できない。
    pub fn is_valid_base(&self) -> bool {
        matches!(self, CurrencyCode::Usd)
    }
}

impl std::fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 通貨変換のエラー型
#[derive(Debug, Error, PartialEq)]
pub enum CurrencyError {
    /// スナップショットに対象通貨のレートが存在しない
    #[error("為替レートが見つかりません: {0}")]
    RateNotFound(String),
    /// 変換後の丸め処理で発生したエラー
    #[error(transparent)]
    Rounding(#[from] RoundingError),
}

/// 為替レートスナップショット
///
/// 通貨コードから「1USDあたりのその通貨の値」へのマッピング。
/// レポート実行ごとに1回のAPIコールで取得する。
#[derive(Debug, Clone, PartialEq)]
pub struct ExchangeRateSnapshot {
    rates: HashMap<String, f64>,
}

impl ExchangeRateSnapshot {
    pub fn new(rates: HashMap<String, f64>) -> Self {
        Self { rates }
    }

    /// JPYレートを取得する
    pub fn jpy_rate(&self) -> Result<f64, CurrencyError> {
        self.rates
            .get(CurrencyCode::Jpy.as_str())
            .copied()
            .ok_or_else(|| CurrencyError::RateNotFound(CurrencyCode::Jpy.as_str().to_string()))
    }
}

/// USDの金額にレートを適用し、小数点以下2桁で切り上げてJPYの金額へ変換する
///
/// 負の金額は丸め処理で拒否される（上流の不変条件だが、ここでも強制する）。
pub fn convert_to_jpy(figure_usd: f64, rate: f64) -> Result<f64, CurrencyError> {
    Ok(round_up_two_decimals(figure_usd * rate)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== CurrencyCode テスト ====================

    #[test]
    fn test_usd_is_valid_base() {
        assert!(CurrencyCode::Usd.is_valid_base());
    }

    #[test]
    fn test_other_currencies_are_invalid_base() {
        assert!(!CurrencyCode::Eur.is_valid_base());
        assert!(!CurrencyCode::Jpy.is_valid_base());
        assert!(!CurrencyCode::Gbp.is_valid_base());
        assert!(!CurrencyCode::Aud.is_valid_base());
    }

    #[test]
    fn test_parse_known_codes() {
        assert_eq!(CurrencyCode::parse("USD"), Some(CurrencyCode::Usd));
        assert_eq!(CurrencyCode::parse("JPY"), Some(CurrencyCode::Jpy));
    }

    #[test]
    fn test_parse_unknown_code() {
        assert_eq!(CurrencyCode::parse("XXX"), None);
        assert_eq!(CurrencyCode::parse(""), None);
    }

    // ==================== ExchangeRateSnapshot テスト ====================

    #[test]
    fn test_jpy_rate_found() {
        let snapshot =
            ExchangeRateSnapshot::new(HashMap::from([("JPY".to_string(), 157.35784932)]));
        assert_eq!(snapshot.jpy_rate(), Ok(157.35784932));
    }

    #[test]
    fn test_jpy_rate_missing() {
        let snapshot = ExchangeRateSnapshot::new(HashMap::new());
        assert_eq!(
            snapshot.jpy_rate(),
            Err(CurrencyError::RateNotFound("JPY".to_string()))
        );
    }

    // ==================== convert_to_jpy テスト ====================

    #[test]
    fn test_convert_rounds_up() {
        let rate = 157.35784932;
        let converted = convert_to_jpy(0.7277853673, rate).unwrap();
        assert_eq!(
            converted,
            round_up_two_decimals(0.7277853673 * rate).unwrap()
        );
    }

    #[test]
    fn test_convert_negative_figure_is_error() {
        let result = convert_to_jpy(-1.0, 150.0);
        assert!(matches!(result, Err(CurrencyError::Rounding(_))));
    }
}
