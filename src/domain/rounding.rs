// 金額丸めモジュール
//
// コスト計算全体で使用する小数点以下2桁の切り上げ処理を提供する。

use thiserror::Error;

/// 丸め処理のエラー型
#[derive(Debug, Error, PartialEq)]
pub enum RoundingError {
    /// 負の金額は丸め対象として許容しない
    #[error("負の値は許容されません: {0}")]
    NegativeValue(f64),
}

/// f64の値を小数点以下2桁で切り上げる
///
/// 四捨五入ではなく常に正の無限大方向への切り上げ。小数点以下3桁目に
/// 0以外の値があれば2桁目が必ず繰り上がる。
/// 例: 123.451 -> 123.46, 0.004 -> 0.01
pub fn round_up_two_decimals(value: f64) -> Result<f64, RoundingError> {
    if value < 0.0 {
        return Err(RoundingError::NegativeValue(value));
    }

    let factor = 100.0;
    Ok((value * factor).ceil() / factor)
}
