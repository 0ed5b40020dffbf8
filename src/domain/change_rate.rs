// コスト増減率モジュール

/// 先週と先々週のコスト増減率（%）を算出する
///
/// 先々週のコストが0の場合は0.0を返す（履歴のない環境でエラーにしないための方針。
/// 数学的に意味のある値ではない）。
///
/// 増減率は為替変換前のUSD金額から計算すること。浮動小数点の丸めにより、
/// JPY変換後に計算すると結果が一致しない。
pub fn percentage_change(last_week_cost: f64, week_before_last_cost: f64) -> f64 {
    if week_before_last_cost == 0.0 {
        return 0.0;
    }

    ((last_week_cost - week_before_last_cost) / week_before_last_cost) * 100.0
}
