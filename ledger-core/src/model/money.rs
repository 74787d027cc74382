/// Rounds a settled cash amount to cents.
///
/// Unit quantities keep full float precision; only cash amounts that hit a
/// wallet or a transaction record are rounded.
pub fn round2(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}
