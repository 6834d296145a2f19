//! Trailing moving averages

/// Windows of the four rolling columns: 30-day, 90-day, 6-period and
/// 12-period, each counted in observations
pub const ROLLING_WINDOWS: [usize; 4] = [30, 90, 6, 12];

/// Trailing mean over up to `window` observations ending at each position.
///
/// Early positions average whatever is available, so every position of a
/// non-empty series has a value.
pub fn rolling_average(series: &[f64], window: usize) -> Vec<f64> {
    let window = window.max(1);
    let mut out = Vec::with_capacity(series.len());
    let mut sum = 0.0;
    for (i, value) in series.iter().enumerate() {
        sum += value;
        if i >= window {
            sum -= series[i - window];
        }
        let count = (i + 1).min(window);
        out.push(sum / count as f64);
    }
    out
}
