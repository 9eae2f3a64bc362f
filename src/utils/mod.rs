pub mod env;
pub mod lenient;
pub mod progress;
pub mod service_config;

/// Rounds to `decimals` places, ties to even.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round_ties_even() / factor
}

/// 0/1 indicator in the dtype the predictors were trained on.
pub fn flag(condition: bool) -> f64 {
    if condition {
        1.0
    } else {
        0.0
    }
}
