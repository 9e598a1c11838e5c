/// Two-sided normal quantile for the common confidence levels.
///
/// Levels between table entries round down to the nearest entry; anything
/// below 0.80 uses the 0.80 quantile.
pub fn z_score(confidence_level: f64) -> f64 {
    match confidence_level {
        x if x >= 0.99 => 2.576,
        x if x >= 0.95 => 1.96,
        x if x >= 0.90 => 1.645,
        _ => 1.282,
    }
}

/// Half-width of the bounds `lead` periods past the last observation.
///
/// Lead 0 is the in-sample width used for historical points. Widths grow
/// with the square root of the lead, as for a random walk.
pub fn half_width(z: f64, sigma: f64, lead: usize) -> f64 {
    let scale = (lead.max(1) as f64).sqrt();
    z * sigma * scale
}
