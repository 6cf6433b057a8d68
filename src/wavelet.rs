use crate::error::{ModelError, ModelResult};
use ndarray::Array1;
use std::f64::consts::PI;

/// Sample a zero-phase Ricker wavelet: w(t) = (1 - 2(πft)²) · exp(-(πft)²).
/// The pulse is symmetric about t = 0 and truncated to `duration_ms`; the
/// sample count is odd so the peak lands exactly on the center sample.
pub fn ricker(duration_ms: f64, dt_ms: f64, frequency_hz: f64) -> ModelResult<Array1<f64>> {
    if !duration_ms.is_finite() || duration_ms <= 0.0 {
        return Err(ModelError::InvalidConfiguration(format!(
            "wavelet duration must be positive, got {} ms",
            duration_ms
        )));
    }
    if !dt_ms.is_finite() || dt_ms <= 0.0 {
        return Err(ModelError::InvalidConfiguration(format!(
            "wavelet sampling interval must be positive, got {} ms",
            dt_ms
        )));
    }
    if !frequency_hz.is_finite() || frequency_hz <= 0.0 {
        return Err(ModelError::InvalidConfiguration(format!(
            "wavelet frequency must be positive, got {} Hz",
            frequency_hz
        )));
    }

    let dt = dt_ms * 1e-3;
    let duration = duration_ms * 1e-3;
    let half = (duration / 2.0 / dt).floor() as usize;

    let wavelet = Array1::from_iter((0..=2 * half).map(|k| {
        let tau = (k as f64 - half as f64) * dt;
        let arg = (PI * frequency_hz * tau).powi(2);
        (1.0 - 2.0 * arg) * (-arg).exp()
    }));

    Ok(wavelet)
}
