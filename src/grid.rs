use crate::error::{ModelError, ModelResult};
use ndarray::Array1;

/// The shared uniform time axis. Every trace is resampled onto this axis,
/// so it is sized once from the slowest trace and never changes afterwards.
#[derive(Debug)]
pub struct TimeAxis {
    dt: f64,   // Sampling interval (ms)
    nt: usize, // Number of samples
}

impl TimeAxis {
    /// Build an axis covering [0, global_tmax + dt] with step dt.
    pub fn new(global_tmax: f64, dt: f64) -> ModelResult<Self> {
        if !dt.is_finite() || dt <= 0.0 {
            return Err(ModelError::InvalidConfiguration(format!(
                "time sampling interval must be positive, got {} ms",
                dt
            )));
        }
        if !global_tmax.is_finite() || global_tmax < 0.0 {
            return Err(ModelError::InvalidConfiguration(format!(
                "maximum travel time must be non-negative, got {} ms",
                global_tmax
            )));
        }
        let nt = ((global_tmax + dt) / dt).floor() as usize + 1;
        Ok(TimeAxis { dt, nt })
    }

    pub fn dt(&self) -> f64 {
        self.dt
    }

    pub fn len(&self) -> usize {
        self.nt
    }

    pub fn is_empty(&self) -> bool {
        self.nt == 0
    }

    pub fn value(&self, i: usize) -> f64 {
        // Convert sample index to time in milliseconds
        i as f64 * self.dt
    }

    pub fn t_max(&self) -> f64 {
        self.value(self.nt - 1)
    }

    /// Materialize the axis values for labelling and interpolation.
    pub fn values(&self) -> Array1<f64> {
        Array1::from_iter((0..self.nt).map(|i| self.value(i)))
    }

    /// Index of the axis sample nearest to `t_ms`, or None when the time
    /// falls outside the axis. The axis is uniform, so this is a direct
    /// bin computation rather than a search. An exact half-step tie
    /// resolves to the lower index.
    pub fn nearest_bin(&self, t_ms: f64) -> Option<usize> {
        if !(t_ms >= 0.0) || t_ms > self.t_max() {
            return None;
        }
        let pos = t_ms / self.dt;
        let idx = if pos.fract() == 0.5 {
            pos.floor() as usize
        } else {
            pos.round() as usize
        };
        Some(idx.min(self.nt - 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn axis_covers_tmax_with_margin() {
        let axis = TimeAxis::new(10.0, 1.0).unwrap();
        // floor((10 + 1) / 1) + 1 samples, ending at 11 ms
        assert_eq!(axis.len(), 12);
        assert_relative_eq!(axis.t_max(), 11.0);
        assert_relative_eq!(axis.value(0), 0.0);
        let values = axis.values();
        assert_eq!(values.len(), 12);
        assert_relative_eq!(values[3], 3.0);
    }

    #[test]
    fn nearest_bin_rounds_to_closest_sample() {
        let axis = TimeAxis::new(10.0, 1.0).unwrap();
        assert_eq!(axis.nearest_bin(0.0), Some(0));
        assert_eq!(axis.nearest_bin(2.4), Some(2));
        assert_eq!(axis.nearest_bin(2.6), Some(3));
        assert_eq!(axis.nearest_bin(11.0), Some(11));
    }

    #[test]
    fn nearest_bin_ties_resolve_to_lower_index() {
        let axis = TimeAxis::new(10.0, 1.0).unwrap();
        assert_eq!(axis.nearest_bin(0.5), Some(0));
        assert_eq!(axis.nearest_bin(3.5), Some(3));
    }

    #[test]
    fn nearest_bin_rejects_out_of_range_times() {
        let axis = TimeAxis::new(10.0, 1.0).unwrap();
        assert_eq!(axis.nearest_bin(11.1), None);
        assert_eq!(axis.nearest_bin(-0.1), None);
        assert_eq!(axis.nearest_bin(f64::NAN), None);
    }

    #[test]
    fn zero_dt_is_rejected() {
        let err = TimeAxis::new(10.0, 0.0).unwrap_err();
        assert!(matches!(err, ModelError::InvalidConfiguration(_)));
    }

    #[test]
    fn negative_tmax_is_rejected() {
        let err = TimeAxis::new(-1.0, 0.5).unwrap_err();
        assert!(matches!(err, ModelError::InvalidConfiguration(_)));
    }
}
