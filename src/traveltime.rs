use crate::error::{ModelError, ModelResult};
use crate::model::EarthModel;
use ndarray::{Array1, Array2};
use rayon::prelude::*;

/// Two-way travel time per depth sample, plus the slowest trace's total
/// time. The global maximum is what sizes the shared time axis, so it has
/// to observe every trace before the next stage can run.
#[derive(Debug)]
pub struct TravelTime {
    twt: Array2<f64>,
    global_tmax: f64,
}

impl TravelTime {
    /// Integrate depth increments over local velocity for every trace.
    /// Each trace is an independent task; the global maximum is a plain
    /// max reduction over the per-trace end times, no shared accumulator.
    pub fn from_model(model: &EarthModel) -> ModelResult<Self> {
        let vp = model.vp();
        let depth = model.y_axis();
        let (ny, nx) = vp.dim();

        let columns: Vec<Vec<f64>> = (0..nx)
            .into_par_iter()
            .map(|ix| Self::integrate_trace(vp, &depth, ny, ix))
            .collect::<ModelResult<_>>()?;

        let global_tmax = columns
            .par_iter()
            .map(|col| col.last().copied().unwrap_or(0.0))
            .reduce(|| 0.0, f64::max);

        let mut twt = Array2::zeros((ny, nx));
        for (ix, col) in columns.into_iter().enumerate() {
            twt.column_mut(ix).assign(&Array1::from(col));
        }

        Ok(TravelTime { twt, global_tmax })
    }

    fn integrate_trace(
        vp: &Array2<f64>,
        depth: &Array1<f64>,
        ny: usize,
        ix: usize,
    ) -> ModelResult<Vec<f64>> {
        let mut col = vec![0.0; ny];
        for i in 1..ny {
            let velocity = vp[[i, ix]];
            if velocity <= 0.0 || velocity.is_nan() {
                return Err(ModelError::NonPositiveVelocity {
                    row: i,
                    trace: ix,
                    value: velocity,
                });
            }
            let dz = (depth[i] - depth[i - 1]).abs();
            // Two-way: down and back up, converted to milliseconds
            let dt_ms = 2.0 * dz / velocity * 1000.0;
            col[i] = col[i - 1] + dt_ms;
        }
        Ok(col)
    }

    pub fn twt(&self) -> &Array2<f64> {
        &self.twt
    }

    pub fn global_tmax(&self) -> f64 {
        self.global_tmax
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::{array, Array2};

    fn model_from(vp: Array2<f64>, y_spacing: f64) -> EarthModel {
        let (ny, nx) = vp.dim();
        let x = Array2::from_shape_fn((ny, nx), |(_, ix)| ix as f64);
        let y = Array2::from_shape_fn((ny, nx), |(i, _)| (i + 1) as f64 * y_spacing);
        let rhob = Array2::from_elem((ny, nx), 2200.0);
        EarthModel::new(x, y, vp, rhob).unwrap()
    }

    #[test]
    fn surface_sample_has_zero_time() {
        let model = model_from(Array2::from_elem((4, 3), 2000.0), 5.0);
        let travel = TravelTime::from_model(&model).unwrap();
        for ix in 0..3 {
            assert_relative_eq!(travel.twt()[[0, ix]], 0.0);
        }
    }

    #[test]
    fn constant_velocity_accumulates_linearly() {
        // 10 m spacing at 2000 m/s: 2 * 10 / 2000 * 1000 = 10 ms per step
        let model = model_from(Array2::from_elem((4, 1), 2000.0), 10.0);
        let travel = TravelTime::from_model(&model).unwrap();
        assert_relative_eq!(travel.twt()[[1, 0]], 10.0);
        assert_relative_eq!(travel.twt()[[2, 0]], 20.0);
        assert_relative_eq!(travel.twt()[[3, 0]], 30.0);
        assert_relative_eq!(travel.global_tmax(), 30.0);
    }

    #[test]
    fn travel_time_is_strictly_increasing_with_depth() {
        let model = model_from(
            array![
                [1500.0, 3000.0],
                [1800.0, 2500.0],
                [2200.0, 2000.0],
                [2600.0, 1700.0]
            ],
            4.0,
        );
        let travel = TravelTime::from_model(&model).unwrap();
        for ix in 0..2 {
            for i in 1..4 {
                assert!(travel.twt()[[i, ix]] > travel.twt()[[i - 1, ix]]);
            }
        }
    }

    #[test]
    fn slowest_trace_sets_the_global_maximum() {
        // Trace 1 is slower everywhere, so its end time wins
        let model = model_from(array![[2000.0, 1000.0], [2000.0, 1000.0]], 10.0);
        let travel = TravelTime::from_model(&model).unwrap();
        assert_relative_eq!(travel.twt()[[1, 0]], 10.0);
        assert_relative_eq!(travel.twt()[[1, 1]], 20.0);
        assert_relative_eq!(travel.global_tmax(), 20.0);
    }

    #[test]
    fn zero_velocity_names_the_offending_sample() {
        let model = model_from(array![[2000.0, 2000.0], [2000.0, 0.0]], 10.0);
        let err = TravelTime::from_model(&model).unwrap_err();
        assert_eq!(
            err,
            ModelError::NonPositiveVelocity {
                row: 1,
                trace: 1,
                value: 0.0,
            }
        );
    }
}
