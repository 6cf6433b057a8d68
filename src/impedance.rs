use crate::error::{ModelError, ModelResult};
use crate::model::EarthModel;
use ndarray::Array2;

/// Acoustic impedance and normal-incidence reflection coefficients, both
/// still indexed by depth sample.
#[derive(Debug)]
pub struct ImpedanceSection {
    ai: Array2<f64>,
    rc: Array2<f64>,
}

impl ImpedanceSection {
    /// Compute AI = Vp (km/s) × ρ (g/m³) elementwise, then the reflection
    /// coefficient at each interface from the impedance contrast between
    /// adjacent depth samples. The first row carries no reflector, so
    /// RC[0, :] stays zero.
    pub fn from_model(model: &EarthModel) -> ModelResult<Self> {
        let (ny, nx) = model.vp().dim();
        let mut ai = Array2::zeros((ny, nx));

        for ((i, ix), &vp) in model.vp().indexed_iter() {
            let rhob = model.rhob()[[i, ix]];
            if vp <= 0.0 || vp.is_nan() {
                return Err(ModelError::NonPositiveInput {
                    grid: "VP",
                    row: i,
                    trace: ix,
                    value: vp,
                });
            }
            if rhob <= 0.0 || rhob.is_nan() {
                return Err(ModelError::NonPositiveInput {
                    grid: "RHOB",
                    row: i,
                    trace: ix,
                    value: rhob,
                });
            }
            // m/s -> km/s and kg/m³ -> g/m³
            let vp_km = vp * 1e-3;
            let rhob_g = rhob * 1e3;
            ai[[i, ix]] = vp_km * rhob_g;
        }

        // RC[i] = (AI[i] - AI[i-1]) / (AI[i] + AI[i-1]); AI > 0 keeps the
        // denominator away from zero.
        let mut rc = Array2::zeros((ny, nx));
        for ix in 0..nx {
            for i in 1..ny {
                let upper = ai[[i - 1, ix]];
                let lower = ai[[i, ix]];
                rc[[i, ix]] = (lower - upper) / (lower + upper);
            }
        }

        Ok(ImpedanceSection { ai, rc })
    }

    pub fn ai(&self) -> &Array2<f64> {
        &self.ai
    }

    pub fn rc(&self) -> &Array2<f64> {
        &self.rc
    }

    pub fn into_parts(self) -> (Array2<f64>, Array2<f64>) {
        (self.ai, self.rc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::{array, Array2};

    fn model_from(vp: Array2<f64>, rhob: Array2<f64>) -> EarthModel {
        let (ny, nx) = vp.dim();
        let x = Array2::from_shape_fn((ny, nx), |(_, ix)| ix as f64);
        let y = Array2::from_shape_fn((ny, nx), |(i, _)| (i + 1) as f64);
        EarthModel::new(x, y, vp, rhob).unwrap()
    }

    #[test]
    fn impedance_is_velocity_times_density_in_converted_units() {
        let model = model_from(
            array![[2000.0, 3000.0], [2500.0, 3500.0]],
            array![[2200.0, 2300.0], [2400.0, 2500.0]],
        );
        let section = ImpedanceSection::from_model(&model).unwrap();
        assert_relative_eq!(section.ai()[[0, 0]], 2.0 * 2200.0e3);
        assert_relative_eq!(section.ai()[[1, 1]], 3.5 * 2500.0e3);
    }

    #[test]
    fn first_row_has_no_reflector() {
        let model = model_from(
            Array2::from_elem((3, 2), 2000.0),
            array![[2000.0, 2000.0], [2400.0, 2400.0], [2400.0, 2400.0]],
        );
        let section = ImpedanceSection::from_model(&model).unwrap();
        for ix in 0..2 {
            assert_relative_eq!(section.rc()[[0, ix]], 0.0);
        }
    }

    #[test]
    fn two_layer_contrast_gives_one_third() {
        // AI doubles across the interface: RC = (4 - 2) / (4 + 2) = 1/3
        let model = model_from(array![[2000.0], [4000.0]], array![[1000.0], [1000.0]]);
        let section = ImpedanceSection::from_model(&model).unwrap();
        assert_relative_eq!(section.rc()[[1, 0]], 1.0 / 3.0, epsilon = 1e-12);
    }

    #[test]
    fn constant_model_has_zero_reflectivity() {
        let model = model_from(
            Array2::from_elem((5, 3), 2500.0),
            Array2::from_elem((5, 3), 2300.0),
        );
        let section = ImpedanceSection::from_model(&model).unwrap();
        assert!(section.rc().iter().all(|&rc| rc == 0.0));
    }

    #[test]
    fn zero_velocity_is_rejected() {
        let model = model_from(array![[2000.0], [0.0]], array![[2200.0], [2200.0]]);
        let err = ImpedanceSection::from_model(&model).unwrap_err();
        assert_eq!(
            err,
            ModelError::NonPositiveInput {
                grid: "VP",
                row: 1,
                trace: 0,
                value: 0.0,
            }
        );
    }

    #[test]
    fn negative_density_is_rejected() {
        let model = model_from(array![[2000.0], [2000.0]], array![[2200.0], [-1.0]]);
        let err = ImpedanceSection::from_model(&model).unwrap_err();
        assert!(matches!(
            err,
            ModelError::NonPositiveInput { grid: "RHOB", .. }
        ));
    }
}
