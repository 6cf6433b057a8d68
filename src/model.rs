use crate::config::ModelConfig;
use crate::error::{ModelError, ModelResult};
use ndarray::{Array1, Array2, Axis};

/// Supplies the four co-registered input grids. Acquisition (file formats,
/// survey databases) lives behind this seam; the pipeline only ever sees a
/// validated `EarthModel`.
pub trait GridSource {
    fn load(&self) -> ModelResult<EarthModel>;
}

/// The depth-domain earth model: lateral coordinates, depth coordinates,
/// P-wave velocity (m/s) and bulk density (kg/m³), all shape (ny, nx) with
/// rows indexed by depth sample and columns by trace.
#[derive(Debug)]
pub struct EarthModel {
    x: Array2<f64>,
    y: Array2<f64>,
    vp: Array2<f64>,
    rhob: Array2<f64>,
}

impl EarthModel {
    /// Validate and normalize the four grids. Shapes must agree, and the
    /// depth column must be strictly monotonic; a descending model is
    /// flipped so depth ascends before any stage runs.
    pub fn new(
        x: Array2<f64>,
        y: Array2<f64>,
        vp: Array2<f64>,
        rhob: Array2<f64>,
    ) -> ModelResult<Self> {
        let expected = x.dim();
        for (name, grid) in [("Y", &y), ("VP", &vp), ("RHOB", &rhob)] {
            if grid.dim() != expected {
                return Err(ModelError::ShapeMismatch {
                    grid: name,
                    expected,
                    found: grid.dim(),
                });
            }
        }

        let mut model = EarthModel { x, y, vp, rhob };

        let ny = model.y.nrows();
        if ny >= 2 && model.y[[0, 0]] > model.y[[ny - 1, 0]] {
            model.flip_depth_axis();
        }
        model.check_depth_monotonic()?;

        Ok(model)
    }

    // Reverse the rows of every depth-indexed grid so that depth ascends.
    // The lateral grid is constant along rows, so it stays as-is.
    fn flip_depth_axis(&mut self) {
        self.y.invert_axis(Axis(0));
        self.vp.invert_axis(Axis(0));
        self.rhob.invert_axis(Axis(0));
    }

    fn check_depth_monotonic(&self) -> ModelResult<()> {
        let depth = self.y.column(0);
        for i in 1..depth.len() {
            if depth[i] <= depth[i - 1] {
                return Err(ModelError::NonMonotonicDepth { row: i });
            }
        }
        Ok(())
    }

    /// Number of depth samples
    pub fn ny(&self) -> usize {
        self.vp.nrows()
    }

    /// Number of traces
    pub fn nx(&self) -> usize {
        self.vp.ncols()
    }

    pub fn vp(&self) -> &Array2<f64> {
        &self.vp
    }

    pub fn rhob(&self) -> &Array2<f64> {
        &self.rhob
    }

    /// Lateral positions, taken from the first row of the X grid.
    pub fn x_axis(&self) -> Array1<f64> {
        self.x.row(0).to_owned()
    }

    /// Depth positions, taken from the first column of the Y grid.
    pub fn y_axis(&self) -> Array1<f64> {
        self.y.column(0).to_owned()
    }
}

/// Builds a synthetic layered model: constant properties within each layer,
/// interfaces at the configured base depths. Stands in for survey data in
/// the demo binary.
pub struct LayeredModelSource {
    config: ModelConfig,
}

impl LayeredModelSource {
    pub fn new(config: &ModelConfig) -> Self {
        LayeredModelSource {
            config: config.clone(),
        }
    }
}

impl GridSource for LayeredModelSource {
    fn load(&self) -> ModelResult<EarthModel> {
        // Samples below the last interface take the last layer's properties.
        let last = self.config.layers.last().ok_or_else(|| {
            ModelError::InvalidConfiguration("at least one layer must be defined".to_string())
        })?;
        let (ny, nx) = (self.config.ny, self.config.nx);
        let x = Array2::from_shape_fn((ny, nx), |(_, ix)| ix as f64 * self.config.x_spacing);
        let y = Array2::from_shape_fn((ny, nx), |(i, _)| (i + 1) as f64 * self.config.y_spacing);
        let mut vp = Array2::zeros((ny, nx));
        let mut rhob = Array2::zeros((ny, nx));
        for i in 0..ny {
            let depth = (i + 1) as f64 * self.config.y_spacing;
            let layer = self
                .config
                .layers
                .iter()
                .find(|layer| depth <= layer.base_depth)
                .unwrap_or(last);
            for ix in 0..nx {
                vp[[i, ix]] = layer.vp;
                rhob[[i, ix]] = layer.rhob;
            }
        }
        EarthModel::new(x, y, vp, rhob)
    }
}
