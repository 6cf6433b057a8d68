use crate::synthesis::SyntheticSection;
use ndarray::{Array1, ArrayView2};
use plotters::prelude::*;

/// Sink for the pipeline outputs. Anything that can consume the four
/// sections and their axes implements this.
pub trait Renderer {
    fn render(&self, section: &SyntheticSection) -> Result<(), Box<dyn std::error::Error>>;
}

/// Renders each section as a PNG heatmap in the output directory.
pub struct SectionVisualiser {
    output_dir: String,
    width: u32,
    height: u32,
    // Stored as boxed trait objects
    impedance_gradient: Box<dyn colorgrad::Gradient>,
    amplitude_gradient: Box<dyn colorgrad::Gradient>,
}

impl SectionVisualiser {
    pub fn new(output_dir: &str, width: u32, height: u32) -> Self {
        Self {
            output_dir: output_dir.to_string(),
            width,
            height,
            impedance_gradient: Box::new(colorgrad::preset::turbo()),
            amplitude_gradient: Box::new(colorgrad::preset::rd_bu()),
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn plot_section(
        &self,
        name: &str,
        title: &str,
        data: ArrayView2<'_, f64>,
        x_axis: &Array1<f64>,
        y_axis: &Array1<f64>,
        y_desc: &str,
        gradient: &dyn colorgrad::Gradient,
        symmetric: bool,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let path = format!("{}/{}.png", self.output_dir, name);
        let root = BitMapBackend::new(&path, (self.width, self.height)).into_drawing_area();
        root.fill(&WHITE)?;

        let (n_rows, n_cols) = data.dim();
        let (min_val, max_val) = if symmetric {
            // Amplitude-like data gets a range centered on zero
            let max_abs = data.iter().map(|&v| v.abs()).fold(0.0_f64, f64::max);
            (-max_abs, max_abs)
        } else {
            let lo = data.iter().copied().fold(f64::INFINITY, f64::min);
            let hi = data.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            (lo, hi)
        };

        let x_min = x_axis[0];
        let x_max = x_axis[n_cols - 1];
        let y_min = y_axis[0];
        let y_max = y_axis[n_rows - 1];

        let mut chart = ChartBuilder::on(&root)
            .caption(title, ("sans-serif", 30))
            .margin(10)
            .x_label_area_size(40)
            .y_label_area_size(60)
            // Depth and time increase downwards
            .build_cartesian_2d(x_min..x_max, y_max..y_min)?;

        chart
            .configure_mesh()
            .x_desc("X Distance (m)")
            .y_desc(y_desc)
            .draw()?;

        // One rectangle per cell; dense time axes are strided so the cell
        // count stays bounded by the image height.
        let row_step = (n_rows / self.height as usize).max(1);
        for i in (0..n_rows).step_by(row_step) {
            let y0 = y_axis[i];
            let y1 = y_axis[(i + row_step).min(n_rows - 1)];
            for j in 0..n_cols {
                let x0 = x_axis[j];
                let x1 = if j + 1 < n_cols { x_axis[j + 1] } else { x_max };
                let color = self.value_to_color(gradient, data[[i, j]], min_val, max_val);
                chart.draw_series(std::iter::once(Rectangle::new(
                    [(x0, y0), (x1, y1)],
                    color.filled(),
                )))?;
            }
        }

        root.present()?;
        println!("Saved section: {}", path);
        Ok(())
    }

    fn value_to_color(
        &self,
        gradient: &dyn colorgrad::Gradient,
        value: f64,
        min_val: f64,
        max_val: f64,
    ) -> RGBColor {
        let normalized = if max_val > min_val {
            (value - min_val) / (max_val - min_val)
        } else {
            0.5
        };
        let normalized = normalized.clamp(0.0, 1.0);
        let color_rgba = gradient.at(normalized as f32).to_rgba8();
        RGBColor(color_rgba[0], color_rgba[1], color_rgba[2])
    }
}

impl Renderer for SectionVisualiser {
    fn render(&self, section: &SyntheticSection) -> Result<(), Box<dyn std::error::Error>> {
        std::fs::create_dir_all(&self.output_dir)?;
        self.plot_section(
            "impedance",
            "P-wave Impedance",
            section.ai.view(),
            &section.x_axis,
            &section.y_axis,
            "Depth (m)",
            &*self.impedance_gradient,
            false,
        )?;
        self.plot_section(
            "rc_time",
            "RC Data on Full Time Grid",
            section.rc_time.view(),
            &section.x_axis,
            &section.time_axis,
            "Two-Way Time (ms)",
            &*self.amplitude_gradient,
            true,
        )?;
        self.plot_section(
            "seis_time",
            "Seismic in Time Domain",
            section.seis_time.view(),
            &section.x_axis,
            &section.time_axis,
            "Two-Way Time (ms)",
            &*self.amplitude_gradient,
            true,
        )?;
        self.plot_section(
            "seis_depth",
            "Seismic in Depth Domain",
            section.seis_depth.view(),
            &section.x_axis,
            &section.y_axis,
            "Depth (m)",
            &*self.amplitude_gradient,
            true,
        )?;
        Ok(())
    }
}
