use crate::error::{ModelError, ModelResult};
use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::fs;

/// Time grid configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeGridConfig {
    /// Sampling interval of the shared time axis (ms)
    #[serde(default = "default_dt")]
    pub dt: f64,
}

fn default_dt() -> f64 {
    0.02
}

impl Default for TimeGridConfig {
    fn default() -> Self {
        TimeGridConfig { dt: default_dt() }
    }
}

impl TimeGridConfig {
    fn validate(&self) -> ModelResult<()> {
        if !self.dt.is_finite() || self.dt <= 0.0 {
            return Err(ModelError::InvalidConfiguration(format!(
                "time sampling interval must be positive, got {} ms",
                self.dt
            )));
        }
        Ok(())
    }
}

/// Wavelet configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaveletConfig {
    /// Central frequency of the Ricker wavelet (Hz). Higher frequency
    /// sharpens time resolution at the cost of bandwidth.
    #[serde(default = "default_frequency")]
    pub frequency: f64,
}

fn default_frequency() -> f64 {
    4000.0
}

impl Default for WaveletConfig {
    fn default() -> Self {
        WaveletConfig {
            frequency: default_frequency(),
        }
    }
}

impl WaveletConfig {
    fn validate(&self) -> ModelResult<()> {
        if !self.frequency.is_finite() || self.frequency <= 0.0 {
            return Err(ModelError::InvalidConfiguration(format!(
                "wavelet frequency must be positive, got {} Hz",
                self.frequency
            )));
        }
        Ok(())
    }
}

/// One constant-property layer of the demo model, extending down to
/// `base_depth` from the previous layer's base (or the surface).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayerConfig {
    pub base_depth: f64, // meters
    pub vp: f64,         // m/s
    pub rhob: f64,       // kg/m³
}

/// Demo layered-model configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    #[serde(default = "default_nx")]
    pub nx: usize,
    #[serde(default = "default_ny")]
    pub ny: usize,
    /// Trace spacing (m)
    #[serde(default = "default_x_spacing")]
    pub x_spacing: f64,
    /// Depth sample spacing (m)
    #[serde(default = "default_y_spacing")]
    pub y_spacing: f64,
    #[serde(default = "default_layers")]
    pub layers: Vec<LayerConfig>,
}

fn default_nx() -> usize {
    300
}

fn default_ny() -> usize {
    200
}

fn default_x_spacing() -> f64 {
    10.0
}

fn default_y_spacing() -> f64 {
    0.5
}

fn default_layers() -> Vec<LayerConfig> {
    vec![
        LayerConfig {
            base_depth: 30.0,
            vp: 1800.0,
            rhob: 2000.0,
        },
        LayerConfig {
            base_depth: 65.0,
            vp: 2400.0,
            rhob: 2300.0,
        },
        LayerConfig {
            base_depth: 100.0,
            vp: 3200.0,
            rhob: 2550.0,
        },
    ]
}

impl Default for ModelConfig {
    fn default() -> Self {
        ModelConfig {
            nx: default_nx(),
            ny: default_ny(),
            x_spacing: default_x_spacing(),
            y_spacing: default_y_spacing(),
            layers: default_layers(),
        }
    }
}

impl ModelConfig {
    fn validate(&self) -> ModelResult<()> {
        if self.nx == 0 || self.ny == 0 {
            return Err(ModelError::InvalidConfiguration(format!(
                "model dimensions must be positive (nx={}, ny={})",
                self.nx, self.ny
            )));
        }
        if self.x_spacing <= 0.0 || self.y_spacing <= 0.0 {
            return Err(ModelError::InvalidConfiguration(format!(
                "model spacing must be positive (x_spacing={}, y_spacing={})",
                self.x_spacing, self.y_spacing
            )));
        }
        if self.layers.is_empty() {
            return Err(ModelError::InvalidConfiguration(
                "at least one layer must be defined".to_string(),
            ));
        }
        let mut previous_base = 0.0;
        for (i, layer) in self.layers.iter().enumerate() {
            if layer.vp <= 0.0 || layer.rhob <= 0.0 {
                return Err(ModelError::InvalidConfiguration(format!(
                    "layer {} properties must be positive (vp={}, rhob={})",
                    i, layer.vp, layer.rhob
                )));
            }
            if layer.base_depth <= previous_base {
                return Err(ModelError::InvalidConfiguration(format!(
                    "layer {} base depth {} does not increase past {}",
                    i, layer.base_depth, previous_base
                )));
            }
            previous_base = layer.base_depth;
        }
        Ok(())
    }
}

/// Visualization configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisualizationConfig {
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
    #[serde(default = "default_image_width")]
    pub image_width: u32,
    #[serde(default = "default_image_height")]
    pub image_height: u32,
}

fn default_output_dir() -> String {
    "output".to_string()
}

fn default_image_width() -> u32 {
    1200
}

fn default_image_height() -> u32 {
    1000
}

impl Default for VisualizationConfig {
    fn default() -> Self {
        VisualizationConfig {
            output_dir: default_output_dir(),
            image_width: default_image_width(),
            image_height: default_image_height(),
        }
    }
}

impl VisualizationConfig {
    fn validate(&self) -> ModelResult<()> {
        if self.output_dir.is_empty() {
            return Err(ModelError::InvalidConfiguration(
                "output_dir must not be empty".to_string(),
            ));
        }
        if self.image_width == 0 || self.image_height == 0 {
            return Err(ModelError::InvalidConfiguration(format!(
                "image dimensions must be positive (width={}, height={})",
                self.image_width, self.image_height
            )));
        }
        Ok(())
    }
}

/// Complete modelling configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub time: TimeGridConfig,
    #[serde(default)]
    pub wavelet: WaveletConfig,
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub visualization: VisualizationConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| anyhow!("Failed to read config file '{}': {}", path, e))?;

        let config: Config =
            toml::from_str(&content).map_err(|e| anyhow!("Failed to parse TOML config: {}", e))?;

        config.validate()?;

        Ok(config)
    }

    /// Validate all configuration parameters
    pub fn validate(&self) -> ModelResult<()> {
        self.time.validate()?;
        self.wavelet.validate()?;
        self.model.validate()?;
        self.visualization.validate()?;
        Ok(())
    }

    /// Print configuration summary
    pub fn print_summary(&self) {
        println!("=== Modelling Configuration ===");
        println!(
            "Model: {} traces x {} depth samples ({} x {} m)",
            self.model.nx,
            self.model.ny,
            self.model.nx as f64 * self.model.x_spacing,
            self.model.ny as f64 * self.model.y_spacing
        );
        println!("Layers: {}", self.model.layers.len());
        for (i, layer) in self.model.layers.iter().enumerate() {
            println!(
                "  Layer {}: down to {} m, Vp={} m/s, ρ={} kg/m³",
                i, layer.base_depth, layer.vp, layer.rhob
            );
        }
        println!("Time grid: dt={} ms", self.time.dt);
        println!("Wavelet: f={} Hz", self.wavelet.frequency);
        println!(
            "Visualization: {}x{} PNGs in {}/",
            self.visualization.image_width,
            self.visualization.image_height,
            self.visualization.output_dir
        );
        println!("===============================");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.time.dt, 0.02);
        assert_eq!(config.wavelet.frequency, 4000.0);
    }

    #[test]
    fn partial_toml_fills_in_defaults() {
        let config: Config = toml::from_str(
            r#"
            [time]
            dt = 0.05

            [wavelet]
            frequency = 250.0
            "#,
        )
        .unwrap();
        assert_eq!(config.time.dt, 0.05);
        assert_eq!(config.wavelet.frequency, 250.0);
        assert_eq!(config.model.nx, 300);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_dt_is_rejected() {
        let mut config = Config::default();
        config.time.dt = 0.0;
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ModelError::InvalidConfiguration(_)));
    }

    #[test]
    fn negative_frequency_is_rejected() {
        let mut config = Config::default();
        config.wavelet.frequency = -40.0;
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ModelError::InvalidConfiguration(_)));
    }

    #[test]
    fn layers_must_deepen() {
        let mut config = Config::default();
        config.model.layers[1].base_depth = config.model.layers[0].base_depth;
        assert!(config.validate().is_err());
    }

    #[test]
    fn empty_layer_list_is_rejected() {
        let mut config = Config::default();
        config.model.layers.clear();
        assert!(config.validate().is_err());
    }
}
