use crate::config::Config;
use crate::error::{ModelError, ModelResult};
use crate::grid::TimeAxis;
use crate::impedance::ImpedanceSection;
use crate::model::EarthModel;
use crate::traveltime::TravelTime;
use crate::wavelet::ricker;
use ndarray::{Array1, Array2, ArrayView1};
use rayon::prelude::*;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Signals a running pipeline to stop. Checked once per trace; a trace
/// already in flight runs to completion.
#[derive(Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        CancelToken::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// The pipeline outputs: impedance in depth, reflectivity and synthetic
/// seismic on the shared time axis, and the synthetic projected back to
/// depth, plus the axes that label them.
#[derive(Debug)]
pub struct SyntheticSection {
    pub ai: Array2<f64>,
    pub rc_time: Array2<f64>,
    pub seis_time: Array2<f64>,
    pub seis_depth: Array2<f64>,
    pub x_axis: Array1<f64>,
    pub y_axis: Array1<f64>,
    pub time_axis: Array1<f64>,
}

/// Scatter a trace's depth-indexed reflection coefficients onto the shared
/// time axis by nearest-sample assignment. Samples whose travel time falls
/// outside the axis are skipped; unwritten bins stay zero. When two depth
/// samples land in the same bin the deeper one wins: the scatter
/// overwrites, it does not accumulate.
pub fn scatter_trace(
    rc: ArrayView1<'_, f64>,
    twt: ArrayView1<'_, f64>,
    axis: &TimeAxis,
) -> Vec<f64> {
    let mut out = vec![0.0; axis.len()];
    for (&coefficient, &t_ms) in rc.iter().zip(twt.iter()) {
        if let Some(bin) = axis.nearest_bin(t_ms) {
            out[bin] = coefficient;
        }
    }
    out
}

/// Convolve a signal with a kernel, keeping the output the same length as
/// the signal: a reflectivity spike at bin k produces the kernel's peak at
/// bin k, not shifted by the kernel's half-length.
pub fn convolve_same(signal: &[f64], kernel: &[f64]) -> Vec<f64> {
    let n = signal.len();
    let m = kernel.len();
    if n == 0 || m == 0 {
        return vec![0.0; n];
    }
    let offset = (m - 1) / 2;
    let mut out = vec![0.0; n];
    for (k, slot) in out.iter_mut().enumerate() {
        // Index into the full-length convolution, centered on the signal
        let s = k + offset;
        let j_lo = s.saturating_sub(m - 1);
        let j_hi = s.min(n - 1);
        let mut acc = 0.0;
        for j in j_lo..=j_hi {
            acc += signal[j] * kernel[s - j];
        }
        *slot = acc;
    }
    out
}

/// Project a time-domain trace back onto its depth samples by evaluating a
/// piecewise-linear interpolant of the trace at each sample's travel time.
/// Times outside the axis yield amplitude zero.
pub fn remap_trace(seis: &[f64], twt: ArrayView1<'_, f64>, axis: &TimeAxis) -> Vec<f64> {
    twt.iter().map(|&t_ms| sample_linear(seis, axis, t_ms)).collect()
}

fn sample_linear(seis: &[f64], axis: &TimeAxis, t_ms: f64) -> f64 {
    if !(t_ms >= 0.0) || t_ms > axis.t_max() || seis.is_empty() {
        return 0.0;
    }
    let pos = t_ms / axis.dt();
    let i0 = pos.floor() as usize;
    if i0 + 1 >= seis.len() {
        return seis[seis.len() - 1];
    }
    let frac = pos - i0 as f64;
    seis[i0] + frac * (seis[i0 + 1] - seis[i0])
}

/// Runs the full depth-to-time-to-depth forward model over an earth model.
/// Traces are independent tasks; the only barrier is the travel-time
/// reduction that sizes the shared axis.
pub struct SynthesisPipeline<'a> {
    model: &'a EarthModel,
    dt_ms: f64,
    frequency_hz: f64,
    cancel: CancelToken,
}

impl<'a> SynthesisPipeline<'a> {
    pub fn new(model: &'a EarthModel, config: &Config) -> Self {
        SynthesisPipeline {
            model,
            dt_ms: config.time.dt,
            frequency_hz: config.wavelet.frequency,
            cancel: CancelToken::new(),
        }
    }

    /// Handle for cancelling this run from another thread.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn run(&self) -> ModelResult<SyntheticSection> {
        let (ny, nx) = (self.model.ny(), self.model.nx());
        println!("Building synthetic section...");
        println!("Model: {} depth samples x {} traces", ny, nx);

        // Depth-domain stages
        let impedance = ImpedanceSection::from_model(self.model)?;
        let travel = TravelTime::from_model(self.model)?;
        println!(
            "Global max TWT across all traces = {:.2} ms",
            travel.global_tmax()
        );

        // Shared axis, sized by the slowest trace
        let axis = TimeAxis::new(travel.global_tmax(), self.dt_ms)?;
        println!(
            "Time axis: {} samples at dt = {} ms",
            axis.len(),
            axis.dt()
        );

        let wavelet = ricker(
            travel.global_tmax() + self.dt_ms,
            self.dt_ms,
            self.frequency_hz,
        )?
        .to_vec();

        // Per-trace synthesis: scatter, convolve, remap. Each task owns its
        // output columns; the grids are assembled afterwards.
        let traces: Vec<(Vec<f64>, Vec<f64>, Vec<f64>)> = (0..nx)
            .into_par_iter()
            .map(|ix| -> ModelResult<(Vec<f64>, Vec<f64>, Vec<f64>)> {
                if self.cancel.is_cancelled() {
                    return Err(ModelError::Cancelled);
                }
                let rc_col = impedance.rc().column(ix);
                let twt_col = travel.twt().column(ix);
                let rc_time = scatter_trace(rc_col, twt_col, &axis);
                let seis_time = convolve_same(&rc_time, &wavelet);
                let seis_depth = remap_trace(&seis_time, twt_col, &axis);
                Ok((rc_time, seis_time, seis_depth))
            })
            .collect::<ModelResult<_>>()?;

        let nt = axis.len();
        let mut rc_time = Array2::zeros((nt, nx));
        let mut seis_time = Array2::zeros((nt, nx));
        let mut seis_depth = Array2::zeros((ny, nx));
        for (ix, (rc_col, seis_col, depth_col)) in traces.into_iter().enumerate() {
            rc_time.column_mut(ix).assign(&Array1::from(rc_col));
            seis_time.column_mut(ix).assign(&Array1::from(seis_col));
            seis_depth.column_mut(ix).assign(&Array1::from(depth_col));
        }
        println!("Synthesis complete!");

        let (ai, _) = impedance.into_parts();
        Ok(SyntheticSection {
            ai,
            rc_time,
            seis_time,
            seis_depth,
            x_axis: self.model.x_axis(),
            y_axis: self.model.y_axis(),
            time_axis: axis.values(),
        })
    }
}
