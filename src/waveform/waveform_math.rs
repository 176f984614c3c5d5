use crate::error::WaveformError;
use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

/// A periodic waveform generator function, called as `(wavelength, amplitude, phase, t)`.
pub type Generator = fn(f64, f64, f64, f64) -> f64;

/// `amplitude * sin((2π·t − phase) / wavelength)`
pub fn sine(wavelength: f64, amplitude: f64, phase: f64, t: f64) -> f64 {
    amplitude * ((2.0 * PI * t - phase) / wavelength).sin()
}

/// `amplitude` during the first half of every period, `-amplitude` during the second one.
pub fn square(wavelength: f64, amplitude: f64, phase: f64, t: f64) -> f64 {
    if (t - phase).rem_euclid(wavelength) < wavelength / 2.0 {
        amplitude
    } else {
        -amplitude
    }
}

/// `(2·amplitude/π) · asin(sin((2π·t − phase) / wavelength))`
pub fn triangle(wavelength: f64, amplitude: f64, phase: f64, t: f64) -> f64 {
    2.0 * amplitude / PI * ((2.0 * PI * t - phase) / wavelength).sin().asin()
}

/// `(2·amplitude/π) · atan(tan((2π·t − phase) / (2·wavelength)))`
pub fn sawtooth(wavelength: f64, amplitude: f64, phase: f64, t: f64) -> f64 {
    2.0 * amplitude / PI * ((2.0 * PI * t - phase) / (2.0 * wavelength)).tan().atan()
}

/// The parameters every waveform shape is evaluated with.
///
/// None of them is checked here: a zero `wavelength` simply produces `NaN` or infinite samples.
/// Use the [WaveformBuilder](struct@crate::WaveformBuilder) to get validated values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaveParams {
    /// Length of a period, in the same unit as the time `t`.
    pub wavelength: f64,
    /// Peak value of the wave.
    pub amplitude: f64,
    /// Offset of the wave origin, in the unit of `t`.
    pub phase: f64,
}

/// The shapes a waveform can take. Each one maps to one of the pure functions of this module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WaveShape {
    Sine,
    Square,
    Triangle,
    Sawtooth,
}

impl WaveShape {
    pub const ALL: [WaveShape; 4] = [
        WaveShape::Sine,
        WaveShape::Square,
        WaveShape::Triangle,
        WaveShape::Sawtooth,
    ];

    /// The function implementing this shape.
    pub fn generator(&self) -> Generator {
        use WaveShape::*;

        match self {
            Sine => sine,
            Square => square,
            Triangle => triangle,
            Sawtooth => sawtooth,
        }
    }

    /// Value of the shape at time `t`.
    pub fn evaluate(&self, params: &WaveParams, t: f64) -> f64 {
        (self.generator())(params.wavelength, params.amplitude, params.phase, t)
    }

    pub fn name(&self) -> &'static str {
        match self {
            WaveShape::Sine => "sine",
            WaveShape::Square => "square",
            WaveShape::Triangle => "triangle",
            WaveShape::Sawtooth => "sawtooth",
        }
    }
}

impl fmt::Display for WaveShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for WaveShape {
    type Err = WaveformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sine" | "sin" => Ok(WaveShape::Sine),
            "square" | "sqr" => Ok(WaveShape::Square),
            "triangle" | "tri" => Ok(WaveShape::Triangle),
            "sawtooth" | "saw" => Ok(WaveShape::Sawtooth),
            _ => Err(WaveformError::UnknownShape(s.to_string())),
        }
    }
}
