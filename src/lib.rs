//! Generation of periodic waveforms (sine, square, triangle and sawtooth) from their
//! wavelength, amplitude and phase.
//!
//! A [Waveform] can be evaluated at any point in time, or started as a [Flow]: a stream of
//! samples taken every few milliseconds by a background thread, until the flow is stopped.
//! Handy for stub telemetry, sample metrics and any other synthetic time series.
//!
//! ```rust
//! # use waveflow::Waveform;
//! # fn main() -> Result<(), waveflow::WaveformError> {
//! let wave = Waveform::new(50.0, 1.0, 0.0); // wavelength: 50, amplitude: 1, phase: 0
//! assert_eq!(wave.square(40.0), -1.0);
//!
//! let flow = wave.sawtooth_flow(1)?;
//! let samples: Vec<f64> = flow.take(3).collect();
//! wave.stop_flow();
//! # assert_eq!(samples.len(), 3);
//! # Ok(())
//! # }
//! ```

mod error;
mod flow;
mod waveform;

pub use error::WaveformError;
pub use flow::{Clock, Flow, SteppedClock, SystemClock};
pub use waveform::{
    sawtooth, sine, square, triangle, Generator, WaveParams, WaveShape, Waveform, WaveformBuilder,
};
