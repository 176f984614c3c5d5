mod waveform;
mod waveform_math;

pub use waveform::{Waveform, WaveformBuilder};
pub use waveform_math::{sawtooth, sine, square, triangle, Generator, WaveParams, WaveShape};
