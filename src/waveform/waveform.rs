use crate::error::WaveformError;
use crate::flow::{Clock, Flow, FlowController, SystemClock};
use crate::waveform::{WaveParams, WaveShape};
use std::fmt;
use std::sync::Arc;

/// A periodic signal defined by its wavelength, amplitude and phase. It can be sampled at any
/// point in time, or started as a timed [Flow] of samples.
///
/// # Usage
/// [Waveform::new] takes the parameters as they are. To get them validated, or to change the
/// clock the flows are timed with, use the [WaveformBuilder] instead.
///
/// ```rust
/// # use waveflow::Waveform;
/// # fn main() -> Result<(), waveflow::WaveformError> {
/// let wave = Waveform::new(50.0, 1.0, 0.0); // wavelength: 50, amplitude: 1, phase: 0
/// let value = wave.sine(13.0);
///
/// let flow = wave.sine_flow(10)?; // one sample every 10 ms
/// for sample in flow.take(5) {
///     println!("{}", sample);
/// }
/// wave.stop_flow();
/// # Ok(())
/// # }
/// ```
///
/// # Parameters
/// * **Wavelength (λ)**: length of a period, in the unit of the time `t`. Flows use
/// milliseconds since the Unix epoch, so a wavelength of 1000 repeats every second.
/// * **Amplitude (A)**: peak value of the wave. Every shape stays within `[-A, A]`.
/// * **Phase (φ)**: offset of the origin of the wave.
///
/// # Flows
/// At most one flow runs at a time. Starting a second one fails with
/// [AlreadyRunning](WaveformError::AlreadyRunning) until [stop_flow](Waveform::stop_flow) is
/// called. The waveform can be shared among threads; concurrent starts are serialized.
/// Dropping the waveform stops its flow.
pub struct Waveform {
    params: WaveParams,
    /// Timestamp source of the flows
    clock: Arc<dyn Clock>,
    flow: FlowController,
    /// Name of the waveform (logging)
    name: String,
}

impl Waveform {
    /// Creates a waveform without checking the parameters. A zero wavelength yields `NaN` or
    /// infinite samples.
    pub fn new(wavelength: f64, amplitude: f64, phase: f64) -> Self {
        Self {
            params: WaveParams {
                wavelength,
                amplitude,
                phase,
            },
            clock: Arc::new(SystemClock),
            flow: FlowController::new(),
            name: DEFAULT_NAME.to_string(),
        }
    }

    pub fn get_params(&self) -> WaveParams {
        self.params
    }

    pub fn get_wavelength(&self) -> f64 {
        self.params.wavelength
    }

    pub fn get_amplitude(&self) -> f64 {
        self.params.amplitude
    }

    pub fn get_phase(&self) -> f64 {
        self.params.phase
    }

    pub fn get_name(&self) -> String {
        self.name.clone()
    }

    /// Value of the given shape at time `t`.
    pub fn evaluate(&self, shape: WaveShape, t: f64) -> f64 {
        shape.evaluate(&self.params, t)
    }

    pub fn sine(&self, t: f64) -> f64 {
        self.evaluate(WaveShape::Sine, t)
    }

    pub fn square(&self, t: f64) -> f64 {
        self.evaluate(WaveShape::Square, t)
    }

    pub fn triangle(&self, t: f64) -> f64 {
        self.evaluate(WaveShape::Triangle, t)
    }

    pub fn sawtooth(&self, t: f64) -> f64 {
        self.evaluate(WaveShape::Sawtooth, t)
    }

    /// Starts producing a sample of `shape` every `interval_millis` milliseconds. Each sample
    /// is the value of the wave at the time (read from the clock) its tick fired.
    ///
    /// Returns right away; samples are produced in a background thread until
    /// [stop_flow](Waveform::stop_flow) is called.
    ///
    /// # Expected errors
    /// * [AlreadyRunning](WaveformError::AlreadyRunning): a flow is running already. No new flow
    /// gets created.
    /// * [InvalidInterval](WaveformError::InvalidInterval): `interval_millis` is zero.
    /// * [ProducerSpawn](WaveformError::ProducerSpawn): the thread could not be spawned.
    pub fn start_flow(
        &self,
        shape: WaveShape,
        interval_millis: u64,
    ) -> Result<Flow, WaveformError> {
        self.flow.start(
            &self.name,
            shape,
            self.params,
            Arc::clone(&self.clock),
            interval_millis,
        )
    }

    pub fn sine_flow(&self, interval_millis: u64) -> Result<Flow, WaveformError> {
        self.start_flow(WaveShape::Sine, interval_millis)
    }

    pub fn square_flow(&self, interval_millis: u64) -> Result<Flow, WaveformError> {
        self.start_flow(WaveShape::Square, interval_millis)
    }

    pub fn triangle_flow(&self, interval_millis: u64) -> Result<Flow, WaveformError> {
        self.start_flow(WaveShape::Triangle, interval_millis)
    }

    pub fn sawtooth_flow(&self, interval_millis: u64) -> Result<Flow, WaveformError> {
        self.start_flow(WaveShape::Sawtooth, interval_millis)
    }

    /// Ends the generation of the signal and closes the running [Flow].
    ///
    /// Safe to call at any time, running or not. A sample whose delivery is still pending
    /// gets dropped; once this returns, no more samples are delivered.
    pub fn stop_flow(&self) {
        self.flow.stop();
    }

    pub fn is_running(&self) -> bool {
        self.flow.is_running()
    }
}

impl fmt::Debug for Waveform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Waveform")
            .field("name", &self.name)
            .field("params", &self.params)
            .field("running", &self.is_running())
            .finish()
    }
}

const DEFAULT_NAME: &str = "Waveform";
const DEFAULT_WAVELENGTH: f64 = 1000.0;
const DEFAULT_AMPLITUDE: f64 = 1.0;
const DEFAULT_PHASE: f64 = 0.0;

/// The [WaveformBuilder] is the checked way of creating a [Waveform].
/// # Usage
/// ```rust
/// # use waveflow::WaveformBuilder;
/// # fn main() -> Result<(), waveflow::WaveformError> {
/// let wave = WaveformBuilder::new().build()?; // Default waveform
///
/// let wave = WaveformBuilder::new() // With most values
///     .with_wavelength(50.0)
///     .with_amplitude(2.5)
///     .with_phase(std::f64::consts::PI)
///     .with_name("Temperature")
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct WaveformBuilder {
    wavelength: Option<f64>,
    amplitude: Option<f64>,
    phase: Option<f64>,
    clock: Option<Arc<dyn Clock>>,
    name: Option<String>,
}

impl WaveformBuilder {
    /// Sets the defaults for the waveform (no parameters).
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_wavelength(mut self, wavelength: f64) -> Self {
        self.wavelength = Some(wavelength);
        self
    }

    pub fn with_amplitude(mut self, amplitude: f64) -> Self {
        self.amplitude = Some(amplitude);
        self
    }

    pub fn with_phase(mut self, phase: f64) -> Self {
        self.phase = Some(phase);
        self
    }

    /// Sets the clock the flows read their timestamps from.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    /// Tries to generate a Waveform from the given configuration.
    ///
    /// # Default values:
    /// * Wavelength: 1000
    /// * Amplitude: 1.0
    /// * Phase: 0.0
    /// * Clock: [SystemClock]
    ///
    /// # Expected errors
    /// * [InvalidParameter](WaveformError::InvalidParameter): a parameter is not finite, or the
    /// wavelength is not strictly positive.
    pub fn build(self) -> Result<Waveform, WaveformError> {
        let wavelength = self.wavelength.unwrap_or(DEFAULT_WAVELENGTH);
        let amplitude = self.amplitude.unwrap_or(DEFAULT_AMPLITUDE);
        let phase = self.phase.unwrap_or(DEFAULT_PHASE);

        if !wavelength.is_finite() || wavelength <= 0.0 {
            return Err(WaveformError::InvalidParameter {
                name: "wavelength",
                value: wavelength,
            });
        }

        if !amplitude.is_finite() {
            return Err(WaveformError::InvalidParameter {
                name: "amplitude",
                value: amplitude,
            });
        }

        if !phase.is_finite() {
            return Err(WaveformError::InvalidParameter {
                name: "phase",
                value: phase,
            });
        }

        let mut waveform = Waveform::new(wavelength, amplitude, phase);

        if let Some(clock) = self.clock {
            waveform.clock = clock;
        }

        if let Some(name) = self.name {
            waveform.name = name;
        }

        Ok(waveform)
    }
}

#[cfg(test)]
mod waveform_builder_tests {
    use super::*;
    use simplelog::__private::paris::Logger;

    fn get_logger() -> Logger<'static> {
        Logger::new()
    }

    #[test]
    fn test_empty() {
        let mut logger = get_logger();
        logger.info("<b>Running test for waveform builder with no arguments</>");

        let wave = WaveformBuilder::new().build().unwrap();

        assert_eq!(wave.get_wavelength(), 1000.0, "Default wavelength differs");
        assert_eq!(wave.get_amplitude(), 1.0, "Default amplitude differs");
        assert_eq!(wave.get_phase(), 0.0, "Default phase differs");
        assert_eq!(wave.get_name(), "Waveform", "Default name differs");
        assert!(!wave.is_running(), "Fresh waveform is running");
    }

    #[test]
    fn test_all_fields() {
        let wave = WaveformBuilder::new()
            .with_wavelength(50.0)
            .with_amplitude(0.5)
            .with_phase(1.0)
            .with_name("Pressure")
            .build()
            .unwrap();

        assert_eq!(
            wave.get_params(),
            WaveParams {
                wavelength: 50.0,
                amplitude: 0.5,
                phase: 1.0,
            },
            "Parameters differ"
        );
        assert_eq!(wave.get_name(), "Pressure", "Name differs");
    }

    #[test]
    fn test_invalid_wavelength() {
        for wavelength in [0.0, -50.0, f64::NAN, f64::INFINITY] {
            let result = WaveformBuilder::new().with_wavelength(wavelength).build();

            assert!(
                matches!(
                    result,
                    Err(WaveformError::InvalidParameter {
                        name: "wavelength",
                        ..
                    })
                ),
                "Wavelength {} accepted",
                wavelength
            );
        }
    }

    #[test]
    fn test_invalid_amplitude_and_phase() {
        let result = WaveformBuilder::new().with_amplitude(f64::NAN).build();
        assert!(matches!(
            result,
            Err(WaveformError::InvalidParameter {
                name: "amplitude",
                ..
            })
        ));

        let result = WaveformBuilder::new()
            .with_phase(f64::NEG_INFINITY)
            .build();
        assert!(matches!(
            result,
            Err(WaveformError::InvalidParameter { name: "phase", .. })
        ));
    }

    #[test]
    fn test_with_clock() {
        let wave = WaveformBuilder::new()
            .with_wavelength(50.0)
            .with_clock(Arc::new(crate::flow::SteppedClock::new(1.0, 12.0)))
            .build()
            .unwrap();

        let flow = wave.sine_flow(1).unwrap();
        let samples: Vec<f64> = flow.take(2).collect();
        wave.stop_flow();

        assert_eq!(samples, vec![wave.sine(1.0), wave.sine(13.0)]);
    }
}

#[cfg(test)]
mod waveform_tests {
    use super::*;
    use simplelog::__private::paris::Logger;
    use std::f64::consts::PI;
    use std::thread;
    use std::time::Duration;

    const TOLERANCE: f64 = 1.0e-5;

    #[test]
    fn test_point_evaluation() {
        let wave = Waveform::new(50.0, 1.0, 0.0);

        assert!((wave.sine(13.0) - 0.99802).abs() < TOLERANCE);
        assert_eq!(wave.square(40.0), -1.0);
        assert!((wave.triangle(40.0) - -0.8).abs() < TOLERANCE);
        assert!((wave.sawtooth(24.0) - 0.96).abs() < TOLERANCE);
        assert_eq!(wave.evaluate(WaveShape::Sine, 1.0), wave.sine(1.0));
    }

    #[test]
    fn test_permissive_constructor() {
        let wave = Waveform::new(0.0, 1.0, 0.0);

        assert!(wave.sine(1.0).is_nan());
    }

    #[test]
    fn test_stopped() {
        let wave = Waveform::new(50.0, 1.0, 0.0);

        assert!(!wave.is_running());
    }

    #[test]
    fn test_stop_never_started() {
        let wave = Waveform::new(50.0, 1.0, 0.0);

        wave.stop_flow();
        wave.stop_flow();

        assert!(!wave.is_running());
    }

    #[test]
    fn test_already_running() {
        let wave = Waveform::new(50.0, 1.0, 0.0);

        let _flow = wave.sine_flow(10).unwrap();
        assert!(wave.is_running());

        let second = wave.square_flow(10);
        assert!(matches!(second, Err(WaveformError::AlreadyRunning)));
        assert!(wave.is_running(), "Rejected start stopped the running flow");

        wave.stop_flow();
        assert!(!wave.is_running());
    }

    #[test]
    fn test_restart() {
        let wave = Waveform::new(50.0, 1.0, 0.0);

        let first = wave.sine_flow(1).unwrap();
        assert!(first.recv().is_some());
        wave.stop_flow();
        assert_eq!(first.recv(), None, "Stopped flow still delivers");

        let second = wave.triangle_flow(1).unwrap();
        assert_eq!(second.shape(), WaveShape::Triangle);
        assert!(second.recv().is_some());
    }

    #[test]
    fn test_concurrent_starts() {
        let wave = Arc::new(Waveform::new(50.0, 1.0, 0.0));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let wave = Arc::clone(&wave);
                thread::spawn(move || wave.sine_flow(10).is_ok())
            })
            .collect();

        let started = handles
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .filter(|ok| *ok)
            .count();

        assert_eq!(started, 1, "More than one flow started");
        wave.stop_flow();
    }

    #[test]
    fn test_drop_stops_flow() {
        let wave = Waveform::new(50.0, 1.0, 0.0);
        let flow = wave.sine_flow(1).unwrap();

        drop(wave);

        assert_eq!(flow.recv(), None, "Flow outlived its waveform");
    }

    /// Consumes `shape` every 10 ms for a second and returns the (min, max) seen.
    fn run_for_a_second(wave: &Waveform, shape: WaveShape) -> (f64, f64, usize) {
        let flow = wave.start_flow(shape, 10).unwrap();

        let consumer = thread::spawn(move || {
            let mut min = f64::MAX;
            let mut max = f64::MIN;
            let mut count = 0;

            for value in flow {
                min = min.min(value);
                max = max.max(value);
                count += 1;
            }

            (min, max, count)
        });

        thread::sleep(Duration::from_secs(1));
        wave.stop_flow();

        consumer.join().unwrap()
    }

    #[test]
    fn test_flows() {
        let mut logger = Logger::new();
        let amp = 1.0;

        for shape in WaveShape::ALL {
            logger.info(format!("<b>Running a one second <cyan>{}</> flow</>", shape));

            let wave = Waveform::new(1000.0, amp, PI);
            let (min, max, count) = run_for_a_second(&wave, shape);

            assert!(count > 0, "No {} samples delivered", shape);

            match shape {
                WaveShape::Square => {
                    assert!(min >= -amp, "{} below range: {}", shape, min);
                    assert!(max <= amp, "{} above range: {}", shape, max);
                }
                _ => {
                    assert!(min > -amp, "{} below range: {}", shape, min);
                    assert!(max < amp, "{} above range: {}", shape, max);
                }
            }
        }
    }
}
