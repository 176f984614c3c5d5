use crate::error::WaveformError;
use crate::flow::Clock;
use crate::waveform::{WaveParams, WaveShape};
use crossbeam::channel::{bounded, tick, Receiver, RecvTimeoutError, Sender, TryRecvError};
use crossbeam::select;
use simplelog::{debug, error, info};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// The consuming end of a running waveform: one sample per tick, in tick order.
///
/// Iterating blocks until the next sample is produced. The iterator ends once the flow has
/// been stopped (or its [Waveform](struct@crate::Waveform) dropped). A flow cannot be
/// resumed; start a new one instead.
///
/// Samples are handed over without buffering: as long as nobody reads, the producer waits and
/// the following ticks are skipped.
#[derive(Debug)]
pub struct Flow {
    samples: Receiver<f64>,
    shape: WaveShape,
    interval: Duration,
}

impl Flow {
    pub fn shape(&self) -> WaveShape {
        self.shape
    }

    /// Time between two ticks.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Waits for the next sample. `None` once the flow is closed.
    pub fn recv(&self) -> Option<f64> {
        self.samples.recv().ok()
    }

    /// Waits for the next sample for at most `timeout`.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<f64, RecvTimeoutError> {
        self.samples.recv_timeout(timeout)
    }

    /// Takes a sample only if the producer is waiting to deliver one right now.
    pub fn try_recv(&self) -> Result<f64, TryRecvError> {
        self.samples.try_recv()
    }
}

impl Iterator for Flow {
    type Item = f64;

    fn next(&mut self) -> Option<Self::Item> {
        self.recv()
    }
}

/// Everything the background thread needs to turn ticks into samples.
struct Producer {
    name: String,
    shape: WaveShape,
    params: WaveParams,
    clock: Arc<dyn Clock>,
    ticker: Receiver<Instant>,
    stop: Receiver<()>,
    samples: Sender<f64>,
}

impl Producer {
    fn run(self) {
        let mut delivered: u64 = 0;

        loop {
            select! {
                recv(self.stop) -> _ => break,
                recv(self.ticker) -> _ => {
                    if self.is_stopped() {
                        break;
                    }

                    let t = self.clock.now_millis();
                    let value = self.shape.evaluate(&self.params, t);

                    #[cfg(feature = "verbose_flow")]
                    {
                        debug!("[ {} ] {} {} -> {}", self.name, delivered, t, value);
                    }

                    // Blocks until the consumer takes the value. A stop arriving meanwhile
                    // drops it.
                    select! {
                        send(self.samples, value) -> res => {
                            if res.is_err() {
                                debug!("<b>Consumer of <cyan>{}</><b> is gone.</>", self.name);
                                break;
                            }
                            delivered += 1;
                        }
                        recv(self.stop) -> _ => break,
                    }
                }
            }
        }

        debug!("<b>Producer of <cyan>{}</><b> finished.</>", self.name);
        debug!("  |_ samples delivered: {}", delivered);
    }

    fn is_stopped(&self) -> bool {
        matches!(self.stop.try_recv(), Err(TryRecvError::Disconnected))
    }
}

/// Resources owned by a running flow.
#[derive(Default)]
struct FlowState {
    running: bool,
    /// Never written to. Dropping it disconnects the producer's stop channel.
    stop_signal: Option<Sender<()>>,
    producer: Option<JoinHandle<()>>,
}

/// Start/stop lifecycle of the flows of one waveform. Only one flow may be running at any
/// time; the transitions are serialized by a mutex so concurrent starts cannot both succeed.
#[derive(Default)]
pub(crate) struct FlowController {
    state: Mutex<FlowState>,
}

impl FlowController {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, FlowState> {
        // the state holds no invariant a panicking holder could break halfway
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn is_running(&self) -> bool {
        self.lock().running
    }

    /// Arms a timer firing every `interval_millis` and spawns the thread producing the samples
    /// of `shape`. Returns immediately.
    ///
    /// # Expected errors
    /// * [AlreadyRunning](WaveformError::AlreadyRunning) if a flow is running already.
    /// * [InvalidInterval](WaveformError::InvalidInterval) for a zero interval.
    /// * [ProducerSpawn](WaveformError::ProducerSpawn) if the thread could not be spawned.
    pub fn start(
        &self,
        name: &str,
        shape: WaveShape,
        params: WaveParams,
        clock: Arc<dyn Clock>,
        interval_millis: u64,
    ) -> Result<Flow, WaveformError> {
        let mut state = self.lock();

        if state.running {
            return Err(WaveformError::AlreadyRunning);
        }

        if interval_millis == 0 {
            return Err(WaveformError::InvalidInterval(interval_millis));
        }

        let interval = Duration::from_millis(interval_millis);
        let (sample_tx, sample_rx) = bounded(0);
        let (stop_tx, stop_rx) = bounded(0);

        let producer = Producer {
            name: format!("{} {}", name, shape),
            shape,
            params,
            clock,
            ticker: tick(interval),
            stop: stop_rx,
            samples: sample_tx,
        };

        let handle = thread::Builder::new()
            .name(format!("waveflow-{}", shape))
            .spawn(move || producer.run())
            .map_err(WaveformError::ProducerSpawn)?;

        state.running = true;
        state.stop_signal = Some(stop_tx);
        state.producer = Some(handle);

        info!("<b>Started <cyan>{} {}</><b> flow.</>", name, shape);
        info!("  |_ interval: {} ms", interval_millis);

        Ok(Flow {
            samples: sample_rx,
            shape,
            interval,
        })
    }

    /// Cancels the timer and waits for the producer thread to exit. Once this returns no more
    /// samples are delivered and the [Flow] is closed. Does nothing if no flow is running.
    pub fn stop(&self) {
        let mut state = self.lock();
        state.running = false;

        let Some(stop_signal) = state.stop_signal.take() else {
            return;
        };
        drop(stop_signal);

        if let Some(producer) = state.producer.take() {
            if producer.join().is_err() {
                error!("<b>Flow producer <red>panicked</><b>.</>");
            }
        }

        info!("<b>Flow <yellow>stopped</><b>.</>");
    }
}

impl Drop for FlowController {
    fn drop(&mut self) {
        self.stop();
    }
}
