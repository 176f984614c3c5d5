use std::thread::sleep;
use std::time::Duration;

// DEBUGGING, LOGGING
use simplelog::__private::paris::Logger;
use simplelog::*;

use waveflow::WaveformBuilder;

const WAVELENGTH: f64 = 100.0;
const TICK_INTERVAL: u64 = 10; // milliseconds

fn main() -> Result<(), anyhow::Error> {
    // LOGGER INIT
    TermLogger::init(
        simplelog::LevelFilter::Debug,
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;
    let mut logger = Logger::new();

    info!("<b>Running <blue>demo program</>");
    let wave = WaveformBuilder::new()
        .with_wavelength(WAVELENGTH)
        .with_amplitude(1.0)
        .with_phase(0.0)
        .with_name("Demo")
        .build()?;

    // POINT EVALUATION
    for t in (0..WAVELENGTH as usize).step_by(10) {
        let t = t as f64;
        info!(
            "t = {:>3} | sine {:>8.5} | square {:>8.5} | triangle {:>8.5} | sawtooth {:>8.5}",
            t,
            wave.sine(t),
            wave.square(t),
            wave.triangle(t),
            wave.sawtooth(t)
        );
    }

    // FLOW
    let signal_duration: u64 = 1000; // milliseconds
    let flow = wave.sine_flow(TICK_INTERVAL)?;

    let consumer = std::thread::spawn(move || {
        let mut count = 0;
        for value in flow {
            count += 1;
            info!("Sine: {} {:.5}", count, value);
        }
        count
    });

    info!("<b>Signal duration: <u>{} milliseconds</>", signal_duration);
    logger.loading("<blue><info></><b> Streaming samples</>");

    sleep(Duration::from_millis(signal_duration));
    wave.stop_flow();

    logger.done();

    let count = consumer
        .join()
        .map_err(|_| anyhow::Error::msg("consumer thread panicked"))?;

    info!("<green><tick></> <b>Received <cyan>{}</> <b>samples</>", count);
    info!("<green><tick></> <b>Program finished <green>successfully</>");
    Ok(())
}
