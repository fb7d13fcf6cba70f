use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use log::LevelFilter;
use systime::{
    start, SharedTickSource, TickConfig, TickSignal, TickSource, Timekeeper, TICK_INDEX_MAX,
};
use systime_posix::{init_logger, ConsoleIndicators, SimClock, SimInterrupts, SimTimer, Ticker};

static TICK_SOURCE: SharedTickSource<SimTimer> = SharedTickSource::new();
static TICK_SIGNAL: TickSignal = TickSignal::new();

const TICK_IRQ: u32 = 0;

#[derive(Parser, Debug)]
#[command(author, version, about = "Host demo of the systime tick pipeline")]
struct Opts {
    /// Tick interrupt rate.
    #[arg(long, default_value_t = 10)]
    rate_hz: u32,

    /// Simulated timer clock.
    #[arg(long, default_value_t = systime_posix::DEFAULT_CLOCK_HZ)]
    clock_hz: u32,

    /// Stop after this tick index is consumed.
    #[arg(
        long,
        default_value_t = 100,
        value_parser = clap::value_parser!(u32).range(1..=i64::from(TICK_INDEX_MAX))
    )]
    ticks: u32,

    /// Simulated time runs this many times faster than wall time.
    #[arg(long, default_value_t = 1)]
    speedup: u32,

    #[arg(long, default_value = "info", value_name = "LEVEL")]
    log_level: LevelFilter,
}

fn tick_isr(_period: usize) {
    TICK_SOURCE.on_interrupt();
}

fn on_tick() {
    TICK_SIGNAL.signal();
}

fn main() -> Result<()> {
    let opts = Opts::parse();
    init_logger(opts.log_level).context("installing logger")?;

    let config = TickConfig::builder()
        .rate_hz(opts.rate_hz)
        .irq(TICK_IRQ)
        .build();
    let timer = SimTimer::new();
    let mut interrupts = SimInterrupts::new();

    TICK_SOURCE.init(TickSource::new(timer.clone()));
    TICK_SOURCE.install_callback(on_tick)?;
    let period = start(
        &TICK_SOURCE,
        &SimClock::new(opts.clock_hz),
        &mut interrupts,
        &config,
        tick_isr,
    )
    .context("starting tick source")?;
    log::info!(
        "tick every {} timer units ({} Hz from {} Hz)",
        period,
        opts.rate_hz,
        opts.clock_hz
    );

    let mut keeper: Timekeeper<'_, _> =
        Timekeeper::from_config(&TICK_SIGNAL, &config, ConsoleIndicators::new())?;
    let ticker = Ticker::spawn(timer, interrupts, TICK_IRQ, opts.clock_hz, opts.speedup)
        .context("spawning ticker thread")?;

    loop {
        match keeper.poll() {
            Some(report) if report.tick_index >= opts.ticks => break,
            Some(report) if !report.events.is_empty() => {
                log::info!("{} {}", keeper.clock(), keeper.sink().render());
            }
            Some(_) => {}
            None => thread::sleep(Duration::from_micros(200)),
        }
    }
    let raised = ticker.stop();

    let stats = keeper.stats();
    let subticks = TICK_SOURCE
        .with(|source| source.subticks())
        .flatten()
        .unwrap_or(0);
    println!("clock      {}", keeper.clock());
    println!("consumed   {}", stats.consumed);
    println!("coalesced  {}", stats.coalesced);
    println!("interrupts {}", raised);
    println!("subticks   {}", subticks);
    println!("history    {:?}", keeper.history().slots());
    Ok(())
}
