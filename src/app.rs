//! Firmware bring-up and the embassy executor backend.
//!
//! # Executors
//!
//! Each task priority gets its own interrupt executor, so a higher priority
//! task preempts a lower one at the NVIC level:
//!
//! | Task priority | Executor         | Interrupt   | NVIC priority |
//! |---------------|------------------|-------------|---------------|
//! | 3 (heartbeat) | `EXECUTOR_HIGH`  | `SWI_IRQ_1` | P1            |
//! | 2 (workers)   | `EXECUTOR_LOW`   | `SWI_IRQ_0` | P2            |
//!
//! The executor for each priority comes from [`ExecutorLevel::for_priority`].
//! Thread mode does nothing but `wfi`.

use adc_voltmeter::config::TASK_COUNT;
use adc_voltmeter::config::tasks::{
    ACQUISITION_PRIORITY,
    ACQUISITION_STACK_SIZE,
    ACQUISITION_TASK,
    HEARTBEAT_PRIORITY,
    HEARTBEAT_STACK_SIZE,
    HEARTBEAT_TASK,
    PRESENTATION_PRIORITY,
    PRESENTATION_STACK_SIZE,
    PRESENTATION_TASK,
};
use adc_voltmeter::tasks::{Acquisition, Blinker, Presentation, fail_stop};
use adc_voltmeter::{
    ExecutorLevel,
    Launcher,
    SampleChannel,
    SampleReceiver,
    SampleSender,
    Scheduler,
    SchedulerError,
    Task,
};
use defmt::{error, info};
use embassy_executor::{InterruptExecutor, SendSpawner, SpawnToken};
use embassy_rp::gpio::Output;
use embassy_rp::interrupt;
use embassy_rp::interrupt::{InterruptExt, Priority};
use embassy_rp::peripherals::PIN_25;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_time::Delay;
use static_cell::StaticCell;

use crate::board::{self, AdcInput, Display, DisplayPins};

type Mutex = CriticalSectionRawMutex;

// =============================================================================
// Executors
// =============================================================================

static EXECUTOR_HIGH: InterruptExecutor = InterruptExecutor::new();
static EXECUTOR_LOW: InterruptExecutor = InterruptExecutor::new();

#[interrupt]
unsafe fn SWI_IRQ_1() {
    // SAFETY: only this handler drives EXECUTOR_HIGH
    unsafe { EXECUTOR_HIGH.on_interrupt() }
}

#[interrupt]
unsafe fn SWI_IRQ_0() {
    // SAFETY: only this handler drives EXECUTOR_LOW
    unsafe { EXECUTOR_LOW.on_interrupt() }
}

/// Sample hand-off between acquisition and presentation.
static SAMPLES: StaticCell<SampleChannel<Mutex>> = StaticCell::new();

// =============================================================================
// Tasks
// =============================================================================

#[embassy_executor::task]
async fn heartbeat_task(led: Output<'static>) {
    Blinker::heartbeat(led).run(Delay).await
}

#[embassy_executor::task]
async fn acquisition_task(acquisition: Acquisition<'static, AdcInput, Mutex>) {
    acquisition.run(Delay).await
}

#[embassy_executor::task]
async fn presentation_task(
    presentation: Presentation<Display>,
    receiver: SampleReceiver<'static, Mutex>,
) {
    presentation.run(receiver, Delay).await
}

/// What a registered task runs, with the resources it owns.
enum Entry {
    Heartbeat(Output<'static>),
    Acquisition(Acquisition<'static, AdcInput, Mutex>),
    Presentation(Presentation<Display>, SampleReceiver<'static, Mutex>),
}

/// [`Launcher`] spawning onto the two interrupt executors.
struct Executors {
    high: SendSpawner,
    low: SendSpawner,
}

impl Executors {
    fn start() -> Self {
        interrupt::SWI_IRQ_1.set_priority(Priority::P1);
        interrupt::SWI_IRQ_0.set_priority(Priority::P2);
        Self {
            high: EXECUTOR_HIGH.start(interrupt::SWI_IRQ_1),
            low: EXECUTOR_LOW.start(interrupt::SWI_IRQ_0),
        }
    }

    /// Stop both executors. Tasks already spawned are never polled again.
    fn halt(&self) {
        interrupt::SWI_IRQ_1.disable();
        interrupt::SWI_IRQ_0.disable();
    }
}

fn token<S>(
    name: &'static str,
    token: Result<SpawnToken<S>, embassy_executor::SpawnError>,
) -> Result<SpawnToken<S>, SchedulerError> {
    token.map_err(|_| SchedulerError::SpawnFailed { name })
}

impl Launcher<Entry> for Executors {
    fn launch(
        &mut self,
        task: Task<Entry>,
    ) -> Result<(), SchedulerError> {
        let name = task.name;
        let spawner = match ExecutorLevel::for_priority(task.priority) {
            Some(ExecutorLevel::High) => self.high,
            Some(ExecutorLevel::Low) => self.low,
            None => {
                return Err(SchedulerError::UnsupportedPriority {
                    name,
                    priority: task.priority,
                });
            }
        };

        match task.entry {
            Entry::Heartbeat(led) => spawner.spawn(token(name, heartbeat_task(led))?),
            Entry::Acquisition(acquisition) => spawner.spawn(token(name, acquisition_task(acquisition))?),
            Entry::Presentation(presentation, receiver) => {
                spawner.spawn(token(name, presentation_task(presentation, receiver))?)
            }
        }
        Ok(())
    }

    fn run(&mut self) -> ! {
        info!("All tasks running");
        loop {
            cortex_m::asm::wfi();
        }
    }
}

// =============================================================================
// Entry
// =============================================================================

/// Bring up the board, register the tasks and start them. Never returns.
pub fn run() -> ! {
    let p = embassy_rp::init(Default::default());
    info!("ADC voltmeter starting");

    let led = board::heartbeat_led(p.PIN_25);
    let adc = AdcInput::new(p.ADC, p.PIN_26);
    let display = board::display(DisplayPins {
        data: [
            p.PIN_0.into(),
            p.PIN_1.into(),
            p.PIN_2.into(),
            p.PIN_3.into(),
            p.PIN_4.into(),
            p.PIN_5.into(),
            p.PIN_6.into(),
            p.PIN_7.into(),
        ],
        cs: p.PIN_8.into(),
        dc: p.PIN_9.into(),
        wr: p.PIN_10.into(),
        rd: p.PIN_11.into(),
        res: p.PIN_12.into(),
    });

    let (sender, receiver) = SAMPLES.init(SampleChannel::new()).split();

    let error = match register(led, adc, display, sender, receiver) {
        Ok(scheduler) => {
            let mut executors = Executors::start();
            let error = scheduler.start(&mut executors);
            executors.halt();
            error
        }
        Err(error) => error,
    };

    error!("scheduler exited: {}", error);

    // SAFETY: both executors are halted, so the heartbeat task that owned the
    // LED can no longer run
    let led = board::heartbeat_led(unsafe { PIN_25::steal() });
    fail_stop(led, Delay)
}

fn register(
    led: Output<'static>,
    adc: AdcInput,
    display: Display,
    sender: SampleSender<'static, Mutex>,
    receiver: SampleReceiver<'static, Mutex>,
) -> Result<Scheduler<Entry, TASK_COUNT>, SchedulerError> {
    let mut scheduler = Scheduler::new();
    scheduler.create_task(
        Entry::Heartbeat(led),
        HEARTBEAT_TASK,
        HEARTBEAT_PRIORITY,
        HEARTBEAT_STACK_SIZE,
    )?;
    scheduler.create_task(
        Entry::Presentation(Presentation::new(display), receiver),
        PRESENTATION_TASK,
        PRESENTATION_PRIORITY,
        PRESENTATION_STACK_SIZE,
    )?;
    scheduler.create_task(
        Entry::Acquisition(Acquisition::new(adc, sender)),
        ACQUISITION_TASK,
        ACQUISITION_PRIORITY,
        ACQUISITION_STACK_SIZE,
    )?;
    Ok(scheduler)
}
