//! Recording doubles for the hardware seams.
//!
//! Every double shares its log through an `Rc`, so a test can hand one clone
//! to the code under test and inspect another afterwards.

use std::cell::{Cell, RefCell};
use std::convert::Infallible;
use std::rc::Rc;

use embedded_graphics::mono_font::MonoFont;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::Point;
use embedded_hal::digital::{ErrorType, OutputPin, PinState};

use crate::drivers::bus::ParallelBus;
use crate::drivers::display::{ColorLevels, DisplayDriver, DisplayMode, Region, RemapMode, SleepMode};
use crate::drivers::ssd1339::command::WRITE_RAM;
use crate::tasks::acquisition::AnalogSource;

const NS_PER_US: u64 = 1_000;
const NS_PER_MS: u64 = 1_000_000;

// =============================================================================
// Time
// =============================================================================

/// Monotonic time that only moves when a [`VirtualDelay`] waits.
#[derive(Clone, Default)]
pub struct VirtualClock {
    now_ns: Rc<Cell<u64>>,
}

impl VirtualClock {
    pub fn new() -> Self { Self::default() }

    pub fn now_ms(&self) -> u64 { self.now_ns.get() / NS_PER_MS }

    fn advance(
        &self,
        ns: u64,
    ) {
        self.now_ns.set(self.now_ns.get() + ns);
    }
}

/// Delay that completes instantly and advances the shared clock instead.
#[derive(Clone)]
pub struct VirtualDelay {
    clock: VirtualClock,
}

impl VirtualDelay {
    pub fn new(clock: &VirtualClock) -> Self { Self { clock: clock.clone() } }
}

impl embedded_hal::delay::DelayNs for VirtualDelay {
    fn delay_ns(
        &mut self,
        ns: u32,
    ) {
        self.clock.advance(u64::from(ns));
    }

    fn delay_us(
        &mut self,
        us: u32,
    ) {
        self.clock.advance(u64::from(us) * NS_PER_US);
    }

    fn delay_ms(
        &mut self,
        ms: u32,
    ) {
        self.clock.advance(u64::from(ms) * NS_PER_MS);
    }
}

impl embedded_hal_async::delay::DelayNs for VirtualDelay {
    async fn delay_ns(
        &mut self,
        ns: u32,
    ) {
        self.clock.advance(u64::from(ns));
    }

    async fn delay_us(
        &mut self,
        us: u32,
    ) {
        self.clock.advance(u64::from(us) * NS_PER_US);
    }

    async fn delay_ms(
        &mut self,
        ms: u32,
    ) {
        self.clock.advance(u64::from(ms) * NS_PER_MS);
    }
}

// =============================================================================
// Output Pins
// =============================================================================

/// Bus line a [`LinePin`] stands in for.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Line {
    Cs,
    Dc,
    Wr,
    Rd,
    Res,
    Data(u8),
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct LineEvent {
    pub line: Line,
    pub high: bool,
}

/// Every level set on any line, in order.
#[derive(Clone, Default)]
pub struct LineLog {
    events: Rc<RefCell<Vec<LineEvent>>>,
}

impl LineLog {
    pub fn events(&self) -> Vec<LineEvent> { self.events.borrow().clone() }
}

pub struct LinePin {
    line: Line,
    log: LineLog,
}

impl LinePin {
    pub fn new(
        line: Line,
        log: &LineLog,
    ) -> Self {
        Self { line, log: log.clone() }
    }

    fn record(
        &mut self,
        high: bool,
    ) -> Result<(), Infallible> {
        self.log.events.borrow_mut().push(LineEvent { line: self.line, high });
        Ok(())
    }
}

impl ErrorType for LinePin {
    type Error = Infallible;
}

impl OutputPin for LinePin {
    fn set_low(&mut self) -> Result<(), Self::Error> { self.record(false) }

    fn set_high(&mut self) -> Result<(), Self::Error> { self.record(true) }
}

/// Timestamped level changes of one output.
#[derive(Clone, Default)]
pub struct LevelTrace {
    edges: Rc<RefCell<Vec<(u64, bool)>>>,
}

impl LevelTrace {
    /// `(time_ms, high)` for every level set.
    pub fn edges(&self) -> Vec<(u64, bool)> { self.edges.borrow().clone() }

    /// Level in force at `t_ms`, `None` before the first set.
    pub fn level_at(
        &self,
        t_ms: u64,
    ) -> Option<bool> {
        self.edges
            .borrow()
            .iter()
            .take_while(|(t, _)| *t <= t_ms)
            .last()
            .map(|(_, high)| *high)
    }
}

/// Output pin stamping every level change with virtual time.
///
/// With a limit set, the pin panics once that many levels were recorded,
/// which is the only way out of a `-> !` loop in a test.
pub struct TracePin {
    clock: VirtualClock,
    trace: LevelTrace,
    limit: Option<usize>,
}

impl TracePin {
    pub fn new(
        clock: &VirtualClock,
        trace: &LevelTrace,
    ) -> Self {
        Self {
            clock: clock.clone(),
            trace: trace.clone(),
            limit: None,
        }
    }

    pub fn with_limit(
        clock: &VirtualClock,
        trace: &LevelTrace,
        limit: usize,
    ) -> Self {
        Self {
            limit: Some(limit),
            ..Self::new(clock, trace)
        }
    }

    fn record(
        &mut self,
        high: bool,
    ) -> Result<(), Infallible> {
        let mut edges = self.trace.edges.borrow_mut();
        if self.limit == Some(edges.len()) {
            panic!("trace limit reached");
        }
        edges.push((self.clock.now_ms(), high));
        Ok(())
    }
}

impl ErrorType for TracePin {
    type Error = Infallible;
}

impl OutputPin for TracePin {
    fn set_low(&mut self) -> Result<(), Self::Error> { self.record(false) }

    fn set_high(&mut self) -> Result<(), Self::Error> { self.record(true) }

    fn set_state(
        &mut self,
        state: PinState,
    ) -> Result<(), Self::Error> {
        self.record(state == PinState::High)
    }
}

// =============================================================================
// Parallel Bus
// =============================================================================

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum BusOp {
    Init,
    Command(u8),
    Data(Vec<u8>),
}

/// [`ParallelBus`] that records transfers. Empty data writes are not recorded.
#[derive(Clone, Default)]
pub struct RecordingBus {
    ops: Rc<RefCell<Vec<BusOp>>>,
}

impl RecordingBus {
    pub fn new() -> Self { Self::default() }

    pub fn ops(&self) -> Vec<BusOp> { self.ops.borrow().clone() }

    /// Bytes written to display RAM (data following a `WRITE_RAM` command).
    pub fn pixel_bytes(&self) -> usize {
        let mut writing_ram = false;
        let mut total = 0;
        for op in self.ops.borrow().iter() {
            match op {
                BusOp::Command(command) => writing_ram = *command == WRITE_RAM,
                BusOp::Data(bytes) if writing_ram => total += bytes.len(),
                _ => {}
            }
        }
        total
    }
}

impl ParallelBus for RecordingBus {
    type Error = Infallible;

    fn init(&mut self) -> Result<(), Self::Error> {
        self.ops.borrow_mut().push(BusOp::Init);
        Ok(())
    }

    fn write_command(
        &mut self,
        command: u8,
    ) -> Result<(), Self::Error> {
        self.ops.borrow_mut().push(BusOp::Command(command));
        Ok(())
    }

    fn write_data(
        &mut self,
        data: &[u8],
    ) -> Result<(), Self::Error> {
        if !data.is_empty() {
            self.ops.borrow_mut().push(BusOp::Data(data.to_vec()));
        }
        Ok(())
    }
}

// =============================================================================
// Analog Source
// =============================================================================

/// Replays a fixed list of readings, then repeats the last one.
pub struct ScriptedSource {
    script: Vec<Result<u16, ()>>,
    next: usize,
}

impl ScriptedSource {
    pub fn new(script: &[Result<u16, ()>]) -> Self {
        assert!(!script.is_empty());
        Self {
            script: script.to_vec(),
            next: 0,
        }
    }

    pub fn constant(raw: u16) -> Self { Self::new(&[Ok(raw)]) }
}

impl AnalogSource for ScriptedSource {
    type Error = ();

    fn read(&mut self) -> Result<u16, Self::Error> {
        let reading = self.script[self.next.min(self.script.len() - 1)];
        self.next += 1;
        reading
    }
}

// =============================================================================
// Display
// =============================================================================

/// One call made on a [`RecordingDisplay`], or a wait on its delay.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum DisplayOp {
    ConfigureLines,
    ColumnAddress(u8, u8),
    RowAddress(u8, u8),
    Remap(RemapMode),
    Contrast(ColorLevels),
    Precharge(ColorLevels),
    BuiltinLut,
    Sleep(SleepMode),
    Mode(DisplayMode),
    Clear(Region),
    Delay(u32),
    DrawText,
}

#[derive(Default)]
struct DisplayLog {
    ops: Vec<DisplayOp>,
    texts: Vec<(Point, String)>,
    fail_at: Option<DisplayOp>,
}

/// [`DisplayDriver`] that records calls. Text draws also land in
/// [`texts`](Self::texts).
#[derive(Clone, Default)]
pub struct RecordingDisplay {
    log: Rc<RefCell<DisplayLog>>,
}

impl RecordingDisplay {
    pub fn new() -> Self { Self::default() }

    /// Fails the first call matching `op` (after recording it).
    pub fn failing_at(op: DisplayOp) -> Self {
        let display = Self::new();
        display.log.borrow_mut().fail_at = Some(op);
        display
    }

    /// Delay whose waits are recorded into this display's op log.
    pub fn delay(&self) -> RecordingDelay { RecordingDelay { log: self.log.clone() } }

    pub fn ops(&self) -> Vec<DisplayOp> { self.log.borrow().ops.clone() }

    /// Every drawn text with its position, in order.
    pub fn texts(&self) -> Vec<(Point, String)> { self.log.borrow().texts.clone() }

    fn record(
        &mut self,
        op: DisplayOp,
    ) -> Result<(), ()> {
        let mut log = self.log.borrow_mut();
        log.ops.push(op);
        if log.fail_at == Some(op) {
            log.fail_at = None;
            return Err(());
        }
        Ok(())
    }
}

impl DisplayDriver for RecordingDisplay {
    type Error = ();

    fn configure_lines(&mut self) -> Result<(), Self::Error> { self.record(DisplayOp::ConfigureLines) }

    fn set_column_address(
        &mut self,
        start: u8,
        end: u8,
    ) -> Result<(), Self::Error> {
        self.record(DisplayOp::ColumnAddress(start, end))
    }

    fn set_row_address(
        &mut self,
        start: u8,
        end: u8,
    ) -> Result<(), Self::Error> {
        self.record(DisplayOp::RowAddress(start, end))
    }

    fn set_remap_and_color_depth(
        &mut self,
        mode: RemapMode,
    ) -> Result<(), Self::Error> {
        self.record(DisplayOp::Remap(mode))
    }

    fn set_contrast_current(
        &mut self,
        levels: ColorLevels,
    ) -> Result<(), Self::Error> {
        self.record(DisplayOp::Contrast(levels))
    }

    fn set_precharge_voltage(
        &mut self,
        levels: ColorLevels,
    ) -> Result<(), Self::Error> {
        self.record(DisplayOp::Precharge(levels))
    }

    fn use_builtin_lut(&mut self) -> Result<(), Self::Error> { self.record(DisplayOp::BuiltinLut) }

    fn set_sleep_mode(
        &mut self,
        mode: SleepMode,
    ) -> Result<(), Self::Error> {
        self.record(DisplayOp::Sleep(mode))
    }

    fn set_display_mode(
        &mut self,
        mode: DisplayMode,
    ) -> Result<(), Self::Error> {
        self.record(DisplayOp::Mode(mode))
    }

    fn clear_region(
        &mut self,
        region: Region,
    ) -> Result<(), Self::Error> {
        self.record(DisplayOp::Clear(region))
    }

    fn draw_text(
        &mut self,
        _font: &MonoFont<'_>,
        position: Point,
        _foreground: Rgb565,
        _background: Rgb565,
        text: &str,
    ) -> Result<(), Self::Error> {
        self.record(DisplayOp::DrawText)?;
        self.log.borrow_mut().texts.push((position, text.to_string()));
        Ok(())
    }
}

/// Async delay that logs `DisplayOp::Delay(ms)` instead of waiting.
pub struct RecordingDelay {
    log: Rc<RefCell<DisplayLog>>,
}

impl RecordingDelay {
    fn record(
        &mut self,
        ms: u32,
    ) {
        self.log.borrow_mut().ops.push(DisplayOp::Delay(ms));
    }
}

impl embedded_hal_async::delay::DelayNs for RecordingDelay {
    async fn delay_ns(
        &mut self,
        ns: u32,
    ) {
        self.record(ns / 1_000_000);
    }

    async fn delay_ms(
        &mut self,
        ms: u32,
    ) {
        self.record(ms);
    }
}
