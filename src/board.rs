//! Board wiring for the Pico 2 with an SSD1339 OLED module on the 8080 bus.
//!
//! # Pin Mapping
//!
//! | Function          | GPIO      | Notes                              |
//! |-------------------|-----------|------------------------------------|
//! | Display D0-D7     | GP0-GP7   | D0 on GP0                          |
//! | Display CS        | GP8       | Active low                         |
//! | Display D/C       | GP9       | Low = command                      |
//! | Display WR        | GP10      | Latch on rising edge               |
//! | Display RD        | GP11      | Parked high                        |
//! | Display RES       | GP12      | Active low                         |
//! | Heartbeat LED     | GP25      | Onboard LED, high = on             |
//! | Analog input      | GP26      | ADC0, 0-3.3 V                      |

use adc_voltmeter::drivers::{BusPins, GpioBus, Ssd1339};
use adc_voltmeter::tasks::AnalogSource;
use embassy_rp::Peri;
use embassy_rp::adc::{self, Adc, Blocking};
use embassy_rp::gpio::{AnyPin, Level, Output, Pull};
use embassy_rp::peripherals::{ADC, PIN_25, PIN_26};
use embassy_time::Delay;

/// Bit-banged display bus with the embassy busy-wait delay for reset timing.
pub type DisplayBus = GpioBus<Output<'static>, Delay>;

/// The panel driver owned by the presentation task.
pub type Display = Ssd1339<DisplayBus>;

/// ADC0 on GP26, read in blocking mode (one conversion takes ~2 us).
pub struct AdcInput {
    adc: Adc<'static, Blocking>,
    channel: adc::Channel<'static>,
}

impl AdcInput {
    pub fn new(
        adc: Peri<'static, ADC>,
        pin: Peri<'static, PIN_26>,
    ) -> Self {
        Self {
            adc: Adc::new_blocking(adc, adc::Config::default()),
            channel: adc::Channel::new_pin(pin, Pull::None),
        }
    }
}

impl AnalogSource for AdcInput {
    type Error = adc::Error;

    fn read(&mut self) -> Result<u16, Self::Error> { self.adc.blocking_read(&mut self.channel) }
}

/// Onboard LED, initially off.
pub fn heartbeat_led(pin: Peri<'static, PIN_25>) -> Output<'static> { Output::new(pin, Level::Low) }

/// Display bus pins, in [`BusPins`] order.
pub struct DisplayPins {
    pub data: [Peri<'static, AnyPin>; 8],
    pub cs: Peri<'static, AnyPin>,
    pub dc: Peri<'static, AnyPin>,
    pub wr: Peri<'static, AnyPin>,
    pub rd: Peri<'static, AnyPin>,
    pub res: Peri<'static, AnyPin>,
}

/// Build the display driver. Lines start in their idle levels; the bus
/// `init` during bring-up parks them again and resets the controller.
pub fn display(pins: DisplayPins) -> Display {
    let DisplayPins {
        data,
        cs,
        dc,
        wr,
        rd,
        res,
    } = pins;

    let bus_pins = BusPins {
        cs: Output::new(cs, Level::High),
        dc: Output::new(dc, Level::High),
        wr: Output::new(wr, Level::High),
        rd: Output::new(rd, Level::High),
        res: Output::new(res, Level::High),
        data: data.map(|pin| Output::new(pin, Level::Low)),
    };
    Ssd1339::new(GpioBus::new(bus_pins, Delay))
}
