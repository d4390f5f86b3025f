//! rc-remote firmware for the nRF52840.
//!
//! One cooperative loop runs every `LOOP_PERIOD_MS`:
//!
//! 1. Sample sticks, pots and the adjustment wheel (SAADC).
//! 2. Poll the navigation buttons.
//! 3. Run one UI cycle (input, navigation, draw, page commit).
//! 4. Persist calibration if the UI changed it.
//! 5. Pack the calibrated channels into the radio payload.
//!
//! The radio transport is not part of this firmware. The link is always
//! reported as lost, so the monitoring page blinks "No comm!", and the
//! packed payload is only written to the defmt trace log.

#![no_std]
#![no_main]

use defmt::{info, trace, warn};
use defmt_rtt as _;
use panic_probe as _;

use embassy_embedded_hal::adapter::BlockingAsync;
use embassy_executor::Spawner;
use embassy_nrf::gpio::Pin;
use embassy_nrf::nvmc::Nvmc;
use embassy_nrf::saadc::{self, Saadc};
use embassy_nrf::twim::{self, Twim};
use embassy_nrf::{bind_interrupts, peripherals};
use embassy_time::{Duration, Instant, Ticker};

use rc_remote::calibration::analog_from_adc;
use rc_remote::config::{BUTTON_ACTIVE_LEVEL, CHANNEL_NAMES, LOOP_PERIOD_MS, N_CHANNELS};
use rc_remote::payload::{RadioPayload, TransmitterInputs, RADIO_PAYLOAD_SIZE};
use rc_remote::ui::buttons::Buttons;
use rc_remote::ui::{display, ChannelInput, CommStatus, UiManager};
use rc_remote::{storage, Error};

bind_interrupts!(struct Irqs {
    SAADC => saadc::InterruptHandler;
    TWISPI0 => twim::InterruptHandler<peripherals::TWISPI0>;
});

/// SAADC channels: the six transmitted channels followed by the wheel.
const N_ADC_CHANNELS: usize = N_CHANNELS + 1;
const WHEEL_ADC_INDEX: usize = N_CHANNELS;

#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    info!("rc-remote starting");

    if let Err(e) = run().await {
        defmt::panic!("Fatal: {}", e);
    }
}

async fn run() -> Result<(), Error> {
    let p = embassy_nrf::init(Default::default());

    // Calibration
    let mut flash = BlockingAsync::new(Nvmc::new(p.NVMC));
    let calibration = storage::load_or_default(&mut flash).await;

    // Display
    let i2c = Twim::new(p.TWISPI0, Irqs, p.P0_26, p.P0_27, twim::Config::default());
    let mut canvas = display::init(i2c)?;

    // Buttons
    let buttons = Buttons::new(p.P0_11.degrade(), p.P0_12.degrade(), p.P0_24.degrade());

    // Analog inputs
    let adc_channels = [
        saadc::ChannelConfig::single_ended(p.P0_02),
        saadc::ChannelConfig::single_ended(p.P0_03),
        saadc::ChannelConfig::single_ended(p.P0_04),
        saadc::ChannelConfig::single_ended(p.P0_05),
        saadc::ChannelConfig::single_ended(p.P0_28),
        saadc::ChannelConfig::single_ended(p.P0_29),
        saadc::ChannelConfig::single_ended(p.P0_30),
    ];
    let mut adc = Saadc::new(p.SAADC, Irqs, saadc::Config::default(), adc_channels);
    adc.calibrate().await;

    let mut ui = UiManager::new(calibration, BUTTON_ACTIVE_LEVEL)?;
    info!("UI ready");

    let mut samples = [0i16; N_ADC_CHANNELS];
    let mut frame = [0u8; RADIO_PAYLOAD_SIZE];
    let mut ticker = Ticker::every(Duration::from_millis(LOOP_PERIOD_MS));

    loop {
        adc.sample(&mut samples).await;

        let mut inputs = TransmitterInputs::default();
        for (value, sample) in inputs.channels.iter_mut().zip(samples) {
            *value = analog_from_adc(sample);
        }
        let wheel = analog_from_adc(samples[WHEEL_ADC_INDEX]);

        let channels: [ChannelInput<'_>; N_CHANNELS] = core::array::from_fn(|i| ChannelInput {
            name: CHANNEL_NAMES[i],
            value: inputs.channels[i],
        });

        // TODO: report link state from the NRF24 driver once it is wired in.
        let comm = CommStatus {
            connection_lost: true,
            last_tx_us: 0,
        };

        ui.update(
            &buttons.sample(wheel),
            &channels,
            comm,
            Instant::now().as_millis(),
            &mut canvas,
        )?;

        if ui.take_config_changed() {
            if let Err(e) = storage::save_calibration(&mut flash, ui.calibration()).await {
                warn!("Calibration not saved: {}", e);
            }
        }

        let payload = RadioPayload::from_inputs(&inputs, ui.calibration());
        let len = payload.serialize(&mut frame);
        trace!("Payload: {=[u8]:x}", &frame[..len]);

        ticker.next().await;
    }
}
