//! Oneshot ADC reader for the two accessory lines.
//!
//! Both channels share one ADC unit. Readings are raw 12-bit counts, so the
//! driver must be built with `Thresholds::for_resolution(TARGET_ADC_BITS)`.

use core::borrow::Borrow;

use esp_idf_svc::hal::adc::attenuation::DB_12;
use esp_idf_svc::hal::adc::oneshot::config::AdcChannelConfig;
use esp_idf_svc::hal::adc::oneshot::{AdcChannelDriver, AdcDriver};
use esp_idf_svc::hal::gpio::ADCPin;
use esp_idf_svc::hal::peripheral::Peripheral;
use esp_idf_svc::sys::EspError;

use super::{Channel, ChannelReader, HalError};

/// Channel config: full-scale ~3.1 V so an open line reads near the top.
pub fn channel_config() -> AdcChannelConfig {
    AdcChannelConfig {
        attenuation: DB_12,
        ..Default::default()
    }
}

/// Reads channel A (PTT) and channel B (UP/DOWN) from one ADC unit.
pub struct AdcChannelReader<'d, A, B, M>
where
    A: ADCPin,
    B: ADCPin<Adc = A::Adc>,
    M: Borrow<AdcDriver<'d, A::Adc>>,
{
    ptt: AdcChannelDriver<'d, A, M>,
    updown: AdcChannelDriver<'d, B, M>,
}

impl<'d, A, B, M> AdcChannelReader<'d, A, B, M>
where
    A: ADCPin,
    B: ADCPin<Adc = A::Adc>,
    M: Borrow<AdcDriver<'d, A::Adc>> + Clone,
{
    /// Bind both pins to `adc`.
    pub fn new(
        adc: M,
        ptt_pin: impl Peripheral<P = A> + 'd,
        updown_pin: impl Peripheral<P = B> + 'd,
    ) -> Result<Self, EspError> {
        let config = channel_config();
        Ok(Self {
            ptt: AdcChannelDriver::new(adc.clone(), ptt_pin, &config)?,
            updown: AdcChannelDriver::new(adc, updown_pin, &config)?,
        })
    }
}

impl<'d, A, B, M> ChannelReader for AdcChannelReader<'d, A, B, M>
where
    A: ADCPin,
    B: ADCPin<Adc = A::Adc>,
    M: Borrow<AdcDriver<'d, A::Adc>>,
{
    fn read(&mut self, channel: Channel) -> Result<u16, HalError> {
        let result = match channel {
            Channel::Ptt => self.ptt.read_raw(),
            Channel::UpDown => self.updown.read_raw(),
        };
        result.map_err(|_| HalError::AdcRead)
    }
}
