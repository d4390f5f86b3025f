//! Per-channel calibration: trim, endpoints and direction.
//!
//! The table is edited from the configuration page and applied to raw
//! channel values before they are packed into the radio payload. It is
//! persisted as a compact byte record:
//!
//! ```text
//! Byte 0:   format version
//! Byte 1:   channel count
//! Per channel (7 bytes):
//!   [0..2]  trim (u16 LE)
//!   [2..4]  low endpoint (u16 LE)
//!   [4..6]  high endpoint (u16 LE)
//!   [6]     flags (bit 0 = inverted)
//! ```

use crate::config::{ANALOG_CENTER, ANALOG_MAX, N_CHANNELS};
use crate::error::UiError;

/// Record format version written by [`Calibration::serialize`].
pub const CALIBRATION_VERSION: u8 = 1;

const CHANNEL_RECORD_SIZE: usize = 7;

/// Serialized size of a full calibration table.
pub const CALIBRATION_RECORD_SIZE: usize = 2 + N_CHANNELS * CHANNEL_RECORD_SIZE;

const FLAG_INVERTED: u8 = 0x01;

/// Convert a 12-bit SAADC sample to the 10-bit channel range. Slightly
/// negative single-ended readings clamp to zero.
pub fn analog_from_adc(sample: i16) -> u16 {
    ((sample.max(0) as u16) >> 2).min(ANALOG_MAX)
}

/// A trim point is usable only strictly between the two endpoints.
pub fn is_valid(trim: u16, low: u16, high: u16) -> bool {
    low < trim && trim < high
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ChannelConfig {
    /// Raw value treated as the channel's neutral point.
    pub trim: u16,
    /// Output at full deflection towards zero.
    pub low: u16,
    /// Output at full deflection towards `ANALOG_MAX`.
    pub high: u16,
    pub inverted: bool,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            trim: ANALOG_CENTER,
            low: 0,
            high: ANALOG_MAX,
            inverted: false,
        }
    }
}

impl ChannelConfig {
    pub fn with_trim(self, trim: u16) -> Result<Self, UiError> {
        if !is_valid(trim, self.low, self.high) {
            return Err(UiError::InvalidConfiguration);
        }
        Ok(Self { trim, ..self })
    }

    pub fn with_endpoints(self, low: u16, high: u16) -> Result<Self, UiError> {
        if !is_valid(self.trim, low, high) {
            return Err(UiError::InvalidConfiguration);
        }
        Ok(Self { low, high, ..self })
    }

    pub fn toggled_invert(self) -> Self {
        Self {
            inverted: !self.inverted,
            ..self
        }
    }

    /// Map a raw reading through the calibration.
    ///
    /// The lower half of the raw range spans `low..=trim`, the upper half
    /// `trim..=high`. Inversion mirrors the raw reading first.
    pub fn apply(&self, raw: u16) -> u16 {
        let raw = raw.min(ANALOG_MAX);
        let raw = if self.inverted { ANALOG_MAX - raw } else { raw };

        let (raw, center, max) = (
            i32::from(raw),
            i32::from(ANALOG_CENTER),
            i32::from(ANALOG_MAX),
        );
        let (trim, low, high) = (
            i32::from(self.trim),
            i32::from(self.low),
            i32::from(self.high),
        );

        let out = if raw <= center {
            low + raw * (trim - low) / center
        } else {
            trim + (raw - center) * (high - trim) / (max - center)
        };
        out.clamp(0, max) as u16
    }

    fn serialize(&self, buf: &mut [u8]) {
        buf[0..2].copy_from_slice(&self.trim.to_le_bytes());
        buf[2..4].copy_from_slice(&self.low.to_le_bytes());
        buf[4..6].copy_from_slice(&self.high.to_le_bytes());
        buf[6] = if self.inverted { FLAG_INVERTED } else { 0 };
    }

    fn deserialize(data: &[u8]) -> Option<Self> {
        let read = |at: usize| u16::from_le_bytes([data[at], data[at + 1]]);
        let config = Self {
            trim: read(0),
            low: read(2),
            high: read(4),
            inverted: data[6] & FLAG_INVERTED != 0,
        };
        let in_range = config.high <= ANALOG_MAX;
        (in_range && is_valid(config.trim, config.low, config.high)).then_some(config)
    }
}

/// Calibration for every channel plus a "changed since last taken" flag.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Calibration {
    channels: [ChannelConfig; N_CHANNELS],
    changed: bool,
}

impl Calibration {
    pub fn channel(&self, index: usize) -> Option<&ChannelConfig> {
        self.channels.get(index)
    }

    pub fn channels(&self) -> &[ChannelConfig; N_CHANNELS] {
        &self.channels
    }

    /// Replace one channel's configuration and mark the table changed.
    pub fn set(&mut self, index: usize, config: ChannelConfig) -> Result<(), UiError> {
        let slot = self
            .channels
            .get_mut(index)
            .ok_or(UiError::UnknownChannel)?;
        *slot = config;
        self.changed = true;
        Ok(())
    }

    /// Returns whether the table changed since the last call, clearing the
    /// flag.
    pub fn take_changed(&mut self) -> bool {
        core::mem::replace(&mut self.changed, false)
    }

    /// Returns the number of bytes written, or 0 if `buf` is too small.
    pub fn serialize(&self, buf: &mut [u8]) -> usize {
        if buf.len() < CALIBRATION_RECORD_SIZE {
            return 0;
        }
        buf[0] = CALIBRATION_VERSION;
        buf[1] = N_CHANNELS as u8;
        for (channel, chunk) in self
            .channels
            .iter()
            .zip(buf[2..CALIBRATION_RECORD_SIZE].chunks_exact_mut(CHANNEL_RECORD_SIZE))
        {
            channel.serialize(chunk);
        }
        CALIBRATION_RECORD_SIZE
    }

    /// Parse a stored record. Unknown versions, a different channel count
    /// or any out-of-range channel reject the whole record.
    pub fn deserialize(data: &[u8]) -> Option<Self> {
        if data.len() < CALIBRATION_RECORD_SIZE {
            return None;
        }
        if data[0] != CALIBRATION_VERSION || data[1] as usize != N_CHANNELS {
            return None;
        }

        let mut calibration = Self::default();
        for (slot, chunk) in calibration
            .channels
            .iter_mut()
            .zip(data[2..CALIBRATION_RECORD_SIZE].chunks_exact(CHANNEL_RECORD_SIZE))
        {
            *slot = ChannelConfig::deserialize(chunk)?;
        }
        Some(calibration)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_requires_strict_ordering() {
        assert!(is_valid(300, 100, 900));
        assert!(!is_valid(100, 300, 900));
        assert!(!is_valid(500, 500, 900));
        assert!(!is_valid(900, 100, 900));
    }

    #[test]
    fn adc_samples_scale_to_channel_range() {
        assert_eq!(analog_from_adc(-3), 0);
        assert_eq!(analog_from_adc(2048), 512);
        assert_eq!(analog_from_adc(4095), ANALOG_MAX);
        assert_eq!(analog_from_adc(i16::MAX), ANALOG_MAX);
    }

    #[test]
    fn default_calibration_is_identity() {
        let config = ChannelConfig::default();
        for raw in [0, 1, 200, 511, 512, 513, 800, ANALOG_MAX] {
            assert_eq!(config.apply(raw), raw);
        }
    }

    #[test]
    fn endpoints_limit_output() {
        let config = ChannelConfig::default().with_endpoints(200, 800).unwrap();
        assert_eq!(config.apply(0), 200);
        assert_eq!(config.apply(ANALOG_CENTER), ANALOG_CENTER);
        assert_eq!(config.apply(ANALOG_MAX), 800);
    }

    #[test]
    fn trim_moves_neutral_point() {
        let config = ChannelConfig::default().with_trim(600).unwrap();
        assert_eq!(config.apply(ANALOG_CENTER), 600);
        assert_eq!(config.apply(0), 0);
        assert_eq!(config.apply(ANALOG_MAX), ANALOG_MAX);
    }

    #[test]
    fn inversion_mirrors_reading() {
        let config = ChannelConfig::default().toggled_invert();
        assert_eq!(config.apply(0), ANALOG_MAX);
        assert_eq!(config.apply(ANALOG_MAX), 0);
        assert!(!config.toggled_invert().inverted);
    }

    #[test]
    fn invalid_edits_are_refused() {
        let config = ChannelConfig::default();
        assert_eq!(config.with_trim(0), Err(UiError::InvalidConfiguration));
        assert_eq!(
            config.with_endpoints(600, 900),
            Err(UiError::InvalidConfiguration)
        );
    }

    #[test]
    fn set_marks_changed_once() {
        let mut calibration = Calibration::default();
        assert!(!calibration.take_changed());
        calibration
            .set(2, ChannelConfig::default().toggled_invert())
            .unwrap();
        assert!(calibration.channel(2).unwrap().inverted);
        assert!(calibration.take_changed());
        assert!(!calibration.take_changed());
        assert_eq!(
            calibration.set(N_CHANNELS, ChannelConfig::default()),
            Err(UiError::UnknownChannel)
        );
    }

    #[test]
    fn record_survives_storage() {
        let mut calibration = Calibration::default();
        calibration
            .set(0, ChannelConfig::default().with_endpoints(200, 800).unwrap())
            .unwrap();
        calibration
            .set(5, ChannelConfig::default().with_trim(700).unwrap().toggled_invert())
            .unwrap();
        calibration.take_changed();

        let mut buf = [0u8; CALIBRATION_RECORD_SIZE];
        assert_eq!(calibration.serialize(&mut buf), CALIBRATION_RECORD_SIZE);
        assert_eq!(buf[0], CALIBRATION_VERSION);
        assert_eq!(&buf[2..4], &512u16.to_le_bytes());
        assert_eq!(Calibration::deserialize(&buf), Some(calibration));
    }

    #[test]
    fn serialize_refuses_short_buffer() {
        let mut buf = [0u8; CALIBRATION_RECORD_SIZE - 1];
        assert_eq!(Calibration::default().serialize(&mut buf), 0);
    }

    #[test]
    fn corrupt_records_are_rejected() {
        let mut buf = [0u8; CALIBRATION_RECORD_SIZE];
        Calibration::default().serialize(&mut buf);

        let mut wrong_version = buf;
        wrong_version[0] = 9;
        assert_eq!(Calibration::deserialize(&wrong_version), None);

        let mut bad_channel = buf;
        bad_channel[2..4].copy_from_slice(&0u16.to_le_bytes());
        assert_eq!(Calibration::deserialize(&bad_channel), None);

        assert_eq!(Calibration::deserialize(&buf[..4]), None);
    }
}
