//! Radio payload sent to the receiver every loop cycle.
//!
//! Layout (19 bytes, little-endian):
//! ```text
//! Bytes 0..5:   left joystick   (x u16, y u16, switch u8)
//! Bytes 5..10:  right joystick  (x u16, y u16, switch u8)
//! Bytes 10..12: left pot  (u16)
//! Bytes 12..14: right pot (u16)
//! Byte  14:     left switch
//! Byte  15:     right switch
//! Bytes 16..19: buttons
//! ```

use crate::calibration::Calibration;
use crate::config::N_CHANNELS;

/// Payload size in bytes.
pub const RADIO_PAYLOAD_SIZE: usize = 19;

/// Number of auxiliary push buttons carried in the payload.
pub const N_AUX_BUTTONS: usize = 3;

const JOYSTICK_SIZE: usize = 5;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct JoystickData {
    pub x: u16,
    pub y: u16,
    pub switch: bool,
}

impl JoystickData {
    fn serialize(&self, buf: &mut [u8]) {
        buf[0..2].copy_from_slice(&self.x.to_le_bytes());
        buf[2..4].copy_from_slice(&self.y.to_le_bytes());
        buf[4] = self.switch as u8;
    }
}

/// Raw transmitter readings for one cycle, before calibration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TransmitterInputs {
    /// Analog channels in display order: LX, LY, RX, RY, left pot,
    /// right pot.
    pub channels: [u16; N_CHANNELS],
    pub joystick_left_switch: bool,
    pub joystick_right_switch: bool,
    pub switch_left: bool,
    pub switch_right: bool,
    pub buttons: [bool; N_AUX_BUTTONS],
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RadioPayload {
    pub joystick_left: JoystickData,
    pub joystick_right: JoystickData,
    pub pot_left: u16,
    pub pot_right: u16,
    pub switch_left: u8,
    pub switch_right: u8,
    pub buttons: [u8; N_AUX_BUTTONS],
}

impl RadioPayload {
    /// Build a payload from raw readings, passing every analog channel
    /// through its calibration.
    pub fn from_inputs(inputs: &TransmitterInputs, calibration: &Calibration) -> Self {
        let mut values = [0u16; N_CHANNELS];
        for (value, (raw, config)) in values
            .iter_mut()
            .zip(inputs.channels.iter().zip(calibration.channels()))
        {
            *value = config.apply(*raw);
        }

        Self {
            joystick_left: JoystickData {
                x: values[0],
                y: values[1],
                switch: inputs.joystick_left_switch,
            },
            joystick_right: JoystickData {
                x: values[2],
                y: values[3],
                switch: inputs.joystick_right_switch,
            },
            pot_left: values[4],
            pot_right: values[5],
            switch_left: inputs.switch_left as u8,
            switch_right: inputs.switch_right as u8,
            buttons: inputs.buttons.map(u8::from),
        }
    }

    /// Serialise into a byte slice for the radio.
    /// Returns the number of bytes written, or 0 if `buf` is too small.
    pub fn serialize(&self, buf: &mut [u8]) -> usize {
        if buf.len() < RADIO_PAYLOAD_SIZE {
            return 0;
        }
        self.joystick_left.serialize(&mut buf[0..JOYSTICK_SIZE]);
        self.joystick_right
            .serialize(&mut buf[JOYSTICK_SIZE..2 * JOYSTICK_SIZE]);
        buf[10..12].copy_from_slice(&self.pot_left.to_le_bytes());
        buf[12..14].copy_from_slice(&self.pot_right.to_le_bytes());
        buf[14] = self.switch_left;
        buf[15] = self.switch_right;
        buf[16..RADIO_PAYLOAD_SIZE].copy_from_slice(&self.buttons);
        RADIO_PAYLOAD_SIZE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calibration::ChannelConfig;

    fn inputs() -> TransmitterInputs {
        TransmitterInputs {
            channels: [100, 200, 300, 400, 500, 1023],
            joystick_left_switch: true,
            joystick_right_switch: false,
            switch_left: false,
            switch_right: true,
            buttons: [true, false, true],
        }
    }

    #[test]
    fn default_calibration_passes_values_through() {
        let payload = RadioPayload::from_inputs(&inputs(), &Calibration::default());
        assert_eq!(
            payload.joystick_left,
            JoystickData {
                x: 100,
                y: 200,
                switch: true
            }
        );
        assert_eq!(payload.joystick_right.x, 300);
        assert_eq!(payload.joystick_right.y, 400);
        assert_eq!(payload.pot_left, 500);
        assert_eq!(payload.pot_right, 1023);
        assert_eq!(payload.buttons, [1, 0, 1]);
    }

    #[test]
    fn calibration_is_applied_per_channel() {
        let mut calibration = Calibration::default();
        calibration
            .set(5, ChannelConfig::default().with_endpoints(200, 800).unwrap())
            .unwrap();
        calibration
            .set(0, ChannelConfig::default().toggled_invert())
            .unwrap();

        let payload = RadioPayload::from_inputs(&inputs(), &calibration);
        assert_eq!(payload.pot_right, 800);
        assert_eq!(payload.joystick_left.x, 923);
        assert_eq!(payload.joystick_left.y, 200);
    }

    #[test]
    fn serialize_layout() {
        let payload = RadioPayload::from_inputs(&inputs(), &Calibration::default());
        let mut buf = [0u8; 32];
        assert_eq!(payload.serialize(&mut buf), RADIO_PAYLOAD_SIZE);
        assert_eq!(&buf[0..5], &[100, 0, 200, 0, 1]);
        assert_eq!(&buf[5..10], &[44, 1, 144, 1, 0]);
        assert_eq!(&buf[10..14], &[244, 1, 255, 3]);
        assert_eq!(&buf[14..19], &[0, 1, 1, 0, 1]);
    }

    #[test]
    fn serialize_refuses_short_buffer() {
        let mut buf = [0u8; RADIO_PAYLOAD_SIZE - 1];
        assert_eq!(RadioPayload::default().serialize(&mut buf), 0);
    }
}
