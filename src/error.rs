//! Error types for the UI framework and the firmware around it.
//!
//! We avoid `alloc` - every variant is a plain tag so the enum stays
//! `Copy` and can be stored as the core's error state.
//! Implements `defmt::Format` for efficient on-target logging.

use core::fmt;

/// Errors reported by page/widget composition, updates and configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum UiError {
    /// A page or menu list is already at its maximum size.
    CapacityExceeded,

    /// The page registry (or the widget arena) is full.
    RegistryFull,

    /// A menu item was added to a page that has no menu list yet.
    NoParentMenu,

    /// A trim/endpoint combination violates `low < trim < high`.
    InvalidConfiguration,

    /// The page handle was not issued by this registry.
    UnknownPage,

    /// The widget handle was not issued by this registry.
    UnknownWidget,

    /// The update value does not match the widget kind.
    ValueMismatch,

    /// A calibration channel index is out of range.
    UnknownChannel,
}

impl fmt::Display for UiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            UiError::CapacityExceeded => "capacity exceeded",
            UiError::RegistryFull => "page registry full",
            UiError::NoParentMenu => "menu item has no parent menu list",
            UiError::InvalidConfiguration => "invalid trim/endpoint configuration",
            UiError::UnknownPage => "unknown page",
            UiError::UnknownWidget => "unknown widget",
            UiError::ValueMismatch => "update value does not match widget kind",
            UiError::UnknownChannel => "unknown channel",
        };
        f.write_str(msg)
    }
}

/// Top-level error type used by the firmware binary.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    // UI
    /// Page composition or a UI cycle failed.
    Ui(UiError),

    // Storage
    /// Flash read/write/erase failed.
    Storage,

    /// Stored calibration record could not be parsed.
    CorruptRecord,

    // Display
    /// I²C transaction to the display failed.
    Display,
}

// Convenience conversions

impl From<UiError> for Error {
    fn from(e: UiError) -> Self {
        Error::Ui(e)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Ui(e) => write!(f, "ui: {e}"),
            Error::Storage => f.write_str("flash storage failure"),
            Error::CorruptRecord => f.write_str("corrupt calibration record"),
            Error::Display => f.write_str("display failure"),
        }
    }
}
