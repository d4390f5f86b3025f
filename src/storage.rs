//! Persistent storage for channel calibration.
//!
//! Uses the nRF52840's internal flash via the `sequential-storage` crate.
//! The whole calibration table is one map item, rewritten whenever the UI
//! reports a configuration change; `sequential-storage` handles wear
//! levelling and page erase.

use defmt::{error, info, warn};
use embedded_storage_async::nor_flash::NorFlash;
use sequential_storage::cache::NoCache;
use sequential_storage::map::{fetch_item, store_item};

use crate::calibration::{Calibration, CALIBRATION_RECORD_SIZE};
use crate::config::{STORAGE_FLASH_PAGE_COUNT, STORAGE_FLASH_PAGE_START};
use crate::error::Error;

/// Flash page size for nRF52840 (4 KB).
const FLASH_PAGE_SIZE: u32 = 4096;

const STORAGE_START: u32 = STORAGE_FLASH_PAGE_START * FLASH_PAGE_SIZE;
const STORAGE_END: u32 = (STORAGE_FLASH_PAGE_START + STORAGE_FLASH_PAGE_COUNT) * FLASH_PAGE_SIZE;

/// Map key of the calibration record.
const KEY_CALIBRATION: u8 = 0x01;

/// Scratch buffer for `sequential-storage` (item header + key + record).
const SCRATCH_SIZE: usize = 128;

/// Read the stored calibration.
///
/// `Ok(None)` means nothing has been stored yet.
pub async fn load_calibration(flash: &mut impl NorFlash) -> Result<Option<Calibration>, Error> {
    let mut buf = [0u8; SCRATCH_SIZE];

    let stored = fetch_item::<u8, &[u8], _>(
        flash,
        STORAGE_START..STORAGE_END,
        &mut NoCache::new(),
        &mut buf,
        &KEY_CALIBRATION,
    )
    .await
    .map_err(|e| {
        error!("Flash read error: {:?}", defmt::Debug2Format(&e));
        Error::Storage
    })?;

    match stored {
        Some(data) => {
            let calibration = Calibration::deserialize(data).ok_or(Error::CorruptRecord)?;
            info!("Loaded calibration from flash");
            Ok(Some(calibration))
        }
        None => {
            info!("No calibration in flash");
            Ok(None)
        }
    }
}

/// Load the stored calibration, falling back to defaults when nothing
/// usable is stored.
pub async fn load_or_default(flash: &mut impl NorFlash) -> Calibration {
    match load_calibration(flash).await {
        Ok(Some(calibration)) => calibration,
        Ok(None) => Calibration::default(),
        Err(e) => {
            warn!("Calibration: using defaults ({})", e);
            Calibration::default()
        }
    }
}

pub async fn save_calibration(
    flash: &mut impl NorFlash,
    calibration: &Calibration,
) -> Result<(), Error> {
    let mut record = [0u8; CALIBRATION_RECORD_SIZE];
    let len = calibration.serialize(&mut record);
    let item: &[u8] = &record[..len];

    let mut buf = [0u8; SCRATCH_SIZE];
    store_item::<u8, &[u8], _>(
        flash,
        STORAGE_START..STORAGE_END,
        &mut NoCache::new(),
        &mut buf,
        &KEY_CALIBRATION,
        &item,
    )
    .await
    .map_err(|e| {
        error!("Flash write error: {:?}", defmt::Debug2Format(&e));
        Error::Storage
    })?;

    info!("Saved calibration to flash");
    Ok(())
}
