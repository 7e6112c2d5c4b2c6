//! SD card file storage
//!
//! Implements [`FileStorage`] on a FAT-formatted card using embedded-sdmmc.
//! Files are opened read-only from the root directory of the first
//! partition; a leading `/` in the name is ignored and names must be 8.3.
//!
//! Each open file holds the volume, root directory and file handles, and
//! releases all three when closed or dropped.

use embedded_hal::delay::DelayNs;
use embedded_hal::spi::SpiDevice;
use embedded_sdmmc::{
    BlockDevice, Error, Mode, RawDirectory, RawFile, RawVolume, SdCard, SdCardError, TimeSource,
    Timestamp, VolumeIdx, VolumeManager,
};
use thermotable_hal::{FileReader, FileStorage};

/// Time source for read-only use
///
/// Always reports the FAT epoch; nothing is written, so no timestamps
/// reach the card.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedTimeSource;

impl TimeSource for FixedTimeSource {
    fn get_timestamp(&self) -> Timestamp {
        Timestamp {
            year_since_1970: 10, // 1980, start of the FAT calendar
            zero_indexed_month: 0,
            zero_indexed_day: 0,
            hours: 0,
            minutes: 0,
            seconds: 0,
        }
    }
}

/// Read-only FAT storage on a block device
pub struct SdCardStorage<D: BlockDevice, T: TimeSource> {
    volume_mgr: VolumeManager<D, T>,
}

impl<D: BlockDevice, T: TimeSource> SdCardStorage<D, T> {
    /// Wrap a block device that is already initialised
    pub fn new(block_device: D, time_source: T) -> Self {
        Self {
            volume_mgr: VolumeManager::new(block_device, time_source),
        }
    }
}

impl<SPI, DELAY, T> SdCardStorage<SdCard<SPI, DELAY>, T>
where
    SPI: SpiDevice<u8>,
    DELAY: DelayNs,
    T: TimeSource,
{
    /// Bring up an SD card on an SPI device and mount it
    ///
    /// The chip-select line belongs to the `SpiDevice`. Querying the card
    /// size forces initialisation, so a missing or dead card fails here
    /// rather than on first open.
    pub fn mount(spi: SPI, delay: DELAY, time_source: T) -> Result<Self, SdCardError> {
        let card = SdCard::new(spi, delay);
        card.num_bytes()?;
        Ok(Self::new(card, time_source))
    }
}

impl<D: BlockDevice, T: TimeSource> FileStorage for SdCardStorage<D, T> {
    type Error = Error<D::Error>;
    type Reader<'a>
        = SdCardFile<'a, D, T>
    where
        Self: 'a;

    fn open(&mut self, name: &str) -> Result<SdCardFile<'_, D, T>, Self::Error> {
        let name = name.trim_start_matches('/');

        let volume = self.volume_mgr.open_raw_volume(VolumeIdx(0))?;

        let dir = match self.volume_mgr.open_root_dir(volume) {
            Ok(dir) => dir,
            Err(e) => {
                let _ = self.volume_mgr.close_volume(volume);
                return Err(e);
            }
        };

        let file = match self.volume_mgr.open_file_in_dir(dir, name, Mode::ReadOnly) {
            Ok(file) => file,
            Err(e) => {
                let _ = self.volume_mgr.close_dir(dir);
                let _ = self.volume_mgr.close_volume(volume);
                return Err(e);
            }
        };

        Ok(SdCardFile {
            volume_mgr: &mut self.volume_mgr,
            volume,
            dir,
            file,
            released: false,
        })
    }
}

/// Open file on the card
pub struct SdCardFile<'a, D: BlockDevice, T: TimeSource> {
    volume_mgr: &'a mut VolumeManager<D, T>,
    volume: RawVolume,
    dir: RawDirectory,
    file: RawFile,
    released: bool,
}

impl<D: BlockDevice, T: TimeSource> SdCardFile<'_, D, T> {
    /// Close file, directory and volume, reporting the first failure
    fn release(&mut self) -> Result<(), Error<D::Error>> {
        if self.released {
            return Ok(());
        }
        self.released = true;

        let file = self.volume_mgr.close_file(self.file);
        let dir = self.volume_mgr.close_dir(self.dir);
        let volume = self.volume_mgr.close_volume(self.volume);
        file.and(dir).and(volume)
    }
}

impl<D: BlockDevice, T: TimeSource> FileReader for SdCardFile<'_, D, T> {
    type Error = Error<D::Error>;

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        match self.volume_mgr.read(self.file, buf) {
            Err(Error::EndOfFile) => Ok(0),
            other => other,
        }
    }

    fn available(&mut self) -> bool {
        matches!(self.volume_mgr.file_eof(self.file), Ok(false))
    }

    fn close(mut self) -> Result<(), Self::Error> {
        self.release()
    }
}

impl<D: BlockDevice, T: TimeSource> Drop for SdCardFile<'_, D, T> {
    fn drop(&mut self) {
        let _ = self.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_sdmmc::{Block, BlockCount, BlockIdx};

    /// Block device with no card behind it
    struct DeadCard;

    #[derive(Debug)]
    struct NoCard;

    impl BlockDevice for DeadCard {
        type Error = NoCard;

        fn read(
            &self,
            _blocks: &mut [Block],
            _start: BlockIdx,
            _reason: &str,
        ) -> Result<(), NoCard> {
            Err(NoCard)
        }

        fn write(&self, _blocks: &[Block], _start: BlockIdx) -> Result<(), NoCard> {
            Err(NoCard)
        }

        fn num_blocks(&self) -> Result<BlockCount, NoCard> {
            Err(NoCard)
        }
    }

    #[test]
    fn test_open_on_dead_card_fails() {
        let mut storage = SdCardStorage::new(DeadCard, FixedTimeSource);
        assert!(storage.open("/ntc.csv").is_err());
        assert!(!storage.exists("/ntc.csv"));
    }

    #[test]
    fn test_fixed_time_source() {
        let ts = FixedTimeSource.get_timestamp();
        assert_eq!(ts.year_since_1970, 10);
        assert_eq!(ts.hours, 0);
    }
}
