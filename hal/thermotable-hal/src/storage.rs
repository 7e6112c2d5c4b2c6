//! File storage abstractions
//!
//! Provides a read-only view of a filesystem on removable media: open a
//! file by name, pull bytes from it in order, close it.

/// Sequential reader over one open file
///
/// A reader is obtained from [`FileStorage::open`] and must be handed back
/// through [`FileReader::close`] once the caller is done with it.
pub trait FileReader {
    /// Error type for read and close operations
    type Error;

    /// Read the next bytes of the file into `buf`
    ///
    /// Returns the number of bytes read. `Ok(0)` with a non-empty buffer
    /// signals end of file.
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error>;

    /// Check whether unread bytes remain
    fn available(&mut self) -> bool;

    /// Release the file handle
    fn close(self) -> Result<(), Self::Error>;
}

/// Filesystem that can open named files for reading
pub trait FileStorage {
    /// Error type for open operations
    type Error;

    /// Reader handed out for an open file
    type Reader<'a>: FileReader<Error = Self::Error>
    where
        Self: 'a;

    /// Open a file by name for sequential reading
    fn open(&mut self, name: &str) -> Result<Self::Reader<'_>, Self::Error>;

    /// Check if a file exists
    ///
    /// The default implementation opens and immediately closes the file.
    fn exists(&mut self, name: &str) -> bool {
        match self.open(name) {
            Ok(reader) => reader.close().is_ok(),
            Err(_) => false,
        }
    }
}
