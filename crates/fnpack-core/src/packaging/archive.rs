//! Zip output for a packaging run.

use crate::PackConfig;
use crate::PackError;
use crate::Result;
use crate::packaging::walker::WalkedEntry;
use crate::packaging::walker::WalkedType;
use std::fs::File;
use std::io::BufWriter;
use std::io::Read;
use std::io::Write;
use std::path::Path;
use zip::CompressionMethod;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

const COPY_BUFFER_SIZE: usize = 64 * 1024;

/// Streams walked entries into a Deflate-compressed zip file.
///
/// The destination is created (or truncated) by [`ArchiveWriter::create`].
/// Nothing is guaranteed to be on disk until [`ArchiveWriter::finish`]
/// returns; dropping the writer early leaves a truncated archive behind.
pub struct ArchiveWriter {
    zip: ZipWriter<BufWriter<File>>,
    options: SimpleFileOptions,
    preserve_permissions: bool,
    buffer: Vec<u8>,
}

impl ArchiveWriter {
    /// Opens `destination` for writing.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the file cannot
    /// be created.
    pub fn create(destination: &Path, config: &PackConfig) -> Result<Self> {
        config.validate()?;
        let file = File::create(destination)?;

        let options = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .compression_level(Some(i64::from(config.compression_level)));

        Ok(Self {
            zip: ZipWriter::new(BufWriter::new(file)),
            options,
            preserve_permissions: config.preserve_permissions,
            buffer: vec![0u8; COPY_BUFFER_SIZE],
        })
    }

    /// Writes one entry; returns the number of source bytes read.
    ///
    /// # Errors
    ///
    /// Source read faults are reported as [`PackError::ArchiveWarning`],
    /// zip faults as [`PackError::Archive`].
    pub fn add(&mut self, entry: &WalkedEntry) -> Result<u64> {
        match &entry.entry_type {
            WalkedType::File => self.add_file(entry),
            WalkedType::Directory => {
                self.add_directory(entry)?;
                Ok(0)
            }
            WalkedType::Symlink { target } => {
                self.add_symlink(entry, target)?;
                Ok(0)
            }
        }
    }

    fn entry_options(&self, entry: &WalkedEntry) -> SimpleFileOptions {
        if self.preserve_permissions {
            self.options.unix_permissions(entry.mode)
        } else {
            self.options
        }
    }

    fn add_file(&mut self, entry: &WalkedEntry) -> Result<u64> {
        let mut file = File::open(&entry.path).map_err(|e| read_warning(&entry.path, &e))?;

        let options = self
            .entry_options(entry)
            .large_file(entry.size >= u64::from(u32::MAX));
        self.zip.start_file(entry.archive_name.as_str(), options)?;

        let mut bytes_read = 0u64;
        loop {
            let n = file
                .read(&mut self.buffer)
                .map_err(|e| read_warning(&entry.path, &e))?;
            if n == 0 {
                break;
            }
            self.zip.write_all(&self.buffer[..n])?;
            bytes_read += n as u64;
        }

        Ok(bytes_read)
    }

    fn add_directory(&mut self, entry: &WalkedEntry) -> Result<()> {
        // zip marks directories with a trailing separator
        let name = format!("{}/", entry.archive_name);
        let options = self.entry_options(entry);
        self.zip.add_directory(name, options)?;
        Ok(())
    }

    fn add_symlink(&mut self, entry: &WalkedEntry, target: &Path) -> Result<()> {
        let target = target
            .to_str()
            .ok_or_else(|| PackError::ArchiveWarning {
                path: entry.path.clone(),
                message: "symlink target is not valid UTF-8".to_string(),
            })?
            .replace('\\', "/");
        self.zip
            .add_symlink(entry.archive_name.as_str(), target.as_str(), self.options)?;
        Ok(())
    }

    /// Writes the central directory, flushes and syncs the file.
    ///
    /// Returns the size of the finished archive in bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if finalizing, flushing or syncing fails.
    pub fn finish(self) -> Result<u64> {
        let writer = self.zip.finish()?;
        let file = writer.into_inner().map_err(|e| PackError::Io(e.into_error()))?;
        file.sync_all()?;
        Ok(file.metadata()?.len())
    }
}

fn read_warning(path: &Path, err: &std::io::Error) -> PackError {
    PackError::ArchiveWarning {
        path: path.to_path_buf(),
        message: format!("cannot read source file: {err}"),
    }
}
