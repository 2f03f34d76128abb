//! On-disk spool of packed V02 frames.
//!
//! The format is the raw concatenation of 12-byte V02 frames, no header, no
//! footer — length is implied by file size. Appending is strictly
//! sequential and so is reading, mirroring the original's
//! `fread(buffer, 1, TX_PROTOCOL_SIZE, file)` loop, expressed here as a
//! buffered writer and a `Iterator`-yielding reader.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use thiserror::Error;

use crate::frame::{FrameError, FrameV02, V02_SIZE};

#[derive(Debug, Error)]
pub enum SpoolError {
    #[error("spool I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("spool file size {0} is not a multiple of the {V02_SIZE}-byte frame size")]
    TruncatedFrame(usize),
    #[error("spool frame decode failed: {0}")]
    Frame(#[from] FrameError),
}

pub struct SpoolWriter {
    writer: BufWriter<File>,
}

impl SpoolWriter {
    pub fn create(path: impl AsRef<Path>) -> Result<Self, SpoolError> {
        let file = File::create(path)?;
        Ok(SpoolWriter {
            writer: BufWriter::new(file),
        })
    }

    /// Appends one packed frame. Appending is strictly sequential: this is
    /// the only way to add frames to a spool.
    pub fn append(&mut self, frame: &FrameV02) -> Result<(), SpoolError> {
        self.writer.write_all(&frame.pack())?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<(), SpoolError> {
        self.writer.flush()?;
        Ok(())
    }
}

#[derive(Debug)]
pub struct SpoolReader {
    reader: BufReader<File>,
}

impl SpoolReader {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SpoolError> {
        let file = File::open(path)?;
        let metadata = file.metadata()?;
        if metadata.len() as usize % V02_SIZE != 0 {
            return Err(SpoolError::TruncatedFrame(metadata.len() as usize));
        }
        Ok(SpoolReader {
            reader: BufReader::new(file),
        })
    }

    /// Reads the next frame, strictly sequentially. `Ok(None)` at
    /// end-of-file.
    pub fn next_frame(&mut self) -> Result<Option<FrameV02>, SpoolError> {
        let mut buf = [0u8; V02_SIZE];
        match self.reader.read_exact(&mut buf) {
            Ok(()) => Ok(Some(FrameV02::unpack(&buf)?)),
            Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

impl Iterator for SpoolReader {
    type Item = Result<FrameV02, SpoolError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_frame().transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Seek;

    fn tempfile() -> std::path::PathBuf {
        let mut path = std::env::temp_dir();
        path.push(format!(
            "rmc-spool-test-{}-{}.bin",
            std::process::id(),
            &format!("{:?}", std::thread::current().id())
                .chars()
                .filter(|c| c.is_ascii_alphanumeric())
                .collect::<String>()
        ));
        path
    }

    #[test]
    fn round_trips_frames_in_order() {
        let path = tempfile();
        let frames = vec![
            FrameV02 { code: 0, theta1: 1, theta2: 2, d3: 3 },
            FrameV02 { code: 0, theta1: -1, theta2: -2, d3: -3 },
        ];

        {
            let mut writer = SpoolWriter::create(&path).unwrap();
            for frame in &frames {
                writer.append(frame).unwrap();
            }
            writer.flush().unwrap();
        }

        let file_len = std::fs::metadata(&path).unwrap().len();
        assert_eq!(file_len as usize, frames.len() * V02_SIZE);

        let reader = SpoolReader::open(&path).unwrap();
        let read_back: Vec<FrameV02> = reader.map(|r| r.unwrap()).collect();
        assert_eq!(read_back, frames);

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn rejects_truncated_spool() {
        let path = tempfile();
        {
            let mut file = File::create(&path).unwrap();
            file.write_all(&[0u8; V02_SIZE - 1]).unwrap();
            file.flush().unwrap();
            file.rewind().unwrap();
        }
        let err = SpoolReader::open(&path).unwrap_err();
        assert!(matches!(err, SpoolError::TruncatedFrame(_)));
        let _ = std::fs::remove_file(&path);
    }
}
