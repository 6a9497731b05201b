// ==============================================================================
// stream.rs - Gzip line stream
// ==============================================================================
// Description: Opens a gzip-compressed text file and yields its lines lazily
// Created: 2026-10-18
// Version: 0.1.0
// ==============================================================================
// Notes:
// - MultiGzDecoder keeps reading past the first gzip member, which is
//   required for BGZF (.vcf.gz) files written by bgzip/htslib
// - Memory use is bounded by the longest line, not the file size
// ==============================================================================

use flate2::read::MultiGzDecoder;
use std::fs::File;
use std::io::{BufRead, BufReader, Read, Seek};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::AnMeanError;

/// Gzip member header: ID1, ID2, CM (deflate)
const GZIP_MAGIC: [u8; 3] = [0x1f, 0x8b, 0x08];

/// One decompressed input line with its 1-based line number
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub number: usize,
    pub text: String,
}

/// Lazy, forward-only sequence of lines read from a buffered source
///
/// Line terminators (`\n` and a preceding `\r`) are stripped. The underlying
/// reader is dropped together with the stream, which closes the file on
/// every exit path.
pub struct LineStream<R> {
    reader: R,
    path: PathBuf,
    buf: Vec<u8>,
    line_number: usize,
    done: bool,
}

impl<R: BufRead> LineStream<R> {
    pub fn new(reader: R, path: impl Into<PathBuf>) -> Self {
        Self {
            reader,
            path: path.into(),
            buf: Vec::with_capacity(8192),
            line_number: 0,
            done: false,
        }
    }
}

impl<R: BufRead> Iterator for LineStream<R> {
    type Item = Result<Line, AnMeanError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        self.buf.clear();

        match self.reader.read_until(b'\n', &mut self.buf) {
            Ok(0) => {
                self.done = true;
                None
            }
            Ok(_) => {
                self.line_number += 1;

                if self.buf.last() == Some(&b'\n') {
                    self.buf.pop();
                    if self.buf.last() == Some(&b'\r') {
                        self.buf.pop();
                    }
                }

                let line = std::str::from_utf8(&self.buf)
                    .map(|text| Line {
                        number: self.line_number,
                        text: text.to_owned(),
                    })
                    .map_err(|e| AnMeanError::RecordParse {
                        line: self.line_number,
                        message: format!("line is not valid UTF-8: {}", e),
                    });

                Some(line)
            }
            Err(e) => {
                self.done = true;
                Some(Err(AnMeanError::from_stream(&self.path, e)))
            }
        }
    }
}

pub type GzLineStream = LineStream<BufReader<MultiGzDecoder<File>>>;

/// Open a gzip-compressed file as a lazy line stream
///
/// The gzip magic number is verified before any line is produced, so a plain
/// text file fails here with `Decompression` rather than mid-iteration.
///
/// # Errors
/// * `AnMeanError::Io` - the file does not exist or cannot be read
/// * `AnMeanError::Decompression` - the file does not start with a gzip header
pub fn open_gzip_lines(path: impl AsRef<Path>) -> Result<GzLineStream, AnMeanError> {
    let path = path.as_ref();
    let io_err = |source| AnMeanError::Io {
        path: path.to_path_buf(),
        source,
    };

    let mut file = File::open(path).map_err(io_err)?;
    verify_gzip_magic(&mut file, path)?;
    file.rewind().map_err(io_err)?;

    debug!("Opened gzip stream: {}", path.display());

    let decoder = MultiGzDecoder::new(file);
    Ok(LineStream::new(BufReader::new(decoder), path))
}

fn verify_gzip_magic(file: &mut File, path: &Path) -> Result<(), AnMeanError> {
    let mut magic = [0u8; GZIP_MAGIC.len()];

    if let Err(e) = file.read_exact(&mut magic) {
        return Err(match e.kind() {
            std::io::ErrorKind::UnexpectedEof => AnMeanError::Decompression(format!(
                "{} is too short to be gzip-compressed",
                path.display()
            )),
            _ => AnMeanError::Io {
                path: path.to_path_buf(),
                source: e,
            },
        });
    }

    if magic != GZIP_MAGIC {
        return Err(AnMeanError::Decompression(format!(
            "{} is not gzip-compressed (magic number mismatch)",
            path.display()
        )));
    }

    Ok(())
}
