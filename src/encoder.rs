//! Streaming binary to Intel Hex encoder.
//!
//! The input is cut into chunks of `chunk_size` bytes, each emitted as a Data
//! record at the running 16 bit address. When the address runs past 0xFFFF an
//! Extended Segment Address record carrying the next segment number is
//! emitted and the address is pulled back into range. The output always ends
//! with `:00000001FF`.

use std::fs::File;
use std::io::{self, BufReader, ErrorKind, Read, Write};
use std::path::Path;

use tracing::{debug, trace};

use crate::config::EncoderConfig;
use crate::error::EncodeError;
use crate::serializer::MAX_RECORD_LENGTH;
use crate::{IHex, EOF_RECORD};

/// Highest address a record can carry.
const MAX_ADDRESS: u32 = 0xFFFF;

/// Amount taken off the running address on each segment overflow.
const SEGMENT_SPAN: u32 = 0xFFFF;

/// Running position of an encode run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EncoderState {
    pub current_address: u32,
    pub segment_counter: u16,
}

/// Totals for a finished (or aborted) run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EncodeSummary {
    pub bytes_read: u64,
    pub data_records: u64,
    pub segment_records: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Start,
    Streaming,
    SegmentOverflow { exhausted: bool },
    Done,
    Finished,
}

pub struct Encoder<R> {
    reader: R,
    config: EncoderConfig,
    state: EncoderState,
    stage: Stage,
    summary: EncodeSummary,
    chunk: [u8; 0xFF],
}

impl<R: Read> Encoder<R> {
    pub fn new(reader: R, config: EncoderConfig) -> Result<Self, EncodeError> {
        config.validate()?;

        Ok(Encoder {
            reader,
            state: EncoderState {
                current_address: u32::from(config.base_address),
                segment_counter: 0,
            },
            config,
            stage: Stage::Start,
            summary: EncodeSummary::default(),
            chunk: [0; 0xFF],
        })
    }

    pub fn state(&self) -> EncoderState {
        self.state
    }

    pub fn summary(&self) -> EncodeSummary {
        self.summary
    }

    /// Produces the next record, or `None` once the End of File record has
    /// been handed out. Data records borrow the encoder's chunk buffer.
    ///
    /// A read error ends the run; later calls return `None`.
    pub fn next_record(&mut self) -> Result<Option<IHex<'_>>, EncodeError> {
        loop {
            match self.stage {
                Stage::Start => {
                    self.stage = Stage::Streaming;

                    if self.config.start_record {
                        return Ok(Some(IHex::StartAddress));
                    }
                }
                Stage::Streaming => {
                    let chunk_size = usize::from(self.config.chunk_size);
                    let read = match read_chunk(&mut self.reader, &mut self.chunk[..chunk_size]) {
                        Ok(read) => read,
                        Err(e) => {
                            self.stage = Stage::Finished;
                            return Err(e);
                        }
                    };

                    if read == 0 {
                        self.stage = Stage::Done;
                        continue;
                    }

                    // Always in range, overflow is resolved before the next read.
                    let offset = self.state.current_address as u16;
                    self.state.current_address += read as u32;
                    self.summary.bytes_read += read as u64;
                    self.summary.data_records += 1;

                    let exhausted = read < chunk_size;
                    self.stage = if self.state.current_address > MAX_ADDRESS {
                        Stage::SegmentOverflow { exhausted }
                    } else if exhausted {
                        Stage::Done
                    } else {
                        Stage::Streaming
                    };

                    return Ok(Some(IHex::Data {
                        offset,
                        bytes: &self.chunk[..read],
                    }));
                }
                Stage::SegmentOverflow { exhausted } => {
                    self.state.current_address -= SEGMENT_SPAN;
                    self.state.segment_counter = self.state.segment_counter.wrapping_add(1);
                    self.summary.segment_records += 1;
                    self.stage = if exhausted {
                        Stage::Done
                    } else {
                        Stage::Streaming
                    };

                    debug!(
                        segment = self.state.segment_counter,
                        address = self.state.current_address,
                        "address overflow, starting new segment"
                    );

                    return Ok(Some(IHex::ExtendedSegmentAddress(
                        self.state.segment_counter,
                    )));
                }
                Stage::Done => {
                    self.stage = Stage::Finished;
                    return Ok(Some(IHex::EndOfFile));
                }
                Stage::Finished => return Ok(None),
            }
        }
    }

    /// Runs the encoder to completion, writing one line per record.
    pub fn write_to<W: Write>(mut self, writer: &mut W) -> Result<EncodeSummary, EncodeError> {
        let line_ending = self.config.line_ending;
        let mut line = [0u8; MAX_RECORD_LENGTH];

        while let Some(record) = self.next_record()? {
            trace!(%record, "emitting record");

            let text = match record {
                IHex::EndOfFile => EOF_RECORD.as_bytes(),
                record => {
                    let length = record.serialize(&mut line)?;
                    &line[..length]
                }
            };

            writer.write_all(text).map_err(EncodeError::Write)?;
            writer
                .write_all(line_ending.as_bytes())
                .map_err(EncodeError::Write)?;
        }

        writer.flush().map_err(EncodeError::Write)?;

        debug!(
            bytes = self.summary.bytes_read,
            data_records = self.summary.data_records,
            segment_records = self.summary.segment_records,
            "encoding finished"
        );

        Ok(self.summary)
    }
}

/// Fills `buffer` from `reader` until it is full or the stream ends.
fn read_chunk<R: Read>(reader: &mut R, buffer: &mut [u8]) -> Result<usize, EncodeError> {
    let mut filled = 0;

    while filled < buffer.len() {
        match reader.read(&mut buffer[filled..]) {
            Ok(0) => break,
            Ok(read) => filled += read,
            Err(e) if e.kind() == ErrorKind::Interrupted => {}
            Err(e) => return Err(EncodeError::Read(e)),
        }
    }

    Ok(filled)
}

/// Encodes everything `reader` yields into `writer`.
pub fn encode<R, W>(reader: R, writer: &mut W, config: &EncoderConfig) -> Result<EncodeSummary, EncodeError>
where
    R: Read,
    W: Write,
{
    Encoder::new(reader, config.clone())?.write_to(writer)
}

/// Encodes everything `reader` yields and returns the text.
pub fn encode_to_string<R: Read>(reader: R, config: &EncoderConfig) -> Result<String, EncodeError> {
    let mut output = Vec::new();
    encode(reader, &mut output, config)?;

    // Records are plain ASCII.
    Ok(String::from_utf8_lossy(&output).into_owned())
}

/// Opens `path` for reading, or standard input when no path (or an empty one)
/// is given.
pub fn open_input(path: Option<&Path>) -> Result<Box<dyn Read>, EncodeError> {
    match path {
        Some(path) if !path.as_os_str().is_empty() => {
            let file = File::open(path).map_err(|source| EncodeError::InputUnavailable {
                path: path.to_path_buf(),
                source,
            })?;
            debug!(path = %path.display(), "reading input file");

            Ok(Box::new(BufReader::new(file)))
        }
        _ => {
            debug!("reading standard input");

            Ok(Box::new(io::stdin().lock()))
        }
    }
}
