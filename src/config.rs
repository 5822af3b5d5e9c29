//! Encoder configuration.

/// Data bytes per record unless configured otherwise.
pub const DEFAULT_CHUNK_SIZE: u8 = 32;

/// Terminator written after each record. Intel Hex readers accept both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineEnding {
    #[default]
    Lf,
    CrLf,
}

impl LineEnding {
    pub fn as_bytes(&self) -> &'static [u8] {
        match self {
            LineEnding::Lf => b"\n",
            LineEnding::CrLf => b"\r\n",
        }
    }
}

/// Settings for a single encode run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncoderConfig {
    /// Maximum data bytes per Data record
    pub chunk_size: u8,
    /// Address of the first Data record
    pub base_address: u16,
    /// Emit `:020000040000FA` before any data
    pub start_record: bool,
    /// Terminator after every record
    pub line_ending: LineEnding,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            base_address: 0,
            start_record: true,
            line_ending: LineEnding::Lf,
        }
    }
}

impl EncoderConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_chunk_size(mut self, chunk_size: u8) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    pub fn with_base_address(mut self, base_address: u16) -> Self {
        self.base_address = base_address;
        self
    }

    pub fn with_start_record(mut self, start_record: bool) -> Self {
        self.start_record = start_record;
        self
    }

    pub fn with_line_ending(mut self, line_ending: LineEnding) -> Self {
        self.line_ending = line_ending;
        self
    }

    /// Rejects settings the encoder cannot make progress with.
    #[cfg(feature = "std")]
    pub fn validate(&self) -> Result<(), crate::EncodeError> {
        if self.chunk_size == 0 {
            return Err(crate::EncodeError::InvalidConfig(
                "chunk size must be at least one byte",
            ));
        }

        Ok(())
    }
}
