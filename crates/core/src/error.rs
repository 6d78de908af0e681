/// Result alias that carries the custom [`KeylightError`] type.
pub type Result<T> = std::result::Result<T, KeylightError>;

/// Common error type for the core crate.
#[derive(Debug, thiserror::Error)]
pub enum KeylightError {
    /// A note number escaped the 7-bit MIDI domain.
    #[error("note {0} is outside the MIDI range 0-127")]
    NoteOutOfRange(u8),
    /// A velocity value escaped the 7-bit MIDI domain.
    #[error("velocity {0} is outside the MIDI range 0-127")]
    VelocityOutOfRange(u8),
    /// The render sink rejected a write. Lane state is left as it was so the
    /// caller can inspect it.
    #[error("render sink error: {0}")]
    Render(String),
    /// Enumerating, opening or reading the input device failed.
    #[error("input device error: {0}")]
    Device(String),
    /// A configuration file could not be parsed.
    #[error("could not parse configuration: {0}")]
    ConfigParse(#[from] serde_json::Error),
    /// A configuration value failed validation.
    #[error("invalid configuration: {0}")]
    Config(String),
    /// Wrapper around standard IO errors.
    #[error("{0}")]
    Io(#[from] std::io::Error),
}

impl KeylightError {
    /// Creates a render sink error from the provided message.
    pub fn render<T: Into<String>>(msg: T) -> Self {
        Self::Render(msg.into())
    }

    /// Creates an input device error from the provided message.
    pub fn device<T: Into<String>>(msg: T) -> Self {
        Self::Device(msg.into())
    }

    /// Creates a configuration validation error from the provided message.
    pub fn config<T: Into<String>>(msg: T) -> Self {
        Self::Config(msg.into())
    }

    /// True for per-event domain errors. The dispatch loop skips the
    /// offending event instead of aborting on these.
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::NoteOutOfRange(_) | Self::VelocityOutOfRange(_))
    }
}
