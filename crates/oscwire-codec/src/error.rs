/// Errors that can occur while encoding or decoding OSC packets.
#[derive(Debug, thiserror::Error)]
pub enum OscError {
    /// No comma-led type-tag string was found before the buffer end.
    #[error("message has no type-tag string")]
    MissingTypeTags,

    /// The type-tag string runs off the end of the buffer.
    #[error("type-tag string is not NUL-terminated")]
    UnterminatedTypeTags,

    /// A bundle header without a complete 16-byte preamble.
    #[error("bundle truncated before timetag")]
    TruncatedBundle,

    /// The transport rejected outbound bytes.
    #[error("transport error: {0}")]
    Transport(#[from] oscwire_transport::TransportError),
}

pub type Result<T> = std::result::Result<T, OscError>;
