/// Errors that can occur while framing packets over a stream.
#[derive(Debug, thiserror::Error)]
pub enum SlipError {
    /// An I/O error occurred on the underlying stream.
    #[error("slip I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The underlying transport failed or closed.
    #[error("slip transport error: {0}")]
    Transport(#[from] oscwire_transport::TransportError),

    /// The stream closed before a packet terminator was seen.
    #[error("stream closed (incomplete packet)")]
    ConnectionClosed,
}

pub type Result<T> = std::result::Result<T, SlipError>;
