/// Errors surfaced by the endpoint layer.
#[derive(Debug, thiserror::Error)]
pub enum EndpointError {
    /// The underlying transport failed.
    #[error("transport error: {0}")]
    Transport(#[from] oscwire_transport::TransportError),

    /// SLIP framing failed on the stream.
    #[error("framing error: {0}")]
    Slip(#[from] oscwire_slip::SlipError),

    /// OSC encoding failed.
    #[error("osc error: {0}")]
    Osc(#[from] oscwire_codec::OscError),
}

pub type Result<T> = std::result::Result<T, EndpointError>;
