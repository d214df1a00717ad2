use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Non-2xx response from the chat service, with the server's own message
    /// when the body carried one.
    #[error("chat service returned HTTP {status}: {message}")]
    Api { status: u16, message: String },

    /// Connection, timeout, or body-decoding failure below the API layer.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The scenario's log sink rejected a write.
    #[error("log sink error: {0}")]
    Log(#[from] std::io::Error),
}
