use thiserror::Error;

/// Errors produced while parsing certificate parameters or generating
/// certificates.
///
/// Every variant is terminal for the invocation that produced it: generation
/// is deterministic given its inputs, so nothing here is retried.
#[derive(Debug, Error, Clone)]
pub enum CertMintError {
    /// A key usage name not present in the vocabulary.
    #[error("unknown key usage: {0}")]
    UnknownKeyUsage(String),

    /// An extended key usage name not present in the vocabulary.
    #[error("unknown extended key usage: {0}")]
    UnknownExtKeyUsage(String),

    /// A non-positive validity day count.
    #[error("invalid validity period: {0} days")]
    InvalidValidityPeriod(i64),

    /// A private key file that could not be decoded.
    #[error("failed to load key: {0}")]
    KeyLoadFailure(String),

    /// A parent certificate file that could not be decoded.
    #[error("failed to load certificate: {0}")]
    CertificateLoadFailure(String),

    /// Error during data encoding.
    #[error("failed to encode data: {0}")]
    EncodingError(String),

    /// Error during data decoding.
    #[error("failed to decode data: {0}")]
    DecodingError(String),

    /// Error due to invalid input.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Error during key generation.
    #[error("key generation error: {0}")]
    KeyGenerationError(String),

    /// Error while producing the certificate signature.
    #[error("signing error: {0}")]
    SigningError(String),
}

impl From<der::Error> for CertMintError {
    fn from(err: der::Error) -> Self {
        CertMintError::DecodingError(err.to_string())
    }
}

impl From<rsa::Error> for CertMintError {
    fn from(err: rsa::Error) -> Self {
        CertMintError::KeyGenerationError(err.to_string())
    }
}

impl From<rsa::pkcs1::Error> for CertMintError {
    fn from(err: rsa::pkcs1::Error) -> Self {
        CertMintError::KeyLoadFailure(err.to_string())
    }
}

impl From<pem::PemError> for CertMintError {
    fn from(err: pem::PemError) -> Self {
        CertMintError::DecodingError(err.to_string())
    }
}
