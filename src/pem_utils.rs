//! PEM framing helpers for DER payloads.

use crate::error::CertMintError;

/// PEM label for X.509 certificates.
pub const CERTIFICATE_LABEL: &str = "CERTIFICATE";

/// Wraps DER bytes in a PEM block with the given label.
pub fn der_to_pem(der: &[u8], label: &str) -> String {
    let block = pem::Pem::new(label, der);
    pem::encode_config(&block, pem::EncodeConfig::new())
}

/// Unwraps a PEM block back into DER bytes, checking the label.
pub fn pem_to_der(pem_str: &str, expected_label: &str) -> Result<Vec<u8>, CertMintError> {
    let block = pem::parse(pem_str)?;
    if block.tag() != expected_label {
        return Err(CertMintError::DecodingError(format!(
            "expected {expected_label} PEM block, found {}",
            block.tag()
        )));
    }
    Ok(block.contents().to_vec())
}
