pub mod extensions;
pub mod params;

use der::{Decode, DecodePem, Encode, EncodePem};
use x509_cert::certificate::CertificateInner;
use x509_cert::name::Name;

use crate::cert::extensions::{BasicConstraints, X509ExtensionValue};
use crate::error::CertMintError;

pub type Result<T> = std::result::Result<T, CertMintError>;

/// An X.509 certificate, either freshly generated or loaded as a signing
/// parent.
#[derive(Debug, Clone)]
pub struct Certificate {
    /// The inner representation of the certificate.
    pub inner: CertificateInner,
}

impl Certificate {
    /// Encodes the certificate into DER bytes.
    pub fn to_der(&self) -> Result<Vec<u8>> {
        self.inner
            .to_der()
            .map_err(|e| CertMintError::EncodingError(e.to_string()))
    }

    /// Encodes the certificate into a `CERTIFICATE` PEM block.
    pub fn to_pem(&self) -> Result<String> {
        self.inner
            .to_pem(pkcs8::LineEnding::LF)
            .map_err(|e| CertMintError::EncodingError(e.to_string()))
    }

    /// Decodes a certificate from DER bytes.
    pub fn from_der(der: &[u8]) -> Result<Self> {
        let inner = CertificateInner::from_der(der)
            .map_err(|e| CertMintError::CertificateLoadFailure(e.to_string()))?;
        Ok(Self { inner })
    }

    /// Decodes a certificate from a `CERTIFICATE` PEM block.
    pub fn from_pem(pem: &str) -> Result<Self> {
        let inner = CertificateInner::from_pem(pem.as_bytes())
            .map_err(|e| CertMintError::CertificateLoadFailure(e.to_string()))?;
        Ok(Self { inner })
    }

    /// The subject name of the certificate.
    pub fn subject(&self) -> &Name {
        &self.inner.tbs_certificate.subject
    }

    /// The issuer name of the certificate.
    pub fn issuer(&self) -> &Name {
        &self.inner.tbs_certificate.issuer
    }

    /// Whether the certificate carries a basic-constraints extension with
    /// the CA flag set. Certificates without the extension are not CAs.
    pub fn is_ca(&self) -> Result<bool> {
        let Some(extensions) = &self.inner.tbs_certificate.extensions else {
            return Ok(false);
        };
        for ext in extensions {
            if ext.extn_id == BasicConstraints::OID {
                let bc = BasicConstraints::from_der_value(ext.extn_value.as_bytes())?;
                return Ok(bc.is_ca);
            }
        }
        Ok(false)
    }
}
