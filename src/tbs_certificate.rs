//! Construction of the "to be signed" portion of a certificate.

use der::asn1::{GeneralizedTime, OctetString, UtcTime};
use der::{DateTime, Encode};
use time::OffsetDateTime;
use x509_cert::Version;
use x509_cert::certificate::TbsCertificateInner;
use x509_cert::name::Name;
use x509_cert::serial_number::SerialNumber;
use x509_cert::spki::{AlgorithmIdentifierOwned, SubjectPublicKeyInfoOwned};
use x509_cert::time::{Time, Validity as X509Validity};

use crate::cert::extensions::ExtensionParam;
use crate::cert::params::Validity;
use crate::error::CertMintError;

/// The unsigned body of a certificate, ready to be DER-encoded and signed.
pub struct TbsCertificate {
    /// Serial number as a big-endian unsigned integer.
    pub serial_number: Vec<u8>,
    /// Issuer distinguished name.
    pub issuer: Name,
    /// Validity window.
    pub validity: Validity,
    /// Subject distinguished name.
    pub subject: Name,
    /// Subject's public key.
    pub subject_public_key_info: SubjectPublicKeyInfoOwned,
    /// Certificate extensions.
    pub extensions: Vec<ExtensionParam>,
}

impl TbsCertificate {
    /// Converts into the x509-cert representation, stamping the signature
    /// algorithm that the outer certificate will also carry.
    pub fn to_inner(
        &self,
        signature_algorithm: AlgorithmIdentifierOwned,
    ) -> Result<TbsCertificateInner, CertMintError> {
        let extensions = self
            .extensions
            .iter()
            .map(|ext| {
                Ok(x509_cert::ext::Extension {
                    extn_id: ext.oid,
                    critical: ext.critical,
                    extn_value: OctetString::new(ext.value.clone())?,
                })
            })
            .collect::<Result<Vec<_>, der::Error>>()?;

        let validity = X509Validity {
            not_before: encode_time(self.validity.not_before)?,
            not_after: encode_time(self.validity.not_after)?,
        };

        let serial_number = SerialNumber::new(self.serial_number.as_slice())
            .map_err(|e| CertMintError::EncodingError(format!("invalid serial number: {e}")))?;

        Ok(TbsCertificateInner {
            version: Version::V3,
            serial_number,
            signature: signature_algorithm,
            issuer: self.issuer.clone(),
            validity,
            subject: self.subject.clone(),
            subject_public_key_info: self.subject_public_key_info.clone(),
            issuer_unique_id: None,
            subject_unique_id: None,
            extensions: if extensions.is_empty() {
                None
            } else {
                Some(extensions)
            },
        })
    }

    /// DER-encodes the TBS body, the exact bytes the signature covers.
    pub fn to_der(
        &self,
        signature_algorithm: AlgorithmIdentifierOwned,
    ) -> Result<Vec<u8>, CertMintError> {
        self.to_inner(signature_algorithm)?
            .to_der()
            .map_err(|e| CertMintError::EncodingError(e.to_string()))
    }
}

/// Encodes a timestamp per RFC 5280: UTCTime through 2049, GeneralizedTime
/// from 2050 on.
fn encode_time(t: OffsetDateTime) -> Result<Time, CertMintError> {
    let system_time: std::time::SystemTime = t.into();
    let time = if t.year() < 2050 {
        Time::UtcTime(
            UtcTime::from_system_time(system_time)
                .map_err(|e| CertMintError::EncodingError(e.to_string()))?,
        )
    } else {
        let dt = DateTime::try_from(system_time)
            .map_err(|e| CertMintError::EncodingError(e.to_string()))?;
        Time::GeneralTime(GeneralizedTime::from_date_time(dt))
    };
    Ok(time)
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn time_encoding_switches_at_2050() {
        match encode_time(datetime!(2030-01-01 00:00 UTC)).unwrap() {
            Time::UtcTime(_) => {}
            other => panic!("expected UTCTime, got {other:?}"),
        }
        match encode_time(datetime!(2050-01-01 00:00 UTC)).unwrap() {
            Time::GeneralTime(_) => {}
            other => panic!("expected GeneralizedTime, got {other:?}"),
        }
    }
}
