//! Typed wrappers for the X.509 extensions this tool emits.

use std::net::IpAddr;

use const_oid::AssociatedOid;
use der::{
    Decode, Encode,
    asn1::{Ia5String, OctetString},
    oid::ObjectIdentifier,
};
use x509_cert::ext::pkix::name::GeneralName;

use crate::error::CertMintError;
use crate::usage::{ExtendedUsage, FlagSet, KeyUsages};

/// An extension value that can be encoded to and decoded from its DER form.
pub trait X509ExtensionValue {
    /// The Object Identifier (OID) for the extension.
    const OID: ObjectIdentifier;

    /// Encodes the extension value into DER bytes.
    fn to_der_value(&self) -> Result<Vec<u8>, CertMintError>;

    /// Decodes the extension value from DER bytes.
    fn from_der_value(value: &[u8]) -> Result<Self, CertMintError>
    where
        Self: Sized;
}

/// A raw extension as placed into the TBS certificate.
#[derive(Clone, Debug)]
pub struct ExtensionParam {
    pub oid: ObjectIdentifier,
    pub critical: bool,
    /// DER-encoded extension value
    pub value: Vec<u8>,
}

impl ExtensionParam {
    /// Encodes a typed extension value into its raw form.
    pub fn from_extension<E: X509ExtensionValue>(
        extension: &E,
        critical: bool,
    ) -> Result<Self, CertMintError> {
        Ok(Self {
            oid: E::OID,
            critical,
            value: extension.to_der_value()?,
        })
    }

    /// Decodes the raw value back into a typed extension.
    pub fn to_extension<E: X509ExtensionValue>(&self) -> Result<E, CertMintError> {
        E::from_der_value(&self.value)
    }
}

/// Subject Alternative Name: additional DNS and IP identities bound to the
/// certificate beyond the subject common name.
#[derive(Debug, Clone, Default)]
pub struct SubjectAltName {
    pub dns_names: Vec<String>,
    pub ip_addresses: Vec<IpAddr>,
}

impl X509ExtensionValue for SubjectAltName {
    const OID: ObjectIdentifier = x509_cert::ext::pkix::SubjectAltName::OID;

    fn to_der_value(&self) -> Result<Vec<u8>, CertMintError> {
        let mut names = Vec::with_capacity(self.dns_names.len() + self.ip_addresses.len());
        for dns in &self.dns_names {
            let name = Ia5String::new(dns)
                .map_err(|e| CertMintError::InvalidInput(format!("invalid dns name: {e}")))?;
            names.push(GeneralName::DnsName(name));
        }
        for ip in &self.ip_addresses {
            let octets = match ip {
                IpAddr::V4(v4) => v4.octets().to_vec(),
                IpAddr::V6(v6) => v6.octets().to_vec(),
            };
            names.push(GeneralName::IpAddress(OctetString::new(octets)?));
        }
        Ok(x509_cert::ext::pkix::SubjectAltName(names).to_der()?)
    }

    fn from_der_value(value: &[u8]) -> Result<Self, CertMintError> {
        let san = x509_cert::ext::pkix::SubjectAltName::from_der(value)?;
        let mut out = Self::default();
        for name in san.0 {
            match name {
                GeneralName::DnsName(dns) => out.dns_names.push(dns.to_string()),
                GeneralName::IpAddress(octets) => {
                    let bytes = octets.as_bytes();
                    let ip = match bytes.len() {
                        4 => IpAddr::from(<[u8; 4]>::try_from(bytes).unwrap()),
                        16 => IpAddr::from(<[u8; 16]>::try_from(bytes).unwrap()),
                        n => {
                            return Err(CertMintError::DecodingError(format!(
                                "ip address of {n} bytes in subject alternative name"
                            )));
                        }
                    };
                    out.ip_addresses.push(ip);
                }
                other => {
                    return Err(CertMintError::DecodingError(format!(
                        "unsupported general name in subject alternative name: {other:?}"
                    )));
                }
            }
        }
        Ok(out)
    }
}

/// Basic Constraints: whether the certificate is a CA and how deep a chain
/// it may sign.
#[derive(Debug, Clone, Copy, Default)]
pub struct BasicConstraints {
    pub is_ca: bool,
    pub max_path_length: Option<u8>,
}

impl X509ExtensionValue for BasicConstraints {
    const OID: ObjectIdentifier = x509_cert::ext::pkix::BasicConstraints::OID;

    fn to_der_value(&self) -> Result<Vec<u8>, CertMintError> {
        let bc = x509_cert::ext::pkix::BasicConstraints {
            ca: self.is_ca,
            path_len_constraint: self.max_path_length,
        };
        Ok(bc.to_der()?)
    }

    fn from_der_value(value: &[u8]) -> Result<Self, CertMintError> {
        let bc = x509_cert::ext::pkix::BasicConstraints::from_der(value)?;
        Ok(Self {
            is_ca: bc.ca,
            max_path_length: bc.path_len_constraint,
        })
    }
}

/// Key Usage: the cryptographic operations the certified key may perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyUsage(pub FlagSet<KeyUsages>);

impl X509ExtensionValue for KeyUsage {
    const OID: ObjectIdentifier = <x509_cert::ext::pkix::KeyUsage as AssociatedOid>::OID;

    fn to_der_value(&self) -> Result<Vec<u8>, CertMintError> {
        Ok(x509_cert::ext::pkix::KeyUsage(self.0).to_der()?)
    }

    fn from_der_value(value: &[u8]) -> Result<Self, CertMintError> {
        let ku = x509_cert::ext::pkix::KeyUsage::from_der(value)?;
        Ok(Self(ku.0))
    }
}

/// Extended Key Usage: purposes the certified key may be used for.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtendedKeyUsage(pub Vec<ExtendedUsage>);

impl X509ExtensionValue for ExtendedKeyUsage {
    const OID: ObjectIdentifier = x509_cert::ext::pkix::ExtendedKeyUsage::OID;

    fn to_der_value(&self) -> Result<Vec<u8>, CertMintError> {
        let oids: Vec<ObjectIdentifier> = self.0.iter().map(|u| (*u).into()).collect();
        Ok(x509_cert::ext::pkix::ExtendedKeyUsage(oids).to_der()?)
    }

    fn from_der_value(value: &[u8]) -> Result<Self, CertMintError> {
        let eku = x509_cert::ext::pkix::ExtendedKeyUsage::from_der(value)?;
        let usages = eku
            .0
            .into_iter()
            .map(ExtendedUsage::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self(usages))
    }
}

/// Subject Key Identifier: a digest of the subject public key, attached to
/// CA certificates so issued certificates can point back at them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectKeyIdentifier(pub Vec<u8>);

impl X509ExtensionValue for SubjectKeyIdentifier {
    const OID: ObjectIdentifier = x509_cert::ext::pkix::SubjectKeyIdentifier::OID;

    fn to_der_value(&self) -> Result<Vec<u8>, CertMintError> {
        let ski = x509_cert::ext::pkix::SubjectKeyIdentifier(OctetString::new(self.0.as_slice())?);
        Ok(ski.to_der()?)
    }

    fn from_der_value(value: &[u8]) -> Result<Self, CertMintError> {
        let ski = x509_cert::ext::pkix::SubjectKeyIdentifier::from_der(value)?;
        Ok(Self(ski.0.as_bytes().to_vec()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_constraints_round_trip() {
        let original = BasicConstraints {
            is_ca: true,
            max_path_length: Some(3),
        };
        let encoded = original.to_der_value().unwrap();
        let decoded = BasicConstraints::from_der_value(&encoded).unwrap();
        assert_eq!(original.is_ca, decoded.is_ca);
        assert_eq!(original.max_path_length, decoded.max_path_length);
    }

    #[test]
    fn key_usage_round_trip() {
        let original = KeyUsage(KeyUsages::DigitalSignature | KeyUsages::KeyEncipherment);
        let encoded = original.to_der_value().unwrap();
        let decoded = KeyUsage::from_der_value(&encoded).unwrap();
        assert_eq!(original, decoded);
    }

    #[test]
    fn extended_key_usage_round_trip_full_vocabulary() {
        let original = ExtendedKeyUsage(
            crate::usage::EXT_KEY_USAGE_NAMES
                .iter()
                .map(|(_, u)| *u)
                .collect(),
        );
        let encoded = original.to_der_value().unwrap();
        let decoded = ExtendedKeyUsage::from_der_value(&encoded).unwrap();
        assert_eq!(original, decoded);
    }

    #[test]
    fn subject_alt_name_round_trip_with_ips() {
        let original = SubjectAltName {
            dns_names: vec!["example.com".to_string(), "www.example.com".to_string()],
            ip_addresses: vec!["10.1.2.3".parse().unwrap(), "::1".parse().unwrap()],
        };
        let encoded = original.to_der_value().unwrap();
        let decoded = SubjectAltName::from_der_value(&encoded).unwrap();
        assert_eq!(original.dns_names, decoded.dns_names);
        assert_eq!(original.ip_addresses, decoded.ip_addresses);
    }

    #[test]
    fn subject_key_identifier_round_trip() {
        let original = SubjectKeyIdentifier(vec![1, 2, 3, 4, 5]);
        let encoded = original.to_der_value().unwrap();
        let decoded = SubjectKeyIdentifier::from_der_value(&encoded).unwrap();
        assert_eq!(original, decoded);
    }
}
