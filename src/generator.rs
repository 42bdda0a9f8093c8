//! The certificate generation pipeline: a [`CertificateRequest`] plus key
//! material in, a signed [`Certificate`] out.

use der::asn1::{Any, BitString};
use sha1::{Digest, Sha1};
use x509_cert::certificate::CertificateInner;
use x509_cert::spki::AlgorithmIdentifierOwned;

use crate::cert::Certificate;
use crate::cert::extensions::{
    BasicConstraints, ExtendedKeyUsage, ExtensionParam, KeyUsage, SubjectAltName,
    SubjectKeyIdentifier,
};
use crate::cert::params::CertificateRequest;
use crate::error::CertMintError;
use crate::key::KeyPair;
use crate::tbs_certificate::TbsCertificate;

/// How the new certificate gets its signature.
///
/// The two paths are explicit variants rather than an optional parent, so a
/// caller cannot half-specify one of them.
pub enum SigningMode<'a> {
    /// The certificate signs itself: issuer equals subject and the subject's
    /// own private key produces the signature.
    SelfSigned,
    /// The certificate is signed by `parent`'s key. `signing_key` MUST be
    /// the private key matching `parent`'s public key; that correspondence
    /// is deliberately NOT verified here and is entirely the caller's
    /// responsibility. A mismatched pair yields a certificate that no
    /// verifier will accept.
    ChainSigned {
        parent: &'a Certificate,
        signing_key: &'a KeyPair,
    },
}

/// The one signature algorithm this tool emits: PKCS#1 v1.5 with SHA-256.
/// RSA algorithm identifiers carry an explicit ASN.1 NULL parameter.
pub fn signature_algorithm() -> AlgorithmIdentifierOwned {
    AlgorithmIdentifierOwned {
        oid: const_oid::db::rfc5912::SHA_256_WITH_RSA_ENCRYPTION,
        parameters: Some(Any::null()),
    }
}

/// Generates a certificate from the request.
///
/// The subject name carries only the request's non-empty subject fields.
/// Basic constraints (critical) and a subject key identifier are attached
/// only when the request marks the certificate as a CA; key usage and
/// extended key usage extensions only when the request supplies any; a
/// subject alternative name only when DNS names or IP addresses are present.
/// The serial number comes from the request's serial policy, defaulting to
/// zero.
pub fn generate(
    req: &CertificateRequest,
    mode: SigningMode<'_>,
    subject_key: &KeyPair,
) -> Result<Certificate, CertMintError> {
    let subject = req.subject.to_name()?;
    let spki = subject_key.spki()?;

    let mut extensions: Vec<ExtensionParam> = Vec::new();

    if req.is_ca {
        let basic_constraints = BasicConstraints {
            is_ca: true,
            max_path_length: None,
        };
        extensions.push(ExtensionParam::from_extension(&basic_constraints, true)?);

        let key_id = Sha1::digest(spki.subject_public_key.raw_bytes());
        let ski = SubjectKeyIdentifier(key_id.to_vec());
        extensions.push(ExtensionParam::from_extension(&ski, false)?);
    }

    if !req.key_usage.is_empty() {
        let key_usage = KeyUsage(req.key_usage);
        extensions.push(ExtensionParam::from_extension(&key_usage, true)?);
    }

    if !req.ext_key_usage.is_empty() {
        let ext_key_usage = ExtendedKeyUsage(req.ext_key_usage.clone());
        extensions.push(ExtensionParam::from_extension(&ext_key_usage, false)?);
    }

    if !req.dns_names.is_empty() || !req.ip_addresses.is_empty() {
        let san = SubjectAltName {
            dns_names: req.dns_names.clone(),
            ip_addresses: req.ip_addresses.clone(),
        };
        extensions.push(ExtensionParam::from_extension(&san, false)?);
    }

    let (issuer, signing_key) = match &mode {
        SigningMode::SelfSigned => (subject.clone(), subject_key),
        SigningMode::ChainSigned {
            parent,
            signing_key,
        } => (parent.subject().clone(), *signing_key),
    };

    let tbs = TbsCertificate {
        serial_number: req.serial.resolve(),
        issuer,
        validity: req.validity.clone(),
        subject,
        subject_public_key_info: spki,
        extensions,
    };

    let algorithm = signature_algorithm();
    let tbs_der = tbs.to_der(algorithm.clone())?;
    let signature = signing_key.sign(&tbs_der)?;

    let inner = CertificateInner {
        tbs_certificate: tbs.to_inner(algorithm.clone())?,
        signature_algorithm: algorithm,
        signature: BitString::from_bytes(&signature)
            .map_err(|e| CertMintError::EncodingError(e.to_string()))?,
    };

    Ok(Certificate { inner })
}

/// Generates a self-signed certificate: issuer equals subject and the
/// subject key signs.
pub fn generate_self_signed(
    req: &CertificateRequest,
    subject_key: &KeyPair,
) -> Result<Certificate, CertMintError> {
    generate(req, SigningMode::SelfSigned, subject_key)
}
