#![allow(dead_code)]

use der::Encode;
use rsa::RsaPublicKey;
use rsa::pkcs8::DecodePublicKey;
use rsa::pkcs1v15::{Signature, VerifyingKey};
use rsa::signature::Verifier;
use sha2::Sha256;
use std::time::SystemTime;
use x509_cert::time::Time;

use certmint::cert::Certificate;
use certmint::cert::params::{CertificateRequest, Subject, Validity};
use certmint::generator;
use certmint::key::KeyPair;
use certmint::usage;

/// Generates a 1024-bit self-signed CA certificate for use as a signing
/// parent in tests. Small key size keeps the tests fast; real deployments
/// use 2048 bits or more.
pub fn generate_ca(common_name: &str) -> (Certificate, KeyPair) {
    let key = KeyPair::generate(1024).unwrap();
    let request = CertificateRequest::builder()
        .subject(Subject::builder().common_name(common_name).build())
        .validity(Validity::for_days(365).unwrap())
        .is_ca(true)
        .key_usage(usage::parse_key_usage_str("KeyUsageCertSign,KeyUsageCRLSign").unwrap())
        .build();
    let cert = generator::generate_self_signed(&request, &key).unwrap();
    (cert, key)
}

/// Extracts the RSA public key embedded in the certificate.
pub fn embedded_public_key(cert: &Certificate) -> RsaPublicKey {
    let spki_der = cert
        .inner
        .tbs_certificate
        .subject_public_key_info
        .to_der()
        .unwrap();
    RsaPublicKey::from_public_key_der(&spki_der).unwrap()
}

/// Checks the certificate signature against a candidate signer public key.
pub fn signature_verifies(cert: &Certificate, signer: &RsaPublicKey) -> bool {
    let tbs_der = cert.inner.tbs_certificate.to_der().unwrap();
    let Ok(signature) = Signature::try_from(cert.inner.signature.raw_bytes()) else {
        return false;
    };
    let verifying_key = VerifyingKey::<Sha256>::new(signer.clone());
    verifying_key.verify(&tbs_der, &signature).is_ok()
}

/// Finds the first attribute with the given dotted OID in a name and decodes
/// its string value.
pub fn attr_value(name: &x509_cert::name::Name, oid: &str) -> Option<String> {
    for rdn in name.0.iter() {
        for attr in rdn.0.iter() {
            if attr.oid.to_string() == oid {
                return attr.value.decode_as::<String>().ok();
            }
        }
    }
    None
}

pub fn to_system_time(time: &Time) -> SystemTime {
    match time {
        Time::UtcTime(ut) => ut.to_system_time(),
        Time::GeneralTime(gt) => gt.to_system_time(),
    }
}
