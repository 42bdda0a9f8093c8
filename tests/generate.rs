mod util;

use std::time::Duration;

use certmint::cert::Certificate;
use certmint::cert::extensions::{SubjectAltName, X509ExtensionValue};
use certmint::cert::params::{CertificateRequest, SerialPolicy, Subject, Validity};
use certmint::generator::{self, SigningMode};
use certmint::key::KeyPair;
use certmint::usage;

/// Self-signed round trip: decoding the generated certificate yields the
/// requested common name, CA flag and a validity window of exactly 100 days.
#[test]
fn self_signed_round_trip() {
    let key = KeyPair::generate(1024).unwrap();
    let request = CertificateRequest::builder()
        .subject(Subject::builder().common_name("test").build())
        .validity(Validity::for_days(100).unwrap())
        .is_ca(true)
        .build();

    let cert = generator::generate_self_signed(&request, &key).unwrap();
    let decoded = Certificate::from_der(&cert.to_der().unwrap()).unwrap();

    assert_eq!(decoded.subject().to_string(), "CN=test");
    assert!(decoded.is_ca().unwrap());
    assert_eq!(decoded.subject(), decoded.issuer());

    let validity = &decoded.inner.tbs_certificate.validity;
    let not_before = util::to_system_time(&validity.not_before);
    let not_after = util::to_system_time(&validity.not_after);
    assert_eq!(
        not_after.duration_since(not_before).unwrap(),
        Duration::from_secs(100 * 24 * 60 * 60)
    );
}

/// Empty optional subject fields are omitted from the encoded subject, not
/// encoded as empty-string RDNs.
#[test]
fn empty_subject_fields_are_omitted() {
    let key = KeyPair::generate(1024).unwrap();
    let request = CertificateRequest::builder()
        .subject(Subject {
            common_name: "test".to_string(),
            organization: Some(String::new()),
            organizational_unit: None,
        })
        .validity(Validity::for_days(30).unwrap())
        .build();

    let cert = generator::generate_self_signed(&request, &key).unwrap();
    let subject = cert.subject().to_string();
    assert_eq!(subject, "CN=test");
    assert!(!subject.contains("O="));
    assert!(!subject.contains("OU="));
}

/// Subject fields containing RFC 4514 metacharacters are carried into the
/// certificate verbatim, no escaping required of the caller.
#[test]
fn subject_special_characters_survive_generation() {
    let key = KeyPair::generate(1024).unwrap();
    let request = CertificateRequest::builder()
        .subject(
            Subject::builder()
                .common_name("Acme, Inc.")
                .organization("Acme + Partners, Ltd.")
                .build(),
        )
        .validity(Validity::for_days(30).unwrap())
        .build();

    let cert = generator::generate_self_signed(&request, &key).unwrap();
    let decoded = Certificate::from_der(&cert.to_der().unwrap()).unwrap();

    assert_eq!(
        util::attr_value(decoded.subject(), "2.5.4.3").as_deref(),
        Some("Acme, Inc.")
    );
    assert_eq!(
        util::attr_value(decoded.subject(), "2.5.4.10").as_deref(),
        Some("Acme + Partners, Ltd.")
    );
}

/// Self-signed certificates at both ends of the supported key size range
/// verify against their own embedded public key.
#[test]
fn self_signed_verifies_with_own_key() {
    for bits in [1024, 4096] {
        let key = KeyPair::generate(bits).unwrap();
        let request = CertificateRequest::builder()
            .subject(Subject::builder().common_name("self.test").build())
            .validity(Validity::for_days(10).unwrap())
            .build();

        let cert = generator::generate_self_signed(&request, &key).unwrap();
        let embedded = util::embedded_public_key(&cert);
        assert_eq!(&embedded, key.public());
        assert!(util::signature_verifies(&cert, &embedded));
    }
}

/// Chain-signed: the issuer matches the parent's subject and the signature
/// verifies with the parent's public key, not the subject's.
#[test]
fn chain_signed_by_parent() {
    let (ca_cert, ca_key) = util::generate_ca("Test Root CA");
    let server_key = KeyPair::generate(1024).unwrap();

    let request = CertificateRequest::builder()
        .subject(Subject::builder().common_name("server.test").build())
        .validity(Validity::for_days(90).unwrap())
        .dns_names(vec!["server.test".to_string()])
        .ext_key_usage(usage::parse_ext_key_usage_str("ExtKeyUsageServerAuth").unwrap())
        .build();

    let cert = generator::generate(
        &request,
        SigningMode::ChainSigned {
            parent: &ca_cert,
            signing_key: &ca_key,
        },
        &server_key,
    )
    .unwrap();

    assert_eq!(cert.issuer(), ca_cert.subject());
    assert_eq!(cert.subject().to_string(), "CN=server.test");

    assert!(util::signature_verifies(&cert, ca_key.public()));
    assert!(!util::signature_verifies(&cert, server_key.public()));
}

/// The serial number defaults to zero when the request does not choose
/// otherwise; a provided serial is carried through.
#[test]
fn serial_policy_is_honored() {
    let key = KeyPair::generate(1024).unwrap();

    let request = CertificateRequest::builder()
        .subject(Subject::builder().common_name("serial.test").build())
        .validity(Validity::for_days(1).unwrap())
        .build();
    let cert = generator::generate_self_signed(&request, &key).unwrap();
    assert_eq!(cert.inner.tbs_certificate.serial_number.as_bytes(), &[0]);

    let request = CertificateRequest::builder()
        .subject(Subject::builder().common_name("serial.test").build())
        .serial(SerialPolicy::Provided(vec![0x01, 0x02, 0x03]))
        .validity(Validity::for_days(1).unwrap())
        .build();
    let cert = generator::generate_self_signed(&request, &key).unwrap();
    assert_eq!(
        cert.inner.tbs_certificate.serial_number.as_bytes(),
        &[0x01, 0x02, 0x03]
    );
}

/// SAN, key usage and extended key usage extensions appear only when the
/// request supplies them, and carry the requested values.
#[test]
fn extensions_follow_the_request() {
    let key = KeyPair::generate(1024).unwrap();

    let request = CertificateRequest::builder()
        .subject(Subject::builder().common_name("san.test").build())
        .validity(Validity::for_days(30).unwrap())
        .dns_names(vec!["san.test".to_string(), "alt.san.test".to_string()])
        .ip_addresses(vec!["192.0.2.7".parse().unwrap()])
        .key_usage(usage::parse_key_usage_str("KeyUsageDigitalSignature").unwrap())
        .build();

    let cert = generator::generate_self_signed(&request, &key).unwrap();
    let extensions = cert.inner.tbs_certificate.extensions.as_ref().unwrap();

    // not a CA: no basic constraints
    assert!(
        extensions
            .iter()
            .all(|ext| ext.extn_id != certmint::cert::extensions::BasicConstraints::OID)
    );

    let san_ext = extensions
        .iter()
        .find(|ext| ext.extn_id == SubjectAltName::OID)
        .expect("subject alternative name extension");
    let san = SubjectAltName::from_der_value(san_ext.extn_value.as_bytes()).unwrap();
    assert_eq!(san.dns_names, vec!["san.test", "alt.san.test"]);
    assert_eq!(san.ip_addresses, vec!["192.0.2.7".parse::<std::net::IpAddr>().unwrap()]);
}

/// PEM round trip through the framing helpers and back into a certificate.
#[test]
fn pem_round_trip() {
    let (ca_cert, _) = util::generate_ca("PEM Test CA");
    let pem = ca_cert.to_pem().unwrap();
    assert!(pem.starts_with("-----BEGIN CERTIFICATE-----"));

    let reloaded = Certificate::from_pem(&pem).unwrap();
    assert_eq!(
        reloaded.to_der().unwrap(),
        ca_cert.to_der().unwrap()
    );
}
