//! # certmint — a small pure-Rust certificate authority
//!
//! certmint turns a simplified, human-entered certificate description
//! (subject fields, a validity window in days, key usage flag names, SAN
//! lists) into a well-formed X.509 certificate, either self-signed or signed
//! by a parent certificate's key. It is built entirely on rustcrypto
//! libraries with no OpenSSL or ring dependency.
//!
//! Keys are RSA only, framed as PKCS#1 `RSA PRIVATE KEY` PEM blocks, and
//! certificates are signed with PKCS#1 v1.5 over SHA-256.
//!
//! ## Generating a self-signed CA certificate
//!
//! ```rust,no_run
//! use certmint::{
//!     cert::params::{CertificateRequest, Subject, Validity},
//!     generator,
//!     key::KeyPair,
//! };
//!
//! # fn main() -> Result<(), certmint::error::CertMintError> {
//! let key = KeyPair::generate(2048)?;
//!
//! let request = CertificateRequest::builder()
//!     .subject(Subject::builder().common_name("My Test CA").build())
//!     .validity(Validity::for_days(3650)?)
//!     .is_ca(true)
//!     .key_usage(certmint::usage::parse_key_usage_str(
//!         "KeyUsageCertSign,KeyUsageCRLSign",
//!     )?)
//!     .build();
//!
//! let ca_cert = generator::generate_self_signed(&request, &key)?;
//! println!("{}", ca_cert.to_pem()?);
//! # Ok(())
//! # }
//! ```
//!
//! ## Issuing a chain-signed server certificate
//!
//! ```rust,no_run
//! use certmint::{
//!     cert::params::{CertificateRequest, Subject, Validity},
//!     generator::{self, SigningMode},
//!     key::KeyPair,
//! };
//!
//! # fn main() -> Result<(), certmint::error::CertMintError> {
//! # let ca_key = KeyPair::generate(2048)?;
//! # let ca_request = CertificateRequest::builder()
//! #     .subject(Subject::builder().common_name("My Test CA").build())
//! #     .validity(Validity::for_days(3650)?)
//! #     .is_ca(true)
//! #     .build();
//! # let ca_cert = generator::generate_self_signed(&ca_request, &ca_key)?;
//! let server_key = KeyPair::generate(2048)?;
//!
//! let request = CertificateRequest::builder()
//!     .subject(Subject::builder().common_name("server.example.com").build())
//!     .validity(Validity::for_days(365)?)
//!     .dns_names(vec!["server.example.com".to_string()])
//!     .ext_key_usage(certmint::usage::parse_ext_key_usage_str(
//!         "ExtKeyUsageServerAuth",
//!     )?)
//!     .build();
//!
//! // The signing key must be the parent's private key; certmint does not
//! // verify that it matches the parent certificate.
//! let server_cert = generator::generate(
//!     &request,
//!     SigningMode::ChainSigned {
//!         parent: &ca_cert,
//!         signing_key: &ca_key,
//!     },
//!     &server_key,
//! )?;
//! println!("{}", server_cert.to_pem()?);
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Organization
//!
//! - [`usage`]: the fixed key usage / extended key usage name vocabularies
//! - [`cert`]: certificate type, request parameters and typed extensions
//! - [`generator`]: the self-signed / chain-signed generation pipeline
//! - [`key`]: RSA key generation, PEM import/export and signing
//! - [`pem_utils`]: PEM framing for DER payloads
//! - [`error`]: the error taxonomy
//! - [`tbs_certificate`]: the unsigned certificate body

pub mod cert;
pub mod error;
pub mod generator;
pub mod key;
pub mod pem_utils;
pub mod tbs_certificate;
pub mod usage;
