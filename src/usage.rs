//! Key usage and extended key usage vocabularies.
//!
//! Two fixed tables map the human-entered flag names onto their X.509
//! representations. Lookups are case sensitive and unknown names are
//! rejected, never dropped. The tables are plain statics with no load-order
//! dependency and are safe for concurrent reads.

use const_oid::ObjectIdentifier;

pub use der::flagset::FlagSet;
pub use x509_cert::ext::pkix::KeyUsages;

use crate::error::CertMintError;

/// Names accepted by [`parse_key_usage`] and the key usage bit each maps to.
pub static KEY_USAGE_NAMES: [(&str, KeyUsages); 9] = [
    ("KeyUsageDigitalSignature", KeyUsages::DigitalSignature),
    ("KeyUsageContentCommitment", KeyUsages::NonRepudiation),
    ("KeyUsageKeyEncipherment", KeyUsages::KeyEncipherment),
    ("KeyUsageDataEncipherment", KeyUsages::DataEncipherment),
    ("KeyUsageKeyAgreement", KeyUsages::KeyAgreement),
    ("KeyUsageCertSign", KeyUsages::KeyCertSign),
    ("KeyUsageCRLSign", KeyUsages::CRLSign),
    ("KeyUsageEncipherOnly", KeyUsages::EncipherOnly),
    ("KeyUsageDecipherOnly", KeyUsages::DecipherOnly),
];

/// An extended key usage purpose.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtendedUsage {
    Any,
    ServerAuth,
    ClientAuth,
    CodeSigning,
    EmailProtection,
    IpsecEndSystem,
    IpsecTunnel,
    IpsecUser,
    TimeStamping,
    OcspSigning,
    MicrosoftServerGatedCrypto,
    NetscapeServerGatedCrypto,
    MicrosoftCommercialCodeSigning,
    MicrosoftKernelCodeSigning,
}

/// Names accepted by [`parse_ext_key_usage`] and the purpose each maps to.
pub static EXT_KEY_USAGE_NAMES: [(&str, ExtendedUsage); 14] = [
    ("ExtKeyUsageAny", ExtendedUsage::Any),
    ("ExtKeyUsageServerAuth", ExtendedUsage::ServerAuth),
    ("ExtKeyUsageClientAuth", ExtendedUsage::ClientAuth),
    ("ExtKeyUsageCodeSigning", ExtendedUsage::CodeSigning),
    ("ExtKeyUsageEmailProtection", ExtendedUsage::EmailProtection),
    ("ExtKeyUsageIPSECEndSystem", ExtendedUsage::IpsecEndSystem),
    ("ExtKeyUsageIPSECTunnel", ExtendedUsage::IpsecTunnel),
    ("ExtKeyUsageIPSECUser", ExtendedUsage::IpsecUser),
    ("ExtKeyUsageTimeStamping", ExtendedUsage::TimeStamping),
    ("ExtKeyUsageOCSPSigning", ExtendedUsage::OcspSigning),
    (
        "ExtKeyUsageMicrosoftServerGatedCrypto",
        ExtendedUsage::MicrosoftServerGatedCrypto,
    ),
    (
        "ExtKeyUsageNetscapeServerGatedCrypto",
        ExtendedUsage::NetscapeServerGatedCrypto,
    ),
    (
        "ExtKeyUsageMicrosoftCommercialCodeSigning",
        ExtendedUsage::MicrosoftCommercialCodeSigning,
    ),
    (
        "ExtKeyUsageMicrosoftKernelCodeSigning",
        ExtendedUsage::MicrosoftKernelCodeSigning,
    ),
];

// OIDs not carried by the const-oid database; values match RFC 5280 and the
// vendor assignments.
pub const ANY_EXTENDED_KEY_USAGE: ObjectIdentifier =
    ObjectIdentifier::new_unwrap("2.5.29.37.0");
pub const ID_KP_IPSEC_END_SYSTEM: ObjectIdentifier =
    ObjectIdentifier::new_unwrap("1.3.6.1.5.5.7.3.5");
pub const ID_KP_IPSEC_TUNNEL: ObjectIdentifier =
    ObjectIdentifier::new_unwrap("1.3.6.1.5.5.7.3.6");
pub const ID_KP_IPSEC_USER: ObjectIdentifier =
    ObjectIdentifier::new_unwrap("1.3.6.1.5.5.7.3.7");
pub const MICROSOFT_SERVER_GATED_CRYPTO: ObjectIdentifier =
    ObjectIdentifier::new_unwrap("1.3.6.1.4.1.311.10.3.3");
pub const NETSCAPE_SERVER_GATED_CRYPTO: ObjectIdentifier =
    ObjectIdentifier::new_unwrap("2.16.840.1.113730.4.1");
pub const MICROSOFT_COMMERCIAL_CODE_SIGNING: ObjectIdentifier =
    ObjectIdentifier::new_unwrap("1.3.6.1.4.1.311.2.1.22");
pub const MICROSOFT_KERNEL_CODE_SIGNING: ObjectIdentifier =
    ObjectIdentifier::new_unwrap("1.3.6.1.4.1.311.61.1.1");

impl From<ExtendedUsage> for ObjectIdentifier {
    fn from(value: ExtendedUsage) -> Self {
        match value {
            ExtendedUsage::Any => ANY_EXTENDED_KEY_USAGE,
            ExtendedUsage::ServerAuth => const_oid::db::rfc5912::ID_KP_SERVER_AUTH,
            ExtendedUsage::ClientAuth => const_oid::db::rfc5912::ID_KP_CLIENT_AUTH,
            ExtendedUsage::CodeSigning => const_oid::db::rfc5912::ID_KP_CODE_SIGNING,
            ExtendedUsage::EmailProtection => const_oid::db::rfc5912::ID_KP_EMAIL_PROTECTION,
            ExtendedUsage::IpsecEndSystem => ID_KP_IPSEC_END_SYSTEM,
            ExtendedUsage::IpsecTunnel => ID_KP_IPSEC_TUNNEL,
            ExtendedUsage::IpsecUser => ID_KP_IPSEC_USER,
            ExtendedUsage::TimeStamping => const_oid::db::rfc5912::ID_KP_TIME_STAMPING,
            ExtendedUsage::OcspSigning => const_oid::db::rfc5912::ID_KP_OCSP_SIGNING,
            ExtendedUsage::MicrosoftServerGatedCrypto => MICROSOFT_SERVER_GATED_CRYPTO,
            ExtendedUsage::NetscapeServerGatedCrypto => NETSCAPE_SERVER_GATED_CRYPTO,
            ExtendedUsage::MicrosoftCommercialCodeSigning => MICROSOFT_COMMERCIAL_CODE_SIGNING,
            ExtendedUsage::MicrosoftKernelCodeSigning => MICROSOFT_KERNEL_CODE_SIGNING,
        }
    }
}

impl TryFrom<ObjectIdentifier> for ExtendedUsage {
    type Error = CertMintError;

    fn try_from(oid: ObjectIdentifier) -> Result<Self, Self::Error> {
        EXT_KEY_USAGE_NAMES
            .iter()
            .map(|(_, usage)| *usage)
            .find(|usage| ObjectIdentifier::from(*usage) == oid)
            .ok_or_else(|| {
                CertMintError::DecodingError(format!("unsupported extended key usage oid: {oid}"))
            })
    }
}

/// Combines a list of key usage names into a single flag set.
///
/// Empty entries are skipped, so an empty list (or a list of empty strings)
/// yields an empty flag set and no error: "no usages specified" is not the
/// same as a rejected name. Any unknown name fails the whole call; no
/// partial bitmask is returned.
pub fn parse_key_usage<I, S>(names: I) -> Result<FlagSet<KeyUsages>, CertMintError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut flags: FlagSet<KeyUsages> = FlagSet::empty();
    for name in names {
        let name = name.as_ref();
        if name.is_empty() {
            continue;
        }
        match KEY_USAGE_NAMES.iter().find(|(n, _)| *n == name) {
            Some((_, bit)) => flags |= *bit,
            None => return Err(CertMintError::UnknownKeyUsage(name.to_string())),
        }
    }
    Ok(flags)
}

/// [`parse_key_usage`] over a single comma-separated string.
pub fn parse_key_usage_str(names: &str) -> Result<FlagSet<KeyUsages>, CertMintError> {
    parse_key_usage(names.split(','))
}

/// Collects a list of extended key usage names into purposes, preserving
/// first-seen order. Duplicates are kept; the encoding layer does not need
/// deduplication for correctness.
pub fn parse_ext_key_usage<I, S>(names: I) -> Result<Vec<ExtendedUsage>, CertMintError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut usages = Vec::new();
    for name in names {
        let name = name.as_ref();
        if name.is_empty() {
            continue;
        }
        match EXT_KEY_USAGE_NAMES.iter().find(|(n, _)| *n == name) {
            Some((_, usage)) => usages.push(*usage),
            None => return Err(CertMintError::UnknownExtKeyUsage(name.to_string())),
        }
    }
    Ok(usages)
}

/// [`parse_ext_key_usage`] over a single comma-separated string.
pub fn parse_ext_key_usage_str(names: &str) -> Result<Vec<ExtendedUsage>, CertMintError> {
    parse_ext_key_usage(names.split(','))
}
