use std::net::IpAddr;

use bon::Builder;
use const_oid::ObjectIdentifier;
use der::asn1::{Any, SetOfVec, Utf8StringRef};
use rand_core::{OsRng, RngCore};
use time::{Duration, OffsetDateTime};
use x509_cert::attr::AttributeTypeAndValue;
use x509_cert::name::{Name, RdnSequence, RelativeDistinguishedName};

use crate::error::CertMintError;
use crate::usage::{ExtendedUsage, FlagSet, KeyUsages};

const COMMON_NAME: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.4.3");
const ORGANIZATION_NAME: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.4.10");
const ORGANIZATIONAL_UNIT_NAME: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.4.11");

/// Simplified subject for a certificate.
///
/// Only the common name, organization and organizational unit are carried;
/// optional fields left empty are omitted from the encoded subject entirely,
/// never encoded as empty-string RDNs.
#[derive(Clone, Debug, Default, Builder)]
pub struct Subject {
    #[builder(into)]
    pub common_name: String,
    #[builder(into)]
    pub organization: Option<String>,
    #[builder(into)]
    pub organizational_unit: Option<String>,
}

impl Subject {
    /// Converts the subject into an X.509 name, skipping empty fields.
    ///
    /// The name is assembled attribute by attribute with UTF8String values,
    /// so field contents are carried verbatim; RFC 4514 metacharacters like
    /// commas need no escaping.
    pub fn to_name(&self) -> Result<Name, CertMintError> {
        let mut rdns = Vec::new();
        if let Some(o) = self.organization.as_deref() {
            if !o.is_empty() {
                rdns.push(rdn(ORGANIZATION_NAME, o)?);
            }
        }
        if let Some(ou) = self.organizational_unit.as_deref() {
            if !ou.is_empty() {
                rdns.push(rdn(ORGANIZATIONAL_UNIT_NAME, ou)?);
            }
        }
        if !self.common_name.is_empty() {
            rdns.push(rdn(COMMON_NAME, &self.common_name)?);
        }
        Ok(RdnSequence(rdns))
    }
}

/// Builds a single-attribute RDN with a UTF8String value.
fn rdn(oid: ObjectIdentifier, value: &str) -> Result<RelativeDistinguishedName, CertMintError> {
    let value = Utf8StringRef::new(value)
        .and_then(|s| Any::encode_from(&s))
        .map_err(|e| CertMintError::InvalidInput(format!("invalid subject value: {e}")))?;
    let set = SetOfVec::try_from(vec![AttributeTypeAndValue { oid, value }])
        .map_err(|e| CertMintError::InvalidInput(format!("invalid subject: {e}")))?;
    Ok(RelativeDistinguishedName(set))
}

/// Certificate validity window in UTC.
#[derive(Clone, Debug)]
pub struct Validity {
    pub not_before: OffsetDateTime,
    pub not_after: OffsetDateTime,
}

impl Validity {
    /// Creates a validity window starting now (UTC) and spanning `days`
    /// whole days. A non-positive day count is a configuration error and is
    /// rejected before any generation is attempted.
    pub fn for_days(days: i64) -> Result<Self, CertMintError> {
        Self::days_from(OffsetDateTime::now_utc(), days)
    }

    /// Creates a validity window spanning `days` whole days from an explicit
    /// start. Day addition is done on the UTC timeline, where a calendar-day
    /// offset and a 24h-duration offset coincide (no DST shifts in UTC).
    pub fn days_from(not_before: OffsetDateTime, days: i64) -> Result<Self, CertMintError> {
        if days <= 0 {
            return Err(CertMintError::InvalidValidityPeriod(days));
        }
        Ok(Self {
            not_before,
            not_after: not_before + Duration::days(days),
        })
    }
}

/// How the certificate serial number is chosen.
///
/// The historical default is serial 0, which real CAs must not use; it is
/// kept for compatibility but exposed as an explicit choice so callers can
/// opt into a provided or random serial instead.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum SerialPolicy {
    /// Serial number 0. Throwaway/self-signed use only.
    #[default]
    DefaultZero,
    /// A random positive integer below 2^159.
    Random,
    /// A caller-supplied big-endian unsigned integer.
    Provided(Vec<u8>),
}

impl SerialPolicy {
    /// Resolves the policy into big-endian serial number bytes.
    pub fn resolve(&self) -> Vec<u8> {
        match self {
            SerialPolicy::DefaultZero => vec![0],
            SerialPolicy::Provided(bytes) => {
                let trimmed = trim_leading_zeros(bytes);
                if trimmed.is_empty() {
                    vec![0]
                } else {
                    trimmed.to_vec()
                }
            }
            SerialPolicy::Random => {
                let mut buf = [0u8; 20];
                OsRng.fill_bytes(&mut buf);
                // keep the value below 2^159 and positive
                buf[0] &= 0x7f;
                let trimmed = trim_leading_zeros(&buf);
                if trimmed.is_empty() {
                    vec![0]
                } else {
                    trimmed.to_vec()
                }
            }
        }
    }
}

fn trim_leading_zeros(bytes: &[u8]) -> &[u8] {
    let start = bytes.iter().position(|b| *b != 0).unwrap_or(bytes.len());
    &bytes[start..]
}

/// A simplified certificate description, assembled once per invocation from
/// caller input and consumed by the generator.
#[derive(Clone, Debug, Builder)]
pub struct CertificateRequest {
    pub subject: Subject,
    #[builder(default)]
    pub serial: SerialPolicy,
    pub validity: Validity,
    #[builder(default)]
    pub dns_names: Vec<String>,
    #[builder(default)]
    pub ip_addresses: Vec<IpAddr>,
    #[builder(default)]
    pub is_ca: bool,
    #[builder(default = FlagSet::empty())]
    pub key_usage: FlagSet<KeyUsages>,
    #[builder(default)]
    pub ext_key_usage: Vec<ExtendedUsage>,
}

/// Splits a comma-separated DNS name list, dropping empty entries.
pub fn parse_dns_list(list: &str) -> Vec<String> {
    list.split(',')
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Splits and parses a comma-separated IP address list, dropping empty
/// entries.
pub fn parse_ip_list(list: &str) -> Result<Vec<IpAddr>, CertMintError> {
    list.split(',')
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<IpAddr>()
                .map_err(|_| CertMintError::InvalidInput(format!("invalid ip address: {s}")))
        })
        .collect()
}

/// Parses a serial number string into big-endian unsigned bytes.
///
/// Accepts a decimal integer of any size, or hex with a `0x` prefix. The
/// serial is arbitrary precision, so no fixed-width integer type caps it.
pub fn parse_serial(value: &str) -> Result<Vec<u8>, CertMintError> {
    if let Some(hex) = value.strip_prefix("0x").or_else(|| value.strip_prefix("0X")) {
        if hex.is_empty() || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(CertMintError::InvalidInput(format!(
                "invalid serial number: {value}"
            )));
        }
        let padded = if hex.len() % 2 == 1 {
            format!("0{hex}")
        } else {
            hex.to_string()
        };
        return Ok(padded
            .as_bytes()
            .chunks(2)
            .map(|pair| {
                let pair = std::str::from_utf8(pair).expect("hex digits are ascii");
                u8::from_str_radix(pair, 16).expect("checked hex digits")
            })
            .collect());
    }

    if value.is_empty() || !value.chars().all(|c| c.is_ascii_digit()) {
        return Err(CertMintError::InvalidInput(format!(
            "invalid serial number: {value}"
        )));
    }

    // decimal digits folded into base-256 by long multiplication
    let mut bytes: Vec<u8> = Vec::new();
    for digit in value.chars() {
        let mut carry = digit.to_digit(10).expect("checked ascii digits");
        for byte in bytes.iter_mut().rev() {
            let v = u32::from(*byte) * 10 + carry;
            *byte = (v & 0xff) as u8;
            carry = v >> 8;
        }
        while carry > 0 {
            bytes.insert(0, (carry & 0xff) as u8);
            carry >>= 8;
        }
    }
    if bytes.is_empty() {
        bytes.push(0);
    }
    Ok(bytes)
}
