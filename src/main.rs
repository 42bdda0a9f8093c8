use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};

use certmint::cert::Certificate;
use certmint::cert::params::{
    self, CertificateRequest, SerialPolicy, Subject, Validity,
};
use certmint::generator::{self, SigningMode};
use certmint::key::KeyPair;
use certmint::pem_utils;
use certmint::usage;

/// certmint — minimal X.509 certificate authority.
///
/// Generates RSA key pairs and issues self-signed or chain-signed
/// certificates from simplified subject/validity/usage parameters.
#[derive(Parser, Debug)]
#[command(name = "certmint", author, version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Manage certificates
    #[command(subcommand)]
    X509(X509Command),
    /// Manage RSA private keys
    #[command(subcommand)]
    Rsa(RsaCommand),
}

#[derive(Subcommand, Debug)]
enum X509Command {
    /// Create a self-signed certificate
    New(NewArgs),
    /// Create a certificate signed by a parent certificate
    Signed(SignedArgs),
}

#[derive(Subcommand, Debug)]
enum RsaCommand {
    /// Generate an RSA private key
    New(RsaNewArgs),
}

/// Flags shared by the self-signed and chain-signed commands.
#[derive(Args, Debug)]
struct CertArgs {
    /// CN for the certificate
    #[arg(long, default_value = "")]
    common_name: String,

    /// O for the certificate
    #[arg(long, default_value = "")]
    organization: String,

    /// OU for the certificate
    #[arg(long, default_value = "")]
    organizational_unit: String,

    /// Number of validity days for the generated certificate
    #[arg(long)]
    days: i64,

    /// Whether the certificate is a CA
    #[arg(long)]
    ca: bool,

    /// Comma-separated key usages for the certificate
    #[arg(long, default_value = "")]
    usages: String,

    /// Comma-separated extended key usages for the certificate
    #[arg(long, default_value = "")]
    ext_usages: String,

    /// Comma-separated list of name addresses
    #[arg(long, default_value = "")]
    dns_addresses: String,

    /// Comma-separated list of ip addresses
    #[arg(long, default_value = "")]
    ip_addresses: String,

    /// Serial number for the certificate, decimal or 0x-prefixed hex of any
    /// size; defaults to 0, which is fine for throwaway certificates only
    #[arg(long, conflicts_with = "random_serial")]
    serial: Option<String>,

    /// Draw a random serial number instead of the default 0
    #[arg(long)]
    random_serial: bool,

    /// Path to the subject's private key
    #[arg(long)]
    key_in: PathBuf,

    /// Generated certificate file path
    #[arg(long)]
    cert_out: PathBuf,
}

#[derive(Args, Debug)]
struct NewArgs {
    #[command(flatten)]
    cert: CertArgs,
}

#[derive(Args, Debug)]
struct SignedArgs {
    #[command(flatten)]
    cert: CertArgs,

    /// Path to the parent's private key used for signing
    #[arg(long)]
    signing_key: PathBuf,

    /// Path to the parent certificate
    #[arg(long)]
    parent_cert: PathBuf,
}

#[derive(Args, Debug)]
struct RsaNewArgs {
    /// RSA modulus size in bits
    #[arg(long, default_value_t = 2048)]
    bits: usize,

    /// Generated key file path
    #[arg(long)]
    key_out: PathBuf,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    if let Err(err) = run(cli.command) {
        log::error!("{err:#}");
        std::process::exit(1);
    }
}

fn run(command: Command) -> Result<()> {
    match command {
        Command::X509(X509Command::New(args)) => new_run(args),
        Command::X509(X509Command::Signed(args)) => signed_run(args),
        Command::Rsa(RsaCommand::New(args)) => rsa_new_run(args),
    }
}

/// Runs the self-signed certificate command.
fn new_run(args: NewArgs) -> Result<()> {
    let request = build_request(&args.cert)?;
    let key = load_key(&args.cert.key_in)?;

    let cert = generator::generate_self_signed(&request, &key)
        .context("error generating certificate")?;

    write_cert(&cert, &args.cert.cert_out)
}

/// Runs the chain-signed certificate command.
fn signed_run(args: SignedArgs) -> Result<()> {
    let request = build_request(&args.cert)?;
    let key = load_key(&args.cert.key_in)?;
    let signing_key = load_key(&args.signing_key)?;

    let parent_pem = fs::read_to_string(&args.parent_cert)
        .with_context(|| format!("error reading parent cert {:?}", args.parent_cert))?;
    let parent = Certificate::from_pem(&parent_pem)
        .with_context(|| format!("no cert found at {:?}", args.parent_cert))?;

    let cert = generator::generate(
        &request,
        SigningMode::ChainSigned {
            parent: &parent,
            signing_key: &signing_key,
        },
        &key,
    )
    .context("error generating certificate")?;

    write_cert(&cert, &args.cert.cert_out)
}

/// Runs the RSA key generation command.
fn rsa_new_run(args: RsaNewArgs) -> Result<()> {
    log::info!("generating {} bit RSA key", args.bits);
    let key = KeyPair::generate(args.bits).context("error generating RSA key")?;
    let pem = key.to_pkcs1_pem().context("error encoding RSA key")?;

    fs::write(&args.key_out, &pem)
        .with_context(|| format!("error writing key to {:?}", args.key_out))?;
    restrict_permissions(&args.key_out)?;
    log::info!("wrote key to {:?}", args.key_out);
    Ok(())
}

/// Parses usage and address flags and assembles the certificate request.
/// All flag vocabulary errors surface here, before any generation is
/// attempted.
fn build_request(args: &CertArgs) -> Result<CertificateRequest> {
    let key_usage =
        usage::parse_key_usage_str(&args.usages).context("error parsing key usage")?;
    let ext_key_usage = usage::parse_ext_key_usage_str(&args.ext_usages)
        .context("error parsing extended key usage")?;
    let ip_addresses =
        params::parse_ip_list(&args.ip_addresses).context("error parsing ip addresses")?;
    let dns_names = params::parse_dns_list(&args.dns_addresses);
    let validity = Validity::for_days(args.days).context("error validating days")?;

    let serial = if args.random_serial {
        SerialPolicy::Random
    } else {
        match &args.serial {
            Some(serial) => SerialPolicy::Provided(
                params::parse_serial(serial).context("error parsing serial number")?,
            ),
            None => SerialPolicy::DefaultZero,
        }
    };

    let subject = Subject {
        common_name: args.common_name.clone(),
        organization: non_empty(&args.organization),
        organizational_unit: non_empty(&args.organizational_unit),
    };

    Ok(CertificateRequest::builder()
        .subject(subject)
        .serial(serial)
        .validity(validity)
        .dns_names(dns_names)
        .ip_addresses(ip_addresses)
        .is_ca(args.ca)
        .key_usage(key_usage)
        .ext_key_usage(ext_key_usage)
        .build())
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

fn load_key(path: &Path) -> Result<KeyPair> {
    let pem = fs::read_to_string(path)
        .with_context(|| format!("error reading key {path:?}"))?;
    KeyPair::from_pkcs1_pem(&pem).with_context(|| format!("no key found at {path:?}"))
}

fn write_cert(cert: &Certificate, path: &Path) -> Result<()> {
    let der = cert.to_der().context("error encoding certificate")?;
    let pem = pem_utils::der_to_pem(&der, pem_utils::CERTIFICATE_LABEL);
    fs::write(path, pem).with_context(|| format!("error writing certificate to {path:?}"))?;
    log::info!("wrote certificate to {path:?}");
    Ok(())
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o600))
        .with_context(|| format!("error restricting permissions on {path:?}"))
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> Result<()> {
    Ok(())
}
