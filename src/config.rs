use crate::{model::Settings, types::SundayNames};
use anyhow::{Context, Result};
use std::{
    env,
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
    time::Duration,
};

const MIN_SESSION_KEY_LEN: usize = 64;

/// Application configuration loaded and validated at startup
#[derive(Clone, Debug)]
pub struct AppConfig {
    /// UI server configuration
    pub ui: UiConfig,

    /// Remote data backend configuration
    pub backend: BackendConfig,

    /// Site settings handed to every client
    pub site: SiteConfig,

    /// Optional TLS certificate configuration
    pub certificate: Option<CertificateConfig>,

    /// Per-client state configuration
    pub clients: ClientConfig,
}

#[derive(Clone, Debug)]
pub struct UiConfig {
    pub port: u16,
    pub static_dir: PathBuf,
    /// Cookie signing and encryption key; a random one is used when unset
    pub session_key: Option<Vec<u8>>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BackendKind {
    Supabase { url: String, anon_key: String },
    Memory,
}

#[derive(Clone, Debug)]
pub struct BackendConfig {
    pub kind: BackendKind,
    pub request_timeout: Duration,
}

#[derive(Clone, Debug)]
pub struct SiteConfig {
    pub sunday: SundayNames,
    pub search_lyrics: bool,
}

#[derive(Clone, Debug)]
pub struct CertificateConfig {
    pub cert_path: PathBuf,
    pub key_path: PathBuf,
}

#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// Clients idle for longer are dropped together with their state
    pub idle_timeout: Duration,
}

impl AppConfig {
    /// Load and validate all configuration from environment variables
    pub fn load() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration through `lookup`, which returns the value of a
    /// variable or `None` when it is unset
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let ui = UiConfig::load(&lookup)?;
        let backend = BackendConfig::load(&lookup)?;
        let site = SiteConfig::load(&lookup)?;
        let certificate = CertificateConfig::load(&lookup)?;
        let clients = ClientConfig::load(&lookup)?;

        Ok(Self {
            ui,
            backend,
            site,
            certificate,
            clients,
        })
    }

    pub fn settings(&self) -> Settings {
        Settings {
            sunday: self.site.sunday.clone(),
            search_lyrics: self.site.search_lyrics,
            ..Default::default()
        }
    }
}

fn parse<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
    default: T,
) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(name) {
        Some(value) => value
            .trim()
            .parse::<T>()
            .with_context(|| format!("failed to parse {name}: invalid format")),
        None => Ok(default),
    }
}

fn non_empty(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Option<String> {
    lookup(name)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

impl UiConfig {
    fn load(lookup: &impl Fn(&str) -> Option<String>) -> Result<Self> {
        let port = parse(lookup, "UI_PORT", 8080u16)?;
        let static_dir = non_empty(lookup, "STATIC_DIR")
            .unwrap_or_else(|| "static".to_string())
            .into();

        let session_key = match non_empty(lookup, "SESSION_KEY") {
            Some(key) => {
                anyhow::ensure!(
                    key.len() >= MIN_SESSION_KEY_LEN,
                    "failed to load SESSION_KEY: at least {MIN_SESSION_KEY_LEN} bytes required"
                );
                Some(key.into_bytes())
            }
            None => None,
        };

        Ok(Self {
            port,
            static_dir,
            session_key,
        })
    }
}

impl BackendConfig {
    fn load(lookup: &impl Fn(&str) -> Option<String>) -> Result<Self> {
        let kind = match non_empty(lookup, "BACKEND").as_deref() {
            None | Some("supabase") => BackendKind::Supabase {
                url: non_empty(lookup, "SUPABASE_URL").context("failed to get SUPABASE_URL")?,
                anon_key: non_empty(lookup, "SUPABASE_ANON_KEY")
                    .context("failed to get SUPABASE_ANON_KEY")?,
            },
            Some("memory") => BackendKind::Memory,
            Some(other) => anyhow::bail!("failed to parse BACKEND: unknown backend {other:?}"),
        };
        let timeout_secs = parse(lookup, "REQUEST_TIMEOUT_SECS", 30u64)?;

        Ok(Self {
            kind,
            request_timeout: Duration::from_secs(timeout_secs),
        })
    }
}

impl SiteConfig {
    fn load(lookup: &impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = SundayNames::default();
        let sunday = SundayNames {
            morning: non_empty(lookup, "SUNDAY_AM_PLAYLIST").unwrap_or(defaults.morning),
            evening: non_empty(lookup, "SUNDAY_PM_PLAYLIST").unwrap_or(defaults.evening),
        };
        let search_lyrics = parse(lookup, "SEARCH_LYRICS", false)?;

        Ok(Self {
            sunday,
            search_lyrics,
        })
    }
}

impl CertificateConfig {
    fn load(lookup: &impl Fn(&str) -> Option<String>) -> Result<Option<Self>> {
        match (non_empty(lookup, "CERT_PATH"), non_empty(lookup, "KEY_PATH")) {
            (Some(cert_path), Some(key_path)) => Ok(Some(Self {
                cert_path: cert_path.into(),
                key_path: key_path.into(),
            })),
            (None, None) => Ok(None),
            _ => anyhow::bail!("failed to load certificate: CERT_PATH and KEY_PATH go together"),
        }
    }

    /// Server TLS setup from the PEM certificate chain and private key
    pub fn tls_config(&self) -> Result<rustls::ServerConfig> {
        let chain = rustls_pemfile::certs(&mut open_pem(&self.cert_path)?)
            .collect::<Result<Vec<_>, _>>()
            .with_context(|| format!("invalid certificate in {}", self.cert_path.display()))?;
        if chain.is_empty() {
            anyhow::bail!("no certificate in {}", self.cert_path.display());
        }

        let key = rustls_pemfile::private_key(&mut open_pem(&self.key_path)?)
            .with_context(|| format!("invalid private key in {}", self.key_path.display()))?
            .with_context(|| format!("no private key in {}", self.key_path.display()))?;

        rustls::ServerConfig::builder()
            .with_no_client_auth()
            .with_single_cert(chain, key)
            .context("failed to create tls config")
    }
}

fn open_pem(path: &Path) -> Result<BufReader<File>> {
    File::open(path)
        .map(BufReader::new)
        .with_context(|| format!("failed to open {}", path.display()))
}

impl ClientConfig {
    fn load(lookup: &impl Fn(&str) -> Option<String>) -> Result<Self> {
        let minutes = parse(lookup, "CLIENT_IDLE_MINUTES", 120u64)?;

        Ok(Self {
            idle_timeout: Duration::from_secs(minutes * 60),
        })
    }
}
