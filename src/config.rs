//! YAML configuration loaded once at startup.
//!
//! ```yaml
//! server:
//!   port: "8080"
//!   url: "status"
//!   headerSecrete: "X-Secret"
//!   secrete: "changeme"
//! ports:
//!   "22": "ssh"
//!   "80": "http"
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Deserializer};

use crate::auth::AccessCredential;
use crate::targets::{self, PortTarget};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    #[serde(default, deserialize_with = "scalar_map")]
    pub ports: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// TCP port the HTTP server binds.
    #[serde(deserialize_with = "scalar_string")]
    pub port: String,
    /// Path segment of the status route.
    #[serde(default)]
    pub url: String,
    /// Header carrying the shared secret.
    #[serde(rename = "headerSecrete")]
    pub header_secrete: String,
    /// Expected value of that header.
    #[serde(deserialize_with = "scalar_string")]
    pub secrete: String,
    #[serde(default = "default_host")]
    pub host: String,
}

fn default_host() -> String {
    "0.0.0.0".into()
}

/// YAML lets users write `8080` or `"8080"`; both mean the same thing here.
#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Str(String),
    Num(u64),
}

impl From<Scalar> for String {
    fn from(s: Scalar) -> Self {
        match s {
            Scalar::Str(s) => s,
            Scalar::Num(n) => n.to_string(),
        }
    }
}

fn scalar_string<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Scalar::deserialize(d).map(String::from)
}

fn scalar_map<'de, D: Deserializer<'de>>(d: D) -> Result<BTreeMap<String, String>, D::Error> {
    let raw = BTreeMap::<Scalar, Scalar>::deserialize(d);
    raw.map(|m| m.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
}

// BTreeMap keys need an ordering; compare by the string form.
impl PartialEq for Scalar {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Scalar {}

impl PartialOrd for Scalar {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Scalar {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.key().cmp(&other.key())
    }
}

impl Scalar {
    fn key(&self) -> String {
        match self {
            Scalar::Str(s) => s.clone(),
            Scalar::Num(n) => n.to_string(),
        }
    }
}

impl Config {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let cfg: Config = serde_yaml::from_str(yaml).context("failed to parse config YAML")?;
        Ok(cfg)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        Self::from_yaml(&content).with_context(|| format!("invalid config file: {}", path.display()))
    }

    /// Load and validate everything startup needs, so a bad file fails before anything runs.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let cfg = Self::from_file(path)?;
        cfg.targets()?;
        cfg.credential()?;
        cfg.bind_addr()?;
        cfg.route_path()?;
        Ok(cfg)
    }

    pub fn targets(&self) -> Result<Vec<PortTarget>> {
        targets::targets_from_map(&self.ports)
    }

    pub fn credential(&self) -> Result<AccessCredential> {
        AccessCredential::new(&self.server.header_secrete, &self.server.secrete)
    }

    pub fn bind_addr(&self) -> Result<String> {
        let port = targets::parse_port_str(self.server.port.trim())
            .with_context(|| format!("server.port: invalid value: {}", self.server.port))?;
        Ok(format!("{}:{}", self.server.host, port))
    }

    /// Route path for the status endpoint, always starting with a single `/`.
    ///
    /// Characters the router treats as captures or wildcards, or that can never appear
    /// in a request path, are rejected so the route only ever matches the literal URL.
    pub fn route_path(&self) -> Result<String> {
        let url = self.server.url.trim_matches('/');
        if let Some(c) = url
            .chars()
            .find(|c| matches!(c, ':' | '*' | '{' | '}' | '?' | '#') || c.is_whitespace())
        {
            bail!("server.url: {c:?} is not allowed in the status path: {url:?}");
        }
        Ok(format!("/{url}"))
    }
}
