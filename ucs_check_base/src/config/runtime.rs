// RUNTIME CONFIGURATION (one check invocation)

use super::constants::{self, defaults};
use crate::api::errors::ArgumentError;
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::str::FromStr;

/// Highest TLS version offered in the handshake.
///
/// Some CIMC firmware fails the handshake when TLS 1.2 is offered, others
/// reset the connection unless it is, so the ceiling is selectable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TlsCeiling {
    #[default]
    #[serde(rename = "1.1")]
    Tls11,
    #[serde(rename = "1.2")]
    Tls12,
}

impl TlsCeiling {
    pub fn as_str(&self) -> &'static str {
        match self {
            TlsCeiling::Tls11 => "1.1",
            TlsCeiling::Tls12 => "1.2",
        }
    }
}

impl FromStr for TlsCeiling {
    type Err = ArgumentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().trim_start_matches(['v', 'V']) {
            "1.1" => Ok(TlsCeiling::Tls11),
            "1.2" => Ok(TlsCeiling::Tls12),
            _ => Err(ArgumentError::InvalidTlsVersion {
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for TlsCeiling {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Query mode selected with `-t`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryMode {
    #[default]
    Class,
    Dn,
}

impl QueryMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            QueryMode::Class => "class",
            QueryMode::Dn => "dn",
        }
    }
}

impl FromStr for QueryMode {
    type Err = ArgumentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "class" => Ok(QueryMode::Class),
            "dn" => Ok(QueryMode::Dn),
            _ => Err(ArgumentError::InvalidQueryMode {
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for QueryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransportConfig {
    /// TLS ceiling negotiated with the controller
    pub max_tls: TlsCeiling,

    /// Explicit proxy URL; without one the system proxy variables apply
    pub proxy: Option<String>,

    /// Skip server certificate and hostname verification.
    /// Controllers ship self-signed certificates.
    pub accept_invalid_certs: bool,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            max_tls: env::var(constants::env::MAX_TLS_VERSION)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or_default(),
            proxy: env::var(constants::env::PROXY)
                .ok()
                .filter(|v| !v.trim().is_empty()),
            accept_invalid_certs: true,
        }
    }
}

impl TransportConfig {
    pub fn with_max_tls(mut self, max_tls: TlsCeiling) -> Self {
        self.max_tls = max_tls;
        self
    }

    pub fn with_proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxy = Some(proxy.into());
        self
    }
}

/// Complete configuration for one check run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeConfig {
    /// Controller address (UCS Manager or CIMC)
    pub host: String,

    pub mode: QueryMode,

    /// Class name (class mode) or distinguished name (dn mode)
    pub subject: String,

    /// Element name extracted from a dn query response
    pub element: Option<String>,

    pub hierarchical: bool,

    /// Space separated attribute names
    pub attributes: String,

    /// Regular expression every element tuple has to match
    pub expect: String,

    pub username: String,

    #[serde(skip_serializing, default)]
    pub password: String,

    /// Report OK when the query returns no elements at all
    pub zero_instances_ok: bool,

    /// Only list elements that did not match
    pub faults_only: bool,

    /// Property filter `<type>:<property>:<value>`
    pub filter: Option<String>,

    pub transport: TransportConfig,
}

impl ProbeConfig {
    pub fn new(host: impl Into<String>, mode: QueryMode, subject: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            mode,
            subject: subject.into(),
            element: None,
            hierarchical: false,
            attributes: defaults::ATTRIBUTES.to_string(),
            expect: defaults::EXPECT_PATTERN.to_string(),
            username: String::new(),
            password: String::new(),
            zero_instances_ok: false,
            faults_only: false,
            filter: None,
            transport: TransportConfig::default(),
        }
    }

    /// Endpoint all requests are posted to
    pub fn endpoint_url(&self) -> String {
        format!("https://{}{}", self.host, constants::API_PATH)
    }

    pub fn with_element(mut self, element: Option<String>) -> Self {
        self.element = element.filter(|e| !e.is_empty());
        self
    }

    pub fn with_hierarchical(mut self, hierarchical: bool) -> Self {
        self.hierarchical = hierarchical;
        self
    }

    pub fn with_attributes(mut self, attributes: impl Into<String>) -> Self {
        self.attributes = attributes.into();
        self
    }

    pub fn with_expect(mut self, expect: impl Into<String>) -> Self {
        self.expect = expect.into();
        self
    }

    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.username = username.into();
        self.password = password.into();
        self
    }

    pub fn with_zero_instances_ok(mut self, zero_instances_ok: bool) -> Self {
        self.zero_instances_ok = zero_instances_ok;
        self
    }

    pub fn with_faults_only(mut self, faults_only: bool) -> Self {
        self.faults_only = faults_only;
        self
    }

    pub fn with_filter(mut self, filter: Option<String>) -> Self {
        self.filter = filter.filter(|f| !f.is_empty());
        self
    }

    pub fn with_transport(mut self, transport: TransportConfig) -> Self {
        self.transport = transport;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_default_config() {
        let config = ProbeConfig::new("10.18.4.7", QueryMode::Class, "storageVirtualDrive");
        assert_eq!(config.attributes, "id name");
        assert_eq!(config.expect, "Optimal");
        assert!(!config.hierarchical);
        assert!(config.filter.is_none());
        assert!(config.transport.accept_invalid_certs);
        assert_eq!(config.endpoint_url(), "https://10.18.4.7/nuova");
    }

    #[test]
    fn test_config_builder() {
        let config = ProbeConfig::new("ucsm", QueryMode::Dn, "sys/rack-unit-1/indicator-led-4")
            .with_element(Some("equipmentIndicatorLed".to_string()))
            .with_hierarchical(true)
            .with_attributes("id color name")
            .with_expect("green")
            .with_credentials("admin", "pls_change")
            .with_zero_instances_ok(true)
            .with_faults_only(true)
            .with_filter(Some(String::new()))
            .with_transport(TransportConfig::default().with_max_tls(TlsCeiling::Tls12));

        assert_eq!(config.element.as_deref(), Some("equipmentIndicatorLed"));
        assert!(config.hierarchical);
        assert_eq!(config.username, "admin");
        assert!(config.zero_instances_ok);
        assert!(config.faults_only);
        assert!(config.filter.is_none());
        assert_eq!(config.transport.max_tls, TlsCeiling::Tls12);
    }

    #[test]
    fn test_password_is_not_serialized() {
        let config = ProbeConfig::new("ucsm", QueryMode::Class, "equipmentPsu")
            .with_credentials("admin", "secret");
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("secret"));
        assert!(json.contains("\"mode\":\"class\""));
    }

    #[test]
    fn test_tls_ceiling_parsing() {
        assert_eq!("1.1".parse::<TlsCeiling>().unwrap(), TlsCeiling::Tls11);
        assert_eq!("1.2".parse::<TlsCeiling>().unwrap(), TlsCeiling::Tls12);
        assert_eq!("v1.2".parse::<TlsCeiling>().unwrap(), TlsCeiling::Tls12);
        assert_matches!(
            "1.3".parse::<TlsCeiling>(),
            Err(ArgumentError::InvalidTlsVersion { .. })
        );
    }

    #[test]
    fn test_query_mode_parsing() {
        assert_eq!("class".parse::<QueryMode>().unwrap(), QueryMode::Class);
        assert_eq!("dn".parse::<QueryMode>().unwrap(), QueryMode::Dn);
        assert_matches!(
            "path".parse::<QueryMode>(),
            Err(ArgumentError::InvalidQueryMode { .. })
        );
    }
}
