//! Command line flags of `check_cisco_ucs`

use clap::error::ErrorKind;
use clap::{ArgAction, Parser};
use ucs_check_base::config::constants::defaults;
use ucs_check_base::{ProbeConfig, QueryMode, TlsCeiling, TransportConfig};

#[derive(Parser, Debug)]
#[command(name = "check_cisco_ucs")]
#[command(about = "Check Cisco UCS managers and CIMC controllers through the XML API")]
#[command(version)]
pub struct Cli {
    /// Controller address (UCS Manager or CIMC)
    #[arg(short = 'H', value_name = "HOST")]
    pub host: String,

    /// Query type: class or dn
    #[arg(short = 't', value_name = "TYPE", default_value = "class")]
    pub mode: QueryMode,

    /// Class name (-t class) or distinguished name (-t dn)
    #[arg(short = 'q', value_name = "QUERY", default_value = defaults::QUERY_SUBJECT)]
    pub query: String,

    /// Element whose attributes are read for -t dn
    #[arg(short = 'o', value_name = "ELEMENT")]
    pub element: Option<String>,

    /// Hierarchical query: true or false
    #[arg(short = 's', value_name = "BOOL", action = ArgAction::Set, default_value_t = false)]
    pub hierarchical: bool,

    /// Space separated attribute list, up to 10 names
    #[arg(short = 'a', value_name = "ATTRIBUTES", default_value = defaults::ATTRIBUTES)]
    pub attributes: String,

    /// Regular expression every element has to match
    #[arg(short = 'e', value_name = "PATTERN", default_value = defaults::EXPECT_PATTERN)]
    pub expect: String,

    #[arg(short = 'u', value_name = "USER", default_value = "")]
    pub username: String,

    #[arg(short = 'p', value_name = "PASSWORD", default_value = "")]
    pub password: String,

    /// Debug level: 0 off, 1 errors, 2 warnings, 3 everything
    #[arg(short = 'd', value_name = "LEVEL", default_value_t = 0,
        value_parser = clap::value_parser!(u8).range(0..=3))]
    pub debug: u8,

    /// Report OK when no element is found
    #[arg(short = 'z')]
    pub zero_instances_ok: bool,

    /// Only list elements that did not match
    #[arg(short = 'F')]
    pub faults_only: bool,

    /// Highest TLS version: 1.1 or 1.2 (default 1.1)
    #[arg(short = 'M', value_name = "VERSION")]
    pub max_tls: Option<TlsCeiling>,

    /// Property filter <type>:<property>:<value>, types eq ne gt ge lt le wcard anybit allbits
    #[arg(short = 'f', value_name = "FILTER")]
    pub filter: Option<String>,

    /// Proxy URL; the system proxy variables apply otherwise
    #[arg(short = 'P', value_name = "URL")]
    pub proxy: Option<String>,

    /// Print environment variables before running
    #[arg(short = 'E')]
    pub dump_environment: bool,
}

impl Cli {
    pub fn into_config(self) -> ProbeConfig {
        let mut transport = TransportConfig::default();
        if let Some(max_tls) = self.max_tls {
            transport = transport.with_max_tls(max_tls);
        }
        if let Some(proxy) = self.proxy {
            transport = transport.with_proxy(proxy);
        }

        ProbeConfig::new(self.host, self.mode, self.query)
            .with_element(self.element)
            .with_hierarchical(self.hierarchical)
            .with_attributes(self.attributes)
            .with_expect(self.expect)
            .with_credentials(self.username, self.password)
            .with_zero_instances_ok(self.zero_instances_ok)
            .with_faults_only(self.faults_only)
            .with_filter(self.filter)
            .with_transport(transport)
    }
}

/// Exit code and plain text for a parse failure; help and version exit 0,
/// usage errors exit UNKNOWN. The text goes to stdout like all plugin output.
pub fn parse_failure(error: &clap::Error) -> (u8, String) {
    let code = match error.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
        _ => 3,
    };
    (code, error.render().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["check_cisco_ucs", "-H", "10.18.4.7"]).unwrap();
        assert_eq!(cli.mode, QueryMode::Class);
        assert_eq!(cli.debug, 0);

        let config = cli.into_config();
        assert_eq!(config.subject, "storageLocalDisk");
        assert_eq!(config.attributes, "id name");
        assert_eq!(config.expect, "Optimal");
        assert!(!config.hierarchical);
        assert!(config.filter.is_none());
        assert_eq!(config.endpoint_url(), "https://10.18.4.7/nuova");
    }

    #[test]
    fn test_full_flag_set() {
        let cli = Cli::try_parse_from([
            "check_cisco_ucs",
            "-H",
            "ucsm",
            "-t",
            "class",
            "-q",
            "equipmentChassis",
            "-s",
            "true",
            "-a",
            "dn operState",
            "-e",
            "^sys/chassis-[1-3],operable",
            "-u",
            "admin",
            "-p",
            "secret",
            "-d",
            "3",
            "-z",
            "-F",
            "-M",
            "1.2",
            "-f",
            "wcard:dn:^sys/chassis-[1-3].*",
            "-P",
            "http://proxy:3128",
            "-E",
        ])
        .unwrap();
        assert!(cli.dump_environment);
        assert_eq!(cli.debug, 3);

        let config = cli.into_config();
        assert!(config.hierarchical);
        assert!(config.zero_instances_ok);
        assert!(config.faults_only);
        assert_eq!(config.username, "admin");
        assert_eq!(config.password, "secret");
        assert_eq!(config.filter.as_deref(), Some("wcard:dn:^sys/chassis-[1-3].*"));
        assert_eq!(config.transport.max_tls, TlsCeiling::Tls12);
        assert_eq!(config.transport.proxy.as_deref(), Some("http://proxy:3128"));
    }

    #[test]
    fn test_dn_mode_with_element() {
        let cli = Cli::try_parse_from([
            "check_cisco_ucs",
            "-H",
            "cimc",
            "-t",
            "dn",
            "-q",
            "sys/rack-unit-1/indicator-led-4",
            "-o",
            "equipmentIndicatorLed",
        ])
        .unwrap();
        let config = cli.into_config();
        assert_eq!(config.mode, QueryMode::Dn);
        assert_eq!(config.element.as_deref(), Some("equipmentIndicatorLed"));
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert_matches!(
            Cli::try_parse_from(["check_cisco_ucs", "-H", "h", "-M", "1.3"]),
            Err(e) if e.kind() == ErrorKind::ValueValidation
        );
        assert_matches!(
            Cli::try_parse_from(["check_cisco_ucs", "-H", "h", "-t", "path"]),
            Err(e) if e.kind() == ErrorKind::ValueValidation
        );
        assert_matches!(
            Cli::try_parse_from(["check_cisco_ucs", "-H", "h", "-d", "4"]),
            Err(e) if e.kind() == ErrorKind::ValueValidation
        );
        assert_matches!(
            Cli::try_parse_from(["check_cisco_ucs"]),
            Err(e) if e.kind() == ErrorKind::MissingRequiredArgument
        );
    }

    #[test]
    fn test_version_flag() {
        assert_matches!(
            Cli::try_parse_from(["check_cisco_ucs", "-V"]),
            Err(e) if e.kind() == ErrorKind::DisplayVersion
        );
    }

    #[test]
    fn test_usage_error_is_unknown_with_text() {
        let error = Cli::try_parse_from(["check_cisco_ucs", "-H", "h", "-M", "1.3"]).unwrap_err();
        let (code, text) = parse_failure(&error);
        assert_eq!(code, 3);
        assert!(text.contains("error:"));
        assert!(text.contains("-M"));
    }

    #[test]
    fn test_version_exits_zero() {
        let error = Cli::try_parse_from(["check_cisco_ucs", "-V"]).unwrap_err();
        let (code, text) = parse_failure(&error);
        assert_eq!(code, 0);
        assert!(text.contains(env!("CARGO_PKG_VERSION")));
    }
}
