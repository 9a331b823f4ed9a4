//! Configuration module for the UCS check
//! Fixed protocol constants plus the runtime configuration of one invocation

pub mod constants;
pub mod runtime;

pub use runtime::{ProbeConfig, QueryMode, TlsCeiling, TransportConfig};

/// Build information
pub mod build_info {
    pub fn version() -> &'static str {
        super::constants::PLUGIN_VERSION
    }

    pub fn package_name() -> &'static str {
        env!("CARGO_PKG_NAME")
    }

    /// Single line used by `-V`
    pub fn version_line() -> String {
        format!("check_cisco_ucs {} ({})", version(), package_name())
    }
}
