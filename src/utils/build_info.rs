use std::fmt;

/// Compile-time build metadata produced by `build.rs`.
#[derive(Debug, Clone, Copy)]
pub struct BuildMetadata {
    pub version: &'static str,
    pub git_hash: &'static str,
    pub git_status: &'static str,
    pub timestamp: &'static str,
    pub target: &'static str,
    pub profile: &'static str,
    pub rustc: &'static str,
}

impl fmt::Display for BuildMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({} {}, built {} for {} [{}], {})",
            self.version,
            self.git_hash,
            self.git_status,
            self.timestamp,
            self.target,
            self.profile,
            self.rustc
        )
    }
}

/// Version string shown by `--version`, with commit and build time.
pub const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("COMMISSION_LEDGER_BUILD_HASH"),
    " ",
    env!("COMMISSION_LEDGER_BUILD_STATUS"),
    ", built ",
    env!("COMMISSION_LEDGER_BUILD_TIMESTAMP"),
    ")"
);

pub fn current() -> BuildMetadata {
    BuildMetadata {
        version: env!("CARGO_PKG_VERSION"),
        git_hash: option_env!("COMMISSION_LEDGER_BUILD_HASH").unwrap_or("unknown"),
        git_status: option_env!("COMMISSION_LEDGER_BUILD_STATUS").unwrap_or("unknown"),
        timestamp: option_env!("COMMISSION_LEDGER_BUILD_TIMESTAMP").unwrap_or("unknown"),
        target: option_env!("COMMISSION_LEDGER_BUILD_TARGET").unwrap_or("unknown"),
        profile: option_env!("COMMISSION_LEDGER_BUILD_PROFILE").unwrap_or("unknown"),
        rustc: option_env!("COMMISSION_LEDGER_BUILD_RUSTC").unwrap_or("unknown"),
    }
}
