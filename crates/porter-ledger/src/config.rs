//! Runtime configuration for the ledger facade.

use std::path::PathBuf;

use serde::Deserialize;

/// What a read-path failure turns into.
///
/// `Degrade` trades correctness for availability: failed reads come back as
/// empty/unknown/zeroed values (logged at warn level) so presentation keeps
/// rendering through transient backend faults. `Propagate` surfaces the
/// store error to the caller instead. Write paths always propagate,
/// whichever policy is set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReadErrorPolicy {
  #[default]
  Degrade,
  Propagate,
}

/// Ledger-level settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
  pub on_read_error: ReadErrorPolicy,
}

impl LedgerConfig {
  /// Load settings from an optional TOML file with `PORTER_*` environment
  /// overrides. A missing file yields the defaults.
  pub fn load(
    path: impl Into<PathBuf>,
  ) -> Result<Self, ::config::ConfigError> {
    ::config::Config::builder()
      .add_source(::config::File::from(path.into()).required(false))
      .add_source(::config::Environment::with_prefix("PORTER"))
      .build()?
      .try_deserialize()
  }
}
