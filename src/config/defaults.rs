/// Default configuration constants.

/// Default prefix for the environment secret resolver.
///
/// Kept apart from the `VOLSECRETS_*` settings so a store named `mask` cannot
/// shadow `VOLSECRETS_MASK`.
pub const DEFAULT_ENV_PREFIX: &str = "VOLSECRETS_SECRET_";

/// Default config file name written by `config init`.
pub const DEFAULT_CONFIG_FILE: &str = "volsecrets.json";

/// Directory under `$HOME` searched for `config.json`.
pub const HOME_CONFIG_DIR: &str = ".volsecrets";
