pub const APP_NAME: &str = "fscache";

/// Suffix appended to an effective key to name its options file.
pub const OPTIONS_SUFFIX: &str = ".opt";

/// Suffix of staged temp files, which are named `<key>.<token><TMP_SUFFIX>`.
pub const TMP_SUFFIX: &str = ".tmp";

/// Separator placed between a prefix and the caller's key.
pub const PREFIX_SEPARATOR: &str = "__";

/// Expiry value meaning "never expires".
pub const NEVER_EXPIRES: i64 = -1;

/// Version written into every encoded envelope.
pub const FORMAT_VERSION: u32 = 1;

/// Directory used when no directory is configured.
pub const DEFAULT_DIRECTORY: &str = "tmp";
