//! Constants used throughout passmenu.

/// Default store location relative to HOME.
pub const DEFAULT_STORE: &str = ".password-store";

/// Extension of encrypted entries.
pub const ENTRY_EXTENSION: &str = "gpg";

/// Recipient manifest at the store root.
pub const GPG_ID_FILE: &str = ".gpg-id";

/// Environment variable `pass` reads its store location from.
pub const STORE_ENV: &str = "PASSWORD_STORE_DIR";

/// Environment variable holding the log filter.
pub const LOG_ENV: &str = "PASSMENU_LOG";

/// Config file location relative to the XDG config dir.
pub const CONFIG_FILE: &str = "passmenu/config.toml";

/// Default tool names, looked up on PATH.
pub const PASS_BIN: &str = "pass";
pub const DMENU_BIN: &str = "dmenu";
pub const XCLIP_BIN: &str = "xclip";
pub const XDOTOOL_BIN: &str = "xdotool";

/// Placeholder shown instead of secret arguments.
pub const REDACTED: &str = "***";
