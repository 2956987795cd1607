//! Fake external tools.

use std::fs;
use std::path::Path;

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

/// Logs its argument and the store, then prints `<store>/<id>.gpg`.
pub const PASS: &str = r#"#!/bin/sh
echo "pass $*" >> "$PASSMENU_TEST_LOG"
echo "store $PASSWORD_STORE_DIR" >> "$PASSMENU_TEST_LOG"
exec cat "$PASSWORD_STORE_DIR/$1.gpg"
"#;

/// Saves its input and answers with `$DMENU_CHOICE`, exiting `$DMENU_EXIT`.
pub const DMENU: &str = r#"#!/bin/sh
echo "dmenu $*" >> "$PASSMENU_TEST_LOG"
cat > "$PASSMENU_TEST_LOG.menu"
if [ -n "$DMENU_CHOICE" ]; then
    printf '%s\n' "$DMENU_CHOICE"
fi
exit "${DMENU_EXIT:-0}"
"#;

/// Logs its arguments and input as `xclip <args> <input>`.
pub const XCLIP: &str = r#"#!/bin/sh
printf 'xclip %s <%s>\n' "$*" "$(cat)" >> "$PASSMENU_TEST_LOG"
"#;

pub const XDOTOOL: &str = r#"#!/bin/sh
echo "xdotool $*" >> "$PASSMENU_TEST_LOG"
"#;

/// Execute hook: logs its arguments and saves its input.
pub const HOOK: &str = r#"#!/bin/sh
echo "hook $*" >> "$PASSMENU_TEST_LOG"
cat > "$PASSMENU_TEST_LOG.hook"
"#;

pub const FAILING: &str = "#!/bin/sh\necho broken >&2\nexit 1\n";

/// Write all fake tools into `bin`.
pub fn install_tools(bin: &Path) {
    fs::create_dir_all(bin).expect("failed to create bin dir");
    for (name, script) in [
        ("pass", PASS),
        ("dmenu", DMENU),
        ("xclip", XCLIP),
        ("xdotool", XDOTOOL),
        ("hook", HOOK),
        ("failing", FAILING),
    ] {
        write_script(&bin.join(name), script);
    }
}

/// Write an executable script.
pub fn write_script(path: &Path, script: &str) {
    fs::write(path, script).expect("failed to write script");
    #[cfg(unix)]
    fs::set_permissions(path, fs::Permissions::from_mode(0o755))
        .expect("failed to make script executable");
}
