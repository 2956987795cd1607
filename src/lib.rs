//! passmenu - pick a pass entry from dmenu and copy or type it.
//!
//! # Architecture
//!
//! ```text
//! src/
//! ├── cli/              # Command-line interface
//! │   ├── args          # Split own flags from dmenu's
//! │   └── output        # Terminal messages
//! └── core/             # Pipeline
//!     ├── config        # Config file + flags → Config
//!     ├── process       # Runner trait for external tools
//!     ├── catalog       # List store entries
//!     ├── menu          # Select an entry with dmenu
//!     ├── entry         # Decrypt with pass, extract fields
//!     ├── delivery      # xclip / xdotool / execute
//!     └── pipeline      # list → select → resolve → deliver
//! ```
//!
//! Decrypted content lives in zeroizing buffers and only leaves the process
//! through pipes (and xdotool's argument list when typing).

pub mod cli;
pub mod core;
pub mod error;
