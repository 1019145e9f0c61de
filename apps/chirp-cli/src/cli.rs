//! Command-line arguments

use std::path::PathBuf;

use chirp_store::ColorScheme;
use clap::{Parser, Subcommand, ValueEnum};

/// Chirp direct messages from the terminal
#[derive(Parser, Debug)]
#[command(name = "chirp")]
#[command(about = "Chirp direct messages", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to the SQLite database
    #[arg(long, env = "CHIRP_DB", default_value = "chirp.db")]
    pub db: PathBuf,

    /// Identity provider subject of the caller
    #[arg(long = "as", value_name = "SUBJECT", env = "CHIRP_SUBJECT")]
    pub subject: Option<String>,

    /// Offset from UTC in minutes used for message times
    #[arg(long, default_value = "0", allow_hyphen_values = true)]
    pub utc_offset: i32,

    /// Terminal palette
    #[arg(long, value_enum, default_value = "light")]
    pub color_scheme: SchemeArg,

    /// Print JSON instead of text
    #[arg(long)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum SchemeArg {
    Light,
    Dark,
}

impl From<SchemeArg> for ColorScheme {
    fn from(arg: SchemeArg) -> Self {
        match arg {
            SchemeArg::Light => ColorScheme::Light,
            SchemeArg::Dark => ColorScheme::Dark,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create or refresh the caller's user record
    Register {
        username: String,
        fullname: String,
        email: String,

        #[arg(long)]
        bio: Option<String>,

        /// Avatar URL
        #[arg(long, default_value = "")]
        image: String,
    },

    /// Show the caller's user record
    Whoami,

    /// Send a text message
    Send {
        /// Recipient user ID
        peer: String,
        text: String,
    },

    /// Send a file attachment
    SendFile {
        peer: String,
        url: String,
        name: String,

        #[arg(long, default_value = "application/octet-stream")]
        mime_type: String,

        /// Size in bytes
        #[arg(long, default_value = "0")]
        size: u64,
    },

    /// Send a voice note
    SendVoice {
        peer: String,
        url: String,

        /// Length in milliseconds
        #[arg(long, default_value = "0")]
        duration: u64,

        #[arg(long, default_value = "audio/mpeg")]
        mime_type: String,
    },

    /// List conversations
    Chats {
        /// Most recent conversation first
        #[arg(long)]
        recent: bool,

        /// Only show peers whose name contains this text
        #[arg(short, long)]
        search: Option<String>,
    },

    /// Open a conversation, marking it read
    Open {
        peer: String,
    },

    /// Show messages exchanged with a peer
    History {
        peer: String,

        #[arg(short, long, default_value = "50")]
        limit: u64,

        /// Only messages sent before this millisecond timestamp
        #[arg(long)]
        before: Option<i64>,
    },

    /// Mark messages read
    Read {
        #[arg(required = true)]
        ids: Vec<String>,
    },

    /// Count unread messages from a peer
    Unread {
        peer: String,
    },

    /// Archive a conversation
    Archive {
        peer: String,

        /// Unarchive instead
        #[arg(long)]
        undo: bool,
    },

    /// Delete a conversation for both sides
    Delete {
        peer: String,
    },

    /// Mute notifications from a peer
    Mute {
        peer: String,

        /// Unmute instead
        #[arg(long)]
        undo: bool,
    },

    /// List every other user
    Users,

    /// Follow a user, or unfollow when already following
    Follow {
        /// User ID
        user: String,
    },

    /// Check whether the caller follows a user
    IsFollowing {
        user: String,
    },

    /// Show the caller's notifications
    Notifications,

    /// Change the caller's username
    Rename {
        username: String,
    },

    /// Update profile fields
    Profile {
        #[arg(long)]
        fullname: Option<String>,

        #[arg(long)]
        bio: Option<String>,

        #[arg(long)]
        image: Option<String>,
    },
}
