use clap::{Parser, Subcommand};

/// Command-line interface definition for rHourTracker
/// CLI application to sign in/out of a shared hour-tracking record store
#[derive(Parser)]
#[command(
    name = "rhourtracker",
    version = env!("CARGO_PKG_VERSION"),
    about = "Sign in and out of the team hour tracker and review your sessions",
    long_about = None
)]
pub struct Cli {
    /// Override local state database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Override the record store URL
    #[arg(global = true, long = "server")]
    pub server: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the local state database and configuration
    Init,

    /// Manage the configuration file (view or edit)
    Config {
        #[arg(long = "print", help = "Print the current configuration")]
        print_config: bool,

        #[arg(long = "check", help = "Check configuration file for missing fields")]
        check: bool,

        #[arg(long = "migrate", help = "Add missing fields with their defaults")]
        migrate: bool,

        #[arg(
            long = "edit",
            help = "Edit the configuration file (default editor: $EDITOR, or nano/notepad)"
        )]
        edit_config: bool,

        #[arg(
            long = "editor",
            help = "Specify the editor to use (vim, nano, or custom path)"
        )]
        editor: Option<String>,
    },

    /// Remember your password and sign in if you are not already
    Login {
        /// Your hour tracker password
        password: String,
    },

    /// Show whether you are signed in, your time, and who else is in
    Status,

    /// Start a session
    In,

    /// Close the open session with a write-up
    Out {
        #[arg(long, short = 'n', help = "What you did during this session")]
        note: String,

        #[arg(long, help = "Forgot to sign out? Real session length, hours part")]
        hours: Option<String>,

        #[arg(long, help = "Forgot to sign out? Real session length, minutes part")]
        minutes: Option<String>,
    },

    /// List your past sessions, newest first
    Sessions {
        #[arg(long, help = "Show full notes instead of a preview")]
        full: bool,
    },

    /// Change your password
    Passwd {
        /// The new password
        new_password: String,
    },

    /// Forget the remembered password on this machine
    Forget,

    /// Keep running and print a line whenever your status changes
    Watch {
        #[arg(long, help = "Stop after printing this many updates")]
        updates: Option<u64>,
    },

    /// Review and correct members' sessions
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },

    /// Print or manage the internal log table
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,
    },
}

#[derive(Subcommand)]
pub enum AdminAction {
    /// List every member with their total time and sessions
    List {
        #[arg(long, help = "Only show flagged sessions")]
        flagged: bool,
    },

    /// Exclude a session from the member's total
    Flag {
        #[arg(long, help = "Password of the member")]
        user: String,
        #[arg(long, help = "End timestamp (epoch seconds) of the session")]
        end: i64,
    },

    /// Count a flagged session again
    Unflag {
        #[arg(long, help = "Password of the member")]
        user: String,
        #[arg(long, help = "End timestamp (epoch seconds) of the session")]
        end: i64,
    },

    /// Correct a session's length; its end time is kept
    Time {
        #[arg(long, help = "Password of the member")]
        user: String,
        #[arg(long, help = "End timestamp (epoch seconds) of the session")]
        end: i64,
        #[arg(long, default_value = "0")]
        hours: String,
        #[arg(long, default_value = "0")]
        minutes: String,
    },
}
