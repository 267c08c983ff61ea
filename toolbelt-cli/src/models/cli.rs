use clap::{ArgAction, Parser, Subcommand};

/// Toolbelt: select and configure toolkits for an AI chat agent.
/// Starts the interactive picker by default.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase message verbosity.
    ///
    /// Specify multiple times for more verbose output:
    ///  -v:  INFO level
    ///  -vv: DEBUG level
    ///  -vvv: TRACE level (most verbose)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Pre-select a toolkit before the picker opens (repeatable).
    ///
    /// Pre-selected toolkits are added with empty parameters, the way a
    /// shareable link would pre-select them; unknown names are ignored.
    #[arg(long, value_name = "TOOLKIT")]
    pub preselect: Vec<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List registered toolkits and their selection state.
    List {
        /// Show only toolkits whose name contains this text.
        #[arg(long)]
        filter: Option<String>,
    },
    /// Enable a toolkit, prompting for configuration when it needs one.
    Enable { id: String },
    /// Disable a toolkit.
    Disable { id: String },
    /// Invoke a tool from an enabled toolkit.
    Invoke {
        toolkit: String,
        tool: String,
        /// Tool input as a JSON object, e.g. '{"prompt": "a lighthouse"}'.
        #[arg(long)]
        input: Option<String>,
    },
}
