use clap::Parser;

/// Command-line arguments
#[derive(Parser, Debug)]
#[command(name = "rouilleftp", about = "A FTP client written in Rust.")]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "")]
    pub config: String,

    /// Write log output to the given file instead of stderr
    #[arg(short, long)]
    pub log: Option<String>,

    /// Enable verbose mode
    #[arg(short, long)]
    pub verbose: bool,

    /// Server to connect to on startup, as <hostname> or <hostname>:<port>
    pub host: Option<String>,
}
