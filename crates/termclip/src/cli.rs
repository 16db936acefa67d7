use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "termclip",
    version,
    about = "Copy to the system clipboard through the terminal using OSC 52"
)]
pub struct Cli {
    /// Text to copy, joined with spaces (reads stdin when omitted)
    pub text: Vec<String>,

    /// Emit the sequence even if the terminal is not known to support it
    #[arg(short = 'f', long = "force")]
    pub force: bool,

    /// Max bytes copied before truncation (default: 99992)
    #[arg(short = 'n', long = "max-bytes")]
    pub max_bytes: Option<usize>,

    /// Config file (default: <config dir>/termclip/config.toml)
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// Exit 0 if the terminal supports OSC 52, 1 otherwise
    #[arg(long = "check")]
    pub check: bool,
}

impl Cli {
    pub fn joined_text(&self) -> Option<String> {
        if self.text.is_empty() {
            None
        } else {
            Some(self.text.join(" "))
        }
    }
}
