use clap::{Parser, Subcommand};
use std::path::PathBuf;
use wp_watcher_config::AppConfig;

#[derive(Parser, Debug)]
#[command(name = "wp-log-watcher", version)]
#[command(about = "Watch WordPress debug logs and relay PHP variable dumps")]
pub struct Cli {
    /// Dump relay port (overrides the config file)
    #[arg(short, long, global = true)]
    pub port: Option<u16>,

    /// Poll file metadata instead of using native file notifications
    #[arg(long, global = true)]
    pub poll: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Command {
    /// Tail log files and print new content as it is written
    Watch {
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Do not start the dump relay
        #[arg(long)]
        no_relay: bool,
    },

    /// Print a log with its entries reordered
    Show {
        file: PathBuf,

        /// Keep the file's own order instead of newest entry first
        #[arg(long)]
        oldest_first: bool,

        /// Prefix every entry with the kind of message it carries
        #[arg(long)]
        kinds: bool,
    },

    /// Truncate a log file to zero bytes
    Clear { file: PathBuf },

    /// Copy a log file to a timestamped `<name>_export_<time>.log`
    Export {
        file: PathBuf,

        /// Target directory (defaults to `export_dir`, then Downloads)
        #[arg(short, long)]
        dir: Option<PathBuf>,
    },

    /// Run only the dump relay and print dumps as they arrive
    Relay,
}

impl Cli {
    /// Let command line flags win over file configuration
    pub fn apply_to(&self, config: &mut AppConfig) {
        if let Some(port) = self.port {
            config.relay_port = port;
        }
        if self.poll {
            config.force_polling = true;
        }

        match &self.command {
            Command::Watch { no_relay: true, .. } => config.relay_enabled = false,
            Command::Show { oldest_first: true, .. } => config.newest_first = false,
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_watch_requires_files() {
        assert!(Cli::try_parse_from(["wp-log-watcher", "watch"]).is_err());

        let cli = Cli::try_parse_from(["wp-log-watcher", "watch", "a.log", "b.log"]).unwrap();
        assert_eq!(
            cli.command,
            Command::Watch {
                files: vec![PathBuf::from("a.log"), PathBuf::from("b.log")],
                no_relay: false,
            }
        );
    }

    #[test]
    fn test_overrides() {
        let cli = Cli::try_parse_from([
            "wp-log-watcher",
            "watch",
            "debug.log",
            "--no-relay",
            "--port",
            "9999",
            "--poll",
        ])
        .unwrap();

        let mut config = AppConfig::default();
        cli.apply_to(&mut config);

        assert_eq!(config.relay_port, 9999);
        assert!(config.force_polling);
        assert!(!config.relay_enabled);
    }

    #[test]
    fn test_show_oldest_first() {
        let cli = Cli::try_parse_from(["wp-log-watcher", "show", "debug.log", "--oldest-first"])
            .unwrap();

        let mut config = AppConfig::default();
        cli.apply_to(&mut config);
        assert!(!config.newest_first);
    }

    #[test]
    fn test_no_flags_keep_config() {
        let cli = Cli::try_parse_from(["wp-log-watcher", "relay"]).unwrap();

        let mut config = AppConfig::default();
        cli.apply_to(&mut config);
        assert_eq!(config, AppConfig::default());
    }
}
