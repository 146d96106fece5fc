use std::path::PathBuf;
use std::time::Duration;

use crate::types::LogLevel;

/// Application configuration.
pub struct Config {
    pub link: String,
    pub directory: PathBuf,
    pub access_token: Option<String>,
    pub token_file: PathBuf,

    pub connectivity_interval: Duration,
    pub connectivity_max_wait: Option<Duration>,

    pub max_attempts: u32,

    pub log_level: LogLevel,

    pub no_progress_bar: bool,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("link", &self.link)
            .field("directory", &self.directory)
            .field(
                "access_token",
                &self.access_token.as_ref().map(|_| "<redacted>"),
            )
            .field("token_file", &self.token_file)
            .field("max_attempts", &self.max_attempts)
            .finish_non_exhaustive()
    }
}

fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

impl Config {
    pub fn from_cli(cli: crate::cli::Cli) -> anyhow::Result<Self> {
        if cli.max_attempts == 0 {
            anyhow::bail!("--max-attempts must be at least 1");
        }

        let access_token = cli
            .access_token
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());

        Ok(Self {
            link: cli.link.trim().to_string(),
            directory: expand_tilde(&cli.directory),
            access_token,
            token_file: expand_tilde(&cli.token_file),
            connectivity_interval: Duration::from_secs(cli.connectivity_interval.max(1)),
            connectivity_max_wait: cli.connectivity_max_wait.map(Duration::from_secs),
            max_attempts: cli.max_attempts,
            log_level: cli.log_level,
            no_progress_bar: cli.no_progress_bar,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn parse(args: &[&str]) -> crate::cli::Cli {
        let mut full = vec!["sdrive"];
        full.extend_from_slice(args);
        crate::cli::Cli::try_parse_from(full).unwrap()
    }

    #[test]
    fn test_expand_tilde_with_home() {
        let result = expand_tilde("~/Downloads");
        if let Some(home) = dirs::home_dir() {
            assert_eq!(result, home.join("Downloads"));
        }
    }

    #[test]
    fn test_expand_tilde_no_prefix() {
        assert_eq!(
            expand_tilde("/absolute/path"),
            PathBuf::from("/absolute/path")
        );
        assert_eq!(
            expand_tilde("relative/path"),
            PathBuf::from("relative/path")
        );
    }

    #[test]
    fn test_from_cli_trims_link() {
        let cfg = Config::from_cli(parse(&["  https://drive.google.com/open?id=abc  "])).unwrap();
        assert_eq!(cfg.link, "https://drive.google.com/open?id=abc");
    }

    #[test]
    fn test_from_cli_rejects_zero_attempts() {
        let cli = parse(&["--max-attempts", "0", "link"]);
        assert!(Config::from_cli(cli).is_err());
    }

    #[test]
    fn test_from_cli_durations() {
        let cli = parse(&[
            "--connectivity-interval",
            "7",
            "--connectivity-max-wait",
            "60",
            "link",
        ]);
        let cfg = Config::from_cli(cli).unwrap();
        assert_eq!(cfg.connectivity_interval, Duration::from_secs(7));
        assert_eq!(cfg.connectivity_max_wait, Some(Duration::from_secs(60)));
    }

    #[test]
    fn test_blank_access_token_ignored() {
        let cli = parse(&["--access-token", "   ", "link"]);
        let cfg = Config::from_cli(cli).unwrap();
        assert!(cfg.access_token.is_none());
    }

    #[test]
    fn test_debug_redacts_token() {
        let cli = parse(&["--access-token", "ya29.secret", "link"]);
        let cfg = Config::from_cli(cli).unwrap();
        let rendered = format!("{:?}", cfg);
        assert!(!rendered.contains("ya29.secret"));
        assert!(rendered.contains("<redacted>"));
    }
}
