pub mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "newsbrief")]
#[command(about = "Fetch news articles and summarize them", long_about = None)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, global = true)]
    pub config: Option<std::path::PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List top headlines
    Headlines {
        /// Two-letter country code (default from config)
        #[arg(long)]
        country: Option<String>,

        /// Number of headlines (default from config)
        #[arg(long)]
        page_size: Option<u32>,
    },
    /// Print the cleaned article body of a page
    Body {
        /// URL of the article
        url: String,
    },
    /// Extract and summarize an article
    Summarize {
        /// URL of the article
        url: String,
    },
    /// Summarize every top headline
    Digest {
        /// Two-letter country code (default from config)
        #[arg(long)]
        country: Option<String>,

        /// Number of headlines (default from config)
        #[arg(long)]
        page_size: Option<u32>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_digest_with_global_flags() {
        let cli = Cli::parse_from([
            "newsbrief",
            "digest",
            "--country",
            "gb",
            "--json",
            "--config",
            "/tmp/newsbrief.toml",
        ]);

        assert!(cli.json);
        assert_eq!(
            cli.config.as_deref(),
            Some(std::path::Path::new("/tmp/newsbrief.toml"))
        );
        match cli.command {
            Commands::Digest { country, page_size } => {
                assert_eq!(country.as_deref(), Some("gb"));
                assert_eq!(page_size, None);
            }
            _ => panic!("expected digest"),
        }
    }

    #[test]
    fn test_summarize_requires_url() {
        assert!(Cli::try_parse_from(["newsbrief", "summarize"]).is_err());
    }
}
