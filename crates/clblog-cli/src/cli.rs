use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "clblog", about = "A small multi-user blog service", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Start the HTTP server
    Serve(ServeArgs),
    /// Print freshly generated slugs
    Slug(SlugArgs),
}

#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Address to listen on (overrides the config file)
    #[arg(long)]
    pub bind: Option<SocketAddr>,
    /// TOML configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Artificial delay per store operation, in milliseconds
    #[arg(long)]
    pub latency_ms: Option<u64>,
    /// Start with an empty store
    #[arg(long)]
    pub no_seed: bool,
}

#[derive(Debug, Args)]
pub struct SlugArgs {
    /// How many slugs to print
    #[arg(short = 'n', long, default_value_t = 1)]
    pub count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn serve_flags() {
        let cli = Cli::parse_from([
            "clblog",
            "serve",
            "--bind",
            "0.0.0.0:9000",
            "--latency-ms",
            "20",
            "--no-seed",
        ]);
        let Command::Serve(args) = cli.command else {
            panic!("expected serve");
        };
        assert_eq!(args.bind, Some("0.0.0.0:9000".parse().unwrap()));
        assert_eq!(args.latency_ms, Some(20));
        assert!(args.no_seed);
        assert!(args.config.is_none());
    }

    #[test]
    fn slug_count_defaults_to_one() {
        let cli = Cli::parse_from(["clblog", "slug"]);
        assert!(matches!(cli.command, Command::Slug(SlugArgs { count: 1 })));
        let cli = Cli::parse_from(["clblog", "-v", "slug", "-n", "3"]);
        assert!(cli.verbose);
        assert!(matches!(cli.command, Command::Slug(SlugArgs { count: 3 })));
    }
}
