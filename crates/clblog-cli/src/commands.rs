use clblog_server::{ClblogServer, ServerConfig};
use clblog_types::SlugGenerator;
use colored::Colorize;

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Serve(args) => cmd_serve(args),
        Command::Slug(args) => cmd_slug(args),
    }
}

/// File values first, then flags on top.
fn resolve_config(args: &ServeArgs) -> anyhow::Result<ServerConfig> {
    let mut config = match &args.config {
        Some(path) => ServerConfig::load(path)?,
        None => ServerConfig::default(),
    };
    if let Some(bind) = args.bind {
        config.bind_addr = bind;
    }
    if let Some(ms) = args.latency_ms {
        config.store.simulated_latency_ms = Some(ms);
    }
    if args.no_seed {
        config.seed_demo_data = false;
    }
    Ok(config)
}

fn cmd_serve(args: ServeArgs) -> anyhow::Result<()> {
    let config = resolve_config(&args)?;
    println!(
        "{} clblog on {} (demo data: {})",
        "✓".green().bold(),
        config.bind_addr.to_string().bold(),
        if config.seed_demo_data { "yes".green() } else { "no".yellow() },
    );
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(ClblogServer::new(config).serve())?;
    Ok(())
}

fn cmd_slug(args: SlugArgs) -> anyhow::Result<()> {
    let slugs = SlugGenerator::new();
    for _ in 0..args.count {
        println!("{}", slugs.new_slug());
    }
    Ok(())
}
