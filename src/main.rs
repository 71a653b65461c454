use anyhow::Result;
use colored::Colorize;
use pico_args::Arguments;
use promptline::config;
use promptline::env::HostEnv;
use promptline::render::PromptRenderer;
use std::env;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Debug)]
struct Args {
    config: Option<PathBuf>,
    status: i64,
    print_config: bool,
    help: bool,
}

impl Args {
    fn from_env() -> Result<Self> {
        let mut args = Arguments::from_env();

        Ok(Self {
            config: args
                .opt_value_from_str::<_, PathBuf>("--config")
                .unwrap_or(None)
                .or_else(|| env::var("PROMPTLINE_CONFIG").ok().map(PathBuf::from)),
            status: args.opt_value_from_str("--status").unwrap_or(None).unwrap_or(0),
            print_config: args.contains("--print-config"),
            help: args.contains("--help"),
        })
    }
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("{} {:#}", "promptline:".red().bold(), e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let args = Args::from_env()?;

    if args.help {
        print_help();
        return Ok(());
    }

    let mut config = config::load_config(args.config).await?;

    if args.print_config {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    let env = Arc::new(HostEnv::new(args.status));
    let renderer = PromptRenderer::new(env);
    let prompt = renderer.render(&mut config)?;
    println!("{}", prompt);

    Ok(())
}

fn print_help() {
    println!("Promptline - template-driven powerline prompt renderer");
    println!();
    println!("USAGE:");
    println!("    promptline [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("    --config <FILE>        Custom config file path");
    println!("    --status <CODE>        Exit status of the last command [default: 0]");
    println!("    --print-config         Print the effective configuration as JSON");
    println!("    --help                 Show this help message");
    println!();
    println!("ENVIRONMENT VARIABLES:");
    println!("    PROMPTLINE_CONFIG         Override config path");
    println!("    PROMPTLINE_FINAL_SPACE    Set to 0/false/no to drop the trailing space");
    println!("    PROMPTLINE_DEBUG          Enable debug logging");
    println!("    NO_COLOR                  Disable ANSI colors");
    println!();
    println!("SHELL SETUP (bash):");
    println!("    PS1='$(promptline --status $?)'");
}
