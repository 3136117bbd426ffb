//! goal_setter_launch CLI

use clap::{Parser, Subcommand};
use goal_setter_launch::{compose_launch, declared_arguments, process::InterruptForwarder};
use std::{collections::HashMap, path::PathBuf, process};

#[derive(Parser)]
#[command(name = "goal_setter_launch")]
#[command(about = "Launch the Isaac ROS MoveIt goal setter node", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(short, long)]
    verbose: bool,

    #[arg(short, long)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the robot descriptions and start the goal setter node
    Launch {
        /// Launch arguments (key:=value)
        #[arg(value_parser = parse_launch_arg)]
        args: Vec<(String, String)>,
    },

    /// Compose the launch without starting it and write record.json
    Record {
        /// Launch arguments (key:=value)
        #[arg(value_parser = parse_launch_arg)]
        args: Vec<(String, String)>,

        /// Output file path (default: record.json)
        #[arg(short, long, default_value = "record.json")]
        output: PathBuf,
    },

    /// Show the declared launch arguments
    ShowArgs,
}

fn parse_launch_arg(s: &str) -> Result<(String, String), String> {
    match s.split_once(":=") {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("Invalid launch argument format: {}", s)),
    }
}

fn main() {
    let cli = Cli::parse();

    // Set up logging
    let log_level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "info"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let result = match cli.command {
        Commands::Launch { args } => launch(args.into_iter().collect()),
        Commands::Record { args, output } => record(args.into_iter().collect(), &output),
        Commands::ShowArgs => {
            show_args();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn launch(cli_args: HashMap<String, String>) -> Result<(), Box<dyn std::error::Error>> {
    // Ctrl-C goes to the node; the composer waits for it to exit so the
    // parameter files are removed and the exit is logged
    let interrupts = InterruptForwarder::install()?;

    let composed = compose_launch(cli_args)?;
    if interrupts.interrupted() {
        log::warn!("Interrupted, not starting {}", composed.node.record.executable);
        return Ok(());
    }

    let node = composed.launch()?;
    interrupts.attach(&node);
    // The node's exit status is reported in the log, not returned
    node.wait()?;
    Ok(())
}

fn record(
    cli_args: HashMap<String, String>,
    output: &std::path::Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let record = compose_launch(cli_args)?.into_record()?;

    let json = record.to_json()?;
    std::fs::write(output, json)?;

    log::info!("Generated record.json: {}", output.display());
    log::info!(
        "  {} nodes, {} parameter files",
        record.node.len(),
        record.file_data.len()
    );

    Ok(())
}

fn show_args() {
    println!("Arguments (pass arguments as '<name>:=<value>'):");
    for arg in declared_arguments() {
        println!();
        println!("    '{}':", arg.name);
        println!("        {}", arg.description.as_deref().unwrap_or("no description given"));
        if let Some(default) = &arg.default {
            println!("        (default: '{}')", default);
        }
    }
}
