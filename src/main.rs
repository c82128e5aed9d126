use clap::{Parser, Subcommand};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use log::error;
use pubtrends::driver::Analyzer;
use serde::Serialize;
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(author, version, about)]
struct Args {
    /// Source CSV file
    #[arg(long, default_value = "papers.csv")]
    data: PathBuf,
    /// Chart output directory
    #[arg(long, default_value = "research_graphs")]
    graphs: PathBuf,
    /// Pretty print results
    #[arg(short, long)]
    pretty: bool,
    #[command(flatten)]
    verbose: Verbosity<InfoLevel>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Papers per year for a keyword
    Yearly { keyword: String },
    /// Research field distribution for a keyword
    Category { keyword: String },
    /// Combined yearly and category analysis
    Comprehensive { keyword: String },
    /// Dataset overview
    Info,
    /// Engine health report
    Health,
}

fn print<T: Serialize>(pretty: bool, value: &T) -> serde_json::Result<()> {
    let out = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{out}");
    Ok(())
}

fn main() {
    let args = Args::parse();
    pretty_env_logger::formatted_timed_builder()
        .filter_level(args.verbose.log_level_filter())
        .init();
    let analyzer = Analyzer::new(&args.data, &args.graphs);
    let printed = match &args.command {
        Command::Yearly { keyword } => print(args.pretty, &analyzer.yearly_analysis(keyword)),
        Command::Category { keyword } => print(args.pretty, &analyzer.category_analysis(keyword)),
        Command::Comprehensive { keyword } => {
            print(args.pretty, &analyzer.comprehensive_analysis(keyword))
        }
        Command::Info => print(args.pretty, &analyzer.dataset_info()),
        Command::Health => print(args.pretty, &analyzer.health_check()),
    };
    match printed {
        Ok(()) => (),
        Err(e) => {
            error!("{e}");
            process::exit(1);
        }
    }
}
