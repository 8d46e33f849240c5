use std::fs::File;
use std::io::Write;

use clap::{Parser, ValueEnum};
use tracing::info;
use tracing_subscriber::fmt::format::FmtSpan;

use taxalign::alignment::Aligner;
use taxalign::checklist::Duo;
use taxalign::errors::Error;
use taxalign::merge::merge_checklists;
use taxalign::properties::PropertyRegistry;
use taxalign::readers::read_checklist;
use taxalign::utils::new_spinner;
use taxalign::{eulerx, report};

/// Align and diff taxonomic checklists
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Align two checklists and write a change report
    Report(ReportArgs),

    /// Write a single checklist as an Euler/X taxonomy
    Dump(DumpArgs),
}

#[derive(clap::Args)]
struct ReportArgs {
    /// The lower-priority checklist: a taxon table, a directory holding
    /// one, or an inline parenthesized tree
    left: String,
    /// The higher-priority checklist
    right: String,

    /// Display tag for the left checklist
    #[arg(long, default_value = "A")]
    left_tag: String,
    /// Display tag for the right checklist
    #[arg(long, default_value = "B")]
    right_tag: String,

    /// Treat the two taxonID spaces as shared, admitting id= matches
    #[arg(long)]
    share_ids: bool,

    /// Where to write the report; - for stdout
    #[arg(long, default_value = "-")]
    out: String,

    /// Report format
    #[arg(long, value_enum, default_value = "ad-hoc")]
    format: Format,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    AdHoc,
    Eulerx,
}

#[derive(clap::Args)]
struct DumpArgs {
    /// The checklist to dump
    checklist: String,

    #[arg(long, default_value = "A")]
    tag: String,

    #[arg(long, default_value = "checklist")]
    name: String,
}

fn main() -> Result<(), Error> {
    tracing_subscriber::fmt::fmt()
        .with_span_events(FmtSpan::CLOSE)
        .with_target(false)
        .with_level(false)
        .init();

    let cli = Cli::parse();

    match &cli.command {
        Commands::Report(args) => run_report(args),
        Commands::Dump(args) => run_dump(args),
    }
}

fn run_report(args: &ReportArgs) -> Result<(), Error> {
    let mut registry = PropertyRegistry::new();

    let spinner = new_spinner("Loading checklists");
    let a = read_checklist(&args.left, &args.left_tag, "left-checklist", &mut registry)?;
    let b = read_checklist(&args.right, &args.right_tag, "right-checklist", &mut registry)?;
    spinner.finish();
    info!(left = a.node_count(), right = b.node_count(), "node counts");

    let duo = Duo::new(&a, &b);
    let mut aligner = Aligner::new(&duo, args.share_ids);

    let spinner = new_spinner("Aligning");
    aligner.analyze();
    let alignment = aligner.alignment();
    spinner.finish();

    let mut out = open_out(&args.out)?;
    match args.format {
        Format::Eulerx => {
            eulerx::dump_checklist(&a, &mut out)?;
            eulerx::dump_checklist(&b, &mut out)?;
            eulerx::dump_alignment(&duo, &alignment, &mut out)?;
        }
        Format::AdHoc => {
            let merge = merge_checklists(&duo, &alignment);
            report::write_report(&duo, &alignment, &merge, &registry, &mut out)?;
        }
    }
    out.flush()?;
    Ok(())
}

fn run_dump(args: &DumpArgs) -> Result<(), Error> {
    let mut registry = PropertyRegistry::new();
    let checklist = read_checklist(&args.checklist, &args.tag, &args.name, &mut registry)?;
    let mut out = std::io::stdout();
    eulerx::dump_checklist(&checklist, &mut out)?;
    Ok(())
}

fn open_out(path: &str) -> Result<Box<dyn Write>, Error> {
    if path == "-" {
        Ok(Box::new(std::io::stdout()))
    } else {
        Ok(Box::new(File::create(path)?))
    }
}
