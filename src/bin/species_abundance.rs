use std::io::{self, Write};
use std::process::ExitCode;

use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};
use miette::IntoDiagnostic;
use tracing_subscriber::EnvFilter;

use species_abundance::config::{ConfigLoader, DEFAULT_TOP_N};
use species_abundance::domain::{Sample, SampleId, WorkflowId};
use species_abundance::error::{AbundanceError, ErrorCategory};
use species_abundance::metadata::MetadataKeyBuilder;
use species_abundance::platform::{AnalysisSubmission, StaticWorkflowRegistry};
use species_abundance::report::ReportParser;
use species_abundance::store::JsonMetadataStore;
use species_abundance::updater::SpeciesAbundanceUpdater;

#[derive(Parser)]
#[command(name = "species-abundance")]
#[command(about = "Turn species abundance reports into namespaced sample metadata")]
#[command(version, author)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Print the metadata synthesized from a report as JSON")]
    Parse(ParseArgs),
    #[command(about = "Merge a report's metadata into a sample record")]
    Update(UpdateArgs),
}

#[derive(Args)]
struct ParseArgs {
    report: Utf8PathBuf,

    #[arg(long, default_value = "species-abundance")]
    namespace: String,

    #[arg(long, default_value_t = DEFAULT_TOP_N)]
    top_n: usize,
}

#[derive(Args)]
struct UpdateArgs {
    #[arg(long)]
    report: Utf8PathBuf,

    #[arg(long)]
    sample: u64,

    #[arg(long)]
    workflow_id: String,

    #[arg(long)]
    workflows: Utf8PathBuf,

    #[arg(long)]
    store: Utf8PathBuf,

    #[arg(long)]
    config: Option<Utf8PathBuf>,

    #[arg(long, default_value = "cli")]
    analysis_id: String,
}

fn main() -> ExitCode {
    if let Err(report) = run() {
        eprintln!("{report:?}");
        if let Some(err) = report.downcast_ref::<AbundanceError>() {
            return ExitCode::from(map_exit_code(err));
        }
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

fn map_exit_code(error: &AbundanceError) -> u8 {
    match error.category() {
        ErrorCategory::Validation | ErrorCategory::NotFound => 2,
        ErrorCategory::Parse => 3,
        ErrorCategory::Config | ErrorCategory::Sink => 1,
    }
}

fn run() -> miette::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Parse(args) => run_parse(args),
        Commands::Update(args) => run_update(args),
    }
}

fn run_parse(args: ParseArgs) -> miette::Result<()> {
    let rows = ReportParser::new(args.top_n)?.parse(&args.report)?;
    let metadata = MetadataKeyBuilder::new(&args.namespace).build(&rows)?;
    let json = serde_json::to_string_pretty(&metadata).into_diagnostic()?;
    let mut stdout = io::stdout();
    stdout.write_all(json.as_bytes()).into_diagnostic()?;
    stdout.write_all(b"\n").into_diagnostic()?;
    Ok(())
}

fn run_update(args: UpdateArgs) -> miette::Result<()> {
    let config = ConfigLoader::resolve(args.config.as_deref())?;
    let workflows = StaticWorkflowRegistry::load(&args.workflows)?;
    let workflow_id: WorkflowId = args.workflow_id.parse()?;
    let analysis = AnalysisSubmission::new(args.analysis_id, workflow_id)
        .with_output(config.output_name.clone(), args.report);
    let store = JsonMetadataStore::new(args.store);

    let updater = SpeciesAbundanceUpdater::new(workflows, store, config);
    let samples = [Sample::new(SampleId::new(args.sample))];
    updater.update(&samples, &analysis)?;
    Ok(())
}
