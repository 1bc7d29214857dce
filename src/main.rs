//! Command-line interface for the monitor2tf binary.
//!
//! Configuration is read once here, from flags or the `GROUNDCOVER_*`
//! environment variables, and handed to the library as an explicit
//! [`GeneratorConfig`].

use std::{io, path::PathBuf, process};

use clap::{ArgAction, Parser, ValueEnum};
use monitor2tf::{
    API_KEY_VARIABLE, BACKEND_ID_VARIABLE, ConfigLayout, Error, GeneratorConfig,
    GeneratorOptions, RunSummary, run,
};
use tracing_subscriber::EnvFilter;

/// Command line interface for generating Terraform monitor resources.
#[derive(Debug, Parser,)]
#[command(
    name = "monitor2tf",
    version,
    about = "Generate Terraform resources from groundcover monitors"
)]
struct Cli
{
    /// API key used to authenticate against the groundcover API.
    #[arg(long = "api-key", env = "GROUNDCOVER_API_KEY", hide_env_values = true)]
    api_key: Option<String,>,

    /// Backend id sent with every API request.
    #[arg(long = "backend-id", env = "GROUNDCOVER_BACKEND_ID", hide_env_values = true)]
    backend_id: Option<String,>,

    /// Base URL of the groundcover API.
    #[arg(long = "base-url", env = "GROUNDCOVER_BASE_URL", value_name = "URL")]
    base_url: Option<String,>,

    /// Directory that will receive the generated Terraform files.
    #[arg(long = "output", value_name = "DIR")]
    output: Option<PathBuf,>,

    /// Shape of the YAML embedded in each monitor resource.
    #[arg(long = "layout", value_enum, default_value_t = LayoutArg::Passthrough)]
    layout: LayoutArg,

    /// Write provider and resources into a single terraform.tf.
    #[arg(long = "single-file", action = ArgAction::SetTrue)]
    single_file: bool,

    /// Read a saved API response instead of calling the API.
    #[arg(long = "from-file", value_name = "PATH")]
    from_file: Option<PathBuf,>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum,)]
enum LayoutArg
{
    /// Copy monitor fields as returned by the API.
    Passthrough,
    /// Re-shape fields into the provider's monitor YAML layout.
    Provider,
}

impl From<LayoutArg,> for ConfigLayout
{
    fn from(layout: LayoutArg,) -> Self
    {
        match layout {
            LayoutArg::Passthrough => Self::Passthrough,
            LayoutArg::Provider => Self::Provider,
        }
    }
}

impl From<Cli,> for GeneratorOptions
{
    fn from(cli: Cli,) -> Self
    {
        Self {
            api_key:     cli.api_key,
            backend_id:  cli.backend_id,
            base_url:    cli.base_url,
            output_dir:  cli.output,
            layout:      cli.layout.into(),
            single_file: cli.single_file,
            from_file:   cli.from_file,
        }
    }
}

/// Entry point that reports errors and sets the appropriate exit status.
fn main()
{
    init_tracing();

    if let Err(error,) = run_cli(Cli::parse(),) {
        eprintln!("{}", error.to_display_string());
        process::exit(1,);
    }
}

fn init_tracing()
{
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info",),);
    tracing_subscriber::fmt().with_env_filter(filter,).with_writer(io::stderr,).init();
}

/// Validates configuration and drives one generator run.
///
/// # Errors
///
/// Propagates credential, fetch, parsing and directory creation errors.
fn run_cli(cli: Cli,) -> Result<(), Error,>
{
    let config = GeneratorConfig::from_options(cli.into(),)?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|source| Error::Runtime {
            source,
        },)?;
    let summary = runtime.block_on(run(&config,),)?;

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    print_summary(&mut handle, &summary,)
}

fn print_summary<W: io::Write,>(writer: &mut W, summary: &RunSummary,) -> Result<(), Error,>
{
    write_summary(writer, summary,).map_err(|source| Error::SummaryOutput {
        source,
    },)
}

fn write_summary<W: io::Write,>(writer: &mut W, summary: &RunSummary,) -> io::Result<(),>
{
    writeln!(writer, "Fetched {} monitor(s)", summary.fetched)?;
    writeln!(writer, "Wrote {} file(s)", summary.written.len())?;
    for path in &summary.written {
        writeln!(writer, "  {}", path.display())?;
    }

    if summary.skipped_count() > 0 {
        writeln!(writer, "Skipped {} monitor(s)", summary.skipped_count())?;
        for skipped in &summary.skipped {
            let id = skipped.id.as_deref().unwrap_or("-",);
            writeln!(writer, "  #{} (id {id}): {}", skipped.position, skipped.reason)?;
        }
    }

    if !summary.failed_writes.is_empty() {
        writeln!(writer, "Failed to write {} file(s)", summary.failed_writes.len())?;
        for failed in &summary.failed_writes {
            writeln!(writer, "  {}: {}", failed.path.display(), failed.reason)?;
        }
    }

    writeln!(writer)?;
    writeln!(writer, "To use the generated files:")?;
    writeln!(writer, "  export TF_VAR_{API_KEY_VARIABLE}='<your api key>'")?;
    writeln!(writer, "  export TF_VAR_{BACKEND_ID_VARIABLE}='<your backend id>'")?;
    writeln!(writer, "  terraform init")?;
    writeln!(writer, "  terraform plan")
}
