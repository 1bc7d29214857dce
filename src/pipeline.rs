// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! End-to-end conversion of monitor records into Terraform files.
//!
//! [`plan`] is pure: it sanitizes, deduplicates, transforms and renders in API
//! order. [`write`] materializes a plan on disk and [`run`] chains fetching,
//! planning and writing for one configured run.

use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{info, warn};

use crate::{
    client,
    config::GeneratorConfig,
    dedupe::Deduplicator,
    error::Error,
    identifier::ResourceIdentifier,
    monitor::Monitor,
    output::OutputDir,
    render::{PROVIDER_FILE_NAME, Renderer, SINGLE_FILE_NAME},
    transform::{ConfigLayout, transform_monitor},
};

/// Resource block ready to be written.
#[derive(Debug, Clone, PartialEq, Eq,)]
pub struct RenderedResource
{
    /// Unique identifier of the resource.
    pub identifier:   ResourceIdentifier,
    /// Display name the identifier was derived from.
    pub display_name: String,
    /// Rendered `resource` block.
    pub contents:     String,
}

impl RenderedResource
{
    /// File the resource is written to in per-monitor mode.
    pub fn file_name(&self,) -> String
    {
        self.identifier.file_name()
    }
}

/// Monitor that was left out of the output.
#[derive(Debug, Clone, PartialEq, Eq,)]
pub struct SkippedMonitor
{
    /// One-based position in the API response.
    pub position: usize,
    /// Monitor id, when one could be read.
    pub id:       Option<String,>,
    /// Why the monitor was skipped.
    pub reason:   String,
}

/// File that could not be written.
#[derive(Debug, Clone, PartialEq, Eq,)]
pub struct FailedWrite
{
    /// Target path.
    pub path:     PathBuf,
    /// Underlying error message.
    pub reason:   String,
    /// Monitors whose resource block the file would have held.
    pub monitors: usize,
}

/// Outcome of planning: rendered resources plus skipped monitors.
#[derive(Debug, Clone, PartialEq, Eq,)]
pub struct Plan
{
    /// Rendered provider file.
    pub provider:  String,
    /// Rendered resources in API order.
    pub resources: Vec<RenderedResource,>,
    /// Monitors that could not be transformed.
    pub skipped:   Vec<SkippedMonitor,>,
}

/// End-of-run report.
#[derive(Debug, Clone, PartialEq, Eq,)]
pub struct RunSummary
{
    /// Number of records returned by the source.
    pub fetched:       usize,
    /// Paths written successfully, provider file first.
    pub written:       Vec<PathBuf,>,
    /// Monitors left out during planning.
    pub skipped:       Vec<SkippedMonitor,>,
    /// Files that failed to write.
    pub failed_writes: Vec<FailedWrite,>,
}

impl RunSummary
{
    /// Monitors that did not end up on disk, for whatever reason.
    ///
    /// A failed `provider.tf` write holds no monitor and is not counted.
    pub fn skipped_count(&self,) -> usize
    {
        self.skipped.len() + self.failed_writes.iter().map(|failed| failed.monitors,).sum::<usize>()
    }
}

/// Transforms fetched records into rendered resources.
///
/// Records that are not objects, or that the layout cannot re-shape, are
/// skipped and reported; the rest of the run is unaffected.
///
/// # Errors
///
/// Returns [`Error::Template`](Error::Template) only if the provider file
/// template fails, which would affect every run.
///
/// # Examples
///
/// ```
/// use monitor2tf::{ConfigLayout, Renderer, plan};
/// use serde_json::json;
///
/// let renderer = Renderer::new()?;
/// let records = vec![json!({"name": "CPU High", "id": "1"}), json!({"name": "cpu high", "id": "2"})];
/// let plan = plan(&records, ConfigLayout::Passthrough, &renderer,)?;
/// let names: Vec<&str> = plan.resources.iter().map(|r| r.identifier.as_str()).collect();
/// assert_eq!(names, ["cpu_high", "cpu_high_2"]);
/// # Ok::<(), monitor2tf::Error>(())
/// ```
pub fn plan(records: &[Value], layout: ConfigLayout, renderer: &Renderer,) -> Result<Plan, Error,>
{
    let provider = renderer.provider_file()?;
    let mut dedupe = Deduplicator::default();
    let mut resources = Vec::with_capacity(records.len(),);
    let mut skipped = Vec::new();
    let total = records.len();

    for (index, record,) in records.iter().enumerate() {
        let position = index + 1;
        let monitor = match Monitor::from_value(record.clone(),) {
            Ok(monitor,) => monitor,
            Err(error,) => {
                warn!("[{position}/{total}] skipping monitor: {error}");
                skipped.push(SkippedMonitor {
                    position,
                    id: None,
                    reason: error.to_display_string(),
                },);
                continue;
            }
        };

        let display_name = monitor.display_name().to_owned();
        let identifier = dedupe.assign(ResourceIdentifier::sanitize(&display_name,),);

        let rendered = transform_monitor(&monitor, layout,)
            .and_then(|block| renderer.resource_block(&identifier, &block,),);
        match rendered {
            Ok(contents,) => {
                info!("[{position}/{total}] {} -> {identifier}", shown_name(&display_name));
                resources.push(RenderedResource {
                    identifier,
                    display_name,
                    contents,
                },);
            }
            Err(error,) => {
                warn!("[{position}/{total}] skipping {}: {error}", shown_name(&display_name));
                skipped.push(SkippedMonitor {
                    position,
                    id: monitor.id(),
                    reason: error.to_display_string(),
                },);
            }
        }
    }

    Ok(Plan {
        provider,
        resources,
        skipped,
    },)
}

/// Writes a plan into `output_dir`.
///
/// In per-monitor mode the directory receives `provider.tf` plus one
/// `monitor_<identifier>.tf` per resource. In single-file mode everything is
/// concatenated into `terraform.tf`.
///
/// # Errors
///
/// Returns [`Error::OutputDir`](Error::OutputDir) when the directory cannot be
/// created. Individual write failures are recorded in the summary instead.
pub fn write(
    plan: Plan,
    output_dir: &Path,
    single_file: bool,
    fetched: usize,
) -> Result<RunSummary, Error,>
{
    let output = OutputDir::create(output_dir,)?;
    let mut summary = RunSummary {
        fetched,
        written: Vec::new(),
        skipped: plan.skipped,
        failed_writes: Vec::new(),
    };

    let mut files = Vec::with_capacity(plan.resources.len() + 1,);
    if single_file {
        let mut combined = plan.provider;
        for resource in &plan.resources {
            combined.push('\n',);
            combined.push_str(&resource.contents,);
        }
        files.push((SINGLE_FILE_NAME.to_owned(), combined, plan.resources.len(),),);
    } else {
        files.push((PROVIDER_FILE_NAME.to_owned(), plan.provider, 0,),);
        files.extend(
            plan.resources
                .into_iter()
                .map(|resource| (resource.file_name(), resource.contents, 1,),),
        );
    }

    for (file_name, contents, monitors,) in files {
        match output.write_file(&file_name, &contents,) {
            Ok(path,) => summary.written.push(path,),
            Err(error,) => {
                warn!("{error}");
                summary.failed_writes.push(FailedWrite {
                    path: output.path().join(&file_name,),
                    reason: error.to_display_string(),
                    monitors,
                },);
            }
        }
    }

    info!(
        "Wrote {} file(s) to {}, {} monitor(s) skipped",
        summary.written.len(),
        output.path().display(),
        summary.skipped_count()
    );

    Ok(summary,)
}

/// Runs the whole pipeline for one configuration.
///
/// Nothing is written when fetching fails.
///
/// # Errors
///
/// Returns fetch, parsing and directory creation errors; per-monitor and
/// per-file problems are reported in the [`RunSummary`].
pub async fn run(config: &GeneratorConfig,) -> Result<RunSummary, Error,>
{
    let records = client::load_monitors(&config.source,).await?;
    info!("Found {} monitor(s)", records.len());

    let renderer = Renderer::new()?;
    let plan = plan(&records, config.layout, &renderer,)?;
    write(plan, &config.output_dir, config.single_file, records.len(),)
}

fn shown_name(name: &str,) -> &str
{
    if name.is_empty() { "unnamed" } else { name }
}
