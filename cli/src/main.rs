//! docflow CLI - editor JSON, DOCX and PDF conversion tool

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use serde_json::Value;

use docflow::convert::sanitize_filename;
use docflow::model::DEFAULT_IMPORT_TITLE;
use docflow::render::{extract_plain_text, from_project_json, to_json};
use docflow::{
    ConvertOptions, ConverterRegistry, EditorDocument, ExportArtifact, ExportFormat, JsonFormat,
    PageSelection, ParseOptions, ProjectExport, RenderOptions, UploadPolicy,
};

#[derive(Parser)]
#[command(name = "docflow")]
#[command(version)]
#[command(about = "Convert editor JSON documents to and from DOCX and PDF", long_about = None)]
struct Cli {
    /// Upload size limit in megabytes
    #[arg(long, global = true, env = "DOCFLOW_MAX_UPLOAD_MB", default_value = "20")]
    max_upload_mb: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Import a DOCX or PDF file into editor JSON
    Import {
        /// Input DOCX or PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Wrap the document in a .docflow.json project record
        #[arg(long)]
        project: bool,

        /// Page range for PDF input (e.g., "1-10", "1,3,5")
        #[arg(long)]
        pages: Option<String>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Lay a DOCX or PDF file out as canvas elements
    Parse {
        /// Input DOCX or PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Skip embedded images
        #[arg(long)]
        no_images: bool,

        /// Page range for PDF input (e.g., "1-10", "1,3,5")
        #[arg(long)]
        pages: Option<String>,
    },

    /// Export editor JSON or a project record as DOCX, PDF or JSON
    Export {
        /// Editor JSON or .docflow.json file
        #[arg(value_name = "JSON")]
        input: PathBuf,

        /// Target format
        #[arg(short, long, value_enum)]
        format: TargetFormat,

        /// Output file (named after the title if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Document title (overrides the project record's title)
        #[arg(long)]
        title: Option<String>,
    },

    /// Print the plain text of editor JSON or a project record
    Text {
        /// Editor JSON or .docflow.json file
        #[arg(value_name = "JSON")]
        input: PathBuf,
    },

    /// Show document information
    Info {
        /// Input DOCX or PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Import many files in parallel
    Batch {
        /// Input DOCX or PDF files
        #[arg(value_name = "FILES", required = true)]
        inputs: Vec<PathBuf>,

        /// Output directory
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,
    },

    /// Show version information
    Version,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum TargetFormat {
    /// Word-processor package
    Docx,
    /// Paginated PDF
    Pdf,
    /// .docflow.json project record
    Json,
}

impl From<TargetFormat> for ExportFormat {
    fn from(format: TargetFormat) -> Self {
        match format {
            TargetFormat::Docx => ExportFormat::Docx,
            TargetFormat::Pdf => ExportFormat::Pdf,
            TargetFormat::Json => ExportFormat::Json,
        }
    }
}

type CliResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    let policy = UploadPolicy::new()
        .with_extensions(["docx", "pdf"])
        .with_max_megabytes(cli.max_upload_mb);

    let result = match cli.command {
        Commands::Import {
            input,
            output,
            project,
            pages,
            compact,
        } => cmd_import(
            &policy,
            &input,
            output.as_deref(),
            project,
            pages.as_deref(),
            compact,
        ),
        Commands::Parse {
            input,
            output,
            no_images,
            pages,
        } => cmd_parse(&policy, &input, output.as_deref(), no_images, pages.as_deref()),
        Commands::Export {
            input,
            format,
            output,
            title,
        } => cmd_export(&input, format.into(), output.as_deref(), title),
        Commands::Text { input } => cmd_text(&input),
        Commands::Info { input } => cmd_info(&policy, &input),
        Commands::Batch { inputs, output } => cmd_batch(&policy, &inputs, output.as_deref()),
        Commands::Version => {
            cmd_version();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn parse_options(pages: Option<&str>) -> CliResult<ParseOptions> {
    let page_selection = if let Some(p) = pages {
        PageSelection::parse(p).map_err(|e| format!("Invalid page range: {}", e))?
    } else {
        PageSelection::All
    };
    Ok(ParseOptions::new().with_pages(page_selection))
}

/// Read an upload after checking its name and size.
fn read_upload(policy: &UploadPolicy, input: &Path) -> CliResult<Vec<u8>> {
    let size = fs::metadata(input)?.len();
    let name = input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    policy.validate(&name, size)?;
    Ok(fs::read(input)?)
}

/// Read editor JSON or a project record.
fn read_project(input: &Path) -> CliResult<ProjectExport> {
    let data = fs::read(input)?;
    let value: Value = serde_json::from_slice(&data)?;

    if value.get("content_json").is_some() {
        return Ok(from_project_json(&data)?);
    }
    Ok(ProjectExport::new(
        DEFAULT_IMPORT_TITLE,
        EditorDocument::from_value(&value),
    ))
}

fn write_output(output: Option<&Path>, content: &str) -> CliResult<()> {
    if let Some(path) = output {
        fs::write(path, content)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", content);
    }
    Ok(())
}

fn import_document(
    registry: &ConverterRegistry,
    data: &[u8],
    options: &ConvertOptions,
) -> CliResult<EditorDocument> {
    let converter = registry.for_bytes(data)?;
    Ok(converter.import_bytes(data, options)?)
}

fn cmd_import(
    policy: &UploadPolicy,
    input: &Path,
    output: Option<&Path>,
    project: bool,
    pages: Option<&str>,
    compact: bool,
) -> CliResult<()> {
    let data = read_upload(policy, input)?;
    let registry = ConverterRegistry::with_defaults();
    let options = ConvertOptions::new().with_parse_options(parse_options(pages)?);
    let doc = import_document(&registry, &data, &options)?;

    let format = if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    };

    let json = if project {
        let metadata = registry.for_bytes(&data)?.metadata(&data)?;
        let title = metadata.display_title().unwrap_or(DEFAULT_IMPORT_TITLE);
        to_json(&ProjectExport::new(title, doc), format)?
    } else {
        to_json(&doc, format)?
    };

    write_output(output, &json)
}

fn cmd_parse(
    policy: &UploadPolicy,
    input: &Path,
    output: Option<&Path>,
    no_images: bool,
    pages: Option<&str>,
) -> CliResult<()> {
    let data = read_upload(policy, input)?;
    let registry = ConverterRegistry::with_defaults();
    let parse = parse_options(pages)?.with_images(!no_images);
    let options = ConvertOptions::new().with_parse_options(parse);

    let result = registry.for_bytes(&data)?.parse_bytes(&data, &options)?;
    log::info!("{} element(s)", result.elements.len());

    write_output(output, &to_json(&result, JsonFormat::Pretty)?)
}

fn cmd_export(
    input: &Path,
    format: ExportFormat,
    output: Option<&Path>,
    title: Option<String>,
) -> CliResult<()> {
    let mut project = read_project(input)?;
    if let Some(title) = title {
        project.title = title;
    }

    let pb = ProgressBar::new_spinner();
    pb.set_message(format!("Rendering {}...", format.suffix()));
    let artifact = ExportArtifact::render(&project, format, &RenderOptions::default())?;
    pb.finish_and_clear();

    let path = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(&artifact.filename));
    fs::write(&path, &artifact.bytes)?;

    println!(
        "{} {} ({}, {} bytes)",
        "Saved to".green(),
        path.display(),
        artifact.content_type.dimmed(),
        artifact.bytes.len()
    );
    Ok(())
}

fn cmd_text(input: &Path) -> CliResult<()> {
    let project = read_project(input)?;
    println!("{}", extract_plain_text(&project.content_json));
    Ok(())
}

fn cmd_info(policy: &UploadPolicy, input: &Path) -> CliResult<()> {
    let data = read_upload(policy, input)?;
    let registry = ConverterRegistry::with_defaults();
    let converter = registry.for_bytes(&data)?;
    let metadata = converter.metadata(&data)?;

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    println!("{}: {}", "Format".bold(), metadata.format);
    if metadata.page_count > 0 {
        println!("{}: {}", "Pages".bold(), metadata.page_count);
    }
    println!(
        "{}: {}",
        "Encrypted".bold(),
        if metadata.encrypted { "Yes" } else { "No" }
    );

    if let Some(ref title) = metadata.title {
        println!("{}: {}", "Title".bold(), title);
    }
    if let Some(ref author) = metadata.author {
        println!("{}: {}", "Author".bold(), author);
    }
    if let Some(ref subject) = metadata.subject {
        println!("{}: {}", "Subject".bold(), subject);
    }
    if let Some(ref created) = metadata.created {
        println!("{}: {}", "Created".bold(), created);
    }
    if let Some(ref modified) = metadata.modified {
        println!("{}: {}", "Modified".bold(), modified);
    }

    println!();
    println!("{}", "Content Statistics".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    let options = ConvertOptions::default();
    let doc = converter.import_bytes(&data, &options)?;
    let layout = converter.parse_bytes(&data, &options)?;
    let text = extract_plain_text(&doc);

    println!("{}: {}", "Blocks".bold(), doc.len());
    println!("{}: {}", "Words".bold(), text.split_whitespace().count());
    println!("{}: {}", "Characters".bold(), text.chars().count());
    println!("{}: {}", "Canvas elements".bold(), layout.elements.len());
    if let Some(pages) = layout.page_count_hint() {
        println!("{}: {}", "Canvas pages (est.)".bold(), pages);
    }

    Ok(())
}

fn cmd_batch(policy: &UploadPolicy, inputs: &[PathBuf], output: Option<&Path>) -> CliResult<()> {
    let output_dir = output
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."));
    fs::create_dir_all(&output_dir)?;

    let pb = ProgressBar::new(inputs.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );

    let registry = ConverterRegistry::with_defaults();
    let options = ConvertOptions::default();

    let failures: Vec<(PathBuf, String)> = inputs
        .par_iter()
        .filter_map(|input| {
            let result = read_upload(policy, input)
                .and_then(|data| import_document(&registry, &data, &options))
                .and_then(|doc| {
                    let stem = input.file_stem().unwrap_or_default().to_string_lossy();
                    let title = sanitize_filename(&stem);
                    let project = ProjectExport::new(title, doc);
                    let artifact = ExportArtifact::render(
                        &project,
                        ExportFormat::Json,
                        &RenderOptions::default(),
                    )?;
                    fs::write(output_dir.join(&artifact.filename), &artifact.bytes)?;
                    Ok(())
                });
            pb.inc(1);
            result.err().map(|e| (input.clone(), e.to_string()))
        })
        .collect();

    pb.finish_with_message("Done!");

    let converted = inputs.len() - failures.len();
    println!(
        "\n{} {} of {} file(s) imported into {}",
        "Done!".green().bold(),
        converted,
        inputs.len(),
        output_dir.display()
    );
    for (path, error) in &failures {
        println!("  {} {}: {}", "✗".red(), path.display(), error);
    }

    if failures.is_empty() {
        Ok(())
    } else {
        Err(format!("{} file(s) failed", failures.len()).into())
    }
}

fn cmd_version() {
    println!("{} {}", "docflow".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Editor JSON, DOCX and PDF conversion tool");
    println!();
    println!("License: MIT");
}
