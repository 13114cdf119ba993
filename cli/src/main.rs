//! texpage CLI - LaTeX single-page preview tool

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use texpage::{
    read_source, validate, Artifact, CompileError, JsonFormat, LayoutEngine, OutputFormat,
    SectionLevel, StructureExtractor, Texpage,
};

#[derive(Parser)]
#[command(name = "texpage")]
#[command(version)]
#[command(about = "Compile LaTeX sources to single-page previews", long_about = None)]
struct Cli {
    /// Input LaTeX file
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a source with remote services and the local fallback
    Compile {
        /// Input LaTeX file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (input name with the artifact's extension if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Remote compile endpoint, in priority order
        #[arg(long = "remote", value_name = "URL", env = "TEXPAGE_REMOTE", value_delimiter = ',')]
        remotes: Vec<String>,

        /// Compiler requested from remote services
        #[arg(long, env = "TEXPAGE_COMPILER", default_value = "pdflatex")]
        compiler: String,

        /// Remote transport timeout in seconds
        #[arg(long, env = "TEXPAGE_TIMEOUT_SECS")]
        timeout_secs: Option<u64>,

        /// Skip remote services
        #[arg(long, conflicts_with = "no_fallback")]
        local_only: bool,

        /// Fail instead of rendering locally when all remotes fail
        #[arg(long)]
        no_fallback: bool,

        /// Local output format
        #[arg(long, value_enum, default_value = "png")]
        format: Format,
    },

    /// Check the structure of a source
    Validate {
        /// Input LaTeX file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Extract the document model as JSON
    Extract {
        /// Input LaTeX file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Show document information
    Info {
        /// Input LaTeX file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Show version information
    Version,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum Format {
    /// PNG raster image
    Png,
    /// SVG vector image
    Svg,
}

impl From<Format> for OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Png => OutputFormat::Png,
            Format::Svg => OutputFormat::Svg,
        }
    }
}

struct CompileArgs {
    remotes: Vec<String>,
    compiler: String,
    timeout: Option<Duration>,
    local_only: bool,
    no_fallback: bool,
    format: OutputFormat,
}

impl Default for CompileArgs {
    fn default() -> Self {
        Self {
            remotes: Vec::new(),
            compiler: texpage::compile::DEFAULT_COMPILER.to_string(),
            timeout: None,
            local_only: false,
            no_fallback: false,
            format: OutputFormat::Png,
        }
    }
}

impl CompileArgs {
    fn builder(&self) -> Texpage {
        let mut builder = Texpage::new()
            .with_compiler(&self.compiler)
            .with_format(self.format);
        for remote in self.remotes.iter().filter(|r| !r.trim().is_empty()) {
            builder = builder.with_remote(remote.trim());
        }
        if let Some(timeout) = self.timeout {
            builder = builder.with_timeout(timeout);
        }
        if self.no_fallback {
            builder = builder.remote_only();
        }
        if self.local_only {
            builder = builder.local_only();
        }
        builder
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Compile {
            input,
            output,
            remotes,
            compiler,
            timeout_secs,
            local_only,
            no_fallback,
            format,
        }) => {
            let args = CompileArgs {
                remotes,
                compiler,
                timeout: timeout_secs.map(Duration::from_secs),
                local_only,
                no_fallback,
                format: format.into(),
            };
            cmd_compile(&input, output.as_deref(), &args)
        }
        Some(Commands::Validate { input }) => cmd_validate(&input),
        Some(Commands::Extract {
            input,
            output,
            compact,
        }) => cmd_extract(&input, output.as_deref(), compact),
        Some(Commands::Info { input }) => cmd_info(&input),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            // Default behavior: compile locally if input is provided
            if let Some(input) = cli.input {
                cmd_compile(&input, None, &CompileArgs::default())
            } else {
                println!("{}", "Usage: texpage <FILE>".yellow());
                println!("       texpage --help for more information");
                Ok(())
            }
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn cmd_compile(
    input: &Path,
    output: Option<&Path>,
    args: &CompileArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let source = read_source(input)?;
    let compiler = args.builder().build()?;

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message(format!("Compiling {}...", input.display()));

    let rt = tokio::runtime::Runtime::new()?;
    let outcome = rt.block_on(compiler.compile(&source));
    pb.finish_and_clear();

    let artifact = match outcome {
        Ok(artifact) => artifact,
        Err(CompileError::Validation(e)) => {
            return Err(format!("{} is not a valid document: {}", input.display(), e).into())
        }
        Err(e) => return Err(e.into()),
    };

    let path = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| output_path(input, &artifact));
    fs::write(&path, &artifact.bytes)?;

    println!(
        "{} {} ({} bytes, {})",
        "Saved to".green(),
        path.display(),
        artifact.len(),
        artifact.strategy.cyan()
    );

    Ok(())
}

fn output_path(input: &Path, artifact: &Artifact) -> PathBuf {
    input.with_extension(artifact.extension())
}

fn cmd_validate(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let source = read_source(input)?;
    validate(&source)?;
    println!("{} {}", "Valid".green().bold(), input.display());
    Ok(())
}

fn cmd_extract(
    input: &Path,
    output: Option<&Path>,
    compact: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let source = read_source(input)?;

    let format = if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    };

    let json = texpage::to_json(&source, format)?;

    if let Some(path) = output {
        fs::write(path, &json)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", json);
    }

    Ok(())
}

fn cmd_info(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let source = read_source(input)?;
    let model = StructureExtractor::new().extract(&source);
    let page = LayoutEngine::default().layout(&model);

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    match validate(&source) {
        Ok(()) => println!("{}: {}", "Valid".bold(), "Yes".green()),
        Err(e) => println!("{}: {} ({})", "Valid".bold(), "No".red(), e),
    }
    println!("{}: {}", "Title".bold(), model.title);
    let authors: Vec<&str> = model.author_lines().collect();
    if !authors.is_empty() {
        println!("{}: {}", "Author".bold(), authors.join(", "));
    }
    if !model.date.is_empty() {
        println!("{}: {}", "Date".bold(), model.date);
    }

    println!();
    println!("{}", "Content Statistics".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "Words".bold(), model.word_count());
    println!(
        "{}: {} / {} / {}",
        "Sections".bold(),
        model.section_count(SectionLevel::Section),
        model.section_count(SectionLevel::Subsection),
        model.section_count(SectionLevel::Subsubsection)
    );
    println!("{}: {}", "References".bold(), model.bibliography.len());
    println!("{}: {}", "Equations".bold(), model.equations.len());

    println!();
    println!("{}", "Local Preview".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "Lines".bold(), page.lines.len());
    println!(
        "{}: {}",
        "Truncated".bold(),
        if page.truncated { "Yes" } else { "No" }
    );
    if page.omitted_sections > 0 {
        println!("{}: {}", "Omitted sections".bold(), page.omitted_sections);
    }

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "texpage".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("LaTeX single-page preview tool");
    println!();
    println!("License: MIT");
}
