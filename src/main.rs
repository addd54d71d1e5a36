//! texweave command-line interface.

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{CommandFactory, Parser, error::ErrorKind};
use log::LevelFilter;

use texweave::catalog::{Catalog, LayoutPosition};
use texweave::compose::Composer;
use texweave::config::{Config, ConfigError, init_config};
use texweave::driver::{ConvertOptions, Converter};
use texweave::format::OutputFormat;

const AFTER_HELP: &str = "\
Examples:
  texweave document.tex
  texweave document.tex --theme academic
  texweave paper.tex -f markdown
  texweave paper.tex -f html5,markdown,epub
  texweave paper.tex --theme academic --components floating-toc,search
  texweave paper.tex --theme serif --components floating-toc,sidebar-right,citation-generator

System dependencies:
  LaTeXML  required for all conversions
  pandoc   required for markdown, txt and epub";

/// Convert LaTeX documents with LaTeXML and dress the HTML with themes and components
#[derive(Parser, Debug)]
#[command(version, about, long_about = None, after_help = AFTER_HELP)]
struct Args {
    /// Input .tex file to convert
    #[arg(value_name = "INPUT")]
    input: Option<PathBuf>,

    /// Output format(s), comma-separated (default: from config, else html5)
    #[arg(short, long, value_name = "FORMATS")]
    format: Option<String>,

    /// Theme to apply
    #[arg(short, long)]
    theme: Option<String>,

    /// Comma-separated components to include
    #[arg(short, long, value_name = "COMPONENTS")]
    components: Option<String>,

    /// Extra CSS file passed to LaTeXML (HTML formats)
    #[arg(long, value_name = "FILE")]
    css: Option<PathBuf>,

    /// Disable LaTeXML's default CSS
    #[arg(long)]
    no_default_css: bool,

    /// Output directory (default: per-format directory next to the input)
    #[arg(short, long, value_name = "DIR")]
    output: Option<PathBuf>,

    /// Directory with themes/ and components/ overriding the bundled resources
    #[arg(long, value_name = "DIR")]
    resources: Option<PathBuf>,

    /// Override author name from config
    #[arg(long, value_name = "NAME")]
    author_name: Option<String>,

    /// Override author email from config
    #[arg(long, value_name = "EMAIL")]
    author_email: Option<String>,

    /// Override copyright year from config
    #[arg(long, value_name = "YEAR")]
    copyright_year: Option<String>,

    /// List available themes and exit
    #[arg(long)]
    list_themes: bool,

    /// List available components and exit
    #[arg(long)]
    list_components: bool,

    /// List supported formats and exit
    #[arg(long)]
    list_formats: bool,

    /// Create a default ~/.texweave.toml and exit
    #[arg(long)]
    init_config: bool,

    /// Overwrite an existing configuration file
    #[arg(long, requires = "init_config")]
    force: bool,

    /// Show info messages
    #[arg(long, group = "verbosity")]
    verbose: bool,

    /// Show all messages
    #[arg(long, group = "verbosity")]
    debug: bool,

    /// Show errors only
    #[arg(short, long, group = "verbosity")]
    quiet: bool,
}

impl Args {
    fn level(&self) -> Option<LevelFilter> {
        if self.debug {
            Some(LevelFilter::Debug)
        } else if self.verbose {
            Some(LevelFilter::Info)
        } else if self.quiet {
            Some(LevelFilter::Error)
        } else {
            None
        }
    }
}

fn init_logging(level: Option<LevelFilter>) {
    let mut builder = env_logger::Builder::new();
    match level {
        Some(level) => {
            builder.filter_level(level);
        }
        None => {
            builder.filter_level(LevelFilter::Warn).parse_default_env();
        }
    }
    builder
        .format(|buf, record| writeln!(buf, "{}: {}", record.level(), record.args()))
        .init();
}

fn split_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.level());

    match run(args).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let mut config = Config::load();

    let resources = args.resources.clone().or_else(|| config.output.resources_dir.clone());
    let catalog = match resources {
        Some(dir) => Catalog::with_resources_dir(dir),
        None => Catalog::builtin(),
    };
    for missing in catalog.validate() {
        log::warn!("{missing}; the owning theme or component will be incomplete");
    }

    if args.list_formats {
        println!("Supported formats:");
        for format in OutputFormat::ALL {
            println!("  {:12} - {}", format.name(), format.description());
        }
        return Ok(ExitCode::SUCCESS);
    }

    if args.list_themes {
        println!("Available themes:");
        for theme in catalog.themes.list() {
            println!("  {:15} - {}", theme.id(), theme.description());
        }
        return Ok(ExitCode::SUCCESS);
    }

    if args.list_components {
        println!("Available components:");
        for component in catalog.components.list() {
            println!("  {:20} - {}", component.id(), component.description());
            if component.position() != LayoutPosition::Inline {
                println!("  {:20}   (Position: {})", "", component.position());
            }
        }
        return Ok(ExitCode::SUCCESS);
    }

    if args.init_config {
        let path = Config::default_path().ok_or(ConfigError::NoHome)?;
        init_config(&path, args.force)?;
        println!("Created default configuration at {}", path.display());
        println!("Edit this file to customize your settings.");
        return Ok(ExitCode::SUCCESS);
    }

    let Some(input) = args.input.clone() else {
        Args::command()
            .error(ErrorKind::MissingRequiredArgument, "the following arguments are required: <INPUT>")
            .exit();
    };

    if let Some(name) = args.author_name {
        config.author.name = name;
    }
    if let Some(email) = args.author_email {
        config.author.email = email;
    }
    if let Some(year) = args.copyright_year {
        config.footer.copyright_year = year;
    }

    let theme = args.theme.unwrap_or_else(|| config.output.default_theme.clone());
    catalog.themes.get(&theme)?;

    let components = match &args.components {
        Some(list) => split_list(list),
        None => config.output.default_components.clone(),
    };

    let formats = match &args.format {
        Some(list) => OutputFormat::parse_list(list)?,
        None => OutputFormat::parse_list(&config.output.default_formats.join(","))?,
    };

    let options = ConvertOptions {
        theme,
        components,
        css: args.css,
        no_default_css: args.no_default_css,
        footer: config.footer_data(),
    };

    let converter = Converter::new(input, args.output, Composer::new(catalog))?;

    let mut written = Vec::new();
    let mut failed = false;
    for format in formats {
        match converter.convert(format, &options).await {
            Ok(conversion) => written.push(conversion.path),
            Err(e) => {
                log::error!("{format} conversion failed");
                eprintln!("Error: {e}");
                failed = true;
            }
        }
    }

    match written.as_slice() {
        [] => {}
        [path] => println!("Successfully converted to: {}", path.display()),
        paths => {
            println!("Successfully converted to {} formats:", paths.len());
            for path in paths {
                println!("  - {}", path.display());
            }
        }
    }

    Ok(if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}
