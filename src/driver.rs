//! Conversion driver.
//!
//! Runs LaTeXML (and pandoc for converted formats) on a `.tex` input and
//! composes the HTML it produces.
//!
//! | family    | pipeline                                              |
//! |-----------|-------------------------------------------------------|
//! | Html      | `latexmlc` → compose in place                         |
//! | Converted | `latexmlc` → `*.tmp.html` → compose → `pandoc` → out |
//! | Data      | `latexml` / `latexmlc`, no composition                |
//!
//! External processes go through the [`ToolRunner`] trait so the driver can
//! be exercised without LaTeXML installed.

use std::ffi::OsString;
use std::fmt;
use std::future::Future;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use thiserror::Error;

use crate::catalog::filter_for_format;
use crate::compose::{Composer, CompositionRequest};
use crate::config::FooterData;
use crate::error::{ComposeError, Warning};
use crate::format::{FormatFamily, OutputFormat};

/// Wall-clock limit for LaTeXML runs.
pub const LATEXML_TIMEOUT: Duration = Duration::from_secs(900);
/// LaTeXML's own processing limit, in seconds.
pub const LATEXML_INTERNAL_TIMEOUT_SECS: u64 = 600;
/// Wall-clock limit for pandoc runs.
pub const PANDOC_TIMEOUT: Duration = Duration::from_secs(300);

// =============================================================================
// Tools
// =============================================================================

/// External programs the driver knows how to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    Latexml,
    Latexmlc,
    Pandoc,
}

impl Tool {
    pub fn program(self) -> &'static str {
        match self {
            Tool::Latexml => "latexml",
            Tool::Latexmlc => "latexmlc",
            Tool::Pandoc => "pandoc",
        }
    }

    /// Installation instructions shown when the program is missing.
    pub fn install_hint(self) -> &'static str {
        match self {
            Tool::Latexml | Tool::Latexmlc => {
                "Please install LaTeXML:\n  \
                 Ubuntu/Debian: sudo apt-get install latexml\n  \
                 macOS: brew install latexml\n  \
                 Or see: https://dlmf.nist.gov/LaTeXML/get.html"
            }
            Tool::Pandoc => {
                "Please install pandoc:\n  \
                 Ubuntu/Debian: sudo apt-get install pandoc\n  \
                 macOS: brew install pandoc"
            }
        }
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.program())
    }
}

/// One invocation of an external tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCommand {
    pub tool: Tool,
    pub args: Vec<OsString>,
    pub timeout: Duration,
}

impl ToolCommand {
    pub fn new(tool: Tool, timeout: Duration) -> Self {
        Self {
            tool,
            args: Vec::new(),
            timeout,
        }
    }

    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Value following `flag`, if present.
    pub fn flag_value(&self, flag: &str) -> Option<&Path> {
        self.args
            .iter()
            .position(|a| a == flag)
            .and_then(|i| self.args.get(i + 1))
            .map(Path::new)
    }
}

/// Captured output of a successful run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Runs external tools.
pub trait ToolRunner: Send + Sync {
    /// Run `command` to completion. Non-zero exit is an error.
    fn run(&self, command: &ToolCommand) -> impl Future<Output = Result<ToolOutput, DriverError>> + Send;
}

/// Spawns real processes with `tokio::process`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

impl ToolRunner for ProcessRunner {
    async fn run(&self, command: &ToolCommand) -> Result<ToolOutput, DriverError> {
        let tool = command.tool;
        let mut cmd = tokio::process::Command::new(tool.program());
        cmd.args(&command.args)
            .stdin(Stdio::null())
            .kill_on_drop(true);

        log::debug!("running {} {:?}", tool, command.args);

        let output = match tokio::time::timeout(command.timeout, cmd.output()).await {
            Err(_) => {
                return Err(DriverError::Timeout {
                    tool,
                    seconds: command.timeout.as_secs(),
                });
            }
            Ok(Err(e)) if e.kind() == io::ErrorKind::NotFound => {
                return Err(DriverError::ToolMissing { tool });
            }
            Ok(Err(source)) => return Err(DriverError::Spawn { tool, source }),
            Ok(Ok(output)) => output,
        };

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
        if !stdout.is_empty() {
            log::debug!("{tool} output:\n{stdout}");
        }

        if !output.status.success() {
            return Err(DriverError::Failed {
                tool,
                code: output.status.code(),
                stderr,
            });
        }
        Ok(ToolOutput { stdout, stderr })
    }
}

// =============================================================================
// DriverError
// =============================================================================

#[derive(Debug, Error)]
pub enum DriverError {
    #[error("input file not found: {}", .0.display())]
    InputNotFound(PathBuf),

    #[error("input file must be a .tex file, got: {}", .0.display())]
    NotTex(PathBuf),

    #[error("{tool} not found. {}", .tool.install_hint())]
    ToolMissing { tool: Tool },

    #[error("{tool} timed out after {seconds} seconds")]
    Timeout { tool: Tool, seconds: u64 },

    #[error("{tool} failed{}{}", fmt_code(.code), fmt_stderr(.stderr))]
    Failed {
        tool: Tool,
        code: Option<i32>,
        stderr: String,
    },

    #[error("cannot run {tool}: {source}")]
    Spawn {
        tool: Tool,
        #[source]
        source: io::Error,
    },

    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Compose(#[from] ComposeError),
}

fn fmt_code(code: &Option<i32>) -> String {
    code.map(|c| format!(" with exit code {c}")).unwrap_or_default()
}

fn fmt_stderr(stderr: &str) -> String {
    let stderr = stderr.trim();
    if stderr.is_empty() {
        String::new()
    } else {
        format!(":\n{stderr}")
    }
}

fn io_error(path: &Path) -> impl FnOnce(io::Error) -> DriverError + '_ {
    move |source| DriverError::Io {
        path: path.to_path_buf(),
        source,
    }
}

// =============================================================================
// Converter
// =============================================================================

/// Per-run conversion options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertOptions {
    pub theme: String,
    pub components: Vec<String>,
    /// Extra stylesheet passed to LaTeXML
    pub css: Option<PathBuf>,
    /// Suppress LaTeXML's default stylesheet
    pub no_default_css: bool,
    pub footer: FooterData,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            theme: "academic".into(),
            components: Vec::new(),
            css: None,
            no_default_css: false,
            footer: FooterData::default(),
        }
    }
}

/// Result of converting to one format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversion {
    pub format: OutputFormat,
    pub path: PathBuf,
    pub warnings: Vec<Warning>,
}

/// Converts one `.tex` file to output formats.
pub struct Converter<R = ProcessRunner> {
    input: PathBuf,
    output_dir: Option<PathBuf>,
    composer: Composer,
    runner: R,
}

impl Converter<ProcessRunner> {
    /// Converter that runs the real tools.
    pub fn new(
        input: impl Into<PathBuf>,
        output_dir: Option<PathBuf>,
        composer: Composer,
    ) -> Result<Self, DriverError> {
        Self::with_runner(input, output_dir, composer, ProcessRunner)
    }
}

impl<R: ToolRunner> Converter<R> {
    /// Converter with a custom tool runner.
    pub fn with_runner(
        input: impl Into<PathBuf>,
        output_dir: Option<PathBuf>,
        composer: Composer,
        runner: R,
    ) -> Result<Self, DriverError> {
        let input = input.into();
        if !input.exists() {
            return Err(DriverError::InputNotFound(input));
        }
        if input.extension().is_none_or(|ext| ext != "tex") {
            return Err(DriverError::NotTex(input));
        }
        Ok(Self {
            input,
            output_dir,
            composer,
            runner,
        })
    }

    pub fn input(&self) -> &Path {
        &self.input
    }

    /// Where `format` is written: `--output` if given, otherwise a
    /// per-format directory next to the input.
    pub fn output_path(&self, format: OutputFormat) -> PathBuf {
        let (dir, file) = format.output_location();
        let dir = match &self.output_dir {
            Some(out) => out.clone(),
            None => self
                .input
                .parent()
                .unwrap_or_else(|| Path::new(""))
                .join(dir),
        };
        dir.join(file)
    }

    /// Convert to `format`.
    pub async fn convert(&self, format: OutputFormat, options: &ConvertOptions) -> Result<Conversion, DriverError> {
        let output = self.output_path(format);
        if let Some(dir) = output.parent().filter(|d| !d.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(dir).await.map_err(io_error(dir))?;
        }

        let mut filtered = filter_for_format(&self.composer.catalog().components, &options.components, format)
            .map_err(ComposeError::from)?;
        let request = CompositionRequest::new(options.theme.clone(), format)
            .with_components(filtered.components.iter().cloned())
            .with_footer(options.footer.clone());

        log::info!("converting {} to {}", self.input.display(), format);

        for notice in &filtered.notices {
            log::warn!("{notice}");
        }
        let mut warnings = std::mem::take(&mut filtered.notices);
        match format.family() {
            FormatFamily::Html => {
                self.run_latexmlc(&output, html_args(format, options)).await?;
                warnings.extend(self.compose_file(&output, &request).await?);
            }
            FormatFamily::Converted => {
                let temp = output.with_extension("tmp.html");
                let result = self
                    .convert_via_pandoc(&temp, &output, &request, filtered.contains("toc"))
                    .await;
                if let Err(e) = tokio::fs::remove_file(&temp).await
                    && e.kind() != io::ErrorKind::NotFound
                {
                    log::warn!("cannot remove {}: {}", temp.display(), e);
                }
                warnings.extend(result?);
            }
            FormatFamily::Data => match format {
                OutputFormat::Xml => {
                    let command = ToolCommand::new(Tool::Latexml, LATEXML_TIMEOUT)
                        .arg(&self.input)
                        .arg("--dest")
                        .arg(&output);
                    self.runner.run(&command).await?;
                }
                _ => {
                    self.run_latexmlc(&output, vec![format!("--format={}", format.name()).into()])
                        .await?;
                }
            },
        }

        log::info!("wrote {}", output.display());
        Ok(Conversion {
            format,
            path: output,
            warnings,
        })
    }

    async fn run_latexmlc(&self, dest: &Path, extra: Vec<OsString>) -> Result<ToolOutput, DriverError> {
        let mut command = ToolCommand::new(Tool::Latexmlc, LATEXML_TIMEOUT)
            .arg(&self.input)
            .arg("--dest")
            .arg(dest)
            .arg(format!("--timeout={LATEXML_INTERNAL_TIMEOUT_SECS}"));
        command.args.extend(extra);
        self.runner.run(&command).await
    }

    async fn convert_via_pandoc(
        &self,
        temp: &Path,
        output: &Path,
        request: &CompositionRequest,
        toc: bool,
    ) -> Result<Vec<Warning>, DriverError> {
        self.run_latexmlc(temp, vec!["--format=html".into()]).await?;
        let warnings = self.compose_file(temp, request).await?;

        let mut command = ToolCommand::new(Tool::Pandoc, PANDOC_TIMEOUT).arg(temp);
        if request.format == OutputFormat::Txt {
            command = command.arg("-t").arg("plain");
        }
        if toc {
            command = command.arg("--toc");
        }
        let command = command.arg("-o").arg(output);
        self.runner.run(&command).await?;
        Ok(warnings)
    }

    /// Compose `path` in place. Malformed HTML is left as LaTeXML wrote it.
    async fn compose_file(&self, path: &Path, request: &CompositionRequest) -> Result<Vec<Warning>, DriverError> {
        let html = tokio::fs::read_to_string(path).await.map_err(io_error(path))?;
        match self.composer.compose(&html, request) {
            Ok(composed) => {
                tokio::fs::write(path, composed.html).await.map_err(io_error(path))?;
                Ok(composed.warnings)
            }
            Err(ComposeError::MalformedInput(reason)) => {
                log::warn!(
                    "{}: {}; keeping uncomposed HTML",
                    path.display(),
                    reason
                );
                Ok(vec![Warning::CompositionSkipped {
                    path: path.to_path_buf(),
                    reason,
                }])
            }
            Err(e) => Err(e.into()),
        }
    }
}

fn html_args(format: OutputFormat, options: &ConvertOptions) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec![format!("--format={}", format.name()).into()];
    if let Some(css) = &options.css {
        args.push("--css".into());
        args.push(css.into());
    }
    if options.no_default_css {
        args.push("--nodefaultcss".into());
    }
    args
}

// =============================================================================
// Tests
// =============================================================================
