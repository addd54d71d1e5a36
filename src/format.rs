//! Output formats and format families.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// How an output format is produced, which decides what composition means
/// for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormatFamily {
    /// HTML rendered in a live browser: themes and all components apply
    Html,
    /// Produced from HTML by the universal converter: only components with
    /// a static meaning survive
    Converted,
    /// Structured data written directly by LaTeXML: no composition
    Data,
}

impl FormatFamily {
    /// Every family, in declaration order.
    pub const ALL: [FormatFamily; 3] = [FormatFamily::Html, FormatFamily::Converted, FormatFamily::Data];

    /// Families a component can be rendered into.
    pub const RENDERED: [FormatFamily; 2] = [FormatFamily::Html, FormatFamily::Converted];
}

impl fmt::Display for FormatFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FormatFamily::Html => "html",
            FormatFamily::Converted => "converted",
            FormatFamily::Data => "data",
        })
    }
}

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputFormat {
    Html,
    Html5,
    Xhtml,
    Xml,
    Markdown,
    Txt,
    Epub,
    Json,
}

/// Unrecognized format name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported format: {name}\nsupported formats: {}", OutputFormat::names().join(", "))]
pub struct UnknownFormat {
    /// The name that failed to parse
    pub name: String,
}

impl OutputFormat {
    /// Every format, in listing order.
    pub const ALL: [OutputFormat; 8] = [
        OutputFormat::Html,
        OutputFormat::Html5,
        OutputFormat::Xhtml,
        OutputFormat::Xml,
        OutputFormat::Markdown,
        OutputFormat::Txt,
        OutputFormat::Epub,
        OutputFormat::Json,
    ];

    /// Canonical lowercase name.
    pub fn name(self) -> &'static str {
        match self {
            OutputFormat::Html => "html",
            OutputFormat::Html5 => "html5",
            OutputFormat::Xhtml => "xhtml",
            OutputFormat::Xml => "xml",
            OutputFormat::Markdown => "markdown",
            OutputFormat::Txt => "txt",
            OutputFormat::Epub => "epub",
            OutputFormat::Json => "json",
        }
    }

    /// Names of all formats.
    pub fn names() -> Vec<&'static str> {
        Self::ALL.iter().map(|f| f.name()).collect()
    }

    /// One-line description for listings.
    pub fn description(self) -> &'static str {
        match self {
            OutputFormat::Html => "HTML format (default LaTeXML output)",
            OutputFormat::Html5 => "HTML5 format with modern features",
            OutputFormat::Xhtml => "XHTML format",
            OutputFormat::Xml => "LaTeXML XML intermediate format",
            OutputFormat::Markdown => "Markdown format (via pandoc)",
            OutputFormat::Txt => "Plain text format (via pandoc)",
            OutputFormat::Epub => "EPUB e-book format (via pandoc)",
            OutputFormat::Json => "JSON representation",
        }
    }

    /// The family this format belongs to.
    pub fn family(self) -> FormatFamily {
        match self {
            OutputFormat::Html | OutputFormat::Html5 | OutputFormat::Xhtml => FormatFamily::Html,
            OutputFormat::Markdown | OutputFormat::Txt | OutputFormat::Epub => {
                FormatFamily::Converted
            }
            OutputFormat::Xml | OutputFormat::Json => FormatFamily::Data,
        }
    }

    /// Whether the output is serialized as XML (self-closing void elements).
    pub fn is_xml_syntax(self) -> bool {
        matches!(self, OutputFormat::Xhtml)
    }

    /// Default output subdirectory and file name.
    pub fn output_location(self) -> (&'static str, &'static str) {
        match self {
            OutputFormat::Html | OutputFormat::Html5 => ("html", "index.html"),
            OutputFormat::Xhtml => ("html", "index.xhtml"),
            OutputFormat::Xml => ("xml", "document.xml"),
            OutputFormat::Markdown => ("markdown", "index.md"),
            OutputFormat::Txt => ("txt", "document.txt"),
            OutputFormat::Epub => ("epub", "document.epub"),
            OutputFormat::Json => ("json", "document.json"),
        }
    }

    /// Parse a comma-separated list, skipping empty entries.
    pub fn parse_list(list: &str) -> Result<Vec<OutputFormat>, UnknownFormat> {
        list.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::parse::<OutputFormat>)
            .collect()
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for OutputFormat {
    type Err = UnknownFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|f| f.name() == lower)
            .ok_or(UnknownFormat { name: s.to_string() })
    }
}
