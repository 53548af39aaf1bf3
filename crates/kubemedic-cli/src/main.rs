//! kubemedic - remediation lookup for Kubernetes diagnostics
//!
//! ## Commands
//!
//! - `test`: resolve a hand-written failure text against the knowledge base
//! - `render`: resolve and render a results file produced by an analyzer run
//! - `kb check`: compile the knowledge-base index and list its entries

use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use clap::builder::NonEmptyStringValueParser;
use clap::{Args, Parser, Subcommand};
use tracing::{debug, info, Level};

use kubemedic_core::config::{
    DEFAULT_ERROR_LOG, DEFAULT_RESOLVE_DIR, ERROR_LOG_ENV, RESOLVE_DIR_ENV,
};
use kubemedic_core::{
    Analysis, AnalysisReport, AnalysisScope, Analyzer, DiagnosticResult, KnowledgeBase,
    MedicConfig, RenderOptions, RendererRegistry, Resolver,
};

#[derive(Parser)]
#[command(name = "kubemedic")]
#[command(author = "Stevedores Org")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Attach remediation guidance to Kubernetes diagnostics", long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json_logs: bool,

    /// Knowledge-base directory containing index.json
    #[arg(long, global = true, env = RESOLVE_DIR_ENV, default_value = DEFAULT_RESOLVE_DIR)]
    resolve_dir: PathBuf,

    /// File receiving one line per rendered failure
    #[arg(long, global = true, env = ERROR_LOG_ENV, default_value = DEFAULT_ERROR_LOG)]
    error_log: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a single failure text, for authoring knowledge-base entries
    Test {
        /// Failure text to resolve
        #[arg(short, long, value_parser = NonEmptyStringValueParser::new())]
        text: String,

        /// Namespace substituted for {{namespace}}
        #[arg(short, long, default_value = "namespace1")]
        namespace: String,

        /// Resource name substituted for {{resource}}
        #[arg(short, long, default_value = "pod1")]
        resource: String,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Resolve and render a JSON array of results
    Render {
        /// Path to the results file
        results: PathBuf,

        /// Explanation provider recorded on the report
        #[arg(long, default_value = "")]
        provider: String,

        /// Only keep results from this namespace
        #[arg(short, long, default_value = "")]
        namespace: String,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Knowledge-base maintenance
    Kb {
        #[command(subcommand)]
        action: KbAction,
    },
}

#[derive(Subcommand)]
enum KbAction {
    /// Load and compile the index, listing every entry
    Check,
}

#[derive(Args, Clone)]
struct OutputArgs {
    /// Output format (json or text)
    #[arg(short, long, default_value = "text")]
    output: String,

    /// One line per failure (text only)
    #[arg(long)]
    compact: bool,

    /// Disable ANSI colours
    #[arg(long)]
    no_color: bool,
}

impl OutputArgs {
    fn options(&self) -> RenderOptions {
        RenderOptions {
            compact: self.compact,
            color: !self.no_color && std::io::stdout().is_terminal(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    kubemedic_core::init_tracing(cli.json_logs, level);

    let config = MedicConfig::new(cli.resolve_dir, cli.error_log);
    debug!(
        resolve_dir = %config.resolve_dir.display(),
        error_log = %config.error_log_path.display(),
        "configuration"
    );

    let output = match cli.command {
        Commands::Test {
            text,
            namespace,
            resource,
            output,
        } => cmd_test(&config, &text, &namespace, &resource, &output)?,
        Commands::Render {
            results,
            provider,
            namespace,
            output,
        } => cmd_render(&config, &results, &provider, &namespace, &output).await?,
        Commands::Kb { action } => match action {
            KbAction::Check => cmd_kb_check(&config)?,
        },
    };

    kubemedic_core::METRICS.flush();
    print!("{}", output);
    Ok(())
}

fn load_kb(config: &MedicConfig) -> Result<KnowledgeBase> {
    KnowledgeBase::load(&config.resolve_dir).with_context(|| {
        format!(
            "Failed to load knowledge base from {}",
            config.resolve_dir.display()
        )
    })
}

fn render_report(
    config: &MedicConfig,
    report: &AnalysisReport,
    output: &OutputArgs,
) -> Result<String> {
    let registry = RendererRegistry::with_defaults(&config.error_log_path);
    let bytes = registry.render(report, &output.output, &output.options())?;
    String::from_utf8(bytes).context("Rendered output is not valid UTF-8")
}

/// Resolve a synthetic single-failure result.
fn cmd_test(
    config: &MedicConfig,
    text: &str,
    namespace: &str,
    resource: &str,
    output: &OutputArgs,
) -> Result<String> {
    let kb = load_kb(config)?;
    let result = DiagnosticResult::synthetic(namespace, resource, text);

    let mut report = AnalysisReport::new("");
    report.results.push(result);
    report.resolve_all(&Resolver::new(&kb));

    if let Some(resolved) = report.results.first() {
        info!(
            text = %text,
            matched = !resolved.resolution_ref().is_empty(),
            template = %resolved.resolution_ref(),
            "test resolution"
        );
    }

    render_report(config, &report, output)
}

/// Results produced by an earlier analyzer run, read from a JSON file.
struct ResultsFileAnalyzer {
    path: PathBuf,
}

#[async_trait]
impl Analyzer for ResultsFileAnalyzer {
    fn name(&self) -> &str {
        "file"
    }

    async fn analyze(&self, scope: &AnalysisScope) -> Result<Vec<DiagnosticResult>> {
        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("Failed to read {}", self.path.display()))?;
        let results: Vec<DiagnosticResult> = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse results in {}", self.path.display()))?;
        Ok(results
            .into_iter()
            .filter(|r| scope.includes_namespace(r.namespace()))
            .collect())
    }
}

async fn cmd_render(
    config: &MedicConfig,
    results: &Path,
    provider: &str,
    namespace: &str,
    output: &OutputArgs,
) -> Result<String> {
    let kb = load_kb(config)?;
    let analysis = Analysis::new(provider).with_analyzer(ResultsFileAnalyzer {
        path: results.to_path_buf(),
    });

    let mut report = analysis.run(&AnalysisScope::namespace(namespace)).await?;
    report.resolve_all(&Resolver::new(&kb));
    render_report(config, &report, output)
}

fn cmd_kb_check(config: &MedicConfig) -> Result<String> {
    let kb = load_kb(config)?;
    let mut out = String::new();
    for (i, entry) in kb.entries().iter().enumerate() {
        out.push_str(&format!(
            "{}  {}  ->  {}\n",
            i,
            entry.pattern(),
            entry.template_path()
        ));
    }
    Ok(out)
}
