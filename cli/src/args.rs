//! CLI argument definitions

use clap::Parser;
use std::path::PathBuf;

/// CLI arguments for ideastorm
#[derive(Parser, Debug)]
#[command(name = "ideastorm")]
#[command(author, version, about = "Multi-provider research idea brainstorming")]
#[command(long_about = r#"
Ideastorm fans a brainstorming prompt out to every AI provider whose
credential is present in the environment, collects each provider's ideas,
and reconciles them into one deduplicated, ranked summary.

Providers are enabled by environment variables:
  ANTHROPIC_API_KEY, OPENAI_API_KEY, GEMINI_API_KEY,
  DEEPSEEK_API_KEY, DASHSCOPE_API_KEY
with optional {PREFIX}_MODEL and {PREFIX}_BASE_URL overrides.

Configuration files are loaded from (in priority order):
1. --config <path>     Explicit config file
2. ./ideastorm.toml    Project-level config
3. ~/.config/ideastorm/config.toml   Global config

Example:
  ideastorm "efficient long-context attention"
  ideastorm -n 8 --context survey.json --output-dir ideas/ "LLM routing"
"#)]
pub struct Cli {
    /// Research topic to brainstorm on
    pub topic: String,

    /// Number of ideas to request from each provider
    #[arg(short = 'n', long = "ideas", value_name = "N")]
    pub ideas: Option<usize>,

    /// JSON file with research context (research_gaps, weaknesses,
    /// future_directions)
    #[arg(short, long, value_name = "PATH")]
    pub context: Option<PathBuf>,

    /// Maximum simultaneous provider calls
    #[arg(long, value_name = "N")]
    pub concurrency: Option<usize>,

    /// Directory to write per-provider reports and the summary into
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Append per-call usage records to this JSONL file
    #[arg(long, value_name = "PATH")]
    pub usage_log: Option<PathBuf>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only print the reconciled summary
    #[arg(short, long)]
    pub quiet: bool,
}
