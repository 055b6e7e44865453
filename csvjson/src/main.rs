//! csvjson CLI - Convert CSV files to JSON
//!
//! ```bash
//! csvjson                              # data/raw/input.csv -> data/output/result.json
//! csvjson input.csv out/result.json    # explicit paths
//! csvjson input.csv out.jsonl --lines  # JSON Lines output
//! csvjson profile input.csv            # Row/column statistics as JSON
//! csvjson validate data/raw            # Check every CSV file in a directory
//! csvjson check input.csv --key id     # Data quality checks (exit 1 on failure)
//! ```
//!
//! Paths may also come from `CSVJSON_INPUT` / `CSVJSON_OUTPUT` (a `.env` file
//! is loaded first).

use clap::{Args, Parser, Subcommand};
use csvjson::{
    check, convert_with, profile, read_input, validate_dir, ConvertOptions, OutputFormat,
    PipelineError, QualityRules, DEFAULT_DATA_DIR, DEFAULT_INPUT, DEFAULT_OUTPUT,
    LOG_BROADCASTER,
};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "csvjson")]
#[command(about = "Convert a CSV file to a JSON array of objects", long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    convert: ConvertArgs,
}

#[derive(Args)]
struct ConvertArgs {
    /// Input CSV file
    #[arg(env = "CSVJSON_INPUT", default_value = DEFAULT_INPUT)]
    input: PathBuf,

    /// Output JSON file (parent directories are created)
    #[arg(env = "CSVJSON_OUTPUT", default_value = DEFAULT_OUTPUT)]
    output: PathBuf,

    /// Write one JSON object per line instead of an array
    #[arg(short, long)]
    lines: bool,

    /// Write the array on a single line
    #[arg(long, conflicts_with = "lines")]
    compact: bool,

    /// Only report errors
    #[arg(short, long)]
    quiet: bool,
}

impl ConvertArgs {
    fn options(&self) -> ConvertOptions {
        ConvertOptions {
            input: self.input.clone(),
            output: self.output.clone(),
            format: if self.lines {
                OutputFormat::JsonLines
            } else {
                OutputFormat::Json
            },
            pretty: !self.compact,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Print row, column and type statistics of a CSV file
    Profile {
        /// Input CSV file
        #[arg(default_value = DEFAULT_INPUT)]
        input: PathBuf,
    },

    /// Check that every CSV file in a directory parses
    Validate {
        /// Directory holding CSV files
        #[arg(default_value = DEFAULT_DATA_DIR)]
        dir: PathBuf,
    },

    /// Run data quality checks on a CSV file
    Check {
        /// Input CSV file
        #[arg(default_value = DEFAULT_INPUT)]
        input: PathBuf,

        /// JSON rules file
        #[arg(short, long)]
        rules: Option<PathBuf>,

        /// Expected columns, in order (comma separated)
        #[arg(long, value_delimiter = ',')]
        columns: Vec<String>,

        /// Column that must be filled and unique
        #[arg(long)]
        key: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    // Load .env file (if present)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Profile { input }) => cmd_profile(&input).await,
        Some(Commands::Validate { dir }) => cmd_validate(&dir).await,
        Some(Commands::Check {
            input,
            rules,
            columns,
            key,
        }) => cmd_check(&input, rules.as_deref(), columns, key).await,
        None => cmd_convert(cli.convert).await,
    };

    if let Err(e) = result {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

async fn cmd_convert(args: ConvertArgs) -> Result<(), Box<dyn std::error::Error>> {
    LOG_BROADCASTER.set_quiet(args.quiet);

    let options = args.options();

    if !args.quiet {
        eprintln!("📊 Converting {} to JSON...", options.input.display());
    }
    // Row count and output path are reported by the pipeline logs
    convert_with(&options).await?;
    Ok(())
}

async fn cmd_profile(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let parsed = read_input(input).await?;

    let stats = profile(&parsed.document);
    eprintln!("📊 Data Profile: {}", input.display());
    eprintln!("   Rows: {}", stats.rows);
    eprintln!("   Columns: {}", stats.columns);
    eprintln!("   Duplicates: {}", stats.duplicates);

    println!("{}", serde_json::to_string_pretty(&stats)?);
    Ok(())
}

async fn cmd_validate(dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let summary = validate_dir(dir).await?;

    let invalid = summary.invalid_count();
    eprintln!("✅ Passed: {}", summary.files.len() - invalid);
    eprintln!("❌ Failed: {}", invalid);

    if invalid > 0 {
        return Err(format!("{} invalid CSV file(s) in {}", invalid, dir.display()).into());
    }
    Ok(())
}

async fn cmd_check(
    input: &Path,
    rules_file: Option<&Path>,
    columns: Vec<String>,
    key: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut rules = match rules_file {
        Some(path) => {
            let json = tokio::fs::read_to_string(path)
                .await
                .map_err(|source| PipelineError::SourceNotFound {
                    path: path.to_path_buf(),
                    source,
                })?;
            QualityRules::from_json(&json)?
        }
        None => QualityRules::default(),
    };
    // Flags override the rules file
    if !columns.is_empty() {
        rules.required_columns = columns;
    }
    if key.is_some() {
        rules.key_column = key;
    }

    let parsed = read_input(input).await?;
    let report = check(&parsed.document, &rules);

    eprintln!("✅ Passed: {}", report.passed.len());
    eprintln!("❌ Failed: {}", report.failed.len());
    eprintln!("⚠️  Warnings: {}", report.warnings.len());

    if !report.is_ok() {
        return Err(format!("{} quality check(s) failed", report.failed.len()).into());
    }
    Ok(())
}
