//! OpDesign CLI - op-amp circuit selection and sizing from the command line.

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use opdesign::matcher::normalize::fold_case;
use opdesign::template::template_file_name;
use opdesign::{
    Archetype, Catalog, DesignConfig, DesignCore, DesignError, DesignResult, DesignTargets,
    Language, Match, ParsePolicy, SelectionStrategy, TargetField,
};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process;

/// Config file picked up from the working directory when `--config` is not given.
const DEFAULT_CONFIG_FILE: &str = "opdesign.json";

#[derive(Parser)]
#[command(name = "opdesign")]
#[command(about = "Op-amp circuit designer: match a description, size the components", long_about = None)]
#[command(version)]
struct Cli {
    /// JSON configuration file
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// JSON catalog replacing the embedded one
    #[arg(long, global = true, value_name = "FILE")]
    catalog: Option<PathBuf>,

    /// Catalog and query language
    #[arg(long, global = true, value_enum)]
    language: Option<LanguageArg>,

    /// Treat malformed numbers as 0 instead of failing
    #[arg(long, global = true)]
    lenient: bool,

    /// More log output (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Find the circuit that best matches a description
    Match {
        #[arg(value_name = "QUERY")]
        query: String,

        /// Exact or substring matching only, no linguistic processing
        #[arg(long)]
        strict: bool,

        /// Output format
        #[arg(short, long, value_enum, default_value = "human")]
        format: OutputFormat,
    },

    /// Size a named circuit; omitted targets come from configuration
    Compute {
        /// Circuit name, catalog id or family (e.g. "Integrator", 9, "low-pass")
        #[arg(value_name = "CIRCUIT")]
        circuit: String,

        #[command(flatten)]
        targets: TargetArgs,

        /// Output format
        #[arg(short, long, value_enum, default_value = "human")]
        format: OutputFormat,
    },

    /// Match, ask for the design targets and write the filled-in template
    Design {
        /// Circuit description; asked for on stdin when omitted
        #[arg(value_name = "QUERY")]
        query: Option<String>,

        /// Exact or substring matching only, no linguistic processing
        #[arg(long)]
        strict: bool,

        #[command(flatten)]
        targets: TargetArgs,

        /// Template directory (overrides configuration)
        #[arg(long, value_name = "DIR")]
        templates: Option<PathBuf>,

        /// Output directory (overrides configuration)
        #[arg(long, value_name = "DIR")]
        out: Option<PathBuf>,

        /// Only print the values, do not render a document
        #[arg(long, conflicts_with = "compile")]
        no_document: bool,

        /// Run pdflatex on the written document
        #[arg(long)]
        compile: bool,

        /// Output format
        #[arg(short, long, value_enum, default_value = "human")]
        format: OutputFormat,
    },

    /// List the circuits in the catalog
    List {
        /// Output format
        #[arg(short, long, value_enum, default_value = "human")]
        format: OutputFormat,
    },
}

/// Design targets in engineering notation ("10", "-2", "1k", "1ms").
#[derive(clap::Args)]
struct TargetArgs {
    /// Gain (first input gain for a summing amplifier)
    #[arg(long, allow_hyphen_values = true)]
    gain: Option<String>,

    /// Second input gain for a summing amplifier
    #[arg(long, allow_hyphen_values = true)]
    gain2: Option<String>,

    /// Filter cutoff frequency in Hz
    #[arg(long)]
    cutoff: Option<String>,

    /// Schmitt trigger upper threshold in volts
    #[arg(long, allow_hyphen_values = true)]
    vut: Option<String>,

    /// RC time constant in seconds
    #[arg(long)]
    tau: Option<String>,
}

impl TargetArgs {
    fn text(&self, field: TargetField) -> Option<&str> {
        match field {
            TargetField::Gain => self.gain.as_deref(),
            TargetField::Gain2 => self.gain2.as_deref(),
            TargetField::CutoffHz => self.cutoff.as_deref(),
            TargetField::UpperThresholdV => self.vut.as_deref(),
            TargetField::TimeConstantS => self.tau.as_deref(),
        }
    }

    /// Parse every given field; fields the user did not pass stay empty.
    fn parse(&self, core: &DesignCore) -> Result<DesignTargets, DesignError> {
        let parser = core.engine().parser();
        let mut targets = DesignTargets::new();
        for field in ALL_FIELDS {
            if let Some(text) = self.text(field) {
                targets.set(field, field.parse(parser, text)?);
            }
        }
        Ok(targets)
    }
}

const ALL_FIELDS: [TargetField; 5] = [
    TargetField::Gain,
    TargetField::Gain2,
    TargetField::CutoffHz,
    TargetField::UpperThresholdV,
    TargetField::TimeConstantS,
];

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}

#[derive(Clone, Copy, ValueEnum)]
enum LanguageArg {
    En,
    Tr,
}

impl From<LanguageArg> for Language {
    fn from(arg: LanguageArg) -> Self {
        match arg {
            LanguageArg::En => Language::En,
            LanguageArg::Tr => Language::Tr,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let exit_code = match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    };

    process::exit(exit_code);
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        _ => tracing::Level::DEBUG,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> Result<i32, DesignError> {
    let mut config = match &cli.config {
        Some(path) => DesignConfig::load(path)?,
        None => DesignConfig::load_or_default(Path::new(DEFAULT_CONFIG_FILE))?,
    };
    if let Some(language) = cli.language {
        config.language = language.into();
    }
    if cli.lenient {
        config.parse_policy = ParsePolicy::Lenient;
    }

    match cli.command {
        Commands::Match {
            query,
            strict,
            format,
        } => {
            let core = build_core(cli.catalog.as_deref(), config)?;
            handle_match(&core, &query, strategy(strict), format)
        }
        Commands::Compute {
            circuit,
            targets,
            format,
        } => {
            let core = build_core(cli.catalog.as_deref(), config)?;
            handle_compute(&core, &circuit, &targets, format)
        }
        Commands::Design {
            query,
            strict,
            targets,
            templates,
            out,
            no_document,
            compile,
            format,
        } => {
            if let Some(dir) = templates {
                config.templates_dir = dir;
            }
            if let Some(dir) = out {
                config.output_dir = dir;
            }
            let core = build_core(cli.catalog.as_deref(), config)?;
            let options = DesignOptions {
                strategy: strategy(strict),
                write_document: !no_document,
                compile,
                format,
            };
            handle_design(&core, query, &targets, options)
        }
        Commands::List { format } => {
            let core = build_core(cli.catalog.as_deref(), config)?;
            handle_list(core.catalog(), format);
            Ok(0)
        }
    }
}

fn build_core(catalog: Option<&Path>, config: DesignConfig) -> Result<DesignCore, DesignError> {
    let catalog = match catalog {
        Some(path) => Catalog::from_file(path)?,
        None => Catalog::embedded(config.language),
    };
    Ok(DesignCore::new(catalog, config))
}

fn strategy(strict: bool) -> SelectionStrategy {
    if strict {
        SelectionStrategy::Strict
    } else {
        SelectionStrategy::Similarity
    }
}

fn handle_match(
    core: &DesignCore,
    query: &str,
    strategy: SelectionStrategy,
    format: OutputFormat,
) -> Result<i32, DesignError> {
    let found = core.select(query, strategy)?;
    match format {
        OutputFormat::Human => print_match(&found),
        OutputFormat::Json => print_json(&found),
    }
    Ok(0)
}

fn print_match(found: &Match<'_>) {
    let archetype = found.archetype;
    println!("Circuit:     {}", archetype.name);
    if let Some(kind) = archetype.kind {
        println!("Family:      {}", kind);
    }
    println!(
        "Match:       {:?} (score {:.2}{})",
        found.kind,
        found.score,
        if found.is_low_confidence() {
            ", low confidence"
        } else {
            ""
        }
    );
    if !archetype.description.is_empty() {
        println!("Description: {}", archetype.description);
    }
}

/// Resolve a circuit by display name, catalog id or family keyword.
fn find_archetype<'a>(catalog: &'a Catalog, circuit: &str) -> Option<&'a Archetype> {
    let wanted = fold_case(circuit.trim());
    catalog
        .iter()
        .find(|a| fold_case(&a.name) == wanted)
        .or_else(|| circuit.trim().parse::<u32>().ok().and_then(|id| catalog.get(id)))
        .or_else(|| opdesign::ArchetypeKind::from_name(circuit).and_then(|k| catalog.by_kind(k)))
}

fn handle_compute(
    core: &DesignCore,
    circuit: &str,
    targets: &TargetArgs,
    format: OutputFormat,
) -> Result<i32, DesignError> {
    let archetype = find_archetype(core.catalog(), circuit)
        .ok_or_else(|| DesignError::NoMatch(circuit.to_string()))?;
    let (targets, values) = core.compute(archetype, targets.parse(core)?)?;

    match format {
        OutputFormat::Human => {
            println!("{}", archetype.name);
            print_rows(&values.display_rows());
        }
        OutputFormat::Json => print_json(&serde_json::json!({
            "circuit": archetype.name,
            "kind": archetype.kind,
            "targets": targets,
            "values": values,
        })),
    }
    Ok(0)
}

struct DesignOptions {
    strategy: SelectionStrategy,
    write_document: bool,
    compile: bool,
    format: OutputFormat,
}

fn handle_design(
    core: &DesignCore,
    query: Option<String>,
    targets: &TargetArgs,
    options: DesignOptions,
) -> Result<i32, DesignError> {
    let stdin = io::stdin();
    let mut input = stdin.lock();

    let query = match query {
        Some(query) => query,
        None => prompt(&mut input, "Describe the circuit you need")?.unwrap_or_default(),
    };

    let selected = core.select(&query, options.strategy)?;
    let archetype = selected.archetype;
    let kind = archetype
        .kind
        .ok_or_else(|| opdesign::formula::FormulaError::UnsupportedArchetype(archetype.name.clone()))?;
    eprintln!("Selected: {}", archetype.name);
    if selected.is_low_confidence() {
        eprintln!(
            "Warning: low confidence match (score {:.2}), check the circuit before using the values",
            selected.score
        );
    }

    let parser = core.engine().parser();
    let mut filled = DesignTargets::new();
    for field in DesignTargets::required(kind) {
        let text = match targets.text(*field) {
            Some(text) => text.to_string(),
            None => {
                let default = field.default_text(kind, core.config());
                let label = format!("{} [{}]", field.prompt(kind), default);
                prompt(&mut input, &label)?
                    .filter(|answer| !answer.is_empty())
                    .unwrap_or(default)
            }
        };
        filled.set(*field, field.parse(parser, &text)?);
    }

    let result = core.design_match(&selected, filled)?;

    let document = if options.write_document {
        Some(core.write_document(&result)?)
    } else {
        None
    };

    match options.format {
        OutputFormat::Human => {
            println!("{}", result.archetype.name);
            print_rows(&result.values.display_rows());
            if let Some(path) = &document {
                println!("\nDocument: {}", path.display());
            }
        }
        OutputFormat::Json => print_design_json(&result, document.as_deref()),
    }

    if options.compile {
        if let Some(path) = &document {
            return Ok(compile_document(path, &core.config().output_dir));
        }
    }
    Ok(0)
}

/// Ask on stderr, read one line from `input`. `None` at end of input.
fn prompt(input: &mut impl BufRead, label: &str) -> Result<Option<String>, DesignError> {
    eprint!("{}: ", label);
    io::stderr().flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

fn compile_document(path: &Path, output_dir: &Path) -> i32 {
    let status = process::Command::new("pdflatex")
        .arg("-interaction=nonstopmode")
        .arg("-output-directory")
        .arg(output_dir)
        .arg(path)
        .stdout(process::Stdio::null())
        .status();
    match status {
        Ok(status) if status.success() => {
            println!("PDF written to {}", path.with_extension("pdf").display());
            0
        }
        Ok(status) => {
            eprintln!("Error: pdflatex failed ({})", status);
            1
        }
        Err(e) => {
            eprintln!("Error: could not run pdflatex: {}", e);
            1
        }
    }
}

fn handle_list(catalog: &Catalog, format: OutputFormat) {
    match format {
        OutputFormat::Human => {
            println!("Available circuits:\n");
            for archetype in catalog {
                println!("  {:>2}  {}", archetype.id, archetype.name);
                if let Some(kind) = archetype.kind {
                    println!("      family:   {}", kind);
                }
                println!("      template: {}", template_file_name(&archetype.name));
                println!();
            }
        }
        OutputFormat::Json => print_json(&catalog.archetypes()),
    }
}

fn print_rows(rows: &[(String, String)]) {
    let width = rows.iter().map(|(k, _)| k.len()).max().unwrap_or(0);
    for (key, value) in rows {
        println!("  {:<width$}  {}", key, value, width = width);
    }
}

fn print_design_json(result: &DesignResult, document: Option<&Path>) {
    print_json(&serde_json::json!({
        "result": result,
        "document": document.map(|p| p.display().to_string()),
    }));
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Error: failed to serialize output: {}", e),
    }
}
