mod server;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use rmcp::service::ServerInitializeError;
use rmcp::{ServiceExt, transport::stdio};
use serde_json::Value;
use tea_core::descriptor::parse_list;
use tea_core::{
    Attribute, ElementAnalysis, FlavorMapper, Geography, TeaRecord, analyze_batch,
    analyze_compounds, export_json, import_records, summarize,
};
use tea_store::TeaLibrary;

#[derive(Parser)]
#[command(name = "tea", about = "Five-element tea analysis CLI and MCP server")]
struct Cli {
    /// Enable verbose debug output
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze one tea from a JSON file and/or attribute flags
    Analyze {
        /// JSON file: a record, an array of records, or {"teas": [...]}
        file: Option<PathBuf>,

        #[command(flatten)]
        record: RecordArgs,

        /// Print the full analysis as JSON
        #[arg(long)]
        json: bool,

        /// Save the record under this name and keep the analysis
        #[arg(long)]
        save: Option<String>,
    },

    /// Explain how flavor descriptors resolve to elements
    Flavor {
        /// Descriptors, e.g. "grassy, umami and marine"
        list: String,

        #[arg(long)]
        json: bool,
    },

    /// Analyze every record in a file and write a JSON export
    Batch {
        file: PathBuf,

        /// Output path (stdout when omitted)
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Manage the saved tea library
    Teas {
        #[command(subcommand)]
        action: TeasAction,
    },

    /// Show or change engine settings
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Start MCP server on stdio transport
    Serve,
}

#[derive(Subcommand)]
enum TeasAction {
    /// List saved teas
    List,
    /// Show a saved record and its latest analysis
    Show { name: String },
    /// Save the first record in FILE under NAME
    Add { name: String, file: PathBuf },
    /// Delete a saved tea and its history
    Remove { name: String },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the whole configuration
    Show,
    /// Print one value by dotted key path, e.g. elementWeights.flavor
    Get { path: String },
    /// Set a value; VALUE is parsed as JSON, falling back to a string
    Set {
        path: String,
        #[arg(allow_hyphen_values = true)]
        value: String,
    },
    /// Restore the defaults
    Reset,
}

#[derive(Args, Default)]
struct RecordArgs {
    /// Tea name
    #[arg(long = "tea")]
    name: Option<String>,
    /// Tea type, used for flavor when no descriptors are given
    #[arg(long = "type")]
    tea_type: Option<String>,
    /// Flavor descriptors, comma separated
    #[arg(long)]
    flavor: Option<String>,
    /// Caffeine level, 1-10
    #[arg(long)]
    caffeine: Option<f64>,
    /// L-theanine level, 1-10
    #[arg(long)]
    theanine: Option<f64>,
    /// Processing methods, comma separated
    #[arg(long)]
    processing: Option<String>,
    /// Altitude in meters
    #[arg(long)]
    altitude: Option<f64>,
    /// Relative humidity, percent
    #[arg(long)]
    humidity: Option<f64>,
    /// Mean temperature, °C
    #[arg(long)]
    temperature: Option<f64>,
    /// Solar radiation, kWh/m²/day
    #[arg(long)]
    solar: Option<f64>,
    #[arg(long, allow_hyphen_values = true)]
    latitude: Option<f64>,
}

impl RecordArgs {
    fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.tea_type.is_none()
            && self.flavor.is_none()
            && self.caffeine.is_none()
            && self.theanine.is_none()
            && self.processing.is_none()
            && !self.has_geography()
    }

    fn has_geography(&self) -> bool {
        self.altitude.is_some()
            || self.humidity.is_some()
            || self.temperature.is_some()
            || self.solar.is_some()
            || self.latitude.is_some()
    }

    /// Overlay the flags onto `record`; flags win.
    fn apply(&self, record: &mut TeaRecord) {
        if let Some(name) = &self.name {
            record.name = Some(name.clone());
        }
        if let Some(tea_type) = &self.tea_type {
            record.tea_type = Some(tea_type.clone());
        }
        if let Some(flavor) = &self.flavor {
            record.flavor_profile = Some(parse_list(flavor));
        }
        if self.caffeine.is_some() {
            record.caffeine_level = self.caffeine;
        }
        if self.theanine.is_some() {
            record.l_theanine_level = self.theanine;
        }
        if let Some(processing) = &self.processing {
            record.processing_methods = Some(parse_list(processing));
        }
        if self.has_geography() {
            let geo = record.geography.get_or_insert_with(Geography::default);
            geo.altitude = self.altitude.or(geo.altitude);
            geo.humidity = self.humidity.or(geo.humidity);
            geo.temperature = self.temperature.or(geo.temperature);
            geo.solar_radiation = self.solar.or(geo.solar_radiation);
            geo.latitude = self.latitude.or(geo.latitude);
        }
    }
}

fn open_library() -> Result<TeaLibrary> {
    TeaLibrary::open(None).context("failed to open tea library")
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into())
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Serve => cmd_serve().await,
        Commands::Analyze {
            file,
            record,
            json,
            save,
        } => cmd_analyze(file.as_deref(), &record, json, save.as_deref()),
        Commands::Flavor { list, json } => cmd_flavor(&list, json),
        Commands::Batch { file, out } => cmd_batch(&file, out.as_deref()),
        Commands::Teas { action } => cmd_teas(action),
        Commands::Config { action } => cmd_config(action),
    }
}

async fn cmd_serve() -> Result<()> {
    let library = open_library()?;
    tracing::info!("starting MCP server");

    let server = server::TeaServer::new(library);
    let service = match server.serve(stdio()).await {
        Ok(service) => service,
        Err(ServerInitializeError::ConnectionClosed(during)) => {
            tracing::info!(%during, "client disconnected before initialization");
            return Ok(());
        }
        Err(e) => return Err(e).context("failed to start MCP server"),
    };

    tokio::select! {
        result = service.waiting() => {
            result.context("MCP server failed")?;
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("interrupted, shutting down");
        }
    }
    Ok(())
}

fn read_records(path: &Path) -> Result<Vec<TeaRecord>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    import_records(&text).with_context(|| format!("failed to parse {}", path.display()))
}

fn cmd_analyze(file: Option<&Path>, args: &RecordArgs, json: bool, save: Option<&str>) -> Result<()> {
    let mut records = match file {
        Some(path) => read_records(path)?,
        None if args.is_empty() => bail!("nothing to analyze: pass a FILE or attribute flags"),
        None => vec![TeaRecord::default()],
    };
    if records.is_empty() {
        bail!("no tea records found");
    }
    for record in &mut records {
        args.apply(record);
    }
    if save.is_some() && records.len() > 1 {
        bail!("--save takes a single record, found {}", records.len());
    }

    let library = open_library()?;
    let combiner = library.combiner();

    for mut record in records {
        let analysis = match save {
            Some(name) => {
                record.name = Some(name.to_string());
                let (id, analysis) = library
                    .save_and_analyze(&record)
                    .context("failed to save tea")?;
                eprintln!("saved {name} ({id})");
                analysis
            }
            None => combiner.combine(&record),
        };

        if json {
            println!(
                "{}",
                serde_json::to_string_pretty(&analysis).context("failed to serialize analysis")?
            );
        } else {
            print_report(&record, &analysis, library.config().compounds.ideal_l_theanine_caffeine_ratio);
        }
    }
    Ok(())
}

fn print_report(record: &TeaRecord, analysis: &ElementAnalysis, ideal_ratio: f64) {
    println!("{}", record.display_name());
    if !analysis.is_complete() {
        println!("  dominant:   none");
        println!("  status:     {}", analysis.status_message);
        return;
    }

    let ranked = analysis.elements.ranked();
    let line: Vec<String> = ranked.iter().map(|(e, v)| format!("{e} {v:.3}")).collect();
    println!("  elements:   {}", line.join("  "));
    if let Some(dominant) = analysis.dominant_element {
        match analysis.supporting_element {
            Some(supporting) => println!("  dominant:   {dominant} (supporting {supporting})"),
            None => println!("  dominant:   {dominant}"),
        }
    }
    println!(
        "  thermal:    {:+.3} ({})",
        analysis.thermal_analysis.total_thermal, analysis.thermal_analysis.thermal_property
    );
    let weights: Vec<String> = Attribute::ALL
        .iter()
        .map(|&a| format!("{a} {:.2}", analysis.applied_weights[a]))
        .collect();
    println!("  weights:    {}", weights.join("  "));
    if let Some((caffeine, theanine)) = record.compound_levels() {
        let c = analyze_compounds(caffeine, theanine, ideal_ratio);
        println!(
            "  compounds:  {} / {} (ratio {:.2}, ideal {:.2}): {}",
            c.primary_nature, c.secondary_nature, c.ratio, c.ideal_ratio, c.effect
        );
    }
    println!("  status:     {}", analysis.status_message);
}

fn cmd_flavor(list: &str, json: bool) -> Result<()> {
    let terms = parse_list(list);
    if terms.is_empty() {
        bail!("no flavor descriptors in {list:?}");
    }

    let library = open_library()?;
    let mapper = FlavorMapper::new(library.tables().clone());
    let mapping = mapper.map_profile(&terms, library.config());

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&mapping).context("failed to serialize mapping")?
        );
        return Ok(());
    }

    for r in &mapping.terms {
        let flavor = r.flavor.map_or("-".to_string(), |f| f.to_string());
        let matched = r.matched.as_deref().unwrap_or("-");
        println!(
            "{:<20} {:<12} {:<24} {:<8} {}",
            r.term,
            r.source.as_str(),
            matched,
            flavor,
            r.elements
        );
    }
    if let Some(signature) = &mapping.signature {
        println!("signature:  {signature}");
    }
    if let Some(dominant) = mapping.dominant_flavor {
        println!("dominant:   {dominant} (raw accumulation)");
    }
    println!("profile:    {}", mapping.elements);
    Ok(())
}

fn cmd_batch(file: &Path, out: Option<&Path>) -> Result<()> {
    let records = read_records(file)?;
    let library = open_library()?;
    let analyses = analyze_batch(&library.combiner(), &records);
    let json = export_json(&records, &analyses).context("failed to serialize export")?;

    match out {
        Some(path) => {
            std::fs::write(path, &json)
                .with_context(|| format!("failed to write {}", path.display()))?;
            let summary = summarize(&analyses);
            println!(
                "analyzed {} teas ({} complete, {} insufficient) → {}",
                summary.total,
                summary.complete,
                summary.insufficient,
                path.display()
            );
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn cmd_teas(action: TeasAction) -> Result<()> {
    let library = open_library()?;
    let store = library.store();

    match action {
        TeasAction::List => {
            let teas = store.list_teas().context("failed to list teas")?;
            if teas.is_empty() {
                println!("(no saved teas)");
            }
            for tea in teas {
                println!("{:<24} {:>3} analyses  updated {}", tea.name, tea.analyses, tea.updated_at);
            }
        }
        TeasAction::Show { name } => {
            let record = store
                .load_tea(&name)
                .context("failed to load tea")?
                .with_context(|| format!("no tea named {name:?}"))?;
            let latest = store.latest_analysis(&name).context("failed to load analysis")?;
            let out = serde_json::json!({ "record": record, "latestAnalysis": latest });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        TeasAction::Add { name, file } => {
            let mut record = read_records(&file)?
                .into_iter()
                .next()
                .with_context(|| format!("no tea record in {}", file.display()))?;
            record.name = Some(name.clone());
            let (id, analysis) = library.save_and_analyze(&record).context("failed to save tea")?;
            let dominant = analysis.dominant_element.map_or("none", |e| e.as_str());
            println!("saved {name} ({id}), dominant {dominant}");
        }
        TeasAction::Remove { name } => {
            if !store.delete_tea(&name).context("failed to delete tea")? {
                bail!("no tea named {name:?}");
            }
            println!("removed {name}");
        }
    }
    Ok(())
}

/// CLI values are JSON when they parse as JSON, plain strings otherwise.
fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

fn cmd_config(action: ConfigAction) -> Result<()> {
    let mut library = open_library()?;

    match action {
        ConfigAction::Show => {
            println!("{}", serde_json::to_string_pretty(library.config())?);
        }
        ConfigAction::Get { path } => {
            let value = library
                .config()
                .get(&path)
                .with_context(|| format!("unknown config key {path:?}"))?;
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        ConfigAction::Set { path, value } => {
            library
                .set_config(&path, parse_value(&value))
                .with_context(|| format!("failed to set {path}"))?;
            let stored = library.config().get(&path).unwrap_or(Value::Null);
            println!("{path} = {stored}");
        }
        ConfigAction::Reset => {
            library.reset_config().context("failed to reset config")?;
            println!("config reset to defaults");
        }
    }
    Ok(())
}
