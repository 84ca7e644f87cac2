use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use renova_contracts::compiler::{compile, compile_with_trace};
use renova_contracts::events::EventWriter;
use renova_contracts::render::{
    ArchitectOutput, ModificationType, RenderMode, RenderOutcome, RenderRequest,
};
use renova_engine::{build_service, EngineConfig, LeadRequest, ProviderKind};

#[derive(Debug, Parser)]
#[command(name = "renova", version, about = "Interior renovation render CLI")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Produce one render and print the outcome JSON.
    Render(RenderArgs),
    /// Compile an architect JSON file into the generation prompt.
    Compile(CompileArgs),
    /// Record a quote request.
    Lead(LeadArgs),
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ProviderArg {
    Gemini,
    Dryrun,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ModeArg {
    Creation,
    Modification,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ScopeArg {
    Renovation,
    Detail,
}

#[derive(Debug, Parser)]
struct ServiceArgs {
    #[arg(long, value_enum, default_value = "gemini")]
    provider: ProviderArg,
    #[arg(long, default_value = "cli")]
    session: String,
    #[arg(long)]
    storage_dir: Option<PathBuf>,
    #[arg(long)]
    public_base_url: Option<String>,
    #[arg(long)]
    events: Option<PathBuf>,
}

#[derive(Debug, Parser)]
struct RenderArgs {
    #[command(flatten)]
    service: ServiceArgs,
    /// JSON request body; individual flags below are ignored when set.
    #[arg(long)]
    request: Option<PathBuf>,
    #[arg(long, default_value = "")]
    prompt: String,
    #[arg(long)]
    room_type: Option<String>,
    #[arg(long)]
    style: Option<String>,
    #[arg(long, default_value = "")]
    structural_elements: String,
    #[arg(long, value_enum, default_value = "creation")]
    mode: ModeArg,
    #[arg(long)]
    source_image: Option<String>,
    #[arg(long, value_enum, default_value = "renovation")]
    modification_type: ScopeArg,
    #[arg(long = "keep")]
    keep_elements: Vec<String>,
}

#[derive(Debug, Parser)]
struct CompileArgs {
    #[arg(long)]
    architect: PathBuf,
    /// Print every compiler stage instead of only the prompt.
    #[arg(long)]
    trace: bool,
}

#[derive(Debug, Parser)]
struct LeadArgs {
    #[command(flatten)]
    service: ServiceArgs,
    #[arg(long)]
    name: String,
    #[arg(long)]
    email: Option<String>,
    #[arg(long)]
    phone: Option<String>,
    #[arg(long)]
    room_type: String,
    #[arg(long)]
    style: String,
    #[arg(long)]
    image_url: Option<String>,
    #[arg(long)]
    notes: Option<String>,
}

fn main() {
    match run() {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("renova error: {err:#}");
            std::process::exit(1);
        }
    }
}

fn run() -> Result<i32> {
    let cli = Cli::parse();
    match cli.command {
        Command::Render(args) => run_render(args),
        Command::Compile(args) => run_compile(args),
        Command::Lead(args) => run_lead(args),
    }
}

fn run_render(args: RenderArgs) -> Result<i32> {
    let request = render_request(&args)?;
    let service = build_service(
        &engine_config(&args.service),
        provider_kind(args.service.provider),
        event_writer(&args.service),
    )?;
    let outcome = service.generate_render(&args.service.session, &request);
    println!("{}", serde_json::to_string_pretty(&outcome)?);
    Ok(match outcome {
        RenderOutcome::Success { .. } => 0,
        RenderOutcome::Error { .. } => 2,
    })
}

fn run_compile(args: CompileArgs) -> Result<i32> {
    let raw = fs::read_to_string(&args.architect)
        .with_context(|| format!("failed to read {}", args.architect.display()))?;
    let output: ArchitectOutput = serde_json::from_str(&raw)
        .with_context(|| format!("invalid architect JSON in {}", args.architect.display()))?;
    if args.trace {
        println!("{}", serde_json::to_string_pretty(&compile_with_trace(&output))?);
    } else {
        println!("{}", compile(&output));
    }
    Ok(0)
}

fn run_lead(args: LeadArgs) -> Result<i32> {
    let service = build_service(
        &engine_config(&args.service),
        ProviderKind::Dryrun,
        event_writer(&args.service),
    )?;
    let id = service.submit_lead(
        &args.service.session,
        LeadRequest {
            name: args.name,
            email: args.email,
            phone: args.phone,
            room_type: args.room_type,
            style: args.style,
            image_url: args.image_url,
            notes: args.notes,
        },
    )?;
    println!("{id}");
    Ok(0)
}

fn render_request(args: &RenderArgs) -> Result<RenderRequest> {
    if let Some(path) = &args.request {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        return serde_json::from_str(&raw)
            .with_context(|| format!("invalid render request JSON in {}", path.display()));
    }
    let (Some(room_type), Some(style)) = (args.room_type.clone(), args.style.clone()) else {
        bail!("--room-type and --style are required without --request");
    };
    Ok(RenderRequest {
        prompt: args.prompt.clone(),
        room_type,
        style,
        structural_elements_text: args.structural_elements.clone(),
        mode: match args.mode {
            ModeArg::Creation => RenderMode::Creation,
            ModeArg::Modification => RenderMode::Modification,
        },
        source_image_ref: args.source_image.clone(),
        modification_type: match args.modification_type {
            ScopeArg::Renovation => ModificationType::Renovation,
            ScopeArg::Detail => ModificationType::Detail,
        },
        keep_elements: args.keep_elements.clone(),
    })
}

fn engine_config(args: &ServiceArgs) -> EngineConfig {
    let mut config = EngineConfig::from_env();
    if let Some(dir) = &args.storage_dir {
        config.storage_dir = dir.clone();
    }
    if let Some(base) = &args.public_base_url {
        config.public_base_url = base.trim().trim_end_matches('/').to_string();
    }
    config
}

fn provider_kind(provider: ProviderArg) -> ProviderKind {
    match provider {
        ProviderArg::Gemini => ProviderKind::Gemini,
        ProviderArg::Dryrun => ProviderKind::Dryrun,
    }
}

fn event_writer(args: &ServiceArgs) -> EventWriter {
    match &args.events {
        Some(path) => EventWriter::new(path, args.session.clone()),
        None => EventWriter::disabled(args.session.clone()),
    }
}
