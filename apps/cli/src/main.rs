use std::io::{self, Write};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use console::style;
use tracelink_core::{
    AsyncSink, DenormalizedCsvRecorder, Entry, EventId, IdGenerator, Message, ProcessIdentity,
    Sink, TraceError, Tracer, TracerConfig, WriterSink, web::decode_header,
};
use tracing_subscriber::EnvFilter;

/// CLI wrapper for the available entry encodings (needed for clap ValueEnum)
#[derive(Clone, Copy, Default, ValueEnum)]
enum Format {
    #[default]
    Json,
    Flat,
    Text,
    Csv,
}

#[derive(Parser)]
#[command(name = "tracelink")]
#[command(about = "Mint event IDs, emit causal event chains, and decode propagation headers")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print fresh IDs, one per line
    Id {
        #[arg(short = 'n', long, default_value_t = 1)]
        count: usize,
    },

    /// Emit a root → sub → leaf chain of message events to stdout
    Emit {
        #[arg(short, long, value_enum, default_value = "json")]
        format: Format,

        /// Event-ID header value of the event that caused this chain
        #[arg(short, long)]
        parent: Option<String>,

        /// Number of leaf events under the sub action
        #[arg(short, long, default_value_t = 1)]
        leaves: usize,
    },

    /// Decode an Event-ID header value (`root=…&id=…`) or a `root/…/id` path
    Decode { value: String },

    /// Prefix a SQL statement with the event's correlation comment
    Annotate {
        /// Event-ID header value of the event issuing the query
        #[arg(short, long)]
        event: String,

        sql: String,
    },
}

fn sink_for(format: Format) -> Box<dyn Sink> {
    let out = io::stdout();
    match format {
        Format::Json => Box::new(WriterSink::json(out)),
        Format::Flat => Box::new(WriterSink::flat_json(out)),
        Format::Text => Box::new(WriterSink::text(out)),
        Format::Csv => Box::new(DenormalizedCsvRecorder::new(out)),
    }
}

fn parse_event(value: &str) -> Result<EventId> {
    let parsed = if value.contains('=') {
        decode_header(Some(value))?
    } else {
        Some(EventId::parse_path(value)?)
    };
    parsed
        .ok_or(TraceError::MalformedEventId)
        .context("empty event ID")
}

async fn emit(
    tracer: &Tracer,
    cfg: &TracerConfig,
    format: Format,
    parent: Option<&str>,
    leaves: usize,
) -> Result<()> {
    let sink = AsyncSink::start(
        sink_for(format),
        cfg.queue_capacity,
        |entry: Option<&Entry>, e| match entry {
            Some(entry) => eprintln!(
                "{} could not write {}: {}",
                style("Error:").red().bold(),
                entry.id(),
                e
            ),
            None => eprintln!("{} could not flush output: {}", style("Error:").red().bold(), e),
        },
    );

    let root = match parent {
        Some(value) => tracer.child(&parse_event(value)?, Message::new("root action")),
        None => tracer.root(Message::new("root action")),
    };
    let sub = tracer.child(root.event_id(), Message::new("sub action"));
    let sub_id = *sub.event_id();
    sink.write(root).await?;
    sink.write(sub).await?;

    for i in 0..leaves {
        let leaf = tracer.child(&sub_id, Message::new(format!("leaf action {i}")));
        sink.write(leaf).await?;
    }

    sink.stop().await;
    Ok(())
}

fn print_ids(tracer: &Tracer, count: usize) -> Result<()> {
    let mut out = io::stdout().lock();
    for _ in 0..count {
        writeln!(out, "{}", tracer.ids().next_id())?;
    }
    Ok(())
}

async fn run(cli: Cli) -> Result<()> {
    let cfg = TracerConfig::from_env()?;

    match cli.command {
        Command::Decode { value } => {
            let id = parse_event(&value)?;
            println!("{}", serde_json::to_string_pretty(&id)?);
        }
        Command::Annotate { event, sql } => {
            println!("{}", parse_event(&event)?.annotate(&sql));
        }
        Command::Id { count } => {
            let tracer = Tracer::new(IdGenerator::new()?, ProcessIdentity::resolve(&cfg));
            print_ids(&tracer, count)?;
        }
        Command::Emit {
            format,
            parent,
            leaves,
        } => {
            let tracer = Tracer::new(IdGenerator::new()?, ProcessIdentity::resolve(&cfg));
            tracing::debug!(
                host = %tracer.process().host,
                pid = tracer.process().pid,
                "tracer ready"
            );
            emit(&tracer, &cfg, format, parent.as_deref(), leaves).await?;
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    if let Err(e) = run(Cli::parse()).await {
        eprintln!("{} {:#}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }
}
