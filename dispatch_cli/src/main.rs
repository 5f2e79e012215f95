use clap::{Parser, Subcommand, ValueEnum};
use dispatch_optimizer::json::schema::{generate_request_schema, generate_response_schema};
use mimalloc::MiMalloc;

use crate::solve::{SolveArgs, SolveOptions};

mod config;
mod demo;
mod parsers;
mod solve;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[arg(short, long)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Plans the trips of a JSON solve request
    Solve {
        #[command(flatten)]
        args: SolveArgs,
    },
    /// Plans the built-in twelve order demo
    Demo {
        #[command(flatten)]
        options: SolveOptions,
    },
    /// Prints the JSON schema of the request or the response
    Schema {
        #[arg(value_enum, default_value_t = SchemaKind::Request)]
        kind: SchemaKind,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum SchemaKind {
    Request,
    Response,
}

fn main() -> Result<(), anyhow::Error> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(if cli.debug {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .init();

    config::load_env();

    match cli.command {
        Some(Commands::Solve { args }) => solve::run(args)?,
        Some(Commands::Demo { options }) => solve::solve_request(demo::demo_request(), &options)?,
        Some(Commands::Schema { kind }) => {
            let schema = match kind {
                SchemaKind::Request => generate_request_schema()?,
                SchemaKind::Response => generate_response_schema()?,
            };
            println!("{schema}");
        }
        None => {}
    }

    Ok(())
}
