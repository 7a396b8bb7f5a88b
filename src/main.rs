use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use prep::browse::{self, Route, View};
use prep::catalog::{Catalog, SupabaseCatalog};
use prep::{Config, text};

#[derive(Parser)]
#[command(name = "prep")]
#[command(about = "Browse the interview-preparation knowledge base")]
struct Cli {
    /// Configuration file
    #[arg(long, global = true, default_value = "prep.toml")]
    config: PathBuf,

    /// Supabase project URL (overrides the config file)
    #[arg(long, global = true, env = "PREP_SUPABASE_URL")]
    url: Option<String>,

    /// Supabase anon key (overrides the config file)
    #[arg(long, global = true, env = "PREP_SUPABASE_ANON_KEY", hide_env_values = true)]
    anon_key: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List all categories
    Categories,

    /// Show a page: `/`, `/<category>` or `/<category>/<topic>`
    Show {
        #[arg(default_value = "/")]
        route: Route,
    },

    /// Format an answer file (stdin when omitted or `-`)
    Format {
        input: Option<PathBuf>,

        /// Print display items as JSON
        #[arg(long)]
        json: bool,
    },

    /// Export a category, or one of its topics, as a PDF study sheet
    Export {
        /// `/<category>` or `/<category>/<topic>`
        route: Route,

        /// Output PDF file (defaults to `<slug>.pdf` for the route's last slug)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print the Typst markup instead of writing a PDF
        #[arg(long)]
        typst: bool,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = Config::load(&cli.config);
    if let Some(url) = cli.url {
        config.backend.url = url;
    }
    if let Some(key) = cli.anon_key {
        config.backend.anon_key = key;
    }

    match cli.command {
        Command::Format { input, json } => format_file(input.as_deref(), json),
        Command::Categories => {
            let catalog = SupabaseCatalog::new(&config.backend)?;
            show(&catalog, Route::Home).await
        }
        Command::Show { route } => {
            let catalog = SupabaseCatalog::new(&config.backend)?;
            show(&catalog, route).await
        }
        Command::Export {
            route,
            output,
            typst,
        } => {
            let Route::Category { slug, topic } = route else {
                bail!("export needs a category, e.g. `/api-testing`");
            };
            let catalog = SupabaseCatalog::new(&config.backend)?;
            let sheet = browse::load_study_sheet(&catalog, &slug, topic.as_deref()).await?;

            if typst {
                print!("{}", prep::sheet_to_typst(&sheet, &config.export));
                return Ok(());
            }

            let pdf_bytes = prep::sheet_to_pdf(&sheet, &config.export)?;
            let output = output.unwrap_or_else(|| default_pdf_path(topic.as_deref().unwrap_or(&slug)));
            fs::write(&output, pdf_bytes).with_context(|| format!("writing {}", output.display()))?;
            println!("Created {}", output.display());
            Ok(())
        }
    }
}

async fn show<C: Catalog>(catalog: &C, route: Route) -> Result<()> {
    let view = browse::load_view(catalog, route).await;
    if let View::Failed(message) = &view {
        bail!("{message}");
    }
    print!("{}", text::view_to_text(&view));
    Ok(())
}

/// `<slug>.pdf` in the working directory. Dots inside a slug are kept.
fn default_pdf_path(slug: &str) -> PathBuf {
    PathBuf::from(format!("{slug}.pdf"))
}

fn format_file(input: Option<&Path>, json: bool) -> Result<()> {
    let answer = match input {
        Some(path) if path != Path::new("-") => {
            fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?
        }
        _ => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer).context("reading stdin")?;
            buffer
        }
    };

    let items = prep::format_answer(Some(&answer));
    if json {
        println!("{}", serde_json::to_string_pretty(&items)?);
    } else {
        print!("{}", text::items_to_text(&items));
    }
    Ok(())
}
