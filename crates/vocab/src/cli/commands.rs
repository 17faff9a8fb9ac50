//! # CLI Layer
//!
//! The CLI layer is the **only** place in the codebase that:
//! - Knows about terminal I/O (stdout, stderr)
//! - Installs the log subscriber
//! - Owns the async runtime
//!
//! ## Responsibilities
//!
//! 1. **Argument Parsing**: clap, via `setup.rs`
//! 2. **Context Setup**: load config, build the `StorageContext` and `WordStore`
//! 3. **Dispatch**: one handler per subcommand
//! 4. **Output**: values on stdout, notices and logs on stderr
//!
//! The library is async; the CLI drives it on a current-thread runtime, one
//! awaited operation at a time.

use super::render::{
    render_health, render_list, render_notice, render_stats, render_word, route_label,
};
use super::setup::{Cli, Commands, ListArgs};
use anyhow::{Context, Result};
use chrono::{Local, Utc};
use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;
use vocabapp::config::VocabConfig;
use vocabapp::context::initialize;
use vocabapp::store::schema::create_table_sql;
use vocabapp::{NewWord, Served, SortKey, WordId, WordPatch, WordStore};

pub const LOG_ENV: &str = "VOCAB_LOG";

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    // Needs neither config nor storage.
    if let Some(Commands::Schema) = &cli.command {
        println!("{}", create_table_sql());
        return Ok(());
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;
    runtime.block_on(dispatch(cli))
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default));
    // Ignore a second init (tests may call run more than once).
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

async fn dispatch(cli: Cli) -> Result<()> {
    let (ctx, config) = initialize(cli.data_dir.as_deref(), cli.local)?;
    debug!(remote = ctx.is_remote_configured(), "storage context ready");
    let store = WordStore::new(ctx);

    match cli.command {
        None => handle_list(&store, &config, ListArgs::default()).await,
        Some(Commands::List(args)) => handle_list(&store, &config, args).await,
        Some(Commands::Add {
            original,
            translation,
            pronunciation,
            example,
        }) => {
            let mut new = NewWord::new(original, translation);
            new.pronunciation = pronunciation;
            new.example = example;
            let served = store.add(new).await?;
            println!("{}", render_word("Added", &report(served)));
            Ok(())
        }
        Some(Commands::Search { term, sort }) => {
            let key = sort.unwrap_or_else(|| config.default_sort());
            let words = report(store.search(&term, key).await?);
            println!("{}", render_list(&words, Utc::now()));
            Ok(())
        }
        Some(Commands::Edit {
            id,
            original,
            translation,
            pronunciation,
            example,
        }) => {
            let patch = WordPatch {
                original_text: original,
                pronunciation,
                translation,
                example,
                is_favorite: None,
            };
            if patch.is_empty() {
                anyhow::bail!("nothing to change: pass --original, --translation, --pronunciation or --example");
            }
            let served = store.update(&WordId::from(id), patch).await?;
            println!("{}", render_word("Updated", &report(served)));
            Ok(())
        }
        Some(Commands::Fav { id }) => {
            let word = report(store.toggle_favorite(&WordId::from(id)).await?);
            let action = if word.is_favorite {
                "Favorited"
            } else {
                "Unfavorited"
            };
            println!("{}", render_word(action, &word));
            Ok(())
        }
        Some(Commands::Rm { id }) => {
            let id = WordId::from(id);
            report(store.remove(&id).await?);
            println!("Removed {}", id);
            Ok(())
        }
        Some(Commands::Stats { json }) => {
            let stats = report(store.stats(Utc::now(), *Local::now().offset()).await?);
            if json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                println!("{}", render_stats(&stats));
            }
            Ok(())
        }
        Some(Commands::Seed) => {
            let seeded = report(store.seed_samples().await?);
            if seeded.is_empty() {
                println!("Store already has words; nothing added.");
            } else {
                println!("Added {} sample words.", seeded.len());
            }
            Ok(())
        }
        Some(Commands::Status) => {
            let health = store.health().await;
            println!("{}", render_health(&health));
            Ok(())
        }
        Some(Commands::Schema) => {
            println!("{}", create_table_sql());
            Ok(())
        }
    }
}

async fn handle_list(store: &WordStore, config: &VocabConfig, args: ListArgs) -> Result<()> {
    let key: SortKey = args.sort.unwrap_or_else(|| config.default_sort());
    let served = match args.search.as_deref() {
        Some(term) => store.search(term, key).await?,
        None => store.sorted(key).await?,
    };
    debug!(route = route_label(served.route), "listed words");
    let words = report(served);
    if args.json {
        println!("{}", serde_json::to_string_pretty(&words)?);
    } else {
        println!("{}", render_list(&words, Utc::now()));
    }
    Ok(())
}

/// Print any notices on stderr and hand back the value.
fn report<T>(served: Served<T>) -> T {
    for notice in &served.notices {
        eprintln!("{}", render_notice(notice));
    }
    served.into_value()
}
