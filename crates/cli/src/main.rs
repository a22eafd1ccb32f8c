mod export;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use data_loader::{SubscriptionTier, UserRecord};
use ranking::{ActiveStrategy, RankingEngine};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::warn;

/// FlixHabit - viewing habit rankings
#[derive(Parser)]
#[command(name = "flixhabit")]
#[command(about = "Rank streaming users by watch time, similarity and genre habits", long_about = None)]
struct Cli {
    /// Path to the users CSV file
    #[arg(short, long, global = true, default_value = "data/netflix_users.csv")]
    data: PathBuf,

    /// Use N generated sample users instead of reading a file
    #[arg(long, global = true)]
    sample: Option<usize>,

    /// Abort on the first malformed row instead of skipping it
    #[arg(long, global = true)]
    strict: bool,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum StrategyArg {
    Heap,
    Graph,
}

impl From<StrategyArg> for ActiveStrategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Heap => ActiveStrategy::BoundedHeap,
            StrategyArg::Graph => ActiveStrategy::Graph,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// List every loaded user
    Users,

    /// Show the users with the most watch time
    Active {
        #[arg(long, default_value = "10")]
        k: usize,

        /// Selection strategy
        #[arg(long, value_enum, default_value = "heap")]
        strategy: StrategyArg,
    },

    /// Show the most similar user pairs
    Similar {
        #[arg(long, default_value = "10")]
        k: usize,
    },

    /// Show which genres are linked by similar users
    GenreGraph,

    /// Most common genre inside an inclusive age range
    GenreByAge {
        #[arg(long)]
        min: u32,

        #[arg(long)]
        max: u32,
    },

    /// Average watch time per country
    WatchTime,

    /// Users on one subscription tier
    Subscription {
        /// Basic, Standard or Premium (case-insensitive)
        #[arg(long)]
        tier: SubscriptionTier,
    },

    /// Write a random users CSV
    Generate {
        #[arg(long, default_value = "1000")]
        count: usize,

        #[arg(long, default_value = "42")]
        seed: u64,

        #[arg(long)]
        out: PathBuf,
    },

    /// Run every query and write the JSON documents into a directory
    Export {
        #[arg(long, default_value = "output")]
        out: PathBuf,

        #[arg(long, default_value = "10")]
        k: usize,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level)),
        )
        .init();

    // Generation never reads input
    if let Commands::Generate { count, seed, out } = &cli.command {
        return handle_generate(*count, *seed, out);
    }

    let users = load(&cli)?;
    let engine = RankingEngine::new();

    match cli.command {
        Commands::Users => handle_users(&users),
        Commands::Active { k, strategy } => handle_active(&engine, &users, k, strategy.into())?,
        Commands::Similar { k } => handle_similar(&engine, &users, k)?,
        Commands::GenreGraph => handle_genre_graph(&engine, &users),
        Commands::GenreByAge { min, max } => handle_genre_by_age(&engine, &users, min, max),
        Commands::WatchTime => handle_watch_time(&engine, &users),
        Commands::Subscription { tier } => handle_subscription(&engine, &users, tier),
        Commands::Export { out, k } => handle_export(&engine, &users, &out, k)?,
        Commands::Generate { .. } => {}
    }

    Ok(())
}

/// Read the users file, or generate sample users when `--sample` is given
fn load(cli: &Cli) -> Result<Vec<UserRecord>> {
    if let Some(count) = cli.sample {
        println!("{} Generated {} sample users", "✓".green(), count);
        return Ok(data_loader::generate_sample_users(count));
    }

    println!("Loading users from {}...", cli.data.display());
    let start = Instant::now();
    let load = data_loader::load_users(&cli.data).context("Failed to load users")?;

    let users = if cli.strict {
        load.into_strict().context("Malformed row in users file")?
    } else {
        for err in &load.rejected {
            warn!("Skipped row: {}", err);
        }
        if !load.rejected.is_empty() {
            println!("{} Skipped {} malformed rows", "!".yellow(), load.rejected.len());
        }
        load.users
    };

    println!("{} Loaded {} users in {:?}", "✓".green(), users.len(), start.elapsed());
    Ok(users)
}

fn print_user(rank: usize, user: &UserRecord) {
    println!(
        "{}. {} {} ({}, {}) {} - {:.2}h, {} [last login {}]",
        rank.to_string().green(),
        format!("#{}", user.id).dimmed(),
        user.name.bold(),
        user.age,
        user.country,
        user.subscription_tier,
        user.watch_time_hours,
        user.preferred_genre,
        user.last_login_date
    );
}

fn handle_users(users: &[UserRecord]) {
    println!("{}", format!("{} users:", users.len()).bold().blue());
    for (i, user) in users.iter().enumerate() {
        print_user(i + 1, user);
    }
}

fn handle_active(engine: &RankingEngine, users: &[UserRecord], k: usize, strategy: ActiveStrategy) -> Result<()> {
    let start = Instant::now();
    let active = engine.most_active(users, k, strategy)?;
    println!(
        "{}",
        format!("Top {} users by watch time ({:?}, {:?}):", active.len(), strategy, start.elapsed())
            .bold()
            .blue()
    );
    for (i, user) in active.iter().enumerate() {
        print_user(i + 1, user);
    }
    Ok(())
}

fn handle_similar(engine: &RankingEngine, users: &[UserRecord], k: usize) -> Result<()> {
    let start = Instant::now();
    let pairs = engine.most_similar_pairs(users, k)?;
    println!(
        "{}",
        format!("Top {} similar pairs ({:?}):", pairs.len(), start.elapsed()).bold().blue()
    );
    for (i, pair) in pairs.iter().enumerate() {
        println!(
            "{}. users {} and {} - score {:.2}",
            (i + 1).to_string().green(),
            pair.user_a,
            pair.user_b,
            pair.score
        );
    }
    Ok(())
}

fn handle_genre_graph(engine: &RankingEngine, users: &[UserRecord]) {
    let graph = engine.genre_co_occurrence_graph(users);
    println!(
        "{}",
        format!("{} genres, {} links:", graph.genre_count(), graph.edge_count()).bold().blue()
    );
    for genre in graph.genres() {
        let linked = graph.neighbors(genre);
        if linked.is_empty() {
            println!("{}{}", "• ".green(), genre);
        } else {
            println!("{}{} -> {}", "• ".green(), genre, linked.join(", "));
        }
    }
}

fn handle_genre_by_age(engine: &RankingEngine, users: &[UserRecord], min: u32, max: u32) {
    match engine.genre_for_age_group(users, min, max) {
        Some(genre) => println!("Most common genre for ages {}-{}: {}", min, max, genre.bold()),
        None => println!("{} No users aged {}-{}", "!".yellow(), min, max),
    }
}

fn handle_watch_time(engine: &RankingEngine, users: &[UserRecord]) {
    let averages = engine.average_watch_time_by_country(users);
    println!("{}", "Average watch time by country:".bold().blue());
    for (country, hours) in &averages {
        println!("{}{}: {:.2}h", "• ".cyan(), country, hours);
    }
}

fn handle_subscription(engine: &RankingEngine, users: &[UserRecord], tier: SubscriptionTier) {
    let members = engine.users_by_subscription(users, tier);
    println!("{}", format!("{} {} users:", members.len(), tier).bold().blue());
    for (i, user) in members.iter().enumerate() {
        print_user(i + 1, user);
    }
}

fn handle_generate(count: usize, seed: u64, out: &Path) -> Result<()> {
    let users = data_loader::generate_random_users(count, seed);
    let file = File::create(out).with_context(|| format!("Failed to create {}", out.display()))?;
    data_loader::write_users_csv(BufWriter::new(file), &users)
        .with_context(|| format!("Failed to write {}", out.display()))?;
    println!("{} Wrote {} users to {}", "✓".green(), users.len(), out.display());
    Ok(())
}

fn handle_export(engine: &RankingEngine, users: &[UserRecord], out: &Path, k: usize) -> Result<()> {
    let start = Instant::now();
    let written = export::export_all(engine, users, out, k, ActiveStrategy::default())?;
    println!(
        "{} Wrote {} documents to {} in {:?}",
        "✓".green(),
        written.len(),
        out.display(),
        start.elapsed()
    );
    Ok(())
}
