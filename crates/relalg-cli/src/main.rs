//! relalg CLI: build the sample movie database, run the algebra over it, and
//! inspect saved tables.

use clap::{Parser, Subcommand};
use relalg_core::config::EngineConfig;
use relalg_core::prelude::{IndexKind, Key, Schema, Value};
use relalg_core::tuple;
use relalg_io::TableStore;
use relalg_operators::{JoinStrategy, Table};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

#[derive(Parser)]
#[command(name = "relalg")]
#[command(about = "In-memory relational algebra over typed tables", long_about = None)]
struct Cli {
    /// Snapshot directory (overrides RELALG_STORE_DIR and RELALG_STORE_URI)
    #[arg(long, global = true)]
    store: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the movie database and run every operator over it
    Demo {
        /// Index strategy: none, ordered, hash (overrides RELALG_INDEX)
        #[arg(long)]
        index: Option<IndexKind>,

        /// Save the base tables to the store afterwards
        #[arg(long)]
        save: bool,
    },

    /// Print a saved table
    Show {
        /// Table name
        #[arg(short, long)]
        name: String,

        /// Also print the key index
        #[arg(long)]
        index: bool,
    },

    /// List saved tables
    List,
}

fn main() {
    init_tracing();
    let cli = Cli::parse();
    let cfg = apply_overrides(EngineConfig::from_env(), cli.store.clone(), None);

    let outcome = match cli.command {
        Commands::Demo { index, save } => {
            let cfg = apply_overrides(cfg, None, index);
            run_demo(&cfg, save)
        }
        Commands::Show { name, index } => show_table(&cfg, &name, index),
        Commands::List => list_tables(&cfg),
    };

    if let Err(e) = outcome {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Flags win over the environment; an explicit `--store` also clears any
/// configured URI so the directory is used as given.
fn apply_overrides(
    mut cfg: EngineConfig,
    store: Option<String>,
    index: Option<IndexKind>,
) -> EngineConfig {
    if let Some(dir) = store {
        cfg.store_dir = dir;
        cfg.store_uri = None;
    }
    if let Some(kind) = index {
        cfg.index_kind = kind;
    }
    cfg
}

struct MovieDb {
    movie: Table,
    cinema: Table,
    movie_star: Table,
    stars_in: Table,
    movie_exec: Table,
    studio: Table,
}

fn build_movie_db(kind: IndexKind) -> CliResult<MovieDb> {
    let create = |name: &str, attributes: &str, domains: &str, key: &str| -> CliResult<Table> {
        let schema = Schema::parse(attributes, domains, key)?;
        info!("DDL> create table {name} ({attributes}) [{kind}]");
        Ok(Table::with_index(name, schema, kind))
    };

    let movie_attrs = "title year length genre studioName producerNo";
    let movie_domains = "String Integer Integer String String Integer";
    let mut movie = create("movie", movie_attrs, movie_domains, "title year")?;
    let mut cinema = create("cinema", movie_attrs, movie_domains, "title year")?;
    let mut movie_star = create(
        "movieStar",
        "name address gender birthdate",
        "String String Character String",
        "name",
    )?;
    let mut stars_in = create("starsIn", "title year name", "String Integer String", "title year name")?;
    let mut movie_exec = create(
        "movieExec",
        "certNo name address fee",
        "Integer String String Real",
        "certNo",
    )?;
    let mut studio = create("studio", "name address presNo", "String String Integer", "name")?;

    movie.insert(tuple!["Star_Wars", 1977, 124, "sciFi", "Fox", 12345])?;
    movie.insert(tuple!["Star_Wars_2", 1980, 124, "sciFi", "Fox", 12345])?;
    movie.insert(tuple!["Rocky", 1985, 200, "action", "Universal", 12125])?;
    movie.insert(tuple!["Rambo", 1978, 100, "action", "Universal", 32355])?;

    cinema.insert(tuple!["Galaxy_Quest", 1999, 104, "comedy", "DreamWorks", 67890])?;
    cinema.insert(tuple!["Rocky", 1985, 200, "action", "Universal", 12125])?;

    movie_star.insert(tuple!["Carrie_Fisher", "Hollywood", 'F', "9/9/99"])?;
    movie_star.insert(tuple!["Mark_Hamill", "Brentwood", 'M', "8/8/88"])?;
    movie_star.insert(tuple!["Harrison_Ford", "Beverly_Hills", 'M', "7/7/77"])?;

    stars_in.insert(tuple!["Star_Wars", 1977, "Carrie_Fisher"])?;
    stars_in.insert(tuple!["Star_Wars", 1977, "Mark_Hamill"])?;
    stars_in.insert(tuple!["Star_Wars_2", 1980, "Harrison_Ford"])?;

    movie_exec.insert(tuple![9999, "S_Spielberg", "Hollywood", 10000.00])?;
    movie_exec.insert(tuple![12345, "G_Lucas", "Marin", 12000.00])?;

    studio.insert(tuple!["Fox", "Los_Angeles", 7777])?;
    studio.insert(tuple!["Universal", "Universal_City", 8888])?;
    studio.insert(tuple!["DreamWorks", "Universal_City", 9999])?;

    Ok(MovieDb {
        movie,
        cinema,
        movie_star,
        stars_in,
        movie_exec,
        studio,
    })
}

fn run_demo(cfg: &EngineConfig, save: bool) -> CliResult<()> {
    let db = build_movie_db(cfg.index_kind)?;
    for t in [
        &db.movie,
        &db.cinema,
        &db.movie_star,
        &db.stars_in,
        &db.movie_exec,
        &db.studio,
    ] {
        println!("{t}");
    }

    println!("{}", db.movie.project("title year")?);

    let year = db.movie.column_index("year").ok_or("movie has no year column")?;
    let before_1980 = db.movie.select(|t| t[year] < Value::from(1980));
    println!("{before_1980}");

    let star_wars = Key::new(vec![Value::from("Star_Wars"), Value::from(1977)]);
    println!("{}", db.movie.select_key(&star_wars));

    println!("{}", db.movie.union(&db.cinema)?);
    println!("{}", db.movie.minus(&db.cinema)?);
    println!("{}", db.movie.join("studioName", "name", &db.studio)?);
    println!(
        "{}",
        db.movie
            .join_with("producerNo", "certNo", &db.movie_exec, JoinStrategy::Hash)?
    );
    println!("{}", db.movie_star.natural_join(&db.stars_in)?);

    if db.movie.index().is_enabled() {
        print!("{}", db.movie.render_index());
    }

    if save {
        let store = TableStore::from_config(&cfg.storage_config())?;
        for t in [
            &db.movie,
            &db.cinema,
            &db.movie_star,
            &db.stars_in,
            &db.movie_exec,
            &db.studio,
        ] {
            store.save(t)?;
        }
        println!("✓ Saved 6 tables under {}", store.root());
    }
    Ok(())
}

fn show_table(cfg: &EngineConfig, name: &str, with_index: bool) -> CliResult<()> {
    let store = TableStore::from_config(&cfg.storage_config())?;
    let table = store.load(name)?;
    println!("{table}");
    if with_index {
        print!("{}", table.render_index());
    }
    Ok(())
}

fn list_tables(cfg: &EngineConfig) -> CliResult<()> {
    let store = TableStore::from_config(&cfg.storage_config())?;
    let names = store.list()?;
    if names.is_empty() {
        println!("No tables under {}", store.root());
    }
    for name in names {
        println!("{name}");
    }
    Ok(())
}
