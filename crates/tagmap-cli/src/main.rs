use clap::Parser;
use clap::Subcommand;
use itertools::Itertools;
use simple_log::log::info;
use simple_log::LogConfigBuilder;
use std::error::Error;
use std::path::PathBuf;
use tagmap::catalog::storefront_registry;
use tagmap::{AssociationId, KindRegistry, TagId, TagIndex, TagLabel};

/// Manage tags and their attachments in a tagmap database file.
#[derive(Parser, Debug)]
struct Args {
    /// Path to the database file. If no path is provided the program uses
    /// $HOME/.local/share/tagmap/tag-db.json.
    #[arg(short, long, default_value = None)]
    db: Option<PathBuf>,

    /// Entity kind to declare when creating a new database. Can be given
    /// multiple times. Defaults to the storefront kinds (product, collection,
    /// customer, order). Ignored when the database already exists, since the
    /// kind table travels with the database.
    #[arg(short, long)]
    kind: Vec<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create a new tag with the given label and print its id.
    CreateTag { label: String },

    /// Delete a tag and every attachment referencing it.
    DeleteTag { id: u64 },

    /// Print all tags.
    Tags,

    /// Attach a tag to an entity. The entity id is not checked against any
    /// entity store; it only has to be positive.
    Attach {
        tag: u64,
        kind: String,
        entity_id: u64,
    },

    /// Remove a single attachment by its association id.
    Detach { association: u64 },

    /// Print every tag attached to an entity.
    TagsFor { kind: String, entity_id: u64 },

    /// Print every (kind, entity id) pair carrying a tag.
    EntitiesFor { tag: u64 },
}

fn main() {
    let args = Args::parse();

    let db_path = if let Some(db) = args.db {
        db
    } else {
        let home_dir = std::env::var("HOME").unwrap();
        PathBuf::from(home_dir + "/.local/share/tagmap/tag-db.json")
    };

    let data_dir = db_path
        .parent()
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."));

    let log_path = format!("{}/log/tagmap-cli.log", data_dir.display());
    std::fs::create_dir_all(format!("{}/log", data_dir.display())).unwrap();

    let config = LogConfigBuilder::builder()
        .path(&log_path)
        .size(100)
        .roll_count(10)
        .time_format("%Y-%m-%d %H:%M:%S")
        .level("debug")
        .unwrap()
        .output_file()
        .build();

    simple_log::new(config).unwrap();

    let mut index = if db_path.exists() {
        match TagIndex::create_from_db(&db_path) {
            Ok(index) => index,
            Err(err) => {
                eprintln!("could not read database {}: {err}", db_path.display());
                std::process::exit(1);
            }
        }
    } else {
        let registry = if args.kind.is_empty() {
            storefront_registry()
        } else {
            KindRegistry::new(args.kind)
        };
        info!(
            "creating new database at {} with kinds: {}",
            db_path.display(),
            registry.kinds().join(", ")
        );
        TagIndex::new(registry)
    };

    let mutated = match run(&mut index, args.command) {
        Ok(mutated) => mutated,
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    };

    if mutated {
        if let Err(err) = index.save_to_db(&db_path) {
            eprintln!("could not write database {}: {err}", db_path.display());
            std::process::exit(1);
        }
        info!("saved database to {}", db_path.display());
    }
}

/// Returns whether the index was mutated and needs to be written back.
fn run(index: &mut TagIndex, command: Commands) -> Result<bool, Box<dyn Error>> {
    match command {
        Commands::CreateTag { label } => {
            let id = index.create_tag(TagLabel::new(label)?);
            println!("created tag {id}");
            Ok(true)
        }
        Commands::DeleteTag { id } => {
            let cascaded = index.delete_tag(TagId::from(id))?;
            println!("deleted tag {id} and {cascaded} attachments");
            Ok(true)
        }
        Commands::Tags => {
            for tag in index.tags().iter() {
                println!("{}\t{}", tag.id(), tag.label());
            }
            Ok(false)
        }
        Commands::Attach {
            tag,
            kind,
            entity_id,
        } => {
            let association = index.attach(TagId::from(tag), &kind, entity_id)?;
            println!("attached as association {association}");
            Ok(true)
        }
        Commands::Detach { association } => {
            index.detach(AssociationId::from(association))?;
            println!("detached association {association}");
            Ok(true)
        }
        Commands::TagsFor { kind, entity_id } => {
            for (association, tag) in index.tags_for(&kind, entity_id)? {
                println!("{}\t{}\t{}", association.id(), tag.id(), tag.label());
            }
            Ok(false)
        }
        Commands::EntitiesFor { tag } => {
            for (type_ref, entity_id) in index.entities_for(TagId::from(tag))? {
                let kind = index.registry().name_of(type_ref).unwrap_or("?");
                println!("{kind}\t{entity_id}");
            }
            Ok(false)
        }
    }
}
