use clap::Parser;
use std::path::PathBuf;

use bbsmaint_core::{patch_record, CharField, FieldPatch, MaintError, RecordStore};

#[derive(Debug, Parser)]
#[command(
    name = "mmud-edit",
    version,
    about = "Edit a 1.11p MMUD character stored in an MBBSEmu user database"
)]
struct Args {
    /// Path to the btrieve-style user database
    #[arg(long, default_value = "WCCUSERS.DB")]
    db: PathBuf,

    /// Username of the character to edit
    #[arg(long)]
    username: String,

    /// Experience value to set
    #[arg(long)]
    experience: Option<u32>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let mut patches = Vec::new();
    if let Some(experience) = args.experience {
        patches.push(FieldPatch {
            field: CharField::Experience,
            value: u64::from(experience),
        });
    }

    let store = match RecordStore::open(&args.db) {
        Ok(store) => store,
        Err(e) => {
            eprintln!("Failed to open {}: {}", args.db.display(), e);
            std::process::exit(1);
        }
    };

    match patch_record(&store, &args.username, &patches) {
        Ok(()) if patches.is_empty() => {
            println!("Nothing to change for {}", args.username);
        }
        Ok(()) => {
            println!("Updated {}", args.username);
        }
        Err(MaintError::NotFound(_)) => {
            eprintln!(
                "Username {} not found in {}",
                args.username,
                args.db.display()
            );
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}
