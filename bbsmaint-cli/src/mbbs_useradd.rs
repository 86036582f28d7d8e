use clap::Parser;
use std::path::PathBuf;

use bbsmaint_core::{AccountStore, MaintError, DEFAULT_ACCOUNT_KEYS};

#[derive(Debug, Parser)]
#[command(
    name = "mbbs-useradd",
    version,
    about = "Create an MBBSEmu user account with a salted password hash"
)]
struct Args {
    /// Path to the emulator account database
    #[arg(long, default_value = "mbbs.db")]
    db: PathBuf,

    /// Username to create
    #[arg(long)]
    username: String,

    /// Password to use
    #[arg(long)]
    password: String,

    /// Email address recorded on the account
    #[arg(long, default_value = "test@test.bbs")]
    email: String,

    /// Extra account keys, added on top of NORMAL and PAYING
    #[arg(long = "key", value_name = "KEY")]
    keys: Vec<String>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let mut keys: Vec<String> = DEFAULT_ACCOUNT_KEYS.iter().map(|k| (*k).to_owned()).collect();
    keys.extend(args.keys);

    let result = AccountStore::open(&args.db).and_then(|mut store| {
        store.create_tables()?;
        store.create_account(&args.username, &args.password, &args.email, &keys)
    });

    match result {
        Ok(account_id) => {
            println!("Created account {} (id {})", args.username, account_id);
        }
        Err(MaintError::AccountExists(_)) => {
            eprintln!(
                "Account {} already exists in {}",
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
