use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use fangs::error::FangsError;
use fangs::repository::Repository;
use fangs::{add, branch, checkout, commit, log, merge, status};

#[derive(Parser)]
#[command(name = "fangs")]
#[command(about = "A minimal content-addressed version control system")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    Init,
    Add {
        paths: Vec<PathBuf>,
    },
    Commit {
        message: Vec<String>,
    },
    Log,
    Branch {
        name: Option<String>,
    },
    Checkout {
        #[arg(short = 'b')]
        create: bool,
        branch: String,
    },
    Merge {
        branch: String,
    },
    Status,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    if let Err(err) = run() {
        eprintln!("fangs: {err}");
        std::process::exit(exit_code_for(&err));
    }
}

fn exit_code_for(err: &anyhow::Error) -> i32 {
    err.downcast_ref::<FangsError>().map_or(1, FangsError::exit_code)
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let cwd = PathBuf::from(".");

    match cli.command {
        Commands::Init => {
            let repo = Repository::init(&cwd)?;
            println!(
                "Initialized empty fangs repository in {}/{}",
                repo.root.display(),
                repo.metadata_dir_name()
            );
        }

        Commands::Add { paths } => {
            let repo = Repository::open(&cwd)?;
            add::add(&repo, &paths)?;
        }

        Commands::Commit { message } => {
            let repo = Repository::open(&cwd)?;
            let message = message.join(" ");
            let commit_id = commit::commit(&repo, &message)?;
            println!("[{}] {}", &fangs::hash::hash_to_hex(&commit_id)[..8], message);
        }

        Commands::Log => {
            let repo = Repository::open(&cwd)?;
            let mut buf = String::new();
            log::log(&repo, &mut buf)?;
            print!("{buf}");
        }

        Commands::Branch { name } => {
            let repo = Repository::open(&cwd)?;
            match name {
                Some(name) => branch::create(&repo, &name, None)?,
                None => branch::list(&repo)?,
            }
        }

        Commands::Checkout { create, branch: branch_name } => {
            let repo = Repository::open(&cwd)?;
            if create {
                checkout::checkout_new(&repo, &branch_name)?;
            } else {
                checkout::checkout(&repo, &branch_name)?;
            }
            println!("Switched to branch '{branch_name}'");
        }

        Commands::Merge { branch: other } => {
            let repo = Repository::open(&cwd)?;
            match merge::merge(&repo, &other)? {
                merge::MergeOutcome::AlreadyUpToDate => println!("Already up to date."),
                merge::MergeOutcome::FastForward { commit } => {
                    println!("Fast-forward to {}", &fangs::hash::hash_to_hex(&commit)[..8]);
                }
                merge::MergeOutcome::ThreeWay { commit } => {
                    println!("Merge commit {}", &fangs::hash::hash_to_hex(&commit)[..8]);
                }
                merge::MergeOutcome::Conflict { conflicts } => {
                    println!("Automatic merge failed; fix conflicts and commit the result.");
                    for path in conflicts {
                        println!("  both modified: {path}");
                    }
                }
            }
        }

        Commands::Status => {
            let repo = Repository::open(&cwd)?;
            status::status(&repo)?;
        }
    }

    Ok(())
}
