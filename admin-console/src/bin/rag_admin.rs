//! rag-admin: command-line front end for the admin console relay.

use admin_console::console::{
    format_bytes, format_timestamp, ApiClient, BackendStatus, Console, DeleteOutcome,
    FileSessionStore, UploadFile,
};
use admin_console::models::query::DEFAULT_TOP_K;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dialoguer::{Confirm, Password};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "rag-admin")]
#[command(about = "Administer a RAG backend through the admin console relay")]
#[command(version)]
struct Cli {
    /// Relay origin
    #[arg(long, env = "RAG_ADMIN_URL", default_value = "http://localhost:3000")]
    url: String,

    /// Session file
    #[arg(long, env = "RAG_ADMIN_SESSION", default_value = ".rag-admin/session.json")]
    session: PathBuf,

    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show whether the backend is reachable
    Health,

    /// Log in and store the session
    Login {
        email: String,

        /// Prompted for without echo when omitted
        #[arg(long, env = "RAG_ADMIN_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },

    /// Forget the stored session
    Logout,

    /// Show the logged-in user
    Whoami,

    /// List documents
    Docs,

    /// Upload files, one after another
    Upload {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Delete a document
    Delete {
        id: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Ask the RAG pipeline a question
    Query {
        text: String,

        /// Number of sources to retrieve (1-10)
        #[arg(short, long, default_value_t = DEFAULT_TOP_K)]
        top_k: u32,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with_writer(std::io::stderr)
        .init();

    let store = FileSessionStore::new(&cli.session);
    let mut console = Console::new(ApiClient::new(&cli.url), store);

    match cli.command {
        Commands::Health => {
            let status = console.check_health().await;
            println!(
                "{}",
                match status {
                    BackendStatus::Online => "Backend Online",
                    BackendStatus::Offline => "Backend Offline",
                }
            );
        }
        Commands::Login { email, password } => {
            let password = match password {
                Some(password) => password,
                None => Password::new()
                    .with_prompt("Password")
                    .interact()
                    .context("Failed to read password")?,
            };
            if console.login(&email, &password).await {
                println!("Logged in as {}", email);
                println!("Documents: {}", console.documents().len());
            } else {
                anyhow::bail!(
                    "{}",
                    console.login_error().unwrap_or("login failed").to_string()
                );
            }
        }
        Commands::Logout => {
            console.logout().context("Failed to clear session")?;
            println!("Logged out");
        }
        Commands::Whoami => match require_session(&mut console)? {
            Some(email) => println!("{}", email),
            None => println!("admin"),
        },
        Commands::Docs => {
            require_session(&mut console)?;
            console.refresh_documents().await;
            print_documents(&console);
        }
        Commands::Upload { files } => {
            require_session(&mut console)?;

            let mut selected = Vec::with_capacity(files.len());
            for path in &files {
                let data = tokio::fs::read(path)
                    .await
                    .with_context(|| format!("Failed to read {}", path.display()))?;
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| path.display().to_string());
                selected.push(UploadFile::new(name, data));
            }

            console.upload(&selected).await;
            for entry in console.upload_log() {
                println!("{:<8} {}  {}", entry.status.as_str(), entry.name, entry.message);
            }
        }
        Commands::Delete { id, yes } => {
            require_session(&mut console)?;
            let outcome = console
                .delete(&id, |id| {
                    yes || confirm(&format!(
                        "정말로 삭제하시겠습니까? 복구 불가합니다. ({})",
                        id
                    ))
                })
                .await;
            match outcome {
                DeleteOutcome::Deleted => println!("Deleted {}", id),
                DeleteOutcome::Declined => println!("Cancelled"),
                DeleteOutcome::Failed => anyhow::bail!("Delete failed for {}", id),
                DeleteOutcome::NotLoggedIn => anyhow::bail!("Not logged in"),
            }
        }
        Commands::Query { text, top_k } => {
            console.run_query(&text, top_k).await;
            println!("{}", console.answer().unwrap_or("아직 답변이 없습니다."));
            for source in console.sources() {
                println!();
                println!("{} · score {:.3}", source.filename, source.score);
                println!("  {}", source.content);
            }
        }
    }

    Ok(())
}

/// Load the stored session, failing when nobody is logged in.
fn require_session(console: &mut Console<FileSessionStore>) -> Result<Option<String>> {
    let restored = console.restore().with_context(|| {
        format!(
            "Failed to read session from {}",
            console.store().path().display()
        )
    })?;
    if !restored {
        anyhow::bail!("Not logged in; run `rag-admin login <email>` first");
    }
    Ok(console
        .session()
        .and_then(|session| session.email())
        .map(str::to_string))
}

fn print_documents(console: &Console<FileSessionStore>) {
    if console.documents().is_empty() {
        println!("아직 등록된 문서가 없습니다.");
        return;
    }

    println!(
        "{:<38} {:<32} {:<6} {:>9} {:<11} {}",
        "ID", "FILENAME", "TYPE", "SIZE", "STATUS", "CREATED"
    );
    for doc in console.documents() {
        println!(
            "{:<38} {:<32} {:<6} {:>9} {:<11} {}",
            doc.id,
            doc.filename,
            doc.file_type,
            format_bytes(doc.file_size),
            doc.status,
            format_timestamp(&doc.created_at)
        );
    }
}

fn confirm(question: &str) -> bool {
    Confirm::new()
        .with_prompt(question)
        .default(false)
        .interact()
        .unwrap_or(false)
}
