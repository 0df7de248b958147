//! `leximate`: command-line client for the LexiMate legal-document backend.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use leximate_app::{AuthContext, DashboardPoller, DocumentsView, DraftEditor, Notifier, ProfileEditor};
use leximate_client::{ApiClient, SessionStore};
use leximate_core::profile::content_type_for;
use leximate_core::{DocumentFilter, DocumentType, DraftField};
use tracing_subscriber::EnvFilter;

mod chat;
mod display;

use display::ConsoleNotifier;

#[derive(Parser)]
#[command(name = "leximate", version)]
#[command(about = "Draft, manage and discuss legal documents with LexiMate", long_about = None)]
struct Cli {
    /// Backend base URL
    #[arg(long, env = "LEXIMATE_BACKEND_URL", default_value = "http://localhost:5000", global = true)]
    base_url: String,

    /// Directory holding the persisted session
    #[arg(long, env = "LEXIMATE_DATA_DIR", default_value = "./.leximate", global = true)]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Complete sign-in with the token from the OAuth redirect
    Login {
        #[arg(long)]
        token: String,
    },
    /// Sign out and forget the local session
    Logout,
    /// Show the signed-in user
    Whoami,
    /// List and manage stored documents
    Documents {
        #[command(subcommand)]
        action: DocumentsAction,
    },
    /// Run the document wizard
    Draft {
        #[command(subcommand)]
        action: DraftAction,
    },
    /// Interactive legal-assistant chat
    Chat,
    /// View or edit your profile
    Profile {
        #[command(subcommand)]
        action: ProfileAction,
    },
    /// Headline counts and recent documents
    Dashboard {
        /// Keep refreshing until interrupted
        #[arg(long)]
        watch: bool,
        /// Refresh interval in seconds
        #[arg(long, env = "LEXIMATE_POLL_SECS", default_value_t = 10)]
        poll_secs: u64,
    },
}

#[derive(Subcommand)]
enum DocumentsAction {
    List {
        /// Document type (`all` for any)
        #[arg(long = "type")]
        doc_type: Option<String>,
        /// Status (`all` for any)
        #[arg(long)]
        status: Option<String>,
        /// Case-insensitive match on name or parties
        #[arg(long)]
        search: Option<String>,
    },
    Show {
        id: String,
    },
    Preview {
        id: String,
    },
    Download {
        id: String,
        /// Output directory
        #[arg(long, default_value = ".")]
        out: PathBuf,
    },
    Delete {
        id: String,
    },
    /// Update stored fields (type, companyName, counterpartyName, ...)
    Edit {
        id: String,
        #[arg(long = "field", value_parser = parse_key_value)]
        fields: Vec<(String, String)>,
    },
}

#[derive(Subcommand)]
enum DraftAction {
    /// Walk the wizard from type selection to review
    New {
        /// nda, contract or service
        #[arg(long = "type")]
        doc_type: Option<DocumentType>,
        /// Draft field as `name=value`, e.g. `disclosingParty=Acme`
        #[arg(long = "field", value_parser = parse_key_value)]
        fields: Vec<(String, String)>,
        /// Save as a draft at the review step
        #[arg(long, conflicts_with = "generate")]
        save: bool,
        /// Generate the final text at the review step
        #[arg(long)]
        generate: bool,
        /// Continue editing a stored document
        #[arg(long)]
        resume: Option<String>,
        /// Download the PDF into this directory after generating
        #[arg(long, requires = "generate")]
        download: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum ProfileAction {
    Show,
    /// Set profile fields as `name=value`
    Set {
        #[arg(value_parser = parse_key_value)]
        fields: Vec<(String, String)>,
        /// PNG, JPG or WEBP image, at most 5 MB
        #[arg(long)]
        avatar: Option<PathBuf>,
    },
}

fn parse_key_value(s: &str) -> Result<(String, String), String> {
    let (k, v) = s
        .split_once('=')
        .ok_or_else(|| format!("expected name=value, got `{s}`"))?;
    Ok((k.trim().to_string(), v.to_string()))
}

fn all_is_none(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.eq_ignore_ascii_case("all") && !v.is_empty())
}

fn outcome(ok: bool) -> ExitCode {
    if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE }
}

/// Build the HTTP client, carrying the persisted token when there is one.
fn connect(base_url: &str, store: &SessionStore) -> anyhow::Result<Arc<ApiClient>> {
    let token = store
        .load()
        .with_context(|| format!("reading {}", store.path().display()))?
        .map(|s| s.token);
    if token.is_none() {
        tracing::debug!("no saved session; requests are unauthenticated");
    }
    Ok(Arc::new(ApiClient::new(base_url.to_string()).with_token(token)))
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    let default_level = if matches!(cli.command, Command::Chat) { "warn" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
    tracing::debug!("leximate v{}", env!("CARGO_PKG_VERSION"));

    let store = SessionStore::new(&cli.data_dir);
    let notifier: Arc<dyn Notifier> = Arc::new(ConsoleNotifier);

    match cli.command {
        Command::Login { token } => {
            let client = Arc::new(ApiClient::new(cli.base_url.clone()));
            let mut auth = AuthContext::new(client, store);
            let session = auth.complete_oauth(&token).await.context("signing in")?;
            let who = session
                .display_name()
                .unwrap_or_else(|| "unknown user".to_string());
            println!("Signed in as {who}");
        }
        Command::Logout => {
            let client = connect(&cli.base_url, &store)?;
            let mut auth = AuthContext::restore(client, store)?;
            auth.logout().await.context("removing session")?;
            println!("Signed out");
        }
        Command::Whoami => match store.load()? {
            Some(session) => println!(
                "{}",
                session
                    .display_name()
                    .unwrap_or_else(|| "signed in (no profile name)".to_string())
            ),
            None => {
                println!("Not signed in");
                return Ok(ExitCode::FAILURE);
            }
        },
        Command::Documents { action } => {
            let client = connect(&cli.base_url, &store)?;
            return documents(action, DocumentsView::new(client, notifier)).await;
        }
        Command::Draft { action } => {
            let client = connect(&cli.base_url, &store)?;
            return draft(action, DraftEditor::new(client, notifier)).await;
        }
        Command::Chat => {
            let client = connect(&cli.base_url, &store)?;
            chat::run(client, notifier).await?;
        }
        Command::Profile { action } => {
            let client = connect(&cli.base_url, &store)?;
            return profile(action, ProfileEditor::new(client, notifier)).await;
        }
        Command::Dashboard { watch, poll_secs } => {
            let client = connect(&cli.base_url, &store)?;
            return dashboard(client, notifier, watch, Duration::from_secs(poll_secs.max(1))).await;
        }
    }
    Ok(ExitCode::SUCCESS)
}

// ── Documents ──

async fn documents(
    action: DocumentsAction,
    mut view: DocumentsView<ApiClient>,
) -> anyhow::Result<ExitCode> {
    match action {
        DocumentsAction::List {
            doc_type,
            status,
            search,
        } => {
            if !view.load().await {
                bail!("could not load documents");
            }
            let filter = DocumentFilter {
                search: search.unwrap_or_default(),
                doc_type: all_is_none(doc_type),
                status: all_is_none(status),
            };
            display::print_document_table(&view.filter(&filter));
        }
        DocumentsAction::Show { id } => {
            if !view.load().await {
                bail!("could not load documents");
            }
            match view.records().iter().find(|d| d.id == id) {
                Some(doc) => display::print_document_card(doc),
                None => bail!("Document not found: {id}"),
            }
        }
        DocumentsAction::Preview { id } => match view.preview(&id).await {
            Some(p) => display::print_preview(&p),
            None => return Ok(ExitCode::FAILURE),
        },
        DocumentsAction::Download { id, out } => match view.download(&id, &out).await {
            Some(path) => println!("Saved {}", path.display()),
            None => return Ok(ExitCode::FAILURE),
        },
        DocumentsAction::Delete { id } => return Ok(outcome(view.delete(&id).await)),
        DocumentsAction::Edit { id, fields } => {
            view.load().await;
            let Some(mut edit) = view.open_edit(&id).await else {
                return Ok(ExitCode::FAILURE);
            };
            for (k, v) in fields {
                if !edit.set(&k, v) {
                    bail!("unknown field `{k}`; expected one of {}", leximate_core::EditForm::FIELDS.join(", "));
                }
            }
            if !view.submit_edit(&id, &edit).await {
                return Ok(ExitCode::FAILURE);
            }
            if let Some(doc) = view.records().iter().find(|d| d.id == id) {
                display::print_document_card(doc);
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}

// ── Wizard ──

async fn draft(action: DraftAction, mut editor: DraftEditor<ApiClient>) -> anyhow::Result<ExitCode> {
    let DraftAction::New {
        doc_type,
        fields,
        save,
        generate,
        resume,
        download,
    } = action;

    if let Some(id) = &resume
        && !editor.resume(id).await
    {
        bail!("could not load document {id} for editing");
    }
    if let Some(ty) = doc_type {
        editor.select_type(ty);
    }
    for (k, v) in fields {
        let field = DraftField::parse(&k).with_context(|| format!("unknown draft field `{k}`"))?;
        editor.set_field(field, v);
    }

    display::print_step(editor.step());
    while editor.step() != leximate_app::Step::Review {
        let step = editor.next().await?;
        display::print_step(step);
    }
    if let Some(id) = editor.synchronizer().pending_id() {
        println!("  document id: {id}");
    }

    let mut ok = true;
    if save {
        ok = editor.save_draft().await.is_some();
    }
    if generate {
        ok = editor.generate().await.is_some();
    }
    println!();
    display::print_preview(&editor.review_preview());

    if let Some(dir) = download
        && ok
    {
        match editor.download(&dir).await {
            Some(path) => println!("Saved {}", path.display()),
            None => ok = false,
        }
    }
    Ok(outcome(ok))
}

// ── Profile ──

async fn profile(action: ProfileAction, mut editor: ProfileEditor<ApiClient>) -> anyhow::Result<ExitCode> {
    editor.load().await;
    match action {
        ProfileAction::Show => display::print_profile(editor.profile()),
        ProfileAction::Set { fields, avatar } => {
            for (k, v) in fields {
                if !editor.set(&k, v) {
                    bail!("unknown profile field `{k}`");
                }
            }
            if let Some(path) = avatar {
                if !select_avatar(&mut editor, &path)? {
                    return Ok(ExitCode::FAILURE);
                }
            }
            if !editor.save().await {
                return Ok(ExitCode::FAILURE);
            }
            display::print_profile(editor.profile());
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn select_avatar(editor: &mut ProfileEditor<ApiClient>, path: &Path) -> anyhow::Result<bool> {
    let size = std::fs::metadata(path)
        .with_context(|| format!("reading {}", path.display()))?
        .len();
    let name = path.file_name().map(|n| n.to_string_lossy()).unwrap_or_default();
    let content_type = content_type_for(&name).unwrap_or("application/octet-stream");
    Ok(editor.select_avatar(path, content_type, size))
}

// ── Dashboard ──

async fn dashboard(
    client: Arc<ApiClient>,
    notifier: Arc<dyn Notifier>,
    watch: bool,
    period: Duration,
) -> anyhow::Result<ExitCode> {
    if !watch {
        let mut view = DocumentsView::new(client, notifier);
        if !view.load().await {
            bail!("could not load documents");
        }
        display::print_summary(&view.summary());
        return Ok(ExitCode::SUCCESS);
    }

    let mut poller = DashboardPoller::start(client, period);
    loop {
        tokio::select! {
            next = poller.changed() => match next {
                Some(summary) => {
                    println!();
                    display::print_summary(&summary);
                }
                None => break,
            },
            _ = tokio::signal::ctrl_c() => break,
        }
    }
    poller.stop();
    Ok(ExitCode::SUCCESS)
}
