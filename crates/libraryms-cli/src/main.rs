//! `LibraryMS` CLI: command-line companion for the `LibraryMS` site.
//!
//! Cookie consent and FAQ search run locally against the core library; the
//! contact and subscribe commands talk to a running `libraryms-server` over
//! its JSON API.

#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use serde_json::{Value, json};
use tracing::debug;

use libraryms_core::consent::{ConsentCategory, ConsentStore};
use libraryms_core::contact::{ContactCategory, ContactForm};
use libraryms_core::faq::{self, FaqEntry};
use libraryms_core::subscription::SubscribeForm;
use libraryms_storage::FileBackend;

// ── ANSI color helpers ───────────────────────────────────────────────

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const RED: &str = "\x1b[31m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const CYAN: &str = "\x1b[36m";
const WHITE: &str = "\x1b[37m";

// ── CLI structure ────────────────────────────────────────────────────

/// `LibraryMS` cookie consent, FAQ, and contact from the terminal.
#[derive(Parser)]
#[command(
    name = "libraryms",
    version,
    about = "LibraryMS CLI — manage cookie preferences, search the FAQ, contact the team",
    long_about = None,
    after_help = format!(
        "{DIM}Environment variables:{RESET}\n  \
         LIBRARYMS_ADDR      Server address (default: http://127.0.0.1:3000)\n  \
         LIBRARYMS_PROFILE   Profile file holding cookie preferences\n\n\
         {DIM}Examples:{RESET}\n  \
         libraryms cookies show\n  \
         libraryms cookies set analytics on\n  \
         libraryms cookies reset\n  \
         libraryms faq password\n  \
         libraryms subscribe reader@example.com"
    ),
)]
struct Cli {
    /// LibraryMS server address.
    #[arg(long, env = "LIBRARYMS_ADDR", default_value = "http://127.0.0.1:3000")]
    addr: String,

    /// Profile file holding local preferences.
    #[arg(long, env = "LIBRARYMS_PROFILE", default_value = ".libraryms/profile.json")]
    profile: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Cookie consent preferences for the local profile.
    Cookies {
        #[command(subcommand)]
        action: CookieCommands,
    },
    /// Search the frequently asked questions.
    Faq {
        /// Text to look for in questions and answers (empty shows everything).
        #[arg(default_value = "")]
        query: String,
    },
    /// Send a message to the LibraryMS team.
    Contact {
        #[arg(long)]
        name: String,
        /// Address replies will be sent to.
        #[arg(long)]
        email: String,
        #[arg(long)]
        subject: String,
        /// general, technical, account, feature, bug, or partnership.
        #[arg(long, default_value = "general")]
        category: String,
        #[arg(long)]
        message: String,
    },
    /// Subscribe an address to the newsletter.
    Subscribe {
        /// Email address to subscribe.
        email: String,
    },
}

#[derive(Subcommand)]
enum CookieCommands {
    /// Show current preferences.
    Show,
    /// Turn one optional category on or off.
    Set {
        /// essential, analytics, marketing, or personalization.
        category: ConsentCategory,
        #[arg(value_enum)]
        state: Toggle,
    },
    /// Allow every category.
    AcceptAll,
    /// Keep only essential cookies.
    RejectOptional,
    /// Save the current preferences as they are.
    Save,
    /// Forget the saved choice and start over.
    Reset,
}

#[derive(Clone, Copy, ValueEnum)]
enum Toggle {
    On,
    Off,
}

impl Toggle {
    fn enabled(self) -> bool {
        matches!(self, Self::On)
    }
}

// ── Pretty output helpers ────────────────────────────────────────────

fn header(icon: &str, title: &str) {
    println!("{BOLD}{CYAN}{icon} {title}{RESET}");
    println!("{DIM}─────────────────────────────────────────{RESET}");
}

fn kv_line(key: &str, value: &str) {
    println!("  {DIM}{key:<26}{RESET} {WHITE}{value}{RESET}");
}

fn success(msg: &str) {
    println!("{GREEN}{BOLD}✓{RESET} {msg}");
}

fn warning(msg: &str) {
    println!("{YELLOW}{BOLD}⚠{RESET} {YELLOW}{msg}{RESET}");
}

fn print_preferences(store: &ConsentStore) {
    header("🍪", "Cookie Preferences");
    for category in ConsentCategory::ALL {
        let state = match (store.is_allowed(category), category.is_required()) {
            (_, true) => format!("{GREEN}on{RESET} {DIM}(required){RESET}"),
            (true, false) => format!("{GREEN}on{RESET}"),
            (false, false) => format!("{RED}off{RESET}"),
        };
        kv_line(category.title(), &state);
        println!("    {DIM}{}{RESET}", category.description());
        println!("    {DIM}e.g. {}{RESET}", category.examples().join(", "));
    }
    println!();
    if store.show_banner() {
        warning(
            "No cookie choice saved yet. Use `cookies accept-all`, `cookies reject-optional`, or `cookies save`.",
        );
    }
}

fn print_faq_entry(entry: &FaqEntry) {
    println!("  {BOLD}{}{RESET}", entry.question);
    println!("    {}", entry.answer);
}

// ── HTTP client ──────────────────────────────────────────────────────

struct Client {
    http: reqwest::Client,
    addr: String,
}

impl Client {
    fn new(addr: String) -> Self {
        let http = reqwest::Client::new();
        Self {
            http,
            addr: addr.trim_end_matches('/').to_owned(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.addr)
    }

    async fn post(&self, path: &str, body: &Value) -> Result<Value> {
        let url = self.url(path);
        debug!(%url, "POST");
        let resp = self
            .http
            .post(&url)
            .json(body)
            .send()
            .await
            .with_context(|| format!("request to {url} failed"))?;
        handle_response(resp).await
    }
}

async fn handle_response(resp: reqwest::Response) -> Result<Value> {
    let status = resp.status();
    let body = resp.text().await.context("failed to read response body")?;
    if !status.is_success() {
        let message = serde_json::from_str::<Value>(&body)
            .ok()
            .and_then(|v| v.get("error").and_then(Value::as_str).map(str::to_owned))
            .unwrap_or(body);
        bail!("server returned {status}: {message}");
    }
    if body.is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(&body).context("failed to parse response JSON")
}

// ── Command dispatch ─────────────────────────────────────────────────

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .without_time()
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!();
            eprintln!("  {RED}{BOLD}✗ Error:{RESET} {e:#}");
            eprintln!();
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Cookies { action } => cmd_cookies(&cli.profile, action).await,
        Commands::Faq { query } => {
            cmd_faq(&query);
            Ok(())
        }
        Commands::Contact {
            name,
            email,
            subject,
            category,
            message,
        } => {
            let form = ContactForm {
                name: Some(name),
                email: Some(email),
                subject: Some(subject),
                category: Some(category),
                message: Some(message),
            };
            cmd_contact(&Client::new(cli.addr), form).await
        }
        Commands::Subscribe { email } => cmd_subscribe(&Client::new(cli.addr), email).await,
    }
}

// ── Cookie commands ──────────────────────────────────────────────────

async fn cmd_cookies(profile: &str, action: CookieCommands) -> Result<()> {
    let storage = Arc::new(FileBackend::open(profile));
    let mut store = ConsentStore::load(storage).await;

    match action {
        CookieCommands::Show => {}
        CookieCommands::Set { category, state } => {
            let applied = store
                .set_one(category, state.enabled())
                .await
                .context("failed to save cookie preferences")?;
            if applied {
                success(&format!(
                    "{} turned {}",
                    category.title(),
                    if state.enabled() { "on" } else { "off" }
                ));
            } else {
                warning(&format!("{} are always on", category.title()));
            }
        }
        CookieCommands::AcceptAll => {
            store
                .accept_all()
                .await
                .context("failed to save cookie preferences")?;
            success("All cookies accepted. Enjoy the full experience!");
        }
        CookieCommands::RejectOptional => {
            store
                .reject_optional()
                .await
                .context("failed to save cookie preferences")?;
            success("Optional cookies rejected.");
        }
        CookieCommands::Save => {
            store
                .save()
                .await
                .context("failed to save cookie preferences")?;
            success("Preferences saved. Your choices are respected.");
        }
        CookieCommands::Reset => {
            store
                .reset()
                .await
                .context("failed to clear cookie preferences")?;
            success("Cookie preferences cleared.");
        }
    }

    println!();
    print_preferences(&store);
    Ok(())
}

// ── FAQ ──────────────────────────────────────────────────────────────

fn cmd_faq(query: &str) {
    let hits = faq::filter(faq::CATALOG, query);

    if hits.is_empty() {
        warning(&format!("No results for \"{query}\". Try different keywords or contact support."));
        return;
    }

    header("❓", &format!("Frequently Asked Questions ({} found)", hits.len()));

    for (category, entries) in faq::group_by_category(&hits) {
        println!();
        println!("{BOLD}{CYAN}{}{RESET} {DIM}({} questions){RESET}", category.name, entries.len());
        for entry in entries {
            print_faq_entry(entry);
        }
    }

    let unlisted: Vec<&FaqEntry> = hits
        .iter()
        .copied()
        .filter(|e| faq::CATEGORIES.iter().all(|c| c.id != e.category))
        .collect();
    if !unlisted.is_empty() {
        println!();
        println!("{BOLD}{CYAN}More{RESET} {DIM}({} questions){RESET}", unlisted.len());
        for entry in unlisted {
            print_faq_entry(entry);
        }
    }
}

// ── Relay commands ───────────────────────────────────────────────────

async fn cmd_contact(client: &Client, form: ContactForm) -> Result<()> {
    let message = form.validate(false)?;
    if let ContactCategory::Other(raw) = &message.category {
        warning(&format!("'{raw}' is not a category the contact form offers"));
    }

    let resp = client
        .post(
            "/api/contact",
            &json!({
                "name": message.name,
                "email": message.email,
                "subject": message.subject,
                "category": message.category.as_str(),
                "message": message.message,
            }),
        )
        .await?;

    success("Thank you! Your message has been sent. We'll respond within 24 hours.");
    kv_line("Category", message.category.label());
    if let Some(id) = resp.pointer("/data/id").and_then(Value::as_str) {
        kv_line("Reference", id);
    }
    Ok(())
}

async fn cmd_subscribe(client: &Client, email: String) -> Result<()> {
    let request = SubscribeForm { email: Some(email) }.validate()?;
    client
        .post("/api/subscribe", &json!({ "email": request.email }))
        .await?;
    success("Thank you for subscribing to our newsletter!");
    Ok(())
}
