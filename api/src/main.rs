use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::SystemTime;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use lexisium_api::{entry, repl, ApiClient, ApiConfig, FileTokenStore, Word, WordStatus};
use lexisium_core::{AdminSession, Category, CategoryForm, KeyboardInput, WordForm};

#[derive(Parser)]
#[command(name = "lexisium")]
#[command(about = "Virtual keyboards and admin tools for the Lexisium dictionary")]
#[command(version)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log debug output to stderr (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print every keyboard layout
    Layouts,
    /// Type with a virtual keyboard, reading key labels from stdin
    Type {
        #[arg(short, long, default_value = "urdu")]
        layout: String,
    },
    /// List categories
    Categories {
        /// Search instead of listing all
        #[arg(short, long)]
        query: Option<String>,
    },
    /// List words
    Words {
        #[arg(long, value_enum)]
        status: Option<StatusArg>,
        #[arg(long)]
        category: Option<String>,
    },
    /// Search words
    Search {
        query: String,
        /// Only approved words, as the public explorer shows them
        #[arg(long)]
        approved: bool,
    },
    /// Log in as admin; the password is read from LEXISIUM_PASSWORD or stdin
    Login { username: String },
    Logout,
    /// Approve a pending or hidden word
    Approve { id: String },
    /// Hide a word from the public explorer
    Hide { id: String },
    /// Move a word to another category
    Move { id: String, category: String },
    DeleteWord { id: String },
    DeleteCategory { id: String },
    /// Add a word to a category, typing each field on its own keyboard
    AddWord {
        #[arg(long)]
        category: String,
        #[arg(long)]
        image: Option<PathBuf>,
        #[arg(long)]
        audio: Option<PathBuf>,
    },
    /// Edit a word; empty input keeps a field as it is
    EditWord {
        id: String,
        /// Move the word to this category as well
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        image: Option<PathBuf>,
        #[arg(long)]
        audio: Option<PathBuf>,
    },
    AddCategory {
        #[arg(long)]
        image: Option<PathBuf>,
    },
    EditCategory {
        id: String,
        #[arg(long)]
        image: Option<PathBuf>,
    },
}

#[derive(clap::ValueEnum, Clone, Copy)]
enum StatusArg {
    Pending,
    Approved,
    Hidden,
}

impl From<StatusArg> for WordStatus {
    fn from(arg: StatusArg) -> Self {
        match arg {
            StatusArg::Pending => WordStatus::Pending,
            StatusArg::Approved => WordStatus::Approved,
            StatusArg::Hidden => WordStatus::Hidden,
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "warn" }));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn load_config(path: Option<&PathBuf>) -> Result<ApiConfig> {
    match path {
        Some(path) => ApiConfig::load_toml(path)
            .with_context(|| format!("failed to load config {}", path.display())),
        None => Ok(ApiConfig::default()),
    }
}

fn open_client(config: &ApiConfig) -> Result<ApiClient<FileTokenStore>> {
    let token_path = config
        .token_path
        .clone()
        .unwrap_or_else(lexisium_api::default_token_path);
    let session = AdminSession::restore(
        FileTokenStore::new(token_path),
        config.base().token_ttl(),
        SystemTime::now(),
    )?;
    let mut client = ApiClient::new(config, session)?;
    client.check_session(SystemTime::now())?;
    Ok(client)
}

/// Upload `form` as a new word or over `existing`. False if the user backed out.
fn submit_word(client: &mut ApiClient<FileTokenStore>, form: &WordForm, existing: Option<&str>) -> Result<bool> {
    let stdin = io::stdin();
    let mut stderr = io::stderr();
    let Some(draft) = entry::resolve_submit(form, &mut stdin.lock(), &mut stderr)? else {
        return Ok(false);
    };
    match existing {
        Some(id) => client.update_word(id, &draft)?,
        None => client.add_word(&draft)?,
    }
    Ok(true)
}

fn print_categories(categories: &[Category]) {
    if categories.is_empty() {
        println!("  → (no categories)");
    }
    for c in categories {
        println!("{}  {}", c.id, c.name);
        if !c.description.is_empty() {
            println!("    {}", c.description);
        }
    }
}

fn print_words(words: &[Word]) {
    if words.is_empty() {
        println!("  → (no words)");
    }
    for w in words {
        let category = w.category.as_ref().and_then(|c| c.name()).unwrap_or("-");
        println!("{}  {}  [{}]  ({})", w.id, w.word, w.status, category);
        let t = &w.translation;
        for (label, text) in [("English", &t.english), ("Urdu", &t.urdu), ("Roman", &t.roman)] {
            if !text.is_empty() {
                println!("    {}: {}", label, text);
            }
        }
    }
}

fn read_password() -> Result<String> {
    if let Ok(password) = std::env::var("LEXISIUM_PASSWORD") {
        return Ok(password);
    }
    eprint!("Password: ");
    io::stderr().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let config = load_config(cli.config.as_ref())?;

    match cli.command {
        Commands::Layouts => {
            let layouts = config.base().layout_set()?;
            for layout in layouts.iter() {
                let marker = if layout.id == layouts.default_id() { " (default)" } else { "" };
                println!("{}{}", layout.title(), marker);
                for row in &layout.rows {
                    println!("  {}", row.join(" "));
                }
                println!();
            }
        }
        Commands::Type { layout } => {
            let layouts = Arc::new(config.base().layout_set()?);
            let mut input = KeyboardInput::new(layouts, &layout);
            input.toggle_keyboard();
            eprintln!("Type key labels separated by spaces; ':show' prints the keyboard. Ctrl-D to exit.");
            let stdin = io::stdin();
            let mut stdout = io::stdout();
            let value = repl::run(&mut input, stdin.lock(), &mut stdout)?;
            println!("{}", value);
        }
        Commands::Categories { query } => {
            let mut client = open_client(&config)?;
            let categories = match query {
                Some(q) => client.search_categories(&q)?,
                None => client.categories()?,
            };
            print_categories(&categories);
        }
        Commands::Words { status, category } => {
            let mut client = open_client(&config)?;
            let words = match (status, category) {
                (_, Some(category)) => client.words_by_category(&category)?,
                (Some(status), None) => client.words_with_status(status.into())?,
                (None, None) => client.words()?,
            };
            print_words(&words);
        }
        Commands::Search { query, approved } => {
            let mut client = open_client(&config)?;
            let words = if approved {
                client.search_approved_words(&query)?
            } else {
                client.search_words(&query)?
            };
            print_words(&words);
        }
        Commands::Login { username } => {
            let mut client = open_client(&config)?;
            let password = read_password()?;
            client
                .login(&username, &password, SystemTime::now())
                .context("login failed")?;
            println!("Login successful");
        }
        Commands::Logout => {
            let mut client = open_client(&config)?;
            client.logout()?;
            println!("Logged out");
        }
        Commands::Approve { id } => {
            open_client(&config)?.approve_word(&id)?;
            println!("Word {} approved", id);
        }
        Commands::Hide { id } => {
            open_client(&config)?.hide_word(&id)?;
            println!("Word {} hidden", id);
        }
        Commands::Move { id, category } => {
            open_client(&config)?.move_word(&id, &category)?;
            println!("Word {} moved to {}", id, category);
        }
        Commands::DeleteWord { id } => {
            open_client(&config)?.delete_word(&id)?;
            println!("Word {} deleted", id);
        }
        Commands::DeleteCategory { id } => {
            open_client(&config)?.delete_category(&id)?;
            println!("Category {} deleted", id);
        }
        Commands::AddWord { category, image, audio } => {
            let mut client = open_client(&config)?;
            let mut form = WordForm::new(Arc::new(config.base().layout_set()?));
            form.set_category(Some(category));
            entry::fill_word_form(&mut form, &mut io::stdin().lock(), &mut io::stderr())?;
            entry::attach_word_media(&mut form, image, audio)?;
            if submit_word(&mut client, &form, None)? {
                println!("Word added");
            } else {
                println!("Nothing submitted");
            }
        }
        Commands::EditWord { id, category, image, audio } => {
            let mut client = open_client(&config)?;
            let word = client
                .words()?
                .into_iter()
                .find(|w| w.id == id)
                .with_context(|| format!("no word with id {}", id))?;
            let mut form = WordForm::from_word(Arc::new(config.base().layout_set()?), &word);
            if category.is_some() {
                form.set_category(category);
            }
            entry::fill_word_form(&mut form, &mut io::stdin().lock(), &mut io::stderr())?;
            entry::attach_word_media(&mut form, image, audio)?;
            if submit_word(&mut client, &form, Some(&id))? {
                println!("Word {} updated", id);
            } else {
                println!("Nothing submitted");
            }
        }
        Commands::AddCategory { image } => {
            let mut client = open_client(&config)?;
            let mut form = CategoryForm::new(Arc::new(config.base().layout_set()?));
            entry::fill_category_form(&mut form, &mut io::stdin().lock(), &mut io::stderr())?;
            entry::attach_category_image(&mut form, image)?;
            client.add_category(&form.prepare()?)?;
            println!("Category added");
        }
        Commands::EditCategory { id, image } => {
            let mut client = open_client(&config)?;
            let category = client
                .categories()?
                .into_iter()
                .find(|c| c.id == id)
                .with_context(|| format!("no category with id {}", id))?;
            let mut form = CategoryForm::from_category(Arc::new(config.base().layout_set()?), &category);
            entry::fill_category_form(&mut form, &mut io::stdin().lock(), &mut io::stderr())?;
            entry::attach_category_image(&mut form, image)?;
            client.update_category(&id, &form.prepare()?)?;
            println!("Category {} updated", id);
        }
    }
    Ok(())
}
