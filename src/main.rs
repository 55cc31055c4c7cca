use booktracker::form::{Field, SubmitBlocked};
use booktracker::list::ListIntent;
use booktracker::prompt::{AssumeYes, Confirm, LinePrompt};
use booktracker::{BookId, Config, DeleteOutcome, ListQuery, RemoteBooks, Shell};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use eyre::{Context, Result, eyre};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "booktracker")]
#[command(about = "Book Tracker CLI - keep track of your books through a REST API")]
#[command(version = env!("GIT_DESCRIBE"))]
struct Cli {
    /// URL of the books collection endpoint (overrides the config file)
    #[arg(short, long, global = true)]
    base_url: Option<String>,

    /// Path to the config file (default: <config_dir>/booktracker/config.yml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List books, optionally filtered by the server
    List {
        /// Search in title or author
        #[arg(long)]
        search: Option<String>,

        /// Filter by genre
        #[arg(long)]
        genre: Option<String>,

        /// Filter by author
        #[arg(long)]
        author: Option<String>,
    },

    /// Show the details of one book
    Show { id: i64 },

    /// Add a new book
    Add(BookArgs),

    /// Edit an existing book; omitted fields keep their current value
    Edit {
        id: i64,

        #[command(flatten)]
        book: BookArgs,

        /// Remove the publication date
        #[arg(long, conflicts_with = "published")]
        clear_published: bool,

        /// Remove the genre
        #[arg(long, conflicts_with = "genre")]
        clear_genre: bool,
    },

    /// Delete a book
    Delete {
        id: i64,

        /// Do not ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Args)]
struct BookArgs {
    #[arg(long)]
    title: Option<String>,

    #[arg(long)]
    author: Option<String>,

    /// Publication date (YYYY-MM-DD)
    #[arg(long)]
    published: Option<String>,

    #[arg(long)]
    genre: Option<String>,
}

impl Commands {
    /// Query for the initial load; `list` filters on the server directly
    fn mount_query(&self) -> ListQuery {
        match self {
            Commands::List { search, genre, author } => ListQuery {
                search: search.clone(),
                genre: genre.clone(),
                author: author.clone(),
            },
            _ => ListQuery::default(),
        }
    }

    /// Whether the command cannot run without the loaded collection
    fn needs_collection(&self) -> bool {
        matches!(self, Commands::List { .. } | Commands::Edit { .. })
    }
}

impl BookArgs {
    fn fields(self) -> [(Field, Option<String>); 4] {
        [
            (Field::Title, self.title),
            (Field::Author, self.author),
            (Field::PublishedDate, self.published),
            (Field::Genre, self.genre),
        ]
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(cli: &Cli) -> Result<Config> {
    let config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;
    match &cli.base_url {
        Some(base_url) => config.with_base_url(base_url).context("Invalid --base-url"),
        None => Ok(config),
    }
}

fn today() -> chrono::NaiveDate {
    chrono::Local::now().date_naive()
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = load_config(&cli)?;
    let remote = RemoteBooks::new(&config).context("Failed to create HTTP client")?;
    let mut shell = Shell::new(remote);

    // Mount: every command starts from a load
    let loaded = shell.load_with(&cli.command.mount_query()).await;
    if !loaded {
        if cli.command.needs_collection() {
            return Err(failure(&shell));
        }
        if let Some(error) = shell.error() {
            eprintln!("{} {}", "warning:".yellow().bold(), error);
        }
    }

    match cli.command {
        Commands::List { .. } => {}
        Commands::Show { id } => {
            let id = BookId(id);
            let found = shell.show_details(id).await;
            if let Some(details) = shell.detail().render() {
                print!("{}", details);
            }
            if !found {
                return Err(eyre!("Book {} could not be loaded", id));
            }
            return Ok(());
        }
        Commands::Add(book) => {
            for (field, value) in book.fields() {
                if let Some(value) = value {
                    shell.form_mut().set(field, value);
                }
            }
            submit(&mut shell).await?;
        }
        Commands::Edit {
            id,
            book,
            clear_published,
            clear_genre,
        } => {
            let id = BookId(id);
            let current = shell
                .book(id)
                .cloned()
                .ok_or_else(|| eyre!("Book {} not found", id))?;
            let mut confirm = AssumeYes;
            shell.handle_intent(ListIntent::Edit(current), &mut confirm).await;

            for (field, value) in book.fields() {
                if let Some(value) = value {
                    shell.form_mut().set(field, value);
                }
            }
            if clear_published {
                shell.form_mut().set(Field::PublishedDate, "");
            }
            if clear_genre {
                shell.form_mut().set(Field::Genre, "");
            }
            submit(&mut shell).await?;
        }
        Commands::Delete { id, yes } => {
            let mut confirm: Box<dyn Confirm> = if yes {
                Box::new(AssumeYes)
            } else {
                Box::new(LinePrompt::stdio())
            };
            match shell.delete(BookId(id), &mut confirm).await {
                DeleteOutcome::Deleted => println!("Book deleted successfully\n"),
                DeleteOutcome::Declined => return Ok(()),
                DeleteOutcome::Failed => return Err(failure(&shell)),
            }
        }
    }

    if loaded {
        print!("{}", shell.render());
    }
    Ok(())
}

async fn submit(shell: &mut Shell<RemoteBooks>) -> Result<()> {
    match shell.submit_form(today()).await {
        Ok(Some(book)) => {
            println!("Saved \"{}\" as #{}\n", book.title, book.id);
            Ok(())
        }
        Ok(None) => Err(failure(shell)),
        Err(SubmitBlocked::Invalid(errors)) => {
            eprint!("{}", shell.form().render());
            Err(eyre!(errors.messages().join("; ")))
        }
        Err(SubmitBlocked::InFlight) => Err(eyre!("A submission is already in progress")),
    }
}

fn failure(shell: &Shell<RemoteBooks>) -> eyre::Report {
    eyre!(shell.error().unwrap_or("Request failed").to_string())
}
