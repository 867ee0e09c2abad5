use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use tsuiseki_api::shikimori::ShikimoriClient;
use tsuiseki_core::config::AppConfig;
use tsuiseki_core::preferences::SqlitePreferences;
use tsuiseki_core::shikimori::{Shikimori, ShikimoriStatus};
use tsuiseki_core::{Track, TrackSearch, TrackService};

type Tracker = Shikimori<ShikimoriClient, SqlitePreferences>;

#[derive(Parser)]
#[command(
    name = "tsuiseki",
    version,
    about = "Sync manga reading progress with Shikimori"
)]
struct Opts {
    /// Config file to use instead of the per-user one.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Write the default config file if there is none and print its path.
    InitConfig,
    /// Print the OAuth consent URL.
    AuthUrl,
    /// Log in with an authorization code.
    Login {
        #[arg(long)]
        code: Option<String>,
    },
    Logout,
    /// Show whether a Shikimori account is connected.
    Status,
    Search { query: String },
    /// Attach a title to the library, creating the entry if needed.
    Bind {
        media_id: i64,
        #[arg(long, default_value = "")]
        title: String,
    },
    /// Show the library entry for a title.
    Refresh { media_id: i64 },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("tsuiseki=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let opts = Opts::parse();

    let config = match &opts.config {
        Some(path) => AppConfig::load_from(path)?,
        None => AppConfig::load()?,
    };
    if !config.shikimori.has_credentials() {
        tracing::warn!(
            path = %AppConfig::config_path().display(),
            "client_id/client_secret are not set; OAuth calls will be rejected"
        );
    }

    let prefs = Arc::new(SqlitePreferences::open(&AppConfig::ensure_prefs_path()?)?);
    let client = ShikimoriClient::new(config.shikimori.client_config());
    let tracker = Shikimori::new(config.shikimori.tracker_id, client, prefs);

    match opts.command {
        Command::InitConfig => {
            let path = AppConfig::config_path();
            if path.exists() {
                println!("Config already exists at {}", path.display());
            } else {
                AppConfig::default().save()?;
                println!("Wrote default config to {}", path.display());
            }
        }
        Command::AuthUrl => println!("{}", tracker.auth_url()?),
        Command::Login { code } => login(&tracker, code).await?,
        Command::Logout => {
            tracker.logout();
            println!("Logged out.");
        }
        Command::Status => match tracker.username() {
            Some(user_id) if tracker.is_logged() => {
                println!("Logged in to {} as user {user_id}", tracker.name())
            }
            _ => println!("Not logged in to {}", tracker.name()),
        },
        Command::Search { query } => {
            let results = tracker.search(&query).await?;
            if results.is_empty() {
                println!("No results.");
            }
            for result in &results {
                print_result(result);
            }
        }
        Command::Bind { media_id, title } => {
            let mut track = Track::new(tracker.id(), media_id, title);
            track.status = ShikimoriStatus::Reading.code();
            tracker.bind(&mut track).await?;
            match track.library_id {
                Some(id) => println!("Library entry {id} for title {media_id}"),
                None => println!("Title {media_id} was not added"),
            }
            print!("{}", progress(&tracker, &track));
        }
        Command::Refresh { media_id } => {
            let blank = Track::new(tracker.id(), media_id, "");
            let mut track = blank.clone();
            tracker.refresh(&mut track).await?;
            print!("{}", refresh_report(&tracker, &blank, &track));
        }
    }

    Ok(())
}

async fn login(tracker: &Tracker, code: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let code = match code {
        Some(code) => code,
        None => {
            let url = tracker.auth_url()?;
            println!("Authorize tsuiseki at:\n  {url}");
            if let Err(e) = open::that(&url) {
                tracing::debug!(error = %e, "could not open browser");
            }
            print!("Authorization code: ");
            io::stdout().flush()?;

            let mut line = String::new();
            io::stdin().lock().read_line(&mut line)?;
            line.trim().to_string()
        }
    };

    if code.is_empty() {
        return Err("no authorization code given".into());
    }

    tracker.login_with_code(&code).await?;
    println!(
        "Logged in to {} as user {}",
        tracker.name(),
        tracker.username().unwrap_or_default()
    );
    Ok(())
}

fn print_result(result: &TrackSearch) {
    let track = &result.track;
    let chapters = match track.total_chapters {
        0 => "?".to_string(),
        n => n.to_string(),
    };
    println!(
        "{:>8}  {}  [{}, {}, {chapters} ch]",
        track.media_id, track.title, result.publishing_type, result.publishing_status
    );
    if !track.tracking_url.is_empty() {
        println!("          {}", track.tracking_url);
    }
}

/// Refresh never sets `library_id`, so a found entry shows up only as a
/// change to the personal fields (a remote status is never 0).
fn refresh_report(tracker: &Tracker, blank: &Track, track: &Track) -> String {
    if track == blank {
        format!("No remote entry for title {}\n", track.media_id)
    } else {
        format!(
            "Remote entry for title {}\n{}",
            track.media_id,
            progress(tracker, track)
        )
    }
}

fn progress(tracker: &Tracker, track: &Track) -> String {
    format!(
        "  status:   {}\n  chapters: {} / {}\n  score:    {}\n",
        tracker.status(track.status),
        track.last_chapter_read,
        track.total_chapters,
        tracker.display_score(track)
    )
}
