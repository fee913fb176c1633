use std::{error::Error, io, process, time::Duration};

use clap::{command, Parser, ValueHint};
use log::{debug, error, info, LevelFilter};
use url::Url;

use tuneshelf::{
    client_id::ClientId,
    config::Config,
    error::ErrorKind,
    http,
    navigator::{self, Terminal},
    protocol::Playlist,
    render,
    session::{Outcome, Session},
    storage::FileStore,
};

/// Profile to display when not built in release mode.
#[cfg(debug_assertions)]
const BUILD_PROFILE: &str = "debug";
/// Profile to display when not built release mode.
#[cfg(not(debug_assertions))]
const BUILD_PROFILE: &str = "release";

/// Group name for mutually exclusive logging options.
const ARGS_GROUP_LOGGING: &str = "logging";

/// Command line arguments as parsed by `clap`.
#[derive(Clone, Debug, Default, Hash, PartialEq, Eq, PartialOrd, Ord, Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Page location to start from
    ///
    /// After authorizing in the browser, pass the full URL you were
    /// redirected to, including its `code` parameter.
    ///
    /// [default: root of the redirect URI]
    #[arg(short, long, value_name = "URL", value_hint = ValueHint::Url)]
    location: Option<String>,

    /// Spotify client ID
    ///
    /// Takes precedence over the client ID in the secrets file.
    #[arg(long, env = "TUNESHELF_CLIENT_ID")]
    client_id: Option<String>,

    /// Secrets file holding the client ID
    #[arg(short, long, value_name = "FILE", value_hint = ValueHint::FilePath, default_value_t = String::from("secrets.toml"))]
    secrets_file: String,

    /// State file
    ///
    /// Keeps the access token between runs. Ensure that this file is kept
    /// secure and not shared publicly, as it grants access to your Spotify
    /// account until the token expires.
    #[arg(long, value_name = "FILE", value_hint = ValueHint::FilePath, default_value_t = String::from("tuneshelf.json"))]
    state_file: String,

    /// Show the most popular tracks of a playlist
    #[arg(short, long, value_name = "PLAYLIST_ID")]
    tracks: Option<String>,

    /// Forget the stored token and exit
    #[arg(long, default_value_t = false)]
    logout: bool,

    /// Request timeout in seconds
    ///
    /// [default: no timeout]
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Suppresses all output except warnings and errors.
    #[arg(short, long, default_value_t = false, group = ARGS_GROUP_LOGGING)]
    quiet: bool,

    /// Enable verbose logging
    ///
    /// Specify twice for trace logging.
    #[arg(short, long, action = clap::ArgAction::Count, group = ARGS_GROUP_LOGGING)]
    verbose: u8,
}

/// Initializes the logger facade.
///
/// The logging level is determined as follows, in order of precedence from
/// highest to lowest:
/// 1. Command line arguments
/// 2. `RUST_LOG` environment variable
/// 3. Hard coded default
///
/// # Panics
///
/// Panics when a logger facade is already initialized.
fn init_logger(config: &Args) {
    let mut logger = env_logger::Builder::from_env(
        // Note: if you change the default logging level here, then you should
        // probably also change the verbosity levels below.
        env_logger::Env::default().filter_or(env_logger::DEFAULT_FILTER_ENV, "info"),
    );

    if config.quiet || config.verbose > 0 {
        let level = match config.verbose {
            // Quiet and verbose are mutually exclusive.
            0 => LevelFilter::Warn,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        };

        // Filter log messages of external crates.
        logger.filter_module("tuneshelf", level);
    }

    logger.init();
}

/// Loads the client ID from the command line or the secrets file.
fn load_client_id(args: &Args) -> tuneshelf::error::Result<ClientId> {
    if let Some(client_id) = &args.client_id {
        return client_id.parse();
    }

    let client_id = ClientId::from_file(&args.secrets_file);
    if let Err(ref e) = client_id {
        if e.kind == ErrorKind::NotFound {
            info!(
                "read the documentation on how to set your client ID in {}",
                args.secrets_file
            );
        }
    }

    client_id
}

/// Main application flow: one page load.
///
/// # Errors
///
/// This function returns an error when configuration cannot be loaded, the
/// state file cannot be used, or loading the library fails for any reason
/// other than an expired token.
async fn run(args: Args) -> Result<(), Box<dyn Error>> {
    let client_id = load_client_id(&args)?;

    let mut config = Config::with_client_id(client_id)?;
    config.request_timeout = args.timeout.map(Duration::from_secs);

    let location = match &args.location {
        Some(location) => Url::parse(location)?,
        None => navigator::root_of(&config.redirect_uri),
    };
    let mut navigator = Terminal::new(location);

    let store = FileStore::open(&args.state_file)?;
    let http_client = http::Client::new(&config)?;
    let mut session = Session::new(config, store, http_client);

    if args.logout {
        session.logout(&mut navigator)?;
        return Ok(());
    }

    let library = match session.bootstrap(&mut navigator).await? {
        Outcome::Loaded(library) => library,
        Outcome::Redirected => {
            info!("run again with --location set to the page you are redirected to");
            return Ok(());
        }
    };

    let mut out = io::stdout().lock();
    render::profile(&mut out, &library.profile)?;
    render::playlists(&mut out, &library.playlists)?;

    if let Some(playlist_id) = &args.tracks {
        let playlist = library
            .playlists
            .iter()
            .find(|playlist| &playlist.id == playlist_id)
            .cloned()
            .unwrap_or_else(|| Playlist {
                id: playlist_id.clone(),
                name: playlist_id.clone(),
                ..Playlist::default()
            });

        match session
            .popular_tracks(&library.token, playlist_id, &mut navigator)
            .await?
        {
            Outcome::Loaded(tracks) => render::popular_tracks(&mut out, &playlist, &tracks)?,
            Outcome::Redirected => {
                info!("run again with --location set to the page you are redirected to");
            }
        }
    }

    Ok(())
}

/// Main entry point of the application.
///
/// This function initializes the logger facade, parses the command line
/// arguments, and runs a single page load.
#[tokio::main]
async fn main() {
    // `clap` handles our command line arguments and help text.
    let args = Args::parse();
    init_logger(&args);

    // Dump command line arguments before we do anything more.
    // This aids in debugging of whatever comes next.
    debug!("Command {:#?}", args);

    let cmd = command!();
    let name = cmd.get_name().to_string();
    let version = cmd.get_version().unwrap_or("UNKNOWN").to_string();

    info!("starting {name}/{version}; {BUILD_PROFILE}");

    if let Err(e) = run(args).await {
        error!("{e}");
        eprintln!("Error: {e}");
        process::exit(1);
    }
}
