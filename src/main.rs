use clap::{Parser, Subcommand, ValueEnum};
use lotto_picture::config::Config;
use lotto_picture::display::impl_console::DisplayConsole;
use lotto_picture::display::impl_gui::{run_gui, DisplayGui};
use lotto_picture::display::interface::Display;
use lotto_picture::library::logger::impl_console::LoggerConsole;
use lotto_picture::library::logger::interface::Logger;
use lotto_picture::lotto::selector::random_numbers;
use lotto_picture::lotto_picture::core::Msg;
use lotto_picture::lotto_picture::main::LottoPicture;
use lotto_picture::lotto_picture::render::balls;
use lotto_picture::lotto_picture::share::share_text;
use lotto_picture::lotto_picture::text::{error_message, format_timestamp, text, Text};
use lotto_picture::scorer::impl_fake::ScorerFake;
use lotto_picture::scorer::impl_tract::ScorerTract;
use lotto_picture::scorer::interface::Scorer;
use lotto_picture::storage::impl_fake::StorageFake;
use lotto_picture::storage::impl_file::StorageFile;
use lotto_picture::storage::interface::Storage;
use lotto_picture::store::{
    in_memory_copy, load_state, save_state, AppState, Language, PreferencesPatch, Theme,
};
use lotto_picture::upload::read_upload;
use std::error::Error;
use std::io::IsTerminal;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

#[derive(Parser)]
#[command(name = "lotto-picture")]
#[command(version)]
#[command(about = "Turn a photo into six lotto numbers with an image classifier")]
struct Cli {
    /// Model location: a path, a file:// URL or a directory holding model.onnx
    #[arg(long, global = true)]
    model: Option<String>,

    /// Directory for saved history and preferences
    #[arg(long, global = true)]
    storage_dir: Option<PathBuf>,

    /// Score with random probabilities instead of a model
    #[arg(long, global = true)]
    fake_scorer: bool,

    /// Print info logs
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the desktop window
    Gui,

    /// Generate numbers from an image file
    Pick {
        image: PathBuf,

        /// Keep the result out of the saved history
        #[arg(long)]
        no_save: bool,
    },

    /// Draw six numbers without an image
    Random,

    /// Show saved predictions
    History,

    /// Delete saved predictions
    Clear,

    /// Show or change preferences
    Prefs {
        #[arg(long)]
        theme: Option<ThemeArg>,

        #[arg(long)]
        language: Option<LanguageArg>,

        #[arg(long)]
        save_history: Option<bool>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ThemeArg {
    Light,
    Dark,
    System,
}

impl From<ThemeArg> for Theme {
    fn from(theme: ThemeArg) -> Self {
        match theme {
            ThemeArg::Light => Theme::Light,
            ThemeArg::Dark => Theme::Dark,
            ThemeArg::System => Theme::System,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum LanguageArg {
    Ko,
    En,
}

impl From<LanguageArg> for Language {
    fn from(language: LanguageArg) -> Self {
        match language {
            LanguageArg::Ko => Language::Ko,
            LanguageArg::En => Language::En,
        }
    }
}

type BoxError = Box<dyn Error + Send + Sync>;

fn main() -> Result<(), BoxError> {
    let cli = Cli::parse();

    let mut config = Config::from_env();
    if let Some(model) = cli.model {
        config.model.model_url = model;
    }
    if let Some(storage_dir) = cli.storage_dir {
        config.storage_dir = storage_dir;
    }

    let logger: Arc<dyn Logger + Send + Sync> =
        Arc::new(LoggerConsole::new(config.logger_timezone).with_verbose(cli.verbose));
    let storage: Arc<dyn Storage + Send + Sync> =
        Arc::new(StorageFile::new(config.storage_dir.clone(), logger.clone()));

    match cli.command {
        Commands::Gui => {
            let scorer = scorer(&config, cli.fake_scorer, logger.clone());
            gui(config, logger, scorer, storage)
        }
        Commands::Pick { image, no_save } => {
            let scorer = scorer(&config, cli.fake_scorer, logger.clone());
            let storage: Arc<dyn Storage + Send + Sync> = if no_save {
                match in_memory_copy(storage.as_ref()) {
                    Ok(copy) => Arc::new(copy),
                    Err(e) => {
                        let _ = logger.error(&format!("Failed to load saved state: {}", e));
                        Arc::new(StorageFake::new())
                    }
                }
            } else {
                storage
            };
            pick(config, logger, scorer, storage, image)
        }
        Commands::Random => {
            let numbers = random_numbers(&mut rand::rng());
            let console = DisplayConsole::new(std::io::stdout().is_terminal());
            println!("{}", console.balls_line(&balls(&numbers)));
            Ok(())
        }
        Commands::History => history(&config, storage.as_ref()),
        Commands::Clear => {
            let mut state = load_state(storage.as_ref())?.unwrap_or_default();
            state.predictions.clear();
            save_state(storage.as_ref(), &state)?;
            println!("{}", text(state.preferences.language, Text::HistoryEmpty));
            Ok(())
        }
        Commands::Prefs {
            theme,
            language,
            save_history,
        } => {
            let patch = PreferencesPatch {
                theme: theme.map(Theme::from),
                language: language.map(Language::from),
                save_history,
            };
            let mut app = AppState::default();
            if let Some(stored) = load_state(storage.as_ref())? {
                app.restore(stored);
            }
            if !patch.is_empty() {
                app.update_preferences(&patch);
                save_state(storage.as_ref(), &app.persisted())?;
            }
            println!("{}", serde_json::to_string_pretty(&app.preferences)?);
            Ok(())
        }
    }
}

fn scorer(
    config: &Config,
    fake: bool,
    logger: Arc<dyn Logger + Send + Sync>,
) -> Arc<dyn Scorer + Send + Sync> {
    if fake {
        Arc::new(ScorerFake::new(logger))
    } else {
        Arc::new(ScorerTract::new(config.model.clone(), logger))
    }
}

fn gui(
    config: Config,
    logger: Arc<dyn Logger + Send + Sync>,
    scorer: Arc<dyn Scorer + Send + Sync>,
    storage: Arc<dyn Storage + Send + Sync>,
) -> Result<(), BoxError> {
    let display = DisplayGui::new();
    let shared_display: Arc<Mutex<dyn Display + Send + Sync>> =
        Arc::new(Mutex::new(display.clone()));
    let app = LottoPicture::new(config, logger, scorer, storage, shared_display);
    let sender = app.sender();

    let run_loop = std::thread::spawn(move || app.run().map(|_| ()));

    let shown = run_gui(&display, "Lotto Picture", sender.clone());
    let _ = sender.send(Msg::Shutdown);

    let stopped = run_loop
        .join()
        .map_err(|_| "run loop panicked".to_string())?;
    shown?;
    stopped
}

fn pick(
    config: Config,
    logger: Arc<dyn Logger + Send + Sync>,
    scorer: Arc<dyn Scorer + Send + Sync>,
    storage: Arc<dyn Storage + Send + Sync>,
    image: PathBuf,
) -> Result<(), BoxError> {
    let bytes = read_upload(&image)?;
    let console: Arc<Mutex<dyn Display + Send + Sync>> = Arc::new(Mutex::new(
        DisplayConsole::new(std::io::stdout().is_terminal()),
    ));
    let app = LottoPicture::new(config, logger, scorer, storage, console);

    let sender = app.sender();
    sender.send(Msg::ImageSelected { bytes })?;
    sender.send(Msg::Generate)?;

    let model = app.run_until(|model| {
        (model.current.is_some() || model.app.error.is_some()) && model.is_settled()
    })?;

    let language = model.app.preferences.language;
    match (model.current, model.app.error) {
        (_, Some(error)) => Err(error_message(language, &error).into()),
        (Some(prediction), None) => {
            println!("{}", share_text(language, &prediction.numbers));
            Ok(())
        }
        (None, None) => Err("no prediction was produced".into()),
    }
}

fn history(config: &Config, storage: &dyn Storage) -> Result<(), BoxError> {
    let state = load_state(storage)?.unwrap_or_default();
    let language = state.preferences.language;

    if state.predictions.is_empty() {
        println!("{}", text(language, Text::HistoryEmpty));
        return Ok(());
    }

    let console = DisplayConsole::new(std::io::stdout().is_terminal());
    for prediction in &state.predictions {
        println!(
            "{}  {}  {}%",
            format_timestamp(language, prediction.timestamp, config.logger_timezone),
            console.balls_line(&balls(&prediction.numbers)),
            prediction.confidence_percent()
        );
    }
    Ok(())
}
