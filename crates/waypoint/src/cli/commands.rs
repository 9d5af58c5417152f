use super::render::{print_location_detail, print_messages, print_result};
use super::setup::{Cli, Commands, LocationArgs, QuizCommands, RemoteCommands};
use clap::Parser;
use std::io::{self, BufRead, IsTerminal, Write};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;
use waypointapp::api::WaypointApi;
use waypointapp::commands::helpers::Pin;
use waypointapp::commands::update::LocationEdit;
use waypointapp::commands::{CmdMessage, CmdResult};
use waypointapp::config::WaypointConfig;
use waypointapp::draft::{markdown_to_html, LocationDraft, QuestionDraft};
use waypointapp::error::Result;
use waypointapp::init::initialize;
use waypointapp::session::StartupSource;
use waypointapp::store::fs_backend::FsBackend;

type Api = WaypointApi<FsBackend>;

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    // The template needs no data directory
    if let Some(Commands::Config { template: true }) = &cli.command {
        print!("{}", WaypointConfig::template());
        return Ok(());
    }

    let ctx = initialize(cli.data.clone(), cli.launch.as_deref())?;
    let mut api = ctx.api;
    print_startup(&api);

    let command = cli.command.unwrap_or(Commands::List { query: None });
    if !matches!(command, Commands::Tour { .. }) && !api.tour_seen()? {
        print_messages(&[CmdMessage::info(
            "New here? `waypoint tour` walks through the basics.",
        )]);
    }

    dispatch(&mut api, command)
}

fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if verbose { "waypoint=debug,waypointapp=debug" } else { "warn" })
    });
    // A subscriber may already be installed when running under a test harness
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .without_time()
        .try_init();
}

fn print_startup(api: &Api) {
    let startup = api.startup();
    let mut messages = Vec::new();
    if let Some(reason) = &startup.remote_error {
        messages.push(CmdMessage::warning(format!(
            "Remote artifact unavailable ({}); using local data",
            reason
        )));
    }
    match &startup.source {
        StartupSource::Cleared { reason } => messages.push(CmdMessage::warning(format!(
            "Stored locations could not be read and were cleared: {}",
            reason
        ))),
        StartupSource::Remote => messages.push(CmdMessage::info(format!(
            "Loaded {} location(s) from the remote artifact",
            startup.count
        ))),
        StartupSource::Stored | StartupSource::Empty => {}
    }
    print_messages(&messages);
}

fn dispatch(api: &mut Api, command: Commands) -> Result<()> {
    tracing::debug!(?command, "dispatching");
    let result = match command {
        Commands::List { query } => api.list(query.as_deref())?,
        Commands::View { location } => {
            let result = api.show(&location)?;
            for entry in &result.listed_locations {
                print_location_detail(entry);
            }
            print_messages(&result.messages);
            return Ok(());
        }
        Commands::Add { fields } => {
            let (draft, pin) = build_draft(fields);
            api.add(draft, pin)?
        }
        Commands::Edit { location, fields } => api.edit(&location, build_edit(fields))?,
        Commands::Delete { location } => api.delete(&location)?,
        Commands::Move { from, to, filter } => api.move_location(from, to, filter.as_deref())?,
        Commands::Quiz { action } => match action {
            QuizCommands::Add {
                location,
                text,
                kind,
                answer,
                options,
                block_navigation,
            } => {
                let question = QuestionDraft::new(text, kind.into(), answer).with_options(options);
                api.add_question(&location, question, block_navigation.then_some(true))?
            }
            QuizCommands::Remove { location, number } => api.remove_question(&location, number)?,
        },
        Commands::Place { query: Some(query) } => api.search_places(&query)?,
        Commands::Place { query: None } => return interactive_search(api),
        Commands::Import { file, yes } => {
            let preview = api.import_preview(&file)?;
            if !confirm(&preview, yes, "Replace the collection?")? {
                return Ok(());
            }
            api.import(&file)?
        }
        Commands::Export { file } => api.export(file.as_deref())?,
        Commands::Clear { yes } => {
            let preview = api.clear_preview()?;
            if !confirm(&preview, yes, "Remove every location?")? {
                return Ok(());
            }
            api.clear()?
        }
        Commands::Remote { action } => match action {
            RemoteCommands::Load => api.remote_load()?,
            RemoteCommands::Save => api.remote_save()?,
        },
        Commands::Lang { code } => api.language(code.as_deref())?,
        Commands::Tour { reset } => api.tour(reset)?,
        Commands::Config { .. } => api.show_config()?,
    };

    print_result(&result);
    Ok(())
}

fn build_pin(fields: &LocationArgs) -> Option<Pin> {
    match (&fields.at, &fields.place) {
        (Some(coordinates), _) => Some(Pin::At(*coordinates)),
        (None, Some(place)) => Some(Pin::Place(place.clone())),
        (None, None) => None,
    }
}

fn description(fields: &LocationArgs) -> Option<String> {
    match (&fields.description, &fields.markdown) {
        (Some(html), _) => Some(html.clone()),
        (None, Some(markdown)) => Some(markdown_to_html(markdown)),
        (None, None) => None,
    }
}

fn build_draft(fields: LocationArgs) -> (LocationDraft, Option<Pin>) {
    let pin = build_pin(&fields);
    let description = description(&fields).unwrap_or_default();
    let draft = LocationDraft {
        title: fields.title.unwrap_or_default(),
        description,
        image: fields.image.unwrap_or_default(),
        video: fields.video.filter(|v| !v.trim().is_empty()),
        audio: fields.audio.filter(|a| !a.trim().is_empty()),
        country: fields.country,
        ..Default::default()
    };
    (draft, pin)
}

fn build_edit(fields: LocationArgs) -> LocationEdit {
    LocationEdit {
        pin: build_pin(&fields),
        description: description(&fields),
        title: fields.title,
        image: fields.image,
        video: fields.video,
        audio: fields.audio,
        country: fields.country,
    }
}

/// Shows `preview` and asks on stdin unless `yes`. A preview with errors is never confirmed.
fn confirm(preview: &CmdResult, yes: bool, question: &str) -> Result<bool> {
    print_result(preview);
    if preview.has_errors() {
        return Ok(false);
    }
    if yes {
        return Ok(true);
    }

    print!("{} [y/N] ", question);
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    let accepted = matches!(answer.trim().to_lowercase().as_str(), "y" | "yes");
    if !accepted {
        print_messages(&[CmdMessage::info("Nothing changed")]);
    }
    Ok(accepted)
}

/// How often the interactive search checks whether the debounce window has passed.
const SEARCH_TICK: Duration = Duration::from_millis(25);

/// Searches as queries arrive on stdin, once input has been quiet for the debounce
/// window. A query replaced within the window is dropped. An empty line or end of input
/// quits after the pending search runs.
fn interactive_search(api: &mut Api) -> Result<()> {
    let prompt = io::stdin().is_terminal();
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            if tx.send(line).is_err() {
                break;
            }
        }
    });

    if prompt {
        show_prompt()?;
    }
    loop {
        match rx.recv_timeout(SEARCH_TICK) {
            Ok(line) => {
                let line = line?;
                let query = line.trim();
                if query.is_empty() {
                    break;
                }
                api.type_search(query, Instant::now());
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }
        if let Some(result) = api.poll_search(Instant::now()) {
            print_result(&result?);
            if prompt {
                show_prompt()?;
            }
        }
    }

    if api.search_pending() {
        thread::sleep(api.search_debounce());
        if let Some(result) = api.poll_search(Instant::now()) {
            print_result(&result?);
        }
    }
    Ok(())
}

fn show_prompt() -> Result<()> {
    print!("place> ");
    io::stdout().flush()?;
    Ok(())
}
