use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use waypointapp::model::{Coordinates, QuestionType};

/// Returns the version string, including git hash and commit date for non-release builds.
/// Format for releases: "v0.3.0"
/// Format for dev builds: "v0.3.0\ndev: abc1234 2024-01-15 14:30"
fn get_version() -> &'static str {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    const GIT_HASH: &str = env!("GIT_HASH");
    const GIT_COMMIT_DATE: &str = env!("GIT_COMMIT_DATE");
    const IS_RELEASE: &str = env!("IS_RELEASE");

    use std::sync::OnceLock;
    static VERSION_STRING: OnceLock<String> = OnceLock::new();

    VERSION_STRING.get_or_init(|| {
        if IS_RELEASE == "true" || GIT_HASH.is_empty() {
            format!("v{}", VERSION)
        } else {
            format!("v{}\ndev: {} {}", VERSION, GIT_HASH, GIT_COMMIT_DATE)
        }
    })
}

#[derive(Parser, Debug)]
#[command(
    name = "waypoint",
    bin_name = "waypoint",
    version = get_version(),
    disable_help_subcommand = true,
    after_help = "Locations are referenced by their list position (1, 2, ...) or by id."
)]
#[command(about = "Curate a collection of map locations with descriptions and quizzes", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Data directory (defaults to the OS data directory)
    #[arg(long, global = true, env = "WAYPOINT_DATA", help_heading = "Options")]
    pub data: Option<PathBuf>,

    /// Launch parameters: id=..&token=..&artifact_id=..&base_url=..
    #[arg(long, global = true, env = "WAYPOINT_LAUNCH", help_heading = "Options")]
    pub launch: Option<String>,

    /// Verbose output
    #[arg(short, long, global = true, help_heading = "Options")]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List locations, optionally filtered by title or country
    #[command(alias = "ls", display_order = 1)]
    List {
        /// Case-insensitive search term
        query: Option<String>,
    },

    /// Show one location in full
    #[command(alias = "v", display_order = 2)]
    View {
        /// Position (e.g. 3) or id
        location: String,
    },

    /// Add a location
    #[command(alias = "a", display_order = 3)]
    Add {
        #[command(flatten)]
        fields: LocationArgs,
    },

    /// Edit a location; only the given fields change
    #[command(alias = "e", display_order = 4)]
    Edit {
        /// Position (e.g. 3) or id
        location: String,

        #[command(flatten)]
        fields: LocationArgs,
    },

    /// Delete a location
    #[command(alias = "rm", display_order = 5)]
    Delete {
        /// Position (e.g. 3) or id
        location: String,
    },

    /// Move a location to another position
    #[command(alias = "mv", display_order = 6)]
    Move {
        /// Current position
        from: usize,

        /// New position
        to: usize,

        /// Positions refer to the list filtered by this term
        #[arg(short, long)]
        filter: Option<String>,
    },

    /// Manage quiz questions
    #[command(display_order = 7)]
    Quiz {
        #[command(subcommand)]
        action: QuizCommands,
    },

    /// Search for places by name (interactive when no query is given)
    #[command(display_order = 8)]
    Place {
        /// Place name
        query: Option<String>,
    },

    /// Replace the collection with the contents of a JSON file
    #[command(display_order = 20)]
    Import {
        file: PathBuf,

        /// Skip confirmation
        #[arg(long, short = 'y')]
        yes: bool,
    },

    /// Write the collection to a JSON file
    #[command(display_order = 21)]
    Export {
        /// Output file (defaults to `export_file` from the config)
        file: Option<PathBuf>,
    },

    /// Remove every location
    #[command(display_order = 22)]
    Clear {
        /// Skip confirmation
        #[arg(long, short = 'y')]
        yes: bool,
    },

    /// Load from or save to the remote artifact (needs --launch)
    #[command(display_order = 23)]
    Remote {
        #[command(subcommand)]
        action: RemoteCommands,
    },

    /// Show or set the interface language
    #[command(display_order = 30)]
    Lang {
        /// Two-letter language code, e.g. en
        code: Option<String>,
    },

    /// Walk through the guided tour
    #[command(display_order = 31)]
    Tour {
        /// Forget that the tour was seen
        #[arg(long)]
        reset: bool,
    },

    /// Show the effective configuration
    #[command(display_order = 32)]
    Config {
        /// Print a commented waypoint.toml template instead
        #[arg(long)]
        template: bool,
    },
}

/// Fields shared by `add` and `edit`.
#[derive(Args, Debug, Default)]
pub struct LocationArgs {
    /// Title
    #[arg(short, long)]
    pub title: Option<String>,

    /// Description as HTML
    #[arg(short, long, conflicts_with = "markdown")]
    pub description: Option<String>,

    /// Description as Markdown, converted to HTML
    #[arg(short, long)]
    pub markdown: Option<String>,

    /// Image URL
    #[arg(long)]
    pub image: Option<String>,

    /// Video URL (empty to remove)
    #[arg(long)]
    pub video: Option<String>,

    /// Audio URL (empty to remove)
    #[arg(long)]
    pub audio: Option<String>,

    /// Pin at coordinates, e.g. 31.9,35.9
    #[arg(long, value_name = "LAT,LNG", value_parser = parse_coordinates, allow_hyphen_values = true, conflicts_with = "place")]
    pub at: Option<Coordinates>,

    /// Pin at the top search result for a place name
    #[arg(long, value_name = "NAME")]
    pub place: Option<String>,

    /// Country, skipping reverse geocoding (needs --at or --place when adding)
    #[arg(long)]
    pub country: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum QuizCommands {
    /// Add a question to a location
    Add {
        /// Position (e.g. 3) or id
        location: String,

        /// Question text
        #[arg(long)]
        text: String,

        /// Question type
        #[arg(long = "type", value_enum, default_value = "short_answer")]
        kind: QuestionKind,

        /// Correct answer (true/false for true_false questions)
        #[arg(long)]
        answer: String,

        /// An option for multiple choice (repeat for each)
        #[arg(long = "option")]
        options: Vec<String>,

        /// Require a correct answer before moving on
        #[arg(long)]
        block_navigation: bool,
    },

    /// Remove a question by its number
    #[command(alias = "rm")]
    Remove {
        /// Position (e.g. 3) or id
        location: String,

        /// Question number, starting at 1
        number: usize,
    },
}

#[derive(Subcommand, Debug)]
pub enum RemoteCommands {
    /// Replace the collection with the remote artifact
    Load,
    /// Write the collection to the remote artifact
    Save,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum QuestionKind {
    #[value(name = "short_answer")]
    ShortAnswer,
    #[value(name = "true_false")]
    TrueFalse,
    #[value(name = "multiple_choice")]
    MultipleChoice,
}

impl From<QuestionKind> for QuestionType {
    fn from(kind: QuestionKind) -> Self {
        match kind {
            QuestionKind::ShortAnswer => QuestionType::ShortAnswer,
            QuestionKind::TrueFalse => QuestionType::TrueFalse,
            QuestionKind::MultipleChoice => QuestionType::MultipleChoice,
        }
    }
}

/// Parses `LAT,LNG`.
pub fn parse_coordinates(s: &str) -> Result<Coordinates, String> {
    let (lat, lng) = s
        .split_once(',')
        .ok_or_else(|| format!("expected LAT,LNG, got '{}'", s))?;
    let lat: f64 = lat
        .trim()
        .parse()
        .map_err(|_| format!("invalid latitude '{}'", lat.trim()))?;
    let lng: f64 = lng
        .trim()
        .parse()
        .map_err(|_| format!("invalid longitude '{}'", lng.trim()))?;
    if !(-90.0..=90.0).contains(&lat) {
        return Err(format!("latitude {} is out of range", lat));
    }
    if !(-180.0..=180.0).contains(&lng) {
        return Err(format!("longitude {} is out of range", lng));
    }
    Ok(Coordinates::new(lat, lng))
}
