use clap::{Parser, Subcommand, ValueEnum};
use scanmateapp::prefs::{Quality, ThemeMode};
use std::path::PathBuf;

/// Returns the version string, including git hash and commit date for non-release builds.
/// Format for releases: "v0.3.2"
/// Format for dev builds: "v0.3.2\ndev: abc1234 2024-01-15 14:30"
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
    name = "scanmate",
    bin_name = "scanmate",
    version = get_version(),
    disable_help_subcommand = true
)]
#[command(about = "Scan, import and compress PDF documents", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Data directory (defaults to $SCANMATE_DATA_DIR, then the OS data dir)
    #[arg(long, global = true, value_name = "DIR", help_heading = "Options")]
    pub data: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true, help_heading = "Options")]
    pub json: bool,

    /// Verbose output
    #[arg(short, long, global = true, help_heading = "Options")]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List PDFs, newest first
    #[command(alias = "ls", display_order = 1)]
    List,

    /// Show name, date, size and file location of PDFs
    #[command(alias = "v", display_order = 2)]
    Details {
        /// Positions or ids of the PDFs (e.g. 1 3)
        #[arg(required = true, num_args = 1..)]
        indexes: Vec<String>,
    },

    /// Rename a PDF
    #[command(alias = "mv", display_order = 3)]
    Rename {
        /// Position or id of the PDF
        index: String,
        /// New name words (joined with spaces)
        #[arg(required = true, trailing_var_arg = true)]
        name: Vec<String>,
    },

    /// Delete PDFs and their files
    #[command(alias = "rm", display_order = 4)]
    Delete {
        #[arg(required = true, num_args = 1..)]
        indexes: Vec<String>,
    },

    /// Copy PDFs to the downloads folder
    #[command(display_order = 5)]
    Save {
        #[arg(required = true, num_args = 1..)]
        indexes: Vec<String>,
    },

    /// Print file paths of PDFs for handing to another app
    #[command(display_order = 6)]
    Share {
        #[arg(required = true, num_args = 1..)]
        indexes: Vec<String>,
    },

    /// Shrink a PDF through the compression service
    #[command(display_order = 10)]
    Compress {
        /// Position or id of the PDF
        index: String,
        /// Compression tier
        #[arg(short, long, value_enum, default_value_t = QualityArg::Medium)]
        quality: QualityArg,
    },

    /// Turn a captured photo into a PDF
    #[command(display_order = 11)]
    Scan {
        /// Image file (JPEG or PNG)
        image: PathBuf,
    },

    /// Combine images into one PDF, one page per image
    #[command(display_order = 12)]
    Import {
        #[arg(required = true, num_args = 1..)]
        images: Vec<PathBuf>,
    },

    /// Delete every PDF and its files
    #[command(display_order = 20)]
    Clear {
        /// Skip the confirmation
        #[arg(long)]
        yes: bool,
    },

    /// Find PDFs whose files are gone
    #[command(display_order = 21)]
    Doctor,

    /// Show or change the color theme
    #[command(display_order = 30)]
    Theme {
        #[arg(value_enum)]
        mode: Option<ThemeArg>,
    },

    /// Show or change the scan quality
    #[command(display_order = 31)]
    Quality {
        #[arg(value_enum)]
        level: Option<QualityArg>,
    },

    /// Show, complete or reset onboarding
    #[command(display_order = 32)]
    Onboarding {
        #[arg(value_enum)]
        action: Option<OnboardingArg>,
    },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum QualityArg {
    Low,
    Medium,
    High,
}

impl From<QualityArg> for Quality {
    fn from(arg: QualityArg) -> Self {
        match arg {
            QualityArg::Low => Quality::Low,
            QualityArg::Medium => Quality::Medium,
            QualityArg::High => Quality::High,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ThemeArg {
    Light,
    Dark,
    System,
    /// Flip between light and dark
    Toggle,
}

impl ThemeArg {
    /// The mode to store, or `None` for `toggle`.
    pub fn mode(self) -> Option<ThemeMode> {
        match self {
            ThemeArg::Light => Some(ThemeMode::Light),
            ThemeArg::Dark => Some(ThemeMode::Dark),
            ThemeArg::System => Some(ThemeMode::System),
            ThemeArg::Toggle => None,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OnboardingArg {
    Complete,
    Reset,
}
