//! Calendar constants and runtime configuration defaults

// Calendar geometry: one row per weekday, one column per week
/// Number of weekday rows in the calendar
pub const CALENDAR_ROWS: usize = 7;
/// Number of week columns in the calendar
pub const CALENDAR_COLUMNS: usize = 54;

/// Number of distinct intensity levels a cell can display
pub const INTENSITY_LEVELS: u8 = 4;
/// Width of each grayscale band mapped onto one intensity level
pub const GRAY_BAND_WIDTH: u8 = 64;

/// Luma weights for red, green and blue when converting to grayscale
pub const LUMA_WEIGHTS: [f64; 3] = [0.299, 0.587, 0.114];

/// Characters used to draw display bins 0 (lightest) through 3 (darkest)
pub const ASCII_PALETTE: [char; 4] = ['.', '-', '+', '#'];
/// Character drawn for inert or empty cells
pub const ASCII_BLANK: char = ' ';

/// Calendar fill colors for display bins 0 (lightest) through 3 (darkest)
pub const CALENDAR_COLORS: [[u8; 4]; 4] = [
    [214, 230, 133, 255],
    [140, 198, 101, 255],
    [68, 163, 64, 255],
    [30, 104, 35, 255],
];

// Preview geometry matches the web calendar's square tiles with a gap
/// Side length of one rendered calendar tile in pixels
pub const PREVIEW_TILE_SIZE: u32 = 12;
/// Distance between the origins of adjacent tiles in pixels
pub const PREVIEW_TILE_PITCH: u32 = 15;

// Ledger repository layout
/// File holding the ASCII rendering of the current counts
pub const ASCII_IMAGE_FILE: &str = "image.txt";
/// File listing per-day added activity
pub const CALENDAR_DATA_FILE: &str = "data.txt";

/// Date format written to the calendar data file
pub const SHORT_DATE_FORMAT: &str = "%Y%m%d";
/// Date formats accepted in calendar history data, tried in order
pub const HISTORY_DATE_FORMATS: [&str; 2] = ["%Y/%m/%d", "%Y-%m-%d"];

/// Trailer appended to every ledger commit message
pub const COMMIT_NOTICE: &str = "\n\nThis is an autogenerated commit recording one unit of calendar activity.";

/// Default hour of day (UTC) stamped on ledger commits
pub const DEFAULT_COMMIT_HOUR: u32 = 12;
/// Author and committer name stamped on ledger commits unless overridden
pub const DEFAULT_AUTHOR_NAME: &str = "contribsynth";
/// Author and committer email stamped on ledger commits unless overridden
pub const DEFAULT_AUTHOR_EMAIL: &str = "contribsynth@localhost";

/// Width of the progress bar in characters
pub const PROGRESS_BAR_WIDTH: u16 = 40;

/// Default log filter when `RUST_LOG` is not set
pub const DEFAULT_LOG_FILTER: &str = "info";
/// Log filter used when debug output is requested
pub const DEBUG_LOG_FILTER: &str = "debug";
