//! Object key construction
//!
//! Builds storage object keys from a source file name, an optional explicit
//! name, a target directory, and naming/layout modes. Key construction is
//! total: when no name information is available it degrades to a
//! timestamp-based name instead of failing.

use jiff::Zoned;

/// Source of wall-clock time for key construction.
///
/// Key construction needs the current date (for date-based directory layouts)
/// and the current epoch seconds (for timestamp suffixes). Injecting the
/// clock keeps the builder deterministic under test.
pub trait Clock {
    /// Current time in the system time zone
    fn now(&self) -> Zoned;
}

/// Clock backed by the actual system time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Zoned {
        Zoned::now()
    }
}

/// How the object's base filename is derived
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NamingStrategy {
    /// Use the filename as-is
    #[default]
    Filename,
    /// Append `_<epoch-seconds>` between stem and extension
    FilenameWithTimestamp,
}

impl NamingStrategy {
    /// Parse a mode flag as passed on the wire.
    ///
    /// Unrecognized values fall back to [`NamingStrategy::Filename`]; profiles
    /// written by other versions may carry mode strings we do not know.
    pub fn from_flag(flag: &str) -> Self {
        match flag {
            "filename_timestamp" => Self::FilenameWithTimestamp,
            _ => Self::Filename,
        }
    }
}

/// How the object key's directory prefix is derived
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DirectoryStrategy {
    /// No date segment, caller directory only
    #[default]
    Flat,
    /// `YYYY/MM/DD/` below the caller directory
    DateHierarchy,
    /// `YYYYMMDD/` below the caller directory
    DateCombined,
}

impl DirectoryStrategy {
    /// Parse a mode flag as passed on the wire.
    ///
    /// Unrecognized values fall back to [`DirectoryStrategy::Flat`], same
    /// policy as [`NamingStrategy::from_flag`].
    pub fn from_flag(flag: &str) -> Self {
        match flag {
            "yyyy_mm_dd_hierarchy" => Self::DateHierarchy,
            "yyyy_mm_dd_combined" => Self::DateCombined,
            _ => Self::Flat,
        }
    }
}

/// Inputs for object key construction
#[derive(Debug, Clone, Default)]
pub struct KeyParams<'a> {
    /// Original file name, used as the extension source and default stem
    pub source_name: Option<&'a str>,

    /// Caller-chosen name, used verbatim as the stem when present
    pub explicit_name: Option<&'a str>,

    /// Caller-chosen directory, possibly empty
    pub directory: &'a str,

    /// Filename mode
    pub naming: NamingStrategy,

    /// Directory mode
    pub layout: DirectoryStrategy,
}

/// Extension of a file name: the characters from the last `.` inclusive.
///
/// A dot in the leading position does not start an extension, so dotfiles
/// like `.profile` have none.
pub fn file_extension(name: &str) -> Option<&str> {
    match name.rfind('.') {
        Some(pos) if pos > 0 => Some(&name[pos..]),
        _ => None,
    }
}

/// Build an object key.
///
/// The result never starts with `/` and its directory components are
/// separated by exactly one `/`. Directory-to-prefix joining is normalized
/// here and nowhere else.
pub fn build_object_key(params: &KeyParams<'_>, clock: &dyn Clock) -> String {
    let now = clock.now();
    let epoch = now.timestamp().as_second();

    let extension = params
        .source_name
        .and_then(file_extension)
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    // Stem selection: explicit name verbatim, else the source name's stem,
    // else a timestamp-based fallback.
    let mut filename = match (params.explicit_name, params.source_name) {
        (Some(explicit), _) if !explicit.is_empty() => {
            if !extension.is_empty() && !explicit.ends_with(&extension) {
                format!("{explicit}{extension}")
            } else {
                explicit.to_string()
            }
        }
        (_, Some(source)) if !source.is_empty() => {
            let stem = match source.rfind('.') {
                Some(pos) if pos > 0 => &source[..pos],
                _ => source,
            };
            format!("{stem}{extension}")
        }
        _ => format!("file_{epoch}{extension}"),
    };

    if params.naming == NamingStrategy::FilenameWithTimestamp {
        filename = match filename.strip_suffix(&extension) {
            Some(stem) if !extension.is_empty() => format!("{stem}_{epoch}{extension}"),
            _ => format!("{filename}_{epoch}"),
        };
    }

    let mut prefix = normalize_directory(params.directory);
    match params.layout {
        DirectoryStrategy::Flat => {}
        DirectoryStrategy::DateHierarchy => {
            prefix.push_str(&now.strftime("%Y/%m/%d").to_string());
            prefix.push('/');
        }
        DirectoryStrategy::DateCombined => {
            prefix.push_str(&now.strftime("%Y%m%d").to_string());
            prefix.push('/');
        }
    }

    format!("{prefix}{filename}")
}

/// Normalize a caller directory into a key prefix: no leading `/`, exactly
/// one trailing `/` when non-empty.
fn normalize_directory(directory: &str) -> String {
    let trimmed = directory.trim_start_matches('/').trim_end_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("{trimmed}/")
    }
}
