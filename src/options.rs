use clap::ValueEnum;
use std::env;
use std::fmt;
use std::path::PathBuf;

/// Crop anchor understood by the image service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Gravity {
    North,
    East,
    South,
    West,
    Center,
}

impl fmt::Display for Gravity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Gravity::North => "north",
            Gravity::East => "east",
            Gravity::South => "south",
            Gravity::West => "west",
            Gravity::Center => "center",
        };
        write!(f, "{}", name)
    }
}

/// Flat record handed over by the CLI layer, before sanitization.
#[derive(Debug, Clone, Default)]
pub struct RawOptions {
    pub tokens: Vec<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub dir: Option<String>,
    pub image: Option<String>,
    pub gravity: Option<Gravity>,
    pub grayscale: bool,
    pub blur: bool,
}

/// Per-run options after sanitization. Width, height and dir stay optional
/// here; saved config and defaults fill them in during the merge.
#[derive(Debug, Clone, Default)]
pub struct Invocation {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub dir: Option<String>,
    pub image: Option<String>,
    pub gravity: Option<Gravity>,
    pub random: bool,
    pub latest: bool,
    pub grayscale: bool,
    pub blur: bool,
}

/// Fully merged run parameters. `dir` is absolute (or the literal ".")
/// by the time the downloader sees it.
#[derive(Debug, Clone, PartialEq)]
pub struct Options {
    pub width: u32,
    pub height: u32,
    pub dir: String,
    pub image: Option<String>,
    pub gravity: Option<Gravity>,
    pub random: bool,
    pub latest: bool,
    pub grayscale: bool,
    pub blur: bool,
}

/// Expands `./relative` and `~/home-relative` directory strings into
/// absolute paths. Anything else, including a bare ".", passes through.
pub fn resolve_dir(dir: &str) -> String {
    if dir.starts_with('.') && dir.len() > 1 {
        let rel = dir.strip_prefix("./").unwrap_or(dir);
        let cwd = env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        if rel.is_empty() {
            return cwd.to_string_lossy().into_owned();
        }
        return cwd.join(rel).to_string_lossy().into_owned();
    }

    if let Some(rest) = dir.strip_prefix('~') {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("/"));
        let rest = rest.trim_start_matches('/');
        if rest.is_empty() {
            return home.to_string_lossy().into_owned();
        }
        return home.join(rest).to_string_lossy().into_owned();
    }

    dir.to_string()
}

/// Turns the raw CLI record into a clean per-run `Invocation`: the positional
/// token list collapses into the `random` / `latest` booleans and `dir` is
/// resolved to an absolute path.
pub fn sanitize(raw: RawOptions) -> Invocation {
    Invocation {
        random: raw.tokens.iter().any(|t| t == "random"),
        latest: raw.tokens.iter().any(|t| t == "latest"),
        dir: raw.dir.map(|d| resolve_dir(&d)),
        width: raw.width,
        height: raw.height,
        image: raw.image,
        gravity: raw.gravity,
        grayscale: raw.grayscale,
        blur: raw.blur,
    }
}
