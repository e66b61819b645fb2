use std::path::{Path, PathBuf};

use crate::config::{LibrarySettings, Settings};
use crate::library::{self, LibraryError, Track};
use crate::player::PlayerOptions;

/// Parsed command line: `encore [SOURCE] [--export FILE]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchArgs {
    pub source: PathBuf,
    pub export: Option<PathBuf>,
}

impl LaunchArgs {
    /// Parse arguments (without the program name). SOURCE defaults to `cwd`.
    pub fn parse<I>(args: I, cwd: PathBuf) -> Result<Self, String>
    where
        I: IntoIterator<Item = String>,
    {
        let mut source: Option<PathBuf> = None;
        let mut export: Option<PathBuf> = None;
        let mut args = args.into_iter();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--export" => {
                    let file = args
                        .next()
                        .ok_or_else(|| "--export needs a file path".to_string())?;
                    export = Some(PathBuf::from(file));
                }
                flag if flag.starts_with("--") => return Err(format!("unknown option {flag}")),
                _ if source.is_some() => return Err(format!("unexpected argument {arg}")),
                _ => source = Some(PathBuf::from(arg)),
            }
        }

        Ok(Self {
            source: source.unwrap_or(cwd),
            export,
        })
    }
}

/// Load the catalogue from a `.json` manifest or by scanning a directory.
pub fn load_catalog(source: &Path, settings: &LibrarySettings) -> Result<Vec<Track>, LibraryError> {
    let is_manifest = source
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));

    if is_manifest {
        library::load_manifest(source)
    } else {
        library::scan(source, settings)
    }
}

pub fn player_options(settings: &Settings) -> PlayerOptions {
    PlayerOptions {
        volume: settings.player.volume,
        autoplay: settings.player.autoplay,
        shuffle: settings.player.shuffle,
        repeat: settings.player.repeat.into(),
    }
}
