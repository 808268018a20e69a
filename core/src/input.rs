//! Where records are read from.

use std::{
    env, fmt,
    fs::File,
    io::{self, IsTerminal as _},
    path::{Path, PathBuf},
};

use crate::format::Format;

/// An input source, either a file or stdin.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Input {
    /// A file.
    Path(PathBuf),
    /// Standard input.
    Stdin,
}

impl Input {
    /// Environment variable that disables the stdin check in [`Input::new`] when set.
    pub const ALLOW_STDIN_KEY: &'static str = "DMAP_ALLOW_STDIN";

    /// Creates an input from an optional path, checking it against the state of stdin.
    ///
    /// Giving a path while stdin is piped, or no path while stdin is a terminal, is an error
    /// unless [`Input::ALLOW_STDIN_KEY`] is set. Test harnesses usually pipe stdin, so they set
    /// it.
    pub fn new(path: Option<PathBuf>) -> Result<Self, InputError> {
        if env::var_os(Self::ALLOW_STDIN_KEY).is_some() {
            return Ok(Self::new_unchecked(path));
        }

        match (path, io::stdin().is_terminal()) {
            (Some(_), false) => Err(InputError::Both),
            (None, true) => Err(InputError::Neither),
            (path, _) => Ok(Self::new_unchecked(path)),
        }
    }

    /// Creates an input from an optional path without any checks, using stdin for `None`.
    pub fn new_unchecked(path: Option<PathBuf>) -> Self {
        path.map_or(Self::Stdin, Self::Path)
    }

    /// Returns the path of the input, unless it is stdin.
    pub fn as_path(&self) -> Option<&Path> {
        match self {
            Input::Path(path) => Some(path),
            Input::Stdin => None,
        }
    }

    /// Guesses the format of the input from its file name.
    ///
    /// See [`Format::detect`]. Always `None` for stdin.
    pub fn detect_format(&self) -> Option<Format> {
        self.as_path().and_then(Format::detect)
    }

    /// Opens the input for buffered reading.
    pub fn open(&self) -> io::Result<Box<dyn io::BufRead>> {
        Ok(match self {
            Input::Path(path) => Box::new(io::BufReader::new(File::open(path)?)),
            Input::Stdin => Box::new(io::stdin().lock()),
        })
    }
}

impl fmt::Display for Input {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Input::Path(path) => write!(f, "{}", path.display()),
            Input::Stdin => f.write_str("stdin"),
        }
    }
}

/// An error associated with choosing an input source.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum InputError {
    /// A path was given while stdin is piped.
    Both,
    /// No path was given and stdin is a terminal.
    Neither,
}

impl fmt::Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputError::Both => f.write_str("received input both via file and stdin"),
            InputError::Neither => f.write_str("received no input via file or stdin"),
        }
    }
}

impl std::error::Error for InputError {}
