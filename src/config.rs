//! Defines the run-wide [`Config`] and the per-book [`BookConfig`], along
//! with the logic for discovering book configuration files on disk.

use crate::page::{Error as PageError, PageTemplate};
use serde::Deserialize;
use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

/// The name of the configuration file expected in each book directory.
pub const CONFIG_FILE_NAME: &str = "config.json";

/// The stylesheet embedded into every page unless overridden.
const DEFAULT_STYLESHEET: &str = include_str!("../assets/styles.css");

/// Settings for a whole build run.
pub struct Config {
    /// The directory whose immediate subdirectories hold one book each.
    pub source_directory: PathBuf,

    /// The root of the output tree. Each book is written to
    /// `{output_directory}/{book_id}/`.
    pub output_directory: PathBuf,

    /// The template applied to every chapter page.
    pub template: PageTemplate,

    /// The CSS text embedded into every chapter page.
    pub stylesheet: String,
}

impl Config {
    /// Creates a [`Config`] using the built-in page template and stylesheet.
    pub fn new(source_directory: &Path, output_directory: &Path) -> Result<Config> {
        Ok(Config {
            source_directory: source_directory.to_owned(),
            output_directory: output_directory.to_owned(),
            template: PageTemplate::builtin()?,
            stylesheet: DEFAULT_STYLESHEET.to_owned(),
        })
    }

    /// Replaces the page template with the one parsed from `path`.
    pub fn with_template_file(mut self, path: &Path) -> Result<Config> {
        let text = read_to_string(path, "template")?;
        self.template = PageTemplate::parse(&text).map_err(|e| {
            Error::Annotated(
                format!("parsing template file `{}`", path.display()),
                Box::new(Error::Page(e)),
            )
        })?;
        Ok(self)
    }

    /// Replaces the stylesheet with the contents of `path`.
    pub fn with_stylesheet_file(mut self, path: &Path) -> Result<Config> {
        self.stylesheet = read_to_string(path, "stylesheet")?;
        Ok(self)
    }
}

/// The configuration for a single book, parsed from its `config.json`.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct BookConfig {
    /// The book's identifier. It names the book's output directory and
    /// seeds its chapter file names.
    pub id: String,

    /// A glob selecting the chapter source files, relative to the directory
    /// holding the configuration file.
    #[serde(rename = "chapterGlob")]
    pub chapter_glob: String,

    /// The path of the configuration file this book was loaded from.
    #[serde(skip)]
    pub location: PathBuf,
}

impl BookConfig {
    /// Loads a [`BookConfig`] from the JSON file at `path`. Both `id` and
    /// `chapterGlob` are required; anything else in the file is ignored.
    pub fn load(path: &Path) -> Result<BookConfig> {
        match Self::_load(path) {
            Ok(book) => Ok(book),
            Err(e) => Err(Error::Annotated(
                format!("loading book config `{}`", path.display()),
                Box::new(e),
            )),
        }
    }

    fn _load(path: &Path) -> Result<BookConfig> {
        let mut book: BookConfig = serde_json::from_reader(BufReader::new(File::open(path)?))?;
        book.location = path.to_owned();
        book.check_id()?;
        Ok(book)
    }

    // The id names the book's output directory, so it must be exactly one
    // normal path component.
    fn check_id(&self) -> Result<()> {
        let mut components = Path::new(&self.id).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(name)), None) if name == self.id.as_str() => Ok(()),
            _ => Err(Error::InvalidBookId(self.id.clone())),
        }
    }

    /// The directory the chapter glob is resolved against.
    pub fn directory(&self) -> &Path {
        self.location.parent().unwrap_or_else(|| Path::new(""))
    }
}

/// Returns the path of every `config.json` located exactly one directory
/// below `root` (i.e., `{root}/*/config.json`), ordered by directory name.
pub fn discover(root: &Path) -> Result<Vec<PathBuf>> {
    let mut configs = Vec::new();
    for result in WalkDir::new(root)
        .min_depth(2)
        .max_depth(2)
        .follow_links(true)
        .sort_by(|a, b| a.file_name().cmp(b.file_name()))
    {
        let entry = result?;
        if entry.file_type().is_file() && entry.file_name() == CONFIG_FILE_NAME {
            configs.push(entry.into_path());
        }
    }
    Ok(configs)
}

fn read_to_string(path: &Path, kind: &str) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| {
        Error::Annotated(
            format!("reading {} file `{}`", kind, path.display()),
            Box::new(Error::Io(e)),
        )
    })
}

/// The result of a fallible configuration operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error discovering or loading configuration.
#[derive(Debug)]
pub enum Error {
    /// Returned when a book config isn't valid JSON or lacks a required
    /// field.
    Json(serde_json::Error),

    /// Returned when a book id isn't a single plain path component (e.g.,
    /// it's empty, absolute, `..`, or contains a separator).
    InvalidBookId(String),

    /// Returned when the page template can't be parsed.
    Page(PageError),

    /// Returned for errors walking the source directory.
    WalkDir(walkdir::Error),

    /// Returned for other I/O errors.
    Io(std::io::Error),

    /// An error with an annotation.
    Annotated(String, Box<Error>),
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Json(err) => err.fmt(f),
            Error::InvalidBookId(id) => write!(
                f,
                "invalid book id {:?}: must be a single directory name",
                id
            ),
            Error::Page(err) => err.fmt(f),
            Error::WalkDir(err) => err.fmt(f),
            Error::Io(err) => err.fmt(f),
            Error::Annotated(annotation, err) => write!(f, "{}: {}", annotation, err),
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Json(err) => Some(err),
            Error::InvalidBookId(_) => None,
            Error::Page(err) => Some(err),
            Error::WalkDir(err) => Some(err),
            Error::Io(err) => Some(err),
            Error::Annotated(_, err) => Some(err),
        }
    }
}

impl From<serde_json::Error> for Error {
    /// Converts a [`serde_json::Error`] into an [`Error`]. It allows us to
    /// use the `?` operator for [`serde_json`] deserialization functions.
    fn from(err: serde_json::Error) -> Error {
        Error::Json(err)
    }
}

impl From<PageError> for Error {
    fn from(err: PageError) -> Error {
        Error::Page(err)
    }
}

impl From<walkdir::Error> for Error {
    fn from(err: walkdir::Error) -> Error {
        Error::WalkDir(err)
    }
}

impl From<std::io::Error> for Error {
    /// Converts a [`std::io::Error`] into an [`Error`]. It allows us to
    /// use the `?` operator for fallible I/O functions.
    fn from(err: std::io::Error) -> Error {
        Error::Io(err)
    }
}
