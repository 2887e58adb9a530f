//! Exports the [`build_books`] function which stitches together the
//! high-level steps of building every book: discovering and loading book
//! configs ([`crate::config`]), converting chapters ([`crate::markdown`]),
//! naming them ([`crate::namer`]), rendering them into pages
//! ([`crate::page`]), and writing the pages to disk.
//!
//! The first error aborts the whole run. Books finished before the error
//! keep their output.

use crate::config::{self, BookConfig, Config, Error as ConfigError};
use crate::markdown::{self, Error as MarkdownError};
use crate::namer::{self, MAX_FIXED_WIDTH_ORDINAL};
use crate::page::{Error as PageError, NavigationEntry, PageContext};
use glob::{GlobError, Pattern, PatternError};
use log::{debug, info, warn};
use std::collections::HashMap;
use std::fmt;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf, MAIN_SEPARATOR};

/// Counts of what a run produced.
#[derive(Debug, Default, PartialEq)]
pub struct Summary {
    /// The number of books built.
    pub books: usize,

    /// The number of chapter pages written across all books.
    pub chapters: usize,
}

/// A chapter source file and the place it takes in its book.
#[derive(Debug, Clone, PartialEq)]
pub struct Chapter {
    /// The 1-based position of the source in the book's sorted glob matches.
    pub ordinal: usize,

    /// The Markdown source file.
    pub source_path: PathBuf,

    /// The output file name, relative to the book's output directory.
    pub file_name: String,
}

/// Builds every book found under [`Config::source_directory`]. Each book is
/// loaded and built before the next one is loaded. Two books may not share
/// an id, since they would write the same output files.
pub fn build_books(config: &Config) -> Result<Summary> {
    let mut summary = Summary::default();
    let mut seen: HashMap<String, PathBuf> = HashMap::new();
    for location in config::discover(&config.source_directory)? {
        let book = BookConfig::load(&location)?;
        if let Some(first) = seen.get(&book.id) {
            return Err(Error::Annotated(
                format!("loading book config `{}`", location.display()),
                Box::new(Error::DuplicateBookId {
                    id: book.id.clone(),
                    first: first.clone(),
                }),
            ));
        }
        seen.insert(book.id.clone(), location.clone());
        summary.chapters += build_book(config, &book)?;
        summary.books += 1;
    }
    Ok(summary)
}

/// Builds all chapters of `book` in ordinal order into
/// `{output_directory}/{book.id}/` and returns the number of pages written.
pub fn build_book(config: &Config, book: &BookConfig) -> Result<usize> {
    let chapters = chapters(book)?;
    if chapters.is_empty() {
        warn!(
            "Book `{}`: `{}` matched no chapters",
            book.id, book.chapter_glob
        );
        return Ok(0);
    }
    if chapters.len() > MAX_FIXED_WIDTH_ORDINAL {
        warn!(
            "Book `{}` has {} chapters; file names past chapter {} have a wider prefix",
            book.id,
            chapters.len(),
            MAX_FIXED_WIDTH_ORDINAL
        );
    }

    info!("Building book `{}` ({} chapters)", book.id, chapters.len());
    let output_directory = config.output_directory.join(&book.id);
    std::fs::create_dir_all(&output_directory)?;

    let mut previous_chapters: Vec<NavigationEntry> = Vec::with_capacity(chapters.len());
    for chapter in &chapters {
        build_chapter(config, book, chapter, &previous_chapters, &output_directory)?;
        previous_chapters.push(NavigationEntry::for_chapter(
            chapter.ordinal,
            &chapter.file_name,
        ));
    }
    Ok(chapters.len())
}

/// Resolves the chapter glob of `book` relative to the book's directory and
/// returns the matches in sorted order, numbered from 1.
pub fn chapters(book: &BookConfig) -> Result<Vec<Chapter>> {
    let directory = book
        .directory()
        .to_str()
        .ok_or_else(|| Error::InvalidPath(book.directory().to_owned()))?;

    // Only the configured glob is a pattern; the directory is matched
    // literally.
    let pattern = match directory {
        "" => book.chapter_glob.clone(),
        _ => format!(
            "{}{}{}",
            Pattern::escape(directory),
            MAIN_SEPARATOR,
            book.chapter_glob
        ),
    };

    let mut chapters = Vec::new();
    for (i, result) in glob::glob(&pattern)?.enumerate() {
        let ordinal = i + 1;
        chapters.push(Chapter {
            ordinal,
            source_path: result?,
            file_name: namer::file_name(&book.id, ordinal),
        });
    }
    Ok(chapters)
}

fn build_chapter(
    config: &Config,
    book: &BookConfig,
    chapter: &Chapter,
    previous_chapters: &[NavigationEntry],
    output_directory: &Path,
) -> Result<()> {
    match _build_chapter(config, book, chapter, previous_chapters, output_directory) {
        Ok(()) => Ok(()),
        Err(e) => Err(Error::Annotated(
            format!(
                "building chapter {} of `{}` from `{}`",
                chapter.ordinal,
                book.id,
                chapter.source_path.display()
            ),
            Box::new(e),
        )),
    }
}

fn _build_chapter(
    config: &Config,
    book: &BookConfig,
    chapter: &Chapter,
    previous_chapters: &[NavigationEntry],
    output_directory: &Path,
) -> Result<()> {
    let source = std::fs::read_to_string(&chapter.source_path)?;
    let html = markdown::to_html(&source)?;
    let document = config.template.render(&PageContext {
        title: &book.id,
        chapter: &html,
        styles: &config.stylesheet,
        previous_chapters,
    })?;

    let file_path = output_directory.join(&chapter.file_name);
    write_page(&file_path, &document)?;
    debug!(
        "Wrote `{}` -> `{}`",
        chapter.source_path.display(),
        file_path.display()
    );
    Ok(())
}

fn write_page(file_path: &Path, document: &str) -> std::io::Result<()> {
    File::create(file_path)?.write_all(document.as_bytes())
}

/// The result of a fallible build operation.
pub type Result<T> = std::result::Result<T, Error>;

/// The error type for building books. Errors can occur while loading
/// configuration, matching chapters, converting or rendering them, and
/// writing them to disk.
#[derive(Debug)]
pub enum Error {
    /// Returned for errors discovering or loading book configs.
    Config(ConfigError),

    /// Returned for errors converting a chapter's markdown.
    Markdown(MarkdownError),

    /// Returned for errors rendering a chapter page.
    Page(PageError),

    /// Returned when a book reuses the id of the book loaded from `first`.
    DuplicateBookId { id: String, first: PathBuf },

    /// Returned when a chapter glob isn't a valid pattern.
    Pattern(PatternError),

    /// Returned for I/O problems while matching a chapter glob.
    Glob(GlobError),

    /// Returned when a book's directory can't be expressed as a glob
    /// pattern because it isn't valid UTF-8.
    InvalidPath(PathBuf),

    /// Returned for other I/O errors.
    Io(std::io::Error),

    /// An error with an annotation.
    Annotated(String, Box<Error>),
}

impl fmt::Display for Error {
    /// Implements [`fmt::Display`] for [`Error`].
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Config(err) => err.fmt(f),
            Error::Markdown(err) => err.fmt(f),
            Error::Page(err) => err.fmt(f),
            Error::DuplicateBookId { id, first } => write!(
                f,
                "book id `{}` is already used by `{}`",
                id,
                first.display()
            ),
            Error::Pattern(err) => write!(f, "invalid chapter glob: {}", err),
            Error::Glob(err) => err.fmt(f),
            Error::InvalidPath(path) => {
                write!(f, "book directory is not valid UTF-8: {:?}", path)
            }
            Error::Io(err) => err.fmt(f),
            Error::Annotated(annotation, err) => write!(f, "{}: {}", annotation, err),
        }
    }
}

impl std::error::Error for Error {
    /// Implements [`std::error::Error`] for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Config(err) => Some(err),
            Error::Markdown(err) => Some(err),
            Error::Page(err) => Some(err),
            Error::DuplicateBookId { .. } => None,
            Error::Pattern(err) => Some(err),
            Error::Glob(err) => Some(err),
            Error::InvalidPath(_) => None,
            Error::Io(err) => Some(err),
            Error::Annotated(_, err) => Some(err),
        }
    }
}

impl From<ConfigError> for Error {
    /// Converts [`ConfigError`]s into [`Error`]. This allows us to use the
    /// `?` operator.
    fn from(err: ConfigError) -> Error {
        Error::Config(err)
    }
}

impl From<MarkdownError> for Error {
    fn from(err: MarkdownError) -> Error {
        Error::Markdown(err)
    }
}

impl From<PageError> for Error {
    fn from(err: PageError) -> Error {
        Error::Page(err)
    }
}

impl From<PatternError> for Error {
    fn from(err: PatternError) -> Error {
        Error::Pattern(err)
    }
}

impl From<GlobError> for Error {
    fn from(err: GlobError) -> Error {
        Error::Glob(err)
    }
}

impl From<std::io::Error> for Error {
    /// Converts [`std::io::Error`]s into [`Error`]. This allows us to use the
    /// `?` operator.
    fn from(err: std::io::Error) -> Error {
        Error::Io(err)
    }
}
