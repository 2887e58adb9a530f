use pulldown_cmark::{html, Options, Parser};
use std::fmt;
use std::io;
use std::string::FromUtf8Error;

/// Converts markdown to an HTML fragment. The result has no surrounding
/// `<html>` or `<body>` element so it can be embedded into a page template.
pub fn to_html(markdown: &str) -> Result<String, Error> {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_FOOTNOTES);
    options.insert(Options::ENABLE_SMART_PUNCTUATION);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_TASKLISTS);

    let mut buf: Vec<u8> = Vec::with_capacity(markdown.len() * 3 / 2);
    html::write_html(&mut buf, Parser::new_ext(markdown, options))?;
    Ok(String::from_utf8(buf)?)
}

/// Represents an error converting markdown to HTML.
#[derive(Debug)]
pub enum Error {
    /// Returned when writing the HTML output fails.
    Io(io::Error),

    /// Returned when the rendered HTML isn't valid UTF-8.
    Utf8(FromUtf8Error),
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Io(err) => err.fmt(f),
            Error::Utf8(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            Error::Utf8(err) => Some(err),
        }
    }
}

impl From<io::Error> for Error {
    /// Converts a [`io::Error`] into an [`Error`]. It allows us to use
    /// the `?` operator for IO operations.
    fn from(err: io::Error) -> Error {
        Error::Io(err)
    }
}

impl From<FromUtf8Error> for Error {
    fn from(err: FromUtf8Error) -> Error {
        Error::Utf8(err)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_heading() -> Result<(), Error> {
        assert_eq!("<h1>Hello</h1>\n", to_html("# Hello")?);
        Ok(())
    }

    #[test]
    fn test_paragraph() -> Result<(), Error> {
        assert_eq!("<p>World</p>\n", to_html("World")?);
        Ok(())
    }

    #[test]
    fn test_inline_and_blocks() -> Result<(), Error> {
        let html = to_html(
            "Some *emphasis* and a [link](other.md).\n\n\
             - one\n\
             - two\n\n\
             ```rust\nfn main() {}\n```\n",
        )?;
        assert!(html.contains("<em>emphasis</em>"));
        assert!(html.contains(r#"<a href="other.md">link</a>"#));
        assert!(html.contains("<ul>\n<li>one</li>\n<li>two</li>\n</ul>"));
        assert!(html.contains(r#"<pre><code class="language-rust">fn main() {}"#));
        Ok(())
    }

    #[test]
    fn test_fragment_has_no_document_wrapper() -> Result<(), Error> {
        let html = to_html("text")?;
        assert!(!html.contains("<html"));
        assert!(!html.contains("<body"));
        Ok(())
    }

    #[test]
    fn test_escapes_text() -> Result<(), Error> {
        assert_eq!("<p>1 &lt; 2</p>\n", to_html("1 < 2")?);
        Ok(())
    }
}
