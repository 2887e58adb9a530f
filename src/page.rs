//! Defines the [`PageTemplate`] and its typed input, [`PageContext`]. A page
//! template is parsed once per run and rendered once per chapter; rendering
//! is pure and returns the document text, leaving storage to
//! [`crate::build`].

use gtmpl::{Context, Template, Value};
use std::fmt;
use std::string::FromUtf8Error;

/// The page template used unless the run overrides it.
const DEFAULT_TEMPLATE: &str = include_str!("../assets/page.html");

/// A link to an earlier chapter of the same book.
#[derive(Clone, Debug, PartialEq)]
pub struct NavigationEntry {
    /// The link text, e.g. `Chapter 2`. Escaped when rendered.
    pub name: String,

    /// The output file name of the linked chapter. Chapters of a book share
    /// a directory, so the file name is a complete relative URL.
    pub url: String,
}

impl NavigationEntry {
    /// Creates the entry for the chapter at `ordinal`, written to
    /// `file_name`.
    pub fn for_chapter(ordinal: usize, file_name: &str) -> NavigationEntry {
        NavigationEntry {
            name: format!("Chapter {}", ordinal),
            url: file_name.to_owned(),
        }
    }
}

/// Everything a page template can see. Exposed to templates as `Title`,
/// `Chapter`, `Styles`, and `PreviousChapters` (whose entries expose `Name`
/// and `URL`).
pub struct PageContext<'a> {
    /// Plain text; escaped when rendered.
    pub title: &'a str,

    /// The chapter's HTML fragment, inserted verbatim.
    pub chapter: &'a str,

    /// The stylesheet text, inserted verbatim.
    pub styles: &'a str,

    /// Links to every strictly-earlier chapter, in ordinal order.
    pub previous_chapters: &'a [NavigationEntry],
}

/// A parsed page template.
pub struct PageTemplate {
    template: Template,
}

impl PageTemplate {
    /// Parses the built-in page template.
    pub fn builtin() -> Result<PageTemplate> {
        Self::parse(DEFAULT_TEMPLATE)
    }

    /// Parses a page template from Go-template source text.
    pub fn parse(text: &str) -> Result<PageTemplate> {
        let mut template = Template::default();
        template.parse(text).map_err(Error::Template)?;
        Ok(PageTemplate { template })
    }

    /// Renders a full HTML document for `page`.
    pub fn render(&self, page: &PageContext) -> Result<String> {
        let context = Context::from(Value::from(page)).map_err(Error::Template)?;
        let mut buf: Vec<u8> = Vec::new();
        self.template.execute(&mut buf, &context)?;
        Ok(String::from_utf8(buf)?)
    }
}

/// The result of a fallible page-rendering operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error parsing or executing a page template.
#[derive(Debug)]
pub enum Error {
    /// An error during template parsing or execution.
    Template(String),

    /// Returned when the rendered page isn't valid UTF-8.
    Utf8(FromUtf8Error),
}

impl From<String> for Error {
    /// Converts a template error message ([`String`]) into an [`Error`]. This
    /// allows us to use the `?` operator for fallible template operations.
    fn from(err: String) -> Error {
        Error::Template(err)
    }
}

impl From<FromUtf8Error> for Error {
    fn from(err: FromUtf8Error) -> Error {
        Error::Utf8(err)
    }
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as presentable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Template(err) => write!(f, "template: {}", err),
            Error::Utf8(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Template(_) => None,
            Error::Utf8(err) => Some(err),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn render(previous_chapters: &[NavigationEntry]) -> Result<String> {
        PageTemplate::builtin()?.render(&PageContext {
            title: "demo",
            chapter: "<h1>Hello</h1>\n",
            styles: "body { margin: 0; }",
            previous_chapters,
        })
    }

    #[test]
    fn test_first_chapter_has_no_navigation() -> Result<()> {
        let html = render(&[])?;
        assert!(!html.contains("<nav"));
        assert!(!html.contains("<li>"));
        Ok(())
    }

    #[test]
    fn test_navigation_in_ordinal_order() -> Result<()> {
        let html = render(&[
            NavigationEntry::for_chapter(1, "01-aaaaaa.html"),
            NavigationEntry::for_chapter(2, "02-bbbbbb.html"),
        ])?;
        assert_eq!(2, html.matches("<li>").count());
        let first = html
            .find(r#"<li><a href="01-aaaaaa.html">Chapter 1</a></li>"#)
            .expect("first entry");
        let second = html
            .find(r#"<li><a href="02-bbbbbb.html">Chapter 2</a></li>"#)
            .expect("second entry");
        assert!(first < second);
        Ok(())
    }

    #[test]
    fn test_trusted_fields_are_verbatim() -> Result<()> {
        let html = render(&[])?;
        assert!(html.contains("<main class=\"chapter\">\n<h1>Hello</h1>\n</main>"));
        assert!(html.contains("body { margin: 0; }"));
        assert!(html.contains("<title>demo</title>"));
        Ok(())
    }

    #[test]
    fn test_plain_text_is_escaped() -> Result<()> {
        let html = PageTemplate::builtin()?.render(&PageContext {
            title: "Tom & Jerry",
            chapter: "<p>body</p>",
            styles: "",
            previous_chapters: &[NavigationEntry {
                name: String::from("<Prologue>"),
                url: String::from("00-abcdef.html"),
            }],
        })?;
        assert!(html.contains("<title>Tom &amp; Jerry</title>"));
        assert!(html.contains("&lt;Prologue&gt;"));
        assert!(!html.contains("<Prologue>"));
        Ok(())
    }

    #[test]
    fn test_custom_template() -> Result<()> {
        let template = PageTemplate::parse(
            "{{.Title}}|{{range .PreviousChapters}}{{.Name}}={{.URL}};{{end}}|{{.Chapter}}",
        )?;
        let html = template.render(&PageContext {
            title: "t",
            chapter: "<p>c</p>",
            styles: "",
            previous_chapters: &[NavigationEntry::for_chapter(1, "01-x.html")],
        })?;
        assert_eq!("t|Chapter 1=01-x.html;|<p>c</p>", html);
        Ok(())
    }

    #[test]
    fn test_invalid_template() {
        assert!(matches!(
            PageTemplate::parse("{{.Title"),
            Err(Error::Template(_))
        ));
    }
}
