use crate::page::{NavigationEntry, PageContext};
use gtmpl_value::Value;
use pulldown_cmark::escape::{escape_href, escape_html};
use std::collections::HashMap;

// Writing into a `String` can't fail, so the escape results are dropped.
fn html(s: &str) -> Value {
    let mut out = String::with_capacity(s.len());
    let _ = escape_html(&mut out, s);
    Value::String(out)
}

fn href(s: &str) -> Value {
    let mut out = String::with_capacity(s.len());
    let _ = escape_href(&mut out, s);
    Value::String(out)
}

impl From<&NavigationEntry> for Value {
    fn from(entry: &NavigationEntry) -> Value {
        let mut m: HashMap<String, Value> = HashMap::new();
        m.insert("Name".to_owned(), html(&entry.name));
        m.insert("URL".to_owned(), href(&entry.url));
        Value::Object(m)
    }
}

impl From<&PageContext<'_>> for Value {
    fn from(page: &PageContext) -> Value {
        let mut m: HashMap<String, Value> = HashMap::new();
        m.insert("Title".to_owned(), html(page.title));
        m.insert("Chapter".to_owned(), Value::String(page.chapter.to_owned()));
        m.insert("Styles".to_owned(), Value::String(page.styles.to_owned()));
        m.insert(
            "PreviousChapters".to_owned(),
            Value::Array(page.previous_chapters.iter().map(Value::from).collect()),
        );
        Value::Object(m)
    }
}
