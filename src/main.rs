use anyhow::{Context, Result};
use clap::{App, Arg, ArgMatches};
use folio::build::build_books;
use folio::config::Config;
use log::info;
use std::path::Path;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run(&app().get_matches()) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn app() -> App<'static, 'static> {
    App::new("folio")
        .version(env!("CARGO_PKG_VERSION"))
        .about(env!("CARGO_PKG_DESCRIPTION"))
        .arg(
            Arg::with_name("source")
                .long("source")
                .short("s")
                .value_name("DIR")
                .takes_value(true)
                .default_value(".")
                .help("The directory holding one subdirectory per book"),
        )
        .arg(
            Arg::with_name("output")
                .long("output")
                .short("o")
                .value_name("DIR")
                .takes_value(true)
                .default_value("docs")
                .help("The directory to write books into"),
        )
        .arg(
            Arg::with_name("template")
                .long("template")
                .value_name("FILE")
                .takes_value(true)
                .help("A page template replacing the built-in one"),
        )
        .arg(
            Arg::with_name("stylesheet")
                .long("stylesheet")
                .value_name("FILE")
                .takes_value(true)
                .help("A stylesheet replacing the built-in one"),
        )
}

fn run(matches: &ArgMatches) -> Result<()> {
    let source = Path::new(matches.value_of("source").unwrap_or("."));
    let output = Path::new(matches.value_of("output").unwrap_or("docs"));

    let mut config = Config::new(source, output)?;
    if let Some(template) = matches.value_of("template") {
        config = config.with_template_file(Path::new(template))?;
    }
    if let Some(stylesheet) = matches.value_of("stylesheet") {
        config = config.with_stylesheet_file(Path::new(stylesheet))?;
    }

    let summary = build_books(&config)
        .with_context(|| format!("building books from `{}`", source.display()))?;
    info!(
        "Built {} books ({} chapters) into `{}`",
        summary.books,
        summary.chapters,
        output.display()
    );
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_defaults() {
        let matches = app().get_matches_from(vec!["folio"]);
        assert_eq!(Some("."), matches.value_of("source"));
        assert_eq!(Some("docs"), matches.value_of("output"));
        assert_eq!(None, matches.value_of("template"));
        assert_eq!(None, matches.value_of("stylesheet"));
    }

    #[test]
    fn test_overrides() {
        let matches = app().get_matches_from(vec![
            "folio",
            "--source",
            "books",
            "-o",
            "site",
            "--stylesheet",
            "print.css",
        ]);
        assert_eq!(Some("books"), matches.value_of("source"));
        assert_eq!(Some("site"), matches.value_of("output"));
        assert_eq!(Some("print.css"), matches.value_of("stylesheet"));
    }

    #[test]
    fn test_run_reports_missing_source() {
        let dir = tempfile::TempDir::new().unwrap();
        let missing = dir.path().join("missing");
        let matches = app().get_matches_from(vec![
            "folio",
            "--source",
            missing.to_str().unwrap(),
            "--output",
            dir.path().join("docs").to_str().unwrap(),
        ]);
        let err = run(&matches).unwrap_err();
        assert!(format!("{:#}", err).starts_with("building books from"));
    }
}
