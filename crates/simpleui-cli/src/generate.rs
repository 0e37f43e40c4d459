//! Load, validate, generate, write.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use simpleui_ast::{has_errors, validate, Diagnostic, Document, Severity, ValidationOptions};
use simpleui_codegen::{generate, BaseStylesheet, PageOptions};

use crate::config::Config;

/// Name of the output directory created next to the input by default.
pub const DEFAULT_DESTINATION: &str = "generated";

/// Everything one generation needs, resolved from flags and config.
#[derive(Debug, Clone)]
pub struct Job {
    pub input: PathBuf,
    pub destination: PathBuf,
    pub base_css: Option<PathBuf>,
    pub html: String,
    pub stylesheet: String,
    pub script: String,
}

impl Job {
    /// Command-line values win over config values.
    pub fn new(
        input: PathBuf,
        destination: Option<PathBuf>,
        base_css: Option<PathBuf>,
        config: &Config,
    ) -> Self {
        let destination = destination
            .or_else(|| config.output.destination.clone())
            .unwrap_or_else(|| input_dir(&input).join(DEFAULT_DESTINATION));
        Self {
            destination,
            base_css: base_css.or_else(|| config.base_css.clone()),
            html: config.output.html.clone(),
            stylesheet: config.output.stylesheet.clone(),
            script: config.output.script.clone(),
            input,
        }
    }

    fn page_options(&self) -> PageOptions {
        PageOptions { stylesheet_href: self.stylesheet.clone(), script_src: self.script.clone() }
    }
}

/// Directory holding `input`; `.` for a bare file name.
pub fn input_dir(input: &Path) -> PathBuf {
    match input.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

// ── Steps ─────────────────────────────────────────────────────────────────

pub fn load_document(path: &Path) -> Result<Document> {
    let file = fs::File::open(path).with_context(|| format!("opening {}", path.display()))?;
    Document::from_json_reader(std::io::BufReader::new(file))
        .with_context(|| format!("loading {}", path.display()))
}

/// The stylesheet at `path`, or the bundled one.
pub fn load_base_stylesheet(path: Option<&Path>) -> Result<BaseStylesheet> {
    match path {
        Some(path) => {
            let src = fs::read_to_string(path)
                .with_context(|| format!("reading base stylesheet {}", path.display()))?;
            BaseStylesheet::parse(&src).with_context(|| format!("parsing {}", path.display()))
        }
        None => BaseStylesheet::bundled().context("parsing bundled base stylesheet"),
    }
}

/// Validate `doc` against the classes `base` defines.
pub fn check_document(doc: &Document, base: &BaseStylesheet) -> Vec<Diagnostic> {
    let opts = ValidationOptions::with_known_classes(base.class_names());
    validate(doc, &opts)
}

pub fn log_diagnostics(input: &Path, diags: &[Diagnostic]) {
    for d in diags {
        match d.severity {
            Severity::Error => log::error!("{}: {d}", input.display()),
            Severity::Warning => log::warn!("{}: {d}", input.display()),
        }
    }
}

/// Run one full generation and return the files written.
///
/// Nothing is written unless validation passes and all three artifacts
/// were produced.
pub fn run(job: &Job) -> Result<Vec<PathBuf>> {
    let doc = load_document(&job.input)?;
    let base = load_base_stylesheet(job.base_css.as_deref())?;

    let diags = check_document(&doc, &base);
    log_diagnostics(&job.input, &diags);
    if has_errors(&diags) {
        let count = diags.iter().filter(|d| d.is_error()).count();
        bail!("{} has {count} error(s); nothing written", job.input.display());
    }

    let artifacts = generate(&doc, &base, &job.page_options())
        .with_context(|| format!("generating {}", job.input.display()))?;
    for warning in &artifacts.warnings {
        log::warn!("{}: {warning}", job.input.display());
    }

    fs::create_dir_all(&job.destination)
        .with_context(|| format!("creating {}", job.destination.display()))?;
    let written = write_all(
        &job.destination,
        [(&job.html, &artifacts.html), (&job.stylesheet, &artifacts.css), (&job.script, &artifacts.js)],
    )?;
    log::info!("generated {} into {}", job.input.display(), job.destination.display());
    Ok(written)
}

/// Hidden sibling `name` is staged under before the rename.
fn staging_name(name: &str) -> String {
    format!(".{name}.tmp")
}

/// Stage every file, then rename them into place. If any staging write
/// fails, the staged files are removed and the old outputs are untouched.
fn write_all<const N: usize>(dir: &Path, files: [(&String, &String); N]) -> Result<Vec<PathBuf>> {
    let mut staged = Vec::with_capacity(N);
    for (name, content) in files {
        let tmp = dir.join(staging_name(name));
        if let Err(err) = fs::write(&tmp, content) {
            discard(&staged);
            let _ = fs::remove_file(&tmp);
            return Err(err).with_context(|| format!("writing {}", dir.join(name).display()));
        }
        staged.push((tmp, dir.join(name)));
    }

    let mut written = Vec::with_capacity(N);
    for (i, (tmp, path)) in staged.iter().enumerate() {
        if let Err(err) = fs::rename(tmp, path) {
            discard(&staged[i..]);
            return Err(err).with_context(|| format!("replacing {}", path.display()));
        }
        log::debug!("wrote {}", path.display());
        written.push(path.clone());
    }
    Ok(written)
}

fn discard(staged: &[(PathBuf, PathBuf)]) {
    for (tmp, _) in staged {
        if let Err(err) = fs::remove_file(tmp) {
            log::debug!("removing {}: {err}", tmp.display());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HELLO: &str = r#"{
        "head": [ { "type": "Title", "text": { "type": "StringLiteral", "value": "Hello" } } ],
        "body": [
            { "type": "Paragraph", "attrs": { "classes": ["card"] },
              "text": { "type": "StringLiteral", "value": "Hi" } }
        ],
        "statements": [ { "type": "Alert", "value": { "type": "NumberLiteral", "value": 1 } } ]
    }"#;

    fn job_for(dir: &Path, json: &str) -> Job {
        let input = dir.join("page.json");
        fs::write(&input, json).unwrap();
        Job::new(input, None, None, &Config::default())
    }

    #[test]
    fn writes_three_artifacts_to_default_destination() {
        let dir = tempfile::tempdir().unwrap();
        let job = job_for(dir.path(), HELLO);
        let written = run(&job).unwrap();

        let out = dir.path().join(DEFAULT_DESTINATION);
        assert_eq!(
            written,
            vec![out.join("index.html"), out.join("stylesheet.css"), out.join("script.js")]
        );
        let html = fs::read_to_string(out.join("index.html")).unwrap();
        assert!(html.contains("<title>Hello</title>"));
        assert!(html.contains("<p class=\"card\">Hi</p>"));
        let css = fs::read_to_string(out.join("stylesheet.css")).unwrap();
        assert!(css.contains(".card"));
        assert_eq!(fs::read_to_string(out.join("script.js")).unwrap(), "alert(1);\n");
    }

    #[test]
    fn no_staging_files_are_left_behind() {
        let dir = tempfile::tempdir().unwrap();
        let job = job_for(dir.path(), HELLO);
        run(&job).unwrap();
        run(&job).unwrap();

        let mut names: Vec<String> = fs::read_dir(&job.destination)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        assert_eq!(names, ["index.html", "script.js", "stylesheet.css"]);
    }

    #[test]
    fn failed_write_keeps_previous_outputs() {
        let dir = tempfile::tempdir().unwrap();
        let job = job_for(dir.path(), HELLO);
        run(&job).unwrap();
        let before = fs::read_to_string(job.destination.join("index.html")).unwrap();

        // A directory squatting on the script's staging name makes the
        // third write fail after the first two succeeded.
        fs::write(&job.input, HELLO.replace("Hello", "Changed")).unwrap();
        fs::create_dir(job.destination.join(staging_name("script.js"))).unwrap();
        assert!(run(&job).is_err());

        let after = fs::read_to_string(job.destination.join("index.html")).unwrap();
        assert_eq!(after, before);
        assert!(!job.destination.join(staging_name("index.html")).exists());
        assert!(!job.destination.join(staging_name("stylesheet.css")).exists());
    }

    #[test]
    fn flags_override_config() {
        let config = Config::from_toml_str("[output]\ndestination = \"/from/config\"\n").unwrap();
        let job = Job::new("a/b.json".into(), Some("cli-out".into()), None, &config);
        assert_eq!(job.destination, PathBuf::from("cli-out"));
        let job = Job::new("a/b.json".into(), None, None, &config);
        assert_eq!(job.destination, PathBuf::from("/from/config"));
    }

    #[test]
    fn bare_input_name_defaults_next_to_cwd() {
        let job = Job::new("b.json".into(), None, None, &Config::default());
        assert_eq!(job.destination, PathBuf::from(".").join(DEFAULT_DESTINATION));
    }

    #[test]
    fn validation_errors_write_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let job = job_for(
            dir.path(),
            r#"{ "body": [ { "type": "Heading", "level": 7,
                 "text": { "type": "StringLiteral", "value": "x" } } ] }"#,
        );
        let err = run(&job).unwrap_err();
        assert!(err.to_string().contains("nothing written"));
        assert!(!dir.path().join(DEFAULT_DESTINATION).exists());
    }

    #[test]
    fn generation_errors_write_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let job = job_for(
            dir.path(),
            r#"{ "body": [ { "type": "Paragraph",
                 "text": { "type": "TextboxValue", "textbox": "age" } } ] }"#,
        );
        assert!(run(&job).is_err());
        assert!(!dir.path().join(DEFAULT_DESTINATION).exists());
    }

    #[test]
    fn malformed_json_names_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let job = job_for(dir.path(), "{ \"body\": [ { \"type\": \"Blink\" } ] }");
        let err = run(&job).unwrap_err();
        assert!(format!("{err:#}").contains("page.json"));
    }

    #[test]
    fn custom_base_stylesheet() {
        let dir = tempfile::tempdir().unwrap();
        let css = dir.path().join("base.css");
        fs::write(&css, ".card { border: 1px solid red; }\n").unwrap();
        let mut job = job_for(dir.path(), HELLO);
        job.base_css = Some(css);
        run(&job).unwrap();
        let out = fs::read_to_string(job.destination.join("stylesheet.css")).unwrap();
        assert!(out.contains(".card { border: 1px solid red; }"));
    }
}
