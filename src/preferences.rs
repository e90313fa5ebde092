use anyhow::{Context, Result};
use minijinja::{Environment, context};
use serde::Deserialize;
use std::fs;
use std::io;
use std::path::Path;

const FILENAME: &str = "runrecap.toml";

const DEFAULT_TITLE_TEMPLATE: &str = "Agent run report ({{ engine }})";

/// Report title template: either an inline Jinja2 string or a path to a
/// template file (relative to the directory the preferences came from).
///
/// In TOML this looks like one of:
///
/// ```toml
/// [title_template]
/// inline = "{{ engine }} run {{ session_id }}"
///
/// # or
///
/// [title_template]
/// file = "title.tmpl"
/// ```
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum TitleTemplate {
    Inline(String),
    File(String),
}

impl Default for TitleTemplate {
    fn default() -> Self {
        TitleTemplate::Inline(DEFAULT_TITLE_TEMPLATE.into())
    }
}

/// User-facing report options stored in `runrecap.toml`.
#[derive(Debug, Deserialize)]
pub struct Preferences {
    /// Byte ceiling for the rich report.
    #[serde(default = "default_size_limit")]
    pub size_limit: usize,

    /// Line ceiling for the plain/terminal conversation body.
    #[serde(default = "default_max_output_lines")]
    pub max_output_lines: usize,

    /// Entry cap for the safe-output preview section.
    #[serde(default = "default_max_preview_entries")]
    pub max_preview_entries: usize,

    /// Report title template (inline or file reference).
    #[serde(default)]
    pub title_template: TitleTemplate,
}

fn default_size_limit() -> usize {
    crate::render::DEFAULT_SIZE_LIMIT
}

fn default_max_output_lines() -> usize {
    crate::render::DEFAULT_LINE_LIMIT
}

fn default_max_preview_entries() -> usize {
    10
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            size_limit: default_size_limit(),
            max_output_lines: default_max_output_lines(),
            max_preview_entries: default_max_preview_entries(),
            title_template: TitleTemplate::default(),
        }
    }
}

impl Preferences {
    /// Load preferences from `runrecap.toml` in `dir`. A missing file
    /// yields defaults; missing keys in an existing file are filled in
    /// with defaults via serde.
    pub fn load(dir: &Path) -> Result<Self> {
        let path = dir.join(FILENAME);
        match fs::read_to_string(&path) {
            Ok(contents) => toml::from_str(&contents)
                .with_context(|| format!("parsing {}", path.display())),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e).with_context(|| format!("reading {}", path.display())),
        }
    }

    /// Load preferences from an explicit file path, which must exist.
    pub fn load_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        toml::from_str(&contents).with_context(|| format!("parsing {}", path.display()))
    }

    /// Render the report title. `dir` anchors file-based templates.
    pub fn render_title(
        &self,
        dir: &Path,
        engine: &str,
        model: Option<&str>,
        session_id: Option<&str>,
    ) -> Result<String> {
        let template = match &self.title_template {
            TitleTemplate::Inline(s) => s.clone(),
            TitleTemplate::File(filename) => {
                let path = dir.join(filename);
                fs::read_to_string(&path)
                    .with_context(|| format!("reading template {}", path.display()))?
            }
        };
        let env = Environment::new();
        let tmpl = env
            .template_from_str(&template)
            .context("parsing title template")?;
        tmpl.render(context! { engine, model, session_id })
            .context("rendering title template")
    }
}
