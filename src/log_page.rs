//! HTML page collecting the Jenkins console, Unity build and test logs.

use std::fs;
use std::path::{Path, PathBuf};

use minijinja::{AutoEscape, Environment, context};
use tracing::{debug, info};

use crate::error::RelayError;

const BUILTIN_TEMPLATE: &str = include_str!("templates/logs.html");
const TEMPLATE_NAME: &str = "logs.html";

/// Lines of `path` with their terminators kept, or nothing when the file
/// does not exist.
pub fn read_log_lines(path: &Path) -> Result<Vec<String>, RelayError> {
    if !path.is_file() {
        debug!(path = %path.display(), "Log file not found, leaving section empty");
        return Ok(Vec::new());
    }
    let bytes = fs::read(path).map_err(|e| RelayError::io(path, e))?;
    Ok(split_keeping_newlines(&String::from_utf8_lossy(&bytes)))
}

/// Splits after every `\n`, so templates can emit lines back to back.
pub fn split_keeping_newlines(text: &str) -> Vec<String> {
    text.split_inclusive('\n').map(str::to_string).collect()
}

/// Where a pipeline run leaves its logs below `WORKING_DIR`.
#[derive(Debug, Clone)]
pub struct LogLocations {
    pub editmode: PathBuf,
    pub playmode: PathBuf,
    pub unity_build: PathBuf,
    pub output: PathBuf,
}

impl LogLocations {
    pub fn under(working_dir: &Path) -> Self {
        Self {
            editmode: working_dir.join("test_results").join("EditMode-tests.log"),
            playmode: working_dir.join("test_results").join("PlayMode-tests.log"),
            unity_build: working_dir.join("build.log"),
            output: working_dir.join("logs.html"),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct LogPage {
    pub ticket: String,
    pub jenkins: Vec<String>,
    pub editmode: Vec<String>,
    pub playmode: Vec<String>,
    pub unity_build: Vec<String>,
}

impl LogPage {
    pub fn collect(
        ticket: impl Into<String>,
        jenkins: Vec<String>,
        locations: &LogLocations,
    ) -> Result<Self, RelayError> {
        Ok(Self {
            ticket: ticket.into(),
            jenkins,
            editmode: read_log_lines(&locations.editmode)?,
            playmode: read_log_lines(&locations.playmode)?,
            unity_build: read_log_lines(&locations.unity_build)?,
        })
    }

    pub fn render(&self, template: &str) -> Result<String, RelayError> {
        let mut env = Environment::new();
        env.set_auto_escape_callback(|_| AutoEscape::Html);
        env.add_template(TEMPLATE_NAME, template)?;
        let rendered = env.get_template(TEMPLATE_NAME)?.render(context! {
            ticket => &self.ticket,
            jenkins => &self.jenkins,
            editMode => &self.editmode,
            playMode => &self.playmode,
            build => &self.unity_build,
        })?;
        Ok(rendered)
    }

    pub fn write(&self, template: &str, output: &Path) -> Result<(), RelayError> {
        let html = self.render(template)?;
        fs::write(output, html).map_err(|e| RelayError::io(output, e))?;
        info!(path = %output.display(), "Wrote log page");
        Ok(())
    }
}

/// Template source: an explicit override, then the workspace's
/// `python/log-template/logs.html`, then the built-in page.
pub fn load_template(
    explicit: Option<&Path>,
    workspace: Option<&Path>,
) -> Result<String, RelayError> {
    if let Some(path) = explicit {
        return fs::read_to_string(path).map_err(|e| RelayError::io(path, e));
    }
    if let Some(workspace) = workspace {
        let path = workspace.join("python").join("log-template").join(TEMPLATE_NAME);
        if path.is_file() {
            debug!(path = %path.display(), "Using workspace log template");
            return fs::read_to_string(&path).map_err(|e| RelayError::io(&path, e));
        }
    }
    Ok(BUILTIN_TEMPLATE.to_string())
}
