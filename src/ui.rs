// UI layer: a small interactive menu built on `dialoguer`. It picks a file,
// hands it to the API client and prints whatever the backend answered.

use crate::api::{ClientError, GraderClient, UploadFile};
use anyhow::{Context, Result};
use crossterm::style::Stylize;
use dialoguer::{Input, Select};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Deserialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::warn;

const LAST_DIR_FILE: &str = ".grader_last_dir";
const DOCUMENT_EXTENSIONS: &[&str] = &["pdf", "docx", "html", "htm", "txt", "md"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    UploadExample,
    Grade,
}

impl Action {
    fn label(self) -> &'static str {
        match self {
            Action::UploadExample => "Upload",
            Action::Grade => "Grading",
        }
    }
}

/// Main interactive menu. Runs until the user chooses "Exit".
pub async fn main_menu(client: GraderClient) -> Result<()> {
    println!("Grading backend: {}", client.base_url());
    loop {
        let items = vec!["Upload professor example", "Grade homework", "Exit"];
        let selection = Select::new().items(&items).default(0).interact()?;
        let action = match selection {
            0 => Action::UploadExample,
            1 => Action::Grade,
            2 => break,
            _ => continue,
        };
        handle_action(&client, action).await?;
    }
    Ok(())
}

/// Pick a file, send it, print the result. Client failures are reported and
/// the menu continues; only terminal errors bubble up.
async fn handle_action(client: &GraderClient, action: Action) -> Result<()> {
    let Some(path) = choose_file().await? else {
        println!("No file selected.");
        return Ok(());
    };

    if let Some(dir) = path.parent() {
        if let Err(e) = persist_last_dir(dir) {
            warn!("Could not remember last directory: {e:#}");
        }
    }

    let file = match UploadFile::from_path(&path).await {
        Ok(file) => file,
        Err(e) => {
            report_failure(action, e);
            return Ok(());
        }
    };

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::with_template("{spinner} {msg}")?);
    spinner.set_message(format!("Sending {}...", file.file_name));
    spinner.enable_steady_tick(Duration::from_millis(100));

    let result = match action {
        Action::UploadExample => client.upload_professor_example(file).await,
        Action::Grade => client.grade_homework(file).await,
    };
    spinner.finish_and_clear();

    match result {
        Ok(value) => print_report(&summarize(&value)),
        Err(e) => report_failure(action, e),
    }
    Ok(())
}

fn report_failure(action: Action, err: ClientError) {
    let err = anyhow::Error::new(err);
    println!("{} {err:#}", format!("{} failed:", action.label()).red());
}

/// Ask for a file, either typed in or through the native file dialog.
async fn choose_file() -> Result<Option<PathBuf>> {
    let last_dir = load_last_dir().ok();
    let modes = vec!["Type a path", "Browse..."];
    let mode = Select::new()
        .with_prompt("Select file")
        .items(&modes)
        .default(0)
        .interact()?;

    if mode == 1 {
        let picked = tokio::task::spawn_blocking(move || {
            let mut dialog = rfd::FileDialog::new().add_filter("Documents", DOCUMENT_EXTENSIONS);
            if let Some(dir) = last_dir {
                dialog = dialog.set_directory(dir);
            }
            dialog.pick_file()
        })
        .await
        .context("File dialog task failed")?;
        return Ok(picked);
    }

    let mut input = Input::<String>::new();
    input.with_prompt("File path");
    if let Some(dir) = &last_dir {
        input.with_initial_text(format!("{}/", dir.display()));
    }
    let raw = input.interact_text()?;
    Ok(parse_path(&raw))
}

fn parse_path(raw: &str) -> Option<PathBuf> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(PathBuf::from(trimmed))
    }
}

/// Display-only view of a backend answer. Every field is optional so any
/// JSON object is accepted.
#[derive(Debug, Default, Deserialize)]
struct GradeReport {
    score: Option<Value>,
    feedback: Option<String>,
    message: Option<String>,
    error: Option<Value>,
}

/// One printable line of a backend answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportLine {
    Error(String),
    Score(String),
    Feedback(String),
    Message(String),
    Raw(String),
}

/// Turn a backend answer into printable lines. Known fields are picked out;
/// anything else is shown as pretty JSON.
pub fn summarize(value: &Value) -> Vec<ReportLine> {
    let report: GradeReport = serde_json::from_value(value.clone()).unwrap_or_default();

    let mut lines = Vec::new();
    if let Some(error) = &report.error {
        lines.push(ReportLine::Error(plain(error)));
    }
    if let Some(score) = &report.score {
        lines.push(ReportLine::Score(plain(score)));
    }
    if let Some(feedback) = report.feedback {
        lines.push(ReportLine::Feedback(feedback));
    }
    if let Some(message) = report.message {
        lines.push(ReportLine::Message(message));
    }

    if lines.is_empty() {
        let pretty = serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string());
        lines.push(ReportLine::Raw(pretty));
    }
    lines
}

// Strings without their JSON quotes.
fn plain(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn print_report(lines: &[ReportLine]) {
    for line in lines {
        match line {
            ReportLine::Error(e) => println!("{} {}", "Error:".red().bold(), e.as_str().red()),
            ReportLine::Score(s) => println!("{} {}", "Score:".green().bold(), s),
            ReportLine::Feedback(f) => println!("{}\n{}", "Feedback:".bold(), f),
            ReportLine::Message(m) => println!("{}", m.as_str().green()),
            ReportLine::Raw(r) => println!("{r}"),
        }
    }
}

fn last_dir_file() -> PathBuf {
    let dir = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    dir.join(LAST_DIR_FILE)
}

/// Remember the directory of the last chosen file in the home directory.
fn persist_last_dir(dir: &Path) -> Result<()> {
    std::fs::write(last_dir_file(), dir.to_string_lossy().as_bytes())?;
    Ok(())
}

fn load_last_dir() -> Result<PathBuf> {
    let data = std::fs::read_to_string(last_dir_file())?;
    let dir = PathBuf::from(data.trim());
    if !dir.is_dir() {
        anyhow::bail!("Remembered directory {dir:?} no longer exists");
    }
    Ok(dir)
}
