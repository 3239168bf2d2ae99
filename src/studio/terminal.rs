//! Line-oriented front end for the studio. Plain text edits the prompt;
//! lines starting with `/` are commands.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing::info;

use super::{GenerateOutcome, Studio};
use crate::types::EXAMPLE_PROMPTS;
use crate::ui::{
    render_error, render_gallery, render_history, render_loading, render_prompt_input,
    SettingsForm, RECENT_PROMPTS_SHOWN,
};
use crate::utils::download::{default_download_name, download_image};

const LOADING_TEXT: &str = "Generating your image...";
const LOADING_REFRESH: Duration = Duration::from_secs(1);

const HELP_TEXT: &str = "\
Type a description to set the prompt, then:
  /generate          generate an image from the prompt
  /example N         use example prompt N
  /recent            list recent prompts
  /use N             reuse recent prompt N
  /history           list generated images
  /select N          load the prompt of history entry N
  /download N        save history entry N to disk
  /clear             clear image history
  /settings          open generation settings
  /dismiss           hide the current error
  /help              show this help
  /quit              exit";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    SetPrompt(String),
    Generate,
    Example(usize),
    Recent,
    UsePrompt(usize),
    History,
    Select(usize),
    Download(usize),
    Clear,
    OpenSettings,
    Model(usize),
    Size(usize),
    System(String),
    Reset,
    Save,
    Cancel,
    Dismiss,
    Help,
    Quit,
    Invalid(String),
}

/// Parses one input line. Numbered arguments are one-based on screen and
/// zero-based in the returned command.
pub fn parse_command(line: &str) -> Option<Command> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    let Some(rest) = line.strip_prefix('/') else {
        return Some(Command::SetPrompt(line.to_string()));
    };

    let (name, arg) = match rest.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (rest, ""),
    };
    let index = |build: fn(usize) -> Command| match arg.parse::<usize>() {
        Ok(value) if value > 0 => build(value - 1),
        _ => Command::Invalid(format!("/{name} expects a number starting at 1")),
    };

    let command = match name.to_ascii_lowercase().as_str() {
        "generate" | "g" => Command::Generate,
        "example" => index(Command::Example),
        "recent" => Command::Recent,
        "use" => index(Command::UsePrompt),
        "history" => Command::History,
        "select" => index(Command::Select),
        "download" => index(Command::Download),
        "clear" => Command::Clear,
        "settings" => Command::OpenSettings,
        "model" => index(Command::Model),
        "size" => index(Command::Size),
        "system" => Command::System(arg.to_string()),
        "reset" => Command::Reset,
        "save" => Command::Save,
        "cancel" => Command::Cancel,
        "dismiss" => Command::Dismiss,
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        other => Command::Invalid(format!("Unknown command /{other}. Try /help")),
    };
    Some(command)
}

fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

async fn render_main(studio: &Studio) -> String {
    let recent = studio.prompt_history().await;
    let mut out = String::new();
    if let Some(banner) = render_error(studio.error()) {
        out.push_str(&banner);
        out.push_str("\n\n");
    }
    out.push_str(&render_prompt_input(
        studio.prompt(),
        &studio.settings().system_prompt,
        &recent,
        studio.is_generating(),
    ));
    out.push('\n');
    out.push_str(&render_gallery(studio.images()));
    out
}

async fn run_generation(studio: &mut Studio) -> GenerateOutcome {
    let progress = studio.progress_handle();
    let mut ticker = tokio::time::interval(LOADING_REFRESH);
    let generation = studio.generate_image();
    tokio::pin!(generation);

    loop {
        tokio::select! {
            outcome = &mut generation => break outcome,
            _ = ticker.tick() => println!("{}", render_loading(LOADING_TEXT, progress.get())),
        }
    }
}

struct Session {
    studio: Studio,
    download_dir: PathBuf,
    form: Option<SettingsForm>,
    input: Lines<BufReader<Stdin>>,
}

impl Session {
    async fn confirm(&mut self, question: &str) -> Result<bool> {
        println!("{question} [y/N]");
        let answer = self.input.next_line().await?.unwrap_or_default();
        Ok(is_affirmative(&answer))
    }

    fn form_mut(&mut self) -> Option<&mut SettingsForm> {
        if self.form.is_none() {
            println!("Open /settings first.");
        }
        self.form.as_mut()
    }

    /// Returns false when the session should end.
    async fn handle(&mut self, command: Command) -> Result<bool> {
        match command {
            Command::SetPrompt(prompt) => {
                self.studio.set_prompt(prompt);
                println!("Prompt set. /generate when ready.");
            }
            Command::Generate => match run_generation(&mut self.studio).await {
                GenerateOutcome::Skipped => println!("Enter a prompt first."),
                GenerateOutcome::Generated(_) | GenerateOutcome::Failed(_) => {
                    println!("{}", render_main(&self.studio).await)
                }
            },
            Command::Example(index) => match EXAMPLE_PROMPTS.get(index) {
                Some(example) => {
                    self.studio.set_prompt(*example);
                    println!("Prompt set: {example}");
                }
                None => println!("There are {} examples.", EXAMPLE_PROMPTS.len()),
            },
            Command::Recent => println!("{}", render_main(&self.studio).await),
            Command::UsePrompt(index) => {
                let recent = self.studio.prompt_history().await;
                match recent.iter().take(RECENT_PROMPTS_SHOWN).nth(index) {
                    Some(entry) => {
                        self.studio.set_prompt(entry.prompt.clone());
                        println!("Prompt set: {}", entry.prompt);
                    }
                    None => println!("No recent prompt {}.", index + 1),
                }
            }
            Command::History => println!("{}", render_history(self.studio.images())),
            Command::Select(index) => {
                if self.studio.select_image(index) {
                    println!("Prompt set: {}", self.studio.prompt());
                } else {
                    println!("No history entry {}.", index + 1);
                }
            }
            Command::Download(index) => {
                let Some(image) = self.studio.images().get(index).cloned() else {
                    println!("No history entry {}.", index + 1);
                    return Ok(true);
                };
                let filename = default_download_name(&image.id);
                match download_image(&image.url, &self.download_dir, &filename).await {
                    Some(path) => println!("Saved {}", path.display()),
                    None => println!("Download failed. See the log for details."),
                }
            }
            Command::Clear => {
                if self.studio.images().is_empty() {
                    println!("History is already empty.");
                } else {
                    let confirmed = self
                        .confirm("Are you sure you want to clear all image history?")
                        .await?;
                    if self.studio.clear_history(|| confirmed).await {
                        println!("Image history cleared.");
                    }
                }
            }
            Command::OpenSettings => {
                self.studio.open_settings();
                let form = SettingsForm::open(self.studio.settings());
                println!("{}", form.render());
                self.form = Some(form);
            }
            Command::Model(index) => {
                if let Some(form) = self.form_mut() {
                    if form.select_model(index) {
                        println!("{}", form.render());
                    } else {
                        println!("No model {}.", index + 1);
                    }
                }
            }
            Command::Size(index) => {
                if let Some(form) = self.form_mut() {
                    if form.select_dimensions(index) {
                        println!("{}", form.render());
                    } else {
                        println!("No size preset {}.", index + 1);
                    }
                }
            }
            Command::System(text) => {
                match self.form.as_mut() {
                    Some(form) => {
                        form.set_system_prompt(text);
                        println!("{}", form.render());
                    }
                    None => {
                        self.studio.set_system_prompt(text);
                        println!("System prompt updated for this session.");
                    }
                }
            }
            Command::Reset => {
                if let Some(form) = self.form_mut() {
                    form.reset();
                    println!("{}", form.render());
                }
            }
            Command::Save => {
                if let Some(form) = self.form.take() {
                    self.studio.update_settings(form.into_settings()).await;
                    self.studio.close_settings();
                    println!("Settings saved.");
                } else {
                    println!("Open /settings first.");
                }
            }
            Command::Cancel => {
                self.form = None;
                if self.studio.show_settings() {
                    self.studio.close_settings();
                    println!("Settings discarded.");
                }
            }
            Command::Dismiss => self.studio.dismiss_error(),
            Command::Help => println!("{HELP_TEXT}"),
            Command::Quit => return Ok(false),
            Command::Invalid(message) => println!("{message}"),
        }
        Ok(true)
    }
}

pub async fn run(studio: Studio, download_dir: &Path) -> Result<()> {
    let mut session = Session {
        studio,
        download_dir: download_dir.to_path_buf(),
        form: None,
        input: BufReader::new(tokio::io::stdin()).lines(),
    };

    println!("{}", render_main(&session.studio).await);
    println!("{HELP_TEXT}");

    while let Some(line) = session.input.next_line().await? {
        let Some(command) = parse_command(&line) else {
            continue;
        };
        if !session.handle(command).await? {
            break;
        }
    }

    info!("Studio session ended");
    Ok(())
}
