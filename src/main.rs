use anyhow::Result;
use clap::{Parser, Subcommand};
use regex::Regex;
use tracing_subscriber::EnvFilter;

use release_tools::boundary::BoundaryWarning;
use release_tools::config::{self, ReleaseConfig};
use release_tools::error::ReleaseError;
use release_tools::projects;
use release_tools::runner::{self, SystemRunner};
use release_tools::ui::{self, Prompt, TerminalPrompt};
use release_tools::version;

#[derive(clap::Parser)]
#[command(
    name = "release-tools",
    version,
    about = "Version arithmetic and project selection helpers for release scripts"
)]
struct Args {
    #[arg(short, long, global = true, help = "Custom configuration file path")]
    config: Option<String>,

    #[arg(short, long, global = true, help = "Log debug details to stderr")]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the integer encoding of a version
    Encode { version: String },

    /// Print the version encoded by an integer
    Decode { value: u64 },

    /// Print the suggested release after a version
    Next {
        version: String,

        #[arg(long, help = "Ask for the release version, offering the suggestion")]
        prompt: bool,
    },

    /// Print whether NEW is a strict increase over OLD
    IsIncrease { old: String, new: String },

    /// Print the greatest version among the candidates
    Max { candidates: Vec<String> },

    /// Resolve project names (plus their requirements) to release
    Projects {
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },

    /// Show the selectable projects
    List,

    /// Fail unless every tool is installed
    CheckTools {
        #[arg(required = true)]
        tools: Vec<String>,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    if let Err(e) = run(args) {
        ui::display_error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn run(args: Args) -> Result<()> {
    match args.command {
        Command::Encode { version: text } => {
            report_radix_warnings(&text)?;
            println!("{}", version::encode(&text)?);
        }
        Command::Decode { value } => {
            println!("{}", version::decode(value));
        }
        Command::Next {
            version: text,
            prompt,
        } => {
            report_radix_warnings(&text)?;
            let suggested = version::increment(&text)?;
            let chosen = if prompt {
                choose_version(&mut TerminalPrompt::stdio(), &text, &suggested)?
            } else {
                suggested
            };
            println!("{}", chosen);
        }
        Command::IsIncrease { old, new } => {
            let increased = version::is_increase(&old, &new)?;
            if !increased {
                ui::display_boundary_warning(&BoundaryWarning::NotIncreased { old, new });
            }
            println!("{}", increased);
        }
        Command::Max { candidates } => match version::max_version(&candidates)? {
            Some(max) => println!("{}", max),
            None => {
                ui::display_boundary_warning(&BoundaryWarning::NoVersionCandidates {
                    inspected: candidates.len(),
                });
                return Err(ReleaseError::no_match("no candidate looks like a version").into());
            }
        },
        Command::Projects { args: words } => {
            let config = config::load_config(args.config.as_deref())?;
            select_projects(&config, &words)?;
        }
        Command::List => {
            let config = config::load_config(args.config.as_deref())?;
            ui::display_project_table(&config, false);
        }
        Command::CheckTools { tools } => {
            let tools: Vec<&str> = tools.iter().map(String::as_str).collect();
            runner::check_tools(&SystemRunner, &tools)?;
            ui::display_success(&format!("Found {}", tools.join(", ")));
        }
    }

    Ok(())
}

fn select_projects(config: &ReleaseConfig, words: &[String]) -> Result<()> {
    let mut selection = match projects::read_projects(config, words) {
        Ok(selection) => selection,
        Err(e) => {
            ui::display_project_table(config, true);
            return Err(e.into());
        }
    };

    projects::add_project_dependencies(config, &mut selection);
    if projects::read_auto(config, words) {
        ui::display_status(&format!("Running unattended ({})", config.auto_flag));
    }

    ui::display_selected_projects(config, &selection);
    Ok(())
}

/// Ask for the release version until the answer is an increase or the user accepts it.
fn choose_version(prompt: &mut dyn Prompt, current: &str, suggested: &str) -> Result<String> {
    let full_version = Regex::new(&format!("{}$", version::VERSION_PATTERN))?;
    loop {
        let answer = prompt.prompt_with_default(
            &format!("Release version after {}", current),
            suggested,
            Some(&full_version),
        )?;

        if version::is_increase(current, &answer)? {
            return Ok(answer);
        }

        ui::display_boundary_warning(&BoundaryWarning::NotIncreased {
            old: current.to_string(),
            new: answer.clone(),
        });
        if prompt.confirm("Use it anyway?")? {
            return Ok(answer);
        }
    }
}

fn report_radix_warnings(text: &str) -> Result<()> {
    for warning in version::radix_warnings(text)? {
        ui::display_boundary_warning(&warning);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use release_tools::ui::ScriptedPrompt;

    #[test]
    fn test_choose_version_accepts_default() {
        let mut prompt = ScriptedPrompt::new([""]);
        assert_eq!(choose_version(&mut prompt, "1.0.3", "1.0.4").unwrap(), "1.0.4");
    }

    #[test]
    fn test_choose_version_skips_invalid_answers() {
        let mut prompt = ScriptedPrompt::new(["soon", "1.1.0"]);
        assert_eq!(choose_version(&mut prompt, "1.0.3", "1.0.4").unwrap(), "1.1.0");
    }

    #[test]
    fn test_choose_version_rejects_non_ascii_digits() {
        let mut prompt = ScriptedPrompt::new(["\u{0661}.\u{0662}.\u{0663}", "1.1.0"]);
        assert_eq!(choose_version(&mut prompt, "1.0.3", "1.0.4").unwrap(), "1.1.0");
        assert_eq!(prompt.asked.len(), 2);
    }

    #[test]
    fn test_choose_version_asks_again_for_non_increase() {
        let mut prompt = ScriptedPrompt::new(["1.0.2", "n", "1.0.5"]);
        assert_eq!(choose_version(&mut prompt, "1.0.3", "1.0.4").unwrap(), "1.0.5");
        assert_eq!(prompt.asked.len(), 3);
    }

    #[test]
    fn test_choose_version_keeps_confirmed_non_increase() {
        let mut prompt = ScriptedPrompt::new(["1.0.3", "y"]);
        assert_eq!(choose_version(&mut prompt, "1.0.3", "1.0.4").unwrap(), "1.0.3");
    }
}
