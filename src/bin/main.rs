use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use crossterm::cursor::MoveTo;
use crossterm::execute;
use crossterm::style::Stylize;
use crossterm::terminal::{Clear, ClearType};
use std::io::{stdin, stdout, Write};
use std::path::PathBuf;
use vocab_core::{AddOutcome, PracticeSession, RoundState, Trainer, TrainerConfig, TrainerError};

#[derive(Parser)]
#[command(name = "vocab", about = "Personal vocabulary trainer", version)]
struct Cli {
    /// TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding the saved words (overrides the config file)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Add a word, or a new definition for an existing word
    Add {
        term: String,
        definition: String,
    },
    /// Remove words by their number in `list`
    Remove {
        #[arg(required = true)]
        numbers: Vec<usize>,
    },
    /// Show the word bank
    List,
    /// Start a multiple-choice practice session
    Practice,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = TrainerConfig::load_or_default(cli.config.as_deref())
        .context("Could not load configuration")?;
    if let Some(dir) = cli.data_dir {
        config.data_dir = dir;
    }
    let mut trainer = Trainer::open(&config);

    match cli.command {
        None => print_summary(&trainer),
        Some(Command::Add { term, definition }) => match trainer.add_word(&term, &definition) {
            Ok(AddOutcome::Inserted { .. }) => println!("Added '{}'.", term.trim()),
            Ok(AddOutcome::Merged { added: 0, .. }) => {
                println!("'{}' already has that definition.", term.trim())
            }
            Ok(AddOutcome::Merged { .. }) => {
                println!("Added a new definition to '{}'.", term.trim())
            }
            Err(e @ (TrainerError::EmptyTerm | TrainerError::EmptyDefinition)) => {
                eprintln!("Missing information: {}", e);
                std::process::exit(2);
            }
            Err(e) => return Err(e.into()),
        },
        Some(Command::Remove { numbers }) => {
            let indices: Vec<usize> = numbers.iter().map(|n| n.wrapping_sub(1)).collect();
            match trainer.remove_words(&indices) {
                0 => eprintln!("No such word number; see `vocab list`."),
                removed => println!("Removed {} word(s).", removed),
            }
        }
        Some(Command::List) => print_word_bank(&trainer),
        Some(Command::Practice) => run_practice(&trainer)?,
    }
    Ok(())
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();
}

fn print_summary(trainer: &Trainer) {
    println!("{}", "Word Memory".bold());
    println!("{} words in your collection", trainer.store().len());
    println!("Try `vocab add`, `vocab list` or `vocab practice`.");
}

fn print_word_bank(trainer: &Trainer) {
    if trainer.store().is_empty() {
        println!("Your word bank is empty.");
        return;
    }
    for (i, word) in trainer.words().iter().enumerate() {
        println!("{:>3}. {}", i + 1, word.term().bold());
        for definition in word.definitions() {
            println!("       • {}", definition.as_str().dark_grey());
        }
    }
}

fn run_practice(trainer: &Trainer) -> Result<()> {
    let mut session = trainer.start_practice();
    if session.is_empty() {
        println!("No words to practice!");
        println!("Add some words first");
        return Ok(());
    }

    loop {
        print_round(&session)?;

        let mut input = String::new();
        if stdin().read_line(&mut input)? == 0 {
            break;
        }
        let cmd = input.trim();

        match (cmd, session.state()) {
            ("exit", _) => break,
            ("", RoundState::Presenting) => {
                session.submit()?;
            }
            ("", RoundState::Graded { .. }) => trainer.next_round(&mut session),
            (s, RoundState::Presenting) if s.starts_with(':') && s.len() > 1 => {
                // Toggle choice :1, :2 etc
                if let Ok(n) = s[1..].parse::<usize>() {
                    if let Some(choice) = n.checked_sub(1).and_then(|i| session.choices().get(i)) {
                        let choice = choice.clone();
                        session.toggle_selection(&choice)?;
                    }
                }
            }
            _ => {}
        }
    }
    Ok(())
}

fn print_round(session: &PracticeSession) -> Result<()> {
    let mut out = stdout();
    execute!(out, Clear(ClearType::All), MoveTo(0, 0))?;
    println!("Practice. Toggle with ':1', ':2'. [Enter] to submit. 'exit' to quit.\n");

    let Some(word) = session.current_word() else {
        return Ok(());
    };
    println!("  {}\n", word.term().bold());

    match session.state() {
        RoundState::Presenting => {
            for (i, choice) in session.choices().iter().enumerate() {
                let mark = if session.is_selected(choice) { "[x]" } else { "[ ]" };
                println!("  :{} {} {}", i + 1, mark, choice);
            }
        }
        RoundState::Graded { correct: true } => println!("  {}", "Correct!".green()),
        RoundState::Graded { correct: false } => {
            println!("  {}", "Not quite.".red());
            println!("\nCorrect definition(s):");
            for definition in word.definitions() {
                println!("  • {}", definition);
            }
        }
        RoundState::Empty => {}
    }
    if matches!(session.state(), RoundState::Graded { .. }) {
        println!("\n[Enter] for the next word.");
    }
    print!("\n> ");
    out.flush()?;
    Ok(())
}
