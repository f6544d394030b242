use rustyline::{DefaultEditor, error::ReadlineError};

use arena_core::{Dispatcher, HostValue};

use crate::runner::timed_call;

fn print_repl_help() {
    eprintln!("Type a benchmark name to run it (extra words are passed as ignored args).");
    eprintln!("Commands: :list, :help, :quit | :exit | :q");
}

/// What one line of shell input asks for.
#[derive(Debug, PartialEq)]
pub(crate) enum ReplCommand {
    Empty,
    Quit,
    Help,
    List,
    Unknown(String),
    Run { name: String, args: Vec<HostValue> },
}

pub(crate) fn parse_line(line: &str) -> ReplCommand {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return ReplCommand::Empty;
    }
    if trimmed.starts_with(':') {
        return match trimmed {
            ":quit" | ":exit" | ":q" => ReplCommand::Quit,
            ":help" | ":h" => ReplCommand::Help,
            ":list" | ":ls" => ReplCommand::List,
            other => ReplCommand::Unknown(other.to_string()),
        };
    }
    let mut words = trimmed.split_whitespace();
    let name = words.next().unwrap_or_default().to_string();
    let args = words.map(parse_arg).collect();
    ReplCommand::Run { name, args }
}

fn parse_arg(word: &str) -> HostValue {
    if let Ok(i) = word.parse::<i64>() {
        HostValue::Int(i)
    } else if let Ok(f) = word.parse::<f64>() {
        HostValue::Float(f)
    } else {
        HostValue::Nil
    }
}

pub fn run(dispatcher: &Dispatcher) -> anyhow::Result<()> {
    let mut rl = DefaultEditor::new()?;
    print_repl_help();

    loop {
        let line = match rl.readline("arena> ") {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) => {
                eprintln!("^C");
                continue;
            }
            Err(ReadlineError::Eof) => {
                println!();
                return Ok(());
            }
            Err(e) => {
                eprintln!("Readline error: {}", e);
                continue;
            }
        };

        match parse_line(&line) {
            ReplCommand::Empty => continue,
            ReplCommand::Quit => return Ok(()),
            ReplCommand::Help => print_repl_help(),
            ReplCommand::List => {
                for name in dispatcher.registry().names() {
                    println!("{name}");
                }
            }
            ReplCommand::Unknown(cmd) => eprintln!("Unknown command {cmd}. Type :help for help."),
            ReplCommand::Run { name, args } => {
                let _ = rl.add_history_entry(line.trim());
                match timed_call(dispatcher, &name, &args) {
                    Ok((value, elapsed)) => println!("{value}  ({:.3} ms)", elapsed.as_secs_f64() * 1_000.0),
                    Err(e) => eprintln!("Error: {}", e),
                }
            }
        }
    }
}
