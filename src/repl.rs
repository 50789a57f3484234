//! Sprig REPL (Read-Eval-Print Loop)
//!
//! Reads stdin through the same token stream files use. The prompt is
//! printed each time the stream asks for another line, so a form spanning
//! several lines simply keeps prompting until it is complete.

use std::io::{self, BufRead, Write};

use crate::cli::output::{print_heading, print_value};
use crate::config::EngineConfig;
use crate::engine::{Engine, Parsed};
use crate::errors::{print_error, ErrorCategory};
use crate::syntax::tokens::{LineSource, TokenStream};

/// REPL command results
#[derive(Debug, PartialEq, Eq)]
enum ReplCommand {
    Continue,
    Quit,
}

/// Line source that shows a prompt before each read and intercepts
/// `:`-commands.
struct PromptSource<R> {
    input: R,
    prompt: Option<String>,
}

impl<R: BufRead> LineSource for PromptSource<R> {
    fn next_line(&mut self) -> io::Result<Option<String>> {
        loop {
            if let Some(prompt) = &self.prompt {
                let mut stdout = io::stdout().lock();
                write!(stdout, "{prompt}")?;
                stdout.flush()?;
            }
            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                return Ok(None);
            }
            let trimmed = line.trim();
            if trimmed.starts_with(':') {
                match handle_repl_command(trimmed) {
                    ReplCommand::Continue => continue,
                    ReplCommand::Quit => return Ok(None),
                }
            }
            return Ok(Some(line));
        }
    }
}

/// Runs the loop until end of input or `:quit`.
pub fn run_repl(engine: &mut Engine, config: &EngineConfig) {
    let interactive = atty::is(atty::Stream::Stdin);
    if interactive {
        print_heading(concat!("Sprig ", env!("CARGO_PKG_VERSION")));
        println!("Type :help for help, :quit to exit");
    }

    let stdin = io::stdin();
    let source = PromptSource {
        input: stdin.lock(),
        prompt: interactive.then(|| config.prompt.clone()),
    };
    let mut stream = TokenStream::new("<stdin>", source);

    loop {
        let parsed = match engine.parse(&mut stream) {
            Ok(parsed) => parsed,
            Err(error) if error.category() == ErrorCategory::Io => {
                print_error(error);
                break;
            }
            Err(error) => {
                print_error(error);
                stream.discard_line();
                continue;
            }
        };
        let expr = match parsed {
            Parsed::Eof => break,
            Parsed::Empty => continue,
            Parsed::Expr(expr) => expr,
        };
        match engine.eval(&expr) {
            Ok(value) => {
                if config.echo_results && !value.is_nil() {
                    print_value(&value);
                }
            }
            Err(error) => {
                print_error(error);
                stream.discard_line();
            }
        }
    }
    if interactive {
        println!();
    }
}

/// Handle special REPL commands that start with ':'
fn handle_repl_command(command: &str) -> ReplCommand {
    match command.to_ascii_lowercase().as_str() {
        ":help" | ":h" => {
            println!("Sprig REPL Commands:");
            println!("  :help, :h     Show this help");
            println!("  :quit, :q     Exit the REPL");
            println!();
            println!("Enter expressions to evaluate them. A form may span several lines.");
            ReplCommand::Continue
        }
        ":quit" | ":q" => ReplCommand::Quit,
        _ => {
            println!("Unknown command: {command}. Type :help for available commands.");
            ReplCommand::Continue
        }
    }
}
