/*!
# Terminal Module

Interactive frontend for running scripts from a shell. Not part of the
pendant firmware; this is the desk tool for writing and testing scripts
before they are flashed.

*/

extern crate ansi_term;
extern crate ctrlc;
extern crate linefeed;
use crate::interp::{comment_field, Interp};
use ansi_term::Style;
use linefeed::{Interface, ReadResult};
use std::fs;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

pub fn main() {
    let interrupted = Arc::new(AtomicBool::new(false));
    let int_moved = interrupted.clone();
    ctrlc::set_handler(move || {
        int_moved.store(true, Ordering::SeqCst);
    })
    .expect("Error setting Ctrl-C handler");
    if let Err(error) = main_loop(interrupted) {
        eprintln!("{}", error);
    }
}

fn main_loop(interrupted: Arc<AtomicBool>) -> std::io::Result<()> {
    let mut interp = Interp::new();
    interp.set_interrupt(interrupted.clone());
    let mut source = String::new();
    let command = Interface::new("pscript")?;
    command.set_prompt("pscript> ")?;

    if let Some(path) = std::env::args().nth(1) {
        load(&command, &mut interp, &mut source, &path)?;
    }

    loop {
        if interrupted.load(Ordering::SeqCst) {
            interrupted.store(false, Ordering::SeqCst);
        }
        let line = match command.read_line()? {
            ReadResult::Input(line) => line,
            ReadResult::Signal(_) | ReadResult::Eof => break,
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        command.add_history_unique(line.to_string());
        let mut words = line.splitn(2, ' ');
        let verb = words.next().unwrap_or("");
        let rest = words.next().unwrap_or("").trim();
        match verb {
            "load" => load(&command, &mut interp, &mut source, rest)?,
            "list" => command.write_fmt(format_args!("{}", source))?,
            "vars" => list_vars(&command, &interp)?,
            "set" => set_var(&command, &mut interp, rest)?,
            "reset" => reset_var(&command, &mut interp, rest)?,
            "run" => run(&command, &mut interp)?,
            "help" => help(&command)?,
            "quit" | "exit" => break,
            _ => report(&command, "unknown command, try help")?,
        }
    }
    Ok(())
}

fn report<T: linefeed::Terminal>(command: &Interface<T>, msg: &str) -> std::io::Result<()> {
    command.write_fmt(format_args!("{}\n", Style::new().bold().paint(msg)))
}

fn load<T: linefeed::Terminal>(
    command: &Interface<T>,
    interp: &mut Interp,
    source: &mut String,
    path: &str,
) -> std::io::Result<()> {
    if path.is_empty() {
        return report(command, "usage: load <file>");
    }
    match fs::read_to_string(path) {
        Ok(text) => {
            *source = text;
            interp.load(source);
            if interp.prescan() {
                command.write_fmt(format_args!("loaded {}\n", path))?;
            } else {
                report(command, interp.output())?;
            }
        }
        Err(error) => report(command, &error.to_string())?,
    }
    Ok(())
}

fn list_vars<T: linefeed::Terminal>(
    command: &Interface<T>,
    interp: &Interp,
) -> std::io::Result<()> {
    for index in 0..interp.global_count() {
        let name = interp.global_name(index).unwrap_or("");
        let value = interp.global_value(index).unwrap_or(0);
        match interp.global_comment(index) {
            Some(comment) => {
                let desc = comment_field(comment, 0).unwrap_or("");
                let units = comment_field(comment, 1).unwrap_or("");
                command.write_fmt(format_args!(
                    "{:12} = {:<10} {} {}\n",
                    name, value, desc, units
                ))?;
            }
            None => command.write_fmt(format_args!("{:12} = {}\n", name, value))?,
        }
    }
    Ok(())
}

fn find_var(interp: &Interp, name: &str) -> Option<usize> {
    (0..interp.global_count()).find(|&i| interp.global_name(i) == Some(name))
}

fn set_var<T: linefeed::Terminal>(
    command: &Interface<T>,
    interp: &mut Interp,
    rest: &str,
) -> std::io::Result<()> {
    let mut words = rest.split_whitespace();
    let name = words.next().unwrap_or("");
    let value = words.next().and_then(|w| w.parse::<i32>().ok());
    match (find_var(interp, name), value) {
        (Some(index), Some(value)) => {
            interp.set_global_value(index, value);
            Ok(())
        }
        (None, _) if !name.is_empty() => report(command, "no such variable"),
        _ => report(command, "usage: set <name> <value>"),
    }
}

fn reset_var<T: linefeed::Terminal>(
    command: &Interface<T>,
    interp: &mut Interp,
    name: &str,
) -> std::io::Result<()> {
    match find_var(interp, name) {
        Some(index) => {
            interp.reset_global_value(index);
            Ok(())
        }
        None => report(command, "no such variable"),
    }
}

fn run<T: linefeed::Terminal>(command: &Interface<T>, interp: &mut Interp) -> std::io::Result<()> {
    if interp.execute() {
        command.write_fmt(format_args!("{}", interp.output()))?;
        Ok(())
    } else {
        report(command, interp.output())
    }
}

fn help<T: linefeed::Terminal>(command: &Interface<T>) -> std::io::Result<()> {
    command.write_fmt(format_args!(
        "load <file>        load a script and prescan it\n\
         list               show the loaded script\n\
         vars               show global variables\n\
         set <name> <val>   change a global variable\n\
         reset <name>       restore a global to its initializer\n\
         run                execute main() and print the output\n\
         quit               leave\n"
    ))
}
