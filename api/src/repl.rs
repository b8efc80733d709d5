//! Line-driven virtual keyboard session for the terminal.
//!
//! Each input line is split on whitespace; every token is pressed as a key
//! label (so `Space` and `Backspace` work as on screen). Lines starting
//! with `:` are commands:
//!
//! - `:cycle`  switch to the next layout
//! - `:toggle` open or close the keyboard
//! - `:at R C` press the key at row R, column C of the open keyboard
//! - `:show`   print the keyboard
//! - `:clear`  empty the value
//! - `:set T`  replace the value, as if typed directly
//! - `:done`   finish this field

use std::io::{self, BufRead, Write};

use lexisium_core::KeyboardInput;

/// Drive `input` from `reader` until `:done` or EOF. Returns the final value.
///
/// Lines after `:done` are left in `reader`, so one reader can fill several
/// fields in turn.
pub fn run<R: BufRead, W: Write>(
    input: &mut KeyboardInput,
    reader: R,
    out: &mut W,
) -> io::Result<String> {
    for line in reader.lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line == ":done" {
            break;
        }
        match line.strip_prefix(':') {
            Some(command) => run_command(input, command, out)?,
            None => {
                for label in line.split_whitespace() {
                    input.press(label);
                }
            }
        }
        writeln!(out, "[{}] {}", input.active_layout(), input.value())?;
    }
    Ok(input.value())
}

fn run_command<W: Write>(input: &mut KeyboardInput, command: &str, out: &mut W) -> io::Result<()> {
    let mut parts = command.splitn(2, ' ');
    let name = parts.next().unwrap_or("");
    let arg = parts.next().unwrap_or("").trim();
    match name {
        "cycle" => input.cycle_layout(),
        "toggle" => input.toggle_keyboard(),
        "clear" => input.clear(),
        "set" => input.set_value(arg),
        "show" => match input.keyboard_view() {
            Some(view) => write!(out, "{}", view.to_text())?,
            None => writeln!(out, "(keyboard closed)")?,
        },
        "at" => {
            let pos: Vec<usize> = arg.split_whitespace().filter_map(|n| n.parse().ok()).collect();
            let pressed = match pos.as_slice() {
                [row, col] => input.press_at(*row, *col),
                _ => false,
            };
            if !pressed {
                writeln!(out, "no key at '{}'", arg)?;
            }
        }
        other => writeln!(out, "unknown command ':{}'", other)?,
    }
    Ok(())
}
