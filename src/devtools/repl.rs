//=====================================================
// File: devtools/repl.rs
//=====================================================
// Author: ZobieLabs
// License: Duality Public License (DPL v1.0)
// Goal: Line-at-a-time evaluation loop for interactive sessions
// Objective: Keep one root scope alive across lines and report errors without
//            ending the session
//=====================================================

use std::io::{self, BufRead, Write};

use crate::interpreter::{Interpreter, Value};

const PROMPT: &str = ">>> ";

/// Evaluate each input line in the interpreter's root scope, echoing non-`None`
/// results and errors to `output`. A missing trailing `;` is supplied.
pub fn run_repl<R: BufRead, W: Write>(
    interpreter: &mut Interpreter,
    input: R,
    mut output: W,
) -> io::Result<()> {
    let root = interpreter.root();
    prompt(&mut output)?;
    for line in input.lines() {
        let line = line?;
        let trimmed = line.trim_end();
        if !trimmed.trim_start().is_empty() {
            let source = if trimmed.ends_with(';') {
                trimmed.to_string()
            } else {
                format!("{trimmed};")
            };
            match interpreter.run_source(&source, &root) {
                Ok(Value::None) => {}
                Ok(value) => writeln!(output, "{value}")?,
                Err(err) => writeln!(output, "error[{}]: {}", err.code_str(), err)?,
            }
        }
        prompt(&mut output)?;
    }
    writeln!(output)?;
    Ok(())
}

fn prompt<W: Write>(output: &mut W) -> io::Result<()> {
    write!(output, "{PROMPT}")?;
    output.flush()
}
