//! Line-oriented operator commands for the interactive crop loop.
//!
//! Each input line is one command. Pointer commands take display
//! coordinates, i.e. positions inside the fitted viewport.

use anyhow::{bail, Context};
use std::io::{BufRead, Write};
use ticket_core::geometry::Point;
use ticket_core::selection::SelectionState;
use ticket_core::{CropError, CropSession, Decoder, ImageSink, Origin};

const HELP: &str = "\
Commands:
  press X Y             start a selection at (X, Y)
  move X Y              drag the selection corner to (X, Y)
  release X Y           finish the selection at (X, Y)
  drag X1 Y1 X2 Y2      press, move and release in one step
  name TEXT             output file name (blank asks on crop)
  quality TEXT          JPEG quality, 1-100
  crop                  save the selection and go to the next scan
  next | prev           move between scans
  clear                 drop the selection
  detect                detect the ticket again, replacing the selection
  resize W H            change the display area
  show                  print the current state
  help                  print this text
  quit                  leave";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Press(f64, f64),
    Move(f64, f64),
    Release(f64, f64),
    Drag([f64; 4]),
    Name(String),
    Quality(String),
    Crop,
    Next,
    Prev,
    Clear,
    Detect,
    Resize(f64, f64),
    Show,
    Help,
    Quit,
}

/// Parse one input line. Blank lines yield `None`.
pub fn parse(line: &str) -> anyhow::Result<Option<Command>> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let (verb, rest) = line
        .split_once(char::is_whitespace)
        .map(|(verb, rest)| (verb, rest.trim()))
        .unwrap_or((line, ""));
    let args: Vec<&str> = rest.split_whitespace().collect();

    let command = match verb.to_ascii_lowercase().as_str() {
        "press" => {
            let [x, y] = numbers(verb, &args)?;
            Command::Press(x, y)
        }
        "move" => {
            let [x, y] = numbers(verb, &args)?;
            Command::Move(x, y)
        }
        "release" => {
            let [x, y] = numbers(verb, &args)?;
            Command::Release(x, y)
        }
        "drag" => Command::Drag(numbers(verb, &args)?),
        "resize" => {
            let [w, h] = numbers(verb, &args)?;
            Command::Resize(w, h)
        }
        "name" => Command::Name(rest.to_string()),
        "quality" => Command::Quality(rest.to_string()),
        "crop" | "save" => Command::Crop,
        "next" => Command::Next,
        "prev" | "previous" => Command::Prev,
        "clear" => Command::Clear,
        "detect" => Command::Detect,
        "show" => Command::Show,
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        other => bail!("Unknown command '{other}'; type 'help' for a list"),
    };
    Ok(Some(command))
}

fn numbers<const N: usize>(verb: &str, args: &[&str]) -> anyhow::Result<[f64; N]> {
    if args.len() != N {
        bail!("'{verb}' expects {N} numbers, got {}", args.len());
    }
    let mut values = [0.0; N];
    for (slot, arg) in values.iter_mut().zip(args) {
        *slot = arg
            .parse()
            .with_context(|| format!("'{arg}' is not a number"))?;
    }
    Ok(values)
}

/// Read commands from `input` until `quit` or end of input.
///
/// Operator mistakes are reported on `output` and the loop goes on; only
/// I/O failures on the streams themselves end it with an error.
pub fn run<D, S>(
    session: &mut CropSession<D, S>,
    mut input: impl BufRead,
    mut output: impl Write,
) -> anyhow::Result<()>
where
    D: Decoder,
    S: ImageSink,
{
    show(session, &mut output)?;

    let mut line = String::new();
    loop {
        write!(output, "> ")?;
        output.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            break;
        }

        let command = match parse(&line) {
            Ok(Some(Command::Quit)) => break,
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                writeln!(output, "error: {e:#}")?;
                continue;
            }
        };

        if let Err(e) = execute(session, command, &mut input, &mut output) {
            match e.downcast::<CropError>() {
                Ok(crop) => writeln!(output, "error: {crop}")?,
                Err(other) => return Err(other),
            }
        }
    }
    Ok(())
}

fn execute<D, S>(
    session: &mut CropSession<D, S>,
    command: Command,
    input: &mut impl BufRead,
    output: &mut impl Write,
) -> anyhow::Result<()>
where
    D: Decoder,
    S: ImageSink,
{
    match command {
        Command::Press(x, y) => session.selection_mut().begin_drag(Point::new(x, y)),
        Command::Move(x, y) => session.selection_mut().update_drag(Point::new(x, y)),
        Command::Release(x, y) => release(session, x, y, output)?,
        Command::Drag([x1, y1, x2, y2]) => {
            let selection = session.selection_mut();
            selection.begin_drag(Point::new(x1, y1));
            selection.update_drag(Point::new(x2, y2));
            release(session, x2, y2, output)?;
        }
        Command::Name(name) => session.set_file_name(&name),
        Command::Quality(text) => session.set_quality_text(&text),
        Command::Crop => {
            let saved = {
                let mut prompt = || ask_name(&mut *input, &mut *output);
                session.commit_pending(&mut prompt)?
            };
            writeln!(output, "Saved {}", saved.display())?;
            show(session, output)?;
        }
        Command::Next => {
            if !session.next()? {
                writeln!(output, "Already at the last scan")?;
            }
            show(session, output)?;
        }
        Command::Prev => {
            if !session.previous()? {
                writeln!(output, "Already at the first scan")?;
            }
            show(session, output)?;
        }
        Command::Clear => session.selection_mut().clear(),
        Command::Detect => match session.redetect()? {
            Some(rect) => writeln!(output, "Detected {rect}")?,
            None => writeln!(output, "No ticket region found; draw one")?,
        },
        Command::Resize(w, h) => {
            session.resize_viewport(w, h);
            show(session, output)?;
        }
        Command::Show => show(session, output)?,
        Command::Help => writeln!(output, "{HELP}")?,
        Command::Quit => {}
    }
    Ok(())
}

fn release<D, S>(
    session: &mut CropSession<D, S>,
    x: f64,
    y: f64,
    output: &mut impl Write,
) -> anyhow::Result<()>
where
    D: Decoder,
    S: ImageSink,
{
    if session.selection_mut().end_drag(Point::new(x, y)) {
        show_selection(session, output)?;
    } else {
        writeln!(output, "Empty selection discarded")?;
    }
    Ok(())
}

fn ask_name(input: &mut impl BufRead, output: &mut impl Write) -> Option<String> {
    write!(output, "File name: ").ok()?;
    output.flush().ok()?;

    let mut name = String::new();
    match input.read_line(&mut name) {
        Ok(n) if n > 0 => Some(name.trim().to_string()),
        _ => None,
    }
}

fn show<D, S>(session: &CropSession<D, S>, output: &mut impl Write) -> anyhow::Result<()>
where
    D: Decoder,
    S: ImageSink,
{
    let Some(loaded) = session.loaded() else {
        writeln!(output, "No scan loaded")?;
        return Ok(());
    };

    writeln!(
        output,
        "[{}/{}] {} ({}x{})",
        loaded.entry.index + 1,
        session.entries().len(),
        loaded.entry.file_name(),
        loaded.pixels.width,
        loaded.pixels.height
    )?;
    show_selection(session, output)?;

    let state = session.state();
    writeln!(
        output,
        "  name: '{}'  quality: {}",
        state.file_name, state.quality_text
    )?;
    Ok(())
}

fn show_selection<D, S>(session: &CropSession<D, S>, output: &mut impl Write) -> anyhow::Result<()>
where
    D: Decoder,
    S: ImageSink,
{
    let selection = session.selection();
    match selection.state() {
        SelectionState::Empty => writeln!(output, "  selection: none")?,
        SelectionState::Dragging { .. } => writeln!(output, "  selection: dragging")?,
        SelectionState::Committed { rect, origin } => {
            let origin = match origin {
                Origin::Auto => "auto",
                Origin::Manual => "manual",
            };
            match selection.current() {
                Some(image) => writeln!(output, "  selection: {origin} {rect} -> image {image}")?,
                None => writeln!(output, "  selection: {origin} {rect}")?,
            }
        }
    }
    Ok(())
}
