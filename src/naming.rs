//! Instance name derivation and disambiguation.
//!
//! Instance names are derived from the project directory's base name plus
//! the series tag. Directory names collide across forks and renamed
//! checkouts, so a lookup can match several instances; rather than guess,
//! the resolver asks the operator. Operator input and randomness both sit
//! behind small traits so the prompt loops can be driven by scripted
//! values in tests.

use std::io::{self, Write};

use rand::Rng;

use crate::error::Result;
use crate::lxd::ContainerManager;
use crate::series::Series;

const HEX_CHARS: &[u8] = b"0123456789abcdef";
const EPHEMERAL_IDENT_LEN: usize = 12;

/// Source of one line of operator input at a time.
pub trait PromptLines {
    /// Display `prompt` and read one answer, without the trailing newline.
    fn read_line(&mut self, prompt: &str) -> io::Result<String>;
}

/// Reads answers from the invoking terminal.
pub struct StdinPrompt;

impl PromptLines for StdinPrompt {
    fn read_line(&mut self, prompt: &str) -> io::Result<String> {
        print!("{prompt}");
        io::stdout().flush()?;
        let mut line = String::new();
        let read = io::stdin().read_line(&mut line)?;
        if read == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "stdin closed while waiting for an answer",
            ));
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }
}

/// Source of random name suffixes.
pub trait SuffixSource {
    /// `len` random lowercase hex characters, for collision variants.
    fn suffix(&mut self, len: usize) -> String;

    /// Throwaway identifier appended to single-use instance names.
    fn ephemeral_ident(&mut self) -> String;
}

/// Suffixes drawn from the thread-local RNG.
pub struct RandomSuffixes;

impl SuffixSource for RandomSuffixes {
    fn suffix(&mut self, len: usize) -> String {
        let mut rng = rand::rng();
        (0..len)
            .map(|_| HEX_CHARS[rng.random_range(0..HEX_CHARS.len())] as char)
            .collect()
    }

    fn ephemeral_ident(&mut self) -> String {
        let mut rng = rand::rng();
        (0..EPHEMERAL_IDENT_LEN)
            .map(|_| rng.random_range(b'a'..=b'z') as char)
            .collect()
    }
}

/// Default instance name for a project directory and series.
pub fn candidate_name(project: &str, series: Series) -> String {
    format!("{project}-{series}")
}

/// Name for a single-use instance.
///
/// The random ident makes the name unique per invocation; the caller is
/// responsible for deleting the instance when it is done with it.
pub fn ephemeral_name(suffixes: &mut dyn SuffixSource, project: &str, series: Series) -> String {
    format!(
        "{}-{}",
        candidate_name(project, series),
        suffixes.ephemeral_ident()
    )
}

/// Pick a name for a new instance that no existing instance name contains.
///
/// When the candidate collides, a short random suffix is appended and then
/// lengthened one character at a time until the listing comes back empty.
/// Another invocation can still take the name between this check and the
/// launch; that race is accepted and surfaces as a launch failure.
pub async fn resolve_new(
    manager: &dyn ContainerManager,
    suffixes: &mut dyn SuffixSource,
    project: &str,
    series: Series,
) -> Result<String> {
    let candidate = candidate_name(project, series);
    if manager.list(&candidate).await?.is_empty() {
        return Ok(candidate);
    }
    let mut name = format!("{candidate}-{}", suffixes.suffix(3));
    while !manager.list(&name).await?.is_empty() {
        name.push_str(&suffixes.suffix(1));
    }
    Ok(name)
}

/// Find the existing instance the operator means for this project and
/// series.
///
/// Returns `None` when nothing matches or the operator declines the
/// offered match. A unique exact match is returned without prompting; one
/// partial match asks for confirmation; several matches present an indexed
/// list to choose from.
pub async fn resolve_existing(
    manager: &dyn ContainerManager,
    prompt: &mut dyn PromptLines,
    project: &str,
    series: Series,
) -> Result<Option<String>> {
    let candidate = candidate_name(project, series);
    let matches = manager.list(&candidate).await?;
    if matches.is_empty() {
        println!("No instances match {candidate}");
        return Ok(None);
    }
    if matches.len() == 1 && matches[0] == candidate {
        return Ok(Some(candidate));
    }
    choose_match(prompt, &candidate, &matches)
}

fn choose_match(
    prompt: &mut dyn PromptLines,
    candidate: &str,
    matches: &[String],
) -> Result<Option<String>> {
    if matches.len() == 1 {
        println!("One partial match for {candidate};");
        let text = format!("Interact with instance {}? [Y/n]: ", matches[0]);
        if confirm(prompt, &text)? {
            return Ok(Some(matches[0].clone()));
        }
        return Ok(None);
    }

    println!("Multiple existing instances match the name '{candidate}':");
    println!("-----");
    for (index, name) in matches.iter().enumerate() {
        println!("[{index}]\t{name}");
    }
    loop {
        let answer =
            prompt.read_line("Enter the index of the instance you would like to act upon: ")?;
        let answer = answer.trim();
        match answer.parse::<isize>() {
            Ok(index) if (0..matches.len() as isize).contains(&index) => {
                return Ok(Some(matches[index as usize].clone()));
            }
            Ok(_) => println!("Error: Index must be between 0 and {}", matches.len() - 1),
            Err(_) => println!("Error: {answer} is not an integer"),
        }
    }
}

/// Yes/no prompt; an empty answer counts as yes.
fn confirm(prompt: &mut dyn PromptLines, text: &str) -> Result<bool> {
    loop {
        let answer = prompt.read_line(text)?;
        match answer.trim().to_lowercase().as_str() {
            "" | "y" | "yes" => return Ok(true),
            "n" | "no" => return Ok(false),
            _ => println!("Invalid entry - please enter 'y' or 'n'"),
        }
    }
}
