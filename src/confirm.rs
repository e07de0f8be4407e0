//! Yes/no confirmation providers.
//!
//! The merge engine and the output checks never touch stdin directly; they ask
//! a [`Confirm`] implementation, so callers can swap the interactive prompt for
//! a fixed answer (`--yes`) or a scripted sequence.

use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

pub trait Confirm {
    /// Ask `prompt`; `Ok(true)` means go ahead.
    fn confirm(&mut self, prompt: &str) -> io::Result<bool>;
}

impl<C: Confirm + ?Sized> Confirm for &mut C {
    fn confirm(&mut self, prompt: &str) -> io::Result<bool> {
        (**self).confirm(prompt)
    }
}

impl<C: Confirm + ?Sized> Confirm for Box<C> {
    fn confirm(&mut self, prompt: &str) -> io::Result<bool> {
        (**self).confirm(prompt)
    }
}

/// Line-based `[Y/n]` prompt. An empty answer means yes; anything not starting
/// with `y` or `n` asks again.
#[derive(Debug)]
pub struct Prompt<R, W> {
    reader: R,
    writer: W,
}

impl Prompt<io::StdinLock<'static>, io::Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> Prompt<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    pub fn into_inner(self) -> (R, W) {
        (self.reader, self.writer)
    }
}

impl<R: BufRead, W: Write> Confirm for Prompt<R, W> {
    fn confirm(&mut self, prompt: &str) -> io::Result<bool> {
        let mut line = String::new();
        loop {
            write!(self.writer, "{prompt} [Y/n]: ")?;
            self.writer.flush()?;

            line.clear();
            if self.reader.read_line(&mut line)? == 0 {
                return Err(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    "no answer on standard input",
                ));
            }
            match line.trim().to_ascii_lowercase().chars().next() {
                None | Some('y') => return Ok(true),
                Some('n') => return Ok(false),
                Some(_) => continue,
            }
        }
    }
}

/// Answers every prompt the same way without asking.
#[derive(Debug, Clone, Copy)]
pub struct Always(pub bool);

impl Confirm for Always {
    fn confirm(&mut self, prompt: &str) -> io::Result<bool> {
        tracing::debug!("{prompt} -> {}", if self.0 { "yes" } else { "no" });
        Ok(self.0)
    }
}

/// Replays a fixed list of answers and records every prompt it was given.
/// Running out of answers is an error.
#[derive(Debug, Default)]
pub struct Scripted {
    answers: VecDeque<bool>,
    prompts: Vec<String>,
}

impl Scripted {
    pub fn new(answers: impl IntoIterator<Item = bool>) -> Self {
        Self {
            answers: answers.into_iter().collect(),
            prompts: Vec::new(),
        }
    }

    pub fn prompts(&self) -> &[String] {
        &self.prompts
    }

    pub fn remaining(&self) -> usize {
        self.answers.len()
    }
}

impl Confirm for Scripted {
    fn confirm(&mut self, prompt: &str) -> io::Result<bool> {
        self.prompts.push(prompt.to_string());
        self.answers.pop_front().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("unexpected prompt: {prompt}"),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    fn ask(input: &str) -> io::Result<bool> {
        let mut prompt = Prompt::new(Cursor::new(input.as_bytes().to_vec()), Vec::new());
        prompt.confirm("-")
    }

    #[test]
    fn test_prompt_answers() {
        for (input, expected) in [
            ("y\r\n", true),
            ("yes\n", true),
            ("Y\n", true),
            ("n\r\n", false),
            ("no\n", false),
            ("NO\n", false),
            ("\n", true),
            ("   \n", true),
        ] {
            assert_eq!(ask(input).unwrap(), expected, "input {input:?}");
        }
    }

    #[test]
    fn test_prompt_repeats_on_garbage() {
        let mut prompt = Prompt::new(Cursor::new(b"maybe\nn\n".to_vec()), Vec::new());
        assert!(!prompt.confirm("Overwrite out.bin?").unwrap());
        let (_, written) = prompt.into_inner();
        let text = String::from_utf8(written).unwrap();
        assert_eq!(text.matches("Overwrite out.bin? [Y/n]: ").count(), 2);
    }

    #[test]
    fn test_prompt_eof_is_error() {
        let err = ask("").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }

    #[test]
    fn test_scripted_records_prompts() {
        let mut scripted = Scripted::new([true, false]);
        assert!(scripted.confirm("first").unwrap());
        assert!(!scripted.confirm("second").unwrap());
        assert!(scripted.confirm("third").is_err());
        assert_eq!(scripted.prompts(), ["first", "second", "third"]);
        assert_eq!(scripted.remaining(), 0);
    }

    #[test]
    fn test_always() {
        assert!(Always(true).confirm("x").unwrap());
        assert!(!Always(false).confirm("x").unwrap());
    }
}
