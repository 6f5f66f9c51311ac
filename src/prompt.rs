//! Interactive input: city, month and weekday selection plus yes/no prompts.

use std::io::{self, BufRead};
use thiserror::Error;

use crate::calendar::{OFFERED_MONTHS, WEEKDAY_NAMES};
use crate::filter::{FilterCriteria, Selection, parse_month, parse_weekday};
use crate::output::{Printer, Tone, title_case};

/// Why a prompt ended without an answer.
#[derive(Debug, Error)]
pub enum PromptError {
    /// Input closed before a valid answer was given.
    #[error("input closed, exiting")]
    Cancelled,

    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type PromptResult<T> = Result<T, PromptError>;

/// Asks questions on a [`Printer`] and reads answers line by line.
pub struct Prompter<R, P> {
    input: R,
    printer: P,
}

impl<R: BufRead, P: Printer> Prompter<R, P> {
    pub fn new(input: R, printer: P) -> Self {
        Self { input, printer }
    }

    pub fn printer(&mut self) -> &mut P {
        &mut self.printer
    }

    /// Asks for one of `cities` until a listed one is entered. Returns it in
    /// its lower-case registry form.
    pub fn ask_city(&mut self, cities: &[&str]) -> PromptResult<String> {
        let listed = cities.iter().map(|c| title_case(c)).collect::<Vec<_>>().join(", ");
        loop {
            let answer = self.ask(&format!("Please select your city: {listed}"))?;
            let answer = answer.to_lowercase();
            if cities.iter().any(|c| c.eq_ignore_ascii_case(&answer)) {
                self.printer
                    .print(Tone::Success, &format!("{} Selected.", title_case(&answer)))?;
                return Ok(answer);
            }
            self.invalid()?;
        }
    }

    /// Asks for a month between January and June, or "All".
    pub fn ask_month(&mut self) -> PromptResult<Selection> {
        let listed = choices(OFFERED_MONTHS);
        loop {
            let answer = self.ask(&format!(
                "Please select the month you would like to examine: {listed}"
            ))?;
            match parse_month(&answer) {
                Ok(Selection::Only(m)) if !OFFERED_MONTHS.contains(&m) => {}
                Ok(selection) => {
                    self.selected(selection)?;
                    return Ok(selection);
                }
                Err(_) => {}
            }
            self.invalid()?;
        }
    }

    /// Asks for a weekday, or "All".
    pub fn ask_weekday(&mut self) -> PromptResult<Selection> {
        let listed = choices(&WEEKDAY_NAMES);
        loop {
            let answer = self.ask(&format!(
                "Please select the day you would like to examine: {listed}"
            ))?;
            if let Ok(selection) = parse_weekday(&answer) {
                self.selected(selection)?;
                return Ok(selection);
            }
            self.invalid()?;
        }
    }

    pub fn ask_filters(&mut self) -> PromptResult<FilterCriteria> {
        Ok(FilterCriteria {
            month: self.ask_month()?,
            weekday: self.ask_weekday()?,
        })
    }

    /// Asks a yes/no question until one of the two is entered.
    pub fn confirm(&mut self, question: &str) -> PromptResult<bool> {
        let mut answer = self.ask(&format!("{question} Please enter yes or no."))?;
        loop {
            match answer.to_lowercase().as_str() {
                "yes" => return Ok(true),
                "no" => return Ok(false),
                _ => answer = self.ask("Invalid input detected. Please enter yes or no.")?,
            }
        }
    }

    fn ask(&mut self, question: &str) -> PromptResult<String> {
        self.printer.print(Tone::Plain, "")?;
        self.printer.print(Tone::Plain, question)?;
        self.printer.print(Tone::Plain, "-->")?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(PromptError::Cancelled);
        }
        Ok(line.trim().to_string())
    }

    fn selected(&mut self, selection: Selection) -> io::Result<()> {
        self.printer
            .print(Tone::Success, &format!("{selection} Selected."))
    }

    fn invalid(&mut self) -> io::Result<()> {
        self.printer.print(Tone::Warning, "Invalid input detected.")
    }
}

fn choices(names: &[&str]) -> String {
    let mut all: Vec<&str> = names.to_vec();
    all.push("All");
    all.join(", ")
}
