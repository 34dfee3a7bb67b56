//! Line-oriented interactive form.
//!
//! Each input line is one command editing a [`FormState`]. Rejected input
//! (bad commands, form errors, calculator errors) is reported and the
//! session continues.
//!
//! Positions are 1-based on the command line and 0-based in [`FormState`].

use crate::error::{CalcError, InvalidInputReason as Reason};
use crate::estimator::estimate_design;
use crate::form::{FormError, FormState};
use crate::report::{Report, render_table};
use std::io::{self, BufRead, Write};
use std::str::FromStr;
use strata::config::DisplayConfig;
use strata::grid::StratumGrid;
use thiserror::Error;
use tracing::{debug, info};

/// Help text printed by `help`.
pub const HELP: &str = "\
commands:
  n <N>                    set total population
  dims <regions> <types>   set grid dimensions
  detail                   generate names and matrices
  region <i> <name>        rename region i
  type <j> <name>          rename type j
  sample <i> <j> <n_h>     enter sample size
  pop <i> <j> <N_h>        enter stratum population
  show                     print the form
  compute                  calculate sampling error
  reset                    clear everything
  help                     this text
  quit                     leave";

/// Command-line parsing errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    /// First word is not a command.
    #[error("unknown command `{0}` (try `help`)")]
    Unknown(String),
    /// Wrong arguments.
    #[error("usage: {0}")]
    Usage(&'static str),
    /// Argument is not a non-negative integer.
    #[error("`{0}` is not a non-negative integer")]
    NotANumber(String),
    /// Positions start at 1.
    #[error("positions start at 1")]
    ZeroPosition,
}

/// One parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Set N.
    Population(u64),
    /// Set grid dimensions.
    Dimensions(usize, usize),
    /// Open the detail stage.
    Detail,
    /// Rename a region (0-based).
    RegionName(usize, String),
    /// Rename a type (0-based).
    TypeName(usize, String),
    /// Enter n_h (0-based cell).
    Sample(usize, usize, u64),
    /// Enter N_h (0-based cell).
    StratumPopulation(usize, usize, u64),
    /// Print the form.
    Show,
    /// Run the calculator.
    Compute,
    /// Clear the form.
    Reset,
    /// Print help.
    Help,
    /// End the session.
    Quit,
}

fn number<T: FromStr>(word: &str) -> Result<T, CommandError> {
    word.parse()
        .map_err(|_| CommandError::NotANumber(word.to_string()))
}

fn position(word: &str) -> Result<usize, CommandError> {
    number::<usize>(word)?
        .checked_sub(1)
        .ok_or(CommandError::ZeroPosition)
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (head, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim();
        let args: Vec<&str> = rest.split_whitespace().collect();

        let cell = |usage: &'static str| match args.as_slice() {
            [i, j, v] => Ok((position(i)?, position(j)?, number::<u64>(v)?)),
            _ => Err(CommandError::Usage(usage)),
        };
        let rename = |usage: &'static str| match rest.split_once(char::is_whitespace) {
            Some((i, name)) if !name.trim().is_empty() => {
                Ok((position(i)?, name.trim().to_string()))
            }
            _ => Err(CommandError::Usage(usage)),
        };

        match head.to_ascii_lowercase().as_str() {
            "n" => match args.as_slice() {
                [v] => Ok(Self::Population(number(v)?)),
                _ => Err(CommandError::Usage("n <N>")),
            },
            "dims" => match args.as_slice() {
                [r, t] => Ok(Self::Dimensions(number(r)?, number(t)?)),
                _ => Err(CommandError::Usage("dims <regions> <types>")),
            },
            "detail" => Ok(Self::Detail),
            "region" => rename("region <i> <name>").map(|(i, name)| Self::RegionName(i, name)),
            "type" => rename("type <j> <name>").map(|(j, name)| Self::TypeName(j, name)),
            "sample" => cell("sample <i> <j> <n_h>").map(|(i, j, v)| Self::Sample(i, j, v)),
            "pop" => {
                cell("pop <i> <j> <N_h>").map(|(i, j, v)| Self::StratumPopulation(i, j, v))
            }
            "show" => Ok(Self::Show),
            "compute" => Ok(Self::Compute),
            "reset" => Ok(Self::Reset),
            "help" | "?" => Ok(Self::Help),
            "quit" | "exit" | "q" => Ok(Self::Quit),
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }
}

/// Whether the session should keep reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Read the next line.
    Continue,
    /// Stop.
    Quit,
}

/// Interactive form session.
#[derive(Debug, Clone, Default)]
pub struct Session {
    form: FormState,
    display: DisplayConfig,
}

impl Session {
    /// New session with a fresh form.
    pub fn new(display: DisplayConfig) -> Self {
        Self {
            form: FormState::new(),
            display,
        }
    }

    /// Session pre-filled from an existing form.
    pub fn with_form(form: FormState, display: DisplayConfig) -> Self {
        Self { form, display }
    }

    /// Current form.
    pub fn form(&self) -> &FormState {
        &self.form
    }

    /// Execute one input line, returning the text to show and whether to go on.
    pub fn execute(&mut self, line: &str) -> (String, Flow) {
        if line.trim().is_empty() {
            return (String::new(), Flow::Continue);
        }
        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(e) => return (format!("error: {e}\n"), Flow::Continue),
        };
        debug!(?command, "command");

        let result: Result<String, FormError> = match command {
            Command::Population(n) => self.form.set_population(n).map(|()| String::new()),
            Command::Dimensions(r, t) => self.form.set_dimensions(r, t).map(|()| String::new()),
            Command::Detail => {
                self.form.open_detail();
                Ok(self.render_form())
            }
            Command::RegionName(i, name) => {
                self.form.set_region_name(i, &name).map(|()| String::new())
            }
            Command::TypeName(j, name) => {
                self.form.set_type_name(j, &name).map(|()| String::new())
            }
            Command::Sample(i, j, v) => self.form.set_sample(i, j, v).map(|()| String::new()),
            Command::StratumPopulation(i, j, v) => self
                .form
                .set_stratum_population(i, j, v)
                .map(|()| String::new()),
            Command::Show => Ok(self.render_form()),
            Command::Compute => Ok(self.compute()),
            Command::Reset => {
                self.form.reset();
                Ok("form cleared\n".to_string())
            }
            Command::Help => Ok(format!("{HELP}\n")),
            Command::Quit => return (String::new(), Flow::Quit),
        };

        match result {
            Ok(text) => (text, Flow::Continue),
            Err(e) => (format!("error: {e}\n"), Flow::Continue),
        }
    }

    fn compute(&self) -> String {
        let design = match self.form.to_design() {
            Ok(design) => design,
            Err(e) => return format!("error: {e}\n"),
        };
        match estimate_design(&design) {
            Ok(estimate) => {
                let report = Report::new(&design, &estimate);
                info!(se_total = report.se_total, "calculation finished");
                report.render_text(&self.display)
            }
            Err(e) => format!("error: {}\n", user_message(&e, design.samples())),
        }
    }

    fn render_form(&self) -> String {
        let (regions, types) = self.form.dimensions();
        let mut out = format!(
            "N = {}, {} regions × {} types\n",
            self.form.population(),
            regions,
            types
        );
        if !self.form.is_detail_open() {
            out.push_str("(run `detail` to enter names and matrices)\n");
            return out;
        }
        out.push('\n');
        let regions = self.form.region_names().to_vec();
        let types = self.form.type_names().to_vec();
        for (title, rows) in [
            ("Sample sizes (n_h)", self.form.samples()),
            ("Stratum populations (N_h)", self.form.populations()),
        ] {
            let values = rows.iter().flatten().copied().collect();
            if let Ok(grid) = StratumGrid::new(regions.clone(), types.clone(), values) {
                out.push_str(&render_table(title, &grid, |v: &u64| v.to_string()));
            }
        }
        out
    }

    /// Read commands from `input` until EOF or `quit`, writing responses to `output`.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, mut output: W) -> io::Result<()> {
        write!(output, "{HELP}\n> ")?;
        output.flush()?;
        for line in input.lines() {
            let (text, flow) = self.execute(&line?);
            output.write_all(text.as_bytes())?;
            if flow == Flow::Quit {
                break;
            }
            write!(output, "> ")?;
            output.flush()?;
        }
        writeln!(output)?;
        Ok(())
    }
}

/// Message shown for a rejected calculation.
///
/// Strata are named by their labels in `samples`, the grid that was flattened.
pub fn user_message(err: &CalcError, samples: &StratumGrid<u64>) -> String {
    match err.reason() {
        Reason::NoSamples => "enter at least one sample size (n_h) before calculating".to_string(),
        Reason::ZeroSampleStratum { index } => {
            let stratum = match samples.stratum_id(index) {
                Some(id) => format!("{} × {}", id.region, id.kind),
                None => format!("stratum #{}", index + 1),
            };
            format!("{stratum} has no samples; every n_h must be at least 1")
        }
        Reason::EmptyPopulation => "total population must be at least 1".to_string(),
        Reason::LengthMismatch {
            samples,
            populations,
        } => format!("{samples} sample sizes but {populations} stratum populations"),
    }
}
