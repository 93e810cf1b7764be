use std::fmt::{Display, Formatter};
use std::io::{self, BufRead, Write};
use std::str::FromStr;

use sales_analytics::numeric::Money;
use sales_analytics::validate::FilterOptions;

/// Error occurring while soliciting filter options from the user.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum PromptError {
    /// The amount entered is not a valid number.
    InvalidAmount(String),
    /// Reading from or writing to the terminal failed.
    Io(String),
}

impl Display for PromptError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&match self {
            PromptError::InvalidAmount(value) => {
                format!("'{}' is not a valid amount", value)
            }
            PromptError::Io(err) => format!("Prompt I/O error: {}", err),
        })
    }
}

impl From<io::Error> for PromptError {
    fn from(err: io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

fn ask(
    input: &mut impl BufRead,
    output: &mut impl Write,
    question: &str,
) -> Result<String, PromptError> {
    write!(output, "{}", question)?;
    output.flush()?;
    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(answer.trim().to_string())
}

/// Asks whether to filter the data, and if so for an optional region and an
/// optional minimum amount. Blank answers mean "no constraint"; a
/// non-numeric amount is rejected with a typed, recoverable error rather
/// than a raw conversion failure.
///
/// Reads and writes through the injected handles so tests can drive the
/// interaction in memory.
pub fn prompt_filters(
    input: &mut impl BufRead,
    output: &mut impl Write,
) -> Result<FilterOptions, PromptError> {
    let answer = ask(input, output, "\nDo you want to filter data? (y/n): ")?;
    if !answer.eq_ignore_ascii_case("y") {
        return Ok(FilterOptions::default());
    }

    let region = ask(input, output, "Enter region name (or leave blank): ")?;
    let region = if region.is_empty() { None } else { Some(region) };

    let amount = ask(
        input,
        output,
        "Enter minimum transaction amount (or leave blank): ",
    )?;
    let min_amount = if amount.is_empty() {
        None
    } else {
        Some(Money::from_str(&amount).map_err(|_| PromptError::InvalidAmount(amount))?)
    };

    Ok(FilterOptions {
        region,
        min_amount,
        max_amount: None,
    })
}
