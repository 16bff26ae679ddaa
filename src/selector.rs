//! Interactive choice of which study file to run against.

use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::{Error, Result};

pub const PROMPT: &str = "Which file to use? 1 - small set, 2 - medium set, 3 - large set";
pub const INVALID_SELECTION: &str = "Incorrect selection, please choose 1, 2 or 3!";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetChoice {
    Small,
    Medium,
    Large,
}

impl DatasetChoice {
    pub fn code(self) -> u8 {
        match self {
            DatasetChoice::Small => 1,
            DatasetChoice::Medium => 2,
            DatasetChoice::Large => 3,
        }
    }

    pub fn file_name(self) -> &'static str {
        match self {
            DatasetChoice::Small => "SMALL_sepsis_survival_study.csv",
            DatasetChoice::Medium => "MEDIUM_sepsis_survival_study.csv",
            DatasetChoice::Large => "LARGE_sepsis_survival_study.csv",
        }
    }

    /// Label used in report file names.
    pub fn size_label(self) -> &'static str {
        match self {
            DatasetChoice::Small => "Small",
            DatasetChoice::Medium => "Medium",
            DatasetChoice::Large => "Large",
        }
    }

    pub fn path_in(self, data_dir: &Path) -> PathBuf {
        data_dir.join(self.file_name())
    }
}

impl FromStr for DatasetChoice {
    type Err = Error;

    /// Accepts exactly `"1"`, `"2"` or `"3"`.
    fn from_str(s: &str) -> Result<Self> {
        match s {
            "1" => Ok(DatasetChoice::Small),
            "2" => Ok(DatasetChoice::Medium),
            "3" => Ok(DatasetChoice::Large),
            other => Err(Error::InvalidConfig(format!(
                "dataset selection must be 1, 2 or 3, got {other:?}"
            ))),
        }
    }
}

/// Prompts on `output` until `input` yields a valid choice.
///
/// `max_attempts = None` keeps asking forever. End of input ends the loop
/// with [`Error::InputClosed`].
pub fn select_dataset<R, W>(input: &mut R, output: &mut W, max_attempts: Option<usize>) -> Result<DatasetChoice>
where
    R: BufRead,
    W: Write,
{
    let mut attempts = 0;
    loop {
        if max_attempts.is_some_and(|max| attempts >= max) {
            return Err(Error::TooManyAttempts(attempts));
        }
        attempts += 1;

        write!(output, "{PROMPT}")?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Err(Error::InputClosed);
        }

        match line.trim_end_matches(['\r', '\n']).parse() {
            Ok(choice) => return Ok(choice),
            Err(_) => writeln!(output, "{INVALID_SELECTION}")?,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn run(input: &str, max_attempts: Option<usize>) -> (Result<DatasetChoice>, String) {
        let mut input = Cursor::new(input.as_bytes().to_vec());
        let mut output = Vec::new();
        let choice = select_dataset(&mut input, &mut output, max_attempts);
        (choice, String::from_utf8(output).unwrap())
    }

    #[test]
    fn valid_tokens_map_to_files() {
        for (token, file) in [
            ("1\n", "SMALL_sepsis_survival_study.csv"),
            ("2\n", "MEDIUM_sepsis_survival_study.csv"),
            ("3\r\n", "LARGE_sepsis_survival_study.csv"),
        ] {
            let (choice, output) = run(token, None);
            let choice = choice.unwrap();
            assert_eq!(choice.file_name(), file);
            assert_eq!(choice.path_in(Path::new("data")), Path::new("data").join(file));
            assert_eq!(output, PROMPT);
        }
    }

    #[test]
    fn codes_and_labels() {
        assert_eq!(DatasetChoice::Small.code(), 1);
        assert_eq!(DatasetChoice::Large.code(), 3);
        assert_eq!(DatasetChoice::Medium.size_label(), "Medium");
    }

    #[test]
    fn invalid_answers_reprompt() {
        let (choice, output) = run("4\n\n small\n 1\n2\n", None);
        assert_eq!(choice.unwrap(), DatasetChoice::Medium);
        assert_eq!(output.matches(INVALID_SELECTION).count(), 4);
        assert_eq!(output.matches(PROMPT).count(), 5);
    }

    #[test]
    fn attempts_can_be_capped() {
        let (choice, output) = run("x\ny\n1\n", Some(2));
        assert!(matches!(choice, Err(Error::TooManyAttempts(2))));
        assert_eq!(output.matches(PROMPT).count(), 2);

        let (choice, _) = run("x\n1\n", Some(2));
        assert_eq!(choice.unwrap(), DatasetChoice::Small);
    }

    #[test]
    fn closed_input_stops_prompting() {
        let (choice, output) = run("9\n", None);
        assert!(matches!(choice, Err(Error::InputClosed)));
        assert_eq!(output.matches(INVALID_SELECTION).count(), 1);
    }

    #[test]
    fn parse_is_exact() {
        assert_eq!("2".parse::<DatasetChoice>().unwrap(), DatasetChoice::Medium);
        assert!(" 2".parse::<DatasetChoice>().is_err());
        assert!("02".parse::<DatasetChoice>().is_err());
    }
}
