use std::io::{self, BufRead, Write};
use thiserror::Error;
use log::debug;
use super::{
    color::ColorName,
    geometry::GridSpec,
    locale,
    tessellation::{MosaicConfig, PlacementMode},
};

/// The answers known before prompting, anything missing is asked for
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Answers {
    pub first: Option<ColorName>,
    pub second: Option<ColorName>,
    pub placement: Option<PlacementMode>,
    pub grid: Option<GridSpec>,
}

impl Answers {
    /// Asks for every missing answer in the order first color, second color, placement, count
    ///
    /// # Parameters
    ///
    /// prompter: The console to ask on
    ///
    /// # Errors
    ///
    /// See PromptError for the possible errors
    pub fn complete<R: BufRead, W: Write>(self, prompter: &mut Prompter<R, W>) -> Result<MosaicConfig, PromptError> {
        let first = match self.first {
            Some(first) => first,
            None => prompter.choose_color(locale::CHOOSE_FIRST_COLOR)?,
        };
        let second = match self.second {
            Some(second) => second,
            None => prompter.choose_color(locale::CHOOSE_SECOND_COLOR)?,
        };
        let placement = match self.placement {
            Some(placement) => placement,
            None => prompter.choose_placement()?,
        };
        let grid = match self.grid {
            Some(grid) => grid,
            None => prompter.choose_grid()?,
        };

        Ok(MosaicConfig {
            grid,
            first,
            second,
            placement,
        })
    }
}

/// Asks questions on a console until a valid answer is given
pub struct Prompter<R: BufRead, W: Write> {
    /// Where answers are read from
    input: R,
    /// Where questions and complaints are written to
    output: W,
}

impl Prompter<io::StdinLock<'static>, io::Stdout> {
    /// Creates a prompter on the standard input and output
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    /// Creates a new prompter
    ///
    /// # Parameters
    ///
    /// input: Where answers are read from
    ///
    /// output: Where questions are written to
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
        }
    }

    /// Writes a line of text
    ///
    /// # Parameters
    ///
    /// text: The text to write
    pub fn say(&mut self, text: &str) -> Result<(), PromptError> {
        writeln!(self.output, "{}", text)?;
        Ok(())
    }

    /// Asks until one of the known colors is given
    ///
    /// # Parameters
    ///
    /// question: The question to ask
    pub fn choose_color(&mut self, question: &str) -> Result<ColorName, PromptError> {
        self.say(locale::AVAILABLE_COLORS)?;
        for (alias, _) in locale::COLOR_NAMES {
            writeln!(self.output, "  {}", alias)?;
        }

        loop {
            let answer = self.ask(question)?;
            match locale::resolve_color(&answer) {
                Some(color) => return Ok(color),
                None => self.say(locale::INVALID_COLOR)?,
            }
        }
    }

    /// Asks until a placement mode is chosen, 1 is alternating and 2 is gradient
    pub fn choose_placement(&mut self) -> Result<PlacementMode, PromptError> {
        loop {
            match self.ask(locale::PLACEMENT_CHOICE)?.trim() {
                "1" => return Ok(PlacementMode::Alternating),
                "2" => return Ok(PlacementMode::Gradient),
                _ => self.say(locale::INVALID_CHOICE)?,
            }
        }
    }

    /// Asks until a number of hexagons within the allowed range is given
    pub fn choose_grid(&mut self) -> Result<GridSpec, PromptError> {
        loop {
            let answer = self.ask(locale::HEXAGON_COUNT_PROMPT)?;
            let Ok(value) = answer.trim().parse::<i64>() else {
                self.say(locale::INVALID_NUMBER)?;
                continue;
            };

            match usize::try_from(value).ok().and_then(|value| GridSpec::new(value).ok()) {
                Some(grid) => return Ok(grid),
                None => self.say(locale::NUMBER_RANGE_ERROR)?,
            }
        }
    }

    /// Writes the question and reads one line of answer
    fn ask(&mut self, question: &str) -> Result<String, PromptError> {
        write!(self.output, "{}", question)?;
        self.output.flush()?;

        let mut answer = String::new();
        if self.input.read_line(&mut answer)? == 0 {
            return Err(PromptError::UnexpectedEof);
        }
        debug!("Answer to {:?}: {:?}", question.trim(), answer.trim());

        Ok(answer)
    }
}

#[derive(Error, Debug)]
pub enum PromptError {
    #[error("Unable to talk to the console: {}", .0)]
    Io(io::Error),
    #[error("The input ended before all questions were answered")]
    UnexpectedEof,
}

impl From<io::Error> for PromptError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn prompter(input: &str) -> Prompter<Cursor<Vec<u8>>, Vec<u8>> {
        Prompter::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    fn output(prompter: Prompter<Cursor<Vec<u8>>, Vec<u8>>) -> String {
        String::from_utf8(prompter.output).unwrap()
    }

    #[test]
    fn full_session_builds_config() {
        let mut prompter = prompter("красный\nсиний\n2\n7\n");
        let config = Answers::default().complete(&mut prompter).unwrap();

        assert_eq!(config, MosaicConfig {
            grid: GridSpec::new(7).unwrap(),
            first: ColorName::Red,
            second: ColorName::Blue,
            placement: PlacementMode::Gradient,
        });

        let text = output(prompter);
        assert_eq!(text.matches(locale::AVAILABLE_COLORS).count(), 2);
        assert!(text.contains("  фиолетовый\n"));
        assert!(text.contains(locale::HEXAGON_COUNT_PROMPT));
    }

    #[test]
    fn invalid_color_is_asked_again() {
        let mut prompter = prompter("черный\nЖелтый\n");
        assert_eq!(prompter.choose_color(locale::CHOOSE_FIRST_COLOR).unwrap(), ColorName::Yellow);

        let text = output(prompter);
        assert_eq!(text.matches(locale::INVALID_COLOR).count(), 1);
        assert_eq!(text.matches(locale::CHOOSE_FIRST_COLOR).count(), 2);
    }

    #[test]
    fn placement_accepts_only_one_or_two() {
        let mut prompter = prompter("3\ngradient\n 1 \n");
        assert_eq!(prompter.choose_placement().unwrap(), PlacementMode::Alternating);
        assert_eq!(output(prompter).matches(locale::INVALID_CHOICE).count(), 2);
    }

    #[test]
    fn count_distinguishes_bad_numbers_from_bad_range() {
        let mut prompter = prompter("abc\n3\n-5\n21\n20\n");
        assert_eq!(prompter.choose_grid().unwrap(), GridSpec::new(20).unwrap());

        let text = output(prompter);
        assert_eq!(text.matches(locale::INVALID_NUMBER).count(), 1);
        assert_eq!(text.matches(locale::NUMBER_RANGE_ERROR).count(), 3);
    }

    #[test]
    fn known_answers_are_not_asked() {
        let answers = Answers {
            first: Some(ColorName::Green),
            second: Some(ColorName::Cyan),
            placement: None,
            grid: Some(GridSpec::new(4).unwrap()),
        };
        let mut prompter = prompter("1\n");
        let config = answers.complete(&mut prompter).unwrap();

        assert_eq!(config.placement, PlacementMode::Alternating);
        let text = output(prompter);
        assert!(!text.contains(locale::AVAILABLE_COLORS));
        assert!(!text.contains(locale::HEXAGON_COUNT_PROMPT));
    }

    #[test]
    fn end_of_input_is_an_error() {
        let mut prompter = prompter("красный\n");
        let result = Answers::default().complete(&mut prompter);
        assert!(matches!(result, Err(PromptError::UnexpectedEof)));
    }
}
