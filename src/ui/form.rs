// Terminal input form
use crate::model::{AnalysisRequest, Period, RiskTolerance};
use std::fmt::Display;
use std::io::{self, BufRead, Write};
use std::str::FromStr;

pub struct ConsoleForm<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> ConsoleForm<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Reads one line; `None` on EOF.
    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn ask_text(&mut self, label: &str, default: &str) -> io::Result<Option<String>> {
        write!(self.output, "{} [{}]: ", label, default)?;
        self.output.flush()?;
        Ok(self
            .read_line()?
            .map(|answer| if answer.is_empty() { default.to_string() } else { answer }))
    }

    /// Re-asks until the answer parses as one of `options`.
    fn ask_choice<T>(&mut self, label: &str, options: &[T], default: T) -> io::Result<Option<T>>
    where
        T: FromStr<Err = String> + Display + Copy,
    {
        let listed = options
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("/");
        loop {
            write!(self.output, "{} ({}) [{}]: ", label, listed, default)?;
            self.output.flush()?;
            let Some(answer) = self.read_line()? else {
                return Ok(None);
            };
            if answer.is_empty() {
                return Ok(Some(default));
            }
            match answer.parse::<T>() {
                Ok(choice) => return Ok(Some(choice)),
                Err(e) => writeln!(self.output, "⚠️ {}", e)?,
            }
        }
    }

    /// Fills a request, offering `previous` as defaults. `None` means the user quit.
    pub fn read_request(&mut self, previous: &AnalysisRequest) -> io::Result<Option<AnalysisRequest>> {
        loop {
            let Some(company) = self.ask_text("Enter the company name", &previous.company)? else {
                return Ok(None);
            };
            let Some(period) =
                self.ask_choice("Select the historical data period", &Period::ALL, previous.period)?
            else {
                return Ok(None);
            };
            let Some(risk_tolerance) =
                self.ask_choice("Select your risk tolerance", &RiskTolerance::ALL, previous.risk_tolerance)?
            else {
                return Ok(None);
            };
            let Some(investment_goal) = self.ask_text("Enter your investment goal", &previous.investment_goal)?
            else {
                return Ok(None);
            };

            write!(self.output, "Analyze Stock? [Enter = analyze, e = edit, q = quit]: ")?;
            self.output.flush()?;
            match self.read_line()?.as_deref() {
                None | Some("q") | Some("Q") => return Ok(None),
                Some("e") | Some("E") => continue,
                Some(_) => {
                    return Ok(Some(AnalysisRequest {
                        company,
                        period,
                        risk_tolerance,
                        investment_goal,
                    }));
                }
            }
        }
    }
}
