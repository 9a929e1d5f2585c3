// src/console.rs

//! Operator dialogue: prompts, answers and result rendering.
//!
//! Generic over the input and output streams so whole sessions can be
//! replayed from a string in tests.

use std::io::{self, BufRead, Write};

use crate::error::Result;
use crate::models::Vacancy;
use crate::pipeline::{SearchOutcome, SearchPipeline, SearchQuery};
use crate::services::VacancySource;
use crate::utils::{parse_salary_input, parse_top_n, split_words};

const PROMPT_KEYWORD: &str = "Введите ключевое слово для поискового запроса: ";
const PROMPT_FILTER: &str = "Введите ключевые слова для фильтрации вакансий: ";
const PROMPT_MIN: &str = "Введите нижнюю границу заработной платы: ";
const PROMPT_MAX: &str = "Введите верхнюю границу заработной платы: ";
const PROMPT_TOP: &str = "Введите количество вакансий для вывода в топ N: ";
const PROMPT_REMAINDER: &str = "Показать остальные вакансии? (да: 1, нет: 0): ";
const PROMPT_AGAIN: &str = "Выполнить новый поиск? (да: 1, нет: 0): ";

pub struct Console<R, W> {
    input: R,
    output: W,
}

impl Console<io::StdinLock<'static>, io::Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Print a prompt and read one trimmed line; `None` once input is exhausted.
    fn ask(&mut self, prompt: &str) -> Result<Option<String>> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    /// Yes/no question; end of input counts as "no".
    pub fn confirm(&mut self, prompt: &str) -> Result<bool> {
        Ok(self
            .ask(prompt)?
            .is_some_and(|answer| is_yes(&answer)))
    }

    /// Collect a full query, or `None` if the operator closed the input.
    pub fn ask_query(&mut self, default_top_n: usize) -> Result<Option<SearchQuery>> {
        let Some(keyword) = self.ask(PROMPT_KEYWORD)? else {
            return Ok(None);
        };
        let filter = self.ask(PROMPT_FILTER)?.unwrap_or_default();
        let min = self.ask(PROMPT_MIN)?.unwrap_or_default();
        let max = self.ask(PROMPT_MAX)?.unwrap_or_default();
        let top = self.ask(PROMPT_TOP)?.unwrap_or_default();

        let top_n = parse_top_n(&top).unwrap_or(default_top_n);

        Ok(Some(
            SearchQuery::new(keyword, top_n)
                .with_filter_words(split_words(&filter))
                .with_salary(parse_salary_input(&min), parse_salary_input(&max)),
        ))
    }

    pub fn show_vacancies(&mut self, vacancies: &[Vacancy]) -> Result<()> {
        for vacancy in vacancies {
            writeln!(self.output, "{vacancy}")?;
        }
        Ok(())
    }

    /// Match count, fetch problems and the top list.
    pub fn show_outcome(&mut self, outcome: &SearchOutcome) -> Result<()> {
        if let Some(error) = &outcome.fetch_error {
            writeln!(self.output, "Ошибка подключения: {error}")?;
        }
        for report in &outcome.persisted {
            if let Err(error) = &report.result {
                writeln!(self.output, "Не удалось сохранить {}: {error}", report.location)?;
            }
        }

        writeln!(self.output, "Найдено {} вакансий\n", outcome.total())?;
        if outcome.total() > 0 {
            writeln!(self.output, "Топ-{} вакансий:", outcome.top().len())?;
            self.show_vacancies(outcome.top())?;
        }
        Ok(())
    }

    /// Everything after the top list, if any and if wanted.
    pub fn offer_remainder(&mut self, outcome: &SearchOutcome, show: Option<bool>) -> Result<()> {
        if outcome.remainder().is_empty() {
            return Ok(());
        }
        let show = match show {
            Some(show) => show,
            None => self.confirm(PROMPT_REMAINDER)?,
        };
        if show {
            writeln!(self.output, "Остальные вакансии:")?;
            self.show_vacancies(outcome.remainder())?;
        }
        Ok(())
    }

    pub fn message(&mut self, text: &str) -> Result<()> {
        writeln!(self.output, "{text}")?;
        Ok(())
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(
        answer.to_lowercase().as_str(),
        "1" | "да" | "д" | "y" | "yes"
    )
}

/// Prompt, search and render until the operator stops. Returns the number of searches run.
pub fn run_session<S, R, W>(
    console: &mut Console<R, W>,
    pipeline: &SearchPipeline<S>,
    default_top_n: usize,
) -> Result<usize>
where
    S: VacancySource,
    R: BufRead,
    W: Write,
{
    let mut searches = 0;

    while let Some(query) = console.ask_query(default_top_n)? {
        let outcome = pipeline.run(&query)?;
        searches += 1;

        console.show_outcome(&outcome)?;
        console.offer_remainder(&outcome, None)?;

        if !console.confirm(PROMPT_AGAIN)? {
            break;
        }
    }

    Ok(searches)
}
