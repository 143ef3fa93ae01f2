//! Interactive menu loop over the working vacancy collection

use jobagg_core::{
    Error, JobPlatform, PlatformType, Result, Vacancy, filter_by_keyword, sort_by_date,
    sort_by_salary,
};
use jobagg_storage::JsonFileStore;
use std::collections::HashMap;
use std::io::{BufRead, Write};
use std::path::Path;
use tracing::debug;

use crate::ui;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuChoice {
    Search,
    Display,
    Save,
    Import,
    Exit,
}

impl MenuChoice {
    fn from_choice(choice: &str) -> Option<Self> {
        match choice {
            "1" => Some(MenuChoice::Search),
            "2" => Some(MenuChoice::Display),
            "3" => Some(MenuChoice::Save),
            "4" => Some(MenuChoice::Import),
            "5" => Some(MenuChoice::Exit),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SortOrder {
    ByDate,
    BySalary,
}

impl SortOrder {
    fn from_choice(choice: &str) -> Option<Self> {
        match choice {
            "1" => Some(SortOrder::ByDate),
            "2" => Some(SortOrder::BySalary),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FilterChoice {
    Filter,
    Keep,
}

impl FilterChoice {
    fn from_choice(choice: &str) -> Option<Self> {
        match choice {
            "1" => Some(FilterChoice::Filter),
            "2" => Some(FilterChoice::Keep),
            _ => None,
        }
    }
}

/// Whether the loop keeps going after an action
enum Step {
    Continue,
    Quit,
}

/// Interactive session owning the working collection.
///
/// Reads answers line by line from `input` and writes everything the user sees to
/// `output`. End of input ends the session the same way the exit action does.
pub struct Session<R, W> {
    input: R,
    output: W,
    platforms: HashMap<PlatformType, Box<dyn JobPlatform>>,
    store: JsonFileStore,
    vacancies: Vec<Vacancy>,
    last_requested: Option<usize>,
}

impl<R: BufRead, W: Write> Session<R, W> {
    pub fn new(input: R, output: W, store: JsonFileStore) -> Self {
        Self {
            input,
            output,
            platforms: HashMap::new(),
            store,
            vacancies: Vec::new(),
            last_requested: None,
        }
    }

    /// Register a platform; it replaces any platform of the same type
    pub fn with_platform(mut self, platform: Box<dyn JobPlatform>) -> Self {
        self.platforms.insert(platform.platform_type(), platform);
        self
    }

    /// The working collection
    pub fn vacancies(&self) -> &[Vacancy] {
        &self.vacancies
    }

    pub fn output(&self) -> &W {
        &self.output
    }

    /// Run the menu loop until the user exits or input ends
    pub async fn run(&mut self) -> Result<()> {
        ui::display_banner(&mut self.output)?;

        loop {
            ui::print_main_menu(&mut self.output)?;
            let Some(choice) = self.ask_until("Choose an action", MenuChoice::from_choice)? else {
                break;
            };
            debug!(?choice, "menu action");

            let step = match choice {
                MenuChoice::Search => self.search().await?,
                MenuChoice::Display => self.display()?,
                MenuChoice::Save => self.save().await?,
                MenuChoice::Import => self.import().await?,
                MenuChoice::Exit => Step::Quit,
            };

            if let Step::Quit = step {
                break;
            }
        }

        ui::print_info(&mut self.output, "Goodbye!")?;
        Ok(())
    }

    async fn search(&mut self) -> Result<Step> {
        let Some(query) = self.ask_until("Job title to search for", non_empty)? else {
            return Ok(Step::Quit);
        };
        let Some(count) = self.ask_until("Number of vacancies to fetch", positive_count)? else {
            return Ok(Step::Quit);
        };

        let available = self.available_platforms();
        ui::print_platform_menu(&mut self.output, &available)?;
        let Some(platform_type) = self.ask_until("Choose a platform", |choice| {
            PlatformType::from_choice(choice).filter(|p| available.contains(p))
        })?
        else {
            return Ok(Step::Quit);
        };

        let result = match self.platforms.get(&platform_type) {
            Some(platform) => platform.search_report(&query, count).await,
            None => return Ok(Step::Continue),
        };

        let report = match result {
            Ok(report) => report,
            Err(err) => {
                ui::print_error(
                    &mut self.output,
                    &format!("Search on {platform_type} failed: {err}"),
                )?;
                return Ok(Step::Continue);
            }
        };

        let skipped = report.rejected.len();
        self.vacancies = report.vacancies;
        self.last_requested = Some(count);

        ui::print_success(
            &mut self.output,
            &format!(
                "Found {} vacancies on {platform_type}",
                self.vacancies.len()
            ),
        )?;
        if skipped > 0 {
            ui::print_warning(
                &mut self.output,
                &format!("{skipped} results were skipped as incomplete or invalid"),
            )?;
        }

        self.sort()
    }

    fn sort(&mut self) -> Result<Step> {
        ui::print_sort_menu(&mut self.output)?;
        let Some(order) = self.ask_until("Choose sorting", SortOrder::from_choice)? else {
            return Ok(Step::Quit);
        };

        let vacancies = std::mem::take(&mut self.vacancies);
        self.vacancies = match order {
            SortOrder::ByDate => sort_by_date(vacancies, self.last_requested),
            SortOrder::BySalary => sort_by_salary(vacancies),
        };
        Ok(Step::Continue)
    }

    fn display(&mut self) -> Result<Step> {
        if self.vacancies.is_empty() {
            ui::print_info(&mut self.output, "No vacancies available.")?;
            return Ok(Step::Continue);
        }

        ui::print_vacancies(&mut self.output, &self.vacancies)?;
        ui::print_filter_menu(&mut self.output)?;
        let Some(choice) = self.ask_until("Choose an action", FilterChoice::from_choice)? else {
            return Ok(Step::Quit);
        };

        if choice == FilterChoice::Filter {
            let Some(keyword) = self.ask("Keyword")? else {
                return Ok(Step::Quit);
            };
            let vacancies = std::mem::take(&mut self.vacancies);
            self.vacancies = filter_by_keyword(vacancies, &keyword);
            ui::print_info(
                &mut self.output,
                &format!("{} vacancies match {keyword:?}", self.vacancies.len()),
            )?;
        }

        Ok(Step::Continue)
    }

    async fn save(&mut self) -> Result<Step> {
        if self.vacancies.is_empty() {
            ui::print_info(&mut self.output, "No vacancies to save.")?;
            return Ok(Step::Continue);
        }

        let Some(file_name) = self.ask_until("File name", non_empty)? else {
            return Ok(Step::Quit);
        };

        match self.store.save(&self.vacancies, Path::new(&file_name)).await {
            Ok(report) => {
                ui::print_success(
                    &mut self.output,
                    &format!(
                        "Vacancies saved to {file_name}: {} added, {} already present",
                        report.added, report.duplicates
                    ),
                )?;
                if report.dropped_existing > 0 {
                    ui::print_warning(
                        &mut self.output,
                        &format!(
                            "{} stored entries no longer validate and were removed",
                            report.dropped_existing
                        ),
                    )?;
                }
            }
            Err(err) => {
                ui::print_error(&mut self.output, &format!("Could not save vacancies: {err}"))?;
            }
        }

        Ok(Step::Continue)
    }

    async fn import(&mut self) -> Result<Step> {
        let Some(file_name) = self.ask_until("File name", non_empty)? else {
            return Ok(Step::Quit);
        };

        match self.store.load(Path::new(&file_name)).await {
            Ok(report) => {
                let skipped = report.rejected.len();
                self.vacancies = report.vacancies;
                ui::print_success(
                    &mut self.output,
                    &format!("Imported {} vacancies", self.vacancies.len()),
                )?;
                if skipped > 0 {
                    ui::print_warning(
                        &mut self.output,
                        &format!("{skipped} stored entries were skipped as invalid"),
                    )?;
                }
            }
            Err(Error::NotFound(path)) => {
                ui::print_error(
                    &mut self.output,
                    &format!("File does not exist: {}", path.display()),
                )?;
            }
            Err(err) => {
                ui::print_error(&mut self.output, &format!("Could not import vacancies: {err}"))?;
            }
        }

        Ok(Step::Continue)
    }

    fn available_platforms(&self) -> Vec<PlatformType> {
        PlatformType::all()
            .into_iter()
            .filter(|p| self.platforms.contains_key(p))
            .collect()
    }

    /// Read one trimmed answer; `None` once input has ended
    fn ask(&mut self, prompt: &str) -> Result<Option<String>> {
        ui::print_prompt(&mut self.output, prompt)?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            writeln!(self.output)?;
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    /// Ask until `parse` accepts the answer, reporting an input error for each rejection
    fn ask_until<T>(
        &mut self,
        prompt: &str,
        parse: impl Fn(&str) -> Option<T>,
    ) -> Result<Option<T>> {
        loop {
            let Some(answer) = self.ask(prompt)? else {
                return Ok(None);
            };
            match parse(&answer) {
                Some(value) => return Ok(Some(value)),
                None => ui::print_error(&mut self.output, "Input error, try again")?,
            }
        }
    }
}

fn non_empty(answer: &str) -> Option<String> {
    (!answer.is_empty()).then(|| answer.to_string())
}

fn positive_count(answer: &str) -> Option<usize> {
    answer.parse::<usize>().ok().filter(|count| *count > 0)
}
