//! Interactive cleaning and exploration of the COVID survey
//!
//! A [`SurveySession`] owns the table for the whole run; every menu action
//! mutates or reads it through `&mut self`.

use crate::config::SurveyConfig;
use eda_core::describe::{describe, info, Include};
use eda_core::display::{render_counts, render_describe, render_info, render_table};
use eda_core::loader::{self, parse_number};
use eda_core::utils::{mean, std_dev};
use eda_core::{ColumnKind, Result, Table};
use eda_frame::boolean::{map_yes_no, MappingReport};
use eda_frame::categorical::to_category;
use eda_frame::coerce::coerce_numeric;
use eda_frame::datetime::{expand_datetime, PART_COLUMNS};
use eda_frame::impute::{impute_median, ImputationReport};
use eda_frame::{drop_empty_rows, sort_by, value_counts, DateOrder, SortKey};
use eda_histogram::{histograms_by_group, plot_grouped, render_grouped, GroupedHistograms};
use std::collections::HashSet;
use std::fmt;
use std::io::{BufRead, Write};
use std::path::Path;
use tracing::warn;

/// Menu entries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Inspect,
    ParseDates,
    CleanAndMapBooleans,
    ConvertCategorical,
    ImputeTemperature,
    DescribeAll,
    Sort,
    MeanIggUnvaccinated,
    SmokingFrequency,
    Histograms,
    FullPipeline,
}

impl Action {
    pub const ALL: [Action; 11] = [
        Action::Inspect,
        Action::ParseDates,
        Action::CleanAndMapBooleans,
        Action::ConvertCategorical,
        Action::ImputeTemperature,
        Action::DescribeAll,
        Action::Sort,
        Action::MeanIggUnvaccinated,
        Action::SmokingFrequency,
        Action::Histograms,
        Action::FullPipeline,
    ];

    /// Menu number, starting at 1
    pub fn number(self) -> usize {
        Self::ALL.iter().position(|a| *a == self).map_or(0, |i| i + 1)
    }

    /// Parse a menu choice such as `"3"` or `" 10 "`
    pub fn from_choice(choice: &str) -> Option<Action> {
        let n: usize = choice.trim().parse().ok()?;
        Self::ALL.get(n.checked_sub(1)?).copied()
    }

    pub fn description(self) -> &'static str {
        match self {
            Action::Inspect => "Show head/info/describe",
            Action::ParseDates => "Parse 'Date time' into 'parsed_date' and calendar columns",
            Action::CleanAndMapBooleans => "Drop empty rows and map Yes/No answers to booleans",
            Action::ConvertCategorical => "Convert text fields to categorical (Gender, Region, Blood group)",
            Action::ImputeTemperature => "Impute 'Maximum body temperature' (by Gender, then overall)",
            Action::DescribeAll => "Describe all columns",
            Action::Sort => "Sort (Age ascending, Do you smoke? descending)",
            Action::MeanIggUnvaccinated => "Mean IgG level of those not vaccinated against influenza",
            Action::SmokingFrequency => "Frequencies of 'Do you smoke?'",
            Action::Histograms => "Temperature histograms by group",
            Action::FullPipeline => "Run the full pipeline",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:<2} - {}", self.number(), self.description())
    }
}

/// The survey table and the settings that name its columns
#[derive(Debug, Clone)]
pub struct SurveySession {
    table: Table,
    config: SurveyConfig,
}

impl SurveySession {
    pub fn new(table: Table, config: SurveyConfig) -> Self {
        Self { table, config }
    }

    pub fn load<P: AsRef<Path>>(path: P, config: SurveyConfig) -> Result<Self> {
        Ok(Self::new(loader::read_csv(path)?, config))
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn config(&self) -> &SurveyConfig {
        &self.config
    }

    /// Run one action, writing its report to `out`
    pub fn run<W: Write>(&mut self, action: Action, out: &mut W) -> Result<()> {
        writeln!(out, "{}) {}\n", action.number(), action.description())?;
        match action {
            Action::Inspect => self.inspect(out),
            Action::ParseDates => self.parse_dates(out).map(drop),
            Action::CleanAndMapBooleans => self.clean_and_map_booleans(out).map(drop),
            Action::ConvertCategorical => self.convert_categorical(out).map(drop),
            Action::ImputeTemperature => self.impute_temperature(out).map(drop),
            Action::DescribeAll => self.describe_all(out),
            Action::Sort => self.sort(out).map(drop),
            Action::MeanIggUnvaccinated => self.mean_igg_unvaccinated(out).map(drop),
            Action::SmokingFrequency => self.smoking_frequency(out),
            Action::Histograms => self.histograms(out).map(drop),
            Action::FullPipeline => self.full_pipeline(out),
        }
    }

    /// Head, column info and numeric summary
    pub fn inspect<W: Write>(&self, out: &mut W) -> Result<()> {
        writeln!(out, "=== First {} rows ===", self.config.head_rows)?;
        write!(out, "{}", render_table(&self.table, self.config.head_rows)?)?;
        writeln!(out, "\n=== Column info ===")?;
        write!(out, "{}", render_info(&info(&self.table), self.table.n_rows()))?;
        writeln!(out, "\n=== Descriptive statistics (numeric) ===")?;
        write!(out, "{}", render_describe(&describe(&self.table, Include::Numeric)?))?;
        Ok(())
    }

    /// Parse the date column day-first and add calendar columns
    ///
    /// Returns the number of unparseable values, or `None` when the date
    /// column is absent.
    pub fn parse_dates<W: Write>(&mut self, out: &mut W) -> Result<Option<usize>> {
        let source = self.config.date_column.clone();
        if !self.table.has_column(&source) {
            writeln!(out, "Column '{source}' not found.")?;
            return Ok(None);
        }
        let target = self.config.parsed_date_column.clone();
        let lost = expand_datetime(&mut self.table, &source, &target, DateOrder::DayFirst)?;
        writeln!(
            out,
            "Parsed '{source}' into '{target}'. Added columns: {}.",
            PART_COLUMNS.join(", ")
        )?;
        if lost > 0 {
            writeln!(out, "{lost} values could not be parsed and are missing.")?;
        }
        Ok(Some(lost))
    }

    /// Drop all-missing rows, then map every yes/no column present
    pub fn clean_and_map_booleans<W: Write>(&mut self, out: &mut W) -> Result<(usize, Vec<MappingReport>)> {
        let removed = drop_empty_rows(&mut self.table)?;
        writeln!(
            out,
            "Removed fully empty rows: {removed}. Rows remaining: {}",
            self.table.n_rows()
        )?;

        let mut reports = Vec::new();
        for name in &self.config.yes_no_columns {
            if !self.table.has_column(name) {
                continue;
            }
            let report = map_yes_no(&mut self.table, name, &self.config.yes_no)?;
            let mut seen = HashSet::new();
            let examples: Vec<String> = self
                .table
                .labels(name)?
                .into_iter()
                .flatten()
                .filter(|l| seen.insert(l.clone()))
                .take(10)
                .collect();
            writeln!(
                out,
                "Column '{name}' processed ({} yes, {} no, {} cleared, {} unrecognised{}). Examples: {:?}",
                report.yes,
                report.no,
                report.cleared,
                report.unrecognised,
                if report.is_bool { ", stored as bool" } else { "" },
                examples
            )?;
            reports.push(report);
        }
        Ok((removed, reports))
    }

    /// Convert the configured columns to categorical and list all
    /// categorical columns; returns the converted names
    pub fn convert_categorical<W: Write>(&mut self, out: &mut W) -> Result<Vec<String>> {
        let mut converted = Vec::new();
        for name in &self.config.categorical_columns {
            if !self.table.has_column(name) {
                writeln!(out, "Column '{name}' is missing from the table.")?;
                continue;
            }
            let categories = to_category(&mut self.table, name)?;
            writeln!(out, "Column '{name}' converted to categorical.")?;
            writeln!(out, "Categories: {categories:?}\n")?;
            converted.push(name.clone());
        }

        writeln!(out, "Current column types:")?;
        for name in self.table.column_names() {
            writeln!(out, "  {:<40} {}", name, self.table.kind(&name)?)?;
        }
        writeln!(out, "\nCategorical columns:")?;
        for name in self.table.columns_of_kind(ColumnKind::Category) {
            let categories = self.table.categories(&name)?;
            writeln!(out, "{name}: {} categories - {categories:?}", categories.len())?;
        }
        Ok(converted)
    }

    /// Median imputation of the temperature column
    pub fn impute_temperature<W: Write>(&mut self, out: &mut W) -> Result<Option<ImputationReport>> {
        let value = self.config.temperature_column.clone();
        if !self.table.has_column(&value) {
            writeln!(out, "Column '{value}' is missing.")?;
            return Ok(None);
        }
        let gender = self.config.gender_column.clone();
        let group = self.table.has_column(&gender).then_some(gender.as_str());
        let report = impute_median(&mut self.table, &value, group)?;

        writeln!(out, "Missing before imputation: {}", report.missing_before)?;
        if group.is_some() {
            writeln!(out, "Missing after {gender} median fill: {}", report.missing_after_group)?;
            writeln!(out, "Median temperature by {gender}:")?;
            for (label, m) in &report.group_medians {
                writeln!(out, "  {label}: {m:.2}")?;
            }
        } else {
            writeln!(out, "Column '{gender}' is missing; skipping group imputation.")?;
        }
        writeln!(
            out,
            "Missing after overall fill: {}. Overall median = {:.2}",
            report.missing_after, report.overall_median
        )?;

        let values = self.table.present_floats(&value)?;
        let min = values.iter().copied().fold(f64::NAN, f64::min);
        let max = values.iter().copied().fold(f64::NAN, f64::max);
        writeln!(out, "\nAfter imputation:")?;
        writeln!(out, "  min: {min:.2}")?;
        writeln!(out, "  max: {max:.2}")?;
        writeln!(out, "  mean: {:.2}", mean(&values))?;
        writeln!(out, "  std: {:.2}", std_dev(&values))?;
        Ok(Some(report))
    }

    pub fn describe_all<W: Write>(&self, out: &mut W) -> Result<()> {
        write!(out, "{}", render_describe(&describe(&self.table, Include::All)?))?;
        Ok(())
    }

    /// Sort by age ascending then smoking descending, skipping absent
    /// columns; returns the sorted copy
    pub fn sort<W: Write>(&self, out: &mut W) -> Result<Option<Table>> {
        let mut keys = Vec::new();
        if self.table.has_column(&self.config.age_column) {
            keys.push(SortKey::ascending(&self.config.age_column));
        } else {
            writeln!(out, "Column '{}' not found.", self.config.age_column)?;
        }
        if self.table.has_column(&self.config.smoke_column) {
            keys.push(SortKey::descending(&self.config.smoke_column));
        } else {
            writeln!(out, "Column '{}' not found.", self.config.smoke_column)?;
        }
        if keys.is_empty() {
            writeln!(out, "No columns to sort by.")?;
            return Ok(None);
        }

        let sorted = sort_by(&self.table, &keys)?;
        let names: Vec<&str> = keys.iter().map(|k| k.column.as_str()).collect();
        let ascending: Vec<bool> = keys.iter().map(|k| !k.descending).collect();
        writeln!(
            out,
            "First {} rows sorted by {names:?} (ascending={ascending:?}):",
            self.config.sorted_rows
        )?;
        write!(out, "{}", render_table(&sorted, self.config.sorted_rows)?)?;
        Ok(Some(sorted))
    }

    /// Mean IgG level over respondents not vaccinated against influenza
    ///
    /// A row qualifies when its vaccination answer is `false` or one of the
    /// configured negative labels. Non-numeric IgG values are ignored.
    pub fn mean_igg_unvaccinated<W: Write>(&self, out: &mut W) -> Result<Option<f64>> {
        let (igg, vaccinated) = (&self.config.igg_column, &self.config.flu_vaccine_column);
        if !self.table.has_column(igg) || !self.table.has_column(vaccinated) {
            writeln!(out, "Required columns are missing.")?;
            return Ok(None);
        }
        let igg = self.table.values(igg)?;
        let vaccinated = self.table.labels(vaccinated)?;
        let values: Vec<f64> = igg
            .iter()
            .zip(&vaccinated)
            .filter(|(_, answer)| {
                answer
                    .as_deref()
                    .is_some_and(|l| self.config.unvaccinated_labels.iter().any(|u| u == l))
            })
            .filter_map(|(v, _)| v.as_f64().or_else(|| v.label().as_deref().and_then(parse_number)))
            .collect();
        let result = mean(&values);
        writeln!(out, "Mean IgG level of those not vaccinated against influenza: {result}")?;
        Ok(Some(result))
    }

    pub fn smoking_frequency<W: Write>(&self, out: &mut W) -> Result<()> {
        let name = &self.config.smoke_column;
        if !self.table.has_column(name) {
            writeln!(out, "Column '{name}' is missing.")?;
            return Ok(());
        }
        let counts: Vec<(String, usize)> = value_counts(&self.table, name, true)?
            .into_iter()
            .map(|vc| (vc.label.unwrap_or_else(|| "NaN".to_string()), vc.count))
            .collect();
        writeln!(out, "Value frequencies of '{name}':")?;
        write!(out, "{}", render_counts("count", &counts))?;
        Ok(())
    }

    /// Temperature histograms split by smoking and by influenza, printed as
    /// text and drawn to the configured chart file
    pub fn histograms<W: Write>(&mut self, out: &mut W) -> Result<Vec<GroupedHistograms>> {
        let value = self.config.temperature_column.clone();
        let groups = [self.config.smoke_column.clone(), self.config.influenza_column.clone()];
        if self.table.has_column(&value) && self.table.kind(&value)? != ColumnKind::Float {
            coerce_numeric(&mut self.table, &value)?;
        }

        let mut built = Vec::new();
        for group in &groups {
            if !self.table.has_column(&value) || !self.table.has_column(group) {
                writeln!(out, "Missing columns for the histogram by '{group}'.")?;
                continue;
            }
            let grouped = histograms_by_group(&self.table, &value, group, &self.config.histogram)?;
            write!(out, "{}", render_grouped(&grouped, self.config.bar_width))?;
            writeln!(out)?;
            built.push(grouped);
        }

        if let (Some(path), false) = (&self.config.histogram_image, built.is_empty()) {
            plot_grouped(&built, path)?;
            writeln!(out, "Histogram chart saved to {}", path.display())?;
        }
        Ok(built)
    }

    /// Actions 3 to 9, date parsing when the column exists, then histograms
    pub fn full_pipeline<W: Write>(&mut self, out: &mut W) -> Result<()> {
        writeln!(out, "Running the full pipeline (3 -> 4 -> 5 -> 6 -> 7 -> 8 -> 9 -> 2 -> 10)\n")?;
        let mut steps = vec![
            Action::CleanAndMapBooleans,
            Action::ConvertCategorical,
            Action::ImputeTemperature,
            Action::DescribeAll,
            Action::Sort,
            Action::MeanIggUnvaccinated,
            Action::SmokingFrequency,
        ];
        if self.table.has_column(&self.config.date_column) {
            steps.push(Action::ParseDates);
        }
        steps.push(Action::Histograms);
        for step in steps {
            self.run(step, out)?;
            writeln!(out)?;
        }
        writeln!(out, "Pipeline finished.")?;
        Ok(())
    }
}

fn write_menu<W: Write>(out: &mut W) -> Result<()> {
    writeln!(out, "\nChoose an action (enter its number):")?;
    for action in Action::ALL {
        writeln!(out, "{action}")?;
    }
    writeln!(out, "q  - Quit")?;
    write!(out, "Your choice: ")?;
    out.flush()?;
    Ok(())
}

/// Read choices line by line until `q` or end of input
///
/// Unknown choices and failing actions are reported and the loop goes on.
pub fn run_menu<R: BufRead, W: Write>(session: &mut SurveySession, input: R, out: &mut W) -> Result<()> {
    let mut lines = input.lines();
    loop {
        write_menu(out)?;
        let Some(line) = lines.next() else {
            writeln!(out)?;
            break;
        };
        let choice = line?;
        let choice = choice.trim();
        if choice.eq_ignore_ascii_case("q") {
            writeln!(out, "Exit.")?;
            break;
        }
        let Some(action) = Action::from_choice(choice) else {
            writeln!(out, "Invalid choice. Try again.")?;
            continue;
        };
        if let Err(e) = session.run(action, out) {
            warn!(?action, error = %e, "action failed");
            writeln!(out, "An error occurred while running the action: {e}")?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use eda_core::{float_series, text_series, Value};

    fn survey() -> Table {
        Table::new(vec![
            text_series("Date time", &["01.03.2021 10:15", "15.03.2021 08:00", "", "31.03.2021 22:45"]),
            text_series("Gender", &["Male", "Female", "", "Male"]),
            float_series("Age", &[30.0, 25.0, f64::NAN, 30.0]),
            text_series("Do you smoke?", &["Yes", "no", "", "Maybe (можливо)"]),
            text_series("Do you vaccinated influenza?", &["No", "Yes", "", "ні"]),
            text_series("Maximum body temperature", &["36.6", "", "", "38.2"]),
            float_series("IgG level", &[2.0, 10.0, f64::NAN, 4.0]),
        ])
        .unwrap()
    }

    #[test]
    fn test_action_numbers() {
        assert_eq!(Action::from_choice("1"), Some(Action::Inspect));
        assert_eq!(Action::from_choice(" 11 "), Some(Action::FullPipeline));
        assert_eq!(Action::from_choice("0"), None);
        assert_eq!(Action::from_choice("12"), None);
        assert_eq!(Action::from_choice("x"), None);
        assert_eq!(Action::Histograms.number(), 10);
    }

    #[test]
    fn test_clean_and_map() {
        let mut session = SurveySession::new(survey(), SurveyConfig::default());
        let (removed, reports) = session.clean_and_map_booleans(&mut Vec::new()).unwrap();
        assert_eq!(removed, 1);
        assert_eq!(session.table().n_rows(), 3);
        assert_eq!(reports.len(), 2);
        assert!(reports.iter().all(|r| r.is_bool));
        assert_eq!(
            session.table().values("Do you smoke?").unwrap(),
            vec![Value::Bool(true), Value::Bool(false), Value::Missing]
        );
    }

    #[test]
    fn test_impute_and_mean_igg() {
        let mut session = SurveySession::new(survey(), SurveyConfig::default());
        session.clean_and_map_booleans(&mut Vec::new()).unwrap();
        let report = session.impute_temperature(&mut Vec::new()).unwrap().unwrap();
        assert_eq!(report.missing_before, 1);
        assert_eq!(report.missing_after, 0);
        assert_eq!(session.table().null_count("Maximum body temperature").unwrap(), 0);

        // rows 0 and 2 answered "No"/"ні"
        let igg = session.mean_igg_unvaccinated(&mut Vec::new()).unwrap().unwrap();
        assert_abs_diff_eq!(igg, 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_parse_dates_adds_parts() {
        let mut session = SurveySession::new(survey(), SurveyConfig::default());
        let lost = session.parse_dates(&mut Vec::new()).unwrap();
        assert_eq!(lost, Some(0));
        let table = session.table();
        assert_eq!(table.values("day").unwrap()[3], Value::Float(31.0));
        assert_eq!(table.values("hour").unwrap()[0], Value::Float(10.0));
        assert_eq!(table.values("weekday").unwrap()[0], Value::Text("Monday".into()));
    }

    #[test]
    fn test_missing_columns_are_reported() {
        let table = Table::new(vec![float_series("x", &[1.0])]).unwrap();
        let mut session = SurveySession::new(table, SurveyConfig::default());
        let mut out = Vec::new();
        assert_eq!(session.parse_dates(&mut out).unwrap(), None);
        assert!(session.sort(&mut out).unwrap().is_none());
        assert!(session.mean_igg_unvaccinated(&mut out).unwrap().is_none());
        assert!(session.histograms(&mut out).unwrap().is_empty());
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Column 'Date time' not found."));
        assert!(text.contains("No columns to sort by."));
    }

    #[test]
    fn test_histograms_written_to_chart() {
        let dir = tempfile::tempdir().unwrap();
        let chart = dir.path().join("temperature_histograms.svg");
        let config = SurveyConfig {
            histogram_image: Some(chart.clone()),
            ..SurveyConfig::default()
        };
        let mut session = SurveySession::new(survey(), config);
        session.clean_and_map_booleans(&mut Vec::new()).unwrap();
        let mut out = Vec::new();
        let built = session.histograms(&mut out).unwrap();
        assert_eq!(built.len(), 1);
        assert!(chart.exists());
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Histogram chart saved to"));
        assert!(text.contains("Missing columns for the histogram by 'Have you had influenza this year?'."));
    }

    #[test]
    fn test_menu_loop() {
        let mut session = SurveySession::new(survey(), SurveyConfig::default());
        let input = "9\nbogus\n3\nq\n7\n";
        let mut out = Vec::new();
        run_menu(&mut session, input.as_bytes(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Value frequencies of 'Do you smoke?'"));
        assert!(text.contains("Invalid choice. Try again."));
        assert!(text.contains("Removed fully empty rows: 1"));
        assert!(text.ends_with("Exit.\n"));
        assert!(!text.contains("sorted by"));
    }
}
