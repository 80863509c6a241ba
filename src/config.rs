//! Run configuration for the analysis programs
//!
//! Every field has a built-in default matching the fixed datasets, so a
//! JSON file passed with `--config` only needs the values it changes.

use eda_correlation::ComparatorPolicy;
use eda_forecast::ForecastPolicy;
use eda_frame::boolean::YesNoMapping;
use eda_frame::CategoryPolicy;
use eda_histogram::FixedWidthBuilder;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Named set of entities forecast as one summed series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityGroup {
    pub name: String,
    /// Display names, matched against the pivot columns in order
    pub members: Vec<String>,
}

impl EntityGroup {
    pub fn new(name: &str, members: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            members: members.iter().map(|m| m.to_string()).collect(),
        }
    }
}

fn strings(xs: &[&str]) -> Vec<String> {
    xs.iter().map(|s| s.to_string()).collect()
}

/// The sixteen groups forecast by default
///
/// `baltic_4` lists Lithuania twice and therefore counts it twice in the
/// summed series.
pub fn default_groups() -> Vec<EntityGroup> {
    vec![
        EntityGroup::new("scandinavia", &["Sweden", "Norway", "Denmark", "Finland"]),
        EntityGroup::new("benelux", &["Belgium", "Netherlands", "Luxembourg"]),
        EntityGroup::new("eu4", &["Poland", "Hungary", "Czechia", "Slovakia"]),
        EntityGroup::new("arabian", &["Saudi Arabia", "Yemen", "Oman", "United Arab Emirates"]),
        EntityGroup::new("asia_rok_hk_sg_tw", &["South Korea", "Hong Kong", "Singapore", "Taiwan"]),
        EntityGroup::new("mong_china_viet", &["Mongolia", "China", "Vietnam"]),
        EntityGroup::new("north_africa_4", &["Morocco", "Algeria", "Tunisia", "Libya"]),
        EntityGroup::new("south_africa_4", &["South Africa", "Namibia", "Botswana", "Lesotho"]),
        EntityGroup::new("india_nepal_pk", &["India", "Nepal", "Pakistan"]),
        EntityGroup::new("south_america_4", &["Brazil", "Argentina", "Colombia", "Chile"]),
        EntityGroup::new("baltic_4", &["Estonia", "Latvia", "Lithuania", "Lithuania"]),
        EntityGroup::new("balkan_4", &["Slovenia", "Croatia", "Serbia", "Bosnia and Herzegovina"]),
        EntityGroup::new("pol_hun_cze_svk", &["Poland", "Hungary", "Czechia", "Slovakia"]),
        EntityGroup::new("svn_hrv_ltu_lva", &["Slovenia", "Croatia", "Lithuania", "Latvia"]),
        EntityGroup::new("bul_rom_ukr_alb", &["Bulgaria", "Romania", "Ukraine", "Albania"]),
        EntityGroup::new("nafta", &["Canada", "United States", "Mexico"]),
    ]
}

/// Settings of the OWID pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OwidConfig {
    /// Candidate date columns; the first present one is used
    pub date_columns: Vec<String>,
    pub numeric_columns: Vec<String>,
    /// Columns given a frequency table, reported as absent when missing
    pub frequency_columns: Vec<String>,
    /// Candidate metric columns; the first present one is used
    pub metric_columns: Vec<String>,
    /// Candidate entity columns; the first present one is used
    pub entity_columns: Vec<String>,
    pub categories: CategoryPolicy,
    /// Rows listed per category sum table
    pub top_n: usize,
    /// Rows shown when printing a pivot head
    pub preview_rows: usize,
    pub fuzzy_cutoff: f64,
    pub base_entity: String,
    pub compared_entities: Vec<String>,
    /// Paired samples printed per comparison
    pub sample_pairs: usize,
    pub comparator: ComparatorPolicy,
    pub forecast: ForecastPolicy,
    /// History values printed per group
    pub history_tail: usize,
    /// Forecast values printed per group
    pub forecast_head: usize,
    pub groups: Vec<EntityGroup>,
}

impl Default for OwidConfig {
    fn default() -> Self {
        Self {
            date_columns: strings(&["date", "zvit_date", "report_date"]),
            numeric_columns: strings(&["total_cases", "new_cases", "total_tests", "new_tests"]),
            frequency_columns: strings(&["continent", "test_units", "tests_units"]),
            metric_columns: strings(&["total_cases", "new_cases"]),
            entity_columns: strings(&["location", "country", "iso_code"]),
            categories: CategoryPolicy::default(),
            top_n: 8,
            preview_rows: 6,
            fuzzy_cutoff: 0.7,
            base_entity: "Poland".to_string(),
            compared_entities: strings(&["Hungary", "Czechia", "Slovakia"]),
            sample_pairs: 6,
            comparator: ComparatorPolicy::default(),
            forecast: ForecastPolicy::default(),
            history_tail: 3,
            forecast_head: 5,
            groups: default_groups(),
        }
    }
}

/// Settings of the survey session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurveyConfig {
    pub date_column: String,
    /// Name of the parsed timestamp column
    pub parsed_date_column: String,
    pub yes_no_columns: Vec<String>,
    pub yes_no: YesNoMapping,
    pub categorical_columns: Vec<String>,
    pub temperature_column: String,
    pub gender_column: String,
    pub age_column: String,
    pub smoke_column: String,
    pub influenza_column: String,
    pub igg_column: String,
    pub flu_vaccine_column: String,
    /// Labels of a text column that count as "not vaccinated"
    pub unvaccinated_labels: Vec<String>,
    pub head_rows: usize,
    pub sorted_rows: usize,
    pub histogram: FixedWidthBuilder,
    /// Width of the longest histogram bar in characters
    pub bar_width: usize,
    /// SVG chart of the grouped temperature histograms; `None` skips it
    pub histogram_image: Option<PathBuf>,
}

impl Default for SurveyConfig {
    fn default() -> Self {
        Self {
            date_column: "Date time".to_string(),
            parsed_date_column: "parsed_date".to_string(),
            yes_no_columns: strings(&[
                "Do you smoke?",
                "Have you had Covid'19 this year?",
                "Have you had influenza this year?",
                "Do you vaccinated influenza?",
                "Do you vaccinated tuberculosis?",
                "Have you had tuberculosis this year?",
            ]),
            yes_no: YesNoMapping::default(),
            categorical_columns: strings(&["Gender", "Region", "Blood group"]),
            temperature_column: "Maximum body temperature".to_string(),
            gender_column: "Gender".to_string(),
            age_column: "Age".to_string(),
            smoke_column: "Do you smoke?".to_string(),
            influenza_column: "Have you had influenza this year?".to_string(),
            igg_column: "IgG level".to_string(),
            flu_vaccine_column: "Do you vaccinated influenza?".to_string(),
            unvaccinated_labels: strings(&["False", "No", "0", "0.0"]),
            head_rows: 5,
            sorted_rows: 10,
            histogram: FixedWidthBuilder::default(),
            bar_width: 40,
            histogram_image: Some(PathBuf::from("temperature_histograms.svg")),
        }
    }
}

/// Read a JSON configuration file; absent fields keep their defaults
pub fn load<T: DeserializeOwned, P: AsRef<Path>>(path: P) -> eda_core::Result<T> {
    let file = File::open(path.as_ref())?;
    serde_json::from_reader(BufReader::new(file))
        .map_err(|e| eda_core::Error::InvalidInput(format!("{}: {e}", path.as_ref().display())))
}
