//! One fetch-then-render cycle of the dashboard.
//!
//! A subject selection produces a [`Dashboard`]: the recording is segmented
//! once and the same segments annotate both charts. Any failure to obtain or
//! parse the recording ends the cycle with a single [`DashboardError`].

use crate::config::Config;
use crate::core::{segment, Segment, Summary};
use crate::data::{parse_recording_str, LoadError, Recording, Source};
use crate::fetch::{read_local, BlockingDataClient, DataClient, FetchError};
use crate::render::html::PageContent;
use crate::render::{dashboard_page, error_page, render_svg, ChartSpec, RenderError, SelectorTarget};
use crate::subject::{all_subjects, SubjectId};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::Path;

/// Errors ending a render cycle.
#[derive(Debug, Clone, PartialEq)]
pub enum DashboardError {
    /// The recording could not be retrieved
    Fetch(FetchError),
    /// The recording could not be parsed
    Load(LoadError),
    /// The charts could not be drawn
    Render(RenderError),
}

impl DashboardError {
    /// Whether this is a retrieval or parsing failure of the recording.
    pub fn is_data_failure(&self) -> bool {
        matches!(self, DashboardError::Fetch(_) | DashboardError::Load(_))
    }
}

impl std::fmt::Display for DashboardError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DashboardError::Fetch(e) => {
                write!(f, "An error occurred while loading the data: {e}")
            }
            DashboardError::Load(e) => {
                write!(f, "An error occurred while loading the data: {e}")
            }
            DashboardError::Render(e) => {
                write!(f, "An error occurred while rendering the charts: {e}")
            }
        }
    }
}

impl std::error::Error for DashboardError {}

impl From<FetchError> for DashboardError {
    fn from(e: FetchError) -> Self {
        DashboardError::Fetch(e)
    }
}

impl From<LoadError> for DashboardError {
    fn from(e: LoadError) -> Self {
        DashboardError::Load(e)
    }
}

impl From<RenderError> for DashboardError {
    fn from(e: RenderError) -> Self {
        DashboardError::Render(e)
    }
}

/// Fetch and parse a subject's recording.
pub async fn load_remote(
    client: &DataClient,
    config: &Config,
    subject: SubjectId,
) -> Result<Recording, DashboardError> {
    let url = subject.url(&config.base_url);
    let body = client.fetch_text(&url).await?;
    Ok(parse_recording_str(Source::Remote(url), &body)?)
}

/// Fetch and parse a subject's recording, blocking.
pub fn load_remote_blocking(
    client: &BlockingDataClient,
    config: &Config,
    subject: SubjectId,
) -> Result<Recording, DashboardError> {
    let url = subject.url(&config.base_url);
    let body = client.fetch_text(&url)?;
    Ok(parse_recording_str(Source::Remote(url), &body)?)
}

/// Read and parse a local recording file.
pub fn load_file(path: &Path) -> Result<Recording, DashboardError> {
    let body = read_local(path)?;
    Ok(parse_recording_str(
        Source::File(path.display().to_string()),
        &body,
    )?)
}

/// The rendered dashboard for one subject.
#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub subject: SubjectId,
    pub source: Source,
    pub records: usize,
    pub summary: Summary,
    pub segments: Vec<Segment>,
    pub generated_at: DateTime<Utc>,
    #[serde(skip)]
    pub hr_svg: String,
    #[serde(skip)]
    pub rmssd_svg: String,
}

impl Dashboard {
    /// Summarise, segment and chart a recording.
    pub fn build(
        subject: SubjectId,
        recording: &Recording,
        config: &Config,
    ) -> Result<Self, DashboardError> {
        let records = recording.records();
        let segments = segment(records);

        let hr_spec = ChartSpec::hr(records, config.chart_width, config.chart_height);
        let rmssd_spec = ChartSpec::rmssd(records, config.chart_width, config.chart_height);
        let hr_svg = render_svg(&hr_spec, &segments)?;
        let rmssd_svg = render_svg(&rmssd_spec, &segments)?;

        tracing::info!(
            subject = subject.get(),
            records = records.len(),
            segments = segments.len(),
            "Built dashboard"
        );

        Ok(Self {
            subject,
            source: recording.source().clone(),
            records: records.len(),
            summary: Summary::from_recording(recording),
            segments,
            generated_at: Utc::now(),
            hr_svg,
            rmssd_svg,
        })
    }

    /// Full HTML page.
    pub fn to_html(&self, subject_count: u16, target: SelectorTarget) -> String {
        let subjects = all_subjects(subject_count);
        let content = PageContent {
            summary: &self.summary,
            hr_svg: &self.hr_svg,
            rmssd_svg: &self.rmssd_svg,
            footer: format!(
                "Source: {} ({} records). Generated {}.",
                self.source,
                self.records,
                self.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
            ),
        };
        dashboard_page(self.subject, &subjects, target, &content)
    }

    /// Segment listing, one line per segment with its resolved span.
    pub fn segment_table(&self) -> String {
        crate::core::spans(&self.segments, self.records)
            .iter()
            .map(|span| {
                format!(
                    "{:>4} - {:<4} {} ({})\n",
                    span.start,
                    span.end,
                    span.label.code(),
                    span.label.description()
                )
            })
            .collect()
    }
}

/// Page for a failed cycle.
pub fn error_html(
    subject: SubjectId,
    subject_count: u16,
    target: SelectorTarget,
    err: &DashboardError,
) -> String {
    error_page(subject, &all_subjects(subject_count), target, &err.to_string())
}

/// Run one cycle against the remote recording of `subject`.
pub async fn run_cycle(
    client: &DataClient,
    config: &Config,
    subject: SubjectId,
) -> Result<Dashboard, DashboardError> {
    let recording = load_remote(client, config, subject).await?;
    Dashboard::build(subject, &recording, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::chart::count_text;
    use crate::data::Condition;

    const SAMPLE: &str = "\
,HR,RMSSD,Condition
0,72.0,0.041,R
1,71.0,0.043,R
2,80.0,0.030,N
3,81.0,0.031,N
4,82.0,0.029,N
5,95.0,0.021,T
6,90.0,0.025,I
7,91.0,0.024,I
";

    fn config() -> Config {
        Config {
            chart_width: 800,
            chart_height: 400,
            ..Config::default()
        }
    }

    fn subject() -> SubjectId {
        SubjectId::new(4, 25).unwrap()
    }

    #[test]
    fn test_build_segments_once_for_both_charts() {
        let recording = parse_recording_str(Source::Inline, SAMPLE).unwrap();
        let dashboard = Dashboard::build(subject(), &recording, &config()).unwrap();

        let starts: Vec<usize> = dashboard.segments.iter().map(|s| s.start_index).collect();
        assert_eq!(starts, vec![0, 2, 5, 6]);
        assert_eq!(dashboard.segments[2].label, Condition::TimePressure);
        assert_eq!(dashboard.summary.hr.count, 8);

        for svg in [&dashboard.hr_svg, &dashboard.rmssd_svg] {
            assert_eq!(count_text(svg, "R"), 1);
            assert_eq!(count_text(svg, "N"), 1);
            assert_eq!(count_text(svg, "T"), 1);
            assert_eq!(count_text(svg, "I"), 1);
        }
    }

    #[test]
    fn test_html_page() {
        let recording = parse_recording_str(Source::Inline, SAMPLE).unwrap();
        let dashboard = Dashboard::build(subject(), &recording, &config()).unwrap();
        let html = dashboard.to_html(25, SelectorTarget::Server);

        assert!(html.contains("HR Over Time"));
        assert!(html.contains("RMSSD Over Time"));
        assert!(html.contains("<option value=\"4\" selected>Subject 4</option>"));
        assert_eq!(html.matches("<svg").count(), 2);
        assert!(html.contains("8 records"));
    }

    #[test]
    fn test_json_omits_svg() {
        let recording = parse_recording_str(Source::Inline, SAMPLE).unwrap();
        let dashboard = Dashboard::build(subject(), &recording, &config()).unwrap();
        let json = serde_json::to_value(&dashboard).unwrap();

        assert_eq!(json["subject"], 4);
        assert_eq!(json["segments"][3]["start_index"], 6);
        assert_eq!(json["segments"][3]["label"], "I");
        assert!(json.get("hr_svg").is_none());
    }

    #[test]
    fn test_segment_table() {
        let recording = parse_recording_str(Source::Inline, SAMPLE).unwrap();
        let dashboard = Dashboard::build(subject(), &recording, &config()).unwrap();
        let table = dashboard.segment_table();
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines.len(), 4);
        assert!(lines[0].contains("R (Relax)"));
        assert!(lines[3].trim_start().starts_with("6 - 7"));
    }

    #[test]
    fn test_load_error_message() {
        let err: DashboardError = LoadError::MissingColumn("HR").into();
        assert!(err.is_data_failure());
        assert_eq!(
            err.to_string(),
            "An error occurred while loading the data: Missing column 'HR'"
        );

        let page = error_html(subject(), 25, SelectorTarget::Server, &err);
        assert!(page.contains("An error occurred while loading the data"));
        assert!(!page.contains("<svg"));
    }

    #[test]
    fn test_load_missing_file() {
        let path = std::env::temp_dir().join("hrv-dashboard-no-such-recording.csv");
        let err = load_file(&path).unwrap_err();
        assert!(matches!(err, DashboardError::Fetch(FetchError::Io(_))));
    }
}
