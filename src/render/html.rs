//! HTML page for the dashboard.

use crate::core::summary::format_stat;
use crate::core::Summary;
use crate::subject::SubjectId;

pub const PAGE_TITLE: &str = "Heart Rate Variability (HRV) Analysis";

pub const INTRO: &str = "This project provides an interactive tool to analyze Heart Rate \
Variability (HRV) by visualizing HR and RMSSD trends over time, helping users understand \
stress, recovery, and cardiovascular health through condition-based insights.";

pub const SELECT_PROMPT: &str = "Select a subject to visualize the HR and RMSSD trends over time.";

pub const HR_EXPLANATION: &str = "HR (Heart Rate): The number of heart beats per minute (bpm); \
a higher HR typically indicates increased stress, while a lower HR suggests better relaxation \
or recovery for this experiment.";

pub const RMSSD_EXPLANATION: &str = "RMSSD (Root Mean Square of Successive Differences): A \
measure of heart rate variability (HRV); a higher RMSSD is generally better, indicating \
relaxation and recovery, while a lower RMSSD may indicate stress or poor recovery.";

const STYLE: &str = "body{font-family:sans-serif;max-width:1260px;margin:2em auto;padding:0 1em;color:#222}\
table{border-collapse:collapse}th,td{padding:4px 12px;text-align:right;border-bottom:1px solid #ddd}\
th:first-child,td:first-child{text-align:left}figure{margin:0}figure svg{max-width:100%;height:auto}\
.error{background:#fdecea;color:#611a15;border:1px solid #f5c6cb;padding:1em;border-radius:4px}\
footer{margin-top:2em;color:#777;font-size:0.85em}";

/// How the subject selector navigates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectorTarget {
    /// Submit `?subject=<n>` to the dashboard server
    Server,
    /// Link to sibling `subject_<n>.html` files
    StaticFiles,
}

/// Content of a dashboard page.
pub struct PageContent<'a> {
    pub summary: &'a Summary,
    pub hr_svg: &'a str,
    pub rmssd_svg: &'a str,
    pub footer: String,
}

/// Escape text for inclusion in HTML.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// File name of a statically rendered page.
pub fn static_page_name(subject: SubjectId) -> String {
    format!("subject_{}.html", subject.get())
}

fn selector(current: SubjectId, subjects: &[SubjectId], target: SelectorTarget) -> String {
    let options: String = subjects
        .iter()
        .map(|s| {
            let value = match target {
                SelectorTarget::Server => s.get().to_string(),
                SelectorTarget::StaticFiles => static_page_name(*s),
            };
            let selected = if *s == current { " selected" } else { "" };
            format!("<option value=\"{value}\"{selected}>{}</option>", s.name())
        })
        .collect();

    match target {
        SelectorTarget::Server => format!(
            "<form method=\"get\" action=\"/\">\
<label for=\"subject\">Select a subject</label> \
<select id=\"subject\" name=\"subject\" onchange=\"this.form.submit()\">{options}</select> \
<noscript><button type=\"submit\">Show</button></noscript></form>"
        ),
        SelectorTarget::StaticFiles => format!(
            "<p><label for=\"subject\">Select a subject</label> \
<select id=\"subject\" onchange=\"window.location.href=this.value\">{options}</select></p>"
        ),
    }
}

fn header(current: SubjectId, subjects: &[SubjectId], target: SelectorTarget) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
<title>{PAGE_TITLE} - {}</title>\n<style>{STYLE}</style>\n</head>\n<body>\n\
<h1>{PAGE_TITLE}</h1>\n<p>{INTRO}</p>\n<p>{SELECT_PROMPT}</p>\n{}\n",
        current.name(),
        selector(current, subjects, target)
    )
}

fn summary_table(summary: &Summary) -> String {
    let rows: String = summary
        .hr
        .rows()
        .iter()
        .zip(summary.rmssd.rows().iter())
        .map(|((name, hr), (_, rmssd))| {
            format!(
                "<tr><td>{name}</td><td>{}</td><td>{}</td></tr>",
                format_stat(*hr),
                format_stat(*rmssd)
            )
        })
        .collect();

    format!("<table>\n<thead><tr><th></th><th>HR</th><th>RMSSD</th></tr></thead>\n<tbody>{rows}</tbody>\n</table>")
}

/// Full dashboard page.
pub fn dashboard_page(
    current: SubjectId,
    subjects: &[SubjectId],
    target: SelectorTarget,
    content: &PageContent<'_>,
) -> String {
    let mut page = header(current, subjects, target);
    page.push_str("<h2>Data Summary</h2>\n");
    page.push_str(&summary_table(content.summary));
    page.push_str("\n<h2>HR Over Time</h2>\n<figure>");
    page.push_str(content.hr_svg);
    page.push_str("</figure>\n<h2>RMSSD Over Time</h2>\n<figure>");
    page.push_str(content.rmssd_svg);
    page.push_str("</figure>\n");
    page.push_str(&format!("<p>{HR_EXPLANATION}</p>\n<p>{RMSSD_EXPLANATION}</p>\n"));
    page.push_str(&format!(
        "<footer>{}</footer>\n</body>\n</html>\n",
        escape_html(&content.footer)
    ));
    page
}

/// Page shown when a recording could not be retrieved or parsed.
pub fn error_page(
    current: SubjectId,
    subjects: &[SubjectId],
    target: SelectorTarget,
    message: &str,
) -> String {
    let mut page = header(current, subjects, target);
    page.push_str(&format!(
        "<div class=\"error\">{}</div>\n</body>\n</html>\n",
        escape_html(message)
    ));
    page
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::describe;
    use crate::subject::all_subjects;

    fn summary() -> Summary {
        Summary {
            hr: describe(&[70.0, 80.0]),
            rmssd: describe(&[0.04, 0.02]),
        }
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html("<a href=\"x\">Tom & 'Jerry'</a>"),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#39;Jerry&#39;&lt;/a&gt;"
        );
    }

    #[test]
    fn test_dashboard_page_contents() {
        let subjects = all_subjects(25);
        let summary = summary();
        let content = PageContent {
            summary: &summary,
            hr_svg: "<svg id=\"hr\"></svg>",
            rmssd_svg: "<svg id=\"rmssd\"></svg>",
            footer: "Source: inline".to_string(),
        };
        let page = dashboard_page(subjects[2], &subjects, SelectorTarget::Server, &content);

        assert!(page.contains(PAGE_TITLE));
        assert!(page.contains("<option value=\"3\" selected>Subject 3</option>"));
        assert!(page.contains("<option value=\"25\">Subject 25</option>"));
        assert!(page.contains("Data Summary"));
        assert!(page.contains("<td>mean</td><td>75.000000</td><td>0.030000</td>"));
        assert!(page.contains("<svg id=\"hr\"></svg>"));
        assert!(page.contains("<svg id=\"rmssd\"></svg>"));
        assert!(page.contains("RMSSD (Root Mean Square"));
    }

    #[test]
    fn test_static_selector_links_pages() {
        let subjects = all_subjects(3);
        let summary = summary();
        let content = PageContent {
            summary: &summary,
            hr_svg: "",
            rmssd_svg: "",
            footer: String::new(),
        };
        let page = dashboard_page(subjects[0], &subjects, SelectorTarget::StaticFiles, &content);
        assert!(page.contains("<option value=\"subject_2.html\">Subject 2</option>"));
        assert!(!page.contains("<form"));
    }

    #[test]
    fn test_error_page_has_no_charts() {
        let subjects = all_subjects(25);
        let page = error_page(
            subjects[0],
            &subjects,
            SelectorTarget::Server,
            "An error occurred while loading the data: Missing column 'HR'",
        );
        assert!(page.contains("class=\"error\""));
        assert!(page.contains("Missing column &#39;HR&#39;"));
        assert!(!page.contains("<svg"));
        assert!(!page.contains("Data Summary"));
    }
}
