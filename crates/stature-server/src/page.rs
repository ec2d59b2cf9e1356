//! HTML page assembly
//!
//! Pages are plain strings with the SVG charts inlined. Everything that comes
//! from a file (column names, labels, messages) is escaped first.

use stature_core::{DataSource, Report};

use crate::charts::ChartSet;

const STYLE: &str = "body{font-family:sans-serif;max-width:960px;margin:2em auto;color:#222}\
h1{font-size:1.6em}h2{font-size:1.2em;margin-top:1.6em}\
.banner{background:#fdecea;border:1px solid #e45756;padding:.8em 1em;border-radius:4px}\
.note{color:#666;font-size:.9em}\
dl.stats{display:grid;grid-template-columns:max-content auto;gap:.3em 1.5em}\
dl.stats dt{font-weight:bold}dl.stats dd{margin:0}\
figure{margin:1em 0}";

/// Page title
pub const TITLE: &str = "Height Dashboard";

/// What goes below the title
#[derive(Debug)]
pub enum PageBody<'a> {
    /// Nothing loaded yet
    Empty,
    /// A finished analysis
    Results {
        report: &'a Report,
        charts: &'a ChartSet,
    },
    /// A load or analysis failure
    Error(String),
}

/// One rendered page
#[derive(Debug)]
pub struct Page<'a> {
    /// Whether to show the upload form
    pub source: &'a DataSource,
    /// Name of the loaded file, if any
    pub file_name: Option<&'a str>,
    /// Preview image and its row count
    pub preview: Option<(&'a str, usize)>,
    pub body: PageBody<'a>,
}

impl<'a> Page<'a> {
    pub fn new(source: &'a DataSource) -> Self {
        Self {
            source,
            file_name: None,
            preview: None,
            body: PageBody::Empty,
        }
    }

    pub fn render(&self) -> String {
        let mut html = String::with_capacity(16 * 1024);
        html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
        html.push_str(&format!("<title>{}</title>\n<style>{}</style>\n</head>\n<body>\n", TITLE, STYLE));
        html.push_str(&format!("<h1>{}</h1>\n", TITLE));

        match self.source {
            DataSource::Upload => html.push_str(UPLOAD_FORM),
            DataSource::Path(path) => html.push_str(&format!(
                "<p class=\"note\">Reading <code>{}</code></p>\n",
                escape(&path.display().to_string())
            )),
        }

        if let Some((svg, rows)) = self.preview {
            html.push_str("<h2>Loaded data</h2>\n");
            if let Some(name) = self.file_name {
                html.push_str(&format!("<p class=\"note\">{} ({} rows)</p>\n", escape(name), rows));
            }
            html.push_str(&format!("<figure class=\"preview\">{}</figure>\n", svg));
        }

        match &self.body {
            PageBody::Empty => {}
            PageBody::Error(message) => {
                html.push_str(&format!("<div class=\"banner\" role=\"alert\">{}</div>\n", escape(message)));
            }
            PageBody::Results { report, charts } => push_results(&mut html, report, charts),
        }

        html.push_str("</body>\n</html>\n");
        html
    }
}

const UPLOAD_FORM: &str = "<form method=\"post\" action=\"/upload\" enctype=\"multipart/form-data\">\n\
<label>Choose a CSV or Excel file <input type=\"file\" name=\"file\" accept=\".csv,.tsv,.xlsx,.xlsm,.xls,.ods\" required></label>\n\
<button type=\"submit\">Analyze</button>\n\
</form>\n";

fn push_results(html: &mut String, report: &Report, charts: &ChartSet) {
    let s = &report.summary;
    let column = escape(&report.column);

    html.push_str(&format!("<h2>Statistics of \"{}\"</h2>\n<dl class=\"stats\">\n", column));
    let mut rows = vec![
        ("Median", fmt(s.median)),
        ("Mean", fmt(s.mean)),
        ("Minimum", fmt(s.min)),
        ("Maximum", fmt(s.max)),
        ("Mode", fmt(s.mode)),
        ("First quartile", fmt(s.q1)),
        ("Third quartile", fmt(s.q3)),
    ];
    if let Some(sd) = s.std_dev {
        rows.push(("Standard deviation", fmt(sd)));
    }
    rows.push(("Values", s.count.to_string()));
    for (name, value) in rows {
        html.push_str(&format!("<dt>{}</dt><dd>{}</dd>\n", name, value));
    }
    html.push_str("</dl>\n");

    if report.missing > 0 {
        html.push_str(&format!(
            "<p class=\"note\">{} of {} rows have no numeric value.</p>\n",
            report.missing, report.rows
        ));
    }

    html.push_str(&format!(
        "<h2>Histogram</h2>\n<figure class=\"histogram\">{}</figure>\n",
        charts.histogram
    ));
    html.push_str(&format!(
        "<h2>Boxplot</h2>\n<figure class=\"boxplot\">{}</figure>\n",
        charts.boxplot
    ));
    match &charts.pie {
        Some(pie) => html.push_str(&format!(
            "<h2>Height ranges</h2>\n<figure class=\"pie\">{}</figure>\n",
            pie
        )),
        None => html.push_str(
            "<h2>Height ranges</h2>\n<p class=\"note\">No value falls in any height range.</p>\n",
        ),
    }

    if report.unassigned > 0 && charts.pie.is_some() {
        html.push_str(&format!(
            "<p class=\"note\">{} values fall outside every range and are not in the pie chart.</p>\n",
            report.unassigned
        ));
    }
}

/// Four decimals, trailing zeros dropped
fn fmt(value: f64) -> String {
    let text = format!("{:.4}", value);
    if !text.contains('.') {
        return text;
    }
    let text = text.trim_end_matches('0').trim_end_matches('.');
    match text {
        "-0" => "0".to_string(),
        _ => text.to_string(),
    }
}

/// Escape text for HTML content and attributes
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
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

#[cfg(test)]
mod tests {
    use super::*;
    use stature_core::{Dashboard, DashboardConfig};
    use stature_io::MeasurementSeries;

    fn report() -> Report {
        let dashboard = Dashboard::new(&DashboardConfig::default()).unwrap();
        let series = MeasurementSeries::new("Alt", vec![1.62, 1.74, f64::NAN, -1.0]);
        dashboard.analyze_series(series).unwrap().report()
    }

    fn charts() -> ChartSet {
        ChartSet {
            histogram: "<svg id=\"h\"></svg>".to_string(),
            boxplot: "<svg id=\"b\"></svg>".to_string(),
            pie: Some("<svg id=\"p\"></svg>".to_string()),
        }
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape("<150 & \"x\""), "&lt;150 &amp; &quot;x&quot;");
    }

    #[test]
    fn test_upload_form_only_in_upload_mode() {
        let html = Page::new(&DataSource::Upload).render();
        assert!(html.contains("enctype=\"multipart/form-data\""));
        assert!(html.contains(TITLE));

        let fixed = DataSource::Path("alturas.xlsx".into());
        let html = Page::new(&fixed).render();
        assert!(!html.contains("<form"));
        assert!(html.contains("alturas.xlsx"));
    }

    #[test]
    fn test_results_page() {
        let report = report();
        let charts = charts();
        let mut page = Page::new(&DataSource::Upload);
        page.file_name = Some("alturas.csv");
        page.preview = Some(("<svg id=\"t\"></svg>", 4));
        page.body = PageBody::Results {
            report: &report,
            charts: &charts,
        };

        let html = page.render();
        for needle in ["id=\"t\"", "id=\"h\"", "id=\"b\"", "id=\"p\"", "Median", "Mode"] {
            assert!(html.contains(needle), "missing {}", needle);
        }
        assert!(html.contains("<dt>Mean</dt><dd>0.7867</dd>"));
        assert!(html.contains("1 of 4 rows have no numeric value"));
        assert!(html.contains("2 values fall outside every range"));
    }

    #[test]
    fn test_fmt_keeps_small_differences() {
        assert_eq!(fmt(1.625), "1.625");
        assert_eq!(fmt(1.6234), "1.6234");
        assert_eq!(fmt(1.40), "1.4");
        assert_eq!(fmt(2.0), "2");
        assert_eq!(fmt(-0.00001), "0");
        assert_eq!(fmt(-1.5), "-1.5");
    }

    #[test]
    fn test_results_without_any_range() {
        let dashboard = Dashboard::new(&DashboardConfig::default()).unwrap();
        let series = MeasurementSeries::new("Alt", vec![-1.0, -2.0, -3.0]);
        let report = dashboard.analyze_series(series).unwrap().report();
        let mut charts = charts();
        charts.pie = None;

        let mut page = Page::new(&DataSource::Upload);
        page.body = PageBody::Results {
            report: &report,
            charts: &charts,
        };

        let html = page.render();
        assert!(html.contains("<dt>Median</dt><dd>-2</dd>"));
        assert!(html.contains("No value falls in any height range"));
        assert!(!html.contains("class=\"pie\""));
    }

    #[test]
    fn test_error_banner_is_escaped() {
        let mut page = Page::new(&DataSource::Upload);
        page.body = PageBody::Error("Column \"<Alt>\" was not found".to_string());
        let html = page.render();
        assert!(html.contains("class=\"banner\""));
        assert!(html.contains("&lt;Alt&gt;"));
    }
}
