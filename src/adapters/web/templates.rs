//! HTML templates using Askama.

use askama::Template;

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub default_symbol: String,
    pub default_start: String,
    pub default_end: String,
    pub default_window: u32,
    pub default_multiplier: u32,
}

impl IndexTemplate {
    pub fn fragment(&self) -> String {
        let mut html = String::from("<div id=\"content\"><h1>Bollinger Bands</h1>");
        html.push_str(
            "<form hx-post=\"/chart\" hx-target=\"#report\" hx-swap=\"innerHTML\" \
             hx-indicator=\"#spinner\">",
        );
        html.push_str(&format!(
            "<label>Symbol <input type=\"text\" name=\"symbol\" value=\"{}\"></label>",
            self.default_symbol
        ));
        html.push_str(
            "<label>Market <select name=\"market\">\
             <option value=\"us\">US</option>\
             <option value=\"tw\">TW (.TW)</option>\
             </select></label>",
        );
        html.push_str(&format!(
            "<label>Start <input type=\"date\" name=\"start_date\" value=\"{}\"></label>",
            self.default_start
        ));
        html.push_str(&format!(
            "<label>End <input type=\"date\" name=\"end_date\" value=\"{}\"></label>",
            self.default_end
        ));
        html.push_str(&format!(
            "<label>Window <input type=\"range\" name=\"window\" min=\"5\" max=\"60\" \
             step=\"1\" value=\"{w}\" \
             oninput=\"this.nextElementSibling.value = this.value\"><output>{w}</output></label>",
            w = self.default_window
        ));
        html.push_str(&format!(
            "<label>Multiplier <input type=\"range\" name=\"multiplier\" min=\"1\" max=\"3\" \
             step=\"1\" value=\"{m}\" \
             oninput=\"this.nextElementSibling.value = this.value\"><output>{m}</output></label>",
            m = self.default_multiplier
        ));
        html.push_str("<button type=\"submit\">Query</button>");
        html.push_str("<span id=\"spinner\" class=\"htmx-indicator\">Fetching data&hellip;</span>");
        html.push_str("</form>");
        html.push_str("<div id=\"report\"></div>");
        html.push_str("</div>");
        html
    }
}

/// One preformatted row of the tail preview table.
pub struct TailRow {
    pub date: String,
    pub open: String,
    pub high: String,
    pub low: String,
    pub close: String,
    pub volume: i64,
}

/// Preformatted last-row summary values.
pub struct LatestView {
    pub date: String,
    pub close: String,
    pub upper: String,
    pub ma: String,
    pub lower: String,
}

#[derive(Template)]
#[template(path = "report.html")]
pub struct ReportTemplate<'a> {
    pub symbol: &'a str,
    pub row_count: usize,
    pub window: u32,
    pub multiplier: u32,
    pub tail: &'a [TailRow],
    pub chart_svg: &'a str,
    pub latest: Option<LatestView>,
}

impl<'a> ReportTemplate<'a> {
    pub fn fragment(&self) -> String {
        let mut html = String::from("<div id=\"report-content\">");

        html.push_str(&format!(
            "<h1>{} &mdash; Bollinger Bands ({}, {})</h1>",
            self.symbol, self.window, self.multiplier
        ));
        html.push_str(&format!("<p class=\"row-count\">{} rows</p>", self.row_count));

        html.push_str("<table class=\"tail\">");
        html.push_str(
            "<tr><th>Date</th><th>Open</th><th>High</th><th>Low</th>\
             <th>Close</th><th>Volume</th></tr>",
        );
        for row in self.tail {
            html.push_str(&format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
                row.date, row.open, row.high, row.low, row.close, row.volume
            ));
        }
        html.push_str("</table>");

        html.push_str(&format!("<div class=\"chart\">{}</div>", self.chart_svg));

        match &self.latest {
            Some(l) => {
                html.push_str(&format!("<h2>Last trading day: {}</h2>", l.date));
                html.push_str(&format!("<p><strong>Close</strong>: {}</p>", l.close));
                html.push_str(&format!("<p><strong>Upper band</strong>: {}</p>", l.upper));
                html.push_str(&format!("<p><strong>Middle band (MA)</strong>: {}</p>", l.ma));
                html.push_str(&format!("<p><strong>Lower band</strong>: {}</p>", l.lower));
            }
            None => {
                html.push_str(
                    "<p class=\"note\">Not enough history to fill the indicator window; \
                     band values are unavailable for the latest day.</p>",
                );
            }
        }

        html.push_str("</div>");
        html
    }
}

#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate<'a> {
    pub message: &'a str,
    pub status: u16,
}

impl<'a> ErrorTemplate<'a> {
    pub fn fragment(&self) -> String {
        format!(
            "<div id=\"error\" class=\"error\"><h1>Error {}</h1><p>{}</p></div>",
            self.status, self.message
        )
    }
}
