//! HTTP request handlers for the web adapter.

use askama::Template;
use axum::{
    Form,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{Html, IntoResponse, Response},
};
use chrono::NaiveDate;
use std::sync::Arc;
use tracing::{info, warn};

use crate::adapters::svg_chart;
use crate::domain::bollinger::{
    DEFAULT_MULTIPLIER, DEFAULT_WINDOW, MULTIPLIER_RANGE, WINDOW_RANGE, compute_bollinger,
};
use crate::domain::error::BandviewError;
use crate::domain::market::Market;

use super::error::render_error;
use super::templates::{IndexTemplate, LatestView, ReportTemplate, TailRow};
use super::{AppState, WebError, is_htmx_request};

pub async fn index(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    let today = chrono::Utc::now().date_naive();
    let template = IndexTemplate {
        default_symbol: "NVDA".to_string(),
        default_start: (today - chrono::Duration::days(365))
            .format("%Y-%m-%d")
            .to_string(),
        default_end: today.format("%Y-%m-%d").to_string(),
        default_window: state
            .config
            .get_int("chart", "default_window", DEFAULT_WINDOW as i64) as u32,
        default_multiplier: state
            .config
            .get_int("chart", "default_multiplier", DEFAULT_MULTIPLIER as i64)
            as u32,
    };

    if is_htmx_request(&headers) {
        Html(template.fragment()).into_response()
    } else {
        match template.render() {
            Ok(html) => Html(html).into_response(),
            Err(_) => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        }
    }
}

#[derive(Debug, serde::Deserialize)]
pub struct ChartFormData {
    pub symbol: String,
    pub market: String,
    pub start_date: String,
    pub end_date: String,
    pub window: String,
    pub multiplier: String,
}

pub async fn chart(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Form(form): Form<ChartFormData>,
) -> Response {
    let htmx = is_htmx_request(&headers);
    match run_chart(state, form, htmx).await {
        Ok(response) => response,
        Err(err) => {
            warn!(
                status = err.status.as_u16(),
                "chart request failed: {}", err.message
            );
            render_error(&err, &headers)
        }
    }
}

async fn run_chart(
    state: Arc<AppState>,
    form: ChartFormData,
    htmx: bool,
) -> Result<Response, WebError> {
    let symbol = form.symbol.trim();
    if symbol.is_empty() {
        return Err(WebError::bad_request("Symbol is required"));
    }

    let market: Market = form.market.parse().map_err(WebError::bad_request)?;
    let symbol = market.normalize_symbol(symbol);

    let start = NaiveDate::parse_from_str(&form.start_date, "%Y-%m-%d")
        .map_err(|_| WebError::bad_request("Invalid start date format"))?;
    let end = NaiveDate::parse_from_str(&form.end_date, "%Y-%m-%d")
        .map_err(|_| WebError::bad_request("Invalid end date format"))?;

    let window: u32 = form
        .window
        .parse()
        .map_err(|_| WebError::bad_request("Invalid window length"))?;
    if !WINDOW_RANGE.contains(&window) {
        return Err(WebError::bad_request(format!(
            "Window must be between {} and {}",
            WINDOW_RANGE.start(),
            WINDOW_RANGE.end()
        )));
    }

    let multiplier: u32 = form
        .multiplier
        .parse()
        .map_err(|_| WebError::bad_request("Invalid multiplier"))?;
    if !MULTIPLIER_RANGE.contains(&multiplier) {
        return Err(WebError::bad_request(format!(
            "Multiplier must be between {} and {}",
            MULTIPLIER_RANGE.start(),
            MULTIPLIER_RANGE.end()
        )));
    }

    // The provider call blocks on the network; keep it off the async workers.
    let port = Arc::clone(&state.data_port);
    let fetch_symbol = symbol.clone();
    let raw = tokio::task::spawn_blocking(move || port.fetch_daily(&fetch_symbol, start, end))
        .await
        .map_err(|e| WebError::internal(format!("fetch task failed: {e}")))?
        .map_err(WebError::from)?;

    if raw.is_empty() {
        return Err(BandviewError::EmptyDataset { symbol }.into());
    }

    let series = compute_bollinger(&raw, window as usize, f64::from(multiplier))?;
    let chart_svg = svg_chart::render_chart(&series)?;

    info!(
        symbol = %series.symbol,
        rows = series.len(),
        window,
        multiplier,
        "chart rendered"
    );

    let tail: Vec<TailRow> = series
        .tail(5)
        .iter()
        .map(|p| TailRow {
            date: p.bar.date.format("%Y-%m-%d").to_string(),
            open: format!("{:.2}", p.bar.open),
            high: format!("{:.2}", p.bar.high),
            low: format!("{:.2}", p.bar.low),
            close: format!("{:.2}", p.bar.close),
            volume: p.bar.volume,
        })
        .collect();

    let latest = series.latest().map(|l| LatestView {
        date: l.date.format("%Y-%m-%d").to_string(),
        close: format!("{:.2}", l.close),
        upper: format!("{:.2}", l.upper),
        ma: format!("{:.2}", l.ma),
        lower: format!("{:.2}", l.lower),
    });

    let template = ReportTemplate {
        symbol: &series.symbol,
        row_count: series.len(),
        window,
        multiplier,
        tail: &tail,
        chart_svg: &chart_svg,
        latest,
    };

    Ok(if htmx {
        Html(template.fragment()).into_response()
    } else {
        match template.render() {
            Ok(html) => Html(html).into_response(),
            Err(_) => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        }
    })
}

pub async fn not_found(headers: HeaderMap) -> Response {
    render_error(&WebError::not_found("Page not found"), &headers)
}
