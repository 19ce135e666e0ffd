//! Server-rendered HTML pages.

use crate::{AppState, error_message};
use axum::{extract::State, response::Html};
use tracing::instrument;
use whisker_core::{DashboardData, format_percentage};

/// Number of records plotted on the monitoring dashboard.
const DASHBOARD_WINDOW: i64 = 100;

const STYLE: &str = r#"
body { font-family: system-ui, sans-serif; max-width: 960px; margin: 2rem auto; color: #222; }
nav a { margin-right: 1rem; }
.warning { background: #fff3cd; border: 1px solid #ffe08a; padding: .75rem; border-radius: 4px; }
.error { background: #f8d7da; border: 1px solid #f1aeb5; padding: .75rem; border-radius: 4px; }
.kpis { display: flex; gap: 1rem; }
.kpi { flex: 1; border: 1px solid #ddd; border-radius: 4px; padding: 1rem; text-align: center; }
.kpi strong { display: block; font-size: 1.6rem; }
table { border-collapse: collapse; }
td, th { border: 1px solid #ddd; padding: .4rem .8rem; text-align: left; }
"#;

/// Escape text for inclusion in HTML.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn layout(title: &str, body: &str) -> Html<String> {
    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title} | Cats vs Dogs</title>
<style>{STYLE}</style>
</head>
<body>
<nav><a href="/">Home</a><a href="/inference">Inference</a><a href="/monitoring">Monitoring</a><a href="/info">Model info</a></nav>
<h1>{title}</h1>
{body}
</body>
</html>"#,
        title = escape_html(title),
    ))
}

fn model_warning(loaded: bool) -> &'static str {
    if loaded {
        ""
    } else {
        r#"<p class="warning">The model is not loaded. Predictions are unavailable.</p>"#
    }
}

/// Landing page.
pub async fn index(State(state): State<AppState>) -> Html<String> {
    let body = format!(
        r#"{warning}
<p>Upload a photo and the classifier tells you whether it shows a cat or a dog.</p>
<p><a href="/inference">Try it</a> or browse the <a href="/monitoring">monitoring dashboard</a>.</p>"#,
        warning = model_warning(state.predictor().is_loaded()),
    );
    layout("Cats vs Dogs Classifier", &body)
}

/// Model information page.
pub async fn info(State(state): State<AppState>) -> Html<String> {
    let loaded = state.predictor().is_loaded();
    let metadata = state.predictor().metadata();
    let yes_no = |flag: bool| if flag { "yes" } else { "no" };

    let body = format!(
        r#"{warning}
<table>
<tr><th>Name</th><td>{name}</td></tr>
<tr><th>Version</th><td>{version}</td></tr>
<tr><th>Description</th><td>CNN classifier for cat and dog photos</td></tr>
<tr><th>Parameters</th><td>{parameters}</td></tr>
<tr><th>Classes</th><td>{classes}</td></tr>
<tr><th>Input size</th><td>{input_size}</td></tr>
<tr><th>Model loaded</th><td>{loaded}</td></tr>
<tr><th>Prometheus</th><td>{prometheus}</td></tr>
<tr><th>Discord alerts</th><td>{discord}</td></tr>
</table>"#,
        warning = model_warning(loaded),
        name = escape_html(&metadata.name),
        version = escape_html(state.config().version()),
        parameters = if loaded { metadata.parameters } else { 0 },
        classes = escape_html(&metadata.classes.join(", ")),
        input_size = metadata.input_size_label(),
        loaded = yes_no(loaded),
        prometheus = yes_no(state.metrics().is_enabled()),
        discord = yes_no(state.alerts().is_enabled()),
    );
    layout("Model information", &body)
}

const INFERENCE_SCRIPT: &str = r#"
const form = document.getElementById('predict-form');
const result = document.getElementById('result');
const feedback = document.getElementById('feedback-form');
form.addEventListener('submit', async (event) => {
  event.preventDefault();
  const data = new FormData(form);
  const token = data.get('token');
  data.delete('token');
  const response = await fetch('/api/predict', {
    method: 'POST',
    headers: { 'Authorization': 'Bearer ' + token },
    body: data,
  });
  const body = await response.json();
  if (!response.ok) {
    result.textContent = 'Error: ' + body.detail;
    feedback.hidden = true;
    return;
  }
  result.textContent = body.prediction + ' (' + body.confidence + ') in ' + body.inference_time_ms + ' ms';
  feedback.elements.feedback_id.value = body.feedback_id;
  feedback.hidden = !data.get('rgpd_consent');
});
feedback.addEventListener('submit', async (event) => {
  event.preventDefault();
  const response = await fetch('/api/update-feedback', {
    method: 'POST',
    body: new URLSearchParams(new FormData(feedback)),
  });
  feedback.hidden = response.ok;
  if (!response.ok) {
    const body = await response.json();
    result.textContent += ' | feedback rejected: ' + body.detail;
  }
});
"#;

/// Interactive upload page.
pub async fn inference(State(state): State<AppState>) -> Html<String> {
    let body = format!(
        r#"{warning}
<form id="predict-form">
<p><label>API token <input type="password" name="token" required></label></p>
<p><input type="file" name="file" accept="image/*" required></p>
<p><label><input type="checkbox" name="rgpd_consent" value="true"> I agree that my file name and feedback may be stored</label></p>
<p><button type="submit">Classify</button></p>
</form>
<p id="result"></p>
<form id="feedback-form" hidden>
<input type="hidden" name="feedback_id">
<p>Was this right?
<label><input type="radio" name="user_feedback" value="1"> Yes</label>
<label><input type="radio" name="user_feedback" value="0"> No</label></p>
<p><textarea name="user_comment" placeholder="Comment (optional)"></textarea></p>
<p><button type="submit">Send feedback</button></p>
</form>
<script>{INFERENCE_SCRIPT}</script>"#,
        warning = model_warning(state.predictor().is_loaded()),
    );
    layout("Inference", &body)
}

fn kpi(label: &str, value: &str) -> String {
    format!(
        r#"<div class="kpi"><strong>{}</strong>{}</div>"#,
        escape_html(value),
        escape_html(label)
    )
}

/// JSON for an inline `<script>`, with `</` neutralized.
fn script_json<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string(value)
        .unwrap_or_else(|_| "null".to_string())
        .replace("</", "<\\/")
}

fn render_dashboard(data: &DashboardData, links: Option<(&str, &str)>) -> String {
    let stats = &data.statistics;
    let average = stats
        .average_inference_time_ms
        .map(|ms| format!("{:.0} ms", ms))
        .unwrap_or_else(|| "n/a".to_string());
    let satisfaction = stats
        .satisfaction_rate
        .map(|rate| format_percentage(rate / 100.0))
        .unwrap_or_else(|| "n/a".to_string());

    let links = links
        .map(|(grafana, prometheus)| {
            format!(
                r#"<p><a href="{}">Grafana</a> · <a href="{}">Prometheus</a></p>"#,
                escape_html(grafana),
                escape_html(prometheus)
            )
        })
        .unwrap_or_default();

    format!(
        r#"{links}
<div class="kpis">{total}{success}{average}{satisfaction}</div>
<h2>Inference time</h2>
<div id="inference-chart"></div>
<h2>User satisfaction</h2>
<div id="satisfaction-chart"></div>
<script src="https://cdn.plot.ly/plotly-2.35.2.min.js"></script>
<script>
const inference = {inference};
const satisfaction = {satisfaction_series};
Plotly.newPlot('inference-chart', [{{
  x: inference.map(p => p.timestamp), y: inference.map(p => p.inference_time_ms),
  mode: 'lines+markers', name: 'ms'
}}], {{ yaxis: {{ title: 'ms' }} }});
Plotly.newPlot('satisfaction-chart', [{{
  x: satisfaction.map(p => p.timestamp), y: satisfaction.map(p => p.user_feedback),
  mode: 'markers', name: 'rating'
}}], {{ yaxis: {{ tickvals: [0, 1], ticktext: ['unsatisfied', 'satisfied'] }} }});
</script>"#,
        total = kpi("Predictions", &stats.total_predictions.to_string()),
        success = kpi("Success rate", &format_percentage(stats.success_rate / 100.0)),
        average = kpi("Average inference time", &average),
        satisfaction = kpi("Satisfaction", &satisfaction),
        inference = script_json(&data.inference_series),
        satisfaction_series = script_json(&data.satisfaction_series),
    )
}

/// Monitoring dashboard.
///
/// A failing store is reported inside the page rather than as an error status.
#[instrument(skip_all)]
pub async fn monitoring(State(state): State<AppState>) -> Html<String> {
    let store = state.store();
    let loaded = async {
        let statistics = store.statistics().await?;
        let recent = store.recent_predictions(DASHBOARD_WINDOW).await?;
        Ok::<_, whisker_error::WhiskerError>(DashboardData::new(statistics, &recent))
    }
    .await;

    let body = match loaded {
        Ok(data) => {
            let config = state.config();
            let links = state
                .metrics()
                .is_enabled()
                .then(|| (config.grafana_url().as_str(), config.prometheus_url().as_str()));
            render_dashboard(&data, links)
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to load dashboard data");
            format!(
                r#"<p class="error">Failed to load monitoring data: {}</p>"#,
                escape_html(&error_message(&e))
            )
        }
    };
    layout("Monitoring", &body)
}
