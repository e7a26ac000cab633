//! Sunburst web page
//!
//! The chart itself is drawn by Plotly.js in the browser; this module only
//! prepares the trace and the surrounding document.

use serde_json::json;

use crate::application::{ApplicationError, ApplicationResult};
use crate::config::RenderConfig;
use crate::domain::SunburstData;

const ROOT_COLOR: &str = "#1f77b4";
const NODE_COLOR: &str = "#ff7f0e";

/// Plotly trace and layout objects as JSON, safe for an inline script.
pub fn sunburst_figure(data: &SunburstData, render: &RenderConfig) -> ApplicationResult<(String, String)> {
    let colors: Vec<&str> = (0..data.len())
        .map(|i| if i == 0 { ROOT_COLOR } else { NODE_COLOR })
        .collect();

    let trace = json!({
        "type": "sunburst",
        "ids": data.ids,
        "labels": data.labels,
        "parents": data.parents,
        "branchvalues": "total",
        "hovertemplate": "<b>%{label}</b><br>Vorgesetzter: %{parent}<br><extra></extra>",
        "marker": {
            "colors": colors,
            "line": { "color": "white", "width": 1 },
        },
    });
    let layout = json!({
        "title": render.chart_title,
        "showlegend": false,
        "margin": { "b": 20, "l": 5, "r": 5, "t": 40 },
        "height": 800,
        "width": 1000,
    });

    Ok((script_json(&trace)?, script_json(&layout)?))
}

/// Complete HTML document embedding the sunburst chart.
pub fn sunburst_page(data: &SunburstData, render: &RenderConfig) -> ApplicationResult<String> {
    let (trace, layout) = sunburst_figure(data, render)?;
    let title = escape_html(&render.title);
    let plotly_url = escape_html(&render.plotly_url);

    Ok(format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="UTF-8">
    <title>{title}</title>
    <script src="{plotly_url}"></script>
    <style>
        body {{
            margin: 0;
            padding: 20px;
            font-family: Arial, sans-serif;
            background-color: #f5f5f5;
        }}
        .container {{
            max-width: 1200px;
            margin: 0 auto;
            background-color: white;
            padding: 20px;
            border-radius: 8px;
            box-shadow: 0 2px 4px rgba(0,0,0,0.1);
        }}
        h1 {{
            color: #333;
            text-align: center;
            margin-bottom: 30px;
        }}
    </style>
</head>
<body>
    <div class="container">
        <h1>{title}</h1>
        <div id="organigram"></div>
    </div>
    <script>
        Plotly.newPlot("organigram", [{trace}], {layout});
    </script>
</body>
</html>
"#
    ))
}

fn script_json(value: &serde_json::Value) -> ApplicationResult<String> {
    serde_json::to_string(value)
        .map(|s| s.replace("</", "<\\/"))
        .map_err(|e| ApplicationError::OperationFailed {
            context: "serialize sunburst chart".to_string(),
            source: Box::new(e),
        })
}

pub(crate) fn escape_html(s: &str) -> String {
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
