//! Server-side HTML for the Interaction Surface.
//!
//! Everything user- or model-supplied goes through `html_escape`; line breaks survive via
//! `white-space: pre-wrap`.

use chrono::Local;

use crate::category::ContentCategory;
use crate::surface::Surface;

pub const BRAND_PRIMARY: &str = "#3B82F6";
pub const BRAND_ERROR: &str = "#EF4444";

pub const LABEL_SUBMIT: &str = "生成内容";
pub const LABEL_SUBMITTING: &str = "生成中...";

/// Full page for one surface. `notice` is a transient message that does not belong to the
/// surface state (e.g. a rejected concurrent submission).
pub fn render_page(surface: &Surface, notice: Option<&str>) -> String {
    let mut body = String::new();
    body.push_str(&render_form(surface));

    if let Some(n) = notice {
        body.push_str(&render_error(n, None));
    }
    if let Some(err) = surface.error() {
        body.push_str(&render_error(&err.message, err.details.as_deref()));
    }
    if let Some(result) = surface.result() {
        body.push_str(&format!(
            r#"<section class="result"><h2>生成结果</h2><div class="panel pre">{}</div></section>"#,
            html_escape(result)
        ));
    }
    body.push_str(&render_history(surface));

    format!(
        r#"<!DOCTYPE html>
<html lang="zh-CN">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>AI 内容生成器</title>
<style>
body {{ font-family: system-ui, sans-serif; background: #F9FAFB; margin: 0; padding: 2rem 1rem; }}
main {{ max-width: 56rem; margin: 0 auto; background: #fff; border-radius: .75rem; padding: 1.5rem; box-shadow: 0 4px 12px rgba(0,0,0,.08); }}
label {{ display: block; font-weight: 700; font-size: .875rem; margin-bottom: .5rem; }}
select, textarea {{ width: 100%; box-sizing: border-box; padding: .5rem; border: 1px solid #D1D5DB; border-radius: .5rem; margin-bottom: 1.5rem; }}
textarea {{ min-height: 120px; resize: vertical; }}
button {{ width: 100%; padding: .75rem; background: {primary}; color: #fff; border: 0; border-radius: .5rem; }}
button:disabled {{ opacity: .5; cursor: not-allowed; }}
.error {{ margin-top: 1rem; padding: 1rem; background: #FEF2F2; color: {error}; border-radius: .5rem; }}
.panel {{ padding: 1rem; background: #F9FAFB; border-radius: .5rem; margin-bottom: 1rem; }}
.pre {{ white-space: pre-wrap; }}
.meta {{ display: flex; justify-content: space-between; font-size: .875rem; color: #6B7280; margin-bottom: .5rem; }}
</style>
</head>
<body>
<main>
<h1>AI 内容生成器</h1>
{body}
</main>
<script>
(function () {{
  var p = document.getElementById("prompt"), b = document.getElementById("submit");
  if (!p || !b || b.dataset.busy === "1") return;
  var sync = function () {{ b.disabled = p.value.trim() === ""; }};
  p.addEventListener("input", sync);
  document.getElementById("generate-form").addEventListener("submit", function () {{
    b.disabled = true; b.textContent = "{submitting}";
  }});
}})();
</script>
</body>
</html>"#,
        primary = BRAND_PRIMARY,
        error = BRAND_ERROR,
        body = body,
        submitting = LABEL_SUBMITTING,
    )
}

fn render_form(surface: &Surface) -> String {
    let options: String = ContentCategory::ALL
        .iter()
        .map(|c| {
            format!(
                r#"<option value="{}"{}>{}</option>"#,
                c.tag(),
                if *c == surface.category() { " selected" } else { "" },
                c.label()
            )
        })
        .collect();

    let busy = surface.is_submitting();
    let disabled = if surface.can_submit() { "" } else { " disabled" };
    let label = if busy { LABEL_SUBMITTING } else { LABEL_SUBMIT };

    format!(
        r#"<form id="generate-form" method="post" action="/">
<label for="type">选择内容类型</label>
<select id="type" name="type">{options}</select>
<label for="prompt">输入提示词</label>
<textarea id="prompt" name="prompt" placeholder="请详细描述您需要生成的内容...">{prompt}</textarea>
<button id="submit" type="submit" data-busy="{busy}"{disabled}>{label}</button>
</form>"#,
        options = options,
        prompt = html_escape(surface.prompt()),
        busy = if busy { "1" } else { "0" },
        disabled = disabled,
        label = label,
    )
}

fn render_error(message: &str, details: Option<&str>) -> String {
    match details {
        Some(d) => format!(
            r#"<div class="error">{}<div class="pre"><small>{}</small></div></div>"#,
            html_escape(message),
            html_escape(d)
        ),
        None => format!(r#"<div class="error">{}</div>"#, html_escape(message)),
    }
}

fn render_history(surface: &Surface) -> String {
    let history = surface.history();
    if history.is_empty() {
        return String::new();
    }
    let items: String = history
        .iter()
        .map(|e| {
            format!(
                r#"<div class="panel history-entry"><div class="meta"><span>{}</span><span class="category">{}</span></div><div><strong>提示词：</strong>{}</div><div><strong>结果：</strong><div class="pre">{}</div></div></div>"#,
                e.timestamp.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S"),
                e.category.label(),
                html_escape(&e.prompt),
                html_escape(&e.result)
            )
        })
        .collect();
    format!(r#"<section class="history"><h2>历史记录</h2>{}</section>"#, items)
}

/// Escapes HTML special characters.
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
