//! Server-side HTML for the dashboard and table views.

use std::fmt::Write;

use crate::domain::entity::Entity;
use crate::domain::page::Page;

const STYLE: &str = r#"
    body { font-family: -apple-system, "Segoe UI", Helvetica, Arial, sans-serif; margin: 0; color: #222; }
    nav { background: #1f2937; padding: 0.75rem 1.5rem; }
    nav a { color: #e5e7eb; margin-right: 1rem; text-decoration: none; }
    nav a:hover { color: #fff; }
    main { padding: 1.5rem; }
    table { border-collapse: collapse; font-size: 0.85rem; }
    th, td { border: 1px solid #d1d5db; padding: 0.3rem 0.6rem; text-align: left; white-space: nowrap; }
    th { background: #f3f4f6; }
    td.null { color: #9ca3af; }
    .pager { margin: 1rem 0; }
    .pager a, .pager span { margin-right: 1rem; }
    .scroll { overflow-x: auto; }
"#;

pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

fn layout(title: &str, body: &str) -> String {
    let mut nav = String::from(r#"<a href="/">Dashboard</a>"#);
    for entity in Entity::ALL {
        let _ = write!(nav, r#"<a href="/{}">{}</a>"#, entity.slug(), entity.title());
    }

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title} - Contoso Browser</title>
<style>{style}</style>
</head>
<body>
<nav>{nav}</nav>
<main>
<h1>{title}</h1>
{body}
</main>
</body>
</html>
"#,
        title = escape_html(title),
        style = STYLE,
        nav = nav,
        body = body
    )
}

/// Root view: entity name to row count
pub fn dashboard(counts: &[(Entity, i64)]) -> String {
    let mut body = String::from("<table>\n<tr><th>Table</th><th>Records</th></tr>\n");
    for (entity, count) in counts {
        let _ = writeln!(
            body,
            r#"<tr><td><a href="/{slug}">{slug}</a></td><td class="count">{count}</td></tr>"#,
            slug = entity.slug(),
            count = count
        );
    }
    body.push_str("</table>");
    layout("Dashboard", &body)
}

fn pager(entity: Entity, page: &Page) -> String {
    let mut out = String::from(r#"<div class="pager">"#);
    if page.has_previous() {
        let _ = write!(
            out,
            r#"<a href="/{}?page={}">&laquo; Previous</a>"#,
            entity.slug(),
            page.page.min(page.total_pages + 1) - 1
        );
    }
    let _ = write!(
        out,
        "<span>Page {} of {} ({} records)</span>",
        page.page, page.total_pages, page.total
    );
    if page.has_next() {
        let _ = write!(
            out,
            r#"<a href="/{}?page={}">Next &raquo;</a>"#,
            entity.slug(),
            page.page + 1
        );
    }
    out.push_str("</div>");
    out
}

/// One entity view: row window plus paging figures
pub fn table_page(entity: Entity, page: &Page) -> String {
    let mut body = pager(entity, page);
    body.push_str("<div class=\"scroll\"><table>\n<tr>");
    for column in &page.columns {
        let _ = write!(body, "<th>{}</th>", escape_html(column));
    }
    body.push_str("</tr>\n");

    if page.rows.is_empty() {
        let _ = writeln!(
            body,
            r#"<tr><td colspan="{}">No records on this page.</td></tr>"#,
            page.columns.len().max(1)
        );
    }
    for row in &page.rows {
        body.push_str("<tr>");
        for cell in row {
            if cell.is_null() {
                body.push_str(r#"<td class="null"></td>"#);
            } else {
                let _ = write!(body, "<td>{}</td>", escape_html(&cell.to_string()));
            }
        }
        body.push_str("</tr>\n");
    }
    body.push_str("</table></div>\n");
    body.push_str(&pager(entity, page));

    layout(entity.title(), &body)
}

pub fn not_found(path: &str) -> String {
    layout(
        "Not Found",
        &format!("<p>No page at <code>{}</code>.</p>", escape_html(path)),
    )
}

pub fn server_error() -> String {
    layout(
        "Error",
        "<p>The data could not be loaded. Check the server log for details.</p>",
    )
}
