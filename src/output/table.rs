//! Plain-text rendering of the list and detail views

use crate::detail::DetailController;
use crate::model::{CrawlStatus, Record};
use crate::poll::{ListController, LoadState};
use crate::view::{ListView, SortDirection, SortKey};

const TITLE_WIDTH: usize = 28;
const URL_WIDTH: usize = 36;

/// Shortens `text` to `width` characters, marking the cut with `~`
fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(width.saturating_sub(1)).collect();
    cut.push('~');
    cut
}

fn column_label(view: &ListView, key: SortKey, label: &str) -> String {
    let sort = view.sort();
    if sort.key != key {
        return label.to_string();
    }
    match sort.direction {
        SortDirection::Asc => format!("{}^", label),
        SortDirection::Desc => format!("{}v", label),
    }
}

fn format_row(view: &ListView, record: &Record) -> String {
    let mark = if view.selection().contains(&record.id) {
        "[x]"
    } else {
        "[ ]"
    };
    let title = if record.title.is_empty() {
        "-"
    } else {
        record.title.as_str()
    };
    let html = if record.html_version.is_empty() {
        "-"
    } else {
        record.html_version.as_str()
    };

    format!(
        "{} {:>5} {:<8} {:<tw$} {:<uw$} {:<8} {:>5} {:>5} {:>6} {:<5}",
        mark,
        record.id.to_string(),
        record.status.as_str(),
        truncate(title, TITLE_WIDTH),
        truncate(&record.url, URL_WIDTH),
        truncate(html, 8),
        record.internal_links,
        record.external_links,
        record.broken_link_count(),
        if record.has_login_form { "yes" } else { "no" },
        tw = TITLE_WIDTH,
        uw = URL_WIDTH,
    )
}

/// Renders the visible page of the list plus its status lines
pub fn format_list(controller: &ListController) -> String {
    let view = controller.view();
    let mut out = String::new();

    if let Some(notice) = controller.notice() {
        out.push_str(&format!("{}\n", notice));
    }
    if let Some(error) = controller.error() {
        out.push_str(&format!("[error] Failed to load URLs: {} (retry with refresh)\n", error));
    }

    if controller.load_state() == LoadState::Loading && view.records().is_empty() {
        out.push_str("Loading...\n");
        return out;
    }

    out.push_str(&format!(
        "{:<3} {:>5} {:<8} {:<tw$} {:<uw$} {:<8} {:>5} {:>5} {:>6} {:<5}\n",
        "",
        column_label(view, SortKey::Id, "id"),
        column_label(view, SortKey::Status, "status"),
        column_label(view, SortKey::Title, "title"),
        column_label(view, SortKey::Url, "url"),
        column_label(view, SortKey::HtmlVersion, "html"),
        column_label(view, SortKey::InternalLinks, "int"),
        column_label(view, SortKey::ExternalLinks, "ext"),
        column_label(view, SortKey::BrokenLinks, "broken"),
        column_label(view, SortKey::HasLoginForm, "login"),
        tw = TITLE_WIDTH,
        uw = URL_WIDTH,
    ));

    let page = view.visible_page();
    if page.is_empty() {
        out.push_str("  (no matching URLs)\n");
    }
    for record in page {
        out.push_str(&format_row(view, record));
        out.push('\n');
    }

    out.push_str(&format!(
        "Page {}/{} | {} matching of {} | {} selected\n",
        view.page() + 1,
        view.page_count().max(1),
        view.matching_count(),
        view.records().len(),
        view.selection().len(),
    ));
    out
}

/// Renders the detail card for one record
pub fn format_detail(controller: &DetailController) -> String {
    let mut out = String::new();

    if let Some(notice) = controller.notice() {
        out.push_str(&format!("{}\n", notice));
    }
    if let Some(error) = controller.error() {
        out.push_str(&format!(
            "[error] Failed to load URL {}: {} (retry with refresh)\n",
            controller.id(),
            error
        ));
    }

    let Some(record) = controller.record() else {
        if controller.error().is_none() {
            out.push_str("Loading...\n");
        }
        return out;
    };

    out.push_str(&format!("=== URL {} ===\n\n", record.id));
    out.push_str(&format!("  URL: {}\n", record.url));
    out.push_str(&format!("  Status: {}\n", record.status));
    if let Some(created) = record.created_at {
        out.push_str(&format!("  Added: {}\n", created.format("%Y-%m-%d %H:%M:%S UTC")));
    }

    if record.status.is_active() {
        out.push_str("\n  Analysis in progress...\n");
        return out;
    }

    out.push_str(&format!("  Title: {}\n", record.title));
    out.push_str(&format!("  HTML version: {}\n", record.html_version));
    out.push_str(&format!(
        "  Login form: {}\n\n",
        if record.has_login_form { "yes" } else { "no" }
    ));

    out.push_str("Headings:\n");
    let headings = record.heading_counts();
    let line: Vec<String> = headings
        .iter()
        .enumerate()
        .map(|(i, count)| format!("h{}={}", i + 1, count))
        .collect();
    out.push_str(&format!("  {}\n\n", line.join("  ")));

    out.push_str("Links:\n");
    let total = record.total_links();
    let internal_share = if total > 0 {
        f64::from(record.internal_links) / total as f64 * 100.0
    } else {
        0.0
    };
    out.push_str(&format!(
        "  Internal: {} ({:.1}%)\n",
        record.internal_links, internal_share
    ));
    out.push_str(&format!("  External: {}\n", record.external_links));
    out.push_str(&format!("  Broken: {}\n", controller.broken_link_count()));

    if controller.broken_link_count() == 0 {
        return out;
    }

    out.push_str("\nBroken Links:\n");
    if controller.broken_loading() {
        out.push_str("  Loading...\n");
    }
    if let Some(error) = controller.broken_error() {
        out.push_str(&format!("  [error] {}\n", error));
    }
    if let Some(links) = controller.broken_links() {
        for link in links {
            out.push_str(&format!("  {:>11}  {}\n", link.status_label(), link.link));
        }
    }
    out
}

/// Confirmation line for a created record
///
/// The service usually answers with just `{"id": n}`, so the status is only
/// shown when the response actually carried one.
pub fn format_created(record: &Record) -> String {
    match record.status {
        CrawlStatus::Unknown => format!("Created URL {}", record.id),
        status => format!("Created URL {} ({})", record.id, status),
    }
}
