//! Status summary over the current record set

use crate::model::{CrawlStatus, Record};
use std::collections::HashMap;

/// Aggregate counts across a record set
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusSummary {
    /// Total number of records
    pub total: usize,

    /// Count of records per status
    pub by_status: HashMap<CrawlStatus, usize>,

    /// Sum of broken links over every record
    pub broken_links: u64,

    /// Records whose page contains a login form
    pub login_forms: usize,
}

impl StatusSummary {
    pub fn from_records(records: &[Record]) -> Self {
        let mut summary = Self {
            total: records.len(),
            ..Self::default()
        };

        for record in records {
            *summary.by_status.entry(record.status).or_insert(0) += 1;
            summary.broken_links += record.broken_link_count();
            if record.has_login_form {
                summary.login_forms += 1;
            }
        }

        summary
    }

    pub fn count(&self, status: CrawlStatus) -> usize {
        self.by_status.get(&status).copied().unwrap_or(0)
    }

    /// Records still queued or running
    pub fn active(&self) -> usize {
        self.by_status
            .iter()
            .filter(|(status, _)| status.is_active())
            .map(|(_, count)| count)
            .sum()
    }

    /// Share of records that finished successfully, in percent
    pub fn done_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.count(CrawlStatus::Done) as f64 / self.total as f64 * 100.0
        }
    }
}

/// Formats a summary for the terminal
pub fn format_summary(summary: &StatusSummary) -> String {
    let mut out = String::new();

    out.push_str("=== Crawl Summary ===\n\n");
    out.push_str(&format!("  Total URLs: {}\n", summary.total));
    out.push_str(&format!("  Active jobs: {}\n", summary.active()));
    out.push_str(&format!("  Broken links: {}\n", summary.broken_links));
    out.push_str(&format!("  Login forms: {}\n\n", summary.login_forms));

    out.push_str("By Status:\n");
    let mut statuses: Vec<CrawlStatus> = CrawlStatus::known_states().to_vec();
    if summary.count(CrawlStatus::Unknown) > 0 {
        statuses.push(CrawlStatus::Unknown);
    }
    for status in statuses {
        out.push_str(&format!("  {:<8} {}\n", status.as_str(), summary.count(status)));
    }

    out.push_str(&format!(
        "\nDone: {:.1}% ({} / {})\n",
        summary.done_rate(),
        summary.count(CrawlStatus::Done),
        summary.total
    ));
    out
}

pub fn print_summary(summary: &StatusSummary) {
    print!("{}", format_summary(summary));
}
