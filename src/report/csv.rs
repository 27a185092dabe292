use crate::model::{ContributionTotals, Member, MemberTotals, MetricsError, ReportMode, Result};
use std::path::Path;
use tempfile::NamedTempFile;

const SUMMARY_HEADER: [&str; 4] = ["Name", "Username", "Email", "Contribution"];
const DETAILED_HEADER: [&str; 10] = [
    "Name",
    "GitHandle",
    "Email",
    "TotalContributions",
    "CommitContributions",
    "IssueContributions",
    "PullRequestContributions",
    "PullRequestReviewContributions",
    "RepositoryContributions",
    "RestrictedContributions",
];

pub trait CsvReport {
    fn report_create(&self, mode: ReportMode, path: &str) -> Result<()>;
}

impl CsvReport for MemberTotals {
    fn report_create(&self, mode: ReportMode, path: &str) -> Result<()> {
        let destination = Path::new(path);
        let dir = match destination.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        // Rows land in a sibling temp file first; the destination only ever
        // sees a complete report.
        let temp = NamedTempFile::new_in(dir).map_err(|err| MetricsError::write(path, err))?;
        {
            let mut writer = csv::Writer::from_writer(temp.as_file());
            writer
                .write_record(header(mode))
                .map_err(|err| MetricsError::write(path, err))?;
            for (member, totals) in self {
                writer
                    .write_record(record(member, totals, mode))
                    .map_err(|err| MetricsError::write(path, err))?;
            }
            writer.flush().map_err(|err| MetricsError::write(path, err))?;
        }
        temp.persist(destination)
            .map_err(|err| MetricsError::write(path, err.error))?;
        Ok(())
    }
}

fn header(mode: ReportMode) -> &'static [&'static str] {
    match mode {
        ReportMode::Summary => &SUMMARY_HEADER,
        ReportMode::Detailed => &DETAILED_HEADER,
    }
}

fn record(member: &Member, totals: &ContributionTotals, mode: ReportMode) -> Vec<String> {
    let mut record = vec![
        member.name.clone(),
        member.login.clone(),
        member.email.clone(),
        totals.total.to_string(),
    ];
    if mode == ReportMode::Detailed {
        record.extend([
            totals.commits.to_string(),
            totals.issues.to_string(),
            totals.pull_requests.to_string(),
            totals.pull_request_reviews.to_string(),
            totals.repositories.to_string(),
            totals.restricted.to_string(),
        ]);
    }
    record
}
