use crate::model::Member;

pub type MemberTotals = Vec<(Member, ContributionTotals)>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportMode {
    Summary,
    Detailed,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContributionTotals {
    pub total: u64,
    pub commits: u64,
    pub issues: u64,
    pub pull_requests: u64,
    pub pull_request_reviews: u64,
    pub repositories: u64,
    pub restricted: u64,
}

// Create
impl ContributionTotals {
    pub fn summary(total: u64) -> Self {
        Self {
            total,
            ..Self::default()
        }
    }

    pub fn detailed(
        commits: u64,
        issues: u64,
        pull_requests: u64,
        pull_request_reviews: u64,
        repositories: u64,
        restricted: u64,
    ) -> Self {
        // The total column is the sum of the categories, not a separate count.
        Self {
            total: commits
                + issues
                + pull_requests
                + pull_request_reviews
                + repositories
                + restricted,
            commits,
            issues,
            pull_requests,
            pull_request_reviews,
            repositories,
            restricted,
        }
    }
}

// Aggregate
impl ContributionTotals {
    pub fn merge(self, other: Self) -> Self {
        Self {
            total: self.total + other.total,
            commits: self.commits + other.commits,
            issues: self.issues + other.issues,
            pull_requests: self.pull_requests + other.pull_requests,
            pull_request_reviews: self.pull_request_reviews + other.pull_request_reviews,
            repositories: self.repositories + other.repositories,
            restricted: self.restricted + other.restricted,
        }
    }

    pub fn category_sum(&self) -> u64 {
        self.commits
            + self.issues
            + self.pull_requests
            + self.pull_request_reviews
            + self.repositories
            + self.restricted
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0 && self.category_sum() == 0
    }
}
