mod contribution;
mod error;
mod member;
mod range;

pub use contribution::{ContributionTotals, MemberTotals, ReportMode};
pub use error::{MetricsError, Result};
pub use member::Member;
pub use range::{DateRange, Window};
