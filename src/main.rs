mod github;
mod model;
mod report;
mod utils;

use crate::github::ContributionFetcher;
use crate::report::CsvReport;
use crate::utils::{MultiProgressNew, ProgressStyleTemplate};
use clap::Parser;
use indicatif::{MultiProgress, ProgressBar};
use model::{ContributionTotals, DateRange, Member, MemberTotals, ReportMode, Result};

#[derive(Parser, Debug, Clone)]
struct Args {
    /// Access token for the GitHub API
    token: String,
    /// Start date (YYYY-MM-DD), counted from midnight UTC
    since: String,
    /// End date (YYYY-MM-DD), counted through 23:59:59 UTC
    until: String,
    /// CSV exported from the organization People page
    members_path: String,
    /// Destination path of the report
    output_path: String,
    /// Break contributions down by category (needs elevated org access)
    #[arg(long)]
    detailed: bool,
    /// Hide progress bars
    #[arg(long)]
    quiet: bool,
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    if let Err(error) = run(&args).await {
        log::error!("{error}");
        std::process::exit(1);
    }
}

async fn run(args: &Args) -> Result<()> {
    let mode = if args.detailed {
        ReportMode::Detailed
    } else {
        ReportMode::Summary
    };
    let range = DateRange::from_args(&args.since, &args.until)?;

    let members = members_load(args)?;
    let fetched = members_fetch(args, &members, &range, mode).await?;
    report_write(args, &fetched, mode)
}

fn members_load(args: &Args) -> Result<Vec<Member>> {
    let multi_progress = MultiProgress::quiet(args.quiet);
    let pb = multi_progress.add_with_style(
        ProgressBar::no_length(),
        ProgressStyleTemplate::only_message(),
    );
    pb.set_message(format!("Read file `{}` ...", args.members_path));
    let members = Member::from_csv(&args.members_path)?;
    pb.finish_with_message(format!(
        "✅ Completed parsing file `{}` (find {} members)",
        args.members_path,
        members.len()
    ));
    Ok(members)
}

async fn members_fetch(
    args: &Args,
    members: &[Member],
    range: &DateRange,
    mode: ReportMode,
) -> Result<MemberTotals> {
    let client = github::client();
    let multi_progress = MultiProgress::quiet(args.quiet);
    let members_pb = multi_progress.add_with_style(
        ProgressBar::new(members.len() as u64),
        ProgressStyleTemplate::counter_bar(),
    );
    members_pb.set_message("Fetching...");
    let window_pb = multi_progress.add_with_style(
        ProgressBar::new_spinner(),
        ProgressStyleTemplate::only_message(),
    );
    window_pb.set_message("Waiting GitHub");

    let mut fetched: MemberTotals = Vec::with_capacity(members.len());
    for member in members {
        members_pb.set_message(member.login.clone());
        let progress_pb = window_pb.clone();
        let login = member.login.clone();
        let progress = move |window: usize, windows: usize| {
            progress_pb.set_message(format!(
                "Fetch contributions of `{}` ({}/{} windows) ...",
                login, window, windows
            ));
        };
        let totals = member
            .fetch_contributions(&client, &args.token, range, mode, Box::new(progress))
            .await?;
        totals_log(member, &totals, mode);
        fetched.push((member.clone(), totals));
        members_pb.inc(1);
    }
    window_pb.finish_and_clear();
    members_pb.finish_with_message(format!(
        "✅ Completed fetch contributions ({} members)",
        fetched.len()
    ));
    Ok(fetched)
}

fn report_write(args: &Args, fetched: &MemberTotals, mode: ReportMode) -> Result<()> {
    let multi_progress = MultiProgress::quiet(args.quiet);
    let pb = multi_progress.add_with_style(
        ProgressBar::no_length(),
        ProgressStyleTemplate::only_message(),
    );
    pb.set_message(format!("Write report `{}` ...", args.output_path));
    fetched.report_create(mode, &args.output_path)?;
    pb.finish_with_message(format!(
        "✅ Completed report `{}` ({} rows)",
        args.output_path,
        fetched.len()
    ));
    Ok(())
}

fn totals_log(member: &Member, totals: &ContributionTotals, mode: ReportMode) {
    let who = if member.email.is_empty() {
        &member.login
    } else {
        &member.email
    };
    match mode {
        ReportMode::Summary => {
            log::info!("total contributions by {} = {}", who, totals.total);
        }
        ReportMode::Detailed => {
            log::info!(
                "contributions by {}: total {}, commits {}, issues {}, pull requests {}, reviews {}, repositories {}, restricted {}",
                who,
                totals.total,
                totals.commits,
                totals.issues,
                totals.pull_requests,
                totals.pull_request_reviews,
                totals.repositories,
                totals.restricted,
            );
            if totals.is_empty() {
                log::warn!(
                    "all contributions are zero for {}; privacy settings or the date range may hide activity",
                    who
                );
            }
        }
    }
}
