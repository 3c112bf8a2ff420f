use clap::Args;
use serde::Serialize;

use crate::calendar::{self, FederalState, Holiday};
use crate::cli::utils::output_data;
use crate::cli::OutputFormat;
use crate::config;

#[derive(Args)]
pub struct HolidaysArgs {
    #[arg(help = "Calendar year")]
    pub year: i32,

    #[arg(long, help = "Federal state code or name (default: REPORT_DEFAULT_STATE)")]
    pub state: Option<FederalState>,
}

#[derive(Args)]
pub struct WorkdaysArgs {
    #[arg(help = "Calendar year")]
    pub year: i32,

    #[arg(long, help = "Single month 1-12; all months when omitted")]
    pub month: Option<u32>,

    #[arg(long, help = "Federal state code or name (default: REPORT_DEFAULT_STATE)")]
    pub state: Option<FederalState>,
}

#[derive(Debug, Serialize)]
struct MonthCount {
    month: u32,
    name: &'static str,
    working_days: u32,
}

pub fn holidays(args: HolidaysArgs, output_format: OutputFormat) -> anyhow::Result<()> {
    let state = args.state.unwrap_or(config::config().report.default_state);
    let list: Vec<Holiday> = calendar::holidays(args.year, state)?;

    output_data(output_format, &list, |list| {
        println!("Holidays {} in {} ({})", args.year, state.name(), state.code());
        for holiday in list {
            println!(
                "{}  {}  {}",
                holiday.date.format("%d.%m.%Y"),
                calendar::weekday_abbrev(holiday.date),
                holiday.name
            );
        }
    })
}

pub fn workdays(args: WorkdaysArgs, output_format: OutputFormat) -> anyhow::Result<()> {
    let state = args.state.unwrap_or(config::config().report.default_state);
    let months: Vec<u32> = match args.month {
        Some(month) => vec![month],
        None => (1..=12).collect(),
    };

    let counts = months
        .into_iter()
        .map(|month| {
            Ok(MonthCount {
                month,
                name: calendar::month_name(month)?,
                working_days: calendar::working_days(args.year, month, state)?,
            })
        })
        .collect::<Result<Vec<_>, calendar::CalendarError>>()?;

    output_data(output_format, &counts, |counts| {
        println!("Working days {} in {} ({})", args.year, state.name(), state.code());
        for count in counts {
            println!("{:>2} {:<10} {:>3}", count.month, count.name, count.working_days);
        }
        if counts.len() > 1 {
            let total: u32 = counts.iter().map(|c| c.working_days).sum();
            println!("   {:<10} {:>3}", "Gesamt", total);
        }
    })
}
