use chrono::NaiveDate;
use std::path::PathBuf;
use tracing::info;

use attendance_sheet::{helpers::pdf, AttendanceSheetBuilder};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let holiday = NaiveDate::from_ymd_opt(2024, 10, 23).ok_or_else(|| anyhow::anyhow!("bad date"))?;
    let signature = std::env::args().nth(1).map(PathBuf::from);

    let document = AttendanceSheetBuilder::new("Jane Doe")
        .month(2024, 10)?
        .public_holidays([holiday])
        .signature(signature)
        .generate();

    info!(
        "Work days: {}, work hours: {}",
        document.totals.work_days, document.totals.work_hours
    );

    pdf::write_to(&document, "test.pdf")?;
    Ok(())
}
