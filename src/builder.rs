use chrono::{Datelike, NaiveDate, Weekday};
use std::collections::BTreeSet;
use std::path::PathBuf;
use tracing::info;

use crate::error::Result;
use crate::models::{
    period::Period,
    style::StyleName,
    table::{Cell, Row},
};

pub const DEFAULT_COMPANY: &str = "Emlid Tech Kft.";
pub const COLUMNS: [&str; 5] = [
    "",
    "Kezdés\nStart time",
    "Vége\nEnd time",
    "Ledolgozott óra\nWork hours",
    "Aláírás\nSignature",
];
pub const START_TIME: &str = "9:00";
pub const END_TIME: &str = "18:00";
pub const WORK_HOURS: u32 = 8;

pub const PUBLIC_HOLIDAY_LABEL: &str = "Public Holiday";
pub const VACATION_LABEL: &str = "Vacation";

pub const WORKDAYS_TOTAL_NAME: &str = "Ledolgozott napok száma\nWorkdays total";
pub const WORK_HOURS_TOTAL_NAME: &str = "Ledolgozott órák száma\nWork hours total";
pub const PUBLIC_HOLIDAYS_NAME: &str = "Ünnepnapok száma\nPublic holidays";
pub const VACATION_DAYS_NAME: &str = "Szabadnapok száma\nVacation days";

/// How a single day of the period is marked on the sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayStatus {
    Weekend,
    PublicHoliday,
    Vacation,
    Workday,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SheetTotals {
    pub work_days: u32,
    pub work_hours: u32,
    pub public_holidays: usize,
    pub vacation_days: usize,
}

/// A finished sheet: header, one body row per day of the period, footer.
#[derive(Debug, Clone, PartialEq)]
pub struct AttendanceDocument {
    pub title: String,
    pub employee: String,
    pub period: Period,
    pub header: Vec<Row>,
    pub body: Vec<Row>,
    pub footer: Vec<Row>,
    pub totals: SheetTotals,
}

impl AttendanceDocument {
    /// All rows in emission order.
    pub fn rows(&self) -> impl Iterator<Item = &Row> {
        self.header.iter().chain(&self.body).chain(&self.footer)
    }
}

#[derive(Debug, Clone)]
pub struct AttendanceSheetBuilder {
    company: String,
    employee: String,
    period: Period,
    public_holidays: BTreeSet<NaiveDate>,
    vacation_days: BTreeSet<NaiveDate>,
    signature: Option<PathBuf>,
}

impl AttendanceSheetBuilder {
    /// Starts a sheet for `employee` covering the current month.
    pub fn new(employee: impl Into<String>) -> Self {
        let employee = employee.into();
        let period = Period::current();
        info!("Creating attendance sheet builder for {} ({})", employee, period);

        Self {
            company: DEFAULT_COMPANY.to_string(),
            employee,
            period,
            public_holidays: BTreeSet::new(),
            vacation_days: BTreeSet::new(),
            signature: None,
        }
    }

    /// Selects the period; `None` keeps the current month.
    pub fn period(mut self, period: Option<Period>) -> Self {
        if let Some(period) = period {
            self.period = period;
        }
        self
    }

    /// Selects an explicit month, rejecting months outside 1-12.
    pub fn month(self, year: i32, month: u32) -> Result<Self> {
        let period = Period::new(year, month)?;
        Ok(self.period(Some(period)))
    }

    pub fn public_holidays(mut self, dates: impl IntoIterator<Item = NaiveDate>) -> Self {
        self.public_holidays.extend(dates);
        self
    }

    pub fn vacation_days(mut self, dates: impl IntoIterator<Item = NaiveDate>) -> Self {
        self.vacation_days.extend(dates);
        self
    }

    pub fn signature(mut self, path: Option<PathBuf>) -> Self {
        self.signature = path;
        self
    }

    pub fn with_company(mut self, company: impl Into<String>) -> Self {
        self.company = company.into();
        self
    }

    pub fn selected_period(&self) -> Period {
        self.period
    }

    /// Public holidays are checked before vacation days.
    pub fn classify(&self, date: NaiveDate) -> DayStatus {
        if matches!(date.weekday(), Weekday::Sat | Weekday::Sun) {
            DayStatus::Weekend
        } else if self.public_holidays.contains(&date) {
            DayStatus::PublicHoliday
        } else if self.vacation_days.contains(&date) {
            DayStatus::Vacation
        } else {
            DayStatus::Workday
        }
    }

    pub fn generate(&self) -> AttendanceDocument {
        let title = format!(
            "{} Jelenléti ív - {}",
            self.company,
            self.period.title_label()
        );

        let header = self.create_header(&title);
        let (body, work_days) = self.create_body();
        let totals = SheetTotals {
            work_days,
            work_hours: work_days * WORK_HOURS,
            public_holidays: self.public_holidays.len(),
            vacation_days: self.vacation_days.len(),
        };
        let footer = create_footer(&totals);

        info!(
            "Generated attendance sheet for {} ({}): {} body rows, {} work days",
            self.employee,
            self.period,
            body.len(),
            totals.work_days
        );

        AttendanceDocument {
            title,
            employee: self.employee.clone(),
            period: self.period,
            header,
            body,
            footer,
            totals,
        }
    }

    fn create_header(&self, title: &str) -> Vec<Row> {
        let columns = COLUMNS
            .iter()
            .fold(Row::new(StyleName::Holiday), |row, label| {
                row.cell(Cell::centered(*label))
            });

        vec![
            Row::new(StyleName::Holiday).cell(Cell::centered(title).spanning(COLUMNS.len())),
            Row::new(StyleName::Holiday)
                .cell(Cell::centered(self.employee.as_str()).spanning(COLUMNS.len())),
            columns,
        ]
    }

    fn create_body(&self) -> (Vec<Row>, u32) {
        let mut work_days = 0;
        let mut rows = Vec::with_capacity(self.period.days_in_month() as usize);

        for date in self.period.days() {
            let status = match self.classify(date) {
                DayStatus::Weekend => {
                    rows.push(
                        COLUMNS
                            .iter()
                            .fold(Row::new(StyleName::Holiday), |row, _| row.cell(Cell::empty())),
                    );
                    continue;
                }
                DayStatus::PublicHoliday => PUBLIC_HOLIDAY_LABEL.to_string(),
                DayStatus::Vacation => VACATION_LABEL.to_string(),
                DayStatus::Workday => {
                    work_days += 1;
                    WORK_HOURS.to_string()
                }
            };

            let signature = match &self.signature {
                Some(path) => Cell::image(path.clone()),
                None => Cell::empty(),
            };

            rows.push(
                Row::new(StyleName::Normal)
                    .cell(Cell::centered(date.day().to_string()))
                    .cell(Cell::centered(START_TIME))
                    .cell(Cell::centered(END_TIME))
                    .cell(Cell::centered(status))
                    .cell(signature),
            );
        }

        (rows, work_days)
    }
}

fn create_footer(totals: &SheetTotals) -> Vec<Row> {
    let span = COLUMNS.len() - 1;
    [
        (WORKDAYS_TOTAL_NAME, totals.work_days.to_string()),
        (WORK_HOURS_TOTAL_NAME, totals.work_hours.to_string()),
        (PUBLIC_HOLIDAYS_NAME, totals.public_holidays.to_string()),
        (VACATION_DAYS_NAME, totals.vacation_days.to_string()),
    ]
    .into_iter()
    .map(|(label, value)| {
        Row::new(StyleName::Normal)
            .cell(Cell::centered(label))
            .cell(Cell::centered(value).spanning(span))
    })
    .collect()
}
