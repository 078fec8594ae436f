use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::builder::AttendanceSheetBuilder;
use crate::error::SheetError;
use crate::models::period::Period;

/// Body accepted by the sheet endpoints.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SheetRequest {
    pub name: String,
    pub month: Option<u32>,
    pub year: Option<i32>,
    #[serde(default)]
    pub public_holidays: Vec<NaiveDate>,
    #[serde(default)]
    pub vacation_days: Vec<NaiveDate>,
    /// `Some(true)` requires the configured signature, `Some(false)` leaves the
    /// column blank, absent signs whenever a signature is configured.
    #[serde(default)]
    pub signed: Option<bool>,
}

impl SheetRequest {
    /// Month and year must come together; neither means the current month.
    pub fn period(&self) -> Result<Option<Period>, SheetError> {
        match (self.year, self.month) {
            (Some(year), Some(month)) => Period::new(year, month).map(Some),
            (None, None) => Ok(None),
            (Some(_), None) => Err(SheetError::InvalidArgument(
                "year given without month".to_string(),
            )),
            (None, Some(_)) => Err(SheetError::InvalidArgument(
                "month given without year".to_string(),
            )),
        }
    }
}

impl TryFrom<SheetRequest> for AttendanceSheetBuilder {
    type Error = SheetError;

    fn try_from(request: SheetRequest) -> Result<Self, Self::Error> {
        if request.name.trim().is_empty() {
            return Err(SheetError::InvalidArgument(
                "employee name must not be empty".to_string(),
            ));
        }

        let period = request.period()?;

        Ok(AttendanceSheetBuilder::new(request.name)
            .period(period)
            .public_holidays(request.public_holidays)
            .vacation_days(request.vacation_days))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> SheetRequest {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn parses_iso_dates_and_defaults() {
        let request = parse(
            r#"{"name": "Jane Doe", "month": 10, "year": 2024, "public_holidays": ["2024-10-23"]}"#,
        );
        assert_eq!(
            request.public_holidays,
            vec![NaiveDate::from_ymd_opt(2024, 10, 23).unwrap()]
        );
        assert!(request.vacation_days.is_empty());
        assert_eq!(request.signed, None);
        assert_eq!(request.period().unwrap(), Some(Period::new(2024, 10).unwrap()));
    }

    #[test]
    fn missing_period_means_current_month() {
        let request = parse(r#"{"name": "Jane Doe", "signed": false}"#);
        assert_eq!(request.period().unwrap(), None);
        assert_eq!(request.signed, Some(false));
    }

    #[test]
    fn partial_period_is_rejected() {
        let request = parse(r#"{"name": "Jane Doe", "month": 10}"#);
        assert!(matches!(
            request.period(),
            Err(SheetError::InvalidArgument(_))
        ));
        let request = parse(r#"{"name": "Jane Doe", "year": 2024}"#);
        assert!(request.period().is_err());
    }

    #[test]
    fn builder_from_request() {
        let request = parse(
            r#"{"name": "Jane Doe", "month": 2, "year": 2024, "vacation_days": ["2024-02-01"]}"#,
        );
        let builder = AttendanceSheetBuilder::try_from(request).unwrap();
        let doc = builder.generate();
        assert_eq!(doc.body.len(), 29);
        assert_eq!(doc.totals.vacation_days, 1);
        assert_eq!(doc.totals.work_days, 20);
    }

    #[test]
    fn blank_name_is_rejected() {
        let request = parse(r#"{"name": "  ", "month": 2, "year": 2024}"#);
        assert!(AttendanceSheetBuilder::try_from(request).is_err());
    }
}
