//! Time-range selection and backend query construction.

use chrono::{Months, NaiveDate, Utc};

use crate::error::FetchError;

/// Path of the meteor endpoint, relative to the API base URL.
pub const METEORS_PATH: &str = "/api/meteors";

/// Wire format of custom date bounds.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Time window requested from the backend.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TimeRange {
    /// Recent events, refreshed every poll interval.
    #[default]
    Realtime,
    Last24Hours,
    Last7Days,
    Last30Days,
    /// User-supplied start and end dates.
    Custom,
}

impl TimeRange {
    pub const ALL: [TimeRange; 5] = [
        TimeRange::Realtime,
        TimeRange::Last24Hours,
        TimeRange::Last7Days,
        TimeRange::Last30Days,
        TimeRange::Custom,
    ];

    /// Value of the `time_range` query parameter.
    pub fn wire_value(&self) -> &'static str {
        match self {
            TimeRange::Realtime => "realtime",
            TimeRange::Last24Hours => "24h",
            TimeRange::Last7Days => "7d",
            TimeRange::Last30Days => "30d",
            TimeRange::Custom => "custom",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TimeRange::Realtime => "Realtime",
            TimeRange::Last24Hours => "Last 24 hours",
            TimeRange::Last7Days => "Last 7 days",
            TimeRange::Last30Days => "Last 30 days",
            TimeRange::Custom => "Custom range",
        }
    }

    pub fn is_realtime(&self) -> bool {
        matches!(self, TimeRange::Realtime)
    }
}

/// Validated custom date bounds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Validate optional bounds against `today`.
    ///
    /// Both bounds are required. Bounds after `today` are pulled back to
    /// `today`, and an end before the start is clamped to the start.
    pub fn validate(
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
        today: NaiveDate,
    ) -> Result<Self, FetchError> {
        let (Some(start), Some(end)) = (start, end) else {
            return Err(FetchError::Validation(
                "Please select both a start and an end date".to_string(),
            ));
        };

        let start = start.min(today);
        let end = end.min(today).max(start);
        Ok(Self { start, end })
    }
}

/// Text of the custom date inputs, as typed by the user.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CustomRangeInput {
    pub start: String,
    pub end: String,
}

impl CustomRangeInput {
    /// One month ago through today.
    pub fn default_for(today: NaiveDate) -> Self {
        let start = today.checked_sub_months(Months::new(1)).unwrap_or(today);
        Self {
            start: start.format(DATE_FORMAT).to_string(),
            end: today.format(DATE_FORMAT).to_string(),
        }
    }

    /// Parse and validate both inputs.
    pub fn resolve(&self, today: NaiveDate) -> Result<DateRange, FetchError> {
        let start = parse_date_field(&self.start, "start")?;
        let end = parse_date_field(&self.end, "end")?;
        DateRange::validate(start, end, today)
    }
}

/// Empty input is a missing bound; anything else must be `YYYY-MM-DD`.
fn parse_date_field(text: &str, field: &str) -> Result<Option<NaiveDate>, FetchError> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(text, DATE_FORMAT)
        .map(Some)
        .map_err(|_| FetchError::Validation(format!("Invalid {field} date \"{text}\" (expected YYYY-MM-DD)")))
}

/// A fully specified backend query.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MeteorQuery {
    pub range: TimeRange,
    /// Present exactly when `range` is `Custom`.
    pub dates: Option<DateRange>,
}

impl MeteorQuery {
    /// Build the query for the current controls.
    ///
    /// Custom ranges are validated here, before anything touches the network.
    pub fn from_controls(
        range: TimeRange,
        custom: &CustomRangeInput,
        today: NaiveDate,
    ) -> Result<Self, FetchError> {
        let dates = match range {
            TimeRange::Custom => Some(custom.resolve(today)?),
            _ => None,
        };
        Ok(Self { range, dates })
    }

    /// Request URL under `base` (no trailing slash needed).
    pub fn url(&self, base: &str) -> String {
        let mut url = format!(
            "{}{}?time_range={}",
            base.trim_end_matches('/'),
            METEORS_PATH,
            self.range.wire_value()
        );
        if let Some(dates) = self.dates {
            url.push_str(&format!(
                "&start_date={}&end_date={}",
                dates.start.format(DATE_FORMAT),
                dates.end.format(DATE_FORMAT)
            ));
        }
        url
    }
}

/// Today's date in UTC.
pub fn today_utc() -> NaiveDate {
    Utc::now().date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, DATE_FORMAT).unwrap()
    }

    #[test]
    fn test_start_after_end_clamps_end() {
        let range =
            DateRange::validate(Some(date("2024-03-10")), Some(date("2024-03-01")), date("2024-06-01")).unwrap();
        assert_eq!(range.start, date("2024-03-10"));
        assert_eq!(range.end, date("2024-03-10"));
    }

    #[test]
    fn test_ordered_bounds_pass_through() {
        let range =
            DateRange::validate(Some(date("2024-03-01")), Some(date("2024-03-10")), date("2024-06-01")).unwrap();
        assert_eq!(range.start, date("2024-03-01"));
        assert_eq!(range.end, date("2024-03-10"));

        let same =
            DateRange::validate(Some(date("2024-03-05")), Some(date("2024-03-05")), date("2024-06-01")).unwrap();
        assert_eq!(same.start, same.end);
    }

    #[test]
    fn test_missing_bound_is_rejected() {
        let today = date("2024-06-01");
        assert!(matches!(
            DateRange::validate(None, Some(today), today),
            Err(FetchError::Validation(_))
        ));
        assert!(matches!(
            DateRange::validate(Some(today), None, today),
            Err(FetchError::Validation(_))
        ));
    }

    #[test]
    fn test_future_bounds_clamp_to_today() {
        let today = date("2024-06-01");
        let range = DateRange::validate(Some(date("2024-07-01")), Some(date("2024-08-01")), today).unwrap();
        assert_eq!(range.start, today);
        assert_eq!(range.end, today);
    }

    #[test]
    fn test_default_input_is_one_month() {
        let input = CustomRangeInput::default_for(date("2024-03-31"));
        assert_eq!(input.start, "2024-02-29");
        assert_eq!(input.end, "2024-03-31");
    }

    #[test]
    fn test_blank_input_is_missing() {
        let input = CustomRangeInput {
            start: "   ".to_string(),
            end: "2024-01-02".to_string(),
        };
        let err = input.resolve(date("2024-06-01")).unwrap_err();
        assert_eq!(
            err,
            FetchError::Validation("Please select both a start and an end date".to_string())
        );
    }

    #[test]
    fn test_garbage_input_names_field() {
        let input = CustomRangeInput {
            start: "2024-01-01".to_string(),
            end: "yesterday".to_string(),
        };
        let err = input.resolve(date("2024-06-01")).unwrap_err();
        assert!(err.user_message().contains("end date"));
    }

    #[test]
    fn test_preset_url() {
        let query = MeteorQuery::from_controls(
            TimeRange::Last7Days,
            &CustomRangeInput::default_for(date("2024-06-01")),
            date("2024-06-01"),
        )
        .unwrap();
        assert_eq!(query.dates, None);
        assert_eq!(query.url(""), "/api/meteors?time_range=7d");
        assert_eq!(
            query.url("http://localhost:8080/"),
            "http://localhost:8080/api/meteors?time_range=7d"
        );
    }

    #[test]
    fn test_custom_url() {
        let input = CustomRangeInput {
            start: "2024-05-01".to_string(),
            end: "2024-05-20".to_string(),
        };
        let query = MeteorQuery::from_controls(TimeRange::Custom, &input, date("2024-06-01")).unwrap();
        assert_eq!(
            query.url(""),
            "/api/meteors?time_range=custom&start_date=2024-05-01&end_date=2024-05-20"
        );
    }

    #[test]
    fn test_custom_ignored_for_presets() {
        let input = CustomRangeInput {
            start: String::new(),
            end: String::new(),
        };
        assert!(MeteorQuery::from_controls(TimeRange::Realtime, &input, date("2024-06-01")).is_ok());
        assert!(MeteorQuery::from_controls(TimeRange::Custom, &input, date("2024-06-01")).is_err());
    }

    #[test]
    fn test_wire_values_unique() {
        let mut values: Vec<&str> = TimeRange::ALL.iter().map(|r| r.wire_value()).collect();
        values.sort();
        values.dedup();
        assert_eq!(values.len(), TimeRange::ALL.len());
    }
}
