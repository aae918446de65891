use crate::spreadsheet::reference::index_to_reference;
use crate::spreadsheet::SheetError;
use chrono::Duration;
use chrono::NaiveDate;
use chrono::NaiveDateTime;
use chrono::NaiveTime;
use serde_json::{Number, Value};

/// Kinds of cell data found in a worksheet.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub(crate) enum CellType {
    #[default]
    Empty,
    Boolean,
    Number,
    /// Serial number with a date/time format, 1900 date system
    DateTime1900,
    /// Serial number with a date/time format, 1904 date system
    DateTime1904,
    /// ISO 8601 text (`t="d"`)
    IsoDateTime,
    /// Inline, formula or shared string (shared strings are resolved on read)
    String,
    Error,
}

impl CellType {
    fn date_time(is_1904: bool) -> Self {
        if is_1904 {
            Self::DateTime1904
        } else {
            Self::DateTime1900
        }
    }

    /// Built-in number format ids that render as dates or times.
    pub(crate) fn parse_builtin_number_format_id(id: &str, is_1904: bool) -> Option<Self> {
        match id {
            "14" | "15" | "16" | "17" | "18" | "19" | "20" | "21" | "22" | "45" | "46" | "47" => {
                Some(Self::date_time(is_1904))
            }
            _ => None,
        }
    }

    /// Scans a custom format code for date/time tokens outside literals,
    /// escapes and bracketed sections (colors, conditions).
    pub(crate) fn parse_custom_number_format(format: &str, is_1904: bool) -> Self {
        let mut is_escaped = false;
        let mut is_literal = false;
        let mut is_bracket = false;
        let mut is_date_or_time = false;
        for character in format.chars() {
            match character {
                _ if is_escaped => is_escaped = false,
                '_' | '\\' => is_escaped = true,

                '"' if is_literal => is_literal = false,
                '"' if !is_bracket => is_literal = true,

                ']' if is_bracket => is_bracket = false,
                '[' if !is_literal => is_bracket = true,
                _ if is_literal || is_bracket => (),

                'Y' | 'y' | 'D' | 'd' | 'H' | 'h' | 'S' | 's' => is_date_or_time = true,
                _ => (),
            }
        }

        if is_date_or_time {
            Self::date_time(is_1904)
        } else {
            Self::Number
        }
    }
}

/// A single non-empty cell.
#[derive(Clone, Debug, PartialEq)]
pub struct Cell {
    /// Row index (0-based)
    pub(crate) row: usize,
    /// Column index (0-based)
    pub(crate) col: usize,
    pub(crate) kind: CellType,
    /// Raw stored value; shared strings already resolved to their text
    pub(crate) value: String,
}

impl Cell {
    /// Excel-style reference, e.g. "B2".
    pub fn reference(&self) -> String {
        index_to_reference(self.row, self.col)
    }

    pub fn is_empty(&self) -> bool {
        self.kind == CellType::Empty || self.value.is_empty()
    }

    /// Converts the cell into the JSON value written to the fixture.
    ///
    /// Dates and times have no JSON form and become their string rendering.
    pub fn to_json(&self) -> Result<Value, SheetError> {
        let value = match self.kind {
            CellType::Empty => Value::Null,
            CellType::Boolean => Value::Bool(self.value == "1" || self.value.eq_ignore_ascii_case("true")),
            CellType::Number => self.to_number()?,
            CellType::DateTime1900 | CellType::DateTime1904 => {
                let serial = self.to_double()?;
                let is_1904 = self.kind == CellType::DateTime1904;
                Value::String(serial_to_string(serial, is_1904).ok_or_else(|| self.invalid("date"))?)
            }
            CellType::IsoDateTime => Value::String(iso_to_string(&self.value)),
            CellType::String | CellType::Error => Value::String(self.value.to_owned()),
        };
        Ok(value)
    }

    fn to_double(&self) -> Result<f64, SheetError> {
        self.value.trim().parse::<f64>().map_err(|_| self.invalid("number"))
    }

    /// Integral literals stay integers, everything else becomes a float.
    fn to_number(&self) -> Result<Value, SheetError> {
        let literal = self.value.trim();
        if !literal.contains(['.', 'e', 'E']) {
            if let Ok(integer) = literal.parse::<i64>() {
                return Ok(Value::Number(integer.into()));
            }
        }
        let double = self.to_double()?;
        Number::from_f64(double)
            .map(Value::Number)
            .ok_or_else(|| self.invalid("number"))
    }

    fn invalid(&self, expected: &'static str) -> SheetError {
        SheetError::InvalidCellValue(self.reference(), self.value.to_owned(), expected)
    }
}

/// Renders a serial date/time number.
///
/// Values in `[0, 1)` carry no date part and render as a time of day;
/// everything else renders as a full date-time. The fraction is rounded to
/// milliseconds.
pub(crate) fn serial_to_string(serial: f64, is_1904: bool) -> Option<String> {
    if !serial.is_finite() {
        return None;
    }
    let mut days = serial.floor() as i64;
    let millis = ((serial - serial.floor()) * 86_400_000f64).round() as i64;
    let offset = Duration::try_milliseconds(millis)?;

    if (0.0..1.0).contains(&serial) && millis < 86_400_000 {
        let time = NaiveTime::from_hms_opt(0, 0, 0)? + offset;
        return Some(format_time(time));
    }

    let epoch = if is_1904 {
        NaiveDate::from_ymd_opt(1904, 1, 1)?
    } else {
        // Lotus 1-2-3 leap year bug: serial 60 is the nonexistent 1900-02-29
        if serial > 0.0 && serial < 60.0 {
            days += 1;
        }
        NaiveDate::from_ymd_opt(1899, 12, 30)?
    };
    let datetime = epoch
        .and_hms_opt(0, 0, 0)?
        .checked_add_signed(Duration::try_days(days)?)?
        .checked_add_signed(offset)?;
    Some(format_datetime(datetime))
}

fn iso_to_string(value: &str) -> String {
    let value = value.trim();
    if let Ok(datetime) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        format_datetime(datetime)
    } else if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        format!("{} 00:00:00", date.format("%Y-%m-%d"))
    } else {
        value.replace('T', " ")
    }
}

fn format_datetime(datetime: NaiveDateTime) -> String {
    format!("{} {}", datetime.format("%Y-%m-%d"), format_time(datetime.time()))
}

fn format_time(time: NaiveTime) -> String {
    if time.format("%f").to_string().trim_start_matches('0').is_empty() {
        time.format("%H:%M:%S").to_string()
    } else {
        time.format("%H:%M:%S%.6f").to_string()
    }
}
