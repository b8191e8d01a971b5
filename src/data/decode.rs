//! Decoding of World Bank indicator responses.
//!
//! The provider answers with a two-element array:
//!
//! ```text
//! [ {"page": 1, "pages": 1, "per_page": 50, "total": 4, ...},
//!   [ {"country": {"id": "GB", "value": "United Kingdom"}, "date": "2021", "value": 3.1e12, ...}, ... ] ]
//! ]
//! ```
//!
//! A response with fewer than two elements (the provider's error envelope is a
//! single `{"message": [...]}` object) and a `null` data array both decode to
//! `None`: "no data" rather than a failure.

use serde_json::Value;
use tracing::{debug, warn};

use crate::domain::{DataPoint, PageInfo, Series};
use crate::error::DecodeError;

/// Decode a raw response body into a `Series` sorted by period, newest first.
pub fn decode_series(raw: &str) -> Result<Option<Series>, DecodeError> {
    let root: Value =
        serde_json::from_str(raw).map_err(|e| DecodeError::new("$", format!("invalid JSON: {e}")))?;

    let Value::Array(elements) = root else {
        return Err(DecodeError::new(
            "$",
            format!("expected a top-level array, found {}", kind(&root)),
        ));
    };

    if elements.len() < 2 {
        debug!(len = elements.len(), "short response array, treating as no data");
        return Ok(None);
    }

    let page = page_info(&elements[0]);

    let rows = match &elements[1] {
        Value::Array(rows) => rows,
        Value::Null => {
            debug!("null data array, treating as no data");
            return Ok(None);
        }
        other => {
            return Err(DecodeError::new(
                "$[1]",
                format!("expected the data array, found {}", kind(other)),
            ));
        }
    };

    if let Some(info) = page {
        if info.is_truncated() {
            warn!(
                page = info.page,
                pages = info.pages,
                total = info.total,
                "response is paginated; only the first page was decoded"
            );
        }
    }

    let mut series = Series {
        subject_name: None,
        points: Vec::with_capacity(rows.len()),
        page,
    };

    for (idx, row) in rows.iter().enumerate() {
        let path = format!("$[1][{idx}]");
        let (name, point) = decode_row(row, &path)?;

        if let Some(prev) = series.subject_name.as_deref() {
            if prev != name {
                warn!(previous = prev, current = name, path = %path, "subject name changed within one response");
            }
        }
        series.subject_name = Some(name.to_string());
        series.points.push(point);
    }

    series.points.sort_by(|a, b| b.period.cmp(&a.period));
    Ok(Some(series))
}

fn decode_row<'a>(row: &'a Value, path: &str) -> Result<(&'a str, DataPoint), DecodeError> {
    let Value::Object(obj) = row else {
        return Err(DecodeError::new(path, format!("expected an object, found {}", kind(row))));
    };

    let name = obj
        .get("country")
        .and_then(|c| c.get("value"))
        .ok_or_else(|| DecodeError::new(format!("{path}.country.value"), "missing field"))?;
    let Value::String(name) = name else {
        return Err(DecodeError::new(
            format!("{path}.country.value"),
            format!("expected a string, found {}", kind(name)),
        ));
    };

    let date = obj
        .get("date")
        .ok_or_else(|| DecodeError::new(format!("{path}.date"), "missing field"))?;
    let period = match date {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        other => {
            return Err(DecodeError::new(
                format!("{path}.date"),
                format!("expected a period label, found {}", kind(other)),
            ));
        }
    };
    if period.is_empty() {
        return Err(DecodeError::new(format!("{path}.date"), "empty period label"));
    }

    let raw_value = obj
        .get("value")
        .ok_or_else(|| DecodeError::new(format!("{path}.value"), "missing field"))?;
    let value = parse_value(raw_value).map_err(|message| DecodeError::new(format!("{path}.value"), message))?;

    Ok((name.as_str(), DataPoint { period, value }))
}

fn parse_value(raw: &Value) -> Result<Option<f64>, String> {
    match raw {
        Value::Null => Ok(None),
        Value::Number(n) => n
            .as_f64()
            .map(Some)
            .ok_or_else(|| format!("number {n} is not representable as f64")),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .map(Some)
            .ok_or_else(|| format!("non-numeric value '{s}'")),
        other => Err(format!("expected a number or null, found {}", kind(other))),
    }
}

fn page_info(meta: &Value) -> Option<PageInfo> {
    let field = |key: &str| -> Option<u32> {
        match meta.get(key)? {
            Value::Number(n) => n.as_u64().and_then(|v| u32::try_from(v).ok()),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    };
    Some(PageInfo {
        page: field("page")?,
        pages: field("pages")?,
        per_page: field("per_page")?,
        total: field("total")?,
    })
}

fn kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(country: &str, date: &str, value: Value) -> Value {
        json!({
            "indicator": {"id": "NY.GDP.MKTP.CD", "value": "GDP (current US$)"},
            "country": {"id": "GB", "value": country},
            "countryiso3code": "GBR",
            "date": date,
            "value": value,
            "unit": "",
            "obs_status": "",
            "decimal": 0
        })
    }

    fn response(rows: Vec<Value>) -> String {
        json!([
            {"page": 1, "pages": 1, "per_page": 50, "total": rows.len(), "sourceid": "2"},
            rows
        ])
        .to_string()
    }

    #[test]
    fn sorts_periods_descending() {
        let raw = response(vec![
            row("United Kingdom", "2019", json!(1.0)),
            row("United Kingdom", "2021", json!(3.0)),
            row("United Kingdom", "2020", json!(2.0)),
        ]);
        let series = decode_series(&raw).unwrap().unwrap();
        let periods: Vec<_> = series.points.iter().map(|p| p.period.as_str()).collect();
        assert_eq!(periods, vec!["2021", "2020", "2019"]);
        for pair in series.points.windows(2) {
            assert!(pair[0].period >= pair[1].period);
        }
    }

    #[test]
    fn ordering_is_lexical_not_numeric() {
        let raw = response(vec![
            row("X", "999", json!(1.0)),
            row("X", "1000", json!(2.0)),
        ]);
        let series = decode_series(&raw).unwrap().unwrap();
        assert_eq!(series.points[0].period, "999");
        assert_eq!(series.points[1].period, "1000");
    }

    #[test]
    fn null_value_is_distinct_from_zero() {
        let raw = response(vec![
            row("United Kingdom", "2021", Value::Null),
            row("United Kingdom", "2020", json!(0.0)),
        ]);
        let series = decode_series(&raw).unwrap().unwrap();
        assert_eq!(series.points[0].value, None);
        assert_eq!(series.points[1].value, Some(0.0));
    }

    #[test]
    fn short_arrays_are_no_data() {
        assert_eq!(decode_series("[]").unwrap(), None);
        let provider_error = r#"[{"message":[{"id":"120","key":"Invalid value","value":"The provided parameter value is not valid"}]}]"#;
        assert_eq!(decode_series(provider_error).unwrap(), None);
    }

    #[test]
    fn null_data_array_is_no_data() {
        let raw = r#"[{"page":1,"pages":0,"per_page":50,"total":0},null]"#;
        assert_eq!(decode_series(raw).unwrap(), None);
    }

    #[test]
    fn empty_data_array_yields_empty_series() {
        let series = decode_series(&response(vec![])).unwrap().unwrap();
        assert!(series.is_empty());
        assert_eq!(series.subject_name, None);
    }

    #[test]
    fn numeric_strings_and_numeric_dates_are_accepted() {
        let raw = json!([
            {"page": "1", "pages": "1", "per_page": "50", "total": "2"},
            [
                {"country": {"value": "Japan"}, "date": 2020, "value": "4.5"},
                {"country": {"value": "Japan"}, "date": "2021", "value": 5}
            ]
        ])
        .to_string();
        let series = decode_series(&raw).unwrap().unwrap();
        assert_eq!(series.points[0], DataPoint::new("2021", Some(5.0)));
        assert_eq!(series.points[1], DataPoint::new("2020", Some(4.5)));
        assert_eq!(series.page, Some(PageInfo { page: 1, pages: 1, per_page: 50, total: 2 }));
    }

    #[test]
    fn non_numeric_value_fails_with_path() {
        let raw = response(vec![
            row("United Kingdom", "2021", json!(1.0)),
            row("United Kingdom", "2020", json!("n/a")),
        ]);
        let err = decode_series(&raw).unwrap_err();
        assert_eq!(err.path, "$[1][1].value");
        assert!(err.message.contains("n/a"), "message: {}", err.message);

        for text in ["NaN", "inf", "-infinity"] {
            let raw = response(vec![row("United Kingdom", "2020", json!(text))]);
            let err = decode_series(&raw).unwrap_err();
            assert_eq!(err.path, "$[1][0].value");
            assert!(err.message.contains("non-numeric"), "{text}: {}", err.message);
        }
    }

    #[test]
    fn structural_failures() {
        assert_eq!(decode_series("not json").unwrap_err().path, "$");
        assert_eq!(decode_series(r#"{"page":1}"#).unwrap_err().path, "$");
        assert_eq!(decode_series(r#"[{}, {"a":1}]"#).unwrap_err().path, "$[1]");
        assert_eq!(decode_series(r#"[{}, [1]]"#).unwrap_err().path, "$[1][0]");

        let missing_country = r#"[{}, [{"date":"2020","value":1}]]"#;
        assert_eq!(decode_series(missing_country).unwrap_err().path, "$[1][0].country.value");

        let missing_date = r#"[{}, [{"country":{"value":"X"},"value":1}]]"#;
        assert_eq!(decode_series(missing_date).unwrap_err().path, "$[1][0].date");

        let missing_value = r#"[{}, [{"country":{"value":"X"},"date":"2020"}]]"#;
        assert_eq!(decode_series(missing_value).unwrap_err().path, "$[1][0].value");

        let empty_date = r#"[{}, [{"country":{"value":"X"},"date":"","value":1}]]"#;
        assert_eq!(decode_series(empty_date).unwrap_err().path, "$[1][0].date");
    }

    #[test]
    fn last_subject_name_wins() {
        let raw = response(vec![
            row("United Kingdom", "2021", json!(1.0)),
            row("Great Britain", "2020", json!(2.0)),
        ]);
        let series = decode_series(&raw).unwrap().unwrap();
        assert_eq!(series.subject_name.as_deref(), Some("Great Britain"));
    }

    #[test]
    fn missing_pagination_fields_leave_page_empty() {
        let raw = r#"[{"sourceid":"2"}, [{"country":{"value":"X"},"date":"2020","value":null}]]"#;
        let series = decode_series(raw).unwrap().unwrap();
        assert_eq!(series.page, None);
        assert_eq!(series.points.len(), 1);
    }
}
