use once_cell::sync::Lazy;
use regex::Regex;

use crate::core::error::ExtractError;
use crate::core::model::{DecisionKind, FieldName, Period};
use crate::layout::columns::RawRow;

static PERIOD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(?:Q(?P<q>\d{1,2})|(?P<pre>\d)?OT(?P<post>\d)?)\b").expect("period pattern")
});

static CLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{1,2}:\d{2}(?:\.\d+)?$").expect("clock pattern"));

/// A row that passed the period gate and whose fields parsed cleanly.
/// Team attribution turns it into a `CallRecord`.
#[derive(Debug, Clone, PartialEq)]
pub struct CallDraft {
    pub page: usize,
    pub y0: f32,
    pub period: Period,
    pub clock: String,
    pub call_type: String,
    pub committing_player: String,
    pub disadvantaged_player: String,
    pub decision: Option<DecisionKind>,
}

/// Noise gate: only rows whose period column carries a quarter or
/// overtime marker are data rows.
#[derive(Debug, Clone, Copy, Default)]
pub struct RowFilter;

impl RowFilter {
    pub fn new() -> Self {
        Self
    }

    pub fn period(&self, row: &RawRow) -> Option<Period> {
        parse_period(row.get(FieldName::Period))
    }

    /// `Ok(None)` for header/footer noise, `Err` for a data row whose other
    /// fields are garbled.
    pub fn admit(&self, report_id: &str, row: &RawRow) -> Result<Option<CallDraft>, ExtractError> {
        let Some(period) = self.period(row) else {
            return Ok(None);
        };

        let mismatch = |reason: String| ExtractError::LayoutMismatch {
            report_id: report_id.to_string(),
            page: row.anchor.page,
            y0: row.anchor.y0,
            reason,
        };

        let clock = row.get(FieldName::Clock).trim();
        if !CLOCK.is_match(clock) {
            return Err(mismatch(format!("unreadable clock '{clock}'")));
        }

        let call_type = row.get(FieldName::CallType).trim();
        if call_type.is_empty() {
            return Err(mismatch("empty call type".to_string()));
        }

        let decision_text = row.get(FieldName::Decision).trim();
        let decision = if decision_text.is_empty() {
            None
        } else {
            Some(
                parse_decision(decision_text)
                    .ok_or_else(|| mismatch(format!("unknown decision '{decision_text}'")))?,
            )
        };

        Ok(Some(CallDraft {
            page: row.anchor.page,
            y0: row.anchor.y0,
            period,
            clock: clock.to_string(),
            call_type: call_type.to_string(),
            committing_player: row.get(FieldName::Committing).trim().to_string(),
            disadvantaged_player: row.get(FieldName::Disadvantaged).trim().to_string(),
            decision,
        }))
    }
}

pub fn parse_period(text: &str) -> Option<Period> {
    let caps = PERIOD.captures(text)?;
    if let Some(q) = caps.name("q") {
        let n: u8 = q.as_str().parse().ok()?;
        return match n {
            0 => None,
            1..=4 => Some(Period::Quarter(n)),
            _ => Some(Period::Overtime(n - 4)),
        };
    }
    let n = caps
        .name("pre")
        .or_else(|| caps.name("post"))
        .map(|m| m.as_str().parse::<u8>())
        .transpose()
        .ok()?
        .unwrap_or(1);
    (n > 0).then_some(Period::Overtime(n))
}

pub fn parse_decision(text: &str) -> Option<DecisionKind> {
    let key: String = text
        .chars()
        .filter(|c| c.is_ascii_alphabetic())
        .map(|c| c.to_ascii_uppercase())
        .collect();
    match key.as_str() {
        "CC" | "CORRECTCALL" => Some(DecisionKind::CorrectCall),
        "CNC" | "CORRECTNONCALL" => Some(DecisionKind::CorrectNonCall),
        "IC" | "INCORRECTCALL" => Some(DecisionKind::IncorrectCall),
        "INC" | "INCORRECTNONCALL" => Some(DecisionKind::IncorrectNonCall),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::Anchor;
    use pretty_assertions::assert_eq;

    fn row(fields: &[(FieldName, &str)]) -> RawRow {
        RawRow {
            anchor: Anchor { page: 1, y0: 310.0 },
            fields: fields.iter().map(|(f, t)| (*f, t.to_string())).collect(),
        }
    }

    fn full(period: &str, clock: &str, decision: &str) -> RawRow {
        row(&[
            (FieldName::Period, period),
            (FieldName::Clock, clock),
            (FieldName::CallType, "Foul: Personal"),
            (FieldName::Committing, "Draymond Green"),
            (FieldName::Disadvantaged, "LeBron James"),
            (FieldName::Decision, decision),
        ])
    }

    #[test]
    fn parses_period_markers() {
        assert_eq!(parse_period("Q4"), Some(Period::Quarter(4)));
        assert_eq!(parse_period("Q5"), Some(Period::Overtime(1)));
        assert_eq!(parse_period("OT"), Some(Period::Overtime(1)));
        assert_eq!(parse_period("2OT"), Some(Period::Overtime(2)));
        assert_eq!(parse_period("OT3"), Some(Period::Overtime(3)));
        assert_eq!(parse_period("Q0"), None);
        assert_eq!(parse_period("Total"), None);
        assert_eq!(parse_period("Period"), None);
        assert_eq!(parse_period("OTHER"), None);
        assert_eq!(parse_period(""), None);
    }

    #[test]
    fn total_row_is_noise_whatever_else_it_holds() {
        let noisy = full("Total", "01:00", "CC");
        assert_eq!(RowFilter::new().admit("r", &noisy), Ok(None));
    }

    #[test]
    fn admits_a_data_row() {
        let draft = RowFilter::new()
            .admit("r", &full("Q4", "00:48.9", "INC"))
            .unwrap()
            .unwrap();
        assert_eq!(draft.period, Period::Quarter(4));
        assert_eq!(draft.clock, "00:48.9");
        assert_eq!(draft.decision, Some(DecisionKind::IncorrectNonCall));
        assert_eq!(draft.committing_player, "Draymond Green");
    }

    #[test]
    fn garbled_clock_is_a_layout_mismatch() {
        let err = RowFilter::new().admit("r", &full("Q4", "Foul", "CC")).unwrap_err();
        assert!(matches!(err, ExtractError::LayoutMismatch { page: 1, .. }));
    }

    #[test]
    fn empty_call_type_is_a_layout_mismatch() {
        let mut raw = full("Q4", "0:40", "CC");
        raw.fields.insert(FieldName::CallType, "  ".to_string());
        let err = RowFilter::new().admit("r", &raw).unwrap_err();
        assert_eq!(
            err,
            ExtractError::LayoutMismatch {
                report_id: "r".to_string(),
                page: 1,
                y0: 310.0,
                reason: "empty call type".to_string(),
            }
        );
    }

    #[test]
    fn unknown_decision_text_is_a_layout_mismatch() {
        let err = RowFilter::new().admit("r", &full("Q4", "0:40", "Comment")).unwrap_err();
        let ExtractError::LayoutMismatch { reason, .. } = &err else {
            panic!("expected a layout mismatch, got {err}");
        };
        assert_eq!(reason, "unknown decision 'Comment'");
    }

    #[test]
    fn empty_decision_is_kept_without_decision() {
        let draft = RowFilter::new().admit("r", &full("Q3", "1:02", "")).unwrap().unwrap();
        assert_eq!(draft.decision, None);
    }

    #[test]
    fn parses_spelled_out_decisions() {
        assert_eq!(parse_decision("Correct Non-Call"), Some(DecisionKind::CorrectNonCall));
        assert_eq!(parse_decision("ic"), Some(DecisionKind::IncorrectCall));
        assert_eq!(parse_decision("Comment"), None);
    }
}
