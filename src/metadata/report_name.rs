use chrono::NaiveDate;

use crate::core::error::ExtractError;
use crate::core::model::TeamCode;
use crate::metadata::teams::canonical_team;

/// What a published report name says about its game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportName {
    pub report_id: String,
    pub away: TeamCode,
    pub home: TeamCode,
    /// `None` when the year token is not one of the known shapes.
    pub date: Option<NaiveDate>,
    pub disambiguator: Option<String>,
}

/// Parses names like `L2M-GSW-CLE-06-02-16.pdf` or a URL ending in one.
///
/// Tokens split on `-` or `@`: prefix, away, home, month, day, year, then an
/// optional disambiguator. The year may be written with two, three (year
/// plus a trailing digit) or four digits.
pub fn parse_report_name(name: &str) -> Result<ReportName, ExtractError> {
    let malformed = |reason: &str| ExtractError::MalformedReportName {
        name: name.to_string(),
        reason: reason.to_string(),
    };

    let base = name
        .split(['?', '#'])
        .next()
        .unwrap_or_default()
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim();
    let stem = strip_pdf_suffix(base);
    if stem.is_empty() {
        return Err(malformed("empty file name"));
    }

    let tokens: Vec<&str> = stem.split(['-', '@']).filter(|t| !t.is_empty()).collect();
    if tokens.len() < 6 {
        return Err(malformed("expected prefix, teams, month, day and year"));
    }

    let team = |raw: &str| {
        let ok = (2..=3).contains(&raw.len()) && raw.chars().all(|c| c.is_ascii_alphabetic());
        ok.then(|| canonical_team(raw))
    };
    let away = team(tokens[1]).ok_or_else(|| malformed("bad away team code"))?;
    let home = team(tokens[2]).ok_or_else(|| malformed("bad home team code"))?;
    if away == home {
        return Err(malformed("away and home are the same team"));
    }

    let month: u32 = tokens[3].parse().map_err(|_| malformed("bad month"))?;
    let day: u32 = tokens[4].parse().map_err(|_| malformed("bad day"))?;
    if !(1..=12).contains(&month) || !(1..=31).contains(&day) {
        return Err(malformed("month or day out of range"));
    }

    let (year, year_suffix) = parse_year(tokens[5]);
    let date = match year {
        Some(y) => {
            Some(NaiveDate::from_ymd_opt(y, month, day).ok_or_else(|| malformed("no such date"))?)
        }
        None => None,
    };

    let mut extra: Vec<&str> = year_suffix.into_iter().collect();
    extra.extend(&tokens[6..]);
    let disambiguator = (!extra.is_empty()).then(|| extra.join("-"));

    Ok(ReportName {
        report_id: stem.to_string(),
        away,
        home,
        date,
        disambiguator,
    })
}

fn strip_pdf_suffix(base: &str) -> &str {
    let lower = base.to_ascii_lowercase();
    if lower.ends_with(".pdf") {
        &base[..base.len() - 4]
    } else {
        base
    }
}

/// Year from the year token, plus a trailing disambiguator digit if any.
fn parse_year(token: &str) -> (Option<i32>, Option<&str>) {
    if !token.chars().all(|c| c.is_ascii_digit()) {
        return (None, None);
    }
    let two = match token.len() {
        4 => &token[2..],
        3 => &token[..2],
        2 => token,
        _ => return (None, None),
    };
    let suffix = (token.len() == 3).then(|| &token[2..]);
    (two.parse::<i32>().ok().map(|y| 2000 + y), suffix)
}
