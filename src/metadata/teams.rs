use crate::core::model::TeamCode;

/// Current franchise codes.
pub const CANONICAL_TEAMS: [&str; 30] = [
    "ATL", "BKN", "BOS", "CHA", "CHI", "CLE", "DAL", "DEN", "DET", "GSW", "HOU", "IND", "LAC",
    "LAL", "MEM", "MIA", "MIL", "MIN", "NOP", "NYK", "OKC", "ORL", "PHI", "PHX", "POR", "SAC",
    "SAS", "TOR", "UTA", "WAS",
];

/// Historical or source-specific codes and the current code they map to.
const ALIASES: &[(&str, &str)] = &[
    ("PHO", "PHX"),
    ("BRK", "BKN"),
    ("NJN", "BKN"),
    ("CHO", "CHA"),
    ("CHH", "CHA"),
    ("NOH", "NOP"),
    ("NOK", "NOP"),
    ("SEA", "OKC"),
    ("VAN", "MEM"),
    ("GOS", "GSW"),
    ("SAN", "SAS"),
    ("UTH", "UTA"),
    ("WSH", "WAS"),
];

/// Full franchise names as schedule sources print them.
const FRANCHISE_NAMES: &[(&str, &str)] = &[
    ("Atlanta Hawks", "ATL"),
    ("Boston Celtics", "BOS"),
    ("Brooklyn Nets", "BKN"),
    ("Charlotte Hornets", "CHA"),
    ("Chicago Bulls", "CHI"),
    ("Cleveland Cavaliers", "CLE"),
    ("Dallas Mavericks", "DAL"),
    ("Denver Nuggets", "DEN"),
    ("Detroit Pistons", "DET"),
    ("Golden State Warriors", "GSW"),
    ("Houston Rockets", "HOU"),
    ("Indiana Pacers", "IND"),
    ("Los Angeles Clippers", "LAC"),
    ("Los Angeles Lakers", "LAL"),
    ("Memphis Grizzlies", "MEM"),
    ("Miami Heat", "MIA"),
    ("Milwaukee Bucks", "MIL"),
    ("Minnesota Timberwolves", "MIN"),
    ("New Orleans Pelicans", "NOP"),
    ("New York Knicks", "NYK"),
    ("Oklahoma City Thunder", "OKC"),
    ("Orlando Magic", "ORL"),
    ("Philadelphia 76ers", "PHI"),
    ("Phoenix Suns", "PHX"),
    ("Portland Trail Blazers", "POR"),
    ("Sacramento Kings", "SAC"),
    ("San Antonio Spurs", "SAS"),
    ("Toronto Raptors", "TOR"),
    ("Utah Jazz", "UTA"),
    ("Washington Wizards", "WAS"),
];

/// Current code for a team given as a code, an old code or a full
/// franchise name.
pub fn canonical_team(raw: &str) -> TeamCode {
    let name = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    if let Some((_, code)) = FRANCHISE_NAMES
        .iter()
        .find(|(franchise, _)| franchise.eq_ignore_ascii_case(&name))
    {
        return TeamCode::new(code);
    }
    let code = TeamCode::new(raw);
    ALIASES
        .iter()
        .find(|(alias, _)| *alias == code.as_str())
        .map(|(_, current)| TeamCode::new(current))
        .unwrap_or(code)
}

pub fn is_canonical(team: &TeamCode) -> bool {
    CANONICAL_TEAMS.contains(&team.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn maps_old_codes_to_current() {
        assert_eq!(canonical_team("PHO"), TeamCode::new("PHX"));
        assert_eq!(canonical_team("brk"), TeamCode::new("BKN"));
        assert_eq!(canonical_team(" GSW "), TeamCode::new("GSW"));
    }

    #[test]
    fn maps_franchise_names_to_codes() {
        assert_eq!(canonical_team("Golden State Warriors"), TeamCode::new("GSW"));
        assert_eq!(canonical_team("cleveland  cavaliers"), TeamCode::new("CLE"));
        assert_eq!(canonical_team("Philadelphia 76ers"), TeamCode::new("PHI"));
    }

    #[test]
    fn every_franchise_name_is_a_canonical_code() {
        assert_eq!(FRANCHISE_NAMES.len(), CANONICAL_TEAMS.len());
        for (name, _) in FRANCHISE_NAMES {
            assert!(is_canonical(&canonical_team(name)), "{name}");
        }
    }

    #[test]
    fn every_alias_lands_on_a_canonical_code() {
        for (alias, _) in ALIASES {
            assert!(is_canonical(&canonical_team(alias)), "{alias}");
        }
    }
}
