//! ESPN position, lineup slot, pro team and stat ID tables

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Fantasy positions that can be filtered in free-agent listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Position {
    QB,
    RB,
    WR,
    TE,
    DT,
    DE,
    LB,
    CB,
    S,
    K,
    DST,
}

impl Position {
    /// Every position exposed through the legacy `/free-agents-{pos}` routes
    pub const LEGACY_ROUTES: [Position; 10] = [
        Position::QB,
        Position::RB,
        Position::WR,
        Position::TE,
        Position::DT,
        Position::DE,
        Position::LB,
        Position::CB,
        Position::S,
        Position::K,
    ];

    /// Lineup slot ID used by the `filterSlotIds` player filter
    pub fn slot_id(self) -> u32 {
        match self {
            Position::QB => 0,
            Position::RB => 2,
            Position::WR => 4,
            Position::TE => 6,
            Position::DT => 8,
            Position::DE => 9,
            Position::LB => 10,
            Position::CB => 12,
            Position::S => 13,
            Position::DST => 16,
            Position::K => 17,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Position::QB => "QB",
            Position::RB => "RB",
            Position::WR => "WR",
            Position::TE => "TE",
            Position::DT => "DT",
            Position::DE => "DE",
            Position::LB => "LB",
            Position::CB => "CB",
            Position::S => "S",
            Position::K => "K",
            Position::DST => "D/ST",
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Position {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "QB" => Ok(Position::QB),
            "RB" => Ok(Position::RB),
            "WR" => Ok(Position::WR),
            "TE" => Ok(Position::TE),
            "DT" => Ok(Position::DT),
            "DE" => Ok(Position::DE),
            "LB" => Ok(Position::LB),
            "CB" => Ok(Position::CB),
            "S" => Ok(Position::S),
            "K" => Ok(Position::K),
            "DST" | "D/ST" | "DEF" => Ok(Position::DST),
            other => Err(format!("Unknown position '{other}'")),
        }
    }
}

/// Player position label from ESPN's `defaultPositionId`
pub fn position_name(default_position_id: u32) -> &'static str {
    match default_position_id {
        1 => "QB",
        2 => "RB",
        3 => "WR",
        4 => "TE",
        5 => "K",
        7 => "P",
        9 => "DT",
        10 => "DE",
        11 => "LB",
        12 => "CB",
        13 => "S",
        14 => "HC",
        16 => "D/ST",
        _ => "Unknown Position",
    }
}

/// NFL team abbreviation from ESPN's `proTeamId`
pub fn pro_team_abbrev(pro_team_id: u32) -> &'static str {
    match pro_team_id {
        1 => "ATL",
        2 => "BUF",
        3 => "CHI",
        4 => "CIN",
        5 => "CLE",
        6 => "DAL",
        7 => "DEN",
        8 => "DET",
        9 => "GB",
        10 => "TEN",
        11 => "IND",
        12 => "KC",
        13 => "LV",
        14 => "LAR",
        15 => "MIA",
        16 => "MIN",
        17 => "NE",
        18 => "NO",
        19 => "NYG",
        20 => "NYJ",
        21 => "PHI",
        22 => "ARI",
        23 => "PIT",
        24 => "LAC",
        25 => "SF",
        26 => "SEA",
        27 => "TB",
        28 => "WSH",
        29 => "CAR",
        30 => "JAX",
        33 => "BAL",
        34 => "HOU",
        _ => "FA",
    }
}

/// Readable name for a numeric stat key; unknown keys pass through unchanged
pub fn stat_name(stat_id: &str) -> &str {
    match stat_id {
        "0" => "passingAttempts",
        "1" => "passingCompletions",
        "2" => "passingIncompletions",
        "3" => "passingYards",
        "4" => "passingTouchdowns",
        "20" => "passingInterceptions",
        "23" => "rushingAttempts",
        "24" => "rushingYards",
        "25" => "rushingTouchdowns",
        "42" => "receivingYards",
        "43" => "receivingTouchdowns",
        "53" => "receivingReceptions",
        "58" => "receivingTargets",
        "68" => "fumbles",
        "72" => "lostFumbles",
        "74" => "madeFieldGoalsFrom50Plus",
        "77" => "madeFieldGoalsFrom40To49",
        "80" => "madeFieldGoalsFromUnder40",
        "83" => "madeFieldGoals",
        "84" => "attemptedFieldGoals",
        "86" => "madeExtraPoints",
        "87" => "attemptedExtraPoints",
        "95" => "defensiveInterceptions",
        "99" => "defensiveSacks",
        "106" => "defensiveForcedFumbles",
        "107" => "defensiveAssistedTackles",
        "108" => "defensiveSoloTackles",
        "109" => "defensiveTotalTackles",
        "113" => "defensivePassesDefensed",
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_parsing() {
        assert_eq!("qb".parse::<Position>().unwrap(), Position::QB);
        assert_eq!(" S ".parse::<Position>().unwrap(), Position::S);
        assert_eq!("d/st".parse::<Position>().unwrap(), Position::DST);
        assert!("XX".parse::<Position>().is_err());
    }

    #[test]
    fn test_slot_ids_are_unique() {
        let mut slots: Vec<u32> = Position::LEGACY_ROUTES.iter().map(|p| p.slot_id()).collect();
        slots.push(Position::DST.slot_id());
        let count = slots.len();
        slots.sort_unstable();
        slots.dedup();
        assert_eq!(slots.len(), count);
    }

    #[test]
    fn test_lookup_tables() {
        assert_eq!(position_name(1), "QB");
        assert_eq!(position_name(99), "Unknown Position");
        assert_eq!(pro_team_abbrev(33), "BAL");
        assert_eq!(pro_team_abbrev(0), "FA");
        assert_eq!(stat_name("3"), "passingYards");
        assert_eq!(stat_name("9999"), "9999");
    }
}
