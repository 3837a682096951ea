use std::{fmt, str::FromStr};

use itertools::Itertools;

use crate::error::AutomatonError;

/// Birth/survival neighbour counts of a two-state, Life-like rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LifeRule {
    pub birth: Vec<usize>,
    pub survive: Vec<usize>,
}

impl LifeRule {
    pub fn new(birth: Vec<usize>, survive: Vec<usize>) -> Self {
        Self { birth, survive }
    }
}

impl Default for LifeRule {
    /// Conway's B3/S23.
    fn default() -> Self {
        Self {
            birth: vec![3],
            survive: vec![2, 3],
        }
    }
}

impl fmt::Display for LifeRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "B{}/S{}",
            self.birth.iter().join(""),
            self.survive.iter().join("")
        )
    }
}

/// Parses `B<digits>/S<digits>`, e.g. `B36/S23`. Letters are case-insensitive and each digit
/// is a neighbour count in `0..=8`.
impl FromStr for LifeRule {
    type Err = AutomatonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || AutomatonError::InvalidRule(s.to_owned());

        let (birth, survive) = s.split_once('/').ok_or_else(invalid)?;
        let birth = counts_after(birth, 'B').ok_or_else(invalid)?;
        let survive = counts_after(survive, 'S').ok_or_else(invalid)?;

        Ok(Self { birth, survive })
    }
}

fn counts_after(part: &str, prefix: char) -> Option<Vec<usize>> {
    let mut chars = part.trim().chars();
    if !chars.next()?.eq_ignore_ascii_case(&prefix) {
        return None;
    }

    chars
        .map(|digit| digit.to_digit(10).filter(|&count| count <= 8))
        .map(|count| count.map(|count| count as usize))
        .collect::<Option<Vec<_>>>()
        .map(|counts| counts.into_iter().sorted().dedup().collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_b_s_notation() {
        assert_eq!("B3/S23".parse::<LifeRule>().unwrap(), LifeRule::default());
        assert_eq!(
            "b63/s32".parse::<LifeRule>().unwrap(),
            LifeRule::new(vec![3, 6], vec![2, 3])
        );
        assert_eq!("B/S".parse::<LifeRule>().unwrap(), LifeRule::new(vec![], vec![]));
    }

    #[test]
    fn rejects_malformed_rules() {
        for rule in ["", "B3", "S23/B3", "B39/S23", "B3/S2x", "23/3"] {
            assert_eq!(
                rule.parse::<LifeRule>(),
                Err(AutomatonError::InvalidRule(rule.to_owned())),
                "{rule}"
            );
        }
    }

    #[test]
    fn display_round_trips() {
        let rule = LifeRule::new(vec![3, 6], vec![2, 3]);
        assert_eq!(rule.to_string(), "B36/S23");
        assert_eq!(rule.to_string().parse::<LifeRule>().unwrap(), rule);
    }
}
