//! Zones touristiques : énumération fermée et recherche libre.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Category {
    Plage,
    Montagne,
    Desert,
    Foret,
    Monument,
    Culture,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Type de zone non reconnu (plage, montagne, desert, foret, monument, culture uniquement).")]
pub struct UnknownCategory;

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Plage,
        Category::Montagne,
        Category::Desert,
        Category::Foret,
        Category::Monument,
        Category::Culture,
    ];

    /// Segment utilisé par `GET /visites/:type` et par la route `/typezone/:category`.
    pub const fn slug(self) -> &'static str {
        match self {
            Category::Plage => "plage",
            Category::Montagne => "montagne",
            Category::Desert => "desert",
            Category::Foret => "foret",
            Category::Monument => "monument",
            Category::Culture => "culture",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Category::Plage => "Plages",
            Category::Montagne => "Montagnes",
            Category::Desert => "Déserts",
            Category::Foret => "Forêts et parcs",
            Category::Monument => "Monuments",
            Category::Culture => "Cultures",
        }
    }

    pub const fn headline(self) -> &'static str {
        match self {
            Category::Plage => "Plages Magnifiques à Découvrir",
            Category::Montagne => "Montagnes à Explorer",
            Category::Desert => "Déserts à Parcourir",
            Category::Foret => "Forêts et Parcs à Visiter",
            Category::Monument => "Monuments Historiques",
            Category::Culture => "Des cultures à découvrir",
        }
    }

    /// Saisie libre de l'en-tête : insensible à la casse et aux espaces.
    pub fn from_search(query: &str) -> Result<Self, UnknownCategory> {
        query.trim().to_lowercase().parse()
    }
}

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "foretparc" | "foretParc" => Ok(Category::Foret),
            other => Category::ALL.into_iter().find(|c| c.slug() == other).ok_or(UnknownCategory),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_words_are_recognised() {
        assert_eq!(Category::from_search("plage"), Ok(Category::Plage));
        assert_eq!(Category::from_search("  Montagne "), Ok(Category::Montagne));
        assert_eq!(Category::from_search("FORETPARC"), Ok(Category::Foret));
        assert_eq!(Category::from_search("culture"), Ok(Category::Culture));
    }

    #[test]
    fn typos_are_rejected_with_a_message() {
        let err = Category::from_search("plge").unwrap_err();
        assert!(err.to_string().starts_with("Type de zone non reconnu"));
        assert!(Category::from_search("").is_err());
    }

    #[test]
    fn slug_round_trips_through_the_route_parameter() {
        for c in Category::ALL {
            assert_eq!(c.to_string().parse::<Category>(), Ok(c));
        }
    }
}
