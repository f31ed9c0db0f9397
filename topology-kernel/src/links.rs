use crate::models::LinkType;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkRule {
    pub from: &'static str,
    pub to: &'static str,
    pub link_type: LinkType,
}

/// Table de classification : (groupe source, groupe cible) → type de lien.
pub const LINK_RULES: &[LinkRule] = &[
    LinkRule { from: "web", to: "db", link_type: LinkType::Database },
    LinkRule { from: "dns", to: "web", link_type: LinkType::Network },
    LinkRule { from: "dns", to: "db", link_type: LinkType::Network },
];

/// Paires de groupes qui génèrent des liens, dans l'ordre d'émission.
pub const GROUP_PAIRS: &[(&str, &str)] = &[("dns", "web"), ("web", "db"), ("dns", "db")];

/// Orienté : `classify("db", "web")` donne `Unknown`.
pub fn classify(from_group: &str, to_group: &str) -> LinkType {
    LINK_RULES
        .iter()
        .find(|rule| rule.from == from_group && rule.to == to_group)
        .map(|rule| rule.link_type)
        .unwrap_or(LinkType::Unknown)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_each_rule() {
        for rule in LINK_RULES {
            assert_eq!(classify(rule.from, rule.to), rule.link_type);
        }
        assert_eq!(classify("web", "db"), LinkType::Database);
        assert_eq!(classify("dns", "web"), LinkType::Network);
        assert_eq!(classify("dns", "db"), LinkType::Network);
    }

    #[test]
    fn test_unknown_pairs() {
        assert_eq!(classify("db", "web"), LinkType::Unknown);
        assert_eq!(classify("web", "dns"), LinkType::Unknown);
        assert_eq!(classify("web", "web"), LinkType::Unknown);
        assert_eq!(classify("cache", "db"), LinkType::Unknown);
        assert_eq!(classify("", ""), LinkType::Unknown);
        assert_eq!(classify("WEB", "DB"), LinkType::Unknown);
    }

    #[test]
    fn test_every_group_pair_is_classified() {
        for (from, to) in GROUP_PAIRS {
            assert_ne!(classify(from, to), LinkType::Unknown, "{from} -> {to}");
        }
    }
}
