/// The five reaction types recipes and comments accept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReactionKind {
    Like,
    Love,
    Yum,
    Fire,
    Clap,
}

impl ReactionKind {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "like" => Some(ReactionKind::Like),
            "love" => Some(ReactionKind::Love),
            "yum" => Some(ReactionKind::Yum),
            "fire" => Some(ReactionKind::Fire),
            "clap" => Some(ReactionKind::Clap),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ReactionKind::Like => "like",
            ReactionKind::Love => "love",
            ReactionKind::Yum => "yum",
            ReactionKind::Fire => "fire",
            ReactionKind::Clap => "clap",
        }
    }
}

/// What a reaction submission does, given the caller's existing reaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReactionChange {
    Added,
    /// Same type resubmitted: toggle off.
    Removed,
    /// Different type: the old reaction is swapped for the new one.
    Replaced,
}

pub fn toggle(existing: Option<ReactionKind>, submitted: ReactionKind) -> ReactionChange {
    match existing {
        None => ReactionChange::Added,
        Some(current) if current == submitted => ReactionChange::Removed,
        Some(_) => ReactionChange::Replaced,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_reaction_is_added() {
        assert_eq!(toggle(None, ReactionKind::Yum), ReactionChange::Added);
    }

    #[test]
    fn same_type_toggles_off() {
        assert_eq!(
            toggle(Some(ReactionKind::Fire), ReactionKind::Fire),
            ReactionChange::Removed
        );
    }

    #[test]
    fn different_type_replaces() {
        assert_eq!(
            toggle(Some(ReactionKind::Like), ReactionKind::Love),
            ReactionChange::Replaced
        );
    }

    #[test]
    fn unknown_type_is_rejected_at_parse() {
        assert!(ReactionKind::parse("angry").is_none());
        assert_eq!(ReactionKind::parse("clap"), Some(ReactionKind::Clap));
    }
}
