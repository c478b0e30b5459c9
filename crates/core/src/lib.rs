#![forbid(unsafe_code)]

pub mod ids {
    #[derive(Clone, Debug, PartialEq, Eq, Hash)]
    pub struct UserId(String);

    #[derive(Clone, Debug, PartialEq, Eq, Hash)]
    pub struct AchievementId(String);

    #[derive(Clone, Debug, PartialEq, Eq, Hash)]
    pub struct CategoryId(String);

    impl UserId {
        pub fn as_str(&self) -> &str {
            &self.0
        }

        pub fn try_new(value: impl Into<String>) -> Result<Self, IdError> {
            let value = value.into();
            validate_id(&value)?;
            Ok(Self(value))
        }
    }

    impl AchievementId {
        pub fn as_str(&self) -> &str {
            &self.0
        }

        pub fn try_new(value: impl Into<String>) -> Result<Self, IdError> {
            let value = value.into();
            validate_id(&value)?;
            Ok(Self(value))
        }
    }

    impl CategoryId {
        pub fn as_str(&self) -> &str {
            &self.0
        }

        pub fn try_new(value: impl Into<String>) -> Result<Self, IdError> {
            let value = value.into();
            validate_id(&value)?;
            Ok(Self(value))
        }
    }

    #[derive(Clone, Debug, PartialEq, Eq)]
    pub enum IdError {
        Empty,
        TooLong,
        InvalidFirstChar,
        InvalidChar { ch: char, index: usize },
    }

    fn validate_id(value: &str) -> Result<(), IdError> {
        if value.is_empty() {
            return Err(IdError::Empty);
        }
        if value.len() > 128 {
            return Err(IdError::TooLong);
        }
        let mut chars = value.chars();
        let Some(first) = chars.next() else {
            return Err(IdError::Empty);
        };
        if !first.is_ascii_alphanumeric() {
            return Err(IdError::InvalidFirstChar);
        }
        for (index, ch) in value.chars().enumerate() {
            if index == 0 {
                continue;
            }
            if ch.is_ascii_alphanumeric() || matches!(ch, '.' | '_' | '-') {
                continue;
            }
            return Err(IdError::InvalidChar { ch, index });
        }
        Ok(())
    }
}

pub mod points {
    /// Minimum value any achievement is worth, and the fixed value used
    /// while no users are registered.
    pub const DEFAULT_POINTS: i64 = 10;

    /// Value of an achievement nobody has completed yet.
    pub const MAX_POINTS: i64 = 100;

    /// Rarity-weighted point value for one achievement.
    ///
    /// Total over its domain: a completion count above the user total
    /// yields a negative base and floors to `DEFAULT_POINTS` instead of
    /// failing.
    pub fn points(achievement_count: u64, total_users: u64) -> i64 {
        if total_users == 0 {
            return DEFAULT_POINTS;
        }
        let rate = achievement_count as f64 / total_users as f64;
        let base = (100.0 * (1.0 - rate)).round() as i64;
        base.max(DEFAULT_POINTS)
    }
}

pub mod share {
    pub const HASHTAG_SUFFIX: &str = "#LifeTrack #AchievementUnlocked";

    /// Announcement text for an unlocked achievement. Content only; the
    /// glue layer owns link construction and transport.
    pub fn share_text(title: &str, points: i64) -> String {
        format!("🎉 \"{title}\" achieved! +{points} points\n\n{HASHTAG_SUFFIX}")
    }
}

pub mod confirm {
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub enum Confirmation {
        Unconfirmed,
        ConfirmedAchieve,
        ConfirmedCancel,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub enum TransitionKind {
        Achieve,
        Cancel,
    }

    impl Confirmation {
        pub fn as_str(self) -> &'static str {
            match self {
                Confirmation::Unconfirmed => "unconfirmed",
                Confirmation::ConfirmedAchieve => "confirmed_achieve",
                Confirmation::ConfirmedCancel => "confirmed_cancel",
            }
        }

        /// The transition this confirmation authorizes, if any.
        pub fn transition(self) -> Option<TransitionKind> {
            match self {
                Confirmation::Unconfirmed => None,
                Confirmation::ConfirmedAchieve => Some(TransitionKind::Achieve),
                Confirmation::ConfirmedCancel => Some(TransitionKind::Cancel),
            }
        }
    }
}
