//! Board-wide reaction settings

use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;

use reactions_core::entities::ListOrder;
use reactions_core::value_objects::{DayBucket, Id};

use super::app_config::{parse_or, ConfigError};

/// Which posts of a topic accept reactions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Zones {
    FirstPost,
    Replies,
    #[default]
    All,
}

impl Zones {
    /// Whether a post in the given position accepts reactions
    pub fn accepts(&self, is_first_post: bool) -> bool {
        match self {
            Self::FirstPost => is_first_post,
            Self::Replies => !is_first_post,
            Self::All => true,
        }
    }
}

impl FromStr for Zones {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "first_post" | "1" => Ok(Self::FirstPost),
            "replies" | "2" => Ok(Self::Replies),
            "all" | "3" => Ok(Self::All),
            _ => Err(format!("Invalid zones: {s}")),
        }
    }
}

/// Reaction settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReactionsConfig {
    /// Users may change or withdraw a reaction
    pub allow_change: bool,
    /// Users may react to their own posts
    pub allow_myself: bool,
    /// Hide reactor names from non-moderators
    pub anonymous: bool,
    /// Replying requires a reaction on the first post
    pub force_reply: bool,
    /// Attachments stay hidden until the viewer reacts
    pub force_attach: bool,
    pub score_on_profile: bool,
    pub list_order: ListOrder,
    pub zones: Zones,
    /// Forums with reactions; empty means every forum
    pub forums: Vec<Id>,
    pub default_kind: Option<Id>,
    /// Offset of the board timezone, used for notification day buckets
    pub utc_offset_minutes: i32,
}

impl Default for ReactionsConfig {
    fn default() -> Self {
        Self {
            allow_change: true,
            allow_myself: false,
            anonymous: false,
            force_reply: false,
            force_attach: false,
            score_on_profile: true,
            list_order: ListOrder::Time,
            zones: Zones::All,
            forums: Vec::new(),
            default_kind: None,
            utc_offset_minutes: 0,
        }
    }
}

fn parse_bool<F>(lookup: &F, name: &'static str, default: bool) -> Result<bool, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(name) else {
        return Ok(default);
    };
    match raw.trim().to_lowercase().as_str() {
        "" => Ok(default),
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue(name, raw)),
    }
}

fn parse_with<T, F>(lookup: &F, name: &'static str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        Some(raw) if !raw.trim().is_empty() => raw
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue(name, raw)),
        _ => Ok(None),
    }
}

fn parse_forums(raw: &str) -> Result<Vec<Id>, ConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            Id::parse(s)
                .ok()
                .filter(Id::is_valid)
                .ok_or_else(|| ConfigError::InvalidValue("REACTIONS_FORUMS", raw.to_string()))
        })
        .collect()
}

impl ReactionsConfig {
    /// Load reaction settings from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        Self::from_lookup(&|name: &str| env::var(name).ok())
    }

    /// Load reaction settings from an arbitrary variable source
    pub fn from_lookup<F>(lookup: &F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let config = Self {
            allow_change: parse_bool(lookup, "REACTIONS_ALLOW_CHANGE", defaults.allow_change)?,
            allow_myself: parse_bool(lookup, "REACTIONS_ALLOW_MYSELF", defaults.allow_myself)?,
            anonymous: parse_bool(lookup, "REACTIONS_ANONYMOUS", defaults.anonymous)?,
            force_reply: parse_bool(lookup, "REACTIONS_FORCE_REPLY", defaults.force_reply)?,
            force_attach: parse_bool(lookup, "REACTIONS_FORCE_ATTACH", defaults.force_attach)?,
            score_on_profile: parse_bool(
                lookup,
                "REACTIONS_SCORE_ON_PROFILE",
                defaults.score_on_profile,
            )?,
            list_order: parse_with(lookup, "REACTIONS_LIST_ORDER")?.unwrap_or_default(),
            zones: parse_with(lookup, "REACTIONS_ZONES")?.unwrap_or_default(),
            forums: match lookup("REACTIONS_FORUMS") {
                Some(raw) => parse_forums(&raw)?,
                None => Vec::new(),
            },
            default_kind: parse_with::<Id, _>(lookup, "REACTIONS_DEFAULT")?.filter(Id::is_valid),
            utc_offset_minutes: parse_or(lookup, "REACTIONS_UTC_OFFSET_MINUTES", 0)?,
        };

        Ok(config.normalized())
    }

    /// Apply cross-setting rules: reactions on replies only never force a reply
    #[must_use]
    pub fn normalized(mut self) -> Self {
        if self.zones == Zones::Replies {
            self.force_reply = false;
        }
        self
    }

    /// Whether reactions are enabled in a forum
    pub fn forum_enabled(&self, forum_id: Id) -> bool {
        self.forums.is_empty() || self.forums.contains(&forum_id)
    }

    /// Day bucket of the board timezone
    pub fn day_bucket(&self) -> DayBucket {
        DayBucket::with_offset_minutes(self.utc_offset_minutes)
    }
}
