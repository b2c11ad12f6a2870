//! Reaction permission flags granted to the acting user by the host

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::fmt;

bitflags! {
    /// Reaction permissions of a viewer
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct Permissions: u32 {
        /// React to posts (`u_reactions`)
        const USE      = 1 << 0;
        /// See who reacted (`u_reactions_view`)
        const VIEW     = 1 << 1;
        /// Act on other users' reactions, see names in anonymous mode (`m_reactions`)
        const MODERATE = 1 << 2;

        /// Default grant for registered users
        const DEFAULT = Self::USE.bits() | Self::VIEW.bits();
    }
}

/// Permission option as registered in the host's permission set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PermissionOption {
    pub name: &'static str,
    pub lang: &'static str,
    pub category: &'static str,
}

impl Permissions {
    /// Host permission options backing each flag
    pub const OPTIONS: [PermissionOption; 3] = [
        PermissionOption {
            name: "m_reactions",
            lang: "ACL_M_REACTIONS",
            category: "post_actions",
        },
        PermissionOption {
            name: "u_reactions",
            lang: "ACL_U_REACTIONS",
            category: "post",
        },
        PermissionOption {
            name: "u_reactions_view",
            lang: "ACL_U_REACTIONS_VIEW",
            category: "post",
        },
    ];

    /// Build a permission set from host option names
    pub fn from_options<'a, I>(names: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        names
            .into_iter()
            .fold(Permissions::empty(), |acc, name| match name {
                "u_reactions" => acc | Permissions::USE,
                "u_reactions_view" => acc | Permissions::VIEW,
                "m_reactions" => acc | Permissions::MODERATE,
                _ => acc,
            })
    }

    #[inline]
    pub fn can_use(&self) -> bool {
        self.contains(Permissions::USE)
    }

    #[inline]
    pub fn can_view(&self) -> bool {
        self.contains(Permissions::VIEW)
    }

    #[inline]
    pub fn is_moderator(&self) -> bool {
        self.contains(Permissions::MODERATE)
    }
}

impl Default for Permissions {
    fn default() -> Self {
        Permissions::empty()
    }
}

impl fmt::Display for Permissions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = Permissions::OPTIONS
            .iter()
            .filter(|opt| self.contains(Permissions::from_options([opt.name])))
            .map(|opt| opt.name)
            .collect();
        write!(f, "{}", names.join(","))
    }
}
