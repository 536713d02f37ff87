//! Record field table: canonical names and single-letter aliases.

use std::fmt;

/// A logical record field.
///
/// Every field except `v` can be written with its full name or with a
/// single-letter alias. The table here is the only place the two spellings
/// are related.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RecordField {
    /// `v`: record version
    Version,
    /// `uri` / `u`: endpoint URI
    Uri,
    /// `proto` / `p`: protocol token
    Proto,
    /// `auth` / `a`: authentication hint
    Auth,
    /// `desc` / `s`: short description
    Desc,
    /// `docs` / `d`: documentation URL
    Docs,
    /// `dep` / `e`: deprecation timestamp
    Dep,
    /// `pka` / `k`: public key for agents
    Pka,
    /// `kid` / `i`: key identifier
    Kid,
}

/// Which spelling of a key to use when serializing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyStyle {
    /// Full names (`uri`, `proto`, ...).
    #[default]
    Full,
    /// Single-letter aliases (`u`, `p`, ...).
    Alias,
}

impl RecordField {
    /// Every field in canonical serialization order.
    pub const ALL: [Self; 9] = [
        Self::Version,
        Self::Uri,
        Self::Proto,
        Self::Auth,
        Self::Desc,
        Self::Docs,
        Self::Dep,
        Self::Pka,
        Self::Kid,
    ];

    /// Returns the full key name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Version => "v",
            Self::Uri => "uri",
            Self::Proto => "proto",
            Self::Auth => "auth",
            Self::Desc => "desc",
            Self::Docs => "docs",
            Self::Dep => "dep",
            Self::Pka => "pka",
            Self::Kid => "kid",
        }
    }

    /// Returns the single-letter alias, if the field has one.
    #[must_use]
    pub const fn alias(self) -> Option<&'static str> {
        match self {
            Self::Version => None,
            Self::Uri => Some("u"),
            Self::Proto => Some("p"),
            Self::Auth => Some("a"),
            Self::Desc => Some("s"),
            Self::Docs => Some("d"),
            Self::Dep => Some("e"),
            Self::Pka => Some("k"),
            Self::Kid => Some("i"),
        }
    }

    /// Returns the key to emit for the given style.
    #[must_use]
    pub fn key(self, style: KeyStyle) -> &'static str {
        match style {
            KeyStyle::Full => self.name(),
            KeyStyle::Alias => self.alias().unwrap_or(self.name()),
        }
    }

    /// Resolves a lowercase key to its field and spelling.
    ///
    /// Returns `None` for keys outside the table; callers ignore those for
    /// forward compatibility.
    #[must_use]
    pub fn lookup(key: &str) -> Option<(Self, KeyStyle)> {
        Self::ALL.into_iter().find_map(|field| {
            if field.name() == key {
                Some((field, KeyStyle::Full))
            } else if field.alias() == Some(key) {
                Some((field, KeyStyle::Alias))
            } else {
                None
            }
        })
    }

    pub(crate) const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for RecordField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_full_and_alias() {
        assert_eq!(
            RecordField::lookup("uri"),
            Some((RecordField::Uri, KeyStyle::Full))
        );
        assert_eq!(
            RecordField::lookup("u"),
            Some((RecordField::Uri, KeyStyle::Alias))
        );
        assert_eq!(
            RecordField::lookup("i"),
            Some((RecordField::Kid, KeyStyle::Alias))
        );
        assert_eq!(RecordField::lookup("x-extra"), None);
    }

    #[test]
    fn aliases_are_unique() {
        let mut seen = std::collections::HashSet::new();
        for field in RecordField::ALL {
            assert!(seen.insert(field.name()));
            if let Some(alias) = field.alias() {
                assert!(seen.insert(alias), "alias '{alias}' collides");
            }
        }
    }

    #[test]
    fn index_matches_order() {
        for (i, field) in RecordField::ALL.into_iter().enumerate() {
            assert_eq!(field.index(), i);
        }
    }
}
