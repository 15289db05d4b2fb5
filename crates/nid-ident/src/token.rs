//! NameID token codec.
//!
//! A token is the persisted form of a NameID's qualifying attributes:
//! `idx=value[,idx=value...]` where `idx` is the attribute's position in
//! [`TokenField::ALL`] and `value` is percent-encoded with `/` kept literal.
//! Absent attributes are left out. The NameID value itself is not part of the token.
//!
//! ```text
//! NameID(name_qualifier="nq1", sp_name_qualifier="sp1", format=persistent)
//!   -> 0=nq1,1=sp1,2=urn%3Aoasis%3Anames%3Atc%3ASAML%3A2.0%3Anameid-format%3Apersistent
//! ```

use nid_saml::NameId;

use crate::error::{IdentError, IdentResult};

/// A qualifying attribute and its fixed index in the token format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenField {
    /// `NameQualifier`, index 0.
    NameQualifier,
    /// `SPNameQualifier`, index 1.
    SpNameQualifier,
    /// `Format`, index 2.
    Format,
    /// `SPProvidedID`, index 3.
    SpProvidedId,
}

impl TokenField {
    /// The index table. Position in this array is the wire index.
    pub const ALL: [Self; 4] = [
        Self::NameQualifier,
        Self::SpNameQualifier,
        Self::Format,
        Self::SpProvidedId,
    ];

    /// Returns the wire index of this field.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::NameQualifier => 0,
            Self::SpNameQualifier => 1,
            Self::Format => 2,
            Self::SpProvidedId => 3,
        }
    }

    /// Looks a field up by wire index.
    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

/// The four qualifying attributes of a NameID, indexed by [`TokenField`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Qualifiers {
    slots: [Option<String>; 4],
}

impl Qualifiers {
    /// Captures the qualifying attributes of `name_id`. Empty strings count as absent.
    #[must_use]
    pub fn of(name_id: &NameId) -> Self {
        let mut qualifiers = Self::default();
        qualifiers.set(TokenField::NameQualifier, name_id.name_qualifier.clone());
        qualifiers.set(TokenField::SpNameQualifier, name_id.sp_name_qualifier.clone());
        qualifiers.set(TokenField::Format, name_id.format.clone());
        qualifiers.set(TokenField::SpProvidedId, name_id.sp_provided_id.clone());
        qualifiers
    }

    /// Returns the attribute stored for `field`.
    #[must_use]
    pub fn get(&self, field: TokenField) -> Option<&str> {
        self.slots[field.index()].as_deref()
    }

    /// Sets or clears the attribute for `field`.
    pub fn set(&mut self, field: TokenField, value: Option<String>) {
        self.slots[field.index()] = value.filter(|v| !v.is_empty());
    }

    /// Returns true if no attribute is present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    /// Builds a NameID carrying these attributes and the given value.
    #[must_use]
    pub fn into_name_id(self, value: impl Into<String>) -> NameId {
        let [name_qualifier, sp_name_qualifier, format, sp_provided_id] = self.slots;
        NameId {
            value: value.into(),
            format,
            name_qualifier,
            sp_name_qualifier,
            sp_provided_id,
        }
    }

    /// Serializes to the token format.
    #[must_use]
    pub fn encode(&self) -> String {
        TokenField::ALL
            .iter()
            .filter_map(|field| {
                self.get(*field)
                    .map(|value| format!("{}={}", field.index(), encode_value(value)))
            })
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Parses the token format. Pairs may appear in any order.
    pub fn decode(token: &str) -> IdentResult<Self> {
        let malformed = |reason: String| IdentError::MalformedToken {
            token: token.to_string(),
            reason,
        };

        let mut qualifiers = Self::default();
        for part in token.split(',').filter(|p| !p.is_empty()) {
            let (index, value) = part
                .split_once('=')
                .ok_or_else(|| malformed(format!("pair {part:?} has no '='")))?;
            let field = index
                .parse::<usize>()
                .ok()
                .and_then(TokenField::from_index)
                .ok_or_else(|| malformed(format!("unknown attribute index {index:?}")))?;
            let value = urlencoding::decode(value)
                .map_err(|e| malformed(format!("invalid percent-encoding: {e}")))?;
            qualifiers.set(field, Some(value.into_owned()));
        }
        Ok(qualifiers)
    }
}

// '%' itself encodes to "%25", so every "%2F" in the output stands for a '/'.
fn encode_value(value: &str) -> String {
    urlencoding::encode(value).replace("%2F", "/")
}

/// Encodes the qualifying attributes of `name_id` as a token.
#[must_use]
pub fn encode(name_id: &NameId) -> String {
    Qualifiers::of(name_id).encode()
}

/// Decodes a token into a NameID with an empty value.
///
/// The value is not part of the token and cannot be recovered.
pub fn decode(token: &str) -> IdentResult<NameId> {
    Qualifiers::decode(token).map(|q| q.into_name_id(String::new()))
}
