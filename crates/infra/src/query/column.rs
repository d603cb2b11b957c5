use std::borrow::Cow;

use skillgate_core::DomainError;

/// A column reference inside a scoped query, optionally qualified by the
/// entity alias used in the `FROM` clause (`centre.organisation_id`).
///
/// Identifiers are validated on construction from untrusted text, so a
/// rendered column can never smuggle SQL into a filter.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Column {
    alias: Option<Cow<'static, str>>,
    name: Cow<'static, str>,
}

impl Column {
    /// Qualified column from compile-time identifiers.
    pub const fn new(alias: &'static str, name: &'static str) -> Self {
        Self {
            alias: Some(Cow::Borrowed(alias)),
            name: Cow::Borrowed(name),
        }
    }

    /// Unqualified column from a compile-time identifier.
    pub const fn bare(name: &'static str) -> Self {
        Self {
            alias: None,
            name: Cow::Borrowed(name),
        }
    }

    /// Parse `alias.name` or `name`.
    pub fn parse(input: &str) -> Result<Self, DomainError> {
        let (alias, name) = match input.split_once('.') {
            Some((alias, name)) => (Some(alias), name),
            None => (None, input),
        };

        if let Some(alias) = alias {
            validate_identifier(alias)?;
        }
        validate_identifier(name)?;

        Ok(Self {
            alias: alias.map(|a| Cow::Owned(a.to_string())),
            name: Cow::Owned(name.to_string()),
        })
    }

    /// Same column name under a different entity alias.
    pub fn with_alias(&self, alias: &str) -> Result<Self, DomainError> {
        validate_identifier(alias)?;
        Ok(Self {
            alias: Some(Cow::Owned(alias.to_string())),
            name: self.name.clone(),
        })
    }

    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn qualified(&self) -> String {
        self.to_string()
    }
}

impl core::fmt::Display for Column {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match &self.alias {
            Some(alias) => write!(f, "{}.{}", alias, self.name),
            None => f.write_str(&self.name),
        }
    }
}

impl core::str::FromStr for Column {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

fn validate_identifier(ident: &str) -> Result<(), DomainError> {
    let mut chars = ident.chars();
    let valid = match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    };

    if valid {
        Ok(())
    } else {
        Err(DomainError::validation(format!("invalid column identifier '{ident}'")))
    }
}
