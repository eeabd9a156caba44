//! Issue-tracker repository reference (`owner/repo`).

use std::fmt;

use crate::domain::foundation::ValidationError;

/// A repository on the issue tracker, identified by owner and name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepositoryRef {
    owner: String,
    name: String,
}

impl RepositoryRef {
    /// Parses `owner/repo`.
    ///
    /// Surrounding whitespace is ignored. Exactly one `/` is required and
    /// both sides must be non-empty.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let trimmed = input.trim();
        let mut parts = trimmed.split('/');

        match (parts.next(), parts.next(), parts.next()) {
            (Some(owner), Some(name), None)
                if !owner.trim().is_empty() && !name.trim().is_empty() =>
            {
                Ok(Self {
                    owner: owner.trim().to_string(),
                    name: name.trim().to_string(),
                })
            }
            _ => Err(ValidationError::invalid_format(
                "repository",
                "expected 'owner/repo'",
            )),
        }
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for RepositoryRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn parses_owner_and_name() {
        let repo = RepositoryRef::parse("myorg/my-repo").unwrap();
        assert_eq!(repo.owner(), "myorg");
        assert_eq!(repo.name(), "my-repo");
        assert_eq!(repo.to_string(), "myorg/my-repo");
    }

    #[test]
    fn ignores_surrounding_whitespace() {
        let repo = RepositoryRef::parse("  myorg/my-repo\n").unwrap();
        assert_eq!(repo.to_string(), "myorg/my-repo");
    }

    #[test]
    fn rejects_bad_shapes() {
        for input in ["", "myorg", "/repo", "myorg/", "a/b/c", " / ", "//"] {
            assert!(
                RepositoryRef::parse(input).is_err(),
                "expected rejection for {:?}",
                input
            );
        }
    }

    proptest! {
        #[test]
        fn accepts_any_two_non_empty_segments(
            owner in "[a-zA-Z0-9_.-]{1,20}",
            name in "[a-zA-Z0-9_.-]{1,20}",
        ) {
            let repo = RepositoryRef::parse(&format!("{}/{}", owner, name)).unwrap();
            prop_assert_eq!(repo.owner(), owner.as_str());
            prop_assert_eq!(repo.name(), name.as_str());
        }

        #[test]
        fn rejects_input_without_slash(input in "[a-zA-Z0-9_.-]{0,20}") {
            prop_assert!(RepositoryRef::parse(&input).is_err());
        }
    }
}
