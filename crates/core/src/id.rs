// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Identifier newtypes for remote resources

/// Define a newtype ID wrapper around `String`.
///
/// Generates `new()`, `as_str()`, `Display`, `From<String>`, `From<&str>`,
/// `PartialEq<str>`, `PartialEq<&str>`, and `Borrow<str>` implementations.
///
/// ```ignore
/// define_id! {
///     /// Doc comment for the ID type.
///     pub struct MyId;
/// }
/// ```
#[macro_export]
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        pub struct $name:ident;
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl PartialEq<str> for $name {
            fn eq(&self, other: &str) -> bool {
                self.0 == other
            }
        }

        impl PartialEq<&str> for $name {
            fn eq(&self, other: &&str) -> bool {
                self.0 == *other
            }
        }

        impl std::borrow::Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }
    };
}

define_id! {
    /// Identity assigned by the remote build service when a build starts.
    ///
    /// Opaque to us: it is only ever echoed back in status queries and
    /// used to address the build's output objects.
    pub struct BuildId;
}

define_id! {
    /// Name of the remote project that all builds of one run belong to.
    pub struct ProjectName;
}

define_id! {
    /// Result store key, rendered as `project:build`.
    pub struct ResultKey;
}

impl ResultKey {
    /// Compose the key for a build of `project`.
    ///
    /// A build id already qualified as `project:id` contributes only its
    /// bare `id`, so output objects live under `<id>/<project>/`.
    pub fn compose(project: &ProjectName, build: &BuildId) -> Self {
        let bare = build
            .as_str()
            .strip_prefix(project.as_str())
            .and_then(|rest| rest.strip_prefix(':'))
            .unwrap_or(build.as_str());
        Self(format!("{}:{}", project, bare))
    }

    /// Split the key back into its project and build halves.
    ///
    /// Only the first separator counts.
    pub fn split(&self) -> Option<(&str, &str)> {
        self.0.split_once(':')
    }
}

#[cfg(test)]
#[path = "id_tests.rs"]
mod tests;
