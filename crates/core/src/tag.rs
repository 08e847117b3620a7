//! Type and predicate tags
//!
//! Tags are opaque atoms whose format belongs to the domain schema, usually
//! a URI. The engine only compares, hashes and prints them. Both tag kinds
//! share a cheap-to-clone `Arc<str>` representation so they can be copied into
//! every statement and property without reallocating.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

macro_rules! define_tag {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Arc<str>);

        impl $name {
            /// Create a tag from its textual form
            pub fn new(tag: impl AsRef<str>) -> Self {
                $name(Arc::from(tag.as_ref()))
            }

            /// Get the tag as a string slice
            #[inline]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl std::borrow::Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                $name::new(value)
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                $name(Arc::from(value))
            }
        }
    };
}

define_tag!(
    /// Resource type of an entity, e.g. `http://sbols.org/v2#Module`
    TypeTag
);

define_tag!(
    /// Predicate naming a property, e.g. `http://sbols.org/v2#definition`
    PredicateTag
);
