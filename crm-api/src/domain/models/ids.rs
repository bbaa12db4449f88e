use serde::{Deserialize, Serialize};
use std::fmt;

/// Declares an opaque string identifier.
///
/// Identifiers are assigned by the store (UUID v4 strings), so the wrappers
/// only exist to keep a `TaskId` from being passed where a `ProjectId` is expected.
macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }
    };
}

string_id!(
    /// A client (customer organisation or person).
    ClientId
);
string_id!(LeadId);
string_id!(ProjectId);
string_id!(TaskId);
string_id!(MilestoneId);
string_id!(GoalId);
string_id!(DeliverableId);
string_id!(CommunicationId);
string_id!(TicketId);
string_id!(SubscriptionId);
string_id!(PaymentId);
string_id!(AgreementId);
string_id!(
    /// A back-office user a task can be assigned to.
    ///
    /// Users live in the auth provider, so this is never resolved locally.
    UserId
);
