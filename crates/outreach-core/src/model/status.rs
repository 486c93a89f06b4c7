//! Closed string enums persisted as TEXT columns

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::OutreachError;

macro_rules! text_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $field:literal {
            $($variant:ident => $text:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $text)] $variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = OutreachError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok($name::$variant),)+
                    other => Err(OutreachError::InvalidEnumValue {
                        field: $field.to_string(),
                        value: other.to_string(),
                    }),
                }
            }
        }
    };
}

text_enum!(
    /// Delivery/engagement state of the most recent email event
    EmailStatus, "email_status" {
        Pending => "pending",
        Sent => "sent",
        Delivered => "delivered",
        Opened => "opened",
        Clicked => "clicked",
        Replied => "replied",
        Bounced => "bounced",
        Failed => "failed",
    }
);

text_enum!(
    /// Coarse recipient response classification
    ResponseStatus, "response_status" {
        None => "none",
        Engaged => "engaged",
        Bounced => "bounced",
        Unsubscribed => "unsubscribed",
    }
);

text_enum!(
    /// Whether a recipient may still be contacted
    ///
    /// `Unsubscribed` is terminal.
    ActiveState, "is_active" {
        Active => "true",
        Paused => "paused",
        Unsubscribed => "unsubscribed",
    }
);

text_enum!(
    /// Kind of records a target list holds
    ListType, "list_type" {
        Prospect => "prospect",
        Profile => "profile",
    }
);

text_enum!(
    CampaignStatus, "campaign_status" {
        Draft => "draft",
        Active => "active",
        Paused => "paused",
        Completed => "completed",
    }
);

text_enum!(
    EnrollmentStatus, "enrollment_status" {
        Active => "active",
        Paused => "paused",
        Completed => "completed",
        Cancelled => "cancelled",
    }
);

impl ActiveState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, ActiveState::Unsubscribed)
    }
}
