//! Text-valued status enums stored as `TEXT` columns.
//!
//! Each enum serializes to the exact string persisted in the database, so the
//! same value flows through JSON bodies and SQL binds unchanged.

macro_rules! define_text_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $text:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        pub enum $name {
            $( $(#[$vmeta])* #[serde(rename = $text)] $variant ),+
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// The database / wire representation.
            pub fn as_str(self) -> &'static str {
                match self {
                    $( $name::$variant => $text ),+
                }
            }

            /// Parse the database / wire representation.
            pub fn parse(value: &str) -> Result<Self, $crate::error::CoreError> {
                match value {
                    $( $text => Ok($name::$variant), )+
                    other => Err($crate::error::CoreError::Validation(format!(
                        "Invalid {} '{other}'. Must be one of: {:?}",
                        stringify!($name),
                        [$($text),+]
                    ))),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

pub(crate) use define_text_enum;

define_text_enum! {
    /// Project lifecycle status.
    ProjectStatus {
        Planning => "planning",
        InProgress => "in_progress",
        OnHold => "on_hold",
        Completed => "completed",
    }
}

impl Default for ProjectStatus {
    fn default() -> Self {
        ProjectStatus::Planning
    }
}

define_text_enum! {
    /// Project priority.
    ProjectPriority {
        Low => "low",
        Medium => "medium",
        High => "high",
    }
}

impl Default for ProjectPriority {
    fn default() -> Self {
        ProjectPriority::Medium
    }
}

define_text_enum! {
    /// Where a material delivery currently stands.
    DeliveryStatus {
        Pending => "pending",
        InTransit => "in_transit",
        Delivered => "delivered",
        Cancelled => "cancelled",
    }
}

define_text_enum! {
    /// Supplier / material vetting outcome.
    VettingStatus {
        Pending => "pending",
        Approved => "approved",
        Rejected => "rejected",
    }
}

define_text_enum! {
    /// Severity of a user notification.
    NotificationKind {
        Info => "info",
        Success => "success",
        Warning => "warning",
        Error => "error",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use assert_matches::assert_matches;

    #[test]
    fn project_status_round_trips_through_text() {
        for status in ProjectStatus::ALL {
            assert_eq!(ProjectStatus::parse(status.as_str()).unwrap(), *status);
        }
    }

    #[test]
    fn unknown_value_is_a_validation_error() {
        assert_matches!(
            ProjectPriority::parse("urgent"),
            Err(CoreError::Validation(msg)) if msg.contains("urgent")
        );
    }

    #[test]
    fn serde_uses_database_spelling() {
        let json = serde_json::to_string(&DeliveryStatus::InTransit).unwrap();
        assert_eq!(json, "\"in_transit\"");
        let parsed: ProjectStatus = serde_json::from_str("\"on_hold\"").unwrap();
        assert_eq!(parsed, ProjectStatus::OnHold);
    }

    #[test]
    fn defaults() {
        assert_eq!(ProjectStatus::default(), ProjectStatus::Planning);
        assert_eq!(ProjectPriority::default(), ProjectPriority::Medium);
    }
}
