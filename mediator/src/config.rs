use std::fmt;
use std::str::FromStr;

/// What `publish` does when no handler is registered for a notification.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UnhandledNotification {
    /// Nobody listening is a valid state: the publish completes without
    /// invoking anything.
    #[default]
    Ignore,
    /// Treat a notification without handlers as a missing handler and fail
    /// with [`Error::NotFound`](crate::Error::NotFound).
    Reject,
}

impl UnhandledNotification {
    /// Name of the policy as accepted by `FromStr`.
    pub fn as_str(&self) -> &'static str {
        match *self {
            UnhandledNotification::Ignore => "ignore",
            UnhandledNotification::Reject => "reject",
        }
    }
}

impl fmt::Display for UnhandledNotification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown [`UnhandledNotification`] policy.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown unhandled notification policy `{0}`, expected `ignore` or `reject`")]
pub struct ParsePolicyError(String);

impl FromStr for UnhandledNotification {
    type Err = ParsePolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ignore" => Ok(UnhandledNotification::Ignore),
            "reject" => Ok(UnhandledNotification::Reject),
            _ => Err(ParsePolicyError(s.to_owned())),
        }
    }
}

/// Configuration of a mediator, fixed when the mediator is built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    /// Policy for notifications with no registered handler.
    pub unhandled_notification: UnhandledNotification,
}

impl Config {
    /// Constructs the default configuration.
    pub fn new() -> Self {
        Config::default()
    }

    /// Sets the policy for notifications with no registered handler.
    pub fn unhandled_notification(mut self, policy: UnhandledNotification) -> Self {
        self.unhandled_notification = policy;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_ignores_unhandled_notifications() {
        assert_eq!(UnhandledNotification::Ignore, Config::default().unhandled_notification);
    }

    #[test]
    fn parse_policy() {
        assert_eq!(Ok(UnhandledNotification::Reject), " Reject ".parse());
        assert_eq!(Ok(UnhandledNotification::Ignore), "ignore".parse());
        assert_eq!(
            Err(ParsePolicyError("drop".to_owned())),
            "drop".parse::<UnhandledNotification>()
        );
        assert_eq!("reject", UnhandledNotification::Reject.to_string());
    }
}
