//! Connection state machine.
//!
//! The client walks through: Searching → Checking network → Connecting →
//! Connected. Each state is recognized from the text on screen.

use crate::automation::config::UiStrings;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// Looking for consoles on the local network
    SearchingForConnections,
    /// Probing network quality
    CheckingNetwork,
    /// Waking the console and opening the stream
    ConnectingConsole,
    /// Stream is up
    Connected,
    /// Sign-in prompt is showing
    NotSignedIn,
    /// None of the known status texts are on screen
    Unknown,
}

impl std::fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConnectionState::SearchingForConnections => write!(f, "Searching for connections"),
            ConnectionState::CheckingNetwork => write!(f, "Checking network"),
            ConnectionState::ConnectingConsole => write!(f, "Connecting console"),
            ConnectionState::Connected => write!(f, "Connected"),
            ConnectionState::NotSignedIn => write!(f, "Not signed in"),
            ConnectionState::Unknown => write!(f, "Unknown"),
        }
    }
}

impl ConnectionState {
    /// Progress message shown to the user when this state is entered.
    pub fn message(self) -> Option<&'static str> {
        match self {
            ConnectionState::SearchingForConnections => Some("Searching for connections..."),
            ConnectionState::CheckingNetwork => Some("Checking the network..."),
            ConnectionState::ConnectingConsole => Some("Connecting to PS5..."),
            ConnectionState::Connected => Some("Connected to PS5!"),
            ConnectionState::NotSignedIn => Some("Not signed in to PSN"),
            ConnectionState::Unknown => None,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, ConnectionState::Connected | ConnectionState::NotSignedIn)
    }
}

/// True if any recognized line contains any of the variants.
pub fn screen_contains(lines: &[String], variants: &[String]) -> bool {
    lines.iter().any(|line| {
        variants
            .iter()
            .any(|variant| !variant.is_empty() && line.contains(variant.as_str()))
    })
}

/// Maps the recognized screen text to a connection state.
pub fn classify(lines: &[String], strings: &UiStrings) -> ConnectionState {
    if screen_contains(lines, &strings.connected) {
        ConnectionState::Connected
    } else if screen_contains(lines, &strings.not_signed_in) {
        ConnectionState::NotSignedIn
    } else if screen_contains(lines, &strings.checking_network) {
        ConnectionState::CheckingNetwork
    } else if screen_contains(lines, &strings.connecting_console) {
        ConnectionState::ConnectingConsole
    } else if screen_contains(lines, &strings.searching_for_connections) {
        ConnectionState::SearchingForConnections
    } else {
        ConnectionState::Unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(text: &[&str]) -> Vec<String> {
        text.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_state_display() {
        assert_eq!(format!("{}", ConnectionState::CheckingNetwork), "Checking network");
        assert_eq!(format!("{}", ConnectionState::Unknown), "Unknown");
    }

    #[test]
    fn test_classify_each_state() {
        let strings = UiStrings::default();

        assert_eq!(
            classify(&lines(&["Searching for connections nearby..."]), &strings),
            ConnectionState::SearchingForConnections
        );
        assert_eq!(
            classify(&lines(&["Checking the network."]), &strings),
            ConnectionState::CheckingNetwork
        );
        assert_eq!(
            classify(&lines(&["Checking the network.."]), &strings),
            ConnectionState::CheckingNetwork
        );
        assert_eq!(
            classify(&lines(&["Connecting and turning on your PS5..."]), &strings),
            ConnectionState::ConnectingConsole
        );
        assert_eq!(
            classify(&lines(&["Your PS5 is connected using Remote Play."]), &strings),
            ConnectionState::Connected
        );
        assert_eq!(
            classify(&lines(&["Sign In to PSN"]), &strings),
            ConnectionState::NotSignedIn
        );
        assert_eq!(classify(&lines(&["Settings", "Quit"]), &strings), ConnectionState::Unknown);
        assert_eq!(classify(&[], &strings), ConnectionState::Unknown);
    }

    #[test]
    fn test_connected_wins_over_status_text() {
        let strings = UiStrings::default();
        let screen = lines(&["Checking the network...", "connected using Remote Play"]);
        assert_eq!(classify(&screen, &strings), ConnectionState::Connected);
    }

    #[test]
    fn test_custom_strings() {
        let strings = UiStrings {
            connected: vec!["Verbunden".to_string()],
            ..UiStrings::default()
        };
        assert_eq!(
            classify(&lines(&["Mit Remote Play Verbunden"]), &strings),
            ConnectionState::Connected
        );
        assert_eq!(
            classify(&lines(&["connected using Remote"]), &strings),
            ConnectionState::Unknown
        );
    }

    #[test]
    fn test_empty_variant_never_matches() {
        assert!(!screen_contains(&lines(&["anything"]), &["".to_string()]));
    }

    #[test]
    fn test_terminal_states() {
        assert!(ConnectionState::Connected.is_terminal());
        assert!(ConnectionState::NotSignedIn.is_terminal());
        assert!(!ConnectionState::CheckingNetwork.is_terminal());
        assert!(ConnectionState::Unknown.message().is_none());
    }
}
