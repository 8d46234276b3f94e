//! Choices offered by the topic and state selectors.

pub const TOPICS: [&str; 3] = [
    "Reproductive Rights",
    "Economic Equality",
    "Safety and Security",
];

pub const US_STATES: [&str; 51] = [
    "US/Federal", "AL", "AK", "AZ", "AR", "CA", "CO", "CT", "DE", "FL", "GA", "HI", "ID", "IL",
    "IN", "IA", "KS", "KY", "LA", "ME", "MD", "MA", "MI", "MN", "MS", "MO", "MT", "NE", "NV", "NH",
    "NJ", "NM", "NY", "NC", "ND", "OH", "OK", "OR", "PA", "RI", "SC", "SD", "TN", "TX", "UT", "VT",
    "VA", "WA", "WV", "WI", "WY",
];

pub fn is_known_topic(topic: &str) -> bool {
    TOPICS.contains(&topic)
}

pub fn is_known_state(state: &str) -> bool {
    US_STATES.contains(&state)
}
