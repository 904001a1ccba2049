//! Request states.

use std::fmt;

/// States a request moves through, used as log and metric labels.
/// `Responded`, `RejectedParams`, `FetchFailed` and `TransformFailed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Received,
    Validated,
    Fetched,
    Transformed,
    Responded,
    RejectedParams,
    FetchFailed,
    TransformFailed,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Received => "received",
            Stage::Validated => "validated",
            Stage::Fetched => "fetched",
            Stage::Transformed => "transformed",
            Stage::Responded => "responded",
            Stage::RejectedParams => "rejected_params",
            Stage::FetchFailed => "fetch_failed",
            Stage::TransformFailed => "transform_failed",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_are_snake_case() {
        assert_eq!(Stage::Received.as_str(), "received");
        assert_eq!(Stage::RejectedParams.as_str(), "rejected_params");
        assert_eq!(Stage::TransformFailed.to_string(), "transform_failed");
    }

    #[test]
    fn test_labels_are_distinct() {
        let all = [
            Stage::Received,
            Stage::Validated,
            Stage::Fetched,
            Stage::Transformed,
            Stage::Responded,
            Stage::RejectedParams,
            Stage::FetchFailed,
            Stage::TransformFailed,
        ];
        let labels: std::collections::HashSet<_> = all.iter().map(Stage::as_str).collect();
        assert_eq!(labels.len(), all.len());
    }
}
