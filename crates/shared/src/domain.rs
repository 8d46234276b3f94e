use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! string_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_newtype!(BillId);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillSummary {
    pub bill_id: BillId,
    pub title: String,
}

/// The two mutually exclusive views of the results area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tab {
    #[default]
    Pdf,
    Analysis,
}

impl Tab {
    pub fn as_str(self) -> &'static str {
        match self {
            Tab::Pdf => "pdf",
            Tab::Analysis => "analysis",
        }
    }
}

/// Which input an analysis request was built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisSource {
    File,
    Pdf,
}

impl AnalysisSource {
    pub fn as_str(self) -> &'static str {
        match self {
            AnalysisSource::File => "file",
            AnalysisSource::Pdf => "pdf",
        }
    }
}
