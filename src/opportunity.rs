//! Opportunity Record
//!
//! One synthetic sales-pipeline record and the categorical dimensions it is
//! sampled from. Every categorical type carries an `ALL` table in canonical
//! order; the generator samples by index into that table, so reordering the
//! variants changes generated output.

use chrono::{Datelike, NaiveDate};
use serde::{Serialize, Serializer};

/// Error returned when a dataset label does not name any known variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseLabelError {
    pub kind: &'static str,
    pub value: String,
}

impl std::fmt::Display for ParseLabelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown {} label: {:?}", self.kind, self.value)
    }
}

impl std::error::Error for ParseLabelError {}

macro_rules! label_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $kind:literal {
            $($variant:ident => $label:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            /// All variants in canonical order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Label used in the CSV export and reports.
            pub fn label(&self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.label())
            }
        }

        impl std::str::FromStr for $name {
            type Err = ParseLabelError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($label => Ok($name::$variant),)+
                    other => Err(ParseLabelError {
                        kind: $kind,
                        value: other.to_string(),
                    }),
                }
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.label())
            }
        }
    };
}

label_enum! {
    /// Sales region.
    Region, "region" {
        NorthAmerica => "North America",
        Emea => "EMEA",
        Apac => "APAC",
        LatinAmerica => "Latin America",
    }
}

label_enum! {
    /// Cybersecurity product line.
    Product, "product" {
        EndpointSecurity => "Endpoint Security",
        CloudSecurity => "Cloud Security",
        NetworkSecurity => "Network Security",
        IdentityManagement => "Identity Management",
        ThreatIntelligence => "Threat Intelligence",
        SecurityConsulting => "Security Consulting",
    }
}

label_enum! {
    /// Route to market.
    Channel, "channel" {
        DirectSales => "Direct Sales",
        VarPartner => "VAR Partner",
        MspPartner => "MSP Partner",
        Distributor => "Distributor",
        Online => "Online",
    }
}

label_enum! {
    /// Pipeline position. `ClosedWon` and `ClosedLost` are terminal.
    SalesStage, "sales stage" {
        Prospecting => "Prospecting",
        Qualification => "Qualification",
        Proposal => "Proposal",
        Negotiation => "Negotiation",
        ClosedWon => "Closed Won",
        ClosedLost => "Closed Lost",
    }
}

label_enum! {
    /// Marketing program the opportunity is attributed to.
    MarketingProgram, "marketing program" {
        EmailCampaign => "Email Campaign",
        Webinar => "Webinar",
        TradeShow => "Trade Show",
        PartnerReferral => "Partner Referral",
        Direct => "Direct",
        ContentDownload => "Content Download",
    }
}

impl SalesStage {
    /// Win probability implied by the stage, in percent.
    pub fn probability(&self) -> u8 {
        match self {
            Self::Prospecting => 20,
            Self::Qualification => 40,
            Self::Proposal => 60,
            Self::Negotiation => 80,
            Self::ClosedWon => 100,
            Self::ClosedLost => 0,
        }
    }

    pub fn is_won(&self) -> bool {
        matches!(self, Self::ClosedWon)
    }

    pub fn is_lost(&self) -> bool {
        matches!(self, Self::ClosedLost)
    }

    pub fn is_terminal(&self) -> bool {
        self.is_won() || self.is_lost()
    }
}

/// One synthetic sales-pipeline record.
///
/// Monetary fields are stored already rounded to cents, exactly as they are
/// exported.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Opportunity {
    pub id: String,
    pub created_date: NaiveDate,
    pub close_date: NaiveDate,
    pub region: Region,
    pub product: Product,
    pub channel: Channel,
    pub sales_stage: SalesStage,
    pub deal_size: f64,
    pub probability: u8,
    pub expected_revenue: f64,
    pub actual_revenue: f64,
    pub marketing_program: MarketingProgram,
    pub quarter: u32,
    pub month: u32,
}

impl Opportunity {
    /// Zero-padded sequential identifier, e.g. `OPP_00042`.
    pub fn format_id(index: usize) -> String {
        format!("OPP_{:05}", index)
    }

    /// Days between creation and expected close.
    pub fn cycle_days(&self) -> i64 {
        (self.close_date - self.created_date).num_days()
    }
}

/// Calendar quarter (1-4) of a date.
pub fn quarter_of(date: NaiveDate) -> u32 {
    (date.month() - 1) / 3 + 1
}

/// Round to two decimal places.
pub fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
