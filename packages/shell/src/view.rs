//! # Screens the shell can show
//!
//! [`View`] is the closed set of feature screens the view-dispatch layer
//! knows how to mount. Every view has a kebab-case id (`"ai-insights"`) used
//! on the navigation bus, in voice commands and in serialized state.
//!
//! Parsing comes in two flavours:
//!
//! - [`str::parse`] is strict and returns [`UnknownView`].
//! - [`View::parse_or_default`] never fails: anything unrecognised becomes
//!   [`View::Dashboard`]. Deserialization uses this flavour too, so a stale
//!   or mistyped view id can never leave the shell without a screen.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown view `{0}`")]
pub struct UnknownView(pub String);

macro_rules! views {
    ($($variant:ident => $id:literal,)+) => {
        /// Screen identifier.
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
        pub enum View {
            #[default]
            $($variant,)+
        }

        impl View {
            /// Every view, dashboard first.
            pub const ALL: &'static [View] = &[$(View::$variant,)+];

            /// Kebab-case identifier.
            pub fn as_str(self) -> &'static str {
                match self {
                    $(View::$variant => $id,)+
                }
            }
        }

        impl FromStr for View {
            type Err = UnknownView;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim() {
                    $($id => Ok(View::$variant),)+
                    other => Err(UnknownView(other.to_string())),
                }
            }
        }
    };
}

views! {
    Dashboard => "dashboard",
    AiAssistant => "ai-assistant",
    Telemedicine => "telemedicine",
    Forum => "forum",
    Wearables => "wearables",
    PriceComparison => "price-comparison",
    MentalHealth => "mental-health",
    ResourceFinder => "resource-finder",
    SymptomChecker => "symptom-checker",
    EmergencyMode => "emergency-mode",
    MedicationReminders => "medication-reminders",
    Profile => "profile",
    FamilyHub => "family-hub",
    MedicineIdentifier => "medicine-identifier",
    InclusiveBridge => "inclusive-bridge",
    Vitals => "vitals",
    AshaConnect => "asha-connect",
    MedicalCamps => "medical-camps",
    HealthSchemes => "health-schemes",
    HealthRecords => "health-records",
    HealthPlan => "health-plan",
    AiInsights => "ai-insights",
    PredictiveAnalytics => "predictive-analytics",
    GenomicAnalysis => "genomic-analysis",
    QuickCommunicate => "quick-communicate",
    Cart => "cart",
    Favorites => "favorites",
}

impl View {
    /// Parse a view id, falling back to the dashboard.
    pub fn parse_or_default(s: &str) -> Self {
        s.parse().unwrap_or_else(|e: UnknownView| {
            warn!(error = %e, "falling back to dashboard");
            View::Dashboard
        })
    }

    /// Human-readable name for speech: separators become spaces.
    pub fn spoken_name(self) -> String {
        self.as_str().replace('-', " ")
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for View {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for View {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let id = String::deserialize(deserializer)?;
        Ok(View::parse_or_default(&id))
    }
}
