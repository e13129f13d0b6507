//! Terms suggesting a query is outside the engine fault database

use serde::{Deserialize, Serialize};

use super::strings;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UnknownQueryLexicon {
    /// Non-engine equipment, systems and spaces
    pub specific_equipment: Vec<String>,
    /// Generic words pointing away from the engines
    pub non_engine_indicators: Vec<String>,
    /// Indicators never reported, they are common in engine faults too
    pub excluded_indicators: Vec<String>,
}

impl Default for UnknownQueryLexicon {
    fn default() -> Self {
        Self {
            specific_equipment: strings(&[
                // water systems
                "seawater", "sea water", "raw water", "ballast", "bilge", "freshwater",
                "potable water",
                // propulsion and steering
                "stern tube", "propeller shaft", "rudder", "thruster", "bow thruster", "azimuth",
                // deck
                "winch", "crane", "windlass", "mooring", "anchor", "davit", "hatch", "ramp",
                // navigation and electronics
                "radar", "sonar", "gps", "compass", "autopilot", "gyro", "ecdis", "vhf", "radio",
                // accommodation
                "ventilation", "hvac", "air conditioning", "galley", "accommodation", "cabin",
                // waste and sanitation
                "sewage", "waste", "incinerator", "garbage", "sanitary", "black water",
                "grey water",
                // spaces and structure
                "deck", "hull", "superstructure", "mast", "bridge", "engine room", "workshop",
                "cargo hold", "tank", "void space", "cofferdams",
                // other systems
                "hydraulic", "pneumatic", "oily water separator", "ows", "sewage treatment",
                "reverse osmosis", "ro plant", "fresh water generator", "fwg",
                // safety
                "fire", "sprinkler", "foam", "co2", "lifeboat", "life raft", "emergency",
                "alarm system", "public address", "pa system",
                // cargo
                "loading", "unloading", "cargo pump", "manifold", "pipeline",
            ]),
            non_engine_indicators: strings(&[
                "room",
                "space",
                "area",
                "compartment",
                "leak",
                "leakage",
                "flooding",
                "fire",
                "smoke detector",
                "alarm",
                "safety",
                "emergency",
                "spill",
            ]),
            excluded_indicators: strings(&["alarm"]),
        }
    }
}
