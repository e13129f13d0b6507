//! Normalization tables: domain terms, abbreviations, spelling, stopwords

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};

const MARINE_TERMS: &[&str] = &[
    "hfo", "mdo", "lshfo", "lsfo", "vlsfo", "mgb", "mcr", "rpm", "turbocharger", "scavenge",
    "purifier", "aux", "auxiliary", "mgo", "lub", "lube", "fo", "lo", "kw", "kwh", "mlb", "ppm",
    "tbn", "tbnb", "hvac", "me", "ae", "dg", "genset", "lpg", "lng", "co2", "nox", "sox", "psi",
    "mpa", "bar", "kpa", "crankcase", "scavenging", "crosshead", "turbine", "compressor",
    "propeller", "injector", "boiler", "economizer", "evaporator", "viscosity", "classifier",
    "cooler", "intercooler", "aftercooler",
];

const MANUFACTURER_TERMS: &[&str] = &[
    "wartsila", "man", "sulzer", "yanmar", "caterpillar", "cat", "mak", "bergen", "rolls-royce",
    "rolls", "royce", "mitsubishi", "daihatsu", "cummins", "deutz", "pielstick", "abb",
    "woodward", "alfa", "laval", "alfalaval",
];

const ABBREVIATIONS: &[(&str, &str)] = &[
    ("temp", "temperature"),
    ("aux", "auxiliary"),
    ("lub", "lubricating"),
    ("lube", "lubricating"),
    ("fo", "fuel oil"),
    ("lo", "lubricating oil"),
    ("me", "main engine"),
    ("ae", "auxiliary engine"),
    ("dg", "diesel generator"),
    ("fw", "fresh water"),
    ("sw", "sea water"),
    ("t/c", "turbocharger"),
    ("tc", "turbocharger"),
    ("hx", "heat exchanger"),
    ("cw", "cooling water"),
    ("jw", "jacket water"),
    ("ps", "port side"),
    ("sb", "starboard"),
    ("stbd", "starboard"),
    ("hyd", "hydraulic"),
    ("sys", "system"),
    ("gen", "generator"),
    ("alt", "alternator"),
    ("pres", "pressure"),
    ("prs", "pressure"),
    ("press", "pressure"),
    ("vib", "vibration"),
    ("rpm", "revolutions per minute"),
    ("rev", "revolutions"),
    ("exh", "exhaust"),
    ("prop", "propeller"),
    ("eng", "engine"),
    ("diff", "differential"),
    ("temps", "temperatures"),
    ("op", "operating"),
];

const CORRECTIONS: &[(&str, &str)] = &[
    ("purifyer", "purifier"),
    ("purifiyer", "purifier"),
    ("turbochargar", "turbocharger"),
    ("exhoust", "exhaust"),
    ("exaust", "exhaust"),
    ("cylender", "cylinder"),
    ("cilinder", "cylinder"),
    ("comming", "coming"),
    ("maintenence", "maintenance"),
    ("maintenace", "maintenance"),
    ("leakege", "leakage"),
    ("shutingdown", "shutting down"),
    ("diesal", "diesel"),
];

/// Run-together contractions mapped straight to their expansion
const DIRECT_EXPANSIONS: &[(&str, &str)] = &[
    ("wont", "will not"),
    ("cant", "cannot"),
    ("isnt", "is not"),
    ("doesnt", "does not"),
];

const CONTRACTIONS: &[(&str, &str)] = &[
    ("can't", "cannot"),
    ("won't", "will not"),
    ("isn't", "is not"),
];

const NEGATORS: &[(&str, &str)] = &[
    ("not", "not"),
    ("no", "no"),
    ("n't", "not"),
    ("cannot", "not"),
];

const STOPWORDS: &[&str] = &[
    "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "you're", "you've",
    "you'll", "you'd", "your", "yours", "yourself", "yourselves", "he", "him", "his", "himself",
    "she", "she's", "her", "hers", "herself", "it", "it's", "its", "itself", "they", "them",
    "their", "theirs", "themselves", "what", "which", "who", "whom", "this", "that", "that'll",
    "these", "those", "am", "is", "are", "was", "were", "be", "been", "being", "have", "has",
    "had", "having", "do", "does", "did", "doing", "a", "an", "the", "and", "but", "if", "or",
    "because", "as", "until", "while", "of", "at", "by", "for", "with", "about", "against",
    "between", "into", "through", "during", "before", "after", "above", "below", "to", "from",
    "up", "down", "in", "out", "on", "off", "over", "under", "again", "further", "then", "once",
    "here", "there", "when", "where", "why", "how", "all", "any", "both", "each", "few", "more",
    "most", "other", "some", "such", "no", "nor", "not", "only", "own", "same", "so", "than",
    "too", "very", "s", "t", "can", "will", "just", "don", "don't", "should", "should've", "now",
    "d", "ll", "m", "o", "re", "ve", "y", "ain", "aren", "aren't", "couldn", "couldn't", "didn",
    "didn't", "doesn", "doesn't", "hadn", "hadn't", "hasn", "hasn't", "haven", "haven't", "isn",
    "isn't", "ma", "mightn", "mightn't", "mustn", "mustn't", "needn", "needn't", "shan",
    "shan't", "shouldn", "shouldn't", "wasn", "wasn't", "weren", "weren't", "won", "won't",
    "wouldn", "wouldn't",
];

/// Stopwords that carry polarity, intensity, direction or scope
const IMPORTANT_STOPWORDS: &[&str] = &[
    "not", "no", "nor", "than", "too", "very", "against", "down", "up", "over", "under", "is",
    "has", "have", "had", "all", "both",
];

/// Irregular plurals and words the suffix rules would damage
const LEMMA_EXCEPTIONS: &[(&str, &str)] = &[
    ("teeth", "tooth"),
    ("feet", "foot"),
    ("men", "man"),
    ("mice", "mouse"),
    ("gases", "gas"),
    ("indices", "index"),
    ("matrices", "matrix"),
    ("analyses", "analysis"),
    ("diagnoses", "diagnosis"),
    ("crises", "crisis"),
    ("axes", "axis"),
    ("halves", "half"),
    ("knives", "knife"),
    ("goes", "go"),
    ("series", "series"),
    ("species", "species"),
    ("chassis", "chassis"),
    ("always", "always"),
    ("perhaps", "perhaps"),
    ("towards", "towards"),
    ("afterwards", "afterwards"),
    ("lens", "lens"),
    ("bellows", "bellows"),
];

/// General English words operators use, so they are never "corrected"
/// into a nearby domain term
const VOCABULARY: &[&str] = &[
    // engines and machinery
    "engine", "main", "auxiliary", "generator", "diesel", "motor", "machine", "machinery",
    "pump", "valve", "pipe", "piping", "line", "filter", "strainer", "tank", "cylinder",
    "cylinders", "piston", "ring", "liner", "head", "cover", "crank", "crankshaft", "camshaft",
    "cam", "shaft", "bearing", "journal", "connecting", "rod", "gear", "gearbox", "coupling",
    "clutch", "flywheel", "governor", "actuator", "sensor", "gauge", "indicator", "thermometer",
    "switch", "relay", "breaker", "fuse", "cable", "wire", "battery", "starter", "alternator",
    "nozzle", "injection", "plunger", "barrel", "rack", "linkage", "spring", "seal", "gasket",
    "o-ring", "packing", "joint", "flange", "bolt", "nut", "stud", "plate", "block", "frame",
    "bedplate", "sump", "pan", "manifold", "receiver", "blower", "fan", "impeller", "rotor",
    "stator", "blade", "vane", "diffuser", "casing", "housing", "turbine", "charger",
    "air", "water", "oil", "fuel", "gas", "steam", "exhaust", "intake", "inlet", "outlet",
    "jacket", "cooling", "coolant", "cooler", "heater", "heat", "exchanger", "thermostat",
    "separator", "centrifuge", "purifier", "clarifier", "sludge", "residue", "deposit",
    "carbon", "soot", "ash", "scale", "corrosion", "rust", "erosion", "wear", "crack",
    "fracture", "deformation", "scoring", "scuffing", "seizure", "seized", "pitting",
    "fouling", "fouled", "blocked", "blockage", "clogged", "choked", "dirty", "contaminated",
    "contamination", "emulsion", "dilution", "system", "unit", "side", "port", "starboard",
    "hydraulic", "pneumatic", "electrical", "electric", "mechanical", "control", "panel",
    "alarm", "trip", "shutdown", "safety", "protection", "lubricating", "lubrication",
    "lubricant", "grease", "fresh", "sea", "raw", "charge", "scavenge", "boost", "compression",
    "combustion", "ignition", "firing", "timing", "clearance", "tappet", "rocker", "pushrod",
    "spindle", "seat", "guide", "chamber", "crosshead", "crankcase", "mist", "detector",
    "explosion", "relief", "vent", "breather", "drain", "level", "sight", "glass", "meter",
    "load", "power", "output", "speed", "revolution", "revolutions", "minute", "per", "torque",
    "frequency", "voltage", "current", "ampere", "amps", "volts", "hertz", "watt", "kilowatt",
    "degree", "degrees", "celsius", "fahrenheit", "percent", "hour", "hours", "second",
    "seconds", "day", "days", "week", "minutes", "pressure", "temperature", "temperatures",
    "flow", "rate", "volume", "quantity", "consumption", "viscosity", "density", "quality",
    "differential", "operating", "operation", "normal", "standby", "running", "idle", "idling",
    "full", "half", "partial", "maximum", "minimum", "rated", "nominal", "design",
    // symptoms and states
    "high", "higher", "highest", "low", "lower", "lowest", "increase", "increased",
    "increasing", "decrease", "decreased", "decreasing", "rise", "rising", "rises", "drop",
    "dropping", "drops", "dropped", "fall", "falling", "fell", "reduced", "reduction", "loss",
    "lost", "losing", "gain", "excessive", "excess", "insufficient", "inadequate", "poor",
    "abnormal", "unusual", "irregular", "erratic", "unstable", "fluctuating", "fluctuation",
    "fluctuate", "hunting", "surging", "surge", "overspeed", "overload", "overloaded",
    "overheating", "overheat", "overheated", "hot", "cold", "warm", "cool", "loud", "noisy",
    "noise", "sound", "knock", "knocking", "rattle", "rattling", "banging", "bang", "whining",
    "squealing", "hissing", "grinding", "vibration", "vibrating", "vibrate", "shaking",
    "rough", "smooth", "smoke", "smoking", "black", "white", "blue", "grey", "gray", "dark",
    "light", "heavy", "thick", "thin", "leak", "leaking", "leaks", "leaked", "leakage",
    "dripping", "drip", "seepage", "weeping", "spray", "spraying", "misfire", "misfiring",
    "backfire", "stall", "stalling", "stalled", "stop", "stops", "stopped", "stopping",
    "start", "starts", "started", "starting", "run", "runs", "ran", "work", "works", "worked",
    "working", "function", "functioning", "operate", "operates", "fail", "fails",
    "failed", "failing", "failure", "fault", "faulty", "defect", "defective", "damage",
    "damaged", "broken", "break", "burnt", "burned", "burning", "burn", "melted", "stuck",
    "sticking", "jammed", "loose", "tight", "worn", "bent", "missing", "empty", "flooded",
    "dry", "wet", "locked", "lock", "sudden", "suddenly", "gradual", "gradually",
    "intermittent", "continuous", "constant", "frequent", "occasional", "slow", "slowly",
    "fast", "quickly", "trouble", "problem", "problems", "issue", "issues", "wrong", "bad",
    "strange", "weird", "odd", "something", "anything", "nothing", "good", "fine", "okay",
    "acting", "kaput", "dead", "gone", "finished", "malfunction", "malfunctioning",
    "shutting", "coming", "maintenance", "overhaul", "repair", "replace", "replaced",
    "cleaning", "clean", "check", "checked", "inspect", "inspection", "adjust", "adjustment",
    "test", "reading", "readings", "value", "values", "alarms", "signal",
    // general words
    "after", "before", "during", "when", "while", "since", "also", "still", "even", "every",
    "each", "one", "two", "three", "four", "five", "six", "seven", "eight", "nine", "ten",
    "single", "multiple", "several", "many", "much", "little", "few", "first", "last", "next",
    "another", "other", "same", "different", "new", "old", "long", "short", "big", "small",
    "large", "need", "needs", "help", "please", "tell", "show", "find", "know", "think",
    "seems", "seem", "looks", "look", "getting", "get", "got", "keeps", "keep", "going",
    "become", "becomes", "became", "make", "makes", "making", "made", "give", "gives", "take",
    "takes", "come", "comes", "came", "go", "went", "cause", "causes", "caused", "reason",
    "why", "what", "which", "where", "how", "today", "yesterday", "now", "again",
    "already", "yet", "never", "sometimes", "often", "always", "around", "about", "near",
    "between", "across", "inside", "outside", "top", "bottom", "front", "rear", "back",
    "upper", "individual", "particular", "specific", "certain", "whole", "entire", "ship",
    "vessel", "room", "space", "area", "bridge", "deck", "hull", "voyage", "harbor",
    "harbour", "anchor", "cargo", "crew", "engineer", "chief", "officer", "watch",
    "log", "record", "manual", "maker", "instruction", "procedure", "cannot", "will", "would",
    "could", "should", "might", "must", "shall",
];

/// Tables used by the query normalizer
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizationLexicon {
    /// Marine and manufacturer terms, never spell-corrected
    pub domain_terms: HashSet<String>,
    /// Abbreviation token to full phrase
    pub abbreviations: HashMap<String, String>,
    /// Known marine misspellings
    pub corrections: HashMap<String, String>,
    /// Apostrophe-less contractions (`wont`, `cant`, ...)
    pub direct_expansions: HashMap<String, String>,
    /// Contractions expanded on the normalized text
    pub contractions: BTreeMap<String, String>,
    /// Negation token to the prefix it joins with
    pub negators: HashMap<String, String>,
    pub stopwords: HashSet<String>,
    /// Stopwords kept despite being in `stopwords`
    pub important_stopwords: HashSet<String>,
    pub lemma_exceptions: HashMap<String, String>,
    /// General vocabulary loaded into the spelling dictionary
    pub vocabulary: HashSet<String>,
}

fn set(items: &[&str]) -> HashSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn map<M: FromIterator<(String, String)>>(pairs: &[(&str, &str)]) -> M {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

impl Default for NormalizationLexicon {
    fn default() -> Self {
        Self {
            domain_terms: MARINE_TERMS
                .iter()
                .chain(MANUFACTURER_TERMS)
                .map(|s| s.to_string())
                .collect(),
            abbreviations: map(ABBREVIATIONS),
            corrections: map(CORRECTIONS),
            direct_expansions: map(DIRECT_EXPANSIONS),
            contractions: map(CONTRACTIONS),
            negators: map(NEGATORS),
            stopwords: set(STOPWORDS),
            important_stopwords: set(IMPORTANT_STOPWORDS),
            lemma_exceptions: map(LEMMA_EXCEPTIONS),
            vocabulary: set(VOCABULARY),
        }
    }
}

impl NormalizationLexicon {
    /// Stopword that should be dropped
    pub fn is_removable_stopword(&self, token: &str) -> bool {
        self.stopwords.contains(token) && !self.important_stopwords.contains(token)
    }
}
