//! Station identifier to display name lookup.

use std::collections::HashMap;

/// Name returned for identifiers the directory does not know.
pub const UNKNOWN_STATION: &str = "Unknown Station";

/// Météo-France SYNOP stations, by WMO identifier.
pub const BUILTIN_STATIONS: &[(&str, &str)] = &[
    ("07005", "ABBEVILLE"),
    ("07015", "LILLE-LESQUIN"),
    ("07020", "PTE DE LA HAGUE"),
    ("07027", "CAEN-CARPIQUET"),
    ("07037", "ROUEN-BOOS"),
    ("07072", "REIMS-PRUNAY"),
    ("07110", "BREST-GUIPAVAS"),
    ("07117", "PLOUMANAC'H"),
    ("07130", "RENNES-ST JACQUES"),
    ("07139", "ALENCON"),
    ("07149", "ORLY"),
    ("07168", "TROYES-BARBEREY"),
    ("07181", "NANCY-OCHEY"),
    ("07190", "STRASBOURG-ENTZHEIM"),
    ("07207", "BELLE ILE-LE TALUT"),
    ("07222", "NANTES-BOUGUENAIS"),
    ("07240", "TOURS"),
    ("07255", "BOURGES"),
    ("07280", "DIJON-LONGVIC"),
    ("07299", "BALE-MULHOUSE"),
    ("07314", "PTE DE CHASSIRON"),
    ("07335", "POITIERS-BIARD"),
    ("07434", "LIMOGES-BELLEGARDE"),
    ("07460", "CLERMONT-FD"),
    ("07471", "LE PUY-LOUDES"),
    ("07481", "LYON-ST EXUPERY"),
    ("07510", "BORDEAUX-MERIGNAC"),
    ("07535", "GOURDON"),
    ("07558", "MILLAU"),
    ("07577", "MONTELIMAR"),
    ("07591", "EMBRUN"),
    ("07607", "MONT-DE-MARSAN"),
    ("07621", "TARBES-OSSUN"),
    ("07627", "ST GIRONS"),
    ("07630", "TOULOUSE-BLAGNAC"),
    ("07643", "MONTPELLIER"),
    ("07650", "MARIGNANE"),
    ("07661", "CAP CEPET"),
    ("07690", "NICE"),
    ("07747", "PERPIGNAN"),
    ("07761", "AJACCIO"),
    ("07790", "BASTIA"),
    ("61968", "GLORIEUSES"),
    ("61970", "JUAN DE NOVA"),
    ("61972", "EUROPA"),
    ("61976", "TROMELIN"),
    ("61980", "GILLOT-AEROPORT"),
    ("61996", "NOUVELLE AMSTERDAM"),
    ("61997", "CROZET"),
    ("61998", "KERGUELEN"),
    ("67005", "PAMANDZI"),
    ("71805", "ST-PIERRE"),
    ("78890", "LA DESIRADE METEO"),
    ("78894", "ST-BARTHELEMY METEO"),
    ("78897", "LE RAIZET AERO"),
    ("78922", "TRINITE-CARAVEL"),
    ("78925", "LAMENTIN-AERO"),
    ("81401", "SAINT LAURENT"),
    ("81405", "CAYENNE-MATOURY"),
    ("81408", "SAINT GEORGES"),
    ("81415", "MARIPASOULA"),
    ("89642", "DUMONT D'URVILLE"),
];

/// Immutable station name lookup.
///
/// Built once at startup and shared with the query engine; lookups never fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StationDirectory {
    names: HashMap<String, String>,
}

impl StationDirectory {
    /// Directory holding the built-in station list.
    #[must_use]
    pub fn builtin() -> Self {
        Self::from_entries(BUILTIN_STATIONS.iter().copied())
    }

    /// Directory built from explicit pairs.
    #[must_use]
    pub fn from_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            names: entries
                .into_iter()
                .map(|(id, name)| (id.into(), name.into()))
                .collect(),
        }
    }

    /// Add or replace entries (builder pattern).
    #[must_use]
    pub fn with_overrides(mut self, overrides: &HashMap<String, String>) -> Self {
        self.names
            .extend(overrides.iter().map(|(id, name)| (id.clone(), name.clone())));
        self
    }

    /// Display name for a station identifier.
    #[must_use]
    pub fn resolve(&self, station: &str) -> &str {
        self.names
            .get(station)
            .map_or(UNKNOWN_STATION, String::as_str)
    }

    /// Number of known stations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether the directory has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl Default for StationDirectory {
    fn default() -> Self {
        Self::builtin()
    }
}
