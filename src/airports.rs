//! IATA code → airport name, from a table compiled into the binary.

use std::collections::HashMap;
use std::sync::LazyLock;

const AIRPORTS_CSV: &str = include_str!("../data/airports.csv");

static AIRPORTS: LazyLock<HashMap<&'static str, &'static str>> =
    LazyLock::new(|| index(AIRPORTS_CSV));

/// Build the lookup table from `IATA,Name` rows, keeping the first row per code.
fn index(csv: &'static str) -> HashMap<&'static str, &'static str> {
    let mut airports = HashMap::new();

    for line in csv.lines().skip(1) {
        let Some((code, name)) = line.split_once(',') else {
            continue;
        };
        let (code, name) = (code.trim(), name.trim());
        if code.is_empty() || name.is_empty() {
            continue;
        }
        airports.entry(code).or_insert(name);
    }

    airports
}

/// Display name of the airport with this IATA code.
pub fn airport_name(code: &str) -> Option<&'static str> {
    AIRPORTS.get(code).copied()
}
