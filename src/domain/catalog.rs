//! Country and indicator lookup tables.
//!
//! The core only ever sees provider codes. Front-ends hold a `Catalog` (built
//! once at startup and never mutated) to map the names a user picks to codes.

/// A display name paired with its provider code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub name: String,
    pub code: String,
}

impl Entry {
    fn new(name: &str, code: &str) -> Self {
        Self {
            name: name.to_string(),
            code: code.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    countries: Vec<Entry>,
    indicators: Vec<Entry>,
}

pub const DEFAULT_COUNTRY: &str = "United Kingdom";
pub const DEFAULT_INDICATOR: &str = "GDP (current US$)";

impl Catalog {
    pub fn new(countries: Vec<Entry>, indicators: Vec<Entry>) -> Self {
        Self {
            countries,
            indicators,
        }
    }

    /// The countries and indicators the application ships with.
    pub fn builtin() -> Self {
        let countries = [
            ("Australia", "AUS"),
            ("Brazil", "BRA"),
            ("Canada", "CAN"),
            ("China", "CHN"),
            ("France", "FRA"),
            ("Germany", "DEU"),
            ("India", "IND"),
            ("Italy", "ITA"),
            ("Japan", "JPN"),
            ("Mexico", "MEX"),
            ("Netherlands", "NLD"),
            ("South Korea", "KOR"),
            ("Spain", "ESP"),
            ("United Kingdom", "GBR"),
            ("United States", "USA"),
        ];
        let indicators = [
            ("GDP (current US$)", "NY.GDP.MKTP.CD"),
            ("GDP growth (annual %)", "NY.GDP.MKTP.KD.ZG"),
            ("GDP per capita (current US$)", "NY.GDP.PCAP.CD"),
            ("Inflation, consumer prices (annual %)", "FP.CPI.TOTL.ZG"),
            ("Population, total", "SP.POP.TOTL"),
            ("Unemployment, total (% of labor force)", "SL.UEM.TOTL.ZS"),
        ];
        Self::new(
            countries.iter().map(|(n, c)| Entry::new(n, c)).collect(),
            indicators.iter().map(|(n, c)| Entry::new(n, c)).collect(),
        )
    }

    pub fn countries(&self) -> &[Entry] {
        &self.countries
    }

    pub fn indicators(&self) -> &[Entry] {
        &self.indicators
    }

    /// Find a country by display name (case-insensitive) or code.
    pub fn country(&self, key: &str) -> Option<&Entry> {
        lookup(&self.countries, key)
    }

    /// Find an indicator by display name (case-insensitive) or code.
    pub fn indicator(&self, key: &str) -> Option<&Entry> {
        lookup(&self.indicators, key)
    }

    pub fn country_index(&self, key: &str) -> Option<usize> {
        position(&self.countries, key)
    }

    pub fn indicator_index(&self, key: &str) -> Option<usize> {
        position(&self.indicators, key)
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

fn position(entries: &[Entry], key: &str) -> Option<usize> {
    let key = key.trim();
    entries
        .iter()
        .position(|e| e.code == key)
        .or_else(|| entries.iter().position(|e| e.name.eq_ignore_ascii_case(key)))
}

fn lookup<'a>(entries: &'a [Entry], key: &str) -> Option<&'a Entry> {
    position(entries, key).map(|i| &entries[i])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_by_name_or_code() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.country("GBR").map(|e| e.name.as_str()), Some("United Kingdom"));
        assert_eq!(catalog.country("united kingdom").map(|e| e.code.as_str()), Some("GBR"));
        assert_eq!(
            catalog.indicator("Population, total").map(|e| e.code.as_str()),
            Some("SP.POP.TOTL")
        );
        assert_eq!(
            catalog.indicator("FP.CPI.TOTL.ZG").map(|e| e.name.as_str()),
            Some("Inflation, consumer prices (annual %)")
        );
        assert!(catalog.country("Atlantis").is_none());
    }

    #[test]
    fn defaults_are_in_the_builtin_tables() {
        let catalog = Catalog::builtin();
        assert!(catalog.country_index(DEFAULT_COUNTRY).is_some());
        assert!(catalog.indicator_index(DEFAULT_INDICATOR).is_some());
        assert_eq!(catalog.countries().len(), 15);
        assert_eq!(catalog.indicators().len(), 6);
    }
}
