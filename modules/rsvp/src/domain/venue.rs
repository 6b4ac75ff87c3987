/// Base of the map-search link opened by the "see on maps" action.
pub const MAPS_SEARCH_BASE: &str = "https://www.google.com/maps/search/?api=1&query=";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VenueKind {
    Ceremony,
    Reception,
}

impl VenueKind {
    pub fn key(self) -> &'static str {
        match self {
            VenueKind::Ceremony => "ceremony",
            VenueKind::Reception => "reception",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Venue {
    pub kind: VenueKind,
    pub name: String,
    pub address: String,
    pub time: Option<String>,
    /// Text searched on the map; usually name plus town.
    pub map_query: String,
}

impl Venue {
    pub fn map_url(&self) -> String {
        maps_search_url(&self.map_query)
    }
}

/// Map-search URL for a free-text place. Reserved characters are
/// percent-encoded, spaces as `%20`.
pub fn maps_search_url(query: &str) -> String {
    format!("{MAPS_SEARCH_BASE}{}", urlencoding::encode(query))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_place_into_query() {
        assert_eq!(
            maps_search_url("Villa i Tramonti Saludecio"),
            "https://www.google.com/maps/search/?api=1&query=Villa%20i%20Tramonti%20Saludecio"
        );
        assert_eq!(
            maps_search_url("A&B, 47835"),
            "https://www.google.com/maps/search/?api=1&query=A%26B%2C%2047835"
        );
    }
}
