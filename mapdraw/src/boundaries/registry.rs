use crate::model::{LatLng, LatLngBounds};
use serde::Serialize;

/// Static regional boundary.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundaryDefinition {
    pub id: &'static str,
    pub name: &'static str,
    pub bounds: LatLngBounds,
    pub center: LatLng,
    pub default_zoom: f64,
    pub min_zoom: f64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct BoundaryName {
    pub id: &'static str,
    pub name: &'static str,
}

// id, name, [minLat, minLng, maxLat, maxLng], [lat, lng], default zoom
type Row = (&'static str, &'static str, [f64; 4], [f64; 2], f64);

// Declaration order is the detector tie-break.
const BRAZIL: [Row; 27] = [
    ("ac", "Acre", [-11.1452, -73.9904, -7.1118, -66.6206], [-9.1285, -70.3055], 7.0),
    ("al", "Alagoas", [-10.5009, -38.2376, -8.8131, -35.1522], [-9.657, -36.6949], 8.0),
    ("ap", "Amapá", [-1.2356, -54.8761, 4.4371, -49.8732], [1.6007, -52.3746], 7.0),
    ("am", "Amazonas", [-9.818, -73.8015, 2.2466, -56.0975], [-3.7857, -64.9495], 7.0),
    ("ba", "Bahia", [-18.3484, -46.6171, -8.5328, -37.3484], [-13.4406, -41.9827], 7.0),
    ("ce", "Ceará", [-7.8582, -41.4233, -2.7842, -37.253], [-5.3212, -39.3381], 7.0),
    ("df", "Distrito Federal", [-16.0518, -48.2871, -15.5002, -47.3082], [-15.776, -47.7977], 9.0),
    ("es", "Espírito Santo", [-21.3018, -41.8797, -17.8919, -39.6639], [-19.5968, -40.7718], 8.0),
    ("go", "Goiás", [-19.4991, -53.2488, -12.3956, -45.9069], [-15.9473, -49.5778], 7.0),
    ("ma", "Maranhão", [-10.2618, -48.7551, -1.045, -41.7963], [-5.6534, -45.2757], 7.0),
    ("mt", "Mato Grosso", [-18.0416, -61.6331, -7.349, -50.2248], [-12.6953, -55.9289], 7.0),
    ("ms", "Mato Grosso do Sul", [-24.0689, -58.167, -17.1666, -50.9231], [-20.6177, -54.545], 7.0),
    ("mg", "Minas Gerais", [-22.9227, -51.0461, -14.2332, -39.8568], [-18.5779, -45.4514], 7.0),
    ("pa", "Pará", [-9.8412, -58.8983, 2.591, -46.0609], [-3.6251, -52.4796], 7.0),
    ("pb", "Paraíba", [-8.3029, -38.7656, -6.0259, -34.7931], [-7.1644, -36.7793], 8.0),
    ("pr", "Paraná", [-26.7171, -54.6193, -22.5163, -48.0235], [-24.6167, -51.3214], 7.0),
    ("pe", "Pernambuco", [-9.4829, -41.3583, -7.2625, -34.7931], [-8.3727, -38.0757], 7.0),
    ("pi", "Piauí", [-10.9287, -45.9942, -2.7473, -40.3705], [-6.838, -43.1823], 7.0),
    ("rj", "Rio de Janeiro", [-23.3689, -44.894, -20.7632, -40.9568], [-22.066, -42.9254], 8.0),
    ("rn", "Rio Grande do Norte", [-6.9827, -38.5818, -4.8317, -34.9686], [-5.9072, -36.7752], 8.0),
    ("rs", "Rio Grande do Sul", [-33.7511, -57.6497, -27.0823, -49.6916], [-30.4167, -53.6706], 7.0),
    ("ro", "Rondônia", [-13.6937, -66.8102, -7.9693, -59.7743], [-10.8315, -63.2922], 7.0),
    ("rr", "Roraima", [-1.5806, -64.8252, 5.2718, -58.8863], [1.8456, -61.8557], 7.0),
    ("sc", "Santa Catarina", [-29.3514, -53.8366, -25.9557, -48.3489], [-27.6535, -51.0927], 7.0),
    ("sp", "São Paulo", [-25.3207, -53.1101, -19.7797, -44.1614], [-22.5502, -48.6357], 7.0),
    ("se", "Sergipe", [-11.5685, -38.2458, -9.515, -36.4177], [-10.5417, -37.3317], 9.0),
    ("to", "Tocantins", [-13.4677, -50.7421, -5.1684, -45.6983], [-9.318, -48.2202], 7.0),
];

/// Zoom-out allowance below a region's default zoom.
pub const MIN_ZOOM_SLACK: f64 = 2.0;

/// Ordered, read-only set of boundary definitions.
#[derive(Clone, Debug)]
pub struct BoundaryRegistry {
    entries: Vec<BoundaryDefinition>,
}

impl BoundaryRegistry {
    /// The Brazilian federative units. `zoom_floor` is the map-wide minimum zoom.
    pub fn brazil(zoom_floor: f64) -> Self {
        let entries = BRAZIL
            .iter()
            .map(|&(id, name, b, c, default_zoom)| BoundaryDefinition {
                id,
                name,
                bounds: LatLngBounds::new(LatLng::new(b[0], b[1]), LatLng::new(b[2], b[3])),
                center: LatLng::new(c[0], c[1]),
                default_zoom,
                min_zoom: (default_zoom - MIN_ZOOM_SLACK).max(zoom_floor),
            })
            .collect();
        BoundaryRegistry { entries }
    }

    pub fn from_definitions(entries: Vec<BoundaryDefinition>) -> Self {
        BoundaryRegistry { entries }
    }

    /// Keeps only `allowed` ids, preserving declaration order. `None` keeps everything.
    pub fn restricted_to(mut self, allowed: Option<&[String]>) -> Self {
        if let Some(allowed) = allowed {
            self.entries.retain(|d| allowed.iter().any(|a| a == d.id));
        }
        self
    }

    pub fn get(&self, id: &str) -> Option<&BoundaryDefinition> {
        self.entries.iter().find(|d| d.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &BoundaryDefinition> {
        self.entries.iter()
    }

    pub fn all_ids(&self) -> Vec<&'static str> {
        self.entries.iter().map(|d| d.id).collect()
    }

    pub fn names(&self) -> Vec<BoundaryName> {
        self.entries.iter().map(|d| BoundaryName { id: d.id, name: d.name }).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for BoundaryRegistry {
    fn default() -> Self {
        BoundaryRegistry::brazil(5.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn brazil_has_all_units_in_order() {
        let r = BoundaryRegistry::default();
        let ids = r.all_ids();
        assert_eq!(ids.len(), 27);
        assert_eq!(ids.first(), Some(&"ac"));
        assert_eq!(ids.last(), Some(&"to"));
        assert!(r.iter().all(|d| d.bounds.contains(d.center)));
    }

    #[test]
    fn min_zoom_respects_floor() {
        let r = BoundaryRegistry::brazil(5.0);
        assert_eq!(r.get("df").unwrap().min_zoom, 7.0);
        assert_eq!(r.get("am").unwrap().min_zoom, 5.0);
        let strict = BoundaryRegistry::brazil(6.0);
        assert_eq!(strict.get("am").unwrap().min_zoom, 6.0);
    }

    #[test]
    fn restriction_keeps_declaration_order() {
        let allowed = vec!["sp".to_string(), "go".to_string(), "xx".to_string()];
        let r = BoundaryRegistry::default().restricted_to(Some(&allowed));
        assert_eq!(r.all_ids(), vec!["go", "sp"]);
        assert!(r.get("mt").is_none());
        assert_eq!(r.names()[1], BoundaryName { id: "sp", name: "São Paulo" });
    }
}
