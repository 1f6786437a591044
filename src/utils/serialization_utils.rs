use geo::Coord;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Points travel as `[[x, y], ...]` in every JSON shape this crate reads or writes.
pub mod coord_pairs_f64 {
    use super::*;

    pub fn serialize<S>(coords: &[Coord<f64>], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let pairs: Vec<[f64; 2]> = coords.iter().map(|c| [c.x, c.y]).collect();
        pairs.serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<Coord<f64>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let pairs: Vec<[f64; 2]> = Vec::deserialize(deserializer)?;
        Ok(pairs.into_iter().map(|[x, y]| Coord { x, y }).collect())
    }
}

/// Rectangles travel as `[x1, y1, x2, y2]`.
pub mod rect_array_f64 {
    use super::*;

    pub fn serialize<S>(min: Coord<f64>, max: Coord<f64>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        [min.x, min.y, max.x, max.y].serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<(Coord<f64>, Coord<f64>), D::Error>
    where
        D: Deserializer<'de>,
    {
        let [x1, y1, x2, y2] = <[f64; 4]>::deserialize(deserializer)?;
        Ok((Coord { x: x1, y: y1 }, Coord { x: x2, y: y2 }))
    }
}
