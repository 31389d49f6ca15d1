//! TopoJSON decoding for the county topology document.
//!
//! The topology encodes county and state boundaries as shared, delta-encoded
//! arcs. Decoding expands each geometry's arc references into absolute
//! coordinates, producing filled county shapes and a deduplicated mesh of
//! state border lines.

use std::collections::BTreeSet;

use anyhow::{Context, Result, bail, ensure};
use geo::{Coord, LineString, MultiPolygon, Polygon};
use serde::Deserialize;

use crate::model::FipsCode;

/// Top-level TopoJSON document.
#[derive(Debug, Deserialize)]
pub struct Topology {
    #[serde(default)]
    pub transform: Option<Transform>,
    pub arcs: Vec<Vec<[f64; 2]>>,
    pub objects: Objects,
}

/// Quantization transform. When present, arc positions are delta-encoded
/// integers that must be accumulated, scaled, and translated.
#[derive(Debug, Deserialize)]
pub struct Transform {
    pub scale: [f64; 2],
    pub translate: [f64; 2],
}

#[derive(Debug, Deserialize)]
pub struct Objects {
    pub counties: GeometryCollection,
    pub states: GeometryCollection,
}

#[derive(Debug, Deserialize)]
pub struct GeometryCollection {
    pub geometries: Vec<TopoGeometry>,
}

/// A single geometry inside an object collection.
///
/// Arc references may be negative: `~i` denotes arc `i` traversed in
/// reverse.
#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
pub enum TopoGeometry {
    Polygon {
        #[serde(default)]
        id: Option<FipsCode>,
        arcs: Vec<Vec<i64>>,
    },
    MultiPolygon {
        #[serde(default)]
        id: Option<FipsCode>,
        arcs: Vec<Vec<Vec<i64>>>,
    },
}

impl TopoGeometry {
    pub fn id(&self) -> Option<&FipsCode> {
        match self {
            TopoGeometry::Polygon { id, .. } | TopoGeometry::MultiPolygon { id, .. } => id.as_ref(),
        }
    }

    /// All arc references used by this geometry, in order.
    fn arc_refs(&self) -> Vec<i64> {
        match self {
            TopoGeometry::Polygon { arcs, .. } => arcs.iter().flatten().copied().collect(),
            TopoGeometry::MultiPolygon { arcs, .. } => {
                arcs.iter().flatten().flatten().copied().collect()
            }
        }
    }
}

/// One county boundary with its identifier, ready for joining and drawing.
#[derive(Debug, Clone)]
pub struct CountyShape {
    pub id: FipsCode,
    pub shape: MultiPolygon<f64>,
}

/// Fully decoded topology: filled county shapes plus state border lines.
#[derive(Debug)]
pub struct DecodedTopology {
    pub counties: Vec<CountyShape>,
    pub state_borders: Vec<LineString<f64>>,
}

impl Topology {
    /// Expands the topology into drawable geometry.
    ///
    /// # Errors
    ///
    /// Fails if a county geometry has no `id`, an arc reference is out of
    /// bounds, or a polygon has no rings.
    pub fn decode(&self) -> Result<DecodedTopology> {
        let mut counties = Vec::with_capacity(self.objects.counties.geometries.len());

        for geometry in &self.objects.counties.geometries {
            let shape = match geometry {
                TopoGeometry::Polygon { arcs, .. } => MultiPolygon(vec![self.polygon(arcs)?]),
                TopoGeometry::MultiPolygon { arcs, .. } => MultiPolygon(
                    arcs.iter()
                        .map(|rings| self.polygon(rings))
                        .collect::<Result<Vec<_>>>()?,
                ),
            };
            let id = geometry
                .id()
                .cloned()
                .context("county geometry is missing an id")?;
            counties.push(CountyShape { id, shape });
        }

        let state_borders = self.mesh(&self.objects.states)?;

        Ok(DecodedTopology {
            counties,
            state_borders,
        })
    }

    /// Decodes the boundary mesh of an object collection: every arc used by
    /// the collection, each traversed exactly once regardless of how many
    /// geometries share it.
    fn mesh(&self, collection: &GeometryCollection) -> Result<Vec<LineString<f64>>> {
        let mut indices = BTreeSet::new();
        for geometry in &collection.geometries {
            for reference in geometry.arc_refs() {
                indices.insert(resolve_index(reference));
            }
        }

        indices
            .into_iter()
            .map(|index| Ok(LineString::from(self.arc_points(index as i64)?)))
            .collect()
    }

    fn polygon(&self, rings: &[Vec<i64>]) -> Result<Polygon<f64>> {
        ensure!(!rings.is_empty(), "polygon has no rings");
        let mut decoded = rings
            .iter()
            .map(|ring| self.ring(ring))
            .collect::<Result<Vec<_>>>()?;
        let exterior = decoded.remove(0);
        Ok(Polygon::new(exterior, decoded))
    }

    /// Stitches a ring from its arc references. Consecutive arcs share their
    /// junction point, so the first point of every arc after the first is
    /// dropped.
    fn ring(&self, references: &[i64]) -> Result<LineString<f64>> {
        let mut coords: Vec<Coord<f64>> = Vec::new();
        for &reference in references {
            let points = self.arc_points(reference)?;
            let skip = usize::from(!coords.is_empty());
            coords.extend(points.into_iter().skip(skip));
        }
        ensure!(coords.len() >= 4, "ring has fewer than 4 points");
        Ok(LineString::from(coords))
    }

    /// Decodes a single arc into absolute coordinates, honoring the
    /// quantization transform and reversed references.
    fn arc_points(&self, reference: i64) -> Result<Vec<Coord<f64>>> {
        let index = resolve_index(reference);
        let Some(raw) = self.arcs.get(index) else {
            bail!("arc index {index} out of bounds ({} arcs)", self.arcs.len());
        };

        let mut points = Vec::with_capacity(raw.len());
        match &self.transform {
            Some(transform) => {
                let (mut x, mut y) = (0.0, 0.0);
                for position in raw {
                    x += position[0];
                    y += position[1];
                    points.push(Coord {
                        x: x * transform.scale[0] + transform.translate[0],
                        y: y * transform.scale[1] + transform.translate[1],
                    });
                }
            }
            None => {
                for position in raw {
                    points.push(Coord {
                        x: position[0],
                        y: position[1],
                    });
                }
            }
        }

        if reference < 0 {
            points.reverse();
        }
        Ok(points)
    }
}

/// Maps an arc reference to its index: `~i` (encoded as a negative value)
/// refers to arc `i` reversed.
fn resolve_index(reference: i64) -> usize {
    if reference < 0 {
        !reference as usize
    } else {
        reference as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square_topology() -> Topology {
        // Two unit-ish squares sharing no edges, quantized with an identity
        // transform. Arc 0 closes the ring for county "01001"; arc 1 for
        // county 1003 (a numeric id in the source JSON).
        let json = r#"{
            "type": "Topology",
            "transform": { "scale": [1, 1], "translate": [0, 0] },
            "arcs": [
                [[0, 0], [10, 0], [0, 10], [-10, 0], [0, -10]],
                [[20, 0], [10, 0], [0, 10], [-10, 0], [0, -10]]
            ],
            "objects": {
                "counties": {
                    "type": "GeometryCollection",
                    "geometries": [
                        { "type": "Polygon", "id": "01001", "arcs": [[0]] },
                        { "type": "Polygon", "id": 1003, "arcs": [[1]] }
                    ]
                },
                "states": {
                    "type": "GeometryCollection",
                    "geometries": [
                        { "type": "Polygon", "arcs": [[0], [1]] },
                        { "type": "Polygon", "arcs": [[1]] }
                    ]
                }
            }
        }"#;
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_delta_decoding_accumulates_positions() {
        let topology = square_topology();
        let points = topology.arc_points(0).unwrap();
        assert_eq!(points[0], Coord { x: 0.0, y: 0.0 });
        assert_eq!(points[1], Coord { x: 10.0, y: 0.0 });
        assert_eq!(points[2], Coord { x: 10.0, y: 10.0 });
        assert_eq!(points[3], Coord { x: 0.0, y: 10.0 });
        assert_eq!(points[4], Coord { x: 0.0, y: 0.0 });
    }

    #[test]
    fn test_transform_scales_and_translates() {
        let mut topology = square_topology();
        topology.transform = Some(Transform {
            scale: [0.5, 2.0],
            translate: [100.0, -5.0],
        });
        let points = topology.arc_points(0).unwrap();
        assert_eq!(points[0], Coord { x: 100.0, y: -5.0 });
        assert_eq!(points[1], Coord { x: 105.0, y: -5.0 });
        assert_eq!(points[2], Coord { x: 105.0, y: 15.0 });
    }

    #[test]
    fn test_negative_reference_reverses_arc() {
        let topology = square_topology();
        let forward = topology.arc_points(0).unwrap();
        let reversed = topology.arc_points(!0).unwrap();
        let mut expected = forward.clone();
        expected.reverse();
        assert_eq!(reversed, expected);
    }

    #[test]
    fn test_decode_produces_counties_with_ids() {
        let topology = square_topology();
        let decoded = topology.decode().unwrap();
        assert_eq!(decoded.counties.len(), 2);
        assert_eq!(decoded.counties[0].id, FipsCode::from("01001"));
        assert_eq!(decoded.counties[1].id, FipsCode::from(1003u64));
        // Each county is a closed square: 5 coords in the exterior ring.
        assert_eq!(decoded.counties[0].shape.0[0].exterior().0.len(), 5);
    }

    #[test]
    fn test_mesh_deduplicates_shared_arcs() {
        let topology = square_topology();
        let decoded = topology.decode().unwrap();
        // Arc 1 is referenced by both state geometries but appears once.
        assert_eq!(decoded.state_borders.len(), 2);
    }

    #[test]
    fn test_out_of_bounds_arc_fails() {
        let topology = square_topology();
        assert!(topology.arc_points(7).is_err());
    }

    #[test]
    fn test_county_without_id_fails_decode() {
        let json = r#"{
            "arcs": [[[0, 0], [10, 0], [0, 10], [-10, 0], [0, -10]]],
            "objects": {
                "counties": {
                    "geometries": [{ "type": "Polygon", "arcs": [[0]] }]
                },
                "states": { "geometries": [] }
            }
        }"#;
        let topology: Topology = serde_json::from_str(json).unwrap();
        assert!(topology.decode().is_err());
    }

    #[test]
    fn test_untransformed_arcs_are_absolute() {
        let json = r#"{
            "arcs": [[[1.5, 2.5], [3.5, 2.5]]],
            "objects": {
                "counties": { "geometries": [] },
                "states": { "geometries": [] }
            }
        }"#;
        let topology: Topology = serde_json::from_str(json).unwrap();
        let points = topology.arc_points(0).unwrap();
        assert_eq!(points[0], Coord { x: 1.5, y: 2.5 });
        assert_eq!(points[1], Coord { x: 3.5, y: 2.5 });
    }
}
