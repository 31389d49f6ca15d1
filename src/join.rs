//! Joins county geometries with education records on the FIPS identifier.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use anyhow::{Result, bail};
use tracing::warn;

use crate::model::{EducationRecord, FipsCode, JoinedCounty};
use crate::topology::CountyShape;

/// How to handle a county geometry with no matching education record.
///
/// The upstream data carries exactly one education row per county, but that
/// guarantee is not enforced anywhere, so the policy is explicit: `Strict`
/// fails the whole join, `Lenient` drops the geometry with a warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinPolicy {
    Strict,
    Lenient,
}

/// Matches each county geometry with the education record sharing its FIPS
/// code.
///
/// Output order follows the geometry list. Every emitted record pairs
/// exactly one geometry with exactly one education row; duplicate education
/// rows for the same FIPS are an error under [`JoinPolicy::Strict`] and keep
/// the first row under [`JoinPolicy::Lenient`].
pub fn join_counties(
    counties: &[CountyShape],
    education: &[EducationRecord],
    policy: JoinPolicy,
) -> Result<Vec<JoinedCounty>> {
    let mut by_fips: HashMap<&FipsCode, &EducationRecord> = HashMap::with_capacity(education.len());
    for record in education {
        match by_fips.entry(&record.fips) {
            Entry::Vacant(slot) => {
                slot.insert(record);
            }
            Entry::Occupied(_) => match policy {
                JoinPolicy::Strict => bail!("duplicate education record for fips {}", record.fips),
                JoinPolicy::Lenient => {
                    warn!(fips = %record.fips, "duplicate education record ignored");
                }
            },
        }
    }

    let mut joined = Vec::with_capacity(counties.len());
    for county in counties {
        match by_fips.get(&county.id) {
            Some(record) => joined.push(JoinedCounty {
                id: county.id.clone(),
                area: record.area_name.clone(),
                state: record.state.clone(),
                bachelor: record.bachelors_or_higher,
            }),
            None => match policy {
                JoinPolicy::Strict => {
                    bail!("no education record for county {}", county.id)
                }
                JoinPolicy::Lenient => {
                    warn!(fips = %county.id, "county has no education record, dropped");
                }
            },
        }
    }

    Ok(joined)
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::MultiPolygon;

    fn shape(id: &str) -> CountyShape {
        CountyShape {
            id: FipsCode::from(id),
            shape: MultiPolygon(vec![]),
        }
    }

    fn record(fips: &str, area: &str, bachelor: f64) -> EducationRecord {
        EducationRecord {
            fips: FipsCode::from(fips),
            area_name: area.to_string(),
            state: "AL".to_string(),
            bachelors_or_higher: bachelor,
        }
    }

    #[test]
    fn test_join_matches_on_fips() {
        let counties = vec![shape("01001"), shape("01003")];
        let education = vec![
            record("01003", "Baldwin", 26.6),
            record("01001", "Autauga", 18.5),
        ];

        let joined = join_counties(&counties, &education, JoinPolicy::Strict).unwrap();

        assert_eq!(joined.len(), 2);
        // Ordering follows the geometry list, not the education list.
        assert_eq!(joined[0].id, FipsCode::from("01001"));
        assert_eq!(joined[0].area, "Autauga");
        assert_eq!(joined[0].bachelor, 18.5);
        assert_eq!(joined[1].id, FipsCode::from("01003"));
    }

    #[test]
    fn test_strict_fails_on_unmatched_geometry() {
        let counties = vec![shape("01001"), shape("99999")];
        let education = vec![record("01001", "Autauga", 18.5)];

        let result = join_counties(&counties, &education, JoinPolicy::Strict);

        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("99999"));
    }

    #[test]
    fn test_lenient_drops_unmatched_geometry() {
        let counties = vec![shape("01001"), shape("99999")];
        let education = vec![record("01001", "Autauga", 18.5)];

        let joined = join_counties(&counties, &education, JoinPolicy::Lenient).unwrap();

        assert_eq!(joined.len(), 1);
        assert_eq!(joined[0].id, FipsCode::from("01001"));
    }

    #[test]
    fn test_extra_education_records_are_ignored() {
        let counties = vec![shape("01001")];
        let education = vec![
            record("01001", "Autauga", 18.5),
            record("56045", "Weston", 17.2),
        ];

        let joined = join_counties(&counties, &education, JoinPolicy::Strict).unwrap();

        assert_eq!(joined.len(), 1);
    }

    #[test]
    fn test_strict_fails_on_duplicate_education_fips() {
        let counties = vec![shape("01001")];
        let education = vec![
            record("01001", "Autauga", 18.5),
            record("01001", "Autauga again", 19.0),
        ];

        assert!(join_counties(&counties, &education, JoinPolicy::Strict).is_err());
    }

    #[test]
    fn test_lenient_keeps_first_duplicate() {
        let counties = vec![shape("01001")];
        let education = vec![
            record("01001", "Autauga", 18.5),
            record("01001", "Autauga again", 19.0),
        ];

        let joined = join_counties(&counties, &education, JoinPolicy::Lenient).unwrap();

        assert_eq!(joined.len(), 1);
        assert_eq!(joined[0].area, "Autauga");
        assert_eq!(joined[0].bachelor, 18.5);
    }

    #[test]
    fn test_numeric_and_padded_ids_do_not_match() {
        let counties = vec![shape("01001")];
        let education = vec![EducationRecord {
            fips: FipsCode::from(1001u64),
            area_name: "Autauga".to_string(),
            state: "AL".to_string(),
            bachelors_or_higher: 18.5,
        }];

        assert!(join_counties(&counties, &education, JoinPolicy::Strict).is_err());
        let lenient = join_counties(&counties, &education, JoinPolicy::Lenient).unwrap();
        assert!(lenient.is_empty());
    }
}
