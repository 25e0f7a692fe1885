use super::geo::{format_km, Length};
use super::geojson::{Feature, FeatureCollection};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Number of features per geometry kind.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(transparent)]
pub struct Summary {
    counts: BTreeMap<String, usize>,
}

impl Summary {
    pub fn get(&self, kind: &str) -> usize {
        self.counts.get(kind).copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.counts.iter().map(|(kind, &count)| (kind.as_str(), count))
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct DetailedLengthEntry {
    #[serde(rename = "type")]
    pub kind: String,
    pub length: String,
}

/// Counts the features of a collection by geometry kind.
///
/// Features without a recognized geometry are counted as `"unknown"`, so the
/// counts always add up to the size of the collection.
///
/// # Example
///
/// ```
/// use kml_summary::kml::parse;
/// use kml_summary::summary::classify;
///
/// let collection = parse("<kml><Placemark><Point><coordinates>1,2</coordinates></Point></Placemark></kml>").unwrap();
/// let summary = classify(&collection);
/// assert_eq!(summary.get("Point"), 1);
/// assert_eq!(summary.total(), collection.len());
/// ```
pub fn classify(collection: &FeatureCollection) -> Summary {
    let mut counts = BTreeMap::new();
    for feature in collection.iter() {
        let kind = feature.kind().name().to_string();
        *counts.entry(kind).or_insert(0) += 1;
    }
    Summary { counts }
}

fn detailed_entry(feature: &Feature) -> Option<DetailedLengthEntry> {
    let kind = feature.kind();
    if !kind.is_line_like() {
        return None;
    }
    let length = feature.geometry.as_ref().map_or(0., |geometry| geometry.length());
    Some(DetailedLengthEntry {
        kind: kind.name().to_string(),
        length: format_km(length),
    })
}

/// Lengths of all line-like features, in collection order.
pub fn detailed_report(collection: &FeatureCollection) -> Vec<DetailedLengthEntry> {
    collection.iter().filter_map(detailed_entry).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{feature, line, point};
    use crate::geojson::Geometry;

    fn sample() -> FeatureCollection {
        FeatureCollection::new(vec![
            point(13.4, 52.5),
            line(&[(0., 0.), (1., 0.)]),
            point(2.3, 48.8),
            feature(None),
            feature(Some(Geometry::Unknown)),
        ])
    }

    #[test]
    fn classify_empty_collection() {
        let summary = classify(&FeatureCollection::default());
        assert!(summary.is_empty());
        assert_eq!(summary.total(), 0);
    }

    #[test]
    fn classify_counts_kinds() {
        let collection = sample();
        let summary = classify(&collection);
        assert_eq!(summary.len(), 3);
        assert_eq!(summary.get("Point"), 2);
        assert_eq!(summary.get("LineString"), 1);
        assert_eq!(summary.get("unknown"), 2);
        assert_eq!(summary.get("Polygon"), 0);
        assert_eq!(summary.total(), collection.len());
    }

    #[test]
    fn classify_ignores_order() {
        let collection = sample();
        let mut features = collection.features.clone();
        features.reverse();
        let reversed = FeatureCollection::new(features);
        assert_eq!(classify(&collection), classify(&reversed));
        assert_eq!(classify(&collection), classify(&collection));
    }

    #[test]
    fn serialize_summary() {
        let summary = classify(&sample());
        let json = serde_json::to_string(&summary).unwrap();
        assert_eq!(json, r#"{"LineString":1,"Point":2,"unknown":2}"#);
    }

    #[test]
    fn detailed_report_skips_points() {
        let collection = FeatureCollection::new(vec![
            point(13.4, 52.5),
            line(&[(0., 0.), (0., 1.)]),
            point(2.3, 48.8),
        ]);
        let report = detailed_report(&collection);
        assert_eq!(report.len(), 1);
        assert_eq!(report[0].kind, "LineString");
    }

    #[test]
    fn detailed_report_keeps_order() {
        let short = line(&[(0., 0.), (0., 1.)]);
        let long = line(&[(0., 0.), (0., 1.), (0., 2.)]);
        let collection = FeatureCollection::new(vec![short.clone(), long.clone()]);
        let lengths: Vec<_> = detailed_report(&collection)
            .into_iter()
            .map(|entry| entry.length)
            .collect();
        assert_eq!(lengths[1], "222.39");

        let reversed = FeatureCollection::new(vec![long, short]);
        let reversed_lengths: Vec<_> = detailed_report(&reversed)
            .into_iter()
            .map(|entry| entry.length)
            .collect();
        assert_eq!(reversed_lengths, vec![lengths[1].clone(), lengths[0].clone()]);
    }

    #[test]
    fn detailed_report_for_degenerate_and_multi_lines() {
        let multi = feature(Some(Geometry::MultiLineString {
            coordinates: vec![
                vec![vec![0., 0.], vec![1., 0.]],
                vec![vec![1., 0.], vec![2., 0.]],
            ],
        }));
        let collection = FeatureCollection::new(vec![line(&[(5., 5.)]), multi]);
        let report = detailed_report(&collection);
        assert_eq!(
            report,
            vec![
                DetailedLengthEntry {
                    kind: "LineString".into(),
                    length: "0.00".into(),
                },
                DetailedLengthEntry {
                    kind: "MultiLineString".into(),
                    length: "222.39".into(),
                },
            ]
        );
    }

    #[test]
    fn detailed_report_of_collection_without_lines() {
        let collection = FeatureCollection::new(vec![point(1., 2.), feature(None)]);
        assert!(detailed_report(&collection).is_empty());
    }
}
