//! GeoJSON export of nearby groups

use anyhow::{Context, Result};
use geojson::{feature::Id, Feature, FeatureCollection, Geometry, Value};
use placeguide_core::models::{Coordinate, NearbyGroup};
use serde_json::{Map, Value as JsonValue};
use std::fs;
use std::path::Path;

/// One Point feature per member plus one centroid feature per group
pub fn groups_to_feature_collection(groups: &[NearbyGroup]) -> FeatureCollection {
    let mut features = Vec::new();

    for (index, group) in groups.iter().enumerate() {
        for (position, member) in group.members().iter().enumerate() {
            let mut properties = Map::new();
            properties.insert("group".to_string(), JsonValue::from(index));
            properties.insert("role".to_string(), JsonValue::from("member"));
            properties.insert("seed".to_string(), JsonValue::from(position == 0));
            properties.insert("name".to_string(), JsonValue::from(member.name.clone()));
            properties.insert("category".to_string(), JsonValue::from(member.category.as_str()));

            features.push(Feature {
                geometry: Some(point(member.coordinate)),
                properties: Some(properties),
                id: Some(Id::String(member.id.clone())),
                bbox: None,
                foreign_members: None,
            });
        }

        let mut properties = Map::new();
        properties.insert("group".to_string(), JsonValue::from(index));
        properties.insert("role".to_string(), JsonValue::from("centroid"));
        properties.insert("size".to_string(), JsonValue::from(group.size()));
        properties.insert(
            "member_ids".to_string(),
            JsonValue::from(group.member_ids().map(str::to_string).collect::<Vec<_>>()),
        );

        features.push(Feature {
            geometry: Some(point(group.centroid())),
            properties: Some(properties),
            id: None,
            bbox: None,
            foreign_members: None,
        });
    }

    FeatureCollection {
        features,
        bbox: None,
        foreign_members: None,
    }
}

/// Write groups to a GeoJSON file
pub fn write_groups(path: &Path, groups: &[NearbyGroup]) -> Result<()> {
    let collection = groups_to_feature_collection(groups);
    let content = serde_json::to_string_pretty(&collection)?;
    fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

/// GeoJSON positions are `[lng, lat]`
fn point(coordinate: Coordinate) -> Geometry {
    Geometry::new(Value::Point(vec![coordinate.lng, coordinate.lat]))
}
