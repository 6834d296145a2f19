//! Storage event notifications

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::errors::ClimateResult;

const STORAGE_EVENT_SOURCE: &str = "aws:s3";

/// An object-created notification batch, in the S3 event layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriggerEvent {
    #[serde(rename = "Records")]
    pub records: Vec<EventRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    #[serde(rename = "eventSource", default)]
    pub event_source: String,
    #[serde(default)]
    pub s3: Option<StorageEntity>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageEntity {
    pub bucket: BucketRef,
    pub object: ObjectRef,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BucketRef {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectRef {
    pub key: String,
}

/// One object to process
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub bucket: String,
    pub key: String,
}

impl TriggerEvent {
    pub fn parse(content: &str) -> ClimateResult<Self> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn from_file(path: &Path) -> ClimateResult<Self> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// A trigger for a single object
    pub fn for_object(bucket: &str, key: &str) -> Self {
        TriggerEvent {
            records: vec![EventRecord {
                event_source: STORAGE_EVENT_SOURCE.to_string(),
                s3: Some(StorageEntity {
                    bucket: BucketRef { name: bucket.to_string() },
                    object: ObjectRef { key: key.to_string() },
                }),
            }],
        }
    }

    /// The `(bucket, key)` pairs of storage records, in event order.
    ///
    /// Records from any other event source are dropped.
    pub fn notifications(&self) -> Vec<Notification> {
        let mut found = Vec::new();
        for record in &self.records {
            if record.event_source != STORAGE_EVENT_SOURCE {
                debug!("Ignoring record from event source '{}'", record.event_source);
                continue;
            }
            match &record.s3 {
                Some(entity) => found.push(Notification {
                    bucket: entity.bucket.name.clone(),
                    key: entity.object.key.clone(),
                }),
                None => warn!("Storage record without an object reference"),
            }
        }
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ClimateError;

    const EVENT: &str = r#"{
        "Records": [
            {
                "eventSource": "aws:s3",
                "eventName": "ObjectCreated:Put",
                "s3": {
                    "bucket": { "name": "climate-raw" },
                    "object": { "key": "chirps/chirps-v2.0_2024.01.tif", "size": 1024 }
                }
            },
            { "eventSource": "aws:sqs", "body": "{}" },
            {
                "eventSource": "aws:s3",
                "s3": {
                    "bucket": { "name": "climate-raw" },
                    "object": { "key": "chirps/readme.txt" }
                }
            }
        ]
    }"#;

    #[test]
    fn test_notifications_skip_foreign_sources() {
        let event = TriggerEvent::parse(EVENT).unwrap();
        assert_eq!(event.records.len(), 3);

        let notifications = event.notifications();
        assert_eq!(notifications.len(), 2);
        assert_eq!(notifications[0].bucket, "climate-raw");
        assert_eq!(notifications[0].key, "chirps/chirps-v2.0_2024.01.tif");
        assert_eq!(notifications[1].key, "chirps/readme.txt");
    }

    #[test]
    fn test_missing_records_is_a_trigger_error() {
        assert!(matches!(TriggerEvent::parse("{}"), Err(ClimateError::Trigger(_))));
        assert!(matches!(TriggerEvent::parse("not json"), Err(ClimateError::Trigger(_))));
    }

    #[test]
    fn test_for_object_round_trips_through_json() {
        let event = TriggerEvent::for_object("bucket", "a/b_2020.12.tif");
        let json = serde_json::to_string(&event).unwrap();
        let parsed = TriggerEvent::parse(&json).unwrap();
        assert_eq!(
            parsed.notifications(),
            vec![Notification { bucket: "bucket".into(), key: "a/b_2020.12.tif".into() }]
        );
    }
}
